//! Diagnostics port: an explicit sink instead of a process-global logger.

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Progress and outcome messages.
    Info,
    /// Recoverable problems, e.g. a skipped malformed record.
    Warn,
    /// Failures reported to the operator.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// Receives operational diagnostics from commands and adapters.
///
/// Passed explicitly through the `ServiceContext` so the core holds no
/// global mutable state; tests substitute a recording sink.
pub trait Diagnostics: Send + Sync {
    /// Emits one diagnostic message.
    fn emit(&self, severity: Severity, message: &str);

    /// Emits an [`Severity::Info`] message.
    fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    /// Emits a [`Severity::Warn`] message.
    fn warn(&self, message: &str) {
        self.emit(Severity::Warn, message);
    }

    /// Emits an [`Severity::Error`] message.
    fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }
}
