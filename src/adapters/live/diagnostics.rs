//! Live diagnostics adapter: stderr plus a dated log file.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;

use crate::ports::diagnostics::{Diagnostics, Severity};
use crate::ports::filesystem::FileSystem;

/// Diagnostics sink that mirrors messages to stderr and appends them to a
/// log file (`logs/odswatch_<YYYYMMDD>.log` by default).
///
/// Appends go through the `FileSystem` port; failures are swallowed after a
/// one-off stderr notice so that diagnostics can never fail a run.
pub struct FileDiagnostics {
    fs: Box<dyn FileSystem>,
    path: PathBuf,
    write_failed: Mutex<bool>,
}

impl FileDiagnostics {
    /// Creates a sink appending to the given log file path.
    #[must_use]
    pub fn new(fs: Box<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path, write_failed: Mutex::new(false) }
    }

    /// Creates a sink with the conventional dated filename under `log_dir`.
    #[must_use]
    pub fn dated(
        fs: Box<dyn FileSystem>,
        log_dir: &std::path::Path,
        date: chrono::NaiveDate,
    ) -> Self {
        Self::new(fs, log_dir.join(format!("odswatch_{}.log", date.format("%Y%m%d"))))
    }
}

impl Diagnostics for FileDiagnostics {
    fn emit(&self, severity: Severity, message: &str) {
        let line = format!("{} - {severity} - {message}", Utc::now().format("%Y-%m-%d %H:%M:%S"));
        eprintln!("{line}");

        if self.fs.append_line(&self.path, &line).is_err() {
            let mut failed =
                self.write_failed.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            if !*failed {
                eprintln!("Warning: could not append to log file {}", self.path.display());
                *failed = true;
            }
        }
    }
}
