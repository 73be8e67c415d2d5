//! Service context bundling all port trait objects.

use std::path::Path;

use crate::ports::clock::Clock;
use crate::ports::diagnostics::Diagnostics;
use crate::ports::directory::DirectoryApi;
use crate::ports::filesystem::FileSystem;

/// Bundles the port trait objects into a single explicit context.
///
/// Commands receive the context and pass it down; nothing in the core
/// reaches for ambient process state.
pub struct ServiceContext {
    /// Clock for timestamps and dated filenames.
    pub clock: Box<dyn Clock>,
    /// Filesystem for snapshots, reports, and the change log.
    pub fs: Box<dyn FileSystem>,
    /// Diagnostics sink for operational messages.
    pub diag: Box<dyn Diagnostics>,
    /// ODS directory client.
    pub directory: Box<dyn DirectoryApi>,
}

impl ServiceContext {
    /// Creates a live context: system clock, real disk, stderr-plus-logfile
    /// diagnostics, and the public ODS directory over HTTP.
    #[must_use]
    pub fn live(log_dir: &Path) -> Self {
        use crate::adapters::live::{
            FileDiagnostics, LiveClock, LiveDirectoryClient, LiveFileSystem,
        };

        let today = LiveClock.today();
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            diag: Box::new(FileDiagnostics::dated(Box::new(LiveFileSystem), log_dir, today)),
            directory: Box::new(LiveDirectoryClient::new()),
        }
    }
}
