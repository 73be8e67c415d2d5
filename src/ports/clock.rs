//! Clock port for obtaining the current time.

use chrono::{DateTime, NaiveDate, Utc};

/// Provides the current time.
///
/// Snapshot filenames, log entries, and change-log dates all derive from
/// this port, so substituting a fixed clock makes runs deterministic in
/// tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC date, used for dated filenames.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
