//! Flat-file persistence for snapshots and the change log.
//!
//! Directory layout under the data directory:
//!
//! ```text
//! <data>/
//!   ├── ods_snapshot_20240301.json
//!   ├── ods_snapshot_20240401.json
//!   └── tracked_changes.json
//! ```
//!
//! All I/O goes through the `FileSystem` port so the store works with the
//! live adapter and in-memory test doubles alike.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::history::ChangeLog;
use super::Snapshot;
use crate::context::ServiceContext;

const SNAPSHOT_PREFIX: &str = "ods_snapshot_";
const SNAPSHOT_SUFFIX: &str = ".json";
const CHANGE_LOG_FILE: &str = "tracked_changes.json";

/// Persistence layer for dated snapshots and the tracked-changes log.
pub struct SnapshotStore<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
}

impl<'a> SnapshotStore<'a> {
    /// Creates a store rooted at the given data directory.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        Self { ctx, root: root.to_path_buf() }
    }

    /// Filename for a snapshot taken on the given date.
    #[must_use]
    pub fn snapshot_filename(date: NaiveDate) -> String {
        format!("{SNAPSHOT_PREFIX}{}{SNAPSHOT_SUFFIX}", date.format("%Y%m%d"))
    }

    /// Returns `true` if a snapshot for the given date is already on disk.
    #[must_use]
    pub fn has_snapshot_for(&self, date: NaiveDate) -> bool {
        self.ctx.fs.exists(&self.root.join(Self::snapshot_filename(date)))
    }

    /// Saves a snapshot under its dated filename and returns the path.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save(&self, snapshot: &Snapshot, date: NaiveDate) -> Result<PathBuf, String> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| format!("Failed to serialize snapshot: {e}"))?;
        let path = self.root.join(Self::snapshot_filename(date));
        self.ctx
            .fs
            .write(&path, &json)
            .map_err(|e| format!("Failed to write snapshot {}: {e}", path.display()))?;
        Ok(path)
    }

    /// Lists snapshot filenames in the data directory, oldest first.
    ///
    /// The date stamp in the filename sorts lexicographically, so a plain
    /// sort gives chronological order.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be listed.
    pub fn list_snapshots(&self) -> Result<Vec<String>, String> {
        if !self.ctx.fs.exists(&self.root) {
            return Ok(Vec::new());
        }
        let entries = self
            .ctx
            .fs
            .list_dir(&self.root)
            .map_err(|e| format!("Failed to list data directory: {e}"))?;
        let mut names: Vec<String> = entries
            .into_iter()
            .filter(|name| name.starts_with(SNAPSHOT_PREFIX) && name.ends_with(SNAPSHOT_SUFFIX))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Loads a snapshot by filename.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self, filename: &str) -> Result<Snapshot, String> {
        let path = self.root.join(filename);
        let contents = self
            .ctx
            .fs
            .read_to_string(&path)
            .map_err(|e| format!("Failed to read snapshot {filename}: {e}"))?;
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse snapshot {filename}: {e}"))
    }

    /// Loads the most recent snapshot, or `None` when the store is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if listing or loading fails.
    pub fn load_latest(&self) -> Result<Option<(String, Snapshot)>, String> {
        let names = self.list_snapshots()?;
        match names.last() {
            Some(name) => Ok(Some((name.clone(), self.load(name)?))),
            None => Ok(None),
        }
    }

    /// Loads the two most recent snapshots as `(previous, latest)`.
    ///
    /// # Errors
    ///
    /// Returns an error when fewer than two snapshots exist, or when
    /// loading either snapshot fails.
    pub fn load_latest_pair(&self) -> Result<((String, Snapshot), (String, Snapshot)), String> {
        let names = self.list_snapshots()?;
        if names.len() < 2 {
            return Err(format!(
                "Need at least two snapshots to compare, found {}",
                names.len()
            ));
        }
        let latest = &names[names.len() - 1];
        let previous = &names[names.len() - 2];
        Ok(((previous.clone(), self.load(previous)?), (latest.clone(), self.load(latest)?)))
    }

    /// Loads the change log, or an empty log when none has been written yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing log cannot be read or parsed.
    pub fn load_change_log(&self) -> Result<ChangeLog, String> {
        let path = self.change_log_path();
        if !self.ctx.fs.exists(&path) {
            return Ok(ChangeLog::default());
        }
        let contents = self
            .ctx
            .fs
            .read_to_string(&path)
            .map_err(|e| format!("Failed to read change log: {e}"))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse change log: {e}"))
    }

    /// Writes the change log back to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save_change_log(&self, log: &ChangeLog) -> Result<(), String> {
        let json = serde_json::to_string_pretty(log)
            .map_err(|e| format!("Failed to serialize change log: {e}"))?;
        self.ctx
            .fs
            .write(&self.change_log_path(), &json)
            .map_err(|e| format!("Failed to write change log: {e}"))
    }

    fn change_log_path(&self) -> PathBuf {
        self.root.join(CHANGE_LOG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::memory_context;
    use crate::snapshot::fixtures::{practice, snapshot};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn save_and_load_round_trips() {
        let ctx = memory_context();
        let store = SnapshotStore::new(&ctx, Path::new("/data"));

        let snap = snapshot(vec![practice("A81001", "SURGERY A", None)]);
        store.save(&snap, date("2024-03-01")).unwrap();

        let loaded = store.load("ods_snapshot_20240301.json").unwrap();
        assert_eq!(snap, loaded);
    }

    #[test]
    fn list_snapshots_sorted_oldest_first() {
        let ctx = memory_context();
        let store = SnapshotStore::new(&ctx, Path::new("/data"));
        let snap = snapshot(vec![]);

        store.save(&snap, date("2024-04-01")).unwrap();
        store.save(&snap, date("2024-03-01")).unwrap();
        store.save(&snap, date("2024-05-01")).unwrap();
        ctx.fs.write(Path::new("/data/tracked_changes.json"), "{}").unwrap();

        let names = store.list_snapshots().unwrap();
        assert_eq!(
            names,
            vec![
                "ods_snapshot_20240301.json",
                "ods_snapshot_20240401.json",
                "ods_snapshot_20240501.json"
            ]
        );
    }

    #[test]
    fn load_latest_pair_orders_previous_then_latest() {
        let ctx = memory_context();
        let store = SnapshotStore::new(&ctx, Path::new("/data"));

        store.save(&snapshot(vec![]), date("2024-03-01")).unwrap();
        store
            .save(&snapshot(vec![practice("A81001", "SURGERY A", None)]), date("2024-04-01"))
            .unwrap();

        let ((prev_name, prev), (latest_name, latest)) = store.load_latest_pair().unwrap();
        assert_eq!(prev_name, "ods_snapshot_20240301.json");
        assert_eq!(latest_name, "ods_snapshot_20240401.json");
        assert!(prev.organisations.is_empty());
        assert_eq!(latest.organisations.len(), 1);
    }

    #[test]
    fn load_latest_pair_needs_two_snapshots() {
        let ctx = memory_context();
        let store = SnapshotStore::new(&ctx, Path::new("/data"));
        store.save(&snapshot(vec![]), date("2024-03-01")).unwrap();

        let err = store.load_latest_pair().unwrap_err();
        assert!(err.contains("at least two snapshots"));
    }

    #[test]
    fn load_latest_on_empty_store_is_none() {
        let ctx = memory_context();
        let store = SnapshotStore::new(&ctx, Path::new("/data"));
        assert!(store.load_latest().unwrap().is_none());
    }

    #[test]
    fn change_log_defaults_to_empty_and_round_trips() {
        let ctx = memory_context();
        let store = SnapshotStore::new(&ctx, Path::new("/data"));

        let mut log = store.load_change_log().unwrap();
        assert!(log.changes.is_empty());

        let s1 = snapshot(vec![]);
        let s2 = snapshot(vec![practice("A81001", "SURGERY A", None)]);
        log.append_run(
            date("2024-04-01"),
            "s1.json",
            "s2.json",
            crate::snapshot::diff::diff_snapshots(&s1, &s2),
        );
        store.save_change_log(&log).unwrap();

        let loaded = store.load_change_log().unwrap();
        assert_eq!(log, loaded);
    }

    #[test]
    fn has_snapshot_for_checks_dated_filename() {
        let ctx = memory_context();
        let store = SnapshotStore::new(&ctx, Path::new("/data"));
        assert!(!store.has_snapshot_for(date("2024-03-01")));

        store.save(&snapshot(vec![]), date("2024-03-01")).unwrap();
        assert!(store.has_snapshot_for(date("2024-03-01")));
    }
}
