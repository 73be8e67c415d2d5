//! Persisted change history: one entry per comparison run that found changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::diff::{ChangeRecord, DiffReport};

/// Per-kind counts for one entity class in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    /// All records for the class.
    pub total: usize,
    /// Entities that appeared.
    pub new: usize,
    /// Entities that disappeared.
    pub closed: usize,
    /// Entities whose status changed.
    pub status: usize,
    /// Practices whose network membership changed (always 0 for networks).
    pub membership: usize,
}

impl ClassSummary {
    fn count(records: &[ChangeRecord]) -> Self {
        let mut summary = Self { total: records.len(), ..Self::default() };
        for record in records {
            match record {
                ChangeRecord::New { .. } => summary.new += 1,
                ChangeRecord::Closed { .. } => summary.closed += 1,
                ChangeRecord::StatusChange { .. } => summary.status += 1,
                ChangeRecord::MembershipChange { .. } => summary.membership += 1,
            }
        }
        summary
    }
}

/// Summary statistics for one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// Records across both classes.
    pub total_changes: usize,
    /// Practice-class counts.
    pub practice_changes: ClassSummary,
    /// Network-class counts.
    pub network_changes: ClassSummary,
}

impl ChangeSummary {
    /// Computes summary counts for a diff report.
    #[must_use]
    pub fn from_report(report: &DiffReport) -> Self {
        Self {
            total_changes: report.total(),
            practice_changes: ClassSummary::count(&report.practice_changes),
            network_changes: ClassSummary::count(&report.network_changes),
        }
    }
}

/// One appended comparison run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    /// Date the comparison was run.
    pub date: NaiveDate,
    /// Filename of the earlier snapshot.
    pub old_snapshot: String,
    /// Filename of the later snapshot.
    pub new_snapshot: String,
    /// Per-kind counts for the run.
    pub summary: ChangeSummary,
    /// Practice change records.
    pub practice_changes: Vec<ChangeRecord>,
    /// Network change records.
    pub network_changes: Vec<ChangeRecord>,
}

/// The growing, append-only change history.
///
/// Runs that found nothing append no entry. Re-running against the same
/// snapshot pair appends a duplicate entry; the log does not deduplicate by
/// pair identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLog {
    /// Appended runs, oldest first.
    pub changes: Vec<ChangeLogEntry>,
}

impl ChangeLog {
    /// Appends one run's records when the report is non-empty.
    ///
    /// Returns the run's summary when an entry was appended, `None` when the
    /// report was empty and the log was left untouched.
    pub fn append_run(
        &mut self,
        date: NaiveDate,
        old_snapshot: &str,
        new_snapshot: &str,
        report: DiffReport,
    ) -> Option<&ChangeSummary> {
        if report.is_empty() {
            return None;
        }

        let summary = ChangeSummary::from_report(&report);
        self.changes.push(ChangeLogEntry {
            date,
            old_snapshot: old_snapshot.to_string(),
            new_snapshot: new_snapshot.to_string(),
            summary,
            practice_changes: report.practice_changes,
            network_changes: report.network_changes,
        });
        self.changes.last().map(|entry| &entry.summary)
    }
}
