//! Snapshot diffing: what changed between two data pulls.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Snapshot;
use crate::org::{Organisation, OrgStatus};

/// One detected difference between two snapshots for one entity.
///
/// Produced only by [`diff_snapshots`] and immutable once created. The
/// serialized form tags each record with its change type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeRecord {
    /// Entity present in the new snapshot only.
    New {
        /// ODS code.
        code: String,
        /// Display name from the new snapshot.
        name: String,
        /// Date the directory recorded the change.
        date_of_change: Option<NaiveDate>,
    },
    /// Entity present in the old snapshot only.
    Closed {
        /// ODS code.
        code: String,
        /// Display name from the old snapshot.
        name: String,
        /// Date the directory recorded the change.
        date_of_change: Option<NaiveDate>,
    },
    /// Entity present in both snapshots with differing status.
    StatusChange {
        /// ODS code.
        code: String,
        /// Display name from the new snapshot.
        name: String,
        /// Status in the old snapshot.
        old_status: OrgStatus,
        /// Status in the new snapshot.
        new_status: OrgStatus,
        /// Date the directory recorded the change.
        date_of_change: Option<NaiveDate>,
    },
    /// Practice whose resolved current network differs between snapshots.
    MembershipChange {
        /// ODS code of the practice.
        code: String,
        /// Display name from the new snapshot.
        name: String,
        /// Network code in the old snapshot, if any.
        old_network: Option<String>,
        /// Network name in the old snapshot, if any.
        old_network_name: Option<String>,
        /// Network code in the new snapshot, if any.
        new_network: Option<String>,
        /// Network name in the new snapshot, if any.
        new_network_name: Option<String>,
        /// Date the directory recorded the change.
        date_of_change: Option<NaiveDate>,
    },
}

impl ChangeRecord {
    /// The ODS code of the changed entity.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::New { code, .. }
            | Self::Closed { code, .. }
            | Self::StatusChange { code, .. }
            | Self::MembershipChange { code, .. } => code,
        }
    }
}

/// The per-class change lists for one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Changes detected among GP Practices.
    pub practice_changes: Vec<ChangeRecord>,
    /// Changes detected among Primary Care Networks.
    pub network_changes: Vec<ChangeRecord>,
}

impl DiffReport {
    /// Returns `true` if neither class produced any change records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.practice_changes.is_empty() && self.network_changes.is_empty()
    }

    /// Total number of change records across both classes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.practice_changes.len() + self.network_changes.len()
    }
}

/// Compares two snapshots and emits change records per entity class.
///
/// `old` must be chronologically earlier than `new`. Neither snapshot is
/// mutated. An organisation counts as a class member only in snapshots where
/// it both appears and matches the class filter, so an entity whose class
/// membership itself changes is handled independently per class. Each entity
/// contributes at most one record per change kind, and iteration over the
/// sorted code union keeps the output order deterministic.
///
/// Diffing a snapshot against itself yields an empty report.
#[must_use]
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> DiffReport {
    DiffReport {
        practice_changes: diff_class(old, new, Organisation::is_practice, true),
        network_changes: diff_class(old, new, Organisation::is_network, false),
    }
}

/// Diffs one entity class. Membership resolution only applies to practices.
fn diff_class(
    old: &Snapshot,
    new: &Snapshot,
    in_class: fn(&Organisation) -> bool,
    track_membership: bool,
) -> Vec<ChangeRecord> {
    let old_members = class_members(old, in_class);
    let new_members = class_members(new, in_class);

    let mut changes = Vec::new();
    for code in old_members.union(&new_members) {
        match (old_members.contains(code), new_members.contains(code)) {
            (false, true) => {
                let org = &new.organisations[*code];
                changes.push(ChangeRecord::New {
                    code: (*code).to_string(),
                    name: org.name.clone(),
                    date_of_change: org.last_changed,
                });
            }
            (true, false) => {
                let org = &old.organisations[*code];
                changes.push(ChangeRecord::Closed {
                    code: (*code).to_string(),
                    name: org.name.clone(),
                    date_of_change: org.last_changed,
                });
            }
            (true, true) => {
                let old_org = &old.organisations[*code];
                let new_org = &new.organisations[*code];

                if old_org.status != new_org.status {
                    changes.push(ChangeRecord::StatusChange {
                        code: (*code).to_string(),
                        name: new_org.name.clone(),
                        old_status: old_org.status,
                        new_status: new_org.status,
                        date_of_change: new_org.last_changed,
                    });
                }

                if track_membership {
                    if let Some(change) = membership_change(old, new, old_org, new_org) {
                        changes.push(change);
                    }
                }
            }
            (false, false) => unreachable!("code came from the union of both member sets"),
        }
    }
    changes
}

/// Codes of class members: present in the snapshot and matching the filter
/// there.
fn class_members<'a>(
    snapshot: &'a Snapshot,
    in_class: fn(&Organisation) -> bool,
) -> BTreeSet<&'a str> {
    snapshot
        .organisations
        .values()
        .filter(|org| in_class(org))
        .map(|org| org.code.as_str())
        .collect()
}

/// Resolves current membership independently in each snapshot and emits a
/// record when the codes differ. Resolution is re-derived rather than diffed
/// on raw relationship lists, because relationship history can hold several
/// past memberships.
fn membership_change(
    old: &Snapshot,
    new: &Snapshot,
    old_org: &Organisation,
    new_org: &Organisation,
) -> Option<ChangeRecord> {
    let old_membership = old.current_network(old_org);
    let new_membership = new.current_network(new_org);

    let old_code = old_membership.as_ref().map(|m| m.network_code);
    let new_code = new_membership.as_ref().map(|m| m.network_code);
    if old_code == new_code {
        return None;
    }

    Some(ChangeRecord::MembershipChange {
        code: new_org.code.clone(),
        name: new_org.name.clone(),
        old_network: old_code.map(String::from),
        old_network_name: old_membership.map(|m| m.network_name.to_string()),
        new_network: new_code.map(String::from),
        new_network_name: new_membership.map(|m| m.network_name.to_string()),
        date_of_change: new_org.last_changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::{network, practice, snapshot};

    #[test]
    fn new_and_closed_are_symmetric() {
        let old = snapshot(vec![
            practice("A81001", "SURGERY A", None),
            practice("A81002", "SURGERY B", None),
        ]);
        let new = snapshot(vec![
            practice("A81002", "SURGERY B", None),
            practice("A81003", "SURGERY C", None),
        ]);

        let report = diff_snapshots(&old, &new);
        assert_eq!(report.practice_changes.len(), 2);
        assert!(matches!(
            &report.practice_changes[0],
            ChangeRecord::Closed { code, .. } if code == "A81001"
        ));
        assert!(matches!(
            &report.practice_changes[1],
            ChangeRecord::New { code, .. } if code == "A81003"
        ));
        assert!(report.network_changes.is_empty());
    }

    #[test]
    fn status_change_carries_both_values() {
        let old = snapshot(vec![practice("A81001", "SURGERY A", None)]);
        let mut closed = practice("A81001", "SURGERY A", None);
        closed.status = crate::org::OrgStatus::Inactive;
        let new = snapshot(vec![closed]);

        let report = diff_snapshots(&old, &new);
        assert_eq!(report.practice_changes.len(), 1);
        match &report.practice_changes[0] {
            ChangeRecord::StatusChange { old_status, new_status, .. } => {
                assert_eq!(*old_status, crate::org::OrgStatus::Active);
                assert_eq!(*new_status, crate::org::OrgStatus::Inactive);
            }
            other => panic!("expected status change, got {other:?}"),
        }
    }

    #[test]
    fn membership_change_without_status_change() {
        let old = snapshot(vec![
            practice("A81001", "SURGERY A", Some(("U1", "2019-07-01"))),
            network("U1", "NETWORK ONE"),
            network("U2", "NETWORK TWO"),
        ]);
        let new = snapshot(vec![
            practice("A81001", "SURGERY A", Some(("U2", "2024-01-01"))),
            network("U1", "NETWORK ONE"),
            network("U2", "NETWORK TWO"),
        ]);

        let report = diff_snapshots(&old, &new);
        assert_eq!(report.practice_changes.len(), 1);
        match &report.practice_changes[0] {
            ChangeRecord::MembershipChange {
                old_network,
                old_network_name,
                new_network,
                new_network_name,
                ..
            } => {
                assert_eq!(old_network.as_deref(), Some("U1"));
                assert_eq!(old_network_name.as_deref(), Some("NETWORK ONE"));
                assert_eq!(new_network.as_deref(), Some("U2"));
                assert_eq!(new_network_name.as_deref(), Some("NETWORK TWO"));
            }
            other => panic!("expected membership change, got {other:?}"),
        }
    }

    #[test]
    fn lost_membership_yields_null_network_and_name() {
        let old = snapshot(vec![
            practice("A81001", "SURGERY A", Some(("U1", "2019-07-01"))),
            network("U1", "NETWORK ONE"),
        ]);
        let new =
            snapshot(vec![practice("A81001", "SURGERY A", None), network("U1", "NETWORK ONE")]);

        let report = diff_snapshots(&old, &new);
        match &report.practice_changes[0] {
            ChangeRecord::MembershipChange { new_network, new_network_name, .. } => {
                assert!(new_network.is_none());
                assert!(new_network_name.is_none());
            }
            other => panic!("expected membership change, got {other:?}"),
        }
    }

    #[test]
    fn status_and_membership_changes_can_coexist() {
        let old = snapshot(vec![
            practice("A81001", "SURGERY A", Some(("U1", "2019-07-01"))),
            network("U1", "NETWORK ONE"),
        ]);
        let mut moved = practice("A81001", "SURGERY A", None);
        moved.status = crate::org::OrgStatus::Inactive;
        let new = snapshot(vec![moved, network("U1", "NETWORK ONE")]);

        let report = diff_snapshots(&old, &new);
        assert_eq!(report.practice_changes.len(), 2);
        assert!(report
            .practice_changes
            .iter()
            .any(|c| matches!(c, ChangeRecord::StatusChange { .. })));
        assert!(report
            .practice_changes
            .iter()
            .any(|c| matches!(c, ChangeRecord::MembershipChange { .. })));
    }

    #[test]
    fn self_diff_is_empty() {
        let snap = snapshot(vec![
            practice("A81001", "SURGERY A", Some(("U1", "2019-07-01"))),
            network("U1", "NETWORK ONE"),
        ]);
        let report = diff_snapshots(&snap, &snap);
        assert!(report.is_empty());
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn network_diff_detects_new_and_closed() {
        let old = snapshot(vec![network("U1", "NETWORK ONE")]);
        let new = snapshot(vec![network("U2", "NETWORK TWO")]);

        let report = diff_snapshots(&old, &new);
        assert!(report.practice_changes.is_empty());
        assert_eq!(report.network_changes.len(), 2);
        assert!(matches!(
            &report.network_changes[0],
            ChangeRecord::Closed { code, .. } if code == "U1"
        ));
        assert!(matches!(
            &report.network_changes[1],
            ChangeRecord::New { code, .. } if code == "U2"
        ));
    }

    #[test]
    fn class_filter_evaluated_in_each_snapshot_independently() {
        // A practice in old that loses its RO76 role in new appears as
        // closed in the practice list; no cross-class linkage is attempted.
        let old = snapshot(vec![practice("A81001", "SURGERY A", None)]);
        let mut repurposed = practice("A81001", "SURGERY A", None);
        repurposed.roles[0].id = "RO157".to_string();
        let new = snapshot(vec![repurposed]);

        let report = diff_snapshots(&old, &new);
        assert_eq!(report.practice_changes.len(), 1);
        assert!(matches!(&report.practice_changes[0], ChangeRecord::Closed { .. }));
        assert!(report.network_changes.is_empty());
    }

    #[test]
    fn org_outside_both_class_filters_is_skipped() {
        let mut pharmacy_old = practice("FA100", "EXAMPLE PHARMACY", None);
        pharmacy_old.roles[0].id = "RO182".to_string();
        let mut pharmacy_new = pharmacy_old.clone();
        pharmacy_new.status = crate::org::OrgStatus::Inactive;

        let old = snapshot(vec![pharmacy_old]);
        let new = snapshot(vec![pharmacy_new]);

        assert!(diff_snapshots(&old, &new).is_empty());
    }

    #[test]
    fn new_record_uses_new_snapshot_values() {
        let old = snapshot(vec![]);
        let new = snapshot(vec![practice("A81001", "SURGERY A", None)]);

        let report = diff_snapshots(&old, &new);
        match &report.practice_changes[0] {
            ChangeRecord::New { code, name, date_of_change } => {
                assert_eq!(code, "A81001");
                assert_eq!(name, "SURGERY A");
                assert_eq!(*date_of_change, "2024-03-15".parse().ok());
            }
            other => panic!("expected new record, got {other:?}"),
        }
    }
}
