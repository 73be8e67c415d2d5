//! Dated, immutable snapshots of the organisation directory.

pub mod diff;
pub mod history;
pub mod store;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::org::resolve::{self, Membership};
use crate::org::Organisation;

/// Metadata recorded alongside each data pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// ODS code of the ICB the pull was scoped to.
    pub source_id: String,
    /// When the data was retrieved.
    pub retrieved_at: DateTime<Utc>,
    /// Number of organisations in the snapshot.
    pub total_count: usize,
}

/// A point-in-time collection of organisation records, keyed by ODS code.
///
/// Snapshots are never mutated after creation; later pulls supersede them
/// with new files. Diffing borrows snapshots immutably, so one snapshot can
/// be compared against several historical predecessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Pull metadata.
    pub metadata: SnapshotMetadata,
    /// Organisation records keyed by ODS code (unique by construction).
    pub organisations: BTreeMap<String, Organisation>,
}

impl Snapshot {
    /// Builds a snapshot from already-normalized organisations.
    #[must_use]
    pub fn new(
        source_id: String,
        retrieved_at: DateTime<Utc>,
        organisations: BTreeMap<String, Organisation>,
    ) -> Self {
        let total_count = organisations.len();
        Self { metadata: SnapshotMetadata { source_id, retrieved_at, total_count }, organisations }
    }

    /// Looks up an organisation by ODS code.
    #[must_use]
    pub fn org(&self, code: &str) -> Option<&Organisation> {
        self.organisations.get(code)
    }

    /// Resolves the current network membership of an organisation in this
    /// snapshot. See [`resolve::current_network`] for the rules.
    #[must_use]
    pub fn current_network<'a>(&'a self, org: &'a Organisation) -> Option<Membership<'a>> {
        resolve::current_network(&self.organisations, org)
    }

    /// Iterates the GP Practices in this snapshot.
    pub fn practices(&self) -> impl Iterator<Item = &Organisation> {
        self.organisations.values().filter(|org| org.is_practice())
    }

    /// Iterates the Primary Care Networks in this snapshot.
    pub fn networks(&self) -> impl Iterator<Item = &Organisation> {
        self.organisations.values().filter(|org| org.is_network())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Snapshot builders shared by the diff, history, and report tests.

    use super::*;
    use crate::org::{
        DatePeriod, Location, OrgStatus, PeriodKind, Relationship, Role, GP_PRACTICE_ROLE,
        MEMBERSHIP_REL, NETWORK_ROLE,
    };
    use chrono::{NaiveDate, TimeZone};

    /// A practice with an optional open-ended active membership of `network`.
    pub fn practice(code: &str, name: &str, network: Option<(&str, &str)>) -> Organisation {
        let rels = network
            .map(|(target, start)| {
                vec![Relationship {
                    id: MEMBERSHIP_REL.to_string(),
                    status: OrgStatus::Active,
                    target_code: target.to_string(),
                    target_primary_role: Some(NETWORK_ROLE.to_string()),
                    periods: vec![DatePeriod {
                        kind: PeriodKind::Other,
                        start: Some(start.parse().unwrap()),
                        end: None,
                    }],
                }]
            })
            .unwrap_or_default();

        Organisation {
            code: code.to_string(),
            name: name.to_string(),
            status: OrgStatus::Active,
            roles: vec![Role {
                id: GP_PRACTICE_ROLE.to_string(),
                primary: true,
                status: OrgStatus::Active,
            }],
            dates: vec![],
            rels,
            phone: None,
            location: Location::default(),
            last_changed: NaiveDate::from_ymd_opt(2024, 3, 15),
        }
    }

    /// A network organisation with a primary RO272 role.
    pub fn network(code: &str, name: &str) -> Organisation {
        Organisation {
            code: code.to_string(),
            name: name.to_string(),
            status: OrgStatus::Active,
            roles: vec![Role {
                id: NETWORK_ROLE.to_string(),
                primary: true,
                status: OrgStatus::Active,
            }],
            dates: vec![],
            rels: vec![],
            phone: None,
            location: Location::default(),
            last_changed: NaiveDate::from_ymd_opt(2024, 3, 15),
        }
    }

    /// A snapshot containing the given organisations.
    pub fn snapshot(orgs: Vec<Organisation>) -> Snapshot {
        let map = orgs.into_iter().map(|org| (org.code.clone(), org)).collect();
        Snapshot::new(
            "93C".to_string(),
            Utc.with_ymd_and_hms(2024, 3, 20, 8, 0, 0).unwrap(),
            map,
        )
    }
}
