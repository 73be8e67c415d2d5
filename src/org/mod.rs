//! Organisation data model: raw directory records, the normalized form,
//! and relationship resolution.

pub mod normalize;
pub mod raw;
pub mod resolve;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Role identifier for a GP Practice.
pub const GP_PRACTICE_ROLE: &str = "RO76";
/// Role identifier for a Primary Care Network.
pub const NETWORK_ROLE: &str = "RO272";
/// Relationship kind for practice-to-network membership.
pub const MEMBERSHIP_REL: &str = "RE8";
/// Relationship kind for "is commissioned by".
pub const COMMISSIONED_BY_REL: &str = "RE4";
/// Relationship kind for "is operated by".
pub const OPERATED_BY_REL: &str = "RE6";

/// Lifecycle status of an organisation, role, or relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrgStatus {
    /// Currently operating.
    Active,
    /// No longer operating.
    Inactive,
    /// Any status string the directory serves that we do not recognise.
    Unknown,
}

impl OrgStatus {
    /// Maps a raw directory status string to the enum.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "Active" => Self::Active,
            "Inactive" => Self::Inactive,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for OrgStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Kind of a typed date period on an organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodKind {
    /// Operational dates.
    Operational,
    /// Legal dates.
    Legal,
    /// Any other period type, including the untyped relationship dates.
    Other,
}

impl PeriodKind {
    /// Maps a raw directory period type to the enum.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("Operational") => Self::Operational,
            Some("Legal") => Self::Legal,
            _ => Self::Other,
        }
    }
}

/// A (start, end) pair where an absent end means open-ended / still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePeriod {
    /// Period type.
    pub kind: PeriodKind,
    /// Inclusive start date.
    pub start: Option<NaiveDate>,
    /// Inclusive end date; `None` means the period is still in effect.
    pub end: Option<NaiveDate>,
}

impl DatePeriod {
    /// Returns `true` if this period has no end date.
    #[must_use]
    pub fn is_open_ended(&self) -> bool {
        self.end.is_none()
    }
}

/// A role assignment on an organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier, e.g. [`GP_PRACTICE_ROLE`].
    pub id: String,
    /// Whether this is the organisation's primary role.
    pub primary: bool,
    /// Role lifecycle status.
    pub status: OrgStatus,
}

/// A typed edge from this organisation to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship kind, e.g. [`MEMBERSHIP_REL`].
    pub id: String,
    /// Relationship lifecycle status.
    pub status: OrgStatus,
    /// ODS code of the target organisation.
    pub target_code: String,
    /// Primary role of the target organisation, when the directory supplies it.
    pub target_primary_role: Option<String>,
    /// Validity periods; an open-ended period means the edge is current.
    pub periods: Vec<DatePeriod>,
}

impl Relationship {
    /// Returns the latest start date across this relationship's periods.
    #[must_use]
    pub fn latest_start(&self) -> Option<NaiveDate> {
        self.periods.iter().filter_map(|p| p.start).max()
    }

    /// Returns `true` if no period carries an end date.
    #[must_use]
    pub fn is_open_ended(&self) -> bool {
        self.periods.iter().all(DatePeriod::is_open_ended)
    }
}

/// Address fields for an organisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// First address line.
    pub address_line1: Option<String>,
    /// Second address line.
    pub address_line2: Option<String>,
    /// Town.
    pub town: Option<String>,
    /// County.
    pub county: Option<String>,
    /// Postcode.
    pub postcode: Option<String>,
    /// Unique Property Reference Number.
    pub uprn: Option<String>,
}

/// A normalized organisation record.
///
/// Produced by [`normalize::normalize`] from a raw directory record. Each
/// snapshot owns its own copies; organisations are never shared across
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    /// ODS code, unique within a snapshot.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: OrgStatus,
    /// Role assignments; an organisation may hold several at once.
    pub roles: Vec<Role>,
    /// Typed date periods (Operational, Legal).
    pub dates: Vec<DatePeriod>,
    /// Outbound relationships.
    pub rels: Vec<Relationship>,
    /// Telephone contact, when present.
    pub phone: Option<String>,
    /// Address fields.
    pub location: Location,
    /// Date the directory last recorded a change to this record.
    pub last_changed: Option<NaiveDate>,
}

impl Organisation {
    /// Returns `true` if the organisation holds the given role (any position).
    #[must_use]
    pub fn has_role(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r.id == role_id)
    }

    /// Returns `true` if the given role is the organisation's primary role.
    #[must_use]
    pub fn has_primary_role(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r.id == role_id && r.primary)
    }

    /// Returns the identifier of the primary role, if one is marked.
    #[must_use]
    pub fn primary_role(&self) -> Option<&str> {
        self.roles.iter().find(|r| r.primary).map(|r| r.id.as_str())
    }

    /// Returns `true` if this organisation is a GP Practice.
    #[must_use]
    pub fn is_practice(&self) -> bool {
        self.has_role(GP_PRACTICE_ROLE)
    }

    /// Returns `true` if this organisation is a Primary Care Network.
    ///
    /// Networks are identified by holding `RO272` as their primary role;
    /// a non-primary `RO272` assignment does not count.
    #[must_use]
    pub fn is_network(&self) -> bool {
        self.has_primary_role(NETWORK_ROLE)
    }

    /// Returns the start/end of the first period of the given kind.
    #[must_use]
    pub fn period(&self, kind: PeriodKind) -> (Option<NaiveDate>, Option<NaiveDate>) {
        self.dates
            .iter()
            .find(|d| d.kind == kind)
            .map_or((None, None), |d| (d.start, d.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org_with_roles(roles: Vec<Role>) -> Organisation {
        Organisation {
            code: "A81001".to_string(),
            name: "EXAMPLE SURGERY".to_string(),
            status: OrgStatus::Active,
            roles,
            dates: vec![],
            rels: vec![],
            phone: None,
            location: Location::default(),
            last_changed: None,
        }
    }

    #[test]
    fn status_parse_maps_known_values() {
        assert_eq!(OrgStatus::parse("Active"), OrgStatus::Active);
        assert_eq!(OrgStatus::parse("Inactive"), OrgStatus::Inactive);
        assert_eq!(OrgStatus::parse("Proposed"), OrgStatus::Unknown);
    }

    #[test]
    fn practice_filter_accepts_non_primary_role() {
        let org = org_with_roles(vec![
            Role { id: "RO177".to_string(), primary: true, status: OrgStatus::Active },
            Role { id: GP_PRACTICE_ROLE.to_string(), primary: false, status: OrgStatus::Active },
        ]);
        assert!(org.is_practice());
        assert!(!org.is_network());
    }

    #[test]
    fn network_filter_requires_primary_role() {
        let secondary = org_with_roles(vec![Role {
            id: NETWORK_ROLE.to_string(),
            primary: false,
            status: OrgStatus::Active,
        }]);
        assert!(!secondary.is_network());

        let primary = org_with_roles(vec![Role {
            id: NETWORK_ROLE.to_string(),
            primary: true,
            status: OrgStatus::Active,
        }]);
        assert!(primary.is_network());
    }

    #[test]
    fn relationship_latest_start_takes_max() {
        let rel = Relationship {
            id: MEMBERSHIP_REL.to_string(),
            status: OrgStatus::Active,
            target_code: "U12345".to_string(),
            target_primary_role: Some(NETWORK_ROLE.to_string()),
            periods: vec![
                DatePeriod {
                    kind: PeriodKind::Other,
                    start: NaiveDate::from_ymd_opt(2019, 4, 1),
                    end: None,
                },
                DatePeriod {
                    kind: PeriodKind::Other,
                    start: NaiveDate::from_ymd_opt(2021, 6, 1),
                    end: None,
                },
            ],
        };
        assert_eq!(rel.latest_start(), NaiveDate::from_ymd_opt(2021, 6, 1));
        assert!(rel.is_open_ended());
    }

    #[test]
    fn period_lookup_by_kind() {
        let mut org = org_with_roles(vec![]);
        org.dates = vec![DatePeriod {
            kind: PeriodKind::Operational,
            start: NaiveDate::from_ymd_opt(2013, 4, 1),
            end: None,
        }];
        let (start, end) = org.period(PeriodKind::Operational);
        assert_eq!(start, NaiveDate::from_ymd_opt(2013, 4, 1));
        assert!(end.is_none());
        assert_eq!(org.period(PeriodKind::Legal), (None, None));
    }
}
