//! Serde mirror of the ORD directory's organisation JSON.
//!
//! The upstream directory encodes roles, dates, relationships, and contacts
//! as either a single object or a sequence, depending on cardinality. The
//! [`one_or_many`] helper coerces both encodings into a `Vec` at this
//! boundary; no other module re-implements that check.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Deserializes a field that may be a single value or a sequence into a `Vec`.
///
/// Combined with `#[serde(default)]`, an absent field becomes an empty `Vec`.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
    })
}

/// Top-level envelope returned by `/organisations/<code>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrgEnvelope {
    /// The wrapped organisation record.
    #[serde(rename = "Organisation")]
    pub organisation: RawOrganisation,
}

/// An organisation record as the directory serves it.
///
/// Identifying fields are options so that a damaged record deserializes and
/// can be rejected with a useful message by the normalizer instead of
/// failing the whole response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOrganisation {
    /// Display name.
    #[serde(rename = "Name")]
    pub name: Option<String>,
    /// Lifecycle status string ("Active" / "Inactive").
    #[serde(rename = "Status")]
    pub status: Option<String>,
    /// Identifier wrapper carrying the ODS code.
    #[serde(rename = "OrgId")]
    pub org_id: Option<RawOrgId>,
    /// Typed date periods (Operational, Legal).
    #[serde(rename = "Date", default, deserialize_with = "one_or_many")]
    pub dates: Vec<RawDate>,
    /// Role assignments. Absent entirely on malformed records.
    #[serde(rename = "Roles")]
    pub roles: Option<RawRoles>,
    /// Outbound relationships.
    #[serde(rename = "Rels", default)]
    pub rels: Option<RawRels>,
    /// Contact points (phone, fax, url).
    #[serde(rename = "Contacts", default)]
    pub contacts: Option<RawContacts>,
    /// Geographic location wrapper.
    #[serde(rename = "GeoLoc", default)]
    pub geo_loc: Option<RawGeoLoc>,
    /// Date the directory last recorded a change to this record.
    #[serde(rename = "LastChangeDate")]
    pub last_change_date: Option<NaiveDate>,
}

/// ODS identifier wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrgId {
    /// The ODS code itself.
    pub extension: Option<String>,
}

/// Wrapper around the role list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRoles {
    /// One or many role assignments.
    #[serde(rename = "Role", default, deserialize_with = "one_or_many")]
    pub role: Vec<RawRole>,
}

/// A single role assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRole {
    /// Role identifier, e.g. "RO76" or "RO272".
    pub id: String,
    /// Whether this is the organisation's primary role.
    #[serde(rename = "primaryRole", default)]
    pub primary_role: bool,
    /// Role lifecycle status.
    #[serde(rename = "Status")]
    pub status: Option<String>,
}

/// A typed date period with optional bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDate {
    /// Period type ("Operational", "Legal"). Relationship dates omit it.
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    /// Inclusive start date.
    #[serde(rename = "Start")]
    pub start: Option<NaiveDate>,
    /// Inclusive end date; absent means open-ended / still current.
    #[serde(rename = "End")]
    pub end: Option<NaiveDate>,
}

/// Wrapper around the relationship list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRels {
    /// One or many relationships.
    #[serde(rename = "Rel", default, deserialize_with = "one_or_many")]
    pub rel: Vec<RawRel>,
}

/// A typed edge to another organisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRel {
    /// Relationship kind, e.g. "RE8" (network membership).
    pub id: String,
    /// Relationship lifecycle status.
    #[serde(rename = "Status")]
    pub status: Option<String>,
    /// Validity periods for this relationship.
    #[serde(rename = "Date", default, deserialize_with = "one_or_many")]
    pub dates: Vec<RawDate>,
    /// The organisation on the far end.
    #[serde(rename = "Target")]
    pub target: Option<RawRelTarget>,
}

/// Target descriptor embedded in a relationship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRelTarget {
    /// Target ODS identifier wrapper.
    #[serde(rename = "OrgId")]
    pub org_id: Option<RawOrgId>,
    /// Primary role of the target organisation.
    #[serde(rename = "PrimaryRoleId")]
    pub primary_role_id: Option<RawPrimaryRoleId>,
}

/// Primary role wrapper on a relationship target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPrimaryRoleId {
    /// Role identifier.
    pub id: Option<String>,
}

/// Wrapper around the contact list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawContacts {
    /// One or many contact points.
    #[serde(rename = "Contact", default, deserialize_with = "one_or_many")]
    pub contact: Vec<RawContact>,
}

/// A single contact point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawContact {
    /// Contact type ("tel", "fax", "url").
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Contact value.
    pub value: Option<String>,
}

/// Geographic location wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGeoLoc {
    /// The location fields themselves.
    #[serde(rename = "Location", default)]
    pub location: RawLocation,
}

/// Address fields as the directory serves them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLocation {
    /// First address line.
    #[serde(rename = "AddrLn1")]
    pub addr_ln1: Option<String>,
    /// Second address line.
    #[serde(rename = "AddrLn2")]
    pub addr_ln2: Option<String>,
    /// Town.
    #[serde(rename = "Town")]
    pub town: Option<String>,
    /// County.
    #[serde(rename = "County")]
    pub county: Option<String>,
    /// Postcode.
    #[serde(rename = "PostCode")]
    pub post_code: Option<String>,
    /// Unique Property Reference Number.
    #[serde(rename = "UPRN")]
    pub uprn: Option<String>,
}
