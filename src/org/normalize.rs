//! Record normalizer: raw directory records into the canonical model.
//!
//! This is a pure transform. A record missing its identifying fields is
//! rejected with a descriptive error; the caller decides whether to skip
//! and log. No field values are altered and list order is preserved.

use super::raw::{RawOrgEnvelope, RawOrganisation, RawRel};
use super::{DatePeriod, Location, Organisation, OrgStatus, PeriodKind, Relationship, Role};

/// Normalizes a raw directory envelope into an [`Organisation`].
///
/// # Errors
///
/// Returns an error naming the field when the record lacks an ODS code,
/// name, status, or role list entirely.
pub fn normalize(envelope: &RawOrgEnvelope) -> Result<Organisation, String> {
    normalize_organisation(&envelope.organisation)
}

/// Normalizes the inner organisation record.
///
/// # Errors
///
/// Returns an error naming the missing field for unidentifiable records.
pub fn normalize_organisation(raw: &RawOrganisation) -> Result<Organisation, String> {
    let code = raw
        .org_id
        .as_ref()
        .and_then(|id| id.extension.clone())
        .ok_or_else(|| missing("OrgId.extension", raw))?;
    let name = raw.name.clone().ok_or_else(|| missing("Name", raw))?;
    let status = raw.status.as_deref().ok_or_else(|| missing("Status", raw))?;
    let raw_roles = raw.roles.as_ref().ok_or_else(|| missing("Roles", raw))?;

    let roles = raw_roles
        .role
        .iter()
        .map(|r| Role {
            id: r.id.clone(),
            primary: r.primary_role,
            status: r.status.as_deref().map_or(OrgStatus::Unknown, OrgStatus::parse),
        })
        .collect();

    let dates = raw
        .dates
        .iter()
        .map(|d| DatePeriod {
            kind: PeriodKind::parse(d.kind.as_deref()),
            start: d.start,
            end: d.end,
        })
        .collect();

    let rels = raw
        .rels
        .as_ref()
        .map(|wrapper| wrapper.rel.iter().filter_map(normalize_rel).collect())
        .unwrap_or_default();

    let phone = raw.contacts.as_ref().and_then(|wrapper| {
        wrapper
            .contact
            .iter()
            .find(|c| c.kind.as_deref() == Some("tel"))
            .and_then(|c| c.value.clone())
    });

    let location = raw.geo_loc.as_ref().map_or_else(Location::default, |geo| Location {
        address_line1: geo.location.addr_ln1.clone(),
        address_line2: geo.location.addr_ln2.clone(),
        town: geo.location.town.clone(),
        county: geo.location.county.clone(),
        postcode: geo.location.post_code.clone(),
        uprn: geo.location.uprn.clone(),
    });

    Ok(Organisation {
        code,
        name,
        status: OrgStatus::parse(status),
        roles,
        dates,
        rels,
        phone,
        location,
        last_changed: raw.last_change_date,
    })
}

/// Normalizes one relationship, dropping edges with no target code.
///
/// An edge without a target cannot participate in resolution or reporting,
/// so there is nothing useful to keep.
fn normalize_rel(raw: &RawRel) -> Option<Relationship> {
    let target = raw.target.as_ref()?;
    let target_code = target.org_id.as_ref().and_then(|id| id.extension.clone())?;
    let target_primary_role =
        target.primary_role_id.as_ref().and_then(|role| role.id.clone());

    Some(Relationship {
        id: raw.id.clone(),
        status: raw.status.as_deref().map_or(OrgStatus::Unknown, OrgStatus::parse),
        target_code,
        target_primary_role,
        periods: raw
            .dates
            .iter()
            .map(|d| DatePeriod {
                kind: PeriodKind::parse(d.kind.as_deref()),
                start: d.start,
                end: d.end,
            })
            .collect(),
    })
}

fn missing(field: &str, raw: &RawOrganisation) -> String {
    let hint = raw
        .org_id
        .as_ref()
        .and_then(|id| id.extension.as_deref())
        .or(raw.name.as_deref())
        .unwrap_or("<unidentified>");
    format!("Record {hint} is missing required field {field}")
}
