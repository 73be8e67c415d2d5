//! Tabular reports: flattened practice and network rows for CSV export.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::org::{Organisation, PeriodKind, NETWORK_ROLE};
use crate::snapshot::Snapshot;

/// Column headers for the practices CSV.
pub const PRACTICE_HEADERS: &[&str] = &[
    "ODS Code",
    "Name",
    "Status",
    "Primary Role",
    "Operational Start",
    "Operational End",
    "Legal Start",
    "Legal End",
    "Address",
    "Address Line 2",
    "Town",
    "County",
    "Postcode",
    "UPRN",
    "Phone",
    "Current Network",
    "Current Network Code",
    "Network Member Since",
    "Network History",
    "Last Changed",
];

/// Column headers for the networks CSV.
pub const NETWORK_HEADERS: &[&str] = &[
    "ODS Code",
    "Name",
    "Status",
    "Operational Start",
    "Operational End",
    "Legal Start",
    "Legal End",
    "Address",
    "Town",
    "Postcode",
    "UPRN",
    "Member Practices",
    "Member Practice List",
    "Last Changed",
];

/// One flattened GP Practice row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeRow {
    /// ODS code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Lifecycle status, as text.
    pub status: String,
    /// Primary role identifier.
    pub primary_role: Option<String>,
    /// Operational period bounds.
    pub operational: (Option<NaiveDate>, Option<NaiveDate>),
    /// Legal period bounds.
    pub legal: (Option<NaiveDate>, Option<NaiveDate>),
    /// First address line.
    pub address: Option<String>,
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
    /// Telephone contact.
    pub phone: Option<String>,
    /// Resolved current network name.
    pub network_name: Option<String>,
    /// Resolved current network code.
    pub network_code: Option<String>,
    /// Start date of the current membership.
    pub network_since: Option<NaiveDate>,
    /// Semicolon-joined membership history, oldest first.
    pub network_history: Option<String>,
    /// Date the directory last changed this record.
    pub last_changed: Option<NaiveDate>,
}

/// One flattened Primary Care Network row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRow {
    /// ODS code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Lifecycle status, as text.
    pub status: String,
    /// Operational period bounds.
    pub operational: (Option<NaiveDate>, Option<NaiveDate>),
    /// Legal period bounds.
    pub legal: (Option<NaiveDate>, Option<NaiveDate>),
    /// First address line.
    pub address: Option<String>,
    /// Town.
    pub town: Option<String>,
    /// Postcode.
    pub postcode: Option<String>,
    /// Unique Property Reference Number.
    pub uprn: Option<String>,
    /// Number of practices whose current membership resolves here.
    pub member_count: usize,
    /// Semicolon-joined member practices, sorted by name.
    pub members: Option<String>,
    /// Date the directory last changed this record.
    pub last_changed: Option<NaiveDate>,
}

/// Builds flattened practice rows from a snapshot, sorted by status then
/// name. Current membership comes from the shared resolver, so the report
/// can never disagree with the change tracker.
#[must_use]
pub fn practice_rows(snapshot: &Snapshot) -> Vec<PracticeRow> {
    let mut rows: Vec<PracticeRow> = snapshot
        .practices()
        .map(|org| {
            let membership = snapshot.current_network(org);
            PracticeRow {
                code: org.code.clone(),
                name: org.name.clone(),
                status: org.status.to_string(),
                primary_role: org.primary_role().map(String::from),
                operational: org.period(PeriodKind::Operational),
                legal: org.period(PeriodKind::Legal),
                address: org.location.address_line1.clone(),
                address_line2: org.location.address_line2.clone(),
                town: org.location.town.clone(),
                county: org.location.county.clone(),
                postcode: org.location.postcode.clone(),
                uprn: org.location.uprn.clone(),
                phone: org.phone.clone(),
                network_name: membership.as_ref().map(|m| m.network_name.to_string()),
                network_code: membership.as_ref().map(|m| m.network_code.to_string()),
                network_since: membership.as_ref().and_then(|m| m.since),
                network_history: membership_history(snapshot, org),
                last_changed: org.last_changed,
            }
        })
        .collect();

    rows.sort_by(|a, b| (a.status.as_str(), a.name.as_str()).cmp(&(b.status.as_str(), b.name.as_str())));
    rows
}

/// Builds flattened network rows from a snapshot, sorted by name.
#[must_use]
pub fn network_rows(snapshot: &Snapshot) -> Vec<NetworkRow> {
    // Invert current memberships: network code -> member (name, code, since).
    let mut members: BTreeMap<&str, Vec<(String, String, Option<NaiveDate>)>> = BTreeMap::new();
    for practice in snapshot.practices() {
        if let Some(membership) = snapshot.current_network(practice) {
            members.entry(membership.network_code).or_default().push((
                practice.name.clone(),
                practice.code.clone(),
                membership.since,
            ));
        }
    }

    let mut rows: Vec<NetworkRow> = snapshot
        .networks()
        .map(|org| {
            let mut list = members.get(org.code.as_str()).cloned().unwrap_or_default();
            list.sort_by(|a, b| a.0.cmp(&b.0));
            let joined = if list.is_empty() {
                None
            } else {
                Some(
                    list.iter()
                        .map(|(name, code, since)| {
                            format!("{name} ({code}, from {})", format_date(*since))
                        })
                        .collect::<Vec<_>>()
                        .join("; "),
                )
            };

            NetworkRow {
                code: org.code.clone(),
                name: org.name.clone(),
                status: org.status.to_string(),
                operational: org.period(PeriodKind::Operational),
                legal: org.period(PeriodKind::Legal),
                address: org.location.address_line1.clone(),
                town: org.location.town.clone(),
                postcode: org.location.postcode.clone(),
                uprn: org.location.uprn.clone(),
                member_count: list.len(),
                members: joined,
                last_changed: org.last_changed,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

/// Full membership history for a practice: every relationship targeting a
/// network whose record exists in the snapshot, oldest first.
///
/// Candidates are selected by the target's primary role, the same predicate
/// the current-network resolver uses, so an edge that resolves as the
/// current network always also appears in the history.
fn membership_history(snapshot: &Snapshot, org: &Organisation) -> Option<String> {
    let mut entries: Vec<(Option<NaiveDate>, String)> = org
        .rels
        .iter()
        .filter(|rel| rel.target_primary_role.as_deref() == Some(NETWORK_ROLE))
        .filter_map(|rel| {
            let target = snapshot.org(&rel.target_code)?;
            let start = rel.latest_start();
            let end = rel.periods.iter().find_map(|p| p.end);
            let end_label = end.map_or_else(|| "present".to_string(), |d| d.to_string());
            Some((
                start,
                format!(
                    "{} ({}, {}, {}-{end_label})",
                    target.name,
                    rel.target_code,
                    rel.status,
                    format_date(start)
                ),
            ))
        })
        .collect();

    if entries.is_empty() {
        return None;
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Some(entries.into_iter().map(|(_, text)| text).collect::<Vec<_>>().join("; "))
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

impl PracticeRow {
    /// The row as CSV field values, in [`PRACTICE_HEADERS`] order.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            self.status.clone(),
            self.primary_role.clone().unwrap_or_default(),
            format_date(self.operational.0),
            format_date(self.operational.1),
            format_date(self.legal.0),
            format_date(self.legal.1),
            self.address.clone().unwrap_or_default(),
            self.address_line2.clone().unwrap_or_default(),
            self.town.clone().unwrap_or_default(),
            self.county.clone().unwrap_or_default(),
            self.postcode.clone().unwrap_or_default(),
            self.uprn.clone().unwrap_or_default(),
            self.phone.clone().unwrap_or_default(),
            self.network_name.clone().unwrap_or_default(),
            self.network_code.clone().unwrap_or_default(),
            format_date(self.network_since),
            self.network_history.clone().unwrap_or_default(),
            format_date(self.last_changed),
        ]
    }
}

impl NetworkRow {
    /// The row as CSV field values, in [`NETWORK_HEADERS`] order.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            self.status.clone(),
            format_date(self.operational.0),
            format_date(self.operational.1),
            format_date(self.legal.0),
            format_date(self.legal.1),
            self.address.clone().unwrap_or_default(),
            self.town.clone().unwrap_or_default(),
            self.postcode.clone().unwrap_or_default(),
            self.uprn.clone().unwrap_or_default(),
            self.member_count.to_string(),
            self.members.clone().unwrap_or_default(),
            format_date(self.last_changed),
        ]
    }
}

/// Renders a header row and record rows as an RFC 4180 style CSV document.
#[must_use]
pub fn to_csv(headers: &[&str], records: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(headers.iter().map(|h| csv_field(h)).collect::<Vec<_>>().join(","));
    for record in records {
        lines.push(record.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(","));
    }
    let mut csv = lines.join("\n");
    csv.push('\n');
    csv
}

/// Quotes a field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
