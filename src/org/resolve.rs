//! Relationship resolution: which network does a practice belong to right now?
//!
//! Implemented once and shared by the reporting and diffing paths so the two
//! can never disagree about current membership for the same snapshot.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{Organisation, OrgStatus, NETWORK_ROLE};

/// A resolved current network membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership<'a> {
    /// ODS code of the network.
    pub network_code: &'a str,
    /// Display name of the network, looked up in the same snapshot.
    pub network_name: &'a str,
    /// Start date of the winning membership relationship, when recorded.
    pub since: Option<NaiveDate>,
}

/// Resolves the currently active network membership for an organisation.
///
/// A relationship is a candidate iff its target's primary role is the
/// network role, its status is `Active`, none of its periods carries an end
/// date, and the target code is present in `orgs` (an unresolvable target is
/// a non-candidate, not an error). Among candidates the one with the
/// greatest start date wins; the tie-break is stable by relationship-list
/// order, and a candidate with no start date never replaces an existing
/// selection.
///
/// Returns `None` when no candidate exists, which is a valid outcome and
/// common for closed practices.
#[must_use]
pub fn current_network<'a>(
    orgs: &'a BTreeMap<String, Organisation>,
    org: &'a Organisation,
) -> Option<Membership<'a>> {
    let mut selected: Option<(&str, Option<NaiveDate>)> = None;

    for rel in &org.rels {
        if rel.target_primary_role.as_deref() != Some(NETWORK_ROLE) {
            continue;
        }
        if rel.status != OrgStatus::Active {
            continue;
        }
        if !rel.is_open_ended() {
            continue;
        }
        if !orgs.contains_key(&rel.target_code) {
            continue;
        }

        let start = rel.latest_start();
        match selected {
            // Some(_) > None and later Some > earlier Some; equal starts keep
            // the earlier relationship in list order.
            Some((_, current)) if start <= current => {}
            _ => selected = Some((rel.target_code.as_str(), start)),
        }
    }

    selected.map(|(code, since)| Membership {
        network_code: code,
        network_name: orgs[code].name.as_str(),
        since,
    })
}
