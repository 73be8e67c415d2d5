//! Directory port for the ODS ORD REST API.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::org::raw::RawOrgEnvelope;

/// Boxed future type alias used by [`DirectoryApi`] to keep the trait
/// dyn-compatible.
pub type DirectoryFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// One entry from a directory search, enough to fetch full detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgSummary {
    /// ODS code of the organisation.
    #[serde(rename = "OrgId")]
    pub code: String,
    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,
}

/// Queries the ODS organisation directory.
pub trait DirectoryApi: Send + Sync {
    /// Searches for organisations related to `target_org_code` by any of the
    /// comma-separated `rel_type_ids`, following pagination to exhaustion.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails or the response cannot be
    /// parsed.
    fn search_related<'a>(
        &'a self,
        rel_type_ids: &'a str,
        target_org_code: &'a str,
    ) -> DirectoryFuture<'a, Vec<OrgSummary>>;

    /// Fetches the full record for one organisation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    fn organisation<'a>(&'a self, code: &'a str) -> DirectoryFuture<'a, RawOrgEnvelope>;
}
