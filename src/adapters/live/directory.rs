//! Live adapter for the `DirectoryApi` port using the ODS ORD REST API.

use reqwest::Client;
use serde::Deserialize;

use crate::org::raw::RawOrgEnvelope;
use crate::ports::directory::{DirectoryApi, DirectoryFuture, OrgSummary};

const DIRECTORY_BASE_URL: &str = "https://directory.spineservices.nhs.uk/ORD/2-0-0";

/// Live directory client that calls the public ODS ORD endpoints.
pub struct LiveDirectoryClient {
    client: Client,
    base_url: String,
}

impl LiveDirectoryClient {
    /// Creates a client against the public directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DIRECTORY_BASE_URL.to_string())
    }

    /// Creates a client against an alternative base URL (used by tests).
    #[must_use]
    pub fn with_base_url(base_url: String) -> Self {
        Self { client: Client::new(), base_url }
    }
}

impl Default for LiveDirectoryClient {
    fn default() -> Self {
        Self::new()
    }
}

/// One page of search results from `/organisations`.
#[derive(Deserialize)]
struct SearchPage {
    #[serde(rename = "Organisations", default)]
    organisations: Vec<OrgSummary>,
}

impl DirectoryApi for LiveDirectoryClient {
    fn search_related<'a>(
        &'a self,
        rel_type_ids: &'a str,
        target_org_code: &'a str,
    ) -> DirectoryFuture<'a, Vec<OrgSummary>> {
        Box::pin(async move {
            let mut all = Vec::new();
            let first_url = format!(
                "{}/organisations?RelTypeId={rel_type_ids}&TargetOrgId={target_org_code}&_format=json",
                self.base_url
            );
            let mut next_url = Some(first_url);

            while let Some(url) = next_url.take() {
                let response = self
                    .client
                    .get(&url)
                    .header("Accept", "application/json")
                    .send()
                    .await
                    .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                        format!("Directory search request failed: {e}").into()
                    })?;

                if !response.status().is_success() {
                    return Err(format!(
                        "Directory search returned {} for {url}",
                        response.status().as_u16()
                    )
                    .into());
                }

                // The directory signals further pages via a `next-page`
                // response header rather than a body field.
                next_url = response
                    .headers()
                    .get("next-page")
                    .and_then(|v| v.to_str().ok())
                    .map(String::from);

                let page: SearchPage = response.json().await.map_err(
                    |e| -> Box<dyn std::error::Error + Send + Sync> {
                        format!("Failed to parse directory search page: {e}").into()
                    },
                )?;

                if page.organisations.is_empty() {
                    break;
                }
                all.extend(page.organisations);
            }

            Ok(all)
        })
    }

    fn organisation<'a>(&'a self, code: &'a str) -> DirectoryFuture<'a, RawOrgEnvelope> {
        Box::pin(async move {
            let url = format!("{}/organisations/{code}?_format=json", self.base_url);
            let response = self
                .client
                .get(&url)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Directory request for {code} failed: {e}").into()
                })?;

            if !response.status().is_success() {
                return Err(format!(
                    "Directory returned {} for organisation {code}",
                    response.status().as_u16()
                )
                .into());
            }

            response.json::<RawOrgEnvelope>().await.map_err(
                |e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Failed to parse organisation {code}: {e}").into()
                },
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_page_parses_directory_shape() {
        let json = r#"{"Organisations": [
            {"OrgId": "A81001", "Name": "EXAMPLE SURGERY", "Status": "Active"},
            {"OrgId": "U12345", "Name": "EXAMPLE PCN", "Status": "Active"}
        ]}"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.organisations.len(), 2);
        assert_eq!(page.organisations[0].code, "A81001");
        assert_eq!(page.organisations[1].name, "EXAMPLE PCN");
    }

    #[test]
    fn empty_result_set_parses() {
        let page: SearchPage = serde_json::from_str("{}").unwrap();
        assert!(page.organisations.is_empty());
    }
}
