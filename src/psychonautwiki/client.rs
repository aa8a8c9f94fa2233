//! PsychonautWiki GraphQL client
//!
//! Fetches the whole substance index in a single POST. The endpoint is known
//! to return GraphQL errors next to perfectly usable data, so the client
//! recovers partial responses instead of failing on the error array.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use super::types::{GraphQlResponse, RawSubstance};

pub const PSYCHONAUTWIKI_API_URL: &str = "https://api.psychonautwiki.org/";

const ALL_SUBSTANCES_QUERY: &str = r#"
query AllSubstances {
    substances(limit: 9999) {
        name
        commonNames
        url
        class {
            chemical
            psychoactive
        }
        tolerance {
            full
            half
            zero
        }
        roas {
            name
            dose {
                units
                threshold
                light {
                    min
                    max
                }
                common {
                    min
                    max
                }
                strong {
                    min
                    max
                }
                heavy
            }
            duration {
                onset {
                    min
                    max
                    units
                }
                comeup {
                    min
                    max
                    units
                }
                peak {
                    min
                    max
                    units
                }
                offset {
                    min
                    max
                    units
                }
                total {
                    min
                    max
                    units
                }
                afterglow {
                    min
                    max
                    units
                }
            }
            bioavailability {
                min
                max
            }
        }
        addictionPotential
        toxicity
        crossTolerances
        effects {
            name
            url
        }
    }
}
"#;

pub struct PsychonautWikiClient {
    client: Client,
    endpoint: String,
}

impl PsychonautWikiClient {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(PSYCHONAUTWIKI_API_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Fetch every substance the wiki publishes.
    ///
    /// GraphQL errors are logged and tolerated as long as substance data came
    /// through; an empty or absent substance list is an error.
    pub async fn fetch_all_substances(&self) -> Result<Vec<RawSubstance>> {
        let body = serde_json::json!({
            "query": ALL_SUBSTANCES_QUERY,
            "variables": null,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("Failed to reach the PsychonautWiki GraphQL endpoint")?
            .error_for_status()
            .context("PsychonautWiki GraphQL endpoint returned an error status")?;

        let parsed: GraphQlResponse = response
            .json()
            .await
            .context("Failed to decode the substances response")?;

        if let Some(errors) = parsed.errors.as_ref().filter(|e| !e.is_empty()) {
            warn!(
                count = errors.len(),
                first = %errors[0].message,
                "GraphQL response carried errors; using partial data"
            );
        }

        let substances = parsed
            .data
            .and_then(|data| data.substances)
            .unwrap_or_default();

        if substances.is_empty() {
            anyhow::bail!("GraphQL response contained no substance data");
        }

        info!(count = substances.len(), "Fetched substances from PsychonautWiki");
        Ok(substances)
    }
}
