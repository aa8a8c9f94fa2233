//! PubChem PUG REST client
//!
//! Rate-limited property lookups by compound name. A name PubChem does not
//! know is a normal outcome (`Ok(None)`), not an error.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use url::Url;

pub const PUBCHEM_API_BASE: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";
const RATE_LIMIT_DELAY_MS: u64 = 200; // 5 req/sec to be safe

const PROPERTY_LIST: &str = "IUPACName,IsomericSMILES,InChIKey";

/// Compound properties fetched from PubChem
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct Compound {
    pub cid: i64,
    pub iupac_name: Option<String>,
    pub isomeric_smiles: Option<String>,
    pub inchi_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PropertyResponse {
    #[serde(rename = "PropertyTable")]
    property_table: PropertyTable,
}

#[derive(Debug, Deserialize)]
struct PropertyTable {
    #[serde(rename = "Properties")]
    properties: Vec<PropertyRecord>,
}

#[derive(Debug, Deserialize)]
struct PropertyRecord {
    #[serde(rename = "CID")]
    cid: i64,
    #[serde(rename = "IUPACName")]
    iupac_name: Option<String>,
    #[serde(rename = "IsomericSMILES")]
    isomeric_smiles: Option<String>,
    #[serde(rename = "InChIKey")]
    inchi_key: Option<String>,
}

impl From<PropertyRecord> for Compound {
    fn from(record: PropertyRecord) -> Self {
        Compound {
            cid: record.cid,
            iupac_name: record.iupac_name,
            isomeric_smiles: record.isomeric_smiles,
            inchi_key: record.inchi_key,
        }
    }
}

pub struct PubChemClient {
    client: Client,
    base_url: Url,
    last_request: Mutex<Instant>,
}

impl PubChemClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(PUBCHEM_API_BASE)
    }

    pub fn with_base_url(base_url: impl AsRef<str>) -> Result<Self> {
        let parsed = Url::parse(base_url.as_ref())
            .with_context(|| format!("Invalid PubChem base URL '{}'", base_url.as_ref()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: parsed,
            last_request: Mutex::new(Instant::now()),
        })
    }

    /// Build the property lookup URL, keeping the whole name in one path
    /// segment regardless of what characters it contains.
    fn request_url(&self, name: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("PubChem base URL '{}' cannot take path segments", self.base_url))?
            .pop_if_empty()
            .extend(["compound", "name", name, "property", PROPERTY_LIST, "JSON"]);
        Ok(url)
    }

    /// Enforce rate limiting between requests
    async fn rate_limit(&self) {
        let elapsed = {
            let last = self.last_request.lock().unwrap();
            last.elapsed()
        };

        if elapsed < Duration::from_millis(RATE_LIMIT_DELAY_MS) {
            sleep(Duration::from_millis(RATE_LIMIT_DELAY_MS) - elapsed).await;
        }

        let mut last = self.last_request.lock().unwrap();
        *last = Instant::now();
    }

    /// Look a compound up by name; `Ok(None)` when PubChem has no match.
    pub async fn lookup_by_name(&self, name: &str) -> Result<Option<Compound>> {
        self.rate_limit().await;
        let url = self.request_url(name)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to query PubChem for '{name}'"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let parsed: PropertyResponse = response
            .error_for_status()
            .with_context(|| format!("PubChem returned an error status for '{name}'"))?
            .json()
            .await
            .with_context(|| format!("Failed to decode PubChem response for '{name}'"))?;

        Ok(parsed
            .property_table
            .properties
            .into_iter()
            .next()
            .map(Compound::from))
    }
}
