//! Runtime configuration sourced from the environment

use std::path::PathBuf;

use crate::psychonautwiki::PSYCHONAUTWIKI_API_URL;
use crate::pubchem::PUBCHEM_API_BASE;

/// Pipeline configuration
///
/// Everything defaults to the public endpoints and a local cache directory;
/// the effect index step only runs when `EFFECT_INDEX_PATH` points at an
/// export file.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub psychonautwiki_endpoint: String,
    pub pubchem_endpoint: String,
    pub cache_dir: PathBuf,
    pub effect_index_path: Option<PathBuf>,
    pub pubchem_concurrency: usize,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            psychonautwiki_endpoint: std::env::var("PSYCHONAUTWIKI_API_URL")
                .unwrap_or_else(|_| PSYCHONAUTWIKI_API_URL.to_string()),
            pubchem_endpoint: std::env::var("PUBCHEM_API_URL")
                .unwrap_or_else(|_| PUBCHEM_API_BASE.to_string()),
            cache_dir: std::env::var("PUBCHEM_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".cache/pubchem")),
            effect_index_path: std::env::var("EFFECT_INDEX_PATH").ok().map(PathBuf::from),
            pubchem_concurrency: std::env::var("PUBCHEM_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n >= 1)
                .unwrap_or(4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        // Only assert the parts not influenced by ambient env vars.
        let config = EtlConfig::default();
        assert!(config.pubchem_concurrency >= 1);
        assert!(config.psychonautwiki_endpoint.starts_with("http"));
        assert!(config.pubchem_endpoint.starts_with("http"));
    }
}
