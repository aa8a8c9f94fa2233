//! Compound lookup caches
//!
//! The lookup service talks to its cache through [`CompoundCache`], so the
//! client itself holds no cache state. Misses are cached as aggressively as
//! hits: a name PubChem does not know stays unknown between runs, and
//! re-resolving it every run would burn the rate limit for nothing.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::client::Compound;

/// Cached outcome of one name lookup, found or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLookup {
    pub compound: Option<Compound>,
}

pub trait CompoundCache: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<CachedLookup>>;
    fn put(&self, name: &str, lookup: &CachedLookup) -> Result<()>;
}

/// One JSON file per looked-up name, keyed by a digest of the lowercased
/// name so arbitrary substance names stay filesystem-safe.
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let digest = Sha256::digest(name.trim().to_lowercase().as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }
}

impl CompoundCache for DiskCache {
    fn get(&self, name: &str) -> Result<Option<CachedLookup>> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file {}", path.display()))?;
        let lookup = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to decode cache file {}", path.display()))?;
        Ok(Some(lookup))
    }

    fn put(&self, name: &str, lookup: &CachedLookup) -> Result<()> {
        let path = self.path_for(name);
        let contents =
            serde_json::to_string(lookup).context("Failed to encode cache entry")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache file {}", path.display()))?;
        Ok(())
    }
}

/// Cache that remembers nothing; every lookup goes to the network.
pub struct NoCache;

impl CompoundCache for NoCache {
    fn get(&self, _name: &str) -> Result<Option<CachedLookup>> {
        Ok(None)
    }

    fn put(&self, _name: &str, _lookup: &CachedLookup) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound() -> Compound {
        Compound {
            cid: 5761,
            iupac_name: Some("example".to_string()),
            isomeric_smiles: None,
            inchi_key: Some("AAAAAAAAAAAAAA-UHFFFAOYSA-N".to_string()),
        }
    }

    #[test]
    fn round_trips_a_found_compound() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path()).unwrap();

        assert!(cache.get("Ketamine").unwrap().is_none());

        let lookup = CachedLookup {
            compound: Some(compound()),
        };
        cache.put("Ketamine", &lookup).unwrap();
        assert_eq!(cache.get("Ketamine").unwrap(), Some(lookup));
    }

    #[test]
    fn caches_misses_as_well_as_hits() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path()).unwrap();

        cache.put("Unknownium", &CachedLookup { compound: None }).unwrap();
        let cached = cache.get("Unknownium").unwrap();
        assert_eq!(cached, Some(CachedLookup { compound: None }));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path()).unwrap();

        cache
            .put("caffeine", &CachedLookup { compound: Some(compound()) })
            .unwrap();
        assert!(cache.get("Caffeine").unwrap().is_some());
        assert!(cache.get(" CAFFEINE ").unwrap().is_some());
        assert!(cache.get("theine").unwrap().is_none());
    }

    #[test]
    fn no_cache_always_misses() {
        let cache = NoCache;
        cache.put("anything", &CachedLookup { compound: None }).unwrap();
        assert!(cache.get("anything").unwrap().is_none());
    }
}
