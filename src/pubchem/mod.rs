//! PubChem integration
//!
//! This module provides:
//! - A rate-limited PUG REST client for property lookups by name
//! - Cache collaborators ([`CompoundCache`], [`DiskCache`], [`NoCache`])
//! - [`CompoundLookupService`], the cache-through lookup the workflow uses

pub mod cache;
pub mod client;

pub use cache::{CachedLookup, CompoundCache, DiskCache, NoCache};
pub use client::{Compound, PubChemClient, PUBCHEM_API_BASE};

use anyhow::Result;
use tracing::debug;

/// Compound lookups with a cache in front of the client.
///
/// Both found and not-found outcomes are cached, so repeated runs only hit
/// the network for names that have never been resolved.
pub struct CompoundLookupService {
    client: PubChemClient,
    cache: Box<dyn CompoundCache>,
}

impl CompoundLookupService {
    pub fn new(client: PubChemClient, cache: Box<dyn CompoundCache>) -> Self {
        Self { client, cache }
    }

    pub async fn lookup(&self, name: &str) -> Result<Option<Compound>> {
        if let Some(cached) = self.cache.get(name)? {
            debug!(%name, found = cached.compound.is_some(), "Compound cache hit");
            return Ok(cached.compound);
        }

        let compound = self.client.lookup_by_name(name).await?;
        self.cache.put(
            name,
            &CachedLookup {
                compound: compound.clone(),
            },
        )?;
        Ok(compound)
    }
}
