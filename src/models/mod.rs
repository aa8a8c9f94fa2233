//! Persisted row types for the import schema
//!
//! One struct per table, mirroring the columns the repositories select.
//! Identity rows (substances, routes) are written once by the import and
//! never mutated; band rows are insert-only under their
//! `(route_of_administration_id, classification)` key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A substance imported from the scrape, enriched with PubChem identifiers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubstanceRow {
    pub id: Uuid,
    pub name: String,
    pub common_names: String,
    pub brand_names: String,
    pub chemical_class: String,
    pub psychoactive_class: String,
    pub systematic_name: Option<String>,
    pub inchi_key: Option<String>,
    pub smiles: Option<String>,
    pub pubchem_cid: Option<i64>,
    pub psychonautwiki_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a substance; id and timestamps are assigned at insert
#[derive(Debug, Clone)]
pub struct NewSubstance {
    pub name: String,
    pub common_names: String,
    pub brand_names: String,
    pub chemical_class: String,
    pub psychoactive_class: String,
    pub systematic_name: Option<String>,
    pub inchi_key: Option<String>,
    pub smiles: Option<String>,
    pub pubchem_cid: Option<i64>,
    pub psychonautwiki_url: Option<String>,
}

/// One route of administration of a substance
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteOfAdministrationRow {
    pub id: Uuid,
    pub substance_id: Uuid,
    pub classification: String,
    pub bioavailability_min: Option<f64>,
    pub bioavailability_max: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A stored dosage band; `amount_min` is zero for threshold and `amount_max`
/// NULL for heavy
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DosageBandRow {
    pub id: Uuid,
    pub route_of_administration_id: Uuid,
    pub classification: String,
    pub amount_min: f64,
    pub amount_max: Option<f64>,
    pub unit: String,
    pub per_kilogram: bool,
    pub created_at: DateTime<Utc>,
}

/// A stored phase band in whole canonical seconds
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PhaseBandRow {
    pub id: Uuid,
    pub route_of_administration_id: Uuid,
    pub classification: String,
    pub min_duration_sec: i32,
    pub max_duration_sec: i32,
    pub created_at: DateTime<Utc>,
}

/// An effect from the effect index, optionally linked to its wiki page
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EffectRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub effectindex_url: Option<String>,
    pub psychonautwiki_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an effect
#[derive(Debug, Clone)]
pub struct NewEffect {
    pub name: String,
    pub slug: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub effectindex_url: Option<String>,
}
