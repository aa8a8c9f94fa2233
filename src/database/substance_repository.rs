//! Substance and route-of-administration persistence
//!
//! Identity rows for the import: substances keyed by name, routes keyed by
//! `(substance_id, classification)`. Both are insert-only; the import never
//! rewrites an existing identity row.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::classification::route::RouteOfAdministrationClassification;
use crate::models::{NewSubstance, RouteOfAdministrationRow, SubstanceRow};

const SUBSTANCE_COLUMNS: &str = "id, name, common_names, brand_names, chemical_class, \
     psychoactive_class, systematic_name, inchi_key, smiles, pubchem_cid, \
     psychonautwiki_url, created_at, updated_at";

const ROUTE_COLUMNS: &str =
    "id, substance_id, classification, bioavailability_min, bioavailability_max, created_at";

pub struct SubstanceRepository {
    pool: PgPool,
}

impl SubstanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look a substance up by its natural key.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<SubstanceRow>> {
        let row = sqlx::query_as::<_, SubstanceRow>(&format!(
            "SELECT {SUBSTANCE_COLUMNS} FROM substance WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch substance by name")?;

        Ok(row)
    }

    /// Insert a new substance and return the stored row.
    pub async fn insert(&self, substance: &NewSubstance) -> Result<SubstanceRow> {
        let id = Uuid::new_v4();

        let row = sqlx::query_as::<_, SubstanceRow>(&format!(
            r#"
            INSERT INTO substance (
                id, name, common_names, brand_names, chemical_class,
                psychoactive_class, systematic_name, inchi_key, smiles,
                pubchem_cid, psychonautwiki_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW())
            RETURNING {SUBSTANCE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&substance.name)
        .bind(&substance.common_names)
        .bind(&substance.brand_names)
        .bind(&substance.chemical_class)
        .bind(&substance.psychoactive_class)
        .bind(&substance.systematic_name)
        .bind(&substance.inchi_key)
        .bind(&substance.smiles)
        .bind(substance.pubchem_cid)
        .bind(&substance.psychonautwiki_url)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to insert substance '{}'", substance.name))?;

        info!(substance = %row.name, id = %row.id, "Inserted substance");
        Ok(row)
    }

    /// Look a route up by its `(substance_id, classification)` key.
    pub async fn find_route(
        &self,
        substance_id: Uuid,
        classification: RouteOfAdministrationClassification,
    ) -> Result<Option<RouteOfAdministrationRow>> {
        let row = sqlx::query_as::<_, RouteOfAdministrationRow>(&format!(
            r#"
            SELECT {ROUTE_COLUMNS}
            FROM substance_route_of_administration
            WHERE substance_id = $1 AND classification = $2
            "#
        ))
        .bind(substance_id)
        .bind(classification.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch route of administration")?;

        Ok(row)
    }

    /// Insert a new route of administration and return the stored row.
    pub async fn insert_route(
        &self,
        substance_id: Uuid,
        classification: RouteOfAdministrationClassification,
        bioavailability_min: Option<f64>,
        bioavailability_max: Option<f64>,
    ) -> Result<RouteOfAdministrationRow> {
        let id = Uuid::new_v4();

        let row = sqlx::query_as::<_, RouteOfAdministrationRow>(&format!(
            r#"
            INSERT INTO substance_route_of_administration (
                id, substance_id, classification,
                bioavailability_min, bioavailability_max, created_at
            ) VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING {ROUTE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(substance_id)
        .bind(classification.as_str())
        .bind(bioavailability_min)
        .bind(bioavailability_max)
        .fetch_one(&self.pool)
        .await
        .with_context(|| {
            format!("Failed to insert route of administration '{classification}'")
        })?;

        info!(route = %classification, id = %row.id, "Inserted route of administration");
        Ok(row)
    }
}
