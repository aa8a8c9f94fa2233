//! Classification band persistence
//!
//! Dosage and phase band rows keyed by `(route_of_administration_id,
//! classification)`; each table carries a unique index on that pair. The
//! repository implements [`BandStore`] so the reconciler can check keys
//! before the workflow inserts.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::classification::dosage::{DosageClassification, DosageRange};
use crate::classification::phase::{PhaseClassification, PhaseRange};
use crate::models::{DosageBandRow, PhaseBandRow};
use crate::reconcile::BandStore;

const DOSAGE_COLUMNS: &str = "id, route_of_administration_id, classification, amount_min, \
     amount_max, unit, per_kilogram, created_at";

const PHASE_COLUMNS: &str = "id, route_of_administration_id, classification, \
     min_duration_sec, max_duration_sec, created_at";

pub struct BandRepository {
    pool: PgPool,
}

impl BandRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a validated dosage band and return the stored row.
    pub async fn insert_dosage_band(
        &self,
        route_id: Uuid,
        band: &DosageRange,
    ) -> Result<DosageBandRow> {
        let id = Uuid::new_v4();

        let row = sqlx::query_as::<_, DosageBandRow>(&format!(
            r#"
            INSERT INTO substance_route_of_administration_dosage (
                id, route_of_administration_id, classification,
                amount_min, amount_max, unit, per_kilogram, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING {DOSAGE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(route_id)
        .bind(band.classification.as_str())
        .bind(band.min_value.value)
        .bind(band.max_value.map(|q| q.value))
        .bind(band.min_value.unit.symbol())
        .bind(band.per_kilogram)
        .fetch_one(&self.pool)
        .await
        .with_context(|| {
            format!("Failed to insert dosage band '{}'", band.classification)
        })?;

        debug!(route = %route_id, band = %band.classification, "Inserted dosage band");
        Ok(row)
    }

    /// Insert a validated phase band and return the stored row.
    ///
    /// Durations are stored as whole canonical seconds, rounded.
    pub async fn insert_phase_band(
        &self,
        route_id: Uuid,
        band: &PhaseRange,
    ) -> Result<PhaseBandRow> {
        let id = Uuid::new_v4();

        let row = sqlx::query_as::<_, PhaseBandRow>(&format!(
            r#"
            INSERT INTO substance_route_of_administration_phase (
                id, route_of_administration_id, classification,
                min_duration_sec, max_duration_sec, created_at
            ) VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING {PHASE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(route_id)
        .bind(band.classification.as_str())
        .bind(stored_seconds(band.min_duration.value)?)
        .bind(stored_seconds(band.max_duration.value)?)
        .fetch_one(&self.pool)
        .await
        .with_context(|| {
            format!("Failed to insert phase band '{}'", band.classification)
        })?;

        debug!(route = %route_id, band = %band.classification, "Inserted phase band");
        Ok(row)
    }
}

/// Convert a canonical duration to the whole-second column type, erroring
/// on values the column cannot hold instead of saturating.
fn stored_seconds(value: f64) -> Result<i32> {
    i32::try_from(value.round() as i64)
        .with_context(|| format!("Phase duration of {value} seconds does not fit storage"))
}


#[async_trait]
impl BandStore for BandRepository {
    async fn dosage_band_exists(
        &self,
        route_id: Uuid,
        classification: DosageClassification,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM substance_route_of_administration_dosage
                WHERE route_of_administration_id = $1 AND classification = $2
            )
            "#,
        )
        .bind(route_id)
        .bind(classification.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to check for an existing dosage band")?;

        Ok(exists)
    }

    async fn phase_band_exists(
        &self,
        route_id: Uuid,
        classification: PhaseClassification,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM substance_route_of_administration_phase
                WHERE route_of_administration_id = $1 AND classification = $2
            )
            "#,
        )
        .bind(route_id)
        .bind(classification.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to check for an existing phase band")?;

        Ok(exists)
    }
}
