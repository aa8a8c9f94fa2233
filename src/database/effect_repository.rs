//! Effect persistence
//!
//! Effects come from the effect index export, keyed by slug. The single
//! update the import ever performs lives here: filling in a missing
//! PsychonautWiki URL once a substance page references the effect by name.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{EffectRow, NewEffect};

const EFFECT_COLUMNS: &str =
    "id, name, slug, summary, description, effectindex_url, psychonautwiki_url, created_at";

pub struct EffectRepository {
    pool: PgPool,
}

impl EffectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look an effect up by its natural key.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<EffectRow>> {
        let row = sqlx::query_as::<_, EffectRow>(&format!(
            "SELECT {EFFECT_COLUMNS} FROM effect WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch effect by slug")?;

        Ok(row)
    }

    /// Insert a new effect and return the stored row.
    pub async fn insert(&self, effect: &NewEffect) -> Result<EffectRow> {
        let id = Uuid::new_v4();

        let row = sqlx::query_as::<_, EffectRow>(&format!(
            r#"
            INSERT INTO effect (
                id, name, slug, summary, description,
                effectindex_url, psychonautwiki_url, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NULL, NOW())
            RETURNING {EFFECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&effect.name)
        .bind(&effect.slug)
        .bind(&effect.summary)
        .bind(&effect.description)
        .bind(&effect.effectindex_url)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to insert effect '{}'", effect.name))?;

        info!(effect = %row.name, id = %row.id, "Inserted effect");
        Ok(row)
    }

    /// Fill in the PsychonautWiki URL of an effect that does not have one.
    ///
    /// Returns whether a row was updated. Existing URLs are left alone, so
    /// re-running the link step never rewrites anything.
    pub async fn link_psychonautwiki_url(&self, name: &str, url: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE effect
            SET psychonautwiki_url = $2
            WHERE name = $1 AND psychonautwiki_url IS NULL
            "#,
        )
        .bind(name)
        .bind(url)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to link effect '{name}'"))?;

        let updated = result.rows_affected() > 0;
        if updated {
            debug!(effect = %name, %url, "Linked effect to its wiki page");
        }
        Ok(updated)
    }
}
