//! Insert-or-skip reconciliation for classification bands
//!
//! Bands are keyed by `(route_of_administration_id, classification)`. The
//! reconciler looks the key up through the [`BandStore`] trait and decides
//! between inserting and leaving the stored band untouched; it never updates
//! in place, which keeps a re-run of the pipeline free of writes for data
//! that is already loaded.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::classification::dosage::DosageClassification;
use crate::classification::phase::PhaseClassification;

/// Outcome of reconciling one band against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    Insert,
    SkipExisting,
}

/// Lookup surface the reconciler needs from band storage
///
/// Implemented by the Postgres band repository and by in-memory doubles in
/// tests.
#[async_trait]
pub trait BandStore: Send + Sync {
    async fn dosage_band_exists(
        &self,
        route_id: Uuid,
        classification: DosageClassification,
    ) -> Result<bool>;

    async fn phase_band_exists(
        &self,
        route_id: Uuid,
        classification: PhaseClassification,
    ) -> Result<bool>;
}

/// Decide whether a dosage band under this key needs inserting.
pub async fn reconcile_dosage_band(
    store: &dyn BandStore,
    route_id: Uuid,
    classification: DosageClassification,
) -> Result<MergeAction> {
    if store.dosage_band_exists(route_id, classification).await? {
        Ok(MergeAction::SkipExisting)
    } else {
        Ok(MergeAction::Insert)
    }
}

/// Decide whether a phase band under this key needs inserting.
pub async fn reconcile_phase_band(
    store: &dyn BandStore,
    route_id: Uuid,
    classification: PhaseClassification,
) -> Result<MergeAction> {
    if store.phase_band_exists(route_id, classification).await? {
        Ok(MergeAction::SkipExisting)
    } else {
        Ok(MergeAction::Insert)
    }
}
