//! Ordered import pipeline
//!
//! Steps, in order: scrape the substance index, resolve candidates against
//! PubChem with bounded fan-out, insert substances with their routes and
//! classification bands, import the effect index, then link effect wiki
//! URLs. A failure while processing one substance is logged and counted,
//! never fatal to the run; writes for one route always happen sequentially
//! inside its substance's turn.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classification::dosage::build_dosage_ranges;
use crate::classification::phase::build_phase_ranges;
use crate::classification::route::RouteOfAdministrationClassification;
use crate::classification::validator::{validate_ranges, ValidatedRanges};
use crate::config::EtlConfig;
use crate::database::{BandRepository, EffectRepository, SubstanceRepository};
use crate::effectindex::load_effect_index;
use crate::models::{NewEffect, NewSubstance, RouteOfAdministrationRow, SubstanceRow};
use crate::psychonautwiki::{is_importable, PsychonautWikiClient, RawRoa, RawSubstance};
use crate::pubchem::{Compound, CompoundLookupService};
use crate::reconcile::{reconcile_dosage_band, reconcile_phase_band, MergeAction};

/// Counters accumulated over one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub substances_fetched: usize,
    pub substances_imported: usize,
    pub substances_skipped: usize,
    pub substances_failed: usize,
    pub routes_inserted: usize,
    pub dosage_bands_inserted: usize,
    pub dosage_bands_skipped: usize,
    pub phase_bands_inserted: usize,
    pub phase_bands_skipped: usize,
    pub effects_inserted: usize,
    pub effect_links_updated: usize,
    pub anomalies: usize,
}

pub struct ImportPipeline {
    wiki: PsychonautWikiClient,
    compounds: CompoundLookupService,
    substances: SubstanceRepository,
    bands: BandRepository,
    effects: EffectRepository,
    config: EtlConfig,
}

impl ImportPipeline {
    pub fn new(
        wiki: PsychonautWikiClient,
        compounds: CompoundLookupService,
        substances: SubstanceRepository,
        bands: BandRepository,
        effects: EffectRepository,
        config: EtlConfig,
    ) -> Self {
        Self {
            wiki,
            compounds,
            substances,
            bands,
            effects,
            config,
        }
    }

    /// Run every import step and return the accumulated counters.
    pub async fn run(&self) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();

        let scraped = self.wiki.fetch_all_substances().await?;
        report.substances_fetched = scraped.len();

        let candidates: Vec<RawSubstance> =
            scraped.into_iter().filter(is_importable).collect();
        info!(count = candidates.len(), "Filtered importable substances");

        // Effect references are linked after the effect index import, so
        // collect them before the candidates are consumed.
        let effect_refs: Vec<(String, String)> = candidates
            .iter()
            .flat_map(|s| s.effects.iter().flatten())
            .filter_map(|e| e.url.as_ref().map(|url| (e.name.clone(), url.clone())))
            .collect();

        // Compound lookups fan out with a bounded buffer and are joined
        // here in full; all database writes happen serially afterwards.
        let limit = self.config.pubchem_concurrency.max(1);
        let resolved: Vec<(RawSubstance, Result<Option<Compound>>)> =
            stream::iter(candidates)
                .map(|substance| {
                    let compounds = &self.compounds;
                    async move {
                        let lookup = compounds.lookup(&substance.name).await;
                        (substance, lookup)
                    }
                })
                .buffer_unordered(limit)
                .collect()
                .await;

        for (substance, lookup) in resolved {
            let outcome = match lookup {
                Ok(compound) => {
                    self.import_substance(&substance, compound, &mut report).await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = outcome {
                warn!(substance = %substance.name, error = %format!("{e:#}"), "Substance import failed");
                report.substances_failed += 1;
            }
        }

        self.import_effect_index(&mut report).await?;
        self.link_effect_references(&effect_refs, &mut report).await?;

        info!(
            imported = report.substances_imported,
            skipped = report.substances_skipped,
            failed = report.substances_failed,
            anomalies = report.anomalies,
            "Pipeline run complete"
        );
        Ok(report)
    }

    /// Import one substance with its routes and bands.
    ///
    /// Substances without a PubChem match or a psychoactive class are
    /// skipped; the store never holds a substance that cannot be resolved to
    /// a real compound.
    async fn import_substance(
        &self,
        raw: &RawSubstance,
        compound: Option<Compound>,
        report: &mut PipelineReport,
    ) -> Result<()> {
        let Some(compound) = compound else {
            debug!(substance = %raw.name, "No PubChem match; skipping");
            report.substances_skipped += 1;
            return Ok(());
        };
        let Some(psychoactive_class) = raw.psychoactive_class() else {
            debug!(substance = %raw.name, "No psychoactive class; skipping");
            report.substances_skipped += 1;
            return Ok(());
        };

        let stored = match self.substances.find_by_name(&raw.name).await? {
            Some(row) => {
                debug!(substance = %raw.name, "Substance already stored");
                row
            }
            None => {
                let new = NewSubstance {
                    name: raw.name.clone(),
                    common_names: raw
                        .common_names
                        .as_deref()
                        .unwrap_or_default()
                        .join(","),
                    brand_names: String::new(),
                    chemical_class: raw.chemical_class().unwrap_or_default(),
                    psychoactive_class,
                    systematic_name: compound.iupac_name.clone(),
                    inchi_key: compound.inchi_key.clone(),
                    smiles: compound.isomeric_smiles.clone(),
                    pubchem_cid: Some(compound.cid),
                    psychonautwiki_url: raw.url.clone(),
                };
                let row = self.substances.insert(&new).await?;
                report.substances_imported += 1;
                row
            }
        };

        for roa in raw.roas.iter().flatten() {
            self.import_route(&stored, roa, report).await?;
        }

        Ok(())
    }

    async fn import_route(
        &self,
        substance: &SubstanceRow,
        roa: &RawRoa,
        report: &mut PipelineReport,
    ) -> Result<()> {
        let classification = match roa.name.parse::<RouteOfAdministrationClassification>() {
            Ok(classification) => classification,
            Err(_) => {
                warn!(substance = %substance.name, route = %roa.name, "Skipping unrecognized route");
                return Ok(());
            }
        };

        let (bio_min, bio_max) = roa
            .bioavailability
            .as_ref()
            .map(|b| (b.min, b.max))
            .unwrap_or((None, None));

        let route = match self.substances.find_route(substance.id, classification).await? {
            Some(row) => row,
            None => {
                let row = self
                    .substances
                    .insert_route(substance.id, classification, bio_min, bio_max)
                    .await?;
                report.routes_inserted += 1;
                row
            }
        };

        self.import_bands(&route, roa, report).await
    }

    /// Build, validate and reconcile both band families of one route.
    async fn import_bands(
        &self,
        route: &RouteOfAdministrationRow,
        roa: &RawRoa,
        report: &mut PipelineReport,
    ) -> Result<()> {
        let (dosage, mut anomalies) = roa
            .dose
            .as_ref()
            .map(build_dosage_ranges)
            .unwrap_or_default();
        let (phases, phase_anomalies) = roa
            .duration
            .as_ref()
            .map(build_phase_ranges)
            .unwrap_or_default();
        anomalies.extend(phase_anomalies);

        let ValidatedRanges {
            dosage,
            phases,
            anomalies: ordering,
        } = validate_ranges(dosage, phases);
        anomalies.extend(ordering);

        for anomaly in &anomalies {
            warn!(route = %route.classification, anomaly = ?anomaly, "Classification anomaly");
        }
        report.anomalies += anomalies.len();

        for band in &dosage {
            match reconcile_dosage_band(&self.bands, route.id, band.classification).await? {
                MergeAction::Insert => {
                    self.bands.insert_dosage_band(route.id, band).await?;
                    report.dosage_bands_inserted += 1;
                }
                MergeAction::SkipExisting => {
                    debug!(route = %route.classification, band = %band.classification, "Dosage band already stored");
                    report.dosage_bands_skipped += 1;
                }
            }
        }

        for band in &phases {
            match reconcile_phase_band(&self.bands, route.id, band.classification).await? {
                MergeAction::Insert => {
                    self.bands.insert_phase_band(route.id, band).await?;
                    report.phase_bands_inserted += 1;
                }
                MergeAction::SkipExisting => {
                    debug!(route = %route.classification, band = %band.classification, "Phase band already stored");
                    report.phase_bands_skipped += 1;
                }
            }
        }

        Ok(())
    }

    /// Insert effect-index entries the store does not have yet.
    async fn import_effect_index(&self, report: &mut PipelineReport) -> Result<()> {
        let Some(path) = self.config.effect_index_path.as_ref() else {
            debug!("No effect index configured; skipping effect import");
            return Ok(());
        };

        let entries = load_effect_index(path)?;
        info!(count = entries.len(), "Loaded effect index");

        for entry in entries {
            let slug = entry.slug().to_string();
            if self.effects.find_by_slug(&slug).await?.is_some() {
                continue;
            }
            let new = NewEffect {
                name: entry.title,
                slug,
                summary: entry.description,
                description: entry.text,
                effectindex_url: Some(entry.url),
            };
            self.effects.insert(&new).await?;
            report.effects_inserted += 1;
        }

        Ok(())
    }

    /// Fill in wiki URLs for effects the scraped pages reference by name.
    async fn link_effect_references(
        &self,
        refs: &[(String, String)],
        report: &mut PipelineReport,
    ) -> Result<()> {
        for (name, url) in refs {
            if self.effects.link_psychonautwiki_url(name, url).await? {
                report.effect_links_updated += 1;
            }
        }
        Ok(())
    }
}
