//! Substance import runner
//!
//! Runs the full pipeline end to end against the configured database.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/substances \
//! EFFECT_INDEX_PATH=public/effectindex.json \
//!     cargo run --bin etl_runner --features database
//! ```
//!
//! Endpoints, cache directory and fan-out limits come from the environment;
//! see `EtlConfig` and `DatabaseConfig` for the variable names.

use std::process;

use substance_etl::config::EtlConfig;
use substance_etl::database::{DatabaseConfig, DatabaseManager};
use substance_etl::psychonautwiki::PsychonautWikiClient;
use substance_etl::pubchem::{CompoundLookupService, DiskCache, PubChemClient};
use substance_etl::workflow::ImportPipeline;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        eprintln!("Import failed: {e:#}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = EtlConfig::default();

    let db = DatabaseManager::new(DatabaseConfig::default()).await?;
    db.verify_schema().await?;

    let wiki = PsychonautWikiClient::with_endpoint(config.psychonautwiki_endpoint.clone())?;
    let compounds = CompoundLookupService::new(
        PubChemClient::with_base_url(&config.pubchem_endpoint)?,
        Box::new(DiskCache::new(&config.cache_dir)?),
    );

    let pipeline = ImportPipeline::new(
        wiki,
        compounds,
        db.substance_repository(),
        db.band_repository(),
        db.effect_repository(),
        config,
    );

    let report = pipeline.run().await?;

    println!("Import complete");
    println!(
        "  substances: {} fetched, {} imported, {} skipped, {} failed",
        report.substances_fetched,
        report.substances_imported,
        report.substances_skipped,
        report.substances_failed
    );
    println!("  routes:     {} inserted", report.routes_inserted);
    println!(
        "  dosage:     {} inserted, {} already present",
        report.dosage_bands_inserted, report.dosage_bands_skipped
    );
    println!(
        "  phases:     {} inserted, {} already present",
        report.phase_bands_inserted, report.phase_bands_skipped
    );
    println!(
        "  effects:    {} inserted, {} linked",
        report.effects_inserted, report.effect_links_updated
    );
    println!("  anomalies:  {}", report.anomalies);

    Ok(())
}
