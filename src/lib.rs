//! Substance ETL pipeline
//!
//! Scrapes the PsychonautWiki substance index, enriches each substance
//! against PubChem, and loads the result into Postgres. The interesting part
//! is the classification engine: sparse scraped dose and duration records
//! become validated, non-overlapping dosage and phase bands with canonical
//! units, and reconciliation keeps re-runs free of duplicate writes.
//!
//! ## Quick start
//!
//! ```rust
//! use substance_etl::classification::{build_dosage_ranges, validate_ranges};
//! use substance_etl::psychonautwiki::types::RoaDose;
//!
//! let dose: RoaDose = serde_json::from_str(
//!     r#"{"units": "mg", "threshold": 5, "light": {"min": 10, "max": 20}}"#,
//! )
//! .unwrap();
//!
//! let (bands, anomalies) = build_dosage_ranges(&dose);
//! assert!(anomalies.is_empty());
//!
//! let validated = validate_ranges(bands, Vec::new());
//! assert_eq!(validated.dosage.len(), 2);
//! ```

// Core error handling
pub mod error;

// Classification engine: units, bands, validation
pub mod classification;

// Insert-or-skip reconciliation over band storage
pub mod reconcile;

// External integrations
pub mod effectindex;
pub mod psychonautwiki;
pub mod pubchem;

// Runtime configuration
pub mod config;

// Database integration (when enabled)
#[cfg(feature = "database")]
pub mod database;
#[cfg(feature = "database")]
pub mod models;
#[cfg(feature = "database")]
pub mod workflow;

// Public re-exports for the classification engine
pub use classification::{
    build_dosage_ranges, build_phase_ranges, normalize, validate_ranges, Anomaly,
    CanonicalUnit, DosageClassification, DosageRange, PhaseClassification, PhaseRange,
    Quantity, RouteOfAdministrationClassification, ValidatedRanges,
};
pub use error::{UnitDomain, UnitError};
pub use reconcile::{reconcile_dosage_band, reconcile_phase_band, BandStore, MergeAction};
