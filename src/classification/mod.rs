//! Dosage and phase range classification engine
//!
//! This module turns sparse scraped dose and duration records into validated,
//! non-overlapping classification bands:
//! - Unit normalization against closed mass/time registries
//! - Dosage band construction over the shared record unit tag
//! - Phase band construction with per-band unit tags
//! - Cross-band ordering validation with anomaly reporting
//!
//! Everything here is pure and synchronous; persistence and transport live in
//! their own modules.

pub mod dosage;
pub mod phase;
pub mod route;
pub mod units;
pub mod validator;

pub use dosage::{build_dosage_ranges, DosageClassification, DosageRange, DOSAGE_ORDER};
pub use phase::{build_phase_ranges, PhaseClassification, PhaseRange, PHASE_ORDER};
pub use route::{RouteOfAdministrationClassification, ROUTE_CLASSIFICATIONS};
pub use units::{normalize, parse_mass_tag, parse_time_tag, CanonicalUnit, MassTag, Quantity};
pub use validator::{validate_ranges, Anomaly, ValidatedRanges};
