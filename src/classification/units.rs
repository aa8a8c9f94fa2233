//! Unit normalization for scraped dosage and duration values
//!
//! Upstream publishes doses in micrograms, milligrams or grams and phase
//! durations in seconds, minutes or hours. Everything is normalized here to
//! one canonical unit per domain (milligrams, seconds) so band construction
//! and ordering checks never compare across units. The registries are closed:
//! a tag outside them is rejected, never guessed at.

use serde::{Deserialize, Serialize};

use crate::error::{UnitDomain, UnitError};

/// Canonical unit carried by every normalized quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalUnit {
    Milligram,
    Second,
}

impl CanonicalUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            CanonicalUnit::Milligram => "mg",
            CanonicalUnit::Second => "s",
        }
    }
}

/// A normalized value with its canonical unit
///
/// Values are finite and non-negative; callers filter raw values before
/// normalizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: CanonicalUnit,
}

impl Quantity {
    pub fn milligrams(value: f64) -> Self {
        Self {
            value,
            unit: CanonicalUnit::Milligram,
        }
    }

    pub fn seconds(value: f64) -> Self {
        Self {
            value,
            unit: CanonicalUnit::Second,
        }
    }
}

/// Mass units accepted by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MassUnit {
    Microgram,
    Milligram,
    Gram,
}

impl MassUnit {
    /// Convert a raw value in this unit to canonical milligrams
    pub fn to_milligrams(self, value: f64) -> f64 {
        match self {
            MassUnit::Microgram => value / 1000.0,
            MassUnit::Milligram => value,
            MassUnit::Gram => value * 1000.0,
        }
    }
}

/// Time units accepted by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    /// Convert a raw value in this unit to canonical seconds
    pub fn to_seconds(self, value: f64) -> f64 {
        match self {
            TimeUnit::Second => value,
            TimeUnit::Minute => value * 60.0,
            TimeUnit::Hour => value * 3600.0,
        }
    }
}

/// Parsed mass tag; `per_kilogram` marks the body-weight-scaled variant
/// (`mg/kg of body weight`), which normalizes like plain milligrams but is
/// flagged through to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MassTag {
    pub unit: MassUnit,
    pub per_kilogram: bool,
}

/// Resolve a scraped mass tag against the closed registry.
///
/// Tags are matched case-sensitively after trimming. Both the micro sign
/// (U+00B5) and the Greek mu (U+03BC) appear in the source data, as do two
/// scraped aliases of plain milligrams.
pub fn parse_mass_tag(tag: &str) -> Result<MassTag, UnitError> {
    let trimmed = tag.trim();
    let (unit, per_kilogram) = match trimmed {
        "\u{b5}g" | "\u{3bc}g" | "ug" => (MassUnit::Microgram, false),
        "mg" | "mg (THC)" => (MassUnit::Milligram, false),
        "mg/kg of body weight" => (MassUnit::Milligram, true),
        "g" => (MassUnit::Gram, false),
        _ => {
            return Err(UnitError::Unrecognized {
                domain: UnitDomain::Mass,
                unit: trimmed.to_string(),
            })
        }
    };
    Ok(MassTag { unit, per_kilogram })
}

/// Resolve a scraped time tag against the closed registry.
pub fn parse_time_tag(tag: &str) -> Result<TimeUnit, UnitError> {
    match tag.trim() {
        "second" | "seconds" => Ok(TimeUnit::Second),
        "minute" | "minutes" => Ok(TimeUnit::Minute),
        "hour" | "hours" => Ok(TimeUnit::Hour),
        other => Err(UnitError::Unrecognized {
            domain: UnitDomain::Time,
            unit: other.to_string(),
        }),
    }
}

/// Normalize a raw value under a unit tag into the canonical unit of the
/// given domain. Pure; unknown tags fail with [`UnitError::Unrecognized`].
pub fn normalize(value: f64, unit_tag: &str, domain: UnitDomain) -> Result<Quantity, UnitError> {
    match domain {
        UnitDomain::Mass => {
            let tag = parse_mass_tag(unit_tag)?;
            Ok(Quantity::milligrams(tag.unit.to_milligrams(value)))
        }
        UnitDomain::Time => {
            let unit = parse_time_tag(unit_tag)?;
            Ok(Quantity::seconds(unit.to_seconds(value)))
        }
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    fn arb_amount() -> impl Strategy<Value = f64> {
        // Integral values up to an implausibly large dose; scraped doses are
        // integral or half-step, and integral values keep the factor-of-1000
        // ratio exact in both directions.
        (0u32..=1_000_000).prop_map(f64::from)
    }

    proptest! {
        #[test]
        fn microgram_milligram_ratio_is_exact(amount in arb_amount()) {
            let micro = normalize(amount * 1000.0, "ug", UnitDomain::Mass).unwrap();
            let milli = normalize(amount, "mg", UnitDomain::Mass).unwrap();
            prop_assert_eq!(micro, milli);
        }

        #[test]
        fn gram_milligram_ratio_is_exact(amount in arb_amount()) {
            let grams = normalize(amount, "g", UnitDomain::Mass).unwrap();
            let milli = normalize(amount * 1000.0, "mg", UnitDomain::Mass).unwrap();
            prop_assert_eq!(grams, milli);
        }

        #[test]
        fn minutes_and_hours_agree_on_seconds(amount in arb_amount()) {
            let hours = normalize(amount, "hours", UnitDomain::Time).unwrap();
            let minutes = normalize(amount * 60.0, "minutes", UnitDomain::Time).unwrap();
            prop_assert_eq!(hours, minutes);
        }
    }
}
