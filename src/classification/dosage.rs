//! Dosage band construction from scraped dose records
//!
//! A dose record carries one shared unit tag plus up to five intensity
//! levels: scalar `threshold` and `heavy` bounds and two-sided `light`,
//! `common` and `strong` ranges. Bands are emitted in ascending intensity
//! order with bounds normalized to milligrams; absent or unusable levels are
//! omitted rather than padded with placeholders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::units::{parse_mass_tag, MassTag, Quantity};
use super::validator::Anomaly;
use crate::psychonautwiki::types::RoaDose;

/// Intensity classification of a dosage band, ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DosageClassification {
    Threshold,
    Light,
    Common,
    Strong,
    Heavy,
}

/// Fixed ascending order used for construction and ordering checks
pub const DOSAGE_ORDER: [DosageClassification; 5] = [
    DosageClassification::Threshold,
    DosageClassification::Light,
    DosageClassification::Common,
    DosageClassification::Strong,
    DosageClassification::Heavy,
];

impl DosageClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            DosageClassification::Threshold => "threshold",
            DosageClassification::Light => "light",
            DosageClassification::Common => "common",
            DosageClassification::Strong => "strong",
            DosageClassification::Heavy => "heavy",
        }
    }
}

impl fmt::Display for DosageClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DosageClassification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threshold" => Ok(DosageClassification::Threshold),
            "light" => Ok(DosageClassification::Light),
            "common" => Ok(DosageClassification::Common),
            "strong" => Ok(DosageClassification::Strong),
            "heavy" => Ok(DosageClassification::Heavy),
            other => Err(format!("unknown dosage classification '{other}'")),
        }
    }
}

/// A classified dosage band with canonical-milligram bounds
///
/// `threshold` pins its lower bound to zero (the stored sentinel for an open
/// lower bound) and `heavy` carries no upper bound at all. Existing bands are
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosageRange {
    pub classification: DosageClassification,
    pub min_value: Quantity,
    pub max_value: Option<Quantity>,
    pub per_kilogram: bool,
}

impl DosageRange {
    /// Open-ended lowest band: everything up to `max` registers as threshold.
    pub fn threshold(max: Quantity, per_kilogram: bool) -> Self {
        Self {
            classification: DosageClassification::Threshold,
            min_value: Quantity::milligrams(0.0),
            max_value: Some(max),
            per_kilogram,
        }
    }

    pub fn light(min: Quantity, max: Quantity, per_kilogram: bool) -> Self {
        Self::inclusive(DosageClassification::Light, min, max, per_kilogram)
    }

    pub fn common(min: Quantity, max: Quantity, per_kilogram: bool) -> Self {
        Self::inclusive(DosageClassification::Common, min, max, per_kilogram)
    }

    pub fn strong(min: Quantity, max: Quantity, per_kilogram: bool) -> Self {
        Self::inclusive(DosageClassification::Strong, min, max, per_kilogram)
    }

    /// Open-ended highest band: everything from `min` upward is heavy.
    pub fn heavy(min: Quantity, per_kilogram: bool) -> Self {
        Self {
            classification: DosageClassification::Heavy,
            min_value: min,
            max_value: None,
            per_kilogram,
        }
    }

    fn inclusive(
        classification: DosageClassification,
        min: Quantity,
        max: Quantity,
        per_kilogram: bool,
    ) -> Self {
        Self {
            classification,
            min_value: min,
            max_value: Some(max),
            per_kilogram,
        }
    }

    /// Whether a normalized dose falls inside this band (bounds inclusive).
    pub fn contains(&self, dose: Quantity) -> bool {
        if dose.value < self.min_value.value {
            return false;
        }
        match self.max_value {
            Some(max) => dose.value <= max.value,
            None => true,
        }
    }
}

/// Build the dosage bands of one route's dose record.
///
/// The shared unit tag is resolved once: a missing tag omits the whole
/// record silently, an unrecognized one drops it with a single anomaly
/// (`band: None`) since every level depends on the same tag. Individual
/// levels are then omitted when incomplete and dropped with an anomaly when
/// their bounds are inverted; a bad level never affects its siblings.
pub fn build_dosage_ranges(dose: &RoaDose) -> (Vec<DosageRange>, Vec<Anomaly>) {
    let tag = match dose.units.as_deref() {
        None => return (Vec::new(), Vec::new()),
        Some(raw) => match parse_mass_tag(raw) {
            Ok(tag) => tag,
            Err(_) => {
                let anomaly = Anomaly::UnrecognizedUnit {
                    band: None,
                    unit: raw.trim().to_string(),
                };
                return (Vec::new(), vec![anomaly]);
            }
        },
    };

    let mut ranges = Vec::new();
    let mut anomalies = Vec::new();

    if let Some(max) = dose.threshold.filter(usable_amount) {
        ranges.push(DosageRange::threshold(
            normalized(max, tag),
            tag.per_kilogram,
        ));
    }

    let two_sided = [
        (DosageClassification::Light, &dose.light),
        (DosageClassification::Common, &dose.common),
        (DosageClassification::Strong, &dose.strong),
    ];
    for (classification, bounds) in two_sided {
        let Some(raw) = bounds else { continue };
        let (Some(min), Some(max)) = (
            raw.min.filter(usable_amount),
            raw.max.filter(usable_amount),
        ) else {
            continue;
        };
        if min > max {
            anomalies.push(Anomaly::InvertedBounds {
                band: classification.to_string(),
                min,
                max,
            });
            continue;
        }
        ranges.push(DosageRange::inclusive(
            classification,
            normalized(min, tag),
            normalized(max, tag),
            tag.per_kilogram,
        ));
    }

    if let Some(min) = dose.heavy.filter(usable_amount) {
        ranges.push(DosageRange::heavy(normalized(min, tag), tag.per_kilogram));
    }

    (ranges, anomalies)
}

fn normalized(value: f64, tag: MassTag) -> Quantity {
    Quantity::milligrams(tag.unit.to_milligrams(value))
}

// Scraped values are occasionally garbage; anything non-finite or negative
// makes the level incomplete rather than anomalous.
fn usable_amount(value: &f64) -> bool {
    value.is_finite() && *value >= 0.0
}
