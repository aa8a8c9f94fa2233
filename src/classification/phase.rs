//! Phase band construction from scraped duration records
//!
//! Unlike dose records, each phase carries its own unit tag, so a bad tag
//! only costs that one band. Durations normalize to canonical seconds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::units::{parse_time_tag, Quantity};
use super::validator::Anomaly;
use crate::psychonautwiki::types::RoaDuration;

/// Temporal classification of a phase band, in chronological order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseClassification {
    Onset,
    Comeup,
    Peak,
    Offset,
    Total,
    Afterglow,
}

/// Fixed chronological order used for construction and ordering checks
pub const PHASE_ORDER: [PhaseClassification; 6] = [
    PhaseClassification::Onset,
    PhaseClassification::Comeup,
    PhaseClassification::Peak,
    PhaseClassification::Offset,
    PhaseClassification::Total,
    PhaseClassification::Afterglow,
];

impl PhaseClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseClassification::Onset => "onset",
            PhaseClassification::Comeup => "comeup",
            PhaseClassification::Peak => "peak",
            PhaseClassification::Offset => "offset",
            PhaseClassification::Total => "total",
            PhaseClassification::Afterglow => "afterglow",
        }
    }
}

impl fmt::Display for PhaseClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseClassification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onset" => Ok(PhaseClassification::Onset),
            "comeup" => Ok(PhaseClassification::Comeup),
            "peak" => Ok(PhaseClassification::Peak),
            // Older scrapes label the offset phase "comedown".
            "offset" | "comedown" => Ok(PhaseClassification::Offset),
            "total" => Ok(PhaseClassification::Total),
            "afterglow" => Ok(PhaseClassification::Afterglow),
            other => Err(format!("unknown phase classification '{other}'")),
        }
    }
}

/// A classified phase band with canonical-second bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRange {
    pub classification: PhaseClassification,
    pub min_duration: Quantity,
    pub max_duration: Quantity,
}

impl PhaseRange {
    pub fn new(classification: PhaseClassification, min: Quantity, max: Quantity) -> Self {
        Self {
            classification,
            min_duration: min,
            max_duration: max,
        }
    }
}

/// Build the phase bands of one route's duration record.
///
/// Bands are visited in chronological order. A band is emitted only when its
/// min, max and unit tag are all present and usable: null fields omit the
/// band silently, an unrecognized tag or inverted bounds drop it with an
/// anomaly. Failures never spill over into other bands.
pub fn build_phase_ranges(duration: &RoaDuration) -> (Vec<PhaseRange>, Vec<Anomaly>) {
    let slots = [
        (PhaseClassification::Onset, &duration.onset),
        (PhaseClassification::Comeup, &duration.comeup),
        (PhaseClassification::Peak, &duration.peak),
        (PhaseClassification::Offset, &duration.offset),
        (PhaseClassification::Total, &duration.total),
        (PhaseClassification::Afterglow, &duration.afterglow),
    ];

    let mut ranges = Vec::new();
    let mut anomalies = Vec::new();

    for (classification, slot) in slots {
        let Some(raw) = slot else { continue };
        let (Some(min), Some(max), Some(tag)) = (
            raw.min.filter(usable_amount),
            raw.max.filter(usable_amount),
            raw.units.as_deref(),
        ) else {
            continue;
        };

        let unit = match parse_time_tag(tag) {
            Ok(unit) => unit,
            Err(err) => {
                anomalies.push(Anomaly::UnrecognizedUnit {
                    band: Some(classification.to_string()),
                    unit: err.unit_tag().to_string(),
                });
                continue;
            }
        };

        if min > max {
            anomalies.push(Anomaly::InvertedBounds {
                band: classification.to_string(),
                min,
                max,
            });
            continue;
        }

        ranges.push(PhaseRange::new(
            classification,
            Quantity::seconds(unit.to_seconds(min)),
            Quantity::seconds(unit.to_seconds(max)),
        ));
    }

    (ranges, anomalies)
}

fn usable_amount(value: &f64) -> bool {
    value.is_finite() && *value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psychonautwiki::types::RawPhaseDuration;

    fn minutes(min: f64, max: f64) -> Option<RawPhaseDuration> {
        Some(RawPhaseDuration {
            min: Some(min),
            max: Some(max),
            units: Some("minutes".to_string()),
        })
    }

    #[test]
    fn bands_normalize_to_seconds_in_chronological_order() {
        let duration = RoaDuration {
            onset: minutes(20.0, 40.0),
            comeup: None,
            peak: Some(RawPhaseDuration {
                min: Some(1.0),
                max: Some(2.0),
                units: Some("hours".to_string()),
            }),
            offset: None,
            total: Some(RawPhaseDuration {
                min: Some(4.0),
                max: Some(6.0),
                units: Some("hours".to_string()),
            }),
            afterglow: None,
        };

        let (ranges, anomalies) = build_phase_ranges(&duration);
        assert!(anomalies.is_empty());
        assert_eq!(ranges.len(), 3);

        assert_eq!(ranges[0].classification, PhaseClassification::Onset);
        assert_eq!(ranges[0].min_duration, Quantity::seconds(1200.0));
        assert_eq!(ranges[0].max_duration, Quantity::seconds(2400.0));

        assert_eq!(ranges[1].classification, PhaseClassification::Peak);
        assert_eq!(ranges[1].min_duration, Quantity::seconds(3600.0));

        assert_eq!(ranges[2].classification, PhaseClassification::Total);
        assert_eq!(ranges[2].max_duration, Quantity::seconds(21600.0));
    }

    #[test]
    fn null_fields_omit_the_band_without_anomaly() {
        let duration = RoaDuration {
            onset: Some(RawPhaseDuration {
                min: Some(10.0),
                max: None,
                units: Some("minutes".to_string()),
            }),
            comeup: Some(RawPhaseDuration {
                min: Some(10.0),
                max: Some(20.0),
                units: None,
            }),
            peak: None,
            offset: None,
            total: None,
            afterglow: None,
        };
        let (ranges, anomalies) = build_phase_ranges(&duration);
        assert!(ranges.is_empty());
        assert!(anomalies.is_empty());
    }

    #[test]
    fn bad_tag_costs_only_its_own_band() {
        let duration = RoaDuration {
            onset: Some(RawPhaseDuration {
                min: Some(1.0),
                max: Some(2.0),
                units: Some("fortnights".to_string()),
            }),
            comeup: minutes(10.0, 20.0),
            peak: None,
            offset: None,
            total: None,
            afterglow: None,
        };
        let (ranges, anomalies) = build_phase_ranges(&duration);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].classification, PhaseClassification::Comeup);
        assert_eq!(
            anomalies,
            vec![Anomaly::UnrecognizedUnit {
                band: Some("onset".to_string()),
                unit: "fortnights".to_string(),
            }]
        );
    }

    #[test]
    fn inverted_duration_is_dropped_with_anomaly() {
        let duration = RoaDuration {
            onset: minutes(40.0, 20.0),
            comeup: None,
            peak: None,
            offset: None,
            total: None,
            afterglow: minutes(60.0, 120.0),
        };
        let (ranges, anomalies) = build_phase_ranges(&duration);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].classification, PhaseClassification::Afterglow);
        assert_eq!(
            anomalies,
            vec![Anomaly::InvertedBounds {
                band: "onset".to_string(),
                min: 40.0,
                max: 20.0,
            }]
        );
    }

    #[test]
    fn comedown_parses_as_offset() {
        assert_eq!(
            "comedown".parse::<PhaseClassification>().unwrap(),
            PhaseClassification::Offset
        );
        for classification in PHASE_ORDER {
            let parsed: PhaseClassification = classification.as_str().parse().unwrap();
            assert_eq!(parsed, classification);
        }
    }
}
