//! Cross-band ordering validation
//!
//! Builders emit bands in fixed classification order with per-band bounds
//! already checked; this pass enforces the cross-band invariant that a band
//! never starts below the upper bound of the band before it. Offending bands
//! are dropped, never clamped, and each candidate is compared against the
//! last *accepted* band, so re-validating an already validated sequence is a
//! no-op.

use serde::{Deserialize, Serialize};

use super::dosage::DosageRange;
use super::phase::{PhaseClassification, PhaseRange};

/// Data-quality finding recorded while building or validating bands
///
/// Anomalies are reportable values, not errors: the pipeline logs and counts
/// them while the surviving bands continue on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// Unit tag outside the closed registry. `band` is `None` when a dose
    /// record's shared tag was bad and the whole sequence was dropped.
    UnrecognizedUnit { band: Option<String>, unit: String },
    /// Two-sided band scraped with min above max (raw values as scraped)
    InvertedBounds { band: String, min: f64, max: f64 },
    /// Band starting below the upper bound of the last accepted band
    /// (canonical values)
    OrderingViolation {
        prior: String,
        offending: String,
        prior_max: f64,
        offending_min: f64,
    },
}

/// Bands that survived validation, plus everything recorded on the way
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedRanges {
    pub dosage: Vec<DosageRange>,
    pub phases: Vec<PhaseRange>,
    pub anomalies: Vec<Anomaly>,
}

/// Validate both band families of one route.
///
/// Dosage bands are checked across the full intensity chain. Phase bands are
/// checked across the chronological chain with afterglow exempt: it overlaps
/// the tail of the experience in the source data and is accepted as-is.
pub fn validate_ranges(dosage: Vec<DosageRange>, phases: Vec<PhaseRange>) -> ValidatedRanges {
    let mut anomalies = Vec::new();
    let dosage = validate_dosage_chain(dosage, &mut anomalies);
    let phases = validate_phase_chain(phases, &mut anomalies);
    ValidatedRanges {
        dosage,
        phases,
        anomalies,
    }
}

fn validate_dosage_chain(
    bands: Vec<DosageRange>,
    anomalies: &mut Vec<Anomaly>,
) -> Vec<DosageRange> {
    let mut accepted: Vec<DosageRange> = Vec::with_capacity(bands.len());
    for band in bands {
        if let Some(prior) = accepted.last() {
            // An open upper bound can only sit on the last band of the
            // chain, so a prior without one imposes no constraint.
            if let Some(prior_max) = prior.max_value {
                if prior_max.value > band.min_value.value {
                    anomalies.push(Anomaly::OrderingViolation {
                        prior: prior.classification.to_string(),
                        offending: band.classification.to_string(),
                        prior_max: prior_max.value,
                        offending_min: band.min_value.value,
                    });
                    continue;
                }
            }
        }
        accepted.push(band);
    }
    accepted
}

fn validate_phase_chain(bands: Vec<PhaseRange>, anomalies: &mut Vec<Anomaly>) -> Vec<PhaseRange> {
    let mut accepted: Vec<PhaseRange> = Vec::with_capacity(bands.len());
    let mut last_ordered: Option<usize> = None;
    for band in bands {
        if band.classification == PhaseClassification::Afterglow {
            accepted.push(band);
            continue;
        }
        if let Some(idx) = last_ordered {
            let prior = &accepted[idx];
            if prior.max_duration.value > band.min_duration.value {
                anomalies.push(Anomaly::OrderingViolation {
                    prior: prior.classification.to_string(),
                    offending: band.classification.to_string(),
                    prior_max: prior.max_duration.value,
                    offending_min: band.min_duration.value,
                });
                continue;
            }
        }
        accepted.push(band);
        last_ordered = Some(accepted.len() - 1);
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::dosage::DosageClassification;
    use crate::classification::units::Quantity;

    fn mg(value: f64) -> Quantity {
        Quantity::milligrams(value)
    }

    fn sec(value: f64) -> Quantity {
        Quantity::seconds(value)
    }

    #[test]
    fn heavy_starting_below_common_max_is_dropped() {
        let bands = vec![
            DosageRange::common(mg(20.0), mg(40.0), false),
            DosageRange::heavy(mg(10.0), false),
        ];
        let validated = validate_ranges(bands, Vec::new());

        assert_eq!(validated.dosage.len(), 1);
        assert_eq!(
            validated.dosage[0].classification,
            DosageClassification::Common
        );
        assert_eq!(
            validated.anomalies,
            vec![Anomaly::OrderingViolation {
                prior: "common".to_string(),
                offending: "heavy".to_string(),
                prior_max: 40.0,
                offending_min: 10.0,
            }]
        );
    }

    #[test]
    fn touching_bounds_are_accepted() {
        let bands = vec![
            DosageRange::threshold(mg(5.0), false),
            DosageRange::light(mg(5.0), mg(20.0), false),
            DosageRange::common(mg(20.0), mg(40.0), false),
        ];
        let validated = validate_ranges(bands, Vec::new());
        assert_eq!(validated.dosage.len(), 3);
        assert!(validated.anomalies.is_empty());
    }

    #[test]
    fn later_bands_are_compared_against_the_last_accepted_one() {
        let bands = vec![
            DosageRange::light(mg(10.0), mg(30.0), false),
            // Starts inside light, dropped.
            DosageRange::common(mg(20.0), mg(25.0), false),
            // Clears light's upper bound, kept even though common is gone.
            DosageRange::strong(mg(32.0), mg(40.0), false),
        ];
        let validated = validate_ranges(bands, Vec::new());

        let kept: Vec<_> = validated
            .dosage
            .iter()
            .map(|b| b.classification)
            .collect();
        assert_eq!(
            kept,
            vec![DosageClassification::Light, DosageClassification::Strong]
        );
        assert_eq!(validated.anomalies.len(), 1);
    }

    #[test]
    fn revalidating_accepted_bands_changes_nothing() {
        let bands = vec![
            DosageRange::light(mg(10.0), mg(30.0), false),
            DosageRange::common(mg(20.0), mg(25.0), false),
            DosageRange::heavy(mg(28.0), false),
        ];
        let first = validate_ranges(bands, Vec::new());
        let second = validate_ranges(first.dosage.clone(), first.phases.clone());

        assert_eq!(second.dosage, first.dosage);
        assert_eq!(second.phases, first.phases);
        assert!(second.anomalies.is_empty());
    }

    #[test]
    fn phase_chain_drops_band_starting_inside_its_predecessor() {
        let phases = vec![
            PhaseRange::new(PhaseClassification::Onset, sec(1200.0), sec(2400.0)),
            PhaseRange::new(PhaseClassification::Comeup, sec(600.0), sec(1200.0)),
            PhaseRange::new(PhaseClassification::Peak, sec(3600.0), sec(7200.0)),
        ];
        let validated = validate_ranges(Vec::new(), phases);

        let kept: Vec<_> = validated
            .phases
            .iter()
            .map(|p| p.classification)
            .collect();
        assert_eq!(
            kept,
            vec![PhaseClassification::Onset, PhaseClassification::Peak]
        );
        assert_eq!(
            validated.anomalies,
            vec![Anomaly::OrderingViolation {
                prior: "onset".to_string(),
                offending: "comeup".to_string(),
                prior_max: 2400.0,
                offending_min: 600.0,
            }]
        );
    }

    #[test]
    fn afterglow_is_exempt_from_ordering() {
        let phases = vec![
            PhaseRange::new(PhaseClassification::Offset, sec(7200.0), sec(10800.0)),
            PhaseRange::new(PhaseClassification::Total, sec(14400.0), sec(21600.0)),
            // Overlaps everything before it; still accepted.
            PhaseRange::new(PhaseClassification::Afterglow, sec(3600.0), sec(7200.0)),
        ];
        let validated = validate_ranges(Vec::new(), phases);
        assert_eq!(validated.phases.len(), 3);
        assert!(validated.anomalies.is_empty());
    }

    #[test]
    fn empty_input_validates_to_empty_output() {
        let validated = validate_ranges(Vec::new(), Vec::new());
        assert!(validated.dosage.is_empty());
        assert!(validated.phases.is_empty());
        assert!(validated.anomalies.is_empty());
    }
}
