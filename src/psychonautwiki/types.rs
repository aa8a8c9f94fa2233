//! PsychonautWiki GraphQL response types
//!
//! Raw shapes of the `AllSubstances` query. Every nested field is optional
//! because the source data is sparse; the classification engine decides what
//! is usable, not the transport layer.

use serde::Deserialize;

/// Top-level GraphQL envelope
///
/// The endpoint routinely returns `errors` alongside usable `data`, so both
/// halves are kept and the client decides whether the response is usable.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<SubstancesData>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubstancesData {
    #[serde(default)]
    pub substances: Option<Vec<RawSubstance>>,
}

/// One scraped substance page
#[derive(Debug, Clone, Deserialize)]
pub struct RawSubstance {
    pub name: String,
    #[serde(rename = "commonNames", default)]
    pub common_names: Option<Vec<String>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub class: Option<RawSubstanceClass>,
    #[serde(default)]
    pub tolerance: Option<RawTolerance>,
    #[serde(default)]
    pub roas: Option<Vec<RawRoa>>,
    #[serde(rename = "addictionPotential", default)]
    pub addiction_potential: Option<String>,
    #[serde(default)]
    pub toxicity: Option<Vec<String>>,
    #[serde(rename = "crossTolerances", default)]
    pub cross_tolerances: Option<Vec<String>>,
    #[serde(default)]
    pub effects: Option<Vec<RawEffectRef>>,
}

impl RawSubstance {
    /// Comma-joined chemical classes, if any were scraped.
    pub fn chemical_class(&self) -> Option<String> {
        self.class
            .as_ref()
            .and_then(|c| c.chemical.as_ref())
            .filter(|v| !v.is_empty())
            .map(|v| v.join(","))
    }

    /// Comma-joined psychoactive classes, if any were scraped.
    pub fn psychoactive_class(&self) -> Option<String> {
        self.class
            .as_ref()
            .and_then(|c| c.psychoactive.as_ref())
            .filter(|v| !v.is_empty())
            .map(|v| v.join(","))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSubstanceClass {
    #[serde(default)]
    pub chemical: Option<Vec<String>>,
    #[serde(default)]
    pub psychoactive: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTolerance {
    #[serde(default)]
    pub full: Option<String>,
    #[serde(default)]
    pub half: Option<String>,
    #[serde(default)]
    pub zero: Option<String>,
}

/// One scraped route of administration
#[derive(Debug, Clone, Deserialize)]
pub struct RawRoa {
    pub name: String,
    #[serde(default)]
    pub dose: Option<RoaDose>,
    #[serde(default)]
    pub duration: Option<RoaDuration>,
    #[serde(default)]
    pub bioavailability: Option<RawBioavailability>,
}

/// Dose record of one route: one shared unit tag, up to five levels
#[derive(Debug, Clone, Deserialize)]
pub struct RoaDose {
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub light: Option<RawDoseBounds>,
    #[serde(default)]
    pub common: Option<RawDoseBounds>,
    #[serde(default)]
    pub strong: Option<RawDoseBounds>,
    #[serde(default)]
    pub heavy: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDoseBounds {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Duration record of one route: per-phase bounds and unit tags
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoaDuration {
    #[serde(default)]
    pub onset: Option<RawPhaseDuration>,
    #[serde(default)]
    pub comeup: Option<RawPhaseDuration>,
    #[serde(default)]
    pub peak: Option<RawPhaseDuration>,
    #[serde(default)]
    pub offset: Option<RawPhaseDuration>,
    #[serde(default)]
    pub total: Option<RawPhaseDuration>,
    #[serde(default)]
    pub afterglow: Option<RawPhaseDuration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPhaseDuration {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub units: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBioavailability {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Effect reference scraped off a substance page
#[derive(Debug, Clone, Deserialize)]
pub struct RawEffectRef {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBSTANCE_FIXTURE: &str = r#"{
        "data": {
            "substances": [
                {
                    "name": "Caffeine",
                    "commonNames": ["Coffee"],
                    "url": "https://psychonautwiki.org/wiki/Caffeine",
                    "class": {
                        "chemical": ["Xanthine"],
                        "psychoactive": ["Stimulant"]
                    },
                    "tolerance": {"full": "rapidly", "half": null, "zero": "a few days"},
                    "roas": [
                        {
                            "name": "oral",
                            "dose": {
                                "units": "mg",
                                "threshold": 10,
                                "light": {"min": 20, "max": 50},
                                "common": {"min": 50, "max": 150},
                                "strong": {"min": 150, "max": 500},
                                "heavy": 500
                            },
                            "duration": {
                                "onset": {"min": 5, "max": 10, "units": "minutes"},
                                "comeup": null,
                                "peak": {"min": 30, "max": 60, "units": "minutes"},
                                "offset": null,
                                "total": {"min": 4, "max": 6, "units": "hours"},
                                "afterglow": null
                            },
                            "bioavailability": {"min": 99, "max": null}
                        }
                    ],
                    "addictionPotential": "moderate",
                    "toxicity": null,
                    "crossTolerances": ["other stimulants"],
                    "effects": [
                        {"name": "Stimulation", "url": "https://psychonautwiki.org/wiki/Stimulation"}
                    ]
                }
            ]
        },
        "errors": [{"message": "upstream hiccup on an unrelated field"}]
    }"#;

    #[test]
    fn parses_a_realistic_response_with_partial_errors() {
        let parsed: GraphQlResponse = serde_json::from_str(SUBSTANCE_FIXTURE).unwrap();

        let errors = parsed.errors.unwrap();
        assert_eq!(errors.len(), 1);

        let substances = parsed.data.unwrap().substances.unwrap();
        assert_eq!(substances.len(), 1);

        let substance = &substances[0];
        assert_eq!(substance.name, "Caffeine");
        assert_eq!(substance.psychoactive_class().as_deref(), Some("Stimulant"));
        assert_eq!(substance.chemical_class().as_deref(), Some("Xanthine"));

        let roas = substance.roas.as_ref().unwrap();
        let dose = roas[0].dose.as_ref().unwrap();
        assert_eq!(dose.units.as_deref(), Some("mg"));
        assert_eq!(dose.threshold, Some(10.0));
        assert_eq!(dose.strong.as_ref().unwrap().max, Some(500.0));

        let duration = roas[0].duration.as_ref().unwrap();
        assert!(duration.comeup.is_none());
        assert_eq!(
            duration.total.as_ref().unwrap().units.as_deref(),
            Some("hours")
        );

        let bio = roas[0].bioavailability.as_ref().unwrap();
        assert_eq!(bio.min, Some(99.0));
        assert_eq!(bio.max, None);
    }

    #[test]
    fn missing_optional_sections_default_to_none() {
        let parsed: RawSubstance =
            serde_json::from_str(r#"{"name": "Unknownium"}"#).unwrap();
        assert!(parsed.class.is_none());
        assert!(parsed.roas.is_none());
        assert!(parsed.psychoactive_class().is_none());
    }
}
