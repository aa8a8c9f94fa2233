//! Route of administration classification
//!
//! Closed set of administration routes the pipeline persists. Scraped route
//! names parse case-insensitively; anything outside the set skips that route
//! rather than failing the substance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOfAdministrationClassification {
    Oral,
    Sublingual,
    Buccal,
    Insufflated,
    Rectal,
    Transdermal,
    Subcutaneous,
    Intramuscular,
    Intravenous,
    Smoked,
}

pub const ROUTE_CLASSIFICATIONS: [RouteOfAdministrationClassification; 10] = [
    RouteOfAdministrationClassification::Oral,
    RouteOfAdministrationClassification::Sublingual,
    RouteOfAdministrationClassification::Buccal,
    RouteOfAdministrationClassification::Insufflated,
    RouteOfAdministrationClassification::Rectal,
    RouteOfAdministrationClassification::Transdermal,
    RouteOfAdministrationClassification::Subcutaneous,
    RouteOfAdministrationClassification::Intramuscular,
    RouteOfAdministrationClassification::Intravenous,
    RouteOfAdministrationClassification::Smoked,
];

impl RouteOfAdministrationClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteOfAdministrationClassification::Oral => "oral",
            RouteOfAdministrationClassification::Sublingual => "sublingual",
            RouteOfAdministrationClassification::Buccal => "buccal",
            RouteOfAdministrationClassification::Insufflated => "insufflated",
            RouteOfAdministrationClassification::Rectal => "rectal",
            RouteOfAdministrationClassification::Transdermal => "transdermal",
            RouteOfAdministrationClassification::Subcutaneous => "subcutaneous",
            RouteOfAdministrationClassification::Intramuscular => "intramuscular",
            RouteOfAdministrationClassification::Intravenous => "intravenous",
            RouteOfAdministrationClassification::Smoked => "smoked",
        }
    }
}

impl fmt::Display for RouteOfAdministrationClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteOfAdministrationClassification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ROUTE_CLASSIFICATIONS
            .iter()
            .find(|r| r.as_str() == lowered)
            .copied()
            .ok_or_else(|| format!("unknown route of administration '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(
            "Oral".parse::<RouteOfAdministrationClassification>().unwrap(),
            RouteOfAdministrationClassification::Oral
        );
        assert_eq!(
            "INSUFFLATED"
                .parse::<RouteOfAdministrationClassification>()
                .unwrap(),
            RouteOfAdministrationClassification::Insufflated
        );
    }

    #[test]
    fn every_classification_round_trips() {
        for classification in ROUTE_CLASSIFICATIONS {
            let parsed: RouteOfAdministrationClassification =
                classification.as_str().parse().unwrap();
            assert_eq!(parsed, classification);
        }
    }

    #[test]
    fn unknown_routes_are_rejected() {
        assert!("osmosis"
            .parse::<RouteOfAdministrationClassification>()
            .is_err());
    }
}
