//! PsychonautWiki integration
//!
//! This module provides:
//! - Raw response types for the `AllSubstances` GraphQL query
//! - A client that fetches the substance index and recovers partial data
//! - The import filter separating real substance pages from category pages

pub mod client;
pub mod types;

pub use client::{PsychonautWikiClient, PSYCHONAUTWIKI_API_URL};
pub use types::*;

/// Category and index pages the scrape returns alongside real substances.
/// The `Substituted…` family pages are filtered by prefix instead of being
/// enumerated.
const NON_SUBSTANCE_PAGES: &[&str] = &[
    "Selective serotonin reuptake inhibitor",
    "Stimulants",
    "Serotonin-norepinephrine reuptake inhibitor",
    "Serotonin",
    "Serotonergic psychedelic",
    "Sedative",
    "Depressant",
    "Deliriant",
    "Dissociative",
    "Empathogen-entactogen",
    "Stimulant",
];

/// Whether a scraped page describes an importable substance rather than a
/// category or class index.
pub fn is_importable(substance: &RawSubstance) -> bool {
    !NON_SUBSTANCE_PAGES.contains(&substance.name.as_str())
        && !substance.name.starts_with("Substituted")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> RawSubstance {
        serde_json::from_str(&format!(r#"{{"name": "{name}"}}"#)).unwrap()
    }

    #[test]
    fn category_pages_are_filtered_out() {
        assert!(!is_importable(&named("Stimulants")));
        assert!(!is_importable(&named("Serotonergic psychedelic")));
        assert!(!is_importable(&named("Substituted amphetamines")));
        assert!(!is_importable(&named("Substituted tryptamines")));
    }

    #[test]
    fn ordinary_substances_pass_the_filter() {
        assert!(is_importable(&named("Caffeine")));
        assert!(is_importable(&named("2C-B")));
    }
}
