//! Effect index file loading
//!
//! The effect catalogue ships as a local JSON export of effectindex.com; the
//! workflow loads it once and inserts any effect the store does not have yet.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One entry of the effect index export
#[derive(Debug, Clone, Deserialize)]
pub struct EffectIndexEntry {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl EffectIndexEntry {
    /// Natural key of the effect: the last path segment of its URL.
    pub fn slug(&self) -> &str {
        self.url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(self.url.as_str())
    }
}

/// Load and decode the effect index export.
pub fn load_effect_index(path: &Path) -> Result<Vec<EffectIndexEntry>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read effect index file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to decode effect index file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn slug_is_the_last_url_segment() {
        let entry = EffectIndexEntry {
            title: "Visual acuity enhancement".to_string(),
            url: "https://effectindex.com/effects/visual-acuity-enhancement".to_string(),
            description: None,
            text: None,
        };
        assert_eq!(entry.slug(), "visual-acuity-enhancement");

        let trailing = EffectIndexEntry {
            url: "https://effectindex.com/effects/euphoria/".to_string(),
            ..entry
        };
        assert_eq!(trailing.slug(), "euphoria");
    }

    #[test]
    fn loads_an_export_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{
                    "title": "Euphoria",
                    "url": "https://effectindex.com/effects/euphoria",
                    "description": "A feeling of well-being",
                    "text": "Long form description."
                }},
                {{
                    "title": "Anxiety",
                    "url": "https://effectindex.com/effects/anxiety"
                }}
            ]"#
        )
        .unwrap();

        let entries = load_effect_index(file.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].slug(), "euphoria");
        assert_eq!(entries[1].description, None);
    }

    #[test]
    fn missing_file_is_an_error_with_the_path_in_context() {
        let err = load_effect_index(Path::new("/nonexistent/effectindex.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/effectindex.json"));
    }
}
