//! Built-in preset catalog.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use taskpanel_core::{PanelError, Preset, TaskCatalog};
use tracing::debug;

use crate::error::CatalogError;

/// One entry of a preset file.
#[derive(Debug, Deserialize)]
struct PresetEntry {
    instructions: String,
    #[serde(default)]
    review_instructions: String,
}

/// In-memory preset catalog, seeded with the built-in presets.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: BTreeMap<String, Preset>,
}

impl PresetCatalog {
    /// Create a catalog with no presets.
    pub fn empty() -> Self {
        Self {
            presets: BTreeMap::new(),
        }
    }

    /// Create a catalog holding the built-in presets.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for preset in builtin_presets() {
            catalog.insert(preset);
        }
        catalog
    }

    /// Builder method to add or replace a preset.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.insert(preset);
        self
    }

    /// Add or replace a preset.
    pub fn insert(&mut self, preset: Preset) {
        self.presets.insert(preset.name.clone(), preset);
    }

    /// Merge presets from a JSON object of `name -> {instructions, review_instructions}`.
    ///
    /// Entries with an existing name replace the earlier preset.
    pub fn merge_json(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        let entries: BTreeMap<String, PresetEntry> = serde_json::from_str(json)?;
        let count = entries.len();

        for (name, entry) in entries {
            debug!(preset = %name, "Loaded preset");
            self.insert(Preset::new(name, entry.instructions, entry.review_instructions));
        }

        Ok(count)
    }

    /// Builder method to merge presets from a JSON file.
    pub fn load_file(mut self, path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.merge_json(&text).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TaskCatalog for PresetCatalog {
    fn resolve(&self, name: &str) -> Result<Preset, PanelError> {
        self.presets
            .get(name)
            .cloned()
            .ok_or_else(|| PanelError::PresetNotFound(name.to_string()))
    }

    fn names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }
}

fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new(
            "code-review",
            "Review each code snippet in the input. For every record report \
             bugs, readability problems and suggested fixes, each tagged with a \
             severity of low, medium or high.",
            "You are given several independent code reviews of the same input. \
             Point out findings that are wrong or unsupported by the code, \
             findings that were missed, and which review is the most reliable.",
        ),
        Preset::new(
            "security-audit",
            "Audit each input record for security vulnerabilities such as \
             injection, unsafe deserialization, secrets in source and missing \
             authorization checks. Give each finding a CWE identifier when one \
             applies and a severity.",
            "Cross-check the audits. Flag false positives, note vulnerabilities \
             only some auditors found, and produce a consolidated severity for \
             every finding.",
        ),
        Preset::new(
            "summarize",
            "Write a concise summary of each input record, followed by a short \
             overall summary of the whole input.",
            "Compare the summaries for accuracy and coverage. List any claim \
             not supported by the input.",
        ),
        Preset::new(
            "classify",
            "Assign each input record a category and a confidence between 0 and \
             1. Use the same category names across records.",
            "Compare the classifications record by record and report where the \
             workers disagree, with the category you consider correct.",
        ),
        Preset::new(
            "extract-entities",
            "Extract the named entities (people, organizations, locations, \
             dates) mentioned in each input record.",
            "",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_sorted() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(
            catalog.names(),
            vec![
                "classify",
                "code-review",
                "extract-entities",
                "security-audit",
                "summarize"
            ]
        );
    }

    #[test]
    fn test_resolve() {
        let catalog = PresetCatalog::default();
        let preset = catalog.resolve("code-review").unwrap();
        assert!(preset.instructions.contains("code snippet"));
        assert!(!preset.review_instructions.is_empty());

        // Single-round preset
        assert!(catalog.resolve("extract-entities").unwrap().review_instructions.is_empty());
    }

    #[test]
    fn test_resolve_unknown() {
        let err = PresetCatalog::empty().resolve("nonexistent-name").unwrap_err();
        assert!(matches!(err, PanelError::PresetNotFound(ref n) if n == "nonexistent-name"));
    }

    #[test]
    fn test_merge_json_overrides_and_adds() {
        let mut catalog = PresetCatalog::builtin();
        let added = catalog
            .merge_json(
                r#"{
                    "summarize": {"instructions": "One line each."},
                    "translate": {"instructions": "Translate to French.", "review_instructions": "Check grammar."}
                }"#,
            )
            .unwrap();

        assert_eq!(added, 2);
        assert_eq!(catalog.len(), 6);

        let summarize = catalog.resolve("summarize").unwrap();
        assert_eq!(summarize.instructions, "One line each.");
        assert_eq!(summarize.review_instructions, "");
        assert_eq!(catalog.resolve("translate").unwrap().review_instructions, "Check grammar.");
    }

    #[test]
    fn test_merge_json_rejects_bad_shape() {
        let mut catalog = PresetCatalog::empty();
        assert!(catalog.merge_json(r#"["not", "a", "map"]"#).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = PresetCatalog::empty()
            .load_file("/nonexistent/taskpanel/presets.json")
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_with_preset() {
        let catalog = PresetCatalog::empty().with_preset(Preset::new("p", "do", "check"));
        assert_eq!(catalog.names(), vec!["p"]);
    }
}
