//! Engine configuration.
//!
//! Loaded from TOML with camelCase keys:
//!
//! ```toml
//! managedContentTypeIds = ["page", "landingPage"]
//! debounceIntervalMs = 250
//! maxDisambiguationAttempts = 998
//! localeMode = "single"
//! cascadeToChildren = true
//!
//! [fieldMapping]
//! slug = "urlSegment"
//! ```

use crate::{PathError, PathResult};
use serde::{Deserialize, Serialize};
use slugtree_model::FieldMapping;
use slugtree_types::ContentTypeId;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

/// How paths relate to locales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocaleMode {
    /// One path shared by every locale.
    #[default]
    Single,
    /// A separate path per locale. Accepted by the parser, rejected by validation.
    PerLocale,
}

/// Configuration for the path engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Content types that take part in path resolution.
    pub managed_content_type_ids: BTreeSet<ContentTypeId>,
    /// Quiet period before a scheduled recompute runs (ms).
    pub debounce_interval_ms: u64,
    /// Numbered suffixes tried after the base segment (`base-2` onwards).
    pub max_disambiguation_attempts: u32,
    pub locale_mode: LocaleMode,
    /// Recompute managed children after an entry's full path changes.
    pub cascade_to_children: bool,
    pub field_mapping: FieldMapping,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            managed_content_type_ids: BTreeSet::new(),
            debounce_interval_ms: 250,
            max_disambiguation_attempts: 998,
            locale_mode: LocaleMode::Single,
            cascade_to_children: true,
            field_mapping: FieldMapping::default(),
        }
    }
}

impl EngineConfig {
    /// Default configuration managing the given content types.
    pub fn with_managed_types(types: impl IntoIterator<Item = ContentTypeId>) -> Self {
        Self {
            managed_content_type_ids: types.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> PathResult<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| PathError::Config(format!("failed to parse: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> PathResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PathError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> PathResult<String> {
        toml::to_string_pretty(self).map_err(|e| PathError::Config(e.to_string()))
    }

    pub fn validate(&self) -> PathResult<()> {
        if self.managed_content_type_ids.is_empty() {
            return Err(PathError::Config(
                "managedContentTypeIds must name at least one content type".into(),
            ));
        }
        if self.max_disambiguation_attempts == 0 {
            return Err(PathError::Config(
                "maxDisambiguationAttempts must be at least 1".into(),
            ));
        }
        if self.locale_mode == LocaleMode::PerLocale {
            return Err(PathError::Config(
                "localeMode 'per-locale' is not supported".into(),
            ));
        }
        let dupes = self.field_mapping.duplicate_ids();
        if !dupes.is_empty() {
            return Err(PathError::Config(format!(
                "fieldMapping maps several fields to: {}",
                dupes.join(", ")
            )));
        }
        Ok(())
    }

    pub fn is_managed(&self, content_type: &ContentTypeId) -> bool {
        self.managed_content_type_ids.contains(content_type)
    }

    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_interval_ms)
    }
}
