//! Engine configuration.
//!
//! Loaded from YAML; every field has a default, so an empty file is a valid
//! configuration:
//!
//! ```yaml
//! dataset_path: data/caniuse-data.json
//! support_policy: full        # full | partial | unprefixed
//! gram_size_lower: 2
//! gram_size_upper: 3
//! use_levenshtein: true
//! min_score: 0.33
//! max_suggestions: 5          # 0 = unlimited
//! ```

use crate::error::ConfigError;
use crate::similarity::SimilarityConfig;
use crate::support::PolicyKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default dataset location, relative to the working directory
pub const DEFAULT_DATASET_PATH: &str = "data/caniuse-data.json";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to the caniuse JSON dataset
    pub dataset_path: PathBuf,

    /// Which status codes count as support
    pub support_policy: PolicyKind,

    // === Fuzzy matching ===

    pub gram_size_lower: usize,
    pub gram_size_upper: usize,
    pub use_levenshtein: bool,
    pub min_score: f64,

    /// Longest suggestion list returned on a miss (0 = unlimited)
    pub max_suggestions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let similarity = SimilarityConfig::default();
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            support_policy: PolicyKind::Full,
            gram_size_lower: similarity.gram_size_lower,
            gram_size_upper: similarity.gram_size_upper,
            use_levenshtein: similarity.use_levenshtein,
            min_score: similarity.min_score,
            max_suggestions: 5,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded engine configuration");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = if yaml.trim().is_empty() {
            EngineConfig::default()
        } else {
            let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
            // Surface a bad policy name as itself, not as a generic parse error
            if let Some(policy) = value.get("support_policy").and_then(serde_yaml::Value::as_str) {
                policy.parse::<PolicyKind>()?;
            }
            serde_yaml::from_value(value)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gram_size_lower == 0 {
            return Err(ConfigError::Invalid("gram_size_lower must be at least 1".to_string()));
        }
        if self.gram_size_upper < self.gram_size_lower {
            return Err(ConfigError::Invalid(format!(
                "gram_size_upper ({}) is below gram_size_lower ({})",
                self.gram_size_upper, self.gram_size_lower
            )));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(ConfigError::Invalid(format!(
                "min_score must be within [0, 1], got {}",
                self.min_score
            )));
        }
        Ok(())
    }

    /// Similarity settings for [`crate::SimilarityIndex::build`]
    pub fn similarity(&self) -> SimilarityConfig {
        SimilarityConfig {
            gram_size_lower: self.gram_size_lower,
            gram_size_upper: self.gram_size_upper,
            use_levenshtein: self.use_levenshtein,
            min_score: self.min_score,
        }
    }
}
