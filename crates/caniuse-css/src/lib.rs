//! caniuse-css: CSS attribute compatibility lookup
//!
//! Resolves the attribute on an editor line into a per-browser table of
//! minimum supporting versions and, when the attribute is unknown, offers
//! ranked "did you mean" suggestions.
//!
//! ```text
//! line ──▶ extract_attribute ──▶ candidate
//!                                  │ empty ──▶ Outcome::EmptyInput
//!                                  v
//!                              resolve ──▶ Found ──▶ Outcome::Resolved
//!                                  │
//!                                 Miss ──▶ SimilarityIndex::query ──▶ rank
//!                                                                     │
//!                                                                     v
//!                                                             Outcome::Missed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use caniuse_css::{Browser, Engine, EngineConfig, Outcome};
//!
//! let engine = Engine::load(&EngineConfig::default())?;
//!
//! match engine.lookup("flex-wrap: wrap;") {
//!     Outcome::Resolved { record, .. } => println!("chrome {}", record.get(Browser::Chrome)),
//!     Outcome::Missed { suggestions, .. } => println!("did you mean {:?}", suggestions),
//!     Outcome::EmptyInput => {}
//! }
//! ```

pub mod browser;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod ranker;
pub mod resolver;
pub mod similarity;
pub mod support;

pub use browser::{Browser, CompatibilityRecord, UNSUPPORTED};
pub use config::EngineConfig;
pub use dataset::{AttributeEntry, DatasetMeta, Index};
pub use error::{ConfigError, DatasetError, EngineError, EntryError};
pub use extract::extract_attribute;
pub use ranker::{rank, SuggestionList};
pub use resolver::{resolve, resolve_with, status_summary, Resolution, StatusSummary};
pub use similarity::{SimilarityCandidate, SimilarityConfig, SimilarityIndex};
pub use support::{FullSupport, PartialSupport, PolicyKind, SupportPolicy, Unprefixed};

use serde::Serialize;

/// Outcome of one input event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The line held no attribute; no suggestions are computed
    EmptyInput,
    /// The attribute exists in the dataset
    Resolved {
        attribute: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        record: CompatibilityRecord,
    },
    /// The attribute is unknown; suggestions may be empty
    Missed {
        attribute: String,
        suggestions: SuggestionList,
    },
}

impl Outcome {
    /// The extracted attribute, if any
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Outcome::EmptyInput => None,
            Outcome::Resolved { attribute, .. } | Outcome::Missed { attribute, .. } => Some(attribute),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Resolved { .. })
    }
}

/// Long-lived lookup handle.
///
/// Owns the index, the similarity structure and the support policy. All of
/// them are immutable after construction, so one engine can serve concurrent
/// lookups by shared reference.
#[derive(Debug)]
pub struct Engine {
    index: Index,
    similarity: SimilarityIndex,
    policy: Box<dyn SupportPolicy>,
    max_suggestions: usize,
}

impl Engine {
    /// Validate `config`, load its dataset and build the engine
    pub fn load(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let index = Index::load(&config.dataset_path)?;
        Ok(Self::from_index(index, config)?)
    }

    /// Build the engine over an already-loaded index
    pub fn from_index(index: Index, config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let similarity = SimilarityIndex::build(index.names(), config.similarity());
        let policy = config.support_policy.build();

        tracing::info!(
            attributes = index.len(),
            policy = policy.name(),
            "compatibility engine ready"
        );

        Ok(Engine {
            index,
            similarity,
            policy,
            max_suggestions: config.max_suggestions,
        })
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn policy(&self) -> &dyn SupportPolicy {
        self.policy.as_ref()
    }

    /// Process one editor line
    pub fn lookup(&self, line: &str) -> Outcome {
        let attribute = extract_attribute(line);
        self.lookup_attribute(&attribute)
    }

    /// Process an already-extracted attribute
    pub fn lookup_attribute(&self, attribute: &str) -> Outcome {
        if attribute.is_empty() {
            tracing::debug!("empty input, nothing to resolve");
            return Outcome::EmptyInput;
        }

        match resolve_with(attribute, &self.index, self.policy()) {
            Resolution::Found(record) => {
                tracing::debug!(attribute, "resolved");
                Outcome::Resolved {
                    attribute: attribute.to_string(),
                    title: self.index.title(attribute).map(str::to_string),
                    record,
                }
            }
            Resolution::Miss => {
                let suggestions = self.suggest(attribute);
                tracing::debug!(attribute, suggestions = suggestions.len(), "missed");
                Outcome::Missed {
                    attribute: attribute.to_string(),
                    suggestions,
                }
            }
        }
    }

    /// Ranked suggestions for `candidate`, truncated to `max_suggestions`
    pub fn suggest(&self, candidate: &str) -> SuggestionList {
        let mut suggestions = rank(self.similarity.query(candidate));
        if self.max_suggestions > 0 {
            suggestions.truncate(self.max_suggestions);
        }
        suggestions
    }

    /// Resolve against this engine's index and policy
    pub fn resolve(&self, candidate: &str) -> Resolution {
        resolve_with(candidate, &self.index, self.policy())
    }

    /// First-seen version per status code for `attribute`
    pub fn status_summary(&self, attribute: &str) -> Option<StatusSummary> {
        status_summary(attribute, &self.index)
    }
}
