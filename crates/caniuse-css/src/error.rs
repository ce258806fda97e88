//! Error types for dataset loading, configuration and engine startup
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the compatibility dataset. Fatal to initialization.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("DATASET/IO: cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("DATASET/PARSE: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("DATASET/SCHEMA: missing top-level `data` section")]
    MissingData,

    #[error("DATASET/SCHEMA: {0}")]
    InvalidData(String),
}

/// Failure to decode a single dataset entry.
///
/// Never surfaced to the host: the resolver turns it into a miss.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry is not an object")]
    NotAnObject,

    #[error("entry has no `stats` object")]
    MissingStats,

    #[error("stats for `{browser}` are not an object")]
    InvalidBrowserStats { browser: String },

    #[error("status for `{browser}` {version} is not a string")]
    InvalidStatus { browser: String, version: String },
}

/// Failure to load or validate engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CONFIG/IO: cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CONFIG/PARSE: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("CONFIG/POLICY: unknown support policy `{0}` (expected full, partial or unprefixed)")]
    UnknownPolicy(String),

    #[error("CONFIG/INVALID: {0}")]
    Invalid(String),
}

/// Failure to start an engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
