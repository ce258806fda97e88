//! Dataset loading for caniuse-css.
//!
//! Reads a caniuse-style JSON file:
//! - `data`: attribute name → `{ title, stats: { browser: { version: status } } }`
//! - `agents` (optional): browser table, only its keys are kept
//! - `updated` (optional): dataset timestamp
//!
//! Entries are kept as raw JSON and decoded on lookup, so one malformed entry
//! never fails the whole dataset.

use crate::error::{DatasetError, EntryError};
use serde_json::{Map, Value};
use std::path::Path;

/// Immutable attribute index built from a dataset file
#[derive(Debug, Clone)]
pub struct Index {
    entries: Map<String, Value>,
    meta: DatasetMeta,
}

/// Top-level dataset metadata, kept for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetMeta {
    /// `updated` timestamp, if the dataset carries one
    pub updated: Option<i64>,
    /// Browser identifiers listed under `agents`
    pub agents: Vec<String>,
}

/// Decoded dataset entry for a single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeEntry {
    pub title: Option<String>,
    /// Per-browser stats, in dataset order
    pub stats: Vec<BrowserStats>,
}

/// Version → status table for one browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserStats {
    pub browser: String,
    /// `(version key, status code)` pairs, in dataset order
    pub versions: Vec<(String, String)>,
}

impl Index {
    /// Load and index a dataset from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::from_json(&content)?;

        tracing::info!(
            path = %path.display(),
            entries = index.len(),
            updated = ?index.meta.updated,
            "loaded compatibility dataset"
        );
        Ok(index)
    }

    /// Index a dataset from JSON text
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Index an already-parsed dataset value
    pub fn from_value(value: Value) -> Result<Self, DatasetError> {
        let Value::Object(mut root) = value else {
            return Err(DatasetError::InvalidData("top-level value is not an object".to_string()));
        };

        let entries = match root.remove("data") {
            Some(Value::Object(entries)) => entries,
            Some(_) => {
                return Err(DatasetError::InvalidData("`data` is not an object".to_string()));
            }
            None => return Err(DatasetError::MissingData),
        };

        let meta = DatasetMeta {
            updated: root.get("updated").and_then(Value::as_i64),
            agents: root
                .get("agents")
                .and_then(Value::as_object)
                .map(|agents| agents.keys().cloned().collect())
                .unwrap_or_default(),
        };

        Ok(Index { entries, meta })
    }

    /// Attribute names, in dataset order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact, case-sensitive membership test
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Raw dataset value for `name`
    pub fn raw_entry(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Decoded entry for `name`; `None` when the attribute is unknown
    pub fn entry(&self, name: &str) -> Option<Result<AttributeEntry, EntryError>> {
        self.raw_entry(name).map(AttributeEntry::decode)
    }

    /// Human-readable title of an attribute, if the dataset has one
    pub fn title(&self, name: &str) -> Option<&str> {
        self.raw_entry(name)?.get("title")?.as_str()
    }

    pub fn meta(&self) -> &DatasetMeta {
        &self.meta
    }
}

impl AttributeEntry {
    /// Decode a raw dataset value.
    ///
    /// Status values may be strings or arrays of strings (joined with a
    /// space); anything else is rejected.
    pub fn decode(value: &Value) -> Result<Self, EntryError> {
        let object = value.as_object().ok_or(EntryError::NotAnObject)?;
        let title = object.get("title").and_then(Value::as_str).map(str::to_string);
        let stats = object
            .get("stats")
            .and_then(Value::as_object)
            .ok_or(EntryError::MissingStats)?;

        let mut decoded = Vec::with_capacity(stats.len());
        for (browser, table) in stats {
            let table = table.as_object().ok_or_else(|| EntryError::InvalidBrowserStats {
                browser: browser.clone(),
            })?;

            let mut versions = Vec::with_capacity(table.len());
            for (version, status) in table {
                let status = decode_status(status).ok_or_else(|| EntryError::InvalidStatus {
                    browser: browser.clone(),
                    version: version.clone(),
                })?;
                versions.push((version.clone(), status));
            }

            decoded.push(BrowserStats { browser: browser.clone(), versions });
        }

        Ok(AttributeEntry { title, stats: decoded })
    }
}

fn decode_status(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let parts: Option<Vec<&str>> = parts.iter().map(Value::as_str).collect();
            Some(parts?.join(" "))
        }
        _ => None,
    }
}
