//! Compatibility resolution for caniuse-css.
//!
//! Looks an attribute up in the [`Index`] and folds its per-version status
//! table into a [`CompatibilityRecord`]: for each browser, the lowest version
//! the [`SupportPolicy`] accepts.

use crate::browser::{Browser, CompatibilityRecord};
use crate::dataset::{AttributeEntry, Index};
use crate::support::{FullSupport, SupportPolicy};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    /// Leading major version of a version key ("15.2-15.3" → 15)
    static ref VERSION_KEY: Regex = Regex::new(r"^\s*(\d+)").unwrap();
}

/// Result of resolving a candidate against the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The attribute exists; every browser is present in the record
    Found(CompatibilityRecord),
    /// The attribute is unknown, or its entry could not be decoded
    Miss,
}

impl Resolution {
    pub fn is_miss(&self) -> bool {
        matches!(self, Resolution::Miss)
    }

    pub fn record(&self) -> Option<&CompatibilityRecord> {
        match self {
            Resolution::Found(record) => Some(record),
            Resolution::Miss => None,
        }
    }
}

/// First version in which a status code was observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusFirstSeen {
    pub status: String,
    pub browser: String,
    pub version: String,
}

/// Per-status first sightings for one attribute, in dataset order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub attribute: String,
    pub statuses: Vec<StatusFirstSeen>,
}

/// Resolve `candidate` using the [`FullSupport`] policy
pub fn resolve(candidate: &str, index: &Index) -> Resolution {
    resolve_with(candidate, index, &FullSupport)
}

/// Resolve `candidate` with an explicit support policy.
///
/// The lookup is exact and case-sensitive.
pub fn resolve_with(candidate: &str, index: &Index, policy: &dyn SupportPolicy) -> Resolution {
    match index.entry(candidate) {
        None => Resolution::Miss,
        Some(Err(err)) => {
            tracing::warn!(attribute = candidate, error = %err, "dataset entry failed to decode");
            Resolution::Miss
        }
        Some(Ok(entry)) => Resolution::Found(earliest_support(&entry, policy)),
    }
}

/// Fold an entry into a fresh record
pub(crate) fn earliest_support(entry: &AttributeEntry, policy: &dyn SupportPolicy) -> CompatibilityRecord {
    let mut record = CompatibilityRecord::new();

    for stats in &entry.stats {
        let Some(browser) = Browser::from_id(&stats.browser) else {
            continue;
        };

        let earliest = stats
            .versions
            .iter()
            .filter(|(_, status)| policy.is_supported(status))
            .filter_map(|(version, _)| parse_version(version))
            .min();

        if let Some(version) = earliest {
            record.set(browser, version);
        }
    }

    record
}

/// Parse the major version out of a dataset version key.
///
/// `"all"` (Opera Mini) is version 0; keys without a leading number such as
/// `"TP"` have no version.
pub fn parse_version(key: &str) -> Option<i32> {
    if key.trim().eq_ignore_ascii_case("all") {
        return Some(0);
    }
    VERSION_KEY.captures(key)?.get(1)?.as_str().parse().ok()
}

/// Map each distinct status code to the first version it appears in.
///
/// Returns `None` when the attribute is unknown or its entry is malformed.
pub fn status_summary(candidate: &str, index: &Index) -> Option<StatusSummary> {
    let entry = index.entry(candidate)?.ok()?;
    let mut statuses: Vec<StatusFirstSeen> = Vec::new();

    for stats in &entry.stats {
        for (version, status) in &stats.versions {
            if statuses.iter().any(|s| &s.status == status) {
                continue;
            }
            statuses.push(StatusFirstSeen {
                status: status.clone(),
                browser: stats.browser.clone(),
                version: version.clone(),
            });
        }
    }

    Some(StatusSummary { attribute: candidate.to_string(), statuses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::UNSUPPORTED;
    use crate::support::{PartialSupport, Unprefixed};
    use serde_json::json;

    fn test_index() -> Index {
        Index::from_value(json!({
            "data": {
                "flex-wrap": {
                    "title": "Flexbox wrap",
                    "stats": {
                        "chrome": { "4": "n", "28": "n", "29": "y", "120": "y" },
                        "firefox": { "27": "n", "28": "y" },
                        "ie": { "10": "n", "11": "n" }
                    }
                },
                "user-select": {
                    "stats": {
                        "safari": { "3.1": "y x", "15.4-15.5": "y x", "16": "y" },
                        "ios_saf": { "3.2": "y x" },
                        "op_mini": { "all": "n" },
                        "and_chr": { "120": "a #1" },
                        "kaios": { "2.5": "y" }
                    }
                },
                "dead-property": {
                    "stats": {
                        "chrome": { "4": "n" }
                    }
                },
                "broken": { "stats": "oops" }
            }
        })).unwrap()
    }

    #[test]
    fn test_resolve_earliest_supporting_version() {
        let index = test_index();
        let record = match resolve("flex-wrap", &index) {
            Resolution::Found(record) => record,
            Resolution::Miss => panic!("Expected record"),
        };

        assert_eq!(record.get(Browser::Chrome), 29);
        assert_eq!(record.get(Browser::Firefox), 28);
        assert_eq!(record.get(Browser::Ie), UNSUPPORTED);
        assert_eq!(record.get(Browser::Safari), UNSUPPORTED);
    }

    #[test]
    fn test_resolve_fills_every_browser() {
        let index = test_index();
        let resolution = resolve("user-select", &index);
        let record = resolution.record().unwrap();

        assert_eq!(record.iter().count(), Browser::COUNT);
        assert_eq!(record.get(Browser::Safari), 3);
        assert_eq!(record.get(Browser::IosSafari), 3);
        assert_eq!(record.get(Browser::OperaMini), UNSUPPORTED);
        assert_eq!(record.get(Browser::AndroidChrome), UNSUPPORTED);
    }

    #[test]
    fn test_resolve_with_policies() {
        let index = test_index();

        let partial = resolve_with("user-select", &index, &PartialSupport);
        assert_eq!(partial.record().unwrap().get(Browser::AndroidChrome), 120);

        let unprefixed = resolve_with("user-select", &index, &Unprefixed);
        let record = unprefixed.record().unwrap();
        assert_eq!(record.get(Browser::Safari), 16);
        assert_eq!(record.get(Browser::IosSafari), UNSUPPORTED);
    }

    #[test]
    fn test_unknown_attribute_is_miss() {
        let index = test_index();
        assert_eq!(resolve("flexx-wrap", &index), Resolution::Miss);
        assert_eq!(resolve("Flex-Wrap", &index), Resolution::Miss);
        assert_eq!(resolve("", &index), Resolution::Miss);
    }

    #[test]
    fn test_malformed_entry_is_miss() {
        let index = test_index();
        assert!(index.contains("broken"));
        assert!(resolve("broken", &index).is_miss());
    }

    #[test]
    fn test_unsupported_everywhere_is_not_miss() {
        let index = test_index();
        let resolution = resolve("dead-property", &index);

        assert!(!resolution.is_miss());
        assert!(resolution.record().unwrap().is_unsupported_everywhere());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let index = test_index();
        assert_eq!(resolve("flex-wrap", &index), resolve("flex-wrap", &index));
        assert_eq!(resolve("user-select", &index), resolve("user-select", &index));
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("29"), Some(29));
        assert_eq!(parse_version("3.1"), Some(3));
        assert_eq!(parse_version("15.2-15.3"), Some(15));
        assert_eq!(parse_version("all"), Some(0));
        assert_eq!(parse_version("TP"), None);
        assert_eq!(parse_version(""), None);
        assert_eq!(parse_version("99999999999"), None);
    }

    #[test]
    fn test_status_summary_first_seen() {
        let index = test_index();
        let summary = status_summary("flex-wrap", &index).unwrap();

        assert_eq!(summary.attribute, "flex-wrap");
        assert_eq!(summary.statuses, vec![
            StatusFirstSeen { status: "n".to_string(), browser: "chrome".to_string(), version: "4".to_string() },
            StatusFirstSeen { status: "y".to_string(), browser: "chrome".to_string(), version: "29".to_string() },
        ]);
    }

    #[test]
    fn test_status_summary_missing() {
        let index = test_index();
        assert!(status_summary("nope", &index).is_none());
        assert!(status_summary("broken", &index).is_none());
    }
}
