//! Browser matrix for compatibility lookups.
//!
//! Every lookup reports against the same closed set of browsers, in the
//! canonical order below. A [`CompatibilityRecord`] always carries a value for
//! each of them; browsers the dataset says nothing about read as
//! [`UNSUPPORTED`].

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// Version value for "not supported / unknown".
pub const UNSUPPORTED: i32 = -1;

/// A browser identifier as used by the caniuse dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Browser {
    AndroidChrome,
    AndroidUc,
    Android,
    Chrome,
    Edge,
    Firefox,
    Ie,
    IeMobile,
    IosSafari,
    OperaMini,
    Opera,
    Safari,
    Samsung,
}

impl Browser {
    /// Number of browsers in the matrix
    pub const COUNT: usize = 13;

    /// All browsers, in canonical order
    pub const ALL: [Browser; Browser::COUNT] = [
        Browser::AndroidChrome,
        Browser::AndroidUc,
        Browser::Android,
        Browser::Chrome,
        Browser::Edge,
        Browser::Firefox,
        Browser::Ie,
        Browser::IeMobile,
        Browser::IosSafari,
        Browser::OperaMini,
        Browser::Opera,
        Browser::Safari,
        Browser::Samsung,
    ];

    /// Dataset identifier (e.g. `"and_chr"`)
    pub fn id(self) -> &'static str {
        match self {
            Browser::AndroidChrome => "and_chr",
            Browser::AndroidUc => "and_uc",
            Browser::Android => "android",
            Browser::Chrome => "chrome",
            Browser::Edge => "edge",
            Browser::Firefox => "firefox",
            Browser::Ie => "ie",
            Browser::IeMobile => "ie_mob",
            Browser::IosSafari => "ios_saf",
            Browser::OperaMini => "op_mini",
            Browser::Opera => "opera",
            Browser::Safari => "safari",
            Browser::Samsung => "samsung",
        }
    }

    /// Look up a browser by its dataset identifier.
    ///
    /// Returns `None` for identifiers outside the matrix (the dataset also
    /// lists browsers such as `kaios` that lookups do not report on).
    pub fn from_id(id: &str) -> Option<Browser> {
        Browser::ALL.iter().copied().find(|b| b.id() == id)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for Browser {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Minimum supporting version for every browser in the matrix.
///
/// Constructed fresh for each lookup and never shared between lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompatibilityRecord {
    versions: [i32; Browser::COUNT],
}

impl CompatibilityRecord {
    /// A record with every browser at [`UNSUPPORTED`]
    pub fn new() -> Self {
        Self { versions: [UNSUPPORTED; Browser::COUNT] }
    }

    /// Minimum supporting version for `browser`, or [`UNSUPPORTED`]
    pub fn get(&self, browser: Browser) -> i32 {
        self.versions[browser.slot()]
    }

    pub(crate) fn set(&mut self, browser: Browser, version: i32) {
        self.versions[browser.slot()] = version;
    }

    /// Iterate `(browser, version)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Browser, i32)> + '_ {
        Browser::ALL.iter().map(move |&b| (b, self.get(b)))
    }

    /// Browsers with a known supporting version
    pub fn supported_browsers(&self) -> Vec<Browser> {
        self.iter()
            .filter(|(_, version)| *version != UNSUPPORTED)
            .map(|(browser, _)| browser)
            .collect()
    }

    /// True when no browser reports support.
    ///
    /// This is still a found record: callers that need to tell "exists but
    /// unsupported everywhere" apart from "unknown attribute" check the
    /// resolution, not this flag.
    pub fn is_unsupported_everywhere(&self) -> bool {
        self.versions.iter().all(|&v| v == UNSUPPORTED)
    }
}

impl Default for CompatibilityRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for CompatibilityRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Browser::COUNT))?;
        for (browser, version) in self.iter() {
            map.serialize_entry(browser.id(), &version)?;
        }
        map.end()
    }
}
