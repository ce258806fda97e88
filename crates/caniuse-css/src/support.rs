//! Support classification for dataset status codes.
//!
//! A caniuse status is a space-separated list of flags:
//! - `y` supported, `a` partial support, `n` not supported
//! - `p` polyfill, `u` unknown, `d` disabled by default
//! - `x` requires a vendor prefix
//! - `#N` refers to note N
//!
//! Which of these count as "supported" depends on the caller, so the rule is
//! a [`SupportPolicy`] chosen by configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decides whether a status code counts as support
pub trait SupportPolicy: Send + Sync + fmt::Debug {
    /// Short name used in configuration and logs
    fn name(&self) -> &'static str;

    /// Whether `status` counts as supported
    fn is_supported(&self, status: &str) -> bool;
}

/// Supported iff the status has the `y` flag
#[derive(Debug, Clone, Copy, Default)]
pub struct FullSupport;

/// Supported iff the status has the `y` or `a` flag
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialSupport;

/// Like [`FullSupport`], but prefixed support (`x`) does not count
#[derive(Debug, Clone, Copy, Default)]
pub struct Unprefixed;

impl SupportPolicy for FullSupport {
    fn name(&self) -> &'static str {
        "full"
    }

    fn is_supported(&self, status: &str) -> bool {
        has_flag(status, "y")
    }
}

impl SupportPolicy for PartialSupport {
    fn name(&self) -> &'static str {
        "partial"
    }

    fn is_supported(&self, status: &str) -> bool {
        has_flag(status, "y") || has_flag(status, "a")
    }
}

impl SupportPolicy for Unprefixed {
    fn name(&self) -> &'static str {
        "unprefixed"
    }

    fn is_supported(&self, status: &str) -> bool {
        has_flag(status, "y") && !has_flag(status, "x")
    }
}

fn has_flag(status: &str, flag: &str) -> bool {
    status.split_whitespace().any(|f| f == flag)
}

/// Configurable policy selector
///
/// Deserializes through [`FromStr`], so configuration files accept the same
/// spellings as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PolicyKind {
    #[default]
    Full,
    Partial,
    Unprefixed,
}

impl PolicyKind {
    /// Instantiate the selected policy
    pub fn build(self) -> Box<dyn SupportPolicy> {
        match self {
            PolicyKind::Full => Box::new(FullSupport),
            PolicyKind::Partial => Box::new(PartialSupport),
            PolicyKind::Unprefixed => Box::new(Unprefixed),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(PolicyKind::Full),
            "partial" => Ok(PolicyKind::Partial),
            "unprefixed" => Ok(PolicyKind::Unprefixed),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for PolicyKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
