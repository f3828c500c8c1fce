//! Key patterns with a single numeric placeholder.
//!
//! Care-after payloads carry one key per child, e.g. `kind-3-nahrung`. The
//! allow-list expresses those as `kind-{id}-nahrung`, where `{id}` stands for
//! one or more ASCII decimal digits. Matching is anchored at both ends.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, Result};

/// Placeholder token standing for one or more decimal digits.
pub const ID_PLACEHOLDER: &str = "{id}";

/// A compiled allow-list pattern such as `kind-{id}-nahrung`.
#[derive(Debug, Clone)]
pub struct DynamicPattern {
    source: String,
    regex: Regex,
}

impl DynamicPattern {
    /// Compile a pattern. It must contain exactly one [`ID_PLACEHOLDER`].
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let source = pattern.into();
        let parts: Vec<&str> = source.split(ID_PLACEHOLDER).collect();
        if parts.len() != 2 {
            return Err(ModelError::InvalidPattern {
                reason: format!(
                    "expected exactly one {ID_PLACEHOLDER} placeholder, found {}",
                    parts.len() - 1
                ),
                pattern: source,
            });
        }
        // [0-9] rather than \d: \d also matches non-ASCII digits.
        let expr = format!(
            "^{}[0-9]+{}$",
            regex::escape(parts[0]),
            regex::escape(parts[1])
        );
        let regex = Regex::new(&expr).map_err(|error| ModelError::InvalidPattern {
            pattern: source.clone(),
            reason: error.to_string(),
        })?;
        Ok(Self { source, regex })
    }

    /// Full-string match of `key` against this pattern.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Match `key` against an uncompiled `pattern`.
///
/// Fails closed: a malformed pattern never matches.
pub fn matches(key: &str, pattern: &str) -> bool {
    DynamicPattern::new(pattern)
        .map(|compiled| compiled.matches(key))
        .unwrap_or(false)
}

impl PartialEq for DynamicPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for DynamicPattern {}

impl fmt::Display for DynamicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for DynamicPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for DynamicPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::new(source).map_err(serde::de::Error::custom)
    }
}
