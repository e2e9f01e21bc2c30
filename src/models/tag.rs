//! Clan and player tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `#`-prefixed clan or player tag.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClanTag(String);

impl ClanTag {
    /// Normalize user input into a tag.
    ///
    /// Trims whitespace, upper-cases, and adds the leading `#` when missing.
    /// Returns `None` for empty input.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().to_uppercase();
        let body = trimmed.trim_start_matches('#');
        if body.is_empty() {
            return None;
        }
        Some(Self(format!("#{}", body)))
    }

    /// Parse a tag that must already carry the `#` prefix.
    pub fn parse_strict(raw: &str) -> Option<Self> {
        if !raw.starts_with('#') {
            return None;
        }
        Self::normalize(raw)
    }

    /// Percent-encoded form for upstream URL paths (`#ABC` -> `%23ABC`).
    pub fn path_segment(&self) -> String {
        format!("%23{}", &self.0[1..])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ClanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClanTag({})", self.0)
    }
}
