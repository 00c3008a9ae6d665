//! Commit identifiers
//!
//! Ids show up abbreviated on either side of a comparison: records store a
//! 12 character short hash, exclusion lists store whatever was pasted into
//! them, and `git log` emits the full 40 character hash. Two ids name the same
//! commit when the shorter one is a case-insensitive prefix of the longer one.
//!
//! ## Format
//!
//! - Full: 40 hex characters (e.g., "abc123...def")
//! - Short: first 12 characters, as written into provenance records

use crate::artifacts::objects::{COMMIT_ID_LENGTH, SHORT_COMMIT_ID_LENGTH};

/// A possibly abbreviated commit hash, stored lower-cased
///
/// `PartialEq`/`Hash` compare the exact text, which is what deduplication of
/// full hashes needs. Use [`CommitId::matches`] when either side may be
/// abbreviated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitId(String);

impl CommitId {
    /// Parse and validate a commit id
    ///
    /// # Arguments
    ///
    /// * `id` - 1 to 40 hexadecimal characters, any case
    ///
    /// # Returns
    ///
    /// Validated CommitId or error if invalid length/characters
    pub fn try_parse(id: impl Into<String>) -> anyhow::Result<Self> {
        let id = id.into();
        if id.is_empty() || id.len() > COMMIT_ID_LENGTH {
            anyhow::bail!("Invalid commit ID length: {}", id.len());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("Invalid commit ID characters: {}", id);
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Prefix-insensitive, case-insensitive equality
    pub fn matches(&self, other: &CommitId) -> bool {
        hashes_equal(&self.0, &other.0)
    }

    /// Abbreviate to the short form stored in provenance records
    pub fn to_short(&self) -> CommitId {
        CommitId(self.0.chars().take(SHORT_COMMIT_ID_LENGTH).collect())
    }
}

/// Compare two hashes ignoring length and case
///
/// Only the first `min(len(a), len(b))` characters are compared, so either
/// side may be a short form of the other.
pub fn hashes_equal(a: &str, b: &str) -> bool {
    let len = a.len().min(b.len());
    a.as_bytes()[..len].eq_ignore_ascii_case(&b.as_bytes()[..len])
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
