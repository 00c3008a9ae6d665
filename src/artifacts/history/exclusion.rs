//! Commits skipped during resolution and history display
//!
//! The exclusion file holds one commit per line; only the first
//! whitespace-delimited token of a line is used, so the rest of the line can
//! carry a note about why the commit is noise.

use crate::artifacts::objects::commit_id::CommitId;
use anyhow::Context;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    prefixes: Vec<CommitId>,
}

impl ExclusionSet {
    pub fn new(prefixes: Vec<CommitId>) -> Self {
        Self { prefixes }
    }

    /// Load the exclusion file, or an empty set when it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no exclusion file, nothing excluded");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read exclusion file {:?}", path))?;
        let exclusions = Self::parse(&content);
        tracing::debug!(
            path = %path.display(),
            count = exclusions.len(),
            "loaded excluded commits"
        );

        Ok(exclusions)
    }

    pub fn parse(content: &str) -> Self {
        let prefixes = content
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .filter_map(|token| match CommitId::try_parse(token) {
                Ok(commit) => Some(commit),
                Err(e) => {
                    tracing::warn!("ignoring exclusion entry {token:?}: {e}");
                    None
                }
            })
            .collect();

        Self { prefixes }
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether `commit` matches any stored prefix, in either direction
    pub fn contains(&self, commit: &CommitId) -> bool {
        self.prefixes.iter().any(|prefix| prefix.matches(commit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::{FileWriteStr, PathChild};
    use pretty_assertions::assert_eq;

    fn commit(id: &str) -> CommitId {
        CommitId::try_parse(id).unwrap()
    }

    #[test]
    fn parse_uses_first_token_of_each_line() {
        let exclusions = ExclusionSet::parse(
            "abc123 reformat everything\n\n  def456\t# typo fix\n",
        );

        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.contains(&commit("abc123")));
        assert!(exclusions.contains(&commit("def456")));
    }

    #[test]
    fn parse_skips_tokens_that_are_not_hashes() {
        let exclusions = ExclusionSet::parse("# comment line\nabc123\n");

        assert_eq!(exclusions.len(), 1);
    }

    #[test]
    fn short_entry_excludes_full_hash() {
        let exclusions = ExclusionSet::new(vec![commit("ABC123")]);

        assert!(exclusions.contains(&commit("abc123def4567890abc123def4567890abc123de")));
    }

    #[test]
    fn full_entry_excludes_short_hash() {
        let exclusions =
            ExclusionSet::new(vec![commit("abc123def4567890abc123def4567890abc123de")]);

        assert!(exclusions.contains(&commit("abc123def456")));
        assert!(!exclusions.contains(&commit("abc124")));
    }

    #[test]
    fn load_missing_file_is_empty() -> anyhow::Result<()> {
        let dir = TempDir::new()?;

        let exclusions = ExclusionSet::load(&dir.path().join("missing.txt"))?;

        assert!(exclusions.is_empty());
        Ok(())
    }

    #[test]
    fn load_reads_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let file = dir.child("exclude.txt");
        file.write_str("111aaa whitespace only\n222bbb\n")?;

        let exclusions = ExclusionSet::load(file.path())?;

        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.contains(&commit("222bbb")));
        Ok(())
    }
}
