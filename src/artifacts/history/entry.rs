use crate::artifacts::objects::commit_id::CommitId;
use derive_new::new;

/// One line of a file's rename-following history
///
/// `path` is the name the file had in that commit, which differs from the
/// queried path on the far side of a rename.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct HistoryEntry {
    pub timestamp: i64,
    pub commit: CommitId,
    pub path: String,
}

/// A commit selected as "current" for one tracked upstream path
///
/// Produced transiently while resolving a provenance record.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct CommitCandidate {
    pub timestamp: i64,
    pub commit: CommitId,
    pub original_path: String,
}

/// A `from..to` revision range, as understood by `git log`
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RevisionRange {
    from: CommitId,
    to: CommitId,
}

impl std::fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}
