use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::provenance::record::RecordedHash;
use std::fmt;

/// Outcome of resolving a record against upstream history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedState {
    /// Recorded hash matches the resolved one
    Current(CommitId),
    /// Upstream moved on since the last review
    Stale {
        recorded: Option<RecordedHash>,
        resolved: CommitId,
    },
    /// No candidate commit: an original file is gone or its history is fully excluded
    Unresolvable,
    NotTracked,
}

impl ResolvedState {
    pub fn resolved_hash(&self) -> Option<&CommitId> {
        match self {
            ResolvedState::Current(resolved) | ResolvedState::Stale { resolved, .. } => {
                Some(resolved)
            }
            ResolvedState::Unresolvable | ResolvedState::NotTracked => None,
        }
    }

    /// Nothing to review; not-tracked files always count as current
    pub fn is_current(&self) -> bool {
        matches!(self, ResolvedState::Current(_) | ResolvedState::NotTracked)
    }
}

impl fmt::Display for ResolvedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedState::Current(hash) => write!(f, "current at {hash}"),
            ResolvedState::Stale {
                recorded: Some(recorded),
                resolved,
            } => write!(f, "{recorded}..{resolved}"),
            ResolvedState::Stale {
                recorded: None,
                resolved,
            } => write!(f, "never validated, upstream at {resolved}"),
            ResolvedState::Unresolvable => write!(f, "unresolvable"),
            ResolvedState::NotTracked => write!(f, "not tracked"),
        }
    }
}
