//! Canonical upstream commit of a provenance record
//!
//! Each original path contributes at most one candidate: the first commit of
//! its rename-following history that either is the already recorded commit or
//! is not excluded. Several candidates are reduced to the newest one with the
//! ancestry-aware comparator.

use crate::artifacts::history::comparator::CommitComparator;
use crate::artifacts::history::entry::CommitCandidate;
use crate::artifacts::history::exclusion::ExclusionSet;
use crate::artifacts::history::provider::HistoryProvider;
use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::provenance::record::{ProvenanceRecord, RecordedHash};
use crate::artifacts::provenance::state::ResolvedState;
use tracing::debug;

pub struct ProvenanceResolver<'p, P>
where
    P: HistoryProvider + ?Sized,
{
    provider: &'p P,
    exclusions: &'p ExclusionSet,
}

impl<'p, P> ProvenanceResolver<'p, P>
where
    P: HistoryProvider + ?Sized,
{
    pub fn new(provider: &'p P, exclusions: &'p ExclusionSet) -> Self {
        Self {
            provider,
            exclusions,
        }
    }

    pub fn resolve(&self, record: &ProvenanceRecord) -> anyhow::Result<ResolvedState> {
        if !record.is_tracked() {
            return Ok(ResolvedState::NotTracked);
        }

        let Some(resolved) = self.canonical_hash(record)? else {
            return Ok(ResolvedState::Unresolvable);
        };

        Ok(match record.recorded_hash() {
            Some(recorded) if recorded.matches(&resolved) => ResolvedState::Current(resolved),
            recorded => ResolvedState::Stale {
                recorded: recorded.cloned(),
                resolved,
            },
        })
    }

    /// The resolved hash, computed once per record instance
    pub fn canonical_hash(&self, record: &ProvenanceRecord) -> anyhow::Result<Option<CommitId>> {
        if let Some(cached) = record.resolution().get() {
            return Ok(cached.clone());
        }

        let resolved = self.compute(record)?;
        Ok(record.resolution().get_or_init(|| resolved).clone())
    }

    fn compute(&self, record: &ProvenanceRecord) -> anyhow::Result<Option<CommitId>> {
        let mut candidates = Vec::new();

        for original_path in record.original_paths() {
            if !self.provider.contains_path(original_path) {
                debug!(
                    tracked = %record.tracked_path().display(),
                    original = %original_path,
                    "original path missing upstream"
                );
                return Ok(None);
            }

            if let Some(candidate) = self.first_candidate(original_path, record.recorded_hash())? {
                debug!(
                    original = %original_path,
                    commit = %candidate.commit,
                    "candidate selected"
                );
                candidates.push(candidate);
            }
        }

        let newest = match candidates.len() {
            0 => None,
            1 => candidates.pop(),
            _ => CommitComparator::new(self.provider).newest(candidates)?,
        };

        Ok(newest.map(|candidate| candidate.commit))
    }

    /// Walks newest first and stops at the first qualifying commit
    fn first_candidate(
        &self,
        original_path: &str,
        recorded: Option<&RecordedHash>,
    ) -> anyhow::Result<Option<CommitCandidate>> {
        for entry in self.provider.list_history(original_path, None)? {
            let entry = entry?;
            let commit = entry.commit.to_short();

            let pinned = recorded.is_some_and(|recorded| recorded.matches(&commit));
            if pinned || !self.exclusions.contains(&commit) {
                return Ok(Some(CommitCandidate::new(
                    entry.timestamp,
                    commit,
                    original_path.to_string(),
                )));
            }

            debug!(commit = %commit, original = %original_path, "skipping excluded commit");
        }

        Ok(None)
    }
}
