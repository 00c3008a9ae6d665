//! Ancestry-aware ordering of commit candidates
//!
//! When a record tracks several upstream files, each file yields its own
//! "current" commit and the newest of them wins. "Newest" is decided by the
//! commit graph first and by commit time only when the graph has no opinion:
//!
//! 1. Ids that match (prefix-insensitively) are the same commit
//! 2. If A is an ancestor of B, A is older
//! 3. If B is an ancestor of A, B is older
//! 4. Otherwise the commits are unrelated (divergent branches, or a rename
//!    boundary with no direct lineage) and the commit timestamps decide
//!
//! ## Known limitation
//!
//! Falling back to timestamps for unrelated pairs is not guaranteed to be
//! transitive across three or more commits, so the resulting order is only a
//! best effort. Candidate sets hold one commit per tracked original path and
//! stay tiny, so a full topological sort is not worth it here. Each pair is
//! decided once per run and the decision is reused, which keeps repeated
//! comparisons of the same pair consistent within a sort.

use crate::artifacts::history::entry::CommitCandidate;
use crate::artifacts::history::provider::HistoryProvider;
use crate::artifacts::objects::commit_id::CommitId;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;

pub struct CommitComparator<'p, P>
where
    P: HistoryProvider + ?Sized,
{
    provider: &'p P,
    decisions: RefCell<HashMap<(CommitId, CommitId), Ordering>>,
}

impl<'p, P> CommitComparator<'p, P>
where
    P: HistoryProvider + ?Sized,
{
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            decisions: RefCell::new(HashMap::new()),
        }
    }

    /// Compare two candidates
    ///
    /// # Returns
    ///
    /// `Less` when `a` is older than `b`, `Equal` for the same commit and
    /// `Greater` when `a` is newer. Ancestry is only queried for pairs that
    /// actually get compared.
    pub fn compare(&self, a: &CommitCandidate, b: &CommitCandidate) -> anyhow::Result<Ordering> {
        if a.commit.matches(&b.commit) {
            return Ok(Ordering::Equal);
        }

        let key = (a.commit.clone(), b.commit.clone());
        let decided = self.decisions.borrow().get(&key).copied();
        if let Some(ordering) = decided {
            return Ok(ordering);
        }

        let ordering = if self.provider.is_ancestor(&a.commit, &b.commit)? {
            Ordering::Less
        } else if self.provider.is_ancestor(&b.commit, &a.commit)? {
            Ordering::Greater
        } else {
            tracing::debug!(
                a = %a.commit,
                b = %b.commit,
                "unrelated commits, falling back to commit time"
            );
            a.timestamp.cmp(&b.timestamp)
        };

        let mut decisions = self.decisions.borrow_mut();
        decisions.insert((b.commit.clone(), a.commit.clone()), ordering.reverse());
        decisions.insert(key, ordering);

        Ok(ordering)
    }

    /// Stable ascending sort (oldest first)
    ///
    /// An insertion sort, so comparator errors can propagate and equal
    /// candidates keep their input order.
    pub fn sort(&self, candidates: &mut [CommitCandidate]) -> anyhow::Result<()> {
        for unsorted in 1..candidates.len() {
            let mut position = unsorted;
            while position > 0
                && self.compare(&candidates[position - 1], &candidates[position])?
                    == Ordering::Greater
            {
                candidates.swap(position - 1, position);
                position -= 1;
            }
        }

        Ok(())
    }

    /// The newest candidate, i.e. the last one after an ascending sort
    pub fn newest(
        &self,
        mut candidates: Vec<CommitCandidate>,
    ) -> anyhow::Result<Option<CommitCandidate>> {
        self.sort(&mut candidates)?;
        Ok(candidates.pop())
    }
}
