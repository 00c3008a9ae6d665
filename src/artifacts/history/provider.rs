use crate::artifacts::history::entry::{HistoryEntry, RevisionRange};
use crate::artifacts::objects::commit_id::CommitId;

/// Lazily produced history entries, newest first
pub type HistoryIter<'h> = Box<dyn Iterator<Item = anyhow::Result<HistoryEntry>> + 'h>;

/// Read-only view of the upstream repository
///
/// The resolution and merge engines only ever talk to upstream history through
/// this trait. The production implementation shells out to `git` inside the
/// upstream tree; tests script a commit graph in memory.
pub trait HistoryProvider {
    /// Whether `path` exists in the upstream tree at the current head
    fn contains_path(&self, path: &str) -> bool;

    /// Rename-following history of `path`, newest first
    ///
    /// The sequence is lazy: consumers that stop early never pay for the rest
    /// of the walk.
    fn list_history(
        &self,
        path: &str,
        range: Option<&RevisionRange>,
    ) -> anyhow::Result<HistoryIter<'_>>;

    /// Whether `ancestor` is reachable from `descendant`
    fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> anyhow::Result<bool>;

    fn current_head(&self) -> anyhow::Result<CommitId>;
}
