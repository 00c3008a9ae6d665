//! In-memory history provider for tests
//!
//! Files map to their scripted newest-first history and commits to their
//! parents, so ancestry questions can be answered without a repository. Every
//! query is recorded for assertions on how lazily the engines behave.

use crate::artifacts::history::entry::{HistoryEntry, RevisionRange};
use crate::artifacts::history::provider::{HistoryIter, HistoryProvider};
use crate::artifacts::objects::commit_id::CommitId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

pub(crate) fn commit(id: &str) -> CommitId {
    CommitId::try_parse(id).expect("Invalid test commit id")
}

#[derive(Debug, Default)]
pub(crate) struct ScriptedHistory {
    files: HashMap<String, Vec<HistoryEntry>>,
    truncated_files: HashSet<String>,
    parents: HashMap<CommitId, Vec<CommitId>>,
    head: Option<CommitId>,
    ancestry_queries: RefCell<Vec<(CommitId, CommitId)>>,
    history_queries: RefCell<Vec<(String, Option<RevisionRange>)>>,
}

impl ScriptedHistory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a file whose name never changed, history given newest first
    pub(crate) fn with_file(self, path: &str, history: &[(i64, &str)]) -> Self {
        let history = history
            .iter()
            .map(|(timestamp, id)| (*timestamp, *id, path))
            .collect::<Vec<_>>();
        self.with_renamed_file(path, &history)
    }

    /// Add a file with the name it had in each commit, history given newest first
    pub(crate) fn with_renamed_file(mut self, path: &str, history: &[(i64, &str, &str)]) -> Self {
        let entries = history
            .iter()
            .map(|(timestamp, id, name)| HistoryEntry::new(*timestamp, commit(id), name.to_string()))
            .collect();
        self.files.insert(path.to_string(), entries);
        self
    }

    /// Make the history of `path` fail once its scripted entries run out
    pub(crate) fn with_truncated_history(mut self, path: &str) -> Self {
        self.truncated_files.insert(path.to_string());
        self
    }

    pub(crate) fn with_parent(mut self, child: &str, parent: &str) -> Self {
        self.parents
            .entry(commit(child))
            .or_default()
            .push(commit(parent));
        self
    }

    pub(crate) fn with_head(mut self, head: &str) -> Self {
        self.head = Some(commit(head));
        self
    }

    pub(crate) fn ancestry_queries(&self) -> usize {
        self.ancestry_queries.borrow().len()
    }

    pub(crate) fn history_queries(&self) -> Vec<(String, Option<RevisionRange>)> {
        self.history_queries.borrow().clone()
    }
}

impl HistoryProvider for ScriptedHistory {
    fn contains_path(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn list_history(
        &self,
        path: &str,
        range: Option<&RevisionRange>,
    ) -> anyhow::Result<HistoryIter<'_>> {
        self.history_queries
            .borrow_mut()
            .push((path.to_string(), range.cloned()));

        let entries = self.files.get(path).cloned().unwrap_or_default();
        let tail: Vec<anyhow::Result<HistoryEntry>> = if self.truncated_files.contains(path) {
            vec![Err(anyhow::anyhow!("history of {path} read past its end"))]
        } else {
            Vec::new()
        };

        Ok(Box::new(entries.into_iter().map(Ok).chain(tail)))
    }

    fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> anyhow::Result<bool> {
        self.ancestry_queries
            .borrow_mut()
            .push((ancestor.clone(), descendant.clone()));

        let mut pending = vec![descendant.clone()];
        let mut visited = HashSet::new();
        while let Some(current) = pending.pop() {
            if current.matches(ancestor) {
                return Ok(true);
            }
            if visited.insert(current.clone())
                && let Some(parents) = self.parents.get(&current)
            {
                pending.extend(parents.iter().cloned());
            }
        }

        Ok(false)
    }

    fn current_head(&self) -> anyhow::Result<CommitId> {
        self.head
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no head scripted"))
    }
}
