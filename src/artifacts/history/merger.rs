//! Merged history across one or more upstream files
//!
//! `git log --follow` only follows a single path, and it cannot skip chosen
//! commits. The merger pulls each file's history separately and combines the
//! streams into one ordered, deduplicated and filtered list of display
//! requests.
//!
//! ## Algorithm
//!
//! 1. One path and no exclusions: a single pass-through request, no merging
//! 2. Otherwise pull `(timestamp, commit, path-at-commit)` for every path
//! 3. Index the paths each commit touched
//! 4. With more than one path, stable-sort the concatenated streams by commit
//!    time, newest first (a single stream keeps the provider's own order)
//! 5. Keep the first occurrence of each commit
//! 6. Drop excluded commits
//! 7. Emit one request per touched path of each commit, paths sorted

use crate::artifacts::history::entry::{HistoryEntry, RevisionRange};
use crate::artifacts::history::exclusion::ExclusionSet;
use crate::artifacts::history::provider::HistoryProvider;
use crate::artifacts::objects::commit_id::CommitId;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A single "show this" instruction for the display sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayRequest {
    /// Full rename-following patch log of one file
    FollowFile {
        path: String,
        range: Option<RevisionRange>,
    },
    /// One commit's patch, restricted to one path
    Commit { commit: CommitId, path: String },
}

impl DisplayRequest {
    /// Arguments for `git` that render this request
    pub fn git_args(&self, color: bool) -> Vec<String> {
        let color = if color { "--color=always" } else { "--color=never" };

        match self {
            DisplayRequest::FollowFile { path, range } => {
                let mut args = vec![
                    "log".to_string(),
                    "--follow".to_string(),
                    "-p".to_string(),
                    color.to_string(),
                ];
                if let Some(range) = range {
                    args.push(range.to_string());
                }
                args.extend(["--".to_string(), path.clone()]);
                args
            }
            DisplayRequest::Commit { commit, path } => vec![
                "log".to_string(),
                "-p".to_string(),
                "-1".to_string(),
                "--follow".to_string(),
                color.to_string(),
                commit.to_string(),
                "--".to_string(),
                path.clone(),
            ],
        }
    }
}

impl std::fmt::Display for DisplayRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let args = self
            .git_args(false)
            .iter()
            .map(|arg| shell_quote(arg))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "git {args}")
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = arg
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./=@%+:,".contains(c));
    if plain && !arg.is_empty() {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Ordered requests for the display sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplaySequence(Vec<DisplayRequest>);

impl DisplaySequence {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayRequest> {
        self.0.iter()
    }

    /// Distinct commits in display order
    #[cfg(test)]
    pub fn commits(&self) -> Vec<&CommitId> {
        let mut seen = HashSet::new();
        self.0
            .iter()
            .filter_map(|request| match request {
                DisplayRequest::Commit { commit, .. } => Some(commit),
                DisplayRequest::FollowFile { .. } => None,
            })
            .filter(|commit| seen.insert(*commit))
            .collect()
    }
}

#[cfg(test)]
impl From<Vec<DisplayRequest>> for DisplaySequence {
    fn from(requests: Vec<DisplayRequest>) -> Self {
        Self(requests)
    }
}

pub struct HistoryMerger<'p, P>
where
    P: HistoryProvider + ?Sized,
{
    provider: &'p P,
    exclusions: &'p ExclusionSet,
}

impl<'p, P> HistoryMerger<'p, P>
where
    P: HistoryProvider + ?Sized,
{
    pub fn new(provider: &'p P, exclusions: &'p ExclusionSet) -> Self {
        Self {
            provider,
            exclusions,
        }
    }

    pub fn render(
        &self,
        paths: &[String],
        range: Option<&RevisionRange>,
    ) -> anyhow::Result<DisplaySequence> {
        match paths {
            [] => anyhow::bail!("Specify at least one file to log"),
            [path] if self.exclusions.is_empty() => {
                return Ok(DisplaySequence(vec![DisplayRequest::FollowFile {
                    path: path.clone(),
                    range: range.cloned(),
                }]));
            }
            _ => {}
        }

        let mut entries = Vec::<HistoryEntry>::new();
        for path in paths {
            let before = entries.len();
            for entry in self.provider.list_history(path, range)? {
                entries.push(entry?);
            }
            tracing::debug!(path = %path, commits = entries.len() - before, "pulled history");
        }

        let mut touched_paths = HashMap::<CommitId, BTreeSet<String>>::new();
        for entry in &entries {
            touched_paths
                .entry(entry.commit.clone())
                .or_default()
                .insert(entry.path.clone());
        }

        if paths.len() > 1 {
            entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }

        let mut seen = HashSet::new();
        let mut requests = Vec::new();
        for entry in entries {
            if !seen.insert(entry.commit.clone()) {
                continue;
            }
            if self.exclusions.contains(&entry.commit) {
                tracing::trace!(commit = %entry.commit, "skipping excluded commit");
                continue;
            }

            let touched = touched_paths.remove(&entry.commit).unwrap_or_default();
            for path in touched {
                requests.push(DisplayRequest::Commit {
                    commit: entry.commit.clone(),
                    path,
                });
            }
        }

        for request in &requests {
            tracing::debug!("{request}");
        }

        Ok(DisplaySequence(requests))
    }
}
