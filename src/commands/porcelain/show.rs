use crate::areas::tracker::Tracker;
use crate::areas::upstream::GitHistory;
use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::provenance::record::RecordedHash;
use crate::artifacts::provenance::resolver::ProvenanceResolver;
use crate::artifacts::provenance::state::ResolvedState;
use colored::Colorize;
use std::fmt;
use std::path::Path;

/// Per-status file counts of a `show` run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShowSummary {
    pub good: usize,
    pub outdated: usize,
    pub unknown: usize,
    pub error: usize,
}

impl ShowSummary {
    pub fn has_errors(&self) -> bool {
        self.error > 0
    }

    fn count(&mut self, status: &FileStatus) {
        match status {
            FileStatus::Good => self.good += 1,
            FileStatus::Outdated { .. } => self.outdated += 1,
            FileStatus::Unresolvable | FileStatus::Unknown => self.unknown += 1,
            FileStatus::Error(_) => self.error += 1,
        }
    }
}

impl fmt::Display for ShowSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} OK, {} out of date, {} unknown, {} error",
            self.good, self.outdated, self.unknown, self.error
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FileStatus {
    Good,
    Outdated {
        recorded: Option<RecordedHash>,
        resolved: CommitId,
    },
    Unresolvable,
    /// No record line at all
    Unknown,
    Error(String),
}

impl From<ResolvedState> for FileStatus {
    fn from(state: ResolvedState) -> Self {
        match state {
            ResolvedState::Current(_) | ResolvedState::NotTracked => FileStatus::Good,
            ResolvedState::Stale { recorded, resolved } => {
                FileStatus::Outdated { recorded, resolved }
            }
            ResolvedState::Unresolvable => FileStatus::Unresolvable,
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileStatus::Good => "OK ".green(),
            FileStatus::Outdated { .. } => "OLD".yellow(),
            FileStatus::Unresolvable | FileStatus::Error(_) => "ERR".red(),
            FileStatus::Unknown => "-- ".normal(),
        };
        write!(f, "{label}")
    }
}

impl Tracker {
    /// Report one file, or every tracked file under the validation root
    pub fn show(&self, file: Option<&Path>) -> anyhow::Result<ShowSummary> {
        let files = match file {
            Some(file) => vec![self.workspace().locate(file)?],
            None => self.workspace().list_tracked_files()?,
        };

        let resolver = self.resolver()?;
        let mut summary = ShowSummary::default();
        for file in files {
            let status = self.file_status(&resolver, &file).unwrap_or_else(|e| {
                tracing::debug!(file = %file.display(), error = %e, "status check failed");
                FileStatus::Error(format!("{e:#}"))
            });
            summary.count(&status);
            self.show_file_status(&file, &status)?;
        }

        writeln!(self.writer())?;
        writeln!(self.writer(), "{summary}")?;

        Ok(summary)
    }

    fn file_status(
        &self,
        resolver: &ProvenanceResolver<'_, GitHistory>,
        file: &Path,
    ) -> anyhow::Result<FileStatus> {
        match self.workspace().read_record(file)? {
            Some(record) => Ok(resolver.resolve(&record)?.into()),
            None => Ok(FileStatus::Unknown),
        }
    }

    fn show_file_status(&self, file: &Path, status: &FileStatus) -> anyhow::Result<()> {
        let path = self.workspace().relative_path(file);

        match status {
            FileStatus::Outdated { recorded, resolved } => {
                let recorded = recorded
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                writeln!(
                    self.writer(),
                    "{status}: {} ({recorded}..{resolved})",
                    path.display()
                )?;
            }
            FileStatus::Error(message) => {
                writeln!(self.writer(), "{status}: {}", path.display())?;
                writeln!(self.writer(), "-->  {message}")?;
            }
            _ => writeln!(self.writer(), "{status}: {}", path.display())?,
        }

        Ok(())
    }
}
