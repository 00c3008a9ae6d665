//! Provenance record line
//!
//! Each tracked file carries one comment line describing what it was last
//! reviewed against:
//!
//! ```text
//! # validated: <date> <initials> <hash> <origPath1> [origPath2 ...]
//! # notrack
//! ```
//!
//! `# novalidate` is the legacy spelling of `# notrack`. The first line of a
//! file that starts with one of these markers is the record; everything else
//! in the file is left alone.

use crate::artifacts::objects::commit_id::CommitId;
use crate::error::TrackError;
use phf::phf_map;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// Minimum number of whitespace-separated tokens in a validated line
const VALIDATED_LINE_TOKENS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordMarker {
    Validated,
    NotTracked,
}

static RECORD_MARKERS: phf::Map<&'static str, RecordMarker> = phf_map! {
    "# validated" => RecordMarker::Validated,
    "# notrack" => RecordMarker::NotTracked,
    "# novalidate" => RecordMarker::NotTracked,
};

fn marker_of(line: &str) -> Option<RecordMarker> {
    RECORD_MARKERS
        .entries()
        .find(|(prefix, _)| line.starts_with(*prefix))
        .map(|(_, marker)| *marker)
}

/// Whether a raw file line holds a provenance record
pub fn is_record_line(line: &str) -> bool {
    marker_of(line).is_some()
}

/// Parsed form of a record line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLine {
    Tracked(Validation),
    NotTracked,
    Malformed(String),
}

impl RecordLine {
    /// Parse a line, or `None` when it is not a record line at all
    pub fn parse(line: &str) -> Option<RecordLine> {
        let line = line.trim();

        match marker_of(line)? {
            RecordMarker::NotTracked => Some(RecordLine::NotTracked),
            RecordMarker::Validated => {
                let tokens = line.split_whitespace().collect::<Vec<_>>();
                if tokens.len() < VALIDATED_LINE_TOKENS {
                    return Some(RecordLine::Malformed(line.to_string()));
                }

                let validation = Validation::new(
                    tokens[2].to_string(),
                    tokens[3].to_string(),
                    None,
                    tokens[5..].iter().map(|path| path.to_string()).collect(),
                );

                Some(match validation {
                    Ok(validation) => RecordLine::Tracked(Validation {
                        hash: Some(RecordedHash::parse(tokens[4])),
                        ..validation
                    }),
                    Err(_) => RecordLine::Malformed(line.to_string()),
                })
            }
        }
    }
}

/// Hash column of a validated line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedHash {
    Commit(CommitId),
    /// Anything that is not a commit id, such as the `DOES_NOT_EXIST`
    /// placeholder of files validated against a vanished upstream file.
    /// Kept verbatim and never matches a commit.
    Opaque(String),
}

impl RecordedHash {
    pub fn parse(token: &str) -> Self {
        match CommitId::try_parse(token) {
            Ok(commit) => RecordedHash::Commit(commit),
            Err(_) => RecordedHash::Opaque(token.to_string()),
        }
    }

    pub fn commit(&self) -> Option<&CommitId> {
        match self {
            RecordedHash::Commit(commit) => Some(commit),
            RecordedHash::Opaque(_) => None,
        }
    }

    pub fn matches(&self, other: &CommitId) -> bool {
        self.commit().is_some_and(|commit| commit.matches(other))
    }
}

impl std::fmt::Display for RecordedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordedHash::Commit(commit) => write!(f, "{commit}"),
            RecordedHash::Opaque(token) => write!(f, "{token}"),
        }
    }
}

/// The last review of a tracked file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    date: String,
    initials: String,
    hash: Option<RecordedHash>,
    original_paths: Vec<String>,
}

impl Validation {
    /// Build a validation, normalizing the original paths
    ///
    /// # Errors
    ///
    /// `TrackError::NoOriginalPaths` when `original_paths` is empty
    pub fn new(
        date: String,
        initials: String,
        hash: Option<CommitId>,
        original_paths: Vec<String>,
    ) -> anyhow::Result<Self> {
        if original_paths.is_empty() {
            return Err(TrackError::NoOriginalPaths.into());
        }

        Ok(Self {
            date,
            initials,
            hash: hash.map(RecordedHash::Commit),
            original_paths: original_paths
                .iter()
                .map(|path| normalize_posix(path))
                .collect(),
        })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn initials(&self) -> &str {
        &self.initials
    }

    pub fn hash(&self) -> Option<&RecordedHash> {
        self.hash.as_ref()
    }

    pub fn original_paths(&self) -> &[String] {
        &self.original_paths
    }

    pub fn with_hash(self, hash: CommitId) -> Self {
        Self {
            hash: Some(RecordedHash::Commit(hash)),
            ..self
        }
    }

    pub fn with_original_paths(self, original_paths: Vec<String>) -> anyhow::Result<Self> {
        let hash = self.hash;
        Ok(Self {
            hash,
            ..Self::new(self.date, self.initials, None, original_paths)?
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TrackingMode {
    Tracked(Validation),
    NotTracked,
}

/// The provenance record of one downstream file
///
/// Records are immutable. Replacing the validation (new hash, new original
/// paths) produces a new record, and with it an empty resolution cache.
#[derive(Debug, Clone)]
pub struct ProvenanceRecord {
    tracked_path: PathBuf,
    mode: TrackingMode,
    resolution: OnceCell<Option<CommitId>>,
}

impl ProvenanceRecord {
    pub fn tracked(tracked_path: PathBuf, validation: Validation) -> Self {
        Self {
            tracked_path,
            mode: TrackingMode::Tracked(validation),
            resolution: OnceCell::new(),
        }
    }

    pub fn not_tracked(tracked_path: PathBuf) -> Self {
        Self {
            tracked_path,
            mode: TrackingMode::NotTracked,
            resolution: OnceCell::new(),
        }
    }

    /// Turn a parsed line into the record of `tracked_path`
    pub fn from_line(tracked_path: PathBuf, line: RecordLine) -> Result<Self, TrackError> {
        match line {
            RecordLine::Tracked(validation) => Ok(Self::tracked(tracked_path, validation)),
            RecordLine::NotTracked => Ok(Self::not_tracked(tracked_path)),
            RecordLine::Malformed(line) => Err(TrackError::RecordFormat(line)),
        }
    }

    pub fn tracked_path(&self) -> &Path {
        &self.tracked_path
    }

    pub fn validation(&self) -> Option<&Validation> {
        match &self.mode {
            TrackingMode::Tracked(validation) => Some(validation),
            TrackingMode::NotTracked => None,
        }
    }

    pub fn is_tracked(&self) -> bool {
        matches!(self.mode, TrackingMode::Tracked(_))
    }

    /// Original paths, empty for not-tracked records
    pub fn original_paths(&self) -> &[String] {
        self.validation()
            .map(Validation::original_paths)
            .unwrap_or_default()
    }

    pub fn recorded_hash(&self) -> Option<&RecordedHash> {
        self.validation().and_then(Validation::hash)
    }

    /// Same file, new validation, fresh resolution cache
    pub fn with_validation(&self, validation: Validation) -> Self {
        Self::tracked(self.tracked_path.clone(), validation)
    }

    pub(crate) fn resolution(&self) -> &OnceCell<Option<CommitId>> {
        &self.resolution
    }

    /// The line to embed in the tracked file, newline included
    pub fn line(&self) -> anyhow::Result<String> {
        match &self.mode {
            TrackingMode::NotTracked => Ok("# notrack\n".to_string()),
            TrackingMode::Tracked(validation) => {
                let hash = validation.hash().ok_or_else(|| {
                    anyhow::anyhow!(
                        "record of {} has no validated hash",
                        self.tracked_path.display()
                    )
                })?;

                Ok(format!(
                    "# validated: {} {} {} {}\n",
                    validation.date,
                    validation.initials,
                    hash,
                    validation.original_paths.join(" ")
                ))
            }
        }
    }
}

/// Lexically normalize a path the way POSIX `normpath` does
///
/// Separators become `/`, `.` components and repeated separators disappear,
/// and `..` folds into its parent where there is one.
pub fn normalize_posix(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');

    let mut parts = Vec::<&str>::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            part => parts.push(part),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
