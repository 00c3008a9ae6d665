//! Domain errors
//!
//! Every failure the tool reports to the user that is not a plain I/O or
//! process failure has a variant here. Operations still return
//! `anyhow::Result`; callers that need to branch on the kind use
//! `downcast_ref::<TrackError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("Configuration file '{}' was not found", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("{}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("Invalid validation line: {0}")]
    RecordFormat(String),

    #[error("{} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("No validation information found for {}", .0.display())]
    NoRecord(PathBuf),

    #[error("{} is marked as not tracked", .0.display())]
    NotTracked(PathBuf),

    #[error("Could not resolve an upstream commit for {}", .0.display())]
    Unresolvable(PathBuf),

    #[error("Upstream directory {} does not exist", .0.display())]
    UpstreamMissing(PathBuf),

    #[error(
        "Upstream commit is {head}, {pinned} is in .gittrack\n\n\
         To fix use one of these commands:\n\n\
         * git source-track upstream-checkout: will set the upstream commit to match\n  \
         that which is in .gittrack\n\
         * git source-track upstream-track: will modify .gittrack to match the current\n  \
         upstream commit\n\n\
         If in doubt, you probably want 'git source-track upstream-checkout'"
    )]
    UpstreamMismatch { head: String, pinned: String },

    #[error("Specify --initials or execute 'git config user.name Something'")]
    MissingInitials,

    #[error("Must specify upstream filename(s)")]
    NoOriginalPaths,

    #[error("`git {command}` failed ({status}): {stderr}")]
    Git {
        command: String,
        status: String,
        stderr: String,
    },
}
