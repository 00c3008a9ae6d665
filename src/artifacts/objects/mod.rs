//! Version-control object identifiers
//!
//! The tool never reads git objects itself; all it handles are commit hashes
//! reported by `git log` or stored in provenance records and exclusion lists.

pub mod commit_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const COMMIT_ID_LENGTH: usize = 40;

/// Length of the abbreviated hash written into provenance records
pub const SHORT_COMMIT_ID_LENGTH: usize = 12;
