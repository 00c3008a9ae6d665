//! Data types and algorithms
//!
//! - `core`: Shared utilities (pager wrapper)
//! - `history`: Upstream history entries, exclusions, commit ordering and
//!   the multi-file history merge
//! - `objects`: Commit identifiers
//! - `provenance`: Provenance records and their resolution

pub mod core;
pub mod history;
pub mod objects;
pub mod provenance;
