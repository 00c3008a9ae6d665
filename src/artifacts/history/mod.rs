//! Upstream commit history
//!
//! This module holds everything that works on streams of upstream commits:
//!
//! - `entry`: history entries, commit candidates and revision ranges
//! - `provider`: the `HistoryProvider` seam the engines query
//! - `exclusion`: commits deliberately skipped as noise
//! - `comparator`: ancestry-aware ordering of commit candidates
//! - `merger`: merged, deduplicated history across several upstream files
//!
//! ## Algorithm
//!
//! Histories are pulled per file (following renames, newest first), so a
//! commit that touched several tracked files appears in several streams. The
//! merger interleaves the streams by commit time, drops repeats and excluded
//! commits, and emits one display request per (commit, path) pair.

pub mod comparator;
pub mod entry;
pub mod exclusion;
pub mod merger;
pub mod provider;

#[cfg(test)]
pub(crate) mod scripted;
