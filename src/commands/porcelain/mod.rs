//! Review workflow on tracked files
//!
//! ## Commands
//!
//! - `show`: Status of one or all tracked files
//! - `diff`: Upstream history since the last review, then offer to re-validate
//! - `set_valid`: Record a review against the current upstream commit
//! - `set_notrack`: Opt a file out of tracking
//! - `show_log`: Upstream history of the file(s) matching a tracked file
//! - `update_src`: Re-point a record whose upstream file disappeared

pub mod diff;
pub mod set_notrack;
pub mod set_valid;
pub mod show;
pub mod show_log;
pub mod update_src;
