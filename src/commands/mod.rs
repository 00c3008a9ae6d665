//! Command implementations
//!
//! - `porcelain`: Review workflow on tracked files (show, diff, set-valid, ...)
//! - `upstream`: Maintenance of the pinned upstream commit
//!
//! Every command is an `impl Tracker` block writing its output through the
//! tracker's writer.

pub mod porcelain;
pub mod upstream;
