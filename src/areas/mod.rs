//! I/O-facing components
//!
//! - `config`: The `.gittrack` configuration file
//! - `tracker`: High-level coordination of configuration, history and output
//! - `upstream`: Upstream history and display backed by the `git` binary
//! - `workspace`: The validation tree and its provenance records

pub mod config;
pub mod tracker;
pub mod upstream;
pub mod workspace;
