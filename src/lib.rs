//! Track downstream files against the upstream files they were derived from
//!
//! Every tracked file carries a one-line provenance record naming the
//! upstream commit and path(s) it was last reviewed against. The crate
//! resolves those records against the live upstream history and renders the
//! merged history a reviewer needs to catch up.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod error;

pub use error::TrackError;
