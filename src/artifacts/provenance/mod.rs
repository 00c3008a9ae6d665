//! Provenance records and their resolution
//!
//! - `record`: the embedded `# validated: ...` / `# notrack` line and the
//!   record it describes
//! - `state`: the outcome of resolving a record against upstream history
//! - `resolver`: picks the canonical upstream commit for a record

pub mod record;
pub mod resolver;
pub mod state;
