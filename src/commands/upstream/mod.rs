//! Maintenance of the pinned upstream commit
//!
//! - `checkout`: Move the upstream tree to the pinned commit
//! - `pull`: Pull upstream, then pin its new head
//! - `track`: Pin whatever commit the upstream tree is at

pub mod checkout;
pub mod pull;
pub mod track;
