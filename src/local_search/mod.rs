//! Local search operators for improving pickup routes.
//!
//! - [`best_relocate`] — Single-stop relocation within or across routes
//! - [`best_two_opt`] — Intra-route segment reversal
//! - [`best_exchange`] — Inter-route tail exchange (2-opt*)
//! - [`descend`] — Best-improvement descent over all three

mod exchange;
mod moves;
mod relocate;
mod search;
mod two_opt;

pub use exchange::best_exchange;
pub use moves::{Move, MoveKind, Neighborhood};
pub use relocate::best_relocate;
pub use search::{descend, SearchStats};
pub use two_opt::best_two_opt;
