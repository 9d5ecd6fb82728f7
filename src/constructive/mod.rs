//! Constructive heuristics for building initial pickup routes.
//!
//! - [`cheapest_insertion`] — Cheapest insertion into all routes at once, O(n³)

mod cheapest_insertion;

pub use cheapest_insertion::{cheapest_insertion, Construction};
