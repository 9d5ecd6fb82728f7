//! # u-pickup
//!
//! Pickup route planning for capacitated fleets: travel-cost matrices over
//! coordinates or a road network, density-based hotspot detection, and a
//! CVRP solver combining cheapest insertion with time-bounded local search.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Point, Node, Vehicle, Route, Solution, Cluster)
//! - [`distance`] — Distance matrix, road graph, Euclidean and shortest-path providers
//! - [`clustering`] — DBSCAN hotspot detection
//! - [`evaluation`] — Validated instances, route cost and feasibility checking
//! - [`constructive`] — Cheapest-insertion construction
//! - [`local_search`] — Relocate, 2-opt and 2-opt* descent
//! - [`solver`] — Construction plus improvement under a time budget
//! - [`planner`] — Matrix build and solve in one call
//! - [`sampling`] — Synthetic pickup locations
//! - [`error`] — Error type

pub mod clustering;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod planner;
pub mod sampling;
pub mod solver;

pub use error::{PickupError, Result};
