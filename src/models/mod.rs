//! Domain model types for pickup routing and hotspot analysis.
//!
//! Provides locations with demands, capacity-limited vehicles, routes as
//! ordered stop sequences, solutions that assign every node to one route,
//! and density clusters.

mod cluster;
mod node;
mod route;
mod solution;
mod vehicle;

pub use cluster::{Cluster, ClusterSet};
pub use node::{Node, Point};
pub use route::Route;
pub use solution::{Solution, Violation, ViolationType};
pub use vehicle::Vehicle;
