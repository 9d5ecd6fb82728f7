//! Travel cost between planning nodes.
//!
//! Provides a dense distance matrix, a weighted directed road graph with
//! Dijkstra shortest paths, and [`build`] which produces a matrix for a node
//! list in either Euclidean or road-network mode.

mod graph;
mod matrix;
mod provider;

pub use graph::RoadGraph;
pub use matrix::DistanceMatrix;
pub use provider::{build, DistanceMode};
