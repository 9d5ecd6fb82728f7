//! Spatial hotspot detection.
//!
//! - [`cluster`] — DBSCAN over 2D points with a grid spatial index
//! - [`GridIndex`] — fixed-radius neighbour lookup

mod dbscan;
mod grid;

pub use dbscan::{cluster, ClusterParams, NoisePolicy};
pub use grid::GridIndex;
