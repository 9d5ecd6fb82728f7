//! Distance matrix construction for a planning run.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use super::{DistanceMatrix, RoadGraph};
use crate::error::{PickupError, Result};
use crate::models::Node;

/// How travel cost between two nodes is measured.
#[derive(Debug, Clone, Copy)]
pub enum DistanceMode<'a> {
    /// Straight-line distance between node coordinates.
    Euclidean,
    /// Shortest directed path over a road network; node ids are vertex ids.
    Graph(&'a RoadGraph),
}

/// Builds the distance matrix for `nodes`; row and column `k` belong to
/// `nodes[k]`.
///
/// In graph mode, pairs without a connecting path are set to
/// [`DistanceMatrix::UNREACHABLE`] and logged; that is not an error.
///
/// # Errors
///
/// `InvalidInput` if fewer than two distinct node ids are given, if no node
/// has id `depot`, or (graph mode) if a node id is not a graph vertex.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Node;
/// use u_pickup::distance::{build, DistanceMode, RoadGraph};
///
/// let nodes = vec![Node::depot(0, 0.0, 0.0), Node::new(2, 0.0, 0.0, 1)];
/// let graph = RoadGraph::from_edges(3, &[(0, 1, 4.0), (1, 2, 1.0)]).unwrap();
///
/// let dm = build(&nodes, 0, DistanceMode::Graph(&graph)).unwrap();
/// assert_eq!(dm.get(0, 1), 5.0);
/// assert!(!dm.is_reachable(1, 0));
/// ```
pub fn build(nodes: &[Node], depot: usize, mode: DistanceMode<'_>) -> Result<DistanceMatrix> {
    let distinct: HashSet<usize> = nodes.iter().map(Node::id).collect();
    if distinct.len() < 2 {
        return Err(PickupError::invalid(format!(
            "need at least two distinct nodes, got {}",
            distinct.len()
        )));
    }
    if !distinct.contains(&depot) {
        return Err(PickupError::invalid(format!(
            "depot {depot} is not among the supplied nodes"
        )));
    }

    let matrix = match mode {
        DistanceMode::Euclidean => {
            log::debug!("building euclidean matrix for {} nodes", nodes.len());
            DistanceMatrix::from_nodes(nodes)
        }
        DistanceMode::Graph(graph) => graph_matrix(nodes, graph)?,
    };

    let unreachable = matrix.unreachable_pairs();
    for &(i, j) in &unreachable {
        log::debug!(
            "no path from node {} to node {}",
            nodes[i].id(),
            nodes[j].id()
        );
    }
    if !unreachable.is_empty() {
        log::warn!(
            "{} of {} ordered pairs are unreachable",
            unreachable.len(),
            nodes.len() * (nodes.len() - 1)
        );
    }
    Ok(matrix)
}

fn graph_matrix(nodes: &[Node], graph: &RoadGraph) -> Result<DistanceMatrix> {
    let n_vertices = graph.num_vertices();
    if let Some(bad) = nodes.iter().find(|n| n.id() >= n_vertices) {
        return Err(PickupError::invalid(format!(
            "node {} is not a vertex of the road graph (0..{n_vertices})",
            bad.id()
        )));
    }

    let mut sources: Vec<usize> = nodes.iter().map(Node::id).collect();
    sources.sort_unstable();
    sources.dedup();
    log::debug!(
        "running {} shortest-path searches over {} vertices / {} edges",
        sources.len(),
        n_vertices,
        graph.num_edges()
    );

    let rows: HashMap<usize, Vec<f64>> = sources
        .par_iter()
        .map(|&s| (s, graph.shortest_paths(s, &sources)))
        .collect();

    let n = nodes.len();
    let mut matrix = DistanceMatrix::new(n);
    for (i, from) in nodes.iter().enumerate() {
        let row = &rows[&from.id()];
        for (j, to) in nodes.iter().enumerate() {
            if i != j {
                matrix.set(i, j, row[to.id()]);
            }
        }
    }
    Ok(matrix)
}
