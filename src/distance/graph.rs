//! Weighted directed road network and shortest-path search.
//!
//! # Algorithm
//!
//! Shortest paths use Dijkstra's algorithm with a binary-heap priority
//! queue. A search from one source settles vertices in order of distance and
//! stops once every requested target is settled, so one search serves a
//! whole matrix row.
//!
//! # Complexity
//!
//! O(E log V) per source.
//!
//! # Reference
//!
//! Dijkstra, E.W. (1959). "A note on two problems in connexion with graphs",
//! *Numerische Mathematik* 1, 269-271.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::error::{PickupError, Result};

/// A directed graph with non-negative edge weights.
///
/// Vertices are `0..num_vertices`. Weights are validated when edges are
/// added, including when a graph is deserialized, so a graph never holds a
/// negative or non-finite weight.
///
/// # Examples
///
/// ```
/// use u_pickup::distance::RoadGraph;
///
/// let mut g = RoadGraph::new(3);
/// g.add_edge(0, 1, 2.0).unwrap();
/// g.add_edge(1, 2, 3.0).unwrap();
/// assert!(g.add_edge(2, 0, -1.0).is_err());
///
/// let d = g.shortest_paths(0, &[2]);
/// assert_eq!(d[2], 5.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct RoadGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
}

/// Serialized form, re-validated edge by edge on load.
#[derive(Deserialize)]
struct RawGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl TryFrom<RawGraph> for RoadGraph {
    type Error = PickupError;

    fn try_from(raw: RawGraph) -> Result<Self> {
        let mut g = RoadGraph::new(raw.adjacency.len());
        for (from, edges) in raw.adjacency.into_iter().enumerate() {
            for (to, weight) in edges {
                g.add_edge(from, to, weight)?;
            }
        }
        Ok(g)
    }
}

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    dist: f64,
    vertex: usize,
}

impl Eq for HeapEntry {}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for HeapEntry {
    // Reversed so the max-heap pops the smallest distance first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl RoadGraph {
    /// Creates a graph with `num_vertices` vertices and no edges.
    pub fn new(num_vertices: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); num_vertices],
        }
    }

    /// Builds a graph from `(from, to, weight)` triples.
    pub fn from_edges(num_vertices: usize, edges: &[(usize, usize, f64)]) -> Result<Self> {
        let mut g = Self::new(num_vertices);
        for &(from, to, weight) in edges {
            g.add_edge(from, to, weight)?;
        }
        Ok(g)
    }

    /// Adds a directed edge.
    ///
    /// Fails for unknown vertices and for negative or non-finite weights.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) -> Result<()> {
        let n = self.num_vertices();
        if from >= n || to >= n {
            return Err(PickupError::invalid(format!(
                "edge ({from}, {to}) references a vertex outside 0..{n}"
            )));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(PickupError::invalid(format!(
                "edge ({from}, {to}) has weight {weight}; weights must be finite and non-negative"
            )));
        }
        self.adjacency[from].push((to, weight));
        Ok(())
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edges.
    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Outgoing `(neighbor, weight)` pairs of `vertex`.
    pub fn neighbors(&self, vertex: usize) -> &[(usize, f64)] {
        &self.adjacency[vertex]
    }

    /// Single-source shortest path lengths from `source`.
    ///
    /// Returns a vector indexed by vertex. Entries for vertices that were
    /// not settled are `f64::INFINITY`; the search stops early once every
    /// vertex in `targets` is settled, so only those entries (and any
    /// settled before them) are guaranteed final. An empty `targets` slice
    /// runs the search to exhaustion.
    pub fn shortest_paths(&self, source: usize, targets: &[usize]) -> Vec<f64> {
        let n = self.num_vertices();
        let mut dist = vec![f64::INFINITY; n];
        if source >= n {
            return dist;
        }

        let mut is_target = vec![false; n];
        let mut remaining = 0usize;
        for &t in targets {
            if t < n && !is_target[t] {
                is_target[t] = true;
                remaining += 1;
            }
        }
        let exhaustive = remaining == 0;

        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();
        dist[source] = 0.0;
        heap.push(HeapEntry {
            dist: 0.0,
            vertex: source,
        });

        while let Some(HeapEntry { dist: d, vertex: u }) = heap.pop() {
            if settled[u] {
                continue;
            }
            settled[u] = true;
            if is_target[u] {
                remaining -= 1;
                if remaining == 0 && !exhaustive {
                    break;
                }
            }
            for &(v, w) in &self.adjacency[u] {
                let candidate = d + w;
                if candidate < dist[v] {
                    dist[v] = candidate;
                    heap.push(HeapEntry {
                        dist: candidate,
                        vertex: v,
                    });
                }
            }
        }

        for (v, d) in dist.iter_mut().enumerate() {
            if !settled[v] {
                *d = f64::INFINITY;
            }
        }
        dist
    }

    /// Vertices of the largest strongly connected component, ascending.
    ///
    /// Uses Kosaraju's two-pass algorithm with explicit stacks. Ties between
    /// equally large components go to the one containing the lowest vertex.
    pub fn largest_strongly_connected_component(&self) -> Vec<usize> {
        let n = self.num_vertices();
        if n == 0 {
            return Vec::new();
        }

        // Pass 1: finishing order on the forward graph.
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        for start in 0..n {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut stack = vec![(start, 0usize)];
            while let Some((u, next)) = stack.last_mut() {
                let u = *u;
                if let Some(&(v, _)) = self.adjacency[u].get(*next) {
                    *next += 1;
                    if !visited[v] {
                        visited[v] = true;
                        stack.push((v, 0));
                    }
                } else {
                    order.push(u);
                    stack.pop();
                }
            }
        }

        // Pass 2: flood the transposed graph in reverse finishing order.
        let mut reverse = vec![Vec::new(); n];
        for (u, edges) in self.adjacency.iter().enumerate() {
            for &(v, _) in edges {
                reverse[v].push(u);
            }
        }
        let mut component = vec![usize::MAX; n];
        let mut sizes = Vec::new();
        for &root in order.iter().rev() {
            if component[root] != usize::MAX {
                continue;
            }
            let id = sizes.len();
            let mut size = 0usize;
            let mut stack = vec![root];
            component[root] = id;
            while let Some(u) = stack.pop() {
                size += 1;
                for &v in &reverse[u] {
                    if component[v] == usize::MAX {
                        component[v] = id;
                        stack.push(v);
                    }
                }
            }
            sizes.push(size);
        }

        let mut best = component[0];
        for v in 0..n {
            let c = component[v];
            if sizes[c] > sizes[best] {
                best = c;
            }
        }
        (0..n).filter(|&v| component[v] == best).collect()
    }

    /// Copy of this graph keeping only edges whose endpoints are both in
    /// `vertices`. Vertex ids are unchanged.
    pub fn restricted_to(&self, vertices: &[usize]) -> RoadGraph {
        let n = self.num_vertices();
        let mut keep = vec![false; n];
        for &v in vertices {
            if v < n {
                keep[v] = true;
            }
        }
        let adjacency = self
            .adjacency
            .iter()
            .enumerate()
            .map(|(u, edges)| {
                if !keep[u] {
                    return Vec::new();
                }
                edges.iter().copied().filter(|&(v, _)| keep[v]).collect()
            })
            .collect();
        RoadGraph { adjacency }
    }
}
