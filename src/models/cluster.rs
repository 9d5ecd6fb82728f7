//! Hotspot cluster types.

use serde::{Deserialize, Serialize};

use super::Point;

/// A dense group of location samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    id: usize,
    members: Vec<usize>,
    centroid: Point,
    radius: f64,
}

impl Cluster {
    /// Builds a cluster from member indices into `points`, computing the
    /// centroid (mean) and radius (largest member-to-centroid distance).
    ///
    /// `members` must be non-empty and index into `points`.
    pub fn from_members(id: usize, mut members: Vec<usize>, points: &[Point]) -> Self {
        members.sort_unstable();
        let n = members.len().max(1) as f64;
        let (sx, sy) = members
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &i| (sx + points[i].x, sy + points[i].y));
        let centroid = Point::new(sx / n, sy / n);
        let radius = members
            .iter()
            .map(|&i| points[i].distance_to(&centroid))
            .fold(0.0, f64::max);
        Self {
            id,
            members,
            centroid,
            radius,
        }
    }

    /// Cluster label.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Member point indices, ascending.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Mean of member coordinates.
    pub fn centroid(&self) -> Point {
        self.centroid
    }

    /// Largest distance from the centroid to any member.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of members.
    pub fn frequency(&self) -> usize {
        self.members.len()
    }
}

/// Clustering output: one label per input point plus the clusters.
///
/// A `None` label marks a noise point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterSet {
    labels: Vec<Option<usize>>,
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    /// Creates a cluster set.
    pub fn new(labels: Vec<Option<usize>>, clusters: Vec<Cluster>) -> Self {
        Self { labels, clusters }
    }

    /// Per-point labels in input order.
    pub fn labels(&self) -> &[Option<usize>] {
        &self.labels
    }

    /// Clusters, ordered by id.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Number of clusters.
    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Indices of points that belong to no cluster.
    pub fn noise(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.is_none().then_some(i))
            .collect()
    }

    /// Member sets, sorted, independent of label values.
    pub fn membership(&self) -> Vec<Vec<usize>> {
        let mut sets: Vec<Vec<usize>> = self.clusters.iter().map(|c| c.members.clone()).collect();
        sets.sort();
        sets
    }

    /// Clusters ordered by descending frequency, ties by id.
    pub fn hotspots_by_frequency(&self) -> Vec<&Cluster> {
        let mut hotspots: Vec<&Cluster> = self.clusters.iter().collect();
        hotspots.sort_by(|a, b| b.frequency().cmp(&a.frequency()).then(a.id.cmp(&b.id)));
        hotspots
    }
}
