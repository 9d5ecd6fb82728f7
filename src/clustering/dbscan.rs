//! Density-based hotspot clustering (DBSCAN).
//!
//! # Algorithm
//!
//! A point is a *core point* when at least `min_points` points (itself
//! included) lie within distance `eps`. Core points that are within `eps`
//! of each other are chained into one cluster; non-core points within `eps`
//! of a cluster's core point join it as border points; everything else is
//! noise.
//!
//! Neighbour lists come from a [`GridIndex`] with cell side `eps` and are
//! computed in parallel. Expansion then runs sequentially in input order,
//! so cluster ids are `0, 1, 2, …` in the order in which each cluster's first
//! core point appears in the input. A border point reachable from two
//! clusters joins the one discovered first.
//!
//! # Complexity
//!
//! O(n · k) where k is the average number of points in a 3×3 cell block.
//!
//! # Reference
//!
//! Ester, M., Kriegel, H.-P., Sander, J. & Xu, X. (1996). "A Density-Based
//! Algorithm for Discovering Clusters in Large Spatial Databases with Noise",
//! *KDD-96*, 226-231.

use std::collections::VecDeque;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::GridIndex;
use crate::error::{PickupError, Result};
use crate::models::{Cluster, ClusterSet, Point};

/// What happens to points that belong to no dense region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoisePolicy {
    /// Noise points are labelled `None` and excluded from every cluster.
    #[default]
    Drop,
    /// Each noise point becomes its own one-member cluster.
    Singleton,
}

/// Clustering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    /// Neighbourhood radius.
    pub eps: f64,
    /// Minimum neighbourhood size (self included) for a core point.
    pub min_points: usize,
    /// Treatment of noise points.
    pub noise: NoisePolicy,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            eps: 150.0,
            min_points: 3,
            noise: NoisePolicy::Drop,
        }
    }
}

impl ClusterParams {
    /// Creates parameters with the default noise policy.
    pub fn new(eps: f64, min_points: usize) -> Self {
        Self {
            eps,
            min_points,
            noise: NoisePolicy::Drop,
        }
    }

    /// Sets the noise policy.
    pub fn with_noise(mut self, noise: NoisePolicy) -> Self {
        self.noise = noise;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.eps.is_finite() || self.eps <= 0.0 {
            return Err(PickupError::invalid(format!(
                "eps must be a positive finite radius, got {}",
                self.eps
            )));
        }
        if self.min_points < 1 {
            return Err(PickupError::invalid("min_points must be at least 1"));
        }
        Ok(())
    }
}

/// Groups `points` into density clusters.
///
/// # Errors
///
/// `InvalidInput` if `eps` is not positive, `min_points` is zero, or a
/// point has a non-finite coordinate. An empty point set is not an error.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Point;
/// use u_pickup::clustering::{cluster, ClusterParams};
///
/// let points = vec![
///     Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0),
///     Point::new(50.0, 50.0),
/// ];
/// let set = cluster(&points, &ClusterParams::new(1.5, 3)).unwrap();
/// assert_eq!(set.num_clusters(), 1);
/// assert_eq!(set.labels()[3], None);
/// assert_eq!(set.clusters()[0].frequency(), 3);
/// ```
pub fn cluster(points: &[Point], params: &ClusterParams) -> Result<ClusterSet> {
    params.validate()?;
    if let Some(i) = points.iter().position(|p| !p.is_finite()) {
        return Err(PickupError::invalid(format!(
            "point {i} has a non-finite coordinate"
        )));
    }
    if points.is_empty() {
        return Ok(ClusterSet::default());
    }

    let n = points.len();
    let grid = GridIndex::new(points, params.eps);
    let neighbors: Vec<Vec<usize>> = (0..n)
        .into_par_iter()
        .map(|i| grid.within(i, params.eps))
        .collect();
    let is_core: Vec<bool> = neighbors
        .iter()
        .map(|nb| nb.len() >= params.min_points)
        .collect();

    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut next_id = 0usize;
    let mut queue = VecDeque::new();

    for seed in 0..n {
        if !is_core[seed] || labels[seed].is_some() {
            continue;
        }
        let id = next_id;
        next_id += 1;
        labels[seed] = Some(id);
        queue.push_back(seed);

        while let Some(p) = queue.pop_front() {
            for &q in &neighbors[p] {
                if labels[q].is_some() {
                    continue;
                }
                labels[q] = Some(id);
                if is_core[q] {
                    queue.push_back(q);
                }
            }
        }
    }

    let dense = next_id;
    if params.noise == NoisePolicy::Singleton {
        for label in labels.iter_mut().filter(|l| l.is_none()) {
            *label = Some(next_id);
            next_id += 1;
        }
    }

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); next_id];
    for (i, label) in labels.iter().enumerate() {
        if let Some(id) = label {
            members[*id].push(i);
        }
    }
    let clusters: Vec<Cluster> = members
        .into_iter()
        .enumerate()
        .map(|(id, m)| Cluster::from_members(id, m, points))
        .collect();

    let noise = n - clusters.iter().map(Cluster::frequency).sum::<usize>();
    log::info!(
        "clustered {} points into {} dense clusters ({} singletons, {} noise)",
        n,
        dense,
        next_id - dense,
        noise
    );

    Ok(ClusterSet::new(labels, clusters))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(20.0, 20.0),
            Point::new(21.0, 20.0),
            Point::new(20.0, 21.0),
        ]
    }

    #[test]
    fn test_two_tight_clusters() {
        let points = two_blobs();
        let set = cluster(&points, &ClusterParams::new(2.0, 3)).expect("valid");
        assert_eq!(set.num_clusters(), 2);
        assert!(set.noise().is_empty());
        assert_eq!(set.membership(), vec![vec![0, 1, 2], vec![3, 4, 5]]);
        for c in set.clusters() {
            let expected = c
                .members()
                .iter()
                .map(|&i| points[i].distance_to(&c.centroid()))
                .fold(0.0, f64::max);
            assert!((c.radius() - expected).abs() < 1e-12);
            assert_eq!(c.frequency(), 3);
        }
    }

    #[test]
    fn test_labels_follow_input_order() {
        let mut points = two_blobs();
        points.rotate_left(3);
        let set = cluster(&points, &ClusterParams::new(2.0, 3)).expect("valid");
        assert_eq!(set.labels()[0], Some(0));
        assert_eq!(set.labels()[3], Some(1));
    }

    #[test]
    fn test_border_point_joins_cluster() {
        // 0..=2 are core, 3 is within eps of 2 only
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ];
        let set = cluster(&points, &ClusterParams::new(1.0, 3)).expect("valid");
        assert_eq!(set.num_clusters(), 1);
        assert_eq!(set.labels()[3], Some(0));
        assert_eq!(set.clusters()[0].frequency(), 4);
    }

    #[test]
    fn test_border_point_does_not_expand() {
        // only 2 is core; 3 is a border point and 4 is only reachable through 3
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.9, 0.0),
            Point::new(2.8, 0.0),
        ];
        let set = cluster(&points, &ClusterParams::new(1.0, 4)).expect("valid");
        assert_eq!(set.labels()[3], Some(0));
        assert_eq!(set.labels()[4], None);
        assert_eq!(set.noise(), vec![4]);
    }

    #[test]
    fn test_all_noise() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let set = cluster(&points, &ClusterParams::new(1.0, 2)).expect("valid");
        assert_eq!(set.num_clusters(), 0);
        assert_eq!(set.noise(), vec![0, 1]);
    }

    #[test]
    fn test_singleton_noise_policy() {
        let mut points = two_blobs();
        points.push(Point::new(100.0, 100.0));
        let params = ClusterParams::new(2.0, 3).with_noise(NoisePolicy::Singleton);
        let set = cluster(&points, &params).expect("valid");
        assert_eq!(set.num_clusters(), 3);
        assert!(set.noise().is_empty());
        let lone = &set.clusters()[2];
        assert_eq!(lone.members(), &[6]);
        assert_eq!(lone.radius(), 0.0);
    }

    #[test]
    fn test_min_points_one_makes_every_point_a_cluster() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let set = cluster(&points, &ClusterParams::new(1.0, 1)).expect("valid");
        assert_eq!(set.num_clusters(), 2);
    }

    #[test]
    fn test_empty_input() {
        let set = cluster(&[], &ClusterParams::new(1.0, 3)).expect("empty is fine");
        assert!(set.labels().is_empty());
        assert_eq!(set.num_clusters(), 0);
    }

    #[test]
    fn test_invalid_params() {
        let points = two_blobs();
        assert!(matches!(
            cluster(&points, &ClusterParams::new(0.0, 3)),
            Err(PickupError::InvalidInput(_))
        ));
        assert!(cluster(&points, &ClusterParams::new(-1.0, 3)).is_err());
        assert!(cluster(&points, &ClusterParams::new(f64::NAN, 3)).is_err());
        assert!(cluster(&points, &ClusterParams::new(1.0, 0)).is_err());
        assert!(cluster(&[Point::new(f64::NAN, 0.0)], &ClusterParams::new(1.0, 1)).is_err());
    }

    #[test]
    fn test_params_from_json() {
        let params: ClusterParams =
            serde_json::from_str(r#"{"eps": 25.0, "noise": "singleton"}"#).expect("valid json");
        assert_eq!(params.eps, 25.0);
        assert_eq!(params.min_points, 3);
        assert_eq!(params.noise, NoisePolicy::Singleton);
    }

    #[test]
    fn test_far_isolated_point_is_noise() {
        let points = vec![Point::new(1e10, 1e10)];
        let set = cluster(&points, &ClusterParams::new(1e-10, 4)).expect("valid");
        assert_eq!(set.labels(), &[None]);
        assert_eq!(set.num_clusters(), 0);
    }
}
