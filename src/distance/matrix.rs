//! Dense distance matrix.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{PickupError, Result};
use crate::models::Node;

/// A dense n×n distance matrix stored in row-major order.
///
/// Entries are non-negative travel costs or [`DistanceMatrix::UNREACHABLE`]
/// when no path exists. The diagonal is zero.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Node;
/// use u_pickup::distance::DistanceMatrix;
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 3.0, 4.0, 1),
///     Node::new(2, 6.0, 8.0, 1),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Marker for a pair with no connecting path.
    pub const UNREACHABLE: f64 = f64::INFINITY;

    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a Euclidean distance matrix from node coordinates.
    ///
    /// Rows are filled in parallel; the lower triangle mirrors the upper one
    /// so the result is exactly symmetric.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let n = nodes.len();
        let mut data = vec![0.0; n * n];
        if n == 0 {
            return Self { data, size: 0 };
        }
        data.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = if i == j {
                    0.0
                } else {
                    let (a, b) = if i < j { (i, j) } else { (j, i) };
                    nodes[a].distance_to(&nodes[b])
                };
            }
        });
        Self { data, size: n }
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Fails if the data length doesn't match `size * size`, if an entry is
    /// NaN or negative, or if a diagonal entry is not zero.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != size * size {
            return Err(PickupError::invalid(format!(
                "matrix data has {} entries, expected {}",
                data.len(),
                size * size
            )));
        }
        if let Some(bad) = data.iter().find(|d| d.is_nan() || **d < 0.0) {
            return Err(PickupError::invalid(format!("matrix entry {bad} is not a valid cost")));
        }
        if let Some(i) = (0..size).find(|&i| data[i * size + i] != 0.0) {
            return Err(PickupError::invalid(format!(
                "diagonal entry ({i}, {i}) is {}, expected 0",
                data[i * size + i]
            )));
        }
        Ok(Self { data, size })
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if a path exists from `from` to `to`.
    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        self.get(from, to).is_finite()
    }

    /// All ordered pairs marked unreachable, in row-major order.
    pub fn unreachable_pairs(&self) -> Vec<(usize, usize)> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.is_finite())
            .map(|(k, _)| (k / self.size, k % self.size))
            .collect()
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    ///
    /// Two unreachable entries count as equal.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let (a, b) = (self.get(i, j), self.get(j, i));
                if a == b {
                    continue;
                }
                if (a - b).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the nearest reachable neighbor of `from` among the candidates.
    ///
    /// Ties go to the candidate listed first. Returns `None` if no
    /// candidate is reachable.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .filter(|&c| self.is_reachable(from, c))
            .fold(None, |best: Option<usize>, c| match best {
                Some(b) if self.get(from, b) <= self.get(from, c) => Some(b),
                _ => Some(c),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_nodes() -> Vec<Node> {
        vec![
            Node::depot(0, 0.0, 0.0),
            Node::new(1, 3.0, 4.0, 1),
            Node::new(2, 0.0, 8.0, 1),
        ]
    }

    #[test]
    fn test_from_nodes() {
        let dm = DistanceMatrix::from_nodes(&sample_nodes());
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert_eq!(dm.get(1, 1), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let dm = DistanceMatrix::from_nodes(&sample_nodes());
        assert!(dm.is_symmetric(0.0));
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 5.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(1, 0), 5.0);
    }

    #[test]
    fn test_from_data_invalid() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]).is_err());
        assert!(DistanceMatrix::from_data(2, vec![0.0, -1.0, 1.0, 0.0]).is_err());
        assert!(DistanceMatrix::from_data(2, vec![0.0, f64::NAN, 1.0, 0.0]).is_err());
        assert!(DistanceMatrix::from_data(2, vec![0.0, f64::INFINITY, 1.0, 0.0]).is_ok());
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 1.0, 3.0]).is_err());
        assert!(DistanceMatrix::from_data(2, vec![f64::INFINITY, 1.0, 1.0, 0.0]).is_err());
    }

    #[test]
    fn test_unreachable_pairs() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 2, DistanceMatrix::UNREACHABLE);
        dm.set(2, 1, DistanceMatrix::UNREACHABLE);
        assert!(!dm.is_reachable(0, 2));
        assert!(dm.is_reachable(2, 0));
        assert_eq!(dm.unreachable_pairs(), vec![(0, 2), (2, 1)]);
    }

    #[test]
    fn test_nearest_neighbor() {
        let mut dm = DistanceMatrix::from_nodes(&sample_nodes());
        assert_eq!(dm.nearest_neighbor(0, &[1, 2]), Some(1));
        assert_eq!(dm.nearest_neighbor(0, &[2]), Some(2));
        assert_eq!(dm.nearest_neighbor(0, &[]), None);
        dm.set(0, 1, DistanceMatrix::UNREACHABLE);
        assert_eq!(dm.nearest_neighbor(0, &[1, 2]), Some(2));
        assert_eq!(dm.nearest_neighbor(0, &[1]), None);
    }

    #[test]
    fn test_asymmetric_matrix() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 10.0);
        dm.set(1, 0, 15.0);
        assert!(!dm.is_symmetric(1e-10));
    }
}
