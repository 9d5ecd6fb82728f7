//! Validated solver input.

use crate::distance::DistanceMatrix;
use crate::error::{PickupError, Result};
use crate::models::Vehicle;

/// A capacitated routing instance: matrix, per-node demands, fleet, depot.
///
/// Construction validates every input, so solver code can index freely.
///
/// # Examples
///
/// ```
/// use u_pickup::distance::DistanceMatrix;
/// use u_pickup::evaluation::Instance;
///
/// let dm = DistanceMatrix::from_data(2, vec![0.0, 4.0, 4.0, 0.0]).unwrap();
/// let inst = Instance::new(&dm, &[0, 1], &[3], 0).unwrap();
/// assert_eq!(inst.demand_nodes(), vec![1]);
/// assert!(Instance::new(&dm, &[1, 1], &[3], 0).is_err()); // depot demand
/// ```
#[derive(Debug, Clone)]
pub struct Instance<'a> {
    matrix: &'a DistanceMatrix,
    demands: &'a [i32],
    vehicles: Vec<Vehicle>,
    depot: usize,
}

impl<'a> Instance<'a> {
    /// Validates and wraps the inputs.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty fleet, a non-positive capacity, a depot
    /// outside the matrix, non-zero depot demand, a negative demand, a
    /// demand list whose length differs from the matrix size, a matrix
    /// entry that is NaN or negative, or a non-zero diagonal entry.
    pub fn new(
        matrix: &'a DistanceMatrix,
        demands: &'a [i32],
        capacities: &[i32],
        depot: usize,
    ) -> Result<Self> {
        let n = matrix.size();
        if capacities.is_empty() {
            return Err(PickupError::invalid("fleet has no vehicles"));
        }
        if let Some((v, c)) = capacities.iter().enumerate().find(|(_, &c)| c <= 0) {
            return Err(PickupError::invalid(format!(
                "vehicle {v} has non-positive capacity {c}"
            )));
        }
        if depot >= n {
            return Err(PickupError::invalid(format!(
                "depot index {depot} outside matrix of size {n}"
            )));
        }
        if demands.len() != n {
            return Err(PickupError::invalid(format!(
                "{} demands given for {n} nodes",
                demands.len()
            )));
        }
        if demands[depot] != 0 {
            return Err(PickupError::invalid(format!(
                "depot demand must be zero, got {}",
                demands[depot]
            )));
        }
        if let Some((i, d)) = demands.iter().enumerate().find(|(_, &d)| d < 0) {
            return Err(PickupError::invalid(format!("node {i} has negative demand {d}")));
        }
        for i in 0..n {
            for j in 0..n {
                let d = matrix.get(i, j);
                if d.is_nan() || d < 0.0 {
                    return Err(PickupError::invalid(format!(
                        "matrix entry ({i}, {j}) = {d} is not a valid cost"
                    )));
                }
                if i == j && d != 0.0 {
                    return Err(PickupError::invalid(format!(
                        "diagonal entry ({i}, {i}) = {d}, expected 0"
                    )));
                }
            }
        }

        Ok(Self {
            matrix,
            demands,
            vehicles: Vehicle::fleet(capacities),
            depot,
        })
    }

    /// The distance matrix.
    pub fn matrix(&self) -> &DistanceMatrix {
        self.matrix
    }

    /// Travel cost from `from` to `to`.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.matrix.get(from, to)
    }

    /// Demand at `node`.
    pub fn demand(&self, node: usize) -> i32 {
        self.demands[node]
    }

    /// Per-node demands.
    pub fn demands(&self) -> &[i32] {
        self.demands
    }

    /// The fleet, in capacity-list order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Capacity of vehicle `v`.
    pub fn capacity(&self, v: usize) -> i32 {
        self.vehicles[v].capacity()
    }

    /// Depot matrix index.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Number of matrix nodes, depot included.
    pub fn num_nodes(&self) -> usize {
        self.matrix.size()
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    /// All non-depot node indices, ascending.
    pub fn demand_nodes(&self) -> Vec<usize> {
        (0..self.num_nodes()).filter(|&i| i != self.depot).collect()
    }

    /// Sum of all demands.
    pub fn total_demand(&self) -> i64 {
        self.demands.iter().map(|&d| i64::from(d)).sum()
    }

    /// Sum of all vehicle capacities.
    pub fn total_capacity(&self) -> i64 {
        self.vehicles.iter().map(|v| i64::from(v.capacity())).sum()
    }

    /// Largest single vehicle capacity.
    pub fn max_capacity(&self) -> i32 {
        self.vehicles.iter().map(Vehicle::capacity).max().unwrap_or(0)
    }
}
