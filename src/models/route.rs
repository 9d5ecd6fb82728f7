//! Route type.

use serde::{Deserialize, Serialize};

/// An ordered sequence of stops served by a single vehicle.
///
/// A route starts and ends at the depot. The depot is not stored among the
/// stops; [`Route::path`] yields the full depot-to-depot sequence. Load and
/// cost are filled in by the [`RouteEvaluator`](crate::evaluation::RouteEvaluator).
///
/// # Examples
///
/// ```
/// use u_pickup::models::Route;
///
/// let route = Route::new(1, 0, vec![3, 2], 2, 12.5);
/// assert_eq!(route.path(), vec![0, 3, 2, 0]);
/// assert_eq!(route.vehicle_id(), 1);
/// assert_eq!(route.load(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    vehicle_id: usize,
    depot: usize,
    stops: Vec<usize>,
    load: i32,
    cost: f64,
}

impl Route {
    /// Creates a route with precomputed load and cost.
    pub fn new(vehicle_id: usize, depot: usize, stops: Vec<usize>, load: i32, cost: f64) -> Self {
        Self {
            vehicle_id,
            depot,
            stops,
            load,
            cost,
        }
    }

    /// Creates a depot-to-depot route with no stops.
    pub fn empty(vehicle_id: usize, depot: usize) -> Self {
        Self::new(vehicle_id, depot, Vec::new(), 0, 0.0)
    }

    /// Vehicle serving this route.
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// Depot matrix index.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Stops in visit order, depot excluded.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Full node sequence, beginning and ending at the depot.
    pub fn path(&self) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.stops.len() + 2);
        path.push(self.depot);
        path.extend_from_slice(&self.stops);
        path.push(self.depot);
        path
    }

    /// Number of stops (excluding depot).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if the vehicle never leaves the depot.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Total demand collected on this route.
    pub fn load(&self) -> i32 {
        self.load
    }

    /// Sum of arc costs along [`Route::path`].
    pub fn cost(&self) -> f64 {
        self.cost
    }
}
