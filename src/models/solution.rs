//! Solution and violation types.

use serde::{Deserialize, Serialize};

use super::Route;
use crate::evaluation::{Instance, RouteEvaluator};

/// A type of invariant violation in a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Route load exceeds its vehicle's capacity.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Load carried by the route.
        load: i32,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// A demand node is not served by any route.
    MissingNode {
        /// Matrix index of the node.
        node: usize,
    },
    /// A demand node is served more than once.
    DuplicateNode {
        /// Matrix index of the node.
        node: usize,
    },
    /// The depot appears among a route's stops.
    DepotVisited {
        /// Route index.
        route_index: usize,
    },
    /// A stop index is outside the distance matrix.
    UnknownNode {
        /// Route index.
        route_index: usize,
        /// Offending index.
        node: usize,
    },
    /// A route crosses an arc marked unreachable.
    UnreachableArc {
        /// Route index.
        route_index: usize,
        /// Arc tail.
        from: usize,
        /// Arc head.
        to: usize,
    },
    /// Stored route cost or load disagrees with the recomputed value.
    CostMismatch {
        /// Route index.
        route_index: usize,
        /// Stored cost.
        stored: f64,
        /// Recomputed cost.
        actual: f64,
    },
    /// Number of routes differs from the number of vehicles.
    WrongRouteCount {
        /// Routes present.
        routes: usize,
        /// Vehicles in the fleet.
        vehicles: usize,
    },
}

/// An invariant violation found while checking a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// A complete assignment of demand nodes to vehicle routes.
///
/// Holds exactly one route per vehicle (unused vehicles get a depot-to-depot
/// route). Built wholesale by the solver and read-only afterwards.
///
/// # Examples
///
/// ```
/// use u_pickup::models::{Route, Solution};
///
/// let routes = vec![
///     Route::new(0, 0, vec![1, 2], 2, 6.0),
///     Route::empty(1, 0),
/// ];
/// let sol = Solution::new(routes, 3);
/// assert_eq!(sol.num_routes(), 2);
/// assert_eq!(sol.route_of(2), Some(0));
/// assert_eq!(sol.route_of(0), None);
/// assert!((sol.total_cost() - 6.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
    assignment: Vec<Option<usize>>,
    total_cost: f64,
}

impl Solution {
    /// Creates a solution over a matrix of `num_nodes` locations.
    ///
    /// Stops outside `0..num_nodes` are kept in their routes but left out
    /// of the node lookup; [`Solution::validate`] reports them.
    pub fn new(routes: Vec<Route>, num_nodes: usize) -> Self {
        let mut assignment = vec![None; num_nodes];
        for (idx, route) in routes.iter().enumerate() {
            for &stop in route.stops() {
                if let Some(slot) = assignment.get_mut(stop) {
                    slot.get_or_insert(idx);
                }
            }
        }
        let total_cost = routes.iter().map(|r| r.cost()).sum();
        Self {
            routes,
            assignment,
            total_cost,
        }
    }

    /// Returns the routes, one per vehicle.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns route `index`, if present.
    pub fn route(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    /// Number of routes (equals fleet size).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Load carried by route `index`.
    pub fn route_load(&self, index: usize) -> Option<i32> {
        self.routes.get(index).map(|r| r.load())
    }

    /// Cost of route `index`.
    pub fn route_cost(&self, index: usize) -> Option<f64> {
        self.routes.get(index).map(|r| r.cost())
    }

    /// Total cost over all routes.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Index of the route serving `node`, or `None` for the depot and
    /// unserved nodes.
    pub fn route_of(&self, node: usize) -> Option<usize> {
        self.assignment.get(node).copied().flatten()
    }

    /// Number of stops across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Number of vehicles that leave the depot.
    pub fn used_vehicles(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Checks every route and assignment invariant against `instance`.
    ///
    /// An empty result means the solution is feasible.
    pub fn validate(&self, instance: &Instance) -> Vec<Violation> {
        RouteEvaluator::new(instance).check_solution(self)
    }
}
