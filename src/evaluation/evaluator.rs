//! Route evaluator that computes load, cost, and feasibility.

use super::Instance;
use crate::models::{Route, Solution, Violation, ViolationType};

/// Relative tolerance when comparing stored and recomputed route costs.
const COST_TOLERANCE: f64 = 1e-9;

/// Evaluates stop sequences against an [`Instance`]: cumulative load, total
/// arc cost, and the route/solution invariants.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Node;
/// use u_pickup::distance::DistanceMatrix;
/// use u_pickup::evaluation::{Instance, RouteEvaluator};
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 3.0, 4.0, 1),
///     Node::new(2, 6.0, 8.0, 1),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// let inst = Instance::new(&dm, &[0, 1, 1], &[5], 0).unwrap();
///
/// let evaluator = RouteEvaluator::new(&inst);
/// let route = evaluator.build_route(0, vec![1, 2]);
/// assert_eq!(route.load(), 2);
/// assert!((route.cost() - 20.0).abs() < 1e-10);
/// ```
pub struct RouteEvaluator<'a> {
    instance: &'a Instance<'a>,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator for the given instance.
    pub fn new(instance: &'a Instance<'a>) -> Self {
        Self { instance }
    }

    /// Builds a route for `vehicle_id` from a stop sequence (depot excluded).
    pub fn build_route(&self, vehicle_id: usize, stops: Vec<usize>) -> Route {
        let load = self.load(&stops);
        let cost = self.cost(&stops);
        Route::new(vehicle_id, self.instance.depot(), stops, load, cost)
    }

    /// Sum of demands over `stops`.
    pub fn load(&self, stops: &[usize]) -> i32 {
        stops.iter().map(|&s| self.instance.demand(s)).sum()
    }

    /// Arc cost of `depot → stops… → depot`.
    ///
    /// Infinite if the route crosses an unreachable arc.
    pub fn cost(&self, stops: &[usize]) -> f64 {
        let depot = self.instance.depot();
        let mut prev = depot;
        let mut total = 0.0;
        for &s in stops {
            total += self.instance.distance(prev, s);
            prev = s;
        }
        total + self.instance.distance(prev, depot)
    }

    /// Builds one route per vehicle from stop sequences and wraps them in a
    /// [`Solution`].
    pub fn build_solution(&self, routes: &[Vec<usize>]) -> Solution {
        let routes = routes
            .iter()
            .enumerate()
            .map(|(v, stops)| self.build_route(v, stops.clone()))
            .collect();
        Solution::new(routes, self.instance.num_nodes())
    }

    /// Checks every invariant of `solution`; an empty result means feasible.
    pub fn check_solution(&self, solution: &Solution) -> Vec<Violation> {
        let inst = self.instance;
        let n = inst.num_nodes();
        let depot = inst.depot();
        let mut violations = Vec::new();
        let mut visits = vec![0usize; n];

        if solution.num_routes() != inst.num_vehicles() {
            violations.push(Violation::new(ViolationType::WrongRouteCount {
                routes: solution.num_routes(),
                vehicles: inst.num_vehicles(),
            }));
        }

        for (idx, route) in solution.routes().iter().enumerate() {
            let stops = route.stops();

            if let Some(&bad) = stops.iter().find(|&&s| s >= n) {
                violations.push(Violation::new(ViolationType::UnknownNode {
                    route_index: idx,
                    node: bad,
                }));
                continue;
            }
            if route.depot() != depot || stops.contains(&depot) {
                violations.push(Violation::new(ViolationType::DepotVisited { route_index: idx }));
            }
            for &s in stops {
                visits[s] += 1;
            }

            let path = route.path();
            for arc in path.windows(2) {
                if !inst.matrix().is_reachable(arc[0], arc[1]) {
                    violations.push(Violation::new(ViolationType::UnreachableArc {
                        route_index: idx,
                        from: arc[0],
                        to: arc[1],
                    }));
                }
            }

            let load = self.load(stops);
            let capacity = inst
                .vehicles()
                .get(route.vehicle_id())
                .map_or(0, |v| v.capacity());
            if load > capacity || load != route.load() {
                violations.push(Violation::new(ViolationType::CapacityExceeded {
                    route_index: idx,
                    load,
                    capacity,
                }));
            }

            let actual = self.cost(stops);
            if actual.is_finite() && !costs_match(route.cost(), actual) {
                violations.push(Violation::new(ViolationType::CostMismatch {
                    route_index: idx,
                    stored: route.cost(),
                    actual,
                }));
            }
        }

        for (node, &count) in visits.iter().enumerate() {
            if node == depot {
                continue;
            }
            match count {
                0 => violations.push(Violation::new(ViolationType::MissingNode { node })),
                1 => {}
                _ => violations.push(Violation::new(ViolationType::DuplicateNode { node })),
            }
        }

        violations
    }
}

fn costs_match(stored: f64, actual: f64) -> bool {
    (stored - actual).abs() <= COST_TOLERANCE * actual.abs().max(1.0)
}
