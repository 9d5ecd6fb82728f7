//! Greedy cheapest-insertion construction across a fixed fleet.
//!
//! # Algorithm
//!
//! Every vehicle starts with an empty depot-to-depot route. Each step scans
//! all (route, position, unassigned node) triples whose route still has room
//! for the node's demand and inserts the one with the smallest cost increase
//!
//! ```text
//! delta = d(prev, u) + d(u, next) - d(prev, next)
//! ```
//!
//! Arcs marked unreachable are never created. Near-equal candidates (within
//! 1e-10) resolve to the lowest route index, then position, then node index.
//! Construction ends when every node is placed or no insertion fits.
//!
//! # Complexity
//!
//! O(n² · (n + R)) where n = demand nodes, R = vehicles.
//!
//! # Reference
//!
//! Rosenkrantz, D.J., Stearns, R.E. & Lewis, P.M. (1977). "An Analysis of
//! Several Heuristics for the Traveling Salesman Problem", *SIAM Journal on
//! Computing* 6(3), 563-581.

use crate::evaluation::Instance;

const EPS: f64 = 1e-10;

/// Result of construction: stop sequences per vehicle and the nodes that
/// could not be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Construction {
    /// Stops per vehicle (depot excluded), indexed by vehicle.
    pub routes: Vec<Vec<usize>>,
    /// Nodes left without a feasible insertion, ascending.
    pub unserved: Vec<usize>,
}

impl Construction {
    /// Returns `true` if every demand node was placed.
    pub fn is_complete(&self) -> bool {
        self.unserved.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    route: usize,
    position: usize,
    node: usize,
    delta: f64,
}

/// Builds routes for every vehicle by repeated cheapest insertion.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Node;
/// use u_pickup::distance::DistanceMatrix;
/// use u_pickup::evaluation::Instance;
/// use u_pickup::constructive::cheapest_insertion;
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 1.0, 0.0, 1),
///     Node::new(2, 2.0, 0.0, 1),
///     Node::new(3, 3.0, 0.0, 1),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// let inst = Instance::new(&dm, &[0, 1, 1, 1], &[3], 0).unwrap();
///
/// let built = cheapest_insertion(&inst);
/// assert!(built.is_complete());
/// assert_eq!(built.routes[0].len(), 3);
/// ```
pub fn cheapest_insertion(instance: &Instance<'_>) -> Construction {
    let depot = instance.depot();
    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); instance.num_vehicles()];
    let mut loads: Vec<i32> = vec![0; instance.num_vehicles()];
    let mut unassigned: Vec<usize> = instance.demand_nodes();

    while !unassigned.is_empty() {
        let mut best: Option<Candidate> = None;

        for (r, route) in routes.iter().enumerate() {
            let room = instance.capacity(r) - loads[r];
            for position in 0..=route.len() {
                let prev = if position == 0 { depot } else { route[position - 1] };
                let next = if position == route.len() { depot } else { route[position] };
                let removed = instance.distance(prev, next);

                for &u in &unassigned {
                    if instance.demand(u) > room {
                        continue;
                    }
                    let (into, out) = (instance.distance(prev, u), instance.distance(u, next));
                    if !into.is_finite() || !out.is_finite() {
                        continue;
                    }
                    let delta = into + out - removed;
                    if best.as_ref().map_or(true, |b| delta < b.delta - EPS) {
                        best = Some(Candidate {
                            route: r,
                            position,
                            node: u,
                            delta,
                        });
                    }
                }
            }
        }

        let Some(c) = best else {
            break;
        };
        routes[c.route].insert(c.position, c.node);
        loads[c.route] += instance.demand(c.node);
        unassigned.retain(|&u| u != c.node);
    }

    log::debug!(
        "construction placed {} nodes on {} routes, {} unserved",
        routes.iter().map(Vec::len).sum::<usize>(),
        routes.iter().filter(|r| !r.is_empty()).count(),
        unassigned.len()
    );

    Construction {
        routes,
        unserved: unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::evaluation::RouteEvaluator;
    use crate::models::Node;

    fn line_matrix() -> DistanceMatrix {
        let nodes = vec![
            Node::depot(0, 0.0, 0.0),
            Node::new(1, 1.0, 0.0, 1),
            Node::new(2, 2.0, 0.0, 1),
            Node::new(3, 3.0, 0.0, 1),
        ];
        DistanceMatrix::from_nodes(&nodes)
    }

    #[test]
    fn test_all_on_one_route() {
        let dm = line_matrix();
        let inst = Instance::new(&dm, &[0, 1, 1, 1], &[3], 0).expect("valid");
        let built = cheapest_insertion(&inst);
        assert!(built.is_complete());
        let eval = RouteEvaluator::new(&inst);
        assert!((eval.cost(&built.routes[0]) - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_respects_capacity() {
        let dm = line_matrix();
        let inst = Instance::new(&dm, &[0, 1, 1, 1], &[2, 2], 0).expect("valid");
        let built = cheapest_insertion(&inst);
        assert!(built.is_complete());
        assert!(built.routes.iter().all(|r| r.len() <= 2));
        assert_eq!(built.routes.iter().map(Vec::len).sum::<usize>(), 3);
    }

    #[test]
    fn test_ties_prefer_lowest_route() {
        let dm = line_matrix();
        let inst = Instance::new(&dm, &[0, 1, 1, 1], &[5, 5], 0).expect("valid");
        let built = cheapest_insertion(&inst);
        // every first insertion costs the same on either empty route
        assert_eq!(built.routes[0].len(), 3);
        assert!(built.routes[1].is_empty());
    }

    #[test]
    fn test_insufficient_capacity_leaves_unserved() {
        let dm = line_matrix();
        let inst = Instance::new(&dm, &[0, 1, 1, 1], &[2], 0).expect("valid");
        let built = cheapest_insertion(&inst);
        assert!(!built.is_complete());
        assert_eq!(built.unserved.len(), 1);
    }

    #[test]
    fn test_skips_unreachable_arcs() {
        let mut dm = line_matrix();
        // node 3 cannot be reached from anywhere
        for i in 0..3 {
            dm.set(i, 3, DistanceMatrix::UNREACHABLE);
        }
        let inst = Instance::new(&dm, &[0, 1, 1, 1], &[5], 0).expect("valid");
        let built = cheapest_insertion(&inst);
        assert_eq!(built.unserved, vec![3]);
        assert!(!built.routes[0].contains(&3));
    }

    #[test]
    fn test_routes_around_one_way_arc() {
        let mut dm = line_matrix();
        // 3 cannot go straight home but can continue via 2
        dm.set(3, 0, DistanceMatrix::UNREACHABLE);
        let inst = Instance::new(&dm, &[0, 1, 1, 1], &[5], 0).expect("valid");
        let built = cheapest_insertion(&inst);
        assert!(built.is_complete());
        let r = &built.routes[0];
        assert_ne!(r.last(), Some(&3));
    }

    #[test]
    fn test_deterministic() {
        let dm = line_matrix();
        let inst = Instance::new(&dm, &[0, 1, 1, 1], &[2, 2], 0).expect("valid");
        assert_eq!(cheapest_insertion(&inst), cheapest_insertion(&inst));
    }
}
