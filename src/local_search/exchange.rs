//! Inter-route tail exchange (2-opt*).
//!
//! # Algorithm
//!
//! Given routes R1 = [a₁, ..., aᵢ, aᵢ₊₁, ..., aₙ] and
//! R2 = [b₁, ..., bⱼ, bⱼ₊₁, ..., bₘ], swap the tails:
//!
//! R1' = [a₁, ..., aᵢ, bⱼ₊₁, ..., bₘ]
//! R2' = [b₁, ..., bⱼ, aᵢ₊₁, ..., aₙ]
//!
//! Only the two arcs at the cut points change, and tails keep their
//! direction, so the delta is exact for asymmetric matrices too. Moves must
//! keep both routes within their own vehicle's capacity.
//!
//! # Complexity
//!
//! O(n² × R²) per scan, where n = stops per route, R = number of routes.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use super::moves::{pick, Move, MoveKind, Neighborhood};

/// Finds the best tail exchange over all route pairs, improving or not.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Node;
/// use u_pickup::distance::DistanceMatrix;
/// use u_pickup::evaluation::Instance;
/// use u_pickup::local_search::{best_exchange, Neighborhood};
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 5.0, 1.0, 1),   // east
///     Node::new(2, -5.0, -1.0, 1), // west
///     Node::new(3, 5.0, -1.0, 1),  // east
///     Node::new(4, -5.0, 1.0, 1),  // west
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// let inst = Instance::new(&dm, &[0, 1, 1, 1, 1], &[2, 2], 0).unwrap();
///
/// // each route crosses the depot once
/// let routes = vec![vec![1, 4], vec![2, 3]];
/// let mv = best_exchange(&Neighborhood::new(&inst, &routes, false)).unwrap();
/// assert!(mv.is_improving());
/// ```
pub fn best_exchange(hood: &Neighborhood<'_>) -> Option<Move> {
    hood.scan(|r| best_from_route(hood, r))
}

fn prefix_loads(hood: &Neighborhood<'_>, r: usize) -> Vec<i32> {
    let mut prefix = Vec::with_capacity(hood.routes[r].len() + 1);
    prefix.push(0);
    let mut acc = 0;
    for &s in &hood.routes[r] {
        acc += hood.instance.demand(s);
        prefix.push(acc);
    }
    prefix
}

fn best_from_route(hood: &Neighborhood<'_>, first: usize) -> Option<Move> {
    let n1 = hood.routes[first].len();
    let pre1 = prefix_loads(hood, first);
    let cap1 = hood.instance.capacity(first);
    let mut best = None;

    for second in (first + 1)..hood.routes.len() {
        let n2 = hood.routes[second].len();
        if n1 == 0 && n2 == 0 {
            continue;
        }
        let pre2 = prefix_loads(hood, second);
        let cap2 = hood.instance.capacity(second);

        for cut1 in 0..=n1 {
            // last kept stop of R1 and first stop of its tail
            let a = hood.at(first, cut1 as isize - 1);
            let a_next = hood.at(first, cut1 as isize);
            let tail1 = pre1[n1] - pre1[cut1];

            for cut2 in 0..=n2 {
                let tail2 = pre2[n2] - pre2[cut2];
                // kept heads never exceed their capacity, so these
                // differences cannot overflow
                if tail2 > cap1 - pre1[cut1] || tail1 > cap2 - pre2[cut2] {
                    continue;
                }
                let b = hood.at(second, cut2 as isize - 1);
                let b_next = hood.at(second, cut2 as isize);

                let old = hood.d(a, a_next) + hood.d(b, b_next);
                let new = hood.d(a, b_next) + hood.d(b, a_next);
                let delta = new - old;
                if delta.is_finite() {
                    best = pick(
                        best,
                        Some(Move {
                            delta,
                            kind: MoveKind::Exchange {
                                first,
                                first_cut: cut1,
                                second,
                                second_cut: cut2,
                            },
                        }),
                    );
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::evaluation::{Instance, RouteEvaluator};
    use crate::models::Node;

    fn interleaved() -> DistanceMatrix {
        let nodes = vec![
            Node::depot(0, 0.0, 0.0),
            Node::new(1, 5.0, 1.0, 1),
            Node::new(2, -5.0, -1.0, 1),
            Node::new(3, 5.0, -1.0, 1),
            Node::new(4, -5.0, 1.0, 1),
        ];
        DistanceMatrix::from_nodes(&nodes)
    }

    fn total(inst: &Instance<'_>, routes: &[Vec<usize>]) -> f64 {
        let eval = RouteEvaluator::new(inst);
        routes.iter().map(|r| eval.cost(r)).sum()
    }

    #[test]
    fn test_fixes_interleaved_routes() {
        let dm = interleaved();
        let inst = Instance::new(&dm, &[0, 1, 1, 1, 1], &[2, 2], 0).expect("valid");
        let mut routes = vec![vec![1, 4], vec![2, 3]];
        let before = total(&inst, &routes);
        let mv = best_exchange(&Neighborhood::new(&inst, &routes, false)).expect("move");
        mv.apply(&mut routes);
        let after = total(&inst, &routes);
        assert!((after - before - mv.delta).abs() < 1e-9);
        assert!(after < before);
        assert_eq!(routes, vec![vec![1, 3], vec![2, 4]]);
    }

    #[test]
    fn test_respects_each_vehicle_capacity() {
        let dm = interleaved();
        let inst = Instance::new(&dm, &[0, 1, 1, 1, 1], &[3, 1], 0).expect("valid");
        let routes = vec![vec![1, 4, 2], vec![3]];
        let hood = Neighborhood::new(&inst, &routes, false);
        if let Some(mv) = best_exchange(&hood) {
            let mut next = routes.clone();
            mv.apply(&mut next);
            assert!(next[0].len() <= 3);
            assert!(next[1].len() <= 1);
        }
    }

    #[test]
    fn test_can_empty_a_route() {
        // a tail swap at cut 0 hands the whole route over
        let dm = interleaved();
        let inst = Instance::new(&dm, &[0, 1, 1, 1, 1], &[4, 4], 0).expect("valid");
        let routes = vec![vec![1], vec![3]];
        let hood = Neighborhood::new(&inst, &routes, false);
        let mv = best_exchange(&hood).expect("move");
        assert!(mv.is_improving());
        let mut next = routes.clone();
        mv.apply(&mut next);
        assert_eq!(next.iter().filter(|r| r.is_empty()).count(), 1);
    }

    #[test]
    fn test_large_capacities_do_not_overflow() {
        let dm = interleaved();
        let big = 1_000_000_000;
        let demands = [0, big, big, big, big];
        let caps = [2 * big, 2 * big];
        let inst = Instance::new(&dm, &demands, &caps, 0).expect("valid");
        let routes = vec![vec![1, 4], vec![2, 3]];
        let mv = best_exchange(&Neighborhood::new(&inst, &routes, false)).expect("move");
        let mut next = routes.clone();
        mv.apply(&mut next);
        let eval = RouteEvaluator::new(&inst);
        for (v, r) in next.iter().enumerate() {
            assert!(eval.load(r) <= caps[v]);
        }
    }
}
