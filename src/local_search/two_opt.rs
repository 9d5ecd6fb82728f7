//! Intra-route 2-opt segment reversal.
//!
//! # Algorithm
//!
//! For each pair of positions `i < j` in a route, reversing `r[i..=j]`
//! replaces the arcs entering and leaving the segment:
//!
//! ```text
//! delta = d(p, r[j]) + d(r[i], n) - d(p, r[i]) - d(r[j], n) + inner
//! ```
//!
//! where `p`/`n` are the stops before and after the segment. `inner` is the
//! cost change of traversing the segment backwards; it is zero for a
//! symmetric matrix and accumulated incrementally otherwise, so road-network
//! matrices are handled exactly.
//!
//! # Complexity
//!
//! O(n²) per route.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::moves::{pick, Move, MoveKind, Neighborhood};

/// Finds the best segment reversal over all routes, improving or not.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Node;
/// use u_pickup::distance::DistanceMatrix;
/// use u_pickup::evaluation::Instance;
/// use u_pickup::local_search::{best_two_opt, Neighborhood};
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
/// // 0 → 2 → 1 → 3 → 0 backtracks; reversing [2, 1] fixes it
/// let routes = vec![vec![2, 1, 3]];
/// let mv = best_two_opt(&Neighborhood::new(&inst, &routes, false)).unwrap();
/// assert!((mv.delta + 2.0).abs() < 1e-10);
/// ```
pub fn best_two_opt(hood: &Neighborhood<'_>) -> Option<Move> {
    hood.scan(|r| best_in_route(hood, r))
}

fn best_in_route(hood: &Neighborhood<'_>, r: usize) -> Option<Move> {
    let route = &hood.routes[r];
    let len = route.len();
    let mut best = None;

    for i in 0..len.saturating_sub(1) {
        let p = hood.at(r, i as isize - 1);
        let old_in = hood.d(p, route[i]);
        let mut inner = 0.0;

        for j in (i + 1)..len {
            inner += hood.d(route[j], route[j - 1]) - hood.d(route[j - 1], route[j]);
            let n = hood.at(r, j as isize + 1);
            let delta =
                hood.d(p, route[j]) + hood.d(route[i], n) - old_in - hood.d(route[j], n) + inner;
            if delta.is_finite() {
                best = pick(
                    best,
                    Some(Move {
                        delta,
                        kind: MoveKind::TwoOpt {
                            route: r,
                            start: i,
                            end: j,
                        },
                    }),
                );
            }
        }
    }

    best
}
