//! Single-stop relocation, within or across routes.
//!
//! # Algorithm
//!
//! Tries moving each stop from its current position to every other position
//! of every route whose remaining capacity admits its demand (its own route
//! always does). The cost change is the removal gain plus the insertion cost:
//!
//! ```text
//! delta = d(p, n) - d(p, u) - d(u, n)  +  d(a, u) + d(u, b) - d(a, b)
//! ```
//!
//! where `p, n` surround `u` before the move and `a, b` surround the new
//! position. Moves that would use an unreachable arc are skipped.
//!
//! # Complexity
//!
//! O(n²) per scan where n = total stops.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::moves::{pick, Move, MoveKind, Neighborhood};

/// Finds the best relocate move, improving or not.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Node;
/// use u_pickup::distance::DistanceMatrix;
/// use u_pickup::evaluation::Instance;
/// use u_pickup::local_search::{best_relocate, Neighborhood};
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 10.0, 0.0, 1),
///     Node::new(2, 11.0, 0.0, 1),
///     Node::new(3, -10.0, 0.0, 1),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// let inst = Instance::new(&dm, &[0, 1, 1, 1], &[3, 3], 0).unwrap();
///
/// // 2 sits on the wrong side of the depot
/// let routes = vec![vec![1], vec![3, 2]];
/// let mv = best_relocate(&Neighborhood::new(&inst, &routes, false)).unwrap();
/// assert!(mv.is_improving());
/// ```
pub fn best_relocate(hood: &Neighborhood<'_>) -> Option<Move> {
    hood.scan(|r| best_from_route(hood, r))
}

fn best_from_route(hood: &Neighborhood<'_>, from: usize) -> Option<Move> {
    let route = &hood.routes[from];
    let mut best = None;

    for i in 0..route.len() {
        let u = route[i];
        let p = hood.at(from, i as isize - 1);
        let n = hood.at(from, i as isize + 1);
        let removal = hood.d(p, n) - hood.d(p, u) - hood.d(u, n);
        if !removal.is_finite() {
            continue;
        }
        let demand = hood.instance.demand(u);

        for to in 0..hood.routes.len() {
            if to == from {
                best = pick(best, best_within(hood, from, i, u, removal));
                continue;
            }
            if demand > hood.room(to) {
                continue;
            }
            let target_len = hood.routes[to].len();
            for pos in 0..=target_len {
                let a = hood.at(to, pos as isize - 1);
                let b = hood.at(to, pos as isize);
                let delta = removal + insertion(hood, a, b, u);
                if delta.is_finite() {
                    best = pick(
                        best,
                        Some(Move {
                            delta,
                            kind: MoveKind::Relocate {
                                from_route: from,
                                from_pos: i,
                                to_route: to,
                                to_pos: pos,
                            },
                        }),
                    );
                }
            }
        }
    }

    best
}

/// Best reinsertion of `u` (taken from position `i`) inside its own route.
fn best_within(
    hood: &Neighborhood<'_>,
    r: usize,
    i: usize,
    u: usize,
    removal: f64,
) -> Option<Move> {
    let len = hood.routes[r].len();
    // positions in the route with `u` removed, skipping its old slot
    let reduced = |k: isize| -> usize {
        if k < i as isize {
            hood.at(r, k)
        } else {
            hood.at(r, k + 1)
        }
    };

    let mut best = None;
    for pos in 0..len {
        if pos == i {
            continue;
        }
        let a = reduced(pos as isize - 1);
        let b = reduced(pos as isize);
        let delta = removal + insertion(hood, a, b, u);
        if delta.is_finite() {
            best = pick(
                best,
                Some(Move {
                    delta,
                    kind: MoveKind::Relocate {
                        from_route: r,
                        from_pos: i,
                        to_route: r,
                        to_pos: pos,
                    },
                }),
            );
        }
    }
    best
}

fn insertion(hood: &Neighborhood<'_>, a: usize, b: usize, u: usize) -> f64 {
    hood.d(a, u) + hood.d(u, b) - hood.d(a, b)
}
