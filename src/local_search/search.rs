//! Best-improvement descent over all neighbourhoods.

use std::time::Instant;

use super::moves::{pick, Move, Neighborhood};
use super::{best_exchange, best_relocate, best_two_opt};
use crate::evaluation::Instance;

/// Counters from one descent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Improving moves applied.
    pub moves: usize,
    /// `true` if the deadline stopped the descent before a local optimum.
    pub timed_out: bool,
}

/// Repeatedly applies the best improving relocate, 2-opt, or exchange move
/// until none remains or `deadline` passes.
///
/// Each round scans all three neighbourhoods against the same snapshot of
/// `routes` and applies the single best move; the deadline is checked
/// before every round.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Node;
/// use u_pickup::distance::DistanceMatrix;
/// use u_pickup::evaluation::{Instance, RouteEvaluator};
/// use u_pickup::local_search::descend;
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
/// let mut routes = vec![vec![2, 1, 3]];
/// let stats = descend(&inst, &mut routes, None, false);
/// assert!(stats.moves > 0);
/// assert!((RouteEvaluator::new(&inst).cost(&routes[0]) - 6.0).abs() < 1e-10);
/// ```
pub fn descend(
    instance: &Instance<'_>,
    routes: &mut [Vec<usize>],
    deadline: Option<Instant>,
    parallel: bool,
) -> SearchStats {
    let mut stats = SearchStats::default();

    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            stats.timed_out = true;
            break;
        }

        let best: Option<Move> = {
            let hood = Neighborhood::new(instance, routes, parallel);
            let mut best = best_relocate(&hood);
            best = pick(best, best_two_opt(&hood));
            pick(best, best_exchange(&hood))
        };

        match best {
            Some(mv) if mv.is_improving() => {
                log::trace!("applying {:?} (delta {:.6})", mv.kind, mv.delta);
                mv.apply(routes);
                stats.moves += 1;
            }
            _ => break,
        }
    }

    stats
}
