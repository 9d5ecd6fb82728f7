//! Move representation shared by the local search operators.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::evaluation::Instance;

/// Improvement threshold; smaller gains are treated as no gain.
pub const EPS: f64 = 1e-10;

/// A neighbourhood move on per-vehicle stop sequences.
///
/// Variants order before fields when ranking equal-delta moves, so the
/// derived `Ord` gives lowest operator, then lowest route, then lowest
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MoveKind {
    /// Move the stop at `from_route[from_pos]` to position `to_pos` of
    /// `to_route`. For a move inside one route, `to_pos` indexes the route
    /// with the stop already removed.
    Relocate {
        /// Source route.
        from_route: usize,
        /// Position in the source route.
        from_pos: usize,
        /// Destination route.
        to_route: usize,
        /// Insertion position in the destination route.
        to_pos: usize,
    },
    /// Reverse `route[start..=end]`.
    TwoOpt {
        /// Route index.
        route: usize,
        /// First reversed position.
        start: usize,
        /// Last reversed position.
        end: usize,
    },
    /// Swap the tails `first[first_cut..]` and `second[second_cut..]`.
    Exchange {
        /// Lower route index.
        first: usize,
        /// Cut position in `first`.
        first_cut: usize,
        /// Higher route index.
        second: usize,
        /// Cut position in `second`.
        second_cut: usize,
    },
}

/// A candidate move and its change in total cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    /// Change in total cost; negative means improvement.
    pub delta: f64,
    /// What the move does.
    pub kind: MoveKind,
}

impl Move {
    /// Total order used to pick among candidates: lowest delta, then kind.
    pub fn rank(&self, other: &Move) -> Ordering {
        self.delta
            .total_cmp(&other.delta)
            .then_with(|| self.kind.cmp(&other.kind))
    }

    /// Returns `true` if the move strictly lowers the total cost.
    pub fn is_improving(&self) -> bool {
        self.delta.is_finite() && self.delta < -EPS
    }

    /// Applies the move to the stop sequences.
    pub fn apply(&self, routes: &mut [Vec<usize>]) {
        match self.kind {
            MoveKind::Relocate {
                from_route,
                from_pos,
                to_route,
                to_pos,
            } => {
                let node = routes[from_route].remove(from_pos);
                routes[to_route].insert(to_pos, node);
            }
            MoveKind::TwoOpt { route, start, end } => {
                routes[route][start..=end].reverse();
            }
            MoveKind::Exchange {
                first,
                first_cut,
                second,
                second_cut,
            } => {
                let tail1 = routes[first].split_off(first_cut);
                let tail2 = routes[second].split_off(second_cut);
                routes[first].extend(tail2);
                routes[second].extend(tail1);
            }
        }
    }
}

/// Keeps whichever of two optional moves ranks first.
pub fn pick(a: Option<Move>, b: Option<Move>) -> Option<Move> {
    match (a, b) {
        (Some(x), Some(y)) => Some(if y.rank(&x) == Ordering::Less { y } else { x }),
        (x, None) => x,
        (None, y) => y,
    }
}

/// A read-only view of the current routes that operators scan for moves.
pub struct Neighborhood<'a> {
    pub(crate) instance: &'a Instance<'a>,
    pub(crate) routes: &'a [Vec<usize>],
    pub(crate) loads: Vec<i32>,
    parallel: bool,
}

impl<'a> Neighborhood<'a> {
    /// Creates a view over `routes` (one stop sequence per vehicle).
    pub fn new(instance: &'a Instance<'a>, routes: &'a [Vec<usize>], parallel: bool) -> Self {
        let loads = routes
            .iter()
            .map(|r| r.iter().map(|&s| instance.demand(s)).sum())
            .collect();
        Self {
            instance,
            routes,
            loads,
            parallel,
        }
    }

    /// Distance shorthand.
    pub(crate) fn d(&self, from: usize, to: usize) -> f64 {
        self.instance.distance(from, to)
    }

    /// Stop at `pos` of route `r`, or the depot past either end.
    pub(crate) fn at(&self, r: usize, pos: isize) -> usize {
        let route = &self.routes[r];
        if pos < 0 || pos as usize >= route.len() {
            self.instance.depot()
        } else {
            route[pos as usize]
        }
    }

    /// Remaining capacity of route `r`.
    pub(crate) fn room(&self, r: usize) -> i32 {
        self.instance.capacity(r) - self.loads[r]
    }

    /// Runs `best_from` for every route index and keeps the best result.
    ///
    /// Route scans are independent and run on the rayon pool when the
    /// neighbourhood is parallel; the reduction uses [`Move::rank`], which is
    /// a total order, so the pick does not depend on scheduling.
    pub(crate) fn scan<F>(&self, best_from: F) -> Option<Move>
    where
        F: Fn(usize) -> Option<Move> + Sync + Send,
    {
        let n = self.routes.len();
        if self.parallel {
            (0..n)
                .into_par_iter()
                .filter_map(&best_from)
                .min_by(|a, b| a.rank(b))
        } else {
            (0..n).filter_map(best_from).min_by(|a, b| a.rank(b))
        }
    }
}
