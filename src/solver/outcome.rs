//! Solver results.

use serde::{Deserialize, Serialize};

use crate::models::Solution;

/// Why a routing problem cannot be fully served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InfeasibleReason {
    /// Total demand exceeds the fleet's total capacity.
    InsufficientCapacity {
        /// Sum of node demands.
        total_demand: i64,
        /// Sum of vehicle capacities.
        total_capacity: i64,
    },
    /// Some node's demand exceeds every vehicle's capacity.
    OversizedDemand {
        /// Largest vehicle capacity.
        max_capacity: i32,
    },
    /// Construction left nodes that no route could take without exceeding
    /// capacity or crossing an unreachable arc.
    NoFeasibleInsertion,
}

/// Details of an infeasible instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Infeasibility {
    /// What made the instance infeasible.
    pub reason: InfeasibleReason,
    /// Nodes that cannot be served, ascending. Empty for
    /// [`InfeasibleReason::InsufficientCapacity`], where no single node is
    /// to blame.
    pub unserved: Vec<usize>,
}

/// Result of a solver run. Infeasibility is an ordinary outcome, not an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// Every demand node is served.
    Solved(Solution),
    /// The demand cannot be served by this fleet.
    Infeasible(Infeasibility),
}

impl SolveOutcome {
    /// Returns `true` for [`SolveOutcome::Solved`].
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }

    /// The solution, if one was found.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Solved(s) => Some(s),
            SolveOutcome::Infeasible(_) => None,
        }
    }

    /// Consumes the outcome, returning the solution if one was found.
    pub fn into_solution(self) -> Option<Solution> {
        match self {
            SolveOutcome::Solved(s) => Some(s),
            SolveOutcome::Infeasible(_) => None,
        }
    }

    /// The infeasibility details, if the instance was infeasible.
    pub fn infeasibility(&self) -> Option<&Infeasibility> {
        match self {
            SolveOutcome::Solved(_) => None,
            SolveOutcome::Infeasible(i) => Some(i),
        }
    }
}
