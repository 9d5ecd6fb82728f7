//! One-call pickup planning: distance matrix, then routes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::distance::{build, DistanceMatrix, DistanceMode};
use crate::error::{PickupError, Result};
use crate::models::Node;
use crate::solver::{solve, SolveOutcome, SolverConfig};

/// Planner settings, loadable from any serde format.
///
/// # Examples
///
/// ```
/// use u_pickup::planner::PlanConfig;
///
/// let config: PlanConfig = serde_json::from_str(r#"{ "parallel": false }"#).unwrap();
/// assert_eq!(config.time_budget_secs, 20.0);
/// assert!(!config.parallel);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Local search time limit in seconds; zero for construction only.
    pub time_budget_secs: f64,
    /// Evaluate local search candidates in parallel.
    pub parallel: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            time_budget_secs: 20.0,
            parallel: true,
        }
    }
}

impl PlanConfig {
    /// Converts into a [`SolverConfig`].
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the time budget is negative or not finite.
    pub fn solver_config(&self) -> Result<SolverConfig> {
        let budget = Duration::try_from_secs_f64(self.time_budget_secs).map_err(|_| {
            PickupError::invalid(format!(
                "time budget {} s is not a valid duration",
                self.time_budget_secs
            ))
        })?;
        Ok(SolverConfig {
            time_budget: budget,
            parallel: self.parallel,
        })
    }
}

/// A planning result: the matrix the routes were solved on and the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Distance matrix; row `k` belongs to input node `k`.
    pub matrix: DistanceMatrix,
    /// Matrix index of the depot.
    pub depot: usize,
    /// Solver outcome over matrix indices.
    pub outcome: SolveOutcome,
}

impl Plan {
    /// Routes as node id sequences, or `None` if infeasible.
    pub fn id_routes(&self, nodes: &[Node]) -> Option<Vec<Vec<usize>>> {
        let solution = self.outcome.solution()?;
        Some(
            solution
                .routes()
                .iter()
                .map(|r| r.stops().iter().map(|&k| nodes[k].id()).collect())
                .collect(),
        )
    }
}

/// Builds the distance matrix for `nodes` and solves the pickup routing
/// problem over it.
///
/// `depot` is a node id; the first node carrying it is the depot. Demands
/// come from the nodes.
///
/// # Errors
///
/// `InvalidInput` from matrix construction, from solver input validation
/// (including a depot node with non-zero demand), or from `config`.
///
/// # Examples
///
/// ```
/// use u_pickup::distance::DistanceMode;
/// use u_pickup::models::Node;
/// use u_pickup::planner::{plan_routes, PlanConfig};
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 1.0, 0.0, 1),
///     Node::new(2, 2.0, 0.0, 1),
///     Node::new(3, 3.0, 0.0, 1),
/// ];
/// let plan = plan_routes(&nodes, 0, DistanceMode::Euclidean, &[3], &PlanConfig::default()).unwrap();
/// assert_eq!(plan.id_routes(&nodes), Some(vec![vec![1, 2, 3]]));
/// ```
pub fn plan_routes(
    nodes: &[Node],
    depot: usize,
    mode: DistanceMode<'_>,
    capacities: &[i32],
    config: &PlanConfig,
) -> Result<Plan> {
    let solver_config = config.solver_config()?;
    let matrix = build(nodes, depot, mode)?;
    let depot_index = nodes
        .iter()
        .position(|n| n.id() == depot)
        .ok_or_else(|| PickupError::invalid(format!("depot {depot} is not among the supplied nodes")))?;
    let demands: Vec<i32> = nodes.iter().map(Node::demand).collect();

    let outcome = solve(&matrix, &demands, capacities, depot_index, &solver_config)?;
    Ok(Plan {
        matrix,
        depot: depot_index,
        outcome,
    })
}
