//! Construction followed by time-bounded local search.
//!
//! # Algorithm
//!
//! 1. Validate inputs into an [`Instance`].
//! 2. Reject instances whose demand cannot fit the fleet at all.
//! 3. Cheapest insertion builds one route per vehicle.
//! 4. Best-improvement descent (relocate, 2-opt, 2-opt*) until a local
//!    optimum or the time budget.
//! 5. Routes whose reversal costs the same are oriented lower endpoint
//!    first, then re-evaluated into a [`Solution`].

use std::time::Instant;

use super::{InfeasibleReason, Infeasibility, SolveOutcome, SolverConfig};
use crate::constructive::cheapest_insertion;
use crate::distance::DistanceMatrix;
use crate::error::Result;
use crate::evaluation::{Instance, RouteEvaluator};
use crate::local_search::descend;

/// Solves a capacitated pickup routing problem.
///
/// `demands[k]` is the demand of matrix node `k`; `capacities[v]` is the
/// capacity of vehicle `v`. Every vehicle starts and ends at `depot`.
///
/// # Errors
///
/// `InvalidInput` when the inputs are malformed (see [`Instance::new`]).
/// An instance that is well-formed but cannot be served is reported as
/// [`SolveOutcome::Infeasible`].
///
/// # Examples
///
/// ```
/// use u_pickup::distance::DistanceMatrix;
/// use u_pickup::models::Node;
/// use u_pickup::solver::{solve, SolverConfig};
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 1.0, 0.0, 1),
///     Node::new(2, 2.0, 0.0, 1),
///     Node::new(3, 3.0, 0.0, 1),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// let outcome = solve(&dm, &[0, 1, 1, 1], &[3], 0, &SolverConfig::default()).unwrap();
///
/// let sol = outcome.solution().unwrap();
/// assert_eq!(sol.route(0).unwrap().stops(), &[1, 2, 3]);
/// assert!((sol.total_cost() - 6.0).abs() < 1e-10);
/// ```
pub fn solve(
    matrix: &DistanceMatrix,
    demands: &[i32],
    capacities: &[i32],
    depot: usize,
    config: &SolverConfig,
) -> Result<SolveOutcome> {
    let instance = Instance::new(matrix, demands, capacities, depot)?;
    Ok(solve_instance(&instance, config))
}

/// Solves an already validated instance.
pub fn solve_instance(instance: &Instance<'_>, config: &SolverConfig) -> SolveOutcome {
    let started = Instant::now();

    if let Some(infeasible) = precheck(instance) {
        log::warn!("instance infeasible before construction: {:?}", infeasible.reason);
        return SolveOutcome::Infeasible(infeasible);
    }

    log::debug!(
        "constructing routes for {} nodes on {} vehicles",
        instance.num_nodes() - 1,
        instance.num_vehicles()
    );
    let construction = cheapest_insertion(instance);
    if !construction.is_complete() {
        log::warn!(
            "construction left {} node(s) unserved: {:?}",
            construction.unserved.len(),
            construction.unserved
        );
        return SolveOutcome::Infeasible(Infeasibility {
            reason: InfeasibleReason::NoFeasibleInsertion,
            unserved: construction.unserved,
        });
    }

    let evaluator = RouteEvaluator::new(instance);
    let mut routes = construction.routes;

    if !config.time_budget.is_zero() {
        let initial: f64 = routes.iter().map(|r| evaluator.cost(r)).sum();
        log::debug!("construction cost {initial:.3}, starting local search");
        let deadline = started.checked_add(config.time_budget);
        let stats = descend(instance, &mut routes, deadline, config.parallel);
        if stats.timed_out {
            log::warn!(
                "time budget of {:?} reached after {} improving moves",
                config.time_budget,
                stats.moves
            );
        } else {
            log::debug!("local optimum after {} improving moves", stats.moves);
        }
    }

    for stops in &mut routes {
        orient(&evaluator, stops);
    }

    let solution = evaluator.build_solution(&routes);
    log::info!(
        "solved: cost {:.3}, {} of {} vehicles used, {:?} elapsed",
        solution.total_cost(),
        solution.used_vehicles(),
        instance.num_vehicles(),
        started.elapsed()
    );
    SolveOutcome::Solved(solution)
}

/// Relative cost difference under which a reversal counts as equal.
const ORIENT_TOLERANCE: f64 = 1e-12;

fn precheck(instance: &Instance<'_>) -> Option<Infeasibility> {
    let max_capacity = instance.max_capacity();
    let oversized: Vec<usize> = instance
        .demand_nodes()
        .into_iter()
        .filter(|&k| instance.demand(k) > max_capacity)
        .collect();
    if !oversized.is_empty() {
        return Some(Infeasibility {
            reason: InfeasibleReason::OversizedDemand { max_capacity },
            unserved: oversized,
        });
    }

    let total_demand = instance.total_demand();
    let total_capacity = instance.total_capacity();
    if total_demand > total_capacity {
        return Some(Infeasibility {
            reason: InfeasibleReason::InsufficientCapacity {
                total_demand,
                total_capacity,
            },
            unserved: Vec::new(),
        });
    }

    None
}

/// Reverses `stops` when that costs the same and puts the lower endpoint
/// first.
fn orient(evaluator: &RouteEvaluator<'_>, stops: &mut Vec<usize>) {
    let (Some(&first), Some(&last)) = (stops.first(), stops.last()) else {
        return;
    };
    if first <= last {
        return;
    }
    let reversed: Vec<usize> = stops.iter().rev().copied().collect();
    let forward = evaluator.cost(stops);
    let backward = evaluator.cost(&reversed);
    if forward.is_finite() && (forward - backward).abs() <= ORIENT_TOLERANCE * forward.max(1.0) {
        *stops = reversed;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::PickupError;
    use crate::models::Node;

    fn line() -> DistanceMatrix {
        let nodes = vec![
            Node::depot(0, 0.0, 0.0),
            Node::new(1, 1.0, 0.0, 1),
            Node::new(2, 2.0, 0.0, 1),
            Node::new(3, 3.0, 0.0, 1),
        ];
        DistanceMatrix::from_nodes(&nodes)
    }

    fn grid(n: usize) -> (DistanceMatrix, Vec<i32>) {
        let mut nodes = vec![Node::depot(0, 0.0, 0.0)];
        for k in 1..=n {
            let x = ((k * 37) % 23) as f64 * 3.0 - 30.0;
            let y = ((k * 11) % 17) as f64 * 4.0 - 30.0;
            nodes.push(Node::new(k, x, y, 1 + (k % 3) as i32));
        }
        let demands = nodes.iter().map(Node::demand).collect();
        (DistanceMatrix::from_nodes(&nodes), demands)
    }

    #[test]
    fn test_single_vehicle_line() {
        let dm = line();
        for config in [SolverConfig::construction_only(), SolverConfig::default()] {
            let sol = solve(&dm, &[0, 1, 1, 1], &[3], 0, &config)
                .expect("valid")
                .into_solution()
                .expect("solved");
            assert_eq!(sol.route(0).expect("route").stops(), &[1, 2, 3]);
            assert!((sol.total_cost() - 6.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_insufficient_capacity() {
        let dm = DistanceMatrix::from_data(3, vec![0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0])
            .expect("valid");
        let outcome = solve(&dm, &[0, 6, 6], &[5, 5], 0, &SolverConfig::default()).expect("valid");
        let info = outcome.infeasibility().expect("infeasible");
        assert!(matches!(info.reason, InfeasibleReason::OversizedDemand { max_capacity: 5 }));
        assert_eq!(info.unserved, vec![1, 2]);

        let outcome = solve(&dm, &[0, 4, 4], &[5, 2], 0, &SolverConfig::default()).expect("valid");
        assert_eq!(
            outcome.infeasibility().map(|i| i.reason.clone()),
            Some(InfeasibleReason::InsufficientCapacity {
                total_demand: 8,
                total_capacity: 7
            })
        );
    }

    #[test]
    fn test_large_demands_stay_within_capacity() {
        let nodes = vec![
            Node::depot(0, 0.0, 0.0),
            Node::new(1, 5.0, 1.0, 1),
            Node::new(2, -5.0, -1.0, 1),
            Node::new(3, 5.0, -1.0, 1),
            Node::new(4, -5.0, 1.0, 1),
        ];
        let dm = DistanceMatrix::from_nodes(&nodes);
        let big = 1_000_000_000;
        let demands = [0, big, big, big, big];
        let caps = [2 * big, 2 * big];
        let config = SolverConfig::default().with_time_budget(Duration::from_secs(5));
        let inst = Instance::new(&dm, &demands, &caps, 0).expect("valid");
        let sol = solve_instance(&inst, &config).into_solution().expect("solved");
        assert!(sol.validate(&inst).is_empty());
        assert_eq!(sol.num_served(), 4);
    }

    #[test]
    fn test_unreachable_node() {
        let mut dm = line();
        for k in 0..4 {
            if k != 2 {
                dm.set(k, 2, DistanceMatrix::UNREACHABLE);
                dm.set(2, k, DistanceMatrix::UNREACHABLE);
            }
        }
        let outcome = solve(&dm, &[0, 1, 1, 1], &[3, 3], 0, &SolverConfig::default()).expect("valid");
        let info = outcome.infeasibility().expect("infeasible");
        assert_eq!(info.reason, InfeasibleReason::NoFeasibleInsertion);
        assert_eq!(info.unserved, vec![2]);
    }

    #[test]
    fn test_invalid_input() {
        let dm = line();
        let config = SolverConfig::default();
        assert!(matches!(
            solve(&dm, &[0, 1, 1, 1], &[], 0, &config),
            Err(PickupError::InvalidInput(_))
        ));
        assert!(matches!(
            solve(&dm, &[0, 1, 1], &[3], 0, &config),
            Err(PickupError::InvalidInput(_))
        ));
        assert!(matches!(
            solve(&dm, &[0, 1, 1, 1], &[3], 4, &config),
            Err(PickupError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_solution_is_valid_and_improved() {
        let (dm, demands) = grid(30);
        let caps = [20, 20, 20, 20, 20];
        let inst = Instance::new(&dm, &demands, &caps, 0).expect("valid");

        let built = solve_instance(&inst, &SolverConfig::construction_only())
            .into_solution()
            .expect("solved");
        let improved = solve_instance(
            &inst,
            &SolverConfig::default().with_time_budget(Duration::from_secs(30)),
        )
        .into_solution()
        .expect("solved");

        assert!(built.validate(&inst).is_empty());
        assert!(improved.validate(&inst).is_empty());
        assert!(improved.total_cost() <= built.total_cost() + 1e-9);
        assert_eq!(improved.num_routes(), caps.len());
        assert_eq!(improved.num_served(), 30);
    }

    #[test]
    fn test_deterministic_across_modes() {
        let (dm, demands) = grid(20);
        let caps = [20, 20, 20];
        let budget = Duration::from_secs(30);
        let sequential = SolverConfig::default()
            .with_time_budget(budget)
            .with_parallel(false);
        let seq = solve(&dm, &demands, &caps, 0, &sequential).expect("valid");
        let par = solve(&dm, &demands, &caps, 0, &SolverConfig::default().with_time_budget(budget))
            .expect("valid");
        assert_eq!(seq, par);

        let a = solve(&dm, &demands, &caps, 0, &SolverConfig::construction_only()).expect("valid");
        let b = solve(&dm, &demands, &caps, 0, &SolverConfig::construction_only()).expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn test_orient_only_symmetric_reversals() {
        let mut dm = line();
        let inst_demands = [0, 1, 1, 1];
        {
            let inst = Instance::new(&dm, &inst_demands, &[3], 0).expect("valid");
            let eval = RouteEvaluator::new(&inst);
            let mut stops = vec![3, 2, 1];
            orient(&eval, &mut stops);
            assert_eq!(stops, vec![1, 2, 3]);
        }

        // one-way penalty makes the reversal more expensive
        dm.set(0, 1, 10.0);
        let inst = Instance::new(&dm, &inst_demands, &[3], 0).expect("valid");
        let eval = RouteEvaluator::new(&inst);
        let mut stops = vec![3, 2, 1];
        orient(&eval, &mut stops);
        assert_eq!(stops, vec![3, 2, 1]);
    }
}
