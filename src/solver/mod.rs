//! Capacitated pickup route solver.
//!
//! [`solve`] runs cheapest-insertion construction followed by local search
//! within a wall-clock budget set in [`SolverConfig`].

mod config;
mod outcome;
mod solve;

pub use config::SolverConfig;
pub use outcome::{InfeasibleReason, Infeasibility, SolveOutcome};
pub use solve::{solve, solve_instance};
