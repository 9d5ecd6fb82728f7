//! Error type shared by every entry point.

use thiserror::Error;

/// Errors raised for malformed input.
///
/// An infeasible routing problem is not an error; it is reported as
/// [`SolveOutcome::Infeasible`](crate::solver::SolveOutcome::Infeasible).
/// Missing paths are not errors either; they show up as
/// [`DistanceMatrix::UNREACHABLE`](crate::distance::DistanceMatrix::UNREACHABLE).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PickupError {
    /// Configuration or data rejected before any processing started.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl PickupError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PickupError>;
