//! Solver input validation and route evaluation.

mod evaluator;
mod instance;

pub use evaluator::RouteEvaluator;
pub use instance::Instance;
