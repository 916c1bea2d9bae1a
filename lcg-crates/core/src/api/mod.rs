//! The interface through which a model is built and solved.
mod outputs;
mod solver;

pub use outputs::SatisfactionResult;
pub use outputs::Solution;
pub use solver::Solver;
