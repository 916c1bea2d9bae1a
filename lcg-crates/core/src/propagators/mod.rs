//! Propagators which ship with the solver.
mod less_or_equal;

pub use less_or_equal::LessOrEqualPropagator;
