use thiserror::Error;

#[cfg(doc)]
use crate::Solver;

/// Errors related to adding constraints and variables to the [`Solver`].
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// Adding the clause made the problem infeasible at the root.
    #[error("Adding the clause failed because it is infeasible at the root")]
    InfeasibleClause,
    /// A constraint was added while the [`Solver`] was already in an infeasible state.
    #[error("Adding constraint failed because the solver is in an infeasible state")]
    InfeasibleState,
    /// Adding the propagator made the problem infeasible at the root.
    #[error("Adding the constraint failed because it is infeasible at the root")]
    InfeasiblePropagator,
    /// The requested domain of an integer variable is empty.
    #[error("Cannot create an integer variable with the empty domain [{lower_bound}, {upper_bound}]")]
    EmptyDomain { lower_bound: i32, upper_bound: i32 },
}
