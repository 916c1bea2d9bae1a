//! # lcg-core
//! The kernel of a lazy clause generation solver.
//!
//! A [`Solver`] owns a Boolean engine with watched literals, integer variables whose domains are
//! mirrored onto channel literals, and a set of [`Propagator`]s over those integers. Propagators
//! explain their inferences lazily, so conflict analysis learns clauses over the channel
//! literals of the integers.
//!
//! When a [`proof::ProofLog`] is given in the [`SolverOptions`], every clause the solver relies
//! on is recorded in a resolution trace, together with the meaning of each literal and the last
//! solution that was found.
//!
//! # Example
//! ```rust
//! # use lcg_core::propagators::LessOrEqualPropagator;
//! # use lcg_core::LiteralType;
//! # use lcg_core::SatisfactionResult;
//! # use lcg_core::Solver;
//! let mut solver = Solver::default();
//! let x = solver.new_bounded_integer(0, 10).unwrap();
//! let y = solver.new_bounded_integer(0, 10).unwrap();
//!
//! // x + 3 <= y
//! let _ = solver
//!     .add_propagator(LessOrEqualPropagator::new(x, y, -3))
//!     .unwrap();
//! let x_at_least_eight = solver.integer_literal(x, LiteralType::Ge, 8);
//! let y_at_most_four = solver.integer_literal(y, LiteralType::Le, 4);
//! solver.add_clause([x_at_least_eight, y_at_most_four]).unwrap();
//!
//! let SatisfactionResult::Satisfiable(solution) = solver.solve() else {
//!     panic!("x = 0 and y = 3 is a solution");
//! };
//! assert!(solution.integer_value(y) <= 4);
//! assert!(solution.integer_value(x) + 3 <= solution.integer_value(y));
//! ```
pub mod asserts;
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub mod options;
pub mod proof;
pub mod propagators;
pub mod statistics;

mod api;

pub use api::*;
pub use lcg_trace::Relation;

pub use crate::basic_types::BooleanVariable;
pub use crate::basic_types::ChannelInfo;
pub use crate::basic_types::ChannelKind;
pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::Lbool;
pub use crate::basic_types::Literal;
pub use crate::basic_types::ValueKind;
pub use crate::engine::propagation::EnqueueDecision;
pub use crate::engine::propagation::ExplanationContext;
pub use crate::engine::propagation::InitialisationContext;
pub use crate::engine::propagation::LocalId;
pub use crate::engine::propagation::Priority;
pub use crate::engine::propagation::PropagationContext;
pub use crate::engine::propagation::Propagator;
pub use crate::engine::propagation::PropagatorId;
pub use crate::engine::sat::SatStatistics;
pub use crate::engine::variables::DomainEvent;
pub use crate::engine::variables::IntVarId;
pub use crate::engine::variables::LiteralType;
pub use crate::engine::MipHook;
pub use crate::engine::Reason;
pub use crate::options::SolverOptions;
