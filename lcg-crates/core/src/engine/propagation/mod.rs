//! Propagators over the integer variables, and the queue which schedules them.
//!
//! Propagators are woken by domain events of the variables they registered for, or by literals
//! they registered a wakeup on. A woken propagator decides with [`EnqueueDecision`] whether it
//! has to run; queued propagators run in [`Priority`] order once Boolean propagation is at a
//! fixpoint.
//!
//! Narrowings made by a propagator are assigned with a lazy [`crate::Reason`], so the propagator
//! is only asked for an explanation when conflict analysis or the proof needs one.
mod contexts;
mod ids;
mod propagator;
mod queue;
mod store;

pub use contexts::ExplanationContext;
pub use contexts::InitialisationContext;
pub use contexts::PropagationContext;
pub use ids::LocalId;
pub use ids::PropagatorId;
pub use propagator::EnqueueDecision;
pub use propagator::Priority;
pub use propagator::Propagator;
pub(crate) use queue::PropagatorQueue;
pub(crate) use store::PropagatorStore;
