use std::fmt::Debug;

use enumset::EnumSet;

use super::ExplanationContext;
use super::InitialisationContext;
use super::LocalId;
use super::PropagationContext;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Literal;
use crate::engine::variables::DomainEvent;

/// A propagator narrows the domains of the integer variables it is posted on, and explains
/// those narrowings when conflict analysis asks for them.
///
/// Narrowings are made through the [`PropagationContext`], which tags them with an
/// `inference` code. The code is handed back to [`Propagator::explain`], together with the
/// literal which was set; the explanation may be requested long after the propagation, so it has
/// to be derived from the literal and the code, not from the current domains.
pub trait Propagator: Debug {
    /// Used in log messages.
    fn name(&self) -> &str;

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    /// Subscribe to the variables and literals of the propagator. Called once, at the root,
    /// when the propagator is posted; the propagator is run right after.
    fn initialise(
        &mut self,
        context: &mut InitialisationContext<'_>,
    ) -> Result<(), ConstraintOperationError>;

    /// The domain of a subscribed variable changed with `events`.
    fn wakeup(&mut self, _local_id: LocalId, _events: EnumSet<DomainEvent>) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// A literal the propagator subscribed to became true.
    fn notify_literal(&mut self, _local_id: LocalId) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Narrow the domains. Returns `false` if a conflict was found, in which case the context
    /// holds it.
    ///
    /// Propagators need not reach a fixpoint; they are run again when the domains change.
    fn propagate(&mut self, context: &mut PropagationContext<'_>) -> bool;

    /// The literals, all true, whose conjunction implies `literal`. `literal` is the false
    /// constant when the propagation exceeded the literals of a variable; the explanation then
    /// refers to the domains at the time of the conflict.
    fn explain(
        &self,
        literal: Literal,
        inference: u32,
        context: &ExplanationContext<'_>,
    ) -> Vec<Literal>;
}

/// Whether a propagator has to run after a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    Enqueue,
    Skip,
}

/// The order in which queued propagators run; cheap propagators should have a high priority.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    #[default]
    Medium = 1,
    Low = 2,
    VeryLow = 3,
}

impl Priority {
    pub(crate) const COUNT: usize = 4;
}
