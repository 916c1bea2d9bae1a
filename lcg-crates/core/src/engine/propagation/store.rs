use enumset::EnumSet;
use log::trace;

use super::ExplanationContext;
use super::InitialisationContext;
use super::LocalId;
use super::PropagationContext;
use super::Propagator;
use super::PropagatorId;
use super::PropagatorQueue;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Literal;
use crate::containers::KeyedVec;
use crate::engine::propagation::EnqueueDecision;
use crate::engine::sat::SatEngine;
use crate::engine::variables::DomainEvent;
use crate::engine::variables::Domains;
use crate::engine::variables::IntVarId;
use crate::lcg_assert_moderate;

/// A propagator waiting for events on an integer variable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Subscription {
    pub(crate) propagator: PropagatorId,
    pub(crate) local_id: LocalId,
    pub(crate) events: EnumSet<DomainEvent>,
}

/// The posted propagators, the variables they watch, and the queue of those which have to run.
#[derive(Debug, Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
    /// The proof item which was active when each propagator was posted.
    origins: KeyedVec<PropagatorId, u32>,
    subscriptions: KeyedVec<IntVarId, Vec<Subscription>>,
    queue: PropagatorQueue,
}

impl PropagatorStore {
    pub(crate) fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    /// Post a propagator, subscribe it and queue it for its first run. Must be called at the
    /// root.
    pub(crate) fn add(
        &mut self,
        mut propagator: Box<dyn Propagator>,
        sat: &mut SatEngine,
        domains: &Domains,
    ) -> Result<PropagatorId, ConstraintOperationError> {
        let id = PropagatorId(self.propagators.len() as u32);

        let mut context = InitialisationContext {
            sat,
            domains,
            subscriptions: &mut self.subscriptions,
            propagator: id,
        };
        propagator.initialise(&mut context)?;

        let origin = context.sat.proof.active_item();
        let priority = propagator.priority();
        trace!("posted {} as {id}", propagator.name());

        let _ = self.propagators.push(propagator);
        let _ = self.origins.push(origin);
        self.queue.enqueue(id, priority);
        Ok(id)
    }

    /// Whether a propagator registered for events of `variable`.
    pub(crate) fn is_subscribed(&self, variable: IntVarId) -> bool {
        self.subscriptions
            .get(variable)
            .is_some_and(|subscriptions| !subscriptions.is_empty())
    }

    pub(crate) fn origin(&self, propagator: PropagatorId) -> u32 {
        self.origins[propagator]
    }

    /// A literal registered by `propagator` became true.
    pub(crate) fn notify_literal(&mut self, propagator: PropagatorId, local_id: LocalId) {
        let decision = self.propagators[propagator].notify_literal(local_id);
        if decision == EnqueueDecision::Enqueue {
            let priority = self.propagators[propagator].priority();
            self.queue.enqueue(propagator, priority);
        }
    }

    /// Forward the domain events to the subscribed propagators.
    pub(crate) fn notify_domain_events(
        &mut self,
        events: impl IntoIterator<Item = (IntVarId, EnumSet<DomainEvent>)>,
    ) {
        for (variable, events) in events {
            let Some(subscriptions) = self.subscriptions.get(variable) else {
                continue;
            };

            for subscription in subscriptions {
                let relevant = subscription.events & events;
                if relevant.is_empty() {
                    continue;
                }

                let propagator = &mut self.propagators[subscription.propagator];
                if propagator.wakeup(subscription.local_id, relevant) == EnqueueDecision::Enqueue {
                    self.queue
                        .enqueue(subscription.propagator, propagator.priority());
                }
            }
        }
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        self.queue.pop()
    }

    pub(crate) fn clear_queue(&mut self) {
        self.queue.clear();
        lcg_assert_moderate!(self.queue.is_empty());
    }

    /// Run a propagator. Returns `false` on a conflict.
    pub(crate) fn propagate(
        &mut self,
        propagator: PropagatorId,
        sat: &mut SatEngine,
        domains: &mut Domains,
    ) -> bool {
        let mut context = PropagationContext {
            sat,
            domains,
            propagator,
        };
        self.propagators[propagator].propagate(&mut context)
    }

    /// The true literals whose conjunction implies `literal`, without the true constant.
    pub(crate) fn explain(
        &self,
        propagator: PropagatorId,
        literal: Literal,
        inference: u32,
        sat: &SatEngine,
        domains: &Domains,
    ) -> Vec<Literal> {
        let context = ExplanationContext { sat, domains };
        let mut explanation = self.propagators[propagator].explain(literal, inference, &context);
        explanation.retain(|&antecedent| antecedent != sat.true_literal());
        explanation
    }
}
