//! The search engine.
//!
//! The Boolean core ([`sat`]) owns the assignment of all Boolean variables. Integer variables
//! ([`variables`]) mirror their domains onto channel literals, and propagators ([`propagation`])
//! reason over those domains. The core reaches the other two only through the traits in this
//! module, so that it can be driven on its own.
pub(crate) mod propagation;
mod reason;
pub(crate) mod sat;
pub(crate) mod variables;

use std::fmt::Debug;

pub use reason::Reason;

use crate::basic_types::ChannelInfo;
use crate::basic_types::Literal;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagatorId;
use crate::engine::propagation::PropagatorStore;
use crate::engine::sat::SatEngine;
use crate::engine::variables::Domains;

/// Receives the assignments of channelled Boolean variables.
pub(crate) trait ChannelHandler {
    /// `literal` was just assigned true by [`SatEngine::enqueue`]; `info` is the channel of its
    /// variable.
    fn channel(&mut self, sat: &mut SatEngine, literal: Literal, info: ChannelInfo);
}

/// Everything the Boolean core needs from the rest of the solver.
pub(crate) trait DomainEngine: ChannelHandler {
    /// A literal the propagator subscribed to under `local_id` became true.
    fn wakeup(&mut self, propagator: PropagatorId, local_id: LocalId);

    /// The literals whose conjunction implies `literal`, which was propagated lazily.
    fn explain(
        &mut self,
        sat: &SatEngine,
        literal: Literal,
        propagator: PropagatorId,
        inference: u32,
    ) -> Vec<Literal>;

    /// The proof item which was active when the propagator was posted.
    fn propagator_origin(&self, propagator: PropagatorId) -> u32;

    fn backtrack_to_level(&mut self, level: usize);

    /// Undo the domain changes made after the domain trail had length `position`.
    fn backtrack_to_position(&mut self, position: usize);
}

/// An external module which keeps state per decision level, e.g. a linear relaxation.
pub trait MipHook: Debug {
    fn backtrack_to_level(&mut self, level: usize);
}

/// The parts of the solver the Boolean core calls back into while it runs.
#[derive(Debug)]
pub(crate) struct EngineContext<'a> {
    pub(crate) domains: &'a mut Domains,
    pub(crate) propagators: &'a mut PropagatorStore,
    pub(crate) mip: Option<&'a mut Box<dyn MipHook>>,
}

impl ChannelHandler for EngineContext<'_> {
    fn channel(&mut self, sat: &mut SatEngine, literal: Literal, info: ChannelInfo) {
        self.domains.channel(sat, literal, info);
    }
}

impl DomainEngine for EngineContext<'_> {
    fn wakeup(&mut self, propagator: PropagatorId, local_id: LocalId) {
        self.propagators.notify_literal(propagator, local_id);
    }

    fn explain(
        &mut self,
        sat: &SatEngine,
        literal: Literal,
        propagator: PropagatorId,
        inference: u32,
    ) -> Vec<Literal> {
        self.propagators
            .explain(propagator, literal, inference, sat, self.domains)
    }

    fn propagator_origin(&self, propagator: PropagatorId) -> u32 {
        self.propagators.origin(propagator)
    }

    fn backtrack_to_level(&mut self, level: usize) {
        self.domains.backtrack_to_level(level);
        self.propagators.clear_queue();

        if let Some(mip) = self.mip.as_mut() {
            mip.backtrack_to_level(level);
        }
    }

    fn backtrack_to_position(&mut self, position: usize) {
        self.domains.backtrack_to_position(position);
        self.propagators.clear_queue();
    }
}

/// Stands in for the rest of the solver when the Boolean core is exercised on its own.
#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct NoDomains;

#[cfg(test)]
impl ChannelHandler for NoDomains {
    fn channel(&mut self, _: &mut SatEngine, _: Literal, _: ChannelInfo) {}
}

#[cfg(test)]
impl DomainEngine for NoDomains {
    fn wakeup(&mut self, _: PropagatorId, _: LocalId) {}

    fn explain(&mut self, _: &SatEngine, literal: Literal, _: PropagatorId, _: u32) -> Vec<Literal> {
        panic!("no propagator can explain {literal}")
    }

    fn propagator_origin(&self, _: PropagatorId) -> u32 {
        0
    }

    fn backtrack_to_level(&mut self, _: usize) {}

    fn backtrack_to_position(&mut self, _: usize) {}
}
