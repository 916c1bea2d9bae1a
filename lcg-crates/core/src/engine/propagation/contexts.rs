use enumset::EnumSet;

use super::store::Subscription;
use super::LocalId;
use super::PropagatorId;
use crate::basic_types::Lbool;
use crate::basic_types::Literal;
use crate::containers::KeyedVec;
use crate::engine::sat::SatEngine;
use crate::engine::variables::DomainEvent;
use crate::engine::variables::Domains;
use crate::engine::variables::IntVarId;
use crate::engine::variables::LiteralType;
use crate::engine::Reason;

/// Read access to the domains, shared by all contexts.
macro_rules! domain_queries {
    () => {
        pub fn lower_bound(&self, variable: IntVarId) -> i32 {
            self.domains.lower_bound(variable)
        }

        pub fn upper_bound(&self, variable: IntVarId) -> i32 {
            self.domains.upper_bound(variable)
        }

        pub fn contains(&self, variable: IntVarId, value: i32) -> bool {
            self.domains.contains(variable, value)
        }

        pub fn is_fixed(&self, variable: IntVarId) -> bool {
            self.domains.fixed_value(variable).is_some()
        }

        /// The channel literal `[variable <kind> value]`; a constant outside the literal range.
        pub fn literal(&self, variable: IntVarId, value: i64, kind: LiteralType) -> Literal {
            self.domains.literal(&*self.sat, variable, value, kind)
        }

        pub fn value(&self, literal: Literal) -> Lbool {
            self.sat.value(literal)
        }
    };
}

/// Given to [`super::Propagator::initialise`].
#[derive(Debug)]
pub struct InitialisationContext<'a> {
    pub(crate) sat: &'a mut SatEngine,
    pub(crate) domains: &'a Domains,
    pub(crate) subscriptions: &'a mut KeyedVec<IntVarId, Vec<Subscription>>,
    pub(crate) propagator: PropagatorId,
}

impl InitialisationContext<'_> {
    domain_queries!();

    /// Wake the propagator with `local_id` whenever one of `events` happens to `variable`.
    pub fn register(&mut self, variable: IntVarId, events: EnumSet<DomainEvent>, local_id: LocalId) {
        self.subscriptions.accommodate(variable, Vec::new());
        self.subscriptions[variable].push(Subscription {
            propagator: self.propagator,
            local_id,
            events,
        });
    }

    /// Wake the propagator with `local_id` whenever `literal` becomes true.
    pub fn register_literal(&mut self, literal: Literal, local_id: LocalId) {
        self.sat.add_wakeup(literal, self.propagator, local_id);
    }
}

/// Given to [`super::Propagator::propagate`]. Every narrowing is tagged with an `inference`
/// code, which is handed back when the narrowing has to be explained.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) sat: &'a mut SatEngine,
    pub(crate) domains: &'a mut Domains,
    pub(crate) propagator: PropagatorId,
}

impl PropagationContext<'_> {
    domain_queries!();

    /// Without lazy explanations a propagation has no reason and is treated like a decision.
    /// Search then undoes decisions one by one instead of learning.
    fn reason(&self, inference: u32) -> Reason {
        if self.sat.options.lazy {
            Reason::Lazy {
                propagator: self.propagator,
                inference,
            }
        } else {
            Reason::Decision
        }
    }

    /// Returns `false` if the bound empties the domain.
    pub fn set_lower_bound(&mut self, variable: IntVarId, value: i32, inference: u32) -> bool {
        let reason = self.reason(inference);
        self.domains.set_min(self.sat, variable, value, reason)
    }

    pub fn set_upper_bound(&mut self, variable: IntVarId, value: i32, inference: u32) -> bool {
        let reason = self.reason(inference);
        self.domains.set_max(self.sat, variable, value, reason)
    }

    pub fn fix(&mut self, variable: IntVarId, value: i32, inference: u32) -> bool {
        let reason = self.reason(inference);
        self.domains.set_val(self.sat, variable, value, reason)
    }

    pub fn remove(&mut self, variable: IntVarId, value: i32, inference: u32) -> bool {
        let reason = self.reason(inference);
        self.domains.rem_val(self.sat, variable, value, reason)
    }

    /// Make `literal` true. Returns `false` if it is already false.
    pub fn assign(&mut self, literal: Literal, inference: u32) -> bool {
        let reason = self.reason(inference);
        match self.sat.value(literal) {
            Lbool::True => true,
            Lbool::False => {
                self.sat.c_enqueue(literal, reason);
                false
            }
            Lbool::Undefined => {
                self.sat.enqueue(literal, reason, &mut *self.domains);
                true
            }
        }
    }
}

/// Given to [`super::Propagator::explain`].
#[derive(Debug)]
pub struct ExplanationContext<'a> {
    pub(crate) sat: &'a SatEngine,
    pub(crate) domains: &'a Domains,
}

impl ExplanationContext<'_> {
    domain_queries!();

    /// The integer atom of a channel literal, with `Ge` and `Le` for bound literals and `Eq`
    /// and `Ne` for value literals.
    pub fn atom(&self, literal: Literal) -> Option<(IntVarId, LiteralType, i32)> {
        self.domains.atom(&*self.sat, literal)
    }
}
