use enumset::EnumSet;
use log::debug;

use super::int_var_el::DomainChange;
use super::int_var_el::DomainUpdate;
use super::DomainEvent;
use super::IntVarEl;
use super::IntVarId;
use super::LiteralType;
use super::ValueRanges;
use crate::basic_types::ChannelInfo;
use crate::basic_types::ChannelKind;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Literal;
use crate::basic_types::Trail;
use crate::basic_types::ValueKind;
use crate::containers::KeyedVec;
use crate::engine::sat::SatEngine;
use crate::engine::ChannelHandler;
use crate::engine::Reason;
use crate::lcg_assert_simple;

/// The integer variables of a solver, and the trail which restores their domains.
#[derive(Debug)]
pub(crate) struct Domains {
    variables: KeyedVec<IntVarId, IntVarEl>,
    trail: Trail<DomainChange>,
    changed: Vec<IntVarId>,
    /// Variables up to this width get their literals when they are created.
    eager_limit: i64,
}

impl Domains {
    pub(crate) fn new(eager_limit: i64) -> Domains {
        Domains {
            variables: KeyedVec::default(),
            trail: Trail::default(),
            changed: Vec::new(),
            eager_limit,
        }
    }

    /// Create a variable with the domain `[lower_bound, upper_bound]`.
    pub(crate) fn new_int_var(
        &mut self,
        sat: &mut SatEngine,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Result<IntVarId, ConstraintOperationError> {
        if lower_bound > upper_bound {
            return Err(ConstraintOperationError::EmptyDomain {
                lower_bound,
                upper_bound,
            });
        }

        Ok(self.add_variable(sat, ValueRanges::interval(lower_bound, upper_bound)))
    }

    /// Create a variable whose domain is the given set of values.
    pub(crate) fn new_sparse_int_var(
        &mut self,
        sat: &mut SatEngine,
        values: &[i32],
    ) -> Result<IntVarId, ConstraintOperationError> {
        let mut values = values.to_vec();
        values.sort_unstable();
        values.dedup();

        if values.is_empty() {
            return Err(ConstraintOperationError::EmptyDomain {
                lower_bound: 0,
                upper_bound: -1,
            });
        }

        Ok(self.add_variable(sat, ValueRanges::from_sorted(&values)))
    }

    fn add_variable(&mut self, sat: &mut SatEngine, domain: ValueRanges) -> IntVarId {
        lcg_assert_simple!(sat.decision_level() == 0);

        let id = IntVarId::new(self.variables.len() as u32);
        let mut variable = IntVarEl::new(id, domain);
        let width = i64::from(variable.max()) - i64::from(variable.min()) + 1;
        if width <= self.eager_limit {
            variable.materialize(sat);
        }

        debug!(
            "created {id} over [{}, {}] with {} values, literals {}",
            variable.min(),
            variable.max(),
            variable.size(),
            if variable.is_pending() { "on demand" } else { "created" }
        );

        let pushed = self.variables.push(variable);
        lcg_assert_simple!(pushed == id);
        id
    }

    pub(crate) fn is_pending(&self, id: IntVarId) -> bool {
        self.variables[id].is_pending()
    }

    /// Create the literals of `id` over its current domain, if they do not exist yet. Must be
    /// called at the root.
    pub(crate) fn materialize(&mut self, sat: &mut SatEngine, id: IntVarId) {
        let variable = &mut self.variables[id];
        if !variable.is_pending() {
            return;
        }

        variable.materialize(sat);
        debug!(
            "created the literals of {id} over [{}, {}]",
            variable.lit_min(),
            variable.lit_max()
        );
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = IntVarId> + '_ {
        self.variables.keys()
    }

    pub(crate) fn variable(&self, id: IntVarId) -> &IntVarEl {
        &self.variables[id]
    }

    pub(crate) fn lower_bound(&self, id: IntVarId) -> i32 {
        self.variables[id].min()
    }

    pub(crate) fn upper_bound(&self, id: IntVarId) -> i32 {
        self.variables[id].max()
    }

    pub(crate) fn contains(&self, id: IntVarId, value: i32) -> bool {
        self.variables[id].contains(value)
    }

    pub(crate) fn fixed_value(&self, id: IntVarId) -> Option<i32> {
        let variable = &self.variables[id];
        variable.is_fixed().then(|| variable.min())
    }

    pub(crate) fn literal(
        &self,
        sat: &SatEngine,
        id: IntVarId,
        value: i64,
        kind: LiteralType,
    ) -> Literal {
        self.variables[id].get_lit(sat, value, kind)
    }

    /// The integer atom a literal stands for, if it is a channel literal.
    pub(crate) fn atom(&self, sat: &SatEngine, literal: Literal) -> Option<(IntVarId, LiteralType, i32)> {
        let info = sat.channel_info(literal.variable());
        if info.kind != ChannelKind::IntVar {
            return None;
        }

        let id = IntVarId::new(info.owner);
        let atom = match (info.value_kind, literal.is_positive()) {
            (ValueKind::Value, true) => (id, LiteralType::Eq, info.value),
            (ValueKind::Value, false) => (id, LiteralType::Ne, info.value),
            (ValueKind::Bound, true) => (id, LiteralType::Ge, info.value + 1),
            (ValueKind::Bound, false) => (id, LiteralType::Le, info.value),
        };
        Some(atom)
    }

    /// The variable together with the state a narrowing writes to. With a proof every narrowing
    /// needs literals to be justified, so they are created first.
    fn update<'a>(
        &'a mut self,
        sat: &'a mut SatEngine,
        id: IntVarId,
    ) -> (&'a mut IntVarEl, DomainUpdate<'a>) {
        if sat.proof.is_active() {
            self.materialize(sat, id);
        }

        let update = DomainUpdate {
            sat,
            trail: &mut self.trail,
            changed: &mut self.changed,
        };
        (&mut self.variables[id], update)
    }

    /// Tighten the lower bound of `id` to `value` with `reason`. Returns `false` on a conflict.
    pub(crate) fn set_min(
        &mut self,
        sat: &mut SatEngine,
        id: IntVarId,
        value: i32,
        reason: Reason,
    ) -> bool {
        let (variable, mut update) = self.update(sat, id);
        !variable.set_min_not_r(value) || variable.set_min(value, reason, true, &mut update)
    }

    pub(crate) fn set_max(
        &mut self,
        sat: &mut SatEngine,
        id: IntVarId,
        value: i32,
        reason: Reason,
    ) -> bool {
        let (variable, mut update) = self.update(sat, id);
        !variable.set_max_not_r(value) || variable.set_max(value, reason, true, &mut update)
    }

    pub(crate) fn set_val(
        &mut self,
        sat: &mut SatEngine,
        id: IntVarId,
        value: i32,
        reason: Reason,
    ) -> bool {
        let (variable, mut update) = self.update(sat, id);
        !variable.set_val_not_r(value) || variable.set_val(value, reason, true, &mut update)
    }

    pub(crate) fn rem_val(
        &mut self,
        sat: &mut SatEngine,
        id: IntVarId,
        value: i32,
        reason: Reason,
    ) -> bool {
        let (variable, mut update) = self.update(sat, id);
        !variable.rem_val_not_r(value) || variable.rem_val(value, reason, true, &mut update)
    }

    /// See [`IntVarEl::create_set_lit`].
    pub(crate) fn create_set_lit(
        &mut self,
        sat: &mut SatEngine,
        id: IntVarId,
        head: Vec<Literal>,
    ) -> Literal {
        self.materialize(sat, id);
        self.variables[id].create_set_lit(sat, head)
    }

    /// Give back a literal made by [`Domains::create_set_lit`] which no clause refers to.
    pub(crate) fn free_lazy_var(&self, sat: &mut SatEngine, literal: Literal) {
        if sat.channel_info(literal.variable()).kind == ChannelKind::None {
            sat.remove_lazy_var(literal.variable());
        }
    }

    pub(crate) fn set_decidable(
        &mut self,
        sat: &mut SatEngine,
        id: IntVarId,
        values: bool,
        bounds: bool,
    ) {
        self.materialize(sat, id);
        let variable = &self.variables[id];
        variable.set_value_decidable(sat, values);
        variable.set_bound_decidable(sat, bounds);
    }

    pub(crate) fn set_learnable(&mut self, sat: &mut SatEngine, id: IntVarId) {
        self.materialize(sat, id);
        let variable = &self.variables[id];
        variable.set_value_learnable(sat);
        variable.set_bound_learnable(sat);
    }

    /// The variables whose domains changed since the last call, with their events.
    pub(crate) fn drain_events(&mut self) -> Vec<(IntVarId, EnumSet<DomainEvent>)> {
        self.changed
            .drain(..)
            .map(|id| (id, self.variables[id].take_changes()))
            .collect()
    }

    fn clear_events(&mut self) {
        for id in self.changed.drain(..) {
            let _ = self.variables[id].take_changes();
        }
    }

    pub(crate) fn new_decision_level(&mut self) {
        self.trail.increase_decision_level();
    }

    pub(crate) fn trail_length(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn backtrack_to_level(&mut self, level: usize) {
        self.clear_events();
        if level >= self.trail.get_decision_level() {
            return;
        }

        for change in self.trail.synchronise(level) {
            self.variables[change.variable()].undo(change);
        }
    }

    pub(crate) fn backtrack_to_position(&mut self, position: usize) {
        self.clear_events();
        for change in self.trail.truncate_to(position) {
            self.variables[change.variable()].undo(change);
        }
    }
}

impl ChannelHandler for Domains {
    fn channel(&mut self, sat: &mut SatEngine, literal: Literal, info: ChannelInfo) {
        let (variable, mut update) = self.update(sat, IntVarId::new(info.owner));
        variable.channel(literal, info, &mut update);
    }
}
