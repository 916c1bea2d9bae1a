//! An integer variable with channel literals.
//!
//! Every value `v` between `lit_min` and `lit_max` has an equality literal `[x = v]` (its
//! negation is `[x != v]`), and every threshold has a bound literal `[x > v]` whose negation is
//! `[x <= v]`. The domain and the literals are kept consistent in both directions: assigning a
//! literal narrows the domain through [`IntVarEl::channel`], and narrowing the domain assigns
//! every literal which is implied by the change.
//!
//! A variable starts without literals. Until [`IntVarEl::materialize`] creates them over the
//! domain of that moment, the domain is a [`ValueRanges`] which may only be narrowed at the root.
//!
//! Literals which follow from a change are assigned with a reason that refers to the literal of
//! the change itself, never to the reason of the change.
use enumset::EnumSet;

use super::DomainEvent;
use super::IntVarId;
use super::LiteralType;
use super::ValueRanges;
use crate::basic_types::BooleanVariable;
use crate::basic_types::ChannelInfo;
use crate::basic_types::Literal;
use crate::basic_types::Trail;
use crate::basic_types::ValueKind;
use crate::engine::sat::Clause;
use crate::engine::sat::SatEngine;
use crate::engine::Reason;
use crate::lcg_assert_moderate;
use crate::lcg_assert_simple;

/// An entry of the domain trail, restoring the state before a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DomainChange {
    Bounds { variable: IntVarId, min: i32, max: i32 },
    Removal { variable: IntVarId, value: i32 },
}

impl DomainChange {
    pub(crate) fn variable(self) -> IntVarId {
        match self {
            DomainChange::Bounds { variable, .. } | DomainChange::Removal { variable, .. } => {
                variable
            }
        }
    }
}

/// The parts of the solver a domain change writes to.
#[derive(Debug)]
pub(crate) struct DomainUpdate<'a> {
    pub(crate) sat: &'a mut SatEngine,
    pub(crate) trail: &'a mut Trail<DomainChange>,
    /// Variables with events which have not been delivered to the propagators.
    pub(crate) changed: &'a mut Vec<IntVarId>,
}

#[derive(Clone, Debug)]
pub(crate) struct IntVarEl {
    id: IntVarId,
    min: i32,
    max: i32,
    /// The domain while the literals do not exist.
    pending: Option<ValueRanges>,
    /// Membership of the values in `[lit_min, lit_max]`.
    vals: Vec<bool>,
    lit_min: i32,
    lit_max: i32,
    /// The variable of `[x = lit_min]`.
    value_base: Option<BooleanVariable>,
    /// The variable of `[x > lit_min - 1]`.
    bound_base: Option<BooleanVariable>,
    changes: EnumSet<DomainEvent>,
    in_queue: bool,
}

impl IntVarEl {
    /// A variable over a non-empty set of values, without literals.
    pub(crate) fn new(id: IntVarId, domain: ValueRanges) -> IntVarEl {
        let (Some(min), Some(max)) = (domain.at_or_above(i32::MIN), domain.at_or_below(i32::MAX))
        else {
            panic!("{id} is created with an empty domain");
        };

        IntVarEl {
            id,
            min,
            max,
            pending: Some(domain),
            vals: Vec::new(),
            lit_min: min,
            lit_max: max,
            value_base: None,
            bound_base: None,
            changes: EnumSet::empty(),
            in_queue: false,
        }
    }

    pub(crate) fn id(&self) -> IntVarId {
        self.id
    }

    pub(crate) fn min(&self) -> i32 {
        self.min
    }

    pub(crate) fn max(&self) -> i32 {
        self.max
    }

    pub(crate) fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    pub(crate) fn contains(&self, value: i32) -> bool {
        if value < self.min || value > self.max {
            return false;
        }
        match &self.pending {
            Some(domain) => domain.contains(value),
            None => self.vals[self.offset(value)],
        }
    }

    pub(crate) fn size(&self) -> usize {
        match &self.pending {
            Some(domain) => domain.count_between(self.min, self.max),
            None => (self.min..=self.max)
                .filter(|&value| self.vals[self.offset(value)])
                .count(),
        }
    }

    /// Whether the literals have not been created yet.
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn lit_min(&self) -> i32 {
        self.lit_min
    }

    pub(crate) fn lit_max(&self) -> i32 {
        self.lit_max
    }

    fn offset(&self, value: i32) -> usize {
        (value - self.lit_min) as usize
    }

    /// Create the literals over the current domain, which becomes `[lit_min, lit_max]`. Must be
    /// called at the root; later calls do nothing.
    pub(crate) fn materialize(&mut self, sat: &mut SatEngine) {
        let Some(domain) = self.pending.take() else {
            return;
        };
        lcg_assert_simple!(sat.decision_level() == 0);

        self.lit_min = self.min;
        self.lit_max = self.max;
        self.vals = (self.min..=self.max)
            .map(|value| domain.contains(value))
            .collect();

        self.init_value_literals(sat);
        self.init_bound_literals(sat);
    }

    /// Create the equality literals, and assign those of values outside the domain.
    fn init_value_literals(&mut self, sat: &mut SatEngine) {
        let count = (self.lit_max - self.lit_min + 1) as u32;
        let info = ChannelInfo::int_var(self.id.index(), ValueKind::Value, self.lit_min);
        self.value_base = Some(sat.new_var(count, info));

        for value in self.lit_min..=self.lit_max {
            if !self.contains(value) {
                sat.c_enqueue(self.ne_lit(value), Reason::Decision);
            }
        }
        if self.is_fixed() {
            sat.c_enqueue(self.eq_lit(self.min), Reason::Decision);
        }
    }

    /// Create the bound literals, and assign those which the bounds decide.
    fn init_bound_literals(&mut self, sat: &mut SatEngine) {
        let count = (self.lit_max - self.lit_min + 2) as u32;
        let info = ChannelInfo::int_var(self.id.index(), ValueKind::Bound, self.lit_min - 1);
        self.bound_base = Some(sat.new_var(count, info));

        for value in self.lit_min..=self.min {
            sat.c_enqueue(self.ge_lit(value), Reason::Decision);
        }
        for value in self.max..=self.lit_max {
            sat.c_enqueue(self.le_lit(value), Reason::Decision);
        }
    }

    fn value_variable(&self, value: i32) -> BooleanVariable {
        lcg_assert_moderate!(self.lit_min <= value && value <= self.lit_max);
        let Some(base) = self.value_base else {
            panic!("the value literals of {} do not exist", self.id);
        };
        BooleanVariable::new(base.index() + (value - self.lit_min) as u32)
    }

    /// The variable of `[x > value]`.
    fn bound_variable(&self, value: i32) -> BooleanVariable {
        lcg_assert_moderate!(self.lit_min - 1 <= value && value <= self.lit_max);
        let Some(base) = self.bound_base else {
            panic!("the bound literals of {} do not exist", self.id);
        };
        BooleanVariable::new(base.index() + (value - self.lit_min + 1) as u32)
    }

    pub(crate) fn eq_lit(&self, value: i32) -> Literal {
        Literal::positive(self.value_variable(value))
    }

    pub(crate) fn ne_lit(&self, value: i32) -> Literal {
        !self.eq_lit(value)
    }

    pub(crate) fn ge_lit(&self, value: i32) -> Literal {
        Literal::positive(self.bound_variable(value - 1))
    }

    pub(crate) fn le_lit(&self, value: i32) -> Literal {
        !Literal::positive(self.bound_variable(value))
    }

    /// The literal of `kind` for `value`. Outside `[lit_min, lit_max]` this is one of the
    /// constant literals.
    ///
    /// Without literals only atoms which the domain decides have a literal, a constant.
    pub(crate) fn get_lit(&self, sat: &SatEngine, value: i64, kind: LiteralType) -> Literal {
        let holds = if self.is_pending() {
            self.decided(value, kind)
        } else if value < i64::from(self.lit_min) {
            Some(matches!(kind, LiteralType::Ne | LiteralType::Ge))
        } else if value > i64::from(self.lit_max) {
            Some(matches!(kind, LiteralType::Ne | LiteralType::Le))
        } else {
            None
        };

        match holds {
            Some(true) => sat.true_literal(),
            Some(false) => sat.false_literal(),
            None => {
                let value = value as i32;
                match kind {
                    LiteralType::Ne => self.ne_lit(value),
                    LiteralType::Eq => self.eq_lit(value),
                    LiteralType::Ge => self.ge_lit(value),
                    LiteralType::Le => self.le_lit(value),
                }
            }
        }
    }

    /// Whether the domain decides `[x <kind> value]`.
    fn decided(&self, value: i64, kind: LiteralType) -> Option<bool> {
        let (min, max) = (i64::from(self.min), i64::from(self.max));
        let member = min <= value && value <= max && self.contains(value as i32);

        match kind {
            LiteralType::Ge if value <= min => Some(true),
            LiteralType::Ge if value > max => Some(false),
            LiteralType::Le if value >= max => Some(true),
            LiteralType::Le if value < min => Some(false),
            LiteralType::Eq if !member => Some(false),
            LiteralType::Ne if !member => Some(true),
            LiteralType::Eq if min == max => Some(true),
            LiteralType::Ne if min == max => Some(false),
            _ => None,
        }
    }

    /// The reason of a literal implied by the false literals `p` and `q`, either of which may
    /// be a constant.
    fn implied_by(sat: &mut SatEngine, p: Literal, q: Literal) -> Reason {
        lcg_assert_moderate!(sat.is_false(p) && sat.is_false(q));

        match (sat.is_constant(p.variable()), sat.is_constant(q.variable())) {
            (true, true) => Reason::Decision,
            (true, false) => sat.mk_reason(q),
            (false, true) => sat.mk_reason(p),
            (false, false) => sat.mk_reason2(p, q),
        }
    }

    pub(crate) fn set_min_not_r(&self, value: i32) -> bool {
        value > self.min
    }

    pub(crate) fn set_max_not_r(&self, value: i32) -> bool {
        value < self.max
    }

    pub(crate) fn set_val_not_r(&self, value: i32) -> bool {
        value != self.min || value != self.max
    }

    pub(crate) fn rem_val_not_r(&self, value: i32) -> bool {
        self.contains(value)
    }

    /// `[x >= value]` was just set: assign the weaker bounds and exclude the values below.
    fn channel_min(&self, value: i32, sat: &mut SatEngine) {
        let reason = sat.mk_reason(!self.ge_lit(value));

        for v in (self.min + 1..value).rev() {
            sat.c_enqueue(self.ge_lit(v), reason);
            if self.vals[self.offset(v)] {
                sat.c_enqueue(self.ne_lit(v), reason);
            }
        }
        lcg_assert_simple!(self.vals[self.offset(self.min)]);
        sat.c_enqueue(self.ne_lit(self.min), reason);
    }

    /// `[x <= value]` was just set.
    fn channel_max(&self, value: i32, sat: &mut SatEngine) {
        let reason = sat.mk_reason(!self.le_lit(value));

        for v in value + 1..self.max {
            sat.c_enqueue(self.le_lit(v), reason);
            if self.vals[self.offset(v)] {
                sat.c_enqueue(self.ne_lit(v), reason);
            }
        }
        lcg_assert_simple!(self.vals[self.offset(self.max)]);
        sat.c_enqueue(self.ne_lit(self.max), reason);
    }

    /// `[x = value]` was just set.
    fn channel_fix(&self, value: i32, sat: &mut SatEngine) {
        let reason = sat.mk_reason(self.ne_lit(value));

        if self.min < value {
            sat.c_enqueue(self.ge_lit(value), reason);
            self.channel_min(value, sat);
        }
        if self.max > value {
            sat.c_enqueue(self.le_lit(value), reason);
            self.channel_max(value, sat);
        }
    }

    /// Move the lower bound past removed values.
    fn update_min(&mut self, sat: &mut SatEngine) {
        let mut value = self.min;
        while !self.vals[self.offset(value)] {
            let below = self.get_lit(sat, i64::from(value) - 1, LiteralType::Le);
            let reason = Self::implied_by(sat, below, self.eq_lit(value));
            sat.c_enqueue(self.ge_lit(value + 1), reason);
            value += 1;
        }

        if value > self.min {
            self.min = value;
            self.changes |= DomainEvent::LowerBound;
        }
    }

    /// Move the upper bound past removed values.
    fn update_max(&mut self, sat: &mut SatEngine) {
        let mut value = self.max;
        while !self.vals[self.offset(value)] {
            let above = self.get_lit(sat, i64::from(value) + 1, LiteralType::Ge);
            let reason = Self::implied_by(sat, above, self.eq_lit(value));
            sat.c_enqueue(self.le_lit(value - 1), reason);
            value -= 1;
        }

        if value < self.max {
            self.max = value;
            self.changes |= DomainEvent::UpperBound;
        }
    }

    fn update_fixed(&mut self, sat: &mut SatEngine) {
        if !self.is_fixed() {
            return;
        }

        let value = self.min;
        let eq = self.eq_lit(value);
        if sat.value(eq).is_undefined() {
            let below = self.get_lit(sat, i64::from(value) - 1, LiteralType::Le);
            let above = self.get_lit(sat, i64::from(value) + 1, LiteralType::Ge);
            let reason = Self::implied_by(sat, below, above);
            sat.c_enqueue(eq, reason);
        }
        self.changes |= DomainEvent::Fix;
    }

    /// Raise the lower bound to `value`. With `channel`, `[x >= value]` is assigned with
    /// `reason` first. Returns `false` if the domain becomes empty; the conflict is set on the
    /// SAT engine in that case.
    pub(crate) fn set_min(
        &mut self,
        value: i32,
        reason: Reason,
        channel: bool,
        update: &mut DomainUpdate<'_>,
    ) -> bool {
        lcg_assert_simple!(self.set_min_not_r(value));
        if self.is_pending() {
            return self.narrow_pending(value, self.max, None, reason, update);
        }

        if channel {
            let literal = self.get_lit(update.sat, i64::from(value), LiteralType::Ge);
            update.sat.c_enqueue(literal, reason);
        }
        if value > self.max {
            lcg_assert_simple!(update.sat.has_conflict());
            return false;
        }

        self.save(update);
        self.channel_min(value, update.sat);
        self.min = value;
        self.changes |= DomainEvent::Change | DomainEvent::LowerBound;
        self.update_min(update.sat);
        self.update_fixed(update.sat);
        self.push_in_queue(update);
        true
    }

    /// Lower the upper bound to `value`.
    pub(crate) fn set_max(
        &mut self,
        value: i32,
        reason: Reason,
        channel: bool,
        update: &mut DomainUpdate<'_>,
    ) -> bool {
        lcg_assert_simple!(self.set_max_not_r(value));
        if self.is_pending() {
            return self.narrow_pending(self.min, value, None, reason, update);
        }

        if channel {
            let literal = self.get_lit(update.sat, i64::from(value), LiteralType::Le);
            update.sat.c_enqueue(literal, reason);
        }
        if value < self.min {
            lcg_assert_simple!(update.sat.has_conflict());
            return false;
        }

        self.save(update);
        self.channel_max(value, update.sat);
        self.max = value;
        self.changes |= DomainEvent::Change | DomainEvent::UpperBound;
        self.update_max(update.sat);
        self.update_fixed(update.sat);
        self.push_in_queue(update);
        true
    }

    /// Fix the variable to `value`.
    pub(crate) fn set_val(
        &mut self,
        value: i32,
        reason: Reason,
        channel: bool,
        update: &mut DomainUpdate<'_>,
    ) -> bool {
        lcg_assert_simple!(self.set_val_not_r(value));
        if self.is_pending() {
            return self.narrow_pending(value, value, None, reason, update);
        }

        if channel {
            let literal = self.get_lit(update.sat, i64::from(value), LiteralType::Eq);
            update.sat.c_enqueue(literal, reason);
        }
        if !self.contains(value) {
            lcg_assert_simple!(update.sat.has_conflict());
            return false;
        }

        self.save(update);
        self.changes |= DomainEvent::Change | DomainEvent::Fix;
        self.channel_fix(value, update.sat);
        if self.min < value {
            self.min = value;
            self.changes |= DomainEvent::LowerBound;
        }
        if self.max > value {
            self.max = value;
            self.changes |= DomainEvent::UpperBound;
        }
        self.push_in_queue(update);
        true
    }

    /// Remove `value` from the domain.
    pub(crate) fn rem_val(
        &mut self,
        value: i32,
        reason: Reason,
        channel: bool,
        update: &mut DomainUpdate<'_>,
    ) -> bool {
        lcg_assert_simple!(self.rem_val_not_r(value));
        if self.is_pending() {
            return self.narrow_pending(self.min, self.max, Some(value), reason, update);
        }

        if channel {
            let literal = self.get_lit(update.sat, i64::from(value), LiteralType::Ne);
            update.sat.c_enqueue(literal, reason);
        }
        if self.is_fixed() {
            lcg_assert_simple!(update.sat.has_conflict());
            return false;
        }

        self.save(update);
        update.trail.push(DomainChange::Removal {
            variable: self.id,
            value,
        });
        self.changes |= DomainEvent::Change;
        let offset = self.offset(value);
        self.vals[offset] = false;
        self.update_min(update.sat);
        self.update_max(update.sat);
        self.update_fixed(update.sat);
        self.push_in_queue(update);
        true
    }

    /// Narrow a domain without literals to `[lower_bound, upper_bound]`, minus `removed`. An
    /// empty domain is reported as a conflict on the false literal with `reason`.
    fn narrow_pending(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        removed: Option<i32>,
        reason: Reason,
        update: &mut DomainUpdate<'_>,
    ) -> bool {
        lcg_assert_simple!(
            update.sat.decision_level() == 0,
            "{} is narrowed above the root before its literals exist",
            self.id
        );
        let Some(domain) = self.pending.as_mut() else {
            panic!("{} already has literals", self.id);
        };

        let lower_bound = lower_bound.max(self.min);
        let upper_bound = upper_bound.min(self.max);
        let empty = removed.is_some_and(|value| self.min == value && self.max == value)
            || domain
                .at_or_above(lower_bound)
                .map_or(true, |min| min > upper_bound);
        if empty {
            let false_literal = update.sat.false_literal();
            update.sat.c_enqueue(false_literal, reason);
            return false;
        }

        update.trail.push(DomainChange::Bounds {
            variable: self.id,
            min: self.min,
            max: self.max,
        });
        if let Some(value) = removed {
            domain.remove(value);
            update.trail.push(DomainChange::Removal {
                variable: self.id,
                value,
            });
            self.changes |= DomainEvent::Change;
        }

        let min = domain.at_or_above(lower_bound).unwrap_or(lower_bound);
        let max = domain.at_or_below(upper_bound).unwrap_or(upper_bound);
        if min > self.min {
            self.min = min;
            self.changes |= DomainEvent::Change | DomainEvent::LowerBound;
        }
        if max < self.max {
            self.max = max;
            self.changes |= DomainEvent::Change | DomainEvent::UpperBound;
        }
        if self.is_fixed() {
            self.changes |= DomainEvent::Fix;
        }

        self.push_in_queue(update);
        true
    }

    /// Narrow the domain after `literal`, one of the channel literals of this variable, was
    /// assigned true.
    pub(crate) fn channel(
        &mut self,
        literal: Literal,
        info: ChannelInfo,
        update: &mut DomainUpdate<'_>,
    ) {
        lcg_assert_moderate!(info.owner == self.id.index());

        let value = info.value;
        let _ = match (info.value_kind, literal.is_positive()) {
            (ValueKind::Value, true) if self.set_val_not_r(value) => {
                self.set_val(value, Reason::Decision, false, update)
            }
            (ValueKind::Value, false) if self.rem_val_not_r(value) => {
                self.rem_val(value, Reason::Decision, false, update)
            }
            (ValueKind::Bound, true) if self.set_min_not_r(value + 1) => {
                self.set_min(value + 1, Reason::Decision, false, update)
            }
            (ValueKind::Bound, false) if self.set_max_not_r(value) => {
                self.set_max(value, Reason::Decision, false, update)
            }
            _ => true,
        };
    }

    fn save(&self, update: &mut DomainUpdate<'_>) {
        update.trail.push(DomainChange::Bounds {
            variable: self.id,
            min: self.min,
            max: self.max,
        });
    }

    fn push_in_queue(&mut self, update: &mut DomainUpdate<'_>) {
        if !self.in_queue {
            self.in_queue = true;
            update.changed.push(self.id);
        }
    }

    /// The events since the last call.
    pub(crate) fn take_changes(&mut self) -> EnumSet<DomainEvent> {
        self.in_queue = false;
        std::mem::take(&mut self.changes)
    }

    pub(crate) fn undo(&mut self, change: DomainChange) {
        match change {
            DomainChange::Bounds { min, max, .. } => {
                self.min = min;
                self.max = max;
            }
            DomainChange::Removal { value, .. } => match &mut self.pending {
                Some(domain) => domain.insert(value),
                None => {
                    let offset = self.offset(value);
                    self.vals[offset] = true;
                }
            },
        }
    }

    pub(crate) fn set_value_decidable(&self, sat: &mut SatEngine, decidable: bool) {
        for value in self.lit_min..=self.lit_max {
            sat.set_decidable(self.value_variable(value), decidable);
        }
    }

    pub(crate) fn set_bound_decidable(&self, sat: &mut SatEngine, decidable: bool) {
        for value in self.lit_min - 1..=self.lit_max {
            sat.set_decidable(self.bound_variable(value), decidable);
        }
    }

    /// Allow the value literals in learnt clauses and as UIP.
    pub(crate) fn set_value_learnable(&self, sat: &mut SatEngine) {
        for value in self.lit_min..=self.lit_max {
            let variable = self.value_variable(value);
            sat.set_learnable(variable, true);
            sat.set_uipable(variable, true);
        }
    }

    pub(crate) fn set_bound_learnable(&self, sat: &mut SatEngine) {
        for value in self.lit_min - 1..=self.lit_max {
            let variable = self.bound_variable(value);
            sat.set_learnable(variable, true);
            sat.set_uipable(variable, true);
        }
    }

    /// A single literal which implies the disjunction of `head`, a set of channel literals of
    /// this variable which do not cover the whole domain.
    ///
    /// A not-equal literal in `head`, or an existing bound literal with the same meaning, is
    /// returned as is. Otherwise a fresh literal `q` is created together with clauses stating
    /// that `q` excludes every value the head does not cover.
    pub(crate) fn create_set_lit(&self, sat: &mut SatEngine, mut head: Vec<Literal>) -> Literal {
        let mut lower_bound = self.lit_min;
        let mut upper_bound = self.lit_max;
        let mut holes = Vec::new();

        head.sort_unstable();

        for &literal in &head {
            let info = sat.channel_info(literal.variable());
            lcg_assert_moderate!(info.owner == self.id.index());
            if info.value_kind != ValueKind::Bound {
                continue;
            }

            if literal.is_positive() {
                upper_bound = upper_bound.min(info.value);
            } else {
                lower_bound = lower_bound.max(info.value + 1);
            }
        }

        for &literal in &head {
            let info = sat.channel_info(literal.variable());
            if info.value_kind != ValueKind::Value {
                continue;
            }

            let value = info.value;
            if literal.is_negative() {
                return self.ne_lit(value);
            }
            if value < lower_bound || value > upper_bound {
                continue;
            }
            if value == lower_bound {
                lower_bound += 1;
            } else if value == upper_bound {
                upper_bound -= 1;
            } else {
                holes.push(value);
            }
        }

        lcg_assert_simple!(
            lower_bound <= upper_bound,
            "the literals cover the whole domain of {}",
            self.id
        );

        if lower_bound == self.lit_min && holes.is_empty() {
            return self.get_lit(sat, i64::from(upper_bound) + 1, LiteralType::Ge);
        }
        if upper_bound == self.lit_max && holes.is_empty() {
            return self.get_lit(sat, i64::from(lower_bound) - 1, LiteralType::Le);
        }

        let variable = sat.get_lazy_var(ChannelInfo::unchanneled());
        sat.set_uipable(variable, false);
        sat.set_learnable(variable, false);
        let q = Literal::positive(variable);
        let origin = sat.proof.active_item();

        // The clauses below are problem clauses; `sat.clauses` owns their references.

        if lower_bound == self.lit_min {
            let clause = Clause::new(vec![self.ge_lit(holes[0]), !q], false, origin);
            let _reference = sat.attach_clause(clause, false);
            lower_bound = holes[0];
        }
        if upper_bound == self.lit_max {
            let last = holes[holes.len() - 1];
            let clause = Clause::new(vec![self.le_lit(last), !q], false, origin);
            let _reference = sat.attach_clause(clause, false);
            upper_bound = last;
        }

        let mut holes = holes.into_iter().peekable();
        for value in lower_bound..=upper_bound {
            if holes.next_if_eq(&value).is_some() {
                continue;
            }
            let clause = Clause::new(vec![self.ne_lit(value), !q], false, origin);
            let _reference = sat.attach_clause(clause, true);
        }

        q
    }
}
