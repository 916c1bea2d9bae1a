//! The Boolean core: a CDCL engine with a trail per decision level.
//!
//! Besides the usual watched-literal propagation, the engine supports
//! * binary clauses which live only in the watch lists, when no proof is logged;
//! * propagators which are woken up when a literal becomes true;
//! * reasons which are turned into clauses only when they are needed, see [`Reason`];
//! * channelled variables, whose assignments are forwarded to their integer variable.
//!
//! Clauses which explain a single propagation are stored on the reason trail of the level the
//! propagation happened at, and are freed when that level is undone.
mod backtracking;
mod branching;
mod clause;
mod clause_allocator;
mod clause_database;
mod conflict_analysis;
mod explanation;
mod literal_flags;
mod propagation;
mod root_justification;
mod watch;

pub(crate) use clause::Clause;
pub(crate) use clause_allocator::ClauseAllocator;
pub use clause_allocator::ClauseReference;
pub(crate) use conflict_analysis::LearntClause;
pub(crate) use literal_flags::LiteralFlags;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
pub(crate) use watch::WatchElem;

use crate::basic_types::BooleanVariable;
use crate::basic_types::ChannelInfo;
use crate::basic_types::ChannelKind;
use crate::basic_types::HashSet;
use crate::basic_types::Lbool;
use crate::basic_types::Literal;
use crate::containers::KeyValueHeap;
use crate::containers::KeyedVec;
use crate::create_statistics_struct;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagatorId;
use crate::engine::variables::IntVarId;
use crate::engine::ChannelHandler;
use crate::engine::Reason;
use crate::lcg_assert_moderate;
use crate::lcg_assert_simple;
use crate::options::SatOptions;
use crate::proof::BindingTarget;
use crate::proof::ProofError;
use crate::proof::ProofLog;

/// Freed lazy variables are not handed out again until reuse is known to be safe; the free list
/// is kept but never filled.
const LAZY_VARIABLE_REUSE: bool = false;

/// The number of propagations before the first root-level simplification.
const FIRST_SIMPLIFICATION: u64 = 100_000;

create_statistics_struct!(
    /// Counters of the Boolean core.
    SatStatistics {
        num_binary_clauses: u64,
        num_ternary_clauses: u64,
        num_long_clauses: u64,
        num_learnt_clauses: u64,
        num_clause_literals: u64,
        num_learnt_literals: u64,
        num_propagations: u64,
        num_conflicts: u64,
        num_decisions: u64,
        num_back_jumps: u64,
        num_restarts: u64,
        num_lazy_variables: u64,
});

/// Where a variable sits on the trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TrailPosition {
    pub(crate) level: usize,
    pub(crate) index: usize,
}

/// Why propagation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(
    variant_size_differences,
    reason = "a conflict is stored once per solver, not per variable"
)]
pub(crate) enum Conflict {
    /// Every literal of the clause is false.
    Clause(ClauseReference),
    /// `reason` implies `literal`, which is false.
    Propagation { literal: Literal, reason: Reason },
}

#[derive(Debug)]
pub(crate) struct SatEngine {
    pub(crate) options: SatOptions,
    pub(crate) clause_allocator: ClauseAllocator,
    /// Attached input clauses.
    pub(crate) clauses: Vec<ClauseReference>,
    pub(crate) learnts: Vec<ClauseReference>,
    /// For every literal, what has to be visited when it becomes true.
    watches: KeyedVec<Literal, Vec<WatchElem>>,
    assignments: KeyedVec<BooleanVariable, Lbool>,
    reasons: KeyedVec<BooleanVariable, Reason>,
    /// `None` for unassigned variables and for root facts which have been cleaned up.
    trail_positions: KeyedVec<BooleanVariable, Option<TrailPosition>>,
    trail: Vec<Vec<Literal>>,
    queue_heads: Vec<usize>,
    reason_trail: Vec<Vec<ClauseReference>>,
    channel_info: KeyedVec<BooleanVariable, ChannelInfo>,
    flags: KeyedVec<BooleanVariable, LiteralFlags>,
    /// The number of learnt clauses a variable occurs in.
    usage: KeyedVec<BooleanVariable, u32>,
    phase: KeyedVec<BooleanVariable, bool>,
    order_heap: KeyValueHeap<BooleanVariable, f64>,
    variable_increment: f64,
    clause_increment: f32,
    conflict: Option<Conflict>,
    /// Scratch clause for reasons which consist of one or two literals.
    short_explanation: ClauseReference,
    /// Scratch clause for conflicts between two literals.
    short_conflict: ClauseReference,
    free_lazy_variables: Vec<BooleanVariable>,
    pub(crate) proof: ProofLog,
    random: SmallRng,
    pub(crate) statistics: SatStatistics,
    /// Unit clauses which justify root facts in the proof. They are never freed.
    root_units: Vec<ClauseReference>,
    units_in_progress: HashSet<BooleanVariable>,
    next_simplify: u64,
    seen: KeyedVec<BooleanVariable, bool>,
}

impl SatEngine {
    pub(crate) fn new(options: SatOptions, proof: ProofLog) -> SatEngine {
        let mut clause_allocator = ClauseAllocator::default();
        let short_explanation = clause_allocator.allocate(Clause::temporary(3, 0));
        let placeholder = Literal::from_u32(0);
        let short_conflict =
            clause_allocator.allocate(Clause::new(vec![placeholder; 2], false, 0));

        let mut sat = SatEngine {
            options,
            clause_allocator,
            clauses: Vec::new(),
            learnts: Vec::new(),
            watches: KeyedVec::default(),
            assignments: KeyedVec::default(),
            reasons: KeyedVec::default(),
            trail_positions: KeyedVec::default(),
            trail: vec![Vec::new()],
            queue_heads: vec![0],
            reason_trail: vec![Vec::new()],
            channel_info: KeyedVec::default(),
            flags: KeyedVec::default(),
            usage: KeyedVec::default(),
            phase: KeyedVec::default(),
            order_heap: KeyValueHeap::default(),
            variable_increment: 1.0,
            clause_increment: 1.0,
            conflict: None,
            short_explanation,
            short_conflict,
            free_lazy_variables: Vec::new(),
            proof,
            random: SmallRng::seed_from_u64(options.random_seed),
            statistics: SatStatistics::default(),
            root_units: Vec::new(),
            units_in_progress: HashSet::default(),
            next_simplify: FIRST_SIMPLIFICATION,
            seen: KeyedVec::default(),
        };

        let true_variable = sat.new_var(1, ChannelInfo::unchanneled());
        let false_variable = sat.new_var(1, ChannelInfo::unchanneled());
        sat.assign(Literal::positive(true_variable), Reason::Decision);
        sat.assign(!Literal::positive(false_variable), Reason::Decision);

        sat
    }

    /// The literal which is true in every assignment.
    pub(crate) fn true_literal(&self) -> Literal {
        Literal::positive(BooleanVariable::new(0))
    }

    pub(crate) fn false_literal(&self) -> Literal {
        !self.true_literal()
    }

    /// Whether the variable is one of the two constants created with the engine.
    pub(crate) fn is_constant(&self, variable: BooleanVariable) -> bool {
        variable.index() < 2
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.assignments.len()
    }

    /// Create `count` consecutive variables. The channel of the `i`-th variable is `info` with
    /// its value shifted by `i`. Returns the first variable.
    pub(crate) fn new_var(&mut self, count: u32, info: ChannelInfo) -> BooleanVariable {
        let first = BooleanVariable::new(self.num_variables() as u32);

        for offset in 0..count {
            let variable = BooleanVariable::new(first.index() + offset);

            let _ = self.watches.push(Vec::new());
            let _ = self.watches.push(Vec::new());
            let _ = self.assignments.push(Lbool::Undefined);
            let _ = self.reasons.push(Reason::Decision);
            let _ = self.trail_positions.push(None);
            let _ = self.channel_info.push(info.offset_by(offset as i32));
            let _ = self.flags.push(LiteralFlags::default());
            let _ = self.usage.push(0);
            let _ = self.phase.push(false);
            let _ = self.seen.push(false);

            let activity = if self.options.random_tie_breaking {
                self.random.gen_range(0.0..1e-5)
            } else {
                0.0
            };
            self.order_heap.grow(variable, activity);
        }

        first
    }

    /// A fresh variable for a literal which is created during search.
    pub(crate) fn get_lazy_var(&mut self, info: ChannelInfo) -> BooleanVariable {
        self.statistics.num_lazy_variables += 1;

        match self.free_lazy_variables.pop() {
            Some(variable) => {
                lcg_assert_simple!(self.assignments[variable].is_undefined());
                lcg_assert_simple!(self.watches[Literal::positive(variable)].is_empty());
                lcg_assert_simple!(self.watches[!Literal::positive(variable)].is_empty());
                lcg_assert_simple!(self.usage[variable] == 0);

                self.channel_info[variable] = info;
                self.phase[variable] = false;
                self.flags[variable] = LiteralFlags::default();
                self.order_heap.set_value(variable, 0.0);
                self.order_heap.restore_key(variable);
                variable
            }
            None => self.new_var(1, info),
        }
    }

    /// Return a lazy variable which no clause uses anymore.
    pub(crate) fn remove_lazy_var(&mut self, variable: BooleanVariable) {
        if !LAZY_VARIABLE_REUSE {
            return;
        }

        lcg_assert_simple!(self.assignments[variable].is_undefined());
        lcg_assert_simple!(self.watches[Literal::positive(variable)].is_empty());
        lcg_assert_simple!(self.watches[!Literal::positive(variable)].is_empty());
        lcg_assert_simple!(self.channel_info[variable].kind == ChannelKind::None);

        self.free_lazy_variables.push(variable);
    }

    pub(crate) fn value(&self, literal: Literal) -> Lbool {
        literal_value(&self.assignments, literal)
    }

    pub(crate) fn is_true(&self, literal: Literal) -> bool {
        self.value(literal).is_true()
    }

    pub(crate) fn is_false(&self, literal: Literal) -> bool {
        self.value(literal).is_false()
    }

    /// The decision level a variable was assigned at. Unassigned variables and root facts are
    /// at level 0.
    pub(crate) fn level(&self, variable: BooleanVariable) -> usize {
        self.trail_positions[variable].map_or(0, |position| position.level)
    }

    pub(crate) fn trail_position(&self, variable: BooleanVariable) -> Option<TrailPosition> {
        self.trail_positions[variable]
    }

    pub(crate) fn decision_level(&self) -> usize {
        self.trail.len() - 1
    }

    /// The literals assigned at `level`, in assignment order.
    pub(crate) fn trail_at(&self, level: usize) -> &[Literal] {
        &self.trail[level]
    }

    pub(crate) fn reason(&self, variable: BooleanVariable) -> Reason {
        self.reasons[variable]
    }

    pub(crate) fn channel_info(&self, variable: BooleanVariable) -> ChannelInfo {
        self.channel_info[variable]
    }

    pub(crate) fn flags(&self, variable: BooleanVariable) -> LiteralFlags {
        self.flags[variable]
    }

    pub(crate) fn set_decidable(&mut self, variable: BooleanVariable, decidable: bool) {
        self.flags[variable].set_decidable(decidable);
        if decidable && self.assignments[variable].is_undefined() {
            self.order_heap.restore_key(variable);
        }
    }

    pub(crate) fn set_uipable(&mut self, variable: BooleanVariable, uipable: bool) {
        self.flags[variable].set_uipable(uipable);
    }

    pub(crate) fn set_learnable(&mut self, variable: BooleanVariable, learnable: bool) {
        self.flags[variable].set_learnable(learnable);
    }

    pub(crate) fn new_decision_level(&mut self) {
        self.trail.push(Vec::new());
        self.queue_heads.push(0);
        self.reason_trail.push(Vec::new());
    }

    /// Assign `literal` and forward the assignment to its integer variable, if it has one.
    pub(crate) fn enqueue(
        &mut self,
        literal: Literal,
        reason: Reason,
        channels: &mut impl ChannelHandler,
    ) {
        self.assign(literal, reason);

        let info = self.channel_info[literal.variable()];
        if info.kind == ChannelKind::IntVar {
            channels.channel(self, literal, info);
        }
    }

    /// Assign `literal` on behalf of an integer variable, without channelling. If `literal` is
    /// already false, the conflict is recorded instead.
    pub(crate) fn c_enqueue(&mut self, literal: Literal, reason: Reason) {
        lcg_assert_simple!(!self.is_true(literal), "{literal} is already true");

        if self.is_false(literal) {
            lcg_assert_moderate!(
                !self.options.lazy || !reason.is_decision() || self.decision_level() == 0,
                "unexplained conflict on {literal} above the root"
            );

            if self.conflict.is_none() {
                self.conflict = Some(Conflict::Propagation { literal, reason });
            }
            return;
        }

        self.assign(literal, reason);
    }

    /// Assign `literal` at the earlier decision level `level`. It is propagated once the search
    /// is back at that level.
    pub(crate) fn a_enqueue(&mut self, literal: Literal, reason: Reason, level: usize) {
        lcg_assert_simple!(self.value(literal).is_undefined());
        lcg_assert_simple!(level <= self.decision_level());

        let variable = literal.variable();
        self.assignments[variable] = Lbool::from(literal.is_positive());
        self.trail_positions[variable] = Some(TrailPosition {
            level,
            index: self.trail[level].len(),
        });
        self.reasons[variable] = reason;
        self.trail[level].push(literal);
    }

    fn assign(&mut self, literal: Literal, reason: Reason) {
        lcg_assert_simple!(
            self.value(literal).is_undefined(),
            "{literal} is already assigned"
        );

        let variable = literal.variable();
        let level = self.decision_level();

        self.assignments[variable] = Lbool::from(literal.is_positive());
        self.trail_positions[variable] = Some(TrailPosition {
            level,
            index: self.trail[level].len(),
        });
        self.reasons[variable] = reason;
        self.trail[level].push(literal);
    }

    pub(crate) fn conflict(&self) -> Option<Conflict> {
        self.conflict
    }

    pub(crate) fn has_conflict(&self) -> bool {
        self.conflict.is_some()
    }

    /// Make `(p v q)` the conflict, where both literals are false.
    pub(crate) fn set_conflict(&mut self, p: Literal, q: Literal) {
        let clause = &mut self.clause_allocator[self.short_conflict];
        self.proof.del(clause);

        clause[0] = p;
        clause[1] = q;
        self.conflict = Some(Conflict::Clause(self.short_conflict));
    }

    /// A reason for a literal which is implied by the false literal `p`.
    pub(crate) fn mk_reason(&mut self, p: Literal) -> Reason {
        if self.proof.is_active() {
            Reason::Clause(self.reason_clause(&[p]))
        } else {
            Reason::Literal(p)
        }
    }

    /// A reason for a literal which is implied by the false literals `p` and `q`.
    pub(crate) fn mk_reason2(&mut self, p: Literal, q: Literal) -> Reason {
        if self.proof.is_active() {
            Reason::Clause(self.reason_clause(&[p, q]))
        } else {
            Reason::Literals(p, q)
        }
    }

    /// A temporary clause `(_ v antecedents)` on the current reason trail. Position 0 is filled in
    /// with the literal it explains when it is used.
    fn reason_clause(&mut self, antecedents: &[Literal]) -> ClauseReference {
        let mut clause = Clause::temporary(antecedents.len() + 1, self.proof.active_item());
        for (index, &antecedent) in antecedents.iter().enumerate() {
            clause[index + 1] = antecedent;
        }

        let level = self.decision_level();
        self.allocate_temporary(clause, level)
    }

    fn allocate_temporary(&mut self, clause: Clause, level: usize) -> ClauseReference {
        lcg_assert_moderate!(clause.is_temporary());
        let reference = self.clause_allocator.allocate(clause);
        self.reason_trail[level].push(reference);
        reference
    }

    /// Wake up `propagator` whenever `literal` becomes true.
    pub(crate) fn add_wakeup(
        &mut self,
        literal: Literal,
        propagator: PropagatorId,
        local_id: LocalId,
    ) {
        self.watches[literal].push(WatchElem::Wakeup {
            propagator,
            local_id,
        });
    }

    /// Capture the current assignment in the proof log.
    pub(crate) fn save_model(&mut self, mut int_value: impl FnMut(IntVarId) -> Option<i64>) {
        let assignments = &self.assignments;
        self.proof.save_model(|target| match target {
            BindingTarget::Literal(literal) => {
                let value = literal_value(assignments, literal);
                Some(i64::from(value != Lbool::False))
            }
            BindingTarget::IntVar(variable) => int_value(variable),
        });
    }

    /// Write the semantics of every channel literal and close the proof.
    pub(crate) fn finalize_proof(&mut self) -> Result<(), ProofError> {
        if !self.proof.is_active() {
            return Ok(());
        }

        for index in 2..self.num_variables() {
            let variable = BooleanVariable::new(index as u32);
            self.proof.log_channel_semantics(
                variable,
                self.channel_info[variable],
                self.assignments[variable],
            );
        }

        self.proof.finalize()
    }
}

/// The value of `literal`, for use while another field of the engine is borrowed.
fn literal_value(assignments: &KeyedVec<BooleanVariable, Lbool>, literal: Literal) -> Lbool {
    assignments[literal.variable()] ^ literal.is_negative()
}


#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;
    use crate::engine::NoDomains;

    #[test]
    fn constants_are_assigned_at_creation() {
        let sat = engine();

        assert!(sat.is_true(sat.true_literal()));
        assert!(sat.is_false(sat.false_literal()));
        assert!(sat.is_false(Literal::positive(BooleanVariable::new(1))));
        assert_eq!(2, sat.num_variables());
    }

    #[test]
    fn channel_values_increase_per_variable() {
        let mut sat = engine();
        let first = sat.new_var(3, ChannelInfo::int_var(4, crate::ValueKind::Bound, -1));

        let last = BooleanVariable::new(first.index() + 2);
        assert_eq!(1, sat.channel_info(last).value);
        assert_eq!(4, sat.channel_info(last).owner);
    }

    #[test]
    fn values_go_from_undefined_to_true_once() {
        let mut sat = engine();
        let x = literals(&mut sat, 1)[0];

        assert!(sat.value(x).is_undefined());
        decide(&mut sat, x);
        assert!(sat.is_true(x));
        assert!(sat.is_false(!x));
        assert_eq!(1, sat.level(x.variable()));
    }

    #[test]
    fn c_enqueue_on_a_false_literal_records_the_conflict() {
        let mut sat = engine();
        let x = literals(&mut sat, 1)[0];
        sat.enqueue(!x, Reason::Decision, &mut NoDomains);

        sat.c_enqueue(x, Reason::Literal(sat.false_literal()));

        assert_eq!(
            Some(Conflict::Propagation {
                literal: x,
                reason: Reason::Literal(sat.false_literal())
            }),
            sat.conflict()
        );
    }

    #[test]
    fn assignment_at_an_earlier_level() {
        let mut sat = engine();
        let [x, y] = literals(&mut sat, 2)[..] else {
            unreachable!()
        };

        decide(&mut sat, x);
        sat.new_decision_level();
        sat.a_enqueue(y, Reason::Literal(!x), 1);

        assert_eq!(1, sat.level(y.variable()));
        assert_eq!(&[x, y], sat.trail_at(1));
    }

    #[test]
    fn lazy_variables_are_not_reused() {
        let mut sat = engine();
        let info = ChannelInfo::propagator(0, 0);
        let variable = sat.get_lazy_var(info);

        sat.remove_lazy_var(variable);
        let next = sat.get_lazy_var(info);

        assert_ne!(variable, next);
    }

    #[test]
    fn reasons_are_compact_without_a_proof() {
        let mut sat = engine();
        let [x, y] = literals(&mut sat, 2)[..] else {
            unreachable!()
        };

        assert_eq!(Reason::Literal(x), sat.mk_reason(x));
        assert_eq!(Reason::Literals(x, y), sat.mk_reason2(x, y));
    }
}
