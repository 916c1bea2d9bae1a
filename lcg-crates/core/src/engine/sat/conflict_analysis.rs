//! First-UIP conflict analysis.
//!
//! The conflict is resolved with the reasons of the literals on the current level, most recent
//! first, until a single literal of the current level remains. Literals which must not appear in
//! a learnt clause are replaced by their own reasons, and root literals are left out since they
//! hold in every branch.
use super::Clause;
use super::ClauseReference;
use super::Conflict;
use super::SatEngine;
use crate::basic_types::BooleanVariable;
use crate::basic_types::Literal;
use crate::engine::DomainEngine;
use crate::engine::Reason;
use crate::lcg_assert_moderate;
use crate::lcg_assert_simple;

/// A clause derived from a conflict, which asserts its first literal after backjumping.
#[derive(Debug)]
pub(crate) struct LearntClause {
    pub(crate) clause: Clause,
    /// The highest level among the literals except the first, `0` for a unit clause.
    pub(crate) backjump_level: usize,
}

/// Bookkeeping of a single analysis.
#[derive(Debug, Default)]
struct AnalysisState {
    learnt: Vec<Literal>,
    /// The number of literals of the current level which still have to be resolved.
    path: usize,
    /// False literals of the root level which were resolved away.
    roots: Vec<Literal>,
    /// False literals of earlier levels which cannot be learnt and are replaced by their reasons.
    expansions: Vec<Literal>,
    marked: Vec<BooleanVariable>,
}

impl SatEngine {
    /// Derive a learnt clause from the current conflict.
    ///
    /// If every literal of the conflict was assigned before the current level, the search first
    /// backtracks to the highest level among them. Returns `None` if that is the root; with a
    /// proof, the empty clause has been written in that case.
    pub(crate) fn analyse(&mut self, engine: &mut impl DomainEngine) -> Option<LearntClause> {
        self.statistics.num_conflicts += 1;

        let conflict = self.lower_conflict(engine)?;
        let level = self.decision_level();

        let mut state = AnalysisState {
            learnt: vec![Literal::from_u32(0)],
            ..AnalysisState::default()
        };

        let first = self.clause_allocator[conflict][0];
        let mut literals = self.record_reason(first, conflict);
        literals.push(first);
        self.mark_literals(&literals, level, &mut state, engine);

        let mut index = self.trail[level].len();
        let uip = loop {
            let literal = loop {
                index -= 1;
                let candidate = self.trail[level][index];
                if self.seen[candidate.variable()] {
                    break candidate;
                }
            };

            state.path -= 1;
            let variable = literal.variable();
            if state.path == 0
                && (self.flags[variable].uipable() || self.reasons[variable].is_decision())
            {
                break literal;
            }

            match self.explain(literal, engine) {
                Some(reason) => {
                    let antecedents = self.record_reason(literal, reason);
                    self.mark_literals(&antecedents, level, &mut state, engine);
                }
                None => {
                    lcg_assert_simple!(state.path == 0, "{literal} is a decision inside a path");
                    break literal;
                }
            }
        };
        state.learnt[0] = !uip;

        for root in std::mem::take(&mut state.roots) {
            let id = self.unit(!root, engine);
            self.proof.push_antecedent(id);
        }

        for variable in state.marked.drain(..) {
            self.seen[variable] = false;
        }

        let backjump_level = self.order_learnt_literals(&mut state.learnt);
        let mut clause = Clause::new(state.learnt, true, 0);
        let _ = self.proof.resolve(&mut clause);

        self.decay_variable_activities();
        self.decay_clause_activities();

        Some(LearntClause {
            clause,
            backjump_level,
        })
    }

    /// The conflict clause, after backtracking to the highest level among its literals. `None`
    /// if that level is the root.
    fn lower_conflict(&mut self, engine: &mut impl DomainEngine) -> Option<ClauseReference> {
        let conflict = self.conflict_clause(engine)?;

        let clause = &self.clause_allocator[conflict];
        let highest = clause
            .literals()
            .iter()
            .map(|literal| self.level(literal.variable()))
            .max()
            .unwrap_or(0);

        if highest == 0 {
            self.prove_root_conflict(engine);
            return None;
        }

        if highest == self.decision_level() {
            return Some(conflict);
        }

        let literals = clause.literals().to_vec();
        let origin = clause.origin;
        let is_temporary = clause.is_temporary();
        self.backtrack_to_level(highest, engine);

        let conflict = if is_temporary {
            self.allocate_temporary(Clause::explanation(literals, origin), highest)
        } else {
            conflict
        };
        self.conflict = Some(Conflict::Clause(conflict));
        Some(conflict)
    }

    /// Log the reason of `literal` as an antecedent and return its other literals.
    fn record_reason(&mut self, literal: Literal, reason: ClauseReference) -> Vec<Literal> {
        let clause = &mut self.clause_allocator[reason];
        let id = self.proof.infer(literal, clause);
        self.proof.push_antecedent(id);
        let is_learnt = clause.is_learnt();
        let antecedents = clause.literals()[1..].to_vec();

        if is_learnt {
            self.bump_clause_activity(reason);
        }
        antecedents
    }

    /// Mark the false literals of a clause taking part in the analysis.
    fn mark_literals(
        &mut self,
        literals: &[Literal],
        level: usize,
        state: &mut AnalysisState,
        engine: &mut impl DomainEngine,
    ) {
        for &literal in literals {
            self.mark_literal(literal, level, state);
        }

        while let Some(literal) = state.expansions.pop() {
            let Some(reason) = self.explain(!literal, engine) else {
                // A decision cannot be explained away and is kept.
                state.learnt.push(literal);
                continue;
            };
            for antecedent in self.record_reason(!literal, reason) {
                self.mark_literal(antecedent, level, state);
            }
        }
    }

    fn mark_literal(&mut self, literal: Literal, level: usize, state: &mut AnalysisState) {
        lcg_assert_moderate!(self.is_false(literal), "{literal} is not false");

        let variable = literal.variable();
        if self.seen[variable] {
            return;
        }
        self.seen[variable] = true;
        state.marked.push(variable);

        let literal_level = self.level(variable);
        if literal_level == 0 {
            state.roots.push(literal);
            return;
        }

        self.bump_variable_activity(variable);

        if literal_level == level {
            state.path += 1;
        } else if self.flags[variable].learnable() {
            state.learnt.push(literal);
        } else {
            state.expansions.push(literal);
        }
    }

    /// Move the literal of the highest level after the asserting one, and return that level.
    fn order_learnt_literals(&self, learnt: &mut [Literal]) -> usize {
        if learnt.len() == 1 {
            return 0;
        }

        let (position, level) = learnt
            .iter()
            .enumerate()
            .skip(1)
            .map(|(position, literal)| (position, self.level(literal.variable())))
            .max_by_key(|&(_, level)| level)
            .unwrap_or((1, 0));
        learnt.swap(1, position);
        level
    }

    /// Add a learnt clause after backjumping, and assign its asserting literal.
    pub(crate) fn learn(&mut self, learnt: LearntClause, engine: &mut impl DomainEngine) {
        lcg_assert_simple!(self.decision_level() == learnt.backjump_level);

        let asserting = learnt.clause[0];
        self.statistics.num_learnt_clauses += 1;

        if learnt.clause.len() == 1 {
            if self.proof.is_active() {
                let reference = self.clause_allocator.allocate(learnt.clause);
                self.root_units.push(reference);
                self.enqueue(asserting, Reason::Clause(reference), engine);
            } else {
                self.enqueue(asserting, Reason::Decision, engine);
            }
            return;
        }

        let second = learnt.clause[1];
        match self.attach_clause(learnt.clause, self.options.one_watch) {
            Some(reference) => {
                self.bump_clause_activity(reference);
                self.enqueue(asserting, Reason::Clause(reference), engine);
            }
            None => self.enqueue(asserting, Reason::Literal(second), engine),
        }
    }
}
