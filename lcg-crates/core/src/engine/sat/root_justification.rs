//! Proofs of the literals which hold at the root.
//!
//! A root literal may be propagated by a long chain of reasons. Before it is used as an
//! antecedent, the chain is resolved into a single unit clause which then becomes the reason of
//! the literal, so that every later use refers to that one clause.
use lcg_trace::steps::ClauseId;

use super::Clause;
use super::ClauseReference;
use super::SatEngine;
use crate::basic_types::Literal;
use crate::engine::DomainEngine;
use crate::engine::Reason;
use crate::lcg_assert_simple;
use crate::proof::DUMMY_CLAUSE_ID;

impl SatEngine {
    /// The identifier of a unit clause `(literal)`, deriving it first if necessary. `literal`
    /// must be true at the root.
    pub(crate) fn unit(&mut self, literal: Literal, engine: &mut impl DomainEngine) -> ClauseId {
        if !self.proof.is_active() {
            return DUMMY_CLAUSE_ID;
        }

        let variable = literal.variable();
        lcg_assert_simple!(self.is_true(literal), "{literal} is not true");
        lcg_assert_simple!(self.level(variable) == 0, "{literal} is not a root literal");

        let is_new = self.units_in_progress.insert(variable);
        lcg_assert_simple!(is_new, "the root justification of {literal} depends on itself");

        let id = match self.reasons[variable] {
            Reason::Decision => self.root_axiom(literal, 0),
            Reason::Default { origin } => self.root_axiom(literal, origin),
            _ => match self.explain(literal, engine) {
                Some(reference) => self.resolve_root_reason(literal, reference, engine),
                None => unreachable!("only decisions have no explanation"),
            },
        };

        let _ = self.units_in_progress.remove(&variable);
        id
    }

    /// Introduce `(literal)` as a fact of the proof item `origin`.
    fn root_axiom(&mut self, literal: Literal, origin: u32) -> ClauseId {
        let mut clause = Clause::new(vec![literal], false, origin);
        let id = self.proof.infer(literal, &mut clause);
        self.adopt_root_unit(clause);
        id
    }

    fn resolve_root_reason(
        &mut self,
        literal: Literal,
        reference: ClauseReference,
        engine: &mut impl DomainEngine,
    ) -> ClauseId {
        let clause = &mut self.clause_allocator[reference];
        if clause.len() == 1 && !clause.is_temporary() {
            return self.proof.infer(literal, clause);
        }

        // The reason may be a scratch clause, which the recursion below overwrites.
        let others = clause.literals()[1..].to_vec();
        let mut antecedents = vec![self.proof.infer(literal, clause)];
        for other in others {
            antecedents.push(self.unit(!other, engine));
        }

        let mut unit_clause = Clause::new(vec![literal], false, 0);
        let id = self.proof.log_resolve(&mut unit_clause, &mut antecedents);
        self.adopt_root_unit(unit_clause);
        id
    }

    /// Make the unit clause the reason of its literal for the rest of the search.
    fn adopt_root_unit(&mut self, clause: Clause) {
        let variable = clause[0].variable();
        let reference = self.clause_allocator.allocate(clause);
        self.root_units.push(reference);
        self.reasons[variable] = Reason::Clause(reference);
    }

    /// Forget the positions of the literals assigned at the root and free the clauses which
    /// explain them. With a proof, every root literal is justified by a unit clause first.
    ///
    /// Learnt clauses are simplified from time to time.
    pub(crate) fn top_level_clean_up(&mut self, engine: &mut impl DomainEngine) {
        lcg_assert_simple!(self.decision_level() == 0);
        lcg_assert_simple!(self.conflict.is_none());

        let literals = std::mem::take(&mut self.trail[0]);

        for &literal in &literals {
            let variable = literal.variable();
            if self.is_constant(variable) {
                continue;
            }

            if self.proof.is_active() {
                let _ = self.unit(literal, engine);
            } else {
                self.reasons[variable] = Reason::Decision;
            }
        }

        for reference in std::mem::take(&mut self.reason_trail[0]) {
            self.proof.del(&mut self.clause_allocator[reference]);
            self.clause_allocator.free(reference);
        }

        for &literal in &literals {
            self.trail_positions[literal.variable()] = None;
        }

        if self.options.sat_simplify && self.statistics.num_propagations >= self.next_simplify {
            self.simplify_db(engine);
        }

        self.queue_heads[0] = 0;
    }

    /// Write the empty clause when the conflict holds at the root.
    pub(crate) fn prove_root_conflict(&mut self, engine: &mut impl DomainEngine) {
        if !self.proof.is_active() {
            return;
        }

        let Some(reference) = self.conflict_clause(engine) else {
            return;
        };

        let clause = &mut self.clause_allocator[reference];
        let literals = clause.literals().to_vec();
        let mut antecedents = vec![self.proof.infer(literals[0], clause)];
        for literal in literals {
            antecedents.push(self.unit(!literal, engine));
        }

        let _ = self.proof.empty(&antecedents);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use super::*;
    use crate::engine::NoDomains;
    use crate::proof::test_sinks::ProofBuffers;

    #[test]
    fn implication_chain_is_proven_unit_by_unit() {
        let buffers = ProofBuffers::default();
        let mut sat = engine_with_proof(buffers.proof_log());
        let [x, y, z] = literals(&mut sat, 3)[..] else {
            unreachable!()
        };

        sat.add_clause(vec![!x, y], &mut NoDomains).unwrap();
        sat.add_clause(vec![!y, z], &mut NoDomains).unwrap();
        sat.add_clause(vec![x], &mut NoDomains).unwrap();
        assert!(sat.propagate(&mut NoDomains));
        assert!(sat.is_true(y));
        assert!(sat.is_true(z));

        sat.top_level_clean_up(&mut NoDomains);
        sat.finalize_proof().unwrap();

        assert_eq!(
            "1 -3 4 0 0\n2 -4 5 0 0\n3 3 0 0\n4 4 0 1 3 0\n5 5 0 2 4 0\n",
            buffers.trace.contents()
        );
    }

    #[test]
    fn justified_root_literal_reuses_its_unit() {
        let buffers = ProofBuffers::default();
        let mut sat = engine_with_proof(buffers.proof_log());
        let [x, y] = literals(&mut sat, 2)[..] else {
            unreachable!()
        };
        sat.add_clause(vec![!x, y], &mut NoDomains).unwrap();
        sat.add_clause(vec![x], &mut NoDomains).unwrap();
        assert!(sat.propagate(&mut NoDomains));

        let first = sat.unit(y, &mut NoDomains);
        let second = sat.unit(y, &mut NoDomains);

        assert_eq!(first, second);
    }

    #[test]
    fn root_conflict_ends_in_the_empty_clause() {
        let buffers = ProofBuffers::default();
        let mut sat = engine_with_proof(buffers.proof_log());
        let [x, y] = literals(&mut sat, 2)[..] else {
            unreachable!()
        };
        sat.add_clause(vec![!x, y], &mut NoDomains).unwrap();
        sat.add_clause(vec![!x, !y], &mut NoDomains).unwrap();
        sat.add_clause(vec![x], &mut NoDomains).unwrap();

        assert!(!sat.propagate(&mut NoDomains));
        sat.prove_root_conflict(&mut NoDomains);
        sat.finalize_proof().unwrap();

        assert_eq!(
            "1 -3 4 0 0\n2 -3 -4 0 0\n3 3 0 0\n4 4 0 1 3 0\n5 0 2 4 3 0\n",
            buffers.trace.contents()
        );
    }

    #[test]
    fn without_a_proof_root_reasons_are_dropped() {
        let mut sat = engine();
        let [x, y] = literals(&mut sat, 2)[..] else {
            unreachable!()
        };
        sat.add_clause(vec![!x, y], &mut NoDomains).unwrap();
        sat.add_clause(vec![x], &mut NoDomains).unwrap();
        assert!(sat.propagate(&mut NoDomains));

        sat.top_level_clean_up(&mut NoDomains);

        assert_eq!(Reason::Decision, sat.reason(y.variable()));
        assert!(sat.trail_at(0).is_empty());
        assert!(sat.is_true(y));
    }
}
