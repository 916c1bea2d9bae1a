use super::Clause;
use super::ClauseReference;
use super::Conflict;
use super::SatEngine;
use crate::basic_types::Literal;
use crate::engine::DomainEngine;
use crate::engine::Reason;
use crate::lcg_assert_moderate;

impl SatEngine {
    /// The clause which propagated `literal`, with `literal` at position 0 and every other
    /// literal false. Decisions have no such clause.
    ///
    /// Compact reasons are written into a scratch clause which the next call overwrites.
    /// Lazy reasons are asked from the propagator once; the clause is kept until the level of
    /// `literal` is undone.
    pub(crate) fn explain(
        &mut self,
        literal: Literal,
        engine: &mut impl DomainEngine,
    ) -> Option<ClauseReference> {
        let variable = literal.variable();

        match self.reasons[variable] {
            Reason::Decision | Reason::Default { .. } => None,
            Reason::Clause(reference) => {
                let clause = &mut self.clause_allocator[reference];
                if clause.is_temporary() {
                    clause[0] = literal;
                }
                lcg_assert_moderate!(clause[0] == literal);
                Some(reference)
            }
            Reason::Literal(p) => Some(self.short_explanation(&[literal, p])),
            Reason::Literals(p, q) => Some(self.short_explanation(&[literal, p, q])),
            Reason::Lazy {
                propagator,
                inference,
            } => {
                let antecedents = engine.explain(self, literal, propagator, inference);
                lcg_assert_moderate!(
                    antecedents.iter().all(|&antecedent| self.is_true(antecedent)),
                    "the explanation of {literal} contains unassigned literals"
                );

                let literals = std::iter::once(literal)
                    .chain(antecedents.into_iter().map(|antecedent| !antecedent))
                    .collect();
                let origin = engine.propagator_origin(propagator);
                let level = self.level(variable);
                let reference = self.allocate_temporary(Clause::explanation(literals, origin), level);

                self.reasons[variable] = Reason::Clause(reference);
                Some(reference)
            }
        }
    }

    fn short_explanation(&mut self, literals: &[Literal]) -> ClauseReference {
        let clause = &mut self.clause_allocator[self.short_explanation];
        clause.resize(literals.len());
        for (index, &literal) in literals.iter().enumerate() {
            clause[index] = literal;
        }
        clause.origin = 0;
        self.short_explanation
    }

    /// The conflict as a clause of false literals. A conflict found while assigning a literal is
    /// turned into a clause on the current reason trail.
    pub(crate) fn conflict_clause(
        &mut self,
        engine: &mut impl DomainEngine,
    ) -> Option<ClauseReference> {
        let (literal, reason) = match self.conflict? {
            Conflict::Clause(reference) => return Some(reference),
            Conflict::Propagation { literal, reason } => (literal, reason),
        };

        let mut literals = vec![literal];
        let origin = match reason {
            Reason::Decision => self.proof.active_item(),
            Reason::Default { origin } => origin,
            Reason::Clause(reference) => {
                let clause = &self.clause_allocator[reference];
                literals.extend_from_slice(&clause.literals()[1..]);
                clause.origin
            }
            Reason::Literal(p) => {
                literals.push(p);
                self.proof.active_item()
            }
            Reason::Literals(p, q) => {
                literals.extend([p, q]);
                self.proof.active_item()
            }
            Reason::Lazy {
                propagator,
                inference,
            } => {
                let antecedents = engine.explain(self, literal, propagator, inference);
                literals.extend(antecedents.into_iter().map(|antecedent| !antecedent));
                engine.propagator_origin(propagator)
            }
        };

        let level = self.decision_level();
        let reference = self.allocate_temporary(Clause::explanation(literals, origin), level);
        self.conflict = Some(Conflict::Clause(reference));
        Some(reference)
    }
}
