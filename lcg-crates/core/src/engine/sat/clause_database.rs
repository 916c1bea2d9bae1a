use log::debug;

use super::literal_value;
use super::Clause;
use super::ClauseReference;
use super::SatEngine;
use super::WatchElem;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Literal;
use crate::engine::DomainEngine;
use crate::engine::Reason;
use crate::lcg_assert_moderate;
use crate::lcg_assert_simple;

/// Activities are rescaled once one exceeds this value.
const CLAUSE_ACTIVITY_LIMIT: f32 = 1e20;

impl SatEngine {
    /// Add an input clause at the root.
    ///
    /// Satisfied clauses and tautologies are dropped and duplicate literals removed. A clause
    /// which leaves a single literal unassigned propagates it immediately.
    pub(crate) fn add_clause(
        &mut self,
        mut literals: Vec<Literal>,
        engine: &mut impl DomainEngine,
    ) -> Result<(), ConstraintOperationError> {
        lcg_assert_simple!(self.decision_level() == 0);

        if literals.iter().any(|&literal| self.is_true(literal)) {
            return Ok(());
        }

        literals.sort_unstable();
        literals.dedup();
        // The two literals of a variable have adjacent codes.
        if literals.windows(2).any(|pair| pair[0] == !pair[1]) {
            return Ok(());
        }

        if self.proof.is_active() {
            self.add_logged_clause(literals, engine)
        } else {
            literals.retain(|&literal| !self.is_false(literal));
            match literals.len() {
                0 => Err(ConstraintOperationError::InfeasibleClause),
                1 => {
                    self.enqueue(literals[0], Reason::Decision, engine);
                    Ok(())
                }
                _ => {
                    let origin = self.proof.active_item();
                    let _ = self.attach_clause(Clause::new(literals, false, origin), false);
                    Ok(())
                }
            }
        }
    }

    /// With a proof, every input clause keeps all its literals so that it can be introduced as
    /// given. The unassigned literals are moved to the front to be watched.
    fn add_logged_clause(
        &mut self,
        mut literals: Vec<Literal>,
        engine: &mut impl DomainEngine,
    ) -> Result<(), ConstraintOperationError> {
        let mut num_undefined = 0;
        for index in 0..literals.len() {
            if self.value(literals[index]).is_undefined() {
                literals.swap(num_undefined, index);
                num_undefined += 1;
            }
        }

        let mut clause = Clause::new(literals, false, self.proof.active_item());
        let id = self.proof.intro(&mut clause);

        match num_undefined {
            0 => {
                let mut antecedents = vec![id];
                for &literal in clause.literals() {
                    antecedents.push(self.unit(!literal, engine));
                }
                let _ = self.proof.empty(&antecedents);
                Err(ConstraintOperationError::InfeasibleClause)
            }
            1 => {
                let first = clause[0];
                let reference = self.clause_allocator.allocate(clause);
                self.root_units.push(reference);
                self.enqueue(first, Reason::Clause(reference), engine);
                Ok(())
            }
            _ => {
                let _ = self.attach_clause(clause, false);
                Ok(())
            }
        }
    }

    /// Watch a clause of at least two literals, on its first two literals or only on the second
    /// one with `one_watch`.
    ///
    /// Without a proof, binary clauses are stored only in the watch lists and no reference is
    /// returned.
    pub(crate) fn attach_clause(
        &mut self,
        clause: Clause,
        one_watch: bool,
    ) -> Option<ClauseReference> {
        lcg_assert_simple!(clause.len() > 1);
        lcg_assert_moderate!(!clause.is_temporary());

        if !clause.is_learnt() {
            match clause.len() {
                2 => self.statistics.num_binary_clauses += 1,
                3 => self.statistics.num_ternary_clauses += 1,
                _ => self.statistics.num_long_clauses += 1,
            }
        } else {
            for &literal in clause.literals() {
                self.usage[literal.variable()] += 1;
            }
        }

        let first = clause[0];
        let second = clause[1];

        if !self.proof.is_active() && clause.len() == 2 {
            if !one_watch {
                self.watches[!first].push(WatchElem::Binary { other: second });
            }
            self.watches[!second].push(WatchElem::Binary { other: first });
            return None;
        }

        let learnt = clause.is_learnt();
        let size = clause.len() as u64;
        let reference = self.clause_allocator.allocate(clause);

        if !one_watch {
            self.watches[!first].push(WatchElem::Clause(reference));
        }
        self.watches[!second].push(WatchElem::Clause(reference));

        if learnt {
            self.statistics.num_learnt_literals += size;
            self.learnts.push(reference);
        } else {
            self.statistics.num_clause_literals += size;
            self.clauses.push(reference);
        }

        Some(reference)
    }

    /// Detach and free a clause. The caller removes it from the clause lists.
    pub(crate) fn remove_clause(&mut self, reference: ClauseReference) {
        let clause = &mut self.clause_allocator[reference];
        lcg_assert_simple!(!clause.is_temporary());
        lcg_assert_simple!(clause.len() > 1);

        self.proof.del(clause);

        let clause = &self.clause_allocator[reference];
        let watch = WatchElem::Clause(reference);
        self.watches[!clause[0]].retain(|element| *element != watch);
        self.watches[!clause[1]].retain(|element| *element != watch);

        let size = clause.len() as u64;
        if clause.is_learnt() {
            self.statistics.num_learnt_literals -= size;
            for &literal in clause.literals() {
                self.usage[literal.variable()] -= 1;
            }
        } else {
            self.statistics.num_clause_literals -= size;
        }

        self.clause_allocator.free(reference);
    }

    /// Remove the learnt clauses which are satisfied at the root, and the false literals of the
    /// others.
    pub(crate) fn simplify_db(&mut self, engine: &mut impl DomainEngine) {
        lcg_assert_simple!(self.decision_level() == 0);

        let learnts = std::mem::take(&mut self.learnts);
        let mut kept = Vec::with_capacity(learnts.len());
        for reference in learnts {
            if self.simplify(reference, engine) {
                self.remove_clause(reference);
            } else {
                kept.push(reference);
            }
        }
        self.learnts = kept;

        self.next_simplify = self.statistics.num_propagations
            + self.statistics.num_clause_literals
            + self.statistics.num_learnt_literals;
    }

    /// Shrink a clause to the literals which are not false at the root. Returns whether the
    /// clause is satisfied instead.
    ///
    /// With a proof, the shrunk clause is derived from the original and the root units of the
    /// removed literals.
    pub(crate) fn simplify(
        &mut self,
        reference: ClauseReference,
        engine: &mut impl DomainEngine,
    ) -> bool {
        let assignments = &self.assignments;
        let clause = &mut self.clause_allocator[reference];

        if literal_value(assignments, clause[0]).is_true()
            || literal_value(assignments, clause[1]).is_true()
        {
            return true;
        }

        let mut removed = Vec::new();
        let mut size = 2;
        for index in 2..clause.len() {
            let literal = clause[index];
            match literal_value(assignments, literal).to_option() {
                Some(true) => return true,
                Some(false) => removed.push(literal),
                None => {
                    clause[size] = literal;
                    size += 1;
                }
            }
        }
        let old_size = clause.len() as u64;
        clause.shrink(size);
        if clause.is_learnt() {
            self.statistics.num_learnt_literals -= old_size - size as u64;
        } else {
            self.statistics.num_clause_literals -= old_size - size as u64;
        }

        if removed.is_empty() || !self.proof.is_active() {
            return false;
        }

        for literal in removed {
            let id = self.unit(!literal, engine);
            self.proof.push_antecedent(id);
        }

        let clause = &mut self.clause_allocator[reference];
        if let Some(original) = clause.ident {
            self.proof.push_antecedent(original);
        }
        self.proof.del(clause);
        let _ = self.proof.resolve(clause);

        false
    }

    /// Remove the less active half of the learnt clauses, except those which are the reason for
    /// a literal.
    pub(crate) fn reduce_db(&mut self) {
        let mut learnts = std::mem::take(&mut self.learnts);
        learnts.sort_by(|&a, &b| {
            self.clause_allocator[a]
                .activity()
                .total_cmp(&self.clause_allocator[b].activity())
        });

        let half = learnts.len() / 2;
        let mut kept = Vec::with_capacity(learnts.len() - half);
        let mut num_removed = 0;
        for (index, reference) in learnts.into_iter().enumerate() {
            if index < half && !self.is_locked(reference) {
                self.remove_clause(reference);
                num_removed += 1;
            } else {
                kept.push(reference);
            }
        }
        self.learnts = kept;

        debug!("Pruned {num_removed} learnt clauses");
    }

    /// Whether the clause is the reason of its first literal.
    fn is_locked(&self, reference: ClauseReference) -> bool {
        let first = self.clause_allocator[reference][0];
        self.reasons[first.variable()] == Reason::Clause(reference) && self.is_true(first)
    }

    pub(crate) fn bump_clause_activity(&mut self, reference: ClauseReference) {
        let clause = &mut self.clause_allocator[reference];
        clause.bump_activity(self.clause_increment);

        if clause.activity() > CLAUSE_ACTIVITY_LIMIT {
            for &learnt in &self.learnts {
                self.clause_allocator[learnt].divide_activity(CLAUSE_ACTIVITY_LIMIT);
            }
            self.clause_increment /= CLAUSE_ACTIVITY_LIMIT;
        }
    }

    pub(crate) fn decay_clause_activities(&mut self) {
        self.clause_increment /= self.options.clause_activity_decay;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use super::*;
    use crate::engine::NoDomains;
    use crate::proof::test_sinks::ProofBuffers;

    fn watched_clauses(sat: &SatEngine, literal: Literal) -> Vec<ClauseReference> {
        sat.watches[literal]
            .iter()
            .filter_map(|watch| match watch {
                WatchElem::Clause(reference) => Some(*reference),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn added_clause_is_found_through_its_watches() {
        let mut sat = engine();
        let [a, b, c] = literals(&mut sat, 3)[..] else {
            unreachable!()
        };

        sat.add_clause(vec![c, a, b, a], &mut NoDomains).unwrap();

        let reference = sat.clauses[0];
        assert_eq!(vec![reference], watched_clauses(&sat, !a));
        assert_eq!(vec![reference], watched_clauses(&sat, !b));

        let mut stored = sat.clause_allocator[reference].literals().to_vec();
        stored.sort();
        assert_eq!(vec![a, b, c], stored);
    }

    #[test]
    fn satisfied_and_false_literals_are_filtered_at_the_root() {
        let mut sat = engine();
        let [a, b, c] = literals(&mut sat, 3)[..] else {
            unreachable!()
        };
        sat.add_clause(vec![!a], &mut NoDomains).unwrap();

        sat.add_clause(vec![a, b], &mut NoDomains).unwrap();
        assert!(sat.is_true(b));

        sat.add_clause(vec![!a, c], &mut NoDomains).unwrap();
        assert!(sat.clauses.is_empty());
        assert!(sat.value(c).is_undefined());
    }

    #[test]
    fn binary_clauses_live_in_the_watch_lists() {
        let mut sat = engine();
        let [a, b] = literals(&mut sat, 2)[..] else {
            unreachable!()
        };

        sat.add_clause(vec![a, b], &mut NoDomains).unwrap();

        assert!(sat.clauses.is_empty());
        assert_eq!(vec![WatchElem::Binary { other: b }], sat.watches[!a]);
        assert_eq!(vec![WatchElem::Binary { other: a }], sat.watches[!b]);
        assert_eq!(1, sat.statistics.num_binary_clauses);
    }

    #[test]
    fn clause_of_false_literals_is_infeasible() {
        let mut sat = engine();
        let [a, b] = literals(&mut sat, 2)[..] else {
            unreachable!()
        };
        sat.add_clause(vec![!a], &mut NoDomains).unwrap();
        sat.add_clause(vec![!b], &mut NoDomains).unwrap();

        assert_eq!(
            Err(ConstraintOperationError::InfeasibleClause),
            sat.add_clause(vec![a, b], &mut NoDomains)
        );
    }

    #[test]
    fn removed_clause_leaves_no_watches() {
        let mut sat = engine();
        let [a, b, c] = literals(&mut sat, 3)[..] else {
            unreachable!()
        };
        sat.add_clause(vec![a, b, c], &mut NoDomains).unwrap();
        let reference = sat.clauses[0];

        sat.remove_clause(reference);

        assert!(watched_clauses(&sat, !a).is_empty());
        assert!(watched_clauses(&sat, !b).is_empty());
        assert_eq!(0, sat.statistics.num_clause_literals);
    }

    #[test]
    fn reduction_keeps_the_active_half() {
        let mut sat = engine();
        let vars = literals(&mut sat, 4);

        let references: Vec<_> = (0..4)
            .map(|index| {
                let clause = Clause::new(vec![vars[index], vars[(index + 1) % 4]], true, 0);
                sat.attach_clause(clause, false)
            })
            .collect();
        // Without a proof, binary clauses are not allocated.
        assert!(references.iter().all(Option::is_none));

        let references: Vec<_> = (0..4)
            .map(|index| {
                let literals = vec![vars[index], vars[(index + 1) % 4], vars[(index + 2) % 4]];
                sat.attach_clause(Clause::new(literals, true, 0), false)
                    .unwrap()
            })
            .collect();
        sat.bump_clause_activity(references[2]);
        sat.bump_clause_activity(references[3]);

        sat.reduce_db();

        assert_eq!(2, sat.learnts.len());
        assert!(sat.learnts.contains(&references[2]));
        assert!(sat.learnts.contains(&references[3]));
    }

    #[test]
    fn simplification_drops_root_false_literals_with_a_proof() {
        let buffers = ProofBuffers::default();
        let mut sat = engine_with_proof(buffers.proof_log());
        let [a, b, c, d] = literals(&mut sat, 4)[..] else {
            unreachable!()
        };
        sat.add_clause(vec![!c], &mut NoDomains).unwrap();

        let mut learnt = Clause::new(vec![a, b, c, d], true, 0);
        let _ = sat.proof.intro(&mut learnt);
        let reference = sat.attach_clause(learnt, false).unwrap();

        assert!(!sat.simplify(reference, &mut NoDomains));
        sat.proof.finalize().unwrap();

        assert_eq!(&[a, b, d], sat.clause_allocator[reference].literals());
        assert_eq!(
            "1 -5 0 0\n2 3 4 5 6 0 0\n3 3 4 6 0 1 2 0\nd 2\n",
            buffers.trace.contents()
        );
    }
}
