use super::literal_value;
use super::ClauseReference;
use super::Conflict;
use super::SatEngine;
use super::WatchElem;
use crate::basic_types::Lbool;
use crate::basic_types::Literal;
use crate::engine::DomainEngine;
use crate::engine::Reason;

/// What visiting a clause watch found.
enum ClauseWatchOutcome {
    /// The clause is now watched by another literal.
    Moved,
    /// The watch stays, the clause may have propagated.
    Kept,
    /// Every literal of the clause is false.
    Conflicting,
}

impl SatEngine {
    /// Propagate every literal on the current level which has not been visited yet.
    ///
    /// Returns `false` if a conflict was found. Propagation stops at the first conflict, but every
    /// watch list stays intact.
    pub(crate) fn propagate(&mut self, engine: &mut impl DomainEngine) -> bool {
        let level = self.decision_level();

        while self.conflict.is_none() && self.queue_heads[level] < self.trail[level].len() {
            let literal = self.trail[level][self.queue_heads[level]];
            self.queue_heads[level] += 1;
            self.statistics.num_propagations += 1;

            if self.watches[literal].is_empty() {
                continue;
            }

            if !self.visit_watches(literal, engine) {
                self.queue_heads[level] = self.trail[level].len();
            }
        }

        self.conflict.is_none()
    }

    /// Visit the watch list of the true literal `p`, compacting it along the way.
    fn visit_watches(&mut self, p: Literal, engine: &mut impl DomainEngine) -> bool {
        let mut watch_list = std::mem::take(&mut self.watches[p]);
        let mut kept = 0;
        let mut index = 0;

        while index < watch_list.len() {
            let watch = watch_list[index];
            index += 1;

            match watch {
                WatchElem::Binary { other } => {
                    watch_list[kept] = watch;
                    kept += 1;

                    match self.value(other) {
                        Lbool::Undefined => self.enqueue(other, Reason::Literal(!p), engine),
                        Lbool::False => {
                            if self.conflict.is_none() {
                                self.set_conflict(other, !p);
                            }
                        }
                        Lbool::True => {}
                    }
                }
                WatchElem::Wakeup {
                    propagator,
                    local_id,
                } => {
                    watch_list[kept] = watch;
                    kept += 1;
                    engine.wakeup(propagator, local_id);
                }
                WatchElem::Clause(reference) => {
                    match self.visit_clause(reference, !p, engine) {
                        ClauseWatchOutcome::Moved => {}
                        ClauseWatchOutcome::Kept => {
                            watch_list[kept] = watch;
                            kept += 1;
                        }
                        ClauseWatchOutcome::Conflicting => {
                            watch_list[kept] = watch;
                            kept += 1;
                            if self.conflict.is_none() {
                                self.conflict = Some(Conflict::Clause(reference));
                            }
                        }
                    }
                }
            }

            // Channelling inside `enqueue` may also have failed.
            if self.conflict.is_some() {
                break;
            }
        }

        // Entries after a conflict are kept as they are.
        let remaining = watch_list.len() - index;
        watch_list.copy_within(index.., kept);
        watch_list.truncate(kept + remaining);

        // Nothing should watch `p` while its list is detached, but keep such entries if it happens.
        let added = std::mem::replace(&mut self.watches[p], watch_list);
        self.watches[p].extend(added);

        self.conflict.is_none()
    }

    /// Visit a clause in which `false_literal` just became false.
    fn visit_clause(
        &mut self,
        reference: ClauseReference,
        false_literal: Literal,
        engine: &mut impl DomainEngine,
    ) -> ClauseWatchOutcome {
        let assignments = &self.assignments;
        let clause = &mut self.clause_allocator[reference];

        if literal_value(assignments, clause[0]).is_true()
            || literal_value(assignments, clause[1]).is_true()
        {
            return ClauseWatchOutcome::Kept;
        }

        if clause[0] == false_literal {
            clause.swap(0, 1);
        }

        let replacement = (2..clause.len())
            .find(|&position| !literal_value(assignments, clause[position]).is_false());
        if let Some(position) = replacement {
            clause.swap(1, position);
            let new_watch = clause[1];
            self.watches[!new_watch].push(WatchElem::Clause(reference));
            return ClauseWatchOutcome::Moved;
        }

        let first = clause[0];
        if literal_value(assignments, first).is_false() {
            ClauseWatchOutcome::Conflicting
        } else {
            self.enqueue(first, Reason::Clause(reference), engine);
            ClauseWatchOutcome::Kept
        }
    }
}
