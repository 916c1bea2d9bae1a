use super::SatEngine;
use crate::basic_types::Lbool;
use crate::basic_types::Literal;
use crate::engine::DomainEngine;
use crate::lcg_assert_simple;
use crate::options::PhaseSaving;

impl SatEngine {
    /// Undo every level above `level`, and the clauses which explain literals on those levels.
    /// The domain engine follows to the same level.
    pub(crate) fn backtrack_to_level(&mut self, level: usize, engine: &mut impl DomainEngine) {
        let top = self.decision_level();
        if top <= level {
            return;
        }

        for current in (level + 1..=top).rev() {
            let save_phase = match self.options.phase_saving {
                PhaseSaving::None => false,
                PhaseSaving::Recent => current == top,
                PhaseSaving::Always => true,
            };

            let literals = std::mem::take(&mut self.trail[current]);
            self.untrail(&literals, save_phase);

            for reference in std::mem::take(&mut self.reason_trail[current]) {
                self.proof.del(&mut self.clause_allocator[reference]);
                self.clause_allocator.free(reference);
            }
        }

        self.trail.truncate(level + 1);
        self.queue_heads.truncate(level + 1);
        self.reason_trail.truncate(level + 1);
        self.conflict = None;

        engine.backtrack_to_level(level);
    }

    /// Undo the current level down to its first `sat_position` literals, and the domain trail
    /// down to `domain_position`.
    pub(crate) fn backtrack_to_position(
        &mut self,
        sat_position: usize,
        domain_position: usize,
        engine: &mut impl DomainEngine,
    ) {
        let level = self.decision_level();
        lcg_assert_simple!(sat_position <= self.trail[level].len());

        let literals = self.trail[level].split_off(sat_position);
        let save_phase = self.options.phase_saving != PhaseSaving::None;
        self.untrail(&literals, save_phase);
        self.queue_heads[level] = self.queue_heads[level].min(sat_position);
        self.conflict = None;

        engine.backtrack_to_position(domain_position);
    }

    /// The length of the current level of the trail, for [`SatEngine::backtrack_to_position`].
    pub(crate) fn trail_length(&self) -> usize {
        self.trail[self.decision_level()].len()
    }

    fn untrail(&mut self, literals: &[Literal], save_phase: bool) {
        for &literal in literals.iter().rev() {
            let variable = literal.variable();
            self.assignments[variable] = Lbool::Undefined;
            self.trail_positions[variable] = None;

            if save_phase {
                self.phase[variable] = literal.is_positive();
            }
            if self.flags[variable].decidable() {
                self.order_heap.restore_key(variable);
            }
        }
    }
}
