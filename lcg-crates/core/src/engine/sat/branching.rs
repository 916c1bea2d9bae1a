use rand::Rng;

use super::SatEngine;
use crate::basic_types::BooleanVariable;
use crate::basic_types::Literal;
use crate::lcg_assert_simple;
use crate::options::PolarityMode;

const VARIABLE_ACTIVITY_LIMIT: f64 = 1e100;

impl SatEngine {
    /// Whether every decidable variable is assigned. Assigned and undecidable variables are
    /// dropped from the order on the way.
    pub(crate) fn finished(&mut self) -> bool {
        while let Some(variable) = self.order_heap.peek_max() {
            if self.assignments[variable].is_undefined() && self.flags[variable].decidable() {
                return false;
            }
            let _ = self.order_heap.pop_max();
        }
        true
    }

    /// The next decision, on the unassigned decidable variable with the highest activity.
    /// Returns `None` if activity-based branching is disabled or all such variables are
    /// assigned.
    pub(crate) fn branch(&mut self) -> Option<Literal> {
        if !self.options.vsids || self.finished() {
            return None;
        }

        let variable = self.order_heap.pop_max()?;
        lcg_assert_simple!(self.assignments[variable].is_undefined());
        lcg_assert_simple!(self.flags[variable].decidable());

        let is_positive = match self.options.polarity {
            PolarityMode::Default => self.phase[variable],
            PolarityMode::Same => true,
            PolarityMode::Anti => false,
            PolarityMode::Random => self.random.gen_bool(0.5),
        };

        self.statistics.num_decisions += 1;
        Some(Literal::new(variable, is_positive))
    }

    /// The next decision on the unassigned decidable variable with the lowest index, for search
    /// without activities.
    pub(crate) fn input_order_decision(&mut self) -> Option<Literal> {
        let variable = (2..self.num_variables())
            .map(|index| BooleanVariable::new(index as u32))
            .find(|&variable| {
                self.assignments[variable].is_undefined() && self.flags[variable].decidable()
            })?;

        let is_positive = match self.options.polarity {
            PolarityMode::Default => self.phase[variable],
            PolarityMode::Same => true,
            PolarityMode::Anti => false,
            PolarityMode::Random => self.random.gen_bool(0.5),
        };

        self.statistics.num_decisions += 1;
        Some(Literal::new(variable, is_positive))
    }

    pub(crate) fn bump_variable_activity(&mut self, variable: BooleanVariable) {
        self.order_heap.increment(variable, self.variable_increment);

        if self.order_heap.get_value(variable) > VARIABLE_ACTIVITY_LIMIT {
            self.order_heap.divide_values(VARIABLE_ACTIVITY_LIMIT);
            self.variable_increment /= VARIABLE_ACTIVITY_LIMIT;
        }
    }

    pub(crate) fn decay_variable_activities(&mut self) {
        self.variable_increment /= self.options.variable_activity_decay;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use super::*;
    use crate::options::SatOptions;
    use crate::proof::ProofLog;

    #[test]
    fn most_active_variable_is_decided_first() {
        let mut sat = engine();
        let [_, b, _] = literals(&mut sat, 3)[..] else {
            unreachable!()
        };
        sat.bump_variable_activity(b.variable());

        assert_eq!(Some(!b), sat.branch());
    }

    #[test]
    fn undecidable_variables_are_never_chosen() {
        let mut sat = engine();
        let [a] = literals(&mut sat, 1)[..] else {
            unreachable!()
        };
        sat.set_decidable(a.variable(), false);

        assert!(sat.finished());
        assert_eq!(None, sat.branch());
    }

    #[test]
    fn same_polarity_decides_true() {
        let options = SatOptions {
            polarity: PolarityMode::Same,
            ..SatOptions::default()
        };
        let mut sat = SatEngine::new(options, ProofLog::default());
        let [a] = literals(&mut sat, 1)[..] else {
            unreachable!()
        };

        assert_eq!(Some(a), sat.branch());
    }

    #[test]
    fn branching_can_be_switched_off() {
        let options = SatOptions {
            vsids: false,
            ..SatOptions::default()
        };
        let mut sat = SatEngine::new(options, ProofLog::default());
        let _ = literals(&mut sat, 1);

        assert_eq!(None, sat.branch());
    }

    #[test]
    fn input_order_takes_the_first_unassigned_variable() {
        let options = SatOptions {
            vsids: false,
            polarity: PolarityMode::Same,
            ..SatOptions::default()
        };
        let mut sat = SatEngine::new(options, ProofLog::default());
        let [a, b] = literals(&mut sat, 2)[..] else {
            unreachable!()
        };
        decide(&mut sat, a);

        assert_eq!(Some(b), sat.input_order_decision());
    }
}
