use enumset::EnumSet;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Literal;
use crate::engine::propagation::ExplanationContext;
use crate::engine::propagation::InitialisationContext;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::Priority;
use crate::engine::propagation::Propagator;
use crate::engine::variables::DomainEvent;
use crate::engine::variables::IntVarId;
use crate::engine::variables::LiteralType;

const LOWER_BOUND_OF_Y: u32 = 0;
const UPPER_BOUND_OF_X: u32 = 1;

/// Propagator for the constraint `x <= y + c`.
#[derive(Clone, Debug)]
pub struct LessOrEqualPropagator {
    x: IntVarId,
    y: IntVarId,
    c: i64,
}

impl LessOrEqualPropagator {
    pub fn new(x: IntVarId, y: IntVarId, c: i32) -> Self {
        LessOrEqualPropagator {
            x,
            y,
            c: i64::from(c),
        }
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Propagator for LessOrEqualPropagator {
    fn name(&self) -> &str {
        "LessOrEqual"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn initialise(
        &mut self,
        context: &mut InitialisationContext<'_>,
    ) -> Result<(), ConstraintOperationError> {
        context.register(
            self.x,
            EnumSet::only(DomainEvent::LowerBound),
            LocalId::from(0),
        );
        context.register(
            self.y,
            EnumSet::only(DomainEvent::UpperBound),
            LocalId::from(1),
        );
        Ok(())
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_>) -> bool {
        let lower_bound_y = saturate(i64::from(context.lower_bound(self.x)) - self.c);
        if lower_bound_y > context.lower_bound(self.y)
            && !context.set_lower_bound(self.y, lower_bound_y, LOWER_BOUND_OF_Y)
        {
            return false;
        }

        let upper_bound_x = saturate(i64::from(context.upper_bound(self.y)) + self.c);
        if upper_bound_x < context.upper_bound(self.x)
            && !context.set_upper_bound(self.x, upper_bound_x, UPPER_BOUND_OF_X)
        {
            return false;
        }

        true
    }

    fn explain(
        &self,
        literal: Literal,
        inference: u32,
        context: &ExplanationContext<'_>,
    ) -> Vec<Literal> {
        // [y >= k] follows from [x >= k + c], [x <= k] from [y <= k - c].
        match (inference, context.atom(literal)) {
            (LOWER_BOUND_OF_Y, Some((_, LiteralType::Ge, k))) => {
                vec![context.literal(self.x, i64::from(k) + self.c, LiteralType::Ge)]
            }
            (UPPER_BOUND_OF_X, Some((_, LiteralType::Le, k))) => {
                vec![context.literal(self.y, i64::from(k) - self.c, LiteralType::Le)]
            }
            // The bound left the literals of the variable, the current bound is the cause.
            (LOWER_BOUND_OF_Y, _) => {
                let bound = context.lower_bound(self.x);
                vec![context.literal(self.x, i64::from(bound), LiteralType::Ge)]
            }
            _ => {
                let bound = context.upper_bound(self.y);
                vec![context.literal(self.y, i64::from(bound), LiteralType::Le)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::ConstraintOperationError;
    use crate::options::LearningOptions;
    use crate::options::SolverOptions;
    use crate::SatisfactionResult;
    use crate::Solver;

    #[test]
    fn bounds_are_tightened_at_the_root() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(3, 10).unwrap();
        let y = solver.new_bounded_integer(0, 6).unwrap();

        let _ = solver
            .add_propagator(LessOrEqualPropagator::new(x, y, 1))
            .unwrap();

        assert_eq!(2, solver.lower_bound(y));
        assert_eq!(7, solver.upper_bound(x));
    }

    #[test]
    fn propagation_follows_later_clauses() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 10).unwrap();
        let y = solver.new_bounded_integer(0, 10).unwrap();
        let _ = solver
            .add_propagator(LessOrEqualPropagator::new(x, y, 0))
            .unwrap();

        let x_at_least_four = solver.integer_literal(x, LiteralType::Ge, 4);
        let y_at_most_eight = solver.integer_literal(y, LiteralType::Le, 8);
        solver.add_clause([x_at_least_four]).unwrap();
        solver.add_clause([y_at_most_eight]).unwrap();

        assert_eq!(4, solver.lower_bound(y));
        assert_eq!(8, solver.upper_bound(x));
    }

    #[test]
    fn disjoint_ranges_are_infeasible() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(5, 8).unwrap();
        let y = solver.new_bounded_integer(0, 3).unwrap();

        assert_eq!(
            Err(ConstraintOperationError::InfeasiblePropagator),
            solver.add_propagator(LessOrEqualPropagator::new(x, y, 0))
        );
        assert!(solver.is_infeasible());
    }

    #[test]
    fn a_cycle_with_a_negative_offset_is_refuted_by_search() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 20).unwrap();
        let y = solver.new_bounded_integer(0, 20).unwrap();
        let z = solver.new_bounded_integer(0, 20).unwrap();

        // x < y < z < x
        for (a, b) in [(x, y), (y, z), (z, x)] {
            let _ = solver.add_propagator(LessOrEqualPropagator::new(a, b, -1));
        }

        assert!(!solver.solve().is_satisfiable());
    }

    #[test]
    fn solutions_satisfy_a_chain() {
        for learn in [true, false] {
            let options = SolverOptions {
                learning: LearningOptions {
                    learn,
                    ..LearningOptions::default()
                },
                ..SolverOptions::default()
            };
            let mut solver = Solver::new(options);
            let variables = (0..4)
                .map(|_| solver.new_bounded_integer(0, 5).unwrap())
                .collect::<Vec<_>>();
            for pair in variables.windows(2) {
                let _ = solver
                    .add_propagator(LessOrEqualPropagator::new(pair[0], pair[1], -1))
                    .unwrap();
            }

            // Either the first variable is at least 2 or the last is at most 3.
            let first_high = solver.integer_literal(variables[0], LiteralType::Ge, 2);
            let last_low = solver.integer_literal(variables[3], LiteralType::Le, 3);
            solver.add_clause([first_high, last_low]).unwrap();

            let SatisfactionResult::Satisfiable(solution) = solver.solve() else {
                panic!("0, 1, 2, 3 is a solution");
            };
            for pair in variables.windows(2) {
                assert!(solution.integer_value(pair[0]) < solution.integer_value(pair[1]));
            }
            assert!(
                solution.integer_value(variables[0]) >= 2
                    || solution.integer_value(variables[3]) <= 3
            );
        }
    }

    #[test]
    fn explanations_name_the_bound_of_the_other_variable() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 10).unwrap();
        let y = solver.new_bounded_integer(0, 10).unwrap();
        let propagator = LessOrEqualPropagator::new(x, y, 2);

        let y_at_least_three = solver.integer_literal(y, LiteralType::Ge, 3);
        let x_at_least_five = solver.integer_literal(x, LiteralType::Ge, 5);
        let x_at_most_four = solver.integer_literal(x, LiteralType::Le, 4);
        let y_at_most_two = solver.integer_literal(y, LiteralType::Le, 2);

        solver.with_explanation_context(|context| {
            assert_eq!(
                vec![x_at_least_five],
                propagator.explain(y_at_least_three, LOWER_BOUND_OF_Y, context)
            );
            assert_eq!(
                vec![y_at_most_two],
                propagator.explain(x_at_most_four, UPPER_BOUND_OF_X, context)
            );
        });
    }
}
