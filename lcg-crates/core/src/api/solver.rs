use log::debug;
use log::info;
use log::warn;

use super::outputs::SatisfactionResult;
use super::outputs::Solution;
use crate::basic_types::BooleanVariable;
use crate::basic_types::ChannelInfo;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Literal;
use crate::containers::KeyedVec;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorId;
use crate::engine::propagation::PropagatorStore;
use crate::engine::sat::SatEngine;
use crate::engine::sat::SatStatistics;
use crate::engine::variables::Domains;
use crate::engine::variables::IntVarId;
use crate::engine::variables::LiteralType;
use crate::engine::EngineContext;
use crate::engine::MipHook;
use crate::engine::Reason;
use crate::lcg_assert_simple;
use crate::options::LearningOptions;
use crate::options::SatOptions;
use crate::options::SolverOptions;
use crate::proof::ProofError;
use crate::proof::ProofLog;
use crate::statistics::log_statistic;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::Relation;

/// The factor by which the conflict limit grows after every restart.
const RESTART_GROWTH: f64 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SolverState {
    Ready,
    /// The root is inconsistent; every further call reports it.
    Infeasible,
}

/// A lazy clause generation solver over Boolean and integer variables.
///
/// Variables, clauses and propagators are added at the root; [`Solver::solve`] then searches
/// for an assignment which satisfies all of them. All state lives in the solver, so independent
/// instances can be used side by side.
///
/// # Example
/// ```rust
/// # use lcg_core::LiteralType;
/// # use lcg_core::Solver;
/// # use lcg_core::SatisfactionResult;
/// let mut solver = Solver::default();
/// let x = solver.new_bounded_integer(0, 5).unwrap();
/// let at_least_three = solver.integer_literal(x, LiteralType::Ge, 3);
/// let at_most_three = solver.integer_literal(x, LiteralType::Le, 3);
/// solver.add_clause([at_least_three]).unwrap();
/// solver.add_clause([at_most_three]).unwrap();
///
/// let SatisfactionResult::Satisfiable(solution) = solver.solve() else {
///     panic!("x = 3 is a solution");
/// };
/// assert_eq!(3, solution.integer_value(x));
/// ```
#[derive(Debug)]
pub struct Solver {
    sat: SatEngine,
    domains: Domains,
    propagators: PropagatorStore,
    mip: Option<Box<dyn MipHook>>,
    learning: LearningOptions,
    restart_base: u64,
    sat_var_limit: usize,
    state: SolverState,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new(SolverOptions::default())
    }
}

impl Solver {
    /// Learning is switched off without lazy explanations. A proof needs learnt clauses to
    /// justify backtracking, so without learning the proof log is closed and not written.
    pub fn new(options: SolverOptions) -> Solver {
        let mut sat_options = SatOptions::from(&options);
        if sat_options.learn && !sat_options.lazy {
            warn!("clause learning needs lazy explanations and is switched off");
            sat_options.learn = false;
        }

        let mut proof_log = options.proof_log;
        if proof_log.is_active() && !sat_options.learn {
            warn!("the proof cannot be justified without clause learning and is not written");
            proof_log = ProofLog::default();
        }

        let mut learning = options.learning;
        learning.learn = sat_options.learn;

        Solver {
            sat: SatEngine::new(sat_options, proof_log),
            domains: Domains::new(options.eager_limit),
            propagators: PropagatorStore::default(),
            mip: None,
            learning,
            restart_base: options.restart_base,
            sat_var_limit: options.sat_var_limit,
            state: SolverState::Ready,
        }
    }

    /// Notify `hook` of every backtrack.
    pub fn set_mip_hook(&mut self, hook: Box<dyn MipHook>) {
        self.mip = Some(hook);
    }

    fn split(&mut self) -> (&mut SatEngine, EngineContext<'_>) {
        (
            &mut self.sat,
            EngineContext {
                domains: &mut self.domains,
                propagators: &mut self.propagators,
                mip: self.mip.as_mut(),
            },
        )
    }

    pub fn is_infeasible(&self) -> bool {
        self.state == SolverState::Infeasible
    }

    pub fn statistics(&self) -> SatStatistics {
        self.sat.statistics
    }

    pub fn num_integers(&self) -> usize {
        self.domains.num_variables()
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.num_propagators()
    }

    /// Print the counters of the solver, if statistic logging is configured.
    pub fn log_statistics(&self) {
        if !should_log_statistics() {
            return;
        }

        self.sat.statistics.log(StatisticLogger::new(["sat"]));
        log_statistic("numBooleanVariables", self.sat.num_variables());
        log_statistic("numIntegerVariables", self.domains.num_variables());
        log_statistic("numPropagators", self.propagators.num_propagators());
        log_statistic_postfix();
    }
}

// Building the model.
impl Solver {
    pub fn new_literal(&mut self) -> Literal {
        self.restore_root();
        Literal::positive(self.sat.new_var(1, ChannelInfo::unchanneled()))
    }

    /// A literal which is named in the proof and in the solution file.
    pub fn new_named_literal(&mut self, name: impl Into<String>) -> Literal {
        let literal = self.new_literal();
        self.sat.proof.bind_bvar(literal, name);
        literal
    }

    /// An integer variable with the domain `[lower_bound, upper_bound]`.
    pub fn new_bounded_integer(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Result<IntVarId, ConstraintOperationError> {
        self.restore_root();
        self.domains
            .new_int_var(&mut self.sat, lower_bound, upper_bound)
    }

    pub fn new_named_bounded_integer(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: impl Into<String>,
    ) -> Result<IntVarId, ConstraintOperationError> {
        let variable = self.new_bounded_integer(lower_bound, upper_bound)?;
        self.sat.proof.bind_ivar(variable, name);
        Ok(variable)
    }

    /// An integer variable whose domain is exactly `values`.
    pub fn new_sparse_integer(&mut self, values: &[i32]) -> Result<IntVarId, ConstraintOperationError> {
        self.restore_root();
        self.domains.new_sparse_int_var(&mut self.sat, values)
    }

    pub fn new_named_sparse_integer(
        &mut self,
        values: &[i32],
        name: impl Into<String>,
    ) -> Result<IntVarId, ConstraintOperationError> {
        let variable = self.new_sparse_integer(values)?;
        self.sat.proof.bind_ivar(variable, name);
        Ok(variable)
    }

    /// The lower bound of `variable` in the current assignment; at the root outside of
    /// [`Solver::solve`].
    pub fn lower_bound(&self, variable: IntVarId) -> i32 {
        self.domains.lower_bound(variable)
    }

    pub fn upper_bound(&self, variable: IntVarId) -> i32 {
        self.domains.upper_bound(variable)
    }

    pub fn contains(&self, variable: IntVarId, value: i32) -> bool {
        self.domains.contains(variable, value)
    }

    /// The channel literal `[variable <kind> value]`. Outside the range of the variable this is
    /// the literal which is constantly true or false.
    ///
    /// The literals of a variable wider than [`SolverOptions::eager_limit`] are created by the
    /// first call, over the domain the variable has at the root at that point.
    pub fn integer_literal(&mut self, variable: IntVarId, kind: LiteralType, value: i32) -> Literal {
        self.materialize(variable);
        self.domains
            .literal(&self.sat, variable, i64::from(value), kind)
    }

    /// A literal which implies the disjunction of `head`, a set of channel literals of
    /// `variable`.
    pub fn create_set_literal(&mut self, variable: IntVarId, head: Vec<Literal>) -> Literal {
        self.restore_root();
        self.domains.create_set_lit(&mut self.sat, variable, head)
    }

    /// Make sure the literals of `variable` exist. Creating them goes back to the root.
    fn materialize(&mut self, variable: IntVarId) {
        if self.domains.is_pending(variable) {
            self.restore_root();
            self.domains.materialize(&mut self.sat, variable);
        }
    }

    /// Give back a literal from [`Solver::create_set_literal`] which is no longer used.
    pub fn free_set_literal(&mut self, literal: Literal) {
        self.domains.free_lazy_var(&mut self.sat, literal);
    }

    /// Whether search may branch on the value and bound literals of `variable`.
    pub fn set_decidable(&mut self, variable: IntVarId, values: bool, bounds: bool) {
        self.materialize(variable);
        self.domains
            .set_decidable(&mut self.sat, variable, values, bounds);
    }

    /// Allow the channel literals of `variable` in learnt clauses.
    pub fn set_learnable(&mut self, variable: IntVarId) {
        self.materialize(variable);
        self.domains.set_learnable(&mut self.sat, variable);
    }

    /// Record in the proof that `literal` means `[variable relation value]`. The variable must
    /// be named.
    pub fn bind_literal_to_atom(
        &mut self,
        literal: Literal,
        variable: IntVarId,
        relation: Relation,
        value: i32,
    ) {
        self.sat.proof.bind_atom(literal, variable, relation, value);
    }

    /// Record in the proof that `literal` has the constant truth value `value`.
    pub fn bind_literal_to_constant(&mut self, literal: Literal, value: bool) {
        self.sat.proof.bind_bool(literal, value);
    }

    /// Attribute the clauses created from now on to the input item `item` in the proof.
    pub fn set_proof_item(&mut self, item: u32) {
        self.sat.proof.set_active_item(item);
    }

    /// Add a clause. Fails if the root becomes inconsistent, after which the solver only
    /// reports infeasibility.
    pub fn add_clause(
        &mut self,
        literals: impl IntoIterator<Item = Literal>,
    ) -> Result<(), ConstraintOperationError> {
        if self.is_infeasible() {
            return Err(ConstraintOperationError::InfeasibleState);
        }
        self.restore_root();

        let (sat, mut context) = self.split();
        if let Err(error) = sat.add_clause(literals.into_iter().collect(), &mut context) {
            self.state = SolverState::Infeasible;
            return Err(error);
        }

        if !self.propagate() {
            self.declare_root_conflict();
            return Err(ConstraintOperationError::InfeasibleClause);
        }
        Ok(())
    }

    /// Post a propagator and run it at the root.
    pub fn add_propagator(
        &mut self,
        propagator: impl Propagator + 'static,
    ) -> Result<PropagatorId, ConstraintOperationError> {
        if self.is_infeasible() {
            return Err(ConstraintOperationError::InfeasibleState);
        }
        self.restore_root();

        let id = match self
            .propagators
            .add(Box::new(propagator), &mut self.sat, &self.domains)
        {
            Ok(id) => id,
            Err(error) => {
                self.state = SolverState::Infeasible;
                return Err(error);
            }
        };

        if !self.propagate() {
            self.declare_root_conflict();
            return Err(ConstraintOperationError::InfeasiblePropagator);
        }
        Ok(id)
    }
}

// Search.
impl Solver {
    /// Search for a solution of the clauses and propagators.
    ///
    /// With a proof, a model which is found is captured for the solution file, and an
    /// infeasible problem ends in the empty clause.
    pub fn solve(&mut self) -> SatisfactionResult {
        if self.is_infeasible() {
            return SatisfactionResult::Unsatisfiable;
        }
        self.restore_root();
        self.materialize_subscribed();
        self.apply_variable_limit();

        let mut conflicts_until_restart = self.restart_base;
        let mut restart_limit = self.restart_base as f64;

        loop {
            if !self.propagate() {
                if !self.resolve_conflict() {
                    info!("infeasible after {} conflicts", self.sat.statistics.num_conflicts);
                    return SatisfactionResult::Unsatisfiable;
                }

                conflicts_until_restart = conflicts_until_restart.saturating_sub(1);
                continue;
            }

            if self.sat.decision_level() == 0 {
                self.clean_up_root();
            }

            if self.restart_base > 0 && conflicts_until_restart == 0 {
                restart_limit *= RESTART_GROWTH;
                conflicts_until_restart = restart_limit as u64;
                self.restart();
                continue;
            }

            let decision = if self.sat.options.vsids {
                self.sat.branch()
            } else {
                self.sat.input_order_decision()
            };

            match decision {
                Some(literal) => self.decide(literal),
                None => {
                    lcg_assert_simple!(self.sat.finished());
                    return SatisfactionResult::Satisfiable(self.capture_solution());
                }
            }
        }
    }

    /// Write the solution and the literal semantics, and close the proof files.
    pub fn finalize_proof(&mut self) -> Result<(), ProofError> {
        self.sat.finalize_proof()
    }

    /// Propagate the Boolean core and the propagators to a fixpoint. Returns `false` on a
    /// conflict.
    fn propagate(&mut self) -> bool {
        loop {
            let (sat, mut context) = self.split();
            if !sat.propagate(&mut context) {
                return false;
            }

            self.propagators
                .notify_domain_events(self.domains.drain_events());

            let Some(propagator) = self.propagators.pop() else {
                return true;
            };

            let consistent =
                self.propagators
                    .propagate(propagator, &mut self.sat, &mut self.domains);
            lcg_assert_simple!(consistent != self.sat.has_conflict());
            if !consistent {
                self.propagators.clear_queue();
                return false;
            }
        }
    }

    /// Learn from the conflict and jump back, or undo the last decision if learning is off.
    /// Returns `false` if the conflict holds at the root.
    fn resolve_conflict(&mut self) -> bool {
        let learning = self.learning;
        let (sat, mut context) = self.split();

        if sat.decision_level() == 0 {
            sat.prove_root_conflict(&mut context);
            self.state = SolverState::Infeasible;
            return false;
        }

        if learning.learn {
            let Some(learnt) = sat.analyse(&mut context) else {
                self.state = SolverState::Infeasible;
                return false;
            };

            if sat.decision_level() > learnt.backjump_level + 1 {
                sat.statistics.num_back_jumps += 1;
            }
            sat.backtrack_to_level(learnt.backjump_level, &mut context);
            sat.learn(learnt, &mut context);

            if sat.learnts.len() > learning.max_learnt_clauses {
                sat.reduce_db();
            }
        } else {
            lcg_assert_simple!(!sat.proof.is_active());
            sat.statistics.num_conflicts += 1;
            let level = sat.decision_level();
            let decision = sat.trail_at(level)[0];
            sat.backtrack_to_level(level - 1, &mut context);
            sat.enqueue(!decision, Reason::Decision, &mut context);
        }

        true
    }

    fn decide(&mut self, literal: Literal) {
        self.sat.new_decision_level();
        self.domains.new_decision_level();

        let (sat, mut context) = self.split();
        sat.enqueue(literal, Reason::Decision, &mut context);
    }

    fn restart(&mut self) {
        debug!("restart after {} conflicts", self.sat.statistics.num_conflicts);
        self.sat.statistics.num_restarts += 1;
        self.restore_root();
    }

    fn restore_root(&mut self) {
        let (sat, mut context) = self.split();
        sat.backtrack_to_level(0, &mut context);
    }

    fn clean_up_root(&mut self) {
        let (sat, mut context) = self.split();
        sat.top_level_clean_up(&mut context);
    }

    fn declare_root_conflict(&mut self) {
        let (sat, mut context) = self.split();
        sat.prove_root_conflict(&mut context);
        self.state = SolverState::Infeasible;
    }

    /// Create the literals of every variable a propagator may narrow during search.
    fn materialize_subscribed(&mut self) {
        let pending = self
            .domains
            .ids()
            .filter(|&variable| {
                self.domains.is_pending(variable) && self.propagators.is_subscribed(variable)
            })
            .collect::<Vec<_>>();
        for variable in pending {
            self.domains.materialize(&mut self.sat, variable);
        }
    }

    /// Switch off lazy explanations for problems with too many Boolean variables. A proof keeps
    /// them on.
    fn apply_variable_limit(&mut self) {
        if !self.sat.options.lazy || self.sat.num_variables() <= self.sat_var_limit {
            return;
        }
        if self.sat.proof.is_active() {
            warn!(
                "{} Boolean variables exceed the limit of {}, which is ignored while a proof is written",
                self.sat.num_variables(),
                self.sat_var_limit
            );
            return;
        }

        warn!(
            "{} Boolean variables exceed the limit of {}, explanations and learning are switched off",
            self.sat.num_variables(),
            self.sat_var_limit
        );
        self.sat.options.lazy = false;
        self.sat.options.learn = false;
        self.learning.learn = false;
    }

    fn capture_solution(&mut self) -> Solution {
        let domains = &self.domains;
        self.sat
            .save_model(|variable| Some(i64::from(domains.lower_bound(variable))));

        let mut integers = KeyedVec::default();
        for variable in self.domains.ids() {
            let _ = integers.push(self.domains.lower_bound(variable));
        }

        let mut booleans = KeyedVec::default();
        for index in 0..self.sat.num_variables() {
            let literal = Literal::positive(BooleanVariable::new(index as u32));
            let _ = booleans.push(self.sat.is_true(literal));
        }

        Solution { integers, booleans }
    }
}

#[cfg(test)]
impl Solver {
    pub(crate) fn with_explanation_context(
        &self,
        check: impl FnOnce(&crate::engine::propagation::ExplanationContext<'_>),
    ) {
        check(&crate::engine::propagation::ExplanationContext {
            sat: &self.sat,
            domains: &self.domains,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::test_sinks::ProofBuffers;

    #[test]
    fn pigeons_do_not_fit_in_fewer_holes() {
        let mut solver = Solver::default();
        let pigeons = (0..3)
            .map(|_| solver.new_bounded_integer(0, 1).unwrap())
            .collect::<Vec<_>>();

        for (index, &first) in pigeons.iter().enumerate() {
            for &second in &pigeons[index + 1..] {
                for hole in 0..2 {
                    let a = solver.integer_literal(first, LiteralType::Eq, hole);
                    let b = solver.integer_literal(second, LiteralType::Eq, hole);
                    let _ = solver.add_clause([!a, !b]);
                }
            }
        }

        assert!(!solver.solve().is_satisfiable());
        assert!(solver.is_infeasible());
        assert!(!solver.solve().is_satisfiable());
    }

    #[test]
    fn solutions_respect_the_clauses() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 9).unwrap();
        let y = solver.new_bounded_integer(0, 9).unwrap();
        let b = solver.new_literal();

        // b -> x >= 7, !b -> y <= 2, and not both x >= 7 and y <= 2.
        let x_high = solver.integer_literal(x, LiteralType::Ge, 7);
        let y_low = solver.integer_literal(y, LiteralType::Le, 2);
        solver.add_clause([!b, x_high]).unwrap();
        solver.add_clause([b, y_low]).unwrap();
        solver.add_clause([!x_high, !y_low]).unwrap();

        let SatisfactionResult::Satisfiable(solution) = solver.solve() else {
            panic!("the clauses are satisfiable");
        };

        if solution.literal_value(b) {
            assert!(solution.integer_value(x) >= 7);
            assert!(solution.integer_value(y) > 2);
        } else {
            assert!(solution.integer_value(y) <= 2);
            assert!(solution.integer_value(x) < 7);
        }
    }

    #[test]
    fn search_without_learning_is_complete() {
        let options = SolverOptions {
            learning: LearningOptions {
                learn: false,
                ..LearningOptions::default()
            },
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(options);
        let [a, b, c] = [
            solver.new_literal(),
            solver.new_literal(),
            solver.new_literal(),
        ];
        for clause in [
            vec![a, b],
            vec![a, !b],
            vec![!a, c],
            vec![!a, !c, b],
        ] {
            solver.add_clause(clause).unwrap();
        }

        let SatisfactionResult::Satisfiable(solution) = solver.solve() else {
            panic!("a, b and c is a solution");
        };
        assert!(solution.literal_value(a));
        assert!(solution.literal_value(b));
        assert!(solution.literal_value(c));
    }

    #[test]
    fn propagations_without_lazy_explanations_are_searched_without_learning() {
        use crate::propagators::LessOrEqualPropagator;

        let options = SolverOptions {
            lazy: false,
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(options);
        assert!(!solver.sat.options.learn);
        assert!(!solver.learning.learn);

        let x = solver.new_bounded_integer(3, 10).unwrap();
        let y = solver.new_bounded_integer(0, 20).unwrap();
        let z = solver.new_bounded_integer(0, 20).unwrap();
        let _ = solver
            .add_propagator(LessOrEqualPropagator::new(x, y, -1))
            .unwrap();
        let y_at_least_four = solver.integer_literal(y, LiteralType::Ge, 4);
        assert!(solver.sat.is_true(y_at_least_four));
        assert_eq!(
            Reason::Decision,
            solver.sat.reason(y_at_least_four.variable())
        );

        // y < z < x < y
        for (a, b) in [(y, z), (z, x)] {
            let _ = solver.add_propagator(LessOrEqualPropagator::new(a, b, -1));
        }
        assert!(!solver.solve().is_satisfiable());
        assert_eq!(0, solver.sat.statistics.num_learnt_clauses);
    }

    #[test]
    fn a_proof_is_not_written_without_learning() {
        let buffers = ProofBuffers::default();
        let options = SolverOptions {
            learning: LearningOptions {
                learn: false,
                ..LearningOptions::default()
            },
            proof_log: buffers.proof_log(),
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(options);
        assert!(!solver.sat.proof.is_active());

        let [a, b, c] = [
            solver.new_literal(),
            solver.new_literal(),
            solver.new_literal(),
        ];
        for clause in [vec![a, b, c], vec![a, !b, c], vec![a, !c], vec![!a, b], vec![!a, !b]] {
            let _ = solver.add_clause(clause);
        }

        assert!(!solver.solve().is_satisfiable());
        solver.finalize_proof().unwrap();
        assert_eq!("", buffers.trace.contents());
        assert_eq!("", buffers.solution.contents());
    }

    #[test]
    fn wide_variables_get_literals_over_the_narrowed_domain() {
        use crate::propagators::LessOrEqualPropagator;

        let mut solver = Solver::default();
        let variables = solver.sat.num_variables();
        let x = solver.new_bounded_integer(0, 2_000_000).unwrap();
        assert_eq!(variables, solver.sat.num_variables());

        let y = solver.new_bounded_integer(0, 10).unwrap();
        let _ = solver
            .add_propagator(LessOrEqualPropagator::new(x, y, 0))
            .unwrap();
        assert_eq!(10, solver.upper_bound(x));
        assert!(solver.domains.is_pending(x));

        let at_least_four = solver.integer_literal(x, LiteralType::Ge, 4);
        let variable = solver.domains.variable(x);
        assert_eq!((0, 10), (variable.lit_min(), variable.lit_max()));
        solver.add_clause([at_least_four]).unwrap();
        assert_eq!(4, solver.lower_bound(y));

        let SatisfactionResult::Satisfiable(solution) = solver.solve() else {
            panic!("x = y = 4 is a solution");
        };
        assert!((4..=10).contains(&solution.integer_value(x)));
        assert!(solution.integer_value(x) <= solution.integer_value(y));
    }

    #[test]
    fn subscribed_variables_get_their_literals_when_search_starts() {
        use crate::propagators::LessOrEqualPropagator;

        let options = SolverOptions {
            eager_limit: 4,
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(options);
        let x = solver.new_bounded_integer(0, 9).unwrap();
        let y = solver.new_bounded_integer(0, 9).unwrap();
        let unused = solver.new_bounded_integer(0, 9).unwrap();
        let _ = solver
            .add_propagator(LessOrEqualPropagator::new(x, y, -3))
            .unwrap();

        let SatisfactionResult::Satisfiable(solution) = solver.solve() else {
            panic!("x = 0 and y = 3 is a solution");
        };
        assert!(solution.integer_value(x) + 3 <= solution.integer_value(y));
        assert!(!solver.domains.is_pending(x));
        assert!(!solver.domains.is_pending(y));
        assert!(solver.domains.is_pending(unused));
        assert_eq!(0, solution.integer_value(unused));
    }

    #[test]
    fn inconsistent_root_is_reported_when_adding() {
        let mut solver = Solver::default();
        let a = solver.new_literal();

        solver.add_clause([a]).unwrap();
        assert_eq!(
            Err(ConstraintOperationError::InfeasibleClause),
            solver.add_clause([!a])
        );
        assert_eq!(
            Err(ConstraintOperationError::InfeasibleState),
            solver.add_clause([a])
        );
        assert!(!solver.solve().is_satisfiable());
    }

    #[test]
    fn root_infeasibility_ends_the_proof_with_the_empty_clause() {
        let buffers = ProofBuffers::default();
        let options = SolverOptions {
            proof_log: buffers.proof_log(),
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(options);
        let [a, b] = [solver.new_literal(), solver.new_literal()];
        for clause in [vec![a, b], vec![a, !b], vec![!a, b], vec![!a, !b]] {
            solver.add_clause(clause).unwrap();
        }

        assert!(!solver.solve().is_satisfiable());
        solver.finalize_proof().unwrap();

        let trace = buffers.trace.contents();
        let last = trace
            .lines()
            .filter(|line| !line.starts_with('d'))
            .last()
            .unwrap();
        let mut fields = last.split(' ');
        let _ = fields.next();
        assert_eq!(Some("0"), fields.next(), "{last} is not the empty clause");
    }

    #[test]
    fn the_solution_is_saved_for_the_proof() {
        let buffers = ProofBuffers::default();
        let options = SolverOptions {
            proof_log: buffers.proof_log(),
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(options);
        let x = solver.new_named_bounded_integer(1, 3, "x").unwrap();
        let b = solver.new_named_literal("b");
        let x_is_two = solver.integer_literal(x, LiteralType::Eq, 2);
        solver.add_clause([x_is_two]).unwrap();
        solver.add_clause([b]).unwrap();

        assert!(solver.solve().is_satisfiable());
        solver.finalize_proof().unwrap();

        assert_eq!(
            "[lit_True = 1, x = 2, b = 1]",
            buffers.solution.contents()
        );
    }

    #[test]
    fn set_literals_select_values_of_sparse_variables() {
        let buffers = ProofBuffers::default();
        let options = SolverOptions {
            proof_log: buffers.proof_log(),
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(options);
        let x = solver.new_named_sparse_integer(&[1, 3, 5], "x").unwrap();

        let head = vec![
            solver.integer_literal(x, LiteralType::Eq, 3),
            solver.integer_literal(x, LiteralType::Eq, 5),
        ];
        let one_of = solver.create_set_literal(x, head);
        let at_most_four = solver.integer_literal(x, LiteralType::Le, 4);
        solver.add_clause([one_of]).unwrap();
        solver.add_clause([at_most_four]).unwrap();

        let SatisfactionResult::Satisfiable(solution) = solver.solve() else {
            panic!("x = 3 is a solution");
        };
        assert_eq!(3, solution.integer_value(x));

        solver.finalize_proof().unwrap();
        assert_eq!("[lit_True = 1, x = 3]", buffers.solution.contents());
    }

    #[test]
    fn bound_literals_are_described_in_the_semantics() {
        let buffers = ProofBuffers::default();
        let options = SolverOptions {
            proof_log: buffers.proof_log(),
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(options);
        let x = solver.new_named_bounded_integer(0, 3, "x").unwrap();

        let above_one = solver.new_literal();
        solver.bind_literal_to_atom(!above_one, x, Relation::GreaterThan, 1);
        let constant = solver.new_literal();
        solver.bind_literal_to_constant(!constant, true);
        solver.finalize_proof().unwrap();

        let semantics = buffers.semantics.contents();
        let described = |literal: Literal, atom: &str| {
            let line = format!("{} {atom}", literal.variable().trace_index());
            semantics.lines().any(|written| written == line)
        };
        assert!(described(above_one, "[x <= 1]"));
        assert!(described(constant, "[lit_True < 1]"));
    }

    #[test]
    fn atoms_outside_the_domain_keep_the_constant_semantics() {
        let buffers = ProofBuffers::default();
        let options = SolverOptions {
            proof_log: buffers.proof_log(),
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(options);
        let x = solver.new_named_bounded_integer(0, 5, "x").unwrap();

        let above = solver.integer_literal(x, LiteralType::Ge, 9);
        assert_eq!(solver.sat.false_literal(), above);
        solver.bind_literal_to_atom(above, x, Relation::GreaterThanEqual, 9);
        solver.finalize_proof().unwrap();

        let semantics = buffers.semantics.contents();
        let index = above.variable().trace_index();
        let lines = semantics
            .lines()
            .filter(|line| line.split(' ').next() == Some(index.to_string().as_str()))
            .collect::<Vec<_>>();
        assert_eq!(vec![format!("{index} [lit_True >= 1]")], lines);
    }

    #[test]
    fn clauses_are_attributed_to_the_active_item() {
        let buffers = ProofBuffers::default();
        let options = SolverOptions {
            proof_log: buffers.proof_log(),
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(options);
        let [a, b] = [solver.new_literal(), solver.new_literal()];

        solver.set_proof_item(7);
        for clause in [vec![a, b], vec![a, !b], vec![!a, b], vec![!a, !b]] {
            let _ = solver.add_clause(clause);
        }

        assert!(!solver.solve().is_satisfiable());
        solver.finalize_proof().unwrap();
        assert!(buffers.trace.contents().lines().any(|line| line == "c c7"));
    }
}
