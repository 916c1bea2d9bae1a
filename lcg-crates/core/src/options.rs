//! Options which determine how the [`Solver`] behaves.
#[cfg(feature = "clap")]
use clap::ValueEnum;

#[cfg(doc)]
use crate::Solver;
use crate::proof::ProofLog;

/// Options for the [`Solver`].
#[derive(Debug)]
pub struct SolverOptions {
    pub learning: LearningOptions,
    /// Explain propagations lazily. Without it no clauses can be learnt.
    pub lazy: bool,
    /// Branch on the Boolean variable with the highest activity.
    pub vsids: bool,
    /// Remove satisfied learnt clauses and false literals at the root.
    pub sat_simplify: bool,
    /// The factor by which variable activities decay after every conflict.
    pub variable_activity_decay: f64,
    pub polarity: PolarityMode,
    pub phase_saving: PhaseSaving,
    pub random_seed: u64,
    /// Give new variables a small random activity so that ties are broken randomly.
    pub random_tie_breaking: bool,
    /// The widest domain for which the channel literals of an integer variable are created
    /// with the variable. Wider variables get their literals when they are first needed, over
    /// the domain they have at that point.
    pub eager_limit: i64,
    /// Above this number of Boolean variables, lazy explanation and learning are switched off.
    pub sat_var_limit: usize,
    /// Controls which learnt clauses are shared with other workers of a portfolio. Only stored.
    pub share_parameter: f64,
    /// The number of literals per second the workers of a portfolio may share. Only stored.
    pub bandwidth: f64,
    /// The number of conflicts before the first restart. Every restart increases the limit
    /// geometrically. `0` disables restarts.
    pub restart_base: u64,
    pub proof_log: ProofLog,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            learning: LearningOptions::default(),
            lazy: true,
            vsids: true,
            sat_simplify: true,
            variable_activity_decay: 0.95,
            polarity: PolarityMode::default(),
            phase_saving: PhaseSaving::default(),
            random_seed: 42,
            random_tie_breaking: false,
            eager_limit: 1_000_000,
            sat_var_limit: 2_000_000,
            share_parameter: 10.0,
            bandwidth: 3_000_000.0,
            restart_base: 100,
            proof_log: ProofLog::default(),
        }
    }
}

/// Options which influence clause learning.
#[derive(Clone, Copy, Debug)]
pub struct LearningOptions {
    /// Learn a clause from every conflict. When disabled, search backtracks chronologically.
    pub learn: bool,
    /// Watch learnt clauses on their second literal only.
    pub one_watch: bool,
    /// The size of the learnt clause database which triggers a reduction.
    pub max_learnt_clauses: usize,
    /// The factor by which clause activities decay after every conflict.
    pub clause_activity_decay: f32,
}

impl Default for LearningOptions {
    fn default() -> Self {
        LearningOptions {
            learn: true,
            one_watch: false,
            max_learnt_clauses: 100_000,
            clause_activity_decay: 0.999,
        }
    }
}

/// Which value a decision assigns to the chosen variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
pub enum PolarityMode {
    /// The saved phase of the variable, initially false.
    #[default]
    Default,
    /// Always true.
    Same,
    /// Always false.
    Anti,
    /// A fair coin flip.
    Random,
}

/// When the value of an unassigned variable is remembered as its phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
pub enum PhaseSaving {
    #[default]
    None,
    /// Only for variables assigned at the level which is being undone last.
    Recent,
    Always,
}

/// The part of [`SolverOptions`] the Boolean engine consults during search.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SatOptions {
    pub(crate) lazy: bool,
    pub(crate) learn: bool,
    pub(crate) one_watch: bool,
    pub(crate) vsids: bool,
    pub(crate) sat_simplify: bool,
    pub(crate) variable_activity_decay: f64,
    pub(crate) clause_activity_decay: f32,
    pub(crate) polarity: PolarityMode,
    pub(crate) phase_saving: PhaseSaving,
    pub(crate) random_seed: u64,
    pub(crate) random_tie_breaking: bool,
}

impl Default for SatOptions {
    fn default() -> Self {
        SatOptions::from(&SolverOptions::default())
    }
}

impl From<&SolverOptions> for SatOptions {
    fn from(options: &SolverOptions) -> Self {
        SatOptions {
            lazy: options.lazy,
            learn: options.learning.learn,
            one_watch: options.learning.one_watch,
            vsids: options.vsids,
            sat_simplify: options.sat_simplify,
            variable_activity_decay: options.variable_activity_decay,
            clause_activity_decay: options.learning.clause_activity_decay,
            polarity: options.polarity,
            phase_saving: options.phase_saving,
            random_seed: options.random_seed,
            random_tie_breaking: options.random_tie_breaking,
        }
    }
}
