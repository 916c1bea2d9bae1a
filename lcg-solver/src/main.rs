mod dimacs;
mod result;

use std::fs::File;
use std::io::Write;
use std::num::NonZeroI32;
use std::path::PathBuf;

use clap::Parser;
use dimacs::parse_cnf;
use dimacs::DimacsSink;
use lcg_core::options::LearningOptions;
use lcg_core::options::PolarityMode;
use lcg_core::proof::ProofLog;
use lcg_core::proof::ProofOptions;
use lcg_core::statistics::configure_statistic_logging;
use lcg_core::Literal;
use lcg_core::SatisfactionResult;
use lcg_core::Solver;
use lcg_core::SolverOptions;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use result::LcgError;
use result::LcgResult;

#[derive(Debug, Parser)]
#[command(author, version, about, arg_required_else_help = true)]
struct Args {
    /// The instance to solve, a '*.cnf' file in the DIMACS format.
    instance_path: PathBuf,

    /// The output path for the resolution trace.
    ///
    /// The meaning of every literal is written to '<path>.lits', and the last solution which was
    /// found to '<path>.sol'. If the path ends in '.gz', the files are gzipped.
    #[arg(long = "proof", verbatim_doc_comment)]
    proof_path: Option<PathBuf>,

    /// Backtrack chronologically instead of learning a clause from every conflict.
    #[arg(long = "no-learning")]
    no_learning: bool,

    /// The seed of the random number generator used in search.
    #[arg(long = "random-seed", default_value_t = 42)]
    random_seed: u64,

    /// The value a decision assigns to the chosen variable.
    #[arg(long, value_enum, default_value_t)]
    polarity: PolarityMode,

    /// The number of conflicts before the first restart; 0 disables restarts.
    #[arg(long = "restart-base", default_value_t = 100)]
    restart_base: u64,

    /// Print debug messages.
    #[arg(short, long)]
    verbose: bool,

    /// Print the statistics of the solver when it finishes.
    #[arg(short = 's', long = "log-statistics")]
    log_statistics: bool,
}

fn configure_logging(verbose: bool, log_statistics: bool) {
    if log_statistics {
        configure_statistic_logging("c STAT", None, None);
    }

    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            writeln!(
                buf,
                "c {} {}",
                record.level().as_str().to_lowercase(),
                record.args()
            )
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> LcgResult<()> {
    let args = Args::parse();
    configure_logging(args.verbose, args.log_statistics);

    if args.instance_path.extension().and_then(|ext| ext.to_str()) != Some("cnf") {
        return Err(LcgError::invalid_instance(args.instance_path.display()));
    }

    if lcg_core::asserts::LCG_ASSERT_LEVEL_DEFINITION >= lcg_core::asserts::LCG_ASSERT_MODERATE {
        warn!(
            "Potential performance degradation: the assert level is set to {}, meaning many debug asserts are active.",
            lcg_core::asserts::LCG_ASSERT_LEVEL_DEFINITION
        );
    }

    let proof_log = match args.proof_path.as_ref() {
        Some(path) => ProofLog::to_files(&ProofOptions::from_trace_path(path))?,
        None => ProofLog::default(),
    };

    let options = SolverOptions {
        learning: LearningOptions {
            learn: !args.no_learning,
            ..LearningOptions::default()
        },
        random_seed: args.random_seed,
        polarity: args.polarity,
        restart_base: args.restart_base,
        proof_log,
        ..SolverOptions::default()
    };

    let mut sink = SolverSink {
        solver: Solver::new(options),
        variables: Vec::new(),
        name_variables: args.proof_path.is_some(),
    };
    parse_cnf(File::open(&args.instance_path)?, &mut sink)?;

    let SolverSink {
        mut solver,
        variables,
        ..
    } = sink;

    match solver.solve() {
        SatisfactionResult::Satisfiable(solution) => {
            println!("s SATISFIABLE");
            println!(
                "v {} 0",
                variables
                    .iter()
                    .enumerate()
                    .map(|(index, &literal)| {
                        let dimacs = index as i32 + 1;
                        let signed = if solution.literal_value(literal) {
                            dimacs
                        } else {
                            -dimacs
                        };
                        signed.to_string()
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            );
        }
        SatisfactionResult::Unsatisfiable => println!("s UNSATISFIABLE"),
    }

    solver.log_statistics();
    solver.finalize_proof()?;
    Ok(())
}

/// Builds the solver while the instance is parsed, with one Boolean variable per DIMACS
/// variable.
#[derive(Debug)]
struct SolverSink {
    solver: Solver,
    variables: Vec<Literal>,
    name_variables: bool,
}

impl DimacsSink for SolverSink {
    fn header(&mut self, num_variables: usize, num_clauses: usize) {
        info!("instance has {num_variables} variables and {num_clauses} clauses");

        self.variables = (1..=num_variables)
            .map(|index| {
                if self.name_variables {
                    self.solver.new_named_literal(format!("x{index}"))
                } else {
                    self.solver.new_literal()
                }
            })
            .collect();
    }

    fn add_clause(&mut self, clause: &[NonZeroI32]) {
        let literals = clause.iter().map(|literal| {
            let variable = self.variables[literal.unsigned_abs().get() as usize - 1];
            if literal.is_positive() {
                variable
            } else {
                !variable
            }
        });

        // An inconsistent root is remembered by the solver and reported by `solve`.
        if self.solver.add_clause(literals).is_err() {
            info!("the instance is inconsistent at the root");
        }
    }
}
