#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use std::fs::File;

use helpers::instance;
use helpers::proof_path;
use helpers::remove_proof;
use helpers::run_solver;
use lcg_trace::reader::TraceReader;
use lcg_trace::steps::Step;
use lcg_trace::LiteralDefinitions;
use lcg_trace::Solution;
use regex::Regex;

fn model(stdout: &str) -> Vec<i32> {
    let line = Regex::new(r"(?m)^v ((?:-?\d+ )*)0$").unwrap();
    let captures = line.captures(stdout).expect("a model line is printed");
    captures[1]
        .split_whitespace()
        .map(|literal| literal.parse().unwrap())
        .collect()
}

#[test]
fn satisfiable_instance_prints_its_model() {
    let run = run_solver(instance("satisfiable"), std::iter::empty());

    assert!(run.status.success());
    assert!(run.stdout.lines().any(|line| line == "s SATISFIABLE"));
    assert_eq!(vec![1, -2, 3, -4], model(&run.stdout));
}

#[test]
fn unsatisfiable_instance_is_reported() {
    for args in [vec![], vec!["--no-learning".to_owned()]] {
        let run = run_solver(instance("pigeon_hole_3_2"), args);

        assert!(run.status.success());
        assert!(run.stdout.lines().any(|line| line == "s UNSATISFIABLE"));
    }
}

#[test]
fn invalid_instance_fails() {
    let run = run_solver(instance("invalid"), std::iter::empty());

    assert!(!run.status.success());
    assert!(!run.stdout.contains("s SATISFIABLE"));
}

#[test]
fn statistics_are_logged_on_request() {
    let run = run_solver(
        instance("pigeon_hole_3_2"),
        ["--log-statistics".to_owned()],
    );

    let statistic = Regex::new(r"(?m)^c STAT sat_num_conflicts=\d+$").unwrap();
    assert!(statistic.is_match(&run.stdout), "{}", run.stdout);
}

#[test]
fn unsatisfiable_proof_ends_in_the_empty_clause() {
    let trace = proof_path("pigeon_hole_3_2");
    let run = run_solver(
        instance("pigeon_hole_3_2"),
        ["--proof".to_owned(), trace.display().to_string()],
    );
    assert!(run.status.success());

    let steps = TraceReader::new(File::open(&trace).unwrap())
        .read_to_end()
        .expect("the trace can be parsed");

    let introductions = steps
        .iter()
        .filter(|step| matches!(step, Step::Derivation(derivation) if derivation.antecedents.is_empty()))
        .count();
    assert!(introductions >= 9);

    let Some(Step::Derivation(last)) = steps
        .iter()
        .filter(|step| matches!(step, Step::Derivation(_)))
        .last()
    else {
        panic!("the trace contains derivations");
    };
    assert!(last.literals.is_empty());

    let mut semantics = trace.clone().into_os_string();
    semantics.push(".lits");
    let definitions = LiteralDefinitions::parse(File::open(semantics).unwrap()).unwrap();
    assert_eq!(8, definitions.len());

    remove_proof(&trace);
}

#[test]
fn satisfiable_proof_writes_the_solution() {
    let trace = proof_path("satisfiable");
    let run = run_solver(
        instance("satisfiable"),
        ["--proof".to_owned(), trace.display().to_string()],
    );
    assert!(run.status.success());

    let mut solution_path = trace.clone().into_os_string();
    solution_path.push(".sol");
    let solution = Solution::parse(File::open(solution_path).unwrap()).unwrap();

    assert_eq!(Some(1), solution.value_of("x1"));
    assert_eq!(Some(0), solution.value_of("x2"));
    assert_eq!(Some(1), solution.value_of("x3"));
    assert_eq!(Some(0), solution.value_of("x4"));

    remove_proof(&trace);
}
