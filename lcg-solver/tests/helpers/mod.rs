//! Runs the solver binary on the instances next to the tests.
#![allow(
    dead_code,
    reason = "every test file includes the helpers but none uses all of them"
)]

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;

use wait_timeout::ChildExt;

const TEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub(crate) struct Run {
    pub(crate) status: ExitStatus,
    pub(crate) stdout: String,
}

pub(crate) fn instance(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("instances")
        .join(format!("{name}.cnf"))
}

/// A trace path in the temporary directory which is unique to the test.
pub(crate) fn proof_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lcg-solver-{name}-{}.trace", std::process::id()))
}

pub(crate) fn remove_proof(trace: &Path) {
    for suffix in ["", ".lits", ".sol"] {
        let mut path = trace.to_path_buf().into_os_string();
        path.push(suffix);
        let path = PathBuf::from(path);
        if path.is_file() {
            std::fs::remove_file(path).expect("proof file can be removed");
        }
    }
}

pub(crate) fn run_solver(
    instance_path: impl AsRef<Path>,
    args: impl IntoIterator<Item = String>,
) -> Run {
    let solver = PathBuf::from(env!("CARGO_BIN_EXE_lcg-solver"));
    let stdout_path = std::env::temp_dir().join(format!(
        "lcg-solver-{}-{}.log",
        instance_path
            .as_ref()
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("instance"),
        std::process::id()
    ));

    let mut command = Command::new(solver);
    for arg in args {
        let _ = command.arg(arg);
    }

    let mut child = command
        .arg(instance_path.as_ref())
        .stdout(std::fs::File::create(&stdout_path).expect("Failed to create log file."))
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run solver.");

    let status = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs()),
        Ok(Some(status)) => status,
        Err(e) => panic!("error starting solver: {e}"),
    };

    let stdout = std::fs::read_to_string(&stdout_path).expect("Failed to read log file.");
    std::fs::remove_file(&stdout_path).expect("Failed to remove log file.");

    Run { status, stdout }
}
