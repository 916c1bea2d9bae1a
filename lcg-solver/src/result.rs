use std::fmt::Display;

use lcg_core::proof::ProofError;
use thiserror::Error;

use crate::dimacs::DimacsParseError;

pub(crate) type LcgResult<T> = Result<T, LcgError>;

#[derive(Error, Debug)]
pub(crate) enum LcgError {
    #[error("IO error, more details: {0}")]
    Io(#[from] std::io::Error),
    #[error("The file {0} is not supported.")]
    InvalidInstanceFile(String),
    #[error("The dimacs file was invalid, more details: {0}")]
    InvalidDimacs(#[from] DimacsParseError),
    #[error("Failed to write the proof, more details: {0}")]
    Proof(#[from] ProofError),
}

impl LcgError {
    pub(crate) fn invalid_instance(path: impl Display) -> Self {
        Self::InvalidInstanceFile(format!("{path}"))
    }
}
