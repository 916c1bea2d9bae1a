use std::io;

#[cfg(doc)]
use super::TraceReader;

/// The errors that can be encountered when reading any of the files in this crate, e.g. by the
/// [`TraceReader`].
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("failed to read from source: {0}")]
    IoError(#[from] io::Error),

    #[error("failed to parse line {line_nr}: {reason}")]
    ParseError { line_nr: usize, reason: String },
}

impl TraceError {
    pub(crate) fn parse(line_nr: usize, reason: impl std::fmt::Display) -> TraceError {
        TraceError::ParseError {
            line_nr,
            reason: reason.to_string(),
        }
    }
}
