//! This crate contains abstractions for dealing with the files a proof-logging lazy clause
//! generation solver emits:
//!
//! - the resolution trace (see [`writer::TraceWriter`] and [`reader::TraceReader`]), in which
//!   every clause the verifier has to track gets an identifier, is justified by the identifiers
//!   of its antecedents, and is eventually deleted;
//! - the literal semantics file (see [`LiteralDefinitions`]), which maps every Boolean variable of
//!   the trace to the atomic constraint it stands for;
//! - the solution file (see [`Solution`]).

mod atom;
mod literal_definitions;
mod solution;

pub mod reader;
pub mod steps;
pub mod writer;

pub use atom::*;
pub use literal_definitions::*;
pub use solution::*;
