//! Implements the parsing of resolution traces.
//!
//! See [`TraceReader`] for information on how to parse a trace.

mod error;

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::num::NonZeroI32;
use std::num::NonZeroU32;

pub use error::TraceError;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::space1;
use nom::combinator::all_consuming;
use nom::combinator::map;
use nom::combinator::map_opt;
use nom::combinator::value;
use nom::multi::many0;
use nom::sequence::preceded;
use nom::sequence::terminated;
use nom::sequence::tuple;
use nom::IResult;

use crate::steps::ClauseId;
use crate::steps::Deletion;
use crate::steps::Derivation;
use crate::steps::Hint;
use crate::steps::ReadStep;
use crate::steps::Step;

/// Used to read and parse resolution traces.
///
/// The reader will read the trace line-by-line. Leading and trailing whitespace, and empty lines,
/// are ignored. The reader does not check that the trace is a valid proof; e.g. it will happily
/// return a derivation that references a deleted clause.
///
/// # Example
/// ```
/// use std::num::NonZero;
///
/// use lcg_trace::reader::TraceReader;
/// use lcg_trace::steps::*;
///
/// let source = r#"
/// c c4
/// 1 1 -2 0 0
/// 2 -2 0 1 0
/// d 1
/// "#;
///
/// let mut reader = TraceReader::new(source.as_bytes());
///
/// let hint = reader.next_step().expect("valid hint");
/// assert_eq!(Some(Step::Hint(Hint::Item(NonZero::new(4).unwrap()))), hint);
///
/// let introduced = reader.next_step().expect("valid introduction");
/// let expected = Derivation {
///     id: NonZero::new(1).unwrap(),
///     literals: vec![NonZero::new(1).unwrap(), NonZero::new(-2).unwrap()],
///     antecedents: vec![],
/// };
/// assert_eq!(Some(Step::Derivation(expected)), introduced);
///
/// let derived = reader.next_step().expect("valid resolution step");
/// let expected = Derivation {
///     id: NonZero::new(2).unwrap(),
///     literals: vec![NonZero::new(-2).unwrap()],
///     antecedents: vec![NonZero::new(1).unwrap()],
/// };
/// assert_eq!(Some(Step::Derivation(expected)), derived);
///
/// let deletion = reader.next_step().expect("valid deletion");
/// assert_eq!(
///     Some(Step::Delete(Deletion::new(NonZero::new(1).unwrap()))),
///     deletion
/// );
///
/// assert_eq!(None, reader.next_step().expect("finished reading source"));
/// ```
#[derive(Debug)]
pub struct TraceReader<R> {
    source: BufReader<R>,
    string_buffer: String,
    line_nr: usize,
}

impl<R: Read> TraceReader<R> {
    /// Construct a new trace reader which reads from `source`.
    pub fn new(source: R) -> TraceReader<R> {
        TraceReader {
            source: BufReader::new(source),
            string_buffer: String::new(),
            line_nr: 0,
        }
    }

    /// Read the next step in the trace.
    ///
    /// If reading is successful, `Some(step)` is returned with the next step, or `None` if the end
    /// of the trace is reached.
    pub fn next_step(&mut self) -> Result<Option<ReadStep>, TraceError> {
        self.string_buffer.clear();

        // Read lines until we find a non-empty line.
        while self.string_buffer.trim().is_empty() {
            self.string_buffer.clear();
            let read_bytes = self.source.read_line(&mut self.string_buffer)?;
            self.line_nr += 1;

            if read_bytes == 0 {
                return Ok(None);
            }
        }

        let (_, step) = trace_step(self.string_buffer.trim())
            .map_err(|error| TraceError::parse(self.line_nr, error))?;

        Ok(Some(step))
    }

    /// Read all the remaining steps.
    pub fn read_to_end(mut self) -> Result<Vec<ReadStep>, TraceError> {
        let mut steps = vec![];
        while let Some(step) = self.next_step()? {
            steps.push(step);
        }
        Ok(steps)
    }
}

/// Parse a trace step from a line.
///
/// `input` is assumed to be a single line, with leading and trailing whitespace removed.
fn trace_step(input: &str) -> IResult<&str, ReadStep> {
    all_consuming(alt((
        map(deletion, Step::Delete),
        map(hint, Step::Hint),
        map(derivation, Step::Derivation),
    )))(input)
}

/// `<id> <literals> 0 <antecedents> 0`
fn derivation(input: &str) -> IResult<&str, Derivation<Vec<NonZeroI32>, Vec<ClauseId>>> {
    map(
        tuple((
            terminated(clause_id, space1),
            many0(terminated(literal, space1)),
            tag("0"),
            many0(preceded(space1, clause_id)),
            preceded(space1, tag("0")),
        )),
        |(id, literals, _, antecedents, _)| Derivation {
            id,
            literals,
            antecedents,
        },
    )(input)
}

/// `d <id>`
fn deletion(input: &str) -> IResult<&str, Deletion> {
    preceded(tag("d "), map(clause_id, Deletion::new))(input)
}

/// `c c<item>` or `c -`
fn hint(input: &str) -> IResult<&str, Hint> {
    preceded(
        tag("c "),
        alt((
            value(Hint::Cleared, tag("-")),
            map(preceded(tag("c"), item), Hint::Item),
        )),
    )(input)
}

/// Parses a single non-zero signed integer.
fn literal(input: &str) -> IResult<&str, NonZeroI32> {
    map_opt(nom::character::complete::i32, NonZeroI32::new)(input)
}

fn clause_id(input: &str) -> IResult<&str, ClauseId> {
    map_opt(nom::character::complete::u32, ClauseId::new)(input)
}

fn item(input: &str) -> IResult<&str, NonZeroU32> {
    map_opt(nom::character::complete::u32, NonZeroU32::new)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_clause_with_antecedents() {
        let mut reader = TraceReader::new("9 0 3 8 0\n".as_bytes());

        let step = reader.next_step().expect("valid empty clause");
        let expected = Derivation {
            id: ClauseId::new(9).unwrap(),
            literals: vec![],
            antecedents: vec![ClauseId::new(3).unwrap(), ClauseId::new(8).unwrap()],
        };
        assert_eq!(Some(Step::Derivation(expected)), step);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let reader = TraceReader::new("\n\nc -\n\n d 3 \n".as_bytes());

        let steps = reader.read_to_end().expect("valid trace");
        assert_eq!(
            vec![
                Step::Hint(Hint::Cleared),
                Step::Delete(Deletion::new(ClauseId::new(3).unwrap()))
            ],
            steps
        );
    }

    #[test]
    fn missing_terminator_is_rejected() {
        let mut reader = TraceReader::new("\n4 1 2 0 3\n".as_bytes());

        let error = reader.next_step().expect_err("unterminated antecedent list");
        assert!(matches!(error, TraceError::ParseError { line_nr: 2, .. }));
    }
}
