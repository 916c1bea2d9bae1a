//! A parser for the DIMACS CNF format.
//!
//! The source is read line by line and every clause is handed to a [`DimacsSink`] as soon as its
//! terminating `0` is read, reusing a single buffer. Clauses may span several lines, and several
//! clauses may share one. The parser is not meant as a validator; it rejects malformed input but
//! the errors only point at the offending token.
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::num::NonZeroI32;

use thiserror::Error;

/// Receives the contents of a DIMACS file.
pub(crate) trait DimacsSink {
    /// Called once, with the header, before any clause.
    fn header(&mut self, num_variables: usize, num_clauses: usize);

    /// A clause over the variables `1..=num_variables`, without the terminating `0`.
    fn add_clause(&mut self, clause: &[NonZeroI32]);
}

#[derive(Debug, Error)]
pub(crate) enum DimacsParseError {
    #[error("failed to read the instance")]
    Io(#[from] std::io::Error),

    #[error("missing dimacs header")]
    MissingHeader,

    #[error("'{0}' is an invalid header")]
    InvalidHeader(String),

    #[error("multiple dimacs headers found")]
    DuplicateHeader,

    #[error("'{0}' is an invalid DIMACS literal")]
    InvalidLiteral(String),

    #[error("literal {literal} refers to a variable beyond the {num_variables} in the header")]
    UndeclaredVariable { literal: i32, num_variables: usize },

    #[error("the last clause in the source is not terminated with a '0'")]
    UnterminatedClause,

    #[error("expected to parse {expected} clauses, but parsed {parsed}")]
    IncorrectClauseCount { expected: usize, parsed: usize },
}

#[derive(Clone, Copy, Debug)]
struct Header {
    num_variables: usize,
    num_clauses: usize,
}

pub(crate) fn parse_cnf(
    source: impl Read,
    sink: &mut impl DimacsSink,
) -> Result<(), DimacsParseError> {
    let mut reader = BufReader::new(source);
    let mut line = String::new();

    let mut header: Option<Header> = None;
    let mut clause = Vec::new();
    let mut num_parsed = 0;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        // Some generators end the file with a '%' line.
        if trimmed.starts_with('%') {
            break;
        }

        if trimmed.starts_with('p') {
            if header.is_some() {
                return Err(DimacsParseError::DuplicateHeader);
            }
            let parsed = parse_header(trimmed)?;
            sink.header(parsed.num_variables, parsed.num_clauses);
            header = Some(parsed);
            continue;
        }

        let Some(header) = header else {
            return Err(DimacsParseError::MissingHeader);
        };

        for token in trimmed.split_whitespace() {
            let literal = token
                .parse::<i32>()
                .map_err(|_| DimacsParseError::InvalidLiteral(token.to_owned()))?;

            match NonZeroI32::new(literal) {
                None => {
                    sink.add_clause(&clause);
                    clause.clear();
                    num_parsed += 1;
                }
                Some(literal) if literal.unsigned_abs().get() as usize > header.num_variables => {
                    return Err(DimacsParseError::UndeclaredVariable {
                        literal: literal.get(),
                        num_variables: header.num_variables,
                    });
                }
                Some(literal) => clause.push(literal),
            }
        }
    }

    let Some(header) = header else {
        return Err(DimacsParseError::MissingHeader);
    };
    if !clause.is_empty() {
        return Err(DimacsParseError::UnterminatedClause);
    }
    if num_parsed != header.num_clauses {
        return Err(DimacsParseError::IncorrectClauseCount {
            expected: header.num_clauses,
            parsed: num_parsed,
        });
    }

    Ok(())
}

fn parse_header(line: &str) -> Result<Header, DimacsParseError> {
    let invalid = || DimacsParseError::InvalidHeader(line.to_owned());

    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("p") || tokens.next() != Some("cnf") {
        return Err(invalid());
    }

    let mut next_number = || {
        tokens
            .next()
            .and_then(|token| token.parse::<usize>().ok())
            .ok_or_else(invalid)
    };
    let num_variables = next_number()?;
    let num_clauses = next_number()?;

    if tokens.next().is_some() {
        return Err(invalid());
    }

    Ok(Header {
        num_variables,
        num_clauses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Collected {
        num_variables: usize,
        clauses: Vec<Vec<i32>>,
    }

    impl DimacsSink for Collected {
        fn header(&mut self, num_variables: usize, _num_clauses: usize) {
            self.num_variables = num_variables;
        }

        fn add_clause(&mut self, clause: &[NonZeroI32]) {
            self.clauses
                .push(clause.iter().map(|literal| literal.get()).collect());
        }
    }

    fn parse(source: &str) -> Result<Collected, DimacsParseError> {
        let mut sink = Collected::default();
        parse_cnf(source.as_bytes(), &mut sink)?;
        Ok(sink)
    }

    #[test]
    fn clauses_may_span_lines() {
        let sink = parse("c a comment\np cnf 3 3\n1 -2 0 3\n-1 0\n\n2 3 0\n").unwrap();

        assert_eq!(3, sink.num_variables);
        assert_eq!(vec![vec![1, -2], vec![3, -1], vec![2, 3]], sink.clauses);
    }

    #[test]
    fn empty_clause_is_passed_on() {
        let sink = parse("p cnf 1 2\n1 0\n0\n").unwrap();
        assert_eq!(vec![vec![1], vec![]], sink.clauses);
    }

    #[test]
    fn percent_line_ends_the_instance() {
        let sink = parse("p cnf 2 1\n1 2 0\n%\n0\n").unwrap();
        assert_eq!(vec![vec![1, 2]], sink.clauses);
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(matches!(
            parse("1 2 0\n"),
            Err(DimacsParseError::MissingHeader)
        ));
        assert!(matches!(
            parse("p cnf 2\n"),
            Err(DimacsParseError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse("p cnf 2 1\np cnf 2 1\n"),
            Err(DimacsParseError::DuplicateHeader)
        ));
        assert!(matches!(
            parse("p cnf 2 1\n1 x 0\n"),
            Err(DimacsParseError::InvalidLiteral(token)) if token == "x"
        ));
        assert!(matches!(
            parse("p cnf 2 1\n1 3 0\n"),
            Err(DimacsParseError::UndeclaredVariable { literal: 3, .. })
        ));
        assert!(matches!(
            parse("p cnf 2 1\n1 2\n"),
            Err(DimacsParseError::UnterminatedClause)
        ));
        assert!(matches!(
            parse("p cnf 2 2\n1 2 0\n"),
            Err(DimacsParseError::IncorrectClauseCount {
                expected: 2,
                parsed: 1
            })
        ));
    }
}
