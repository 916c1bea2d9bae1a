use std::io::Read;
use std::io::Write;

use nom::bytes::complete::is_not;
use nom::bytes::complete::tag;
use nom::character::complete::multispace0;
use nom::combinator::all_consuming;
use nom::multi::separated_list0;
use nom::sequence::delimited;
use nom::sequence::separated_pair;
use nom::IResult;

use crate::reader::TraceError;

/// The model written next to a trace, as `[<name> = <value>, ...]`.
///
/// Boolean variables are written with value `0` or `1`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    assignments: Vec<(String, i64)>,
}

impl Solution {
    pub fn push(&mut self, name: impl Into<String>, value: i64) {
        self.assignments.push((name.into(), value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.assignments
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }

    /// Get the value of the first assignment to `name`.
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn write(&self, mut sink: impl Write) -> std::io::Result<()> {
        write!(sink, "[")?;

        for (index, (name, value)) in self.assignments.iter().enumerate() {
            if index > 0 {
                write!(sink, ", ")?;
            }
            write!(sink, "{name} = {value}")?;
        }

        write!(sink, "]")
    }

    /// Parse a solution as written by [`Solution::write`].
    ///
    /// # Example
    /// ```
    /// let solution = lcg_trace::Solution::parse("[lit_True = 1, x = -3]".as_bytes())
    ///     .expect("valid solution");
    ///
    /// assert_eq!(Some(-3), solution.value_of("x"));
    /// assert_eq!(2, solution.len());
    /// ```
    pub fn parse(mut source: impl Read) -> Result<Self, TraceError> {
        let mut content = String::new();
        let _ = source.read_to_string(&mut content)?;

        let (_, assignments) =
            all_consuming(solution)(content.trim()).map_err(|error| TraceError::parse(1, error))?;

        Ok(Solution {
            assignments: assignments
                .into_iter()
                .map(|(name, value)| (name.to_owned(), value))
                .collect(),
        })
    }
}

fn solution(input: &str) -> IResult<&str, Vec<(&str, i64)>> {
    delimited(
        tag("["),
        separated_list0(tag(", "), assignment),
        tag("]"),
    )(input)
}

/// `<name> = <value>`
fn assignment(input: &str) -> IResult<&str, (&str, i64)> {
    separated_pair(
        is_not(" =,]"),
        delimited(multispace0, tag("="), multispace0),
        nom::character::complete::i64,
    )(input)
}
