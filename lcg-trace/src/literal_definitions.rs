use std::collections::BTreeMap;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::num::NonZeroU32;

use nom::branch::alt;
use nom::bytes::complete::is_not;
use nom::bytes::complete::tag;
use nom::character::complete::space1;
use nom::combinator::all_consuming;
use nom::combinator::map;
use nom::combinator::map_opt;
use nom::combinator::value;
use nom::sequence::delimited;
use nom::sequence::separated_pair;
use nom::sequence::tuple;
use nom::IResult;

use crate::reader::TraceError;
use crate::Atom;
use crate::Relation;

/// The name of the constant which is true in every model.
pub const TRUE_CONSTANT: &str = "lit_True";

/// Associates the Boolean variables of a trace with the [`Atom`]s they stand for.
///
/// Each line of the serialized form is `<variable> [<name> <relation> <value>]`, with the
/// variable 1-based. A variable may be defined on several lines, in which case all atoms are
/// kept in the order they were encountered.
#[derive(Clone, Debug, Default)]
pub struct LiteralDefinitions {
    definitions: BTreeMap<NonZeroU32, Vec<Atom>>,
}

impl LiteralDefinitions {
    /// Parse from a source as written to by [`LiteralDefinitions::write`] or
    /// [`write_definition`].
    ///
    /// # Example
    /// ```
    /// use std::num::NonZero;
    ///
    /// use lcg_trace::Atom;
    /// use lcg_trace::LiteralDefinitions;
    /// use lcg_trace::Relation;
    ///
    /// let source = r#"
    /// 1 [lit_True >= 1]
    /// 2 [lit_True < 1]
    /// 3 [x = 0]
    /// 7 [x > 0]
    /// "#;
    ///
    /// let definitions = LiteralDefinitions::parse(source.as_bytes()).expect("valid lits file");
    ///
    /// assert_eq!(
    ///     Some([Atom::new("x".to_owned(), Relation::GreaterThan, 0)].as_slice()),
    ///     definitions.get(NonZero::new(7).unwrap())
    /// );
    /// assert_eq!(None, definitions.get(NonZero::new(4).unwrap()));
    /// ```
    pub fn parse(source: impl Read) -> Result<Self, TraceError> {
        let mut reader = BufReader::new(source);
        let mut buffer = String::new();
        let mut line_nr = 0;

        let mut definitions = LiteralDefinitions::default();

        loop {
            buffer.clear();
            let read_bytes = reader.read_line(&mut buffer)?;
            line_nr += 1;

            if read_bytes == 0 {
                break;
            }

            if buffer.trim().is_empty() {
                continue;
            }

            let (_, (variable, atom)) = all_consuming(definition)(buffer.trim())
                .map_err(|error| TraceError::parse(line_nr, error))?;

            definitions.add(variable, atom);
        }

        Ok(definitions)
    }

    /// Add a new definition.
    pub fn add(&mut self, variable: NonZeroU32, atom: Atom) {
        self.definitions.entry(variable).or_default().push(atom);
    }

    /// Get the atoms defined for a variable.
    pub fn get(&self, variable: NonZeroU32) -> Option<&[Atom]> {
        self.definitions.get(&variable).map(|atoms| atoms.as_slice())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Write out all the definitions, ordered by variable.
    pub fn write(&self, mut sink: impl Write) -> std::io::Result<()> {
        for (variable, atoms) in self.definitions.iter() {
            for atom in atoms {
                write_definition(&mut sink, *variable, atom)?;
            }
        }

        Ok(())
    }
}

/// Write a single definition line.
pub fn write_definition(
    sink: &mut impl Write,
    variable: NonZeroU32,
    atom: &Atom<impl std::fmt::Display>,
) -> std::io::Result<()> {
    writeln!(sink, "{variable} {atom}")
}

/// `<variable> [<name> <relation> <value>]`
fn definition(input: &str) -> IResult<&str, (NonZeroU32, Atom)> {
    separated_pair(variable, space1, atom)(input)
}

fn variable(input: &str) -> IResult<&str, NonZeroU32> {
    map_opt(nom::character::complete::u32, NonZeroU32::new)(input)
}

fn atom(input: &str) -> IResult<&str, Atom> {
    let inner = tuple((
        is_not(" ]"),
        delimited(space1, relation, space1),
        nom::character::complete::i64,
    ));

    delimited(
        tag("["),
        map(inner, |(name, relation, value): (&str, Relation, i64)| {
            Atom::new(name.to_owned(), relation, value)
        }),
        tag("]"),
    )(input)
}

fn relation(input: &str) -> IResult<&str, Relation> {
    alt((
        value(Relation::NotEqual, tag("!=")),
        value(Relation::LessThanEqual, tag("<=")),
        value(Relation::GreaterThanEqual, tag(">=")),
        value(Relation::LessThan, tag("<")),
        value(Relation::GreaterThan, tag(">")),
        value(Relation::Equal, tag("=")),
    ))(input)
}
