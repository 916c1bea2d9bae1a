//! Implements the writing of resolution traces.
//!
//! See [`TraceWriter`] for more information on how to write traces.

use std::io::BufWriter;
use std::io::Write;
use std::num::NonZeroI32;
use std::num::NonZeroU32;

use crate::steps::ClauseId;
use crate::steps::Deletion;
use crate::steps::Derivation;
use crate::steps::Hint;

/// Abstraction for writing resolution traces.
///
/// Clause identifiers are handed out by the writer in increasing order, starting at 1. Hints are
/// only written when they differ from the previously written hint.
///
/// # Example
/// ```
/// # use std::num::NonZeroI32;
/// # use lcg_trace::writer::TraceWriter;
/// let mut trace: Vec<u8> = Vec::new();
/// let mut writer = TraceWriter::new(&mut trace);
///
/// let lit = |num: i32| NonZeroI32::new(num).unwrap();
/// writer.set_hint(3).unwrap();
/// let axiom = writer.log_clause([lit(1), lit(-2)], []).unwrap();
/// let unit = writer.log_clause([lit(1)], []).unwrap();
/// writer.set_hint(0).unwrap();
/// let derived = writer.log_clause([lit(-2)], [axiom, unit]).unwrap();
/// writer.log_deletion(axiom).unwrap();
/// writer.log_clause([], [derived]).unwrap();
/// drop(writer);
///
/// let expected = "
/// c c3
/// 1 1 -2 0 0
/// 2 1 0 0
/// c -
/// 3 -2 0 1 2 0
/// d 1
/// 4 0 3 0
/// ";
/// assert_eq!(std::str::from_utf8(&trace).unwrap(), expected.trim_start());
/// ```
#[derive(Debug)]
pub struct TraceWriter<W: Write> {
    /// The writer to the underlying sink.
    writer: BufWriter<W>,
    /// The id for the next clause which is logged.
    next_clause_id: ClauseId,
    /// The hint which was written last; `0` when no hint is active.
    active_hint: u32,
}

impl<W: Write> TraceWriter<W> {
    /// Create a new trace writer which writes the trace to an underlying sink implementing
    /// [`Write`].
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            next_clause_id: NonZeroU32::MIN,
            active_hint: 0,
        }
    }

    /// The number of identifiers handed out so far.
    pub fn num_identifiers(&self) -> u32 {
        self.next_clause_id.get() - 1
    }

    /// Write a clause, justified by the given antecedents.
    ///
    /// The returned [`ClauseId`] is used to refer to the clause in later derivations and in its
    /// deletion. An empty `antecedents` list introduces the clause without a resolution chain.
    ///
    /// This function wraps an IO operation, which is why it can fail with an IO error.
    pub fn log_clause(
        &mut self,
        literals: impl IntoIterator<Item = NonZeroI32>,
        antecedents: impl IntoIterator<Item = ClauseId>,
    ) -> std::io::Result<ClauseId> {
        let id = self.next_clause_id();

        Derivation {
            id,
            literals,
            antecedents,
        }
        .write(&mut self.writer)?;

        Ok(id)
    }

    /// Log that the clause with the given ID will no longer be referenced.
    ///
    /// This function wraps an IO operation, which is why it can fail with an IO error.
    pub fn log_deletion(&mut self, id: ClauseId) -> std::io::Result<()> {
        Deletion::new(id).write(&mut self.writer)
    }

    /// Make `item` the origin of the clauses which follow. Item `0` clears the hint.
    ///
    /// Nothing is written if `item` is already the active hint.
    pub fn set_hint(&mut self, item: u32) -> std::io::Result<()> {
        if item == self.active_hint {
            return Ok(());
        }

        self.active_hint = item;
        Hint::from_item(item).write(&mut self.writer)
    }

    /// Flush the buffered trace and hand back the underlying sink.
    pub fn finish(self) -> std::io::Result<W> {
        self.writer.into_inner().map_err(|error| error.into_error())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    fn next_clause_id(&mut self) -> ClauseId {
        let id = self.next_clause_id;
        self.next_clause_id = self
            .next_clause_id
            .checked_add(1)
            .expect("fewer than u32::MAX clauses are logged");
        id
    }
}

trait WritableTraceStep: Sized {
    /// Write the trace step to the given sink.
    fn write(self, sink: &mut impl Write) -> std::io::Result<()>;
}

impl<Literals, Antecedents> WritableTraceStep for Derivation<Literals, Antecedents>
where
    Literals: IntoIterator<Item = NonZeroI32>,
    Antecedents: IntoIterator<Item = ClauseId>,
{
    fn write(self, sink: &mut impl Write) -> std::io::Result<()> {
        write!(sink, "{} ", self.id)?;

        for literal in self.literals {
            write!(sink, "{literal} ")?;
        }

        write!(sink, "0 ")?;

        for antecedent in self.antecedents {
            write!(sink, "{antecedent} ")?;
        }

        writeln!(sink, "0")
    }
}

impl WritableTraceStep for Deletion {
    fn write(self, sink: &mut impl Write) -> std::io::Result<()> {
        writeln!(sink, "d {}", self.id)
    }
}

impl WritableTraceStep for Hint {
    fn write(self, sink: &mut impl Write) -> std::io::Result<()> {
        match self {
            Hint::Item(item) => writeln!(sink, "c c{item}"),
            Hint::Cleared => writeln!(sink, "c -"),
        }
    }
}
