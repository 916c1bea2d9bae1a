//! The module containing the individual trace steps.
use std::num::NonZeroI32;
use std::num::NonZeroU32;

/// The identifier of a clause in the trace.
pub type ClauseId = NonZeroU32;

/// A clause which is added to the trace.
///
/// Without antecedents the clause is an introduction: either an input clause or an inference
/// whose justification the checker has to reconstruct itself. With antecedents, the clause is
/// derived by resolving the antecedents in the given order. A derivation without literals is the
/// empty clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Derivation<Literals, Antecedents> {
    pub id: ClauseId,
    pub literals: Literals,
    pub antecedents: Antecedents,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deletion {
    pub id: ClauseId,
}

impl Deletion {
    pub fn new(id: ClauseId) -> Self {
        Self { id }
    }
}

/// Marks which constraint (item) produced the clauses that follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    /// The following clauses originate from the item with the given identifier.
    Item(NonZeroU32),
    /// The following clauses have no associated item.
    Cleared,
}

impl Hint {
    /// Create the hint for an item, where item `0` means no item.
    pub fn from_item(item: u32) -> Hint {
        NonZeroU32::new(item).map_or(Hint::Cleared, Hint::Item)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step<Literals, Antecedents> {
    Derivation(Derivation<Literals, Antecedents>),
    Delete(Deletion),
    Hint(Hint),
}

/// The step type produced by [`crate::reader::TraceReader`].
pub type ReadStep = Step<Vec<NonZeroI32>, Vec<ClauseId>>;
