use super::ClauseReference;
use crate::basic_types::Literal;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagatorId;

/// An entry in the watch list of a literal, visited when that literal becomes true.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WatchElem {
    /// A clause in which the negation of the literal is one of the two watched literals.
    Clause(ClauseReference),
    /// A binary clause which is not allocated; `other` is its remaining literal.
    Binary { other: Literal },
    /// A propagator subscribed to the literal, with the identifier it registered under.
    Wakeup {
        propagator: PropagatorId,
        local_id: LocalId,
    },
}
