//! Integer variables whose domains are mirrored by Boolean channel literals.
mod domains;
mod int_var_el;
mod value_ranges;

use std::fmt::Display;

pub(crate) use domains::Domains;
use enumset::EnumSetType;
pub(crate) use int_var_el::IntVarEl;
pub(crate) use value_ranges::ValueRanges;

use crate::containers::StorageKey;

/// A handle to an integer variable of the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntVarId(u32);

impl IntVarId {
    pub fn new(index: u32) -> IntVarId {
        IntVarId(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl Display for IntVarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "i{}", self.0)
    }
}

impl StorageKey for IntVarId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        IntVarId(index as u32)
    }
}

/// The ways in which a domain can shrink. Propagators subscribe to a set of these.
#[derive(Debug, EnumSetType, Hash)]
pub enum DomainEvent {
    /// Any value was removed.
    Change,
    LowerBound,
    UpperBound,
    /// The domain became a single value.
    Fix,
}

/// The four families of channel literals of an integer variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralType {
    /// `[x != v]`
    Ne,
    /// `[x = v]`
    Eq,
    /// `[x >= v]`
    Ge,
    /// `[x <= v]`
    Le,
}
