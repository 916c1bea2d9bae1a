use std::fmt::Display;
use std::ops::Index;
use std::ops::IndexMut;

use bitfield::Bit;
use bitfield::BitMut;
use bitfield::BitRange;
use bitfield::BitRangeMut;
use lcg_trace::steps::ClauseId;

use crate::basic_types::Literal;
use crate::lcg_assert_moderate;
use crate::lcg_assert_simple;

const SIZE_MSB: usize = 23;
const SIZE_LSB: usize = 0;
const LEARNT_BIT: usize = 24;
const TEMPORARY_BIT: usize = 25;
const DELETED_BIT: usize = 26;

/// The largest number of literals a clause can hold.
pub(crate) const MAX_CLAUSE_SIZE: usize = (1 << (SIZE_MSB + 1)) - 1;

/// A disjunction of literals.
///
/// The first two literals are the watched ones. When the clause is the reason for a literal,
/// that literal is at position 0 and every other literal is false.
///
/// The logical size is kept in the header and may be smaller than the allocated literal storage,
/// which allows clauses to be shrunk in place and scratch clauses to be reused for explanations
/// of different lengths.
#[derive(Clone, Debug)]
pub(crate) struct Clause {
    header: u32,
    literals: Vec<Literal>,
    activity: f32,
    /// The identifier in the proof trace, if the clause has been logged.
    pub(crate) ident: Option<ClauseId>,
    /// The proof item which was active when the clause was created.
    pub(crate) origin: u32,
}

impl Clause {
    pub(crate) fn new(literals: Vec<Literal>, learnt: bool, origin: u32) -> Clause {
        lcg_assert_simple!(literals.len() <= MAX_CLAUSE_SIZE);

        let mut clause = Clause {
            header: 0,
            literals,
            activity: 0.0,
            ident: None,
            origin,
        };
        clause.set_size(clause.literals.len());
        clause.header.set_bit(LEARNT_BIT, learnt);
        clause
    }

    /// A clause used to materialise explanations. Its literals are overwritten whenever it is
    /// used, and every use gets a fresh proof identifier.
    pub(crate) fn temporary(size: usize, origin: u32) -> Clause {
        let placeholder = Literal::from_u32(0);
        Clause::explanation(vec![placeholder; size], origin)
    }

    /// A temporary clause with the given content, e.g. an explanation provided by a propagator.
    pub(crate) fn explanation(literals: Vec<Literal>, origin: u32) -> Clause {
        let mut clause = Clause::new(literals, false, origin);
        clause.header.set_bit(TEMPORARY_BIT, true);
        clause
    }

    pub(crate) fn len(&self) -> usize {
        let size: u32 = self.header.bit_range(SIZE_MSB, SIZE_LSB);
        size as usize
    }

    pub(crate) fn is_learnt(&self) -> bool {
        self.header.bit(LEARNT_BIT)
    }

    pub(crate) fn is_temporary(&self) -> bool {
        self.header.bit(TEMPORARY_BIT)
    }

    pub(crate) fn is_deleted(&self) -> bool {
        self.header.bit(DELETED_BIT)
    }

    pub(crate) fn mark_deleted(&mut self) {
        lcg_assert_moderate!(!self.is_deleted());
        self.header.set_bit(DELETED_BIT, true);
    }

    pub(crate) fn literals(&self) -> &[Literal] {
        &self.literals[..self.len()]
    }

    /// Drop every literal from position `new_size` onwards.
    pub(crate) fn shrink(&mut self, new_size: usize) {
        lcg_assert_simple!(new_size <= self.len());
        self.set_size(new_size);
    }

    /// Change the logical size, growing the storage if needed. Only meant for scratch clauses.
    pub(crate) fn resize(&mut self, new_size: usize) {
        lcg_assert_moderate!(self.is_temporary() || !self.is_learnt());
        if new_size > self.literals.len() {
            self.literals.resize(new_size, Literal::from_u32(0));
        }
        self.set_size(new_size);
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        let len = self.len();
        self.literals[..len].swap(a, b)
    }

    pub(crate) fn activity(&self) -> f32 {
        self.activity
    }

    pub(crate) fn bump_activity(&mut self, increment: f32) {
        self.activity += increment;
    }

    pub(crate) fn divide_activity(&mut self, divisor: f32) {
        self.activity /= divisor;
    }

    fn set_size(&mut self, size: usize) {
        lcg_assert_simple!(size <= MAX_CLAUSE_SIZE);
        self.header.set_bit_range(SIZE_MSB, SIZE_LSB, size as u32);
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Literal {
        &self.literals()[index]
    }
}

impl IndexMut<usize> for Clause {
    fn index_mut(&mut self, index: usize) -> &mut Literal {
        let len = self.len();
        &mut self.literals[..len][index]
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let literals = self
            .literals()
            .iter()
            .map(|literal| literal.to_string())
            .collect::<Vec<_>>()
            .join(" v ");

        write!(f, "({literals})[learnt: {}]", self.is_learnt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::BooleanVariable;

    fn literal(index: u32) -> Literal {
        Literal::positive(BooleanVariable::new(index))
    }

    #[test]
    fn header_keeps_flags_and_size_apart() {
        let clause = Clause::new(vec![literal(2), literal(3), literal(4)], true, 7);

        assert_eq!(3, clause.len());
        assert!(clause.is_learnt());
        assert!(!clause.is_temporary());
        assert!(!clause.is_deleted());
        assert_eq!(7, clause.origin);
    }

    #[test]
    fn shrinking_hides_trailing_literals() {
        let mut clause = Clause::new(vec![literal(2), literal(3), literal(4)], false, 0);
        clause.shrink(2);

        assert_eq!(&[literal(2), literal(3)], clause.literals());
        assert!(!clause.is_learnt());
    }

    #[test]
    fn temporary_clause_can_grow_again() {
        let mut clause = Clause::temporary(3, 0);
        clause.resize(2);
        assert_eq!(2, clause.len());

        clause.resize(3);
        clause[2] = literal(9);
        assert_eq!(literal(9), clause.literals()[2]);
        assert!(clause.is_temporary());
    }
}
