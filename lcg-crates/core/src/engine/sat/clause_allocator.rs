use std::fmt::Debug;
use std::fmt::Formatter;
use std::ops::Index;
use std::ops::IndexMut;

use super::Clause;
use crate::lcg_assert_moderate;

/// An opaque handle to a clause owned by the [`ClauseAllocator`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClauseReference {
    id: u32,
}

impl Debug for ClauseReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClauseReference({})", self.id)
    }
}

/// Owns the memory of every clause. Freed slots are recycled for later allocations.
#[derive(Debug, Default)]
pub(crate) struct ClauseAllocator {
    clauses: Vec<Clause>,
    free_slots: Vec<ClauseReference>,
}

impl ClauseAllocator {
    pub(crate) fn allocate(&mut self, clause: Clause) -> ClauseReference {
        match self.free_slots.pop() {
            Some(reference) => {
                self.clauses[reference.id as usize] = clause;
                reference
            }
            None => {
                self.clauses.push(clause);
                ClauseReference {
                    id: self.clauses.len() as u32 - 1,
                }
            }
        }
    }

    pub(crate) fn free(&mut self, reference: ClauseReference) {
        self[reference].mark_deleted();
        self.free_slots.push(reference);
    }

    /// The number of clauses which are currently alive.
    pub(crate) fn num_allocated(&self) -> usize {
        self.clauses.len() - self.free_slots.len()
    }
}

impl Index<ClauseReference> for ClauseAllocator {
    type Output = Clause;

    fn index(&self, reference: ClauseReference) -> &Clause {
        let clause = &self.clauses[reference.id as usize];
        lcg_assert_moderate!(!clause.is_deleted(), "use of freed clause {reference:?}");
        clause
    }
}

impl IndexMut<ClauseReference> for ClauseAllocator {
    fn index_mut(&mut self, reference: ClauseReference) -> &mut Clause {
        let clause = &mut self.clauses[reference.id as usize];
        lcg_assert_moderate!(!clause.is_deleted(), "use of freed clause {reference:?}");
        clause
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::BooleanVariable;
    use crate::basic_types::Literal;

    #[test]
    fn freed_slots_are_reused() {
        let literal = Literal::positive(BooleanVariable::new(3));
        let mut allocator = ClauseAllocator::default();

        let first = allocator.allocate(Clause::new(vec![literal, !literal], false, 0));
        let second = allocator.allocate(Clause::new(vec![!literal, literal], false, 0));
        allocator.free(first);
        assert_eq!(1, allocator.num_allocated());

        let third = allocator.allocate(Clause::new(vec![literal], true, 0));

        assert_eq!(first, third);
        assert_ne!(second, third);
        assert!(allocator[third].is_learnt());
    }
}
