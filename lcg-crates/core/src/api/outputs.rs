use crate::basic_types::BooleanVariable;
use crate::basic_types::Literal;
use crate::containers::KeyedVec;
use crate::engine::variables::IntVarId;

/// The outcome of [`crate::Solver::solve`].
#[derive(Clone, Debug)]
#[allow(
    variant_size_differences,
    reason = "a result is returned once per call to solve"
)]
pub enum SatisfactionResult {
    Satisfiable(Solution),
    Unsatisfiable,
}

impl SatisfactionResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatisfactionResult::Satisfiable(_))
    }
}

/// A snapshot of the assignment in which search ended.
///
/// Integer variables whose domain was not fixed take their lower bound. Boolean variables which
/// were left unassigned are reported as false.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub(crate) integers: KeyedVec<IntVarId, i32>,
    pub(crate) booleans: KeyedVec<BooleanVariable, bool>,
}

impl Solution {
    pub fn integer_value(&self, variable: IntVarId) -> i32 {
        self.integers[variable]
    }

    pub fn literal_value(&self, literal: Literal) -> bool {
        self.booleans[literal.variable()] != literal.is_negative()
    }

    pub fn num_integers(&self) -> usize {
        self.integers.len()
    }

    pub fn num_booleans(&self) -> usize {
        self.booleans.len()
    }
}
