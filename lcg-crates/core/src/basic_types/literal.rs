use std::fmt::Display;
use std::num::NonZeroI32;
use std::ops::Not;

use crate::containers::StorageKey;
use crate::lcg_assert_moderate;

/// A Boolean variable of the SAT engine.
///
/// Variable 0 is fixed to true and variable 1 to false when the engine is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BooleanVariable {
    index: u32,
}

impl BooleanVariable {
    pub fn new(index: u32) -> BooleanVariable {
        BooleanVariable { index }
    }

    pub fn index(self) -> u32 {
        self.index
    }

    /// The variable as it appears in a proof trace, i.e. 1-based.
    pub fn trace_index(self) -> u32 {
        self.index + 1
    }
}

impl Display for BooleanVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.index)
    }
}

impl StorageKey for BooleanVariable {
    fn index(&self) -> usize {
        self.index as usize
    }

    fn create_from_index(index: usize) -> Self {
        BooleanVariable::new(index as u32)
    }
}

/// A Boolean variable or its negation.
///
/// The code of a literal is `2 * variable + negated`, so the two literals of a variable are
/// adjacent and the positive one is even.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    code: u32,
}

impl Literal {
    pub fn new(variable: BooleanVariable, is_positive: bool) -> Literal {
        Literal {
            code: variable.index * 2 + u32::from(!is_positive),
        }
    }

    pub fn positive(variable: BooleanVariable) -> Literal {
        Literal::new(variable, true)
    }

    pub fn is_positive(self) -> bool {
        self.code & 1 == 0
    }

    pub fn is_negative(self) -> bool {
        !self.is_positive()
    }

    pub fn variable(self) -> BooleanVariable {
        BooleanVariable::new(self.code / 2)
    }

    pub fn to_u32(self) -> u32 {
        self.code
    }

    pub fn from_u32(code: u32) -> Literal {
        Literal { code }
    }

    /// The signed, 1-based form used in proof traces and DIMACS.
    pub fn to_trace_literal(self) -> NonZeroI32 {
        let magnitude = self.variable().trace_index() as i32;
        let signed = if self.is_positive() {
            magnitude
        } else {
            -magnitude
        };
        NonZeroI32::new(signed).expect("trace indices start at one")
    }

    /// The inverse of [`Literal::to_trace_literal`].
    pub fn from_trace_literal(literal: NonZeroI32) -> Literal {
        let variable = BooleanVariable::new(literal.unsigned_abs().get() - 1);
        let result = Literal::new(variable, literal.get() > 0);
        lcg_assert_moderate!(result.to_trace_literal() == literal);
        result
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_negative() {
            write!(f, "~{}", self.variable())
        } else {
            write!(f, "{}", self.variable())
        }
    }
}

impl StorageKey for Literal {
    fn index(&self) -> usize {
        self.code as usize
    }

    fn create_from_index(index: usize) -> Self {
        Literal::from_u32(index as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_flips_only_the_polarity() {
        let literal = Literal::new(BooleanVariable::new(5), true);

        assert!(literal.is_positive());
        assert!((!literal).is_negative());
        assert_eq!(literal.variable(), (!literal).variable());
        assert_eq!(literal, !!literal);
    }

    #[test]
    fn trace_literals_are_one_based_and_signed() {
        let variable = BooleanVariable::new(2);

        assert_eq!(3, Literal::positive(variable).to_trace_literal().get());
        assert_eq!(-3, (!Literal::positive(variable)).to_trace_literal().get());
        assert_eq!(
            !Literal::positive(variable),
            Literal::from_trace_literal(NonZeroI32::new(-3).unwrap())
        );
    }
}
