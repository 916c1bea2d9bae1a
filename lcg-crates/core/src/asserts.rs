//! Internal consistency checks, graded by what they cost.
//!
//! Release builds run the simple checks only. Tests and the `debug-checks` feature add the
//! moderate ones.

pub const LCG_ASSERT_SIMPLE: u8 = 1;
pub const LCG_ASSERT_MODERATE: u8 = 2;

/// The most expensive grade of checks which is compiled in.
#[cfg(not(any(test, feature = "debug-checks")))]
pub const LCG_ASSERT_LEVEL_DEFINITION: u8 = LCG_ASSERT_SIMPLE;
#[cfg(any(test, feature = "debug-checks"))]
pub const LCG_ASSERT_LEVEL_DEFINITION: u8 = LCG_ASSERT_MODERATE;

/// A check of constant cost, e.g. that a literal is not assigned twice.
#[macro_export]
#[doc(hidden)]
macro_rules! lcg_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::LCG_ASSERT_LEVEL_DEFINITION >= $crate::asserts::LCG_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

/// A check which may walk over one clause or one explanation.
#[macro_export]
#[doc(hidden)]
macro_rules! lcg_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::LCG_ASSERT_LEVEL_DEFINITION >= $crate::asserts::LCG_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}
