//! Levelled assertion macros.
//!
//! The level is a compile-time constant: asserts above the configured level
//! compile to nothing. Simple asserts guard cheap preconditions and stay on in
//! release builds; moderate and extreme asserts are for debugging sessions.

#[cfg(feature = "debug-checks")]
pub(crate) const QUINCE_ASSERT_LEVEL_DEFINITION: u8 = QUINCE_ASSERT_EXTREME;
#[cfg(not(feature = "debug-checks"))]
pub(crate) const QUINCE_ASSERT_LEVEL_DEFINITION: u8 = QUINCE_ASSERT_SIMPLE;

pub(crate) const QUINCE_ASSERT_SIMPLE: u8 = 1;
pub(crate) const QUINCE_ASSERT_MODERATE: u8 = 2;
pub(crate) const QUINCE_ASSERT_EXTREME: u8 = 3;

macro_rules! quince_assert_simple {
    ($($arg:tt)*) => {
        if $crate::quince_asserts::QUINCE_ASSERT_LEVEL_DEFINITION >= $crate::quince_asserts::QUINCE_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

macro_rules! quince_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::quince_asserts::QUINCE_ASSERT_LEVEL_DEFINITION >= $crate::quince_asserts::QUINCE_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

macro_rules! quince_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::quince_asserts::QUINCE_ASSERT_LEVEL_DEFINITION >= $crate::quince_asserts::QUINCE_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}

pub(crate) use quince_assert_extreme;
pub(crate) use quince_assert_moderate;
pub(crate) use quince_assert_simple;
