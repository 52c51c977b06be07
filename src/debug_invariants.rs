//! Structural self-checks for graph containers.
//!
//! Implementors only describe how to validate themselves; the assertion
//! wrapper is compiled in for debug builds or with the `check-invariants`
//! feature and is a no-op otherwise.

use crate::morse_error::MorseError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation found.
    fn validate_invariants(&self) -> Result<(), MorseError>;

    /// Panic on a violation when invariant checking is enabled.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), std::any::type_name::<Self>());
    }
}

/// Run a fallible check and panic with `context` on error when invariant
/// checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $context:expr) => {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!("[invariants] {}: {}", $context, e);
        }
    };
}
