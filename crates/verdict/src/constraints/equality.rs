//! Equality constraints.

use std::fmt::Display;

// ============================================================================
// EQUAL
// ============================================================================

crate::constraint! {
    /// Passes when the value equals a fixed comparison value.
    pub Equal<V: PartialEq + Display> { other: V } for V;
    rule(self, value) { value == &self.other }
    message(self, value) { format!("Value must equal '{}'", self.other) }
}

// ============================================================================
// NOT EQUAL
// ============================================================================

crate::constraint! {
    /// Passes when the value differs from a fixed comparison value.
    pub NotEqual<V: PartialEq + Display> { other: V } for V;
    rule(self, value) { value != &self.other }
    message(self, value) { format!("Value must not equal '{}'", self.other) }
}

// ============================================================================
// TESTS
// ============================================================================
