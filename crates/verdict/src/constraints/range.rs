//! Ordering and range constraints.
//!
//! All six atoms are generic over any `PartialOrd + Display` value, so they
//! serve integers, floats, dates, and any ordered domain type alike.

use std::fmt::Display;

// ============================================================================
// LESS THAN
// ============================================================================

crate::constraint! {
    /// Passes when the value is strictly below the bound.
    pub LessThan<V: PartialOrd + Display> { bound: V } for V;
    rule(self, value) { value < &self.bound }
    message(self, value) { format!("Value must be less than {}", self.bound) }
}

// ============================================================================
// LESS THAN OR EQUAL
// ============================================================================

crate::constraint! {
    /// Passes when the value is at most the bound.
    pub LessThanOrEqual<V: PartialOrd + Display> { bound: V } for V;
    rule(self, value) { value <= &self.bound }
    message(self, value) {
        format!("Value must be less than or equal to {}", self.bound)
    }
}

// ============================================================================
// GREATER THAN
// ============================================================================

crate::constraint! {
    /// Passes when the value is strictly above the bound.
    pub GreaterThan<V: PartialOrd + Display> { bound: V } for V;
    rule(self, value) { value > &self.bound }
    message(self, value) { format!("Value must be greater than {}", self.bound) }
}

// ============================================================================
// GREATER THAN OR EQUAL
// ============================================================================

crate::constraint! {
    /// Passes when the value is at least the bound.
    pub GreaterThanOrEqual<V: PartialOrd + Display> { bound: V } for V;
    rule(self, value) { value >= &self.bound }
    message(self, value) {
        format!("Value must be greater than or equal to {}", self.bound)
    }
}

// ============================================================================
// INCLUSIVE BETWEEN
// ============================================================================

crate::constraint! {
    /// Passes when the value lies within `lower..=upper`.
    pub InclusiveBetween<V: PartialOrd + Display> { lower: V, upper: V } for V;
    rule(self, value) { value >= &self.lower && value <= &self.upper }
    message(self, value) {
        format!(
            "Value must be between {} and {} (inclusive)",
            self.lower, self.upper,
        )
    }
}

// ============================================================================
// EXCLUSIVE BETWEEN
// ============================================================================

crate::constraint! {
    /// Passes when the value lies strictly between `lower` and `upper`.
    pub ExclusiveBetween<V: PartialOrd + Display> { lower: V, upper: V } for V;
    rule(self, value) { value > &self.lower && value < &self.upper }
    message(self, value) {
        format!(
            "Value must be between {} and {} (exclusive)",
            self.lower, self.upper,
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
