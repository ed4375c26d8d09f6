//! Nullability constraints.
//!
//! Unlike every other atom, these two inspect the `Option` wrapper itself
//! rather than the value inside it, so they are implemented directly for
//! `Option<U>` instead of going through the `constraint!` macro.

use crate::constraints::Constraint;
use crate::foundation::Message;

// ============================================================================
// NOT NULL
// ============================================================================

/// Passes when an optional value is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotNull;

impl<U> Constraint<Option<U>> for NotNull {
    fn check(&self, value: &Option<U>) -> Option<Message> {
        if value.is_some() {
            None
        } else {
            Some(Message::Borrowed("Value cannot be null"))
        }
    }
}

// ============================================================================
// NULL
// ============================================================================

/// Passes when an optional value is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Null;

impl<U> Constraint<Option<U>> for Null {
    fn check(&self, value: &Option<U>) -> Option<Message> {
        if value.is_none() {
            None
        } else {
            Some(Message::Borrowed("Value must be null"))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_null_requires_a_value() {
        assert_eq!(NotNull.check(&Some(1)), None);
        assert_eq!(
            NotNull.check(&None::<i32>).as_deref(),
            Some("Value cannot be null"),
        );
    }

    #[test]
    fn null_requires_absence() {
        assert_eq!(Null.check(&None::<String>), None);
        assert_eq!(
            Null.check(&Some("x".to_string())).as_deref(),
            Some("Value must be null"),
        );
    }

    #[test]
    fn not_null_sees_the_wrapper_not_the_content() {
        // An empty string is still a present value.
        assert_eq!(NotNull.check(&Some(String::new())), None);
    }
}
