//! The built-in constraint catalog.
//!
//! Each constraint is a small, immutable value: its parameters are fixed at
//! declaration time, and [`Constraint::check`] inspects one value at a time.
//! Chain builder methods (`not_empty()`, `less_than(..)`, ...) construct
//! these atoms and lift them over the field's shape, so most callers never
//! name them directly. They exist as standalone types for direct use and
//! for tests.
//!
//! # Categories
//!
//! - **Equality**: [`Equal`], [`NotEqual`]
//! - **String**: [`NotEmpty`], [`Length`], [`MinLength`], [`MaxLength`],
//!   [`Matches`], [`EmailAddress`]
//! - **Ordering**: [`LessThan`], [`LessThanOrEqual`], [`GreaterThan`],
//!   [`GreaterThanOrEqual`], [`InclusiveBetween`], [`ExclusiveBetween`]
//! - **Numeric shape**: [`ScalePrecision`]
//! - **Nullability**: [`NotNull`], [`Null`]
//!
//! # Examples
//!
//! ```rust,ignore
//! use verdict::constraints::{Constraint, MinLength};
//!
//! let atom = MinLength::new(3);
//! assert!(atom.check("abc").is_none());
//! assert_eq!(
//!     atom.check("ab").as_deref(),
//!     Some("Value must be at least 3 characters long"),
//! );
//! ```

pub mod equality;
pub mod length;
pub mod nullable;
pub mod pattern;
pub mod precision;
pub mod range;

pub use equality::{Equal, NotEqual};
pub use length::{Length, MaxLength, MinLength, NotEmpty};
pub use nullable::{NotNull, Null};
pub use pattern::{EmailAddress, Matches};
pub use precision::ScalePrecision;
pub use range::{
    ExclusiveBetween, GreaterThan, GreaterThanOrEqual, InclusiveBetween, LessThan,
    LessThanOrEqual,
};

use crate::foundation::Message;

// ============================================================================
// CONSTRAINT TRAIT
// ============================================================================

/// One reusable check against a value of type `V`.
///
/// Returns `None` when the value passes and the failure message otherwise.
/// Messages are formatted only on failure, so check bodies stay allocation
/// free on the passing path.
pub trait Constraint<V: ?Sized> {
    /// Checks one value.
    fn check(&self, value: &V) -> Option<Message>;
}
