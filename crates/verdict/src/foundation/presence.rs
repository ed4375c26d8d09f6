//! Presence lifting over optional, boxed, and borrowed field shapes.
//!
//! Rule chains are declared against the field type exactly as the accessor
//! returns it: `String`, `Option<String>`, `Option<Box<Employee>>`, and so
//! on. Constraints, on the other hand, are written once against the value
//! they actually inspect (`str`, `i64`, `Employee`). [`Presence`] bridges
//! the two: it projects a field into `Option<&V>`, where `None` means the
//! value is absent.
//!
//! Every lifted rule treats an absent value as a pass. Requiring a value to
//! exist is its own rule (`not_null`), so "must be present" and "must be
//! well-formed when present" stay independently composable:
//!
//! ```rust,ignore
//! // None      -> "Value cannot be null"
//! // Some("")  -> "Value cannot be empty"
//! // Some("x") -> passes both
//! validator
//!     .rule_for("nickname", |m: &Profile| &m.nickname)
//!     .not_null()
//!     .not_empty();
//! ```

/// Projects a field into the value its rules inspect, when one is present.
///
/// `F: Presence<V>` reads as "a field of type `F` may hold a `V`". The
/// implementations below cover the shapes model structs actually use:
///
/// | Field type        | Checked value |
/// |-------------------|---------------|
/// | `V`               | `V`           |
/// | `Option<V>`       | `V`           |
/// | `Box<V>`          | `V`           |
/// | `Option<Box<V>>`  | `V`           |
/// | `String`          | `str`         |
/// | `Option<String>`  | `str`         |
/// | `Vec<E>`          | `[E]`         |
/// | `Option<Vec<E>>`  | `[E]`         |
pub trait Presence<V: ?Sized> {
    /// The contained value, or `None` when the field is absent.
    fn present(&self) -> Option<&V>;
}

// ============================================================================
// WRAPPER SHAPES
// ============================================================================

impl<V: ?Sized> Presence<V> for V {
    #[inline]
    fn present(&self) -> Option<&V> {
        Some(self)
    }
}

impl<V> Presence<V> for Option<V> {
    #[inline]
    fn present(&self) -> Option<&V> {
        self.as_ref()
    }
}

impl<V: ?Sized> Presence<V> for Box<V> {
    #[inline]
    fn present(&self) -> Option<&V> {
        Some(self.as_ref())
    }
}

impl<V: ?Sized> Presence<V> for Option<Box<V>> {
    #[inline]
    fn present(&self) -> Option<&V> {
        self.as_deref()
    }
}

// ============================================================================
// TEXT SHAPES
// ============================================================================

impl Presence<str> for String {
    #[inline]
    fn present(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl Presence<str> for Option<String> {
    #[inline]
    fn present(&self) -> Option<&str> {
        self.as_deref()
    }
}

// ============================================================================
// SEQUENCE SHAPES
// ============================================================================

impl<E> Presence<[E]> for Vec<E> {
    #[inline]
    fn present(&self) -> Option<&[E]> {
        Some(self.as_slice())
    }
}

impl<E> Presence<[E]> for Option<Vec<E>> {
    #[inline]
    fn present(&self) -> Option<&[E]> {
        self.as_deref()
    }
}

// ============================================================================
// TESTS
// ============================================================================
