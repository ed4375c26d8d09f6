//! Macro for declaring catalog constraints with minimal boilerplate.
//!
//! [`constraint!`] expands to a struct, an inherent constructor, and a
//! [`Constraint`](crate::constraints::Constraint) implementation built from
//! a `rule` block (pass/fail predicate) and a `message` block (the failure
//! text, formatted lazily on failure only).
//!
//! # Examples
//!
//! ```rust,ignore
//! use verdict::constraint;
//!
//! // Unit constraint (no fields)
//! constraint! {
//!     pub NotEmpty for str;
//!     rule(value) { !value.trim().is_empty() }
//!     message(value) { "Value cannot be empty" }
//! }
//!
//! // Struct with fields
//! constraint! {
//!     pub MinLength { min: usize } for str;
//!     rule(self, value) { value.chars().count() >= self.min }
//!     message(self, value) {
//!         format!("Value must be at least {} characters long", self.min)
//!     }
//! }
//! ```

// ============================================================================
// CONSTRAINT MACRO
// ============================================================================

/// Declares a catalog constraint: struct definition, constructor, and
/// `Constraint` implementation.
///
/// `#[derive(Debug, Clone)]` is always applied. Add extra derives via
/// `#[derive(...)]`.
///
/// # Variants
///
/// **Unit constraint** (zero-sized, no fields):
/// ```rust,ignore
/// constraint! {
///     pub NotEmpty for str;
///     rule(value) { !value.trim().is_empty() }
///     message(value) { "Value cannot be empty" }
/// }
/// ```
///
/// **Struct with fields** (auto `new` from all fields):
/// ```rust,ignore
/// constraint! {
///     pub MaxLength { max: usize } for str;
///     rule(self, value) { value.chars().count() <= self.max }
///     message(self, value) {
///         format!("Value must be no more than {} characters long", self.max)
///     }
/// }
/// ```
///
/// **Custom constructor** (overrides auto `new`):
/// ```rust,ignore
/// constraint! {
///     pub EmailAddress { pattern: regex::Regex } for str;
///     rule(self, value) { self.pattern.is_match(value) }
///     message(self, value) { "Not a valid email address" }
///     new() { Self { pattern: EMAIL_REGEX.clone() } }
/// }
/// ```
///
/// **Generic constraint** (single type parameter, simple-identifier bounds):
/// ```rust,ignore
/// constraint! {
///     pub LessThan<V: PartialOrd + Display> { bound: V } for V;
///     rule(self, value) { value < &self.bound }
///     message(self, value) { format!("Value must be less than {}", self.bound) }
/// }
/// ```
#[macro_export]
macro_rules! constraint {
    // ── Variant 1: Unit constraint (no fields) ────────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident for $input:ty;
        rule($inp:ident) $rule:block
        message($minp:ident) $msg:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::constraints::Constraint<$input> for $name {
            #[allow(unused_variables)]
            fn check(&self, $inp: &$input) -> Option<$crate::foundation::Message> {
                if $rule {
                    None
                } else {
                    let $minp = $inp;
                    Some(($msg).into())
                }
            }
        }
    };

    // ── Variant 2: Struct with fields + custom new ────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? } for $input:ty;
        rule($self_:ident, $inp:ident) $rule:block
        message($self2:ident, $minp:ident) $msg:block
        new($($narg:ident: $naty:ty),* $(,)?) $new_body:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        #[allow(clippy::new_without_default)]
        impl $name {
            #[must_use]
            pub fn new($($narg: $naty),*) -> Self $new_body
        }

        impl $crate::constraints::Constraint<$input> for $name {
            #[allow(unused_variables)]
            fn check(&$self_, $inp: &$input) -> Option<$crate::foundation::Message> {
                if $rule {
                    None
                } else {
                    let $minp = $inp;
                    Some(($msg).into())
                }
            }
        }
    };

    // ── Variant 3: Struct with fields + auto new ──────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? } for $input:ty;
        rule($self_:ident, $inp:ident) $rule:block
        message($self2:ident, $minp:ident) $msg:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        impl $name {
            #[must_use]
            pub fn new($($field: $fty),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl $crate::constraints::Constraint<$input> for $name {
            #[allow(unused_variables)]
            fn check(&$self_, $inp: &$input) -> Option<$crate::foundation::Message> {
                if $rule {
                    None
                } else {
                    let $minp = $inp;
                    Some(($msg).into())
                }
            }
        }
    };

    // ── Variant 4: Generic struct + auto new ──────────────────────────────
    //
    // Supports a single generic type parameter with one or more trait bounds.
    // Bounds must be simple identifiers (use imports for paths).
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident<$gen:ident: $first_bound:ident $(+ $rest_bound:ident)*>
            { $($field:ident: $fty:ty),+ $(,)? } for $input:ty;
        rule($self_:ident, $inp:ident) $rule:block
        message($self2:ident, $minp:ident) $msg:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name<$gen> {
            $(pub $field: $fty,)+
        }

        impl<$gen: $first_bound $(+ $rest_bound)*> $name<$gen> {
            #[must_use]
            pub fn new($($field: $fty),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl<$gen: $first_bound $(+ $rest_bound)*> $crate::constraints::Constraint<$input> for $name<$gen> {
            #[allow(unused_variables)]
            fn check(&$self_, $inp: &$input) -> Option<$crate::foundation::Message> {
                if $rule {
                    None
                } else {
                    let $minp = $inp;
                    Some(($msg).into())
                }
            }
        }
    };
}

// ============================================================================
// TESTS
// ============================================================================
