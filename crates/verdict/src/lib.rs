//! # verdict
//!
//! Fluent, declarative validation for plain Rust structs.
//!
//! A [`Validator`](validator::Validator) is assembled once out of
//! per-field rule chains and evaluated as often as needed. Failures are
//! ordinary values: a model-shaped
//! [`ValidationErrors`](foundation::ValidationErrors) report that nests
//! exactly where the model nests. Panics are reserved for rules that are
//! misconfigured at declaration time and for rule code that itself faults.
//!
//! ## Quick Start
//!
//! ```rust
//! use verdict::prelude::*;
//!
//! struct Customer {
//!     name: String,
//!     discount: Option<f64>,
//! }
//!
//! let mut validator = Validator::new();
//! validator
//!     .rule_for("name", |c: &Customer| &c.name)
//!     .not_empty()
//!     .length(1, 50);
//! validator
//!     .rule_for("discount", |c: &Customer| &c.discount)
//!     .greater_than(0.0);
//!
//! let report = validator.validate(&Customer {
//!     name: "  ".to_string(),
//!     discount: None,
//! });
//! assert_eq!(report.message("name"), Some("Value cannot be empty"));
//! assert!(report.get("discount").is_none()); // absent optional passes
//! ```
//!
//! ## The rule catalog
//!
//! Chains compose rules from a fixed catalog: emptiness, length, and
//! pattern checks for strings; comparisons and ranges for any ordered
//! value; [`scale_precision`](chain::RuleBuilder::scale_precision) for
//! decimal digit budgets; [`must`](chain::RuleBuilder::must) and nested
//! validator delegation via
//! [`set_validator`](chain::RuleBuilder::set_validator) for everything
//! else. [`when`](chain::RuleBuilder::when) /
//! [`unless`](chain::RuleBuilder::unless) gate rules on the model state,
//! and [`with_message`](chain::RuleBuilder::with_message) rewords the rule
//! appended right before it.
//!
//! Optional fields follow one convention everywhere: every rule passes on
//! an absent value, and only [`not_null`](chain::RuleBuilder::not_null) /
//! [`null`](chain::RuleBuilder::null) inspect presence itself. "Required
//! and non-empty" is therefore spelled `.not_null().not_empty()`.
//!
//! ## Async
//!
//! [`AsyncValidator`](validator::AsyncValidator) takes the same chains
//! plus [`must_async`](chain::RuleBuilder::must_async). Evaluation stays
//! strictly sequential, one rule's future awaited to completion before the
//! next is polled, so the two engines produce identical reports for
//! identical rules.

pub mod chain;
pub mod constraints;
pub mod foundation;
mod macros;
pub mod prelude;
pub mod validator;
