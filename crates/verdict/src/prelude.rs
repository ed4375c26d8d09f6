//! Prelude module for convenient imports.
//!
//! A single `use verdict::prelude::*;` brings in everything a typical
//! declaration site touches: both engines, the report types, the gate
//! scope, and the constraint atoms.
//!
//! # Examples
//!
//! ```rust
//! use verdict::prelude::*;
//!
//! struct Comment {
//!     body: String,
//! }
//!
//! let mut validator = Validator::new();
//! validator
//!     .rule_for("body", |c: &Comment| &c.body)
//!     .not_empty()
//!     .max_length(500);
//!
//! let report = validator.validate(&Comment {
//!     body: "hi".to_string(),
//! });
//! assert!(report.is_empty());
//! ```

// ============================================================================
// FOUNDATION: reports, messages, presence lifting
// ============================================================================

pub use crate::foundation::{ErrorNode, FieldName, Message, Presence, ValidationErrors};

// ============================================================================
// ENGINES
// ============================================================================

pub use crate::validator::{AsyncValidator, Validator};

// ============================================================================
// CHAIN SURFACE: builder, typestates, gate scope
// ============================================================================

pub use crate::chain::{Appended, AsyncMode, GateScope, RuleBuilder, Settled, SyncMode};

// ============================================================================
// CONSTRAINT ATOMS: the catalog, for direct use and custom extensions
// ============================================================================

#[allow(clippy::wildcard_imports)]
pub use crate::constraints::*;
