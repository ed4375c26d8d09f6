//! Shared vocabulary for the whole crate.
//!
//! - **Report types**: [`ValidationErrors`], [`ErrorNode`], and the
//!   [`Message`] / [`FieldName`] aliases they are built from.
//! - **Presence lifting**: the [`Presence`] trait that lets one rule
//!   declaration serve bare, `Option`, `Box`, and string/slice fields.
//!
//! Everything here is deliberately free of engine machinery: these are the
//! types a caller keeps after validation finishes, and the trait model
//! structs lean on while rules are declared.

pub mod errors;
pub mod presence;

pub use errors::{ErrorNode, FieldName, Message, ValidationErrors};
pub use presence::Presence;
