//! Ordered rule chains for a single field.
//!
//! A chain is declared through [`RuleBuilder`], stored as a list of gated
//! rules, and compiled into an erased snapshot the owning validator walks
//! at evaluation time. Rules inside a chain run strictly in declaration
//! order and the chain stops at its first failure.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`RuleBuilder`] | fluent declaration, typestate-checked |
//! | [`GateScope`] | how far `when` / `unless` reach back |
//! | `Rule` | one check plus its gates and message override |
//! | `ChainEval` | compiled snapshot, walked sync or async |

mod builder;
mod compiled;
mod rule;

pub use builder::{Appended, AsyncMode, RuleBuilder, Settled, SyncMode};
pub use rule::GateScope;

pub(crate) use compiled::ChainEval;
