//! The model-shaped validation report.
//!
//! [`ValidationErrors`] mirrors the shape of the validated model: one entry
//! per failed field, in field declaration order, and nothing at all for
//! fields that passed. Absence of a key is the only "no error" signal; there
//! are no placeholder entries.
//!
//! Each entry holds an [`ErrorNode`]:
//!
//! - [`ErrorNode::Message`] — a leaf failure on a scalar field,
//! - [`ErrorNode::Nested`] — a sub-report for an object-typed field,
//! - [`ErrorNode::Items`] — index-aligned results for an array field, where
//!   passing elements are kept as `None` so indices line up with the input.
//!
//! The report serializes to JSON in the same shape:
//!
//! ```json
//! {
//!   "name": "Value cannot be empty",
//!   "scores": [null, null, "Value must be between 0 and 100 (inclusive)"],
//!   "manager": { "age": "Value must be greater than or equal to 18" }
//! }
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A failure message. Catalog defaults are formatted at failure time;
/// overrides supplied via `with_message` are usually `'static`.
pub type Message = Cow<'static, str>;

/// A field name as supplied to `rule_for*`. Keys the error report.
pub type FieldName = Cow<'static, str>;

// ============================================================================
// ERROR NODE
// ============================================================================

/// One field's failure: a leaf message, a nested report, or an
/// index-aligned element list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorNode {
    /// A single failure message.
    Message(Message),
    /// A nested validator's report for an object-typed field. Only ever
    /// materialized non-empty.
    Nested(ValidationErrors),
    /// Elementwise results for an array field. `None` marks a passing
    /// element; at least one entry is `Some`.
    Items(Vec<Option<ErrorNode>>),
}

impl ErrorNode {
    /// Returns the message if this node is a leaf.
    #[must_use]
    pub fn as_message(&self) -> Option<&str> {
        match self {
            Self::Message(message) => Some(message.as_ref()),
            _ => None,
        }
    }

    /// Returns the nested report if this node came from delegation.
    #[must_use]
    pub fn as_nested(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Nested(errors) => Some(errors),
            _ => None,
        }
    }

    /// Returns the element slots if this node came from an array chain.
    #[must_use]
    pub fn as_items(&self) -> Option<&[Option<ErrorNode>]> {
        match self {
            Self::Items(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl Serialize for ErrorNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Message(message) => serializer.serialize_str(message),
            Self::Nested(errors) => errors.serialize(serializer),
            Self::Items(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for slot in items {
                    seq.serialize_element(slot)?;
                }
                seq.end()
            }
        }
    }
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// A sparse, ordered report of every field that failed validation.
///
/// Entries appear in field declaration order. A field that passed every
/// rule has no entry, so `is_empty()` means the whole model passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(FieldName, ErrorNode)>,
}

impl ValidationErrors {
    /// An empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a field's failure. The engine inserts at most once per field.
    pub(crate) fn insert(&mut self, field: FieldName, node: ErrorNode) {
        debug_assert!(
            self.get(field.as_ref()).is_none(),
            "field `{field}` reported twice"
        );
        self.entries.push((field, node));
    }

    /// `true` when every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields that failed (not the number of leaf messages).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The failure recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&ErrorNode> {
        self.entries
            .iter()
            .find(|(name, _)| name.as_ref() == field)
            .map(|(_, node)| node)
    }

    /// Shorthand for a leaf message on `field`.
    #[must_use]
    pub fn message(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(ErrorNode::as_message)
    }

    /// Iterates `(field, node)` entries in declaration order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Flattens the report into `(path, message)` leaves, with `.` for
    /// nesting and `[i]` for array indices.
    ///
    /// ```rust,ignore
    /// for (path, message) in errors.flatten() {
    ///     eprintln!("{path}: {message}");
    /// }
    /// // manager.name: Value cannot be empty
    /// // scores[3]: Value must be between 0 and 100 (inclusive)
    /// ```
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, &str)> {
        let mut leaves = Vec::new();
        for (field, node) in &self.entries {
            collect_leaves(field, node, &mut leaves);
        }
        leaves
    }

    /// Bridges to `Result` for `?`-style handling.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn collect_leaves<'a>(path: &str, node: &'a ErrorNode, leaves: &mut Vec<(String, &'a str)>) {
    match node {
        ErrorNode::Message(message) => leaves.push((path.to_owned(), message.as_ref())),
        ErrorNode::Nested(errors) => {
            for (field, child) in errors.iter() {
                collect_leaves(&format!("{path}.{field}"), child, leaves);
            }
        }
        ErrorNode::Items(items) => {
            for (index, slot) in items.iter().enumerate() {
                if let Some(child) = slot {
                    collect_leaves(&format!("{path}[{index}]"), child, leaves);
                }
            }
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leaves = self.flatten();
        write!(f, "Validation failed with {} error(s):", leaves.len())?;
        for (index, (path, message)) in leaves.iter().enumerate() {
            write!(f, "\n  {}. {path}: {message}", index + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, node) in &self.entries {
            map.serialize_entry(field.as_ref(), node)?;
        }
        map.end()
    }
}

/// Iterator over `(field, node)` entries.
#[derive(Debug)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (FieldName, ErrorNode)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a ErrorNode);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, node)| (name.as_ref(), node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = (&'a str, &'a ErrorNode);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================
