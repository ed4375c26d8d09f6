//! The asynchronous engine.

use std::fmt;

use crate::chain::{AsyncMode, RuleBuilder, Settled};
use crate::foundation::{FieldName, Presence, ValidationErrors};
use crate::validator::FieldMap;

/// The asynchronous engine.
///
/// Declaration mirrors [`Validator`](super::Validator) exactly; evaluation
/// is strictly sequential. Each rule's future is awaited to completion
/// before the next rule is even looked at, so ordering, short-circuiting,
/// and the resulting report are indistinguishable from the sync engine
/// given the same rules. The payoff is that chains may also carry
/// `must_async` rules and delegate to nested async validators.
///
/// # Examples
///
/// ```
/// use verdict::prelude::*;
///
/// struct Invite {
///     code: String,
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut validator = AsyncValidator::new();
/// validator
///     .rule_for("code", |i: &Invite| &i.code)
///     .not_empty()
///     .must_async(|code: &String, _: &Invite| {
///         let code = code.clone();
///         async move { code.starts_with("inv-") }
///     })
///     .with_message("Unknown invite code");
///
/// let report = validator
///     .validate(&Invite { code: "inv-7".to_string() })
///     .await;
/// assert!(report.is_empty());
/// # }
/// ```
pub struct AsyncValidator<T> {
    fields: FieldMap<T>,
}

impl<T> AsyncValidator<T>
where
    T: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            fields: FieldMap::new(),
        }
    }

    /// Opens a rule chain over the field `accessor` borrows from the model.
    pub fn rule_for<A, F>(
        &mut self,
        field: impl Into<FieldName>,
        accessor: A,
    ) -> RuleBuilder<'_, T, F, Settled, AsyncMode>
    where
        A: Fn(&T) -> &F + Send + Sync + 'static,
        F: Send + Sync + 'static,
    {
        RuleBuilder::open_value(&mut self.fields, field.into(), accessor)
    }

    /// Opens a rule chain over a value computed from the model.
    pub fn rule_for_transformed<P, F>(
        &mut self,
        field: impl Into<FieldName>,
        projection: P,
    ) -> RuleBuilder<'_, T, F, Settled, AsyncMode>
    where
        P: Fn(&T) -> F + Send + Sync + 'static,
        F: Send + Sync + 'static,
    {
        RuleBuilder::open_transformed(&mut self.fields, field.into(), projection)
    }

    /// Opens a rule chain applied independently to every element of an
    /// array field.
    pub fn rule_for_each<A, L, F>(
        &mut self,
        field: impl Into<FieldName>,
        accessor: A,
    ) -> RuleBuilder<'_, T, F, Settled, AsyncMode>
    where
        A: Fn(&T) -> &L + Send + Sync + 'static,
        L: Presence<[F]> + ?Sized + Send + Sync + 'static,
        F: Send + Sync + 'static,
    {
        RuleBuilder::open_elements(&mut self.fields, field.into(), accessor)
    }

    /// Elementwise chain over a projection of each element.
    pub fn rule_for_each_transformed<A, L, E, P, F>(
        &mut self,
        field: impl Into<FieldName>,
        accessor: A,
        transform: P,
    ) -> RuleBuilder<'_, T, F, Settled, AsyncMode>
    where
        A: Fn(&T) -> &L + Send + Sync + 'static,
        L: Presence<[E]> + ?Sized + Send + Sync + 'static,
        E: Send + Sync + 'static,
        P: Fn(&E) -> F + Send + Sync + 'static,
        F: Send + Sync + 'static,
    {
        RuleBuilder::open_transformed_elements(&mut self.fields, field.into(), accessor, transform)
    }

    /// Evaluates every declared chain against `model`, one rule at a time.
    pub async fn validate(&self, model: &T) -> ValidationErrors {
        self.fields.walk_async(model).await
    }
}

impl<T> Default for AsyncValidator<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AsyncValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncValidator")
            .field("fields", &self.fields)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
