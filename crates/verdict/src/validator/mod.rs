//! The validation engines.
//!
//! Both engines are plain structs a caller fills with rule chains and then
//! evaluates as often as it likes. Declaration mutates the validator;
//! evaluation borrows it immutably, so a configured validator can be
//! shared behind an `Arc` and run concurrently.
//!
//! [`Validator`] walks chains synchronously and only accepts synchronous
//! rules. [`AsyncValidator`] accepts `must_async` and async delegation on
//! top of the same catalog, and awaits each rule to completion before
//! touching the next, so both engines report identical failures for
//! identical rules.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use crate::chain::{ChainEval, RuleBuilder, Settled, SyncMode};
use crate::foundation::{FieldName, Presence, ValidationErrors};

mod asynchronous;

pub use asynchronous::AsyncValidator;

// ============================================================================
// FIELD MAP
// ============================================================================

/// Which of a field's two rule lanes a chain belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lane {
    /// Chains over the field value as a whole.
    Value,
    /// Chains applied to each element of an array field.
    Elements,
}

/// Stable address of one chain inside a [`FieldMap`], handed to the
/// builder so it can swap in recompiled snapshots.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlotId {
    field: usize,
    lane: Lane,
    index: usize,
}

/// One declared field: its name plus the chains attached to it, kept per
/// lane. Almost every field carries exactly one chain, hence the inline
/// capacity.
struct FieldSlot<T> {
    name: FieldName,
    value_chains: SmallVec<[Arc<dyn ChainEval<T>>; 1]>,
    element_chains: SmallVec<[Arc<dyn ChainEval<T>>; 1]>,
}

/// Field registry shared by both engines.
///
/// Fields keep declaration order. Within a field, whole-value chains are
/// consulted before elementwise ones, and the first chain to fail decides
/// the field's entry in the report.
pub(crate) struct FieldMap<T> {
    fields: Vec<FieldSlot<T>>,
}

impl<T> FieldMap<T> {
    pub(crate) fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Attaches `chain` under `name`, creating the field slot on first
    /// sight so repeat declarations accumulate chains instead of clobbering
    /// earlier ones.
    pub(crate) fn register(
        &mut self,
        name: FieldName,
        lane: Lane,
        chain: Arc<dyn ChainEval<T>>,
    ) -> SlotId {
        let field = self
            .fields
            .iter()
            .position(|slot| slot.name == name)
            .unwrap_or_else(|| {
                self.fields.push(FieldSlot {
                    name,
                    value_chains: SmallVec::new(),
                    element_chains: SmallVec::new(),
                });
                self.fields.len() - 1
            });
        let slot = &mut self.fields[field];
        let chains = match lane {
            Lane::Value => &mut slot.value_chains,
            Lane::Elements => &mut slot.element_chains,
        };
        chains.push(chain);
        SlotId {
            field,
            lane,
            index: chains.len() - 1,
        }
    }

    /// Swaps the chain at `slot` for a fresh snapshot.
    pub(crate) fn replace(&mut self, slot: SlotId, chain: Arc<dyn ChainEval<T>>) {
        let field = &mut self.fields[slot.field];
        let chains = match slot.lane {
            Lane::Value => &mut field.value_chains,
            Lane::Elements => &mut field.element_chains,
        };
        chains[slot.index] = chain;
    }

    pub(crate) fn walk(&self, model: &T) -> ValidationErrors {
        let mut report = ValidationErrors::new();
        for field in &self.fields {
            let failure = field
                .value_chains
                .iter()
                .chain(&field.element_chains)
                .find_map(|chain| chain.evaluate(model));
            if let Some(node) = failure {
                report.insert(field.name.clone(), node);
            }
        }
        trace!(
            fields = self.fields.len(),
            failed = report.len(),
            "validation walk complete"
        );
        report
    }

    pub(crate) async fn walk_async(&self, model: &T) -> ValidationErrors {
        let mut report = ValidationErrors::new();
        for field in &self.fields {
            for chain in field.value_chains.iter().chain(&field.element_chains) {
                if let Some(node) = chain.evaluate_async(model).await {
                    report.insert(field.name.clone(), node);
                    break;
                }
            }
        }
        trace!(
            fields = self.fields.len(),
            failed = report.len(),
            "validation walk complete"
        );
        report
    }
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FieldMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for field in &self.fields {
            map.entry(
                &field.name,
                &(field.value_chains.len() + field.element_chains.len()),
            );
        }
        map.finish()
    }
}

// ============================================================================
// SYNCHRONOUS VALIDATOR
// ============================================================================

/// The synchronous engine.
///
/// Declare chains with the `rule_for*` family, then call
/// [`validate`](Validator::validate) as many times as needed. Failures are
/// ordinary values in the returned [`ValidationErrors`]; the only panics
/// are declaration-time configuration faults and rule code that itself
/// panics.
///
/// # Examples
///
/// ```
/// use verdict::prelude::*;
///
/// struct Signup {
///     email: String,
///     age: i64,
/// }
///
/// let mut validator = Validator::new();
/// validator
///     .rule_for("email", |s: &Signup| &s.email)
///     .not_empty()
///     .email_address();
/// validator
///     .rule_for("age", |s: &Signup| &s.age)
///     .inclusive_between(13, 120);
///
/// let report = validator.validate(&Signup {
///     email: "kim@example.com".to_string(),
///     age: 44,
/// });
/// assert!(report.is_empty());
/// ```
pub struct Validator<T> {
    fields: FieldMap<T>,
}

impl<T> Validator<T>
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
    ) -> RuleBuilder<'_, T, F, Settled, SyncMode>
    where
        A: Fn(&T) -> &F + Send + Sync + 'static,
        F: Send + Sync + 'static,
    {
        RuleBuilder::open_value(&mut self.fields, field.into(), accessor)
    }

    /// Opens a rule chain over a value computed from the model.
    ///
    /// The projection runs once per evaluation and its result is what
    /// every rule in the chain sees; the model itself is untouched.
    pub fn rule_for_transformed<P, F>(
        &mut self,
        field: impl Into<FieldName>,
        projection: P,
    ) -> RuleBuilder<'_, T, F, Settled, SyncMode>
    where
        P: Fn(&T) -> F + Send + Sync + 'static,
        F: Send + Sync + 'static,
    {
        RuleBuilder::open_transformed(&mut self.fields, field.into(), projection)
    }

    /// Opens a rule chain applied independently to every element of an
    /// array field. Failures come back index-aligned with the input.
    pub fn rule_for_each<A, L, F>(
        &mut self,
        field: impl Into<FieldName>,
        accessor: A,
    ) -> RuleBuilder<'_, T, F, Settled, SyncMode>
    where
        A: Fn(&T) -> &L + Send + Sync + 'static,
        L: Presence<[F]> + ?Sized + Send + Sync + 'static,
        F: Send + Sync + 'static,
    {
        RuleBuilder::open_elements(&mut self.fields, field.into(), accessor)
    }

    /// Elementwise chain over a projection of each element, for rules that
    /// target one aspect of a compound element type.
    pub fn rule_for_each_transformed<A, L, E, P, F>(
        &mut self,
        field: impl Into<FieldName>,
        accessor: A,
        transform: P,
    ) -> RuleBuilder<'_, T, F, Settled, SyncMode>
    where
        A: Fn(&T) -> &L + Send + Sync + 'static,
        L: Presence<[E]> + ?Sized + Send + Sync + 'static,
        E: Send + Sync + 'static,
        P: Fn(&E) -> F + Send + Sync + 'static,
        F: Send + Sync + 'static,
    {
        RuleBuilder::open_transformed_elements(&mut self.fields, field.into(), accessor, transform)
    }

    /// Evaluates every declared chain against `model`.
    pub fn validate(&self, model: &T) -> ValidationErrors {
        self.fields.walk(model)
    }
}

impl<T> Default for Validator<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("fields", &self.fields)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Order {
        reference: String,
        quantities: Vec<i64>,
    }

    fn order() -> Order {
        Order {
            reference: String::new(),
            quantities: vec![1, -2, 3],
        }
    }

    #[test]
    fn report_keeps_field_declaration_order() {
        let mut validator = Validator::new();
        validator
            .rule_for("reference", |o: &Order| &o.reference)
            .not_empty();
        validator
            .rule_for("quantities", |o: &Order| &o.quantities)
            .must(|q: &Vec<i64>, _: &Order| q.iter().all(|n| *n > 0));

        let report = validator.validate(&order());
        let names: Vec<&str> = report.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["reference", "quantities"]);
    }

    #[test]
    fn whole_value_chain_outranks_elementwise_chain() {
        let mut validator = Validator::new();
        validator
            .rule_for_each("quantities", |o: &Order| &o.quantities)
            .greater_than(0);
        validator
            .rule_for("quantities", |o: &Order| &o.quantities)
            .must(|q: &Vec<i64>, _: &Order| !q.is_empty())
            .with_message("Order at least one item");

        let report = validator.validate(&Order {
            reference: "r-1".to_string(),
            quantities: Vec::new(),
        });
        assert_eq!(report.message("quantities"), Some("Order at least one item"));
    }

    #[test]
    fn chains_on_one_field_run_in_declaration_order() {
        let mut validator = Validator::new();
        validator
            .rule_for("reference", |o: &Order| &o.reference)
            .must(|_: &String, _: &Order| false)
            .with_message("first chain");
        validator
            .rule_for("reference", |o: &Order| &o.reference)
            .must(|_: &String, _: &Order| false)
            .with_message("second chain");

        let report = validator.validate(&order());
        assert_eq!(report.message("reference"), Some("first chain"));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn debug_output_names_fields_and_chain_counts() {
        let mut validator = Validator::new();
        validator
            .rule_for("reference", |o: &Order| &o.reference)
            .not_empty();
        validator
            .rule_for_each("quantities", |o: &Order| &o.quantities)
            .greater_than(0);

        let rendered = format!("{validator:?}");
        assert!(rendered.contains("reference"));
        assert!(rendered.contains("quantities"));
    }
}
