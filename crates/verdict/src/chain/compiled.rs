//! Compiled chain snapshots.
//!
//! Every mutation of a rule chain (append, gate, message override)
//! recompiles the whole chain into an immutable snapshot and swaps it into
//! the owning validator's slot. The snapshot pairs the chain's value source
//! with the rules it walks, erased behind [`ChainEval`] so a validator can
//! hold chains over any mix of field types.
//!
//! Four snapshot shapes cover the four declaration forms:
//!
//! | Declaration                  | Snapshot                      | Value source          |
//! |------------------------------|-------------------------------|-----------------------|
//! | `rule_for`                   | [`CompiledChain`]             | borrow a field        |
//! | `rule_for_transformed`       | [`CompiledTransformChain`]    | compute a projection  |
//! | `rule_for_each`              | [`CompiledArrayChain`]        | borrow each element   |
//! | `rule_for_each_transformed`  | [`CompiledTransformArrayChain`] | project each element |
//!
//! Sync and async evaluation share one walk discipline: rules run strictly
//! in declaration order and the first failure ends the chain.

use std::sync::Arc;

use async_trait::async_trait;

use crate::chain::rule::Rule;
use crate::foundation::{ErrorNode, Presence};

// ============================================================================
// CHAIN EVAL
// ============================================================================

/// An erased, immutable chain ready to evaluate against a model.
///
/// `evaluate` is only ever called on chains built by a sync-mode builder;
/// `evaluate_async` works for both modes and preserves the same ordering
/// and short-circuit behavior.
#[async_trait]
pub(crate) trait ChainEval<T>: Send + Sync {
    fn evaluate(&self, model: &T) -> Option<ErrorNode>;
    async fn evaluate_async(&self, model: &T) -> Option<ErrorNode>;
}

// ============================================================================
// RULE WALKS
// ============================================================================

fn run_rules<T, F>(rules: &[Rule<T, F>], value: &F, model: &T) -> Option<ErrorNode> {
    rules.iter().find_map(|rule| rule.evaluate(value, model))
}

async fn run_rules_async<T, F>(rules: &[Rule<T, F>], value: &F, model: &T) -> Option<ErrorNode> {
    for rule in rules {
        if let Some(node) = rule.evaluate_async(value, model).await {
            return Some(node);
        }
    }
    None
}

/// Runs the chain once per element, keeping results index-aligned with the
/// input. Elements that pass occupy their slot as `None`; the whole walk
/// reports nothing unless at least one element failed.
fn run_elements<T, F>(rules: &[Rule<T, F>], items: &[F], model: &T) -> Option<ErrorNode> {
    let mut slots = Vec::with_capacity(items.len());
    let mut failed = false;
    for value in items {
        let node = run_rules(rules, value, model);
        failed |= node.is_some();
        slots.push(node);
    }
    failed.then(|| ErrorNode::Items(slots))
}

async fn run_elements_async<T, F>(
    rules: &[Rule<T, F>],
    items: &[F],
    model: &T,
) -> Option<ErrorNode> {
    let mut slots = Vec::with_capacity(items.len());
    let mut failed = false;
    for value in items {
        let node = run_rules_async(rules, value, model).await;
        failed |= node.is_some();
        slots.push(node);
    }
    failed.then(|| ErrorNode::Items(slots))
}

// ============================================================================
// WHOLE-VALUE CHAINS
// ============================================================================

/// A chain over a borrowed field.
pub(crate) struct CompiledChain<T, F> {
    access: Arc<dyn Fn(&T) -> &F + Send + Sync>,
    rules: Box<[Rule<T, F>]>,
}

impl<T, F> CompiledChain<T, F> {
    pub(crate) fn new(
        access: Arc<dyn Fn(&T) -> &F + Send + Sync>,
        rules: Box<[Rule<T, F>]>,
    ) -> Self {
        Self { access, rules }
    }
}

#[async_trait]
impl<T, F> ChainEval<T> for CompiledChain<T, F>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    fn evaluate(&self, model: &T) -> Option<ErrorNode> {
        run_rules(&self.rules, (self.access)(model), model)
    }

    async fn evaluate_async(&self, model: &T) -> Option<ErrorNode> {
        run_rules_async(&self.rules, (self.access)(model), model).await
    }
}

/// A chain over a value computed from the model once per evaluation.
pub(crate) struct CompiledTransformChain<T, F> {
    project: Arc<dyn Fn(&T) -> F + Send + Sync>,
    rules: Box<[Rule<T, F>]>,
}

impl<T, F> CompiledTransformChain<T, F> {
    pub(crate) fn new(
        project: Arc<dyn Fn(&T) -> F + Send + Sync>,
        rules: Box<[Rule<T, F>]>,
    ) -> Self {
        Self { project, rules }
    }
}

#[async_trait]
impl<T, F> ChainEval<T> for CompiledTransformChain<T, F>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    fn evaluate(&self, model: &T) -> Option<ErrorNode> {
        let value = (self.project)(model);
        run_rules(&self.rules, &value, model)
    }

    async fn evaluate_async(&self, model: &T) -> Option<ErrorNode> {
        let value = (self.project)(model);
        run_rules_async(&self.rules, &value, model).await
    }
}

// ============================================================================
// ELEMENTWISE CHAINS
// ============================================================================

/// An elementwise chain over a borrowed array field.
///
/// An absent array (`Option::None`) reports nothing; emptiness or length
/// rules belong on a whole-value chain for the same field.
pub(crate) struct CompiledArrayChain<T, L: ?Sized, F> {
    access: Arc<dyn Fn(&T) -> &L + Send + Sync>,
    rules: Box<[Rule<T, F>]>,
}

impl<T, L: ?Sized, F> CompiledArrayChain<T, L, F> {
    pub(crate) fn new(
        access: Arc<dyn Fn(&T) -> &L + Send + Sync>,
        rules: Box<[Rule<T, F>]>,
    ) -> Self {
        Self { access, rules }
    }
}

#[async_trait]
impl<T, L, F> ChainEval<T> for CompiledArrayChain<T, L, F>
where
    T: Send + Sync + 'static,
    L: Presence<[F]> + ?Sized + Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    fn evaluate(&self, model: &T) -> Option<ErrorNode> {
        let Some(items) = (self.access)(model).present() else {
            return None;
        };
        run_elements(&self.rules, items, model)
    }

    async fn evaluate_async(&self, model: &T) -> Option<ErrorNode> {
        let Some(items) = (self.access)(model).present() else {
            return None;
        };
        run_elements_async(&self.rules, items, model).await
    }
}

/// An elementwise chain whose rules see a projection of each element.
pub(crate) struct CompiledTransformArrayChain<T, L: ?Sized, E, F> {
    access: Arc<dyn Fn(&T) -> &L + Send + Sync>,
    transform: Arc<dyn Fn(&E) -> F + Send + Sync>,
    rules: Box<[Rule<T, F>]>,
}

impl<T, L: ?Sized, E, F> CompiledTransformArrayChain<T, L, E, F> {
    pub(crate) fn new(
        access: Arc<dyn Fn(&T) -> &L + Send + Sync>,
        transform: Arc<dyn Fn(&E) -> F + Send + Sync>,
        rules: Box<[Rule<T, F>]>,
    ) -> Self {
        Self {
            access,
            transform,
            rules,
        }
    }
}

#[async_trait]
impl<T, L, E, F> ChainEval<T> for CompiledTransformArrayChain<T, L, E, F>
where
    T: Send + Sync + 'static,
    L: Presence<[E]> + ?Sized + Send + Sync + 'static,
    E: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    fn evaluate(&self, model: &T) -> Option<ErrorNode> {
        let Some(items) = (self.access)(model).present() else {
            return None;
        };
        let projected: Vec<F> = items
            .iter()
            .map(|element| (self.transform)(element))
            .collect();
        run_elements(&self.rules, &projected, model)
    }

    async fn evaluate_async(&self, model: &T) -> Option<ErrorNode> {
        let Some(items) = (self.access)(model).present() else {
            return None;
        };
        let projected: Vec<F> = items
            .iter()
            .map(|element| (self.transform)(element))
            .collect();
        run_elements_async(&self.rules, &projected, model).await
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::rule::Check;
    use crate::foundation::Message;

    struct Model {
        count: i64,
        scores: Vec<i64>,
    }

    fn positive_rule() -> Rule<Model, i64> {
        Rule::new(Check::Sync(Arc::new(|value: &i64, _: &Model| {
            if *value > 0 {
                None
            } else {
                Some(Message::Borrowed("must be positive"))
            }
        })))
    }

    fn small_rule() -> Rule<Model, i64> {
        Rule::new(Check::Sync(Arc::new(|value: &i64, _: &Model| {
            if *value < 100 {
                None
            } else {
                Some(Message::Borrowed("too large"))
            }
        })))
    }

    #[test]
    fn whole_value_chain_short_circuits_in_order() {
        let chain = CompiledChain::new(
            Arc::new(|m: &Model| &m.count),
            vec![positive_rule(), small_rule()].into_boxed_slice(),
        );
        let model = Model { count: -3, scores: vec![] };
        // Both rules fail for -3; the first one declared wins.
        assert_eq!(
            chain.evaluate(&model),
            Some(ErrorNode::Message("must be positive".into())),
        );
    }

    #[test]
    fn empty_chain_reports_nothing() {
        let chain = CompiledChain::new(Arc::new(|m: &Model| &m.count), Box::new([]));
        let model = Model { count: -3, scores: vec![] };
        assert_eq!(chain.evaluate(&model), None);
    }

    #[test]
    fn array_chain_keeps_slots_index_aligned() {
        let chain = CompiledArrayChain::new(
            Arc::new(|m: &Model| &m.scores),
            vec![positive_rule()].into_boxed_slice(),
        );
        let model = Model { count: 0, scores: vec![5, -1, 7] };
        let node = chain.evaluate(&model).unwrap();
        let items = node.as_items().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_none());
        assert!(items[1].is_some());
        assert!(items[2].is_none());
    }

    #[test]
    fn array_chain_with_all_passing_elements_reports_nothing() {
        let chain = CompiledArrayChain::new(
            Arc::new(|m: &Model| &m.scores),
            vec![positive_rule()].into_boxed_slice(),
        );
        let model = Model { count: 0, scores: vec![1, 2, 3] };
        assert_eq!(chain.evaluate(&model), None);
    }

    #[test]
    fn transform_chain_projects_once_per_evaluation() {
        let chain = CompiledTransformChain::new(
            Arc::new(|m: &Model| m.scores.iter().sum::<i64>()),
            vec![positive_rule()].into_boxed_slice(),
        );
        let empty = Model { count: 0, scores: vec![] };
        let full = Model { count: 0, scores: vec![9] };
        assert!(chain.evaluate(&empty).is_some());
        assert_eq!(chain.evaluate(&full), None);
    }
}
