//! A single rule: one check plus its gates and message override.
//!
//! Rules are the unit the chain walks. Each owns exactly one check (a
//! synchronous constraint closure, a nested-validator delegation, or an
//! asynchronous predicate) plus the per-rule modifiers declared around it:
//! an optional `when` gate, an optional `unless` gate, and an optional
//! message override. Gates run first; a gated-out rule reports nothing at
//! all, which reads as a pass to the chain's short-circuit walk.

use std::future::Future;
use std::sync::{Arc, OnceLock};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::foundation::{ErrorNode, Message, Presence};
use crate::validator::AsyncValidator;

// ============================================================================
// GATES
// ============================================================================

/// How far a `when`/`unless` call reaches back along the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GateScope {
    /// Gate every rule appended to the chain so far.
    #[default]
    All,
    /// Gate only the most recently appended rule.
    Latest,
}

/// A condition over the whole model. The rule's own value plays no part.
pub(crate) type Gate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Which gate slot a predicate lands in. `when` skips the rule while the
/// condition is false; `unless` skips it while the condition is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateKind {
    When,
    Unless,
}

// ============================================================================
// CHECKS
// ============================================================================

/// A synchronous check: `None` passes, `Some` carries the default message.
pub(crate) type SyncCheck<T, F> = Arc<dyn Fn(&F, &T) -> Option<Message> + Send + Sync>;

/// A delegation to a nested validator, already lifted over the field's
/// presence. Produces a whole sub-report rather than a message.
pub(crate) type DelegateCheck<F> = Arc<dyn Fn(&F) -> Option<ErrorNode> + Send + Sync>;

/// An asynchronous check, erased behind a boxed future.
pub(crate) trait AsyncCheck<T, F>: Send + Sync {
    fn check<'a>(&'a self, value: &'a F, model: &'a T) -> BoxFuture<'a, Option<ErrorNode>>;
}

pub(crate) enum Check<T, F> {
    Sync(SyncCheck<T, F>),
    Delegate(DelegateCheck<F>),
    Async(Arc<dyn AsyncCheck<T, F>>),
}

impl<T, F> Clone for Check<T, F> {
    fn clone(&self) -> Self {
        match self {
            Self::Sync(check) => Self::Sync(Arc::clone(check)),
            Self::Delegate(delegate) => Self::Delegate(Arc::clone(delegate)),
            Self::Async(check) => Self::Async(Arc::clone(check)),
        }
    }
}

// ============================================================================
// ASYNC CHECK IMPLEMENTATIONS
// ============================================================================

/// `must_async`: a caller-supplied asynchronous predicate.
///
/// The predicate borrows the value and model only while constructing its
/// future; whatever the future needs it must own. That keeps the future
/// `'static` and the rule free to resolve borrows before any await.
pub(crate) struct MustAsync<P> {
    predicate: P,
}

impl<P> MustAsync<P> {
    pub(crate) fn new(predicate: P) -> Self {
        Self { predicate }
    }
}

impl<T, F, P, Fut> AsyncCheck<T, F> for MustAsync<P>
where
    P: Fn(&F, &T) -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send + 'static,
{
    fn check<'a>(&'a self, value: &'a F, model: &'a T) -> BoxFuture<'a, Option<ErrorNode>> {
        let pending = (self.predicate)(value, model);
        async move {
            if pending.await {
                None
            } else {
                Some(ErrorNode::Message(Message::Borrowed("Value is not valid")))
            }
        }
        .boxed()
    }
}

/// `set_validator` on an async chain: delegation to a nested
/// [`AsyncValidator`], built lazily on first use.
///
/// Lazy construction is what makes self-referential models work: the
/// factory for a `manager: Option<Box<Employee>>` field can call the very
/// function that is still busy declaring the outer validator.
pub(crate) struct AsyncDelegate<G, U> {
    factory: G,
    nested: OnceLock<AsyncValidator<U>>,
}

impl<G, U> AsyncDelegate<G, U> {
    pub(crate) fn new(factory: G) -> Self {
        Self {
            factory,
            nested: OnceLock::new(),
        }
    }
}

impl<T, F, U, G> AsyncCheck<T, F> for AsyncDelegate<G, U>
where
    T: Sync,
    F: Presence<U> + Sync,
    U: Send + Sync + 'static,
    G: Fn() -> AsyncValidator<U> + Send + Sync,
{
    fn check<'a>(&'a self, value: &'a F, _model: &'a T) -> BoxFuture<'a, Option<ErrorNode>> {
        async move {
            let Some(inner) = value.present() else {
                return None;
            };
            let validator = self.nested.get_or_init(&self.factory);
            let report = validator.validate(inner).await;
            if report.is_empty() {
                None
            } else {
                Some(ErrorNode::Nested(report))
            }
        }
        .boxed()
    }
}

// ============================================================================
// RULE
// ============================================================================

/// One chain entry: a check, its gates, and its message override.
pub(crate) struct Rule<T, F> {
    check: Check<T, F>,
    message: Option<Message>,
    when: Option<Gate<T>>,
    unless: Option<Gate<T>>,
}

impl<T, F> Rule<T, F> {
    pub(crate) fn new(check: Check<T, F>) -> Self {
        Self {
            check,
            message: None,
            when: None,
            unless: None,
        }
    }

    pub(crate) fn set_message(&mut self, message: Message) {
        self.message = Some(message);
    }

    /// Installs a gate, replacing any earlier gate of the same kind.
    pub(crate) fn set_gate(&mut self, kind: GateKind, gate: Gate<T>) {
        match kind {
            GateKind::When => self.when = Some(gate),
            GateKind::Unless => self.unless = Some(gate),
        }
    }

    fn gated_out(&self, model: &T) -> bool {
        if let Some(when) = &self.when {
            if !when(model) {
                return true;
            }
        }
        if let Some(unless) = &self.unless {
            if unless(model) {
                return true;
            }
        }
        false
    }

    /// Applies the override, keeping the check's message as the fallback.
    fn resolve(&self, message: Message) -> ErrorNode {
        ErrorNode::Message(self.message.clone().unwrap_or(message))
    }

    pub(crate) fn evaluate(&self, value: &F, model: &T) -> Option<ErrorNode> {
        if self.gated_out(model) {
            return None;
        }
        match &self.check {
            Check::Sync(check) => check(value, model).map(|message| self.resolve(message)),
            Check::Delegate(delegate) => delegate(value),
            // Sync-mode builders cannot append async checks.
            Check::Async(_) => unreachable!("async rule evaluated synchronously"),
        }
    }

    pub(crate) async fn evaluate_async(&self, value: &F, model: &T) -> Option<ErrorNode> {
        if self.gated_out(model) {
            return None;
        }
        match &self.check {
            Check::Sync(check) => check(value, model).map(|message| self.resolve(message)),
            Check::Delegate(delegate) => delegate(value),
            Check::Async(check) => check.check(value, model).await.map(|node| match node {
                ErrorNode::Message(message) => self.resolve(message),
                nested => nested,
            }),
        }
    }
}

impl<T, F> Clone for Rule<T, F> {
    fn clone(&self) -> Self {
        Self {
            check: self.check.clone(),
            message: self.message.clone(),
            when: self.when.as_ref().map(Arc::clone),
            unless: self.unless.as_ref().map(Arc::clone),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn is_positive() -> Rule<(), i64> {
        Rule::new(Check::Sync(Arc::new(|value: &i64, _: &()| {
            if *value > 0 {
                None
            } else {
                Some(Message::Borrowed("must be positive"))
            }
        })))
    }

    #[test]
    fn ungated_rule_reports_the_default_message() {
        let rule = is_positive();
        assert_eq!(rule.evaluate(&5, &()), None);
        assert_eq!(
            rule.evaluate(&-5, &()),
            Some(ErrorNode::Message("must be positive".into())),
        );
    }

    #[test]
    fn override_replaces_the_default_message() {
        let mut rule = is_positive();
        rule.set_message("nope".into());
        assert_eq!(
            rule.evaluate(&0, &()),
            Some(ErrorNode::Message("nope".into())),
        );
    }

    #[test]
    fn false_when_gate_skips_the_rule() {
        let mut rule = is_positive();
        rule.set_gate(GateKind::When, Arc::new(|_: &()| false));
        assert_eq!(rule.evaluate(&-5, &()), None);
    }

    #[test]
    fn true_unless_gate_skips_the_rule() {
        let mut rule = is_positive();
        rule.set_gate(GateKind::Unless, Arc::new(|_: &()| true));
        assert_eq!(rule.evaluate(&-5, &()), None);
    }

    #[test]
    fn regating_replaces_the_previous_gate() {
        let mut rule = is_positive();
        rule.set_gate(GateKind::When, Arc::new(|_: &()| false));
        rule.set_gate(GateKind::When, Arc::new(|_: &()| true));
        assert!(rule.evaluate(&-5, &()).is_some());
    }
}
