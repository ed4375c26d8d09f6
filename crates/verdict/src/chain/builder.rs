//! The fluent rule-chain builder.
//!
//! [`RuleBuilder`] is handed out by a validator's `rule_for*` methods and
//! mutably borrows the validator for the duration of one declaration
//! statement. Every call (append, gate, message override) recompiles the
//! chain and swaps the fresh snapshot into the validator's slot, so there
//! is no finalize step: the validator is usable after any prefix of a
//! declaration.
//!
//! Two phantom parameters make misuse unrepresentable:
//!
//! - **State** ([`Settled`] / [`Appended`]) tracks whether the most recent
//!   call appended a rule. `with_message` exists only on `Appended`, so
//!   overriding before any rule, twice in a row, or right after a gate is
//!   a compile error rather than a runtime surprise.
//! - **Mode** ([`SyncMode`] / [`AsyncMode`]) tracks which engine owns the
//!   chain. `must_async` exists only in async mode, and `set_validator`
//!   delegates to the matching engine, so a sync validator can never hold
//!   a rule it cannot evaluate.

use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::trace;

use crate::chain::compiled::{
    ChainEval, CompiledArrayChain, CompiledChain, CompiledTransformArrayChain,
    CompiledTransformChain,
};
use crate::chain::rule::{
    AsyncDelegate, Check, Gate, GateKind, GateScope, MustAsync, Rule,
};
use crate::constraints::{
    Constraint, EmailAddress, Equal, ExclusiveBetween, GreaterThan, GreaterThanOrEqual,
    InclusiveBetween, Length, LessThan, LessThanOrEqual, Matches, MaxLength, MinLength, NotEmpty,
    NotEqual, NotNull, Null, ScalePrecision,
};
use crate::foundation::{ErrorNode, FieldName, Message, Presence};
use crate::validator::{AsyncValidator, FieldMap, Lane, SlotId, Validator};

// ============================================================================
// TYPESTATE MARKERS
// ============================================================================

/// Builder state: no rule is pending a message override. The chain may be
/// empty, or the last call was a gate or an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled;

/// Builder state: the most recent call appended a rule, so `with_message`
/// may rebind its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appended;

/// Chains owned by a [`Validator`]: every rule must be synchronous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMode;

/// Chains owned by an [`AsyncValidator`]: `must_async` is available and
/// delegation targets async validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsyncMode;

// ============================================================================
// RULE CHAIN STORAGE
// ============================================================================

/// Recompiles a rule list into an erased snapshot. Captures the chain's
/// value source, fixed when the chain was opened.
pub(crate) type Compiler<T, F> =
    Arc<dyn Fn(Box<[Rule<T, F>]>) -> Arc<dyn ChainEval<T>> + Send + Sync>;

/// The mutable rule list behind a builder, plus how to snapshot it.
pub(crate) struct RuleChain<T, F> {
    field: FieldName,
    rules: Vec<Rule<T, F>>,
    compile: Compiler<T, F>,
}

impl<T, F> RuleChain<T, F> {
    fn new(field: FieldName, compile: Compiler<T, F>) -> Self {
        Self {
            field,
            rules: Vec::new(),
            compile,
        }
    }

    fn append(&mut self, check: Check<T, F>) {
        self.rules.push(Rule::new(check));
    }

    fn override_latest(&mut self, message: Message) {
        let rule = self
            .rules
            .last_mut()
            .expect("Appended state implies at least one rule");
        rule.set_message(message);
    }

    fn gate(&mut self, kind: GateKind, predicate: Gate<T>, scope: GateScope) {
        match scope {
            GateScope::All => {
                for rule in &mut self.rules {
                    rule.set_gate(kind, Arc::clone(&predicate));
                }
            }
            // Gating an empty chain is a no-op.
            GateScope::Latest => {
                if let Some(rule) = self.rules.last_mut() {
                    rule.set_gate(kind, predicate);
                }
            }
        }
    }

    fn snapshot(&self) -> Arc<dyn ChainEval<T>> {
        (self.compile)(self.rules.iter().cloned().collect())
    }

    fn len(&self) -> usize {
        self.rules.len()
    }
}

// ============================================================================
// RULE BUILDER
// ============================================================================

/// A fluent chain of rules for one field.
///
/// Obtained from [`Validator::rule_for`] and friends; never constructed
/// directly. Methods consume and return the builder, threading the two
/// phantom parameters described in the module docs.
///
/// # Examples
///
/// ```rust,ignore
/// let mut validator = Validator::new();
/// validator
///     .rule_for("nickname", |p: &Profile| &p.nickname)
///     .not_null()
///     .not_empty().with_message("Pick a nickname")
///     .max_length(24);
/// ```
pub struct RuleBuilder<'v, T, F, S = Settled, M = SyncMode> {
    map: &'v mut FieldMap<T>,
    slot: SlotId,
    chain: RuleChain<T, F>,
    _state: PhantomData<S>,
    _mode: PhantomData<M>,
}

// ── chain opening ───────────────────────────────────────────────────────────

impl<'v, T, F, M> RuleBuilder<'v, T, F, Settled, M>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    pub(crate) fn open_value<A>(map: &'v mut FieldMap<T>, field: FieldName, accessor: A) -> Self
    where
        A: Fn(&T) -> &F + Send + Sync + 'static,
    {
        let access: Arc<dyn Fn(&T) -> &F + Send + Sync> = Arc::new(accessor);
        let compile: Compiler<T, F> =
            Arc::new(move |rules| Arc::new(CompiledChain::new(Arc::clone(&access), rules)));
        Self::open(map, Lane::Value, field, compile)
    }

    pub(crate) fn open_transformed<P>(
        map: &'v mut FieldMap<T>,
        field: FieldName,
        projection: P,
    ) -> Self
    where
        P: Fn(&T) -> F + Send + Sync + 'static,
    {
        let project: Arc<dyn Fn(&T) -> F + Send + Sync> = Arc::new(projection);
        let compile: Compiler<T, F> = Arc::new(move |rules| {
            Arc::new(CompiledTransformChain::new(Arc::clone(&project), rules))
        });
        Self::open(map, Lane::Value, field, compile)
    }

    pub(crate) fn open_elements<A, L>(
        map: &'v mut FieldMap<T>,
        field: FieldName,
        accessor: A,
    ) -> Self
    where
        A: Fn(&T) -> &L + Send + Sync + 'static,
        L: Presence<[F]> + ?Sized + Send + Sync + 'static,
    {
        let access: Arc<dyn Fn(&T) -> &L + Send + Sync> = Arc::new(accessor);
        let compile: Compiler<T, F> =
            Arc::new(move |rules| Arc::new(CompiledArrayChain::new(Arc::clone(&access), rules)));
        Self::open(map, Lane::Elements, field, compile)
    }

    pub(crate) fn open_transformed_elements<A, L, E, P>(
        map: &'v mut FieldMap<T>,
        field: FieldName,
        accessor: A,
        transform: P,
    ) -> Self
    where
        A: Fn(&T) -> &L + Send + Sync + 'static,
        L: Presence<[E]> + ?Sized + Send + Sync + 'static,
        E: Send + Sync + 'static,
        P: Fn(&E) -> F + Send + Sync + 'static,
    {
        let access: Arc<dyn Fn(&T) -> &L + Send + Sync> = Arc::new(accessor);
        let transform: Arc<dyn Fn(&E) -> F + Send + Sync> = Arc::new(transform);
        let compile: Compiler<T, F> = Arc::new(move |rules| {
            Arc::new(CompiledTransformArrayChain::new(
                Arc::clone(&access),
                Arc::clone(&transform),
                rules,
            ))
        });
        Self::open(map, Lane::Elements, field, compile)
    }

    fn open(
        map: &'v mut FieldMap<T>,
        lane: Lane,
        field: FieldName,
        compile: Compiler<T, F>,
    ) -> Self {
        let chain = RuleChain::new(field.clone(), compile);
        // An empty snapshot claims the slot so a no-rule chain is still a
        // valid (always-passing) declaration.
        let slot = map.register(field, lane, chain.snapshot());
        Self {
            map,
            slot,
            chain,
            _state: PhantomData,
            _mode: PhantomData,
        }
    }
}

// ── shared mechanics ────────────────────────────────────────────────────────

impl<'v, T, F, S, M> RuleBuilder<'v, T, F, S, M>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    /// Rebinds the typestate without touching the chain.
    fn shift<S2>(self) -> RuleBuilder<'v, T, F, S2, M> {
        RuleBuilder {
            map: self.map,
            slot: self.slot,
            chain: self.chain,
            _state: PhantomData,
            _mode: PhantomData,
        }
    }

    /// Swaps a fresh snapshot of the chain into the validator's slot.
    fn commit(&mut self) {
        self.map.replace(self.slot, self.chain.snapshot());
        trace!(
            field = %self.chain.field,
            rules = self.chain.len(),
            "rule chain recompiled"
        );
    }

    fn append(mut self, check: Check<T, F>) -> RuleBuilder<'v, T, F, Appended, M> {
        self.chain.append(check);
        self.commit();
        self.shift()
    }

    /// Appends a catalog atom lifted over the field's presence: an absent
    /// value passes without the atom ever seeing it.
    fn lifted<V, C>(self, atom: C) -> RuleBuilder<'v, T, F, Appended, M>
    where
        V: ?Sized,
        C: Constraint<V> + Send + Sync + 'static,
        F: Presence<V>,
    {
        self.append(Check::Sync(Arc::new(move |value: &F, _: &T| {
            value.present().and_then(|inner| atom.check(inner))
        })))
    }

    fn gated(
        mut self,
        kind: GateKind,
        predicate: Gate<T>,
        scope: GateScope,
    ) -> RuleBuilder<'v, T, F, Settled, M> {
        self.chain.gate(kind, predicate, scope);
        self.commit();
        self.shift()
    }
}

// ── catalog: any state, either mode ─────────────────────────────────────────

impl<'v, T, F, S, M> RuleBuilder<'v, T, F, S, M>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    /// The value must equal `other`. Fails with `Value must equal '{other}'`.
    pub fn equal<V>(self, other: V) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<V>,
        V: PartialEq + Display + Send + Sync + 'static,
    {
        self.lifted(Equal::new(other))
    }

    /// The value must not equal `other`.
    pub fn not_equal<V>(self, other: V) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<V>,
        V: PartialEq + Display + Send + Sync + 'static,
    {
        self.lifted(NotEqual::new(other))
    }

    /// The string must contain at least one non-whitespace character.
    pub fn not_empty(self) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<str>,
    {
        self.lifted(NotEmpty)
    }

    /// The string's character count must lie within `min..=max`.
    ///
    /// # Panics
    ///
    /// Panics at declaration time when `min > max`.
    pub fn length(self, min: usize, max: usize) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<str>,
    {
        assert!(
            min <= max,
            "length on field \"{}\": min ({min}) must not exceed max ({max})",
            self.chain.field,
        );
        self.lifted(Length::new(min, max))
    }

    /// The string's character count must be at least `min`.
    pub fn min_length(self, min: usize) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<str>,
    {
        self.lifted(MinLength::new(min))
    }

    /// The string's character count must be at most `max`.
    pub fn max_length(self, max: usize) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<str>,
    {
        self.lifted(MaxLength::new(max))
    }

    /// The string must match `pattern`.
    pub fn matches(self, pattern: Regex) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<str>,
    {
        self.lifted(Matches::new(pattern))
    }

    /// The string must look like an email address.
    pub fn email_address(self) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<str>,
    {
        self.lifted(EmailAddress::new())
    }

    /// The value must be strictly below `bound`.
    pub fn less_than<V>(self, bound: V) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<V>,
        V: PartialOrd + Display + Send + Sync + 'static,
    {
        self.lifted(LessThan::new(bound))
    }

    /// The value must be at most `bound`.
    pub fn less_than_or_equal<V>(self, bound: V) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<V>,
        V: PartialOrd + Display + Send + Sync + 'static,
    {
        self.lifted(LessThanOrEqual::new(bound))
    }

    /// The value must be strictly above `bound`.
    pub fn greater_than<V>(self, bound: V) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<V>,
        V: PartialOrd + Display + Send + Sync + 'static,
    {
        self.lifted(GreaterThan::new(bound))
    }

    /// The value must be at least `bound`.
    pub fn greater_than_or_equal<V>(self, bound: V) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<V>,
        V: PartialOrd + Display + Send + Sync + 'static,
    {
        self.lifted(GreaterThanOrEqual::new(bound))
    }

    /// The value must lie within `lower..=upper`.
    ///
    /// # Panics
    ///
    /// Panics at declaration time when `lower > upper`.
    pub fn inclusive_between<V>(self, lower: V, upper: V) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<V>,
        V: PartialOrd + Display + Send + Sync + 'static,
    {
        assert!(
            lower <= upper,
            "inclusive_between on field \"{}\": lower ({lower}) must not exceed upper ({upper})",
            self.chain.field,
        );
        self.lifted(InclusiveBetween::new(lower, upper))
    }

    /// The value must lie strictly between `lower` and `upper`.
    ///
    /// # Panics
    ///
    /// Panics at declaration time when `lower >= upper`; an exclusive range
    /// needs room between its bounds.
    pub fn exclusive_between<V>(self, lower: V, upper: V) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<V>,
        V: PartialOrd + Display + Send + Sync + 'static,
    {
        assert!(
            lower < upper,
            "exclusive_between on field \"{}\": lower ({lower}) must be below upper ({upper})",
            self.chain.field,
        );
        self.lifted(ExclusiveBetween::new(lower, upper))
    }

    /// The value must fit a digit budget: at most `scale` decimals and at
    /// most `precision` digits in total.
    ///
    /// # Panics
    ///
    /// Panics at declaration time when `precision` is zero or `scale`
    /// exceeds `precision`.
    pub fn scale_precision(self, scale: u32, precision: u32) -> RuleBuilder<'v, T, F, Appended, M>
    where
        F: Presence<f64>,
    {
        assert!(
            precision > 0,
            "scale_precision on field \"{}\": precision must be positive",
            self.chain.field,
        );
        assert!(
            scale <= precision,
            "scale_precision on field \"{}\": scale ({scale}) must not exceed precision ({precision})",
            self.chain.field,
        );
        self.lifted(ScalePrecision::new(scale, precision))
    }

    /// Escape hatch: a caller-supplied predicate over the raw field value
    /// and the whole model. Fails with `Value is not valid` unless
    /// overridden.
    ///
    /// Unlike catalog rules, `must` is not lifted over presence: the
    /// predicate sees the field exactly as the accessor returned it, which
    /// is what makes whole-array and cross-field conditions expressible.
    pub fn must<P>(self, predicate: P) -> RuleBuilder<'v, T, F, Appended, M>
    where
        P: Fn(&F, &T) -> bool + Send + Sync + 'static,
    {
        self.append(Check::Sync(Arc::new(move |value: &F, model: &T| {
            if predicate(value, model) {
                None
            } else {
                Some(Message::Borrowed("Value is not valid"))
            }
        })))
    }

    /// Runs rules only while `condition` holds on the model.
    ///
    /// [`GateScope::All`] reaches back over every rule appended so far;
    /// [`GateScope::Latest`] gates only the most recent one. Either way,
    /// rules appended after this call are not affected. A later `when` on
    /// the same rule replaces the earlier one.
    pub fn when<P>(self, condition: P, scope: GateScope) -> RuleBuilder<'v, T, F, Settled, M>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.gated(GateKind::When, Arc::new(condition), scope)
    }

    /// Runs rules only while `condition` does not hold on the model.
    /// Scope semantics match [`RuleBuilder::when`].
    pub fn unless<P>(self, condition: P, scope: GateScope) -> RuleBuilder<'v, T, F, Settled, M>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.gated(GateKind::Unless, Arc::new(condition), scope)
    }
}

// ── catalog: optional fields only ───────────────────────────────────────────

impl<'v, T, U, S, M> RuleBuilder<'v, T, Option<U>, S, M>
where
    T: Send + Sync + 'static,
    U: Send + Sync + 'static,
{
    /// The optional value must be present. This is the only rule that can
    /// fail an absent field; everything else passes on `None`.
    pub fn not_null(self) -> RuleBuilder<'v, T, Option<U>, Appended, M> {
        self.lifted::<Option<U>, _>(NotNull)
    }

    /// The optional value must be absent.
    pub fn null(self) -> RuleBuilder<'v, T, Option<U>, Appended, M> {
        self.lifted::<Option<U>, _>(Null)
    }
}

// ── message override: appended state only ───────────────────────────────────

impl<'v, T, F, M> RuleBuilder<'v, T, F, Appended, M>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    /// Replaces the failure message of the rule appended immediately before.
    ///
    /// Consumes the `Appended` state, so each rule takes at most one
    /// override, and calling this after a gate or before any rule does not
    /// compile.
    pub fn with_message(
        mut self,
        message: impl Into<Message>,
    ) -> RuleBuilder<'v, T, F, Settled, M> {
        self.chain.override_latest(message.into());
        self.commit();
        self.shift()
    }
}

// ── delegation and async checks: mode-specific ──────────────────────────────

impl<'v, T, F, S> RuleBuilder<'v, T, F, S, SyncMode>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    /// Delegates the field to a nested [`Validator`] produced by `factory`.
    ///
    /// The factory runs on first evaluation, not at declaration, so models
    /// that contain themselves (`manager: Option<Box<Employee>>`) declare
    /// cleanly. An absent field skips delegation entirely. Failures nest as
    /// a sub-report under this field's name.
    pub fn set_validator<U, G>(self, factory: G) -> RuleBuilder<'v, T, F, Settled, SyncMode>
    where
        F: Presence<U>,
        U: Send + Sync + 'static,
        G: Fn() -> Validator<U> + Send + Sync + 'static,
    {
        let nested: OnceLock<Validator<U>> = OnceLock::new();
        let delegate = move |value: &F| -> Option<ErrorNode> {
            let Some(inner) = value.present() else {
                return None;
            };
            let report = nested.get_or_init(&factory).validate(inner);
            if report.is_empty() {
                None
            } else {
                Some(ErrorNode::Nested(report))
            }
        };
        self.append(Check::Delegate(Arc::new(delegate))).shift()
    }
}

impl<'v, T, F, S> RuleBuilder<'v, T, F, S, AsyncMode>
where
    T: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    /// Escape hatch for asynchronous conditions: the predicate borrows the
    /// value and model to build its future, and the future must own
    /// whatever it keeps. Fails with `Value is not valid` unless
    /// overridden.
    pub fn must_async<P, Fut>(self, predicate: P) -> RuleBuilder<'v, T, F, Appended, AsyncMode>
    where
        P: Fn(&F, &T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.append(Check::Async(Arc::new(MustAsync::new(predicate))))
    }

    /// Delegates the field to a nested [`AsyncValidator`] produced by
    /// `factory`. Semantics match the sync form: lazy factory, absent
    /// fields skip, failures nest.
    pub fn set_validator<U, G>(self, factory: G) -> RuleBuilder<'v, T, F, Settled, AsyncMode>
    where
        F: Presence<U>,
        U: Send + Sync + 'static,
        G: Fn() -> AsyncValidator<U> + Send + Sync + 'static,
    {
        self.append(Check::Async(Arc::new(AsyncDelegate::new(factory))))
            .shift()
    }
}

// ============================================================================
// TESTS
// ============================================================================
