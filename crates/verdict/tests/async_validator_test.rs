//! Engine-level scenarios for the asynchronous validator.
//!
//! The async engine promises the exact semantics of the sync one: same
//! walk order, same short-circuiting, same report. These tests pin that
//! parity down and then exercise the async-only surface, `must_async` and
//! async delegation.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use verdict::prelude::*;

// ============================================================================
// FIXTURES
// ============================================================================

struct Booking {
    guest: String,
    nights: i64,
    notes: Option<String>,
    scores: Vec<i64>,
}

fn sloppy_booking() -> Booking {
    Booking {
        guest: "  ".to_string(),
        nights: 0,
        notes: Some(String::new()),
        scores: vec![5, -1],
    }
}

// ============================================================================
// PARITY WITH THE SYNC ENGINE
// ============================================================================

#[tokio::test]
async fn sync_and_async_engines_agree_on_reports() {
    let model = sloppy_booking();

    let mut sync_engine = Validator::new();
    sync_engine
        .rule_for("guest", |b: &Booking| &b.guest)
        .not_empty()
        .min_length(2);
    sync_engine
        .rule_for("nights", |b: &Booking| &b.nights)
        .greater_than(0);
    sync_engine
        .rule_for("notes", |b: &Booking| &b.notes)
        .not_empty();
    sync_engine
        .rule_for_each("scores", |b: &Booking| &b.scores)
        .greater_than_or_equal(0);

    let mut async_engine = AsyncValidator::new();
    async_engine
        .rule_for("guest", |b: &Booking| &b.guest)
        .not_empty()
        .min_length(2);
    async_engine
        .rule_for("nights", |b: &Booking| &b.nights)
        .greater_than(0);
    async_engine
        .rule_for("notes", |b: &Booking| &b.notes)
        .not_empty();
    async_engine
        .rule_for_each("scores", |b: &Booking| &b.scores)
        .greater_than_or_equal(0);

    let sync_report = serde_json::to_value(sync_engine.validate(&model)).unwrap();
    let async_report = serde_json::to_value(async_engine.validate(&model).await).unwrap();
    assert_eq!(sync_report, async_report);
}

// ============================================================================
// STRICTLY SEQUENTIAL EVALUATION
// ============================================================================

#[tokio::test]
async fn rules_run_one_at_a_time_in_declaration_order() {
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let mut validator = AsyncValidator::new();

    let tap = Arc::clone(&log);
    validator
        .rule_for("guest", |b: &Booking| &b.guest)
        .must_async(move |_: &String, _: &Booking| {
            let tap = Arc::clone(&tap);
            async move {
                tap.lock().unwrap().push("guest chain 1, rule 1".to_string());
                true
            }
        });

    let tap_first = Arc::clone(&log);
    let tap_second = Arc::clone(&log);
    validator
        .rule_for("guest", |b: &Booking| &b.guest)
        .must_async(move |_: &String, _: &Booking| {
            let tap = Arc::clone(&tap_first);
            async move {
                tap.lock().unwrap().push("guest chain 2, rule 1".to_string());
                false
            }
        })
        .with_message("second chain fails")
        .must_async(move |_: &String, _: &Booking| {
            let tap = Arc::clone(&tap_second);
            async move {
                tap.lock().unwrap().push("guest chain 2, rule 2".to_string());
                true
            }
        });

    let tap = Arc::clone(&log);
    validator
        .rule_for_each("scores", |b: &Booking| &b.scores)
        .must_async(move |score: &i64, _: &Booking| {
            let tap = Arc::clone(&tap);
            let score = *score;
            async move {
                tap.lock().unwrap().push(format!("score {score}"));
                score >= 0
            }
        });

    let report = validator.validate(&sloppy_booking()).await;

    let trace = log.lock().unwrap().clone();
    assert_eq!(
        trace,
        [
            "guest chain 1, rule 1",
            "guest chain 2, rule 1",
            "score 5",
            "score -1",
        ],
    );

    assert_eq!(report.message("guest"), Some("second chain fails"));
    let items = report
        .get("scores")
        .and_then(ErrorNode::as_items)
        .expect("negative score fails elementwise");
    assert!(items[0].is_none());
    assert_eq!(
        items[1].as_ref().and_then(ErrorNode::as_message),
        Some("Value is not valid"),
    );
}

// ============================================================================
// MUST_ASYNC
// ============================================================================

#[tokio::test]
async fn must_async_defaults_to_the_generic_message() {
    let mut validator = AsyncValidator::new();
    validator
        .rule_for("nights", |b: &Booking| &b.nights)
        .must_async(|nights: &i64, _: &Booking| {
            let nights = *nights;
            async move { nights > 0 }
        });

    let report = validator.validate(&sloppy_booking()).await;
    assert_eq!(report.message("nights"), Some("Value is not valid"));
}

#[tokio::test]
async fn gates_apply_to_async_rules_too() {
    let mut validator = AsyncValidator::new();
    validator
        .rule_for("nights", |b: &Booking| &b.nights)
        .must_async(|_: &i64, _: &Booking| async { false })
        .when(|b: &Booking| b.guest.is_empty(), GateScope::Latest);

    // Gate predicate is false for a named guest, so the rule never runs.
    let report = validator.validate(&sloppy_booking()).await;
    assert!(report.is_empty());
}

// ============================================================================
// ASYNC DELEGATION
// ============================================================================

struct Region {
    name: String,
    parent: Option<Box<Region>>,
}

fn region_validator() -> AsyncValidator<Region> {
    let mut validator = AsyncValidator::new();
    validator
        .rule_for("name", |r: &Region| &r.name)
        .must_async(|name: &String, _: &Region| {
            let present = !name.trim().is_empty();
            async move { present }
        })
        .with_message("Region name missing");
    validator
        .rule_for("parent", |r: &Region| &r.parent)
        .set_validator(region_validator);
    validator
}

#[tokio::test]
async fn recursive_async_delegation_reaches_the_invalid_ancestor() {
    let model = Region {
        name: "district".to_string(),
        parent: Some(Box::new(Region {
            name: "zone".to_string(),
            parent: Some(Box::new(Region {
                name: " ".to_string(),
                parent: None,
            })),
        })),
    };

    let report = region_validator().validate(&model).await;
    assert_eq!(report.len(), 1);

    let level_one = report
        .get("parent")
        .and_then(ErrorNode::as_nested)
        .expect("failure sits two levels down");
    let level_two = level_one
        .get("parent")
        .and_then(ErrorNode::as_nested)
        .expect("failure sits two levels down");
    assert_eq!(level_two.message("name"), Some("Region name missing"));
}

#[tokio::test]
async fn absent_parent_skips_async_delegation() {
    let model = Region {
        name: "root".to_string(),
        parent: None,
    };

    let report = region_validator().validate(&model).await;
    assert!(report.is_empty());
}
