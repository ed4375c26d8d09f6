//! Property-based tests for the validation engine.

use proptest::prelude::*;
use verdict::prelude::*;

struct Sample {
    text: String,
    maybe: Option<String>,
    numbers: Vec<i64>,
}

// ============================================================================
// IDEMPOTENCE: validate(m) == validate(m)
// ============================================================================

proptest! {
    #[test]
    fn evaluation_is_idempotent(
        text in ".{0,12}",
        numbers in proptest::collection::vec(-50_i64..150, 0..8),
    ) {
        let mut validator = Validator::new();
        validator
            .rule_for("text", |s: &Sample| &s.text)
            .not_empty()
            .min_length(3);
        validator
            .rule_for_each("numbers", |s: &Sample| &s.numbers)
            .inclusive_between(0, 100);

        let model = Sample { text, maybe: None, numbers };
        let first = serde_json::to_value(validator.validate(&model)).unwrap();
        let second = serde_json::to_value(validator.validate(&model)).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// SHORT-CIRCUIT: the first failing rule owns the field's message
// ============================================================================

proptest! {
    #[test]
    fn the_first_failing_rule_wins(text in ".{0,12}") {
        let mut validator = Validator::new();
        validator
            .rule_for("text", |s: &Sample| &s.text)
            .not_empty().with_message("is blank")
            .min_length(3).with_message("is short")
            .max_length(6).with_message("is long");

        let expected = if text.trim().is_empty() {
            Some("is blank")
        } else if text.chars().count() < 3 {
            Some("is short")
        } else if text.chars().count() > 6 {
            Some("is long")
        } else {
            None
        };

        let model = Sample { text, maybe: None, numbers: Vec::new() };
        prop_assert_eq!(validator.validate(&model).message("text"), expected);
    }
}

// ============================================================================
// ABSENCE <=> ALL PASS: a field enters the report iff a rule failed
// ============================================================================

proptest! {
    #[test]
    fn a_field_appears_in_the_report_iff_a_rule_fails(
        maybe in proptest::option::of(".{0,8}"),
    ) {
        let mut validator = Validator::new();
        validator
            .rule_for("maybe", |s: &Sample| &s.maybe)
            .not_empty();

        let fails = maybe.as_deref().is_some_and(|v| v.trim().is_empty());
        let model = Sample { text: String::new(), maybe, numbers: Vec::new() };
        let report = validator.validate(&model);

        prop_assert_eq!(report.get("maybe").is_some(), fails);
        prop_assert_eq!(report.is_empty(), !fails);
    }
}

// ============================================================================
// INDEX ALIGNMENT: elementwise items mirror the input positions
// ============================================================================

proptest! {
    #[test]
    fn elementwise_items_align_with_input_indices(
        numbers in proptest::collection::vec(-50_i64..150, 0..16),
    ) {
        let mut validator = Validator::new();
        validator
            .rule_for_each("numbers", |s: &Sample| &s.numbers)
            .inclusive_between(0, 100);

        let model = Sample {
            text: String::new(),
            maybe: None,
            numbers: numbers.clone(),
        };
        let report = validator.validate(&model);

        let out_of_range: Vec<bool> =
            numbers.iter().map(|n| !(0..=100).contains(n)).collect();
        if out_of_range.contains(&true) {
            let items = report
                .get("numbers")
                .and_then(ErrorNode::as_items)
                .expect("at least one element failed");
            prop_assert_eq!(items.len(), numbers.len());
            for (slot, failed) in items.iter().zip(&out_of_range) {
                prop_assert_eq!(slot.is_some(), *failed);
            }
        } else {
            prop_assert!(report.is_empty());
        }
    }
}
