//! Basic usage: declaring rule chains and reading the report.
//!
//! Run with: cargo run --example basic_usage -p verdict

use verdict::prelude::*;

struct Signup {
    username: String,
    email: String,
    age: i64,
    referrer: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut validator = Validator::new();
    validator
        .rule_for("username", |s: &Signup| &s.username)
        .not_empty()
        .length(3, 20)
        .with_message("Usernames are 3 to 20 characters");
    validator
        .rule_for("email", |s: &Signup| &s.email)
        .not_empty()
        .email_address();
    validator
        .rule_for("age", |s: &Signup| &s.age)
        .inclusive_between(13, 120)
        .unless(|s: &Signup| s.referrer.is_some(), GateScope::Latest);
    validator
        .rule_for("referrer", |s: &Signup| &s.referrer)
        .min_length(3);

    // A clean model: the report is empty and bridges to Ok.
    let clean = Signup {
        username: "quince".to_string(),
        email: "quince@example.com".to_string(),
        age: 31,
        referrer: None,
    };
    println!(
        "clean signup: {}",
        if validator.validate(&clean).into_result().is_ok() {
            "✓ passes"
        } else {
            "✗ fails"
        }
    );

    // A messy one: each failing field reports its first broken rule.
    let messy = Signup {
        username: "x".to_string(),
        email: "not-an-email".to_string(),
        age: 9,
        referrer: Some("jo".to_string()),
    };
    let report = validator.validate(&messy);

    println!("\nmessy signup, flat paths:");
    for (path, message) in report.flatten() {
        println!("  {path}: {message}");
    }

    println!("\nmessy signup, model-shaped:");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
