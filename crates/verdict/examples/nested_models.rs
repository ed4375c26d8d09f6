//! Nested and self-referential models via validator delegation.
//!
//! Run with: cargo run --example nested_models -p verdict

use verdict::prelude::*;

struct Address {
    street: String,
    postcode: String,
}

struct Employee {
    name: String,
    age: i64,
    address: Option<Address>,
    line_manager: Option<Box<Employee>>,
}

fn address_validator() -> Validator<Address> {
    let mut validator = Validator::new();
    validator
        .rule_for("street", |a: &Address| &a.street)
        .not_empty();
    validator
        .rule_for("postcode", |a: &Address| &a.postcode)
        .not_empty()
        .max_length(10);
    validator
}

// The employee validator delegates `lineManager` to itself. The factory is
// only invoked when a manager is actually present, so the recursion always
// bottoms out with the model.
fn employee_validator() -> Validator<Employee> {
    let mut validator = Validator::new();
    validator
        .rule_for("name", |e: &Employee| &e.name)
        .not_empty();
    validator
        .rule_for("age", |e: &Employee| &e.age)
        .inclusive_between(18, 80);
    validator
        .rule_for("address", |e: &Employee| &e.address)
        .set_validator(address_validator);
    validator
        .rule_for("lineManager", |e: &Employee| &e.line_manager)
        .set_validator(employee_validator);
    validator
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let chain_of_command = Employee {
        name: "June".to_string(),
        age: 29,
        address: Some(Address {
            street: "12 Quay Lane".to_string(),
            postcode: String::new(),
        }),
        line_manager: Some(Box::new(Employee {
            name: "Hal".to_string(),
            age: 17,
            address: None,
            line_manager: None,
        })),
    };

    let report = employee_validator().validate(&chain_of_command);

    println!("flat paths:");
    for (path, message) in report.flatten() {
        println!("  {path}: {message}");
    }

    println!("\nmodel-shaped:");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
