//! Integration tests for rule sets
//!
//! Covers registration by reference and by accessor, aggregation of every
//! violation, nesting of rule sets, and flattened records.

#![cfg(feature = "derive")]

use pretty_assertions::assert_eq;
use requiring::prelude::*;
use requiring::{
    structure, Error, Length, MaxLength, MinLength, MinLengthViolation, NotEmpty, RangeViolation,
    Record, StructValidator,
};
use std::sync::Arc;

#[derive(Debug, Default, Clone, Record)]
struct Address {
    city: String,
    postcode: String,
}

#[derive(Debug, Default, Clone, Record)]
struct Metadata {
    source: String,
    revision: u32,
}

#[derive(Debug, Default, Clone, Record)]
struct Customer {
    name: String,
    email: String,
    address: Address,
    #[record(flatten)]
    meta: Metadata,
}

fn customer() -> Customer {
    Customer {
        name: "Grace".to_string(),
        email: "grace@example.com".to_string(),
        address: Address {
            city: "Arlington".to_string(),
            postcode: "22201".to_string(),
        },
        meta: Metadata {
            source: "import".to_string(),
            revision: 1,
        },
    }
}

fn customer_rules() -> StructValidator<Customer> {
    structure::<Customer>(|s, c| {
        s.add_ref(&c.name, "name", validators![NotEmpty::new(), MaxLength::new(20)]);
        s.add(|c| &c.email, "email", validators![Length::new(3, 64)]);
    })
}

#[test]
fn test_valid_record_passes() {
    assert!(customer_rules().validate(&customer()).is_ok());
    assert!(customer_rules().violations(&customer()).is_empty());
}

#[test]
fn test_single_violation_is_prefixed_with_rule_name() {
    let mut record = customer();
    record.email = "ab".to_string();

    let errors = customer_rules().violations(&record);
    assert_eq!(errors.len(), 1);

    let err = errors.iter().next().unwrap();
    assert_eq!(err.rule_name(), Some("email"));
    assert_eq!(err.to_string(), "'email' the length must be in range(3 ... 64)");
}

#[test]
fn test_no_short_circuit_across_rules() {
    let rules = structure::<Customer>(|s, c| {
        s.add_ref(&c.name, "name-min", validators![MinLength::new(3)]);
        s.add_ref(&c.name, "name-required", validators![NotEmpty::new()]);
    });

    let mut record = customer();
    record.name = String::new();

    let errors = rules.violations(&record);
    assert_eq!(errors.len(), 2);

    let names: Vec<&str> = errors.iter().filter_map(Error::rule_name).collect();
    assert_eq!(names, vec!["name-min", "name-required"]);
    assert!(errors.iter().next().unwrap().downcast_ref::<MinLengthViolation<String>>().is_some());
    assert!(errors.iter().nth(1).unwrap().downcast_ref::<RangeViolation<String>>().is_some());
}

#[test]
fn test_no_short_circuit_within_rule() {
    let rules = structure::<Customer>(|s, c| {
        s.add_ref(
            &c.name,
            "name",
            validators![NotEmpty::new(), MinLength::new(2), Length::new(1, 5)],
        );
    });

    let mut record = customer();
    record.name = String::new();

    let err = rules.validate(&record).unwrap_err();
    assert_eq!(err.violation_count(), 3);
    assert_eq!(
        err.to_string(),
        "'name' requires\n\
         'name' the length must be no less than 2\n\
         'name' the length must be in range(1 ... 5)"
    );
}

#[test]
fn test_rules_relocate_into_other_instances() {
    let rules = customer_rules();
    let mut first = customer();
    let mut second = customer();
    first.name = "x".repeat(21);
    second.email = "no".to_string();

    let first_rules: Vec<String> = rules
        .violations(&first)
        .iter()
        .filter_map(|e| e.rule_name().map(str::to_string))
        .collect();
    let second_rules: Vec<String> = rules
        .violations(&second)
        .iter()
        .filter_map(|e| e.rule_name().map(str::to_string))
        .collect();

    assert_eq!(first_rules, vec!["name"]);
    assert_eq!(second_rules, vec!["email"]);
}

#[test]
fn test_validation_is_idempotent() {
    let rules = customer_rules();
    let mut record = customer();
    record.name = String::new();
    record.email = "a".to_string();

    let first = rules.violations(&record).to_string();
    let second = rules.violations(&record).to_string();
    assert_eq!(first, second);
    assert_eq!(rules.violations(&record).by_rule(), rules.violations(&record).by_rule());
}

#[test]
fn test_flattened_fields_resolve() {
    let rules = structure::<Customer>(|s, c| {
        s.add_ref(&c.meta.source, "source", validators![NotEmpty::new()]);
    });
    assert_eq!(rules.rule("source").unwrap().field().name(), "meta.source");

    let mut record = customer();
    record.meta.source.clear();
    assert_eq!(
        rules.validate(&record).unwrap_err().to_string(),
        "'source' requires"
    );
}

#[test]
#[should_panic(expected = "cannot register rule")]
fn test_field_of_non_flattened_record_fails_at_registration() {
    structure::<Customer>(|s, c| {
        s.add_ref(&c.address.postcode, "postcode", validators![NotEmpty::new()]);
    });
}

#[test]
#[should_panic(expected = "cannot register rule")]
fn test_reference_outside_template_fails_at_registration() {
    let elsewhere = customer();
    structure::<Customer>(|s, _| {
        s.add_ref(&elsewhere.name, "name", validators![NotEmpty::new()]);
    });
}

#[test]
fn test_nested_rule_sets() {
    let address_rules = structure::<Address>(|s, a| {
        s.add_ref(&a.city, "city", validators![NotEmpty::new()]);
        s.add_ref(&a.postcode, "postcode", validators![Length::new(5, 5)]);
    });

    let rules = structure::<Customer>(|s, c| {
        s.add_ref(&c.name, "name", validators![NotEmpty::new()]);
        s.add_ref(&c.address, "address", validators![address_rules]);
    });

    let mut record = customer();
    record.address.city.clear();
    record.address.postcode = "123".to_string();

    let errors = rules.violations(&record);
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.to_string(),
        "'address' 'city' requires\n\
         'address' 'postcode' the length must be in range(5 ... 5)"
    );
    assert_eq!(
        errors.iter().next().unwrap().rule_path(),
        vec!["address", "city"]
    );
}

#[test]
fn test_shared_nested_rule_set() {
    let address_rules = Arc::new(structure::<Address>(|s, a| {
        s.add_ref(&a.city, "city", validators![NotEmpty::new()]);
    }));

    #[derive(Debug, Default, Record)]
    struct Shipment {
        from: Address,
        to: Address,
    }

    let rules = structure::<Shipment>(|s, sh| {
        s.add_ref(&sh.from, "from", validators![address_rules.clone()]);
        s.add_ref(&sh.to, "to", validators![address_rules.clone()]);
    });

    let errors = rules.violations(&Shipment::default());
    let grouped = errors.by_rule();
    assert_eq!(grouped["from"], vec!["'city' requires"]);
    assert_eq!(grouped["to"], vec!["'city' requires"]);
}

#[test]
fn test_built_validator_is_shareable_across_threads() {
    let rules = Arc::new(customer_rules());
    let mut record = customer();
    record.name = String::new();
    let record = Arc::new(record);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let rules = Arc::clone(&rules);
            let record = Arc::clone(&record);
            std::thread::spawn(move || rules.violations(&record).len())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}

#[test]
fn test_custom_printer_only_affects_configured_instance() {
    let base = MinLength::<String>::new(5);
    let custom = base.with_printer_fn(|w, min| write!(w, "at least {} characters, please", min));

    let rules = structure::<Customer>(|s, c| {
        s.add_ref(&c.name, "plain", validators![base.clone()]);
        s.add_ref(&c.name, "custom", validators![custom]);
    });

    let mut record = customer();
    record.name = "Al".to_string();

    assert_eq!(
        rules.validate(&record).unwrap_err().to_string(),
        "'plain' the length must be no less than 5\n\
         'custom' at least 5 characters, please"
    );
}

#[test]
fn test_record_level_rule() {
    #[derive(Debug, thiserror::Error)]
    #[error("email must not contain the name")]
    struct EmailContainsName;

    let rules = structure::<Customer>(|s, _| {
        s.add_record(
            "email-vs-name",
            validators![requiring::validator_fn(|c: &Customer| {
                if c.email.to_lowercase().contains(&c.name.to_lowercase()) {
                    Err(Error::violation(EmailContainsName))
                } else {
                    Ok(())
                }
            })],
        );
    });

    assert_eq!(
        rules.validate(&customer()).unwrap_err().to_string(),
        "'email-vs-name' email must not contain the name"
    );
}

#[cfg(feature = "serde")]
#[test]
fn test_serialize_violations_by_rule() {
    let mut record = customer();
    record.name = String::new();
    record.email = "a".to_string();

    let json = serde_json::to_value(customer_rules().violations(&record)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "email": ["the length must be in range(3 ... 64)"],
            "name": ["requires"],
        })
    );
}
