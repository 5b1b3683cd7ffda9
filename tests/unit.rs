//! Unit tests for naming, sorting, display and error formatting.
mod common;
use common::sample_activity;
use kousei::model::{SiblingSet, sort_by_name, unique_name};
use kousei::prelude::*;

#[test]
fn test_unique_name_without_collision() {
    let taken = ["amount", "customer"];
    assert_eq!(unique_name("total", None, taken), "total");
}

#[test]
fn test_unique_name_picks_smallest_free_suffix() {
    let taken = ["in", "in-2", "in-4"];
    assert_eq!(unique_name("in", None, taken), "in-3");
}

#[test]
fn test_unique_name_is_case_insensitive_but_keeps_spelling() {
    let taken = ["Amount"];
    assert_eq!(unique_name("amount", None, taken), "amount-2");
    assert_eq!(unique_name("AMOUNT", None, taken), "AMOUNT-2");
}

#[test]
fn test_unique_name_excludes_the_renamed_node() {
    let taken = ["amount", "customer"];
    assert_eq!(unique_name("amount", Some("amount"), taken), "amount");
    assert_eq!(unique_name("customer", Some("amount"), taken), "customer-2");
}

#[test]
fn test_sort_by_name_is_case_insensitive_and_stable() {
    let mut items = vec![("b", 1), ("A", 2), ("a", 3), ("B", 4)];
    sort_by_name(&mut items, |t| t.0);
    // Case-insensitive ascending; equal keys keep their relative order.
    assert_eq!(items, vec![("A", 2), ("a", 3), ("b", 1), ("B", 4)]);
}

#[test]
fn test_resort_section_children() {
    let mut activity = sample_activity();
    let section = activity.section_mut("validate").unwrap();
    section.inputs.reverse();
    activity.resort(&SiblingSet::SectionInputs("validate".to_string()));
    let names: Vec<&str> = activity.section("validate").unwrap().inputs.iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(names, vec!["strict", "value"]);
}

#[test]
fn test_resort_for_missing_owner_is_noop() {
    let mut activity = sample_activity();
    let before = activity.clone();
    activity.resort(&SiblingSet::SectionInputs("ghost".to_string()));
    assert_eq!(activity, before);
}

#[test]
fn test_port_display() {
    let source = SourcePort::SectionOutput {
        section: "validate".to_string(),
        output: "ok".to_string(),
    };
    let target = TargetPort::Output {
        output: "total".to_string(),
    };
    assert_eq!(format!("{}", source), "output 'ok' of section 'validate'");
    assert_eq!(format!("{}", target), "output 'total'");
    let connection = Connection::new(source, target);
    assert_eq!(
        format!("{}", connection),
        "output 'ok' of section 'validate' -> output 'total'"
    );
}

#[test]
fn test_no_change_carries_its_reason() {
    let mut change = NoChange::new("section 'ghost' is not in model");
    assert_eq!(change.reason(), "section 'ghost' is not in model");
    assert_eq!(
        Change::rejection(&change),
        Some("section 'ghost' is not in model")
    );

    let mut activity = sample_activity();
    let before = activity.clone();
    change.apply(&mut activity);
    change.revert(&mut activity);
    assert_eq!(activity, before);
}

#[test]
fn test_error_display() {
    let err = ShapeError::DuplicateName("value".to_string());
    assert!(err.to_string().contains("value"));

    let err = ShapeError::ConflictingMapping {
        first: "a".to_string(),
        second: "b".to_string(),
        target: "c".to_string(),
    };
    let formatted = err.to_string();
    assert!(formatted.contains("'a'") && formatted.contains("'b'") && formatted.contains("'c'"));

    let err = PersistError::Decode("unexpected end of input".to_string());
    assert!(err.to_string().contains("deserialization"));
}

#[test]
fn test_case_insensitive_model_lookup() {
    let activity = sample_activity();
    assert!(activity.input("AMOUNT").is_some());
    assert!(activity.section("Validate").is_some());
    assert!(activity.procedure("CALC").is_some());
    assert!(activity.output("Total").is_some());
    assert!(activity.exception("timeouterror").is_some());
    assert!(activity.input("ghost").is_none());
}
