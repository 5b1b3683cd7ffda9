//! Tests for the add / remove / refactor operation set.
mod common;
use ahash::AHashMap;
use common::{assert_model_eq, sample_activity};
use kousei::edit::ops;
use kousei::prelude::*;

#[test]
fn test_add_input_uniquifies_against_existing_siblings() {
    let mut activity = sample_activity();
    ops::add_input(&activity, "in", "i64").apply(&mut activity);
    ops::add_input(&activity, "in", "i64").apply(&mut activity);
    ops::add_input(&activity, "in", "i64").apply(&mut activity);

    let names: Vec<&str> = activity.inputs.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["amount", "customer", "in", "in-2", "in-3"]);
}

#[test]
fn test_add_keeps_siblings_sorted() {
    let mut activity = Activity::new("empty");
    ops::add_output(&activity, "zeta", "i64").apply(&mut activity);
    ops::add_output(&activity, "Alpha", "i64").apply(&mut activity);
    ops::add_output(&activity, "midway", "i64").apply(&mut activity);

    let names: Vec<&str> = activity.outputs.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "midway", "zeta"]);
}

#[test]
fn test_add_then_revert_restores_the_model() {
    let mut activity = sample_activity();
    let before = activity.clone();

    let mut change = ops::add_procedure(&activity, "enrich", "worker", "billing.Enrich", "run", vec![], "()");
    change.apply(&mut activity);
    assert!(activity.procedure("enrich").is_some());
    change.revert(&mut activity);
    assert_model_eq(&activity, &before);
}

#[test]
fn test_remove_missing_section_is_a_no_change() {
    let mut activity = Activity::new("empty");
    let mut change = ops::remove_section(&activity, "ghost");
    assert_eq!(change.rejection(), Some("section 'ghost' is not in model"));

    change.apply(&mut activity);
    assert!(activity.sections.is_empty());
    assert!(activity.connections.is_empty());
}

#[test]
fn test_remove_section_detaches_and_revert_restores_connections() {
    let mut activity = sample_activity();
    ops::link_input_to_section_input(&activity, "amount", "validate", "value").apply(&mut activity);
    ops::link_procedure_output_to_section_input(&activity, "calc", "done", "validate", "strict")
        .apply(&mut activity);
    ops::link_section_output_to_output(&activity, "validate", "ok", "total").apply(&mut activity);
    ops::link_section_output_to_procedure(&activity, "validate", "reason", "calc")
        .apply(&mut activity);
    ops::link_exception_to_procedure(&activity, "TimeoutError", "calc").apply(&mut activity);
    let before = activity.clone();

    let mut change = ops::remove_section(&activity, "validate");
    change.apply(&mut activity);
    assert!(activity.section("validate").is_none());
    // Only the exception link survives; all four section-incident connections
    // are detached with the node.
    assert_eq!(activity.connections.len(), 1);
    assert!(activity.connections[0].touches_exception("TimeoutError"));

    change.revert(&mut activity);
    assert_model_eq(&activity, &before);
}

#[test]
fn test_remove_procedure_detaches_incoming_and_outgoing() {
    let mut activity = sample_activity();
    ops::link_section_output_to_procedure(&activity, "validate", "ok", "calc").apply(&mut activity);
    ops::link_procedure_output_to_output(&activity, "calc", "done", "total").apply(&mut activity);
    ops::link_procedure_next_to_output(&activity, "calc", "report").apply(&mut activity);
    let before = activity.clone();

    let mut change = ops::remove_procedure(&activity, "calc");
    change.apply(&mut activity);
    assert!(activity.procedure("calc").is_none());
    assert!(activity.connections.is_empty());

    change.revert(&mut activity);
    assert_model_eq(&activity, &before);
}

#[test]
fn test_refactor_input_renames_use_sites() {
    let mut activity = sample_activity();
    ops::link_input_to_output(&activity, "amount", "total").apply(&mut activity);
    let before = activity.clone();

    let mut change = ops::refactor_input(&activity, "amount", "gross", "u64");
    change.apply(&mut activity);

    let renamed = activity.input("gross").expect("renamed input");
    assert_eq!(renamed.argument_type, "u64");
    assert!(activity.input("amount").is_none());
    assert_eq!(
        activity.connections[0].source,
        SourcePort::Input {
            input: "gross".to_string()
        }
    );

    change.revert(&mut activity);
    assert_model_eq(&activity, &before);
}

#[test]
fn test_refactor_input_uniquifies_the_new_name() {
    let mut activity = sample_activity();
    let mut change = ops::refactor_input(&activity, "amount", "customer", "String");
    change.apply(&mut activity);
    assert!(activity.input("customer-2").is_some());
}

#[test]
fn test_refactor_missing_node_is_a_no_change() {
    let activity = sample_activity();
    let change = ops::refactor_output(&activity, "ghost", "anything", "i64");
    assert_eq!(change.rejection(), Some("output 'ghost' is not in model"));
}

#[test]
fn test_refactor_section_reconciles_children_against_shape() {
    let mut activity = sample_activity();
    ops::link_input_to_section_input(&activity, "amount", "validate", "value").apply(&mut activity);
    ops::link_section_output_to_output(&activity, "validate", "ok", "total").apply(&mut activity);
    let before = activity.clone();

    // `value` is renamed to `candidate` (caller-confirmed), `strict` is
    // dropped, `limit` is new; outputs keep `ok` by name and drop `reason`.
    let mut input_renames = AHashMap::new();
    input_renames.insert("value".to_string(), "candidate".to_string());
    let fields = SectionFields {
        name: "screen".to_string(),
        source_class_name: "billing.Screen".to_string(),
        location: "lib/screen".to_string(),
        properties: vec![],
    };
    let input_shape = vec![
        PortShape::new("candidate", "i128"),
        PortShape::new("limit", "i64"),
    ];
    let output_shape = vec![PortShape::new("ok", "bool")];

    let mut change = ops::refactor_section(
        &activity,
        "validate",
        fields,
        &input_shape,
        &output_shape,
        &input_renames,
        &AHashMap::new(),
    )
    .expect("well-formed shape");
    change.apply(&mut activity);

    let section = activity.section("screen").expect("renamed section");
    assert_eq!(section.source_class_name, "billing.Screen");
    let input_names: Vec<&str> = section.inputs.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(input_names, vec!["candidate", "limit"]);
    assert_eq!(section.input("candidate").unwrap().parameter_type, "i128");
    let output_names: Vec<&str> = section.outputs.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(output_names, vec!["ok"]);

    // The incoming connection followed both the section rename and the
    // child rename; the outgoing one followed the section rename.
    assert_eq!(
        common::connection_set(&activity),
        [
            Connection::new(
                SourcePort::Input {
                    input: "amount".to_string()
                },
                TargetPort::SectionInput {
                    section: "screen".to_string(),
                    input: "candidate".to_string()
                },
            ),
            Connection::new(
                SourcePort::SectionOutput {
                    section: "screen".to_string(),
                    output: "ok".to_string()
                },
                TargetPort::Output {
                    output: "total".to_string()
                },
            ),
        ]
        .into_iter()
        .collect()
    );

    change.revert(&mut activity);
    assert_model_eq(&activity, &before);
}

#[test]
fn test_refactor_section_removed_child_keeps_connection_for_revert() {
    let mut activity = sample_activity();
    ops::link_input_to_section_input(&activity, "customer", "validate", "strict")
        .apply(&mut activity);
    let before = activity.clone();

    // Shape drops `strict` entirely.
    let fields = SectionFields {
        name: "validate".to_string(),
        source_class_name: "billing.Validate".to_string(),
        location: "lib/validate".to_string(),
        properties: before.section("validate").unwrap().properties.clone(),
    };
    let input_shape = vec![PortShape::new("value", "i64")];
    let output_shape = vec![
        PortShape::new("ok", "bool"),
        PortShape::new("reason", "String"),
    ];
    let mut change = ops::refactor_section(
        &activity,
        "validate",
        fields,
        &input_shape,
        &output_shape,
        &AHashMap::new(),
        &AHashMap::new(),
    )
    .expect("well-formed shape");

    change.apply(&mut activity);
    assert!(activity.section("validate").unwrap().input("strict").is_none());
    assert!(activity.connections.is_empty());

    change.revert(&mut activity);
    assert_model_eq(&activity, &before);
}

#[test]
fn test_refactor_section_rename_onto_removed_sibling_name_keeps_the_survivor_link() {
    let mut activity = sample_activity();
    ops::link_input_to_section_input(&activity, "amount", "validate", "value").apply(&mut activity);
    ops::link_input_to_section_input(&activity, "customer", "validate", "strict")
        .apply(&mut activity);
    let before = activity.clone();

    // `strict` is deleted and `value` takes over its freed name.
    let mut input_renames = AHashMap::new();
    input_renames.insert("value".to_string(), "strict".to_string());
    let fields = SectionFields {
        name: "validate".to_string(),
        source_class_name: "billing.Validate".to_string(),
        location: "lib/validate".to_string(),
        properties: before.section("validate").unwrap().properties.clone(),
    };
    let input_shape = vec![PortShape::new("strict", "i64")];
    let output_shape = vec![
        PortShape::new("ok", "bool"),
        PortShape::new("reason", "String"),
    ];
    let mut change = ops::refactor_section(
        &activity,
        "validate",
        fields,
        &input_shape,
        &output_shape,
        &input_renames,
        &AHashMap::new(),
    )
    .expect("well-formed shape");
    change.apply(&mut activity);

    let section = activity.section("validate").unwrap();
    let input_names: Vec<&str> = section.inputs.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(input_names, vec!["strict"]);
    // The renamed child keeps its incoming connection under the new name;
    // only the deleted child's connection is gone.
    assert_eq!(activity.connections.len(), 1);
    assert_eq!(
        activity.connections[0],
        Connection::new(
            SourcePort::Input {
                input: "amount".to_string()
            },
            TargetPort::SectionInput {
                section: "validate".to_string(),
                input: "strict".to_string()
            },
        )
    );

    change.revert(&mut activity);
    assert_model_eq(&activity, &before);
}

#[test]
fn test_refactor_section_swapping_sibling_names_keeps_links_distinct() {
    let mut activity = sample_activity();
    ops::link_input_to_section_input(&activity, "amount", "validate", "value").apply(&mut activity);
    ops::link_input_to_section_input(&activity, "customer", "validate", "strict")
        .apply(&mut activity);
    let before = activity.clone();

    // The two inputs trade names; each must keep its own connection.
    let mut input_renames = AHashMap::new();
    input_renames.insert("strict".to_string(), "value".to_string());
    input_renames.insert("value".to_string(), "strict".to_string());
    let fields = SectionFields {
        name: "validate".to_string(),
        source_class_name: "billing.Validate".to_string(),
        location: "lib/validate".to_string(),
        properties: before.section("validate").unwrap().properties.clone(),
    };
    let input_shape = vec![
        PortShape::new("strict", "i64"),
        PortShape::new("value", "bool"),
    ];
    let output_shape = vec![
        PortShape::new("ok", "bool"),
        PortShape::new("reason", "String"),
    ];
    let mut change = ops::refactor_section(
        &activity,
        "validate",
        fields,
        &input_shape,
        &output_shape,
        &input_renames,
        &AHashMap::new(),
    )
    .expect("well-formed shape");
    change.apply(&mut activity);

    let section = activity.section("validate").unwrap();
    assert_eq!(section.input("strict").unwrap().parameter_type, "i64");
    assert_eq!(section.input("value").unwrap().parameter_type, "bool");
    assert_eq!(
        common::connection_set(&activity),
        [
            Connection::new(
                SourcePort::Input {
                    input: "amount".to_string()
                },
                TargetPort::SectionInput {
                    section: "validate".to_string(),
                    input: "strict".to_string()
                },
            ),
            Connection::new(
                SourcePort::Input {
                    input: "customer".to_string()
                },
                TargetPort::SectionInput {
                    section: "validate".to_string(),
                    input: "value".to_string()
                },
            ),
        ]
        .into_iter()
        .collect()
    );

    change.revert(&mut activity);
    assert_model_eq(&activity, &before);
}

#[test]
fn test_refactor_procedure_renames_all_its_ports() {
    let mut activity = sample_activity();
    ops::link_section_output_to_procedure(&activity, "validate", "ok", "calc").apply(&mut activity);
    ops::link_procedure_output_to_output(&activity, "calc", "done", "total").apply(&mut activity);
    ops::link_procedure_next_to_output(&activity, "calc", "report").apply(&mut activity);
    let before = activity.clone();

    let fields = ProcedureFields {
        name: "compute".to_string(),
        resource: "worker-pool".to_string(),
        source_name: "billing.Compute".to_string(),
        procedure_name: "run".to_string(),
        properties: vec![],
        next_argument_type: "()".to_string(),
    };
    let output_shape = vec![PortShape::new("finished", "i64")];
    let mut output_renames = AHashMap::new();
    output_renames.insert("done".to_string(), "finished".to_string());

    let mut change =
        ops::refactor_procedure(&activity, "calc", fields, &output_shape, &output_renames)
            .expect("well-formed shape");
    change.apply(&mut activity);

    let procedure = activity.procedure("compute").expect("renamed procedure");
    assert_eq!(procedure.resource, "worker-pool");
    assert_eq!(procedure.output("finished").unwrap().argument_type, "i64");
    for connection in &activity.connections {
        assert!(!connection.touches_procedure("calc"));
        assert!(connection.touches_procedure("compute"));
    }

    change.revert(&mut activity);
    assert_model_eq(&activity, &before);
}

#[test]
fn test_refactor_rejects_duplicate_shape_names() {
    let activity = sample_activity();
    let fields = ProcedureFields {
        name: "calc".to_string(),
        resource: "worker".to_string(),
        source_name: "billing.Calc".to_string(),
        procedure_name: "run".to_string(),
        properties: vec![],
        next_argument_type: "()".to_string(),
    };
    let shape = vec![PortShape::new("done", "i64"), PortShape::new("Done", "u8")];
    let err = ops::refactor_procedure(&activity, "calc", fields, &shape, &AHashMap::new())
        .expect_err("duplicate names");
    assert!(matches!(err, ShapeError::DuplicateName(name) if name == "done"));
}

#[test]
fn test_refactor_rejects_mapping_to_unknown_child() {
    let activity = sample_activity();
    let fields = ProcedureFields {
        name: "calc".to_string(),
        resource: "worker".to_string(),
        source_name: "billing.Calc".to_string(),
        procedure_name: "run".to_string(),
        properties: vec![],
        next_argument_type: "()".to_string(),
    };
    let shape = vec![PortShape::new("finished", "i64")];
    let mut renames = AHashMap::new();
    renames.insert("ghost".to_string(), "finished".to_string());
    let err = ops::refactor_procedure(&activity, "calc", fields, &shape, &renames)
        .expect_err("unknown child");
    assert!(matches!(err, ShapeError::UnknownChild(name) if name == "ghost"));
}

#[test]
fn test_refactor_exception_cascades_to_its_link() {
    let mut activity = sample_activity();
    ops::link_exception_to_procedure(&activity, "TimeoutError", "calc").apply(&mut activity);
    let before = activity.clone();

    let mut change = ops::refactor_exception(&activity, "TimeoutError", "DeadlineError");
    change.apply(&mut activity);
    assert!(activity.exception("DeadlineError").is_some());
    assert!(activity.connections[0].touches_exception("DeadlineError"));

    change.revert(&mut activity);
    assert_model_eq(&activity, &before);
}
