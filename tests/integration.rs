//! End-to-end editor-session scenarios: build a graph through the operation
//! set, persist it, reload it, and unwind the whole session again.
mod common;
use ahash::AHashMap;
use common::{assert_model_eq, sample_activity};
use kousei::edit::ops;
use kousei::prelude::*;

#[test]
fn test_full_session_round_trips_through_the_store() {
    let mut activity = Activity::new("orders");

    ops::add_input(&activity, "order", "Order").apply(&mut activity);
    ops::add_section(
        &activity,
        "price",
        "orders.Price",
        "lib/price",
        vec![Property {
            name: "currency".to_string(),
            value: serde_json::json!("EUR"),
        }],
    )
    .apply(&mut activity);
    ops::add_procedure(&activity, "persist", "db", "orders.Persist", "run", vec![], "()")
        .apply(&mut activity);
    ops::add_output(&activity, "receipt", "Receipt").apply(&mut activity);
    ops::add_exception(&activity, "DbError").apply(&mut activity);

    // Give the section its shape, then wire everything up.
    ops::refactor_section(
        &activity,
        "price",
        SectionFields {
            name: "price".to_string(),
            source_class_name: "orders.Price".to_string(),
            location: "lib/price".to_string(),
            properties: activity.section("price").unwrap().properties.clone(),
        },
        &[PortShape::new("order", "Order")],
        &[PortShape::new("priced", "PricedOrder")],
        &AHashMap::new(),
        &AHashMap::new(),
    )
    .expect("well-formed shape")
    .apply(&mut activity);

    ops::link_input_to_section_input(&activity, "order", "price", "order").apply(&mut activity);
    ops::link_section_output_to_procedure(&activity, "price", "priced", "persist")
        .apply(&mut activity);
    ops::link_procedure_next_to_output(&activity, "persist", "receipt").apply(&mut activity);
    ops::link_exception_to_output(&activity, "DbError", "receipt").apply(&mut activity);

    assert_eq!(activity.connections.len(), 4);

    let reloaded = load(store(&activity));
    assert_model_eq(&reloaded, &activity);
}

#[test]
fn test_undo_stack_unwinds_a_whole_session() {
    let mut activity = sample_activity();
    let before = activity.clone();

    // An editor applies each change as it is requested and keeps the stack.
    let mut stack: Vec<Box<dyn Change>> = Vec::new();
    let mut run = |activity: &mut Activity, mut change: Box<dyn Change>| {
        change.apply(activity);
        stack.push(change);
    };

    let change = ops::add_input(&activity, "amount", "i64");
    run(&mut activity, change); // lands as amount-2
    let change = ops::link_input_to_output(&activity, "amount-2", "total");
    run(&mut activity, change);
    let change = ops::link_input_to_output(&activity, "amount", "total");
    run(&mut activity, change);
    let change = ops::refactor_input(&activity, "amount-2", "gross", "u64");
    run(&mut activity, change);
    let change = ops::remove_procedure(&activity, "calc");
    run(&mut activity, change);
    let change = ops::remove_section(&activity, "ghost");
    run(&mut activity, change); // NoChange, still goes on the stack

    assert!(activity.input("gross").is_some());
    assert!(activity.procedure("calc").is_none());

    for change in stack.iter_mut().rev() {
        change.revert(&mut activity);
    }
    assert_model_eq(&activity, &before);
}

#[test]
fn test_reloading_after_node_removal_drops_stale_keys() {
    // An external writer left a key behind that no longer resolves: the
    // reload keeps the graph consistent by dropping just that connection.
    let mut activity = sample_activity();
    ops::link_procedure_output_to_output(&activity, "calc", "done", "total").apply(&mut activity);
    ops::link_input_to_output(&activity, "amount", "report").apply(&mut activity);

    let mut raw = store(&activity);
    raw.outputs.retain(|o| o.name != "total");

    let reloaded = load(raw);
    assert_eq!(reloaded.connections.len(), 1);
    assert!(reloaded.connections[0].touches_output("report"));
}
