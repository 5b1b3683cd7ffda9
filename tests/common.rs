//! Common test utilities for building activity models and comparing them.
use kousei::prelude::*;
use std::collections::HashSet;

/// Creates a small but fully populated activity:
///
/// - inputs `amount`, `customer`
/// - section `validate` with inputs `strict`/`value` and outputs `ok`/`reason`
/// - procedure `calc` with output `done` and a next port
/// - outputs `report`, `total`
/// - exception `TimeoutError`
///
/// Collections are listed in canonical (case-insensitive ascending) order so
/// fixtures survive round-trip comparisons unchanged. No connections yet.
#[allow(dead_code)]
pub fn sample_activity() -> Activity {
    Activity {
        name: "billing".to_string(),
        inputs: vec![
            InputNode {
                name: "amount".to_string(),
                argument_type: "i64".to_string(),
            },
            InputNode {
                name: "customer".to_string(),
                argument_type: "String".to_string(),
            },
        ],
        sections: vec![SectionNode {
            name: "validate".to_string(),
            source_class_name: "billing.Validate".to_string(),
            location: "lib/validate".to_string(),
            properties: vec![Property {
                name: "retries".to_string(),
                value: serde_json::json!(3),
            }],
            inputs: vec![
                SectionInputNode {
                    name: "strict".to_string(),
                    parameter_type: "bool".to_string(),
                },
                SectionInputNode {
                    name: "value".to_string(),
                    parameter_type: "i64".to_string(),
                },
            ],
            outputs: vec![
                SectionOutputNode {
                    name: "ok".to_string(),
                    argument_type: "bool".to_string(),
                },
                SectionOutputNode {
                    name: "reason".to_string(),
                    argument_type: "String".to_string(),
                },
            ],
        }],
        procedures: vec![ProcedureNode {
            name: "calc".to_string(),
            resource: "worker".to_string(),
            source_name: "billing.Calc".to_string(),
            procedure_name: "run".to_string(),
            properties: vec![],
            outputs: vec![ProcedureOutputNode {
                name: "done".to_string(),
                argument_type: "i64".to_string(),
            }],
            next: ProcedureNextPort {
                argument_type: "()".to_string(),
            },
        }],
        outputs: vec![
            OutputNode {
                name: "report".to_string(),
                parameter_type: "String".to_string(),
            },
            OutputNode {
                name: "total".to_string(),
                parameter_type: "i64".to_string(),
            },
        ],
        exceptions: vec![ExceptionNode {
            class_name: "TimeoutError".to_string(),
        }],
        connections: vec![],
    }
}

/// The connection set of a model, for order-insensitive comparison.
#[allow(dead_code)]
pub fn connection_set(activity: &Activity) -> HashSet<Connection> {
    activity.connections.iter().cloned().collect()
}

/// Asserts two models are equal up to connection order: same name, same node
/// collections in the same order, same connection set.
#[allow(dead_code)]
pub fn assert_model_eq(actual: &Activity, expected: &Activity) {
    assert_eq!(actual.name, expected.name);
    assert_eq!(actual.inputs, expected.inputs);
    assert_eq!(actual.sections, expected.sections);
    assert_eq!(actual.procedures, expected.procedures);
    assert_eq!(actual.outputs, expected.outputs);
    assert_eq!(actual.exceptions, expected.exceptions);
    assert_eq!(connection_set(actual), connection_set(expected));
}
