//! Load-time reference resolution: persisted string keys become live
//! connections, and keys that no longer match anything are dropped.

use super::raw::{RawActivity, RawInput, RawLink, RawProcedure, RawProperty, RawSection};
use crate::model::{
    Activity, Connection, ExceptionNode, InputNode, OutputNode, ProcedureNextPort, ProcedureNode,
    ProcedureOutputNode, Property, SectionInputNode, SectionNode, SectionOutputNode, SourcePort,
    TargetPort,
};
use ahash::AHashMap;

/// Lookup indexes over every target-capable port, keyed case-insensitively
/// and mapping back to the exact stored spelling.
struct Resolver {
    section_inputs: AHashMap<(String, String), (String, String)>,
    outputs: AHashMap<String, String>,
    procedures: AHashMap<String, String>,
}

impl Resolver {
    fn new(activity: &Activity) -> Self {
        let mut section_inputs = AHashMap::new();
        for section in &activity.sections {
            for input in &section.inputs {
                section_inputs.insert(
                    (section.name.to_lowercase(), input.name.to_lowercase()),
                    (section.name.clone(), input.name.clone()),
                );
            }
        }
        let outputs = activity
            .outputs
            .iter()
            .map(|o| (o.name.to_lowercase(), o.name.clone()))
            .collect();
        let procedures = activity
            .procedures
            .iter()
            .map(|p| (p.name.to_lowercase(), p.name.clone()))
            .collect();
        Self {
            section_inputs,
            outputs,
            procedures,
        }
    }

    /// Resolves a stored key to a target port with canonical spelling, or
    /// `None` when the key is dangling.
    fn resolve(&self, link: &RawLink) -> Option<TargetPort> {
        match link {
            RawLink::SectionInput { section, input } => self
                .section_inputs
                .get(&(section.to_lowercase(), input.to_lowercase()))
                .map(|(section, input)| TargetPort::SectionInput {
                    section: section.clone(),
                    input: input.clone(),
                }),
            RawLink::Output { output } => {
                self.outputs
                    .get(&output.to_lowercase())
                    .map(|output| TargetPort::Output {
                        output: output.clone(),
                    })
            }
            RawLink::Procedure { procedure } => {
                self.procedures
                    .get(&procedure.to_lowercase())
                    .map(|procedure| TargetPort::Procedure {
                        procedure: procedure.clone(),
                    })
            }
        }
    }
}

/// Builds a fully linked [`Activity`] from its persisted form.
///
/// Connections are resolved against the freshly built node collections; a key
/// that no longer names a live target means the link is no longer valid and
/// is silently dropped, never raised as an error.
pub fn load(raw: RawActivity) -> Activity {
    let mut activity = Activity::new(raw.name.clone());
    activity.inputs = raw.inputs.iter().map(convert_input).collect();
    activity.sections = raw.sections.iter().map(convert_section).collect();
    activity.procedures = raw.procedures.iter().map(convert_procedure).collect();
    activity.outputs = raw
        .outputs
        .iter()
        .map(|o| OutputNode {
            name: o.name.clone(),
            parameter_type: o.parameter_type.clone(),
        })
        .collect();
    activity.exceptions = raw
        .exceptions
        .iter()
        .map(|e| ExceptionNode {
            class_name: e.class_name.clone(),
        })
        .collect();

    let resolver = Resolver::new(&activity);
    let mut connections = Vec::new();
    let mut link = |source: SourcePort, stored: &Option<RawLink>| {
        let Some(stored) = stored else { return };
        match resolver.resolve(stored) {
            Some(target) => connections.push(Connection::new(source, target)),
            None => tracing::debug!(%source, ?stored, "dropping link with no live target"),
        }
    };

    for input in &raw.inputs {
        link(
            SourcePort::Input {
                input: input.name.clone(),
            },
            &input.link,
        );
    }
    for section in &raw.sections {
        for output in &section.outputs {
            link(
                SourcePort::SectionOutput {
                    section: section.name.clone(),
                    output: output.name.clone(),
                },
                &output.link,
            );
        }
    }
    for procedure in &raw.procedures {
        for output in &procedure.outputs {
            link(
                SourcePort::ProcedureOutput {
                    procedure: procedure.name.clone(),
                    output: output.name.clone(),
                },
                &output.link,
            );
        }
        link(
            SourcePort::ProcedureNext {
                procedure: procedure.name.clone(),
            },
            &procedure.next.link,
        );
    }
    for exception in &raw.exceptions {
        link(
            SourcePort::Exception {
                class_name: exception.class_name.clone(),
            },
            &exception.link,
        );
    }

    activity.connections = connections;
    activity
}

fn convert_property(p: &RawProperty) -> Property {
    Property {
        name: p.name.clone(),
        value: p.value.clone(),
    }
}

fn convert_input(i: &RawInput) -> InputNode {
    InputNode {
        name: i.name.clone(),
        argument_type: i.argument_type.clone(),
    }
}

fn convert_section(s: &RawSection) -> SectionNode {
    SectionNode {
        name: s.name.clone(),
        source_class_name: s.source_class_name.clone(),
        location: s.location.clone(),
        properties: s.properties.iter().map(convert_property).collect(),
        inputs: s
            .inputs
            .iter()
            .map(|i| SectionInputNode {
                name: i.name.clone(),
                parameter_type: i.parameter_type.clone(),
            })
            .collect(),
        outputs: s
            .outputs
            .iter()
            .map(|o| SectionOutputNode {
                name: o.name.clone(),
                argument_type: o.argument_type.clone(),
            })
            .collect(),
    }
}

fn convert_procedure(p: &RawProcedure) -> ProcedureNode {
    ProcedureNode {
        name: p.name.clone(),
        resource: p.resource.clone(),
        source_name: p.source_name.clone(),
        procedure_name: p.procedure_name.clone(),
        properties: p.properties.iter().map(convert_property).collect(),
        outputs: p
            .outputs
            .iter()
            .map(|o| ProcedureOutputNode {
                name: o.name.clone(),
                argument_type: o.argument_type.clone(),
            })
            .collect(),
        next: ProcedureNextPort {
            argument_type: p.next.argument_type.clone(),
        },
    }
}

impl From<RawActivity> for Activity {
    fn from(raw: RawActivity) -> Self {
        load(raw)
    }
}
