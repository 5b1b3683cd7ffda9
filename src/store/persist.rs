//! Store-time reference denormalization: every live connection is written
//! back as string keys taken from its target's current identity.

use super::raw::{
    RawActivity, RawException, RawInput, RawLink, RawOutput, RawProcedure, RawProcedureNext,
    RawProcedureOutput, RawProperty, RawSection, RawSectionInput, RawSectionOutput,
};
use crate::model::{Activity, Property, SourcePort, TargetPort};

/// Produces the key-consistent persisted form of a populated, linked model.
///
/// Connection keys are emitted from the target names the model holds *now*;
/// the rename cascades in the edit layer keep those current, so a stored
/// record can never carry a stale key. A connection whose source port is no
/// longer present in the model is not emitted at all.
pub fn store(activity: &Activity) -> RawActivity {
    RawActivity {
        name: activity.name.clone(),
        inputs: activity
            .inputs
            .iter()
            .map(|i| RawInput {
                name: i.name.clone(),
                argument_type: i.argument_type.clone(),
                link: link_from(
                    activity,
                    SourcePort::Input {
                        input: i.name.clone(),
                    },
                ),
            })
            .collect(),
        sections: activity
            .sections
            .iter()
            .map(|s| RawSection {
                name: s.name.clone(),
                source_class_name: s.source_class_name.clone(),
                location: s.location.clone(),
                properties: s.properties.iter().map(raw_property).collect(),
                inputs: s
                    .inputs
                    .iter()
                    .map(|i| RawSectionInput {
                        name: i.name.clone(),
                        parameter_type: i.parameter_type.clone(),
                    })
                    .collect(),
                outputs: s
                    .outputs
                    .iter()
                    .map(|o| RawSectionOutput {
                        name: o.name.clone(),
                        argument_type: o.argument_type.clone(),
                        link: link_from(
                            activity,
                            SourcePort::SectionOutput {
                                section: s.name.clone(),
                                output: o.name.clone(),
                            },
                        ),
                    })
                    .collect(),
            })
            .collect(),
        procedures: activity
            .procedures
            .iter()
            .map(|p| RawProcedure {
                name: p.name.clone(),
                resource: p.resource.clone(),
                source_name: p.source_name.clone(),
                procedure_name: p.procedure_name.clone(),
                properties: p.properties.iter().map(raw_property).collect(),
                outputs: p
                    .outputs
                    .iter()
                    .map(|o| RawProcedureOutput {
                        name: o.name.clone(),
                        argument_type: o.argument_type.clone(),
                        link: link_from(
                            activity,
                            SourcePort::ProcedureOutput {
                                procedure: p.name.clone(),
                                output: o.name.clone(),
                            },
                        ),
                    })
                    .collect(),
                next: RawProcedureNext {
                    argument_type: p.next.argument_type.clone(),
                    link: link_from(
                        activity,
                        SourcePort::ProcedureNext {
                            procedure: p.name.clone(),
                        },
                    ),
                },
            })
            .collect(),
        outputs: activity
            .outputs
            .iter()
            .map(|o| RawOutput {
                name: o.name.clone(),
                parameter_type: o.parameter_type.clone(),
            })
            .collect(),
        exceptions: activity
            .exceptions
            .iter()
            .map(|e| RawException {
                class_name: e.class_name.clone(),
                link: link_from(
                    activity,
                    SourcePort::Exception {
                        class_name: e.class_name.clone(),
                    },
                ),
            })
            .collect(),
    }
}

fn link_from(activity: &Activity, source: SourcePort) -> Option<RawLink> {
    activity
        .connection_from(&source)
        .map(|c| match &c.target {
            TargetPort::SectionInput { section, input } => RawLink::SectionInput {
                section: section.clone(),
                input: input.clone(),
            },
            TargetPort::Output { output } => RawLink::Output {
                output: output.clone(),
            },
            TargetPort::Procedure { procedure } => RawLink::Procedure {
                procedure: procedure.clone(),
            },
        })
}

fn raw_property(p: &Property) -> RawProperty {
    RawProperty {
        name: p.name.clone(),
        value: p.value.clone(),
    }
}
