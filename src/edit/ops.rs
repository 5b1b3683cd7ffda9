//! The public operation set.
//!
//! Every function validates its preconditions against the current model and
//! returns a ready-to-apply [`Change`], or a [`NoChange`] carrying the
//! diagnostic reason when a precondition fails. Nothing is mutated here; the
//! caller decides when to `apply()` and whether to `revert()`.

use super::change::{AggregateChange, Change, NoChange, Resort};
use super::link::{AddLink, RemoveLink};
use super::node_ops::{
    AddException, AddInput, AddOutput, AddProcedure, AddSection, RemoveException, RemoveInput,
    RemoveOutput, RemoveProcedure, RemoveSection,
};
use super::refactor::{
    AddProcedureOutput, AddSectionInput, AddSectionOutput, InputFields, OutputFields, PortShape,
    ProcedureFields, RefactorProcedureOutput, RefactorSectionInput, RefactorSectionOutput,
    RemoveProcedureOutput, RemoveSectionInput, RemoveSectionOutput, RenameUses, SectionFields,
    SetExceptionClass, SetInputFields, SetOutputFields, SetProcedureFields, SetSectionFields,
    reconcile_children,
};
use crate::error::ShapeError;
use crate::model::{
    Activity, Connection, ExceptionNode, InputNode, OutputNode, ProcedureNextPort, ProcedureNode,
    Property, SectionNode, SiblingSet, SourcePort, TargetPort, unique_name,
};
use ahash::AHashMap;

// ---- add ----

/// Returns a change adding an input under a collision-free name derived from
/// `name`.
pub fn add_input(activity: &Activity, name: &str, argument_type: &str) -> Box<dyn Change> {
    let unique = unique_name(name, None, activity.inputs.iter().map(|n| n.name.as_str()));
    Box::new(AddInput::new(InputNode {
        name: unique,
        argument_type: argument_type.to_string(),
    }))
}

/// Returns a change adding an empty section (no inputs or outputs yet) under
/// a collision-free name.
pub fn add_section(
    activity: &Activity,
    name: &str,
    source_class_name: &str,
    location: &str,
    properties: Vec<Property>,
) -> Box<dyn Change> {
    let unique = unique_name(name, None, activity.sections.iter().map(|n| n.name.as_str()));
    Box::new(AddSection::new(SectionNode {
        name: unique,
        source_class_name: source_class_name.to_string(),
        location: location.to_string(),
        properties,
        inputs: Vec::new(),
        outputs: Vec::new(),
    }))
}

/// Returns a change adding a procedure (no named outputs yet) under a
/// collision-free name.
pub fn add_procedure(
    activity: &Activity,
    name: &str,
    resource: &str,
    source_name: &str,
    procedure_name: &str,
    properties: Vec<Property>,
    next_argument_type: &str,
) -> Box<dyn Change> {
    let unique = unique_name(
        name,
        None,
        activity.procedures.iter().map(|n| n.name.as_str()),
    );
    Box::new(AddProcedure::new(ProcedureNode {
        name: unique,
        resource: resource.to_string(),
        source_name: source_name.to_string(),
        procedure_name: procedure_name.to_string(),
        properties,
        outputs: Vec::new(),
        next: ProcedureNextPort {
            argument_type: next_argument_type.to_string(),
        },
    }))
}

/// Returns a change adding an output under a collision-free name.
pub fn add_output(activity: &Activity, name: &str, parameter_type: &str) -> Box<dyn Change> {
    let unique = unique_name(name, None, activity.outputs.iter().map(|n| n.name.as_str()));
    Box::new(AddOutput::new(OutputNode {
        name: unique,
        parameter_type: parameter_type.to_string(),
    }))
}

/// Returns a change adding an exception declaration under a collision-free
/// class name.
pub fn add_exception(activity: &Activity, class_name: &str) -> Box<dyn Change> {
    let unique = unique_name(
        class_name,
        None,
        activity.exceptions.iter().map(|n| n.class_name.as_str()),
    );
    Box::new(AddException::new(ExceptionNode { class_name: unique }))
}

// ---- remove ----

/// Returns a change removing the named input together with its outgoing
/// connection, or a `NoChange` when it is not a model member.
pub fn remove_input(activity: &Activity, name: &str) -> Box<dyn Change> {
    match activity.input(name) {
        Some(node) => Box::new(RemoveInput::new(node.name.clone())),
        None => NoChange::boxed(format!("input '{}' is not in model", name)),
    }
}

/// Returns a change removing the named section together with every connection
/// incident to its sub-inputs and sub-outputs.
pub fn remove_section(activity: &Activity, name: &str) -> Box<dyn Change> {
    match activity.section(name) {
        Some(node) => Box::new(RemoveSection::new(node.name.clone())),
        None => NoChange::boxed(format!("section '{}' is not in model", name)),
    }
}

/// Returns a change removing the named procedure together with every
/// connection incident to it, its outputs, or its next port.
pub fn remove_procedure(activity: &Activity, name: &str) -> Box<dyn Change> {
    match activity.procedure(name) {
        Some(node) => Box::new(RemoveProcedure::new(node.name.clone())),
        None => NoChange::boxed(format!("procedure '{}' is not in model", name)),
    }
}

/// Returns a change removing the named output together with its incoming
/// connections.
pub fn remove_output(activity: &Activity, name: &str) -> Box<dyn Change> {
    match activity.output(name) {
        Some(node) => Box::new(RemoveOutput::new(node.name.clone())),
        None => NoChange::boxed(format!("output '{}' is not in model", name)),
    }
}

/// Returns a change removing the exception declared for `class_name` together
/// with its outgoing connection.
pub fn remove_exception(activity: &Activity, class_name: &str) -> Box<dyn Change> {
    match activity.exception(class_name) {
        Some(node) => Box::new(RemoveException::new(node.class_name.clone())),
        None => NoChange::boxed(format!("exception '{}' is not in model", class_name)),
    }
}

// ---- refactor ----

/// Returns a change rewriting an input's name and argument type. The new name
/// is uniquified against the other inputs; every connection starting at the
/// input follows the rename.
pub fn refactor_input(
    activity: &Activity,
    input: &str,
    new_name: &str,
    new_argument_type: &str,
) -> Box<dyn Change> {
    let Some(node) = activity.input(input) else {
        return NoChange::boxed(format!("input '{}' is not in model", input));
    };
    let old = node.name.clone();
    let unique = unique_name(
        new_name,
        Some(&old),
        activity.inputs.iter().map(|n| n.name.as_str()),
    );
    Box::new(AggregateChange::new(vec![
        Resort::boxed(SiblingSet::Inputs),
        Box::new(SetInputFields::new(
            old.clone(),
            InputFields {
                name: unique.clone(),
                argument_type: new_argument_type.to_string(),
            },
        )),
        Box::new(RenameUses::Input { old, new: unique }),
        Resort::boxed(SiblingSet::Inputs),
    ]))
}

/// Returns a change rewriting an output's name and parameter type, with the
/// same rename-cascade semantics as [`refactor_input`].
pub fn refactor_output(
    activity: &Activity,
    output: &str,
    new_name: &str,
    new_parameter_type: &str,
) -> Box<dyn Change> {
    let Some(node) = activity.output(output) else {
        return NoChange::boxed(format!("output '{}' is not in model", output));
    };
    let old = node.name.clone();
    let unique = unique_name(
        new_name,
        Some(&old),
        activity.outputs.iter().map(|n| n.name.as_str()),
    );
    Box::new(AggregateChange::new(vec![
        Resort::boxed(SiblingSet::Outputs),
        Box::new(SetOutputFields::new(
            old.clone(),
            OutputFields {
                name: unique.clone(),
                parameter_type: new_parameter_type.to_string(),
            },
        )),
        Box::new(RenameUses::Output { old, new: unique }),
        Resort::boxed(SiblingSet::Outputs),
    ]))
}

/// Returns a change rewriting an exception's class name, cascading onto its
/// outgoing connection.
pub fn refactor_exception(
    activity: &Activity,
    class_name: &str,
    new_class_name: &str,
) -> Box<dyn Change> {
    let Some(node) = activity.exception(class_name) else {
        return NoChange::boxed(format!("exception '{}' is not in model", class_name));
    };
    let old = node.class_name.clone();
    let unique = unique_name(
        new_class_name,
        Some(&old),
        activity.exceptions.iter().map(|n| n.class_name.as_str()),
    );
    Box::new(AggregateChange::new(vec![
        Resort::boxed(SiblingSet::Exceptions),
        Box::new(SetExceptionClass::new(old.clone(), unique.clone())),
        Box::new(RenameUses::Exception { old, new: unique }),
        Resort::boxed(SiblingSet::Exceptions),
    ]))
}

/// Returns a change rewriting a section's own fields and reconciling its
/// sub-inputs and sub-outputs against the authoritative shapes supplied by
/// the caller's type introspection.
///
/// `input_renames` / `output_renames` map an existing child's current name to
/// the shape entry it should become (the identities a human confirmed in a
/// diff UI); entries not covered by a mapping are matched by name. Children
/// claimed neither way are removed, connections captured for revert.
/// Malformed shapes or mappings are programmer errors and fail with
/// [`ShapeError`] instead of producing a change.
pub fn refactor_section(
    activity: &Activity,
    section: &str,
    fields: SectionFields,
    input_shape: &[PortShape],
    output_shape: &[PortShape],
    input_renames: &AHashMap<String, String>,
    output_renames: &AHashMap<String, String>,
) -> Result<Box<dyn Change>, ShapeError> {
    let Some(node) = activity.section(section) else {
        return Ok(NoChange::boxed(format!(
            "section '{}' is not in model",
            section
        )));
    };
    let old = node.name.clone();
    let unique = unique_name(
        &fields.name,
        Some(&old),
        activity.sections.iter().map(|n| n.name.as_str()),
    );
    let fields = SectionFields {
        name: unique.clone(),
        ..fields
    };

    let mut changes: Vec<Box<dyn Change>> = vec![
        Resort::boxed(SiblingSet::Sections),
        Resort::boxed(SiblingSet::SectionInputs(old.clone())),
        Resort::boxed(SiblingSet::SectionOutputs(old.clone())),
        Box::new(SetSectionFields::new(old.clone(), fields)),
        Box::new(RenameUses::Section {
            old: old.clone(),
            new: unique.clone(),
        }),
    ];
    changes.extend(reconcile_children(
        &node.inputs,
        |c| c.name.as_str(),
        input_shape,
        input_renames,
        |existing, entry| {
            Box::new(RefactorSectionInput::new(
                unique.clone(),
                existing,
                entry.clone(),
            ))
        },
        |entry| Box::new(AddSectionInput::new(unique.clone(), entry)),
        |name| Box::new(RemoveSectionInput::new(unique.clone(), name)),
    )?);
    changes.extend(reconcile_children(
        &node.outputs,
        |c| c.name.as_str(),
        output_shape,
        output_renames,
        |existing, entry| {
            Box::new(RefactorSectionOutput::new(
                unique.clone(),
                existing,
                entry.clone(),
            ))
        },
        |entry| Box::new(AddSectionOutput::new(unique.clone(), entry)),
        |name| Box::new(RemoveSectionOutput::new(unique.clone(), name)),
    )?);
    changes.push(Resort::boxed(SiblingSet::SectionInputs(unique.clone())));
    changes.push(Resort::boxed(SiblingSet::SectionOutputs(unique.clone())));
    changes.push(Resort::boxed(SiblingSet::Sections));
    Ok(Box::new(AggregateChange::new(changes)))
}

/// Returns a change rewriting a procedure's own fields (including the next
/// port's argument type) and reconciling its named outputs against the
/// authoritative shape. Same contract as [`refactor_section`].
pub fn refactor_procedure(
    activity: &Activity,
    procedure: &str,
    fields: ProcedureFields,
    output_shape: &[PortShape],
    output_renames: &AHashMap<String, String>,
) -> Result<Box<dyn Change>, ShapeError> {
    let Some(node) = activity.procedure(procedure) else {
        return Ok(NoChange::boxed(format!(
            "procedure '{}' is not in model",
            procedure
        )));
    };
    let old = node.name.clone();
    let unique = unique_name(
        &fields.name,
        Some(&old),
        activity.procedures.iter().map(|n| n.name.as_str()),
    );
    let fields = ProcedureFields {
        name: unique.clone(),
        ..fields
    };

    let mut changes: Vec<Box<dyn Change>> = vec![
        Resort::boxed(SiblingSet::Procedures),
        Resort::boxed(SiblingSet::ProcedureOutputs(old.clone())),
        Box::new(SetProcedureFields::new(old.clone(), fields)),
        Box::new(RenameUses::Procedure {
            old: old.clone(),
            new: unique.clone(),
        }),
    ];
    changes.extend(reconcile_children(
        &node.outputs,
        |c| c.name.as_str(),
        output_shape,
        output_renames,
        |existing, entry| {
            Box::new(RefactorProcedureOutput::new(
                unique.clone(),
                existing,
                entry.clone(),
            ))
        },
        |entry| Box::new(AddProcedureOutput::new(unique.clone(), entry)),
        |name| Box::new(RemoveProcedureOutput::new(unique.clone(), name)),
    )?);
    changes.push(Resort::boxed(SiblingSet::ProcedureOutputs(unique.clone())));
    changes.push(Resort::boxed(SiblingSet::Procedures));
    Ok(Box::new(AggregateChange::new(changes)))
}

// ---- link / unlink ----

fn resolve_source_input(activity: &Activity, input: &str) -> Option<SourcePort> {
    activity.input(input).map(|n| SourcePort::Input {
        input: n.name.clone(),
    })
}

fn resolve_source_section_output(
    activity: &Activity,
    section: &str,
    output: &str,
) -> Option<SourcePort> {
    let section = activity.section(section)?;
    let output = section.output(output)?;
    Some(SourcePort::SectionOutput {
        section: section.name.clone(),
        output: output.name.clone(),
    })
}

fn resolve_source_procedure_output(
    activity: &Activity,
    procedure: &str,
    output: &str,
) -> Option<SourcePort> {
    let procedure = activity.procedure(procedure)?;
    let output = procedure.output(output)?;
    Some(SourcePort::ProcedureOutput {
        procedure: procedure.name.clone(),
        output: output.name.clone(),
    })
}

fn resolve_source_procedure_next(activity: &Activity, procedure: &str) -> Option<SourcePort> {
    activity
        .procedure(procedure)
        .map(|n| SourcePort::ProcedureNext {
            procedure: n.name.clone(),
        })
}

fn resolve_source_exception(activity: &Activity, class_name: &str) -> Option<SourcePort> {
    activity.exception(class_name).map(|n| SourcePort::Exception {
        class_name: n.class_name.clone(),
    })
}

fn resolve_target_section_input(
    activity: &Activity,
    section: &str,
    input: &str,
) -> Option<TargetPort> {
    let section = activity.section(section)?;
    let input = section.input(input)?;
    Some(TargetPort::SectionInput {
        section: section.name.clone(),
        input: input.name.clone(),
    })
}

fn resolve_target_output(activity: &Activity, output: &str) -> Option<TargetPort> {
    activity.output(output).map(|n| TargetPort::Output {
        output: n.name.clone(),
    })
}

fn resolve_target_procedure(activity: &Activity, procedure: &str) -> Option<TargetPort> {
    activity.procedure(procedure).map(|n| TargetPort::Procedure {
        procedure: n.name.clone(),
    })
}

/// Master macro defining one link operation per source-kind/target-kind pair.
///
/// Each generated function resolves both endpoints against the model
/// (canonicalizing name case to the stored spelling), returns a `NoChange`
/// when either endpoint is missing, and otherwise an [`AddLink`] that
/// displaces whatever the source port was connected to before.
macro_rules! define_link_ops {
    ($( $fn_name:ident : ( $($arg:ident),+ ) =>
        $src:ident ( $($sarg:ident),+ ) -> $tgt:ident ( $($targ:ident),+ ) ),+ $(,)?) => {
        $(
            /// Returns a change connecting the given source port to the given
            /// target, displacing any existing outgoing connection of that
            /// port. Rejected with a `NoChange` when either endpoint is not
            /// in the model.
            pub fn $fn_name(activity: &Activity, $($arg: &str),+) -> Box<dyn Change> {
                let Some(source) = $src(activity, $($sarg),+) else {
                    return NoChange::boxed(format!(
                        "link source '{}' is not in model",
                        [$($sarg),+].join("/"),
                    ));
                };
                let Some(target) = $tgt(activity, $($targ),+) else {
                    return NoChange::boxed(format!(
                        "link target '{}' is not in model",
                        [$($targ),+].join("/"),
                    ));
                };
                Box::new(AddLink::new(Connection::new(source, target)))
            }
        )+
    };
}

define_link_ops! {
    link_input_to_section_input: (input, section, section_input) =>
        resolve_source_input(input) -> resolve_target_section_input(section, section_input),
    link_input_to_output: (input, output) =>
        resolve_source_input(input) -> resolve_target_output(output),
    link_input_to_procedure: (input, procedure) =>
        resolve_source_input(input) -> resolve_target_procedure(procedure),
    link_section_output_to_section_input: (section, output, target_section, target_input) =>
        resolve_source_section_output(section, output) -> resolve_target_section_input(target_section, target_input),
    link_section_output_to_output: (section, output, target_output) =>
        resolve_source_section_output(section, output) -> resolve_target_output(target_output),
    link_section_output_to_procedure: (section, output, procedure) =>
        resolve_source_section_output(section, output) -> resolve_target_procedure(procedure),
    link_procedure_output_to_section_input: (procedure, output, section, section_input) =>
        resolve_source_procedure_output(procedure, output) -> resolve_target_section_input(section, section_input),
    link_procedure_output_to_output: (procedure, output, target_output) =>
        resolve_source_procedure_output(procedure, output) -> resolve_target_output(target_output),
    link_procedure_output_to_procedure: (procedure, output, target_procedure) =>
        resolve_source_procedure_output(procedure, output) -> resolve_target_procedure(target_procedure),
    link_procedure_next_to_section_input: (procedure, section, section_input) =>
        resolve_source_procedure_next(procedure) -> resolve_target_section_input(section, section_input),
    link_procedure_next_to_output: (procedure, output) =>
        resolve_source_procedure_next(procedure) -> resolve_target_output(output),
    link_procedure_next_to_procedure: (procedure, target_procedure) =>
        resolve_source_procedure_next(procedure) -> resolve_target_procedure(target_procedure),
    link_exception_to_section_input: (class_name, section, section_input) =>
        resolve_source_exception(class_name) -> resolve_target_section_input(section, section_input),
    link_exception_to_output: (class_name, output) =>
        resolve_source_exception(class_name) -> resolve_target_output(output),
    link_exception_to_procedure: (class_name, procedure) =>
        resolve_source_exception(class_name) -> resolve_target_procedure(procedure),
}

/// Returns a change detaching a live connection, or a `NoChange` when the
/// connection is not currently part of the model.
pub fn unlink(activity: &Activity, connection: &Connection) -> Box<dyn Change> {
    if activity.is_connected(connection) {
        Box::new(RemoveLink::new(connection.clone()))
    } else {
        NoChange::boxed(format!("connection '{}' is not in model", connection))
    }
}
