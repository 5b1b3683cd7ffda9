//! Field-rewrite, use-site-rename and child-reconciliation change primitives
//! backing the refactor operations.

use super::change::Change;
use crate::error::ShapeError;
use crate::model::{
    Activity, Connection, Property, SectionInputNode, SectionOutputNode, SourcePort, TargetPort,
    unique_name,
};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

/// One entry of an externally supplied authoritative port shape: an ordered
/// (name, type) pair describing what a node's child must look like.
#[derive(Debug, Clone, PartialEq)]
pub struct PortShape {
    pub name: String,
    pub data_type: String,
}

impl PortShape {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Replacement fields for an input refactor.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFields {
    pub name: String,
    pub argument_type: String,
}

/// Replacement fields for an output refactor.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFields {
    pub name: String,
    pub parameter_type: String,
}

/// Replacement fields for a section refactor. Children are reconciled
/// separately against the authoritative shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFields {
    pub name: String,
    pub source_class_name: String,
    pub location: String,
    pub properties: Vec<Property>,
}

/// Replacement fields for a procedure refactor, including the argument type
/// of its next port. Outputs are reconciled separately.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureFields {
    pub name: String,
    pub resource: String,
    pub source_name: String,
    pub procedure_name: String,
    pub properties: Vec<Property>,
    pub next_argument_type: String,
}

// ---- attribute rewrites ----
//
// Each Set*Fields change overwrites a node's own fields and captures the
// previous values for revert. Rewriting the connections that name the node is
// the job of the separate RenameUses change, so the two invert independently
// inside an aggregate.

#[derive(Debug)]
pub struct SetInputFields {
    target: String,
    new: InputFields,
    prev: Option<InputFields>,
}

impl SetInputFields {
    pub fn new(target: impl Into<String>, new: InputFields) -> Self {
        Self {
            target: target.into(),
            new,
            prev: None,
        }
    }
}

impl Change for SetInputFields {
    fn apply(&mut self, activity: &mut Activity) {
        if let Some(node) = activity.inputs.iter_mut().find(|n| n.name == self.target) {
            self.prev = Some(InputFields {
                name: node.name.clone(),
                argument_type: node.argument_type.clone(),
            });
            node.name = self.new.name.clone();
            node.argument_type = self.new.argument_type.clone();
        }
    }

    fn revert(&mut self, activity: &mut Activity) {
        if let Some(prev) = self.prev.take() {
            if let Some(node) = activity.inputs.iter_mut().find(|n| n.name == self.new.name) {
                node.name = prev.name;
                node.argument_type = prev.argument_type;
            }
        }
    }
}

#[derive(Debug)]
pub struct SetOutputFields {
    target: String,
    new: OutputFields,
    prev: Option<OutputFields>,
}

impl SetOutputFields {
    pub fn new(target: impl Into<String>, new: OutputFields) -> Self {
        Self {
            target: target.into(),
            new,
            prev: None,
        }
    }
}

impl Change for SetOutputFields {
    fn apply(&mut self, activity: &mut Activity) {
        if let Some(node) = activity.outputs.iter_mut().find(|n| n.name == self.target) {
            self.prev = Some(OutputFields {
                name: node.name.clone(),
                parameter_type: node.parameter_type.clone(),
            });
            node.name = self.new.name.clone();
            node.parameter_type = self.new.parameter_type.clone();
        }
    }

    fn revert(&mut self, activity: &mut Activity) {
        if let Some(prev) = self.prev.take() {
            if let Some(node) = activity
                .outputs
                .iter_mut()
                .find(|n| n.name == self.new.name)
            {
                node.name = prev.name;
                node.parameter_type = prev.parameter_type;
            }
        }
    }
}

#[derive(Debug)]
pub struct SetExceptionClass {
    target: String,
    new_class: String,
    prev: Option<String>,
}

impl SetExceptionClass {
    pub fn new(target: impl Into<String>, new_class: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            new_class: new_class.into(),
            prev: None,
        }
    }
}

impl Change for SetExceptionClass {
    fn apply(&mut self, activity: &mut Activity) {
        if let Some(node) = activity
            .exceptions
            .iter_mut()
            .find(|n| n.class_name == self.target)
        {
            self.prev = Some(node.class_name.clone());
            node.class_name = self.new_class.clone();
        }
    }

    fn revert(&mut self, activity: &mut Activity) {
        if let Some(prev) = self.prev.take() {
            if let Some(node) = activity
                .exceptions
                .iter_mut()
                .find(|n| n.class_name == self.new_class)
            {
                node.class_name = prev;
            }
        }
    }
}

#[derive(Debug)]
pub struct SetSectionFields {
    target: String,
    new: SectionFields,
    prev: Option<SectionFields>,
}

impl SetSectionFields {
    pub fn new(target: impl Into<String>, new: SectionFields) -> Self {
        Self {
            target: target.into(),
            new,
            prev: None,
        }
    }
}

impl Change for SetSectionFields {
    fn apply(&mut self, activity: &mut Activity) {
        if let Some(node) = activity.sections.iter_mut().find(|n| n.name == self.target) {
            self.prev = Some(SectionFields {
                name: node.name.clone(),
                source_class_name: node.source_class_name.clone(),
                location: node.location.clone(),
                properties: node.properties.clone(),
            });
            node.name = self.new.name.clone();
            node.source_class_name = self.new.source_class_name.clone();
            node.location = self.new.location.clone();
            node.properties = self.new.properties.clone();
        }
    }

    fn revert(&mut self, activity: &mut Activity) {
        if let Some(prev) = self.prev.take() {
            if let Some(node) = activity
                .sections
                .iter_mut()
                .find(|n| n.name == self.new.name)
            {
                node.name = prev.name;
                node.source_class_name = prev.source_class_name;
                node.location = prev.location;
                node.properties = prev.properties;
            }
        }
    }
}

#[derive(Debug)]
pub struct SetProcedureFields {
    target: String,
    new: ProcedureFields,
    prev: Option<ProcedureFields>,
}

impl SetProcedureFields {
    pub fn new(target: impl Into<String>, new: ProcedureFields) -> Self {
        Self {
            target: target.into(),
            new,
            prev: None,
        }
    }
}

impl Change for SetProcedureFields {
    fn apply(&mut self, activity: &mut Activity) {
        if let Some(node) = activity
            .procedures
            .iter_mut()
            .find(|n| n.name == self.target)
        {
            self.prev = Some(ProcedureFields {
                name: node.name.clone(),
                resource: node.resource.clone(),
                source_name: node.source_name.clone(),
                procedure_name: node.procedure_name.clone(),
                properties: node.properties.clone(),
                next_argument_type: node.next.argument_type.clone(),
            });
            node.name = self.new.name.clone();
            node.resource = self.new.resource.clone();
            node.source_name = self.new.source_name.clone();
            node.procedure_name = self.new.procedure_name.clone();
            node.properties = self.new.properties.clone();
            node.next.argument_type = self.new.next_argument_type.clone();
        }
    }

    fn revert(&mut self, activity: &mut Activity) {
        if let Some(prev) = self.prev.take() {
            if let Some(node) = activity
                .procedures
                .iter_mut()
                .find(|n| n.name == self.new.name)
            {
                node.name = prev.name;
                node.resource = prev.resource;
                node.source_name = prev.source_name;
                node.procedure_name = prev.procedure_name;
                node.properties = prev.properties;
                node.next.argument_type = prev.next_argument_type;
            }
        }
    }
}

// ---- use-site renames ----

/// Rewrites the stored names inside every connection that starts or ends at
/// the renamed node. Revert runs the same cascade in the other direction.
#[derive(Debug)]
pub enum RenameUses {
    Input { old: String, new: String },
    Output { old: String, new: String },
    Exception { old: String, new: String },
    Section { old: String, new: String },
    Procedure { old: String, new: String },
}

impl RenameUses {
    fn run(&self, activity: &mut Activity, forward: bool) {
        let cascade = |old: &String, new: &String| -> (String, String) {
            if forward {
                (old.clone(), new.clone())
            } else {
                (new.clone(), old.clone())
            }
        };
        match self {
            RenameUses::Input { old, new } => {
                let (from, to) = cascade(old, new);
                activity.rename_input_uses(&from, &to);
            }
            RenameUses::Output { old, new } => {
                let (from, to) = cascade(old, new);
                activity.rename_output_uses(&from, &to);
            }
            RenameUses::Exception { old, new } => {
                let (from, to) = cascade(old, new);
                activity.rename_exception_uses(&from, &to);
            }
            RenameUses::Section { old, new } => {
                let (from, to) = cascade(old, new);
                activity.rename_section_uses(&from, &to);
            }
            RenameUses::Procedure { old, new } => {
                let (from, to) = cascade(old, new);
                activity.rename_procedure_uses(&from, &to);
            }
        }
    }
}

impl Change for RenameUses {
    fn apply(&mut self, activity: &mut Activity) {
        self.run(activity, true);
    }

    fn revert(&mut self, activity: &mut Activity) {
        self.run(activity, false);
    }
}

// ---- child changes ----

fn targets_section_input(c: &Connection, owner: &str, name: &str) -> bool {
    matches!(&c.target, TargetPort::SectionInput { section, input } if section == owner && input == name)
}

fn sources_section_output(c: &Connection, owner: &str, name: &str) -> bool {
    matches!(&c.source, SourcePort::SectionOutput { section, output } if section == owner && output == name)
}

fn sources_procedure_output(c: &Connection, owner: &str, name: &str) -> bool {
    matches!(&c.source, SourcePort::ProcedureOutput { procedure, output } if procedure == owner && output == name)
}

/// Master macro defining the refactor/add/remove change triple for one child
/// port kind (section inputs, section outputs, procedure outputs).
macro_rules! define_child_changes {
    ($refactor:ident, $add:ident, $remove:ident, $node:ty, $owner_mut:ident,
     $collection:ident, $type_field:ident, $rename_uses:ident, $incident:path,
     $make:expr) => {
        /// Overwrites the child's name and type, cascading the rename onto
        /// every connection stored against it.
        #[derive(Debug)]
        pub struct $refactor {
            owner: String,
            target: String,
            new: PortShape,
            prev: Option<PortShape>,
        }

        impl $refactor {
            pub fn new(owner: impl Into<String>, target: impl Into<String>, new: PortShape) -> Self {
                Self {
                    owner: owner.into(),
                    target: target.into(),
                    new,
                    prev: None,
                }
            }
        }

        impl Change for $refactor {
            fn apply(&mut self, activity: &mut Activity) {
                let mut rewritten = false;
                if let Some(owner) = activity.$owner_mut(&self.owner) {
                    if let Some(child) =
                        owner.$collection.iter_mut().find(|c| c.name == self.target)
                    {
                        self.prev = Some(PortShape {
                            name: child.name.clone(),
                            data_type: child.$type_field.clone(),
                        });
                        child.name = self.new.name.clone();
                        child.$type_field = self.new.data_type.clone();
                        rewritten = true;
                    }
                }
                if rewritten {
                    activity.$rename_uses(&self.owner, &self.target, &self.new.name);
                }
            }

            fn revert(&mut self, activity: &mut Activity) {
                let Some(prev) = self.prev.take() else {
                    return;
                };
                let mut rewritten = false;
                if let Some(owner) = activity.$owner_mut(&self.owner) {
                    if let Some(child) = owner
                        .$collection
                        .iter_mut()
                        .find(|c| c.name == self.new.name)
                    {
                        child.name = prev.name.clone();
                        child.$type_field = prev.data_type.clone();
                        rewritten = true;
                    }
                }
                if rewritten {
                    activity.$rename_uses(&self.owner, &self.new.name, &prev.name);
                }
            }
        }

        /// Inserts a new child built from a shape entry. Revert removes it;
        /// ordering is restored by the surrounding aggregate's sorts.
        #[derive(Debug)]
        pub struct $add {
            owner: String,
            node: $node,
        }

        impl $add {
            pub fn new(owner: impl Into<String>, shape: &PortShape) -> Self {
                Self {
                    owner: owner.into(),
                    node: $make(shape),
                }
            }
        }

        impl Change for $add {
            fn apply(&mut self, activity: &mut Activity) {
                if let Some(owner) = activity.$owner_mut(&self.owner) {
                    owner.$collection.push(self.node.clone());
                }
            }

            fn revert(&mut self, activity: &mut Activity) {
                if let Some(owner) = activity.$owner_mut(&self.owner) {
                    if let Some(idx) = owner
                        .$collection
                        .iter()
                        .position(|c| c.name == self.node.name)
                    {
                        owner.$collection.remove(idx);
                    }
                }
            }
        }

        /// Removes a child no longer claimed by the authoritative shape,
        /// detaching and capturing its incident connections first.
        #[derive(Debug)]
        pub struct $remove {
            owner: String,
            name: String,
            node: Option<$node>,
            detached: Vec<Connection>,
        }

        impl $remove {
            pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
                Self {
                    owner: owner.into(),
                    name: name.into(),
                    node: None,
                    detached: Vec::new(),
                }
            }
        }

        impl Change for $remove {
            fn apply(&mut self, activity: &mut Activity) {
                self.detached =
                    activity.detach_matching(|c| $incident(c, &self.owner, &self.name));
                if let Some(owner) = activity.$owner_mut(&self.owner) {
                    if let Some(idx) = owner.$collection.iter().position(|c| c.name == self.name) {
                        self.node = Some(owner.$collection.remove(idx));
                    }
                }
            }

            fn revert(&mut self, activity: &mut Activity) {
                if let Some(node) = self.node.take() {
                    if let Some(owner) = activity.$owner_mut(&self.owner) {
                        owner.$collection.push(node);
                    }
                }
                for connection in self.detached.drain(..) {
                    activity.connect(connection);
                }
            }
        }
    };
}

define_child_changes!(
    RefactorSectionInput,
    AddSectionInput,
    RemoveSectionInput,
    SectionInputNode,
    section_mut,
    inputs,
    parameter_type,
    rename_section_input_uses,
    targets_section_input,
    |shape: &PortShape| SectionInputNode {
        name: shape.name.clone(),
        parameter_type: shape.data_type.clone(),
    }
);
define_child_changes!(
    RefactorSectionOutput,
    AddSectionOutput,
    RemoveSectionOutput,
    SectionOutputNode,
    section_mut,
    outputs,
    argument_type,
    rename_section_output_uses,
    sources_section_output,
    |shape: &PortShape| SectionOutputNode {
        name: shape.name.clone(),
        argument_type: shape.data_type.clone(),
    }
);
define_child_changes!(
    RefactorProcedureOutput,
    AddProcedureOutput,
    RemoveProcedureOutput,
    crate::model::ProcedureOutputNode,
    procedure_mut,
    outputs,
    argument_type,
    rename_procedure_output_uses,
    sources_procedure_output,
    |shape: &PortShape| crate::model::ProcedureOutputNode {
        name: shape.name.clone(),
        argument_type: shape.data_type.clone(),
    }
);

// ---- shape reconciliation ----

/// Reconciles a child collection against an authoritative shape.
///
/// Per shape entry, an existing child is claimed through the rename mapping
/// (current name -> intended shape name) or, failing that, by name equality;
/// claimed children become refactor changes, unmatched entries become adds,
/// and children left unclaimed become removes. A child is never claimed
/// twice; a later entry resolving to an already-claimed child turns into an
/// add instead.
///
/// The emitted changes run in a fixed order: removes, then renames, then
/// adds. Removes go first so their detach scan still sees every child under
/// its pre-refactor name, and each rename passes through a temporary unique
/// name (two phases), so a rename whose target is another live sibling's
/// current name (a freed-up name, or a full swap) never aliases two children
/// onto one name mid-apply.
pub(crate) fn reconcile_children<N, F, R, A, D>(
    children: &[N],
    name_of: F,
    shape: &[PortShape],
    mapping: &AHashMap<String, String>,
    make_refactor: R,
    make_add: A,
    make_remove: D,
) -> Result<Vec<Box<dyn Change>>, ShapeError>
where
    F: Fn(&N) -> &str,
    R: Fn(&str, &PortShape) -> Box<dyn Change>,
    A: Fn(&PortShape) -> Box<dyn Change>,
    D: Fn(&str) -> Box<dyn Change>,
{
    if let Some(dup) = shape
        .iter()
        .map(|entry| entry.name.to_lowercase())
        .duplicates()
        .next()
    {
        return Err(ShapeError::DuplicateName(dup));
    }

    let index: AHashMap<String, &str> = children
        .iter()
        .map(|c| (name_of(c).to_lowercase(), name_of(c)))
        .collect();

    // Invert the mapping to resolve shape entries back to current children.
    let mut intended: AHashMap<String, &str> = AHashMap::new();
    for (old, new) in mapping {
        let Some(exact) = index.get(&old.to_lowercase()) else {
            return Err(ShapeError::UnknownChild(old.clone()));
        };
        if let Some(first) = intended.insert(new.to_lowercase(), *exact) {
            return Err(ShapeError::ConflictingMapping {
                first: first.to_string(),
                second: exact.to_string(),
                target: new.clone(),
            });
        }
    }

    let mut claimed: AHashSet<String> = AHashSet::new();
    let mut resolved: Vec<(&PortShape, Option<&str>)> = Vec::new();
    for entry in shape {
        let key = entry.name.to_lowercase();
        let candidate = intended.get(&key).or_else(|| index.get(&key)).copied();
        match candidate {
            Some(existing) if !claimed.contains(&existing.to_lowercase()) => {
                claimed.insert(existing.to_lowercase());
                resolved.push((entry, Some(existing)));
            }
            _ => resolved.push((entry, None)),
        }
    }

    // Removes first: the detach scan must see every child under its
    // pre-refactor name, or it also catches connections a rename has just
    // rewritten onto the removed name.
    let mut changes: Vec<Box<dyn Change>> = Vec::new();
    for child in children {
        let name = name_of(child);
        if !claimed.contains(&name.to_lowercase()) {
            changes.push(make_remove(name));
        }
    }

    // Renamed children move to a temporary unique name before any child
    // takes its final one, so a swap like {a -> b, b -> a} never has two
    // siblings (or two connection records) aliased onto one name.
    let mut taken: AHashSet<String> = children
        .iter()
        .map(|c| name_of(c).to_lowercase())
        .collect();
    taken.extend(shape.iter().map(|entry| entry.name.to_lowercase()));
    let mut second_phase: Vec<Box<dyn Change>> = Vec::new();
    for &(entry, existing) in &resolved {
        match existing {
            Some(old) if old != entry.name => {
                let temp = unique_name(
                    &format!("{}-renaming", entry.name),
                    None,
                    taken.iter().map(String::as_str),
                );
                changes.push(make_refactor(
                    old,
                    &PortShape::new(temp.clone(), entry.data_type.clone()),
                ));
                second_phase.push(make_refactor(&temp, entry));
                taken.insert(temp.to_lowercase());
            }
            Some(old) => changes.push(make_refactor(old, entry)),
            None => {}
        }
    }
    changes.extend(second_phase);
    for &(entry, existing) in &resolved {
        if existing.is_none() {
            changes.push(make_add(entry));
        }
    }
    Ok(changes)
}
