use super::connection::{Connection, SourcePort, TargetPort};
use super::naming::sort_by_name;
use super::node::{ExceptionNode, InputNode, OutputNode, ProcedureNode, SectionNode};

/// Identifies one sortable sibling collection inside an [`Activity`].
///
/// Child collections are addressed through the current name of the owning
/// node, so a set built before a rename stays valid as long as it is used
/// while that name is in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiblingSet {
    Inputs,
    Sections,
    Procedures,
    Outputs,
    Exceptions,
    SectionInputs(String),
    SectionOutputs(String),
    ProcedureOutputs(String),
}

/// The in-memory activity graph: node collections plus one central list of
/// live connections.
///
/// The container is pure data. Preconditions, uniqueness and ordering are the
/// business of the [`edit`](crate::edit) layer; the methods here are the
/// structural primitives it is built from. Connections name their endpoints
/// instead of referencing them, so connecting and detaching are single-record
/// operations that can never register a link on only one side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Activity {
    pub name: String,
    pub inputs: Vec<InputNode>,
    pub sections: Vec<SectionNode>,
    pub procedures: Vec<ProcedureNode>,
    pub outputs: Vec<OutputNode>,
    pub exceptions: Vec<ExceptionNode>,
    pub connections: Vec<Connection>,
}

impl Activity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    // ---- node lookup (case-insensitive, exact string stored) ----

    pub fn input(&self, name: &str) -> Option<&InputNode> {
        self.inputs.iter().find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn section(&self, name: &str) -> Option<&SectionNode> {
        self.sections
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut SectionNode> {
        self.sections
            .iter_mut()
            .find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn procedure(&self, name: &str) -> Option<&ProcedureNode> {
        self.procedures
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn procedure_mut(&mut self, name: &str) -> Option<&mut ProcedureNode> {
        self.procedures
            .iter_mut()
            .find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn output(&self, name: &str) -> Option<&OutputNode> {
        self.outputs
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn exception(&self, class_name: &str) -> Option<&ExceptionNode> {
        self.exceptions
            .iter()
            .find(|n| n.class_name.eq_ignore_ascii_case(class_name))
    }

    // ---- connections ----

    /// Registers a live connection. Both endpoints become linked at once;
    /// exclusivity per source port is enforced by the edit layer, not here.
    pub fn connect(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Detaches the given connection. Returns false when it was not live.
    pub fn disconnect(&mut self, connection: &Connection) -> bool {
        match self.connections.iter().position(|c| c == connection) {
            Some(idx) => {
                self.connections.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn is_connected(&self, connection: &Connection) -> bool {
        self.connections.contains(connection)
    }

    /// The live connection outgoing from `source`, if any. At most one exists
    /// while the edit-layer invariants hold.
    pub fn connection_from(&self, source: &SourcePort) -> Option<&Connection> {
        self.connections.iter().find(|c| &c.source == source)
    }

    /// Detaches every connection outgoing from `source`, in list order.
    pub fn detach_all_from(&mut self, source: &SourcePort) -> Vec<Connection> {
        self.detach_matching(|c| &c.source == source)
    }

    /// Detaches every connection matching `pred`, returning them in list
    /// order so a revert can re-establish them one by one.
    pub fn detach_matching<F>(&mut self, pred: F) -> Vec<Connection>
    where
        F: Fn(&Connection) -> bool,
    {
        let mut detached = Vec::new();
        self.connections.retain(|c| {
            if pred(c) {
                detached.push(c.clone());
                false
            } else {
                true
            }
        });
        detached
    }

    // ---- rename cascades ----
    //
    // Renaming a port rewrites the stored names of every connection that
    // starts or ends at it. Old names are the exact stored spellings, so the
    // comparisons here are exact.

    pub fn rename_input_uses(&mut self, old: &str, new: &str) {
        for c in &mut self.connections {
            if let SourcePort::Input { input } = &mut c.source {
                if input == old {
                    *input = new.to_string();
                }
            }
        }
    }

    pub fn rename_output_uses(&mut self, old: &str, new: &str) {
        for c in &mut self.connections {
            if let TargetPort::Output { output } = &mut c.target {
                if output == old {
                    *output = new.to_string();
                }
            }
        }
    }

    pub fn rename_exception_uses(&mut self, old: &str, new: &str) {
        for c in &mut self.connections {
            if let SourcePort::Exception { class_name } = &mut c.source {
                if class_name == old {
                    *class_name = new.to_string();
                }
            }
        }
    }

    pub fn rename_section_uses(&mut self, old: &str, new: &str) {
        for c in &mut self.connections {
            if let SourcePort::SectionOutput { section, .. } = &mut c.source {
                if section == old {
                    *section = new.to_string();
                }
            }
            if let TargetPort::SectionInput { section, .. } = &mut c.target {
                if section == old {
                    *section = new.to_string();
                }
            }
        }
    }

    pub fn rename_procedure_uses(&mut self, old: &str, new: &str) {
        for c in &mut self.connections {
            match &mut c.source {
                SourcePort::ProcedureOutput { procedure, .. }
                | SourcePort::ProcedureNext { procedure } => {
                    if procedure == old {
                        *procedure = new.to_string();
                    }
                }
                _ => {}
            }
            if let TargetPort::Procedure { procedure } = &mut c.target {
                if procedure == old {
                    *procedure = new.to_string();
                }
            }
        }
    }

    pub fn rename_section_input_uses(&mut self, owner: &str, old: &str, new: &str) {
        for c in &mut self.connections {
            if let TargetPort::SectionInput { section, input } = &mut c.target {
                if section == owner && input == old {
                    *input = new.to_string();
                }
            }
        }
    }

    pub fn rename_section_output_uses(&mut self, owner: &str, old: &str, new: &str) {
        for c in &mut self.connections {
            if let SourcePort::SectionOutput { section, output } = &mut c.source {
                if section == owner && output == old {
                    *output = new.to_string();
                }
            }
        }
    }

    pub fn rename_procedure_output_uses(&mut self, owner: &str, old: &str, new: &str) {
        for c in &mut self.connections {
            if let SourcePort::ProcedureOutput { procedure, output } = &mut c.source {
                if procedure == owner && output == old {
                    *output = new.to_string();
                }
            }
        }
    }

    // ---- canonical ordering ----

    /// Re-establishes the canonical order of one sibling collection. A set
    /// naming a node that is no longer present is a no-op.
    pub fn resort(&mut self, set: &SiblingSet) {
        match set {
            SiblingSet::Inputs => sort_by_name(&mut self.inputs, |n| &n.name),
            SiblingSet::Sections => sort_by_name(&mut self.sections, |n| &n.name),
            SiblingSet::Procedures => sort_by_name(&mut self.procedures, |n| &n.name),
            SiblingSet::Outputs => sort_by_name(&mut self.outputs, |n| &n.name),
            SiblingSet::Exceptions => sort_by_name(&mut self.exceptions, |n| &n.class_name),
            SiblingSet::SectionInputs(section) => {
                if let Some(s) = self.section_mut(section) {
                    sort_by_name(&mut s.inputs, |n| &n.name);
                }
            }
            SiblingSet::SectionOutputs(section) => {
                if let Some(s) = self.section_mut(section) {
                    sort_by_name(&mut s.outputs, |n| &n.name);
                }
            }
            SiblingSet::ProcedureOutputs(procedure) => {
                if let Some(p) = self.procedure_mut(procedure) {
                    sort_by_name(&mut p.outputs, |n| &n.name);
                }
            }
        }
    }
}
