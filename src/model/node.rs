use serde_json::Value;

/// A free-form configuration property attached to a section or procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Value,
}

/// A top-level activity input. Its single port is source-only.
#[derive(Debug, Clone, PartialEq)]
pub struct InputNode {
    pub name: String,
    pub argument_type: String,
}

/// A sub-input of a section. Target-capable port.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionInputNode {
    pub name: String,
    pub parameter_type: String,
}

/// A sub-output of a section. Source-only port.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOutputNode {
    pub name: String,
    pub argument_type: String,
}

/// A section: a configurable block with its own inputs and outputs.
///
/// The section node itself is not a port; its children are. The shape of the
/// children is dictated externally (see `edit::ops::refactor_section`).
#[derive(Debug, Clone, PartialEq)]
pub struct SectionNode {
    pub name: String,
    pub source_class_name: String,
    pub location: String,
    pub properties: Vec<Property>,
    pub inputs: Vec<SectionInputNode>,
    pub outputs: Vec<SectionOutputNode>,
}

impl SectionNode {
    /// Looks up a sub-input by name, case-insensitively.
    pub fn input(&self, name: &str) -> Option<&SectionInputNode> {
        self.inputs
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name))
    }

    /// Looks up a sub-output by name, case-insensitively.
    pub fn output(&self, name: &str) -> Option<&SectionOutputNode> {
        self.outputs
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
    }
}

/// A named output of a procedure. Source-only port.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureOutputNode {
    pub name: String,
    pub argument_type: String,
}

/// The single continuation port of a procedure. Unnamed; addressed through
/// the owning procedure. Source-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureNextPort {
    pub argument_type: String,
}

/// A procedure: an invocable step with named outputs and one "next" port.
/// The procedure node is also target-capable (other ports may connect to it).
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureNode {
    pub name: String,
    pub resource: String,
    pub source_name: String,
    pub procedure_name: String,
    pub properties: Vec<Property>,
    pub outputs: Vec<ProcedureOutputNode>,
    pub next: ProcedureNextPort,
}

impl ProcedureNode {
    /// Looks up a named output by name, case-insensitively.
    pub fn output(&self, name: &str) -> Option<&ProcedureOutputNode> {
        self.outputs
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
    }
}

/// A top-level activity output. Target-capable port.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputNode {
    pub name: String,
    pub parameter_type: String,
}

/// An exception declaration. Source-only port, identified by class name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionNode {
    pub class_name: String,
}
