use std::fmt;

/// A source-only port, identified by the unique names of the nodes that own
/// it. Every connection starts at exactly one of these.
///
/// All fifteen source/target combinations share one record shape; the two
/// enums give exhaustiveness checking everywhere the engine dispatches over
/// connection kind (rename cascades, outgoing-connection lookups).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourcePort {
    Input { input: String },
    SectionOutput { section: String, output: String },
    ProcedureOutput { procedure: String, output: String },
    ProcedureNext { procedure: String },
    Exception { class_name: String },
}

/// A target-capable port, identified by the unique names of the nodes that
/// own it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetPort {
    SectionInput { section: String, input: String },
    Output { output: String },
    Procedure { procedure: String },
}

/// A live connection between a source port and a target port.
///
/// Endpoints are stored by name rather than by reference; the names are kept
/// current by the rename cascades in [`Activity`](super::Activity), so a
/// record is always resolvable against the model that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    pub source: SourcePort,
    pub target: TargetPort,
}

impl Connection {
    pub fn new(source: SourcePort, target: TargetPort) -> Self {
        Self { source, target }
    }

    /// True if either endpoint belongs to the activity input `name`.
    pub fn touches_input(&self, name: &str) -> bool {
        matches!(&self.source, SourcePort::Input { input } if input == name)
    }

    /// True if either endpoint belongs to the section `name` (the section
    /// itself, one of its inputs, or one of its outputs).
    pub fn touches_section(&self, name: &str) -> bool {
        let source_hit = matches!(
            &self.source,
            SourcePort::SectionOutput { section, .. } if section == name
        );
        let target_hit = matches!(
            &self.target,
            TargetPort::SectionInput { section, .. } if section == name
        );
        source_hit || target_hit
    }

    /// True if either endpoint belongs to the procedure `name` (the procedure
    /// itself, its next port, or one of its outputs).
    pub fn touches_procedure(&self, name: &str) -> bool {
        let source_hit = match &self.source {
            SourcePort::ProcedureOutput { procedure, .. } => procedure == name,
            SourcePort::ProcedureNext { procedure } => procedure == name,
            _ => false,
        };
        let target_hit = matches!(
            &self.target,
            TargetPort::Procedure { procedure } if procedure == name
        );
        source_hit || target_hit
    }

    /// True if either endpoint is the activity output `name`.
    pub fn touches_output(&self, name: &str) -> bool {
        matches!(&self.target, TargetPort::Output { output } if output == name)
    }

    /// True if the source is the exception declared for `class_name`.
    pub fn touches_exception(&self, class_name: &str) -> bool {
        matches!(&self.source, SourcePort::Exception { class_name: c } if c == class_name)
    }
}

impl fmt::Display for SourcePort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourcePort::Input { input } => write!(f, "input '{}'", input),
            SourcePort::SectionOutput { section, output } => {
                write!(f, "output '{}' of section '{}'", output, section)
            }
            SourcePort::ProcedureOutput { procedure, output } => {
                write!(f, "output '{}' of procedure '{}'", output, procedure)
            }
            SourcePort::ProcedureNext { procedure } => {
                write!(f, "next port of procedure '{}'", procedure)
            }
            SourcePort::Exception { class_name } => write!(f, "exception '{}'", class_name),
        }
    }
}

impl fmt::Display for TargetPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPort::SectionInput { section, input } => {
                write!(f, "input '{}' of section '{}'", input, section)
            }
            TargetPort::Output { output } => write!(f, "output '{}'", output),
            TargetPort::Procedure { procedure } => write!(f, "procedure '{}'", procedure),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
