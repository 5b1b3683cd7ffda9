//! Add/remove change primitives for the five top-level node kinds.

use super::change::Change;
use crate::model::{
    Activity, Connection, ExceptionNode, InputNode, OutputNode, ProcedureNode, SectionNode,
    SiblingSet,
};

/// Master macro defining the add and remove change pair for one node kind.
///
/// The pairs differ only in the collection they mutate, the sibling set they
/// re-sort and the incident-connection predicate used to detach before
/// removal, so one definition covers all five kinds.
macro_rules! define_node_changes {
    ($add:ident, $remove:ident, $node:ty, $collection:ident, $set:expr, $touches:ident, $name:ident) => {
        /// Inserts a pre-built node and re-sorts its sibling collection.
        /// Revert removes it again; a freshly added node has no incident
        /// connections to restore.
        #[derive(Debug)]
        pub struct $add {
            node: $node,
        }

        impl $add {
            pub fn new(node: $node) -> Self {
                Self { node }
            }
        }

        impl Change for $add {
            fn apply(&mut self, activity: &mut Activity) {
                activity.$collection.push(self.node.clone());
                activity.resort(&$set);
            }

            fn revert(&mut self, activity: &mut Activity) {
                if let Some(idx) = activity
                    .$collection
                    .iter()
                    .position(|n| n.$name == self.node.$name)
                {
                    activity.$collection.remove(idx);
                }
            }
        }

        /// Detaches every incident connection (captured in list order), then
        /// removes the node. Revert reinserts it, re-establishes the captured
        /// connections in capture order and re-sorts.
        #[derive(Debug)]
        pub struct $remove {
            name: String,
            node: Option<$node>,
            detached: Vec<Connection>,
        }

        impl $remove {
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    node: None,
                    detached: Vec::new(),
                }
            }
        }

        impl Change for $remove {
            fn apply(&mut self, activity: &mut Activity) {
                self.detached = activity.detach_matching(|c| c.$touches(&self.name));
                if let Some(idx) = activity
                    .$collection
                    .iter()
                    .position(|n| n.$name == self.name)
                {
                    self.node = Some(activity.$collection.remove(idx));
                }
            }

            fn revert(&mut self, activity: &mut Activity) {
                if let Some(node) = self.node.take() {
                    activity.$collection.push(node);
                }
                for connection in self.detached.drain(..) {
                    activity.connect(connection);
                }
                activity.resort(&$set);
            }
        }
    };
}

define_node_changes!(
    AddInput,
    RemoveInput,
    InputNode,
    inputs,
    SiblingSet::Inputs,
    touches_input,
    name
);
define_node_changes!(
    AddSection,
    RemoveSection,
    SectionNode,
    sections,
    SiblingSet::Sections,
    touches_section,
    name
);
define_node_changes!(
    AddProcedure,
    RemoveProcedure,
    ProcedureNode,
    procedures,
    SiblingSet::Procedures,
    touches_procedure,
    name
);
define_node_changes!(
    AddOutput,
    RemoveOutput,
    OutputNode,
    outputs,
    SiblingSet::Outputs,
    touches_output,
    name
);
define_node_changes!(
    AddException,
    RemoveException,
    ExceptionNode,
    exceptions,
    SiblingSet::Exceptions,
    touches_exception,
    class_name
);
