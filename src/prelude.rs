//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! kousei crate. Import this module to get access to the core functionality
//! without having to import each type individually.
//!
//! # Example
//!
//! ```rust
//! use kousei::prelude::*;
//! use kousei::edit::ops;
//!
//! let mut activity = Activity::new("example");
//! ops::add_input(&activity, "reading", "f64").apply(&mut activity);
//! let raw = store(&activity);
//! assert_eq!(raw.inputs.len(), 1);
//! ```

// The model: node collections, ports and connections
pub use crate::model::{
    Activity, Connection, ExceptionNode, InputNode, OutputNode, ProcedureNextPort, ProcedureNode,
    ProcedureOutputNode, Property, SectionInputNode, SectionNode, SectionOutputNode, SiblingSet,
    SourcePort, TargetPort,
};

// The change protocol and the refactor input types
pub use crate::edit::{
    AggregateChange, Change, InputFields, NoChange, OutputFields, PortShape, ProcedureFields,
    SectionFields,
};

// Reference resolution and denormalization
pub use crate::store::{IntoActivity, RawActivity, RawLink, load, store};

// Error types
pub use crate::error::{ConversionError, PersistError, ShapeError};
