//! # Kousei - Activity Graph Editing and Link Resolution Engine
//!
//! **Kousei** is a graph-edit and link-resolution engine for flow-based
//! activity configurations: typed nodes (inputs, sections with sub-inputs and
//! sub-outputs, procedures with outputs and a "next" port, outputs,
//! exceptions) joined by typed, singular, named connections. Every mutation
//! is a reversible command, and the whole graph round-trips to a name-keyed
//! persisted form without ever leaving a dangling or duplicated reference.
//!
//! ## Core Workflow
//!
//! The engine is designed to sit under an interactive editor. The primary
//! workflow is:
//!
//! 1.  **Load Your Data**: Parse your configuration format into
//!     [`RawActivity`](store::RawActivity) records (implement
//!     [`IntoActivity`](store::IntoActivity) for your own structs), then call
//!     [`load`](store::load) to get a fully linked [`Activity`](model::Activity).
//!     Stored connection keys that no longer resolve are dropped, not errors.
//! 2.  **Edit**: Ask the operation set in [`edit::ops`] for a
//!     [`Change`](edit::Change). Operations validate their preconditions up
//!     front and hand back a [`NoChange`](edit::NoChange) with a diagnostic
//!     reason instead of failing. The caller decides when to `apply()` and
//!     whether to `revert()`; every change is an exact inverse of itself,
//!     including the connections it detached.
//! 3.  **Store**: Call [`store`](store::store) to denormalize the live graph
//!     back into key-consistent records for your persistence layer.
//!
//! Sibling names stay unique (case-insensitive) through automatic `-N`
//! suffixing, and every structural edit re-establishes the canonical
//! case-insensitive ordering of the collections it touched.
//!
//! ## Quick Start
//!
//! ```rust
//! use kousei::prelude::*;
//! use kousei::edit::ops;
//!
//! let mut activity = Activity::new("invoice-flow");
//!
//! // Build the graph through reversible changes.
//! ops::add_input(&activity, "amount", "i64").apply(&mut activity);
//! ops::add_output(&activity, "total", "i64").apply(&mut activity);
//!
//! // Connect the input to the output. A source port carries at most one
//! // outgoing connection; relinking displaces (and captures) the old one.
//! let mut link = ops::link_input_to_output(&activity, "amount", "total");
//! link.apply(&mut activity);
//! assert_eq!(activity.connections.len(), 1);
//!
//! // Round-trip through the persisted, string-keyed form.
//! let raw = store(&activity);
//! let reloaded = load(raw);
//! assert_eq!(reloaded.connections, activity.connections);
//!
//! // And back out again.
//! link.revert(&mut activity);
//! assert!(activity.connections.is_empty());
//! ```

pub mod edit;
pub mod error;
pub mod model;
pub mod prelude;
pub mod store;
