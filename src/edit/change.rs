use crate::model::{Activity, SiblingSet};
use std::fmt::Debug;

/// A single reversible edit.
///
/// Changes are single-shot command objects: `apply()` once, then at most once
/// `revert()`. They capture whatever pre-image state they need (removed nodes,
/// detached connections) in private fields during `apply()`; there is no guard
/// against misuse beyond caller discipline. An edit whose preconditions failed
/// is returned as a [`NoChange`] rather than an error, so callers can treat
/// every operation result uniformly (e.g. push it onto an undo stack).
pub trait Change: Debug {
    fn apply(&mut self, activity: &mut Activity);

    fn revert(&mut self, activity: &mut Activity);

    /// The diagnostic reason when this edit was rejected, `None` for a real
    /// change.
    fn rejection(&self) -> Option<&str> {
        None
    }
}

/// The null edit, carrying a human-readable reason for the caller or UI.
#[derive(Debug)]
pub struct NoChange {
    reason: String,
}

impl NoChange {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub(crate) fn boxed(reason: impl Into<String>) -> Box<dyn Change> {
        let reason = reason.into();
        tracing::debug!(reason = %reason, "edit rejected");
        Box::new(Self { reason })
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Change for NoChange {
    fn apply(&mut self, _activity: &mut Activity) {}

    fn revert(&mut self, _activity: &mut Activity) {}

    fn rejection(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

/// An ordered composite of changes.
///
/// `apply()` runs the parts in list order; `revert()` runs them in reverse
/// list order, so order-dependent compositions ("sort, mutate, sort") invert
/// correctly.
#[derive(Debug, Default)]
pub struct AggregateChange {
    changes: Vec<Box<dyn Change>>,
}

impl AggregateChange {
    pub fn new(changes: Vec<Box<dyn Change>>) -> Self {
        Self { changes }
    }

    pub fn push(&mut self, change: Box<dyn Change>) {
        self.changes.push(change);
    }
}

impl Change for AggregateChange {
    fn apply(&mut self, activity: &mut Activity) {
        for change in &mut self.changes {
            change.apply(activity);
        }
    }

    fn revert(&mut self, activity: &mut Activity) {
        for change in self.changes.iter_mut().rev() {
            change.revert(activity);
        }
    }
}

/// Re-sorts one sibling collection. Sorting is canonical rather than part of
/// the exact-inverse contract, so reverting sorts again instead of restoring
/// the previous permutation.
#[derive(Debug)]
pub struct Resort {
    set: SiblingSet,
}

impl Resort {
    pub fn new(set: SiblingSet) -> Self {
        Self { set }
    }

    pub(crate) fn boxed(set: SiblingSet) -> Box<dyn Change> {
        Box::new(Self { set })
    }
}

impl Change for Resort {
    fn apply(&mut self, activity: &mut Activity) {
        activity.resort(&self.set);
    }

    fn revert(&mut self, activity: &mut Activity) {
        activity.resort(&self.set);
    }
}
