//! Apply context and progress hooks
//!
//! These allow the declarative crate to be used without depending on
//! specific UI implementations.

use crate::types::Outcome;

/// Progress callback for reconcile runs
///
/// Implement this trait to receive progress updates during a run.
pub trait ProgressCallback {
    /// Called when starting to process a single resource
    fn on_resource_start(&mut self, id: &str, description: &str);

    /// Called when a resource's outcome is known
    fn on_resource_complete(&mut self, id: &str, outcome: &Outcome);

    /// Called when a change schedules a refresh of another resource
    fn on_notify(&mut self, _from: &str, _to: &str) {}
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_resource_start(&mut self, _id: &str, _description: &str) {}
    fn on_resource_complete(&mut self, _id: &str, _outcome: &Outcome) {}
}

/// Context passed to resource apply and refresh operations
#[derive(Debug, Default)]
pub struct ApplyContext {
    /// Resources whose changes triggered this apply, in notification order
    pub notified_by: Vec<String>,
}

impl ApplyContext {
    /// Create a context carrying the resources that notified this one
    pub fn notified(notified_by: Vec<String>) -> Self {
        Self { notified_by }
    }
}
