//! Resource trait for declarative state management
//!
//! A Resource represents something that can be in a certain state,
//! and can be changed to reach a desired state.

use crate::context::ApplyContext;
use crate::types::{ApplyResult, ResourceKind, ResourceState};
use anyhow::Result;
use std::fmt;

/// Core trait for declarative resources
///
/// Every resource in the system implements this trait, which provides:
/// - Identity (id, description, kind)
/// - State detection (current vs desired)
/// - State convergence (apply)
/// - Notification response (refresh)
///
/// # Example
///
/// ```ignore
/// use declarative::{ApplyContext, ApplyResult, Resource, ResourceKind, ResourceState};
///
/// #[derive(Debug)]
/// struct FileResource {
///     path: String,
///     content: String,
/// }
///
/// impl Resource for FileResource {
///     fn id(&self) -> String {
///         format!("config:{}", self.path)
///     }
///
///     fn description(&self) -> String {
///         format!("Write {}", self.path)
///     }
///
///     fn kind(&self) -> ResourceKind {
///         ResourceKind::Config
///     }
///
///     fn current_state(&self) -> Result<ResourceState> {
///         match std::fs::read_to_string(&self.path) {
///             Ok(c) => Ok(ResourceState::Present { details: Some(c) }),
///             Err(_) => Ok(ResourceState::Absent),
///         }
///     }
///
///     fn desired_state(&self) -> ResourceState {
///         ResourceState::Present { details: Some(self.content.clone()) }
///     }
///
///     fn apply(&self, _ctx: &mut ApplyContext) -> Result<ApplyResult> {
///         std::fs::write(&self.path, &self.content)?;
///         Ok(ApplyResult::Modified)
///     }
/// }
/// ```
pub trait Resource: fmt::Debug {
    /// Unique identifier for this resource within a plan
    ///
    /// Conventionally `"<kind>:<target>"`, e.g. "package:nginx" or
    /// "config:/etc/nginx/nginx.conf".
    fn id(&self) -> String;

    /// Human-readable description of what this resource does
    fn description(&self) -> String;

    /// Resource kind
    fn kind(&self) -> ResourceKind;

    /// Detect the current state of this resource
    ///
    /// This should query the system to determine what state
    /// the resource is currently in.
    fn current_state(&self) -> Result<ResourceState>;

    /// Get the desired state for this resource
    fn desired_state(&self) -> ResourceState;

    /// Check if the resource needs changes to reach desired state
    ///
    /// Default implementation compares current and desired states.
    fn needs_apply(&self) -> Result<bool> {
        let current = self.current_state()?;
        let desired = self.desired_state();
        Ok(current != desired)
    }

    /// Apply the minimal changes to reach the desired state
    ///
    /// Must be idempotent: return `NoChange` when already converged.
    fn apply(&self, ctx: &mut ApplyContext) -> Result<ApplyResult>;

    /// Respond to a notification while already in the desired state
    ///
    /// Services restart here. The default re-runs `apply`.
    fn refresh(&self, ctx: &mut ApplyContext) -> Result<ApplyResult> {
        self.apply(ctx)
    }

    /// Detailed, human-readable diff of pending changes (e.g. file content)
    fn detail_diff(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// A boxed resource for type-erased storage
pub type BoxedResource = Box<dyn Resource>;
