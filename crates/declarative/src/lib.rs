//! # Declarative
//!
//! A framework for declarative resource convergence.
//!
//! This crate provides the core abstractions for declaring desired state,
//! detecting current state, and converging a host to match it in
//! dependency order.
//!
//! ## Core Concepts
//!
//! - **Resource**: Something with state that can be managed (package, config file, service)
//! - **ResourceState**: The current or desired state of a resource
//! - **Plan**: Resources plus ordering (`before`) and notification (`notify`) edges
//! - **Reconciler**: [`apply`] walks the plan in topological order, applies
//!   what is out of sync, refreshes notified resources and halts on the first
//!   failure
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{apply, Plan};
//!
//! let mut plan = Plan::new();
//! let package = plan.add(Box::new(package_resource));
//! let config = plan.add(Box::new(config_resource));
//! let service = plan.add(Box::new(service_resource));
//! plan.before(&package, &config);
//! plan.notify(&config, &service);
//!
//! let result = apply(&plan)?;
//! if let Some(failure) = &result.failure {
//!     eprintln!("{failure}");
//! }
//! ```
//!
//! ## Provider Traits
//!
//! [`ProgressCallback`] receives progress updates, so the crate can be used
//! without a hard dependency on any UI framework.

pub mod context;
pub mod diff;
pub mod error;
pub mod planner;
pub mod reconciler;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use context::{ApplyContext, NoProgress, ProgressCallback};
pub use diff::{compute_diffs, DiffSummary, ResourceDiff};
pub use error::{Error, ErrorCategory, ResourceApplyError, Result};
pub use planner::{Edge, EdgeKind, Plan};
pub use reconciler::{apply, apply_with};
pub use resource::{BoxedResource, Resource};
pub use types::{
    ApplyOptions, ApplyResult, Outcome, ResourceKind, ResourceReport, ResourceState, RunResult,
    RunSummary,
};
