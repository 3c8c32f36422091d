//! Error types for plan construction and reconciliation.

use crate::types::ResourceKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type alias for declarative operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of errors, so callers can branch without matching on text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The plan itself is malformed (programming error in plan construction).
    Plan,
    /// A resource's state query or action failed at runtime.
    Resource,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Plan => "Invalid plan",
            Self::Resource => "Resource failure",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A single resource's underlying action failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind} '{id}' failed: {cause}")]
pub struct ResourceApplyError {
    /// Kind of the failing resource.
    pub kind: ResourceKind,
    /// Identifier of the failing resource.
    pub id: String,
    /// Rendered cause chain.
    pub cause: String,
}

/// Errors that can occur while ordering or applying a plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The ordering edges contain a cycle.
    #[error("dependency cycle in plan: {}", path.join(" -> "))]
    PlanCycle {
        /// Resource ids along the cycle, first id repeated at the end.
        path: Vec<String>,
    },

    /// An edge references a resource that is not in the plan.
    #[error("edge references unknown resource: {id}")]
    UnknownResource {
        /// The missing resource id.
        id: String,
    },

    /// Two resources share an id.
    #[error("duplicate resource in plan: {id}")]
    DuplicateResource {
        /// The repeated resource id.
        id: String,
    },

    /// A resource failed while applying.
    #[error(transparent)]
    ResourceApply(#[from] ResourceApplyError),
}

impl Error {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PlanCycle { .. } | Self::UnknownResource { .. } | Self::DuplicateResource { .. } => {
                ErrorCategory::Plan
            }
            Self::ResourceApply(_) => ErrorCategory::Resource,
        }
    }
}
