//! Diff computation for plan previews

use crate::planner::Plan;
use crate::resource::Resource;
use crate::types::{ResourceKind, ResourceState};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A diff between current and desired state of a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDiff {
    /// Unique identifier of the resource
    pub resource_id: String,
    /// Kind of the resource
    pub kind: ResourceKind,
    /// Human-readable description
    pub description: String,
    /// Current state
    pub current: ResourceState,
    /// Desired state
    pub desired: ResourceState,
    /// In sync, but a notifying resource will change so it gets refreshed
    pub refresh: bool,
    /// Detailed diff (e.g. unified file diff), if the resource provides one
    pub detail: Option<String>,
}

impl ResourceDiff {
    /// Create a diff from a resource, returning None if no changes needed
    pub fn from_resource(resource: &dyn Resource) -> Result<Option<Self>> {
        let current = resource.current_state()?;
        let desired = resource.desired_state();

        if current == desired {
            return Ok(None);
        }

        Ok(Some(Self {
            resource_id: resource.id(),
            kind: resource.kind(),
            description: resource.description(),
            current,
            desired,
            refresh: false,
            detail: resource.detail_diff()?,
        }))
    }

    fn refresh_of(resource: &dyn Resource) -> Result<Self> {
        let current = resource.current_state()?;
        Ok(Self {
            resource_id: resource.id(),
            kind: resource.kind(),
            description: resource.description(),
            desired: resource.desired_state(),
            current,
            refresh: true,
            detail: None,
        })
    }

    /// Check if this diff represents an addition
    pub fn is_addition(&self) -> bool {
        self.current.is_absent() && self.desired.is_present()
    }
}

/// Compute pending diffs for a plan, in apply order
///
/// Resources already in sync appear only when a notifying resource will
/// change, flagged with `refresh`.
pub fn compute_diffs(plan: &Plan) -> Result<Vec<ResourceDiff>> {
    let mut diffs = Vec::new();
    let mut notified: HashSet<String> = HashSet::new();

    for resource in plan.order()? {
        let id = resource.id();
        let diff = match ResourceDiff::from_resource(resource)? {
            Some(diff) => Some(diff),
            None if notified.contains(&id) => Some(ResourceDiff::refresh_of(resource)?),
            None => None,
        };

        if let Some(diff) = diff {
            notified.extend(plan.notify_targets(&id).map(str::to_string));
            diffs.push(diff);
        }
    }

    Ok(diffs)
}

/// Diff summary statistics
#[derive(Debug, Clone, Default)]
pub struct DiffSummary {
    /// Number of resources to add
    pub additions: usize,
    /// Number of resources to modify
    pub modifications: usize,
    /// Number of resources to refresh
    pub refreshes: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            if diff.refresh {
                summary.refreshes += 1;
            } else if diff.is_addition() {
                summary.additions += 1;
            } else {
                summary.modifications += 1;
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.modifications + self.refreshes
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
