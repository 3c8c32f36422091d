//! Core types for declarative resource management

use crate::error::ResourceApplyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a managed resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// An installed package
    Package,
    /// A configuration file with managed content
    Config,
    /// A system service
    Service,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Package => "package",
            Self::Config => "config",
            Self::Service => "service",
        };
        f.write_str(name)
    }
}

/// Current or desired state of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceState {
    /// Resource exists/is configured
    Present { details: Option<String> },
    /// Resource does not exist/is not configured
    Absent,
}

impl ResourceState {
    /// Check if state represents presence
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    /// Check if state represents absence
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// What a resource's apply or refresh actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyResult {
    /// Already in the desired state, nothing done
    NoChange,
    /// Resource was created
    Created,
    /// Resource was modified
    Modified,
    /// Resource was restarted in response to a notification
    Restarted,
}

impl ApplyResult {
    /// Check if the result represents a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

impl fmt::Display for ApplyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoChange => "no change",
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Restarted => "restarted",
        };
        f.write_str(name)
    }
}

/// Per-resource outcome of a reconcile run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Already at desired state and not notified
    Unchanged,
    /// Apply or refresh changed the resource
    Changed {
        result: ApplyResult,
        /// True when the change came from a notification-forced refresh
        refreshed: bool,
    },
    /// Dry run: the resource would have been applied or refreshed
    WouldChange { refresh: bool },
    /// State query or apply failed; the run halted here
    Failed { error: String },
}

impl Outcome {
    /// Whether this outcome triggers notification edges
    pub fn triggers_notify(&self) -> bool {
        matches!(self, Self::Changed { .. } | Self::WouldChange { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Report for one attempted resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReport {
    pub id: String,
    pub kind: ResourceKind,
    pub description: String,
    pub outcome: Outcome,
    /// Changed resources that notified this one, in apply order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notified_by: Vec<String>,
}

/// Counts of outcomes in a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub unchanged: usize,
    pub changed: usize,
    pub refreshed: usize,
    pub pending: usize,
    pub failed: usize,
    pub not_attempted: usize,
}

impl RunSummary {
    /// Total number of actual changes made (including refreshes)
    pub fn total_changes(&self) -> usize {
        self.changed + self.refreshed
    }

    /// Total number of resources in the plan
    pub fn total(&self) -> usize {
        self.unchanged + self.changed + self.refreshed + self.pending + self.failed + self.not_attempted
    }

    /// Add an outcome to the summary
    pub fn add_outcome(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Changed {
                refreshed: true, ..
            } => self.refreshed += 1,
            Outcome::Changed { .. } => self.changed += 1,
            Outcome::WouldChange { .. } => self.pending += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Result of one reconcile run
///
/// Produced once per run and handed to the caller. Earlier successes are
/// kept when a later resource fails; nothing is rolled back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResult {
    /// Attempted resources, in apply order
    pub reports: Vec<ResourceReport>,
    /// Resources never attempted because the run halted
    pub not_attempted: Vec<String>,
    /// The failure that halted the run, if any
    pub failure: Option<ResourceApplyError>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl RunResult {
    /// Check if the run completed without a failure
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Outcome recorded for a resource, `None` if it was never attempted
    pub fn outcome(&self, id: &str) -> Option<&Outcome> {
        self.report(id).map(|r| &r.outcome)
    }

    /// Report recorded for a resource, `None` if it was never attempted
    pub fn report(&self, id: &str) -> Option<&ResourceReport> {
        self.reports.iter().find(|r| r.id == id)
    }

    /// Whether any resource changed (or would change in a dry run)
    pub fn has_changes(&self) -> bool {
        self.reports.iter().any(|r| r.outcome.triggers_notify())
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            not_attempted: self.not_attempted.len(),
            ..RunSummary::default()
        };
        for report in &self.reports {
            summary.add_outcome(&report.outcome);
        }
        summary
    }

    /// Convert a recorded failure into an error
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ResourceApply`] if the run halted on a failure.
    pub fn into_result(self) -> crate::Result<Self> {
        match self.failure {
            Some(failure) => Err(failure.into()),
            None => Ok(self),
        }
    }
}

/// Options for a reconcile run
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Don't make changes, just report what would happen
    pub dry_run: bool,
}
