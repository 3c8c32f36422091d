//! Service resource - keep a service running and enabled, restart on notify

use anyhow::{Context, Result};
use std::sync::Arc;

use super::{ApplyContext, ApplyResult, Resource, ResourceKind, ResourceState};
use crate::backend::ServiceManager;

/// A system service that must be running and enabled at boot
#[derive(Debug, Clone)]
pub struct Service {
    pub name: String,
    manager: Arc<dyn ServiceManager>,
}

fn status_label(running: bool, enabled: bool) -> String {
    format!(
        "{}, {}",
        if running { "running" } else { "stopped" },
        if enabled { "enabled" } else { "disabled" }
    )
}

impl Service {
    pub fn new(name: &str, manager: Arc<dyn ServiceManager>) -> Self {
        Self {
            name: name.to_string(),
            manager,
        }
    }

    /// (running, enabled)
    fn status(&self) -> Result<(bool, bool)> {
        let running = self
            .manager
            .is_running(&self.name)
            .with_context(|| format!("Failed to query whether {} is running", self.name))?;
        let enabled = self
            .manager
            .is_enabled(&self.name)
            .with_context(|| format!("Failed to query whether {} is enabled", self.name))?;
        Ok((running, enabled))
    }
}

impl Resource for Service {
    fn id(&self) -> String {
        format!("service:{}", self.name)
    }

    fn description(&self) -> String {
        format!("Run and enable {} ({})", self.name, self.manager.name())
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Service
    }

    fn current_state(&self) -> Result<ResourceState> {
        let (running, enabled) = self.status()?;
        Ok(ResourceState::Present {
            details: Some(status_label(running, enabled)),
        })
    }

    fn desired_state(&self) -> ResourceState {
        ResourceState::Present {
            details: Some(status_label(true, true)),
        }
    }

    fn apply(&self, _ctx: &mut ApplyContext) -> Result<ApplyResult> {
        let (running, enabled) = self.status()?;
        if running && enabled {
            return Ok(ApplyResult::NoChange);
        }

        if !running {
            self.manager
                .start(&self.name)
                .with_context(|| format!("Failed to start {}", self.name))?;
        }
        if !enabled {
            self.manager
                .enable(&self.name)
                .with_context(|| format!("Failed to enable {}", self.name))?;
        }

        Ok(ApplyResult::Modified)
    }

    fn refresh(&self, ctx: &mut ApplyContext) -> Result<ApplyResult> {
        let (running, enabled) = self.status()?;
        if !running || !enabled {
            // Starting picks up the new configuration anyway
            return self.apply(ctx);
        }

        log::info!(
            "Restarting {} (notified by {})",
            self.name,
            ctx.notified_by.join(", ")
        );
        self.manager
            .restart(&self.name)
            .with_context(|| format!("Failed to restart {}", self.name))?;
        Ok(ApplyResult::Restarted)
    }
}
