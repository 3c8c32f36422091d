//! Package resource - keep a package installed

use anyhow::{Context, Result};
use std::sync::Arc;

use super::{ApplyContext, ApplyResult, Resource, ResourceKind, ResourceState};
use crate::backend::PackageManager;

/// A package that must be present
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    manager: Arc<dyn PackageManager>,
}

impl Package {
    pub fn new(name: &str, manager: Arc<dyn PackageManager>) -> Self {
        Self {
            name: name.to_string(),
            manager,
        }
    }

    fn is_installed(&self) -> Result<bool> {
        self.manager
            .is_installed(&self.name)
            .with_context(|| format!("Failed to query {} for {}", self.manager.name(), self.name))
    }
}

impl Resource for Package {
    fn id(&self) -> String {
        format!("package:{}", self.name)
    }

    fn description(&self) -> String {
        format!("Install {} via {}", self.name, self.manager.name())
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Package
    }

    fn current_state(&self) -> Result<ResourceState> {
        if self.is_installed()? {
            Ok(ResourceState::Present { details: None })
        } else {
            Ok(ResourceState::Absent)
        }
    }

    fn desired_state(&self) -> ResourceState {
        ResourceState::Present { details: None }
    }

    fn apply(&self, _ctx: &mut ApplyContext) -> Result<ApplyResult> {
        if self.is_installed()? {
            return Ok(ApplyResult::NoChange);
        }

        self.manager
            .install(&self.name)
            .with_context(|| format!("{} install {} failed", self.manager.name(), self.name))?;
        Ok(ApplyResult::Created)
    }
}
