//! Command implementations
//!
//! Every command starts from the same inputs: the run configuration,
//! host facts (config merged with CLI flags) and the support matrix.

pub mod apply;
pub mod check;
pub mod plan;

use anyhow::Result;
use compat::{Facts, SupportMatrix};

use crate::Context;
use crate::backend::Host;
use crate::config::RunConfig;
use crate::params::{Settings, SettingsOverrides};
use crate::paths;

/// Inputs shared by all commands
pub struct RunInputs {
    pub facts: Facts,
    pub matrix: SupportMatrix,
    pub overrides: SettingsOverrides,
}

impl RunInputs {
    /// Resolve config location, load it and merge CLI facts
    pub fn load(ctx: &Context) -> Result<Self> {
        let location = paths::config_file(ctx.config.as_deref())?;
        let config = RunConfig::load(&location)?;
        let matrix = config.support_matrix();
        let facts = config.facts.merge(ctx.facts.clone()).into_facts()?;

        Ok(Self {
            facts,
            matrix,
            overrides: config.settings,
        })
    }

    /// Run the compatibility gate
    pub fn gate(&self) -> Result<()> {
        compat::check_supported(&self.facts, &self.matrix)?;
        Ok(())
    }

    /// Gate, then resolve settings and the real host backends.
    ///
    /// Settings are resolved only after the gate passes, so an unsupported
    /// platform is always reported as such.
    pub fn resolve(&self) -> Result<(Settings, Host)> {
        self.gate()?;
        let settings = Settings::resolve(&self.facts, &self.overrides)?;

        let host = Host::system(settings.package_provider, settings.service_provider);
        if !host.packages.is_available() {
            log::warn!(
                "{} not found on this host; package checks will fail",
                host.packages.name()
            );
        }
        if !host.services.is_available() {
            log::warn!(
                "{} not found on this host; service checks will fail",
                host.services.name()
            );
        }

        log::info!(
            "Package {} via {}, config {}, service {} via {}",
            settings.package_name,
            settings.package_provider,
            settings.config_path.display(),
            settings.service_name,
            settings.service_provider
        );

        Ok((settings, host))
    }
}
