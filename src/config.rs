//! Run configuration (`converge.toml`)
//!
//! ```toml
//! [facts]
//! os_family = "Debian"
//! os_name = "Ubuntu"
//! os_version = "22.04"
//!
//! [settings]
//! app_name = "owncloud_app"
//! config_mode = "0640"
//!
//! [settings.values]
//! dbtype = "sqlite"
//!
//! [support.Debian]
//! names = ["Debian", "Ubuntu"]
//! ```

use anyhow::{Context, Result, bail};
use compat::{Facts, FamilySupport, SupportMatrix};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::params::SettingsOverrides;
use crate::paths::ConfigLocation;

/// Everything a run reads from the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub facts: FactsConfig,
    pub settings: SettingsOverrides,
    /// Support matrix; the built-in one applies when absent
    pub support: Option<SupportMatrix>,
}

/// Host facts as given in config or on the command line, possibly partial
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactsConfig {
    #[serde(alias = "osfamily")]
    pub os_family: Option<String>,
    #[serde(alias = "operatingsystem")]
    pub os_name: Option<String>,
    #[serde(alias = "operatingsystemrelease")]
    pub os_version: Option<String>,
}

impl FactsConfig {
    /// Overlay fields set in `other` onto these
    pub fn merge(mut self, other: Self) -> Self {
        if other.os_family.is_some() {
            self.os_family = other.os_family;
        }
        if other.os_name.is_some() {
            self.os_name = other.os_name;
        }
        if other.os_version.is_some() {
            self.os_version = other.os_version;
        }
        self
    }

    /// Complete facts, or an error naming what is missing
    pub fn into_facts(self) -> Result<Facts> {
        let Some(os_family) = self.os_family else {
            bail!("Host facts incomplete: os_family is not set (use [facts] or --os-family)");
        };
        let Some(os_name) = self.os_name else {
            bail!("Host facts incomplete: os_name is not set (use [facts] or --os-name)");
        };

        let facts = Facts::new(os_family, os_name);
        Ok(match self.os_version {
            Some(version) => facts.with_version(version),
            None => facts,
        })
    }
}

impl RunConfig {
    /// Load the config at `location`, falling back to defaults for an
    /// optional file that does not exist
    pub fn load(location: &ConfigLocation) -> Result<Self> {
        match fs::read_to_string(&location.path) {
            Ok(content) => Self::parse(&content, &location.path),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !location.required => {
                log::debug!(
                    "No config at {}, using built-in defaults",
                    location.path.display()
                );
                Ok(Self::default())
            }
            Err(e) => {
                Err(e).with_context(|| format!("Could not read {}", location.path.display()))
            }
        }
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .with_context(|| format!("Invalid config format in {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The configured support matrix, or the built-in one
    pub fn support_matrix(&self) -> SupportMatrix {
        self.support.clone().unwrap_or_else(default_support_matrix)
    }
}

/// Platforms supported out of the box
pub fn default_support_matrix() -> SupportMatrix {
    SupportMatrix::new()
        .with_family("Debian", FamilySupport::names(["Debian", "Ubuntu"]))
        .with_family(
            "RedHat",
            FamilySupport::names(["RedHat", "CentOS", "Rocky", "AlmaLinux", "Fedora"]),
        )
        .with_family("Suse", FamilySupport::any())
        .with_family("Archlinux", FamilySupport::any())
        .with_family("FreeBSD", FamilySupport::any())
        // No package provider for Solaris yet; Nexenta stays named in the refusal
        .with_family(
            "Solaris",
            FamilySupport::names(Vec::<String>::new()).excluding("Nexenta"),
        )
}
