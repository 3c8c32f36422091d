//! Settings resolution
//!
//! Turns host facts plus user overrides into the concrete [`Settings`] the
//! plan builder consumes: package and service names, the config file path
//! and content, and which package and service providers to drive.

use anyhow::{Context, Result, bail};
use compat::Facts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::backend::{PackageProvider, ServiceProvider};
use crate::paths;

/// Application name used when nothing else is configured
pub const DEFAULT_APP_NAME: &str = "owncloud_app";

/// User overrides from the `[settings]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsOverrides {
    pub app_name: Option<String>,
    pub package_name: Option<String>,
    pub config_path: Option<String>,
    /// Literal config file content
    pub config_content: Option<String>,
    /// File whose contents become the config content
    pub config_source: Option<String>,
    /// Octal permission bits, e.g. "0640"
    pub config_mode: Option<String>,
    pub service_name: Option<String>,
    pub package_provider: Option<PackageProvider>,
    pub service_provider: Option<ServiceProvider>,
    /// Entries rendered into the generated config
    pub values: BTreeMap<String, String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub package_name: String,
    pub config_path: PathBuf,
    pub config_content: String,
    pub config_mode: Option<u32>,
    pub service_name: String,
    pub package_provider: PackageProvider,
    pub service_provider: ServiceProvider,
}

impl Settings {
    /// Resolve settings for `facts`, letting `overrides` win over defaults.
    pub fn resolve(facts: &Facts, overrides: &SettingsOverrides) -> Result<Self> {
        let app_name = overrides
            .app_name
            .clone()
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        let package_provider = match overrides.package_provider {
            Some(provider) => provider,
            None => default_package_provider(facts).with_context(|| {
                format!(
                    "No known package provider for OS family '{}'; set settings.package_provider",
                    facts.os_family
                )
            })?,
        };
        let service_provider = overrides
            .service_provider
            .unwrap_or_else(|| default_service_provider(facts));

        let config_path = match &overrides.config_path {
            Some(path) => paths::expand(path),
            None => PathBuf::from(format!("/etc/{app_name}/config.php")),
        };

        let config_mode = overrides
            .config_mode
            .as_deref()
            .map(parse_mode)
            .transpose()?;

        let settings = Self {
            package_name: overrides
                .package_name
                .clone()
                .unwrap_or_else(|| app_name.clone()),
            config_path,
            config_content: resolve_content(overrides)?,
            config_mode,
            service_name: overrides
                .service_name
                .clone()
                .unwrap_or_else(|| app_name.clone()),
            package_provider,
            service_provider,
        };

        log::debug!(
            "Resolved settings for {}: package {} via {}, service {} via {}, config {}",
            facts,
            settings.package_name,
            settings.package_provider,
            settings.service_name,
            settings.service_provider,
            settings.config_path.display()
        );

        Ok(settings)
    }
}

fn resolve_content(overrides: &SettingsOverrides) -> Result<String> {
    if let Some(content) = &overrides.config_content {
        return Ok(content.clone());
    }

    if let Some(source) = &overrides.config_source {
        let path = paths::expand(source);
        return fs::read_to_string(&path)
            .with_context(|| format!("Could not read config source {}", path.display()));
    }

    Ok(render_php_config(&overrides.values))
}

/// Package provider conventionally used by an OS family
pub fn default_package_provider(facts: &Facts) -> Option<PackageProvider> {
    match facts.os_family.as_str() {
        "Debian" => Some(PackageProvider::Apt),
        "RedHat" => {
            let legacy = facts
                .major_version()
                .and_then(|major| major.parse::<u32>().ok())
                .is_some_and(|major| major < 8);
            Some(if legacy {
                PackageProvider::Yum
            } else {
                PackageProvider::Dnf
            })
        }
        "Suse" => Some(PackageProvider::Zypper),
        "Archlinux" => Some(PackageProvider::Pacman),
        "FreeBSD" => Some(PackageProvider::Pkg),
        _ => None,
    }
}

/// Service provider conventionally used by an OS family
pub fn default_service_provider(facts: &Facts) -> ServiceProvider {
    match facts.os_family.as_str() {
        "FreeBSD" => ServiceProvider::Rc,
        _ => ServiceProvider::Systemd,
    }
}

/// Parse an octal permission string ("0640", "640", "0o640")
pub fn parse_mode(mode: &str) -> Result<u32> {
    let digits = mode.trim();
    let digits = digits.strip_prefix("0o").unwrap_or(digits);

    if digits.is_empty() {
        bail!("Invalid config_mode '{mode}': expected octal digits such as 0640");
    }

    let parsed = u32::from_str_radix(digits, 8)
        .with_context(|| format!("Invalid config_mode '{mode}': expected octal digits such as 0640"))?;
    if parsed > 0o7777 {
        bail!("Invalid config_mode '{mode}': permission bits above 07777");
    }
    Ok(parsed)
}

/// Render values as a PHP `$CONFIG` array
pub fn render_php_config(values: &BTreeMap<String, String>) -> String {
    let mut out = String::from("<?php\n$CONFIG = array (\n");
    for (key, value) in values {
        out.push_str(&format!(
            "  '{}' => '{}',\n",
            php_escape(key),
            php_escape(value)
        ));
    }
    out.push_str(");\n");
    out
}

fn php_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}
