//! Service managers driven through their command-line tools

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ServiceManager, UnknownProvider};
use crate::runner;

/// Supported service providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceProvider {
    /// systemd via `systemctl`
    Systemd,
    /// BSD rc.d via `service` and `sysrc`
    Rc,
}

impl ServiceProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Systemd => "systemd",
            Self::Rc => "rc",
        }
    }
}

impl fmt::Display for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "systemd" => Ok(Self::Systemd),
            "rc" => Ok(Self::Rc),
            _ => Err(UnknownProvider {
                kind: "service",
                name: s.to_string(),
            }),
        }
    }
}

/// A [`ServiceManager`] backed by a provider's CLI
#[derive(Debug, Clone)]
pub struct CommandServiceManager {
    provider: ServiceProvider,
}

impl CommandServiceManager {
    pub fn new(provider: ServiceProvider) -> Self {
        Self { provider }
    }

    fn action(&self, service: &str, action: &str) -> Result<()> {
        match self.provider {
            ServiceProvider::Systemd => runner::run_checked("systemctl", &[action, service]),
            ServiceProvider::Rc => runner::run_checked("service", &[service, action]),
        }
    }
}

fn rc_enable_var(service: &str) -> String {
    format!("{}_enable", service.replace('-', "_"))
}

impl ServiceManager for CommandServiceManager {
    fn name(&self) -> &'static str {
        self.provider.as_str()
    }

    fn is_available(&self) -> bool {
        match self.provider {
            ServiceProvider::Systemd => runner::command_exists("systemctl"),
            ServiceProvider::Rc => runner::command_exists("sysrc"),
        }
    }

    fn is_running(&self, service: &str) -> Result<bool> {
        match self.provider {
            ServiceProvider::Systemd => {
                runner::run_status("systemctl", &["is-active", "--quiet", service])
            }
            ServiceProvider::Rc => runner::run_status("service", &[service, "status"]),
        }
    }

    fn is_enabled(&self, service: &str) -> Result<bool> {
        match self.provider {
            ServiceProvider::Systemd => {
                runner::run_status("systemctl", &["is-enabled", "--quiet", service])
            }
            ServiceProvider::Rc => {
                let var = rc_enable_var(service);
                let (success, stdout) = runner::run_output("sysrc", &["-n", &var])?;
                Ok(success && stdout.eq_ignore_ascii_case("yes"))
            }
        }
    }

    fn start(&self, service: &str) -> Result<()> {
        self.action(service, "start")
    }

    fn enable(&self, service: &str) -> Result<()> {
        match self.provider {
            ServiceProvider::Systemd => runner::run_checked("systemctl", &["enable", service]),
            ServiceProvider::Rc => {
                let assignment = format!("{}=YES", rc_enable_var(service));
                runner::run_checked("sysrc", &[&assignment])
            }
        }
    }

    fn restart(&self, service: &str) -> Result<()> {
        self.action(service, "restart")
    }
}
