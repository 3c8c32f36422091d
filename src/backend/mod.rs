//! Host backends for package and service management
//!
//! Resources talk to the machine only through these traits, enabling:
//! - Real execution via the platform's package and service managers
//! - An in-memory mock host for tests

pub mod packages;
pub mod services;

#[cfg(test)]
pub mod mock;

use anyhow::Result;
use std::fmt;
use std::sync::Arc;

pub use packages::{CommandPackageManager, PackageProvider};
pub use services::{CommandServiceManager, ServiceProvider};

/// A provider name that is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} provider '{name}'")]
pub struct UnknownProvider {
    pub kind: &'static str,
    pub name: String,
}

/// Package manager operations needed to keep a package present
pub trait PackageManager: Send + Sync + fmt::Debug {
    /// Provider name for display (e.g. "apt")
    fn name(&self) -> &'static str;

    /// Whether the package manager binary is available on this host
    fn is_available(&self) -> bool;

    /// Check if a package is installed
    fn is_installed(&self, package: &str) -> Result<bool>;

    /// Install a package
    fn install(&self, package: &str) -> Result<()>;
}

/// Service manager operations needed to keep a service running and enabled
pub trait ServiceManager: Send + Sync + fmt::Debug {
    /// Provider name for display (e.g. "systemd")
    fn name(&self) -> &'static str;

    /// Whether the service manager is available on this host
    fn is_available(&self) -> bool;

    fn is_running(&self, service: &str) -> Result<bool>;

    /// Whether the service starts at boot
    fn is_enabled(&self, service: &str) -> Result<bool>;

    fn start(&self, service: &str) -> Result<()>;

    fn enable(&self, service: &str) -> Result<()>;

    fn restart(&self, service: &str) -> Result<()>;
}

/// The backends a plan's resources act through
#[derive(Debug, Clone)]
pub struct Host {
    pub packages: Arc<dyn PackageManager>,
    pub services: Arc<dyn ServiceManager>,
}

impl Host {
    pub fn new(packages: Arc<dyn PackageManager>, services: Arc<dyn ServiceManager>) -> Self {
        Self { packages, services }
    }

    /// Real command-backed host for the given providers
    pub fn system(packages: PackageProvider, services: ServiceProvider) -> Self {
        Self::new(
            Arc::new(CommandPackageManager::new(packages)),
            Arc::new(CommandServiceManager::new(services)),
        )
    }
}
