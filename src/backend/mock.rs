//! In-memory host for tests
//!
//! Implements both backend traits over shared state and records every
//! mutating call, so tests can assert on ordering without touching the
//! machine.

use anyhow::{Result, bail};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::{Host, PackageManager, ServiceManager};

#[derive(Debug, Default)]
struct MockState {
    installed: HashSet<String>,
    running: HashSet<String>,
    enabled: HashSet<String>,
    failing: HashSet<String>,
    calls: Vec<String>,
}

/// Mock package and service manager
#[derive(Debug, Default)]
pub struct MockHost {
    state: Mutex<MockState>,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Backends that both act on this mock
    pub fn host(self: &Arc<Self>) -> Host {
        Host::new(
            Arc::clone(self) as Arc<dyn PackageManager>,
            Arc::clone(self) as Arc<dyn ServiceManager>,
        )
    }

    pub fn with_installed(self: Arc<Self>, package: &str) -> Arc<Self> {
        self.state.lock().unwrap().installed.insert(package.to_string());
        self
    }

    /// Mark a service as running and enabled
    pub fn with_running(self: Arc<Self>, service: &str) -> Arc<Self> {
        {
            let mut state = self.state.lock().unwrap();
            state.running.insert(service.to_string());
            state.enabled.insert(service.to_string());
        }
        self
    }

    /// Make every mutating operation on `name` fail
    pub fn failing(self: Arc<Self>, name: &str) -> Arc<Self> {
        self.state.lock().unwrap().failing.insert(name.to_string());
        self
    }

    /// Mutating calls in the order they were made
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: String, name: &str) -> Result<std::sync::MutexGuard<'_, MockState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        if state.failing.contains(name) {
            bail!("mock refused: {call}");
        }
        Ok(state)
    }
}

impl PackageManager for MockHost {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        Ok(self.state.lock().unwrap().installed.contains(package))
    }

    fn install(&self, package: &str) -> Result<()> {
        let mut state = self.record(format!("install {package}"), package)?;
        state.installed.insert(package.to_string());
        Ok(())
    }
}

impl ServiceManager for MockHost {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_running(&self, service: &str) -> Result<bool> {
        Ok(self.state.lock().unwrap().running.contains(service))
    }

    fn is_enabled(&self, service: &str) -> Result<bool> {
        Ok(self.state.lock().unwrap().enabled.contains(service))
    }

    fn start(&self, service: &str) -> Result<()> {
        let mut state = self.record(format!("start {service}"), service)?;
        state.running.insert(service.to_string());
        Ok(())
    }

    fn enable(&self, service: &str) -> Result<()> {
        let mut state = self.record(format!("enable {service}"), service)?;
        state.enabled.insert(service.to_string());
        Ok(())
    }

    fn restart(&self, service: &str) -> Result<()> {
        let mut state = self.record(format!("restart {service}"), service)?;
        state.running.insert(service.to_string());
        Ok(())
    }
}
