//! Path resolution for converge
//!
//! # Environment Variables
//!
//! - `CONVERGE_CONFIG` - Path to the run configuration file
//!
//! # Config File Resolution Priority
//!
//! 1. `--config <path>` flag
//! 2. `CONVERGE_CONFIG` environment variable
//! 3. `/etc/converge/converge.toml` (if it exists)
//! 4. `XDG_CONFIG_HOME/converge/converge.toml` or `~/.config/converge/converge.toml`
//!
//! Files from 1 and 2 must exist. Files from 3 and 4 are optional; built-in
//! defaults apply when they are missing.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for the config file override
pub const ENV_CONFIG: &str = "CONVERGE_CONFIG";

/// Config file name inside config directories
pub const CONFIG_FILE_NAME: &str = "converge.toml";

/// System-wide config directory
pub const SYSTEM_CONFIG_DIR: &str = "/etc/converge";

/// Where the run configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    /// Whether a missing file is an error
    pub required: bool,
}

/// Resolve the run configuration file
pub fn config_file(explicit: Option<&Path>) -> Result<ConfigLocation> {
    // 1. Explicit flag
    if let Some(path) = explicit {
        log::debug!("Using config file from --config: {}", path.display());
        return Ok(ConfigLocation {
            path: expand(&path.to_string_lossy()),
            required: true,
        });
    }

    // 2. Environment variable override
    if let Ok(file) = std::env::var(ENV_CONFIG) {
        let path = expand(&file);
        log::debug!("Using config file from {}: {}", ENV_CONFIG, path.display());
        return Ok(ConfigLocation {
            path,
            required: true,
        });
    }

    // 3. System-wide config
    let system = Path::new(SYSTEM_CONFIG_DIR).join(CONFIG_FILE_NAME);
    if system.exists() {
        log::debug!("Using system config file: {}", system.display());
        return Ok(ConfigLocation {
            path: system,
            required: false,
        });
    }

    // 4. User config
    let path = user_config_dir()?.join(CONFIG_FILE_NAME);
    log::debug!("Using user config file: {}", path.display());
    Ok(ConfigLocation {
        path,
        required: false,
    })
}

fn user_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("converge"));
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("converge"))
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables leave the string unchanged.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}
