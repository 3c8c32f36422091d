//! Host facts consumed by the compatibility gate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system identity of the target host.
///
/// Facts are gathered by an external collaborator and are read-only here.
/// Field aliases accept the classic fact names (`osfamily`,
/// `operatingsystem`, `operatingsystemrelease`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facts {
    /// OS family (e.g. "Debian", "RedHat", "Solaris").
    #[serde(alias = "osfamily")]
    pub os_family: String,
    /// OS name within the family (e.g. "Ubuntu", "Nexenta").
    #[serde(alias = "operatingsystem")]
    pub os_name: String,
    /// OS release, if known (e.g. "22.04").
    #[serde(default, alias = "operatingsystemrelease")]
    pub os_version: Option<String>,
}

impl Facts {
    /// Create facts without a version.
    pub fn new(os_family: impl Into<String>, os_name: impl Into<String>) -> Self {
        Self {
            os_family: os_family.into(),
            os_name: os_name.into(),
            os_version: None,
        }
    }

    /// Attach an OS release.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.os_version = Some(version.into());
        self
    }

    /// Major component of the OS release ("22.04" -> "22").
    pub fn major_version(&self) -> Option<&str> {
        self.os_version
            .as_deref()
            .and_then(|v| v.split('.').next())
            .filter(|major| !major.is_empty())
    }
}

impl fmt::Display for Facts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.os_version {
            Some(version) => write!(f, "{}/{} {}", self.os_family, self.os_name, version),
            None => write!(f, "{}/{}", self.os_family, self.os_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_version() {
        let facts = Facts::new("Debian", "Ubuntu").with_version("22.04");
        assert_eq!(facts.major_version(), Some("22"));

        let facts = Facts::new("RedHat", "Rocky").with_version("9");
        assert_eq!(facts.major_version(), Some("9"));

        assert_eq!(Facts::new("Debian", "Ubuntu").major_version(), None);
    }

    #[test]
    fn test_deserialize_with_fact_aliases() {
        let facts: Facts = toml::from_str(
            r#"
            osfamily = "Solaris"
            operatingsystem = "Nexenta"
            "#,
        )
        .unwrap();

        assert_eq!(facts, Facts::new("Solaris", "Nexenta"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Facts::new("Debian", "Ubuntu").to_string(), "Debian/Ubuntu");
        assert_eq!(
            Facts::new("Debian", "Ubuntu").with_version("24.04").to_string(),
            "Debian/Ubuntu 24.04"
        );
    }
}
