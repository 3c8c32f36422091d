//! Support matrix: OS family -> allowed/excluded OS names and versions.
//!
//! The matrix is plain data. New platforms are supported by adding an
//! entry, never by adding code:
//!
//! ```toml
//! [Debian]
//! names = ["Debian", "Ubuntu"]
//!
//! [RedHat]
//! names = ["RedHat", "Rocky"]
//! versions = ["8", "9"]
//!
//! [Solaris]
//! exclude = ["Nexenta"]
//! ```

use crate::error::{UnsupportedPlatformError, UnsupportedReason};
use crate::facts::Facts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Support rules for a single OS family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FamilySupport {
    /// Allow-list of OS names. `None` accepts any name not excluded.
    pub names: Option<Vec<String>>,
    /// Deny-list of OS names, checked before the allow-list.
    pub exclude: Vec<String>,
    /// Allowed releases, matched against the full or the major version.
    /// Hosts that report no version are not version-checked.
    pub versions: Option<Vec<String>>,
}

impl FamilySupport {
    /// Accept every OS name in the family.
    pub fn any() -> Self {
        Self::default()
    }

    /// Accept only the given OS names.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Exclude an OS name from the family.
    pub fn excluding(mut self, name: impl Into<String>) -> Self {
        self.exclude.push(name.into());
        self
    }

    /// Restrict the family to the given releases.
    pub fn versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.versions = Some(versions.into_iter().map(Into::into).collect());
        self
    }

    fn reject(&self, facts: &Facts) -> Option<UnsupportedReason> {
        if self.exclude.iter().any(|n| n == &facts.os_name) {
            return Some(UnsupportedReason::ExcludedName);
        }

        if let Some(names) = &self.names
            && !names.iter().any(|n| n == &facts.os_name)
        {
            return Some(UnsupportedReason::NameNotListed);
        }

        if let (Some(versions), Some(version)) = (&self.versions, facts.os_version.as_deref()) {
            let major = facts.major_version();
            let allowed = versions
                .iter()
                .any(|v| v == version || Some(v.as_str()) == major);
            if !allowed {
                return Some(UnsupportedReason::VersionNotListed {
                    version: version.to_string(),
                });
            }
        }

        None
    }
}

/// Lookup table of supported platforms keyed by OS family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportMatrix {
    families: BTreeMap<String, FamilySupport>,
}

impl SupportMatrix {
    /// Create an empty matrix (rejects everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rules for a family.
    pub fn with_family(mut self, family: impl Into<String>, support: FamilySupport) -> Self {
        self.families.insert(family.into(), support);
        self
    }

    /// Rules for a family, if present.
    pub fn family(&self, family: &str) -> Option<&FamilySupport> {
        self.families.get(family)
    }

    /// Families listed in the matrix, sorted.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    /// Whether the matrix has no entries.
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Validate facts against the matrix.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedPlatformError`] when the family is absent or one
    /// of its rules rejects the OS name or version.
    pub fn check(&self, facts: &Facts) -> Result<(), UnsupportedPlatformError> {
        let reason = match self.families.get(&facts.os_family) {
            None => Some(UnsupportedReason::UnknownFamily),
            Some(support) => support.reject(facts),
        };

        match reason {
            None => {
                log::debug!("Platform {facts} is supported");
                Ok(())
            }
            Some(reason) => {
                log::debug!("Platform {facts} rejected: {reason}");
                Err(UnsupportedPlatformError {
                    family: facts.os_family.clone(),
                    name: facts.os_name.clone(),
                    version: facts.os_version.clone(),
                    reason,
                })
            }
        }
    }
}
