//! Error types for the compatibility gate.

use std::fmt;

/// Why a platform was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// The OS family has no entry in the support matrix.
    UnknownFamily,
    /// The OS name is on the family's deny-list.
    ExcludedName,
    /// The family has an allow-list and the OS name is not on it.
    NameNotListed,
    /// The family restricts major versions and this one is not allowed.
    VersionNotListed { version: String },
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFamily => write!(f, "unknown os family"),
            Self::ExcludedName => write!(f, "excluded from its os family"),
            Self::NameNotListed => write!(f, "not in the os family allow-list"),
            Self::VersionNotListed { version } => write!(f, "version {version} is not allowed"),
        }
    }
}

/// The host platform is outside the support matrix.
///
/// This is a pre-condition failure: it is raised before any resource is
/// touched. The message always starts with `"<name> not supported"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name} not supported ({family}: {reason})")]
pub struct UnsupportedPlatformError {
    /// OS family from the facts.
    pub family: String,
    /// OS name from the facts.
    pub name: String,
    /// OS release from the facts, if any.
    pub version: Option<String>,
    /// Which rule rejected the platform.
    pub reason: UnsupportedReason,
}
