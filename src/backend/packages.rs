//! Package managers driven through their command-line tools

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{PackageManager, UnknownProvider};
use crate::runner;

/// Supported package providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageProvider {
    Apt,
    Dnf,
    Yum,
    Zypper,
    Pacman,
    Pkg,
}

/// How a provider is queried and driven; the package name is appended last
struct ProviderSpec {
    /// Binary that must exist for the provider to be usable
    binary: &'static str,
    query: &'static [&'static str],
    /// When set, stdout of the query must contain this marker
    installed_marker: Option<&'static str>,
    install: &'static [&'static str],
}

impl PackageProvider {
    pub const ALL: [Self; 6] = [
        Self::Apt,
        Self::Dnf,
        Self::Yum,
        Self::Zypper,
        Self::Pacman,
        Self::Pkg,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Zypper => "zypper",
            Self::Pacman => "pacman",
            Self::Pkg => "pkg",
        }
    }

    fn spec(self) -> ProviderSpec {
        match self {
            Self::Apt => ProviderSpec {
                binary: "apt-get",
                query: &["dpkg-query", "-W", "-f=${Status}"],
                installed_marker: Some("install ok installed"),
                install: &["apt-get", "install", "-y", "-q"],
            },
            Self::Dnf => ProviderSpec {
                binary: "dnf",
                query: &["rpm", "-q"],
                installed_marker: None,
                install: &["dnf", "install", "-y"],
            },
            Self::Yum => ProviderSpec {
                binary: "yum",
                query: &["rpm", "-q"],
                installed_marker: None,
                install: &["yum", "install", "-y"],
            },
            Self::Zypper => ProviderSpec {
                binary: "zypper",
                query: &["rpm", "-q"],
                installed_marker: None,
                install: &["zypper", "--non-interactive", "install"],
            },
            Self::Pacman => ProviderSpec {
                binary: "pacman",
                query: &["pacman", "-Q"],
                installed_marker: None,
                install: &["pacman", "-S", "--noconfirm", "--needed"],
            },
            Self::Pkg => ProviderSpec {
                binary: "pkg",
                query: &["pkg", "info", "-e"],
                installed_marker: None,
                install: &["pkg", "install", "-y"],
            },
        }
    }
}

impl fmt::Display for PackageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownProvider {
                kind: "package",
                name: s.to_string(),
            })
    }
}

/// Split a command line spec into (program, args) with extra trailing args
fn command_line<'a>(spec: &[&'a str], extra: &'a str) -> (&'a str, Vec<&'a str>) {
    let mut args: Vec<&str> = spec.iter().skip(1).copied().collect();
    args.push(extra);
    (spec[0], args)
}

/// A [`PackageManager`] backed by a provider's CLI
#[derive(Debug, Clone)]
pub struct CommandPackageManager {
    provider: PackageProvider,
}

impl CommandPackageManager {
    pub fn new(provider: PackageProvider) -> Self {
        Self { provider }
    }
}

impl PackageManager for CommandPackageManager {
    fn name(&self) -> &'static str {
        self.provider.as_str()
    }

    fn is_available(&self) -> bool {
        runner::command_exists(self.provider.spec().binary)
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        let spec = self.provider.spec();
        let (program, args) = command_line(spec.query, package);

        let (success, stdout) = runner::run_output(program, &args)?;
        let installed = match spec.installed_marker {
            Some(marker) => success && stdout.contains(marker),
            None => success,
        };
        log::debug!("{} reports {} installed: {}", self.name(), package, installed);
        Ok(installed)
    }

    fn install(&self, package: &str) -> Result<()> {
        let spec = self.provider.spec();
        let (program, args) = command_line(spec.install, package);
        runner::run_checked(program, &args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("apt".parse::<PackageProvider>(), Ok(PackageProvider::Apt));
        assert_eq!("DNF".parse::<PackageProvider>(), Ok(PackageProvider::Dnf));
        let err = "brew".parse::<PackageProvider>().unwrap_err();
        assert_eq!(err.to_string(), "unknown package provider 'brew'");
    }

    #[test]
    fn test_command_line_appends_package() {
        let spec = PackageProvider::Apt.spec();
        let (program, args) = command_line(spec.install, "owncloud_app");
        assert_eq!(program, "apt-get");
        assert_eq!(args, vec!["install", "-y", "-q", "owncloud_app"]);

        let spec = PackageProvider::Pkg.spec();
        let (program, args) = command_line(spec.query, "nginx");
        assert_eq!(program, "pkg");
        assert_eq!(args, vec!["info", "-e", "nginx"]);
    }

    #[test]
    fn test_every_provider_has_commands() {
        for provider in PackageProvider::ALL {
            let spec = provider.spec();
            assert!(!spec.query.is_empty(), "{provider} query");
            assert!(!spec.install.is_empty(), "{provider} install");
        }
    }

    #[test]
    fn test_provider_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            provider: PackageProvider,
        }
        let w: Wrapper = toml::from_str(r#"provider = "zypper""#).unwrap();
        assert_eq!(w.provider, PackageProvider::Zypper);
    }
}
