//! Execution engine for converge
//!
//! The engine orchestrates:
//! 1. Gating - refuse unsupported platforms before anything else
//! 2. Planning - build the resource graph from resolved settings
//! 3. Diffing - preview current vs desired state
//! 4. Executing - reconcile with progress and a final summary

pub mod differ;
pub mod executor;
pub mod planner;

use anyhow::Result;
use compat::{Facts, SupportMatrix};
use declarative::{ApplyOptions, ProgressCallback, RunResult};

use crate::backend::Host;
use crate::params::Settings;

pub use executor::{ExecuteOptions, execute};

/// Gate, build and reconcile in one call.
///
/// The gate runs first; on an unsupported platform the returned error is a
/// [`compat::UnsupportedPlatformError`] and the host is never touched.
pub fn converge<P: ProgressCallback>(
    facts: &Facts,
    matrix: &SupportMatrix,
    settings: &Settings,
    host: &Host,
    opts: &ApplyOptions,
    progress: &mut P,
) -> Result<RunResult> {
    compat::check_supported(facts, matrix)?;

    let plan = planner::build(settings, host);
    let result = declarative::apply_with(&plan, opts, progress)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockHost;
    use crate::backend::{PackageProvider, ServiceProvider};
    use crate::config::default_support_matrix;
    use crate::params::SettingsOverrides;
    use compat::UnsupportedPlatformError;
    use declarative::{ApplyResult, NoProgress, Outcome, ResourceKind};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const PACKAGE: &str = "package:owncloud_app";
    const SERVICE: &str = "service:owncloud_app";

    fn ubuntu() -> Facts {
        Facts::new("Debian", "Ubuntu").with_version("22.04")
    }

    fn settings_in(dir: &Path, content: &str) -> Settings {
        let overrides = SettingsOverrides {
            config_path: Some(dir.join("owncloud_app/config.php").display().to_string()),
            config_content: Some(content.to_string()),
            ..Default::default()
        };
        Settings::resolve(&ubuntu(), &overrides).unwrap()
    }

    fn config_id(settings: &Settings) -> String {
        format!("config:{}", settings.config_path.display())
    }

    fn run(facts: &Facts, settings: &Settings, host: &Host) -> Result<RunResult> {
        converge(
            facts,
            &default_support_matrix(),
            settings,
            host,
            &ApplyOptions::default(),
            &mut NoProgress,
        )
    }

    #[test]
    fn test_fresh_ubuntu_host_converges() {
        let tmp = TempDir::new().unwrap();
        let settings = settings_in(tmp.path(), "<settings>");
        let mock = MockHost::new();

        let result = run(&ubuntu(), &settings, &mock.host()).unwrap();

        assert!(result.is_success());
        assert_eq!(
            result.outcome(PACKAGE),
            Some(&Outcome::Changed {
                result: ApplyResult::Created,
                refreshed: false
            })
        );
        assert_eq!(
            result.outcome(&config_id(&settings)),
            Some(&Outcome::Changed {
                result: ApplyResult::Created,
                refreshed: false
            })
        );
        let service = result.report(SERVICE).unwrap();
        assert_eq!(
            service.outcome,
            Outcome::Changed {
                result: ApplyResult::Modified,
                refreshed: false
            }
        );
        assert_eq!(service.notified_by, vec![config_id(&settings)]);

        assert_eq!(fs::read_to_string(&settings.config_path).unwrap(), "<settings>");
        assert_eq!(
            mock.calls(),
            vec!["install owncloud_app", "start owncloud_app", "enable owncloud_app"]
        );
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let settings = settings_in(tmp.path(), "<settings>");
        let mock = MockHost::new();
        let host = mock.host();

        run(&ubuntu(), &settings, &host).unwrap();
        mock.clear_calls();

        let result = run(&ubuntu(), &settings, &host).unwrap();
        assert!(result.is_success());
        assert!(!result.has_changes());
        assert!(
            result
                .reports
                .iter()
                .all(|r| r.outcome == Outcome::Unchanged)
        );
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_config_change_restarts_running_service() {
        let tmp = TempDir::new().unwrap();
        let settings = settings_in(tmp.path(), "<new settings>");
        fs::create_dir_all(settings.config_path.parent().unwrap()).unwrap();
        fs::write(&settings.config_path, "<old settings>").unwrap();
        let mock = MockHost::new()
            .with_installed("owncloud_app")
            .with_running("owncloud_app");

        let result = run(&ubuntu(), &settings, &mock.host()).unwrap();

        assert_eq!(result.outcome(PACKAGE), Some(&Outcome::Unchanged));
        assert_eq!(
            result.outcome(&config_id(&settings)),
            Some(&Outcome::Changed {
                result: ApplyResult::Modified,
                refreshed: false
            })
        );
        assert_eq!(
            result.outcome(SERVICE),
            Some(&Outcome::Changed {
                result: ApplyResult::Restarted,
                refreshed: true
            })
        );
        assert_eq!(mock.calls(), vec!["restart owncloud_app"]);
    }

    #[test]
    fn test_unchanged_config_does_not_restart() {
        let tmp = TempDir::new().unwrap();
        let settings = settings_in(tmp.path(), "<settings>");
        fs::create_dir_all(settings.config_path.parent().unwrap()).unwrap();
        fs::write(&settings.config_path, "<settings>").unwrap();
        let mock = MockHost::new().with_running("owncloud_app");

        let result = run(&ubuntu(), &settings, &mock.host()).unwrap();

        assert_eq!(result.outcome(SERVICE), Some(&Outcome::Unchanged));
        assert_eq!(mock.calls(), vec!["install owncloud_app"]);
    }

    #[test]
    fn test_nexenta_refused_before_any_change() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings {
            package_provider: PackageProvider::Pkg,
            service_provider: ServiceProvider::Systemd,
            ..settings_in(tmp.path(), "<settings>")
        };
        let mock = MockHost::new();

        let err = run(&Facts::new("Solaris", "Nexenta"), &settings, &mock.host()).unwrap_err();

        let unsupported = err.downcast_ref::<UnsupportedPlatformError>().unwrap();
        assert_eq!(unsupported.name, "Nexenta");
        assert!(err.to_string().starts_with("Nexenta not supported"));
        assert!(mock.calls().is_empty());
        assert!(!settings.config_path.exists());
    }

    #[test]
    fn test_package_failure_halts_run() {
        let tmp = TempDir::new().unwrap();
        let settings = settings_in(tmp.path(), "<settings>");
        let mock = MockHost::new().failing("owncloud_app");

        let result = run(&ubuntu(), &settings, &mock.host()).unwrap();

        assert!(!result.is_success());
        let failure = result.failure.as_ref().unwrap();
        assert_eq!(failure.kind, ResourceKind::Package);
        assert_eq!(failure.id, PACKAGE);
        assert!(failure.to_string().starts_with("package 'package:owncloud_app' failed"));

        assert_eq!(result.not_attempted, vec![config_id(&settings), SERVICE.to_string()]);
        assert_eq!(result.outcome(SERVICE), None);
        assert!(!settings.config_path.exists());
        assert_eq!(mock.calls(), vec!["install owncloud_app"]);
    }

    #[test]
    fn test_service_failure_keeps_earlier_changes() {
        let tmp = TempDir::new().unwrap();
        let mut settings = settings_in(tmp.path(), "<settings>");
        settings.service_name = "owncloud-web".into();
        let mock = MockHost::new().failing("owncloud-web");

        let result = run(&ubuntu(), &settings, &mock.host()).unwrap();

        let failure = result.failure.as_ref().unwrap();
        assert_eq!(failure.kind, ResourceKind::Service);
        assert!(result.not_attempted.is_empty());
        assert!(settings.config_path.exists());
        assert!(matches!(
            result.outcome(PACKAGE),
            Some(Outcome::Changed { .. })
        ));
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let tmp = TempDir::new().unwrap();
        let settings = settings_in(tmp.path(), "<settings>");
        let mock = MockHost::new();
        let opts = ApplyOptions { dry_run: true };

        let result = converge(
            &ubuntu(),
            &default_support_matrix(),
            &settings,
            &mock.host(),
            &opts,
            &mut NoProgress,
        )
        .unwrap();

        assert!(result.dry_run);
        assert_eq!(result.summary().pending, 3);
        assert!(mock.calls().is_empty());
        assert!(!settings.config_path.exists());
    }
}
