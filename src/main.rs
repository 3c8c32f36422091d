mod backend;
mod cli;
mod commands;
mod config;
mod engine;
mod params;
mod paths;
mod progress;
mod resource;
mod runner;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use compat::UnsupportedPlatformError;
use declarative::ErrorCategory;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use config::FactsConfig;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    /// Explicit config file from `--config`
    pub config: Option<PathBuf>,
    /// Fact overrides from the command line
    pub facts: FactsConfig,
}

/// Exit status for an unsupported platform
const EXIT_UNSUPPORTED: u8 = 2;
/// Exit status for a malformed plan (cycle, unknown or duplicate resource)
const EXIT_PLAN: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        quiet: cli.quiet,
        config: cli.config,
        facts: cli.facts.into(),
    };

    match run(&ctx, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::error(&format!("{err:#}"));
            ExitCode::from(exit_status(&err))
        }
    }
}

fn run(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Check => commands::check::run(ctx),
        Command::Plan => commands::plan::run(ctx),
        Command::Apply(args) => commands::apply::run(ctx, args),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "converge", &mut io::stdout());
            Ok(())
        }
    }
}

/// Map an error to the process exit status
fn exit_status(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<UnsupportedPlatformError>().is_some() {
        return EXIT_UNSUPPORTED;
    }
    match err.downcast_ref::<declarative::Error>() {
        Some(e) if e.category() == ErrorCategory::Plan => EXIT_PLAN,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compat::UnsupportedReason;
    use declarative::{ResourceApplyError, ResourceKind};

    #[test]
    fn test_exit_status_unsupported() {
        let err = anyhow::Error::new(UnsupportedPlatformError {
            family: "Solaris".into(),
            name: "Nexenta".into(),
            version: None,
            reason: UnsupportedReason::ExcludedName,
        });
        assert_eq!(exit_status(&err), EXIT_UNSUPPORTED);
    }

    #[test]
    fn test_exit_status_plan_error() {
        let err = anyhow::Error::new(declarative::Error::PlanCycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        });
        assert_eq!(exit_status(&err), EXIT_PLAN);
    }

    #[test]
    fn test_exit_status_resource_failure() {
        let err = anyhow::Error::new(declarative::Error::from(ResourceApplyError {
            kind: ResourceKind::Package,
            id: "package:owncloud_app".into(),
            cause: "apt-get exited with 100".into(),
        }));
        assert_eq!(exit_status(&err), 1);
    }

    #[test]
    fn test_exit_status_with_context() {
        let err = anyhow::Error::new(UnsupportedPlatformError {
            family: "Windows".into(),
            name: "Windows".into(),
            version: None,
            reason: UnsupportedReason::UnknownFamily,
        })
        .context("gate");
        assert_eq!(exit_status(&err), EXIT_UNSUPPORTED);
    }

    #[test]
    fn test_exit_status_other() {
        assert_eq!(exit_status(&anyhow::anyhow!("config broken")), 1);
    }
}
