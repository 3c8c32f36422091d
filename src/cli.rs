use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::FactsConfig;

#[derive(Parser)]
#[command(name = "converge")]
#[command(version)]
#[command(about = "Converge a host to a declared package, config file and service", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the run configuration (default: converge.toml lookup)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub facts: FactsArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Host fact overrides
#[derive(Args, Debug, Default)]
pub struct FactsArgs {
    /// OS family, e.g. Debian, RedHat, Solaris
    #[arg(long, global = true, value_name = "FAMILY")]
    pub os_family: Option<String>,

    /// OS name within the family, e.g. Ubuntu
    #[arg(long, global = true, value_name = "NAME")]
    pub os_name: Option<String>,

    /// OS release, e.g. 22.04
    #[arg(long, global = true, value_name = "VERSION")]
    pub os_version: Option<String>,
}

impl From<FactsArgs> for FactsConfig {
    fn from(args: FactsArgs) -> Self {
        Self {
            os_family: args.os_family,
            os_name: args.os_name,
            os_version: args.os_version,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Check whether this platform is supported
    Check,

    /// Show the apply order, relations and pending changes
    Plan,

    /// Converge the host
    Apply(ApplyArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct ApplyArgs {
    /// Dry run - show what would be done
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Print the run result as JSON (implies --yes)
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply_with_facts() {
        let cli = Cli::try_parse_from([
            "converge",
            "--os-family",
            "Debian",
            "--os-name",
            "Ubuntu",
            "apply",
            "--dry-run",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.facts.os_family.as_deref(), Some("Debian"));
        assert_eq!(cli.facts.os_name.as_deref(), Some("Ubuntu"));
        match cli.command {
            Command::Apply(args) => {
                assert!(args.dry_run);
                assert!(args.json);
                assert!(!args.yes);
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["converge", "check", "-vv", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Command::Check));
    }
}
