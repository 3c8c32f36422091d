//! Execution engine - reconcile a plan with UI integration

use anyhow::Result;
use colored::Colorize;
use compat::{Facts, SupportMatrix};
use declarative::{ApplyOptions, RunResult, RunSummary, compute_diffs};

use crate::backend::Host;
use crate::params::Settings;
use crate::progress::SpinnerProgress;

use super::differ::display_diff;
use super::planner;

/// Options for execution (includes `yes` for confirmation skip)
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
    /// Skip confirmation prompts
    pub yes: bool,
    /// Hide progress output
    pub quiet: bool,
}

/// Preview, confirm and converge.
///
/// The preview is only shown on a supported platform. Returns `None` when
/// the user declines to continue.
pub fn execute(
    facts: &Facts,
    matrix: &SupportMatrix,
    settings: &Settings,
    host: &Host,
    opts: &ExecuteOptions,
) -> Result<Option<RunResult>> {
    compat::check_supported(facts, matrix)?;

    // 1. Show what will change
    let plan = planner::build(settings, host);
    let diffs = compute_diffs(&plan)?;
    display_diff(&diffs);

    // 2. Confirm (unless --yes or a dry run)
    if !diffs.is_empty() && !opts.yes && !opts.dry_run && !confirm_proceed()? {
        println!();
        println!("  {} Aborted", "✗".red());
        return Ok(None);
    }

    // 3. Reconcile; an in-sync plan still runs so state is re-checked
    println!();
    let mut progress = SpinnerProgress::new(opts.quiet);
    let result = super::converge(
        facts,
        matrix,
        settings,
        host,
        &ApplyOptions {
            dry_run: opts.dry_run,
        },
        &mut progress,
    );
    progress.finish();
    let result = result?;

    // 4. Summary
    print_summary(&result);

    Ok(Some(result))
}

/// Confirm with user
fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?;

    Ok(confirmed)
}

/// Print final summary
pub fn print_summary(result: &RunResult) {
    let summary = result.summary();

    println!();
    if result.dry_run {
        println!("  {} Dry run - no changes made", "ℹ".blue());
    } else if let Some(failure) = &result.failure {
        println!("  {} Convergence halted: {}", "✗".red().bold(), failure);
    } else if summary.total_changes() == 0 {
        println!("  {} Already converged", "✓".green().bold());
    } else {
        println!("  {} Converged successfully!", "✓".green().bold());
    }

    for line in summary_lines(&summary) {
        println!("    • {line}");
    }
}

fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.changed > 0 {
        lines.push(format!("{} resources changed", summary.changed));
    }
    if summary.refreshed > 0 {
        lines.push(format!("{} resources refreshed", summary.refreshed));
    }
    if summary.pending > 0 {
        lines.push(format!("{} resources would change", summary.pending));
    }
    if summary.unchanged > 0 {
        lines.push(format!("{} resources unchanged", summary.unchanged));
    }
    if summary.failed > 0 {
        lines.push(format!("{} {} failed", summary.failed, "resources".red()));
    }
    if summary.not_attempted > 0 {
        lines.push(format!("{} resources not attempted", summary.not_attempted));
    }
    lines
}
