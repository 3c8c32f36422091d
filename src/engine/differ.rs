//! Plan and diff display

use anyhow::Result;
use colored::Colorize;
use declarative::{DiffSummary, EdgeKind, Plan, ResourceDiff, ResourceKind, ResourceState};

/// Print the apply order and the edges between resources
pub fn display_plan(plan: &Plan) -> Result<()> {
    let order = plan.order()?;

    println!();
    println!("{}", "Apply order".bold());
    for (i, resource) in order.iter().enumerate() {
        println!(
            "  {} {:<40} {}",
            format!("{}.", i + 1).blue().bold(),
            resource.id(),
            resource.description().dimmed()
        );
    }

    if !plan.edges().is_empty() {
        println!();
        println!("{}", "Relations".bold());
        for edge in plan.edges() {
            let arrow = match edge.kind {
                EdgeKind::Before => "→".dimmed(),
                EdgeKind::Notify => "~>".yellow(),
            };
            println!("  {} {} {}  {}", edge.from, arrow, edge.to, edge.kind.to_string().dimmed());
        }
    }

    Ok(())
}

/// Display a list of diffs in a user-friendly format
pub fn display_diff(diffs: &[ResourceDiff]) {
    if diffs.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Pending Changes".bold()
    );
    println!("│");

    for diff in diffs {
        let symbol = if diff.refresh {
            "↻".cyan()
        } else if diff.is_addition() {
            "+".green()
        } else {
            "~".yellow()
        };

        println!(
            "│ {} {:<8} {:<40} {}",
            symbol,
            kind_label(diff.kind),
            diff.resource_id,
            state_desc(diff).dimmed()
        );

        if let Some(detail) = &diff.detail {
            for line in detail.lines() {
                println!("│     {}", color_diff_line(line));
            }
        }
    }

    let summary = DiffSummary::from_diffs(diffs);
    println!("│");
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} changes ({} add, {} modify, {} refresh)",
        summary.total().to_string().bold(),
        summary.additions.to_string().green(),
        summary.modifications.to_string().yellow(),
        summary.refreshes.to_string().cyan()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

fn kind_label(kind: ResourceKind) -> String {
    format!("[{kind}]")
}

/// One-line description of the transition a diff represents
fn state_desc(diff: &ResourceDiff) -> String {
    if diff.refresh {
        return "(in sync, will be refreshed)".to_string();
    }

    match (&diff.current, &diff.desired) {
        (ResourceState::Absent, ResourceState::Present { details }) => format!(
            "(absent){}",
            details
                .as_ref()
                .map(|d| format!(" → {d}"))
                .unwrap_or_default()
        ),
        (ResourceState::Present { details: from }, ResourceState::Present { details: to }) => {
            format!(
                "{} → {}",
                from.as_deref().unwrap_or("current"),
                to.as_deref().unwrap_or("desired")
            )
        }
        _ => String::new(),
    }
}

fn color_diff_line(line: &str) -> String {
    if line.starts_with("+++") || line.starts_with("---") {
        line.bold().to_string()
    } else if line.starts_with('+') {
        line.green().to_string()
    } else if line.starts_with('-') {
        line.red().to_string()
    } else if line.starts_with("@@") {
        line.cyan().to_string()
    } else {
        line.dimmed().to_string()
    }
}
