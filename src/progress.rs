//! Progress indicators for the converge CLI

use colored::Colorize;
use declarative::{Outcome, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner with a message
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Symbol and label for a finished resource
pub fn outcome_label(outcome: &Outcome) -> (String, String) {
    match outcome {
        Outcome::Unchanged => ("○".dimmed().to_string(), "unchanged".to_string()),
        Outcome::Changed {
            result,
            refreshed: true,
        } => ("↻".cyan().to_string(), format!("{result} (notified)")),
        Outcome::Changed { result, .. } => ("✓".green().to_string(), result.to_string()),
        Outcome::WouldChange { refresh: true } => {
            ("~".yellow().to_string(), "would refresh".to_string())
        }
        Outcome::WouldChange { .. } => ("~".yellow().to_string(), "would change".to_string()),
        Outcome::Failed { error } => ("✗".red().to_string(), error.clone()),
    }
}

/// Reconcile progress shown as a spinner with one line per finished resource
pub struct SpinnerProgress {
    pb: ProgressBar,
}

impl SpinnerProgress {
    pub fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            spinner("Converging")
        };
        Self { pb }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}

impl ProgressCallback for SpinnerProgress {
    fn on_resource_start(&mut self, _id: &str, description: &str) {
        self.pb.set_message(description.to_string());
    }

    fn on_resource_complete(&mut self, id: &str, outcome: &Outcome) {
        if self.pb.is_hidden() {
            return;
        }
        let (symbol, label) = outcome_label(outcome);
        self.pb
            .suspend(|| println!("  {} {:<40} {}", symbol, id, label.dimmed()));
    }

    fn on_notify(&mut self, from: &str, to: &str) {
        log::info!("{from} changed, {to} will be refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::ApplyResult;

    #[test]
    fn test_outcome_labels() {
        let (_, label) = outcome_label(&Outcome::Unchanged);
        assert_eq!(label, "unchanged");

        let (_, label) = outcome_label(&Outcome::Changed {
            result: ApplyResult::Restarted,
            refreshed: true,
        });
        assert_eq!(label, "restarted (notified)");

        let (_, label) = outcome_label(&Outcome::Changed {
            result: ApplyResult::Created,
            refreshed: false,
        });
        assert_eq!(label, "created");

        let (_, label) = outcome_label(&Outcome::WouldChange { refresh: true });
        assert_eq!(label, "would refresh");
    }

    #[test]
    fn test_hidden_progress_accepts_events() {
        let mut progress = SpinnerProgress::new(true);
        progress.on_resource_start("package:nginx", "Install nginx via apt");
        progress.on_resource_complete("package:nginx", &Outcome::Unchanged);
        progress.finish();
    }
}
