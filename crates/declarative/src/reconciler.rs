//! Reconciler - walks a plan in dependency order and converges each resource
//!
//! A run is a strictly sequential walk: later resources may depend on the
//! side effects of earlier ones. Callers that can trigger concurrent runs
//! on the same host must hold their own run-level lock.

use crate::context::{ApplyContext, NoProgress, ProgressCallback};
use crate::error::{ResourceApplyError, Result};
use crate::planner::Plan;
use crate::resource::Resource;
use crate::types::{ApplyOptions, Outcome, ResourceReport, RunResult};
use std::collections::HashMap;

/// Apply a plan with default options and no progress reporting
///
/// # Errors
///
/// Returns a plan-shape error (cycle, unknown or duplicate id) before any
/// resource is touched. Resource failures do not error here; they are
/// recorded in [`RunResult::failure`].
pub fn apply(plan: &Plan) -> Result<RunResult> {
    apply_with(plan, &ApplyOptions::default(), &mut NoProgress)
}

/// Apply a plan with the given options and progress callback
///
/// For each resource in topological order:
/// 1. Check current against desired state.
/// 2. Converged and not notified: `Unchanged`.
/// 3. Not converged: `apply`.
/// 4. Converged but notified: `refresh`.
/// 5. On failure, record it and halt; remaining resources are not attempted.
/// 6. On change, mark every notification target for refresh.
///
/// # Errors
///
/// Same as [`apply`].
pub fn apply_with<P: ProgressCallback>(
    plan: &Plan,
    opts: &ApplyOptions,
    progress: &mut P,
) -> Result<RunResult> {
    let order = plan.ordered_indices()?;
    let resources = plan.resources();

    let mut result = RunResult {
        dry_run: opts.dry_run,
        ..RunResult::default()
    };
    // target id -> ids of changed resources that notified it
    let mut pending: HashMap<String, Vec<String>> = HashMap::new();

    for (pos, &index) in order.iter().enumerate() {
        let resource = resources[index].as_ref();
        let id = resource.id();
        let description = resource.description();
        progress.on_resource_start(&id, &description);

        let notified_by = pending.remove(&id).unwrap_or_default();
        let outcome = match converge(resource, &notified_by, opts) {
            Ok(outcome) => outcome,
            Err(err) => {
                let cause = format!("{err:#}");
                log::warn!("{id} failed: {cause}");

                let outcome = Outcome::Failed {
                    error: cause.clone(),
                };
                progress.on_resource_complete(&id, &outcome);
                result.reports.push(ResourceReport {
                    id: id.clone(),
                    kind: resource.kind(),
                    description,
                    outcome,
                    notified_by,
                });
                result.failure = Some(ResourceApplyError {
                    kind: resource.kind(),
                    id,
                    cause,
                });
                result.not_attempted = order[pos + 1..]
                    .iter()
                    .map(|&i| resources[i].id())
                    .collect();
                if !result.not_attempted.is_empty() {
                    log::debug!("Halting run, not attempted: {}", result.not_attempted.join(", "));
                }
                return Ok(result);
            }
        };

        progress.on_resource_complete(&id, &outcome);

        if outcome.triggers_notify() {
            for target in plan.notify_targets(&id) {
                log::debug!("{id} changed, scheduling refresh of {target}");
                progress.on_notify(&id, target);
                pending.entry(target.to_string()).or_default().push(id.clone());
            }
        }

        result.reports.push(ResourceReport {
            id,
            kind: resource.kind(),
            description,
            outcome,
            notified_by,
        });
    }

    Ok(result)
}

/// Converge a single resource
fn converge(
    resource: &dyn Resource,
    notified_by: &[String],
    opts: &ApplyOptions,
) -> anyhow::Result<Outcome> {
    let needs_apply = resource.needs_apply()?;
    let notified = !notified_by.is_empty();

    if !needs_apply && !notified {
        log::debug!("{} already in desired state", resource.id());
        return Ok(Outcome::Unchanged);
    }

    if opts.dry_run {
        return Ok(Outcome::WouldChange {
            refresh: !needs_apply,
        });
    }

    let mut ctx = ApplyContext::notified(notified_by.to_vec());
    let (result, refreshed) = if needs_apply {
        (resource.apply(&mut ctx)?, false)
    } else {
        log::debug!(
            "Refreshing {} (notified by {})",
            resource.id(),
            ctx.notified_by.join(", ")
        );
        (resource.refresh(&mut ctx)?, true)
    };

    if result.is_change() {
        log::info!("{}: {}", resource.id(), result);
        Ok(Outcome::Changed { result, refreshed })
    } else {
        Ok(Outcome::Unchanged)
    }
}
