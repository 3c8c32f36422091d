use anyhow::Result;
use declarative::compute_diffs;

use super::RunInputs;
use crate::Context;
use crate::engine::differ::{display_diff, display_plan};
use crate::engine::planner;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let inputs = RunInputs::load(ctx)?;
    let (settings, host) = inputs.resolve()?;
    let plan = planner::build(&settings, &host);

    ui::header(&format!("Plan for {}", inputs.facts));
    display_plan(&plan)?;

    let diffs = compute_diffs(&plan)?;
    display_diff(&diffs);
    Ok(())
}
