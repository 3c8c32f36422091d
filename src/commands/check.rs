use anyhow::Result;

use super::RunInputs;
use crate::Context;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let inputs = RunInputs::load(ctx)?;

    if !ctx.quiet {
        ui::header("Platform Check");
        ui::kv("Facts", &inputs.facts.to_string());
        ui::kv(
            "Families",
            &inputs.matrix.families().collect::<Vec<_>>().join(", "),
        );
        println!();
    }

    inputs.gate()?;
    ui::success(&format!("{} is supported", inputs.facts));
    Ok(())
}
