use anyhow::{Context as _, Result};
use declarative::{ApplyOptions, NoProgress};

use super::RunInputs;
use crate::Context;
use crate::cli::ApplyArgs;
use crate::engine::{self, ExecuteOptions, execute};
use crate::ui;

pub fn run(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let inputs = RunInputs::load(ctx)?;
    let (settings, host) = inputs.resolve()?;

    if args.json {
        let opts = ApplyOptions {
            dry_run: args.dry_run,
        };
        let result = engine::converge(
            &inputs.facts,
            &inputs.matrix,
            &settings,
            &host,
            &opts,
            &mut NoProgress,
        )?;
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize run result")?;
        println!("{json}");
        result.into_result()?;
        return Ok(());
    }

    if !ctx.quiet {
        ui::header(&format!("Converging {}", inputs.facts));
    }

    let opts = ExecuteOptions {
        dry_run: args.dry_run,
        yes: args.yes,
        quiet: ctx.quiet,
    };
    if let Some(result) = execute(&inputs.facts, &inputs.matrix, &settings, &host, &opts)? {
        result.into_result()?;
    }
    Ok(())
}
