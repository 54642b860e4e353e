//! `bbs flatten` -- copy a step's effective values into a new root.

use anyhow::Result;

use bbs_ui::styles::{render_pass, render_step};

use crate::cli::FlattenArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `bbs flatten` command.
pub fn run(ctx: &RuntimeContext, args: &FlattenArgs) -> Result<()> {
    let count = ctx.edit_strategy(|strategy| {
        strategy.tree.promote(&args.step, &args.into)?;
        Ok(strategy.tree.step(&args.into)?.data().len())
    })?;

    if ctx.json {
        output_json(&serde_json::json!({
            "source": args.step,
            "step": args.into,
            "attributes": count,
        }));
    } else if !ctx.quiet {
        println!(
            "{} Flattened {} into root step {} ({} attributes)",
            render_pass("\u{2713}"),
            render_step(&args.step),
            render_step(&args.into),
            count
        );
    }

    Ok(())
}
