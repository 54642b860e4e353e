//! `bbs remove` -- delete a step or splice it out.

use anyhow::Result;

use bbs_tree::RemoveMode;
use bbs_ui::styles::{render_muted, render_pass, render_step};

use crate::cli::RemoveArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `bbs remove` command.
///
/// Without `--splice` the whole subtree goes. With it only the step is
/// removed and its children move up to its parent, inheriting from there.
pub fn run(ctx: &RuntimeContext, args: &RemoveArgs) -> Result<()> {
    let mode = if args.splice {
        RemoveMode::Splice
    } else {
        RemoveMode::Subtree
    };

    let removed = ctx.edit_strategy(|strategy| Ok(strategy.tree.remove(&args.name, mode)?))?;

    if ctx.json {
        output_json(&serde_json::json!({
            "removed": removed,
            "spliced": args.splice,
        }));
    } else if !ctx.quiet {
        println!("{} Removed {}", render_pass("\u{2713}"), render_step(&args.name));
        let others: Vec<&str> = removed
            .iter()
            .map(String::as_str)
            .filter(|n| *n != args.name)
            .collect();
        if !others.is_empty() {
            println!("  {}", render_muted(&format!("also removed: {}", others.join(", "))));
        }
    }

    Ok(())
}
