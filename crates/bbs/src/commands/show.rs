//! `bbs show` -- every attribute of a step, with its origin.

use anyhow::Result;

use bbs_ui::styles::{render_muted, render_step, render_warn};

use crate::cli::ShowArgs;
use crate::context::RuntimeContext;
use crate::output::{AttributeView, format_resolved_line, output_json};

/// Execute the `bbs show` command.
pub fn run(ctx: &RuntimeContext, args: &ShowArgs) -> Result<()> {
    let strategy = ctx.load_strategy()?;
    let tree = &strategy.tree;

    let node = tree.step(&args.step)?;
    let operation = tree.effective_operation(&args.step)?;
    let rows: Vec<_> = tree
        .resolve_all(&args.step)?
        .into_iter()
        .filter(|row| !args.own || row.resolved.is_defined_here())
        .collect();
    let dormant = tree.dormant_attributes(&args.step)?;

    if ctx.json {
        let attributes: Vec<AttributeView> = rows
            .iter()
            .map(|row| AttributeView::from_row(row, operation))
            .collect();
        output_json(&serde_json::json!({
            "step": node.name(),
            "parent": node.parent(),
            "children": node.children(),
            "operation": operation.map(|op| op.as_str()),
            "attributes": attributes,
            "dormant": dormant,
        }));
        return Ok(());
    }

    let parent = node
        .parent()
        .map(|p| format!("child of {}", p))
        .unwrap_or_else(|| "root step".to_string());
    println!("{} {}", render_step(node.name()), render_muted(&format!("({})", parent)));

    let keys: Vec<String> = rows
        .iter()
        .map(|row| row.attribute.parameter_key_for(operation))
        .collect();
    let width = keys.iter().map(|k| k.chars().count()).max().unwrap_or(0);
    for (row, key) in rows.iter().zip(&keys) {
        println!("{}", format_resolved_line(key, width, &row.attribute, &row.resolved));
    }
    if rows.is_empty() && args.own {
        println!("  {}", render_muted("(no attributes set on this step)"));
    }

    if !dormant.is_empty() && !ctx.quiet {
        let reason = match operation {
            Some(op) => format!("not attributes of the {} operation", op.as_str()),
            None => "no operation selected".to_string(),
        };
        println!();
        println!(
            "{}",
            render_warn(&format!("Ignored: {} ({})", dormant.join(", "), reason))
        );
    }

    Ok(())
}
