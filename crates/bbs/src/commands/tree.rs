//! `bbs tree` -- print the step tree.

use anyhow::Result;

use bbs_strategy::Strategy;
use bbs_tree::StepTree;
use bbs_ui::styles::{render_accent, render_bold, render_muted, render_step, tree_prefix};

use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `bbs tree` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let strategy = ctx.load_strategy()?;

    if ctx.json {
        output_json(&serde_json::json!({
            "strategy": strategy.name,
            "steps": strategy.tree.len(),
            "tree": strategy.tree.snapshot(),
        }));
        return Ok(());
    }

    if strategy.tree.is_empty() {
        println!("Strategy '{}' has no steps", strategy.name);
        return Ok(());
    }

    if !ctx.quiet {
        println!("{} {}", render_muted("Strategy:"), render_bold(&strategy.name));
    }
    let mut lines = Vec::with_capacity(strategy.tree.len());
    for root in strategy.tree.roots() {
        render_node(&strategy, root, &mut Vec::new(), None, &mut lines);
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Appends the line for `name` and its descendants. `last` is `None` for
/// roots, which are printed without a connector.
fn render_node(strategy: &Strategy, name: &str, open: &mut Vec<bool>, last: Option<bool>, lines: &mut Vec<String>) {
    let tree = &strategy.tree;
    let Some(node) = tree.get(name) else {
        return;
    };

    let prefix = match last {
        Some(last) => tree_prefix(open, last),
        None => String::new(),
    };
    lines.push(format!("{}{}{}", prefix, render_step(name), annotation(tree, name)));

    let children = node.children();
    if let Some(last) = last {
        open.push(!last);
    }
    for (i, child) in children.iter().enumerate() {
        render_node(strategy, child, open, Some(i + 1 == children.len()), lines);
    }
    if last.is_some() {
        open.pop();
    }
}

/// ` [solve, 3 set]`: the effective operation and the number of overrides.
fn annotation(tree: &StepTree, name: &str) -> String {
    let operation = tree.effective_operation(name).ok().flatten();
    let overrides = tree.get(name).map(|n| n.data().len()).unwrap_or(0);

    let mut parts = Vec::new();
    if let Some(op) = operation {
        parts.push(render_accent(op.as_str()));
    }
    if overrides > 0 {
        parts.push(render_muted(&format!("{} set", overrides)));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" [{}]", parts.join(", "))
    }
}
