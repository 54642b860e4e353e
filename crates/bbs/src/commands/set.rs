//! `bbs set` and `bbs unset` -- write one attribute of a step.

use anyhow::{Context, Result};
use tracing::debug;

use bbs_core::{AttributeId, AttributeValue, Value};
use bbs_ui::styles::{render_muted, render_pass, render_step};

use crate::cli::{SetArgs, UnsetArgs};
use crate::context::RuntimeContext;
use crate::output::{describe_stored, format_value, output_json};

/// Execute the `bbs set` command.
///
/// Values equal to what the step would inherit are not stored; the step
/// keeps following its ancestors for that attribute.
pub fn run_set(ctx: &RuntimeContext, args: &SetArgs) -> Result<()> {
    let attribute: AttributeId = args.attribute.parse()?;

    let (stored, effective, key) = ctx.edit_strategy(|strategy| {
        let tree = &mut strategy.tree;
        let written = if args.empty {
            tree.set_empty(&args.step, &attribute)
        } else {
            let input = args.value.as_deref().unwrap_or_default();
            tree.set_attribute_text(&args.step, &attribute, input)
        };
        let stored = written
            .with_context(|| format!("cannot set {} on step '{}'", args.attribute, args.step))?;
        let effective = tree.resolve(&args.step, &attribute)?.into_value();
        let key = attribute.parameter_key_for(tree.effective_operation(&args.step)?);
        Ok((stored, effective, key))
    })?;
    debug!(step = %args.step, %attribute, ?stored, "set complete");

    report(ctx, &args.step, &key, &attribute, &stored, effective.as_ref());
    Ok(())
}

/// Execute the `bbs unset` command.
pub fn run_unset(ctx: &RuntimeContext, args: &UnsetArgs) -> Result<()> {
    let attribute: AttributeId = args.attribute.parse()?;

    let (stored, effective, key) = ctx.edit_strategy(|strategy| {
        let tree = &mut strategy.tree;
        let stored = tree.clear_attribute(&args.step, &attribute)?;
        let effective = tree.resolve(&args.step, &attribute)?.into_value();
        let key = attribute.parameter_key_for(tree.effective_operation(&args.step)?);
        Ok((stored, effective, key))
    })?;

    report(ctx, &args.step, &key, &attribute, &stored, effective.as_ref());
    Ok(())
}

fn report(
    ctx: &RuntimeContext,
    step: &str,
    key: &str,
    attribute: &AttributeId,
    stored: &AttributeValue<Value>,
    effective: Option<&Value>,
) {
    let value = format_value(attribute, effective);
    if ctx.json {
        output_json(&serde_json::json!({
            "step": step,
            "attribute": key,
            "stored": describe_stored(stored),
            "value": effective.map(Value::to_string),
        }));
    } else if !ctx.quiet {
        let note = match stored {
            AttributeValue::Unset => render_muted(" (inherited)"),
            _ => String::new(),
        };
        println!(
            "{} {} {} = {}{}",
            render_pass("\u{2713}"),
            render_step(step),
            key,
            value,
            note
        );
    }
}
