//! `bbs add` -- insert a step, resolving name conflicts.

use anyhow::{Context, Result, bail};

use bbs_config::OnConflict;
use bbs_core::EngineError;
use bbs_tree::{ConflictResolution, InsertOutcome, NewStep};
use bbs_ui::styles::{render_muted, render_pass, render_step};

use crate::cli::AddArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `bbs add` command.
///
/// When the name is taken, `--on-conflict` (or the configured default)
/// decides. An aborted insertion is an error and leaves the file untouched.
pub fn run(ctx: &RuntimeContext, args: &AddArgs) -> Result<()> {
    let resolution = args.on_conflict.clone().unwrap_or(match ctx.config.on_conflict {
        OnConflict::Abort => ConflictResolution::Abort,
        OnConflict::Overwrite => ConflictResolution::Overwrite,
    });
    let adopt = args.adopt.clone().unwrap_or_default();
    let parent = args.parent.as_deref();

    let outcome = ctx.edit_strategy(|strategy| {
        let tree = &mut strategy.tree;
        if !tree.exists(&args.name) {
            match &args.copy_from {
                Some(source) => tree.duplicate(source, &args.name, parent, adopt.clone())?,
                None => tree.insert_between(parent, NewStep::new(args.name.as_str()), adopt.clone())?,
            }
            return Ok(InsertOutcome::Inserted(args.name.clone()));
        }

        let mut step = match &args.copy_from {
            Some(source) => tree.copy_of(source, args.name.as_str())?,
            None => NewStep::new(args.name.as_str()),
        };

        let outcome = match resolution.clone() {
            // A renamed step still honours --adopt.
            ConflictResolution::Rename(new_name) => {
                step.name = new_name.clone();
                tree.insert_between(parent, step, adopt.clone())
                    .with_context(|| format!("cannot rename new step to '{}'", new_name))?;
                InsertOutcome::Inserted(new_name)
            }
            other => tree.insert_resolving(parent, step, other)?,
        };
        if let InsertOutcome::Aborted(name) = &outcome {
            bail!(
                "{}\nHint: use --on-conflict overwrite or --on-conflict rename:NEW",
                EngineError::name_conflict(name.as_str())
            );
        }
        Ok(outcome)
    })?;

    if ctx.json {
        let (action, name) = match &outcome {
            InsertOutcome::Inserted(n) => ("inserted", n),
            InsertOutcome::Overwritten(n) => ("overwritten", n),
            InsertOutcome::Aborted(n) => ("aborted", n),
        };
        output_json(&serde_json::json!({
            "action": action,
            "step": name,
            "parent": args.parent,
        }));
    } else if !ctx.quiet {
        let verb = match &outcome {
            InsertOutcome::Overwritten(_) => "Overwrote",
            _ => "Added",
        };
        let under = args
            .parent
            .as_deref()
            .map(|p| format!(" under {}", p))
            .unwrap_or_else(|| " as a root step".to_string());
        println!(
            "{} {} {}{}",
            render_pass("\u{2713}"),
            verb,
            render_step(outcome.name()),
            render_muted(&under)
        );
    }

    Ok(())
}
