//! `bbs config` -- show or change `.bbs/config.yaml`.

use anyhow::{Context, Result, bail};

use bbs_config::{BbsConfig, save_config};

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `bbs config` command.
pub fn run(ctx: &RuntimeContext, args: &ConfigArgs) -> Result<()> {
    match args.command.as_ref().unwrap_or(&ConfigCommands::List) {
        ConfigCommands::List => {
            if ctx.json {
                output_json(&ctx.config);
            } else {
                for key in BbsConfig::KEYS {
                    if let Some(value) = ctx.config.get(key) {
                        println!("{} = {}", key, value);
                    }
                }
            }
        }

        ConfigCommands::Get(get_args) => {
            let Some(value) = ctx.config.get(&get_args.key) else {
                bail!(
                    "unknown config key '{}' (expected one of {})",
                    get_args.key,
                    BbsConfig::KEYS.join(", ")
                );
            };
            if ctx.json {
                output_json(&serde_json::json!({
                    "key": get_args.key,
                    "value": value,
                }));
            } else {
                println!("{}", value);
            }
        }

        ConfigCommands::Set(set_args) => {
            let bbs_dir = ctx
                .bbs_dir
                .as_deref()
                .context("no .bbs directory found. Run 'bbs init' to create one.")?;

            let mut config = ctx.config.clone();
            config.set(&set_args.key, &set_args.value)?;
            save_config(bbs_dir, &config)
                .with_context(|| format!("failed to write {}", bbs_dir.join("config.yaml").display()))?;

            if ctx.json {
                output_json(&serde_json::json!({
                    "key": set_args.key,
                    "value": config.get(&set_args.key),
                }));
            } else if !ctx.quiet {
                println!("Set {} = {}", set_args.key, set_args.value);
            }
        }
    }

    Ok(())
}
