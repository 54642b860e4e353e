//! `bbs init` -- create `.bbs/` and an empty strategy.

use std::env;

use anyhow::{Context, Result, bail};

use bbs_config::{ensure_bbs_dir, load_config, save_config};
use bbs_strategy::{Strategy, StrategyLock};
use bbs_tree::NewStep;

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `bbs init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    let bbs_dir = ensure_bbs_dir(&cwd)
        .with_context(|| format!("failed to create .bbs directory in {}", cwd.display()))?;

    let config_path = bbs_dir.join("config.yaml");
    let config = load_config(&bbs_dir)?;
    if !config_path.exists() {
        save_config(&bbs_dir, &config)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
    }

    let strategy_path = match ctx.strategy_flag() {
        Some(path) => path.to_path_buf(),
        None => config.strategy_path(&bbs_dir),
    };
    if strategy_path.exists() && !args.force {
        bail!(
            "strategy file already exists: {}\nHint: use --force to replace it",
            strategy_path.display()
        );
    }

    let name = args
        .name
        .clone()
        .or_else(|| cwd.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "strategy".to_string());

    let mut strategy = Strategy::new(&name);
    if let Some(root) = &args.root {
        strategy.tree.insert(None, NewStep::new(root.as_str()))?;
    }

    {
        let _lock = StrategyLock::exclusive(&strategy_path)?;
        strategy
            .save(&strategy_path)
            .with_context(|| format!("failed to write {}", strategy_path.display()))?;
    }

    if ctx.json {
        output_json(&serde_json::json!({
            "bbs_dir": bbs_dir.display().to_string(),
            "strategy": strategy_path.display().to_string(),
            "name": name,
            "root": args.root,
        }));
    } else if !ctx.quiet {
        println!();
        println!("bbs initialized successfully!");
        println!();
        println!("  Strategy: {} ({})", name, strategy_path.display());
        if let Some(root) = &args.root {
            println!("  Root step: {}", root);
        }
        println!();
        println!("Run `bbs add <STEP>` to add steps.");
        println!();
    }

    Ok(())
}
