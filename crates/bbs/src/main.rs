//! `bbs` -- edit BBS step strategies.
//!
//! Parses CLI arguments with clap, resolves the runtime context and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bbs_config::ColorMode;

use cli::{Cli, Commands};
use context::RuntimeContext;

fn main() {
    let cli = Cli::parse();

    let result = RuntimeContext::from_global_args(&cli.global).and_then(|ctx| {
        if ctx.verbose {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(&ctx.config.log_filter))
                .with_writer(std::io::stderr)
                .init();
        }
        bbs_ui::terminal::set_color_override(match ctx.color {
            ColorMode::Auto => None,
            ColorMode::Always => Some(true),
            ColorMode::Never => Some(false),
        });
        dispatch(&ctx, cli.command)
    });

    // Handle errors: print message and exit with code 1
    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn dispatch(ctx: &RuntimeContext, command: Option<Commands>) -> anyhow::Result<()> {
    match command {
        Some(Commands::Init(args)) => commands::init::run(ctx, &args),
        Some(Commands::Tree) => commands::tree::run(ctx),
        Some(Commands::Show(args)) => commands::show::run(ctx, &args),
        Some(Commands::Get(args)) => commands::get::run(ctx, &args),
        Some(Commands::Set(args)) => commands::set::run_set(ctx, &args),
        Some(Commands::Unset(args)) => commands::set::run_unset(ctx, &args),
        Some(Commands::Add(args)) => commands::add::run(ctx, &args),
        Some(Commands::Remove(args)) => commands::remove::run(ctx, &args),
        Some(Commands::Flatten(args)) => commands::flatten::run(ctx, &args),
        Some(Commands::Operations) => commands::operations::run(ctx),
        Some(Commands::Config(args)) => commands::config_cmd::run(ctx, &args),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    }
}
