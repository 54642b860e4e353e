//! Clap CLI definitions for the `bbs` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use bbs_config::ColorMode;
use bbs_tree::{AdoptChildren, ConflictResolution};

/// bbs -- edit BBS calibration strategies.
///
/// A strategy is a tree of steps. Each step inherits every attribute it does
/// not set itself from its parent.
#[derive(Parser, Debug)]
#[command(
    name = "bbs",
    about = "Edit BBS step strategies with attribute inheritance",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Strategy file (default: from .bbs/config.yaml).
    #[arg(long, global = true, env = "BBS_STRATEGY")]
    pub strategy: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// When to use colours (default: from config).
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorMode::Auto,
            ColorArg::Always => ColorMode::Always,
            ColorArg::Never => ColorMode::Never,
        }
    }
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create .bbs/ and an empty strategy in the current directory.
    Init(InitArgs),

    /// Print the step tree.
    Tree,

    /// Show every attribute of a step with where its value comes from.
    Show(ShowArgs),

    /// Print the effective value of one attribute.
    Get(GetArgs),

    /// Set an attribute on a step.
    Set(SetArgs),

    /// Drop a step's own value so it inherits again.
    Unset(UnsetArgs),

    /// Add a step, optionally between a parent and its children.
    #[command(alias = "insert")]
    Add(AddArgs),

    /// Remove a step.
    #[command(alias = "rm")]
    Remove(RemoveArgs),

    /// Copy a step's effective values into a new root step.
    Flatten(FlattenArgs),

    /// List operations and their attributes.
    Operations,

    /// Show or change the project configuration.
    Config(ConfigArgs),
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

/// Arguments for `bbs init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Strategy name (default: current directory name).
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Create a root step with this name.
    #[arg(long)]
    pub root: Option<String>,

    /// Overwrite an existing strategy file.
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Inspecting
// ---------------------------------------------------------------------------

/// Arguments for `bbs show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Step name.
    pub step: String,

    /// Only list attributes the step sets itself.
    #[arg(long)]
    pub own: bool,
}

/// Arguments for `bbs get`.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Step name.
    pub step: String,

    /// Attribute (`Integration.Time`, `sources`, `Solve.MaxIter`, `op:MaxIter`).
    pub attribute: String,
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

/// Arguments for `bbs set`.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Step name.
    pub step: String,

    /// Attribute to write.
    pub attribute: String,

    /// New value. Lists are written `[a,b]`, baselines `[A&B,C&D]`.
    #[arg(required_unless_present = "empty", allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Set the attribute to its empty value (all sources, no output column, ...).
    #[arg(long, conflicts_with = "value")]
    pub empty: bool,
}

/// Arguments for `bbs unset`.
#[derive(Args, Debug)]
pub struct UnsetArgs {
    /// Step name.
    pub step: String,

    /// Attribute to clear.
    pub attribute: String,
}

/// Arguments for `bbs add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Name of the new step.
    pub name: String,

    /// Parent step (default: a new root).
    #[arg(short = 'p', long)]
    pub parent: Option<String>,

    /// Move children of the parent below the new step: `all` or `A,B`.
    #[arg(long, value_parser = parse_adopt)]
    pub adopt: Option<AdoptChildren>,

    /// Start from a copy of this step's own settings.
    #[arg(long)]
    pub copy_from: Option<String>,

    /// What to do if the name is taken: `abort`, `overwrite` or `rename:NEW`
    /// (default: from config).
    #[arg(long, value_parser = parse_conflict)]
    pub on_conflict: Option<ConflictResolution>,
}

/// Arguments for `bbs remove`.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Step to remove.
    pub name: String,

    /// Keep the children, attaching them to the removed step's parent.
    #[arg(long)]
    pub splice: bool,
}

/// Arguments for `bbs flatten`.
#[derive(Args, Debug)]
pub struct FlattenArgs {
    /// Step whose effective values are copied.
    pub step: String,

    /// Name of the new root step.
    #[arg(long)]
    pub into: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Arguments for `bbs config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// List all configuration values (default).
    List,
    /// Get a configuration value.
    Get(ConfigGetArgs),
    /// Set a configuration value.
    Set(ConfigSetArgs),
}

/// Arguments for `bbs config get`.
#[derive(Args, Debug)]
pub struct ConfigGetArgs {
    /// Configuration key.
    pub key: String,
}

/// Arguments for `bbs config set`.
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

// ---------------------------------------------------------------------------
// Value parsers
// ---------------------------------------------------------------------------

fn parse_adopt(s: &str) -> Result<AdoptChildren, String> {
    if s.trim().eq_ignore_ascii_case("all") {
        return Ok(AdoptChildren::All);
    }
    let names: Vec<String> = s
        .split(',')
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return Err("expected 'all' or a comma-separated list of step names".into());
    }
    Ok(AdoptChildren::Only(names))
}

fn parse_conflict(s: &str) -> Result<ConflictResolution, String> {
    let trimmed = s.trim();
    if let Some(new_name) = trimmed.strip_prefix("rename:") {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err("rename needs a new name, e.g. rename:Solve2".into());
        }
        return Ok(ConflictResolution::Rename(new_name.to_string()));
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "abort" => Ok(ConflictResolution::Abort),
        "overwrite" => Ok(ConflictResolution::Overwrite),
        other => Err(format!("expected abort, overwrite or rename:NEW, got '{}'", other)),
    }
}
