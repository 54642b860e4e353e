//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what every command handler needs: the global
//! flags, the discovered `.bbs/` directory and its configuration, and the
//! strategy file to operate on.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use bbs_config::{BbsConfig, ColorMode, find_bbs_dir, load_config};
use bbs_strategy::{Strategy, StrategyLock};

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,

    /// Discovered `.bbs/` directory, if any.
    pub bbs_dir: Option<PathBuf>,

    /// Configuration from `.bbs/config.yaml` (defaults without a project).
    pub config: BbsConfig,

    /// Effective colour choice: `--color` over the config file.
    pub color: ColorMode,

    strategy_flag: Option<PathBuf>,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// A broken config file is reported rather than silently replaced by
    /// defaults.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let cwd = env::current_dir().context("failed to get current directory")?;
        let bbs_dir = find_bbs_dir(&cwd);
        let config = match &bbs_dir {
            Some(dir) => load_config(dir)
                .with_context(|| format!("failed to load {}", dir.join("config.yaml").display()))?,
            None => BbsConfig::default(),
        };
        let color = global.color.map(ColorMode::from).unwrap_or(config.color);

        Ok(Self {
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
            bbs_dir,
            config,
            color,
            strategy_flag: global.strategy.clone(),
        })
    }

    /// The `--strategy` path, if one was given.
    pub fn strategy_flag(&self) -> Option<&Path> {
        self.strategy_flag.as_deref()
    }

    /// The strategy file: `--strategy`, else the configured file of the
    /// discovered project.
    pub fn strategy_path(&self) -> Result<PathBuf> {
        if let Some(path) = self.strategy_flag() {
            return Ok(path.to_path_buf());
        }
        match &self.bbs_dir {
            Some(dir) => Ok(self.config.strategy_path(dir)),
            None => bail!("no .bbs directory found (run 'bbs init' first) and no --strategy given"),
        }
    }

    /// Loads the strategy under a shared lock.
    pub fn load_strategy(&self) -> Result<Strategy> {
        let path = self.existing_strategy()?;
        let _lock = StrategyLock::shared(&path)?;
        Strategy::load(&path).with_context(|| format!("failed to load strategy {}", path.display()))
    }

    /// Runs one load-mutate-save cycle under an exclusive lock.
    ///
    /// Nothing is written when `edit` fails.
    pub fn edit_strategy<R>(&self, edit: impl FnOnce(&mut Strategy) -> Result<R>) -> Result<R> {
        let path = self.existing_strategy()?;
        let _lock = StrategyLock::exclusive(&path)?;
        let mut strategy =
            Strategy::load(&path).with_context(|| format!("failed to load strategy {}", path.display()))?;
        let result = edit(&mut strategy)?;
        strategy
            .save(&path)
            .with_context(|| format!("failed to save strategy {}", path.display()))?;
        debug!(path = %path.display(), "strategy saved");
        Ok(result)
    }

    fn existing_strategy(&self) -> Result<PathBuf> {
        let path = self.strategy_path()?;
        if !Path::new(&path).exists() {
            bail!(
                "strategy file not found: {}\nHint: run 'bbs init' to create one",
                path.display()
            );
        }
        Ok(path)
    }
}
