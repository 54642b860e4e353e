//! Configuration for BBS strategy projects.
//!
//! Loads and saves `.bbs/config.yaml` and finds the `.bbs/` directory by
//! walking up from the working directory.

pub mod bbs_dir;
pub mod config;

pub use bbs_dir::{ensure_bbs_dir, find_bbs_dir, find_bbs_dir_or_error};
pub use config::{BbsConfig, ColorMode, ConfigError, OnConflict, Result, load_config, save_config};
