//! Discovery and creation of the `.bbs/` directory.
//!
//! `.bbs/` marks the root of a strategy project and holds its
//! `config.yaml`.

use crate::config::ConfigError;
use std::path::{Path, PathBuf};

/// The name of the project metadata directory.
const BBS_DIR_NAME: &str = ".bbs";

/// Environment variable overriding the `.bbs/` directory.
const BBS_DIR_ENV: &str = "BBS_DIR";

/// Walk up the directory tree from `start` looking for a `.bbs/` directory.
///
/// The `BBS_DIR` environment variable is checked first. Returns `None` when
/// the filesystem root is reached without a match.
///
/// # Examples
///
/// ```no_run
/// use bbs_config::bbs_dir::find_bbs_dir;
/// use std::path::Path;
///
/// if let Some(dir) = find_bbs_dir(Path::new(".")) {
///     println!("project metadata in {}", dir.display());
/// }
/// ```
pub fn find_bbs_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(BBS_DIR_ENV) {
        let env_path = PathBuf::from(&env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }

    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(BBS_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Like [`find_bbs_dir`], failing with [`ConfigError::BbsDirNotFound`].
pub fn find_bbs_dir_or_error(start: &Path) -> Result<PathBuf, ConfigError> {
    find_bbs_dir(start).ok_or(ConfigError::BbsDirNotFound)
}

/// Ensure a `.bbs/` directory exists at (or under) `path`.
///
/// Returns the path to the `.bbs/` directory.
pub fn ensure_bbs_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let bbs_dir = if path.ends_with(BBS_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(BBS_DIR_NAME)
    };

    std::fs::create_dir_all(&bbs_dir)?;
    Ok(bbs_dir)
}
