//! Advisory locking of strategy files.
//!
//! The lock lives in a sibling `<file>.lock` so the strategy itself can be
//! rewritten while the lock is held.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::Result;

/// An `fs2` lock held for one load-mutate-save cycle. Released on drop.
#[derive(Debug)]
pub struct StrategyLock {
    file: File,
    path: PathBuf,
}

impl StrategyLock {
    /// Blocks until an exclusive lock is acquired.
    pub fn exclusive(strategy: &Path) -> Result<Self> {
        let lock = Self::open(strategy)?;
        FileExt::lock_exclusive(&lock.file)?;
        debug!(path = %lock.path.display(), "acquired exclusive strategy lock");
        Ok(lock)
    }

    /// Blocks until a shared lock is acquired.
    pub fn shared(strategy: &Path) -> Result<Self> {
        let lock = Self::open(strategy)?;
        FileExt::lock_shared(&lock.file)?;
        debug!(path = %lock.path.display(), "acquired shared strategy lock");
        Ok(lock)
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(strategy: &Path) -> Result<Self> {
        let mut name = strategy.as_os_str().to_owned();
        name.push(".lock");
        let path = PathBuf::from(name);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;
        Ok(Self { file, path })
    }
}

impl Drop for StrategyLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_file_sits_next_to_strategy() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = dir.path().join("strategy.yaml");
        let lock = StrategyLock::exclusive(&strategy).unwrap();
        assert_eq!(lock.path(), dir.path().join("strategy.yaml.lock"));
        assert!(lock.path().exists());
    }

    #[test]
    fn exclusive_lock_is_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = dir.path().join("strategy.yaml");

        let held = StrategyLock::exclusive(&strategy).unwrap();
        let other = File::open(held.path()).unwrap();
        assert!(FileExt::try_lock_shared(&other).is_err());
        drop(held);
        assert!(FileExt::try_lock_shared(&other).is_ok());
    }

    #[test]
    fn shared_locks_coexist() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = dir.path().join("strategy.yaml");
        let _a = StrategyLock::shared(&strategy).unwrap();
        let _b = StrategyLock::shared(&strategy).unwrap();
    }
}
