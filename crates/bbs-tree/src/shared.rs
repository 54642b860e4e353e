//! [`SharedStepTree`] -- a step tree shared between threads.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bbs_core::{AttributeId, AttributeValue, Result, Value};

use crate::insert::{AdoptChildren, ConflictResolution, InsertOutcome};
use crate::node::NewStep;
use crate::resolver::ResolvedValue;
use crate::tree::{RemoveMode, StepTree};

/// Wraps a [`StepTree`] in an `Arc<RwLock<_>>`.
///
/// Resolution takes the read lock and may run concurrently; every mutating
/// operation holds the write lock for its whole duration. Engine operations
/// validate before mutating, so a poisoned lock still guards a consistent
/// tree and is recovered rather than reported.
#[derive(Debug, Clone, Default)]
pub struct SharedStepTree {
    inner: Arc<RwLock<StepTree>>,
}

impl SharedStepTree {
    pub fn new(tree: StepTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Runs `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&StepTree) -> R) -> R {
        f(&self.read_guard())
    }

    /// Runs `f` with exclusive access, as one atomic edit.
    pub fn write<R>(&self, f: impl FnOnce(&mut StepTree) -> R) -> R {
        f(&mut self.write_guard())
    }

    pub fn resolve(&self, name: &str, attribute: &AttributeId) -> Result<ResolvedValue<Value>> {
        self.read(|tree| tree.resolve(name, attribute))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.read(|tree| tree.exists(name))
    }

    pub fn set_attribute(
        &self,
        name: &str,
        attribute: &AttributeId,
        candidate: Value,
    ) -> Result<AttributeValue<Value>> {
        self.write(|tree| tree.set_attribute(name, attribute, candidate))
    }

    pub fn insert_between(&self, parent: Option<&str>, step: NewStep, adopt: AdoptChildren) -> Result<()> {
        self.write(|tree| tree.insert_between(parent, step, adopt))
    }

    pub fn insert_resolving(
        &self,
        parent: Option<&str>,
        step: NewStep,
        resolution: ConflictResolution,
    ) -> Result<InsertOutcome> {
        self.write(|tree| tree.insert_resolving(parent, step, resolution))
    }

    pub fn remove(&self, name: &str, mode: RemoveMode) -> Result<Vec<String>> {
        self.write(|tree| tree.remove(name, mode))
    }

    /// Consumes the handle, returning the tree if this was the last one.
    pub fn into_inner(self) -> std::result::Result<StepTree, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => Ok(lock.into_inner().unwrap_or_else(PoisonError::into_inner)),
            Err(inner) => Err(Self { inner }),
        }
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, StepTree> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, StepTree> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<StepTree> for SharedStepTree {
    fn from(tree: StepTree) -> Self {
        Self::new(tree)
    }
}
