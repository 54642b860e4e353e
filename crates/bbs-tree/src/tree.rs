//! The step arena.

use std::collections::HashMap;

use tracing::debug;

use bbs_core::{EngineError, Result, StepData};

use crate::insert::AdoptChildren;
use crate::node::{NewStep, StepNode};

/// What happens to the children of a removed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoveMode {
    /// Remove the step and all of its descendants.
    #[default]
    Subtree,
    /// Remove only the step; its children take its place under its parent.
    Splice,
}

/// All steps of one editing session, owned by name.
///
/// Invariants:
/// - names are unique;
/// - every non-root node's parent is in the tree and lists it as a child;
/// - the parent links form a forest (no cycles).
#[derive(Debug, Clone, Default)]
pub struct StepTree {
    pub(crate) nodes: HashMap<String, StepNode>,
    pub(crate) roots: Vec<String>,
}

impl StepTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// O(1) existence check.
    pub fn exists(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&StepNode> {
        self.nodes.get(name)
    }

    /// Like [`StepTree::get`], failing with [`EngineError::UnknownStep`].
    pub fn step(&self, name: &str) -> Result<&StepNode> {
        self.nodes
            .get(name)
            .ok_or_else(|| EngineError::unknown_step(name))
    }

    pub(crate) fn step_mut(&mut self, name: &str) -> Result<&mut StepNode> {
        self.nodes
            .get_mut(name)
            .ok_or_else(|| EngineError::unknown_step(name))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Names of the root steps, in insertion order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Iterates from the parent of `name` up to its root.
    pub fn ancestors<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a StepNode> + 'a {
        let mut current = self
            .nodes
            .get(name)
            .and_then(|node| node.parent.as_deref())
            .and_then(|parent| self.nodes.get(parent));
        std::iter::from_fn(move || {
            let node = current?;
            current = node.parent.as_deref().and_then(|p| self.nodes.get(p));
            Some(node)
        })
    }

    /// Number of ancestors of `name` (0 for a root).
    pub fn depth(&self, name: &str) -> usize {
        self.ancestors(name).count()
    }

    /// All nodes in depth-first pre-order with their depth.
    pub fn depth_first(&self) -> Vec<(usize, &StepNode)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, &str)> = self.roots.iter().rev().map(|r| (0, r.as_str())).collect();
        while let Some((depth, name)) = stack.pop() {
            let Some(node) = self.nodes.get(name) else {
                continue;
            };
            out.push((depth, node));
            stack.extend(node.children.iter().rev().map(|c| (depth + 1, c.as_str())));
        }
        out
    }

    /// Names of `name` and all of its descendants, depth-first.
    pub fn subtree(&self, name: &str) -> Result<Vec<String>> {
        self.step(name)?;
        let mut out = Vec::new();
        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().rev().cloned());
            }
            out.push(current);
        }
        Ok(out)
    }

    /// Replaces the stored data of an existing step, keeping its position.
    ///
    /// Returns the previous data.
    pub fn overwrite_data(&mut self, name: &str, data: StepData) -> Result<StepData> {
        let node = self.step_mut(name)?;
        debug!(step = name, overrides = data.len(), "overwrite step data");
        Ok(std::mem::replace(&mut node.data, data))
    }

    /// A detached step named `new_name` carrying `source`'s stored data.
    pub fn copy_of(&self, source: &str, new_name: impl Into<String>) -> Result<NewStep> {
        Ok(NewStep::with_data(new_name, self.step(source)?.data.clone()))
    }

    /// Inserts a copy of `source`'s stored data as a new step, adopting
    /// children of `parent` like [`StepTree::insert_between`].
    pub fn duplicate(
        &mut self,
        source: &str,
        new_name: &str,
        parent: Option<&str>,
        adopt: AdoptChildren,
    ) -> Result<()> {
        let step = self.copy_of(source, new_name)?;
        self.insert_between(parent, step, adopt)
    }

    /// Removes a step, returning the names of all removed steps.
    pub fn remove(&mut self, name: &str, mode: RemoveMode) -> Result<Vec<String>> {
        let parent = self.step(name)?.parent.clone();
        let removed = match mode {
            RemoveMode::Subtree => self.subtree(name)?,
            RemoveMode::Splice => vec![name.to_string()],
        };

        let node = self.step_mut(name)?;
        let children = std::mem::take(&mut node.children);
        let siblings = self.siblings_mut(parent.as_deref())?;
        let position = siblings.iter().position(|s| s == name);
        siblings.retain(|s| s != name);

        if mode == RemoveMode::Splice {
            let at = position.unwrap_or(siblings.len());
            for (offset, child) in children.iter().enumerate() {
                siblings.insert(at + offset, child.clone());
            }
            for child in &children {
                if let Some(node) = self.nodes.get_mut(child) {
                    node.parent = parent.clone();
                }
            }
        }

        for gone in &removed {
            self.nodes.remove(gone);
        }
        debug!(step = name, ?mode, removed = removed.len(), "remove step");
        Ok(removed)
    }

    /// The child list of `parent`, or the root list.
    pub(crate) fn siblings_mut(&mut self, parent: Option<&str>) -> Result<&mut Vec<String>> {
        match parent {
            Some(p) => Ok(&mut self.step_mut(p)?.children),
            None => Ok(&mut self.roots),
        }
    }

    pub(crate) fn siblings(&self, parent: Option<&str>) -> Result<&[String]> {
        match parent {
            Some(p) => Ok(&self.step(p)?.children),
            None => Ok(&self.roots),
        }
    }
}
