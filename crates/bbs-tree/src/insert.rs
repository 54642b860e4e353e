//! Insertion, cascading insertion and name-conflict resolution.
//!
//! Insertion only rewires names: no stored [`StepData`] other than the new
//! step's own is ever written. Because resolution walks the live parent
//! chain, descendants adopted by a new step start inheriting from it
//! immediately.

use tracing::debug;

use bbs_core::{EngineError, Result, StepData};

use crate::node::{NewStep, StepNode};
use crate::tree::StepTree;

/// Which existing children of the insertion parent the new step adopts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AdoptChildren {
    /// Plain insertion as a new leaf.
    #[default]
    None,
    /// Insert between the parent and all of its current children.
    All,
    /// Insert between the parent and the named children only.
    Only(Vec<String>),
}

/// The caller's answer to a [`EngineError::NameConflict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Replace the existing step's data, keeping its position in the tree.
    Overwrite,
    /// Insert the new step under a different name.
    Rename(String),
    /// Leave the tree unchanged.
    Abort,
}

/// What [`StepTree::insert_resolving`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(String),
    Overwritten(String),
    Aborted(String),
}

impl InsertOutcome {
    /// Name of the step that was inserted, overwritten, or left alone.
    pub fn name(&self) -> &str {
        match self {
            Self::Inserted(n) | Self::Overwritten(n) | Self::Aborted(n) => n,
        }
    }
}

/// A step together with its ancestor chain, as discovered outside the tree
/// (e.g. when loading steps one by one from a parameter database).
#[derive(Debug, Clone, PartialEq)]
pub struct StepChain {
    pub name: String,
    pub data: StepData,
    pub parent: Option<Box<StepChain>>,
}

impl StepChain {
    pub fn root(name: impl Into<String>, data: StepData) -> Self {
        Self {
            name: name.into(),
            data,
            parent: None,
        }
    }

    pub fn child_of(parent: StepChain, name: impl Into<String>, data: StepData) -> Self {
        Self {
            name: name.into(),
            data,
            parent: Some(Box::new(parent)),
        }
    }
}

impl StepTree {
    /// Attaches `step` under `parent` (or as a new root).
    ///
    /// # Errors
    ///
    /// [`EngineError::NameConflict`] if the name is taken, and
    /// [`EngineError::UnknownStep`] if the parent is missing. The tree is
    /// unchanged on error.
    pub fn insert(&mut self, parent: Option<&str>, step: NewStep) -> Result<()> {
        self.insert_between(parent, step, AdoptChildren::None)
    }

    /// Cascading insertion: attaches `step` under `parent` and moves the
    /// adopted children below it. The new step takes the position of the
    /// first adopted child among its siblings.
    ///
    /// # Errors
    ///
    /// As [`StepTree::insert`], plus [`EngineError::NotAChild`] if an
    /// adopted name is not a current child of `parent`.
    pub fn insert_between(&mut self, parent: Option<&str>, step: NewStep, adopt: AdoptChildren) -> Result<()> {
        if self.exists(&step.name) {
            return Err(EngineError::name_conflict(&step.name));
        }
        let siblings = self.siblings(parent)?;
        let adopted: Vec<String> = match adopt {
            AdoptChildren::None => Vec::new(),
            AdoptChildren::All => siblings.to_vec(),
            AdoptChildren::Only(names) => {
                if let Some(stray) = names.iter().find(|n| !siblings.contains(n)) {
                    return Err(EngineError::NotAChild {
                        step: stray.clone(),
                        parent: parent.map(str::to_string),
                    });
                }
                // Keep sibling order, not the caller's order.
                siblings
                    .iter()
                    .filter(|s| names.contains(s))
                    .cloned()
                    .collect()
            }
        };

        let NewStep { name, data } = step;
        let siblings = self.siblings_mut(parent)?;
        let position = adopted
            .first()
            .and_then(|first| siblings.iter().position(|s| s == first))
            .unwrap_or(siblings.len());
        siblings.retain(|s| !adopted.contains(s));
        siblings.insert(position.min(siblings.len()), name.clone());

        for child in &adopted {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = Some(name.clone());
            }
        }
        debug!(step = %name, parent = ?parent, adopted = adopted.len(), "insert step");
        self.nodes.insert(
            name.clone(),
            StepNode {
                name,
                parent: parent.map(str::to_string),
                children: adopted,
                data,
            },
        );
        Ok(())
    }

    /// Inserts `step`, applying `resolution` if the name is already taken.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownStep`] for a missing parent, and
    /// [`EngineError::NameConflict`] if a `Rename` target is taken as well.
    pub fn insert_resolving(
        &mut self,
        parent: Option<&str>,
        mut step: NewStep,
        resolution: ConflictResolution,
    ) -> Result<InsertOutcome> {
        if !self.exists(&step.name) {
            let name = step.name.clone();
            self.insert(parent, step)?;
            return Ok(InsertOutcome::Inserted(name));
        }
        match resolution {
            ConflictResolution::Overwrite => {
                self.overwrite_data(&step.name, step.data)?;
                Ok(InsertOutcome::Overwritten(step.name))
            }
            ConflictResolution::Rename(new_name) => {
                step.name = new_name.clone();
                self.insert(parent, step)?;
                Ok(InsertOutcome::Inserted(new_name))
            }
            ConflictResolution::Abort => {
                debug!(step = %step.name, "insert aborted on name conflict");
                Ok(InsertOutcome::Aborted(step.name))
            }
        }
    }

    /// Makes sure `chain` and all of its ancestors are attached.
    ///
    /// Missing links are inserted ancestor first; steps that already exist
    /// are left exactly as they are (data and position). Returns the number
    /// of steps added, so a second call with the same chain returns 0.
    pub fn assure_in_collection(&mut self, chain: &StepChain) -> Result<usize> {
        let mut links: Vec<&StepChain> = Vec::new();
        let mut current = Some(chain);
        while let Some(link) = current {
            links.push(link);
            current = link.parent.as_deref();
        }

        let mut added = 0;
        let mut parent: Option<&str> = None;
        for link in links.into_iter().rev() {
            if !self.exists(&link.name) {
                let step = NewStep::with_data(link.name.clone(), link.data.clone());
                self.insert(parent, step)?;
                added += 1;
            }
            parent = Some(link.name.as_str());
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbs_core::{AttributeId, Value};
    use pretty_assertions::assert_eq;

    fn chain_tree() -> StepTree {
        let mut tree = StepTree::new();
        tree.insert(None, NewStep::new("Root")).unwrap();
        tree.insert(Some("Root"), NewStep::new("A")).unwrap();
        tree.insert(Some("A"), NewStep::new("B")).unwrap();
        tree.insert(Some("A"), NewStep::new("C")).unwrap();
        tree
    }

    #[test]
    fn insert_under_missing_parent_fails() {
        let mut tree = chain_tree();
        let err = tree.insert(Some("Ghost"), NewStep::new("X")).unwrap_err();
        assert!(err.is_not_found());
        assert!(!tree.exists("X"));
    }

    #[test]
    fn duplicate_name_is_a_conflict_and_leaves_tree_unchanged() {
        let mut tree = chain_tree();
        let before = tree.snapshot();
        let step = NewStep::with_data(
            "B",
            StepData::new().with_value(AttributeId::IntegrationTime, Value::Number(1.0)),
        );
        let err = tree.insert(Some("Root"), step).unwrap_err();
        assert_eq!(err, EngineError::name_conflict("B"));
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn cascading_insert_adopts_all_children() {
        let mut tree = chain_tree();
        tree.insert_between(Some("A"), NewStep::new("M"), AdoptChildren::All)
            .unwrap();

        assert_eq!(tree.step("A").unwrap().children(), ["M".to_string()]);
        assert_eq!(
            tree.step("M").unwrap().children(),
            ["B".to_string(), "C".to_string()]
        );
        assert_eq!(tree.step("B").unwrap().parent(), Some("M"));
        assert_eq!(tree.step("M").unwrap().parent(), Some("A"));
    }

    #[test]
    fn cascading_insert_adopts_subset_in_sibling_order() {
        let mut tree = chain_tree();
        tree.insert(Some("A"), NewStep::new("D")).unwrap();
        tree.insert_between(
            Some("A"),
            NewStep::new("M"),
            AdoptChildren::Only(vec!["D".into(), "C".into()]),
        )
        .unwrap();

        assert_eq!(
            tree.step("A").unwrap().children(),
            ["B".to_string(), "M".to_string()]
        );
        assert_eq!(
            tree.step("M").unwrap().children(),
            ["C".to_string(), "D".to_string()]
        );
    }

    #[test]
    fn cascading_insert_above_a_root() {
        let mut tree = chain_tree();
        tree.insert_between(
            None,
            NewStep::new("Top"),
            AdoptChildren::Only(vec!["Root".into()]),
        )
        .unwrap();
        assert_eq!(tree.roots(), ["Top".to_string()]);
        assert_eq!(tree.step("Root").unwrap().parent(), Some("Top"));
        assert_eq!(tree.depth("B"), 3);
    }

    #[test]
    fn adopting_a_non_child_is_rejected() {
        let mut tree = chain_tree();
        let before = tree.snapshot();
        let err = tree
            .insert_between(
                Some("Root"),
                NewStep::new("M"),
                AdoptChildren::Only(vec!["B".into()]),
            )
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::NotAChild {
                step: "B".into(),
                parent: Some("Root".into()),
            }
        );
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn conflict_overwrite_keeps_position() {
        let mut tree = chain_tree();
        let data = StepData::new().with_value(AttributeId::IntegrationTime, Value::Number(2.0));
        let outcome = tree
            .insert_resolving(None, NewStep::with_data("B", data.clone()), ConflictResolution::Overwrite)
            .unwrap();

        assert_eq!(outcome, InsertOutcome::Overwritten("B".into()));
        let node = tree.step("B").unwrap();
        assert_eq!(node.parent(), Some("A"));
        assert_eq!(node.data(), &data);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn conflict_rename_inserts_new_step() {
        let mut tree = chain_tree();
        let outcome = tree
            .insert_resolving(
                Some("Root"),
                NewStep::new("B"),
                ConflictResolution::Rename("B-copy".into()),
            )
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted("B-copy".into()));
        assert_eq!(tree.step("B-copy").unwrap().parent(), Some("Root"));

        let err = tree
            .insert_resolving(
                Some("Root"),
                NewStep::new("B"),
                ConflictResolution::Rename("C".into()),
            )
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn conflict_abort_does_nothing() {
        let mut tree = chain_tree();
        let before = tree.snapshot();
        let outcome = tree
            .insert_resolving(Some("Root"), NewStep::new("A"), ConflictResolution::Abort)
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Aborted("A".into()));
        assert_eq!(outcome.name(), "A");
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn assure_in_collection_is_idempotent() {
        let mut tree = StepTree::new();
        let root = StepChain::root("Root", StepData::new());
        let solve = StepChain::child_of(root, "Solve", StepData::new());
        let leaf = StepChain::child_of(solve, "Leaf", StepData::new());

        assert_eq!(tree.assure_in_collection(&leaf).unwrap(), 3);
        let after_first = tree.snapshot();
        assert_eq!(tree.assure_in_collection(&leaf).unwrap(), 0);
        assert_eq!(tree.snapshot(), after_first);
        assert_eq!(tree.step("Leaf").unwrap().parent(), Some("Solve"));
    }

    #[test]
    fn assure_in_collection_keeps_existing_data() {
        let mut tree = chain_tree();
        let kept = StepData::new().with_value(AttributeId::OutputDataColumn, Value::Text("DATA".into()));
        tree.overwrite_data("A", kept.clone()).unwrap();

        let chain = StepChain::child_of(
            StepChain::child_of(StepChain::root("Root", StepData::new()), "A", StepData::new()),
            "E",
            StepData::new(),
        );
        assert_eq!(tree.assure_in_collection(&chain).unwrap(), 1);
        assert_eq!(tree.step("A").unwrap().data(), &kept);
        assert_eq!(tree.step("E").unwrap().parent(), Some("A"));
    }
}
