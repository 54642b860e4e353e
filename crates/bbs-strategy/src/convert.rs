//! Conversion between strategy documents and step trees.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, info, warn};

use bbs_core::operation::{kind_of_any, owning_operation};
use bbs_core::raw::{RawLeaf, decode, encode};
use bbs_core::{AttributeId, StepData};
use bbs_tree::{StepChain, StepTree};

use crate::document::{ParamLeaf, StepEntry, StrategyDocument};
use crate::error::{Result, StrategyError};
use crate::parser::{load_strategy, save_strategy};

/// A loaded strategy: its name plus the step tree.
#[derive(Debug, Clone, Default)]
pub struct Strategy {
    pub name: String,
    pub description: String,
    pub tree: StepTree,
}

impl Strategy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Reads and converts a strategy file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_document(&load_strategy(path)?)
    }

    /// Converts and writes the strategy.
    pub fn save(&self, path: &Path) -> Result<()> {
        save_strategy(path, &self.to_document())
    }

    /// Builds the tree from a document.
    ///
    /// Steps may be listed in any order: each step is attached together with
    /// its ancestor chain, ancestors first, and steps already attached are
    /// left alone. Operation parameters are decoded once the whole tree
    /// exists, against the step's effective operation.
    pub fn from_document(doc: &StrategyDocument) -> Result<Self> {
        let mut entries: HashMap<&str, &StepEntry> = HashMap::with_capacity(doc.steps.len());
        for entry in &doc.steps {
            if entries.insert(entry.name.as_str(), entry).is_some() {
                return Err(StrategyError::DuplicateStep(entry.name.clone()));
            }
        }

        let mut fixed: HashMap<&str, StepData> = HashMap::with_capacity(doc.steps.len());
        for entry in &doc.steps {
            fixed.insert(entry.name.as_str(), decode_fixed(entry)?);
        }

        let mut tree = StepTree::new();
        for entry in &doc.steps {
            let chain = chain_for(entry, &entries, &fixed)?;
            tree.assure_in_collection(&chain)?;
        }

        for entry in &doc.steps {
            decode_operation_params(&mut tree, entry)?;
        }

        info!(strategy = %doc.strategy, steps = tree.len(), "built step tree");
        Ok(Self {
            name: doc.strategy.clone(),
            description: doc.description.clone(),
            tree,
        })
    }

    /// Flattens the tree into a document, steps depth-first.
    ///
    /// Operation parameters are written with the step's effective operation
    /// as prefix. Dormant ones (not in that operation's schema) keep the
    /// prefix of the operation that declares them, so they reload dormant.
    pub fn to_document(&self) -> StrategyDocument {
        let mut doc = StrategyDocument::new(self.name.clone());
        doc.description = self.description.clone();

        for (_, node) in self.tree.depth_first() {
            let operation = self.tree.effective_operation(node.name()).ok().flatten();
            let mut entry = StepEntry {
                name: node.name().to_string(),
                parent: node.parent().map(str::to_string),
                params: Default::default(),
            };

            for (attribute, value) in node.data().overrides() {
                let (kind, prefix) = match attribute {
                    AttributeId::OperationAttribute(key) => {
                        match operation.and_then(|op| op.schema().kind_of(key)) {
                            Some(kind) => (kind, operation),
                            None => match owning_operation(key) {
                                Some((owner, kind)) => {
                                    debug!(step = node.name(), key = %key, owner = owner.as_str(), "keeping dormant operation parameter");
                                    (kind, Some(owner))
                                }
                                None => {
                                    warn!(step = node.name(), key = %key, "skipping unknown operation parameter");
                                    continue;
                                }
                            },
                        }
                    }
                    fixed => match fixed.fixed_kind() {
                        Some(kind) => (kind, operation),
                        None => continue,
                    },
                };
                if let Some(raw) = encode(kind, value) {
                    entry
                        .params
                        .insert(attribute.parameter_key_for(prefix), ParamLeaf::from(raw));
                }
            }
            doc.steps.push(entry);
        }
        doc
    }
}

/// Decodes every non-operation parameter of a step.
fn decode_fixed(entry: &StepEntry) -> Result<StepData> {
    let mut data = StepData::new();
    for (key, leaf) in &entry.params {
        let attribute: AttributeId = key.parse().map_err(|e| StrategyError::param(&entry.name, e))?;
        let Some(kind) = attribute.fixed_kind() else {
            continue;
        };
        let raw = RawLeaf::from(leaf);
        let value = decode(&attribute, kind, Some(&raw)).map_err(|e| StrategyError::param(&entry.name, e))?;
        data.set(attribute, value);
    }
    Ok(data)
}

/// The step and its ancestors as a chain, checking parent links.
fn chain_for(
    entry: &StepEntry,
    entries: &HashMap<&str, &StepEntry>,
    fixed: &HashMap<&str, StepData>,
) -> Result<StepChain> {
    let mut lineage: Vec<&StepEntry> = vec![entry];
    let mut seen: HashSet<&str> = HashSet::from([entry.name.as_str()]);
    let mut current = entry;
    while let Some(parent) = current.parent.as_deref() {
        let next = entries.get(parent).ok_or_else(|| StrategyError::UnknownParent {
            step: current.name.clone(),
            parent: parent.to_string(),
        })?;
        if !seen.insert(parent) {
            return Err(StrategyError::Cycle {
                step: entry.name.clone(),
            });
        }
        lineage.push(next);
        current = next;
    }

    let data_of = |e: &StepEntry| fixed.get(e.name.as_str()).cloned().unwrap_or_default();
    let mut links = lineage.into_iter().rev();
    let mut chain = match links.next() {
        Some(root) => StepChain::root(root.name.clone(), data_of(root)),
        None => StepChain::root(entry.name.clone(), data_of(entry)),
    };
    for link in links {
        chain = StepChain::child_of(chain, link.name.clone(), data_of(link));
    }
    Ok(chain)
}

/// Decodes the operation parameters of an attached step.
fn decode_operation_params(tree: &mut StepTree, entry: &StepEntry) -> Result<()> {
    let operation = tree.effective_operation(&entry.name)?;
    let mut data = tree.step(&entry.name)?.data().clone();
    let mut changed = false;

    for (key, leaf) in &entry.params {
        let attribute: AttributeId = key.parse().map_err(|e| StrategyError::param(&entry.name, e))?;
        let Some(op_key) = attribute.operation_key() else {
            continue;
        };
        let kind = match operation.and_then(|op| op.schema().kind_of(op_key)) {
            Some(kind) => kind,
            None => match kind_of_any(op_key) {
                Some(kind) => {
                    warn!(step = %entry.name, key = op_key, "operation parameter is dormant for the step's operation");
                    kind
                }
                None => {
                    warn!(step = %entry.name, key = op_key, "skipping unknown operation parameter");
                    continue;
                }
            },
        };
        let raw = RawLeaf::from(leaf);
        let value = decode(&attribute, kind, Some(&raw)).map_err(|e| StrategyError::param(&entry.name, e))?;
        data.set(attribute, value);
        changed = true;
    }

    if changed {
        tree.overwrite_data(&entry.name, data)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_yaml;
    use bbs_core::{AttributeValue, OperationKind, Value};
    use bbs_tree::ResolvedValue;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"
strategy: calibration
steps:
  - name: Solve1
    parent: Root
    params:
      Operation: SOLVE
      Solve.MaxIter: 20
      Sources: { value: ">>Observation.Sources", ref: true }
  - name: Root
    params:
      Integration.Time: "10.0"
      Integration.Freq: -1
      Sources: "[CasA,CygA]"
      Output.Column: ""
  - name: Predict1
    parent: Root
"#;

    fn load() -> Strategy {
        Strategy::from_document(&parse_yaml(DOC).unwrap()).unwrap()
    }

    #[test]
    fn steps_attach_in_any_order() {
        let strategy = load();
        let tree = &strategy.tree;
        assert_eq!(tree.roots(), ["Root".to_string()]);
        assert_eq!(
            tree.step("Root").unwrap().children(),
            ["Solve1".to_string(), "Predict1".to_string()]
        );
    }

    #[test]
    fn leaves_decode_to_attribute_states() {
        let strategy = load();
        let root = strategy.tree.step("Root").unwrap().data();
        assert_eq!(
            root.get(&AttributeId::IntegrationTime),
            &AttributeValue::Explicit(Value::Number(10.0))
        );
        assert!(root.get(&AttributeId::IntegrationFrequency).is_unset());
        assert_eq!(root.get(&AttributeId::OutputDataColumn), &AttributeValue::ExplicitEmpty);

        // reference leaves inherit
        let solve = strategy.tree.step("Solve1").unwrap().data();
        assert!(solve.get(&AttributeId::Sources).is_unset());
        assert_eq!(
            strategy.tree.resolve("Solve1", &AttributeId::Sources).unwrap(),
            ResolvedValue::Inherited {
                value: Value::List(vec!["CasA".into(), "CygA".into()]),
                from: "Root".into(),
            }
        );
        assert_eq!(
            strategy.tree.resolve("Solve1", &AttributeId::op("MaxIter")).unwrap(),
            ResolvedValue::DefinedHere(Value::Integer(20))
        );
    }

    #[test]
    fn structural_errors() {
        let dangling = "strategy: s\nsteps:\n  - name: A\n    parent: Ghost\n";
        assert!(matches!(
            Strategy::from_document(&parse_yaml(dangling).unwrap()),
            Err(StrategyError::UnknownParent { .. })
        ));

        let cyclic = "strategy: s\nsteps:\n  - name: A\n    parent: B\n  - name: B\n    parent: A\n";
        assert!(matches!(
            Strategy::from_document(&parse_yaml(cyclic).unwrap()),
            Err(StrategyError::Cycle { .. })
        ));

        let twice = "strategy: s\nsteps:\n  - name: A\n  - name: A\n";
        assert!(matches!(
            Strategy::from_document(&parse_yaml(twice).unwrap()),
            Err(StrategyError::DuplicateStep(_))
        ));
    }

    #[test]
    fn malformed_numbers_name_the_step() {
        let doc = "strategy: s\nsteps:\n  - name: A\n    params:\n      Integration.Time: soon\n";
        let err = Strategy::from_document(&parse_yaml(doc).unwrap()).unwrap_err();
        match err {
            StrategyError::InvalidParam { step, source } => {
                assert_eq!(step, "A");
                assert!(matches!(source, bbs_core::EngineError::MalformedNumericInput { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dormant_parameters_survive_a_save() {
        let doc = "strategy: s\nsteps:\n  - name: A\n    params:\n      Operation: PREDICT\n      Solve.MaxIter: 3\n";
        let strategy = Strategy::from_document(&parse_yaml(doc).unwrap()).unwrap();
        assert_eq!(strategy.tree.dormant_attributes("A").unwrap(), vec!["MaxIter"]);

        let saved = strategy.to_document();
        assert!(saved.steps[0].params.contains_key("Solve.MaxIter"));
        assert!(saved.steps[0].params.contains_key("Operation"));

        let mut again = Strategy::from_document(&saved).unwrap();
        assert_eq!(again.tree.dormant_attributes("A").unwrap(), vec!["MaxIter"]);

        // re-selecting the owning operation wakes the parameter up
        again
            .tree
            .set_attribute_text("A", &AttributeId::OperationName, "SOLVE")
            .unwrap();
        assert_eq!(
            again.tree.resolve("A", &AttributeId::op("MaxIter")).unwrap(),
            ResolvedValue::DefinedHere(Value::Integer(3))
        );
    }

    #[test]
    fn document_round_trip_preserves_resolution() {
        let strategy = load();
        let doc = strategy.to_document();
        assert_eq!(doc.steps[0].name, "Root");
        assert!(doc.steps[1].params.contains_key("Solve.MaxIter"));

        let again = Strategy::from_document(&doc).unwrap();
        assert_eq!(again.tree.snapshot(), strategy.tree.snapshot());
        assert_eq!(
            again.tree.effective_operation("Solve1").unwrap(),
            Some(OperationKind::Solve)
        );
    }

    #[test]
    fn load_and_save_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strategy.toml");
        load().save(&path).unwrap();
        let loaded = Strategy::load(&path).unwrap();
        assert_eq!(loaded.name, "calibration");
        assert_eq!(loaded.tree.snapshot(), load().tree.snapshot());
    }
}
