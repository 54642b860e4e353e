//! Effective-value resolution.
//!
//! `resolve` looks at the step itself, then its parent, grandparent and so
//! on; the nearest step that does not leave the attribute `Unset` wins.
//! Values are never merged across levels. Resolution is O(depth) and reads
//! only the step's own ancestor chain.

use serde::Serialize;

use bbs_core::{AttributeId, AttributeValue, OperationKind, Result, StepData, Value, ValueKind};

use crate::tree::StepTree;

/// Where an effective value comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue<T> {
    /// The step overrides the attribute itself.
    DefinedHere(T),
    /// An ancestor (`from`) defines the value.
    Inherited { value: T, from: String },
    /// Nobody in the chain defines the attribute.
    Undefined,
}

/// The tri-state shown to users next to each value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveState {
    Defined,
    Inherited,
    Undefined,
}

impl<T> ResolvedValue<T> {
    pub fn state(&self) -> ResolveState {
        match self {
            Self::DefinedHere(_) => ResolveState::Defined,
            Self::Inherited { .. } => ResolveState::Inherited,
            Self::Undefined => ResolveState::Undefined,
        }
    }

    /// The effective value, wherever it comes from.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::DefinedHere(v) | Self::Inherited { value: v, .. } => Some(v),
            Self::Undefined => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::DefinedHere(v) | Self::Inherited { value: v, .. } => Some(v),
            Self::Undefined => None,
        }
    }

    /// Name of the ancestor that defines an inherited value.
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Inherited { from, .. } => Some(from),
            _ => None,
        }
    }

    pub fn is_defined_here(&self) -> bool {
        matches!(self, Self::DefinedHere(_))
    }

    pub fn is_inherited(&self) -> bool {
        matches!(self, Self::Inherited { .. })
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl ResolvedValue<Value> {
    /// The "use all" switch for list-like attributes: `Some(true)` when the
    /// effective value is the empty (unrestricted) list, `None` when the
    /// attribute is undefined.
    pub fn uses_all(&self) -> Option<bool> {
        self.value().map(Value::is_empty)
    }
}

/// One row of [`StepTree::resolve_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttribute {
    pub attribute: AttributeId,
    pub kind: ValueKind,
    pub resolved: ResolvedValue<Value>,
}

impl StepTree {
    /// Effective value of `attribute` for step `name`.
    ///
    /// Operation attributes resolve only while the step's effective
    /// operation has the key in its schema; otherwise they are `Undefined`.
    pub fn resolve(&self, name: &str, attribute: &AttributeId) -> Result<ResolvedValue<Value>> {
        self.step(name)?;
        Ok(match self.kind_at(name, attribute) {
            Some(kind) => self.walk(Some(name), name, attribute, kind),
            None => ResolvedValue::Undefined,
        })
    }

    /// The value `name` would have without its own override: the walk starts
    /// at the parent. Never returns `DefinedHere`.
    pub fn resolve_inherited(&self, name: &str, attribute: &AttributeId) -> Result<ResolvedValue<Value>> {
        let node = self.step(name)?;
        Ok(match self.kind_at(name, attribute) {
            Some(kind) => self.walk(node.parent(), name, attribute, kind),
            None => ResolvedValue::Undefined,
        })
    }

    /// The operation `name` effectively performs.
    pub fn effective_operation(&self, name: &str) -> Result<Option<OperationKind>> {
        self.step(name)?;
        Ok(self.operation_at(name))
    }

    /// Every fixed attribute followed by the keys of the active operation's
    /// schema.
    pub fn resolve_all(&self, name: &str) -> Result<Vec<ResolvedAttribute>> {
        self.step(name)?;
        let operation_keys = self
            .operation_at(name)
            .map(|op| op.schema().keys().map(AttributeId::op).collect::<Vec<_>>())
            .unwrap_or_default();

        Ok(AttributeId::FIXED
            .into_iter()
            .chain(operation_keys)
            .filter_map(|attribute| {
                let kind = self.kind_at(name, &attribute)?;
                let resolved = self.walk(Some(name), name, &attribute, kind);
                Some(ResolvedAttribute {
                    attribute,
                    kind,
                    resolved,
                })
            })
            .collect())
    }

    /// Operation attributes stored on `name` that do not resolve because the
    /// effective operation does not know them.
    pub fn dormant_attributes(&self, name: &str) -> Result<Vec<String>> {
        let node = self.step(name)?;
        let schema = self.operation_at(name).map(|op| op.schema());
        Ok(node
            .data()
            .operation_attributes()
            .filter(|(key, _)| !schema.is_some_and(|s| s.contains(key)))
            .map(|(key, _)| key.to_string())
            .collect())
    }

    /// Flattens the effective values of `name` into an all-explicit record,
    /// suitable for promoting the step to a root without changing what it
    /// resolves to.
    pub fn effective_data(&self, name: &str) -> Result<StepData> {
        let mut data = StepData::new();
        for row in self.resolve_all(name)? {
            if let Some(value) = row.resolved.into_value() {
                data.set(row.attribute, AttributeValue::Explicit(value).normalized(row.kind));
            }
        }
        Ok(data)
    }

    /// Declared kind of `attribute` as seen from step `name`.
    pub(crate) fn kind_at(&self, name: &str, attribute: &AttributeId) -> Option<ValueKind> {
        match attribute {
            AttributeId::OperationAttribute(key) => self.operation_at(name)?.schema().kind_of(key),
            fixed => fixed.fixed_kind(),
        }
    }

    fn operation_at(&self, name: &str) -> Option<OperationKind> {
        self.walk(Some(name), name, &AttributeId::OperationName, ValueKind::Operation)
            .value()
            .and_then(Value::as_operation)
    }

    /// Walks from `start` towards the root.
    pub(crate) fn walk(
        &self,
        start: Option<&str>,
        origin: &str,
        attribute: &AttributeId,
        kind: ValueKind,
    ) -> ResolvedValue<Value> {
        let mut current = start;
        while let Some(name) = current {
            let Some(node) = self.get(name) else {
                break;
            };
            if let Some(value) = node.data().get(attribute).effective(kind) {
                return if name == origin {
                    ResolvedValue::DefinedHere(value)
                } else {
                    ResolvedValue::Inherited {
                        value,
                        from: name.to_string(),
                    }
                };
            }
            current = node.parent();
        }
        ResolvedValue::Undefined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insert::AdoptChildren;
    use crate::node::NewStep;
    use bbs_core::{CorrelationSelection, Polarization};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn data() -> StepData {
        StepData::new()
    }

    fn number(n: f64) -> Value {
        Value::Number(n)
    }

    /// Root(time=10) -> A -> B
    fn chain() -> StepTree {
        let mut tree = StepTree::new();
        tree.insert(
            None,
            NewStep::with_data("Root", data().with_value(AttributeId::IntegrationTime, number(10.0))),
        )
        .unwrap();
        tree.insert(Some("Root"), NewStep::new("A")).unwrap();
        tree.insert(Some("A"), NewStep::new("B")).unwrap();
        tree
    }

    #[test]
    fn nearest_ancestor_wins() {
        let mut tree = chain();
        assert_eq!(
            tree.resolve("B", &AttributeId::IntegrationTime).unwrap(),
            ResolvedValue::Inherited {
                value: number(10.0),
                from: "Root".into(),
            }
        );

        tree.overwrite_data("A", data().with_value(AttributeId::IntegrationTime, number(2.0)))
            .unwrap();
        let resolved = tree.resolve("B", &AttributeId::IntegrationTime).unwrap();
        assert_eq!(resolved.value(), Some(&number(2.0)));
        assert_eq!(resolved.source(), Some("A"));
        assert_eq!(
            tree.resolve("A", &AttributeId::IntegrationTime).unwrap(),
            ResolvedValue::DefinedHere(number(2.0))
        );
    }

    #[test]
    fn undefined_when_nobody_defines() {
        let tree = chain();
        let resolved = tree.resolve("B", &AttributeId::OutputDataColumn).unwrap();
        assert!(resolved.is_undefined());
        assert_eq!(resolved.state(), ResolveState::Undefined);
        assert!(tree.resolve("Nope", &AttributeId::Sources).unwrap_err().is_not_found());
    }

    #[test]
    fn explicit_empty_stops_the_walk() {
        let mut tree = chain();
        tree.overwrite_data(
            "Root",
            data().with_value(AttributeId::Sources, Value::List(vec!["CasA".into()])),
        )
        .unwrap();
        tree.overwrite_data("A", data().with(AttributeId::Sources, AttributeValue::ExplicitEmpty))
            .unwrap();

        let resolved = tree.resolve("B", &AttributeId::Sources).unwrap();
        assert_eq!(
            resolved,
            ResolvedValue::Inherited {
                value: Value::List(vec![]),
                from: "A".into(),
            }
        );
        assert_eq!(resolved.uses_all(), Some(true));

        let root = tree.resolve("Root", &AttributeId::Sources).unwrap();
        assert_eq!(root.uses_all(), Some(false));
    }

    #[test]
    fn empty_marker_without_sentinel_is_skipped() {
        let mut tree = chain();
        tree.overwrite_data(
            "Root",
            data().with_value(
                AttributeId::CorrelationSelection,
                Value::Selection(CorrelationSelection::Cross),
            ),
        )
        .unwrap();
        tree.overwrite_data(
            "A",
            data().with(AttributeId::CorrelationSelection, AttributeValue::ExplicitEmpty),
        )
        .unwrap();
        let resolved = tree.resolve("B", &AttributeId::CorrelationSelection).unwrap();
        assert_eq!(resolved.source(), Some("Root"));
    }

    #[test]
    fn resolve_inherited_skips_own_override() {
        let mut tree = chain();
        tree.overwrite_data("B", data().with_value(AttributeId::IntegrationTime, number(5.0)))
            .unwrap();
        assert_eq!(
            tree.resolve_inherited("B", &AttributeId::IntegrationTime).unwrap(),
            ResolvedValue::Inherited {
                value: number(10.0),
                from: "Root".into(),
            }
        );
        assert!(
            tree.resolve_inherited("Root", &AttributeId::IntegrationTime)
                .unwrap()
                .is_undefined()
        );
    }

    #[test]
    fn resolution_ignores_unrelated_branches() {
        let mut tree = chain();
        tree.insert(Some("Root"), NewStep::new("Other")).unwrap();
        let before = tree.resolve("B", &AttributeId::IntegrationTime).unwrap();

        tree.overwrite_data("Other", data().with_value(AttributeId::IntegrationTime, number(99.0)))
            .unwrap();
        tree.insert(Some("Other"), NewStep::new("OtherChild")).unwrap();
        tree.remove("OtherChild", crate::RemoveMode::Subtree).unwrap();

        assert_eq!(tree.resolve("B", &AttributeId::IntegrationTime).unwrap(), before);
    }

    #[test]
    fn cascading_insertion_changes_descendants_without_touching_them() {
        let mut tree = chain();
        let stored_b = tree.step("B").unwrap().data().clone();

        tree.insert_between(
            Some("A"),
            NewStep::with_data("M", data().with_value(AttributeId::IntegrationTime, number(2.5))),
            AdoptChildren::All,
        )
        .unwrap();

        assert_eq!(
            tree.resolve("B", &AttributeId::IntegrationTime).unwrap(),
            ResolvedValue::Inherited {
                value: number(2.5),
                from: "M".into(),
            }
        );
        assert_eq!(tree.step("B").unwrap().data(), &stored_b);
    }

    #[test]
    fn detached_explicit_data_resolves_to_itself() {
        let mut corr = BTreeSet::new();
        corr.insert(Polarization::XX);
        let full = data()
            .with_value(AttributeId::Sources, Value::List(vec!["CasA".into()]))
            .with_value(AttributeId::InstrumentModel, Value::List(vec!["Gain".into()]))
            .with_value(AttributeId::OutputDataColumn, Value::Text("CORRECTED_DATA".into()))
            .with_value(AttributeId::IntegrationTime, number(1.0))
            .with_value(AttributeId::IntegrationFrequency, number(4.0))
            .with_value(AttributeId::CorrelationType, Value::Correlations(corr))
            .with_value(
                AttributeId::CorrelationSelection,
                Value::Selection(CorrelationSelection::All),
            )
            .with_value(
                AttributeId::Baselines,
                Value::Baselines(vec![bbs_core::BaselinePair::new("CS001", "CS002")]),
            )
            .with_value(AttributeId::OperationName, Value::Operation(OperationKind::Predict));

        let mut tree = StepTree::new();
        tree.insert(None, NewStep::with_data("Alone", full.clone())).unwrap();

        for row in tree.resolve_all("Alone").unwrap() {
            let stored = full.get(&row.attribute).explicit().cloned();
            assert_eq!(row.resolved, ResolvedValue::DefinedHere(stored.unwrap()));
        }
    }

    #[test]
    fn operation_attributes_are_scoped_to_the_active_operation() {
        let mut tree = chain();
        tree.overwrite_data(
            "Root",
            data()
                .with_value(AttributeId::OperationName, Value::Operation(OperationKind::Solve))
                .with_value(AttributeId::op("MaxIter"), Value::Integer(20)),
        )
        .unwrap();

        assert_eq!(
            tree.resolve("B", &AttributeId::op("MaxIter")).unwrap().value(),
            Some(&Value::Integer(20))
        );
        assert_eq!(tree.effective_operation("B").unwrap(), Some(OperationKind::Solve));

        tree.overwrite_data(
            "A",
            data().with_value(AttributeId::OperationName, Value::Operation(OperationKind::Predict)),
        )
        .unwrap();
        assert!(tree.resolve("B", &AttributeId::op("MaxIter")).unwrap().is_undefined());
        assert!(tree.resolve("Root", &AttributeId::op("Sigma")).unwrap().is_undefined());
    }

    #[test]
    fn resolve_all_lists_active_schema_keys() {
        let mut tree = chain();
        tree.overwrite_data(
            "A",
            data().with_value(AttributeId::OperationName, Value::Operation(OperationKind::Noise)),
        )
        .unwrap();
        let rows = tree.resolve_all("B").unwrap();
        assert_eq!(rows.len(), AttributeId::FIXED.len() + 1);
        assert_eq!(rows.last().unwrap().attribute, AttributeId::op("Sigma"));
        assert_eq!(rows.last().unwrap().kind, ValueKind::Number);
    }

    #[test]
    fn dormant_attributes_are_reported() {
        let mut tree = chain();
        tree.overwrite_data(
            "B",
            data()
                .with_value(AttributeId::OperationName, Value::Operation(OperationKind::Shift))
                .with_value(AttributeId::op("Directions"), Value::List(vec!["CasA".into()]))
                .with_value(AttributeId::op("MaxIter"), Value::Integer(3)),
        )
        .unwrap();
        assert_eq!(tree.dormant_attributes("B").unwrap(), vec!["MaxIter"]);
    }

    #[test]
    fn effective_data_flattens_inheritance() {
        let mut tree = chain();
        tree.overwrite_data(
            "A",
            data().with_value(AttributeId::OutputDataColumn, Value::Text("MODEL_DATA".into())),
        )
        .unwrap();
        let flat = tree.effective_data("B").unwrap();
        assert_eq!(flat.len(), 2);

        tree.insert(None, NewStep::with_data("Promoted", flat)).unwrap();
        for attribute in AttributeId::FIXED {
            assert_eq!(
                tree.resolve("Promoted", &attribute).unwrap().into_value(),
                tree.resolve("B", &attribute).unwrap().into_value(),
            );
        }
    }
}
