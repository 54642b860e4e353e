//! Structural snapshots of a tree, for comparison and display.

use serde::Serialize;

use bbs_core::AttributeValue;

use crate::tree::StepTree;

/// One step with its stored overrides and its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub name: String,
    /// `(attribute, stored state)` pairs, in attribute order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// The whole forest, roots in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSnapshot {
    pub roots: Vec<NodeSnapshot>,
}

impl TreeSnapshot {
    /// Total number of steps in the snapshot.
    pub fn len(&self) -> usize {
        fn count(node: &NodeSnapshot) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl StepTree {
    /// Captures names, structure and stored data. Two trees with equal
    /// snapshots resolve every attribute of every step identically.
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            roots: self.roots.iter().filter_map(|r| self.snapshot_node(r)).collect(),
        }
    }

    fn snapshot_node(&self, name: &str) -> Option<NodeSnapshot> {
        let node = self.get(name)?;
        let overrides = node
            .data
            .overrides()
            .map(|(id, value)| {
                let text = match value {
                    AttributeValue::Explicit(v) => v.to_string(),
                    AttributeValue::ExplicitEmpty => "(empty)".to_string(),
                    AttributeValue::Unset => "(unset)".to_string(),
                };
                (id.to_string(), text)
            })
            .collect();
        Some(NodeSnapshot {
            name: node.name.clone(),
            overrides,
            children: node
                .children
                .iter()
                .filter_map(|c| self.snapshot_node(c))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NewStep;
    use bbs_core::{AttributeId, StepData, Value};

    #[test]
    fn snapshot_reflects_structure_and_data() {
        let mut tree = StepTree::new();
        tree.insert(
            None,
            NewStep::with_data(
                "Root",
                StepData::new()
                    .with_value(AttributeId::IntegrationTime, Value::Number(10.0))
                    .with(AttributeId::Sources, AttributeValue::ExplicitEmpty),
            ),
        )
        .unwrap();
        tree.insert(Some("Root"), NewStep::new("Child")).unwrap();

        let snap = tree.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.roots[0].children[0].name, "Child");
        assert_eq!(
            snap.roots[0].overrides,
            vec![
                ("Sources".to_string(), "(empty)".to_string()),
                ("Integration.Time".to_string(), "10".to_string()),
            ]
        );

        let json = serde_json::to_value(&snap).unwrap();
        assert!(json["roots"][0]["children"][0].get("overrides").is_none());
    }
}
