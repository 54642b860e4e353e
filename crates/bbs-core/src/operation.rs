//! Per-operation attribute schemas.
//!
//! Every [`OperationKind`] owns a fixed table of attribute keys and their
//! value kinds. Operation attributes of a step are only meaningful while the
//! step's effective operation has the key in its schema.

use crate::enums::OperationKind;
use crate::value::ValueKind;

/// One entry of an operation schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaEntry {
    pub key: &'static str,
    pub kind: ValueKind,
}

const fn entry(key: &'static str, kind: ValueKind) -> SchemaEntry {
    SchemaEntry { key, kind }
}

const NO_ATTRIBUTES: &[SchemaEntry] = &[];

const SOLVE: &[SchemaEntry] = &[
    entry("MaxIter", ValueKind::Integer),
    entry("EpsValue", ValueKind::Number),
    entry("EpsDerivative", ValueKind::Number),
    entry("MinConverged", ValueKind::Number),
    entry("UseSVD", ValueKind::Flag),
    entry("Parms", ValueKind::List),
    entry("ExclParms", ValueKind::List),
    entry("DomainSize.Freq", ValueKind::Number),
    entry("DomainSize.Time", ValueKind::Number),
    entry("CellSize.Freq", ValueKind::Integer),
    entry("CellSize.Time", ValueKind::Integer),
    entry("CellChunkSize", ValueKind::Integer),
    entry("PropagateSolutions", ValueKind::Flag),
];

const SHIFT: &[SchemaEntry] = &[entry("Directions", ValueKind::List)];

const NOISE: &[SchemaEntry] = &[entry("Sigma", ValueKind::Number)];

/// The attribute schema of one operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSchema {
    pub operation: OperationKind,
    pub entries: &'static [SchemaEntry],
}

impl OperationSchema {
    /// Returns the kind declared for `key`, if the key belongs to the schema.
    pub fn kind_of(&self, key: &str) -> Option<ValueKind> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.kind)
    }

    /// Returns `true` if `key` belongs to the schema.
    pub fn contains(&self, key: &str) -> bool {
        self.kind_of(key).is_some()
    }

    /// Returns the schema keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    /// Returns `true` if the operation takes no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OperationKind {
    /// Returns the attribute schema of this operation.
    pub fn schema(&self) -> OperationSchema {
        let entries = match self {
            Self::Solve => SOLVE,
            Self::Shift => SHIFT,
            Self::Noise => NOISE,
            Self::Predict | Self::Subtract | Self::Correct | Self::Refit => NO_ATTRIBUTES,
        };
        OperationSchema {
            operation: *self,
            entries,
        }
    }
}

/// Looks up the kind of an operation attribute key across all schemas.
///
/// Used when an attribute is met without a known operation (e.g. while
/// loading a step whose operation is inherited).
pub fn kind_of_any(key: &str) -> Option<ValueKind> {
    OperationKind::ALL
        .iter()
        .find_map(|op| op.schema().kind_of(key))
}

/// Returns the operation whose schema declares `key`, with the key's kind.
///
/// Keys are unique across schemas, so the owner is unambiguous.
pub fn owning_operation(key: &str) -> Option<(OperationKind, ValueKind)> {
    OperationKind::ALL
        .iter()
        .find_map(|op| op.schema().kind_of(key).map(|kind| (*op, kind)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_schema_has_numeric_keys() {
        let schema = OperationKind::Solve.schema();
        assert_eq!(schema.kind_of("MaxIter"), Some(ValueKind::Integer));
        assert_eq!(schema.kind_of("DomainSize.Time"), Some(ValueKind::Number));
        assert!(!schema.contains("Directions"));
        assert_eq!(schema.keys().next(), Some("MaxIter"));
    }

    #[test]
    fn attribute_free_operations() {
        for op in [OperationKind::Predict, OperationKind::Subtract, OperationKind::Correct] {
            assert!(op.schema().is_empty());
        }
        assert_eq!(OperationKind::Noise.schema().kind_of("Sigma"), Some(ValueKind::Number));
    }

    #[test]
    fn lookup_across_schemas() {
        assert_eq!(kind_of_any("Directions"), Some(ValueKind::List));
        assert_eq!(kind_of_any("UseSVD"), Some(ValueKind::Flag));
        assert_eq!(kind_of_any("Nonsense"), None);
    }

    #[test]
    fn keys_have_a_single_owner() {
        assert_eq!(
            owning_operation("MaxIter"),
            Some((OperationKind::Solve, ValueKind::Integer))
        );
        assert_eq!(
            owning_operation("Directions"),
            Some((OperationKind::Shift, ValueKind::List))
        );
        assert_eq!(owning_operation("Nonsense"), None);

        for op in OperationKind::ALL {
            for key in op.schema().keys() {
                assert_eq!(owning_operation(key).map(|(owner, _)| owner), Some(*op));
            }
        }
    }
}
