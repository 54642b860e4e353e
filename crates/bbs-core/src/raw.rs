//! Translation between raw parameter leaves and attribute states.
//!
//! A parameter database hands out leaves as text plus a flag telling whether
//! the text is a literal or a reference to another parameter. Translation is
//! pure: it happens once when a step is loaded and once when it is saved.

use tracing::debug;

use crate::attribute::{AttributeId, AttributeValue};
use crate::error::{EngineError, Result};
use crate::value::{Value, ValueKind};

/// One raw parameter leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLeaf {
    pub value: String,
    pub is_ref: bool,
}

impl RawLeaf {
    /// A literal leaf.
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_ref: false,
        }
    }

    /// A leaf referring to another parameter.
    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            value: target.into(),
            is_ref: true,
        }
    }
}

/// Parses textual input for `attribute` as a value of `kind`.
///
/// Numeric failures become [`EngineError::MalformedNumericInput`], all other
/// failures [`EngineError::InvalidInput`].
pub fn parse_input(attribute: &AttributeId, kind: ValueKind, input: &str) -> Result<Value> {
    Value::parse(kind, input).map_err(|e| {
        if e.is_numeric() {
            EngineError::MalformedNumericInput {
                attribute: attribute.to_string(),
                input: input.to_owned(),
            }
        } else {
            EngineError::InvalidInput {
                attribute: attribute.to_string(),
                reason: e.to_string(),
            }
        }
    })
}

/// Decides `Unset` vs explicit state for a raw leaf.
///
/// - no leaf, a reference leaf, or blank input for a kind without an empty
///   sentinel: `Unset`
/// - a negative number for integration time/frequency: `Unset`
/// - an empty list/text: `ExplicitEmpty`
pub fn decode(attribute: &AttributeId, kind: ValueKind, leaf: Option<&RawLeaf>) -> Result<AttributeValue<Value>> {
    let Some(leaf) = leaf else {
        return Ok(AttributeValue::Unset);
    };
    if leaf.is_ref {
        debug!(%attribute, target = %leaf.value, "reference leaf decoded as unset");
        return Ok(AttributeValue::Unset);
    }
    if leaf.value.trim().is_empty() && !kind.has_empty() {
        return Ok(AttributeValue::Unset);
    }

    let value = parse_input(attribute, kind, &leaf.value)?;
    if is_sentinel(attribute, &value) {
        return Ok(AttributeValue::Unset);
    }
    Ok(AttributeValue::Explicit(value).normalized(kind))
}

/// Reverse of [`decode`]: `Unset` produces no leaf.
pub fn encode(kind: ValueKind, value: &AttributeValue<Value>) -> Option<RawLeaf> {
    value.effective(kind).map(|v| RawLeaf::literal(v.to_string()))
}

/// Returns `true` if `value` is the legacy "not set here" number of
/// `attribute`.
pub fn is_sentinel(attribute: &AttributeId, value: &Value) -> bool {
    attribute.has_numeric_sentinel() && value.as_number().is_some_and(|n| n < 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::CorrelationSelection;
    use pretty_assertions::assert_eq;

    fn lit(s: &str) -> Option<RawLeaf> {
        Some(RawLeaf::literal(s))
    }

    #[test]
    fn missing_and_reference_leaves_are_unset() {
        assert_eq!(
            decode(&AttributeId::Sources, ValueKind::List, None).unwrap(),
            AttributeValue::Unset
        );
        let reference = RawLeaf::reference("Observation.Sources");
        assert_eq!(
            decode(&AttributeId::Sources, ValueKind::List, Some(&reference)).unwrap(),
            AttributeValue::Unset
        );
    }

    #[test]
    fn numeric_sentinel_folds_to_unset() {
        let attr = AttributeId::IntegrationTime;
        assert_eq!(
            decode(&attr, ValueKind::Number, lit("-1").as_ref()).unwrap(),
            AttributeValue::Unset
        );
        assert_eq!(
            decode(&attr, ValueKind::Number, lit("10.0").as_ref()).unwrap(),
            AttributeValue::Explicit(Value::Number(10.0))
        );
        assert_eq!(
            decode(&attr, ValueKind::Number, lit("").as_ref()).unwrap(),
            AttributeValue::Unset
        );
    }

    #[test]
    fn malformed_numbers_are_reported() {
        let err = decode(&AttributeId::IntegrationFrequency, ValueKind::Number, lit("fast").as_ref())
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::MalformedNumericInput {
                attribute: "Integration.Freq".into(),
                input: "fast".into(),
            }
        );
    }

    #[test]
    fn empty_collections_become_explicit_empty() {
        assert_eq!(
            decode(&AttributeId::Sources, ValueKind::List, lit("[]").as_ref()).unwrap(),
            AttributeValue::ExplicitEmpty
        );
        assert_eq!(
            decode(&AttributeId::OutputDataColumn, ValueKind::Text, lit("").as_ref()).unwrap(),
            AttributeValue::ExplicitEmpty
        );
        assert_eq!(
            decode(&AttributeId::CorrelationSelection, ValueKind::Selection, lit("").as_ref()).unwrap(),
            AttributeValue::Unset
        );
    }

    #[test]
    fn encode_reverses_decode() {
        let cases = [
            (AttributeId::Sources, ValueKind::List, "[CasA,CygA]"),
            (AttributeId::Sources, ValueKind::List, "[]"),
            (AttributeId::OutputDataColumn, ValueKind::Text, "MODEL_DATA"),
            (AttributeId::CorrelationSelection, ValueKind::Selection, "CROSS"),
            (AttributeId::Baselines, ValueKind::Baselines, "[CS001&CS002]"),
        ];
        for (attr, kind, text) in cases {
            let decoded = decode(&attr, kind, lit(text).as_ref()).unwrap();
            assert_eq!(encode(kind, &decoded), Some(RawLeaf::literal(text)), "{}", attr);
        }
        assert_eq!(encode(ValueKind::List, &AttributeValue::Unset), None);
        assert_eq!(
            decode(&AttributeId::CorrelationSelection, ValueKind::Selection, lit("all").as_ref()).unwrap(),
            AttributeValue::Explicit(Value::Selection(CorrelationSelection::All))
        );
    }
}
