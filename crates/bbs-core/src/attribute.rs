//! Attribute identifiers and the tri-state [`AttributeValue`] wrapper.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enums::OperationKind;
use crate::error::EngineError;
use crate::value::{Value, ValueKind};

/// Identifies one configurable attribute of a step.
///
/// The set is closed; only `OperationAttribute` carries a dynamic key whose
/// validity depends on the operation selected for the step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "attribute", content = "key", rename_all = "snake_case")]
pub enum AttributeId {
    Sources,
    InstrumentModel,
    OutputDataColumn,
    IntegrationTime,
    IntegrationFrequency,
    CorrelationType,
    CorrelationSelection,
    Baselines,
    OperationName,
    OperationAttribute(String),
}

impl AttributeId {
    /// Every attribute that is not operation specific, in display order.
    pub const FIXED: [AttributeId; 9] = [
        AttributeId::Sources,
        AttributeId::InstrumentModel,
        AttributeId::OutputDataColumn,
        AttributeId::IntegrationTime,
        AttributeId::IntegrationFrequency,
        AttributeId::CorrelationType,
        AttributeId::CorrelationSelection,
        AttributeId::Baselines,
        AttributeId::OperationName,
    ];

    /// Builds an operation attribute identifier.
    pub fn op(key: impl Into<String>) -> Self {
        Self::OperationAttribute(key.into())
    }

    /// Returns the declared kind of a fixed attribute, or `None` for an
    /// operation attribute (its kind comes from the operation schema).
    pub fn fixed_kind(&self) -> Option<ValueKind> {
        Some(match self {
            Self::Sources | Self::InstrumentModel => ValueKind::List,
            Self::OutputDataColumn => ValueKind::Text,
            Self::IntegrationTime | Self::IntegrationFrequency => ValueKind::Number,
            Self::CorrelationType => ValueKind::Correlations,
            Self::CorrelationSelection => ValueKind::Selection,
            Self::Baselines => ValueKind::Baselines,
            Self::OperationName => ValueKind::Operation,
            Self::OperationAttribute(_) => return None,
        })
    }

    /// Returns `true` for attributes where a negative number is the legacy
    /// "not set here" marker.
    pub fn has_numeric_sentinel(&self) -> bool {
        matches!(self, Self::IntegrationTime | Self::IntegrationFrequency)
    }

    /// Returns the operation attribute key, if any.
    pub fn operation_key(&self) -> Option<&str> {
        match self {
            Self::OperationAttribute(key) => Some(key),
            _ => None,
        }
    }

    /// Returns the parameter name used in strategy documents.
    ///
    /// Operation attributes need the operation as prefix, see
    /// [`AttributeId::parameter_key_for`].
    pub fn parameter_key(&self) -> String {
        self.parameter_key_for(None)
    }

    /// Returns the parameter name, prefixing operation attributes with the
    /// given operation (or `Operation` when none is selected).
    pub fn parameter_key_for(&self, operation: Option<OperationKind>) -> String {
        match self {
            Self::Sources => "Sources".into(),
            Self::InstrumentModel => "InstrumentModel".into(),
            Self::OutputDataColumn => "Output.Column".into(),
            Self::IntegrationTime => "Integration.Time".into(),
            Self::IntegrationFrequency => "Integration.Freq".into(),
            Self::CorrelationType => "Correlation.Type".into(),
            Self::CorrelationSelection => "Correlation.Selection".into(),
            Self::Baselines => "Baselines".into(),
            Self::OperationName => "Operation".into(),
            Self::OperationAttribute(key) => {
                let prefix = operation.map_or("Operation", |op| op.prefix());
                format!("{}.{}", prefix, key)
            }
        }
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OperationAttribute(key) => write!(f, "op:{}", key),
            other => f.write_str(&other.parameter_key()),
        }
    }
}

impl FromStr for AttributeId {
    type Err = EngineError;

    /// Accepts parameter keys (`Integration.Time`), snake/kebab names
    /// (`integration_time`), `op:<key>` and `<Operation>.<key>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(key) = trimmed.strip_prefix("op:") {
            if !key.is_empty() {
                return Ok(Self::op(key));
            }
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '.' | '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let fixed = match normalized.as_str() {
            "sources" => Some(Self::Sources),
            "instrumentmodel" => Some(Self::InstrumentModel),
            "outputcolumn" | "outputdatacolumn" => Some(Self::OutputDataColumn),
            "integrationtime" => Some(Self::IntegrationTime),
            "integrationfreq" | "integrationfrequency" => Some(Self::IntegrationFrequency),
            "correlationtype" => Some(Self::CorrelationType),
            "correlationselection" => Some(Self::CorrelationSelection),
            "baselines" => Some(Self::Baselines),
            "operation" | "operationname" => Some(Self::OperationName),
            _ => None,
        };
        if let Some(id) = fixed {
            return Ok(id);
        }

        if let Some((prefix, key)) = trimmed.split_once('.') {
            let is_op_prefix = prefix.eq_ignore_ascii_case("operation")
                || prefix.parse::<OperationKind>().is_ok();
            if is_op_prefix && !key.is_empty() {
                return Ok(Self::op(key));
            }
        }

        Err(EngineError::UnknownAttribute(s.to_owned()))
    }
}

/// The stored state of one attribute on one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum AttributeValue<T> {
    /// Not set on this step: inherit from the parent.
    Unset,
    /// Explicitly set to the category's "empty / disabled" meaning.
    ExplicitEmpty,
    /// Explicitly set to a concrete value.
    Explicit(T),
}

impl<T> Default for AttributeValue<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> AttributeValue<T> {
    /// Returns `true` if the attribute inherits.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns `true` for both explicit states.
    pub fn is_override(&self) -> bool {
        !self.is_unset()
    }

    /// Returns the concrete value if one is stored.
    pub fn explicit(&self) -> Option<&T> {
        match self {
            Self::Explicit(v) => Some(v),
            _ => None,
        }
    }

    /// Maps the concrete value, keeping the state.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> AttributeValue<U> {
        match self {
            Self::Unset => AttributeValue::Unset,
            Self::ExplicitEmpty => AttributeValue::ExplicitEmpty,
            Self::Explicit(v) => AttributeValue::Explicit(f(v)),
        }
    }
}

impl AttributeValue<Value> {
    /// Collapses equivalent states for the given kind:
    /// - an explicit empty collection/string becomes `ExplicitEmpty`;
    /// - `ExplicitEmpty` for a kind without an empty sentinel becomes `Unset`.
    pub fn normalized(self, kind: ValueKind) -> Self {
        match self {
            Self::Explicit(v) if v.is_empty() => Self::ExplicitEmpty,
            Self::ExplicitEmpty if !kind.has_empty() => Self::Unset,
            other => other,
        }
    }

    /// Returns the value this state stands for, if it defines one.
    ///
    /// `ExplicitEmpty` yields the kind's empty sentinel; `Unset` (and an
    /// empty marker for a kind without a sentinel) yields `None`.
    pub fn effective(&self, kind: ValueKind) -> Option<Value> {
        match self {
            Self::Unset => None,
            Self::ExplicitEmpty => kind.empty_value(),
            Self::Explicit(v) => Some(v.clone()),
        }
    }
}
