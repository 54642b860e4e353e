//! Attribute payloads.
//!
//! [`Value`] is the dynamic payload stored inside an
//! [`AttributeValue`](crate::attribute::AttributeValue). Each attribute
//! declares a [`ValueKind`] and only values of that kind may be stored for it.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enums::{CorrelationSelection, OperationKind, ParseEnumError, Polarization};

/// The declared type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Ordered list of names (sources, instrument model parts, parameters).
    List,
    /// Free text (data column name).
    Text,
    /// Floating point number.
    Number,
    /// Whole number.
    Integer,
    /// Boolean switch.
    Flag,
    /// List of station pairs.
    Baselines,
    /// Set of polarization products.
    Correlations,
    /// Auto / cross / all correlation selection.
    Selection,
    /// Operation kind.
    Operation,
}

impl ValueKind {
    /// Returns the value that stands for "empty / disabled" in this kind, or
    /// `None` when the kind has no empty sentinel.
    pub fn empty_value(&self) -> Option<Value> {
        match self {
            Self::List => Some(Value::List(Vec::new())),
            Self::Text => Some(Value::Text(String::new())),
            Self::Baselines => Some(Value::Baselines(Vec::new())),
            Self::Correlations => Some(Value::Correlations(BTreeSet::new())),
            Self::Number | Self::Integer | Self::Flag | Self::Selection | Self::Operation => None,
        }
    }

    /// Returns `true` if the kind has an empty sentinel.
    pub fn has_empty(&self) -> bool {
        self.empty_value().is_some()
    }

    /// Returns `true` for numeric kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Integer)
    }

    /// Returns the lower-case name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Text => "text",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Flag => "flag",
            Self::Baselines => "baselines",
            Self::Correlations => "correlations",
            Self::Selection => "selection",
            Self::Operation => "operation",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pair of stations forming one baseline, written `A&B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BaselinePair {
    pub first: String,
    pub second: String,
}

impl BaselinePair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

impl fmt::Display for BaselinePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}&{}", self.first, self.second)
    }
}

impl FromStr for BaselinePair {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, second) = s
            .split_once('&')
            .ok_or_else(|| ParseValueError::InvalidBaseline(s.to_owned()))?;
        let (first, second) = (first.trim(), second.trim());
        if first.is_empty() || second.is_empty() {
            return Err(ParseValueError::InvalidBaseline(s.to_owned()));
        }
        Ok(Self::new(first, second))
    }
}

/// A concrete attribute payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    List(Vec<String>),
    Text(String),
    Number(f64),
    Integer(i64),
    Flag(bool),
    Baselines(Vec<BaselinePair>),
    Correlations(BTreeSet<Polarization>),
    Selection(CorrelationSelection),
    Operation(OperationKind),
}

impl Value {
    /// Returns the kind of this payload.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::List(_) => ValueKind::List,
            Self::Text(_) => ValueKind::Text,
            Self::Number(_) => ValueKind::Number,
            Self::Integer(_) => ValueKind::Integer,
            Self::Flag(_) => ValueKind::Flag,
            Self::Baselines(_) => ValueKind::Baselines,
            Self::Correlations(_) => ValueKind::Correlations,
            Self::Selection(_) => ValueKind::Selection,
            Self::Operation(_) => ValueKind::Operation,
        }
    }

    /// Returns `true` if this is the empty sentinel of its kind.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(v) => v.is_empty(),
            Self::Text(s) => s.is_empty(),
            Self::Baselines(v) => v.is_empty(),
            Self::Correlations(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Returns the operation kind if this is an `Operation` payload.
    pub fn as_operation(&self) -> Option<OperationKind> {
        match self {
            Self::Operation(op) => Some(*op),
            _ => None,
        }
    }

    /// Returns the number if this is a `Number` payload.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the list items if this is a `List` payload.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Parses textual input as a value of the given kind.
    ///
    /// Lists accept `[a,b]` or `a,b`; surrounding quotes on items are removed.
    pub fn parse(kind: ValueKind, input: &str) -> Result<Self, ParseValueError> {
        let trimmed = input.trim();
        match kind {
            ValueKind::List => Ok(Self::List(split_list(trimmed))),
            ValueKind::Text => Ok(Self::Text(unquote(trimmed).to_owned())),
            ValueKind::Number => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Self::Number)
                .ok_or_else(|| ParseValueError::NotANumber(input.to_owned())),
            ValueKind::Integer => trimmed
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|_| ParseValueError::NotAnInteger(input.to_owned())),
            ValueKind::Flag => parse_flag(trimmed)
                .map(Self::Flag)
                .ok_or_else(|| ParseValueError::NotAFlag(input.to_owned())),
            ValueKind::Baselines => split_list(trimmed)
                .iter()
                .map(|item| item.parse::<BaselinePair>())
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Baselines),
            ValueKind::Correlations => split_list(trimmed)
                .iter()
                .map(|item| item.parse::<Polarization>())
                .collect::<Result<BTreeSet<_>, _>>()
                .map(Self::Correlations)
                .map_err(ParseValueError::from),
            ValueKind::Selection => Ok(Self::Selection(trimmed.parse()?)),
            ValueKind::Operation => Ok(Self::Operation(trimmed.parse()?)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(items) => write_list(f, items.iter()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Flag(b) => write!(f, "{}", b),
            Self::Baselines(pairs) => write_list(f, pairs.iter()),
            Self::Correlations(set) => write_list(f, set.iter()),
            Self::Selection(sel) => f.write_str(sel.as_str()),
            Self::Operation(op) => f.write_str(op.as_str()),
        }
    }
}

/// Errors produced when textual input does not fit a [`ValueKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseValueError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not an integer")]
    NotAnInteger(String),

    #[error("'{0}' is not a boolean (use true/false)")]
    NotAFlag(String),

    #[error("'{0}' is not a baseline (use STATION1&STATION2)")]
    InvalidBaseline(String),

    #[error(transparent)]
    Enum(#[from] ParseEnumError),
}

impl ParseValueError {
    /// Returns `true` when numeric input was malformed.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::NotANumber(_) | Self::NotAnInteger(_))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn write_list<I, T>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: Iterator<Item = T>,
    T: fmt::Display,
{
    f.write_str("[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

fn split_list(s: &str) -> Vec<String> {
    let inner = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(s);
    inner
        .split(',')
        .map(|part| unquote(part.trim()).trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn list_parsing_accepts_brackets_and_quotes() {
        assert_eq!(
            Value::parse(ValueKind::List, "[CasA, 'CygA']").unwrap(),
            Value::List(vec!["CasA".into(), "CygA".into()])
        );
        assert_eq!(
            Value::parse(ValueKind::List, "3C196").unwrap(),
            Value::List(vec!["3C196".into()])
        );
        assert_eq!(Value::parse(ValueKind::List, "[]").unwrap(), Value::List(vec![]));
    }

    #[test]
    fn numeric_parsing() {
        assert_eq!(Value::parse(ValueKind::Number, " 2.5 ").unwrap(), Value::Number(2.5));
        assert_eq!(Value::parse(ValueKind::Integer, "20").unwrap(), Value::Integer(20));
        let err = Value::parse(ValueKind::Number, "ten").unwrap_err();
        assert!(err.is_numeric());
        assert!(Value::parse(ValueKind::Number, "NaN").is_err());
        assert!(Value::parse(ValueKind::Integer, "2.5").unwrap_err().is_numeric());
    }

    #[test]
    fn baselines_and_correlations() {
        assert_eq!(
            Value::parse(ValueKind::Baselines, "[CS001&CS002,RS106 & RS205]").unwrap(),
            Value::Baselines(vec![
                BaselinePair::new("CS001", "CS002"),
                BaselinePair::new("RS106", "RS205"),
            ])
        );
        assert!(matches!(
            Value::parse(ValueKind::Baselines, "[CS001]"),
            Err(ParseValueError::InvalidBaseline(_))
        ));
        let corr = Value::parse(ValueKind::Correlations, "[YY,XX,YY]").unwrap();
        assert_eq!(corr.to_string(), "[XX,YY]");
        assert!(!corr.is_empty());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let values = [
            Value::List(vec!["a".into(), "b".into()]),
            Value::Number(10.0),
            Value::Flag(false),
            Value::Selection(CorrelationSelection::Cross),
            Value::Operation(OperationKind::Solve),
            Value::Baselines(vec![BaselinePair::new("A", "B")]),
        ];
        for value in values {
            let text = value.to_string();
            assert_eq!(Value::parse(value.kind(), &text).unwrap(), value);
        }
    }

    #[test]
    fn empty_sentinels() {
        assert_eq!(ValueKind::Text.empty_value(), Some(Value::Text(String::new())));
        assert!(ValueKind::Number.empty_value().is_none());
        assert!(ValueKind::Correlations.has_empty());
        assert!(Value::Correlations(BTreeSet::new()).is_empty());
        assert!(!Value::Number(0.0).is_empty());
    }
}
