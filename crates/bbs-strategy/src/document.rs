//! Strategy document model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use bbs_core::raw::RawLeaf;

/// Root structure of a strategy file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDocument {
    /// Strategy name.
    pub strategy: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Steps in any order; parents need not come first.
    #[serde(default)]
    pub steps: Vec<StepEntry>,
}

impl StrategyDocument {
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            description: String::new(),
            steps: Vec::new(),
        }
    }
}

/// One step with its raw parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepEntry {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Parameter key (`Integration.Time`, `Solve.MaxIter`, ...) to leaf.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, ParamLeaf>,
}

/// A parameter leaf: a bare scalar, or a table marking a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamLeaf {
    Literal(Scalar),
    Table {
        value: Scalar,
        #[serde(rename = "ref", default)]
        is_ref: bool,
    },
}

/// Scalars as authors write them. Everything is reduced to text before
/// decoding, so `10`, `10.0` and `"10.0"` mean the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Flag(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(",")),
        }
    }
}

impl From<&ParamLeaf> for RawLeaf {
    fn from(leaf: &ParamLeaf) -> Self {
        match leaf {
            ParamLeaf::Literal(s) => RawLeaf::literal(s.to_string()),
            ParamLeaf::Table { value, is_ref: false } => RawLeaf::literal(value.to_string()),
            ParamLeaf::Table { value, is_ref: true } => RawLeaf::reference(value.to_string()),
        }
    }
}

impl From<RawLeaf> for ParamLeaf {
    fn from(leaf: RawLeaf) -> Self {
        if leaf.is_ref {
            ParamLeaf::Table {
                value: Scalar::Text(leaf.value),
                is_ref: true,
            }
        } else {
            ParamLeaf::Literal(Scalar::infer(leaf.value))
        }
    }
}

impl Scalar {
    /// Picks the most specific scalar whose text form is exactly `text`, so
    /// written files read naturally and decode to the same text.
    pub fn infer(text: String) -> Self {
        if let Ok(flag) = text.parse::<bool>() {
            return Self::Flag(flag);
        }
        if let Ok(i) = text.parse::<i64>() {
            if i.to_string() == text {
                return Self::Integer(i);
            }
        }
        if let Ok(n) = text.parse::<f64>() {
            if n.is_finite() && n.to_string() == text {
                return Self::Number(n);
            }
        }
        if let Some(inner) = text.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            let items: Vec<String> = if inner.is_empty() {
                Vec::new()
            } else {
                inner.split(',').map(str::to_string).collect()
            };
            let list = Self::List(items);
            if list.to_string() == text {
                return list;
            }
        }
        Self::Text(text)
    }
}
