//! The per-step attribute record.

use std::collections::BTreeMap;

use crate::attribute::{AttributeId, AttributeValue};
use crate::value::Value;

static UNSET: AttributeValue<Value> = AttributeValue::Unset;

/// Mapping from attribute to its stored state on one step.
///
/// A missing entry means `Unset`; storing `Unset` removes the entry, so the
/// map only ever holds overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepData {
    values: BTreeMap<AttributeId, AttributeValue<Value>>,
}

impl StepData {
    /// Creates an all-`Unset` record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored state of `attribute`.
    pub fn get(&self, attribute: &AttributeId) -> &AttributeValue<Value> {
        self.values.get(attribute).unwrap_or(&UNSET)
    }

    /// Stores `value` for `attribute`, returning the previous state.
    pub fn set(&mut self, attribute: AttributeId, value: AttributeValue<Value>) -> AttributeValue<Value> {
        let previous = if value.is_unset() {
            self.values.remove(&attribute)
        } else {
            self.values.insert(attribute, value)
        };
        previous.unwrap_or_default()
    }

    /// Builder-style [`StepData::set`].
    pub fn with(mut self, attribute: AttributeId, value: AttributeValue<Value>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Builder-style shortcut for an explicit value.
    pub fn with_value(self, attribute: AttributeId, value: Value) -> Self {
        self.with(attribute, AttributeValue::Explicit(value))
    }

    /// Returns `true` if no attribute is overridden.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of overridden attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over the overridden attributes in attribute order.
    pub fn overrides(&self) -> impl Iterator<Item = (&AttributeId, &AttributeValue<Value>)> {
        self.values.iter()
    }

    /// Iterates over the stored operation attributes as `(key, state)`.
    pub fn operation_attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue<Value>)> {
        self.values
            .iter()
            .filter_map(|(id, value)| id.operation_key().map(|key| (key, value)))
    }
}
