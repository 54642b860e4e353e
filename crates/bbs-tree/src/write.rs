//! The resolver-aware write path.
//!
//! A value is stored only when it differs from what the step would inherit
//! anyway. Redundant overrides are dropped so later edits to an ancestor keep
//! propagating to the step.

use tracing::debug;

use bbs_core::raw::{is_sentinel, parse_input};
use bbs_core::{AttributeId, AttributeValue, EngineError, Result, Value, ValueKind};

use crate::node::NewStep;
use crate::tree::StepTree;

impl StepTree {
    /// Stores `candidate` for `attribute` on step `name`.
    ///
    /// Returns the state that ended up stored: `Unset` when the candidate
    /// equals the inherited value (or the kind's empty value when nothing is
    /// inherited), otherwise the explicit state. No other attribute is
    /// touched.
    pub fn set_attribute(
        &mut self,
        name: &str,
        attribute: &AttributeId,
        candidate: Value,
    ) -> Result<AttributeValue<Value>> {
        let kind = self.write_kind(name, attribute)?;
        let candidate = coerce(attribute, kind, candidate)?;

        let stored = if is_sentinel(attribute, &candidate) {
            AttributeValue::Unset
        } else {
            let inherited = self.resolve_inherited(name, attribute)?.into_value();
            if inherited.or_else(|| kind.empty_value()).as_ref() == Some(&candidate) {
                AttributeValue::Unset
            } else {
                AttributeValue::Explicit(candidate).normalized(kind)
            }
        };

        self.store(name, attribute, stored)
    }

    /// Parses `input` for `attribute` and writes it.
    ///
    /// Blank input for a kind without an empty value (numbers, flags,
    /// selections, operations) reverts the attribute to inheritance.
    pub fn set_attribute_text(
        &mut self,
        name: &str,
        attribute: &AttributeId,
        input: &str,
    ) -> Result<AttributeValue<Value>> {
        let kind = self.write_kind(name, attribute)?;
        if input.trim().is_empty() && !kind.has_empty() {
            return self.clear_attribute(name, attribute);
        }
        let value = parse_input(attribute, kind, input)?;
        self.set_attribute(name, attribute, value)
    }

    /// Writes the "empty / disabled" value of the attribute's kind.
    pub fn set_empty(&mut self, name: &str, attribute: &AttributeId) -> Result<AttributeValue<Value>> {
        let kind = self.write_kind(name, attribute)?;
        let empty = kind.empty_value().ok_or_else(|| EngineError::InvalidInput {
            attribute: attribute.to_string(),
            reason: format!("{} values cannot be empty", kind),
        })?;
        self.set_attribute(name, attribute, empty)
    }

    /// Drops the step's own override so the attribute inherits again.
    ///
    /// Works for dormant operation attributes too, so no schema check.
    pub fn clear_attribute(&mut self, name: &str, attribute: &AttributeId) -> Result<AttributeValue<Value>> {
        self.step(name)?;
        self.store(name, attribute, AttributeValue::Unset)
    }

    /// Inserts a new root `new_name` carrying the effective values of
    /// `source`. The new step resolves every attribute exactly like
    /// `source` did, without depending on its ancestors.
    pub fn promote(&mut self, source: &str, new_name: &str) -> Result<()> {
        let data = self.effective_data(source)?;
        self.insert(None, NewStep::with_data(new_name, data))
    }

    /// Declared kind for a write, validating operation attributes against the
    /// step's effective operation.
    fn write_kind(&self, name: &str, attribute: &AttributeId) -> Result<ValueKind> {
        self.step(name)?;
        match attribute {
            AttributeId::OperationAttribute(key) => {
                let operation = self
                    .effective_operation(name)?
                    .ok_or_else(|| EngineError::NoOperationSelected { step: name.to_string() })?;
                let schema = operation.schema();
                schema
                    .kind_of(key)
                    .ok_or_else(|| EngineError::InvalidAttributeForOperation {
                        key: key.clone(),
                        operation,
                        valid: schema.keys().map(str::to_string).collect(),
                    })
            }
            fixed => fixed
                .fixed_kind()
                .ok_or_else(|| EngineError::UnknownAttribute(fixed.to_string())),
        }
    }

    fn store(
        &mut self,
        name: &str,
        attribute: &AttributeId,
        value: AttributeValue<Value>,
    ) -> Result<AttributeValue<Value>> {
        let node = self.step_mut(name)?;
        let previous = node.data.set(attribute.clone(), value.clone());
        debug!(
            step = name,
            %attribute,
            stored = ?value,
            changed = previous != value,
            "set attribute"
        );
        Ok(value)
    }
}

/// Checks the candidate's kind; integers are accepted for number attributes.
fn coerce(attribute: &AttributeId, kind: ValueKind, candidate: Value) -> Result<Value> {
    match (kind, candidate) {
        (ValueKind::Number, Value::Integer(i)) => Ok(Value::Number(i as f64)),
        (kind, candidate) if candidate.kind() == kind => Ok(candidate),
        (kind, candidate) => Err(EngineError::TypeMismatch {
            attribute: attribute.to_string(),
            expected: kind,
            actual: candidate.kind(),
        }),
    }
}
