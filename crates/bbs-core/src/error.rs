//! Engine error types.

use crate::enums::OperationKind;
use crate::value::ValueKind;

/// Errors that can occur during engine operations.
///
/// None of these are fatal: a tree that satisfies the forest invariant can
/// always answer resolution queries, and every failing operation leaves the
/// tree untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A step with the same name is already attached.
    #[error("step '{name}' already exists")]
    NameConflict {
        /// The conflicting step name.
        name: String,
    },

    /// No step with this name is attached.
    #[error("unknown step: {name}")]
    UnknownStep {
        /// The name that was looked up.
        name: String,
    },

    /// The operation attribute key is not part of the selected operation's
    /// schema.
    #[error(
        "'{key}' is not an attribute of operation {operation} (valid: {})",
        if valid.is_empty() { "none".to_string() } else { valid.join(", ") }
    )]
    InvalidAttributeForOperation {
        /// The rejected key.
        key: String,
        /// The effective operation of the step.
        operation: OperationKind,
        /// Keys the operation does accept.
        valid: Vec<String>,
    },

    /// An operation attribute was written on a step without an effective
    /// operation.
    #[error("step '{step}' has no operation selected")]
    NoOperationSelected {
        /// The step that was written.
        step: String,
    },

    /// Non-numeric input for a numeric attribute.
    #[error("malformed numeric input for {attribute}: '{input}'")]
    MalformedNumericInput {
        /// The attribute being written.
        attribute: String,
        /// The rejected input.
        input: String,
    },

    /// Textual input that does not fit a non-numeric attribute.
    #[error("invalid input for {attribute}: {reason}")]
    InvalidInput {
        /// The attribute being written.
        attribute: String,
        /// Why the input was rejected.
        reason: String,
    },

    /// A value of the wrong kind was written.
    #[error("{attribute} expects a {expected} value, got {actual}")]
    TypeMismatch {
        /// The attribute being written.
        attribute: String,
        /// The declared kind.
        expected: ValueKind,
        /// The kind of the rejected value.
        actual: ValueKind,
    },

    /// A step named for adoption is not a child of the insertion parent.
    #[error("step '{step}' is not a child of {}", parent.as_deref().unwrap_or("the root set"))]
    NotAChild {
        /// The step that was to be adopted.
        step: String,
        /// The insertion parent (`None` for the root set).
        parent: Option<String>,
    },

    /// An attribute name could not be parsed.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
}

/// Convenience alias used throughout the engine crates.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    // -- Constructors --------------------------------------------------------

    /// Creates a [`EngineError::UnknownStep`].
    pub fn unknown_step(name: impl Into<String>) -> Self {
        Self::UnknownStep { name: name.into() }
    }

    /// Creates a [`EngineError::NameConflict`].
    pub fn name_conflict(name: impl Into<String>) -> Self {
        Self::NameConflict { name: name.into() }
    }

    // -- Predicates ----------------------------------------------------------

    /// Returns `true` if this is a [`EngineError::NameConflict`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::NameConflict { .. })
    }

    /// Returns `true` if this is a [`EngineError::UnknownStep`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownStep { .. })
    }

    /// Returns `true` if the caller should ask the user for new input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedNumericInput { .. }
                | Self::InvalidInput { .. }
                | Self::TypeMismatch { .. }
                | Self::InvalidAttributeForOperation { .. }
        )
    }
}
