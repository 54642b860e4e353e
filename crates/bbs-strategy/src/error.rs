//! Strategy error types.

use bbs_core::EngineError;

/// Errors that can occur while reading, converting or writing a strategy.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("step '{step}' names unknown parent '{parent}'")]
    UnknownParent { step: String, parent: String },

    #[error("parent links of step '{step}' form a cycle")]
    Cycle { step: String },

    #[error("step '{0}' is listed more than once")]
    DuplicateStep(String),

    #[error("invalid parameter in step '{step}'")]
    InvalidParam {
        step: String,
        #[source]
        source: EngineError,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for strategy operations.
pub type Result<T> = std::result::Result<T, StrategyError>;

impl StrategyError {
    pub(crate) fn param(step: &str, source: EngineError) -> Self {
        Self::InvalidParam {
            step: step.to_string(),
            source,
        }
    }
}
