//! Core types for the BBS step strategy engine.
//!
//! A strategy is a forest of named steps. Every step carries a [`StepData`]
//! record that may set, clear, or leave unset each attribute of a fixed set;
//! unset attributes are inherited from the parent step. This crate holds the
//! value model only; the tree and the resolution algorithm live in `bbs-tree`.
//!
//! [`StepData`]: step_data::StepData

pub mod attribute;
pub mod enums;
pub mod error;
pub mod operation;
pub mod raw;
pub mod step_data;
pub mod value;

pub use attribute::{AttributeId, AttributeValue};
pub use enums::{CorrelationSelection, OperationKind, Polarization};
pub use error::{EngineError, Result};
pub use step_data::StepData;
pub use value::{BaselinePair, Value, ValueKind};
