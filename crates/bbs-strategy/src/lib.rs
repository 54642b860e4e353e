//! Strategy documents for BBS step trees.
//!
//! A strategy is a named list of steps, each with an optional parent and a
//! table of raw parameters. Documents are read and written as YAML, JSON or
//! TOML and converted to and from a [`StepTree`](bbs_tree::StepTree).

pub mod convert;
pub mod document;
pub mod error;
pub mod lock;
pub mod parser;

pub use convert::Strategy;
pub use document::{ParamLeaf, Scalar, StepEntry, StrategyDocument};
pub use error::{Result, StrategyError};
pub use lock::StrategyLock;
pub use parser::{Format, load_strategy, save_strategy};
