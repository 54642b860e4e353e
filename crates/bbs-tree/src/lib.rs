//! Step tree and inheritance engine for BBS strategies.
//!
//! [`StepTree`] owns every step by name. Parent/child links are names, never
//! owning pointers, so the forest can be edited freely. Effective attribute
//! values are computed on demand by walking the parent chain
//! ([`resolver`]); nothing is cached, which keeps cascading insertion
//! correct without touching the data of any existing step.

pub mod insert;
pub mod node;
pub mod resolver;
pub mod shared;
pub mod snapshot;
pub mod tree;
pub mod write;

pub use insert::{AdoptChildren, ConflictResolution, InsertOutcome, StepChain};
pub use node::{NewStep, StepNode};
pub use resolver::{ResolveState, ResolvedAttribute, ResolvedValue};
pub use shared::SharedStepTree;
pub use snapshot::{NodeSnapshot, TreeSnapshot};
pub use tree::{RemoveMode, StepTree};
