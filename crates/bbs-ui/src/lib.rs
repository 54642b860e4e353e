//! Terminal styling for BBS strategy output.
//!
//! Colours follow the tri-state of resolved values: green for values defined
//! on the step, yellow for inherited ones and red for undefined attributes.

pub mod styles;
pub mod terminal;
