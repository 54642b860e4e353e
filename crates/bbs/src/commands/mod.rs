//! Command handlers, one module per subcommand.

pub mod add;
pub mod config_cmd;
pub mod flatten;
pub mod get;
pub mod init;
pub mod operations;
pub mod remove;
pub mod set;
pub mod show;
pub mod tree;
