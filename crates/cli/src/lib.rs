//! Line-oriented REPL over a `corelib::Ring`: join/remove nodes, put/get
//! keys, and inspect ring state.

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
