//! Tooling
//!
//! Command-line front end over the session and store layers.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, PageCommands};
