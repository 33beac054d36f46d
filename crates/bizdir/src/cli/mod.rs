//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the bizdir binary.

mod commands;
mod fetch;
mod inspect;
mod serve;

pub use commands::{Cli, Commands};
pub use fetch::handle_fetch_command;
pub use inspect::{handle_inspect_command, inspection_report};
pub use serve::handle_serve_command;
