//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the courier binary.

mod commands;
mod fetch;
mod providers;

pub use commands::{Cli, Commands};
pub use fetch::run_fetch;
pub use providers::list_providers;
