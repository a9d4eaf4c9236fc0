//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the
//! vignette binary.

mod commands;
mod generate;
mod list;

pub use commands::{Cli, Commands};
pub use generate::run_generate;
pub use list::run_list;
