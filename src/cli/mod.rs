//! CLI module for the gh-reconcile tool.
//!
//! This module provides the command-line interface for previewing
//! repository drift.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
