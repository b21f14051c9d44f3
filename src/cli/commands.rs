//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_OVERRIDES_FILE;
use crate::planner::Category;

/// gh-reconcile - Preview drift between a declared GitHub repository
/// configuration and the live repository.
#[derive(Parser, Debug)]
#[command(name = "gh-reconcile")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "GH_RECONCILE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare the configuration with the repository and print the plan.
    Plan {
        /// Only compare these categories (repeatable).
        #[arg(long = "only", value_name = "CATEGORY", value_parser = parse_category)]
        only: Vec<Category>,

        /// Propose deleting secrets and variables that are not declared.
        #[arg(long)]
        sync_delete: bool,

        /// Skip the secrets comparison.
        #[arg(long)]
        no_secrets: bool,

        /// Skip the variables comparison.
        #[arg(long)]
        no_variables: bool,

        /// Dotenv file with local secret and variable values.
        #[arg(long, default_value = DEFAULT_OVERRIDES_FILE)]
        env_file: PathBuf,

        /// Print the inverse plan (rollback preview).
        #[arg(long)]
        invert: bool,

        /// Exit with 2 when the plan has changes.
        #[arg(long)]
        detailed_exitcode: bool,
    },

    /// Validate the configuration file.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse()
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns true if log lines should be written as JSON, which is the
    /// case whenever command output is JSON.
    #[must_use]
    pub fn json_logs(&self) -> bool {
        self.output == OutputFormat::Json
    }
}
