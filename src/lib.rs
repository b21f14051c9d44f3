// ============================================================================
// Linting
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![warn(missing_docs)]                // Public items should be documented
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(nonstandard_style)]           // Non-standard code style is forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// ============================================================================
// Crate Documentation
// ============================================================================

//! # gh-reconcile
//!
//! Declarative drift detection for GitHub repository settings.
//!
//! ## Overview
//!
//! A YAML file describes how a repository should be configured. The engine
//! reads the live repository through the GitHub REST API and produces a
//! [`Plan`]: an ordered list of the changes that would bring the repository
//! in line with the file. Nothing is ever written to GitHub.
//!
//! Covered areas are general settings, topics, labels, branch protection,
//! Actions permissions, Pages, and the names and values of secrets and
//! variables.
//!
//! ## Modules
//!
//! - [`config`]: Desired state, parsing, validation and local overrides
//! - [`github`]: Gateway traits and the REST client
//! - [`planner`]: Change model, plan container and pure comparisons
//! - [`comparator`]: Per-category fetch and compare
//! - [`reconciler`]: Runs every comparator and merges the plans
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! repository:
//!   owner: acme
//!   name: widget
//!
//! settings:
//!   description: Widget service
//!   topics: [rust, cli]
//!   allow_squash_merge: true
//!
//! branch_protection:
//!   main:
//!     required_reviews: 1
//!     status_checks: [ci]
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod comparator;
pub mod config;
pub mod error;
pub mod github;
pub mod planner;
pub mod reconciler;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, DesiredState, LocalOverrides};
pub use error::{Error, GatewayError, Result};
pub use github::{Gateway, GitHubClient};
pub use planner::{Category, Change, ChangeType, ChangeValue, Plan};
pub use reconciler::{PlanOptions, PlanReport, Reconciler};
