//! GitHub gateway.
//!
//! This module provides:
//! - Capability traits used by the comparators to read current state
//! - The REST API response types
//! - A reqwest-based client implementing every capability

mod client;
mod gateway;
mod nullable;
mod types;

pub use client::{GITHUB_API_URL, GitHubClient};
pub use gateway::{
    ActionsGateway, BranchProtectionGateway, EnvGateway, Gateway, LabelGateway, PagesGateway,
    RepoGateway,
};
pub use nullable::Nullable;
pub use types::{
    ActionsPermissions, BranchProtection, EnabledFlag, Label, Pages, PagesSource, Repository,
    RequiredPullRequestReviews, RequiredStatusChecks, SecretEntry, SecretList, SelectedActions,
    Variable, VariableList, WorkflowPermissions,
};
