//! Change model, plan container and comparison services.
//!
//! This module holds everything about a reconciliation run that needs no
//! I/O: the [`Change`] value type, the [`Plan`] that collects changes, and
//! the pure per-category comparisons in [`diff`].

mod change;
pub mod diff;
mod plan;

pub use change::{Category, Change, ChangeType, ChangeValue};
pub use plan::{ChangeCounts, Plan};
