//! FX Organization
//!
//! Groups a flat scenario collection into [`TestGroup`](fx_model::TestGroup)s
//! and materializes them into a test hierarchy.
//!
//! # Core Concepts
//!
//! - [`StrategyKind`]: The five built-in strategies (tag, file, type, flat, feature)
//! - [`OrganizationManager`]: Holds the one active strategy
//! - [`TestNode`]: Node of the materialized tree, keyed by a structured [`NodeId`](fx_model::NodeId)
//!
//! Strategies are total: when one cannot place a scenario it logs a warning
//! and the caller receives a single "All Scenarios" group instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use fx_organize::{OrganizationManager, StrategyKind};
//!
//! let mut manager = OrganizationManager::default();
//! manager.set_strategy(StrategyKind::Tag);
//! for group in manager.organize(&scenarios) {
//!     println!("{} ({})", group.label, group.len());
//! }
//! ```

#![warn(unreachable_pub)]

mod feature;
mod file;
mod flat;
mod hierarchy;
mod manager;
mod scenario_type;
mod strategy;
mod tag;

pub use flat::ALL_SCENARIOS_LABEL;
pub use hierarchy::{materialize, TestNode};
pub use manager::OrganizationManager;
pub use scenario_type::{OUTLINE_LABEL, REGULAR_LABEL};
pub use strategy::{OrganizeError, StrategyKind};
pub use tag::UNTAGGED_LABEL;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
