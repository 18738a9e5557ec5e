//! FX Core - Feature Explorer
//!
//! Ties the workspace together behind one explicitly constructed context:
//! - Discovers feature files through a time- and size-bounded cache
//! - Parses them into features, expanding scenario outlines
//! - Organizes scenarios with the active strategy and materializes the tree
//! - Derives run/debug actions and runner command lines
//! - Maps execution results back onto tree nodes
//!
//! # Example
//!
//! ```rust,ignore
//! use fx_core::{ExplorerConfig, FeatureExplorer};
//! use fx_organize::StrategyKind;
//!
//! let config = ExplorerConfig::new().with_workspace_root("/path/to/project");
//! let mut explorer = FeatureExplorer::new(config);
//! explorer.refresh(false);
//!
//! explorer.set_strategy(StrategyKind::Tag);
//! for group in explorer.groups() {
//!     println!("{} ({} scenarios)", group.label, group.len());
//! }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod explorer;

pub use config::{ExplorerConfig, CONFIG_FILE_NAME, DEFAULT_FEATURE_GLOB};
pub use error::ConfigError;
pub use explorer::{FeatureExplorer, FileReader, FsReader, RefreshSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
