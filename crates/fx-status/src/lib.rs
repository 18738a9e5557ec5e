//! FX Status
//!
//! Maps execution results, keyed `<relative path>:<featureLine>:<scenarioLine>`,
//! back onto hierarchy nodes whatever id scheme those nodes use.
//!
//! # Core Concepts
//!
//! - [`reconcile`]: Resolve one node's result from its id and its parent's id
//! - [`apply_results`]: Reconcile a whole tree and roll statuses up
//! - [`NodeReport`]: Per-node outcome, serializable for the host
//!
//! # Example
//!
//! ```rust,ignore
//! use std::collections::HashMap;
//! use fx_status::reconcile;
//!
//! let mut results = HashMap::new();
//! results.insert("features/x.feature:2:10".to_string(), "passed");
//!
//! let status = reconcile(
//!     "/abs/workspace/features/x.feature:10",
//!     "features/x.feature:2",
//!     &results,
//!     "/abs/workspace",
//! );
//! assert_eq!(status, Some(&"passed"));
//! ```

#![warn(unreachable_pub)]

mod reconciler;
mod rollup;

pub use reconciler::reconcile;
pub use rollup::{apply_results, parse_results, NodeReport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
