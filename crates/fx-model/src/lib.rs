//! FX Feature Model
//!
//! Data model shared by the parser, the organization strategies and the
//! status reconciler.
//!
//! # Core Concepts
//!
//! - [`Scenario`]: One concrete, runnable unit (regular scenario or expanded example)
//! - [`ParsedFeature`]: Feature name plus its ordered scenarios, rebuilt on every parse
//! - [`TestGroup`]: Named bucket of scenarios produced by an organization strategy
//! - [`NodeId`]: Structured identifier for hierarchy nodes, serialized only at the host boundary
//! - [`CompositeKey`]: `path:featureLine:scenarioLine` key used by execution results
//!
//! # Example
//!
//! ```rust,ignore
//! use fx_model::{CompositeKey, NodeId, Scenario};
//!
//! let scenario = Scenario::new("Login", "features/auth.feature", 4).with_feature_line(1);
//! let key = scenario.composite_key().unwrap();
//! assert_eq!(key.to_string(), "features/auth.feature:1:4");
//!
//! let id: NodeId = "features/auth.feature:1".parse()?;
//! ```

#![warn(unreachable_pub)]

mod group;
mod id;
pub mod paths;
mod scenario;
mod status;

pub use group::TestGroup;
pub use id::{CompositeKey, IdError, NodeId};
pub use scenario::{ParsedFeature, Scenario, ScenarioKind};
pub use status::{NodeStatus, StatusError, TestStatus};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
