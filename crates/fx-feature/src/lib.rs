//! FX Feature Files
//!
//! Turns feature-file text into a [`ParsedFeature`](fx_model::ParsedFeature)
//! and derives the command surface an editor attaches to it.
//!
//! # Core Concepts
//!
//! - **Scanner**: Numbered, classified lines independent of line-ending style
//! - [`FeatureParser`]: Whole-file model builder with outline expansion
//! - [`ExampleNaming`]: Naming policy for expanded examples
//! - [`derive_actions`]: Run/debug actions per feature, scenario, outline, example and tag
//! - [`RunnerInvocation`]: Runner argv built for an [`Action`]
//!
//! # Example
//!
//! ```rust,ignore
//! use fx_feature::{derive_actions, invocation_for, parse_feature, RunnerConfig};
//!
//! let text = "Feature: F\n  Scenario: S\n    Given x\n";
//! let feature = parse_feature(text, "features/f.feature").unwrap();
//! assert_eq!(feature.scenarios[0].line_number, 2);
//!
//! for action in derive_actions(&feature) {
//!     let inv = invocation_for(&action, "/ws", &RunnerConfig::default());
//!     println!("{}: {}", action.title(), inv.command_line());
//! }
//! ```

#![warn(unreachable_pub)]

mod actions;
mod command;
mod error;
mod naming;
mod parser;
pub mod scanner;

pub use actions::{derive_actions, Action, ActionKind, ActionScope};
pub use command::{
    invocation_for, plan_parallel, RunnerConfig, RunnerInvocation, DEFAULT_MAX_PARALLEL,
    DEFAULT_PROGRAM,
};
pub use error::ParseIssue;
pub use naming::{
    extract_outline_name, is_example_name, substitute_placeholders, ExampleNaming,
    DEFAULT_ELLIPSIS, DEFAULT_MAX_EXAMPLE_NAME_LEN, DEFAULT_TRUNCATED_PARAM_WIDTH,
};
pub use parser::{parse_feature, FeatureParser, ParseOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
