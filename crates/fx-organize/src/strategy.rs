//! Organization strategy selection and dispatch
//!
//! The strategy set is closed, so [`StrategyKind`] is an enum and dispatch is
//! an exhaustive `match`. Every strategy is total from the caller's side:
//! [`StrategyKind::organize`] falls back to the flat grouping when the
//! selected strategy fails on its input.

use crate::{feature, file, flat, scenario_type, tag};
use fx_model::{Scenario, TestGroup};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Built-in organization strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// One group per distinct tag, plus `Untagged`
    Tag,
    /// One group per feature file
    File,
    /// Regular scenarios and outlines
    #[serde(rename = "type")]
    ScenarioType,
    /// Everything in one group
    Flat,
    /// One tree per feature file (file, outline, examples)
    #[default]
    Feature,
}

impl StrategyKind {
    /// Every built-in strategy, in menu order
    pub const ALL: [Self; 5] = [
        Self::Feature,
        Self::Tag,
        Self::File,
        Self::ScenarioType,
        Self::Flat,
    ];

    /// Short name used in config files and on the command line
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::File => "file",
            Self::ScenarioType => "type",
            Self::Flat => "flat",
            Self::Feature => "feature",
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Tag => "By Tag",
            Self::File => "By File",
            Self::ScenarioType => "By Scenario Type",
            Self::Flat => "Flat",
            Self::Feature => "By Feature",
        }
    }

    /// One-line description
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Tag => "Group scenarios by their tags",
            Self::File => "Group scenarios by feature file",
            Self::ScenarioType => "Separate regular scenarios from scenario outlines",
            Self::Flat => "Show all scenarios in a single list",
            Self::Feature => "Feature files with their scenarios, outlines and examples",
        }
    }

    /// Whether groups are materialized as file/outline/example trees
    #[inline]
    #[must_use]
    pub fn is_hierarchical(self) -> bool {
        matches!(self, Self::Feature)
    }

    /// Group `scenarios`, falling back to a single flat group on failure
    #[must_use]
    pub fn organize(self, scenarios: &[Scenario]) -> Vec<TestGroup> {
        match self.try_organize(scenarios) {
            Ok(groups) => groups,
            Err(err) => {
                tracing::warn!(strategy = self.name(), "organization failed, using flat: {}", err);
                flat::organize(scenarios)
            }
        }
    }

    /// Group `scenarios` with this strategy only
    ///
    /// # Errors
    /// Returns [`OrganizeError`] when a scenario cannot be placed.
    pub fn try_organize(self, scenarios: &[Scenario]) -> Result<Vec<TestGroup>, OrganizeError> {
        match self {
            Self::Tag => tag::organize(scenarios),
            Self::File => file::organize(scenarios),
            Self::ScenarioType => Ok(scenario_type::organize(scenarios)),
            Self::Flat => Ok(flat::organize(scenarios)),
            Self::Feature => feature::organize(scenarios),
        }
    }
}

impl Display for StrategyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = OrganizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tag" | "tags" => Ok(Self::Tag),
            "file" | "files" => Ok(Self::File),
            "type" | "scenario-type" | "scenario_type" => Ok(Self::ScenarioType),
            "flat" => Ok(Self::Flat),
            "feature" | "hierarchical" => Ok(Self::Feature),
            _ => Err(OrganizeError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Errors raised inside organization strategies
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrganizeError {
    /// Tag that cannot name a group
    #[error("scenario '{scenario}' has invalid tag '{tag}'")]
    InvalidTag {
        /// Scenario carrying the tag
        scenario: String,
        /// Offending tag
        tag: String,
    },

    /// Scenario without a file path
    #[error("scenario '{0}' has no file path")]
    MissingFilePath(String),

    /// Strategy name not recognized
    #[error("unknown organization strategy: '{0}'")]
    UnknownStrategy(String),
}
