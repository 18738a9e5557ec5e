//! Scenarios and parsed features
//!
//! Provides [`Scenario`] and [`ParsedFeature`], recreated wholesale on every
//! discovery pass. The only identity a scenario keeps across passes is its
//! `file_path:line_number` pair.

use crate::id::CompositeKey;
use serde::{Deserialize, Serialize};

/// One concrete, runnable unit
///
/// Either a hand-written scenario, one expanded example of an outline, or
/// the synthetic outline representation kept for an outline without data rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Display name (generated for expanded examples)
    pub name: String,
    /// 0-based line of the header, for editor ranges
    pub line: usize,
    /// 1-based source line of the scenario's own header (or example row)
    pub line_number: usize,
    /// Source line of the owning `Scenario Outline:` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_line_number: Option<usize>,
    /// Name of the owning outline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_name: Option<String>,
    /// Source line of the `Feature:` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_line_number: Option<usize>,
    /// Raw step lines, unparsed
    #[serde(default)]
    pub steps: Vec<String>,
    /// Tags in source order, each with its leading `@`
    #[serde(default)]
    pub tags: Vec<String>,
    /// Path of the feature file
    pub file_path: String,
    /// True only for the synthetic outline representation
    #[serde(default)]
    pub is_scenario_outline: bool,
}

impl Scenario {
    /// Create a regular scenario whose header sits on 1-based `line_number`
    #[must_use]
    pub fn new(name: impl Into<String>, file_path: impl Into<String>, line_number: usize) -> Self {
        Self {
            name: name.into(),
            line: line_number.saturating_sub(1),
            line_number,
            outline_line_number: None,
            outline_name: None,
            feature_line_number: None,
            steps: Vec::new(),
            tags: Vec::new(),
            file_path: file_path.into(),
            is_scenario_outline: false,
        }
    }

    /// Set the feature header line
    #[inline]
    #[must_use]
    pub fn with_feature_line(mut self, line: usize) -> Self {
        self.feature_line_number = Some(line);
        self
    }

    /// Set tags
    #[inline]
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set steps
    #[inline]
    #[must_use]
    pub fn with_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps = steps.into_iter().map(Into::into).collect();
        self
    }

    /// Mark as an expanded example of the outline at `outline_line`
    #[inline]
    #[must_use]
    pub fn example_of(mut self, outline_name: impl Into<String>, outline_line: usize) -> Self {
        self.outline_name = Some(outline_name.into());
        self.outline_line_number = Some(outline_line);
        self.is_scenario_outline = false;
        self
    }

    /// Mark as the synthetic outline representation
    #[inline]
    #[must_use]
    pub fn as_outline(mut self) -> Self {
        self.outline_name = Some(self.name.clone());
        self.outline_line_number = Some(self.line_number);
        self.is_scenario_outline = true;
        self
    }

    /// Whether this is one expanded example of an outline
    #[inline]
    #[must_use]
    pub fn is_example(&self) -> bool {
        self.outline_line_number.is_some() && !self.is_scenario_outline
    }

    /// Scenario kind (examples count as their outline's kind)
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ScenarioKind {
        if self.is_scenario_outline || self.outline_line_number.is_some() {
            ScenarioKind::Outline
        } else {
            ScenarioKind::Regular
        }
    }

    /// Key under which execution results for this scenario are reported
    ///
    /// `None` when the feature header line is unknown.
    #[must_use]
    pub fn composite_key(&self) -> Option<CompositeKey> {
        self.feature_line_number
            .map(|feature_line| CompositeKey::new(&self.file_path, feature_line, self.line_number))
    }

    /// Base name of the feature file
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_path)
    }
}

/// Scenario kind used by the scenario-type strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// Hand-written scenario
    Regular,
    /// Outline or one of its examples
    Outline,
}

impl ScenarioKind {
    /// Identifier segment used in group ids
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Outline => "outline",
        }
    }
}

/// Result of parsing one feature file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFeature {
    /// Feature name
    pub feature: String,
    /// Scenarios in source order, outlines already expanded
    pub scenarios: Vec<Scenario>,
    /// Path of the feature file
    pub file_path: String,
    /// Source line of the `Feature:` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_line_number: Option<usize>,
    /// Tags on the feature header
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ParsedFeature {
    /// Create an empty feature
    #[must_use]
    pub fn new(feature: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            scenarios: Vec::new(),
            file_path: file_path.into(),
            feature_line_number: None,
            tags: Vec::new(),
        }
    }

    /// Set the feature header line
    #[inline]
    #[must_use]
    pub fn with_feature_line(mut self, line: usize) -> Self {
        self.feature_line_number = Some(line);
        self
    }

    /// Set scenarios
    #[inline]
    #[must_use]
    pub fn with_scenarios(mut self, scenarios: Vec<Scenario>) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Set feature tags
    #[inline]
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Find the scenario whose header (or example row) is on `line_number`
    #[must_use]
    pub fn scenario_at(&self, line_number: usize) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.line_number == line_number)
    }

    /// Number of runnable scenarios
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Check if the feature has no scenarios
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
