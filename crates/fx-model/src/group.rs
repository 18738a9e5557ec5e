//! Test groups produced by organization strategies

use crate::scenario::Scenario;
use serde::{Deserialize, Serialize};

/// Named bucket of scenarios
///
/// Built fresh on every reorganization and never mutated afterwards. The
/// `id` is a serialized [`NodeId`](crate::NodeId), so later stages can
/// recover the tag, file path or feature line it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestGroup {
    /// Serialized group identifier
    pub id: String,
    /// Display label
    pub label: String,
    /// Display description
    pub description: String,
    /// Member scenarios in encounter order
    pub scenarios: Vec<Scenario>,
}

impl TestGroup {
    /// Create group with an empty description
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, scenarios: Vec<Scenario>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            scenarios,
        }
    }

    /// Set description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Number of member scenarios
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Check if group has no scenarios
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
