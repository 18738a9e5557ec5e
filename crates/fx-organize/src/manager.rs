//! Organization manager
//!
//! Holds the single active strategy. Switching is a plain state change;
//! grouping is recomputed from scratch on every call.

use crate::hierarchy::{materialize, TestNode};
use crate::strategy::StrategyKind;
use fx_model::{Scenario, TestGroup};

/// Active organization strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrganizationManager {
    active: StrategyKind,
}

impl OrganizationManager {
    /// Create manager with `kind` active
    #[inline]
    #[must_use]
    pub fn new(kind: StrategyKind) -> Self {
        Self { active: kind }
    }

    /// Currently active strategy
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        self.active
    }

    /// Make `kind` the active strategy, returning the previous one
    pub fn set_strategy(&mut self, kind: StrategyKind) -> StrategyKind {
        if kind != self.active {
            tracing::info!("organization strategy: {} -> {}", self.active, kind);
        }
        std::mem::replace(&mut self.active, kind)
    }

    /// Group scenarios with the active strategy
    #[must_use]
    pub fn organize(&self, scenarios: &[Scenario]) -> Vec<TestGroup> {
        self.active.organize(scenarios)
    }

    /// Group and materialize with the active strategy
    #[must_use]
    pub fn hierarchy(&self, scenarios: &[Scenario]) -> Vec<TestNode> {
        materialize(&self.organize(scenarios), self.active)
    }
}
