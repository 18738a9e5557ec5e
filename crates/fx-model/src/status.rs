//! Execution outcome values

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Outcome reported by the external executor for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Scenario passed
    Passed,
    /// Scenario failed
    Failed,
}

impl Display for TestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TestStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            _ => Err(StatusError::Unknown(s.to_string())),
        }
    }
}

/// Visual state of a hierarchy node
///
/// Unresolved results map to [`NodeStatus::Skipped`], never to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Scenario (or every child) passed
    Passed,
    /// Scenario (or some child) failed
    Failed,
    /// No result could be resolved
    Skipped,
}

impl NodeStatus {
    /// Combine child statuses into a parent status
    ///
    /// Any failure wins; all-passed is passed; anything else is skipped.
    #[must_use]
    pub fn roll_up<I: IntoIterator<Item = NodeStatus>>(children: I) -> Self {
        let mut seen_any = false;
        let mut all_passed = true;
        for status in children {
            seen_any = true;
            match status {
                Self::Failed => return Self::Failed,
                Self::Skipped => all_passed = false,
                Self::Passed => {}
            }
        }
        if seen_any && all_passed {
            Self::Passed
        } else {
            Self::Skipped
        }
    }
}

impl From<Option<TestStatus>> for NodeStatus {
    fn from(status: Option<TestStatus>) -> Self {
        match status {
            Some(TestStatus::Passed) => Self::Passed,
            Some(TestStatus::Failed) => Self::Failed,
            None => Self::Skipped,
        }
    }
}

/// Errors parsing status values
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StatusError {
    /// Value is neither `passed` nor `failed`
    #[error("unknown status: '{0}'")]
    Unknown(String),
}
