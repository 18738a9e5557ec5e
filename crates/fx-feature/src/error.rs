//! Diagnostics for malformed feature-file constructs
//!
//! None of these abort a parse: the offending construct is skipped and the
//! issue is recorded alongside the (possibly partial) model.

/// A malformed construct skipped while building the feature model
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIssue {
    /// Table row without a closing `|`
    #[error("line {line}: table row is missing its closing '|'")]
    MalformedRow {
        /// 1-based source line
        line: usize,
    },

    /// Example row with a different cell count than its header
    #[error("line {line}: expected {expected} cells, found {found}")]
    CellCountMismatch {
        /// 1-based source line
        line: usize,
        /// Cells in the header row
        expected: usize,
        /// Cells in this row
        found: usize,
    },

    /// Examples header with an empty column name
    #[error("line {line}: examples header has an empty column name")]
    EmptyHeaderCell {
        /// 1-based source line
        line: usize,
    },

    /// `Examples:` outside a scenario outline
    #[error("line {line}: examples block outside a scenario outline")]
    ExamplesWithoutOutline {
        /// 1-based source line
        line: usize,
    },

    /// Scenario header before the `Feature:` header
    #[error("line {line}: scenario declared before the feature header")]
    ScenarioBeforeFeature {
        /// 1-based source line
        line: usize,
    },

    /// Second `Feature:` header in one file
    #[error("line {line}: duplicate feature header")]
    DuplicateFeature {
        /// 1-based source line
        line: usize,
    },

    /// Doc string still open at end of file
    #[error("line {line}: doc string is never closed")]
    UnterminatedDocString {
        /// 1-based source line
        line: usize,
    },
}

impl ParseIssue {
    /// Line the issue was found on
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::MalformedRow { line }
            | Self::CellCountMismatch { line, .. }
            | Self::EmptyHeaderCell { line }
            | Self::ExamplesWithoutOutline { line }
            | Self::ScenarioBeforeFeature { line }
            | Self::DuplicateFeature { line }
            | Self::UnterminatedDocString { line } => *line,
        }
    }
}
