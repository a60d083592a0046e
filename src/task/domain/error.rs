//! Error types for task board domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or parsing domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The sheet name is empty after trimming.
    #[error("sheet name must not be empty")]
    EmptySheetName,

    /// Rows are one-based.
    #[error("invalid row index {0}, expected a positive integer")]
    InvalidRowIndex(usize),

    /// Columns are one-based.
    #[error("invalid column index {0}, expected a positive integer")]
    InvalidColumnIndex(usize),

    /// The job identity is empty after trimming.
    #[error("job identity must not be empty")]
    EmptyJobId,

    /// The done cell holds something other than a checkbox value.
    #[error("done cell must be a boolean or empty, found {0}")]
    InvalidDoneValue(String),

    /// The priority cell holds an unknown label.
    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    /// The assignee is not part of the team roster.
    #[error("assignee '{0}' is not on the team roster")]
    UnknownAssignee(String),

    /// A text cell was expected.
    #[error("expected text in column {column}, found {found}")]
    ExpectedText {
        /// One-based column that held the value.
        column: usize,
        /// Debug rendering of the offending value.
        found: String,
    },

    /// The schedule hour is outside `0..=23`.
    #[error("invalid schedule hour {0}, expected 0-23")]
    InvalidHour(u32),
}
