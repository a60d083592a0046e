//! Identifier and validated scalar types for the task board domain.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Name of a sheet (table) inside a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SheetName(String);

impl SheetName {
    /// Creates a validated sheet name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptySheetName`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptySheetName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wraps a non-empty literal without re-validating it.
    pub(crate) fn from_literal(name: &'static str) -> Self {
        Self(name.to_owned())
    }

    /// Returns the sheet name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SheetName {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SheetName> for String {
    fn from(value: SheetName) -> Self {
        value.0
    }
}

impl AsRef<str> for SheetName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SheetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One-based sheet row. Row 1 is the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowIndex(usize);

impl RowIndex {
    /// The header row of every sheet.
    pub const HEADER: Self = Self(1);

    /// Sheet row of the first data row.
    pub const FIRST_DATA: Self = Self(2);

    /// Creates a validated row index.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidRowIndex`] when the value is zero.
    pub const fn new(value: usize) -> Result<Self, TaskDomainError> {
        if value == 0 {
            return Err(TaskDomainError::InvalidRowIndex(value));
        }
        Ok(Self(value))
    }

    /// Maps a zero-based offset into `read_all_rows` output to its sheet row.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidRowIndex`] if the offset overflows.
    pub const fn from_data_offset(offset: usize) -> Result<Self, TaskDomainError> {
        match offset.checked_add(Self::FIRST_DATA.0) {
            Some(value) => Ok(Self(value)),
            None => Err(TaskDomainError::InvalidRowIndex(offset)),
        }
    }

    /// Returns the zero-based data offset, or `None` for the header row.
    #[must_use]
    pub const fn data_offset(self) -> Option<usize> {
        self.0.checked_sub(Self::FIRST_DATA.0)
    }

    /// Returns `true` for the header row.
    #[must_use]
    pub const fn is_header(self) -> bool {
        self.0 == Self::HEADER.0
    }

    /// Returns the underlying one-based value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One-based sheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ColumnIndex(pub(super) usize);

impl ColumnIndex {
    /// Creates a validated column index.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidColumnIndex`] when the value is zero.
    pub const fn new(value: usize) -> Result<Self, TaskDomainError> {
        if value == 0 {
            return Err(TaskDomainError::InvalidColumnIndex(value));
        }
        Ok(Self(value))
    }

    /// Returns the zero-based position of this column within a row.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.0.saturating_sub(1)
    }

    /// Returns the underlying one-based value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for ColumnIndex {
    type Error = TaskDomainError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColumnIndex> for usize {
    fn from(value: ColumnIndex) -> Self {
        value.0
    }
}

impl fmt::Display for ColumnIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity under which a scheduled job is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    /// Identity of the weekly archive sweep.
    pub const WEEKLY_ARCHIVE: &'static str = "weekly-archive";

    /// Creates a validated job identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyJobId`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyJobId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identity of the weekly archive sweep.
    #[must_use]
    pub fn weekly_archive() -> Self {
        Self(Self::WEEKLY_ARCHIVE.to_owned())
    }

    /// Returns the job identity as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation identifier for one sweep run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SweepRunId(Uuid);

impl SweepRunId {
    /// Creates a new random run identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

}

impl Default for SweepRunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SweepRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
