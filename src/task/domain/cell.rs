//! Cell values stored in workbook sheets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of cell values, ordered by column.
pub type Row = Vec<CellValue>;

/// Value held by a single sheet cell.
///
/// Only [`CellValue::Bool`]`(true)` is treated as a checked checkbox. Text
/// such as `"TRUE"` is never coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    /// Cell has no content.
    #[default]
    Empty,
    /// Checkbox or boolean content.
    Bool(bool),
    /// Free-form text.
    Text(String),
    /// Date and time content.
    Timestamp(DateTime<Utc>),
}

/// Shared empty cell returned for reads past the end of a row.
pub(crate) static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Creates a text cell.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns `true` only for a checked boolean.
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    /// Returns `true` for empty cells and blank text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Bool(_) | Self::Timestamp(_) => false,
        }
    }

    /// Returns the timestamp held by the cell, if any.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(at) => Some(*at),
            _ => None,
        }
    }

    /// Returns the text held by the cell, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}
