//! Single-cell edit notifications.

use super::CellValue;

/// A single cell edit reported by the host.
///
/// Coordinates are raw one-based values as reported; the lifecycle
/// controller validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    /// Name of the edited sheet.
    pub sheet_name: String,
    /// One-based row of the edited cell.
    pub row: usize,
    /// One-based column of the edited cell.
    pub column: usize,
    /// Value after the edit.
    pub new_value: CellValue,
}

impl EditEvent {
    /// Creates an edit event.
    #[must_use]
    pub fn new(
        sheet_name: impl Into<String>,
        row: usize,
        column: usize,
        new_value: impl Into<CellValue>,
    ) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            row,
            column,
            new_value: new_value.into(),
        }
    }
}
