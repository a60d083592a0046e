//! Tabular store port: a workbook of named sheets made of rows and cells.

use crate::task::domain::{CellValue, ColumnIndex, Row, RowIndex, SheetName};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for tabular store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Header row written when a sheet is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetHeader {
    columns: Vec<String>,
    bold: bool,
}

impl SheetHeader {
    /// Creates a plain header.
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            bold: false,
        }
    }

    /// Creates a header rendered in bold.
    #[must_use]
    pub fn bold(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            bold: true,
            ..Self::new(columns)
        }
    }

    /// Returns the header labels.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns `true` when the header is rendered in bold.
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        self.bold
    }
}

/// Workbook access contract.
///
/// Row 1 of every sheet is its header, which this contract never rewrites or
/// deletes. Deleting row `i` shifts every row below it up by one, so every
/// index greater than `i` refers to a different row afterwards.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Lists every sheet in workbook order.
    async fn list_sheets(&self) -> StoreResult<Vec<SheetName>>;

    /// Returns `true` when a sheet with exactly this name exists.
    async fn has_sheet(&self, name: &SheetName) -> StoreResult<bool>;

    /// Creates an empty sheet with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SheetExists`] when the name is taken.
    async fn create_sheet(&self, name: &SheetName, header: &SheetHeader) -> StoreResult<()>;

    /// Reads every data row, header excluded, in sheet order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SheetNotFound`] when the sheet does not exist.
    async fn read_all_rows(&self, sheet: &SheetName) -> StoreResult<Vec<Row>>;

    /// Reads a single data row. Returns `None` past the last row.
    async fn read_row(&self, sheet: &SheetName, row: RowIndex) -> StoreResult<Option<Row>>;

    /// Writes one cell of an existing data row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RowOutOfRange`] for the header or a missing row.
    async fn write_cell(
        &self,
        sheet: &SheetName,
        row: RowIndex,
        column: ColumnIndex,
        value: CellValue,
    ) -> StoreResult<()>;

    /// Clears one cell of an existing data row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RowOutOfRange`] for the header or a missing row.
    async fn clear_cell(
        &self,
        sheet: &SheetName,
        row: RowIndex,
        column: ColumnIndex,
    ) -> StoreResult<()>;

    /// Appends a data row and returns its index.
    async fn append_row(&self, sheet: &SheetName, values: Row) -> StoreResult<RowIndex>;

    /// Deletes a data row, shifting later rows up.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RowOutOfRange`] for the header or a missing row.
    async fn delete_row(&self, sheet: &SheetName, row: RowIndex) -> StoreResult<()>;
}

/// Errors returned by tabular store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The sheet does not exist.
    #[error("sheet not found: {0}")]
    SheetNotFound(SheetName),

    /// A sheet with the same name already exists.
    #[error("sheet already exists: {0}")]
    SheetExists(SheetName),

    /// The row is the header or lies past the end of the sheet.
    #[error("row {row} is not a data row of sheet {sheet}")]
    RowOutOfRange {
        /// Sheet that was addressed.
        sheet: SheetName,
        /// Row that was addressed.
        row: RowIndex,
    },

    /// Backend failure.
    #[error("store backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
