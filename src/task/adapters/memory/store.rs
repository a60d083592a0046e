//! In-memory tabular store for tests and embedding.

use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    adapters::workbook::{Sheet, Workbook},
    domain::{CellValue, ColumnIndex, Row, RowIndex, SheetName},
    ports::{SheetHeader, StoreError, StoreResult, TabularStore},
};

/// Thread-safe in-memory workbook.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTabularStore {
    state: Arc<RwLock<Workbook>>,
}

impl InMemoryTabularStore {
    /// Creates an empty workbook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with an existing workbook.
    #[must_use]
    pub fn with_workbook(workbook: Workbook) -> Self {
        Self {
            state: Arc::new(RwLock::new(workbook)),
        }
    }

    /// Returns a copy of one sheet, if present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the lock is poisoned.
    pub fn sheet_snapshot(&self, name: &SheetName) -> StoreResult<Option<Sheet>> {
        Ok(self.read()?.sheet(name).cloned())
    }

    /// Returns a copy of the whole workbook.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the lock is poisoned.
    pub fn workbook_snapshot(&self) -> StoreResult<Workbook> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Workbook>> {
        self.state
            .read()
            .map_err(|err| StoreError::backend(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Workbook>> {
        self.state
            .write()
            .map_err(|err| StoreError::backend(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl TabularStore for InMemoryTabularStore {
    async fn list_sheets(&self) -> StoreResult<Vec<SheetName>> {
        Ok(self.read()?.names())
    }

    async fn has_sheet(&self, name: &SheetName) -> StoreResult<bool> {
        Ok(self.read()?.sheet(name).is_some())
    }

    async fn create_sheet(&self, name: &SheetName, header: &SheetHeader) -> StoreResult<()> {
        self.write()?.create(name, header)
    }

    async fn read_all_rows(&self, sheet: &SheetName) -> StoreResult<Vec<Row>> {
        Ok(self.read()?.require(sheet)?.rows.clone())
    }

    async fn read_row(&self, sheet: &SheetName, row: RowIndex) -> StoreResult<Option<Row>> {
        self.read()?.read_row(sheet, row)
    }

    async fn write_cell(
        &self,
        sheet: &SheetName,
        row: RowIndex,
        column: ColumnIndex,
        value: CellValue,
    ) -> StoreResult<()> {
        self.write()?.set_cell(sheet, row, column, value)
    }

    async fn clear_cell(
        &self,
        sheet: &SheetName,
        row: RowIndex,
        column: ColumnIndex,
    ) -> StoreResult<()> {
        self.write()?.set_cell(sheet, row, column, CellValue::Empty)
    }

    async fn append_row(&self, sheet: &SheetName, values: Row) -> StoreResult<RowIndex> {
        self.write()?.append(sheet, values)
    }

    async fn delete_row(&self, sheet: &SheetName, row: RowIndex) -> StoreResult<()> {
        self.write()?.delete(sheet, row)
    }
}
