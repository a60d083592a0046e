//! Plain workbook model shared by the in-memory and JSON store adapters.

use crate::task::{
    domain::{CellValue, ColumnIndex, Row, RowIndex, SheetName},
    ports::{SheetHeader, StoreError, StoreResult},
};
use serde::{Deserialize, Serialize};

/// A sheet: header plus data rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name.
    pub name: SheetName,
    /// Header row.
    pub header: SheetHeader,
    /// Data rows below the header.
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// An ordered collection of sheets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    /// Sheets in creation order.
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Returns the sheet named `name`, if any.
    #[must_use]
    pub fn sheet(&self, name: &SheetName) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| &sheet.name == name)
    }

    pub(crate) fn sheet_mut(&mut self, name: &SheetName) -> StoreResult<&mut Sheet> {
        self.sheets
            .iter_mut()
            .find(|sheet| &sheet.name == name)
            .ok_or_else(|| StoreError::SheetNotFound(name.clone()))
    }

    pub(crate) fn require(&self, name: &SheetName) -> StoreResult<&Sheet> {
        self.sheet(name)
            .ok_or_else(|| StoreError::SheetNotFound(name.clone()))
    }

    pub(crate) fn names(&self) -> Vec<SheetName> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    pub(crate) fn create(&mut self, name: &SheetName, header: &SheetHeader) -> StoreResult<()> {
        if self.sheet(name).is_some() {
            return Err(StoreError::SheetExists(name.clone()));
        }
        self.sheets.push(Sheet {
            name: name.clone(),
            header: header.clone(),
            rows: Vec::new(),
        });
        Ok(())
    }

    pub(crate) fn read_row(&self, name: &SheetName, row: RowIndex) -> StoreResult<Option<Row>> {
        let sheet = self.require(name)?;
        Ok(row
            .data_offset()
            .and_then(|offset| sheet.rows.get(offset))
            .cloned())
    }

    pub(crate) fn set_cell(
        &mut self,
        name: &SheetName,
        row: RowIndex,
        column: ColumnIndex,
        value: CellValue,
    ) -> StoreResult<()> {
        let cells = self.sheet_mut(name)?.data_row_mut(row)?;
        if cells.len() < column.get() {
            cells.resize(column.get(), CellValue::Empty);
        }
        if let Some(cell) = cells.get_mut(column.offset()) {
            *cell = value;
        }
        Ok(())
    }

    pub(crate) fn append(&mut self, name: &SheetName, values: Row) -> StoreResult<RowIndex> {
        let sheet = self.sheet_mut(name)?;
        sheet.rows.push(values);
        let offset = sheet.rows.len().saturating_sub(1);
        RowIndex::from_data_offset(offset).map_err(StoreError::backend)
    }

    pub(crate) fn delete(&mut self, name: &SheetName, row: RowIndex) -> StoreResult<()> {
        let sheet = self.sheet_mut(name)?;
        match row.data_offset() {
            Some(offset) if offset < sheet.rows.len() => {
                sheet.rows.remove(offset);
                Ok(())
            }
            _ => Err(StoreError::RowOutOfRange {
                sheet: name.clone(),
                row,
            }),
        }
    }
}

impl Sheet {
    fn data_row_mut(&mut self, row: RowIndex) -> StoreResult<&mut Row> {
        let name = &self.name;
        row.data_offset()
            .and_then(|offset| self.rows.get_mut(offset))
            .ok_or_else(|| StoreError::RowOutOfRange {
                sheet: name.clone(),
                row,
            })
    }
}
