//! Tabular store persisted as a single JSON workbook file.
//!
//! Every mutation rewrites the file through a temporary sibling and a
//! rename, so a crash mid-write leaves the previous workbook intact. File
//! writes run on Tokio's blocking pool.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::task::{
    adapters::workbook::Workbook,
    domain::{CellValue, ColumnIndex, Row, RowIndex, SheetName},
    ports::{SheetHeader, StoreError, StoreResult, TabularStore},
};

/// JSON-file-backed workbook.
#[derive(Debug)]
pub struct JsonWorkbookStore {
    dir: Arc<Dir>,
    file_name: Utf8PathBuf,
    state: Mutex<Workbook>,
}

impl JsonWorkbookStore {
    /// Opens the workbook at `path`, starting empty if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the parent directory cannot be
    /// opened or the file is not a valid workbook.
    pub fn open(path: &Utf8Path) -> StoreResult<Self> {
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path.file_name().map(Utf8PathBuf::from).ok_or_else(|| {
            StoreError::backend(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("workbook path {path} has no file name"),
            ))
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(StoreError::backend)?;

        let workbook = if dir.exists(&file_name) {
            let contents = dir.read_to_string(&file_name).map_err(StoreError::backend)?;
            serde_json::from_str(&contents).map_err(StoreError::backend)?
        } else {
            debug!(path = %path, "workbook file absent, starting empty");
            Workbook::default()
        };

        Ok(Self {
            dir: Arc::new(dir),
            file_name,
            state: Mutex::new(workbook),
        })
    }

    /// Returns a copy of the current workbook.
    pub async fn workbook_snapshot(&self) -> Workbook {
        self.state.lock().await.clone()
    }

    /// Applies `change` to a copy of the workbook and keeps it only if the
    /// file write succeeds.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Workbook) -> StoreResult<T> + Send,
    ) -> StoreResult<T>
    where
        T: Send,
    {
        let mut state = self.state.lock().await;
        let mut draft = state.clone();
        let value = change(&mut draft)?;
        self.persist(&draft).await?;
        *state = draft;
        Ok(value)
    }

    async fn persist(&self, workbook: &Workbook) -> StoreResult<()> {
        let contents = serde_json::to_string_pretty(workbook).map_err(StoreError::backend)?;
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        tokio::task::spawn_blocking(move || replace_file(&dir, &file_name, contents))
            .await
            .map_err(StoreError::backend)?
    }
}

fn replace_file(dir: &Dir, file_name: &Utf8Path, contents: String) -> StoreResult<()> {
    let temp_name = Utf8PathBuf::from(format!("{file_name}.tmp"));
    dir.write(&temp_name, contents).map_err(StoreError::backend)?;
    dir.rename(&temp_name, dir, file_name)
        .map_err(StoreError::backend)
}

#[async_trait]
impl TabularStore for JsonWorkbookStore {
    async fn list_sheets(&self) -> StoreResult<Vec<SheetName>> {
        Ok(self.state.lock().await.names())
    }

    async fn has_sheet(&self, name: &SheetName) -> StoreResult<bool> {
        Ok(self.state.lock().await.sheet(name).is_some())
    }

    async fn create_sheet(&self, name: &SheetName, header: &SheetHeader) -> StoreResult<()> {
        self.mutate(|workbook| workbook.create(name, header)).await
    }

    async fn read_all_rows(&self, sheet: &SheetName) -> StoreResult<Vec<Row>> {
        Ok(self.state.lock().await.require(sheet)?.rows.clone())
    }

    async fn read_row(&self, sheet: &SheetName, row: RowIndex) -> StoreResult<Option<Row>> {
        self.state.lock().await.read_row(sheet, row)
    }

    async fn write_cell(
        &self,
        sheet: &SheetName,
        row: RowIndex,
        column: ColumnIndex,
        value: CellValue,
    ) -> StoreResult<()> {
        self.mutate(|workbook| workbook.set_cell(sheet, row, column, value))
            .await
    }

    async fn clear_cell(
        &self,
        sheet: &SheetName,
        row: RowIndex,
        column: ColumnIndex,
    ) -> StoreResult<()> {
        self.mutate(|workbook| workbook.set_cell(sheet, row, column, CellValue::Empty))
            .await
    }

    async fn append_row(&self, sheet: &SheetName, values: Row) -> StoreResult<RowIndex> {
        self.mutate(|workbook| workbook.append(sheet, values)).await
    }

    async fn delete_row(&self, sheet: &SheetName, row: RowIndex) -> StoreResult<()> {
        self.mutate(|workbook| workbook.delete(sheet, row)).await
    }
}
