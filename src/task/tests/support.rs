//! Shared fixtures for task board unit tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::config::BoardConfig;
use crate::task::{
    adapters::memory::InMemoryTabularStore,
    domain::{CellValue, ColumnIndex, LiveLayout, Row, RowIndex, SheetName, TaskRecord},
    ports::{SheetHeader, StoreError, StoreResult, TabularStore},
};

pub(super) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 10, 18, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(super) fn hours_ago(hours: i64) -> DateTime<Utc> {
    fixture_timestamp() - TimeDelta::hours(hours)
}

pub(super) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    pub(super) const fn at(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

#[fixture]
pub(super) fn clock() -> Arc<FixtureClock> {
    Arc::new(FixtureClock::at(fixture_timestamp()))
}

#[fixture]
pub(super) fn config() -> Arc<BoardConfig> {
    Arc::new(BoardConfig::default())
}

pub(super) fn live_sheet() -> SheetName {
    BoardConfig::default().live_sheet
}

pub(super) fn sheet(name: &str) -> SheetName {
    SheetName::new(name).expect("valid sheet name")
}

pub(super) fn row(value: usize) -> RowIndex {
    RowIndex::new(value).expect("valid row index")
}

/// Builds a store whose live sheet holds `records` in order.
pub(super) async fn seeded_store(records: &[TaskRecord]) -> InMemoryTabularStore {
    let store = InMemoryTabularStore::new();
    seed(&store, records).await;
    store
}

pub(super) async fn seed(store: &impl TabularStore, records: &[TaskRecord]) {
    store
        .create_sheet(&live_sheet(), &SheetHeader::bold(LiveLayout::HEADER))
        .await
        .expect("create live sheet");
    let layout = LiveLayout::default();
    for record in records {
        store
            .append_row(&live_sheet(), record.to_row(&layout))
            .await
            .expect("append live row");
    }
}

/// Parses every row of the live sheet.
pub(super) async fn live_records(store: &impl TabularStore) -> Vec<TaskRecord> {
    let config = BoardConfig::default();
    store
        .read_all_rows(&live_sheet())
        .await
        .expect("read live rows")
        .iter()
        .filter_map(|cells| {
            TaskRecord::from_row(cells, &config.layout, &config.team_roster)
                .expect("well-formed live row")
        })
        .collect()
}

/// Tabular store wrapper that injects failures and concurrent edits.
pub(super) struct FlakyStore {
    inner: InMemoryTabularStore,
    failing_creates: HashSet<SheetName>,
    failing_deletes: HashSet<SheetName>,
    edit_after_snapshot: Option<(RowIndex, ColumnIndex, CellValue)>,
    cancel_on_delete: Option<CancellationToken>,
    slow_delete: Option<(Duration, Arc<Notify>)>,
}

impl FlakyStore {
    pub(super) fn new(inner: InMemoryTabularStore) -> Self {
        Self {
            inner,
            failing_creates: HashSet::new(),
            failing_deletes: HashSet::new(),
            edit_after_snapshot: None,
            cancel_on_delete: None,
            slow_delete: None,
        }
    }

    pub(super) fn failing_create(mut self, name: SheetName) -> Self {
        self.failing_creates.insert(name);
        self
    }

    pub(super) fn failing_delete(mut self, name: SheetName) -> Self {
        self.failing_deletes.insert(name);
        self
    }

    /// Writes `value` into the live sheet right after a full read, as a
    /// concurrent user edit would.
    pub(super) fn editing_after_snapshot(
        mut self,
        row: RowIndex,
        column: ColumnIndex,
        value: CellValue,
    ) -> Self {
        self.edit_after_snapshot = Some((row, column, value));
        self
    }

    /// Cancels `token` as soon as a live row delete starts.
    pub(super) fn cancelling_on_delete(mut self, token: CancellationToken) -> Self {
        self.cancel_on_delete = Some(token);
        self
    }

    /// Pauses every live row delete for `delay`, signalling `started` first.
    pub(super) fn slow_delete(mut self, delay: Duration, started: Arc<Notify>) -> Self {
        self.slow_delete = Some((delay, started));
        self
    }

    pub(super) fn inner(&self) -> &InMemoryTabularStore {
        &self.inner
    }
}

fn injected(operation: &str) -> StoreError {
    StoreError::backend(std::io::Error::other(format!("injected {operation} failure")))
}

#[async_trait]
impl TabularStore for FlakyStore {
    async fn list_sheets(&self) -> StoreResult<Vec<SheetName>> {
        self.inner.list_sheets().await
    }

    async fn has_sheet(&self, name: &SheetName) -> StoreResult<bool> {
        self.inner.has_sheet(name).await
    }

    async fn create_sheet(&self, name: &SheetName, header: &SheetHeader) -> StoreResult<()> {
        if self.failing_creates.contains(name) {
            return Err(injected("create"));
        }
        self.inner.create_sheet(name, header).await
    }

    async fn read_all_rows(&self, sheet: &SheetName) -> StoreResult<Vec<Row>> {
        let rows = self.inner.read_all_rows(sheet).await?;
        if let Some((row, column, value)) = &self.edit_after_snapshot {
            self.inner
                .write_cell(sheet, *row, *column, value.clone())
                .await?;
        }
        Ok(rows)
    }

    async fn read_row(&self, sheet: &SheetName, row: RowIndex) -> StoreResult<Option<Row>> {
        self.inner.read_row(sheet, row).await
    }

    async fn write_cell(
        &self,
        sheet: &SheetName,
        row: RowIndex,
        column: ColumnIndex,
        value: CellValue,
    ) -> StoreResult<()> {
        self.inner.write_cell(sheet, row, column, value).await
    }

    async fn clear_cell(
        &self,
        sheet: &SheetName,
        row: RowIndex,
        column: ColumnIndex,
    ) -> StoreResult<()> {
        self.inner.clear_cell(sheet, row, column).await
    }

    async fn append_row(&self, sheet: &SheetName, values: Row) -> StoreResult<RowIndex> {
        self.inner.append_row(sheet, values).await
    }

    async fn delete_row(&self, sheet: &SheetName, row: RowIndex) -> StoreResult<()> {
        if self.failing_deletes.contains(sheet) {
            return Err(injected("delete"));
        }
        if *sheet == live_sheet() {
            if let Some(token) = &self.cancel_on_delete {
                token.cancel();
            }
            if let Some((delay, started)) = &self.slow_delete {
                started.notify_one();
                tokio::time::sleep(*delay).await;
            }
        }
        self.inner.delete_row(sheet, row).await
    }
}
