//! Shared test helpers for in-memory task board integration tests.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use eyre::{Result, WrapErr, eyre};
use mockable::Clock;
use rstest::fixture;
use std::sync::{Arc, Mutex};
use taskboard::config::BoardConfig;
use taskboard::task::{
    adapters::memory::InMemoryTabularStore,
    domain::{CellValue, EditEvent, LiveLayout, RowIndex, TaskRecord},
    ports::{SheetHeader, TabularStore},
    services::{ArchivalSweeper, DashboardService, TaskLifecycleController},
};

/// Clock whose time only moves when a test advances it.
pub struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    /// Creates a clock reading `start`.
    #[must_use]
    pub const fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward by `hours`.
    pub fn advance_hours(&self, hours: i64) {
        if let Ok(mut now) = self.now.lock() {
            *now += TimeDelta::hours(hours);
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
            .lock()
            .map_or_else(|poisoned| *poisoned.into_inner(), |now| *now)
    }
}

/// The Wednesday noon every scenario starts from.
#[must_use]
pub fn start_of_scenario() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 10, 18, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Services wired to one in-memory workbook.
pub struct Board {
    pub store: Arc<InMemoryTabularStore>,
    pub clock: Arc<SteppingClock>,
    pub config: Arc<BoardConfig>,
    pub controller: TaskLifecycleController<InMemoryTabularStore, SteppingClock>,
    pub sweeper: ArchivalSweeper<InMemoryTabularStore, SteppingClock>,
    pub dashboard: DashboardService<InMemoryTabularStore>,
}

impl Board {
    /// Creates a board with an empty live table.
    ///
    /// # Errors
    ///
    /// Returns an error if the live sheet cannot be created.
    pub async fn empty(config: BoardConfig) -> Result<Self> {
        let store = Arc::new(InMemoryTabularStore::new());
        let clock = Arc::new(SteppingClock::starting_at(start_of_scenario()));
        let config = Arc::new(config);
        store
            .create_sheet(&config.live_sheet, &SheetHeader::bold(LiveLayout::HEADER))
            .await
            .wrap_err("create live sheet")?;
        Ok(Self {
            controller: TaskLifecycleController::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                Arc::clone(&config),
            ),
            sweeper: ArchivalSweeper::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                Arc::clone(&config),
            ),
            dashboard: DashboardService::new(Arc::clone(&store), Arc::clone(&config)),
            store,
            clock,
            config,
        })
    }

    /// Appends an open task and returns its row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be appended.
    pub async fn add_task(&self, task: TaskRecord) -> Result<RowIndex> {
        self.store
            .append_row(&self.config.live_sheet, task.to_row(&self.config.layout))
            .await
            .wrap_err("append task row")
    }

    /// Sets the done box of `row` and notifies the controller, as the host
    /// does for an interactive edit.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkbox cannot be written or the edit fails.
    pub async fn set_done(&self, row: RowIndex, done: bool) -> Result<()> {
        let done_column = self.config.layout.done;
        self.store
            .write_cell(&self.config.live_sheet, row, done_column, CellValue::Bool(done))
            .await
            .wrap_err("write done checkbox")?;
        self.controller
            .apply_edit(&EditEvent::new(
                self.config.live_sheet.as_str(),
                row.get(),
                done_column.get(),
                done,
            ))
            .await
            .wrap_err("apply done edit")?;
        Ok(())
    }

    /// Parses every row of the live table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read or a row is malformed.
    pub async fn live_tasks(&self) -> Result<Vec<TaskRecord>> {
        let rows = self
            .store
            .read_all_rows(&self.config.live_sheet)
            .await
            .wrap_err("read live rows")?;
        let mut tasks = Vec::new();
        for row in &rows {
            let parsed = TaskRecord::from_row(row, &self.config.layout, &self.config.team_roster)
                .map_err(|err| eyre!("malformed live row: {err}"))?;
            tasks.extend(parsed);
        }
        Ok(tasks)
    }
}

/// Provides the default board configuration.
#[fixture]
pub fn config() -> BoardConfig {
    BoardConfig::default()
}

/// Returns the descriptions of `tasks` in order.
#[must_use]
pub fn descriptions(tasks: &[TaskRecord]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| task.description().to_owned())
        .collect()
}
