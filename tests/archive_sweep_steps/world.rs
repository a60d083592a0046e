//! Shared world state for task archiving BDD scenarios.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use eyre::eyre;
use mockable::Clock;
use rstest::fixture;
use std::sync::Arc;
use taskboard::config::BoardConfig;
use taskboard::task::{
    adapters::{
        memory::InMemoryTabularStore,
        workbook::{Sheet, Workbook},
    },
    domain::{LiveLayout, RowIndex, TaskRecord},
    ports::{SheetHeader, TabularStore},
    services::SweepReport,
};

/// Clock frozen at the scenario's start time.
pub struct ScenarioClock {
    now: DateTime<Utc>,
}

impl Clock for ScenarioClock {
    fn local(&self) -> DateTime<Local> {
        self.now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Scenario world for task archiving behaviour tests.
pub struct ArchiveWorld {
    pub store: Arc<InMemoryTabularStore>,
    pub clock: Arc<ScenarioClock>,
    pub config: Arc<BoardConfig>,
    pub last_report: Option<SweepReport>,
}

impl ArchiveWorld {
    /// Creates a world whose live table holds only its header.
    #[must_use]
    pub fn new() -> Self {
        let config = BoardConfig::default();
        let workbook = Workbook {
            sheets: vec![Sheet {
                name: config.live_sheet.clone(),
                header: SheetHeader::bold(LiveLayout::HEADER),
                rows: Vec::new(),
            }],
        };
        let now = Utc
            .with_ymd_and_hms(2023, 10, 18, 12, 0, 0)
            .single()
            .unwrap_or_default();
        Self {
            store: Arc::new(InMemoryTabularStore::with_workbook(workbook)),
            clock: Arc::new(ScenarioClock { now }),
            config: Arc::new(config),
            last_report: None,
        }
    }

    /// Returns the scenario's current time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Returns the time `hours` before now.
    #[must_use]
    pub fn hours_ago(&self, hours: i64) -> DateTime<Utc> {
        self.now() - TimeDelta::hours(hours)
    }

    /// Parses every row of the live table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read or a row is malformed.
    pub fn live_tasks(&self) -> Result<Vec<TaskRecord>, eyre::Report> {
        let rows = run_async(self.store.read_all_rows(&self.config.live_sheet))?;
        let mut tasks = Vec::new();
        for row in &rows {
            let parsed = TaskRecord::from_row(row, &self.config.layout, &self.config.team_roster)
                .map_err(|err| eyre!("malformed live row: {err}"))?;
            tasks.extend(parsed);
        }
        Ok(tasks)
    }

    /// Finds the live row holding `description`.
    ///
    /// # Errors
    ///
    /// Returns an error if no live task has that description.
    pub fn row_of(&self, description: &str) -> Result<RowIndex, eyre::Report> {
        let offset = self
            .live_tasks()?
            .iter()
            .position(|task| task.description() == description)
            .ok_or_else(|| eyre!("no live task named {description}"))?;
        Ok(RowIndex::from_data_offset(offset)?)
    }

    /// Returns the live task holding `description`.
    ///
    /// # Errors
    ///
    /// Returns an error if no live task has that description.
    pub fn task(&self, description: &str) -> Result<TaskRecord, eyre::Report> {
        self.live_tasks()?
            .into_iter()
            .find(|task| task.description() == description)
            .ok_or_else(|| eyre!("no live task named {description}"))
    }
}

impl Default for ArchiveWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ArchiveWorld {
    ArchiveWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated step argument into trimmed descriptions.
#[must_use]
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
