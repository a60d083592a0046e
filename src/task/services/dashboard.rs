//! Dashboard aggregator over the live table.

use crate::config::BoardConfig;
use crate::task::{
    domain::{DashboardSnapshot, TaskRecord},
    ports::{StoreResult, TabularStore},
};
use std::sync::Arc;
use tracing::debug;

/// Computes dashboard counts on demand.
#[derive(Clone)]
pub struct DashboardService<S>
where
    S: TabularStore,
{
    store: Arc<S>,
    config: Arc<BoardConfig>,
}

impl<S> DashboardService<S>
where
    S: TabularStore,
{
    /// Creates a dashboard service.
    #[must_use]
    pub const fn new(store: Arc<S>, config: Arc<BoardConfig>) -> Self {
        Self { store, config }
    }

    /// Reads the live table and counts open, urgent and completed tasks.
    ///
    /// Padding rows are not tasks. Rows whose done cell is unreadable are
    /// skipped; unknown priorities or assignees do not affect the counts.
    ///
    /// # Errors
    ///
    /// Returns [`crate::task::ports::StoreError`] when the live table cannot
    /// be read.
    pub async fn snapshot(&self) -> StoreResult<DashboardSnapshot> {
        let rows = self.store.read_all_rows(&self.config.live_sheet).await?;
        let records: Vec<TaskRecord> = rows
            .iter()
            .enumerate()
            .filter_map(|(offset, row)| {
                TaskRecord::from_row(row, &self.config.layout, &self.config.team_roster)
                    .inspect_err(|err| {
                        debug!(offset, error = %err, "dashboard skipping malformed row");
                    })
                    .ok()
                    .flatten()
            })
            .collect();
        Ok(DashboardSnapshot::tally(&records))
    }
}
