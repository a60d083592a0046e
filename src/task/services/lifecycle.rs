//! Lifecycle controller coupling the done checkbox to the completion stamp.

use crate::config::BoardConfig;
use crate::task::{
    domain::{CellValue, ColumnIndex, EditEvent, RowIndex, TaskDomainError},
    ports::{StoreError, TabularStore},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// What the controller did in response to an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edit was outside the done column or on the header row.
    Ignored,
    /// The completion stamp was written.
    Stamped(DateTime<Utc>),
    /// The completion stamp was cleared.
    Cleared,
}

/// Errors raised while applying an edit.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The edit event carried invalid coordinates.
    #[error(transparent)]
    Malformed(#[from] TaskDomainError),
    /// The stamp could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for lifecycle controller operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Reacts to single-cell edits of the live table.
///
/// Checking the done box stamps the completion time; any other value in the
/// done column clears it. Every other edit is ignored.
#[derive(Clone)]
pub struct TaskLifecycleController<S, C>
where
    S: TabularStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: Arc<BoardConfig>,
}

impl<S, C> TaskLifecycleController<S, C>
where
    S: TabularStore,
    C: Clock + Send + Sync,
{
    /// Creates a controller.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>, config: Arc<BoardConfig>) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Applies an edit, performing at most one cell write.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Malformed`] for zero coordinates and
    /// [`LifecycleError::Store`] when the write is rejected.
    pub async fn apply_edit(&self, event: &EditEvent) -> LifecycleResult<EditOutcome> {
        if event.sheet_name.trim() != self.config.live_sheet.as_str() {
            return Ok(EditOutcome::Ignored);
        }
        let row = RowIndex::new(event.row)?;
        let column = ColumnIndex::new(event.column)?;
        let layout = &self.config.layout;
        if row.is_header() || column != layout.done {
            return Ok(EditOutcome::Ignored);
        }

        let sheet = &self.config.live_sheet;
        if event.new_value.is_true() {
            let stamped_at = self.clock.utc();
            self.store
                .write_cell(
                    sheet,
                    row,
                    layout.completed_at,
                    CellValue::Timestamp(stamped_at),
                )
                .await?;
            Ok(EditOutcome::Stamped(stamped_at))
        } else {
            self.store.clear_cell(sheet, row, layout.completed_at).await?;
            Ok(EditOutcome::Cleared)
        }
    }

    /// Applies an edit and swallows any failure after logging it, so the
    /// user's edit always stands.
    pub async fn handle_edit(&self, event: &EditEvent) {
        match self.apply_edit(event).await {
            Ok(EditOutcome::Ignored) => {}
            Ok(outcome) => debug!(row = event.row, ?outcome, "completion stamp updated"),
            Err(LifecycleError::Malformed(err)) => {
                debug!(
                    row = event.row,
                    column = event.column,
                    error = %err,
                    "ignoring malformed edit event"
                );
            }
            Err(LifecycleError::Store(err)) => {
                warn!(row = event.row, error = %err, "failed to update completion stamp");
            }
        }
    }
}
