//! Archival sweeper moving stale completed tasks into monthly archive sheets.

use crate::config::BoardConfig;
use crate::task::{
    domain::{
        ArchivePolicy, ArchiveRecord, Row, RowIndex, SheetName, SweepRunId, TaskDomainError,
        TaskRecord,
    },
    ports::{ScheduledJob, SheetHeader, StoreError, TabularStore},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Tally of one sweep run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Correlation identifier of the run.
    pub run_id: SweepRunId,
    /// Rows moved into an archive sheet.
    pub archived: usize,
    /// Rows left in place because they are not eligible yet.
    pub retained: usize,
    /// Rows left in place because they do not match the schema.
    pub malformed: usize,
    /// Eligible rows left in place because they changed after the snapshot.
    pub changed: usize,
    /// Eligible rows left in place because a store operation failed.
    pub failed: usize,
    /// `true` when the run stopped early on cancellation.
    pub cancelled: bool,
}

impl SweepReport {
    fn new(run_id: SweepRunId) -> Self {
        Self {
            run_id,
            archived: 0,
            retained: 0,
            malformed: 0,
            changed: 0,
            failed: 0,
            cancelled: false,
        }
    }
}

/// Failure that prevents a sweep from starting.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The live table could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure while moving a single row. The row stays in the live table.
#[derive(Debug, Error)]
pub enum SweepRowError {
    /// The row could not be addressed or named.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// A store operation failed before the row was deleted.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The live row could not be deleted and the archive copy could not be
    /// removed again.
    #[error(
        "delete of live row failed ({delete}) and archive row {archived_row} in {archive} could not be removed ({rollback})"
    )]
    RollbackFailed {
        /// Archive sheet holding the orphaned copy.
        archive: SheetName,
        /// Row of the orphaned copy.
        archived_row: RowIndex,
        /// Error returned by the live-row delete.
        delete: StoreError,
        /// Error returned by the compensating delete.
        rollback: StoreError,
    },
}

enum RowOutcome {
    Archived(SheetName),
    Changed,
}

/// Scans the live table and moves every eligible row to its month's archive
/// sheet.
///
/// Rows are visited from the last to the first so that deleting a row never
/// renumbers a row that is still to be visited. A second sweep with no edits
/// in between does nothing.
#[derive(Clone)]
pub struct ArchivalSweeper<S, C>
where
    S: TabularStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: Arc<BoardConfig>,
    policy: ArchivePolicy,
}

impl<S, C> ArchivalSweeper<S, C>
where
    S: TabularStore,
    C: Clock + Send + Sync,
{
    /// Creates a sweeper.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, config: Arc<BoardConfig>) -> Self {
        let policy = config.archive_policy();
        Self {
            store,
            clock,
            config,
            policy,
        }
    }

    /// Runs a full sweep.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] only when the live table cannot be read.
    /// Per-row failures are logged and counted in the report.
    pub async fn sweep(&self) -> Result<SweepReport, SweepError> {
        self.sweep_until_cancelled(&CancellationToken::new()).await
    }

    /// Runs a sweep that stops at the next row boundary once `limit`
    /// elapses.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] only when the live table cannot be read.
    pub async fn sweep_with_timeout(&self, limit: Duration) -> Result<SweepReport, SweepError> {
        let cancel = CancellationToken::new();
        let timer = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                tokio::time::sleep(limit).await;
                cancel.cancel();
            }
        });
        let result = self.sweep_until_cancelled(&cancel).await;
        timer.abort();
        result
    }

    /// Runs a sweep that checks `cancel` between rows, never mid-row.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] only when the live table cannot be read.
    pub async fn sweep_until_cancelled(
        &self,
        cancel: &CancellationToken,
    ) -> Result<SweepReport, SweepError> {
        let run_id = SweepRunId::new();
        let span = info_span!("archive_sweep", run_id = %run_id);
        self.run(run_id, cancel).instrument(span).await
    }

    async fn run(
        &self,
        run_id: SweepRunId,
        cancel: &CancellationToken,
    ) -> Result<SweepReport, SweepError> {
        let mut report = SweepReport::new(run_id);
        if cancel.is_cancelled() {
            report.cancelled = true;
            info!("archive sweep cancelled before start");
            return Ok(report);
        }

        let sheet = &self.config.live_sheet;
        let now = self.clock.utc();
        let snapshot = self.store.read_all_rows(sheet).await?;
        debug!(rows = snapshot.len(), "live table snapshot taken");

        for (offset, row) in snapshot.iter().enumerate().rev() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                info!(remaining = offset + 1, "archive sweep cancelled between rows");
                break;
            }
            self.visit(sheet, offset, row, now, &mut report).await;
        }

        info!(
            archived = report.archived,
            retained = report.retained,
            malformed = report.malformed,
            changed = report.changed,
            failed = report.failed,
            cancelled = report.cancelled,
            "archive sweep finished"
        );
        Ok(report)
    }

    async fn visit(
        &self,
        sheet: &SheetName,
        offset: usize,
        row: &Row,
        now: DateTime<Utc>,
        report: &mut SweepReport,
    ) {
        let index = match RowIndex::from_data_offset(offset) {
            Ok(index) => index,
            Err(err) => {
                warn!(offset, error = %err, "row offset cannot be addressed");
                report.failed += 1;
                return;
            }
        };

        let layout = &self.config.layout;
        let record = match TaskRecord::from_row(row, layout, &self.config.team_roster) {
            Ok(Some(record)) => record,
            Ok(None) => {
                report.retained += 1;
                return;
            }
            Err(err) => {
                warn!(row = index.get(), error = %err, "skipping malformed task row");
                report.malformed += 1;
                return;
            }
        };
        for warning in record.warnings() {
            debug!(row = index.get(), warning = %warning, "task row has an unexpected value");
        }

        let archive = ArchiveRecord::from_live_row(row, layout)
            .filter(|_| self.policy.is_eligible(&record, now));
        let Some(archive) = archive else {
            report.retained += 1;
            return;
        };

        match self.archive_row(sheet, index, row, &archive).await {
            Ok(RowOutcome::Archived(destination)) => {
                debug!(row = index.get(), archive = %destination, "task archived");
                report.archived += 1;
            }
            Ok(RowOutcome::Changed) => {
                warn!(
                    row = index.get(),
                    "live row changed since snapshot, leaving it for the next sweep"
                );
                report.changed += 1;
            }
            Err(err @ SweepRowError::RollbackFailed { .. }) => {
                error!(
                    row = index.get(),
                    error = %err,
                    "task left in both live and archive sheets"
                );
                report.failed += 1;
            }
            Err(err) => {
                warn!(
                    row = index.get(),
                    error = %err,
                    "failed to archive task, leaving it in place"
                );
                report.failed += 1;
            }
        }
    }

    /// Moves one row: re-check it, append the archive copy, then delete the
    /// live row. A failed delete removes the archive copy again.
    async fn archive_row(
        &self,
        sheet: &SheetName,
        index: RowIndex,
        snapshot_row: &Row,
        archive: &ArchiveRecord,
    ) -> Result<RowOutcome, SweepRowError> {
        let destination = self.policy.destination(archive.completed_at())?;

        let current = self.store.read_row(sheet, index).await?;
        if current.as_ref() != Some(snapshot_row) {
            return Ok(RowOutcome::Changed);
        }

        self.ensure_archive_sheet(&destination).await?;
        let archived_row = self
            .store
            .append_row(&destination, archive.to_row())
            .await?;

        if let Err(delete) = self.store.delete_row(sheet, index).await {
            return match self.store.delete_row(&destination, archived_row).await {
                Ok(()) => Err(SweepRowError::Store(delete)),
                Err(rollback) => Err(SweepRowError::RollbackFailed {
                    archive: destination,
                    archived_row,
                    delete,
                    rollback,
                }),
            };
        }
        Ok(RowOutcome::Archived(destination))
    }

    async fn ensure_archive_sheet(&self, name: &SheetName) -> Result<(), StoreError> {
        if self.store.has_sheet(name).await? {
            return Ok(());
        }
        match self
            .store
            .create_sheet(name, &SheetHeader::bold(ArchiveRecord::COLUMNS))
            .await
        {
            Ok(()) => {
                info!(archive = %name, "created archive sheet");
                Ok(())
            }
            Err(StoreError::SheetExists(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

impl<S, C> ArchivalSweeper<S, C>
where
    S: TabularStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Wraps the sweeper as a scheduler callback that logs failed runs.
    ///
    /// The scheduler's cancellation token stops the sweep at the next row
    /// boundary.
    #[must_use]
    pub fn into_scheduled_job(self: Arc<Self>) -> ScheduledJob {
        ScheduledJob::new(move |cancel| {
            let sweeper = Arc::clone(&self);
            async move {
                if let Err(err) = sweeper.sweep_until_cancelled(&cancel).await {
                    error!(error = %err, "archive sweep could not read the live table");
                }
            }
        })
    }
}
