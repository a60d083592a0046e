//! Installs the weekly archive sweep with a scheduler.

use crate::config::BoardConfig;
use crate::task::{
    domain::JobId,
    ports::{ArchiveScheduler, ScheduledJob, SchedulerError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for schedule installation.
#[derive(Debug, Error)]
pub enum ScheduleServiceError {
    /// Scheduler operation failed.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Registers the archive sweep under a single job identity.
#[derive(Clone)]
pub struct ArchiveScheduleService<Sch>
where
    Sch: ArchiveScheduler,
{
    scheduler: Arc<Sch>,
    config: Arc<BoardConfig>,
    job_id: JobId,
}

impl<Sch> ArchiveScheduleService<Sch>
where
    Sch: ArchiveScheduler,
{
    /// Creates a service registering under [`JobId::weekly_archive`].
    #[must_use]
    pub fn new(scheduler: Arc<Sch>, config: Arc<BoardConfig>) -> Self {
        Self {
            scheduler,
            config,
            job_id: JobId::weekly_archive(),
        }
    }

    /// Returns the job identity used for registration.
    #[must_use]
    pub const fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Registers `job` on the configured weekly schedule. Any earlier
    /// registration under the same identity is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleServiceError::Scheduler`] when registration fails.
    pub async fn install(&self, job: ScheduledJob) -> Result<(), ScheduleServiceError> {
        let schedule = self.config.schedule;
        self.scheduler
            .register_weekly(&self.job_id, schedule, job)
            .await?;
        info!(
            job = %self.job_id,
            weekday = %schedule.weekday(),
            hour = schedule.hour(),
            "weekly archive sweep installed"
        );
        Ok(())
    }

    /// Removes the registration. Returns `true` if one existed.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleServiceError::Scheduler`] when removal fails.
    pub async fn uninstall(&self) -> Result<bool, ScheduleServiceError> {
        Ok(self.scheduler.unregister(&self.job_id).await?)
    }

    /// Returns `true` when the sweep is currently registered.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleServiceError::Scheduler`] when the lookup fails.
    pub async fn is_installed(&self) -> Result<bool, ScheduleServiceError> {
        Ok(self.scheduler.is_registered(&self.job_id).await?)
    }
}
