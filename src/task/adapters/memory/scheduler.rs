//! In-memory scheduler that records registrations and fires them on demand.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;

use crate::task::{
    domain::{JobId, WeeklySchedule},
    ports::{ArchiveScheduler, ScheduledJob, SchedulerError, SchedulerResult},
};

/// Scheduler double that never fires on its own.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduler {
    state: Arc<RwLock<HashMap<JobId, (WeeklySchedule, ScheduledJob)>>>,
}

impl InMemoryScheduler {
    /// Creates a scheduler with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the schedule registered for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Runtime`] if the lock is poisoned.
    pub fn schedule_for(&self, id: &JobId) -> SchedulerResult<Option<WeeklySchedule>> {
        let state = self.state.read().map_err(|err| {
            SchedulerError::runtime(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(id).map(|(schedule, _)| *schedule))
    }

    /// Returns the number of registrations.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Runtime`] if the lock is poisoned.
    pub fn registration_count(&self) -> SchedulerResult<usize> {
        let state = self.state.read().map_err(|err| {
            SchedulerError::runtime(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.len())
    }

    /// Runs the job registered for `id` once, as if its time had come.
    /// Returns `false` when nothing is registered.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Runtime`] if the lock is poisoned.
    pub async fn fire(&self, id: &JobId) -> SchedulerResult<bool> {
        let job = {
            let state = self.state.read().map_err(|err| {
                SchedulerError::runtime(std::io::Error::other(err.to_string()))
            })?;
            state.get(id).map(|(_, job)| job.clone())
        };
        let Some(job) = job else {
            return Ok(false);
        };
        job.run(CancellationToken::new()).await;
        Ok(true)
    }
}

#[async_trait]
impl ArchiveScheduler for InMemoryScheduler {
    async fn register_weekly(
        &self,
        id: &JobId,
        schedule: WeeklySchedule,
        job: ScheduledJob,
    ) -> SchedulerResult<()> {
        let mut state = self.state.write().map_err(|err| {
            SchedulerError::runtime(std::io::Error::other(err.to_string()))
        })?;
        state.insert(id.clone(), (schedule, job));
        Ok(())
    }

    async fn unregister(&self, id: &JobId) -> SchedulerResult<bool> {
        let mut state = self.state.write().map_err(|err| {
            SchedulerError::runtime(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.remove(id).is_some())
    }

    async fn is_registered(&self, id: &JobId) -> SchedulerResult<bool> {
        let state = self.state.read().map_err(|err| {
            SchedulerError::runtime(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.contains_key(id))
    }
}
