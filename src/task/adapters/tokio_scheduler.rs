//! Scheduler that fires weekly jobs on the Tokio runtime.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::task::{
    domain::{JobId, WeeklySchedule},
    ports::{ArchiveScheduler, ScheduledJob, SchedulerError, SchedulerResult},
};

/// Running task of one registration.
struct JobTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl JobTask {
    /// Cancels the task and waits until its current run reaches a safe stop.
    async fn stop(self, id: &JobId) {
        self.cancel.cancel();
        if let Err(err) = self.handle.await {
            warn!(job = %id, error = %err, "scheduled job ended abnormally");
        }
    }
}

/// Runs each registered job in its own Tokio task, sleeping until the next
/// firing instant computed from the injected clock.
///
/// Re-registering or unregistering a job cancels its token and waits for the
/// running task to wind down, so a sweep in progress finishes its current
/// row. Dropping the scheduler cancels every token without waiting.
pub struct TokioWeeklyScheduler<C>
where
    C: Clock + Send + Sync + 'static,
{
    clock: Arc<C>,
    offset: FixedOffset,
    jobs: Mutex<HashMap<JobId, JobTask>>,
}

impl<C> TokioWeeklyScheduler<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a scheduler evaluating weekday and hour in `offset`.
    #[must_use]
    pub fn new(clock: Arc<C>, offset: FixedOffset) -> Self {
        Self {
            clock,
            offset,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> SchedulerResult<MutexGuard<'_, HashMap<JobId, JobTask>>> {
        self.jobs
            .lock()
            .map_err(|err| SchedulerError::runtime(std::io::Error::other(err.to_string())))
    }
}

async fn run_weekly<C>(
    id: JobId,
    schedule: WeeklySchedule,
    job: ScheduledJob,
    clock: Arc<C>,
    offset: FixedOffset,
    cancel: CancellationToken,
) where
    C: Clock + Send + Sync + 'static,
{
    // Never fire the same slot twice, even if the wall clock lags the timer.
    let mut last_fired = None;
    loop {
        let now = clock.utc();
        let from = last_fired.map_or(now, |fired: DateTime<Utc>| fired.max(now));
        let Some(next) = schedule.next_run_after(from, offset) else {
            warn!(job = %id, "no next firing time, stopping job");
            return;
        };
        let wait = next
            .signed_duration_since(now)
            .to_std()
            .unwrap_or_default();
        tokio::select! {
            () = cancel.cancelled() => {
                debug!(job = %id, "scheduled job cancelled while waiting");
                return;
            }
            () = tokio::time::sleep(wait) => {}
        }
        info!(job = %id, scheduled_for = %next, "firing scheduled job");
        job.run(cancel.clone()).await;
        if cancel.is_cancelled() {
            debug!(job = %id, "scheduled job cancelled after run");
            return;
        }
        last_fired = Some(next);
    }
}

#[async_trait]
impl<C> ArchiveScheduler for TokioWeeklyScheduler<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn register_weekly(
        &self,
        id: &JobId,
        schedule: WeeklySchedule,
        job: ScheduledJob,
    ) -> SchedulerResult<()> {
        if schedule
            .next_run_after(self.clock.utc(), self.offset)
            .is_none()
        {
            return Err(SchedulerError::Unschedulable(id.clone()));
        }

        let previous = self.lock()?.remove(id);
        if let Some(previous) = previous {
            previous.stop(id).await;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_weekly(
            id.clone(),
            schedule,
            job,
            Arc::clone(&self.clock),
            self.offset,
            cancel.clone(),
        ));
        let raced = self.lock()?.insert(id.clone(), JobTask { cancel, handle });
        if let Some(raced) = raced {
            raced.stop(id).await;
        }
        Ok(())
    }

    async fn unregister(&self, id: &JobId) -> SchedulerResult<bool> {
        let removed = self.lock()?.remove(id);
        let Some(task) = removed else {
            return Ok(false);
        };
        task.stop(id).await;
        Ok(true)
    }

    async fn is_registered(&self, id: &JobId) -> SchedulerResult<bool> {
        Ok(self
            .lock()?
            .get(id)
            .is_some_and(|task| !task.handle.is_finished()))
    }
}

impl<C> Drop for TokioWeeklyScheduler<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if let Ok(jobs) = self.jobs.get_mut() {
            for task in jobs.values() {
                task.cancel.cancel();
            }
        }
    }
}
