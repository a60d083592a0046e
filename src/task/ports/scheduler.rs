//! Scheduler port for the weekly archive sweep.

use crate::task::domain::{JobId, WeeklySchedule};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

type JobFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Callback a scheduler invokes on each firing.
///
/// Each run receives a [`CancellationToken`] that the scheduler cancels when
/// the registration is replaced or removed. Jobs stop at their next safe
/// point rather than being torn down mid-step.
#[derive(Clone)]
pub struct ScheduledJob(Arc<dyn Fn(CancellationToken) -> JobFuture + Send + Sync>);

impl ScheduledJob {
    /// Wraps an async callback.
    pub fn new<F, Fut>(callback: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self(Arc::new(move |cancel| -> JobFuture { Box::pin(callback(cancel)) }))
    }

    /// Runs the callback once.
    pub async fn run(&self, cancel: CancellationToken) {
        (self.0)(cancel).await;
    }
}

impl fmt::Debug for ScheduledJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScheduledJob")
    }
}

/// Weekly job registration contract.
///
/// At most one registration exists per [`JobId`]; registering again
/// replaces the previous schedule and callback. A replaced or removed job
/// that is running is cancelled through its token, not aborted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArchiveScheduler: Send + Sync {
    /// Registers `job` to run weekly, replacing any earlier registration.
    async fn register_weekly(
        &self,
        id: &JobId,
        schedule: WeeklySchedule,
        job: ScheduledJob,
    ) -> SchedulerResult<()>;

    /// Removes a registration. Returns `true` if one existed.
    async fn unregister(&self, id: &JobId) -> SchedulerResult<bool>;

    /// Returns `true` when a registration exists for `id`.
    async fn is_registered(&self, id: &JobId) -> SchedulerResult<bool>;
}

/// Errors returned by scheduler implementations.
#[derive(Debug, Clone, Error)]
pub enum SchedulerError {
    /// No next firing time could be computed.
    #[error("no next firing time for job {0}")]
    Unschedulable(JobId),

    /// Scheduler runtime failure.
    #[error("scheduler runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl SchedulerError {
    /// Wraps a runtime error from the scheduler adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
