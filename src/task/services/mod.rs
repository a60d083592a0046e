//! Application services for the task board.

mod dashboard;
mod lifecycle;
mod schedule;
mod sweeper;

pub use dashboard::DashboardService;
pub use lifecycle::{EditOutcome, LifecycleError, LifecycleResult, TaskLifecycleController};
pub use schedule::{ArchiveScheduleService, ScheduleServiceError};
pub use sweeper::{ArchivalSweeper, SweepError, SweepReport, SweepRowError};
