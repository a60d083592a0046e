//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod scheduler;
pub mod store;

pub use scheduler::{ArchiveScheduler, ScheduledJob, SchedulerError, SchedulerResult};
pub use store::{SheetHeader, StoreError, StoreResult, TabularStore};
