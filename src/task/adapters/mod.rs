//! Adapter implementations for task board ports.

pub mod json;
pub mod memory;
pub mod tokio_scheduler;
pub mod workbook;

pub use tokio_scheduler::TokioWeeklyScheduler;
