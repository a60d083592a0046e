//! Domain model for the task board.
//!
//! The domain covers the live-table row schema, the rule coupling the done
//! checkbox to the completion stamp, archive eligibility and naming, the
//! weekly sweep schedule, and dashboard counts. Storage and scheduling stay
//! outside the domain boundary.

mod archive;
mod cell;
mod dashboard;
mod error;
mod event;
mod ids;
mod layout;
mod record;
mod schedule;

pub use archive::ArchivePolicy;
pub use cell::{CellValue, Row};
pub use dashboard::DashboardSnapshot;
pub use error::TaskDomainError;
pub use event::EditEvent;
pub use ids::{ColumnIndex, JobId, RowIndex, SheetName, SweepRunId};
pub use layout::{LiveLayout, TeamRoster};
pub use record::{ArchiveRecord, Priority, TaskRecord};
pub use schedule::WeeklySchedule;
