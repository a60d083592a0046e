//! Archive eligibility and destination naming.

use super::{SheetName, TaskDomainError, TaskRecord};
use chrono::{DateTime, Datelike, FixedOffset, Month, Offset, TimeDelta, Utc};

/// Rules deciding when a completed task leaves the live table and where it
/// goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchivePolicy {
    grace_period: TimeDelta,
    offset: FixedOffset,
}

impl ArchivePolicy {
    /// Prefix shared by every archive sheet name.
    pub const SHEET_PREFIX: &'static str = "Archive";

    /// Creates a policy with the given grace period and calendar offset.
    #[must_use]
    pub const fn new(grace_period: TimeDelta, offset: FixedOffset) -> Self {
        Self {
            grace_period,
            offset,
        }
    }

    /// Returns the grace period after completion.
    #[must_use]
    pub const fn grace_period(&self) -> TimeDelta {
        self.grace_period
    }

    /// Returns `true` when the task is done, carries a valid completion
    /// stamp, and that stamp is strictly older than the grace period.
    #[must_use]
    pub fn is_eligible(&self, record: &TaskRecord, now: DateTime<Utc>) -> bool {
        if !record.is_done() {
            return false;
        }
        record
            .completed_at()
            .is_some_and(|completed_at| now.signed_duration_since(completed_at) > self.grace_period)
    }

    /// Names the archive sheet for a completion timestamp, such as
    /// `Archive_October_2023`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptySheetName`] only if the calendar month
    /// cannot be resolved, which chrono rules out for valid timestamps.
    pub fn destination(&self, completed_at: DateTime<Utc>) -> Result<SheetName, TaskDomainError> {
        let local = completed_at.with_timezone(&self.offset);
        let month = u8::try_from(local.month())
            .ok()
            .and_then(|number| Month::try_from(number).ok())
            .ok_or(TaskDomainError::EmptySheetName)?;
        SheetName::new(format!(
            "{}_{}_{:04}",
            Self::SHEET_PREFIX,
            month.name(),
            local.year()
        ))
    }
}

impl Default for ArchivePolicy {
    fn default() -> Self {
        Self::new(TimeDelta::hours(24), Utc.fix())
    }
}
