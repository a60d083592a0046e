//! Weekly firing schedule for the archive sweep.

use super::TaskDomainError;
use chrono::{DateTime, Datelike, Days, FixedOffset, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// "Once a week, on `weekday`, at `hour`:00" in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeeklySchedule")]
pub struct WeeklySchedule {
    weekday: Weekday,
    hour: u32,
}

#[derive(Deserialize)]
struct RawWeeklySchedule {
    weekday: Weekday,
    hour: u32,
}

impl TryFrom<RawWeeklySchedule> for WeeklySchedule {
    type Error = TaskDomainError;

    fn try_from(raw: RawWeeklySchedule) -> Result<Self, Self::Error> {
        Self::new(raw.weekday, raw.hour)
    }
}

impl WeeklySchedule {
    /// Creates a validated schedule.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidHour`] when `hour` exceeds 23.
    pub const fn new(weekday: Weekday, hour: u32) -> Result<Self, TaskDomainError> {
        if hour > 23 {
            return Err(TaskDomainError::InvalidHour(hour));
        }
        Ok(Self { weekday, hour })
    }

    /// Returns the firing weekday.
    #[must_use]
    pub const fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Returns the firing hour.
    #[must_use]
    pub const fn hour(&self) -> u32 {
        self.hour
    }

    /// Returns the first firing instant strictly after `now`.
    ///
    /// Returns `None` only when the date arithmetic leaves chrono's range.
    #[must_use]
    pub fn next_run_after(&self, now: DateTime<Utc>, offset: FixedOffset) -> Option<DateTime<Utc>> {
        let today = now.with_timezone(&offset).date_naive();
        (0..=7_u64)
            .filter_map(|ahead| today.checked_add_days(Days::new(ahead)))
            .filter(|date| date.weekday() == self.weekday)
            .filter_map(|date| date.and_hms_opt(self.hour, 0, 0))
            .filter_map(|naive| offset.from_local_datetime(&naive).single())
            .map(|at| at.with_timezone(&Utc))
            .find(|at| *at > now)
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self {
            weekday: Weekday::Sun,
            hour: 23,
        }
    }
}
