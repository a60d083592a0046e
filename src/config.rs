//! Board configuration passed into every service at construction.

use crate::task::domain::{
    ArchivePolicy, LiveLayout, SheetName, TaskDomainError, TeamRoster, WeeklySchedule,
};
use chrono::{FixedOffset, Offset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SECONDS_PER_MINUTE: i32 = 60;

/// Errors raised while loading a [`BoardConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid configuration JSON.
    #[error("failed to parse board configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is structurally invalid.
    #[error(transparent)]
    Invalid(#[from] TaskDomainError),

    /// The UTC offset does not describe a real time zone offset.
    #[error("invalid UTC offset of {0} minutes")]
    InvalidOffset(i32),
}

/// Task board settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Sheet holding the live task table.
    pub live_sheet: SheetName,
    /// People tasks may be assigned to.
    pub team_roster: TeamRoster,
    /// Hours a completed task stays in the live table.
    pub grace_period_hours: u32,
    /// Offset used to decide the calendar month of a completion stamp and
    /// the local hour of the weekly sweep.
    pub utc_offset_minutes: i32,
    /// When the weekly sweep fires.
    pub schedule: WeeklySchedule,
    /// Column layout of the live table.
    pub layout: LiveLayout,
}

impl BoardConfig {
    /// Parses and validates configuration JSON. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document does not parse, a column is
    /// repeated, or the offset is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks structural invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for repeated layout columns or an invalid
    /// offset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.try_offset()?;
        Ok(())
    }

    /// Returns the configured calendar offset, falling back to UTC when it
    /// is out of range.
    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        self.try_offset().unwrap_or_else(|_| Utc.fix())
    }

    /// Returns the archive policy built from the grace period and offset.
    #[must_use]
    pub fn archive_policy(&self) -> ArchivePolicy {
        ArchivePolicy::new(
            TimeDelta::hours(i64::from(self.grace_period_hours)),
            self.offset(),
        )
    }

    fn try_offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(SECONDS_PER_MINUTE)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_minutes))
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            live_sheet: SheetName::from_literal("TODO"),
            team_roster: TeamRoster::default(),
            grace_period_hours: 24,
            utc_offset_minutes: 0,
            schedule: WeeklySchedule::default(),
            layout: LiveLayout::default(),
        }
    }
}
