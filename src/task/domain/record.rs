//! Task and archive records parsed from sheet rows.

use super::{CellValue, ColumnIndex, LiveLayout, Row, TaskDomainError, TeamRoster};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority label used for counting urgent work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Urgent work, counted on the dashboard.
    High,
    /// Normal work.
    Medium,
    /// Work that can wait.
    Low,
}

impl Priority {
    /// Returns the label shown in the sheet.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = TaskDomainError;

    /// Parses a label, ignoring case and surrounding whitespace.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let label = value.trim();
        [Self::High, Self::Medium, Self::Low]
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| TaskDomainError::UnknownPriority(value.to_owned()))
    }
}

/// One task row of the live table.
///
/// Only the done cell decides whether a row is a task at all. Values that
/// are readable but unexpected, such as an assignee who has left the roster,
/// are kept on the record as warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    done: bool,
    description: String,
    priority: Option<Priority>,
    assignee: Option<String>,
    completed_at: Option<DateTime<Utc>>,
    warnings: Vec<TaskDomainError>,
}

impl TaskRecord {
    /// Creates an open task with no priority, assignee or completion stamp.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            done: false,
            description: description.into(),
            priority: None,
            assignee: None,
            completed_at: None,
            warnings: Vec::new(),
        }
    }

    /// Sets the priority label.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Marks the task done at `completed_at`.
    #[must_use]
    pub const fn completed(mut self, completed_at: DateTime<Utc>) -> Self {
        self.done = true;
        self.completed_at = Some(completed_at);
        self
    }

    /// Marks the task done without a completion stamp.
    #[must_use]
    pub const fn checked_without_stamp(mut self) -> Self {
        self.done = true;
        self.completed_at = None;
        self
    }

    /// Parses a live-table row.
    ///
    /// Returns `Ok(None)` for padding rows whose cells are all blank. A
    /// completion cell that is not a timestamp is read as absent. Text is
    /// kept as written; trimming applies only to the priority and roster
    /// lookups.
    ///
    /// An unknown priority label, an assignee missing from `roster`, or a
    /// non-text description, priority or assignee cell is recorded in
    /// [`TaskRecord::warnings`] and the affected field is left unset.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDoneValue`] when the done cell is
    /// neither a boolean nor empty.
    pub fn from_row(
        row: &[CellValue],
        layout: &LiveLayout,
        roster: &TeamRoster,
    ) -> Result<Option<Self>, TaskDomainError> {
        if row.iter().all(CellValue::is_blank) {
            return Ok(None);
        }

        let done = match LiveLayout::cell(row, layout.done) {
            CellValue::Bool(value) => *value,
            CellValue::Empty => false,
            other => return Err(TaskDomainError::InvalidDoneValue(format!("{other:?}"))),
        };

        let mut warnings = Vec::new();
        let description = noted(text_cell(row, layout.description), &mut warnings)
            .unwrap_or_default()
            .to_owned();
        let priority = noted(text_cell(row, layout.priority), &mut warnings)
            .and_then(|label| noted(Priority::try_from(label).map(Some), &mut warnings));
        let assignee = noted(text_cell(row, layout.assignee), &mut warnings).map(|name| {
            if !roster.contains(name.trim()) {
                warnings.push(TaskDomainError::UnknownAssignee(name.trim().to_owned()));
            }
            name.to_owned()
        });
        let completed_at = LiveLayout::cell(row, layout.completed_at).as_timestamp();

        Ok(Some(Self {
            done,
            description,
            priority,
            assignee,
            completed_at,
            warnings,
        }))
    }

    /// Renders the record as a live-table row in `layout`.
    #[must_use]
    pub fn to_row(&self, layout: &LiveLayout) -> Row {
        let width = layout
            .columns()
            .iter()
            .map(|column| column.get())
            .max()
            .unwrap_or_default();
        let mut row = vec![CellValue::Empty; width];
        let cells = [
            (layout.done, CellValue::Bool(self.done)),
            (layout.description, CellValue::text(self.description.as_str())),
            (layout.priority, priority_cell(self.priority)),
            (layout.assignee, optional_text_cell(self.assignee.as_deref())),
            (layout.completed_at, timestamp_cell(self.completed_at)),
        ];
        for (column, value) in cells {
            if let Some(slot) = row.get_mut(column.offset()) {
                *slot = value;
            }
        }
        row
    }

    /// Returns whether the task is checked.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority label, if set and recognised.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the assignee, if set.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the completion timestamp, if present.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the unexpected values found while parsing the row.
    #[must_use]
    pub fn warnings(&self) -> &[TaskDomainError] {
        &self.warnings
    }

    /// Returns `true` for an open task labelled [`Priority::High`].
    #[must_use]
    pub fn is_urgent_open(&self) -> bool {
        !self.done && self.priority == Some(Priority::High)
    }
}

/// A completed task moved out of the live table.
///
/// Archive rows hold description, priority, assignee and completion date,
/// in that order. The first three cells are copied exactly as they stood in
/// the live table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    description: CellValue,
    priority: CellValue,
    assignee: CellValue,
    completed_at: DateTime<Utc>,
}

impl ArchiveRecord {
    /// Header labels of every archive sheet.
    pub const COLUMNS: [&'static str; 4] =
        ["Task Description", "Priority", "Assignee", "Completion Date"];

    /// Copies the archived cells of a live row laid out by `layout`.
    ///
    /// Returns `None` when the completion cell holds no timestamp.
    #[must_use]
    pub fn from_live_row(row: &[CellValue], layout: &LiveLayout) -> Option<Self> {
        Self::from_cells(
            row,
            [layout.description, layout.priority, layout.assignee],
            layout.completed_at,
        )
    }

    /// Reads an archive row.
    ///
    /// Returns `None` when the completion column holds no timestamp.
    #[must_use]
    pub fn from_row(row: &[CellValue]) -> Option<Self> {
        Self::from_cells(
            row,
            [ColumnIndex(1), ColumnIndex(2), ColumnIndex(3)],
            ColumnIndex(4),
        )
    }

    fn from_cells(
        row: &[CellValue],
        [description, priority, assignee]: [ColumnIndex; 3],
        completed_at: ColumnIndex,
    ) -> Option<Self> {
        let completed_at = LiveLayout::cell(row, completed_at).as_timestamp()?;
        Some(Self {
            description: LiveLayout::cell(row, description).clone(),
            priority: LiveLayout::cell(row, priority).clone(),
            assignee: LiveLayout::cell(row, assignee).clone(),
            completed_at,
        })
    }

    /// Renders the record as an archive row.
    #[must_use]
    pub fn to_row(&self) -> Row {
        vec![
            self.description.clone(),
            self.priority.clone(),
            self.assignee.clone(),
            CellValue::Timestamp(self.completed_at),
        ]
    }

    /// Returns the task description, or `""` for a non-text cell.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_text().unwrap_or_default()
    }

    /// Returns the priority label, if set and recognised.
    #[must_use]
    pub fn priority(&self) -> Option<Priority> {
        self.priority
            .as_text()
            .and_then(|label| Priority::try_from(label).ok())
    }

    /// Returns the assignee, if set.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee
            .as_text()
            .filter(|name| !name.trim().is_empty())
    }

    /// Returns the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

/// Reads a text cell, treating blank cells as absent.
fn text_cell(row: &[CellValue], column: ColumnIndex) -> Result<Option<&str>, TaskDomainError> {
    match LiveLayout::cell(row, column) {
        CellValue::Empty => Ok(None),
        CellValue::Text(text) if text.trim().is_empty() => Ok(None),
        CellValue::Text(text) => Ok(Some(text)),
        other => Err(TaskDomainError::ExpectedText {
            column: column.get(),
            found: format!("{other:?}"),
        }),
    }
}

/// Moves a field-level failure into `warnings`.
fn noted<T>(
    value: Result<Option<T>, TaskDomainError>,
    warnings: &mut Vec<TaskDomainError>,
) -> Option<T> {
    value.unwrap_or_else(|warning| {
        warnings.push(warning);
        None
    })
}

fn priority_cell(priority: Option<Priority>) -> CellValue {
    priority.map_or(CellValue::Empty, |value| CellValue::text(value.as_str()))
}

fn optional_text_cell(value: Option<&str>) -> CellValue {
    value.map_or(CellValue::Empty, CellValue::text)
}

fn timestamp_cell(value: Option<DateTime<Utc>>) -> CellValue {
    value.map_or(CellValue::Empty, CellValue::Timestamp)
}
