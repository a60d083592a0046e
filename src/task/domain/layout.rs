//! Column layout of the live table and the team roster.

use super::{CellValue, ColumnIndex, TaskDomainError, cell::EMPTY_CELL};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Column positions of the live task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveLayout {
    /// Checkbox column.
    pub done: ColumnIndex,
    /// Free-form task description.
    pub description: ColumnIndex,
    /// Priority label.
    pub priority: ColumnIndex,
    /// Assignee from the team roster.
    pub assignee: ColumnIndex,
    /// Completion timestamp written by the lifecycle controller.
    pub completed_at: ColumnIndex,
}

impl LiveLayout {
    /// Header labels written above the default layout.
    pub const HEADER: [&'static str; 5] = [
        "Status",
        "Task Description",
        "Priority",
        "Assignee",
        "Completion Date",
    ];

    /// Returns the cell of `row` at `column`, or an empty cell past the end.
    #[must_use]
    pub fn cell(row: &[CellValue], column: ColumnIndex) -> &CellValue {
        row.get(column.offset()).unwrap_or(&EMPTY_CELL)
    }

    /// Returns every column in the layout.
    #[must_use]
    pub const fn columns(&self) -> [ColumnIndex; 5] {
        [
            self.done,
            self.description,
            self.priority,
            self.assignee,
            self.completed_at,
        ]
    }

    /// Checks that no two fields share a column.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidColumnIndex`] naming the first
    /// repeated column.
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        let mut seen = HashSet::new();
        for column in self.columns() {
            if !seen.insert(column) {
                return Err(TaskDomainError::InvalidColumnIndex(column.get()));
            }
        }
        Ok(())
    }
}

impl Default for LiveLayout {
    fn default() -> Self {
        Self {
            done: ColumnIndex(1),
            description: ColumnIndex(2),
            priority: ColumnIndex(3),
            assignee: ColumnIndex(4),
            completed_at: ColumnIndex(5),
        }
    }
}

/// Fixed list of people tasks may be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamRoster(Vec<String>);

impl TeamRoster {
    /// Creates a roster from member names.
    #[must_use]
    pub fn new(members: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(members.into_iter().map(Into::into).collect())
    }

    /// Returns `true` when `name` is a roster member.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|member| member == name)
    }
}

impl Default for TeamRoster {
    fn default() -> Self {
        Self::new(["Mario", "Luigi"])
    }
}
