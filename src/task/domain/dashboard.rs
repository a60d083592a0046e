//! Derived dashboard counts.

use super::TaskRecord;
use serde::Serialize;

/// Live counts shown on the team dashboard.
///
/// Always recomputed from the live table; never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    /// Tasks not yet checked.
    pub open: usize,
    /// Open tasks labelled high priority.
    pub urgent_open: usize,
    /// Checked tasks still waiting in the live table.
    pub done_pending_archive: usize,
}

impl DashboardSnapshot {
    /// Tallies a sequence of task records.
    #[must_use]
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a TaskRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut snapshot, record| {
                if record.is_done() {
                    snapshot.done_pending_archive += 1;
                } else {
                    snapshot.open += 1;
                    if record.is_urgent_open() {
                        snapshot.urgent_open += 1;
                    }
                }
                snapshot
            })
    }

    /// Returns the counts as labelled dashboard rows.
    #[must_use]
    pub const fn rows(&self) -> [(&'static str, usize); 3] {
        [
            ("Total Open Tasks", self.open),
            ("Urgent (High Priority)", self.urgent_open),
            ("Completed (Pending Archive)", self.done_pending_archive),
        ]
    }
}
