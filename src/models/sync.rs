use std::fmt;

use serde::Serialize;

/// What the sync engine did with one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncOutcome {
    Added,
    Updated,
    Skipped,
}

impl SyncOutcome {
    /// Progress line printed for the `index`-th of `total` assignments.
    pub fn progress_line(&self, index: usize, total: usize, title: &str) -> String {
        match self {
            SyncOutcome::Added => format!("Added assignment ({}/{}): {}", index, total, title),
            SyncOutcome::Updated => format!(
                "Updated assignment due date ({}/{}): {}",
                index, total, title
            ),
            SyncOutcome::Skipped => format!("Skipping ({}/{}): {}", index, total, title),
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyncOutcome::Added => "added",
            SyncOutcome::Updated => "updated",
            SyncOutcome::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
    pub repositioned: usize,
}

impl SyncStats {
    pub fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Added => self.added += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Skipped => self.skipped += 1,
        }
    }
}
