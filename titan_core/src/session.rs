//! Pending workout session.
//!
//! Entries added during a workout are buffered here and only reach the
//! durable store when the session is finished. Until then they are visible
//! (listed, totalled) but not persisted.

use crate::{Result, Totals, WorkoutEntry, WorkoutStore};

/// In-memory buffer of entries waiting to be committed
#[derive(Clone, Debug, Default)]
pub struct PendingSession {
    entries: Vec<WorkoutEntry>,
}

impl PendingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: WorkoutEntry) {
        tracing::debug!("Added {} to pending session", entry.exercise());
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[WorkoutEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn totals(&self) -> Totals {
        Totals::from_entries(&self.entries)
    }

    /// Drop everything without persisting. Returns how many entries were dropped.
    pub fn discard(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Commit all pending entries to `store` as one batch.
    ///
    /// The buffer is cleared only once the commit succeeded; on error the
    /// entries stay pending so the caller can retry.
    pub fn finish(&mut self, store: &mut WorkoutStore) -> Result<usize> {
        if self.entries.is_empty() {
            return Ok(0);
        }

        let committed = store.commit(self.entries.clone())?;
        self.entries.clear();
        Ok(committed)
    }
}
