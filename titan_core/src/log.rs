//! In-process workout log.
//!
//! Entries are kept in the order they were recorded. Aggregates are derived
//! on demand rather than maintained incrementally.

use crate::{Totals, WorkoutEntry};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Append-only ordered sequence of workout entries
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkoutLog {
    entries: Vec<WorkoutEntry>,
}

impl WorkoutLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: WorkoutEntry) {
        self.entries.push(entry);
    }

    /// All entries in insertion order
    pub fn all(&self) -> &[WorkoutEntry] {
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

    /// Summed burn per recorded date, ordered by date
    pub fn group_by_date(&self) -> BTreeMap<NaiveDate, f64> {
        let mut by_date = BTreeMap::new();
        for entry in &self.entries {
            *by_date.entry(entry.date()).or_insert(0.0) += entry.burn_kcal();
        }
        by_date
    }
}

impl From<Vec<WorkoutEntry>> for WorkoutLog {
    fn from(entries: Vec<WorkoutEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a WorkoutLog {
    type Item = &'a WorkoutEntry;
    type IntoIter = std::slice::Iter<'a, WorkoutEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
