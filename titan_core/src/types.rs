//! Core domain types for the Titan gym tracker.
//!
//! - Exercise definitions (the MET table)
//! - Workout entries and their aggregates

use crate::estimator::CalorieEstimator;
use crate::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// An exercise the user can log (e.g. "Bench Press" at MET 5.0)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDefinition {
    pub name: String,
    /// Metabolic equivalent of the movement
    pub met: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ExerciseDefinition {
    pub fn new(name: impl Into<String>, met: f64, icon: Option<&str>) -> Self {
        Self {
            name: name.into(),
            met,
            icon: icon.map(Into::into),
        }
    }
}

// ============================================================================
// Entry Types
// ============================================================================

/// One recorded exercise occurrence.
///
/// The burn is computed when the entry is recorded and never recomputed,
/// so entries keep the value they were logged with even if the estimator
/// configuration changes later.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutEntry {
    id: Uuid,
    exercise: String,
    sets: u32,
    reps: u32,
    date: NaiveDate,
    time: NaiveTime,
    burn_kcal: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
}

impl WorkoutEntry {
    /// Record an entry for `exercise`, estimating its burn with `estimator`.
    pub fn record(
        exercise: &ExerciseDefinition,
        sets: u32,
        reps: u32,
        body_mass_kg: f64,
        estimator: &CalorieEstimator,
        at: NaiveDateTime,
    ) -> Result<Self> {
        let burn_kcal = estimator.estimate(exercise.met, body_mass_kg, sets, reps)?;
        let time = at.time();

        Ok(Self {
            id: Uuid::new_v4(),
            exercise: exercise.name.clone(),
            sets,
            reps,
            date: at.date(),
            time: time.with_nanosecond(0).unwrap_or(time),
            burn_kcal,
            icon: exercise.icon.clone(),
        })
    }

    /// Rebuild an entry read from an older store layout.
    pub(crate) fn from_stored(
        exercise: String,
        sets: u32,
        reps: u32,
        date: NaiveDate,
        time: NaiveTime,
        burn_kcal: f64,
        icon: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise,
            sets,
            reps,
            date,
            time,
            burn_kcal,
            icon,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn exercise(&self) -> &str {
        &self.exercise
    }

    pub fn sets(&self) -> u32 {
        self.sets
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn recorded_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Estimated kilocalories burned
    pub fn burn_kcal(&self) -> f64 {
        self.burn_kcal
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }
}

/// Aggregates over a set of entries
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub total_burn: f64,
    pub total_sets: u64,
    pub total_reps: u64,
    pub count: usize,
}

impl Totals {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a WorkoutEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |mut acc, entry| {
            acc.total_burn += entry.burn_kcal;
            acc.total_sets += u64::from(entry.sets);
            acc.total_reps += u64::from(entry.reps);
            acc.count += 1;
            acc
        })
    }
}
