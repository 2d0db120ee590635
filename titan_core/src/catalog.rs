//! Exercise catalog: the MET table the estimator draws from.
//!
//! The built-in table covers the common barbell, dumbbell and machine
//! movements. Users can extend it with custom exercises from the config file.

use crate::{Error, ExerciseDefinition, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<ExerciseCatalog> = Lazy::new(build_default_catalog);

/// Built-in exercises as (name, MET, icon)
const DEFAULT_EXERCISES: &[(&str, f64, &str)] = &[
    ("Barbell Squat", 6.0, "🏋️‍♂️"),
    ("Bench Press", 5.0, "💪"),
    ("Deadlift", 6.0, "🔋"),
    ("Overhead Press", 5.0, "🆙"),
    ("Barbell Row", 5.5, "🚣"),
    ("Lat Pulldown", 4.0, "🔽"),
    ("Dumbbell Lunges", 5.0, "🦵"),
    ("Leg Press", 4.5, "🦵"),
    ("Incline Bench", 5.0, "📐"),
    ("Bicep Curls", 3.5, "💪"),
    ("Tricep Extensions", 3.5, "🦾"),
    ("Leg Extensions", 4.0, "🦵"),
    ("Face Pulls", 4.0, "👺"),
];

/// Ordered list of exercise definitions, keyed by name
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseCatalog {
    exercises: Vec<ExerciseDefinition>,
}

/// Get a reference to the cached default catalog
pub fn default_catalog() -> &'static ExerciseCatalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog
///
/// Prefer `default_catalog()` unless the catalog is about to be extended.
pub fn build_default_catalog() -> ExerciseCatalog {
    ExerciseCatalog::new(
        DEFAULT_EXERCISES
            .iter()
            .map(|(name, met, icon)| ExerciseDefinition::new(*name, *met, Some(*icon)))
            .collect(),
    )
}

impl Default for ExerciseCatalog {
    fn default() -> Self {
        default_catalog().clone()
    }
}

impl ExerciseCatalog {
    pub fn new(exercises: Vec<ExerciseDefinition>) -> Self {
        Self { exercises }
    }

    /// Add user-defined exercises.
    ///
    /// A custom exercise whose name matches an existing one (ignoring case)
    /// replaces it in place; new names are appended in the order given.
    pub fn with_custom(mut self, custom: impl IntoIterator<Item = ExerciseDefinition>) -> Self {
        for def in custom {
            match self
                .exercises
                .iter_mut()
                .find(|existing| existing.name.eq_ignore_ascii_case(&def.name))
            {
                Some(existing) => {
                    tracing::debug!("Custom exercise '{}' overrides built-in", def.name);
                    *existing = def;
                }
                None => self.exercises.push(def),
            }
        }
        self
    }

    /// Look up an exercise by exact name, falling back to a case-insensitive match
    pub fn get(&self, name: &str) -> Option<&ExerciseDefinition> {
        let name = name.trim();
        self.exercises
            .iter()
            .find(|def| def.name == name)
            .or_else(|| {
                self.exercises
                    .iter()
                    .find(|def| def.name.eq_ignore_ascii_case(name))
            })
    }

    /// Like [`get`](Self::get), but an unknown name is an error
    pub fn require(&self, name: &str) -> Result<&ExerciseDefinition> {
        self.get(name)
            .ok_or_else(|| Error::UnknownExercise(name.trim().to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.exercises.iter().map(|def| def.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseDefinition> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors (empty if valid)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for def in &self.exercises {
            if def.name.trim().is_empty() {
                errors.push("Exercise has empty name".to_string());
                continue;
            }
            if !(def.met.is_finite() && def.met > 0.0) {
                errors.push(format!(
                    "Exercise '{}' has non-positive MET {}",
                    def.name, def.met
                ));
            }
            if !seen.insert(def.name.to_lowercase()) {
                errors.push(format!("Duplicate exercise name '{}'", def.name));
            }
        }

        if self.exercises.is_empty() {
            errors.push("Catalog has no exercises".to_string());
        }

        errors
    }
}
