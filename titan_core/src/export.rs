//! CSV export of the workout history.

use crate::{Result, WorkoutEntry};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    id: String,
    date: String,
    time: String,
    exercise: &'a str,
    sets: u32,
    reps: u32,
    burn_kcal: f64,
}

impl<'a> From<&'a WorkoutEntry> for CsvRow<'a> {
    fn from(entry: &'a WorkoutEntry) -> Self {
        CsvRow {
            id: entry.id().to_string(),
            date: entry.date().format("%Y-%m-%d").to_string(),
            time: entry.time().format("%H:%M:%S").to_string(),
            exercise: entry.exercise(),
            sets: entry.sets(),
            reps: entry.reps(),
            burn_kcal: entry.burn_kcal(),
        }
    }
}

/// Write `entries` to a CSV file at `path`, replacing any existing file.
///
/// Returns the number of rows written. The file is synced before returning.
pub fn export_csv(entries: &[WorkoutEntry], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(File::create(path)?);

    for entry in entries {
        writer.serialize(CsvRow::from(entry))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} entries to {:?}", entries.len(), path);
    Ok(entries.len())
}
