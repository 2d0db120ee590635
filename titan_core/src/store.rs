//! Durable workout store backed by a single JSON file.
//!
//! The whole log is read into memory at startup and rewritten in full on
//! every commit (temp file, fsync, atomic rename). Commits hold an exclusive
//! lock on a sidecar `.lock` file and re-read the store under that lock, so
//! two processes committing one after the other never drop each other's
//! batches.
//!
//! Read-side failures never stop the program: a missing store is an empty
//! log, and an unreadable or malformed one is moved aside to `.corrupt` and
//! replaced by an empty log (see [`recover_unreadable`]). A store with some
//! malformed entries is copied aside the same way before the commit that
//! drops them. Earlier quarantined files are never replaced; later ones get
//! `.corrupt.1`, `.corrupt.2` and so on. Write-side failures are returned as
//! [`Error::StorageUnavailable`].

use crate::{Error, Result, Totals, WorkoutEntry, WorkoutLog};
use chrono::{NaiveDate, NaiveTime};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Current on-disk layout version
pub const STORE_VERSION: u32 = 1;

/// On-disk layout, version 1
#[derive(Serialize)]
struct StoreDocument<'a> {
    version: u32,
    entries: &'a [WorkoutEntry],
}

/// Any layout we know how to read
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLayout {
    Versioned {
        version: u32,
        entries: Vec<serde_json::Value>,
    },
    /// Bare array of rows from the unversioned layout (version 0)
    Legacy(Vec<serde_json::Value>),
}

/// Row layout of the unversioned store
#[derive(Debug, Deserialize)]
struct LegacyRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Time", default)]
    time: Option<String>,
    #[serde(rename = "Module")]
    module: String,
    #[serde(rename = "Sets")]
    sets: u32,
    #[serde(rename = "Reps")]
    reps: u32,
    #[serde(rename = "Burn")]
    burn: f64,
    #[serde(rename = "Icon", default)]
    icon: Option<String>,
}

impl TryFrom<LegacyRow> for WorkoutEntry {
    type Error = Error;

    fn try_from(row: LegacyRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
            .map_err(|e| Error::InvalidParameter(format!("Invalid date '{}': {}", row.date, e)))?;

        let time = match row.time.as_deref().map(str::trim) {
            None | Some("") => NaiveTime::MIN,
            Some(t) => NaiveTime::parse_from_str(t, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
                .map_err(|e| Error::InvalidParameter(format!("Invalid time '{}': {}", t, e)))?,
        };

        let entry =
            WorkoutEntry::from_stored(row.module, row.sets, row.reps, date, time, row.burn, row.icon);
        check_entry(&entry)?;
        Ok(entry)
    }
}

/// Reject entries that could not have been produced by the estimator
fn check_entry(entry: &WorkoutEntry) -> Result<()> {
    if entry.exercise().trim().is_empty() {
        return Err(Error::InvalidParameter("empty exercise name".into()));
    }
    if entry.sets() == 0 || entry.reps() == 0 {
        return Err(Error::InvalidParameter(format!(
            "sets and reps must be positive, got {}x{}",
            entry.sets(),
            entry.reps()
        )));
    }
    if !(entry.burn_kcal().is_finite() && entry.burn_kcal() >= 0.0) {
        return Err(Error::InvalidParameter(format!(
            "burn must be non-negative, got {}",
            entry.burn_kcal()
        )));
    }
    Ok(())
}

/// Read every entry from the store file, strictly.
///
/// A missing file is an empty store. Unreadable files yield
/// [`Error::StorageUnavailable`], unparseable ones [`Error::Json`] and layouts
/// from a newer version [`Error::UnsupportedVersion`]. Individual malformed
/// entries are skipped with a warning.
pub fn read_store(path: &Path) -> Result<Vec<WorkoutEntry>> {
    read_rows(path).map(|rows| rows.entries)
}

/// Entries read from disk, plus how many rows were dropped
struct StoreRows {
    entries: Vec<WorkoutEntry>,
    skipped: usize,
}

fn read_rows(path: &Path) -> Result<StoreRows> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(StoreRows {
                entries: Vec::new(),
                skipped: 0,
            })
        }
        Err(e) => return Err(Error::storage(path, e)),
    };

    let rows = match serde_json::from_str::<StoredLayout>(&contents)? {
        StoredLayout::Versioned { version, entries } if version == STORE_VERSION => {
            parse_rows(path, entries, |value| {
                let entry: WorkoutEntry = serde_json::from_value(value)?;
                check_entry(&entry)?;
                Ok(entry)
            })
        }
        StoredLayout::Versioned { version, .. } => {
            return Err(Error::UnsupportedVersion(version));
        }
        StoredLayout::Legacy(rows) => {
            tracing::info!("Reading unversioned store {:?}; it will be upgraded on next commit", path);
            parse_rows(path, rows, |value| {
                let row: LegacyRow = serde_json::from_value(value)?;
                WorkoutEntry::try_from(row)
            })
        }
    };

    tracing::debug!("Read {} entries from {:?}", rows.entries.len(), path);
    Ok(rows)
}

fn parse_rows<F>(path: &Path, rows: Vec<serde_json::Value>, parse: F) -> StoreRows
where
    F: Fn(serde_json::Value) -> Result<WorkoutEntry>,
{
    let mut entries = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    for (index, row) in rows.into_iter().enumerate() {
        match parse(row) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                // Keep the rest of the history readable
                tracing::warn!("Skipping malformed entry {} in {:?}: {}", index, path, e);
                skipped += 1;
            }
        }
    }
    StoreRows { entries, skipped }
}

/// Recovery policy for a store that exists but cannot be read.
///
/// Logs a warning, moves a damaged file aside to an unused
/// [`quarantine_path`] so the next commit cannot overwrite it, and returns an
/// empty history.
pub fn recover_unreadable(path: &Path, error: &Error) -> Vec<WorkoutEntry> {
    tracing::warn!("Unable to read store {:?}: {}. Starting with an empty log.", path, error);

    if matches!(error, Error::Json(_) | Error::UnsupportedVersion(_)) {
        let aside = quarantine_path(path);
        match std::fs::rename(path, &aside) {
            Ok(()) => tracing::warn!("Moved unreadable store to {:?}", aside),
            Err(e) => tracing::warn!("Could not move unreadable store aside: {}", e),
        }
    }

    Vec::new()
}

/// First of `<name>.corrupt`, `<name>.corrupt.1`, `<name>.corrupt.2`, ...
/// that does not exist yet
pub fn quarantine_path(path: &Path) -> PathBuf {
    let first = sidecar_path(path, ".corrupt");
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| sidecar_path(path, &format!(".corrupt.{}", n)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

/// Copy the store aside before a rewrite drops some of its rows
fn preserve_skipped(path: &Path, skipped: usize) -> Result<()> {
    let aside = quarantine_path(path);
    std::fs::copy(path, &aside).map_err(|e| Error::storage(path, e))?;
    tracing::warn!(
        "{} malformed entries will be dropped from {:?}; original kept at {:?}",
        skipped,
        path,
        aside
    );
    Ok(())
}

/// Atomically replace the store file with `entries`.
pub fn write_store(path: &Path, entries: &[WorkoutEntry]) -> Result<()> {
    let dir = parent_dir(path);
    std::fs::create_dir_all(&dir).map_err(|e| Error::storage(path, e))?;

    let temp = NamedTempFile::new_in(&dir).map_err(|e| Error::storage(path, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        let document = StoreDocument {
            version: STORE_VERSION,
            entries,
        };
        serde_json::to_writer(&mut writer, &document)?;
        writer.flush().map_err(|e| Error::storage(path, e))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|e| Error::storage(path, e))?;

    temp.persist(path).map_err(|e| Error::storage(path, e.error))?;

    tracing::debug!("Wrote {} entries to {:?}", entries.len(), path);
    Ok(())
}

/// Durable workout log: an in-memory [`WorkoutLog`] mirrored to a JSON file
#[derive(Debug)]
pub struct WorkoutStore {
    path: PathBuf,
    log: WorkoutLog,
}

impl WorkoutStore {
    /// Load the whole store into memory. Never fails; see [`recover_unreadable`].
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = if path.exists() {
            let _lock = StoreLock::shared(&path);
            read_store(&path).unwrap_or_else(|e| recover_unreadable(&path, &e))
        } else {
            tracing::info!("No store found at {:?}, starting with an empty log", path);
            Vec::new()
        };

        Self {
            path,
            log: WorkoutLog::from(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Everything committed so far
    pub fn log(&self) -> &WorkoutLog {
        &self.log
    }

    pub fn all(&self) -> &[WorkoutEntry] {
        self.log.all()
    }

    pub fn totals(&self) -> Totals {
        self.log.totals()
    }

    /// Commit a single entry
    pub fn append(&mut self, entry: WorkoutEntry) -> Result<()> {
        self.commit(vec![entry]).map(|_| ())
    }

    /// Append `batch` to the store and rewrite it in full.
    ///
    /// The on-disk store is re-read under an exclusive lock first, so the
    /// in-memory log afterwards reflects every committed entry, including
    /// ones committed by another process since [`load`](Self::load).
    /// Returns the number of entries committed.
    pub fn commit(&mut self, batch: Vec<WorkoutEntry>) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }
        let count = batch.len();

        let _lock = StoreLock::exclusive(&self.path)?;

        let mut entries = match read_rows(&self.path) {
            Ok(rows) => {
                if rows.skipped > 0 {
                    preserve_skipped(&self.path, rows.skipped)?;
                }
                rows.entries
            }
            // Refuse to overwrite a store we merely failed to open
            Err(e @ Error::StorageUnavailable { .. }) => return Err(e),
            Err(e) => recover_unreadable(&self.path, &e),
        };
        entries.extend(batch);

        write_store(&self.path, &entries)?;
        self.log = WorkoutLog::from(entries);

        tracing::info!("Committed {} entries to {:?}", count, self.path);
        Ok(count)
    }
}

/// Advisory lock on `<store>.lock`, released on drop
struct StoreLock {
    file: File,
}

impl StoreLock {
    fn open(store_path: &Path) -> std::io::Result<File> {
        OpenOptions::new()
            .create(true)
            .write(true)
            .open(sidecar_path(store_path, ".lock"))
    }

    fn exclusive(store_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(parent_dir(store_path))
            .map_err(|e| Error::storage(store_path, e))?;
        let file = Self::open(store_path).map_err(|e| Error::storage(store_path, e))?;
        file.lock_exclusive()
            .map_err(|e| Error::storage(store_path, e))?;
        Ok(Self { file })
    }

    /// Best effort: a read-only data directory still allows reading
    fn shared(store_path: &Path) -> Option<Self> {
        let file = match Self::open(store_path) {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!("Reading {:?} without a lock: {}", store_path, e);
                return None;
            }
        };
        match file.lock_shared() {
            Ok(()) => Some(Self { file }),
            Err(e) => {
                tracing::debug!("Reading {:?} without a lock: {}", store_path, e);
                None
            }
        }
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
