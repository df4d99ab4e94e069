//! Loss history storage.
//!
//! The history is one JSON array of [`LossRecord`]s stored under a fixed
//! key. It is always read as a whole list and rewritten as a whole list.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::LossRecord;

/// Fixed key the history is stored under.
pub const HISTORY_KEY: &str = "trinityClashLosses";

/// Errors from a [`LossHistoryStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("loss history I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored history is not a valid record list.
    #[error("loss history is not valid JSON: {0}")]
    Json(String),
}

/// Durable key-value slot holding the loss history.
pub trait LossHistoryStore: Send {
    /// Read every stored record, oldest first.
    fn load_all(&self) -> Result<Vec<LossRecord>, StoreError>;

    /// Replace the stored list.
    fn save_all(&mut self, records: &[LossRecord]) -> Result<(), StoreError>;

    /// Append one record (read, push, rewrite).
    fn append(&mut self, record: LossRecord) -> Result<(), StoreError> {
        let mut records = self.load_all()?;
        records.push(record);
        self.save_all(&records)
    }
}

/// Store kept in memory only. Used by tests and practice runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Vec<LossRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LossHistoryStore for InMemoryStore {
    fn load_all(&self) -> Result<Vec<LossRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn save_all(&mut self, records: &[LossRecord]) -> Result<(), StoreError> {
        self.records = records.to_vec();
        Ok(())
    }
}

/// File-based store: `<dir>/trinityClashLosses.json`.
///
/// Writes go to a temp file that is then renamed over the real one, so a
/// crash mid-write never leaves a truncated history.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store inside `dir`. The directory is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", HISTORY_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LossHistoryStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<LossRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<LossRecord> =
            serde_json::from_str(&json).map_err(|e| StoreError::Json(e.to_string()))?;
        debug!("Loaded {} loss records from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn save_all(&mut self, records: &[LossRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(records).map_err(|e| StoreError::Json(e.to_string()))?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;
        debug!("Saved {} loss records to {}", records.len(), self.path.display());
        Ok(())
    }
}
