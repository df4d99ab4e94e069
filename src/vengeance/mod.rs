//! Vengeance memory
//!
//! Remembers every match the AI side lost: which player team beat it and
//! which of those heroes were still standing. When the same player team
//! (by exact sorted roster ids) shows up again, the AI enters vengeance
//! mode: it counter-picks harder and treats the recorded survivors as
//! priority targets for the rest of the match.
//!
//! ## Persisted format
//!
//! ```json
//! [
//!   { "defeatedBy": [0, 1, 2], "survivors": [1], "timestamp": "2026-01-01T12:00:00Z" }
//! ]
//! ```
//!
//! A missing, empty or corrupt history reads as no history.

pub mod store;

pub use store::{InMemoryStore, JsonFileStore, LossHistoryStore, StoreError, HISTORY_KEY};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::states::play_match::components::HeroId;

/// One recorded AI defeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossRecord {
    /// Sorted roster ids of the winning player team
    pub defeated_by: Vec<HeroId>,
    /// Sorted roster ids of the player heroes alive at the end
    pub survivors: Vec<HeroId>,
    pub timestamp: DateTime<Utc>,
}

/// Whether the AI is out for revenge this match, and on whom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VengeanceMode {
    pub active: bool,
    /// Priority targets: survivors of the recorded defeat
    pub survivors: Vec<HeroId>,
}

impl VengeanceMode {
    pub fn from_record(record: &LossRecord) -> Self {
        Self {
            active: true,
            survivors: record.survivors.clone(),
        }
    }

    pub fn is_priority(&self, id: HeroId) -> bool {
        self.active && self.survivors.contains(&id)
    }

    /// Priority target ids, empty when vengeance is off
    pub fn priority_targets(&self) -> &[HeroId] {
        if self.active {
            &self.survivors
        } else {
            &[]
        }
    }
}

/// Sorted, deduplicated copy of an id list.
pub fn sorted_ids(ids: &[HeroId]) -> Vec<HeroId> {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}

/// Loss history on top of a [`LossHistoryStore`].
pub struct VengeanceMemory {
    store: Box<dyn LossHistoryStore>,
}

impl Default for VengeanceMemory {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl VengeanceMemory {
    pub fn new(store: Box<dyn LossHistoryStore>) -> Self {
        Self { store }
    }

    /// Memory backed by an [`InMemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Box::new(InMemoryStore::new()))
    }

    /// Every stored record, oldest first. Read failures are logged and
    /// treated as no history.
    pub fn history(&self) -> Vec<LossRecord> {
        match self.store.load_all() {
            Ok(records) => records,
            Err(e) => {
                warn!("Ignoring unreadable loss history: {}", e);
                Vec::new()
            }
        }
    }

    /// Record that the AI lost to `defeated_by`, with `survivors` still
    /// standing. Both lists are stored sorted and deduplicated.
    ///
    /// The record is appended to the store. A corrupt history is replaced
    /// by a list holding only the new record; any other write failure is
    /// logged and otherwise ignored. The record is returned either way.
    pub fn record_loss(&mut self, defeated_by: &[HeroId], survivors: &[HeroId]) -> LossRecord {
        let record = LossRecord {
            defeated_by: sorted_ids(defeated_by),
            survivors: sorted_ids(survivors),
            timestamp: Utc::now(),
        };
        let written = match self.store.append(record.clone()) {
            Err(StoreError::Json(e)) => {
                warn!("Discarding corrupt loss history: {}", e);
                self.store.save_all(std::slice::from_ref(&record))
            }
            other => other,
        };
        match written {
            Ok(()) => info!(
                "Recorded AI defeat by {:?} (survivors {:?})",
                record.defeated_by, record.survivors
            ),
            Err(e) => warn!("Failed to record AI defeat: {}", e),
        }
        record
    }

    /// The most recent record whose `defeated_by` equals the sorted
    /// `current_team` ids exactly.
    pub fn find_matching_defeat(&self, current_team: &[HeroId]) -> Option<LossRecord> {
        let current = sorted_ids(current_team);
        self.history()
            .into_iter()
            .rev()
            .find(|record| record.defeated_by == current)
    }

    /// Vengeance mode for a player team: active iff a matching defeat
    /// exists.
    pub fn arm(&self, current_team: &[HeroId]) -> VengeanceMode {
        match self.find_matching_defeat(current_team) {
            Some(record) => {
                info!(
                    "Vengeance mode armed against {:?}; priority targets {:?}",
                    record.defeated_by, record.survivors
                );
                VengeanceMode::from_record(&record)
            }
            None => VengeanceMode::default(),
        }
    }
}
