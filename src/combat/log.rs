//! Battle logging
//!
//! Records every clash event as a list of colored text segments, grouped by
//! round, for display and post-match analysis. Entries may also carry the
//! structured facts behind the text (source, target, amount) so totals can
//! be aggregated without parsing messages.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::states::play_match::components::HeroUuid;

/// Semantic color of a log segment. Frontends map these to real colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogColor {
    Neutral,
    /// Names of player1 heroes
    Player1,
    /// Names of player2 heroes
    Player2,
    Damage,
    Heal,
    /// Ability names
    Ability,
    Status,
    /// VICTORY! / DEFEAT! / DRAW!
    Outcome,
}

/// A run of text drawn in one color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSegment {
    pub text: String,
    pub color: LogColor,
}

/// Types of battle log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEventType {
    /// Two heroes engage
    Clash,
    /// Damage dealt
    Damage,
    /// Healing done
    Healing,
    /// An ability fired
    AbilityTriggered,
    /// Status effect applied
    StatusApplied,
    /// Status effect ticked during upkeep
    StatusTick,
    /// Damage was taken by a protector instead
    Redirect,
    /// Hero died
    Death,
    /// Match event (start, end, etc.)
    MatchEvent,
}

/// A single entry in the battle log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Clash round the entry belongs to (0 = before the first clash)
    pub round: u32,
    pub event_type: LogEventType,
    pub segments: Vec<LogSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<HeroUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<HeroUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
}

impl LogEntry {
    pub fn new(event_type: LogEventType) -> Self {
        Self {
            round: 0,
            event_type,
            segments: Vec::new(),
            source: None,
            target: None,
            amount: None,
        }
    }

    /// Append a neutral segment
    pub fn text(self, text: impl Into<String>) -> Self {
        self.colored(text, LogColor::Neutral)
    }

    /// Append a segment in `color`
    pub fn colored(mut self, text: impl Into<String>, color: LogColor) -> Self {
        self.segments.push(LogSegment {
            text: text.into(),
            color,
        });
        self
    }

    /// Attach the structured facts behind a damage or healing entry
    pub fn with_amount(mut self, source: Option<HeroUuid>, target: HeroUuid, amount: u32) -> Self {
        self.source = source;
        self.target = Some(target);
        self.amount = Some(amount);
        self
    }

    /// All segments concatenated into plain text
    pub fn message(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// The battle log storing all events of the current match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleLog {
    /// All log entries in chronological order
    pub entries: Vec<LogEntry>,
    /// Current round
    pub round: u32,
}

impl BattleLog {
    /// Clear the log for a new match
    pub fn clear(&mut self) {
        self.entries.clear();
        self.round = 0;
    }

    /// Start the next round and return its number
    pub fn begin_round(&mut self) -> u32 {
        self.round += 1;
        self.round
    }

    /// Add a new entry, stamped with the current round
    pub fn push(&mut self, mut entry: LogEntry) {
        entry.round = self.round;
        self.entries.push(entry);
    }

    /// Log a single-segment entry
    pub fn log(&mut self, event_type: LogEventType, message: impl Into<String>) {
        self.push(LogEntry::new(event_type).text(message));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries appended since `start`
    pub fn since(&self, start: usize) -> &[LogEntry] {
        &self.entries[start.min(self.entries.len())..]
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: LogEventType) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get only HP-changing events (damage, ticks and healing)
    pub fn hp_changes_only(&self) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.event_type,
                    LogEventType::Damage | LogEventType::StatusTick | LogEventType::Healing
                )
            })
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&LogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Entries belonging to one round
    pub fn round_entries(&self, round: u32) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.round == round).collect()
    }

    /// Whether any entry's plain text contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message().contains(needle))
    }

    /// Number of entries whose plain text contains `needle`
    pub fn count_text(&self, needle: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.message().contains(needle))
            .count()
    }

    /// Total damage attributed to `source`, including ticks it applied.
    pub fn damage_dealt_by(&self, source: HeroUuid) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.event_type == LogEventType::Damage && e.source == Some(source))
            .filter_map(|e| e.amount)
            .sum()
    }

    /// Total HP lost by `target` from damage and status ticks
    pub fn damage_taken_by(&self, target: HeroUuid) -> u32 {
        self.entries
            .iter()
            .filter(|e| {
                matches!(e.event_type, LogEventType::Damage | LogEventType::StatusTick)
                    && e.target == Some(target)
            })
            .filter_map(|e| e.amount)
            .sum()
    }

    /// Damage totals per source hero
    pub fn damage_by_source(&self) -> HashMap<HeroUuid, u32> {
        let mut totals = HashMap::new();
        for entry in &self.entries {
            if entry.event_type != LogEventType::Damage {
                continue;
            }
            if let (Some(source), Some(amount)) = (entry.source, entry.amount) {
                *totals.entry(source).or_insert(0) += amount;
            }
        }
        totals
    }

    /// Heroes that died, in order of death
    pub fn deaths(&self) -> Vec<HeroUuid> {
        self.entries
            .iter()
            .filter(|e| e.event_type == LogEventType::Death)
            .filter_map(|e| e.target)
            .collect()
    }

    /// Save the log together with match metadata as pretty JSON.
    ///
    /// Without an explicit path, writes `match_logs/match_<timestamp>.json`.
    /// Returns the path written.
    pub fn save_to_file<M: Serialize>(
        &self,
        metadata: &M,
        output_path: Option<&str>,
    ) -> Result<String, String> {
        let filename = match output_path {
            Some(path) => path.to_string(),
            None => {
                fs::create_dir_all("match_logs")
                    .map_err(|e| format!("Failed to create match_logs directory: {}", e))?;
                format!("match_logs/match_{}.json", Utc::now().format("%Y%m%d_%H%M%S"))
            }
        };

        if let Some(parent) = Path::new(&filename).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }

        #[derive(Serialize)]
        struct SavedLog<'a, M: Serialize> {
            metadata: &'a M,
            entries: &'a [LogEntry],
        }

        let contents = serde_json::to_string_pretty(&SavedLog {
            metadata,
            entries: &self.entries,
        })
        .map_err(|e| format!("Failed to serialize match log: {}", e))?;
        fs::write(&filename, contents).map_err(|e| format!("Failed to write {}: {}", filename, e))?;
        info!("Saved match log to {}", filename);
        Ok(filename)
    }
}
