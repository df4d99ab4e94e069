//! JSON configuration parsing for headless mode
//!
//! Parses JSON match configurations and resolves them against the hero
//! roster.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::states::match_config::{Difficulty, MatchConfig, MatchMode};
use crate::states::play_match::components::HeroId;
use crate::states::play_match::hero_config::HeroRoster;
use crate::vengeance::{JsonFileStore, VengeanceMemory};

/// Headless match configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessMatchConfig {
    /// Team 1 composition (1-3 hero names or roster ids)
    pub team1: Vec<String>,
    /// Team 2 composition; empty lets the AI draft it
    #[serde(default)]
    pub team2: Vec<String>,
    /// "QuickMatch", "Campaign" or "Practice" (default: "QuickMatch")
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Heroes the campaign rival drafts from (Campaign only)
    #[serde(default)]
    pub rival_pool: Vec<String>,
    /// Difficulty of the AI playing team 1 (default: "Normal")
    #[serde(default = "default_difficulty")]
    pub team1_difficulty: String,
    /// Difficulty of the AI playing team 2 (default: "Normal")
    #[serde(default = "default_difficulty")]
    pub team2_difficulty: String,
    /// Random seed for deterministic match reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Clashes to resolve before declaring a draw (default: 100)
    #[serde(default = "default_max_clashes")]
    pub max_clashes: u32,
    /// Directory of the loss history file; None keeps history in memory
    #[serde(default)]
    pub history_path: Option<String>,
    /// Custom output path for match log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
}

fn default_mode() -> String {
    "QuickMatch".to_string()
}

fn default_difficulty() -> String {
    Difficulty::Normal.name().to_string()
}

fn default_max_clashes() -> u32 {
    100
}

impl HeadlessMatchConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: HeadlessMatchConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration shape. Hero names are checked against
    /// the roster by [`HeadlessMatchConfig::resolve_team`].
    pub fn validate(&self) -> Result<(), String> {
        let max = MatchConfig::MAX_TEAM_SIZE;
        if self.team1.is_empty() || self.team1.len() > max {
            return Err(format!("team1 must have 1-{} members", max));
        }
        if !self.team2.is_empty() && self.team2.len() != self.team1.len() {
            return Err(format!(
                "team2 must be empty or match team1's size ({} members)",
                self.team1.len()
            ));
        }

        match self.mode.as_str() {
            "QuickMatch" => {}
            "Campaign" => {
                if self.rival_pool.is_empty() && self.team2.is_empty() {
                    return Err("Campaign mode needs a rival_pool or a fixed team2".to_string());
                }
            }
            "Practice" => {
                if self.team2.is_empty() {
                    return Err("Practice mode needs an explicit team2".to_string());
                }
            }
            other => {
                return Err(format!(
                    "Unknown mode: '{}'. Valid modes: QuickMatch, Campaign, Practice",
                    other
                ))
            }
        }

        Self::parse_difficulty(&self.team1_difficulty)?;
        Self::parse_difficulty(&self.team2_difficulty)?;

        if self.max_clashes == 0 {
            return Err("max_clashes must be positive".to_string());
        }

        Ok(())
    }

    /// Parse a difficulty name
    pub fn parse_difficulty(name: &str) -> Result<Difficulty, String> {
        Difficulty::parse(name).ok_or_else(|| {
            format!(
                "Unknown difficulty: '{}'. Valid difficulties: Easy, Normal, Hard, Impossible",
                name
            )
        })
    }

    /// Resolve hero names (or ids) to roster ids
    pub fn resolve_team(names: &[String], roster: &HeroRoster) -> Result<Vec<HeroId>, String> {
        names
            .iter()
            .map(|name| roster.resolve(name).map(|def| def.id).map_err(|e| e.to_string()))
            .collect()
    }

    /// Convert to the game's [`MatchMode`]
    pub fn to_match_mode(&self, roster: &HeroRoster) -> Result<MatchMode, String> {
        match self.mode.as_str() {
            "QuickMatch" => Ok(MatchMode::QuickMatch),
            "Campaign" => Ok(MatchMode::Campaign {
                rival_pool: Self::resolve_team(&self.rival_pool, roster)?,
            }),
            "Practice" => Ok(MatchMode::Practice),
            other => Err(format!("Unknown mode: '{}'", other)),
        }
    }

    /// Loss history for this run, if the config names a directory
    pub fn vengeance_memory(&self) -> Option<VengeanceMemory> {
        self.history_path
            .as_ref()
            .map(|dir| VengeanceMemory::new(Box::new(JsonFileStore::new(dir))))
    }
}
