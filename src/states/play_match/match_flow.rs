//! Match Flow
//!
//! Handles the end of a match:
//! - Outcome detection (one or both teams wiped)
//! - The single VICTORY! / DEFEAT! / DRAW! log entry
//! - Per-hero results for the results screen and saved logs

use serde::{Deserialize, Serialize};
use tracing::info;

use super::components::*;
use super::Battle;
use crate::combat::log::{LogColor, LogEntry, LogEventType};
use crate::states::match_config::HeroType;

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// None for a draw (both teams wiped in the same clash)
    pub winner: Option<Side>,
    /// Clashes resolved before the end
    pub clashes: u32,
}

impl MatchOutcome {
    /// Banner from player1's point of view
    pub fn banner(&self) -> &'static str {
        match self.winner {
            Some(Side::Player1) => "VICTORY!",
            Some(Side::Player2) => "DEFEAT!",
            None => "DRAW!",
        }
    }
}

/// Decide whether the battle is over. Returns None while both teams still
/// have a living hero.
pub fn detect_outcome(battle: &Battle) -> Option<MatchOutcome> {
    let (player1_wiped, player2_wiped) = battle.wipes();
    let winner = match (player1_wiped, player2_wiped) {
        (false, false) => return None,
        (true, true) => {
            info!("Match ended in a DRAW!");
            None
        }
        (false, true) => {
            info!("Match ended! Player 1 wins!");
            Some(Side::Player1)
        }
        (true, false) => {
            info!("Match ended! Player 2 wins!");
            Some(Side::Player2)
        }
    };
    Some(MatchOutcome {
        winner,
        clashes: battle.clash_count,
    })
}

/// Write the outcome banner to the battle log.
pub fn log_outcome(battle: &mut Battle, outcome: &MatchOutcome) {
    battle.log.push(
        LogEntry::new(LogEventType::MatchEvent).colored(outcome.banner(), LogColor::Outcome),
    );
}

/// Statistics for a single hero after the match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroResult {
    pub id: HeroId,
    pub uuid: HeroUuid,
    pub name: String,
    pub hero_type: HeroType,
    pub max_hp: u32,
    /// HP remaining at match end (0 if dead)
    pub final_hp: u32,
    pub survived: bool,
    /// Total damage dealt during the match
    pub damage_dealt: u32,
    /// Total damage taken during the match
    pub damage_taken: u32,
}

/// Final statistics for every hero on `side`, in team order.
pub fn hero_results(battle: &Battle, side: Side) -> Vec<HeroResult> {
    battle
        .team(side)
        .members
        .iter()
        .map(|hero| HeroResult {
            id: hero.id,
            uuid: hero.uuid,
            name: hero.name.clone(),
            hero_type: hero.hero_type,
            max_hp: hero.max_hp,
            final_hp: hero.hp,
            survived: hero.is_alive(),
            damage_dealt: battle.log.damage_dealt_by(hero.uuid),
            damage_taken: battle.log.damage_taken_by(hero.uuid),
        })
        .collect()
}

/// Metadata saved alongside a match log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub mode: String,
    pub difficulty: String,
    /// "player1", "player2", or None for a draw
    pub winner: Option<String>,
    pub clashes: u32,
    pub random_seed: Option<u64>,
    pub vengeance: bool,
    pub player1: Vec<HeroResult>,
    pub player2: Vec<HeroResult>,
}
