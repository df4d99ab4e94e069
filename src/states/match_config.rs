//! Match configuration data structures
//!
//! This module defines the data chosen before a match starts (mode,
//! difficulty, team size) and the type-advantage model shared by combat
//! and AI.

use serde::{Deserialize, Serialize};

use crate::states::play_match::components::HeroId;

/// Damage types. Each beats exactly one other type in the cycle
/// Might > Finesse > Magic > Might.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroType {
    Might,
    Finesse,
    Magic,
}

impl HeroType {
    /// Get all damage types
    pub fn all() -> &'static [HeroType] {
        &[HeroType::Might, HeroType::Finesse, HeroType::Magic]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            HeroType::Might => "Might",
            HeroType::Finesse => "Finesse",
            HeroType::Magic => "Magic",
        }
    }

    /// The type this one deals double damage to.
    pub fn beats(&self) -> HeroType {
        match self {
            HeroType::Might => HeroType::Finesse,
            HeroType::Finesse => HeroType::Magic,
            HeroType::Magic => HeroType::Might,
        }
    }

    /// The type that deals double damage to this one.
    pub fn countered_by(&self) -> HeroType {
        match self {
            HeroType::Might => HeroType::Magic,
            HeroType::Finesse => HeroType::Might,
            HeroType::Magic => HeroType::Finesse,
        }
    }
}

/// Result of comparing an attacker's type against a defender's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMultiplier {
    Double,
    Half,
    Normal,
}

impl TypeMultiplier {
    /// Scale base damage. Halving rounds down.
    pub fn apply(self, base: u32) -> u32 {
        match self {
            TypeMultiplier::Double => base.saturating_mul(2),
            TypeMultiplier::Half => base / 2,
            TypeMultiplier::Normal => base,
        }
    }
}

/// Type advantage lookup for one attacker/defender pair.
pub fn type_multiplier(attacker: HeroType, defender: HeroType) -> TypeMultiplier {
    if attacker.beats() == defender {
        TypeMultiplier::Double
    } else if defender.beats() == attacker {
        TypeMultiplier::Half
    } else {
        TypeMultiplier::Normal
    }
}

/// AI strength tiers, from casual to near-optimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Impossible,
}

impl Difficulty {
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Easy,
            Difficulty::Normal,
            Difficulty::Hard,
            Difficulty::Impossible,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Impossible => "Impossible",
        }
    }

    /// Parse a case-insensitive difficulty name.
    pub fn parse(name: &str) -> Option<Difficulty> {
        Difficulty::all()
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }

    /// How many of the best-scored clash candidates the AI samples from.
    /// One means it always plays the top candidate.
    pub fn candidate_pool(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Normal => 2,
            Difficulty::Hard | Difficulty::Impossible => 1,
        }
    }

    /// Whether the AI weighs initiative and lethal retaliation.
    pub fn considers_tempo(&self) -> bool {
        *self >= Difficulty::Hard
    }
}

/// How a match was entered from the main menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Player against an AI drafting from the full roster
    QuickMatch,
    /// Player against a rival territory; the AI drafts from its pool
    Campaign { rival_pool: Vec<HeroId> },
    /// Player drafts both sides; no AI draft and no vengeance record
    Practice,
}

impl MatchMode {
    pub fn name(&self) -> &'static str {
        match self {
            MatchMode::QuickMatch => "Quick Match",
            MatchMode::Campaign { .. } => "Campaign",
            MatchMode::Practice => "Practice",
        }
    }

    /// Whether player2 is drafted and played by the AI.
    pub fn has_ai_opponent(&self) -> bool {
        !matches!(self, MatchMode::Practice)
    }
}

/// The match configuration chosen during team assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub mode: MatchMode,
    pub difficulty: Difficulty,
    /// Heroes per side (1-3)
    pub team_size: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::QuickMatch,
            difficulty: Difficulty::Normal,
            team_size: 3,
        }
    }
}

impl MatchConfig {
    pub const MAX_TEAM_SIZE: usize = 3;

    /// Set the team size, clamped to the supported 1-3 range
    pub fn set_team_size(&mut self, size: usize) {
        self.team_size = size.clamp(1, Self::MAX_TEAM_SIZE);
    }
}
