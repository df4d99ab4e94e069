//! Component Definitions for Play Match
//!
//! This module contains the data structures mutated during a match:
//! heroes, teams, status effects and the injectable random source.
//!
//! ## Invariants
//! - `Hero::hp` is always within `[0, max_hp]`; 0 means dead.
//! - `Hero::uuid` is assigned once per match and never reused.
//! - A team's `selection`, when set, refers to a living member.
//! - Status effects are appended while applying and only pruned during
//!   clash resolution.

use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::abilities::AbilityType;
use super::hero_config::HeroDefinition;
use crate::states::match_config::HeroType;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable roster identifier of a hero (the same across matches).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeroId(pub u32);

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-match unique identifier of a hero instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeroUuid(pub u32);

impl fmt::Display for HeroUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the board a team plays on.
///
/// `Player2` is the AI-controlled side in quick match and campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Player1 => "player1",
            Side::Player2 => "player2",
        }
    }
}

// ============================================================================
// Status Effects
// ============================================================================

/// Kinds of lingering effects a hero can carry between clashes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    /// Damage over time, ticks once per subsequent clash resolution
    Bleed,
}

/// An active status effect on a hero.
///
/// Effects have no timer: they last until the holder dies or is healed to
/// full HP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Damage per tick
    pub magnitude: u32,
}

impl StatusEffect {
    pub fn bleed(magnitude: u32) -> Self {
        Self {
            kind: StatusKind::Bleed,
            magnitude,
        }
    }
}

// ============================================================================
// Heroes
// ============================================================================

/// Usage bookkeeping for a hero's ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityFlags {
    /// Set once a once-per-match effect (Last Stand, Smoke Bomb, Evasion,
    /// Ambush, Fireball, Overload) has fired.
    pub once_per_match_used: bool,
    /// Set once the permanent on-team-init bonus has been applied.
    pub init_bonus_applied: bool,
}

/// A hero instance taking part in a match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hero {
    pub id: HeroId,
    pub name: String,
    pub hero_type: HeroType,
    /// Base attack power before type scaling
    pub attack: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub uuid: HeroUuid,
    pub ability: Option<AbilityType>,
    pub flags: AbilityFlags,
    pub status_effects: SmallVec<[StatusEffect; 2]>,
}

impl Hero {
    /// Instantiate a roster entry for a match. HP starts at the declared
    /// maximum; `initialize_team` applies permanent bonuses.
    pub fn from_definition(definition: &HeroDefinition, uuid: HeroUuid) -> Self {
        Self {
            id: definition.id,
            name: definition.name.clone(),
            hero_type: definition.hero_type,
            attack: definition.attack,
            hp: definition.max_hp,
            max_hp: definition.max_hp,
            uuid,
            ability: definition.ability,
            flags: AbilityFlags::default(),
            status_effects: SmallVec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn has_ability(&self, ability: AbilityType) -> bool {
        self.ability == Some(ability)
    }

    /// True if the hero carries `ability` and has not spent it yet.
    pub fn can_use_once(&self, ability: AbilityType) -> bool {
        self.has_ability(ability) && !self.flags.once_per_match_used
    }

    /// Remove up to `amount` HP, returning how much was actually lost.
    pub fn lose_hp(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        if self.hp == 0 {
            self.status_effects.clear();
        }
        lost
    }

    /// Restore up to `amount` HP (never above max), returning the amount
    /// healed. Reaching full HP clears lingering effects.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let healed = amount.min(self.max_hp - self.hp);
        self.hp += healed;
        if self.hp == self.max_hp {
            self.status_effects.clear();
        }
        healed
    }

    /// Raise maximum HP and current HP together.
    pub fn grow_max_hp(&mut self, amount: u32) {
        self.max_hp = self.max_hp.saturating_add(amount);
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    /// Total bleed damage queued for the next upkeep.
    pub fn pending_status_damage(&self) -> u32 {
        self.status_effects.iter().map(|e| e.magnitude).sum()
    }
}

// ============================================================================
// Teams
// ============================================================================

/// Ordered collection of heroes belonging to one side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Team {
    pub side: Side,
    pub members: Vec<Hero>,
    /// Hero committed to the next clash
    pub selection: Option<HeroUuid>,
    /// Set when an enemy ability chose the selection; cleared by the next clash
    pub selection_forced: bool,
}

impl Team {
    pub fn new(side: Side, members: Vec<Hero>) -> Self {
        Self {
            side,
            members,
            selection: None,
            selection_forced: false,
        }
    }

    pub fn get(&self, uuid: HeroUuid) -> Option<&Hero> {
        self.members.iter().find(|h| h.uuid == uuid)
    }

    pub fn get_mut(&mut self, uuid: HeroUuid) -> Option<&mut Hero> {
        self.members.iter_mut().find(|h| h.uuid == uuid)
    }

    pub fn contains(&self, uuid: HeroUuid) -> bool {
        self.members.iter().any(|h| h.uuid == uuid)
    }

    pub fn alive(&self) -> impl Iterator<Item = &Hero> {
        self.members.iter().filter(|h| h.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn fallen_count(&self) -> usize {
        self.members.len() - self.alive_count()
    }

    pub fn is_wiped(&self) -> bool {
        self.members.iter().all(|h| !h.is_alive())
    }

    pub fn selected(&self) -> Option<&Hero> {
        self.selection.and_then(|uuid| self.get(uuid))
    }

    /// Roster ids of every member, sorted ascending and deduplicated.
    pub fn sorted_ids(&self) -> Vec<HeroId> {
        let mut ids: Vec<HeroId> = self.members.iter().map(|h| h.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Roster ids of living members, sorted ascending and deduplicated.
    pub fn sorted_survivor_ids(&self) -> Vec<HeroId> {
        let mut ids: Vec<HeroId> = self.alive().map(|h| h.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Drop the selection if it no longer points at a living member.
    pub fn clear_dead_selection(&mut self) {
        let still_valid = self.selected().map(Hero::is_alive).unwrap_or(false);
        if !still_valid {
            self.selection = None;
            self.selection_forced = false;
        }
    }
}

// ============================================================================
// Randomness
// ============================================================================

enum RollSource {
    Seeded(StdRng),
    /// Every roll returns the same value; used to pin randomized abilities
    Fixed(f32),
}

/// Random number source for randomized abilities and AI sampling.
///
/// When a seed is provided (e.g., via headless config), the same seed will
/// always produce the same match outcome. Without a seed, uses system entropy.
pub struct GameRng {
    source: RollSource,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RollSource::Seeded(StdRng::seed_from_u64(seed)),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            source: RollSource::Seeded(StdRng::from_entropy()),
            seed: None,
        }
    }

    /// A source that always rolls `value` (clamped into `[0.0, 1.0)`).
    pub fn fixed(value: f32) -> Self {
        Self {
            source: RollSource::Fixed(value.clamp(0.0, 0.999_999)),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        match &mut self.source {
            RollSource::Seeded(rng) => rng.gen(),
            RollSource::Fixed(value) => *value,
        }
    }

    /// Roll an integer in `min..=max`. Returns `min` when the range is empty.
    pub fn roll_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f32;
        let offset = (self.random_f32() * span) as u32;
        (min + offset).min(max)
    }

    /// Pick an index in `0..len`, or None for an empty range.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.roll_inclusive(0, (len - 1) as u32) as usize)
    }

    /// Pick an index with probability proportional to its weight.
    /// Returns None when every weight is zero.
    pub fn choose_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return None;
        }
        let mut ticket = self.roll_inclusive(0, total - 1);
        for (index, weight) in weights.iter().enumerate() {
            if ticket < *weight {
                return Some(index);
            }
            ticket -= weight;
        }
        weights.iter().rposition(|w| *w > 0)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_hero(hp: u32, max_hp: u32) -> Hero {
        Hero {
            id: HeroId(9),
            name: "Skeleton Warrior".to_string(),
            hero_type: HeroType::Might,
            attack: 4,
            hp,
            max_hp,
            uuid: HeroUuid(1),
            ability: None,
            flags: AbilityFlags::default(),
            status_effects: SmallVec::new(),
        }
    }

    #[test]
    fn test_lose_hp_clamps_at_zero_and_clears_effects() {
        let mut hero = test_hero(3, 10);
        hero.status_effects.push(StatusEffect::bleed(1));
        assert_eq!(hero.lose_hp(7), 3);
        assert_eq!(hero.hp, 0);
        assert!(!hero.is_alive());
        assert!(hero.status_effects.is_empty());
    }

    #[test]
    fn test_heal_never_exceeds_max_and_full_heal_clears_bleed() {
        let mut hero = test_hero(8, 10);
        hero.status_effects.push(StatusEffect::bleed(1));
        assert_eq!(hero.heal(5), 2);
        assert_eq!(hero.hp, 10);
        assert!(hero.status_effects.is_empty());
    }

    #[test]
    fn test_dead_heroes_cannot_be_healed() {
        let mut hero = test_hero(0, 10);
        assert_eq!(hero.heal(5), 0);
        assert_eq!(hero.hp, 0);
    }

    #[test]
    fn test_fixed_rng_rolls_are_reproducible() {
        let mut rng = GameRng::fixed(0.1);
        assert_eq!(rng.roll_inclusive(4, 6), 4);
        assert_eq!(rng.roll_inclusive(0, 9), 1);
        assert_eq!(rng.choose_index(3), Some(0));
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = GameRng::from_seed(42);
        let mut b = GameRng::from_seed(42);
        for _ in 0..16 {
            assert_eq!(a.roll_inclusive(1, 20), b.roll_inclusive(1, 20));
        }
    }

    #[test]
    fn test_choose_weighted_skips_zero_weights() {
        let mut rng = GameRng::fixed(0.0);
        assert_eq!(rng.choose_weighted(&[0, 3, 1]), Some(1));
        let mut rng = GameRng::fixed(0.99);
        assert_eq!(rng.choose_weighted(&[0, 3, 1]), Some(2));
        assert_eq!(rng.choose_weighted(&[0, 0]), None);
    }

    #[test]
    fn test_sorted_ids_are_unique_and_ascending() {
        let mut a = test_hero(5, 10);
        a.id = HeroId(2);
        let mut b = test_hero(0, 10);
        b.id = HeroId(0);
        b.uuid = HeroUuid(2);
        let team = Team::new(Side::Player1, vec![a, b]);
        assert_eq!(team.sorted_ids(), vec![HeroId(0), HeroId(2)]);
        assert_eq!(team.sorted_survivor_ids(), vec![HeroId(2)]);
    }
}
