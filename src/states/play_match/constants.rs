//! Combat Constants
//!
//! Centralized location for magic numbers used throughout the combat system.
//! This makes it easier to tune balance and ensures consistency.

// ============================================================================
// Damage Floor
// ============================================================================

/// A landed strike from a living hero never deals less than this.
pub const MIN_DAMAGE: u32 = 1;

// ============================================================================
// Ability Magnitudes
// ============================================================================

/// Flat max HP granted by Toughness at team initialization.
pub const TOUGHNESS_BONUS_HP: u32 = 2;

/// HP left after Last Stand absorbs a lethal hit.
pub const LAST_STAND_HP: u32 = 1;

/// Damage per tick of a bleed applied by Barbed Strike.
pub const BLEED_MAGNITUDE: u32 = 1;

/// Extra damage Opportunist deals to targets at or below half HP.
pub const OPPORTUNIST_BONUS: u32 = 3;

/// Extra damage Mob Rule deals for each fallen ally.
pub const MOB_RULE_BONUS_PER_FALLEN: u32 = 2;

/// Damage Unstable Concoction splashes onto every other living enemy.
pub const CONCOCTION_SPLASH: u32 = 3;

/// Chaos Bolt rolls its base damage in `1..=attack * CHAOS_BOLT_MAX_FACTOR`.
pub const CHAOS_BOLT_MAX_FACTOR: u32 = 2;

/// Probability that Boon of Bedlam heals instead of striking again.
pub const BEDLAM_HEAL_CHANCE: f32 = 0.5;

/// HP restored by Boon of Bedlam's heal.
pub const BEDLAM_HEAL: u32 = 3;

/// Damage of Boon of Bedlam's bonus strike.
pub const BEDLAM_BONUS_DAMAGE: u32 = 2;

/// Overload's primary hit: `attack * OVERLOAD_ATTACK_FACTOR + roll(0..=attack)`.
pub const OVERLOAD_ATTACK_FACTOR: u32 = 2;

/// Backlash Overload inflicts on each living ally of the caster.
pub const OVERLOAD_BACKLASH_MIN: u32 = 4;
pub const OVERLOAD_BACKLASH_MAX: u32 = 6;

// ============================================================================
// AI Scoring
// ============================================================================

/// Weight of the simulated damage differential.
pub const SCORE_DIFFERENTIAL_WEIGHT: i32 = 10;

/// Bonus for a pairing that kills the target this clash.
pub const SCORE_LETHAL_BONUS: i32 = 50;

/// Bonus for targeting a survivor of a recorded AI defeat.
pub const SCORE_PRIORITY_TARGET_BONUS: i32 = 80;

/// Extra bonus when the pairing kills a priority target.
pub const SCORE_PRIORITY_KILL_BONUS: i32 = 60;

/// Bonus (Hard+) for killing the target before it can retaliate.
pub const SCORE_FIRST_STRIKE_KILL_BONUS: i32 = 40;

/// Penalty (Hard+) when the retaliation would kill the AI hero.
pub const SCORE_LETHAL_RETALIATION_PENALTY: i32 = 60;

/// Reduced penalty when Last Stand would still save the AI hero.
pub const SCORE_GUARDED_RETALIATION_PENALTY: i32 = 20;

// ============================================================================
// Team Assembly
// ============================================================================

/// Draft weight of counter-type heroes on Normal.
pub const NORMAL_COUNTER_WEIGHT: u32 = 2;

/// Draft weight of counter-type heroes on Hard.
pub const HARD_COUNTER_WEIGHT: u32 = 5;

/// How many times a vengeance survivor counts in the type tally.
pub const SURVIVOR_TALLY_WEIGHT: u32 = 2;
