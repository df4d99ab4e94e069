//! Ability System - Types and Hook Dispatch
//!
//! Every hero carries at most one [`AbilityType`]. Abilities plug into a
//! fixed set of hook points during a clash:
//!
//! | Hook | When | Abilities |
//! |------|------|-----------|
//! | on-team-init | `initialize_team` | Toughness |
//! | pre-clash | engagement / redirection | Tank, Ambush |
//! | damage calc | computing a strike | Crush, ChaosBolt, Opportunist, MobRule |
//! | ordering | before strikes land | FirstStrike, Ambush |
//! | on-damage-received | damage lands | SmokeBomb, Evasion, Stoneskin, LastStand, Riposte |
//! | post-clash | after both strikes | Bleed, SoulSiphon, GaleForce, MadScramble, UnstableConcoction, BoonOfBedlam |
//! | active | triggered outside a clash | Fireball, Overload |
//!
//! Each hook is a function over `Option<AbilityType>` that matches only the
//! variants it cares about. Heroes without an ability (or with an ability
//! that has no handler for a hook) fall through to a no-op.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::components::{GameRng, Hero, StatusEffect};
use super::constants::*;

/// Enum representing available abilities.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AbilityType {
    // Might
    LastStand,
    Crush,
    Tank,
    MobRule,
    Bleed,
    Toughness,
    Stoneskin,
    // Finesse
    FirstStrike,
    SmokeBomb,
    Ambush,
    Riposte,
    Evasion,
    Opportunist,
    GaleForce,
    // Magic
    SoulSiphon,
    Overload,
    Fireball,
    UnstableConcoction,
    ChaosBolt,
    MadScramble,
    BoonOfBedlam,
}

impl AbilityType {
    pub fn all() -> &'static [AbilityType] {
        &[
            AbilityType::LastStand,
            AbilityType::Crush,
            AbilityType::Tank,
            AbilityType::MobRule,
            AbilityType::Bleed,
            AbilityType::Toughness,
            AbilityType::Stoneskin,
            AbilityType::FirstStrike,
            AbilityType::SmokeBomb,
            AbilityType::Ambush,
            AbilityType::Riposte,
            AbilityType::Evasion,
            AbilityType::Opportunist,
            AbilityType::GaleForce,
            AbilityType::SoulSiphon,
            AbilityType::Overload,
            AbilityType::Fireball,
            AbilityType::UnstableConcoction,
            AbilityType::ChaosBolt,
            AbilityType::MadScramble,
            AbilityType::BoonOfBedlam,
        ]
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            AbilityType::LastStand => "Last Stand",
            AbilityType::Crush => "Crush",
            AbilityType::Tank => "Bulwark",
            AbilityType::MobRule => "Mob Rule",
            AbilityType::Bleed => "Barbed Strike",
            AbilityType::Toughness => "Toughness",
            AbilityType::Stoneskin => "Stoneskin",
            AbilityType::FirstStrike => "First Strike",
            AbilityType::SmokeBomb => "Smoke Bomb",
            AbilityType::Ambush => "Ambush",
            AbilityType::Riposte => "Riposte",
            AbilityType::Evasion => "Evasion",
            AbilityType::Opportunist => "Opportunist",
            AbilityType::GaleForce => "Gale Force",
            AbilityType::SoulSiphon => "Soul Siphon",
            AbilityType::Overload => "Overload",
            AbilityType::Fireball => "Fireball",
            AbilityType::UnstableConcoction => "Unstable Concoction",
            AbilityType::ChaosBolt => "Chaos Bolt",
            AbilityType::MadScramble => "Mad Scramble",
            AbilityType::BoonOfBedlam => "Boon of Bedlam",
        }
    }

    /// Abilities fired by an explicit trigger rather than during a clash.
    pub fn is_active(&self) -> bool {
        matches!(self, AbilityType::Fireball | AbilityType::Overload)
    }
}

// ============================================================================
// on-team-init
// ============================================================================

/// Apply permanent stat modifications. Returns true if a bonus was applied
/// by this call; repeated calls are no-ops.
pub fn on_team_init(hero: &mut Hero) -> bool {
    if hero.flags.init_bonus_applied {
        return false;
    }
    match hero.ability {
        Some(AbilityType::Toughness) => {
            hero.max_hp += TOUGHNESS_BONUS_HP;
            hero.flags.init_bonus_applied = true;
            true
        }
        _ => false,
    }
}

// ============================================================================
// pre-clash
// ============================================================================

/// Whether this hero absorbs damage aimed at its living teammates.
pub fn is_protector(hero: &Hero) -> bool {
    hero.is_alive() && hero.has_ability(AbilityType::Tank)
}

/// Whether this hero can still spring an ambush for an ally.
pub fn can_ambush(hero: &Hero) -> bool {
    hero.is_alive() && hero.can_use_once(AbilityType::Ambush)
}

// ============================================================================
// damage calc / ordering
// ============================================================================

/// Crush ignores type halving and Stoneskin.
pub fn ignores_halving(attacker: &Hero) -> bool {
    attacker.has_ability(AbilityType::Crush)
}

/// Whether the hero's damage lands before the opponent retaliates.
pub fn strikes_first(hero: &Hero) -> bool {
    hero.has_ability(AbilityType::FirstStrike)
}

/// Base damage before type scaling. Chaos Bolt rolls its magnitude; `rng`
/// of None requests the expected value (used by lookahead).
pub fn base_damage(attacker: &Hero, rng: Option<&mut GameRng>) -> u32 {
    match attacker.ability {
        Some(AbilityType::ChaosBolt) => {
            let max = attacker.attack.saturating_mul(CHAOS_BOLT_MAX_FACTOR).max(1);
            match rng {
                Some(rng) => rng.roll_inclusive(1, max),
                None => (1 + max) / 2,
            }
        }
        _ => attacker.attack,
    }
}

/// Flat bonus damage added after type scaling.
///
/// `fallen_allies` is the number of dead members on the attacker's team.
pub fn damage_bonus(attacker: &Hero, recipient: &Hero, fallen_allies: usize) -> u32 {
    match attacker.ability {
        Some(AbilityType::Opportunist) if recipient.hp * 2 <= recipient.max_hp => {
            OPPORTUNIST_BONUS
        }
        Some(AbilityType::MobRule) => MOB_RULE_BONUS_PER_FALLEN * fallen_allies as u32,
        _ => 0,
    }
}

// ============================================================================
// on-damage-received
// ============================================================================

/// What a recipient's ability did to an incoming damage instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageIntercept {
    /// No ability interfered
    Unchanged,
    /// The whole instance was dodged (Smoke Bomb / Evasion)
    Negated(AbilityType),
    /// Stoneskin halved the hit
    Halved,
}

/// Run the negate/halve part of on-damage-received. Consumes one-shot
/// flags, so only the resolver calls this.
pub fn intercept_damage(
    recipient: &mut Hero,
    incoming: u32,
    source_crushes: bool,
) -> (u32, DamageIntercept) {
    if incoming == 0 {
        return (0, DamageIntercept::Unchanged);
    }
    match recipient.ability {
        Some(ability @ (AbilityType::SmokeBomb | AbilityType::Evasion))
            if !recipient.flags.once_per_match_used =>
        {
            recipient.flags.once_per_match_used = true;
            (0, DamageIntercept::Negated(ability))
        }
        Some(AbilityType::Stoneskin) if !source_crushes => {
            ((incoming / 2).max(MIN_DAMAGE), DamageIntercept::Halved)
        }
        _ => (incoming, DamageIntercept::Unchanged),
    }
}

/// Lethal-hit guard. Returns the damage that should actually be taken and
/// whether Last Stand fired.
pub fn guard_lethal(recipient: &mut Hero, incoming: u32) -> (u32, bool) {
    let lethal = incoming >= recipient.hp && recipient.hp > 0;
    if lethal && recipient.can_use_once(AbilityType::LastStand) {
        recipient.flags.once_per_match_used = true;
        return (recipient.hp - LAST_STAND_HP, true);
    }
    (incoming, false)
}

/// Whether the recipient answers a hit with a reflected strike.
pub fn reflects_damage(recipient: &Hero) -> bool {
    recipient.is_alive() && recipient.has_ability(AbilityType::Riposte)
}

/// Read-only preview of what an incoming hit would do, without touching
/// flags. Used by lookahead.
pub fn preview_received(recipient: &Hero, incoming: u32, source_crushes: bool) -> u32 {
    if incoming == 0 {
        return 0;
    }
    match recipient.ability {
        Some(AbilityType::SmokeBomb | AbilityType::Evasion)
            if !recipient.flags.once_per_match_used =>
        {
            0
        }
        Some(AbilityType::Stoneskin) if !source_crushes => (incoming / 2).max(MIN_DAMAGE),
        _ => incoming,
    }
}

// ============================================================================
// post-clash
// ============================================================================

/// Deferred effect requested by a striker's post-clash hook. The resolver
/// applies these once both strikes have landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostClashEffect {
    /// Append a status effect to the striker's recipient
    AfflictRecipient(StatusEffect),
    /// Grow the striker's max HP and HP
    Siphon(u32),
    /// Force the opposing side onto a different hero
    ForceReselect { random: bool },
    /// Damage every living enemy except the recipient
    Splash(u32),
    /// Heal the striker
    Heal(u32),
    /// Extra hit on the recipient
    BonusStrike(u32),
}

/// Collect post-clash effects for one striker.
///
/// `dealt` is the damage the striker's own strike inflicted this clash.
pub fn post_clash_effects(
    striker: &Hero,
    dealt: u32,
    rng: &mut GameRng,
) -> SmallVec<[PostClashEffect; 2]> {
    let mut effects = SmallVec::new();
    match striker.ability {
        Some(AbilityType::Bleed) if dealt > 0 => {
            effects.push(PostClashEffect::AfflictRecipient(StatusEffect::bleed(
                BLEED_MAGNITUDE,
            )));
        }
        Some(AbilityType::SoulSiphon) if dealt > 0 && striker.is_alive() => {
            effects.push(PostClashEffect::Siphon(dealt));
        }
        Some(AbilityType::GaleForce) => {
            effects.push(PostClashEffect::ForceReselect { random: false });
        }
        Some(AbilityType::MadScramble) => {
            effects.push(PostClashEffect::ForceReselect { random: true });
        }
        Some(AbilityType::UnstableConcoction) => {
            effects.push(PostClashEffect::Splash(CONCOCTION_SPLASH));
        }
        Some(AbilityType::BoonOfBedlam) if striker.is_alive() => {
            if rng.random_f32() < BEDLAM_HEAL_CHANCE {
                effects.push(PostClashEffect::Heal(BEDLAM_HEAL));
            } else {
                effects.push(PostClashEffect::BonusStrike(BEDLAM_BONUS_DAMAGE));
            }
        }
        _ => {}
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::match_config::HeroType;
    use crate::states::play_match::components::{AbilityFlags, HeroId, HeroUuid};

    fn hero_with(ability: Option<AbilityType>, hp: u32, max_hp: u32) -> Hero {
        Hero {
            id: HeroId(0),
            name: "Test".to_string(),
            hero_type: HeroType::Might,
            attack: 4,
            hp,
            max_hp,
            uuid: HeroUuid(1),
            ability,
            flags: AbilityFlags::default(),
            status_effects: SmallVec::new(),
        }
    }

    #[test]
    fn test_every_ability_has_a_name() {
        for ability in AbilityType::all() {
            assert!(!ability.name().is_empty(), "{:?} should have a name", ability);
        }
    }

    #[test]
    fn test_only_fireball_and_overload_are_active() {
        let active: Vec<_> = AbilityType::all().iter().filter(|a| a.is_active()).collect();
        assert_eq!(active, vec![&AbilityType::Overload, &AbilityType::Fireball]);
    }

    #[test]
    fn test_toughness_applies_once() {
        let mut hero = hero_with(Some(AbilityType::Toughness), 7, 7);
        assert!(on_team_init(&mut hero));
        assert!(!on_team_init(&mut hero));
        assert_eq!(hero.max_hp, 7 + TOUGHNESS_BONUS_HP);
    }

    #[test]
    fn test_heroes_without_ability_are_untouched_by_hooks() {
        let mut hero = hero_with(None, 10, 10);
        let target = hero_with(None, 1, 10);
        assert!(!on_team_init(&mut hero));
        assert_eq!(damage_bonus(&hero, &target, 2), 0);
        assert_eq!(intercept_damage(&mut hero, 4, false), (4, DamageIntercept::Unchanged));
        assert_eq!(guard_lethal(&mut hero, 12), (12, false));
        let mut rng = GameRng::fixed(0.5);
        assert!(post_clash_effects(&hero, 4, &mut rng).is_empty());
    }

    #[test]
    fn test_smoke_bomb_negates_exactly_once() {
        let mut hero = hero_with(Some(AbilityType::SmokeBomb), 8, 8);
        assert_eq!(
            intercept_damage(&mut hero, 8, false),
            (0, DamageIntercept::Negated(AbilityType::SmokeBomb))
        );
        assert!(hero.flags.once_per_match_used);
        assert_eq!(intercept_damage(&mut hero, 8, false), (8, DamageIntercept::Unchanged));
    }

    #[test]
    fn test_stoneskin_halves_unless_crushed() {
        let mut hero = hero_with(Some(AbilityType::Stoneskin), 9, 9);
        assert_eq!(intercept_damage(&mut hero, 6, false), (3, DamageIntercept::Halved));
        assert_eq!(intercept_damage(&mut hero, 6, true), (6, DamageIntercept::Unchanged));
        assert_eq!(intercept_damage(&mut hero, 1, false), (1, DamageIntercept::Halved));
    }

    #[test]
    fn test_last_stand_guards_first_lethal_hit_only() {
        let mut hero = hero_with(Some(AbilityType::LastStand), 10, 10);
        assert_eq!(guard_lethal(&mut hero, 10), (9, true));
        hero.hp = 1;
        assert_eq!(guard_lethal(&mut hero, 10), (10, false));
    }

    #[test]
    fn test_opportunist_bonus_requires_wounded_target() {
        let attacker = hero_with(Some(AbilityType::Opportunist), 6, 6);
        let healthy = hero_with(None, 6, 10);
        let wounded = hero_with(None, 5, 10);
        assert_eq!(damage_bonus(&attacker, &healthy, 0), 0);
        assert_eq!(damage_bonus(&attacker, &wounded, 0), OPPORTUNIST_BONUS);
    }

    #[test]
    fn test_mob_rule_scales_with_fallen_allies() {
        let attacker = hero_with(Some(AbilityType::MobRule), 7, 7);
        let target = hero_with(None, 10, 10);
        assert_eq!(damage_bonus(&attacker, &target, 0), 0);
        assert_eq!(damage_bonus(&attacker, &target, 2), 2 * MOB_RULE_BONUS_PER_FALLEN);
    }

    #[test]
    fn test_chaos_bolt_expected_value_and_bounds() {
        let mut attacker = hero_with(Some(AbilityType::ChaosBolt), 7, 7);
        attacker.attack = 4;
        assert_eq!(base_damage(&attacker, None), 4);
        let mut low = GameRng::fixed(0.0);
        let mut high = GameRng::fixed(0.99);
        assert_eq!(base_damage(&attacker, Some(&mut low)), 1);
        assert_eq!(base_damage(&attacker, Some(&mut high)), 8);
    }

    #[test]
    fn test_bleed_only_follows_a_landed_hit() {
        let striker = hero_with(Some(AbilityType::Bleed), 9, 9);
        let mut rng = GameRng::fixed(0.5);
        assert!(post_clash_effects(&striker, 0, &mut rng).is_empty());
        assert_eq!(
            post_clash_effects(&striker, 3, &mut rng).as_slice(),
            &[PostClashEffect::AfflictRecipient(StatusEffect::bleed(BLEED_MAGNITUDE))]
        );
    }
}
