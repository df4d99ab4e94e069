//! Active Abilities
//!
//! Fireball and Overload are fired by an explicit trigger instead of a
//! clash. Both are once per match and require a living caster.
//!
//! - **Fireball**: type-scaled attack damage to every living member of the
//!   target side. Protectors redirect each hit; Riposte answers each hit.
//! - **Overload**: `attack * 2 + roll(0..=attack)` type-scaled damage to
//!   the target side's selected hero (or its first living hero), then
//!   `roll(4..=6)` backlash to every other living ally of the caster.
//!   Backlash is never redirected.

use crate::combat::log::LogEntry;
use crate::states::match_config::type_multiplier;
use crate::states::play_match::abilities::AbilityType;
use crate::states::play_match::combat_core::{DamageKind, DamageOutcome};
use crate::states::play_match::components::*;
use crate::states::play_match::constants::*;
use crate::states::play_match::Battle;

/// What an active ability did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbilityResult {
    /// HP lost by enemies
    pub damage_dealt: u32,
    /// HP lost by the caster's side (reflections and backlash)
    pub damage_to_casters_side: u32,
    /// Log entries written by the ability
    pub entries: Vec<LogEntry>,
}

impl Battle {
    /// Whether `caster` is alive and still holds an unspent `ability`.
    pub fn can_trigger(&self, caster: HeroUuid, ability: AbilityType) -> bool {
        self.hero(caster)
            .map(|h| h.is_alive() && h.can_use_once(ability))
            .unwrap_or(false)
    }

    fn spend(&mut self, caster: HeroUuid) {
        if let Some(hero) = self.hero_mut(caster) {
            hero.flags.once_per_match_used = true;
        }
    }

    /// Typed damage from `caster` to `recipient`, floored at the minimum.
    fn typed_ability_damage(&self, caster: HeroUuid, recipient: HeroUuid, base: u32) -> u32 {
        match (self.hero(caster), self.hero(recipient)) {
            (Some(c), Some(r)) => type_multiplier(c.hero_type, r.hero_type)
                .apply(base)
                .max(MIN_DAMAGE),
            _ => 0,
        }
    }

    fn tally(&self, caster: HeroUuid, recipient: HeroUuid, outcome: DamageOutcome, result: &mut AbilityResult) {
        if self.side_of(recipient) == self.side_of(caster) {
            result.damage_to_casters_side += outcome.taken;
        } else {
            result.damage_dealt += outcome.taken;
            result.damage_to_casters_side += outcome.reflected;
        }
    }

    /// Fire `caster`'s Fireball at every living member of `target_side`.
    ///
    /// Does nothing when the caster cannot use Fireball.
    pub fn fireball(&mut self, caster: HeroUuid, target_side: Side) -> AbilityResult {
        let mut result = AbilityResult::default();
        if !self.can_trigger(caster, AbilityType::Fireball) {
            return result;
        }
        let log_start = self.log.len();
        self.spend(caster);
        self.log_ability(caster, AbilityType::Fireball, " flames engulf the enemy!".to_string());

        let attack = self.hero(caster).map(|h| h.attack).unwrap_or(0);
        let targets: Vec<HeroUuid> = self.team(target_side).alive().map(|h| h.uuid).collect();
        for intended in targets {
            let redirect = self.redirect_and_log(intended);
            let amount = self.typed_ability_damage(caster, redirect.recipient, attack);
            let outcome = self.apply_damage(
                Some(caster),
                redirect.recipient,
                amount,
                DamageKind::Ability(AbilityType::Fireball),
            );
            self.tally(caster, redirect.recipient, outcome, &mut result);
        }

        result.entries = self.log.since(log_start).to_vec();
        result
    }

    /// Fire `caster`'s Overload at `target_side`.
    ///
    /// Does nothing when the caster cannot use Overload or the target side
    /// has no living hero.
    pub fn overload(&mut self, caster: HeroUuid, target_side: Side) -> AbilityResult {
        let mut result = AbilityResult::default();
        if !self.can_trigger(caster, AbilityType::Overload) {
            return result;
        }
        let team = self.team(target_side);
        let Some(intended) = team
            .selected()
            .filter(|h| h.is_alive())
            .or_else(|| team.alive().next())
            .map(|h| h.uuid)
        else {
            return result;
        };

        let log_start = self.log.len();
        self.spend(caster);
        self.log_ability(caster, AbilityType::Overload, " unleashes raw power!".to_string());

        let attack = self.hero(caster).map(|h| h.attack).unwrap_or(0);
        let surge = self.rng.roll_inclusive(0, attack);
        let base = attack.saturating_mul(OVERLOAD_ATTACK_FACTOR) + surge;

        let redirect = self.redirect_and_log(intended);
        let amount = self.typed_ability_damage(caster, redirect.recipient, base);
        let outcome = self.apply_damage(
            Some(caster),
            redirect.recipient,
            amount,
            DamageKind::Ability(AbilityType::Overload),
        );
        self.tally(caster, redirect.recipient, outcome, &mut result);

        if let Some(caster_side) = self.side_of(caster) {
            let allies: Vec<HeroUuid> = self
                .team(caster_side)
                .alive()
                .map(|h| h.uuid)
                .filter(|uuid| *uuid != caster)
                .collect();
            for ally in allies {
                let backlash = self
                    .rng
                    .roll_inclusive(OVERLOAD_BACKLASH_MIN, OVERLOAD_BACKLASH_MAX);
                let outcome = self.apply_damage(Some(caster), ally, backlash, DamageKind::Backlash);
                self.tally(caster, ally, outcome, &mut result);
            }
        }

        result.entries = self.log.since(log_start).to_vec();
        result
    }
}
