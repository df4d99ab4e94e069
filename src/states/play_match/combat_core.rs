//! Combat Core
//!
//! Handles one clash from start to finish:
//! - Status upkeep (bleed ticks)
//! - Engagement (Ambush substitution)
//! - Redirection (protectors absorbing hits aimed at allies)
//! - Damage calculation and strike ordering
//! - Applying damage through the on-damage-received hooks
//! - Post-clash effects
//!
//! Also hosts the side-effect free lookahead used by the AI.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::abilities::{self, AbilityType, DamageIntercept, PostClashEffect};
use super::components::*;
use super::constants::{LAST_STAND_HP, MIN_DAMAGE};
use super::Battle;
use crate::combat::log::{LogColor, LogEntry, LogEventType};
use crate::states::match_config::{type_multiplier, TypeMultiplier};

/// Outcome of a single clash.
///
/// `player1_strike` and `player2_strike` are the two exchanged strikes.
/// The side totals also count upkeep ticks, splash, bonus hits and
/// ripostes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashResult {
    /// HP player1's striker took off its recipient (0 if it never struck)
    pub player1_strike: u32,
    /// HP player2's striker took off its recipient (0 if it never struck)
    pub player2_strike: u32,
    /// Total HP lost by player2 heroes during the clash
    pub damage_to_player2: u32,
    /// Total HP lost by player1 heroes during the clash
    pub damage_to_player1: u32,
    /// Log entries written by this clash
    pub entries: Vec<LogEntry>,
    pub player1_wiped: bool,
    pub player2_wiped: bool,
}

/// Where damage aimed at `intended` actually lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub intended: HeroUuid,
    pub recipient: HeroUuid,
}

impl Redirect {
    pub fn is_redirected(&self) -> bool {
        self.intended != self.recipient
    }
}

/// How a damage instance came about. Controls redirection and reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    /// A clash strike
    Strike,
    /// Riposte's answer to a hit
    Reflected,
    /// Unstable Concoction splash
    Splash,
    /// Boon of Bedlam's extra hit
    BonusStrike,
    /// Fireball / Overload primary damage
    Ability(AbilityType),
    /// Overload recoil on the caster's allies
    Backlash,
}

impl DamageKind {
    fn label(self) -> &'static str {
        match self {
            DamageKind::Strike => "strikes",
            DamageKind::Reflected => "ripostes",
            DamageKind::Splash => "splashes",
            DamageKind::BonusStrike => "lashes out at",
            DamageKind::Ability(_) => "blasts",
            DamageKind::Backlash => "burns",
        }
    }

    /// Reflection never answers a reflection or friendly recoil.
    fn can_be_reflected(self) -> bool {
        !matches!(self, DamageKind::Reflected | DamageKind::Backlash)
    }
}

/// What one `apply_damage` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// HP the recipient actually lost
    pub taken: u32,
    /// HP the source's side lost to a Riposte answering this hit
    pub reflected: u32,
    pub killed: bool,
}

/// A hero committed to strike this clash.
#[derive(Debug, Clone, Copy)]
struct Striker {
    uuid: HeroUuid,
    first: bool,
}

/// Damage `attacker` would deal to `recipient` before on-damage-received
/// hooks.
///
/// Type scaling applies to the base (Crush skips halving), then flat
/// bonuses, with a floor of [`MIN_DAMAGE`]. With `rng` of None, random
/// components use their expected value.
pub fn strike_damage(
    attacker: &Hero,
    recipient: &Hero,
    fallen_allies: usize,
    rng: Option<&mut GameRng>,
) -> u32 {
    let base = abilities::base_damage(attacker, rng);
    let scaled = match type_multiplier(attacker.hero_type, recipient.hero_type) {
        TypeMultiplier::Half if abilities::ignores_halving(attacker) => base,
        multiplier => multiplier.apply(base),
    };
    (scaled + abilities::damage_bonus(attacker, recipient, fallen_allies)).max(MIN_DAMAGE)
}

/// Expected HP loss from an incoming hit, reading but never consuming the
/// recipient's once-per-match flags. Capped at the recipient's HP.
fn expected_received(recipient: &Hero, incoming: u32, source_crushes: bool) -> u32 {
    let mut damage = abilities::preview_received(recipient, incoming, source_crushes);
    if recipient.is_alive()
        && damage >= recipient.hp
        && recipient.can_use_once(AbilityType::LastStand)
    {
        damage = recipient.hp - LAST_STAND_HP;
    }
    damage.min(recipient.hp)
}

fn simulate_strikes(a: &Hero, b: &Hero, fallen_a: usize, fallen_b: usize) -> (u32, u32) {
    if !a.is_alive() || !b.is_alive() {
        return (0, 0);
    }
    let to_b = expected_received(b, strike_damage(a, b, fallen_a, None), abilities::ignores_halving(a));
    let to_a = expected_received(a, strike_damage(b, a, fallen_b, None), abilities::ignores_halving(b));

    let a_first = abilities::strikes_first(a);
    let b_first = abilities::strikes_first(b);
    if a_first && !b_first && to_b >= b.hp {
        return (to_b, 0);
    }
    if b_first && !a_first && to_a >= a.hp {
        return (0, to_a);
    }
    (to_b, to_a)
}

/// Predict `(damage a deals to b, damage b deals to a)` for a clash between
/// two heroes, without mutating either.
///
/// Type multipliers, Crush, Opportunist, Stoneskin, unused evasion and Last
/// Stand are all taken into account; Chaos Bolt uses its expected roll. A
/// First Strike kill means no retaliation.
pub fn simulate_clash(a: &Hero, b: &Hero) -> (u32, u32) {
    simulate_strikes(a, b, 0, 0)
}

impl Battle {
    /// Like [`simulate_clash`], with team-dependent bonuses (Mob Rule).
    pub fn simulate_pairing(&self, a: HeroUuid, b: HeroUuid) -> (u32, u32) {
        let (Some(hero_a), Some(hero_b)) = (self.hero(a), self.hero(b)) else {
            return (0, 0);
        };
        let fallen = |uuid| {
            self.side_of(uuid)
                .map(|side| self.team(side).fallen_count())
                .unwrap_or(0)
        };
        simulate_strikes(hero_a, hero_b, fallen(a), fallen(b))
    }

    /// Resolve which hero takes damage aimed at `intended`.
    ///
    /// The first living protector on the intended hero's team, other than
    /// the intended hero, takes the hit instead.
    pub fn resolve_redirect(&self, intended: HeroUuid) -> Redirect {
        let protector = self.side_of(intended).and_then(|side| {
            self.team(side)
                .members
                .iter()
                .find(|h| h.uuid != intended && abilities::is_protector(h))
                .map(|h| h.uuid)
        });
        Redirect {
            intended,
            recipient: protector.unwrap_or(intended),
        }
    }

    /// Redirect and log in one step.
    pub(crate) fn redirect_and_log(&mut self, intended: HeroUuid) -> Redirect {
        let redirect = self.resolve_redirect(intended);
        if redirect.is_redirected() {
            let entry = LogEntry::new(LogEventType::Redirect)
                .colored(self.name_of(redirect.recipient), self.name_color(redirect.recipient))
                .text(" shields ")
                .colored(self.name_of(intended), self.name_color(intended))
                .text(" with ")
                .colored(AbilityType::Tank.name(), LogColor::Ability)
                .text("!");
            self.log.push(entry);
        }
        redirect
    }

    /// Damage `attacker` deals to `recipient` right now, rolling random
    /// components.
    pub(crate) fn roll_strike(&mut self, attacker: HeroUuid, recipient: HeroUuid) -> u32 {
        let fallen = self
            .side_of(attacker)
            .map(|side| self.team(side).fallen_count())
            .unwrap_or(0);
        let Battle {
            player1,
            player2,
            rng,
            ..
        } = self;
        match (
            find_hero(player1, player2, attacker),
            find_hero(player1, player2, recipient),
        ) {
            (Some(a), Some(r)) => strike_damage(a, r, fallen, Some(rng)),
            _ => 0,
        }
    }

    /// Apply one damage instance to `recipient`.
    ///
    /// Runs the on-damage-received hooks in order: evasion, Stoneskin, Last
    /// Stand, HP loss, then Riposte. Death clears status effects. Damage
    /// on a dead recipient is ignored. Redirection of the incoming hit is
    /// the caller's job; a Riposte answer is redirected here, since a
    /// protector on the striker's side shields it too.
    pub fn apply_damage(
        &mut self,
        source: Option<HeroUuid>,
        recipient: HeroUuid,
        amount: u32,
        kind: DamageKind,
    ) -> DamageOutcome {
        let source_crushes = kind != DamageKind::Reflected
            && source
                .and_then(|uuid| self.hero(uuid))
                .map(abilities::ignores_halving)
                .unwrap_or(false);
        let recipient_name = self.name_of(recipient);
        let recipient_color = self.name_color(recipient);

        let Some(hero) = self.hero_mut(recipient) else {
            return DamageOutcome::default();
        };
        if !hero.is_alive() {
            return DamageOutcome::default();
        }
        let hp_before = hero.hp;
        let (after_intercept, intercept) = abilities::intercept_damage(hero, amount, source_crushes);
        let (final_damage, last_stand) = abilities::guard_lethal(hero, after_intercept);
        let taken = hero.lose_hp(final_damage);
        let killed = !hero.is_alive();
        let reflects = taken > 0 && kind.can_be_reflected() && abilities::reflects_damage(hero);

        debug_assert!(hero.hp <= hero.max_hp, "apply_damage: HP above max");
        debug_assert_eq!(hp_before - taken, hero.hp);

        match intercept {
            DamageIntercept::Negated(ability) => {
                self.log.push(
                    LogEntry::new(LogEventType::AbilityTriggered)
                        .colored(recipient_name.clone(), recipient_color)
                        .text(" avoids the blow with ")
                        .colored(ability.name(), LogColor::Ability)
                        .text("!"),
                );
            }
            DamageIntercept::Halved => {
                self.log.push(
                    LogEntry::new(LogEventType::AbilityTriggered)
                        .colored(recipient_name.clone(), recipient_color)
                        .text("'s ")
                        .colored(AbilityType::Stoneskin.name(), LogColor::Ability)
                        .text(format!(" reduces the hit to {}.", after_intercept)),
                );
            }
            DamageIntercept::Unchanged => {}
        }

        if taken > 0 || intercept == DamageIntercept::Unchanged {
            let mut entry = LogEntry::new(LogEventType::Damage);
            if let Some(src) = source {
                entry = entry
                    .colored(self.name_of(src), self.name_color(src))
                    .text(format!(" {} ", kind.label()));
            }
            entry = entry
                .colored(recipient_name.clone(), recipient_color)
                .text(if source.is_some() { " for " } else { " takes " })
                .colored(taken.to_string(), LogColor::Damage)
                .text(" damage.")
                .with_amount(source, recipient, taken);
            self.log.push(entry);
        }

        if last_stand {
            self.log.push(
                LogEntry::new(LogEventType::AbilityTriggered)
                    .colored(recipient_name.clone(), recipient_color)
                    .text(" refuses to fall: ")
                    .colored(AbilityType::LastStand.name(), LogColor::Ability)
                    .text("!"),
            );
        }

        if killed {
            self.log_death(recipient);
        }

        let mut outcome = DamageOutcome {
            taken,
            reflected: 0,
            killed,
        };

        if reflects {
            if let Some(src) = source {
                let opposed = self.side_of(src) != self.side_of(recipient);
                if opposed {
                    self.log.push(
                        LogEntry::new(LogEventType::AbilityTriggered)
                            .colored(recipient_name, recipient_color)
                            .text(" answers with ")
                            .colored(AbilityType::Riposte.name(), LogColor::Ability)
                            .text("!"),
                    );
                    let redirect = self.redirect_and_log(src);
                    let answer =
                        self.apply_damage(Some(recipient), redirect.recipient, taken, DamageKind::Reflected);
                    outcome.reflected = answer.taken;
                }
            }
        }

        outcome
    }

    /// Whether `uuid` names a living hero
    pub fn is_standing(&self, uuid: HeroUuid) -> bool {
        self.hero(uuid).map(Hero::is_alive).unwrap_or(false)
    }

    pub(crate) fn log_death(&mut self, uuid: HeroUuid) {
        let mut entry = LogEntry::new(LogEventType::Death)
            .colored(self.name_of(uuid), self.name_color(uuid))
            .text(" has fallen!");
        entry.target = Some(uuid);
        self.log.push(entry);
    }

    /// Pick the hero that actually strikes for `side` this clash.
    ///
    /// An unused Ambush ally takes the selected hero's place and strikes
    /// first, consuming the ability.
    fn engage(&mut self, side: Side, selected: HeroUuid) -> Striker {
        let ambusher = self
            .team(side)
            .members
            .iter()
            .find(|h| h.uuid != selected && abilities::can_ambush(h))
            .map(|h| h.uuid);

        if let Some(uuid) = ambusher {
            if let Some(hero) = self.hero_mut(uuid) {
                hero.flags.once_per_match_used = true;
            }
            self.log.push(
                LogEntry::new(LogEventType::AbilityTriggered)
                    .colored(self.name_of(uuid), self.name_color(uuid))
                    .text(" springs an ")
                    .colored(AbilityType::Ambush.name(), LogColor::Ability)
                    .text(" in place of ")
                    .colored(self.name_of(selected), self.name_color(selected))
                    .text("!"),
            );
            return Striker { uuid, first: true };
        }

        let first = self
            .hero(selected)
            .map(abilities::strikes_first)
            .unwrap_or(false);
        Striker {
            uuid: selected,
            first,
        }
    }

    /// Land one striker's hit on its (redirected) recipient.
    fn land_strike(
        &mut self,
        striker: Striker,
        redirect: Redirect,
        amount: u32,
        tally: &mut ClashTally,
    ) -> DamageOutcome {
        let outcome = self.apply_damage(Some(striker.uuid), redirect.recipient, amount, DamageKind::Strike);
        tally.record(self, striker.uuid, redirect.recipient, outcome);
        outcome
    }

    /// Resolve a full clash between `p1` (player1) and `p2` (player2).
    ///
    /// Steps: status upkeep, engagement, redirection, damage calculation,
    /// ordered strikes, post-clash effects, then dead selections are
    /// cleared and wipes reported. The battle state is final when this
    /// returns.
    pub fn calculate_clash_result(&mut self, p1: HeroUuid, p2: HeroUuid) -> ClashResult {
        debug_assert!(self.player1.contains(p1), "p1 must be a player1 hero");
        debug_assert!(self.player2.contains(p2), "p2 must be a player2 hero");

        let log_start = self.log.len();
        self.clash_count += 1;
        let round = self.log.begin_round();
        self.log.push(
            LogEntry::new(LogEventType::Clash)
                .text(format!("Clash {}: ", round))
                .colored(self.name_of(p1), LogColor::Player1)
                .text(" vs ")
                .colored(self.name_of(p2), LogColor::Player2),
        );

        self.player1.selection = Some(p1);
        self.player2.selection = Some(p2);
        self.player1.selection_forced = false;
        self.player2.selection_forced = false;

        let mut tally = ClashTally::default();
        let (upkeep1, upkeep2) = self.tick_status_effects();
        tally.to_player1 += upkeep1;
        tally.to_player2 += upkeep2;

        let (player1_strike, player2_strike) = if self.is_standing(p1) && self.is_standing(p2) {
            self.resolve_strikes(p1, p2, &mut tally)
        } else {
            debug!("Clash {} ended during upkeep", round);
            (0, 0)
        };

        self.player1.clear_dead_selection();
        self.player2.clear_dead_selection();
        let (player1_wiped, player2_wiped) = self.wipes();

        ClashResult {
            player1_strike,
            player2_strike,
            damage_to_player2: tally.to_player2,
            damage_to_player1: tally.to_player1,
            entries: self.log.since(log_start).to_vec(),
            player1_wiped,
            player2_wiped,
        }
    }

    /// Exchange strikes and run post-clash effects. Returns the HP each
    /// striker's own hit took, player1 first.
    fn resolve_strikes(&mut self, p1: HeroUuid, p2: HeroUuid, tally: &mut ClashTally) -> (u32, u32) {
        let striker1 = self.engage(Side::Player1, p1);
        let striker2 = self.engage(Side::Player2, p2);

        let at_player2 = self.redirect_and_log(striker2.uuid);
        let at_player1 = self.redirect_and_log(striker1.uuid);

        // Both amounts are fixed before either hit lands.
        let amount1 = self.roll_strike(striker1.uuid, at_player2.recipient);
        let amount2 = self.roll_strike(striker2.uuid, at_player1.recipient);

        let (dealt1, dealt2) = match (striker1.first, striker2.first) {
            (true, false) => {
                let first = self.land_strike(striker1, at_player2, amount1, tally);
                let second = if self.is_standing(striker2.uuid) {
                    self.land_strike(striker2, at_player1, amount2, tally)
                } else {
                    DamageOutcome::default()
                };
                (first.taken, second.taken)
            }
            (false, true) => {
                let first = self.land_strike(striker2, at_player1, amount2, tally);
                let second = if self.is_standing(striker1.uuid) {
                    self.land_strike(striker1, at_player2, amount1, tally)
                } else {
                    DamageOutcome::default()
                };
                (second.taken, first.taken)
            }
            _ => {
                let hit1 = self.land_strike(striker1, at_player2, amount1, tally);
                let hit2 = self.land_strike(striker2, at_player1, amount2, tally);
                (hit1.taken, hit2.taken)
            }
        };

        self.run_post_clash(striker1.uuid, at_player2, dealt1, tally);
        self.run_post_clash(striker2.uuid, at_player1, dealt2, tally);
        (dealt1, dealt2)
    }

    /// Apply a striker's post-clash effects. `target` is where its strike
    /// was aimed.
    fn run_post_clash(
        &mut self,
        striker: HeroUuid,
        target: Redirect,
        dealt: u32,
        tally: &mut ClashTally,
    ) {
        let effects = {
            let Battle {
                player1,
                player2,
                rng,
                ..
            } = self;
            match find_hero(player1, player2, striker) {
                Some(hero) => abilities::post_clash_effects(hero, dealt, rng),
                None => return,
            }
        };
        let Some(side) = self.side_of(striker) else {
            return;
        };
        let enemy_side = side.opponent();

        for effect in effects {
            match effect {
                PostClashEffect::AfflictRecipient(status) => {
                    self.afflict(striker, target.recipient, status);
                }
                PostClashEffect::Siphon(amount) => {
                    if let Some(hero) = self.hero_mut(striker) {
                        hero.grow_max_hp(amount);
                    }
                    self.log_ability(striker, AbilityType::SoulSiphon, format!(" drains {} vitality.", amount));
                }
                PostClashEffect::ForceReselect { random } => {
                    self.force_reselect(striker, enemy_side, random);
                }
                PostClashEffect::Splash(amount) => {
                    self.log_ability(striker, AbilityType::UnstableConcoction, " sprays the enemy line!".to_string());
                    let targets: Vec<HeroUuid> = self
                        .team(enemy_side)
                        .alive()
                        .map(|h| h.uuid)
                        .filter(|uuid| *uuid != target.recipient)
                        .collect();
                    for intended in targets {
                        let redirect = self.redirect_and_log(intended);
                        let outcome = self.apply_damage(Some(striker), redirect.recipient, amount, DamageKind::Splash);
                        tally.record(self, striker, redirect.recipient, outcome);
                    }
                }
                PostClashEffect::Heal(amount) => {
                    let healed = self.hero_mut(striker).map(|h| h.heal(amount)).unwrap_or(0);
                    self.log_ability(striker, AbilityType::BoonOfBedlam, " mends itself.".to_string());
                    self.log.push(
                        LogEntry::new(LogEventType::Healing)
                            .colored(self.name_of(striker), self.name_color(striker))
                            .text(" heals for ")
                            .colored(healed.to_string(), LogColor::Heal)
                            .text(".")
                            .with_amount(Some(striker), striker, healed),
                    );
                }
                PostClashEffect::BonusStrike(amount) => {
                    self.log_ability(striker, AbilityType::BoonOfBedlam, " cackles and strikes again!".to_string());
                    let outcome = self.apply_damage(Some(striker), target.recipient, amount, DamageKind::BonusStrike);
                    tally.record(self, striker, target.recipient, outcome);
                }
            }
        }
    }

    /// Force `side` onto a different living hero. Gale Force takes the next
    /// hero in team order; Mad Scramble picks at random. The current
    /// selection is kept when it is the only living hero.
    fn force_reselect(&mut self, striker: HeroUuid, side: Side, random: bool) {
        let team = self.team(side);
        let current = team.selection;
        let start = current
            .and_then(|uuid| team.members.iter().position(|h| h.uuid == uuid))
            .unwrap_or(0);
        let len = team.members.len();
        // Living heroes other than the current selection, in team order
        // starting after it.
        let candidates: Vec<HeroUuid> = (1..=len)
            .map(|offset| &team.members[(start + offset) % len])
            .filter(|h| h.is_alive() && Some(h.uuid) != current)
            .map(|h| h.uuid)
            .collect();
        if candidates.is_empty() {
            return;
        }

        let (chosen, ability) = if random {
            let index = self.rng.choose_index(candidates.len()).unwrap_or(0);
            (candidates[index], AbilityType::MadScramble)
        } else {
            (candidates[0], AbilityType::GaleForce)
        };

        let team = self.team_mut(side);
        team.selection = Some(chosen);
        team.selection_forced = true;
        let text = format!(" forces {} forward.", self.name_of(chosen));
        self.log_ability(striker, ability, text);
    }

    /// Append a status effect to a living hero.
    pub(crate) fn afflict(&mut self, source: HeroUuid, target: HeroUuid, status: StatusEffect) {
        let applied = self
            .hero_mut(target)
            .map(|hero| super::effects::status::apply_status(hero, status))
            .unwrap_or(false);
        if applied {
            self.log.push(
                LogEntry::new(LogEventType::StatusApplied)
                    .colored(self.name_of(source), self.name_color(source))
                    .text(" leaves ")
                    .colored(self.name_of(target), self.name_color(target))
                    .colored(format!(" bleeding ({})", status.magnitude), LogColor::Status)
                    .text("."),
            );
        }
    }

    pub(crate) fn log_ability(&mut self, hero: HeroUuid, ability: AbilityType, text: String) {
        self.log.push(
            LogEntry::new(LogEventType::AbilityTriggered)
                .colored(self.name_of(hero), self.name_color(hero))
                .text(" uses ")
                .colored(ability.name(), LogColor::Ability)
                .text(format!(":{}", text)),
        );
    }
}

fn find_hero<'a>(player1: &'a Team, player2: &'a Team, uuid: HeroUuid) -> Option<&'a Hero> {
    player1.get(uuid).or_else(|| player2.get(uuid))
}

/// Running HP-loss totals per side during one clash.
#[derive(Debug, Default)]
struct ClashTally {
    to_player1: u32,
    to_player2: u32,
}

impl ClashTally {
    fn add(&mut self, side: Option<Side>, amount: u32) {
        match side {
            Some(Side::Player1) => self.to_player1 += amount,
            Some(Side::Player2) => self.to_player2 += amount,
            None => {}
        }
    }

    fn record(&mut self, battle: &Battle, source: HeroUuid, recipient: HeroUuid, outcome: DamageOutcome) {
        self.add(battle.side_of(recipient), outcome.taken);
        self.add(battle.side_of(source), outcome.reflected);
    }
}
