//! Combat AI
//!
//! Handles all AI decision-making for the computer-controlled side:
//! - Team assembly (counter-picking the player's damage types)
//! - Pairing selection (which AI hero clashes with which player hero)
//!
//! Every decision is one-ply: candidates are ranked by a pure
//! [`simulate_pairing`](super::Battle::simulate_pairing) lookahead, with no
//! search over later clashes. Lower difficulties score the same way but
//! sample among the top candidates.

use tracing::{debug, info};

use super::abilities::{self, AbilityType};
use super::combat_core::simulate_clash;
use super::components::*;
use super::constants::*;
use super::hero_config::{HeroDefinition, HeroRoster};
use super::Battle;
use crate::states::match_config::{Difficulty, HeroType};
use crate::vengeance::VengeanceMode;

// ============================================================================
// Team Assembly
// ============================================================================

/// The type that beats the majority type of `player_team`.
///
/// Each hero counts once; heroes whose id is in `survivors` count
/// [`SURVIVOR_TALLY_WEIGHT`] times. Ties go to the earlier type in
/// Might, Finesse, Magic order. None for an empty team.
pub fn counter_type(player_team: &[&HeroDefinition], survivors: &[HeroId]) -> Option<HeroType> {
    let mut tally = [0u32; 3];
    for hero in player_team {
        let weight = if survivors.contains(&hero.id) {
            SURVIVOR_TALLY_WEIGHT
        } else {
            1
        };
        let slot = HeroType::all()
            .iter()
            .position(|t| *t == hero.hero_type)
            .unwrap_or(0);
        tally[slot] += weight;
    }

    let mut best: Option<(HeroType, u32)> = None;
    for (hero_type, count) in HeroType::all().iter().zip(tally) {
        if count > 0 && best.map(|(_, c)| count > c).unwrap_or(true) {
            best = Some((*hero_type, count));
        }
    }
    best.map(|(majority, _)| majority.countered_by())
}

/// Instantiate a definition the way a match would, for lookahead only.
fn preview_hero(definition: &HeroDefinition) -> Hero {
    let mut hero = Hero::from_definition(definition, HeroUuid(0));
    abilities::on_team_init(&mut hero);
    hero.hp = hero.max_hp;
    hero
}

/// Sum of simulated `(dealt - taken)` of `candidate` against every hero in
/// `opponents`.
pub fn matchup_score(candidate: &HeroDefinition, opponents: &[&HeroDefinition]) -> i32 {
    let hero = preview_hero(candidate);
    opponents
        .iter()
        .map(|opponent| {
            let (dealt, taken) = simulate_clash(&hero, &preview_hero(opponent));
            dealt as i32 - taken as i32
        })
        .sum()
}

/// Build the AI team.
///
/// Candidates are `pool` (a campaign rival's heroes) when given, otherwise
/// the whole roster; no hero is drafted twice.
///
/// - Easy: uniform random
/// - Normal: weighted random, counter-type heroes x[`NORMAL_COUNTER_WEIGHT`]
/// - Hard: weighted random, counter-type heroes x[`HARD_COUNTER_WEIGHT`]
/// - Impossible, or any difficulty in vengeance mode: deterministic, the
///   best counter-type heroes by [`matchup_score`] first, then the rest by
///   score
pub fn assemble_team(
    roster: &HeroRoster,
    pool: Option<&[HeroId]>,
    player_team: &[HeroId],
    team_size: usize,
    difficulty: Difficulty,
    vengeance: &VengeanceMode,
    rng: &mut GameRng,
) -> Vec<HeroId> {
    let candidates: Vec<&HeroDefinition> = match pool {
        Some(ids) if !ids.is_empty() => roster.subset(ids),
        _ => roster.heroes().iter().collect(),
    };
    let opponents = roster.subset(player_team);
    let counter = counter_type(&opponents, &vengeance.survivors);
    let is_counter = |def: &HeroDefinition| Some(def.hero_type) == counter;

    if vengeance.active || difficulty == Difficulty::Impossible {
        let mut scored: Vec<(bool, i32, &HeroDefinition)> = candidates
            .iter()
            .map(|def| (is_counter(*def), matchup_score(def, &opponents), *def))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)).then(a.2.id.cmp(&b.2.id)));
        let team: Vec<HeroId> = scored.iter().take(team_size).map(|(_, _, def)| def.id).collect();
        info!(
            "AI drafted {:?} against {:?} (counter type {:?}, vengeance {})",
            team, player_team, counter, vengeance.active
        );
        return team;
    }

    let counter_weight = match difficulty {
        Difficulty::Easy => 1,
        Difficulty::Normal => NORMAL_COUNTER_WEIGHT,
        _ => HARD_COUNTER_WEIGHT,
    };

    let mut remaining = candidates;
    let mut team = Vec::with_capacity(team_size);
    while team.len() < team_size && !remaining.is_empty() {
        let weights: Vec<u32> = remaining
            .iter()
            .map(|def| if is_counter(*def) { counter_weight } else { 1 })
            .collect();
        let index = rng.choose_weighted(&weights).unwrap_or(0);
        team.push(remaining.remove(index).id);
    }
    info!(
        "AI drafted {:?} on {} (counter type {:?})",
        team,
        difficulty.name(),
        counter
    );
    team
}

// ============================================================================
// Pairing Selection
// ============================================================================

/// A candidate clash and how much the AI likes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingScore {
    /// The AI's hero
    pub hero: HeroUuid,
    /// The opposing hero it would clash with
    pub target: HeroUuid,
    pub score: i32,
    /// Target's current HP, used to break ties
    pub target_hp: u32,
}

/// Score one pairing from the AI's point of view.
///
/// Scoring:
/// 1. Simulated damage differential: x[`SCORE_DIFFERENTIAL_WEIGHT`]
/// 2. Kills the target: +[`SCORE_LETHAL_BONUS`]
/// 3. Target is a survivor of a recorded AI defeat: +[`SCORE_PRIORITY_TARGET_BONUS`],
///    plus [`SCORE_PRIORITY_KILL_BONUS`] if the pairing kills it
/// 4. Hard and above only:
///    - First Strike kill with no retaliation: +[`SCORE_FIRST_STRIKE_KILL_BONUS`]
///    - Retaliation kills the AI hero: -[`SCORE_LETHAL_RETALIATION_PENALTY`]
///    - Retaliation would be lethal but burns Last Stand:
///      -[`SCORE_GUARDED_RETALIATION_PENALTY`]
pub fn score_pairing(
    battle: &Battle,
    hero: HeroUuid,
    target: HeroUuid,
    difficulty: Difficulty,
    priority_targets: &[HeroId],
) -> Option<PairingScore> {
    let ai_hero = battle.hero(hero).filter(|h| h.is_alive())?;
    let enemy = battle.hero(target).filter(|h| h.is_alive())?;
    let (dealt, taken) = battle.simulate_pairing(hero, target);

    let mut score = (dealt as i32 - taken as i32) * SCORE_DIFFERENTIAL_WEIGHT;
    let lethal = dealt >= enemy.hp;
    if lethal {
        score += SCORE_LETHAL_BONUS;
    }
    if priority_targets.contains(&enemy.id) {
        score += SCORE_PRIORITY_TARGET_BONUS;
        if lethal {
            score += SCORE_PRIORITY_KILL_BONUS;
        }
    }
    if difficulty.considers_tempo() {
        if lethal && taken == 0 && abilities::strikes_first(ai_hero) {
            score += SCORE_FIRST_STRIKE_KILL_BONUS;
        }
        if taken >= ai_hero.hp {
            score -= SCORE_LETHAL_RETALIATION_PENALTY;
        } else if taken > 0
            && taken + LAST_STAND_HP == ai_hero.hp
            && ai_hero.can_use_once(AbilityType::LastStand)
        {
            score -= SCORE_GUARDED_RETALIATION_PENALTY;
        }
    }

    Some(PairingScore {
        hero,
        target,
        score,
        target_hp: enemy.hp,
    })
}

/// Rank every pairing of `heroes` against `targets`, best first.
///
/// Ties go to the lowest target HP, then the lowest uuids.
pub fn rank_pairings(
    battle: &Battle,
    heroes: &[HeroUuid],
    targets: &[HeroUuid],
    difficulty: Difficulty,
    priority_targets: &[HeroId],
) -> Vec<PairingScore> {
    let mut ranked: Vec<PairingScore> = heroes
        .iter()
        .flat_map(|hero| {
            targets
                .iter()
                .filter_map(move |target| score_pairing(battle, *hero, *target, difficulty, priority_targets))
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.target_hp.cmp(&b.target_hp))
            .then(a.target.cmp(&b.target))
            .then(a.hero.cmp(&b.hero))
    });
    ranked
}

/// Sample from the top [`Difficulty::candidate_pool`] entries.
fn pick_ranked(ranked: &[PairingScore], difficulty: Difficulty, rng: &mut GameRng) -> Option<PairingScore> {
    let pool = difficulty.candidate_pool().min(ranked.len());
    let choice = rng.choose_index(pool).and_then(|i| ranked.get(i).copied());
    if let Some(pick) = choice {
        debug!(
            "AI picks {} -> {} (score {}, {} candidates)",
            pick.hero,
            pick.target,
            pick.score,
            ranked.len()
        );
    }
    choice
}

fn living(team: &Team) -> Vec<HeroUuid> {
    team.alive().map(|h| h.uuid).collect()
}

fn announce_priority(battle: &Battle, pick: &PairingScore, priority_targets: &[HeroId]) {
    if let Some(target) = battle.hero(pick.target) {
        if priority_targets.contains(&target.id) {
            info!("{} is a priority target (survivor)", target.name);
        }
    }
}

/// Choose a full pairing for `side`: any living hero of ours against any
/// living enemy.
pub fn choose_pairing(
    battle: &mut Battle,
    side: Side,
    difficulty: Difficulty,
    priority_targets: &[HeroId],
) -> Option<PairingScore> {
    let heroes = living(battle.team(side));
    let targets = living(battle.team(side.opponent()));
    let ranked = rank_pairings(battle, &heroes, &targets, difficulty, priority_targets);
    let pick = pick_ranked(&ranked, difficulty, &mut battle.rng)?;
    announce_priority(battle, &pick, priority_targets);
    Some(pick)
}

/// Choose which of our living heroes answers an enemy that is already
/// committed to `target`.
///
/// Every candidate faces the same target, so a priority target only
/// changes the pick through [`SCORE_PRIORITY_KILL_BONUS`]: the hero that
/// can finish it is favored.
pub fn choose_responder(
    battle: &mut Battle,
    side: Side,
    target: HeroUuid,
    difficulty: Difficulty,
    priority_targets: &[HeroId],
) -> Option<HeroUuid> {
    let heroes = living(battle.team(side));
    let ranked = rank_pairings(battle, &heroes, &[target], difficulty, priority_targets);
    let pick = pick_ranked(&ranked, difficulty, &mut battle.rng)?;
    announce_priority(battle, &pick, priority_targets);
    Some(pick.hero)
}
