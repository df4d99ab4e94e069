//! Headless match execution
//!
//! Plays a whole match with both sides driven by the AI: team 1 picks a
//! full pairing each clash, team 2 answers in responder mode.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GameError, Result};
use crate::states::play_match::{
    choose_pairing, choose_responder, hero_results, GameRng, HeroId, HeroResult, HeroRoster,
    HeroUuid, MatchMetadata, Side,
};
use crate::states::{Difficulty, Game};
use crate::vengeance::VengeanceMemory;

use super::config::HeadlessMatchConfig;

/// Result of a completed headless match
///
/// This struct provides programmatic access to match results for testing and analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// The winning side, or None for a draw (double wipe or clash limit)
    pub winner: Option<Side>,
    /// Clashes resolved
    pub clashes: u32,
    pub team1: Vec<HeroResult>,
    pub team2: Vec<HeroResult>,
    /// Whether the AI started the match in vengeance mode
    pub vengeance: bool,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
    /// Where the match log was written, if it was
    pub log_path: Option<String>,
}

fn invalid(message: String) -> GameError {
    GameError::InvalidConfig(message)
}

/// Run a headless match against the embedded roster, with loss history
/// taken from the config (in memory when it names no directory).
pub fn run_headless_match(config: &HeadlessMatchConfig) -> Result<MatchResult> {
    let memory = config.vengeance_memory().unwrap_or_default();
    run_headless_match_with(config, HeroRoster::default(), memory)
}

/// Run a headless match with an explicit roster and loss history.
pub fn run_headless_match_with(
    config: &HeadlessMatchConfig,
    roster: HeroRoster,
    memory: VengeanceMemory,
) -> Result<MatchResult> {
    config.validate().map_err(invalid)?;
    let team1 = HeadlessMatchConfig::resolve_team(&config.team1, &roster).map_err(invalid)?;
    let team2 = HeadlessMatchConfig::resolve_team(&config.team2, &roster).map_err(invalid)?;
    let mode = config.to_match_mode(&roster).map_err(invalid)?;
    let team1_difficulty = HeadlessMatchConfig::parse_difficulty(&config.team1_difficulty).map_err(invalid)?;
    let team2_difficulty = HeadlessMatchConfig::parse_difficulty(&config.team2_difficulty).map_err(invalid)?;
    let practice = !mode.has_ai_opponent();

    let rng = match config.random_seed {
        Some(seed) => {
            info!("Using deterministic RNG with seed: {}", seed);
            GameRng::from_seed(seed)
        }
        None => {
            info!("Using non-deterministic RNG (no seed provided)");
            GameRng::from_entropy()
        }
    };

    let mut game = Game::new(roster, memory, rng);
    game.open_team_assembly(mode)?;
    game.configure(team2_difficulty, team1.len())?;
    for id in &team1 {
        game.pick_hero(*id)?;
    }
    if practice {
        for id in &team2 {
            game.pick_hero(*id)?;
        }
    } else if !team2.is_empty() {
        game.draft_opponent(&team2)?;
    }
    game.start_game()?;
    let vengeance = game.vengeance().active;
    info!(
        "Headless match setup complete: {:?} vs {:?}",
        game.draft(Side::Player1),
        game.draft(Side::Player2)
    );

    while !game.check_game_over() {
        let clashes = game.battle().map(|b| b.clash_count).unwrap_or(0);
        if clashes >= config.max_clashes {
            info!("Match reached {} clashes - declaring DRAW", clashes);
            break;
        }

        let (p1, p2) = choose_heroes(&mut game, team1_difficulty, team2_difficulty, practice)?;
        game.select_hero(Side::Player1, p1)?;
        if let Some(p2) = p2 {
            game.select_hero(Side::Player2, p2)?;
        }
        game.resolve_clash()?;
    }

    let battle = game.battle().ok_or(GameError::InvalidPhase {
        expected: "GameOver",
        actual: game.phase().name(),
    })?;
    let winner = game.outcome().and_then(|o| o.winner);
    let team1_results = hero_results(battle, Side::Player1);
    let team2_results = hero_results(battle, Side::Player2);

    let log_path = config.output_path.as_deref().and_then(|path| {
        let metadata = MatchMetadata {
            mode: game.config().mode.name().to_string(),
            difficulty: game.config().difficulty.name().to_string(),
            winner: winner.map(|side| side.name().to_string()),
            clashes: battle.clash_count,
            random_seed: config.random_seed,
            vengeance,
            player1: team1_results.clone(),
            player2: team2_results.clone(),
        };
        match battle.log.save_to_file(&metadata, Some(path)) {
            Ok(filename) => {
                info!("Match complete. Log saved to: {}", filename);
                Some(filename)
            }
            Err(e) => {
                warn!("Failed to save battle log: {}", e);
                None
            }
        }
    });

    Ok(MatchResult {
        winner,
        clashes: battle.clash_count,
        team1: team1_results,
        team2: team2_results,
        vengeance,
        random_seed: config.random_seed,
        log_path,
    })
}

/// Pick team 1's hero, and team 2's when nothing else will (practice
/// mode). Selections forced by enemy abilities are kept.
fn choose_heroes(
    game: &mut Game,
    team1_difficulty: Difficulty,
    team2_difficulty: Difficulty,
    practice: bool,
) -> Result<(HeroUuid, Option<HeroUuid>)> {
    let battle = game.battle_mut().ok_or(GameError::MissingSelection(Side::Player1.name()))?;
    let no_priority: &[HeroId] = &[];

    let forced1 = battle
        .player1
        .selection
        .filter(|uuid| battle.player1.selection_forced && battle.is_standing(*uuid));
    let p1 = match forced1 {
        Some(uuid) => uuid,
        None => {
            choose_pairing(battle, Side::Player1, team1_difficulty, no_priority)
                .ok_or(GameError::MissingSelection(Side::Player1.name()))?
                .hero
        }
    };

    let p2 = if practice && !battle.player2.selection_forced {
        Some(
            choose_responder(battle, Side::Player2, p1, team2_difficulty, no_priority)
                .ok_or(GameError::MissingSelection(Side::Player2.name()))?,
        )
    } else {
        None
    };
    Ok((p1, p2))
}
