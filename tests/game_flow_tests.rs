//! Integration tests for the game phase state machine
//!
//! These tests verify that:
//! - Operations are rejected outside their phase
//! - Game over is detected once and logged once
//! - Forced selections lock the affected side
//! - Active abilities are fired through the game facade

use trinity_clash::states::play_match::{GameRng, HeroId, HeroRoster, HeroUuid, Side};
use trinity_clash::{Difficulty, Game, GameError, GamePhase, MatchMode, VengeanceMemory};

fn new_game() -> Game {
    Game::new(HeroRoster::default(), VengeanceMemory::in_memory(), GameRng::from_seed(1234))
}

/// Start a practice match with both drafts fixed.
fn practice(game: &mut Game, p1: &[u32], p2: &[u32]) {
    game.open_team_assembly(MatchMode::Practice).unwrap();
    game.configure(Difficulty::Normal, p1.len()).unwrap();
    for id in p1.iter().chain(p2.iter()) {
        game.pick_hero(HeroId(*id)).unwrap();
    }
    game.start_game().unwrap();
}

/// Start a quick match against a fixed AI lineup.
fn quick_match(game: &mut Game, p1: &[u32], p2: &[u32]) {
    game.open_team_assembly(MatchMode::QuickMatch).unwrap();
    game.configure(Difficulty::Hard, p1.len()).unwrap();
    for id in p1 {
        game.pick_hero(HeroId(*id)).unwrap();
    }
    let fixed: Vec<HeroId> = p2.iter().map(|id| HeroId(*id)).collect();
    game.draft_opponent(&fixed).unwrap();
    game.start_game().unwrap();
}

// =============================================================================
// Phase Transitions
// =============================================================================

#[test]
fn test_full_phase_cycle() {
    let mut game = new_game();
    assert_eq!(game.phase(), &GamePhase::MainMenu);
    practice(&mut game, &[9], &[10]);
    assert_eq!(game.phase(), &GamePhase::Playing);

    game.select_hero(Side::Player1, HeroUuid(1)).unwrap();
    game.select_hero(Side::Player2, HeroUuid(2)).unwrap();
    game.resolve_clash().unwrap();
    assert_eq!(game.phase(), &GamePhase::GameOver);

    game.return_to_main_menu();
    assert_eq!(game.phase(), &GamePhase::MainMenu);
    assert!(game.battle().is_none());
    assert!(game.outcome().is_none());
}

#[test]
fn test_playing_operations_rejected_in_menu() {
    let mut game = new_game();
    assert!(matches!(
        game.resolve_clash(),
        Err(GameError::InvalidPhase { expected: "Playing", .. })
    ));
    assert!(matches!(
        game.select_hero(Side::Player1, HeroUuid(1)),
        Err(GameError::InvalidPhase { .. })
    ));
    assert!(!game.check_game_over());
}

#[test]
fn test_resolve_requires_player_selection() {
    let mut game = new_game();
    practice(&mut game, &[9], &[9]);
    assert!(matches!(
        game.resolve_clash(),
        Err(GameError::MissingSelection("player1"))
    ));
}

#[test]
fn test_dead_or_foreign_heroes_cannot_be_selected() {
    let mut game = new_game();
    practice(&mut game, &[9, 10], &[9, 10]);
    assert!(matches!(
        game.select_hero(Side::Player1, HeroUuid(3)),
        Err(GameError::InvalidSelection { .. })
    ));
    game.battle_mut().unwrap().hero_mut(HeroUuid(2)).unwrap().hp = 0;
    assert!(matches!(
        game.select_hero(Side::Player1, HeroUuid(2)),
        Err(GameError::InvalidSelection { .. })
    ));
}

// =============================================================================
// Game Over
// =============================================================================

#[test]
fn test_check_game_over_is_idempotent() {
    let mut game = new_game();
    quick_match(&mut game, &[9], &[10]);
    game.select_hero(Side::Player1, HeroUuid(1)).unwrap();
    game.resolve_clash().unwrap();

    let first = game.check_game_over();
    let second = game.check_game_over();
    assert!(first);
    assert_eq!(first, second);

    let battle = game.battle().unwrap();
    assert_eq!(battle.log.count_text("VICTORY!"), 1);
    assert_eq!(game.outcome().unwrap().winner, Some(Side::Player1));
    assert_eq!(game.memory().history().len(), 1, "one loss record per match");
}

#[test]
fn test_double_wipe_is_a_draw() {
    let mut game = new_game();
    practice(&mut game, &[9], &[9]);
    for _ in 0..3 {
        game.select_hero(Side::Player1, HeroUuid(1)).unwrap();
        game.select_hero(Side::Player2, HeroUuid(2)).unwrap();
        game.resolve_clash().unwrap();
    }
    let outcome = game.outcome().copied().unwrap();
    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.clashes, 3);
    assert!(game.battle().unwrap().log.contains_text("DRAW!"));
}

#[test]
fn test_practice_never_records_losses() {
    let mut game = new_game();
    practice(&mut game, &[9], &[10]);
    game.select_hero(Side::Player1, HeroUuid(1)).unwrap();
    game.select_hero(Side::Player2, HeroUuid(2)).unwrap();
    game.resolve_clash().unwrap();
    assert_eq!(game.outcome().unwrap().winner, Some(Side::Player1));
    assert!(game.memory().history().is_empty());
}

#[test]
fn test_ai_victory_is_not_recorded() {
    let mut game = new_game();
    quick_match(&mut game, &[10], &[9]);
    game.select_hero(Side::Player1, HeroUuid(1)).unwrap();
    game.resolve_clash().unwrap();
    assert_eq!(game.outcome().unwrap().winner, Some(Side::Player2));
    assert!(game.battle().unwrap().log.contains_text("DEFEAT!"));
    assert!(game.memory().history().is_empty());
}

// =============================================================================
// Forced Selections
// =============================================================================

#[test]
fn test_gale_force_locks_enemy_selection() {
    let mut game = new_game();
    // Zephyr, Skeleton Warrior, Skeleton Mage vs Skeleton Archer, Skeleton Mage, Skeleton Warrior
    practice(&mut game, &[20, 9, 11], &[10, 11, 9]);
    game.select_hero(Side::Player1, HeroUuid(1)).unwrap();
    game.select_hero(Side::Player2, HeroUuid(4)).unwrap();
    game.resolve_clash().unwrap();

    assert!(matches!(
        game.select_hero(Side::Player2, HeroUuid(6)),
        Err(GameError::SelectionLocked("player2"))
    ));
    game.select_hero(Side::Player2, HeroUuid(5)).unwrap();
}

#[test]
fn test_ai_responder_picks_a_living_hero() {
    let mut game = new_game();
    quick_match(&mut game, &[9, 10], &[11, 12]);
    game.select_hero(Side::Player1, HeroUuid(1)).unwrap();
    let result = game.resolve_clash().unwrap();
    assert!(result.damage_to_player1 > 0 || result.damage_to_player2 > 0);
    let battle = game.battle().unwrap();
    assert!(battle.player2.selection.is_none() || battle.player2.selected().unwrap().is_alive());
}

// =============================================================================
// Active Abilities
// =============================================================================

#[test]
fn test_use_ability_fires_once() {
    let mut game = new_game();
    // Master Theron vs Skeleton Archer
    practice(&mut game, &[8], &[10]);
    let result = game.use_ability(HeroUuid(1), Side::Player2).unwrap();
    assert_eq!(result.damage_dealt, 2);
    assert!(matches!(
        game.use_ability(HeroUuid(1), Side::Player2),
        Err(GameError::AbilityUnavailable(_))
    ));
}

#[test]
fn test_passive_heroes_cannot_use_abilities() {
    let mut game = new_game();
    practice(&mut game, &[9], &[10]);
    assert!(matches!(
        game.use_ability(HeroUuid(1), Side::Player2),
        Err(GameError::AbilityUnavailable(_))
    ));
}

#[test]
fn test_ability_kill_ends_the_game() {
    let mut game = new_game();
    // Master Theron's doubled Fireball (10) kills a Skeleton Warrior outright
    practice(&mut game, &[8], &[9]);
    game.use_ability(HeroUuid(1), Side::Player2).unwrap();
    assert_eq!(game.phase(), &GamePhase::GameOver);
    assert_eq!(game.outcome().unwrap().winner, Some(Side::Player1));
}
