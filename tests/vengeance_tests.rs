//! Integration tests for the loss history and vengeance mode
//!
//! These tests verify that:
//! - Loss records persist through the JSON file store
//! - Corrupt or missing history is treated as empty
//! - Vengeance arms only on an exact (order-insensitive) team match
//! - A vengeful AI drafts the counter type

use regex::Regex;
use trinity_clash::states::play_match::{GameRng, HeroId, HeroRoster, HeroUuid, Side};
use trinity_clash::vengeance::{InMemoryStore, JsonFileStore, LossHistoryStore, HISTORY_KEY};
use trinity_clash::{Difficulty, Game, HeroType, MatchMode, VengeanceMemory};

fn ids(values: &[u32]) -> Vec<HeroId> {
    values.iter().map(|v| HeroId(*v)).collect()
}

// =============================================================================
// Storage
// =============================================================================

#[test]
fn test_file_store_round_trip_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let mut memory = VengeanceMemory::new(Box::new(JsonFileStore::new(dir.path())));
    memory.record_loss(&ids(&[2, 0, 1]), &ids(&[1, 0]));

    let reopened = VengeanceMemory::new(Box::new(JsonFileStore::new(dir.path())));
    let history = reopened.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].defeated_by, ids(&[0, 1, 2]));
    assert_eq!(history[0].survivors, ids(&[0, 1]));
}

#[test]
fn test_file_format_uses_fixed_key_and_camel_case() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    assert!(store.path().ends_with(format!("{}.json", HISTORY_KEY)));

    let mut memory = VengeanceMemory::new(Box::new(store.clone()));
    memory.record_loss(&ids(&[3]), &[]);

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &json[0];
    assert_eq!(record["defeatedBy"], serde_json::json!([3]));
    assert_eq!(record["survivors"], serde_json::json!([]));

    let timestamp = record["timestamp"].as_str().unwrap();
    let rfc3339 = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?Z$").unwrap();
    assert!(rfc3339.is_match(timestamp), "unexpected timestamp {}", timestamp);
}

#[test]
fn test_corrupt_history_is_empty_and_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    std::fs::write(store.path(), "{ not json").unwrap();
    assert!(store.load_all().is_err());

    let mut memory = VengeanceMemory::new(Box::new(store.clone()));
    assert!(memory.history().is_empty());
    assert!(memory.find_matching_defeat(&ids(&[0])).is_none());

    memory.record_loss(&ids(&[0]), &ids(&[0]));
    assert_eq!(store.load_all().unwrap().len(), 1);
}

#[test]
fn test_append_goes_through_the_port() {
    let mut store = InMemoryStore::new();
    let mut memory = VengeanceMemory::in_memory();
    let record = memory.record_loss(&ids(&[5]), &[]);
    store.append(record.clone()).unwrap();
    assert_eq!(store.load_all().unwrap(), vec![record]);
}

// =============================================================================
// Matching
// =============================================================================

#[test]
fn test_vengeance_requires_exact_match() {
    let mut memory = VengeanceMemory::in_memory();
    memory.record_loss(&ids(&[0, 1, 2]), &ids(&[2]));

    assert!(memory.arm(&ids(&[2, 1, 0])).active, "order does not matter");
    assert!(!memory.arm(&ids(&[0, 1])).active, "subset does not match");
    assert!(!memory.arm(&ids(&[0, 1, 2, 3])).active, "superset does not match");
}

#[test]
fn test_most_recent_record_wins() {
    let mut memory = VengeanceMemory::in_memory();
    memory.record_loss(&ids(&[0, 1]), &ids(&[0]));
    memory.record_loss(&ids(&[0, 1]), &ids(&[1]));
    let mode = memory.arm(&ids(&[0, 1]));
    assert_eq!(mode.survivors, ids(&[1]));
    assert!(mode.is_priority(HeroId(1)));
    assert!(!mode.is_priority(HeroId(0)));
}

// =============================================================================
// End to End
// =============================================================================

#[test]
fn test_recorded_defeat_arms_vengeance_and_counter_draft() {
    let mut memory = VengeanceMemory::in_memory();
    memory.record_loss(&ids(&[0, 1, 2]), &ids(&[0, 1, 2]));

    let mut game = Game::new(HeroRoster::default(), memory, GameRng::from_seed(99));
    game.open_team_assembly(MatchMode::QuickMatch).unwrap();
    game.configure(Difficulty::Easy, 3).unwrap();
    for id in [0, 1, 2] {
        game.pick_hero(HeroId(id)).unwrap();
    }
    game.start_game().unwrap();

    assert!(game.vengeance().active);
    let battle = game.battle().unwrap();
    let ai_types: Vec<HeroType> = battle.player2.members.iter().map(|h| h.hero_type).collect();
    // Player majority is Might; Magic beats Might
    assert_eq!(ai_types, vec![HeroType::Magic; 3]);
    assert!(battle.log.contains_text("Vengeance"));
}

#[test]
fn test_player_victory_feeds_the_next_match() {
    let mut game = Game::new(
        HeroRoster::default(),
        VengeanceMemory::in_memory(),
        GameRng::from_seed(5),
    );
    game.open_team_assembly(MatchMode::QuickMatch).unwrap();
    game.configure(Difficulty::Normal, 1).unwrap();
    game.pick_hero(HeroId(9)).unwrap();
    game.draft_opponent(&[HeroId(10)]).unwrap();
    game.start_game().unwrap();
    assert!(!game.vengeance().active);

    game.select_hero(Side::Player1, HeroUuid(1)).unwrap();
    game.resolve_clash().unwrap();
    assert_eq!(game.outcome().unwrap().winner, Some(Side::Player1));

    let history = game.memory().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].defeated_by, ids(&[9]));
    assert_eq!(history[0].survivors, ids(&[9]));

    game.return_to_main_menu();
    game.open_team_assembly(MatchMode::QuickMatch).unwrap();
    game.configure(Difficulty::Normal, 1).unwrap();
    game.pick_hero(HeroId(9)).unwrap();
    game.start_game().unwrap();
    assert!(game.vengeance().active);
    assert_eq!(game.vengeance().priority_targets(), ids(&[9]).as_slice());
}
