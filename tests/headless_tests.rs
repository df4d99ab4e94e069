//! Integration tests for headless match execution
//!
//! These tests verify that:
//! - Headless matches run to completion
//! - Match results are accessible programmatically
//! - Seeded RNG produces deterministic results
//! - Loss history carries over between runs

use trinity_clash::headless::{run_headless_match, HeadlessMatchConfig};
use trinity_clash::{GameError, Side};

/// Helper to create a basic match config
fn create_config(team1: Vec<&str>, team2: Vec<&str>, seed: Option<u64>) -> HeadlessMatchConfig {
    HeadlessMatchConfig {
        team1: team1.into_iter().map(String::from).collect(),
        team2: team2.into_iter().map(String::from).collect(),
        mode: "QuickMatch".to_string(),
        rival_pool: vec![],
        team1_difficulty: "Hard".to_string(),
        team2_difficulty: "Normal".to_string(),
        random_seed: seed,
        max_clashes: 50,
        history_path: None,
        output_path: None,
    }
}

fn practice_config(team1: Vec<&str>, team2: Vec<&str>) -> HeadlessMatchConfig {
    HeadlessMatchConfig {
        mode: "Practice".to_string(),
        ..create_config(team1, team2, Some(1))
    }
}

// =============================================================================
// Completion
// =============================================================================

#[test]
fn test_match_runs_to_completion() {
    let config = create_config(vec!["Sir Reginald", "Vex", "Elara"], vec![], Some(42));
    let result = run_headless_match(&config).unwrap();

    let team1_alive = result.team1.iter().any(|h| h.survived);
    let team2_alive = result.team2.iter().any(|h| h.survived);
    match result.winner {
        Some(Side::Player1) => assert!(team1_alive && !team2_alive),
        Some(Side::Player2) => assert!(team2_alive && !team1_alive),
        None => assert!(!(team1_alive ^ team2_alive) || result.clashes == config.max_clashes),
    }
    assert_eq!(result.team1.len(), 3);
    assert_eq!(result.team2.len(), 3);
    assert_eq!(result.random_seed, Some(42));
}

#[test]
fn test_mirror_match_ends_in_draw() {
    let config = practice_config(vec!["Skeleton Warrior"], vec!["Skeleton Warrior"]);
    let result = run_headless_match(&config).unwrap();
    assert_eq!(result.winner, None);
    assert_eq!(result.clashes, 3);
    assert!(!result.team1[0].survived);
    assert!(!result.team2[0].survived);
}

#[test]
fn test_clash_limit_declares_draw() {
    let mut config = practice_config(vec!["Skeleton Warrior"], vec!["Skeleton Warrior"]);
    config.max_clashes = 1;
    let result = run_headless_match(&config).unwrap();
    assert_eq!(result.winner, None);
    assert_eq!(result.clashes, 1);
    assert_eq!(result.team1[0].final_hp, 6);
    assert_eq!(result.team2[0].final_hp, 6);
}

#[test]
fn test_results_track_damage() {
    let config = practice_config(vec!["Skeleton Warrior"], vec!["Skeleton Archer"]);
    let result = run_headless_match(&config).unwrap();
    assert_eq!(result.winner, Some(Side::Player1));
    assert_eq!(result.team1[0].damage_dealt, 4);
    assert_eq!(result.team1[0].damage_taken, 1);
    assert_eq!(result.team2[0].final_hp, 0);
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_seeded_matches_are_reproducible() {
    let config = create_config(vec!["Grak the Crusher", "Lyra Nightwind", "Zoltan"], vec![], Some(777));
    let first = run_headless_match(&config).unwrap();
    let second = run_headless_match(&config).unwrap();

    assert_eq!(first.winner, second.winner);
    assert_eq!(first.clashes, second.clashes);
    assert_eq!(first.team1, second.team1);
    assert_eq!(first.team2, second.team2);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_output_path_writes_match_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("match.json");
    let mut config = practice_config(vec!["Skeleton Warrior"], vec!["Skeleton Archer"]);
    config.output_path = Some(path.display().to_string());

    let result = run_headless_match(&config).unwrap();
    assert_eq!(result.log_path.as_deref(), Some(path.display().to_string().as_str()));

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["metadata"]["mode"], "Practice");
    assert_eq!(json["metadata"]["winner"], "player1");
    assert_eq!(json["metadata"]["clashes"], 1);
    assert!(json["entries"].as_array().map(|e| !e.is_empty()).unwrap_or(false));
}

#[test]
fn test_history_path_arms_vengeance_on_rematch() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = create_config(vec!["Skeleton Warrior"], vec!["Skeleton Archer"], Some(3));
    config.history_path = Some(dir.path().display().to_string());

    let first = run_headless_match(&config).unwrap();
    assert_eq!(first.winner, Some(Side::Player1));
    assert!(!first.vengeance);

    config.team2 = vec![];
    let rematch = run_headless_match(&config).unwrap();
    assert!(rematch.vengeance);
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_unknown_hero_is_rejected() {
    let config = create_config(vec!["Nobody"], vec![], None);
    assert!(matches!(run_headless_match(&config), Err(GameError::InvalidConfig(_))));
}

#[test]
fn test_config_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("match.json");
    std::fs::write(
        &path,
        r#"{"team1": ["Vex"], "team2": ["Skeleton Mage"], "mode": "Practice", "random_seed": 8}"#,
    )
    .unwrap();
    let config = HeadlessMatchConfig::load_from_file(&path).unwrap();
    assert_eq!(config.random_seed, Some(8));

    let result = run_headless_match(&config).unwrap();
    // Vex strikes first and doubles into the mage
    assert_eq!(result.winner, Some(Side::Player1));
    assert_eq!(result.clashes, 1);
}
