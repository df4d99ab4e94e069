//! Unit tests for battle log query and aggregation methods
//!
//! These tests verify that the BattleLog correctly:
//! - Stamps entries with the current round
//! - Filters by event type
//! - Aggregates damage by source and target
//! - Records deaths in order

use trinity_clash::combat::log::{BattleLog, LogColor, LogEntry, LogEventType};
use trinity_clash::HeroUuid;

fn damage(source: Option<u32>, target: u32, amount: u32) -> LogEntry {
    LogEntry::new(LogEventType::Damage)
        .text(format!("hit for {}", amount))
        .with_amount(source.map(HeroUuid), HeroUuid(target), amount)
}

fn tick(target: u32, amount: u32) -> LogEntry {
    LogEntry::new(LogEventType::StatusTick)
        .text("bleeds")
        .with_amount(None, HeroUuid(target), amount)
}

fn death(target: u32) -> LogEntry {
    let mut entry = LogEntry::new(LogEventType::Death).text("has fallen!");
    entry.target = Some(HeroUuid(target));
    entry
}

// =============================================================================
// Recording
// =============================================================================

#[test]
fn test_entries_are_stamped_with_current_round() {
    let mut log = BattleLog::default();
    log.log(LogEventType::MatchEvent, "Quick Match begins");
    assert_eq!(log.begin_round(), 1);
    log.push(damage(Some(1), 2, 4));
    log.begin_round();
    log.push(damage(Some(2), 1, 3));

    assert_eq!(log.entries[0].round, 0);
    assert_eq!(log.entries[1].round, 1);
    assert_eq!(log.entries[2].round, 2);
    assert_eq!(log.round_entries(1).len(), 1);
}

#[test]
fn test_segments_join_into_message() {
    let entry = LogEntry::new(LogEventType::Clash)
        .colored("Vex", LogColor::Player1)
        .text(" clashes with ")
        .colored("Elara", LogColor::Player2);
    assert_eq!(entry.message(), "Vex clashes with Elara");
    assert_eq!(entry.segments.len(), 3);
    assert_eq!(entry.segments[2].color, LogColor::Player2);
}

#[test]
fn test_clear_resets_round() {
    let mut log = BattleLog::default();
    log.begin_round();
    log.push(damage(Some(1), 2, 4));
    log.clear();
    assert!(log.is_empty());
    assert_eq!(log.round, 0);
}

#[test]
fn test_since_and_recent() {
    let mut log = BattleLog::default();
    for amount in 1..=4 {
        log.push(damage(Some(1), 2, amount));
    }
    assert_eq!(log.since(3).len(), 1);
    assert!(log.since(99).is_empty());
    let recent = log.recent(2);
    assert_eq!(recent[0].amount, Some(3));
    assert_eq!(recent[1].amount, Some(4));
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_filter_by_type_and_hp_changes() {
    let mut log = BattleLog::default();
    log.log(LogEventType::Clash, "clash");
    log.push(damage(Some(1), 2, 4));
    log.push(tick(2, 2));
    log.push(
        LogEntry::new(LogEventType::Healing)
            .text("heals")
            .with_amount(Some(HeroUuid(1)), HeroUuid(1), 2),
    );
    log.push(death(2));

    assert_eq!(log.filter_by_type(LogEventType::Damage).len(), 1);
    assert_eq!(log.filter_by_type(LogEventType::Death).len(), 1);
    assert_eq!(log.hp_changes_only().len(), 3);
}

#[test]
fn test_text_search() {
    let mut log = BattleLog::default();
    log.log(LogEventType::MatchEvent, "VICTORY!");
    log.log(LogEventType::MatchEvent, "Match over");
    assert!(log.contains_text("VICTORY"));
    assert!(!log.contains_text("DEFEAT"));
    assert_eq!(log.count_text("!"), 1);
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn test_damage_dealt_and_taken() {
    let mut log = BattleLog::default();
    log.push(damage(Some(1), 2, 4));
    log.push(damage(Some(1), 3, 5));
    log.push(damage(Some(2), 1, 3));
    log.push(damage(None, 2, 1));
    log.push(tick(2, 2));

    assert_eq!(log.damage_dealt_by(HeroUuid(1)), 9);
    assert_eq!(log.damage_dealt_by(HeroUuid(3)), 0);
    // Sourceless damage and ticks still count against the target
    assert_eq!(log.damage_taken_by(HeroUuid(2)), 7);
    assert_eq!(log.damage_taken_by(HeroUuid(1)), 3);
}

#[test]
fn test_damage_by_source() {
    let mut log = BattleLog::default();
    log.push(damage(Some(1), 2, 4));
    log.push(damage(Some(1), 2, 2));
    log.push(damage(Some(2), 1, 3));
    log.push(damage(None, 1, 5));

    let totals = log.damage_by_source();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[&HeroUuid(1)], 6);
    assert_eq!(totals[&HeroUuid(2)], 3);
}

#[test]
fn test_deaths_in_order() {
    let mut log = BattleLog::default();
    log.push(death(4));
    log.push(damage(Some(1), 2, 4));
    log.push(death(2));
    assert_eq!(log.deaths(), vec![HeroUuid(4), HeroUuid(2)]);
}

// =============================================================================
// Saving
// =============================================================================

#[test]
fn test_save_to_file_writes_metadata_and_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("log.json");
    let mut log = BattleLog::default();
    log.begin_round();
    log.push(damage(Some(1), 2, 4));

    let metadata = serde_json::json!({ "mode": "Practice", "clashes": 1 });
    let written = log
        .save_to_file(&metadata, Some(path.to_str().unwrap()))
        .unwrap();
    assert_eq!(written, path.to_str().unwrap());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["metadata"]["mode"], "Practice");
    assert_eq!(json["entries"][0]["round"], 1);
    assert_eq!(json["entries"][0]["event_type"], "Damage");
    assert_eq!(json["entries"][0]["amount"], 4);
}
