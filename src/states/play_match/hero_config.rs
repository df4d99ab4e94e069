//! Data-Driven Hero Roster
//!
//! Hero definitions live in `assets/config/heroes.ron` instead of being
//! hardcoded. The default roster is embedded at compile time so the core
//! never depends on the working directory; a different file can be loaded
//! with [`HeroRoster::load_from_file`].
//!
//! ## Usage
//! ```ignore
//! let roster = HeroRoster::default();
//! let vex = roster.get(HeroId(2)).unwrap();
//! println!("{} hits for {}", vex.name, vex.attack);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use super::abilities::AbilityType;
use super::components::HeroId;
use crate::error::{GameError, Result};
use crate::states::match_config::HeroType;

const EMBEDDED_ROSTER: &str = include_str!("../../../assets/config/heroes.ron");
const EMBEDDED_ROSTER_NAME: &str = "assets/config/heroes.ron";

/// A single roster entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroDefinition {
    pub id: HeroId,
    /// Display name
    pub name: String,
    pub hero_type: HeroType,
    /// Base attack power
    pub attack: u32,
    /// Declared maximum HP (before Toughness)
    pub max_hp: u32,
    #[serde(default)]
    pub ability: Option<AbilityType>,
}

/// Root structure for the heroes.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct RosterConfig {
    pub heroes: Vec<HeroDefinition>,
}

/// All heroes that can be drafted, in roster order.
#[derive(Clone, Debug)]
pub struct HeroRoster {
    heroes: Vec<HeroDefinition>,
}

impl Default for HeroRoster {
    /// The embedded roster. Panics only if the bundled data file is broken,
    /// which the test suite guards against.
    fn default() -> Self {
        Self::from_ron(EMBEDDED_ROSTER, EMBEDDED_ROSTER_NAME)
            .unwrap_or_else(|e| panic!("Embedded hero roster is invalid: {}", e))
    }
}

impl HeroRoster {
    /// Build and validate a roster from already parsed definitions.
    pub fn new(config: RosterConfig) -> Result<Self> {
        let roster = Self {
            heroes: config.heroes,
        };
        roster.validate()?;
        Ok(roster)
    }

    /// Parse RON text. `origin` names the source in error messages.
    pub fn from_ron(contents: &str, origin: &str) -> Result<Self> {
        let config: RosterConfig = ron::from_str(contents).map_err(|e| GameError::DataParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        Self::new(config)
    }

    /// Load a roster from a RON file on disk
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let roster = Self::from_ron(&contents, &path.display().to_string())?;
        info!("Loaded {} hero definitions from {:?}", roster.len(), path);
        Ok(roster)
    }

    /// Check ids are unique and stats are usable
    pub fn validate(&self) -> Result<()> {
        if self.heroes.is_empty() {
            return Err(GameError::InvalidRoster("roster has no heroes".to_string()));
        }
        let mut seen = HashSet::new();
        for hero in &self.heroes {
            if !seen.insert(hero.id) {
                return Err(GameError::InvalidRoster(format!("duplicate hero id {}", hero.id)));
            }
            if hero.name.trim().is_empty() {
                return Err(GameError::InvalidRoster(format!("hero {} has no name", hero.id)));
            }
            if hero.attack == 0 || hero.max_hp == 0 {
                return Err(GameError::InvalidRoster(format!(
                    "{} needs positive attack and max HP (got {} / {})",
                    hero.name, hero.attack, hero.max_hp
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: HeroId) -> Option<&HeroDefinition> {
        self.heroes.iter().find(|h| h.id == id)
    }

    /// Case-insensitive lookup by display name
    pub fn find_by_name(&self, name: &str) -> Option<&HeroDefinition> {
        self.heroes
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Resolve either a numeric id or a display name.
    pub fn resolve(&self, key: &str) -> Result<&HeroDefinition> {
        let by_id = key
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(|id| self.get(HeroId(id)));
        by_id
            .or_else(|| self.find_by_name(key))
            .ok_or_else(|| GameError::UnknownHero(key.to_string()))
    }

    pub fn heroes(&self) -> &[HeroDefinition] {
        &self.heroes
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    /// Definitions restricted to `ids`, in roster order. Unknown ids are
    /// skipped.
    pub fn subset(&self, ids: &[HeroId]) -> Vec<&HeroDefinition> {
        self.heroes.iter().filter(|h| ids.contains(&h.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_roster_is_valid() {
        let roster = HeroRoster::default();
        assert_eq!(roster.len(), 24);
        assert!(roster.validate().is_ok());
    }

    #[test]
    fn test_every_type_is_represented() {
        let roster = HeroRoster::default();
        for t in HeroType::all() {
            let count = roster.heroes().iter().filter(|h| h.hero_type == *t).count();
            assert!(count >= 3, "{:?} should have at least 3 heroes, got {}", t, count);
        }
    }

    #[test]
    fn test_resolve_by_id_or_name() {
        let roster = HeroRoster::default();
        assert_eq!(roster.resolve("2").map(|h| h.name.as_str()).ok(), Some("Vex"));
        assert_eq!(roster.resolve("grak the crusher").map(|h| h.id).ok(), Some(HeroId(1)));
        assert!(matches!(roster.resolve("Nobody"), Err(GameError::UnknownHero(_))));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let ron = r#"(heroes: [
            (id: 1, name: "A", hero_type: Might, attack: 1, max_hp: 1),
            (id: 1, name: "B", hero_type: Magic, attack: 1, max_hp: 1),
        ])"#;
        assert!(matches!(
            HeroRoster::from_ron(ron, "inline"),
            Err(GameError::InvalidRoster(_))
        ));
    }

    #[test]
    fn test_unknown_ability_fails_to_parse() {
        let ron = r#"(heroes: [
            (id: 1, name: "A", hero_type: Might, attack: 1, max_hp: 1, ability: Some(Teleport)),
        ])"#;
        assert!(matches!(
            HeroRoster::from_ron(ron, "inline"),
            Err(GameError::DataParseError { .. })
        ));
    }
}
