//! Play Match - Clash Combat
//!
//! This module holds the rules of an active match: two teams exchange
//! single clashes until one side (or both) is wiped out.
//!
//! ## Combat System
//! - **Types**: Might beats Finesse, Finesse beats Magic, Magic beats Might
//!   (double damage; the reverse matchup deals half)
//! - **Abilities**: every hero carries at most one ability, dispatched
//!   through fixed hook points (see [`abilities`])
//! - **Status Effects**: bleeds tick once at the start of every clash
//! - **Redirection**: a living protector absorbs damage aimed at its allies
//! - **Win Conditions**: the match ends when a team has no living heroes
//!
//! ## Flow
//! 1. `initialize_team`: applies permanent bonuses and fills HP
//! 2. `Battle::calculate_clash_result`: upkeep, engagement, redirection,
//!    strikes and post-clash effects for one pair of heroes
//! 3. `Battle::fireball` / `Battle::overload`: active abilities fired
//!    outside a clash
//! 4. `Game::check_game_over` (in [`crate::states`]) declares the outcome

// Submodules
pub mod abilities;
pub mod combat_ai;
pub mod combat_core;
pub mod components;
pub mod constants;
pub mod effects;
pub mod hero_config;
pub mod match_flow;

// Re-exports
pub use abilities::*;
pub use combat_ai::*;
pub use combat_core::*;
pub use components::*;
pub use hero_config::*;
pub use match_flow::*;

use tracing::debug;

use crate::combat::log::BattleLog;

/// Prepare a drafted team for play.
///
/// Sets the team's side, applies on-team-init bonuses and restores every
/// member to full HP. Bonus application is guarded per hero, so calling
/// this twice never stacks them.
pub fn initialize_team(team: &mut Team, side: Side) {
    team.side = side;
    for hero in &mut team.members {
        if abilities::on_team_init(hero) {
            debug!("{} gains {:?} bonus (max HP {})", hero.name, hero.ability, hero.max_hp);
        }
        hero.hp = hero.max_hp;
    }
}

/// The state of one match in progress.
pub struct Battle {
    pub player1: Team,
    pub player2: Team,
    /// Source of every random roll made by abilities and the AI
    pub rng: GameRng,
    pub log: BattleLog,
    /// Number of clashes resolved so far
    pub clash_count: u32,
}

impl Battle {
    /// Build a battle from two teams. Both teams are initialized.
    pub fn new(mut player1: Team, mut player2: Team, rng: GameRng) -> Self {
        initialize_team(&mut player1, Side::Player1);
        initialize_team(&mut player2, Side::Player2);
        Self {
            player1,
            player2,
            rng,
            log: BattleLog::default(),
            clash_count: 0,
        }
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Player1 => &self.player1,
            Side::Player2 => &self.player2,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Player1 => &mut self.player1,
            Side::Player2 => &mut self.player2,
        }
    }

    /// Which side a hero instance plays for
    pub fn side_of(&self, uuid: HeroUuid) -> Option<Side> {
        if self.player1.contains(uuid) {
            Some(Side::Player1)
        } else if self.player2.contains(uuid) {
            Some(Side::Player2)
        } else {
            None
        }
    }

    pub fn hero(&self, uuid: HeroUuid) -> Option<&Hero> {
        self.player1.get(uuid).or_else(|| self.player2.get(uuid))
    }

    pub fn hero_mut(&mut self, uuid: HeroUuid) -> Option<&mut Hero> {
        if self.player1.contains(uuid) {
            self.player1.get_mut(uuid)
        } else {
            self.player2.get_mut(uuid)
        }
    }

    /// Which sides have no living heroes left
    pub fn wipes(&self) -> (bool, bool) {
        (self.player1.is_wiped(), self.player2.is_wiped())
    }

    /// Color used for a hero's name in the battle log
    pub(crate) fn name_color(&self, uuid: HeroUuid) -> crate::combat::log::LogColor {
        use crate::combat::log::LogColor;
        match self.side_of(uuid) {
            Some(Side::Player1) => LogColor::Player1,
            Some(Side::Player2) => LogColor::Player2,
            None => LogColor::Neutral,
        }
    }

    /// Display name of a hero, or its uuid if it is unknown
    pub(crate) fn name_of(&self, uuid: HeroUuid) -> String {
        self.hero(uuid)
            .map(|h| h.name.clone())
            .unwrap_or_else(|| uuid.to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::battle_from_ids;
    use super::*;

    #[test]
    fn test_initialize_team_is_idempotent() {
        let mut battle = battle_from_ids(&[23], &[9], GameRng::fixed(0.5));
        assert_eq!(battle.player1.members[0].max_hp, 9);
        initialize_team(&mut battle.player1, Side::Player1);
        assert_eq!(battle.player1.members[0].max_hp, 9);
        assert_eq!(battle.player1.members[0].hp, 9);
    }

    #[test]
    fn test_side_lookup() {
        let battle = battle_from_ids(&[0, 1], &[9], GameRng::fixed(0.5));
        assert_eq!(battle.side_of(HeroUuid(2)), Some(Side::Player1));
        assert_eq!(battle.side_of(HeroUuid(3)), Some(Side::Player2));
        assert_eq!(battle.side_of(HeroUuid(99)), None);
        assert_eq!(battle.hero(HeroUuid(3)).map(|h| h.id), Some(HeroId(9)));
    }
}
