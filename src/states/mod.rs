//! Game state management
//!
//! Defines the game phases and the [`Game`] context that moves between
//! them. Every operation checks the current phase and returns
//! [`GameError::InvalidPhase`] when it is called out of order.

use tracing::{debug, info};

pub mod match_config;
pub mod play_match;

pub use match_config::{Difficulty, HeroType, MatchConfig, MatchMode};

use crate::combat::log::{LogColor, LogEntry, LogEventType};
use crate::error::{GameError, Result};
use crate::vengeance::{VengeanceMemory, VengeanceMode};
use play_match::effects::AbilityResult;
use play_match::{
    assemble_team, choose_responder, detect_outcome, log_outcome, AbilityType, Battle, ClashResult,
    GameRng, Hero, HeroId, HeroRoster, HeroUuid, MatchOutcome, Side, Team,
};

/// The phases of a game, from the main menu to the end of a match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Entry point
    #[default]
    MainMenu,
    /// Mode chosen; difficulty and team size are being set
    TeamAssembly(MatchMode),
    /// Drafting heroes
    HeroSelection,
    /// Clashes are being resolved
    Playing,
    /// A side has been wiped; the outcome is final
    GameOver,
}

impl GamePhase {
    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::MainMenu => "MainMenu",
            GamePhase::TeamAssembly(_) => "TeamAssembly",
            GamePhase::HeroSelection => "HeroSelection",
            GamePhase::Playing => "Playing",
            GamePhase::GameOver => "GameOver",
        }
    }
}

/// A game session: configuration, drafts, the active battle and the loss
/// history the AI learns from.
pub struct Game {
    phase: GamePhase,
    config: MatchConfig,
    roster: HeroRoster,
    player1_draft: Vec<HeroId>,
    player2_draft: Vec<HeroId>,
    battle: Option<Battle>,
    /// Next hero instance id; never reset, so uuids are never reused
    next_uuid: u32,
    vengeance: VengeanceMode,
    memory: VengeanceMemory,
    /// Owned here between matches and lent to the battle while playing
    rng: GameRng,
    outcome: Option<MatchOutcome>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(HeroRoster::default(), VengeanceMemory::default(), GameRng::default())
    }
}

impl Game {
    pub fn new(roster: HeroRoster, memory: VengeanceMemory, rng: GameRng) -> Self {
        Self {
            phase: GamePhase::MainMenu,
            config: MatchConfig::default(),
            roster,
            player1_draft: Vec::new(),
            player2_draft: Vec::new(),
            battle: None,
            next_uuid: 1,
            vengeance: VengeanceMode::default(),
            memory,
            rng,
            outcome: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn roster(&self) -> &HeroRoster {
        &self.roster
    }

    pub fn draft(&self, side: Side) -> &[HeroId] {
        match side {
            Side::Player1 => &self.player1_draft,
            Side::Player2 => &self.player2_draft,
        }
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn battle_mut(&mut self) -> Option<&mut Battle> {
        self.battle.as_mut()
    }

    pub fn vengeance(&self) -> &VengeanceMode {
        &self.vengeance
    }

    pub fn memory(&self) -> &VengeanceMemory {
        &self.memory
    }

    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    fn require(&self, expected: &'static str) -> Result<()> {
        if self.phase.name() == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase {
                expected,
                actual: self.phase.name(),
            })
        }
    }

    fn active_battle(&mut self) -> Result<&mut Battle> {
        let actual = self.phase.name();
        self.battle.as_mut().ok_or(GameError::InvalidPhase {
            expected: "Playing",
            actual,
        })
    }

    // ------------------------------------------------------------------
    // Menus and drafting
    // ------------------------------------------------------------------

    /// Leave the main menu for team assembly in `mode`.
    pub fn open_team_assembly(&mut self, mode: MatchMode) -> Result<()> {
        self.require("MainMenu")?;
        info!("Opening team assembly: {}", mode.name());
        self.config.mode = mode.clone();
        self.player1_draft.clear();
        self.player2_draft.clear();
        self.phase = GamePhase::TeamAssembly(mode);
        Ok(())
    }

    /// Set difficulty and team size (clamped to 1-3), then move on to hero
    /// selection.
    pub fn configure(&mut self, difficulty: Difficulty, team_size: usize) -> Result<()> {
        self.require("TeamAssembly")?;
        self.config.difficulty = difficulty;
        self.config.set_team_size(team_size);
        debug!(
            "Configured {} match: {} heroes per side on {}",
            self.config.mode.name(),
            self.config.team_size,
            difficulty.name()
        );
        self.phase = GamePhase::HeroSelection;
        Ok(())
    }

    /// Draft a hero. Fills player1 first; in practice mode player2 is
    /// drafted once player1 is full. Returns the side the hero joined.
    pub fn pick_hero(&mut self, id: HeroId) -> Result<Side> {
        self.require("HeroSelection")?;
        let name = self
            .roster
            .get(id)
            .map(|def| def.name.clone())
            .ok_or_else(|| GameError::UnknownHero(id.to_string()))?;
        let size = self.config.team_size;

        let side = if self.player1_draft.len() < size {
            Side::Player1
        } else if !self.config.mode.has_ai_opponent() && self.player2_draft.len() < size {
            Side::Player2
        } else {
            let side = if self.config.mode.has_ai_opponent() {
                Side::Player1
            } else {
                Side::Player2
            };
            return Err(GameError::TeamFull {
                side: side.name(),
                size,
            });
        };

        let draft = match side {
            Side::Player1 => &mut self.player1_draft,
            Side::Player2 => &mut self.player2_draft,
        };
        if draft.contains(&id) {
            return Err(GameError::DuplicateHero {
                hero: name,
                side: side.name(),
            });
        }
        draft.push(id);
        debug!("{} drafted {}", side.name(), name);
        Ok(side)
    }

    /// Fix the AI side's lineup instead of letting the AI draft it.
    pub fn draft_opponent(&mut self, ids: &[HeroId]) -> Result<()> {
        self.require("HeroSelection")?;
        if ids.len() > self.config.team_size {
            return Err(GameError::TeamFull {
                side: Side::Player2.name(),
                size: self.config.team_size,
            });
        }
        let mut draft = Vec::with_capacity(ids.len());
        for id in ids {
            let def = self
                .roster
                .get(*id)
                .ok_or_else(|| GameError::UnknownHero(id.to_string()))?;
            if draft.contains(id) {
                return Err(GameError::DuplicateHero {
                    hero: def.name.clone(),
                    side: Side::Player2.name(),
                });
            }
            draft.push(*id);
        }
        self.player2_draft = draft;
        Ok(())
    }

    fn instantiate(&mut self, side: Side, ids: &[HeroId]) -> Result<Team> {
        let mut members = Vec::with_capacity(ids.len());
        for id in ids {
            let def = self
                .roster
                .get(*id)
                .ok_or_else(|| GameError::UnknownHero(id.to_string()))?;
            let uuid = HeroUuid(self.next_uuid);
            self.next_uuid += 1;
            members.push(Hero::from_definition(def, uuid));
        }
        Ok(Team::new(side, members))
    }

    // ------------------------------------------------------------------
    // Playing
    // ------------------------------------------------------------------

    /// Start the match.
    ///
    /// Arms vengeance from the loss history, lets the AI draft player2
    /// unless a lineup was fixed, and instantiates both teams with fresh
    /// uuids.
    pub fn start_game(&mut self) -> Result<()> {
        self.require("HeroSelection")?;
        let size = self.config.team_size;
        if self.player1_draft.len() < size {
            return Err(GameError::TeamIncomplete {
                side: Side::Player1.name(),
                required: size,
                actual: self.player1_draft.len(),
            });
        }

        let ai_opponent = self.config.mode.has_ai_opponent();
        self.vengeance = if ai_opponent {
            self.memory.arm(&self.player1_draft)
        } else {
            VengeanceMode::default()
        };

        if ai_opponent && self.player2_draft.is_empty() {
            let pool = match &self.config.mode {
                MatchMode::Campaign { rival_pool } => Some(rival_pool.as_slice()),
                _ => None,
            };
            self.player2_draft = assemble_team(
                &self.roster,
                pool,
                &self.player1_draft,
                size,
                self.config.difficulty,
                &self.vengeance,
                &mut self.rng,
            );
        }
        if self.player2_draft.len() < size {
            return Err(GameError::TeamIncomplete {
                side: Side::Player2.name(),
                required: size,
                actual: self.player2_draft.len(),
            });
        }

        let p1_ids = self.player1_draft.clone();
        let p2_ids = self.player2_draft.clone();
        let player1 = self.instantiate(Side::Player1, &p1_ids)?;
        let player2 = self.instantiate(Side::Player2, &p2_ids)?;

        let rng = std::mem::take(&mut self.rng);
        let mut battle = Battle::new(player1, player2, rng);
        battle.log.log(
            LogEventType::MatchEvent,
            format!(
                "{} begins: {} vs {}",
                self.config.mode.name(),
                team_names(&battle.player1),
                team_names(&battle.player2)
            ),
        );
        if self.vengeance.active {
            battle.log.push(
                LogEntry::new(LogEventType::MatchEvent)
                    .colored("The enemy remembers this team. Vengeance!", LogColor::Player2),
            );
        }
        info!(
            "Match started ({} on {}, vengeance {})",
            self.config.mode.name(),
            self.config.difficulty.name(),
            self.vengeance.active
        );

        self.battle = Some(battle);
        self.outcome = None;
        self.phase = GamePhase::Playing;
        Ok(())
    }

    /// Commit a living hero of `side` to the next clash.
    pub fn select_hero(&mut self, side: Side, uuid: HeroUuid) -> Result<()> {
        self.require("Playing")?;
        let battle = self.active_battle()?;
        let team = battle.team_mut(side);
        let valid = team.get(uuid).map(Hero::is_alive).unwrap_or(false);
        if !valid {
            return Err(GameError::InvalidSelection {
                uuid,
                side: side.name(),
            });
        }
        if team.selection_forced && team.selection != Some(uuid) {
            return Err(GameError::SelectionLocked(side.name()));
        }
        team.selection = Some(uuid);
        Ok(())
    }

    /// Resolve one clash between the committed heroes.
    ///
    /// Against an AI opponent, player2's hero is chosen in responder mode
    /// unless an enemy ability forced it. Checks for game over afterwards.
    pub fn resolve_clash(&mut self) -> Result<ClashResult> {
        self.require("Playing")?;
        let difficulty = self.config.difficulty;
        let ai_opponent = self.config.mode.has_ai_opponent();
        let priority = self.vengeance.priority_targets().to_vec();
        let battle = self.active_battle()?;

        let p1 = battle
            .player1
            .selection
            .filter(|uuid| battle.is_standing(*uuid))
            .ok_or(GameError::MissingSelection(Side::Player1.name()))?;
        let forced = battle
            .player2
            .selection
            .filter(|uuid| battle.player2.selection_forced && battle.is_standing(*uuid));
        let p2 = match forced {
            Some(uuid) => uuid,
            None if ai_opponent => choose_responder(battle, Side::Player2, p1, difficulty, &priority)
                .ok_or(GameError::MissingSelection(Side::Player2.name()))?,
            None => battle
                .player2
                .selection
                .filter(|uuid| battle.is_standing(*uuid))
                .ok_or(GameError::MissingSelection(Side::Player2.name()))?,
        };

        let result = battle.calculate_clash_result(p1, p2);
        self.check_game_over();
        Ok(result)
    }

    /// Fire `caster`'s active ability at `target_side`.
    pub fn use_ability(&mut self, caster: HeroUuid, target_side: Side) -> Result<AbilityResult> {
        self.require("Playing")?;
        let battle = self.active_battle()?;
        let (name, ability) = battle
            .hero(caster)
            .map(|h| (h.name.clone(), h.ability))
            .ok_or_else(|| GameError::AbilityUnavailable(caster.to_string()))?;
        let result = match ability {
            Some(AbilityType::Fireball) if battle.can_trigger(caster, AbilityType::Fireball) => {
                battle.fireball(caster, target_side)
            }
            Some(AbilityType::Overload) if battle.can_trigger(caster, AbilityType::Overload) => {
                battle.overload(caster, target_side)
            }
            _ => return Err(GameError::AbilityUnavailable(name)),
        };
        self.check_game_over();
        Ok(result)
    }

    /// Decide whether the match is over. Safe to call repeatedly: the
    /// outcome, its log entry and the loss record are produced once.
    pub fn check_game_over(&mut self) -> bool {
        if self.outcome.is_some() {
            return true;
        }
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(battle) = self.battle.as_mut() else {
            return false;
        };
        let Some(outcome) = detect_outcome(battle) else {
            return false;
        };

        log_outcome(battle, &outcome);
        if outcome.winner == Some(Side::Player1) && self.config.mode.has_ai_opponent() {
            let defeated_by = battle.player1.sorted_ids();
            let survivors = battle.player1.sorted_survivor_ids();
            self.memory.record_loss(&defeated_by, &survivors);
        }
        self.outcome = Some(outcome);
        self.phase = GamePhase::GameOver;
        true
    }

    /// Abandon or close the current match and return to the main menu.
    pub fn return_to_main_menu(&mut self) {
        if let Some(battle) = self.battle.take() {
            self.rng = battle.rng;
        }
        self.player1_draft.clear();
        self.player2_draft.clear();
        self.vengeance = VengeanceMode::default();
        self.outcome = None;
        self.phase = GamePhase::MainMenu;
    }
}

fn team_names(team: &Team) -> String {
    team.members
        .iter()
        .map(|h| h.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
