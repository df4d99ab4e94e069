//! Trinity Clash - Turn-Based Hero Clash Core
//!
//! Two teams of one to three heroes clash one pair at a time. Each hero has
//! a type in the Might > Finesse > Magic > Might cycle and at most one
//! ability. An adaptive AI drafts and plays the opposing team and
//! remembers the teams that beat it.
//!
//! This library exposes the core game modules for testing and reuse.

pub mod cli;
pub mod combat;
pub mod error;
pub mod headless;
pub mod settings;
pub mod states;
pub mod vengeance;

// Re-export commonly used types
pub use combat::log::{BattleLog, LogEventType};
pub use error::{GameError, Result};
pub use headless::{HeadlessMatchConfig, MatchResult};
pub use settings::{GameSettings, SettingsSource};
pub use states::match_config::{Difficulty, HeroType, MatchConfig, MatchMode};
pub use states::play_match::{Battle, GameRng, HeroId, HeroRoster, HeroUuid, Side};
pub use states::{Game, GamePhase};
pub use vengeance::{LossRecord, VengeanceMemory, VengeanceMode};
