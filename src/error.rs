//! Error types for the game core.

use thiserror::Error;

use crate::states::play_match::components::HeroUuid;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for the game core.
#[derive(Debug, Error)]
pub enum GameError {
    /// An operation was attempted in the wrong game phase.
    #[error("Action requires the {expected} phase, but the game is in {actual}")]
    InvalidPhase {
        /// Phase the operation needs.
        expected: &'static str,
        /// Phase the game was actually in.
        actual: &'static str,
    },

    /// No roster entry matches the given id or name.
    #[error("Unknown hero: {0}")]
    UnknownHero(String),

    /// The selected hero is dead or not on the given side.
    #[error("Hero {uuid} is not a living member of {side}")]
    InvalidSelection {
        /// Rejected hero instance.
        uuid: HeroUuid,
        /// Side the selection was made for.
        side: &'static str,
    },

    /// The side's selection was forced by an enemy ability this clash.
    #[error("Selection for {0} is locked by an enemy ability until the next clash")]
    SelectionLocked(&'static str),

    /// A side has no hero committed to the clash.
    #[error("No hero selected for {0}")]
    MissingSelection(&'static str),

    /// Tried to draft beyond the configured team size.
    #[error("Team for {side} is already full ({size} heroes)")]
    TeamFull {
        /// Side being drafted.
        side: &'static str,
        /// Configured team size.
        size: usize,
    },

    /// The hero is already on that side's draft.
    #[error("{hero} is already drafted for {side}")]
    DuplicateHero {
        /// Name of the hero.
        hero: String,
        /// Side being drafted.
        side: &'static str,
    },

    /// Tried to start a match before both drafts were complete.
    #[error("Team for {side} needs {required} heroes, has {actual}")]
    TeamIncomplete {
        /// Side being drafted.
        side: &'static str,
        /// Configured team size.
        required: usize,
        /// Heroes drafted so far.
        actual: usize,
    },

    /// The hero has no unspent active ability.
    #[error("{0} has no usable active ability")]
    AbilityUnavailable(String),

    /// A data file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// The hero roster failed validation.
    #[error("Invalid hero roster: {0}")]
    InvalidRoster(String),

    /// A match or headless configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
