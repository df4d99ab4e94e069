//! Combat narration
//!
//! The rules themselves live in `states::play_match`; this module holds the
//! player-facing battle log they write to.

pub mod log;
