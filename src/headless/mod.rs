//! Headless mode for agentic testing
//!
//! This module runs complete matches with both sides played by the AI,
//! suitable for automated testing, balance checks and agent integration.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless match
//! cargo run --release -- --headless match_config.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "team1": ["Sir Reginald", "Vex", "Elara"],
//!   "mode": "QuickMatch",
//!   "team2_difficulty": "Hard",
//!   "random_seed": 42,
//!   "max_clashes": 50
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::HeadlessMatchConfig;
pub use runner::{run_headless_match, run_headless_match_with, MatchResult};
