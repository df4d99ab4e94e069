//! Command-line interface for Trinity Clash
//!
//! Lists the roster or runs a headless match.

use clap::Parser;
use std::path::PathBuf;

/// Turn-based hero clash simulator
#[derive(Parser, Debug)]
#[command(name = "trinity-clash")]
#[command(about = "Turn-based hero clash simulator")]
#[command(version)]
pub struct Args {
    /// Run in headless mode with the specified JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for match log (headless mode only)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Clashes to resolve before declaring a draw (headless mode only)
    #[arg(long, value_name = "COUNT")]
    pub max_clashes: Option<u32>,

    /// Print the hero roster (before the match when combined with --headless)
    #[arg(long)]
    pub roster: bool,

    /// Load the hero roster from a RON file instead of the built-in one
    #[arg(long, value_name = "ROSTER_FILE")]
    pub roster_file: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, value_name = "SETTINGS_FILE")]
    pub settings: Option<PathBuf>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
