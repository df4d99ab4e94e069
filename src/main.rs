//! Trinity Clash - Turn-Based Hero Clash
//!
//! Command-line front end: lists the hero roster or runs headless matches
//! between AI-driven teams.

use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use trinity_clash::cli::{parse_args, Args};
use trinity_clash::headless::{run_headless_match_with, HeadlessMatchConfig};
use trinity_clash::{GameError, GameSettings, HeroRoster, Side};

fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_roster(args: &Args) -> Result<HeroRoster, GameError> {
    match &args.roster_file {
        Some(path) => HeroRoster::load_from_file(path),
        None => Ok(HeroRoster::default()),
    }
}

fn print_roster(roster: &HeroRoster) {
    println!("{:>3}  {:<18} {:<8} {:>3} {:>3}  Ability", "ID", "Name", "Type", "ATK", "HP");
    for hero in roster.heroes() {
        let ability = hero.ability.map(|a| a.name()).unwrap_or("-");
        println!(
            "{:>3}  {:<18} {:<8} {:>3} {:>3}  {}",
            hero.id.0,
            hero.name,
            hero.hero_type.name(),
            hero.attack,
            hero.max_hp,
            ability
        );
    }
}

fn run_headless(args: &Args, settings: &GameSettings, roster: HeroRoster) -> Result<(), GameError> {
    let Some(path) = &args.headless else {
        return Ok(());
    };
    let mut config = HeadlessMatchConfig::load_from_file(path).map_err(GameError::InvalidConfig)?;
    if let Some(output) = &args.output {
        config.output_path = Some(output.display().to_string());
    }
    if let Some(max) = args.max_clashes {
        config.max_clashes = max;
    }
    if config.random_seed.is_none() {
        config.random_seed = settings.seed;
    }

    println!("Starting headless match simulation...");
    println!("  Team 1: {:?}", config.team1);
    if config.team2.is_empty() {
        println!("  Team 2: drafted by the AI ({})", config.team2_difficulty);
    } else {
        println!("  Team 2: {:?}", config.team2);
    }
    println!("  Max clashes: {}", config.max_clashes);

    let memory = config
        .vengeance_memory()
        .unwrap_or_else(|| settings.vengeance_memory());
    let result = run_headless_match_with(&config, roster, memory)?;

    let winner = match result.winner {
        Some(Side::Player1) => "Team 1",
        Some(Side::Player2) => "Team 2",
        None => "Nobody (draw)",
    };
    println!("Winner: {} after {} clashes", winner, result.clashes);
    if result.vengeance {
        println!("The AI played in vengeance mode.");
    }
    for hero in result.team1.iter().chain(result.team2.iter()) {
        println!(
            "  {:<18} {:>2}/{:<2} HP  dealt {:>3}  taken {:>3}",
            hero.name, hero.final_hp, hero.max_hp, hero.damage_dealt, hero.damage_taken
        );
    }
    if let Some(path) = &result.log_path {
        println!("Match log saved to: {}", path);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = parse_args();
    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(GameSettings::settings_path);
    let (settings, source) = GameSettings::load_from(&settings_path);
    init_tracing(&settings.log_filter);
    source.report();

    let roster = match load_roster(&args) {
        Ok(roster) => roster,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.roster || args.headless.is_none() {
        print_roster(&roster);
        if args.headless.is_none() {
            return ExitCode::SUCCESS;
        }
    }

    match run_headless(&args, &settings, roster) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
