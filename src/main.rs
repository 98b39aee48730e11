//! Marble Race entry point
//!
//! Headless driver: builds a race, ticks it at a fixed rate until everyone is
//! in (or the tick budget runs out) and reports the standings.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser};

use marble_race::participants::{self, Participant};
use marble_race::sim::{Race, RaceEvent, RaceSnapshot};
use marble_race::standings::{LEADERBOARD_SIZE, Standings, winner_banner};
use marble_race::{Profile, RaceConfig};

#[derive(Parser, Debug)]
#[command(name = "marble-race", version, about = "Run a marble race and print the standings")]
struct Opts {
    /// Race format: short | long
    #[arg(long, default_value = "short")]
    profile: String,

    /// JSON config file (overrides --profile)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text file with one participant label per line
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Race seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Give up on stragglers after this many ticks
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,

    /// Run this many additional races with fresh seeds
    #[arg(long, default_value_t = 0)]
    restarts: u32,

    /// Print the final snapshot of each race as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

fn load_config(opts: &Opts) -> Result<RaceConfig> {
    if let Some(path) = &opts.config {
        return RaceConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()));
    }
    let profile = Profile::from_str(&opts.profile)
        .ok_or_else(|| anyhow!("unknown profile {:?} (expected short or long)", opts.profile))?;
    Ok(profile.config())
}

fn load_roster(opts: &Opts, max: usize) -> Result<Vec<Participant>> {
    match &opts.labels {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading labels {}", path.display()))?;
            let labels: Vec<&str> = text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            Ok(participants::roster(&labels[..], max))
        }
        None => Ok(participants::sample_roster(max)),
    }
}

/// Tick until every marble is in or the budget runs out
fn run(race: &mut Race, max_ticks: u64) {
    while race.ticks() < max_ticks && !race.all_finished() {
        race.advance();
        for event in race.events() {
            match event {
                RaceEvent::Ranked { marble, rank } => {
                    let m = &race.marbles()[*marble];
                    log::info!("{}. {} ({:.2}s)", rank, m.label, race.elapsed());
                }
                RaceEvent::RaceComplete { .. } => {
                    if let Some(banner) = winner_banner(race) {
                        log::info!("{}", banner);
                    }
                }
                _ => {}
            }
        }
    }

    if !race.all_finished() {
        log::warn!(
            "Stopped after {} ticks with {} of {} marbles finished",
            race.ticks(),
            race.finished_count(),
            race.marbles().len()
        );
    }
}

fn report(race: &Race, json: bool) -> Result<()> {
    let standings = Standings::from_race(race);
    println!(
        "Race {:#x}: {} ticks ({:.1}s), {} finished",
        race.seed(),
        race.ticks(),
        race.elapsed(),
        race.finished_count()
    );
    for line in standings.podium_lines(LEADERBOARD_SIZE) {
        println!("  {line}");
    }
    if let Some(banner) = winner_banner(race) {
        println!("{banner}");
    }
    if json {
        let snapshot = RaceSnapshot::capture(race);
        println!("{}", snapshot.to_json().context("serializing snapshot")?);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let config = load_config(&opts)?;
    let roster = load_roster(&opts, config.max_marbles)?;
    let seed = opts.seed.unwrap_or_else(rand::random);

    log::info!(
        "Marble Race ({}) starting with {} participants",
        config.profile.as_str(),
        roster.len()
    );

    let mut race = Race::new(config, &roster, seed).context("building race")?;
    run(&mut race, opts.max_ticks);
    report(&race, opts.json)?;

    for restart in 1..=opts.restarts {
        // Replace the whole race; nothing from the previous one survives
        race = race.reset(seed.wrapping_add(restart as u64));
        run(&mut race, opts.max_ticks);
        report(&race, opts.json)?;
    }

    Ok(())
}
