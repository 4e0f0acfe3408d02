//! Command-line driver: loads a level container, replays its solution (or
//! idles for a tick budget) and reports the outcome.

mod container;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use gridlock_core::{BlobMode, GameState};
use gridlock_level::{build_level_seeded, query, LevelState};
use gridlock_replay::outcome_matches;

use container::LevelContainer;

/// Deterministic tile-puzzle simulation driver.
#[derive(Debug, Parser)]
#[command(name = "gridlock", version, about)]
struct Cli {
    /// Path to the JSON level container.
    level: PathBuf,

    /// Maximum number of subticks to simulate.
    #[arg(long, default_value_t = 60 * 60 * 10)]
    max_subticks: u64,

    /// Explicit blob RNG seed, overriding the level's blob mode.
    #[arg(long)]
    blob_seed: Option<u8>,

    /// Seed for the driver's own randomness (randomized blob mode).
    #[arg(long)]
    seed: Option<u64>,

    /// Print the glitch event log after the run.
    #[arg(long)]
    glitches: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let raw = std::fs::read_to_string(&args.level)
        .with_context(|| format!("could not read {}", args.level.display()))?;
    let parsed: LevelContainer = serde_json::from_str(&raw)
        .with_context(|| format!("could not parse {}", args.level.display()))?;

    let blob_seed = resolve_blob_seed(&args, parsed.level.blob_mode);
    let mut level = build_level_seeded(&parsed.level, blob_seed)
        .context("the level description is unusable")?;

    let solution = parsed
        .solution
        .as_ref()
        .map(container::decode_solution)
        .transpose()
        .context("the embedded solution is unusable")?;
    let expected = parsed
        .solution
        .as_ref()
        .and_then(|solution| solution.expected_outcome.clone());

    if let Some(solution) = &solution {
        level
            .play_solution(solution)
            .context("the embedded solution cannot be played")?;
    }

    run(&mut level, args.max_subticks);

    let outcome = level.outcome();
    println!(
        "result: {:?} after {} subticks ({} chips left, {} bonus, {} total score)",
        outcome.game_state,
        simulated_subticks(&level),
        query::chips_left(&level),
        outcome.bonus_points,
        outcome.total_score,
    );
    if args.glitches || !outcome.glitches.is_empty() {
        for glitch in &outcome.glitches {
            println!(
                "glitch: {:?} at ({}, {}) on subtick {} ({})",
                glitch.kind,
                glitch.location.x(),
                glitch.location.y(),
                glitch.happens_at,
                glitch.specifier,
            );
        }
    }

    if let Some(expected) = expected {
        if !outcome_matches(&outcome, &expected) {
            anyhow::bail!(
                "outcome does not match the recording: expected {:?}, observed {:?}",
                expected.game_state,
                outcome.game_state
            );
        }
        println!("outcome matches the recording");
    }

    Ok(())
}

fn run(level: &mut LevelState, max_subticks: u64) {
    let mut elapsed = 0u64;
    while query::game_state(level) == GameState::Playing && elapsed < max_subticks {
        level.tick();
        elapsed += 1;
    }
}

fn simulated_subticks(level: &LevelState) -> u64 {
    query::elapsed_subticks(level)
}

fn resolve_blob_seed(args: &Cli, mode: BlobMode) -> Option<u8> {
    if args.blob_seed.is_some() {
        return args.blob_seed;
    }
    if mode != BlobMode::Randomized {
        return None;
    }
    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    Some(rng.gen())
}
