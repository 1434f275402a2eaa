//! Blast Maze entry point
//!
//! Headless demo driver: seeds a match, feeds it a scripted random-walk
//! player, and logs the event stream. It stands in for the excluded
//! rendering/input layers; `RUST_LOG=info` shows the match unfold.
//!
//! Usage: `blast-maze [seed] [level.json]`

use std::process::ExitCode;

use glam::Vec2;
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use blast_maze::consts::TICK_DT;
use blast_maze::level::LevelSpec;
use blast_maze::sim::{Direction, GamePhase, GameState, TickInput, tick};

/// Ten minutes of simulated play before the demo gives up
const MAX_TICKS: u64 = 60 * 600;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => match raw.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("seed must be an integer, got {raw:?}");
                return ExitCode::FAILURE;
            }
        },
        None => 0xB1A57,
    };
    let level = match args.next() {
        Some(path) => match load_level(&path) {
            Ok(level) => level,
            Err(err) => {
                eprintln!("failed to load level {path:?}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => LevelSpec::classic(),
    };

    info!("starting match: seed {seed}, {}x{} grid", level.cols, level.rows);
    let mut state = GameState::new(seed, &level);
    // the demo player's whims are seeded separately from the simulation
    let mut script = Pcg32::seed_from_u64(seed ^ 0x5EED);
    let mut heading = Vec2::ZERO;

    while state.time_ticks < MAX_TICKS {
        // wander: pick a new heading every half second, drop the occasional bomb
        if state.time_ticks % 30 == 0 {
            let dir = Direction::ALL[script.random_range(0..4)];
            heading = dir.vec();
        }
        let input = TickInput {
            dir: heading,
            place_bomb: script.random_bool(0.01),
            restart: false,
        };

        if let Err(err) = tick(&mut state, &input, TICK_DT) {
            eprintln!("simulation fault: {err}");
            return ExitCode::FAILURE;
        }
        for event in &state.events {
            info!("tick {:>5}: {event:?}", state.time_ticks);
        }
        if state.phase != GamePhase::Playing {
            break;
        }
    }

    let snapshot = state.snapshot();
    match state.phase {
        GamePhase::Won => info!("won after {} ticks", state.time_ticks),
        GamePhase::Lost => info!(
            "lost after {} ticks with {} enemies left",
            state.time_ticks,
            snapshot
                .entities
                .iter()
                .filter(|e| matches!(e, blast_maze::sim::EntityView::Enemy { .. }))
                .count()
        ),
        GamePhase::Playing => warn!("demo player wandered for {MAX_TICKS} ticks without an ending"),
    }
    ExitCode::SUCCESS
}

fn load_level(path: &str) -> Result<LevelSpec, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
