//! Skyward: headless runner for the platformer simulation core.
//!
//! Each frame is one call to `Simulation::step`:
//!
//!   1. the frame clock turns the elapsed time into a clamped step
//!   2. the controller applies gravity, probes for ground, handles jump
//!      charging and walking, then integrates position
//!   3. the collision resolver pushes the player back out of the active
//!      screen's tiles and clips velocity
//!
//! Without a window the frames come from a recorded input replay, which
//! makes every run reproducible. Window setup, sprites and keyboard polling
//! belong to the presentation layer and only talk to the simulation through
//! `FrameInput` and `RenderSnapshot`.
//!
//! Usage: `sky_game [LEVEL] [REPLAY] [TUNING]`

mod collision;
mod controller;
mod debug;
mod level;
mod replay;
mod sim;
mod tile;
mod tuning;

use std::path::PathBuf;

use level::load_level_from_path;
use replay::load_replay_from_path;
use sim::Simulation;
use sky_core::time::FrameClock;
use tuning::load_tuning_or_default;

const LEVEL_PATH: &str = "assets/levels/tower.json";
const REPLAY_PATH: &str = "assets/replays/climb.json";
const TUNING_PATH: &str = "assets/tuning.json";
const DEBUG_LOG_INTERVAL: u64 = 30;

fn run(level_path: PathBuf, replay_path: PathBuf, tuning_path: PathBuf) -> Result<(), String> {
    let tuning = load_tuning_or_default(&tuning_path)?;
    let level = load_level_from_path(&level_path)?;
    log::info!(
        "Level '{}' ({}) loaded: {} screens of {}x{} tiles",
        level.level_id,
        level.version,
        level.screen_count() - 1,
        level.width(),
        level.height()
    );
    let replay = load_replay_from_path(&replay_path)?;
    log::info!(
        "Replay '{}' loaded: {} frames at {:.4}s",
        replay_path.display(),
        replay.total_frames(),
        replay.fixed_dt
    );

    let mut sim = Simulation::new(level, &tuning);
    let mut clock = FrameClock::new();
    for input in replay.expanded_inputs() {
        let dt = clock.advance(replay.fixed_dt as f64);
        sim.step(&input, dt);
        if sim.show_debug && sim.frame % DEBUG_LOG_INTERVAL == 0 {
            for line in debug::debug_lines(&sim, clock.smoothed_fps) {
                log::debug!("{line}");
            }
        }
    }

    let snap = sim.snapshot();
    log::info!(
        "Finished after {} frames ({:.2}s): screen {}, position ({:.2}, {:.2}) = ({:.0}, {:.0})px, {}",
        sim.frame,
        clock.total_time,
        snap.active_screen,
        snap.position.x,
        snap.position.y,
        snap.position_px.x,
        snap.position_px.y,
        snap.state.label()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Skyward starting...");

    let mut args = std::env::args().skip(1);
    let level_path = PathBuf::from(args.next().unwrap_or_else(|| LEVEL_PATH.to_string()));
    let replay_path = PathBuf::from(args.next().unwrap_or_else(|| REPLAY_PATH.to_string()));
    let tuning_path = PathBuf::from(args.next().unwrap_or_else(|| TUNING_PATH.to_string()));

    if let Err(err) = run(level_path, replay_path, tuning_path) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
