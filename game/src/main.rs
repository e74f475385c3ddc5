//! Headless driver for the tumble simulation
//!
//! Runs the frame loop against an in-memory scene. Type `box`, `sphere` or
//! `quit` on stdin while it runs.

use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};
use tumble_engine::prelude::*;

/// Frames simulated by `--fast` when no `--frames` limit is given
const DEFAULT_FAST_FRAMES: u64 = 600;

#[derive(Parser, Debug)]
#[command(
    name = "tumble",
    version,
    about = "Drop boxes and spheres onto a ground plane"
)]
struct Opts {
    /// JSON simulation config (defaults are used for missing fields)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many frames (runs until `quit` otherwise)
    #[arg(long)]
    frames: Option<u64>,

    /// Target frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Use synthetic timestamps instead of the wall clock
    #[arg(long)]
    fast: bool,

    /// Box batches to spawn at startup
    #[arg(long, default_value_t = 0)]
    boxes: usize,

    /// Sphere batches to spawn at startup
    #[arg(long, default_value_t = 0)]
    spheres: usize,

    /// Seed for the spawn RNG
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = tumble_engine::DEFAULT_LOG_FILTER)]
    log_filter: String,
}

fn parse_command(line: &str) -> Option<SpawnCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "b" | "box" | "boxes" => Some(SpawnCommand::boxes()),
        "s" | "sphere" | "spheres" => Some(SpawnCommand::spheres()),
        _ => None,
    }
}

/// Forward stdin lines to the command queue until `quit` or EOF.
/// EOF also stops the frame loop when `stop_on_eof` is set.
fn spawn_input_thread(queue: SpawnCommandQueue, stop: Arc<AtomicBool>, stop_on_eof: bool) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if matches!(trimmed, "q" | "quit" | "exit") {
                info!("Quit requested");
                stop.store(true, Ordering::Relaxed);
                return;
            }
            match parse_command(trimmed) {
                Some(command) => queue.push(command),
                None => warn!("Unknown command '{}' (try box, sphere or quit)", trimmed),
            }
        }
        if stop_on_eof {
            debug!("stdin closed, stopping");
            stop.store(true, Ordering::Relaxed);
        }
    });
}

fn log_summary(world: &SimulationWorld, scene: &EcsScene, frames: u64) {
    info!(
        "Simulated {} frames: {} active bodies, {} visuals",
        frames,
        world.body_count(),
        scene.visual_count()
    );
    let heights: Vec<f32> = world
        .pairs()
        .iter()
        .filter_map(|pair| world.body_pose(pair.body).ok())
        .map(|pose| pose.position.y)
        .collect();
    if let (Some(min), Some(max)) = (
        heights.iter().copied().reduce(f32::min),
        heights.iter().copied().reduce(f32::max),
    ) {
        info!("Body heights range from {:.2} to {:.2}", min, max);
    }
    for pair in world.pairs() {
        if let Ok(pose) = world.body_pose(pair.body) {
            debug!("  {:?}: position {}", pair.body.into_raw_parts(), pose.position);
        }
    }
}

fn run(opts: Opts) -> tumble_engine::error::Result<()> {
    let mut config = match &opts.config {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = opts.seed {
        config = config.with_seed(seed);
    }

    let mut scene = EcsScene::new();
    let mut world = SimulationWorld::new(config)?;
    world.initialize(&mut scene)?;

    let queue = SpawnCommandQueue::new();
    for _ in 0..opts.boxes {
        queue.push(SpawnCommand::boxes());
    }
    for _ in 0..opts.spheres {
        queue.push(SpawnCommand::spheres());
    }

    let mut frame_loop = FrameLoop::new();
    let frames = if opts.fast {
        let frames = opts.frames.unwrap_or(DEFAULT_FAST_FRAMES);
        let mut source = SimulatedFrames::at_fps(opts.fps, frames);
        frame_loop.run(&mut source, &mut world, &mut scene, &queue)?
    } else {
        let mut source = PacedFrames::new(opts.fps);
        if let Some(frames) = opts.frames {
            source = source.with_limit(frames);
        }
        spawn_input_thread(queue.clone(), source.stop_handle(), opts.frames.is_none());
        info!("Type 'box', 'sphere' or 'quit'");
        frame_loop.run(&mut source, &mut world, &mut scene, &queue)?
    };

    log_summary(&world, &scene, frames);
    Ok(())
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    tumble_engine::init_logging_with(&opts.log_filter);
    info!("Starting tumble");

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Simulation failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
