//! Frame loop driving the simulation
//!
//! The loop has two states: idle (no tick seen yet) and running (previous
//! timestamp known). The first tick only records its timestamp, so the first
//! physics step uses the delta between the first two ticks.

pub mod source;

pub use source::{FrameSource, PacedFrames, SimulatedFrames};

use crate::error::Result;
use crate::scene::SceneBinding;
use crate::simulation::{SimulationWorld, SpawnCommandQueue};
use tracing::{debug, info, warn};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// First tick: timestamp recorded, no step
    Started,
    /// The world was stepped by `dt_seconds`
    Stepped {
        /// Elapsed time passed to the world
        dt_seconds: f32,
    },
}

/// Converts frame timestamps into simulation steps
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    previous_tick: Option<f64>,
    frames: u64,
}

impl FrameLoop {
    /// Create an idle loop
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the last tick in milliseconds, `None` while idle
    pub fn previous_tick(&self) -> Option<f64> {
        self.previous_tick
    }

    /// Ticks processed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Handle one frame at `now_ms`.
    ///
    /// Pending spawn commands are applied first so they take part in this
    /// tick's step and sync.
    pub fn tick<S: SceneBinding>(
        &mut self,
        now_ms: f64,
        world: &mut SimulationWorld,
        scene: &mut S,
        commands: &SpawnCommandQueue,
    ) -> Result<TickOutcome> {
        for command in commands.drain() {
            world.apply(command, scene)?;
        }
        self.frames += 1;

        let Some(previous) = self.previous_tick else {
            self.previous_tick = Some(now_ms);
            debug!("Frame loop started at {:.3}ms", now_ms);
            return Ok(TickOutcome::Started);
        };

        let mut elapsed_ms = now_ms - previous;
        if elapsed_ms.is_nan() || elapsed_ms < 0.0 {
            warn!(
                "Frame timestamp went backwards ({:.3}ms -> {:.3}ms), using dt = 0",
                previous, now_ms
            );
            elapsed_ms = 0.0;
        }

        let dt_seconds = (elapsed_ms / 1000.0) as f32;
        world.step(dt_seconds, scene)?;
        self.previous_tick = Some(now_ms);

        Ok(TickOutcome::Stepped { dt_seconds })
    }

    /// Tick on every timestamp from `source` until it runs out. Returns the
    /// number of frames processed by this call.
    pub fn run<F: FrameSource, S: SceneBinding>(
        &mut self,
        source: &mut F,
        world: &mut SimulationWorld,
        scene: &mut S,
        commands: &SpawnCommandQueue,
    ) -> Result<u64> {
        let start = self.frames;
        while let Some(now_ms) = source.next_frame() {
            self.tick(now_ms, world, scene, commands)?;
        }
        let frames = self.frames - start;
        info!("Frame loop finished after {} frames", frames);
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::scene::EcsScene;
    use crate::simulation::{BodyKind, SpawnCommand};

    fn setup() -> (SimulationWorld, EcsScene) {
        let mut scene = EcsScene::new();
        let mut world = SimulationWorld::new(SimulationConfig::default().with_seed(5)).unwrap();
        world.initialize(&mut scene).unwrap();
        (world, scene)
    }

    #[test]
    fn test_first_tick_does_not_step() {
        let (mut world, mut scene) = setup();
        world.spawn(BodyKind::Box, 1, &mut scene).unwrap();
        let visual = world.pairs()[0].visual;
        let queue = SpawnCommandQueue::new();
        let mut frame_loop = FrameLoop::new();

        let outcome = frame_loop.tick(1000.0, &mut world, &mut scene, &queue).unwrap();
        assert_eq!(outcome, TickOutcome::Started);
        assert_eq!(frame_loop.previous_tick(), Some(1000.0));
        assert_eq!(scene.pose_revision(visual), Some(0));

        let outcome = frame_loop.tick(1020.0, &mut world, &mut scene, &queue).unwrap();
        let TickOutcome::Stepped { dt_seconds } = outcome else {
            panic!("expected a step");
        };
        assert!((dt_seconds - 0.02).abs() < 1e-6);
        assert_eq!(scene.pose_revision(visual), Some(1));
        assert_eq!(frame_loop.previous_tick(), Some(1020.0));
    }

    #[test]
    fn test_backwards_time_steps_zero() {
        let (mut world, mut scene) = setup();
        let queue = SpawnCommandQueue::new();
        let mut frame_loop = FrameLoop::new();

        frame_loop.tick(500.0, &mut world, &mut scene, &queue).unwrap();
        let outcome = frame_loop.tick(400.0, &mut world, &mut scene, &queue).unwrap();
        assert_eq!(outcome, TickOutcome::Stepped { dt_seconds: 0.0 });
        assert_eq!(frame_loop.previous_tick(), Some(400.0));
    }

    #[test]
    fn test_queued_spawn_visible_in_next_tick() {
        let (mut world, mut scene) = setup();
        let queue = SpawnCommandQueue::new();
        let mut frame_loop = FrameLoop::new();
        frame_loop.tick(0.0, &mut world, &mut scene, &queue).unwrap();

        queue.push(SpawnCommand::boxes());
        frame_loop.tick(16.0, &mut world, &mut scene, &queue).unwrap();

        assert!(queue.is_empty());
        assert_eq!(world.body_count(), 10);
        for pair in world.pairs() {
            assert_eq!(scene.pose_revision(pair.visual), Some(1));
        }
    }

    #[test]
    fn test_run_consumes_source() {
        let (mut world, mut scene) = setup();
        let queue = SpawnCommandQueue::new();
        let mut frame_loop = FrameLoop::new();

        let frames = frame_loop
            .run(
                &mut SimulatedFrames::at_fps(60.0, 30),
                &mut world,
                &mut scene,
                &queue,
            )
            .unwrap();
        assert_eq!(frames, 30);
        assert_eq!(frame_loop.frames(), 30);
    }
}
