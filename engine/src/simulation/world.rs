//! The simulation world: physics context plus the active body/visual pairs
//!
//! One instance per session, passed explicitly to the frame loop and to spawn
//! handlers. Nothing here is global.

use super::commands::SpawnCommand;
use super::spawn::{sample_body, BodyKind, SpawnReport};
use crate::config::SimulationConfig;
use crate::core::Pose;
use crate::error::{Result, SimulationError};
use crate::physics::{BodyDesc, BodyId, PhysicsAccumulator, PhysicsWorld, RigidBody};
use crate::scene::{SceneBinding, VisualDesc, VisualHandle};
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, trace, warn};

/// A registered body and the visual it drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPair {
    /// Physics side
    pub body: BodyId,
    /// Render side; only a reference, the scene owns the resources
    pub visual: VisualHandle,
}

/// The static ground slab
#[derive(Debug, Clone, Copy)]
struct Ground {
    body: BodyId,
    visual: VisualHandle,
}

/// What a call to [`SimulationWorld::step`] did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Fixed sub-steps run
    pub substeps: u32,
    /// Seconds discarded because the sub-step cap was hit
    pub dropped: f32,
    /// Pairs whose visual received a pose
    pub synced: usize,
}

/// Physics context plus the ordered list of active pairs
pub struct SimulationWorld {
    config: SimulationConfig,
    physics: PhysicsWorld,
    accumulator: PhysicsAccumulator,
    ground: Option<Ground>,
    pairs: Vec<BodyPair>,
    rng: StdRng,
}

impl SimulationWorld {
    /// Build the physics context. The world is not usable until
    /// [`initialize`](Self::initialize) has created the ground.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            error!("Rejected simulation config: {}", err);
            return Err(err);
        }

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            physics: PhysicsWorld::new(config.gravity, config.fixed_timestep),
            accumulator: PhysicsAccumulator::new(config.fixed_timestep, config.max_substeps),
            ground: None,
            pairs: Vec::new(),
            rng,
            config,
        })
    }

    /// Create and register the static ground body and its visual
    pub fn initialize<S: SceneBinding>(&mut self, scene: &mut S) -> Result<()> {
        if self.ground.is_some() {
            error!("initialize called on an initialized world");
            return Err(SimulationError::AlreadyInitialized);
        }

        let ground = &self.config.ground;
        let mut body = RigidBody::create_box(0.0, ground.position, Quat::IDENTITY, ground.size)?;
        body.set_restitution(ground.restitution);
        body.set_friction(ground.friction);

        let visual = scene.create_visual(&VisualDesc::ground(
            ground.size,
            Pose::from_position(ground.position),
        ));
        let body = self.physics.insert(body);
        self.ground = Some(Ground { body, visual });

        info!(
            "Simulation initialized: ground {} at {}, gravity {}",
            ground.size, ground.position, self.config.gravity
        );
        Ok(())
    }

    /// Whether the ground exists and the world accepts spawns and steps
    pub fn is_initialized(&self) -> bool {
        self.ground.is_some()
    }

    fn ensure_initialized(&self, operation: &'static str) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            error!("{} called before initialize", operation);
            Err(SimulationError::NotInitialized { operation })
        }
    }

    /// Register a caller-built body, create its visual and append the pair
    pub fn spawn_body<S: SceneBinding>(
        &mut self,
        body: RigidBody,
        visual: VisualDesc,
        scene: &mut S,
    ) -> Result<BodyId> {
        self.ensure_initialized("spawn")?;

        if let Some(limit) = self.config.max_bodies {
            if self.pairs.len() >= limit {
                return Err(SimulationError::BodyLimitReached { limit });
            }
        }

        let shape = body.shape();
        let visual = scene.create_visual(&visual);
        let id = self.physics.insert(body);
        self.pairs.push(BodyPair { body: id, visual });

        debug!(
            "Spawned {} {:?} -> visual {:?} ({} active)",
            shape.kind_name(),
            id.into_raw_parts(),
            visual,
            self.pairs.len()
        );
        Ok(id)
    }

    /// Spawn `count` randomized bodies of one kind
    pub fn spawn<S: SceneBinding>(
        &mut self,
        kind: BodyKind,
        count: usize,
        scene: &mut S,
    ) -> Result<SpawnReport> {
        self.ensure_initialized("spawn")?;

        let mut report = SpawnReport::default();
        for _ in 0..count {
            let (body, visual) = sample_body(&mut self.rng, &self.config.spawn, kind)?;
            match self.spawn_body(body, visual, scene) {
                Ok(_) => report.spawned += 1,
                Err(SimulationError::BodyLimitReached { limit }) => {
                    report.skipped = count - report.spawned;
                    warn!(
                        "Body limit {} reached: skipped {} of {} {} bodies",
                        limit, report.skipped, count, kind
                    );
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            "Spawned {} {} bodies, {} active",
            report.spawned,
            kind,
            self.pairs.len()
        );
        Ok(report)
    }

    /// Apply a queued user command
    pub fn apply<S: SceneBinding>(
        &mut self,
        command: SpawnCommand,
        scene: &mut S,
    ) -> Result<SpawnReport> {
        let count = command.count.unwrap_or(self.config.spawn.batch_size);
        self.spawn(command.kind, count, scene)
    }

    /// Advance the simulation by `dt` seconds, then push every pair's resolved
    /// pose to its visual.
    ///
    /// All sub-steps finish before any pose is read, and every pair is
    /// synchronized exactly once per call (also when no sub-step ran).
    pub fn step<S: SceneBinding>(&mut self, dt: f32, scene: &mut S) -> Result<StepReport> {
        self.ensure_initialized("step")?;
        if !(dt.is_finite() && dt >= 0.0) {
            error!(dt, "step called with an invalid time step");
            return Err(SimulationError::InvalidTimeStep(dt));
        }

        let substeps = self.accumulator.accumulate(dt);
        for _ in 0..substeps.steps {
            self.physics.step_fixed();
        }

        let mut synced = 0;
        for pair in &self.pairs {
            match self.physics.pose(pair.body) {
                Some(pose) => {
                    scene.set_pose(pair.visual, pose);
                    synced += 1;
                }
                None => warn!("Active pair {:?} lost its body", pair.body),
            }
        }

        trace!(
            "Stepped {:.4}s: {} sub-steps, {} poses synced",
            dt,
            substeps.steps,
            synced
        );
        Ok(StepReport {
            substeps: substeps.steps,
            dropped: substeps.dropped,
            synced,
        })
    }

    /// Remove a body, its visual and the pair. The ground cannot be removed.
    pub fn despawn<S: SceneBinding>(&mut self, id: BodyId, scene: &mut S) -> Result<BodyDesc> {
        self.ensure_initialized("despawn")?;

        let Some(index) = self.pairs.iter().position(|pair| pair.body == id) else {
            warn!("despawn of unknown body {:?}", id);
            return Err(SimulationError::UnknownBody(id));
        };

        let pair = self.pairs.remove(index);
        scene.remove_visual(pair.visual);
        let desc = self
            .physics
            .remove(pair.body)
            .ok_or(SimulationError::UnknownBody(id))?;

        debug!("Despawned {:?} ({} active)", id, self.pairs.len());
        Ok(desc)
    }

    /// Active pairs
    pub fn pairs(&self) -> &[BodyPair] {
        &self.pairs
    }

    /// Number of active (dynamic) bodies; the ground is not counted
    pub fn body_count(&self) -> usize {
        self.pairs.len()
    }

    /// Visual paired with a body
    pub fn visual_of(&self, id: BodyId) -> Option<VisualHandle> {
        self.pairs
            .iter()
            .find(|pair| pair.body == id)
            .map(|pair| pair.visual)
    }

    /// Resolved pose of an active body
    pub fn body_pose(&self, id: BodyId) -> Result<Pose> {
        if self.visual_of(id).is_none() {
            return Err(SimulationError::UnknownBody(id));
        }
        self.physics.pose(id).ok_or(SimulationError::UnknownBody(id))
    }

    /// Linear velocity of an active body
    pub fn linear_velocity(&self, id: BodyId) -> Result<Vec3> {
        if self.visual_of(id).is_none() {
            return Err(SimulationError::UnknownBody(id));
        }
        self.physics
            .linear_velocity(id)
            .ok_or(SimulationError::UnknownBody(id))
    }

    /// Construction inputs of an active body
    pub fn body_desc(&self, id: BodyId) -> Option<&BodyDesc> {
        self.visual_of(id)?;
        self.physics.desc(id)
    }

    /// Pose of the static ground body
    pub fn ground_pose(&self) -> Result<Pose> {
        let ground = self
            .ground
            .ok_or(SimulationError::NotInitialized {
                operation: "ground_pose",
            })?;
        self.physics
            .pose(ground.body)
            .ok_or(SimulationError::UnknownBody(ground.body))
    }

    /// Visual of the ground
    pub fn ground_visual(&self) -> Option<VisualHandle> {
        self.ground.map(|ground| ground.visual)
    }

    /// Fraction of a fixed step carried over to the next call, in [0, 1).
    ///
    /// Diagnostics only: visuals always receive the pose of the last completed
    /// fixed step, never a blend between two steps.
    pub fn interpolation_alpha(&self) -> f32 {
        self.accumulator.interpolation_alpha()
    }

    /// Active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Underlying physics world
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }
}
