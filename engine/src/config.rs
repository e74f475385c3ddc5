//! Configuration types for the simulation

use crate::error::{Result, SimulationError};
use crate::physics::DEFAULT_SOFT_CCD_PREDICTION;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default gravity magnitude, well above Earth gravity
pub const DEFAULT_GRAVITY: f32 = 100.0;

/// Configuration for the static ground body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Full edge lengths of the ground box
    pub size: Vec3,
    /// Centre of the ground box
    pub position: Vec3,
    /// Restitution (bounciness) of the ground
    pub restitution: f32,
    /// Friction of the ground
    pub friction: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: Vec3::new(100.0, 1.0, 100.0),
            position: Vec3::ZERO,
            restitution: 0.99,
            friction: 0.5,
        }
    }
}

/// Parameters used when spawning random bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Bodies created per "spawn boxes" / "spawn spheres" command
    pub batch_size: usize,
    /// Inclusive lower bound of edge length / radius
    pub min_size: f32,
    /// Exclusive upper bound of edge length / radius
    pub max_size: f32,
    /// Height bodies are dropped from
    pub drop_height: f32,
    /// Horizontal jitter on x and z, sampled from [-jitter, jitter)
    pub jitter: f32,
    /// Mass of spawned bodies
    pub mass: f32,
    /// Restitution of spawned bodies
    pub restitution: f32,
    /// Friction of spawned bodies
    pub friction: f32,
    /// Rolling friction of spawned bodies
    pub rolling_friction: f32,
    /// Enable hard continuous collision detection on spawned bodies
    pub ccd_enabled: bool,
    /// Soft CCD prediction distance of spawned bodies (0 disables it)
    pub soft_ccd_prediction: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            min_size: 5.0,
            max_size: 10.0,
            drop_height: 200.0,
            jitter: 1.0,
            mass: 10.0,
            restitution: 0.125,
            friction: 1.0,
            rolling_friction: 5.0,
            ccd_enabled: true,
            soft_ccd_prediction: DEFAULT_SOFT_CCD_PREDICTION,
        }
    }
}

/// Top level simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Gravity vector
    pub gravity: Vec3,
    /// Internal fixed integration step in seconds
    pub fixed_timestep: f32,
    /// Maximum number of fixed sub-steps per `step` call
    pub max_substeps: u32,
    /// Ground body settings
    pub ground: GroundConfig,
    /// Random spawn settings
    pub spawn: SpawnConfig,
    /// Optional cap on active dynamic bodies (None = unbounded)
    pub max_bodies: Option<usize>,
    /// Seed for the spawn RNG (None = seeded from entropy)
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -DEFAULT_GRAVITY, 0.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 10,
            ground: GroundConfig::default(),
            spawn: SpawnConfig::default(),
            max_bodies: None,
            rng_seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = ?path, "Loading simulation config");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Check the configuration for values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(SimulationError::Config(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(SimulationError::Config(format!(
                "fixed_timestep must be > 0, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(SimulationError::Config(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        if self.ground.size.min_element() <= 0.0 || !self.ground.size.is_finite() {
            return Err(SimulationError::Config(format!(
                "ground size must be positive, got {}",
                self.ground.size
            )));
        }

        let spawn = &self.spawn;
        if !(spawn.min_size > 0.0 && spawn.min_size < spawn.max_size && spawn.max_size.is_finite())
        {
            return Err(SimulationError::Config(format!(
                "spawn size range [{}, {}) must be positive and non-empty",
                spawn.min_size, spawn.max_size
            )));
        }
        if !(spawn.jitter.is_finite() && spawn.jitter >= 0.0) {
            return Err(SimulationError::Config(format!(
                "spawn jitter must be >= 0, got {}",
                spawn.jitter
            )));
        }
        if !(spawn.mass.is_finite() && spawn.mass >= 0.0) {
            return Err(SimulationError::Config(format!(
                "spawn mass must be >= 0, got {}",
                spawn.mass
            )));
        }
        if !(spawn.soft_ccd_prediction.is_finite() && spawn.soft_ccd_prediction >= 0.0) {
            return Err(SimulationError::Config(format!(
                "spawn soft_ccd_prediction must be >= 0, got {}",
                spawn.soft_ccd_prediction
            )));
        }
        if !spawn.drop_height.is_finite() {
            return Err(SimulationError::Config(
                "spawn drop_height must be finite".to_string(),
            ));
        }

        Ok(())
    }
}
