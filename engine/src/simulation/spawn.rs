//! Random body generation for user spawn requests

use crate::config::SpawnConfig;
use crate::core::Pose;
use crate::error::Result;
use crate::physics::{PhysicsMaterial, RigidBody};
use crate::scene::VisualDesc;
use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of body a spawn request creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// Cube with random edge length
    Box,
    /// Sphere with random radius
    Sphere,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyKind::Box => write!(f, "box"),
            BodyKind::Sphere => write!(f, "sphere"),
        }
    }
}

/// Outcome of a batch spawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    /// Bodies created and registered
    pub spawned: usize,
    /// Bodies not created because the body cap was full
    pub skipped: usize,
}

/// Sample from [-extent, extent), or exactly 0 when there is no extent
fn jitter<R: Rng>(rng: &mut R, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.gen_range(-extent..extent)
    } else {
        0.0
    }
}

/// Build one randomized body and its matching visual.
///
/// Size (edge length or radius) comes from `[min_size, max_size)`; the body is
/// placed at `drop_height` with x/z jitter so a batch does not stack perfectly.
pub fn sample_body<R: Rng>(
    rng: &mut R,
    config: &SpawnConfig,
    kind: BodyKind,
) -> Result<(RigidBody, VisualDesc)> {
    let size = rng.gen_range(config.min_size..config.max_size);
    let position = Vec3::new(
        jitter(rng, config.jitter),
        config.drop_height,
        jitter(rng, config.jitter),
    );
    let pose = Pose::from_position(position);

    let (mut body, visual) = match kind {
        BodyKind::Box => {
            let size = Vec3::splat(size);
            (
                RigidBody::create_box(config.mass, position, Quat::IDENTITY, size)?,
                VisualDesc::dynamic_box(size, pose),
            )
        }
        BodyKind::Sphere => (
            RigidBody::create_sphere(config.mass, position, size)?,
            VisualDesc::dynamic_sphere(size, pose),
        ),
    };

    body.set_material(PhysicsMaterial::new(
        config.restitution,
        config.friction,
        config.rolling_friction,
    ));
    body.set_ccd_enabled(config.ccd_enabled);
    body.set_soft_ccd_prediction(config.soft_ccd_prediction);

    Ok((body, visual))
}
