//! Physics world resource managing the Rapier simulation
//!
//! This module provides the PhysicsWorld struct that owns every Rapier
//! structure needed for simulation: body and collider sets, broad phase,
//! narrow phase, solver parameters and gravity.

use super::body::{BodyDesc, RigidBody};
use super::convert;
use crate::core::Pose;
use glam::Vec3;
use rapier3d::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

/// Opaque identity of a registered body, assigned by the physics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(RigidBodyHandle);

impl BodyId {
    /// Raw (index, generation) pair, useful for logging
    pub fn into_raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }
}

/// Bookkeeping for one registered body
#[derive(Debug, Clone, Copy)]
struct BodyEntry {
    collider: ColliderHandle,
    desc: BodyDesc,
}

/// Physics world resource containing all Rapier structures
pub struct PhysicsWorld {
    /// Set of rigid bodies in the simulation
    rigid_body_set: RigidBodySet,

    /// Set of colliders in the simulation
    collider_set: ColliderSet,

    /// Integration parameters; `dt` is the fixed sub-step
    integration_parameters: IntegrationParameters,

    /// Physics pipeline for stepping the simulation
    physics_pipeline: PhysicsPipeline,

    /// Island manager for grouping connected bodies
    island_manager: IslandManager,

    /// Broad phase for coarse collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase for precise collision detection
    narrow_phase: NarrowPhase,

    /// Set of impulse-based joints (always empty, required by the pipeline)
    impulse_joint_set: ImpulseJointSet,

    /// Set of multibody joints (always empty, required by the pipeline)
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for continuous collision detection
    ccd_solver: CCDSolver,

    /// Gravity vector for the simulation
    gravity: Vector<Real>,

    /// Construction inputs per registered body
    entries: HashMap<RigidBodyHandle, BodyEntry>,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity and fixed sub-step
    pub fn new(gravity: Vec3, fixed_timestep: f32) -> Self {
        info!(
            "Initializing physics world: gravity={}, fixed_timestep={}",
            gravity, fixed_timestep
        );

        let integration_parameters = IntegrationParameters {
            dt: fixed_timestep,
            ..Default::default()
        };

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: convert::to_vector(gravity),
            entries: HashMap::new(),
        }
    }

    /// Set the gravity vector for the simulation
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = convert::to_vector(gravity);
        debug!("Physics gravity set to: {}", gravity);
    }

    /// Current gravity
    pub fn gravity(&self) -> Vec3 {
        convert::from_vector(&self.gravity)
    }

    /// Fixed sub-step length in seconds
    pub fn fixed_timestep(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Register a body. Consumes it: its surface properties are final from here on.
    pub fn insert(&mut self, body: RigidBody) -> BodyId {
        let (desc, native_body, collider) = body.into_parts();
        let handle = self.rigid_body_set.insert(native_body);
        let collider = self
            .collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.entries.insert(handle, BodyEntry { collider, desc });

        debug!(
            "Registered {} body {:?} (static: {})",
            desc.shape.kind_name(),
            handle.into_raw_parts(),
            desc.is_static()
        );
        BodyId(handle)
    }

    /// Remove a body and its collider. Returns its construction inputs if it existed.
    pub fn remove(&mut self, id: BodyId) -> Option<BodyDesc> {
        let entry = self.entries.remove(&id.0)?;
        self.rigid_body_set.remove(
            id.0,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // Also remove attached colliders
        );
        debug!("Removed body {:?}", id.0.into_raw_parts());
        Some(entry.desc)
    }

    /// Whether the id names a registered body
    pub fn contains(&self, id: BodyId) -> bool {
        self.entries.contains_key(&id.0)
    }

    /// Number of registered bodies (static ones included)
    pub fn body_count(&self) -> usize {
        self.entries.len()
    }

    /// Construction inputs of a registered body
    pub fn desc(&self, id: BodyId) -> Option<&BodyDesc> {
        self.entries.get(&id.0).map(|entry| &entry.desc)
    }

    /// Resolved world pose of a body after the last completed step
    pub fn pose(&self, id: BodyId) -> Option<Pose> {
        self.rigid_body_set
            .get(id.0)
            .map(|body| convert::from_isometry(body.position()))
    }

    /// Linear velocity of a body
    pub fn linear_velocity(&self, id: BodyId) -> Option<Vec3> {
        self.rigid_body_set
            .get(id.0)
            .map(|body| convert::from_vector(body.linvel()))
    }

    /// Restitution and friction as stored on the collider
    pub fn collider_coefficients(&self, id: BodyId) -> Option<(f32, f32)> {
        let entry = self.entries.get(&id.0)?;
        self.collider_set
            .get(entry.collider)
            .map(|collider| (collider.restitution(), collider.friction()))
    }

    /// Advance the simulation by exactly one fixed sub-step
    pub fn step_fixed(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_physics_world_creation() {
        let world = PhysicsWorld::new(Vec3::new(0.0, -100.0, 0.0), 1.0 / 60.0);
        assert_eq!(world.gravity(), Vec3::new(0.0, -100.0, 0.0));
        assert_eq!(world.fixed_timestep(), 1.0 / 60.0);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -100.0, 0.0), 1.0 / 60.0);
        let mut body = RigidBody::create_sphere(10.0, Vec3::new(0.0, 50.0, 0.0), 5.0).unwrap();
        body.set_restitution(0.25);
        body.set_friction(0.75);
        let id = world.insert(body);

        assert!(world.contains(id));
        assert_eq!(world.collider_coefficients(id), Some((0.25, 0.75)));
        assert_eq!(
            world.pose(id).map(|pose| pose.position),
            Some(Vec3::new(0.0, 50.0, 0.0))
        );

        let desc = world.remove(id).unwrap();
        assert_eq!(desc.mass, 10.0);
        assert!(!world.contains(id));
        assert!(world.pose(id).is_none());
        assert!(world.remove(id).is_none());
    }

    #[test]
    fn test_free_fall_under_gravity() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -100.0, 0.0), 1.0 / 60.0);
        let id = world.insert(
            RigidBody::create_box(10.0, Vec3::new(0.0, 200.0, 0.0), Quat::IDENTITY, Vec3::ONE)
                .unwrap(),
        );

        for _ in 0..60 {
            world.step_fixed();
        }

        // After one second: v = -100, y ≈ 200 - 50
        let velocity = world.linear_velocity(id).unwrap();
        assert!((velocity.y + 100.0).abs() < 1.0, "velocity {velocity}");
        let y = world.pose(id).unwrap().position.y;
        assert!((y - 150.0).abs() < 2.0, "height {y}");
    }

    #[test]
    fn test_fixed_body_does_not_move() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -100.0, 0.0), 1.0 / 60.0);
        let id = world.insert(
            RigidBody::create_box(0.0, Vec3::ZERO, Quat::IDENTITY, Vec3::new(100.0, 1.0, 100.0))
                .unwrap(),
        );
        for _ in 0..30 {
            world.step_fixed();
        }
        assert_eq!(world.pose(id).unwrap().position, Vec3::ZERO);
    }
}
