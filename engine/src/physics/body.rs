//! Rigid body construction
//!
//! A [`RigidBody`] owns a fully built rapier body and collider that are not yet
//! part of any world. Shape and mass are fixed at construction; surface
//! properties can be tuned until the body is handed to
//! [`PhysicsWorld::insert`](crate::physics::PhysicsWorld::insert), which consumes it.

use super::components::{CollisionShape, PhysicsMaterial};
use super::convert;
use crate::core::Pose;
use crate::error::{Result, SimulationError};
use glam::{Quat, Vec3};
use rapier3d::prelude::{
    CoefficientCombineRule, Collider, ColliderBuilder, MassProperties, RigidBody as NativeBody,
    RigidBodyBuilder,
};
use tracing::{debug, error, warn};

/// Distance ahead of a dynamic body at which contacts are already predicted.
///
/// Must exceed the per-step travel at impact: about 3.3 units for a 200 unit
/// drop at the default gravity and 1/60 s steps.
pub const DEFAULT_SOFT_CCD_PREDICTION: f32 = 5.0;

/// Construction inputs of a body, kept for queries after registration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    /// Collision shape
    pub shape: CollisionShape,
    /// Mass; 0 means immovable
    pub mass: f32,
    /// Pose at construction time
    pub initial_pose: Pose,
    /// Surface coefficients at registration time
    pub material: PhysicsMaterial,
}

impl BodyDesc {
    /// Whether the body is immovable
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }
}

/// An unregistered rigid body
#[derive(Debug, Clone)]
pub struct RigidBody {
    desc: BodyDesc,
    body: NativeBody,
    collider: Collider,
}

impl RigidBody {
    /// Create a box with full edge lengths `size`
    pub fn create_box(mass: f32, position: Vec3, orientation: Quat, size: Vec3) -> Result<Self> {
        Self::new(
            CollisionShape::cuboid(size),
            mass,
            Pose::new(position, orientation),
        )
    }

    /// Create a sphere. Orientation is always identity.
    pub fn create_sphere(mass: f32, position: Vec3, radius: f32) -> Result<Self> {
        Self::new(
            CollisionShape::sphere(radius),
            mass,
            Pose::from_position(position),
        )
    }

    /// Create a body from an arbitrary shape
    pub fn new(shape: CollisionShape, mass: f32, pose: Pose) -> Result<Self> {
        if let Err(err) = shape.validate() {
            error!(?shape, mass, position = ?pose.position, "Rejected rigid body: {}", err);
            return Err(err);
        }
        if !(mass.is_finite() && mass >= 0.0) {
            error!(?shape, mass, "Rejected rigid body: invalid mass");
            return Err(SimulationError::InvalidMass(mass));
        }

        let material = PhysicsMaterial::default();
        let body = if mass > 0.0 {
            let inertia = shape.principal_inertia(mass);
            RigidBodyBuilder::dynamic()
                .additional_mass_properties(MassProperties::new(
                    convert::to_point(Vec3::ZERO),
                    mass,
                    convert::to_vector(inertia),
                ))
                .soft_ccd_prediction(DEFAULT_SOFT_CCD_PREDICTION)
        } else {
            RigidBodyBuilder::fixed()
        }
        .position(convert::to_isometry(&pose))
        .angular_damping(material.rolling_friction)
        .build();

        let collider = match shape {
            CollisionShape::Box { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            CollisionShape::Sphere { radius } => ColliderBuilder::ball(radius),
        }
        // Mass comes from the body's explicit mass properties
        .density(0.0)
        .restitution(material.restitution)
        .friction(material.friction)
        .restitution_combine_rule(CoefficientCombineRule::Multiply)
        .friction_combine_rule(CoefficientCombineRule::Multiply)
        .build();

        debug!(
            "Constructed {} body: mass={}, position={:?}",
            shape.kind_name(),
            mass,
            pose.position
        );

        Ok(Self {
            desc: BodyDesc {
                shape,
                mass,
                initial_pose: pose,
                material,
            },
            body,
            collider,
        })
    }

    /// Set restitution, clamped to [0, 1]
    pub fn set_restitution(&mut self, value: f32) {
        self.desc.material.set_restitution(value);
        self.collider.set_restitution(self.desc.material.restitution);
    }

    /// Set friction, clamped to >= 0
    pub fn set_friction(&mut self, value: f32) {
        self.desc.material.set_friction(value);
        self.collider.set_friction(self.desc.material.friction);
    }

    /// Set rolling friction, clamped to >= 0.
    ///
    /// Applied as angular damping on the body, so spin is damped at all
    /// times, in flight as well as while touching another body.
    pub fn set_rolling_friction(&mut self, value: f32) {
        self.desc.material.set_rolling_friction(value);
        self.body
            .set_angular_damping(self.desc.material.rolling_friction);
    }

    /// Apply all three surface coefficients at once
    pub fn set_material(&mut self, material: PhysicsMaterial) {
        self.set_restitution(material.restitution);
        self.set_friction(material.friction);
        self.set_rolling_friction(material.rolling_friction);
    }

    /// Toggle hard continuous collision detection. It only engages when a
    /// body moves further than its own thickness in one step.
    pub fn set_ccd_enabled(&mut self, enabled: bool) {
        self.body.enable_ccd(enabled);
    }

    /// Set the soft CCD prediction distance; 0 disables it. Ignored on
    /// immovable bodies.
    pub fn set_soft_ccd_prediction(&mut self, distance: f32) {
        if !(distance.is_finite() && distance >= 0.0) {
            warn!("Ignoring soft CCD prediction distance {}", distance);
            return;
        }
        if self.body.is_dynamic() {
            self.body.set_soft_ccd_prediction(distance);
        }
    }

    /// Current soft CCD prediction distance
    pub fn soft_ccd_prediction(&self) -> f32 {
        self.body.soft_ccd_prediction()
    }

    /// Builder-style variant of [`set_material`](Self::set_material)
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.set_material(material);
        self
    }

    /// Construction inputs
    pub fn desc(&self) -> &BodyDesc {
        &self.desc
    }

    /// Collision shape
    pub fn shape(&self) -> CollisionShape {
        self.desc.shape
    }

    /// Mass (0 = immovable)
    pub fn mass(&self) -> f32 {
        self.desc.mass
    }

    /// Surface coefficients
    pub fn material(&self) -> PhysicsMaterial {
        self.desc.material
    }

    /// Pose at construction time
    pub fn initial_pose(&self) -> Pose {
        self.desc.initial_pose
    }

    /// Principal moments of the local inertia tensor
    pub fn local_inertia(&self) -> Vec3 {
        self.desc.shape.principal_inertia(self.desc.mass)
    }

    pub(crate) fn into_parts(self) -> (BodyDesc, NativeBody, Collider) {
        (self.desc, self.body, self.collider)
    }
}
