//! Shape and surface descriptors for rigid bodies

use crate::error::{Result, SimulationError};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Collision shape types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum CollisionShape {
    /// Box with half-extents (width/2, height/2, depth/2)
    Box { half_extents: Vec3 },
    /// Sphere with radius
    Sphere { radius: f32 },
}

impl CollisionShape {
    /// Box from full edge lengths
    pub fn cuboid(size: Vec3) -> Self {
        CollisionShape::Box {
            half_extents: size * 0.5,
        }
    }

    /// Sphere from a radius
    pub fn sphere(radius: f32) -> Self {
        CollisionShape::Sphere { radius }
    }

    /// Short name used in logs and errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            CollisionShape::Box { .. } => "box",
            CollisionShape::Sphere { .. } => "sphere",
        }
    }

    /// Reject degenerate dimensions before they reach the solver
    pub fn validate(&self) -> Result<()> {
        match self {
            CollisionShape::Box { half_extents } => {
                for (axis, value) in ["x", "y", "z"].iter().zip(half_extents.to_array()) {
                    if !(value.is_finite() && value > 0.0) {
                        return Err(SimulationError::invalid_shape(
                            "box",
                            format!("size.{axis} = {} must be > 0", value * 2.0),
                        ));
                    }
                }
                Ok(())
            }
            CollisionShape::Sphere { radius } => {
                if radius.is_finite() && *radius > 0.0 {
                    Ok(())
                } else {
                    Err(SimulationError::invalid_shape(
                        "sphere",
                        format!("radius = {radius} must be > 0"),
                    ))
                }
            }
        }
    }

    /// Principal moments of inertia (diagonal of the local inertia tensor) for a
    /// solid body of the given mass. Zero for immovable (mass 0) bodies.
    pub fn principal_inertia(&self, mass: f32) -> Vec3 {
        if mass <= 0.0 {
            return Vec3::ZERO;
        }

        match self {
            CollisionShape::Sphere { radius } => Vec3::splat(0.4 * mass * radius * radius),
            CollisionShape::Box { half_extents } => {
                let x = half_extents.x * 2.0;
                let y = half_extents.y * 2.0;
                let z = half_extents.z * 2.0;
                let factor = mass / 12.0;

                Vec3::new(
                    factor * (y * y + z * z),
                    factor * (x * x + z * z),
                    factor * (x * x + y * y),
                )
            }
        }
    }

    /// Distance from the centre to the lowest point when unrotated
    pub fn half_height(&self) -> f32 {
        match self {
            CollisionShape::Sphere { radius } => *radius,
            CollisionShape::Box { half_extents } => half_extents.y,
        }
    }
}

/// Surface coefficients of a body.
///
/// Restitution lives in [0, 1]; friction and rolling friction are any
/// non-negative scalar. Setters clamp into range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PhysicsMaterial {
    /// Restitution (bounciness) coefficient
    pub restitution: f32,
    /// Sliding friction coefficient
    pub friction: f32,
    /// Resistance to rolling and spinning
    pub rolling_friction: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.5,
            rolling_friction: 0.0,
        }
    }
}

impl PhysicsMaterial {
    /// Create a material, clamping every coefficient into range
    pub fn new(restitution: f32, friction: f32, rolling_friction: f32) -> Self {
        let mut material = Self::default();
        material.set_restitution(restitution);
        material.set_friction(friction);
        material.set_rolling_friction(rolling_friction);
        material
    }

    /// Set restitution, clamped to [0, 1]. Non-finite values are ignored.
    pub fn set_restitution(&mut self, value: f32) {
        if let Some(value) = clamp_coefficient("restitution", value, 1.0) {
            self.restitution = value;
        }
    }

    /// Set friction, clamped to >= 0. Non-finite values are ignored.
    pub fn set_friction(&mut self, value: f32) {
        if let Some(value) = clamp_coefficient("friction", value, f32::MAX) {
            self.friction = value;
        }
    }

    /// Set rolling friction, clamped to >= 0. Non-finite values are ignored.
    pub fn set_rolling_friction(&mut self, value: f32) {
        if let Some(value) = clamp_coefficient("rolling_friction", value, f32::MAX) {
            self.rolling_friction = value;
        }
    }
}

fn clamp_coefficient(name: &str, value: f32, max: f32) -> Option<f32> {
    if !value.is_finite() {
        warn!("Ignoring non-finite {} value {}", name, value);
        return None;
    }
    let clamped = value.clamp(0.0, max);
    if clamped != value {
        warn!("Clamped {} from {} to {}", name, value, clamped);
    }
    Some(clamped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_halves_size() {
        let shape = CollisionShape::cuboid(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(
            shape,
            CollisionShape::Box {
                half_extents: Vec3::new(1.0, 2.0, 3.0)
            }
        );
        assert_eq!(shape.half_height(), 2.0);
    }

    #[test]
    fn test_validate_rejects_degenerate_shapes() {
        assert!(CollisionShape::cuboid(Vec3::new(1.0, 0.0, 1.0))
            .validate()
            .is_err());
        assert!(CollisionShape::cuboid(Vec3::new(1.0, 1.0, -2.0))
            .validate()
            .is_err());
        assert!(CollisionShape::sphere(0.0).validate().is_err());
        assert!(CollisionShape::sphere(f32::NAN).validate().is_err());
        assert!(CollisionShape::sphere(0.5).validate().is_ok());
    }

    #[test]
    fn test_inertia_calculation() {
        let sphere = CollisionShape::Sphere { radius: 1.0 };
        assert_eq!(sphere.principal_inertia(10.0), Vec3::splat(4.0)); // 0.4 * 10 * 1²

        let cube = CollisionShape::cuboid(Vec3::splat(10.0));
        let inertia = cube.principal_inertia(12.0);
        assert!((inertia.x - 200.0).abs() < 1e-3); // 12/12 * (100 + 100)
        assert_eq!(inertia.x, inertia.y);
        assert_eq!(inertia.y, inertia.z);
    }

    #[test]
    fn test_static_bodies_have_zero_inertia() {
        let cube = CollisionShape::cuboid(Vec3::new(100.0, 1.0, 100.0));
        assert_eq!(cube.principal_inertia(0.0), Vec3::ZERO);
    }

    #[test]
    fn test_material_clamps() {
        let mut material = PhysicsMaterial::new(1.5, -1.0, 5.0);
        assert_eq!(material.restitution, 1.0);
        assert_eq!(material.friction, 0.0);
        assert_eq!(material.rolling_friction, 5.0);

        material.set_restitution(f32::NAN);
        assert_eq!(material.restitution, 1.0);
    }
}
