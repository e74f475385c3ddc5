//! Components stored on visual entities

use crate::core::Pose;
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::VisualShape;

/// Transform component representing position, rotation, and scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation as a quaternion
    pub rotation: Quat,
    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a transform with unit scale from a pose
    pub fn from_pose(pose: Pose) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation,
            ..Default::default()
        }
    }

    /// Position and rotation, without scale
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    /// Convert this transform to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Geometry attached to a visual entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualMesh(pub VisualShape);

/// Flat colour material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Linear RGB colour, each channel in [0, 1]
    pub color: Vec3,
}

impl Material {
    /// Material from a 0xRRGGBB colour
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self {
            color: Vec3::new(channel(16), channel(8), channel(0)),
        }
    }
}

/// Shadow participation of a visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowSettings {
    /// Casts shadows onto other objects
    pub cast: bool,
    /// Receives shadows from other objects
    pub receive: bool,
}

impl ShadowSettings {
    /// Casts and receives
    pub fn both() -> Self {
        Self {
            cast: true,
            receive: true,
        }
    }

    /// Receives only
    pub fn receive_only() -> Self {
        Self {
            cast: false,
            receive: true,
        }
    }
}

/// Number of pose writes a visual has received
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoseRevision(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_from_hex() {
        let material = Material::from_hex(0xff8000);
        assert_eq!(material.color.x, 1.0);
        assert!((material.color.y - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(material.color.z, 0.0);
    }

    #[test]
    fn test_transform_roundtrips_pose() {
        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_z(0.3));
        let transform = Transform::from_pose(pose);
        assert_eq!(transform.scale, Vec3::ONE);
        assert_eq!(transform.pose(), pose);

        let moved = transform.to_matrix().transform_point3(Vec3::X);
        assert!((moved - (pose.position + pose.rotation * Vec3::X)).length() < 1e-5);
    }
}
