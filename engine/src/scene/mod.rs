//! Scene binding: the narrow interface the simulation writes poses through
//!
//! The simulation never reads render state back. It creates one visual per
//! body, pushes a pose after every step and removes the visual on despawn.

pub mod components;
pub mod ecs;

use crate::core::Pose;
use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use components::{Material, PoseRevision, ShadowSettings, Transform, VisualMesh};
pub use ecs::EcsScene;

/// Opaque reference to a visual object owned by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(u64);

impl VisualHandle {
    /// Wrap a raw id issued by a scene implementation
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Geometry of a visual object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VisualShape {
    /// Box with full edge lengths
    Box { size: Vec3 },
    /// UV sphere
    Sphere { radius: f32, segments: u32 },
}

/// Everything needed to create a visual object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualDesc {
    /// Geometry
    pub shape: VisualShape,
    /// Surface material
    pub material: Material,
    /// Shadow participation
    pub shadows: ShadowSettings,
    /// Initial pose
    pub pose: Pose,
}

impl VisualDesc {
    /// Grey box that casts and receives shadows
    pub fn dynamic_box(size: Vec3, pose: Pose) -> Self {
        Self {
            shape: VisualShape::Box { size },
            material: Material::from_hex(0x808080),
            shadows: ShadowSettings::both(),
            pose,
        }
    }

    /// Grey 32-segment sphere that casts and receives shadows
    pub fn dynamic_sphere(radius: f32, pose: Pose) -> Self {
        Self {
            shape: VisualShape::Sphere {
                radius,
                segments: 32,
            },
            material: Material::from_hex(0x808080),
            shadows: ShadowSettings::both(),
            pose,
        }
    }

    /// Dark ground slab that only receives shadows
    pub fn ground(size: Vec3, pose: Pose) -> Self {
        Self {
            shape: VisualShape::Box { size },
            material: Material::from_hex(0x404040),
            shadows: ShadowSettings::receive_only(),
            pose,
        }
    }
}

/// Render-side sink for simulation output
pub trait SceneBinding {
    /// Create a visual object and add it to the drawable set
    fn create_visual(&mut self, desc: &VisualDesc) -> VisualHandle;

    /// Write a resolved pose to a visual object
    fn set_pose(&mut self, handle: VisualHandle, pose: Pose);

    /// Remove a visual object from the drawable set
    fn remove_visual(&mut self, handle: VisualHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_presets() {
        let desc = VisualDesc::dynamic_sphere(6.0, Pose::default());
        assert_eq!(
            desc.shape,
            VisualShape::Sphere {
                radius: 6.0,
                segments: 32
            }
        );
        assert!(desc.shadows.cast && desc.shadows.receive);

        let ground = VisualDesc::ground(Vec3::new(100.0, 1.0, 100.0), Pose::default());
        assert!(!ground.shadows.cast);
        assert!(ground.shadows.receive);
        assert_eq!(ground.material, Material::from_hex(0x404040));
    }
}
