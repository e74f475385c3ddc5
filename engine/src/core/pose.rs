//! World-space pose (position + orientation)

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Resolved position and orientation of a body or visual in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in world space
    pub position: Vec3,
    /// Orientation as a unit quaternion
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// Create a pose from position and rotation
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create an unrotated pose at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Compare two poses within a tolerance on both position and orientation.
    ///
    /// `q` and `-q` describe the same rotation, so orientation is compared via
    /// the absolute dot product.
    pub fn approx_eq(&self, other: &Pose, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && (1.0 - self.rotation.dot(other.rotation).abs()) <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_treats_negated_quaternion_as_equal() {
        let rotation = Quat::from_rotation_y(0.7);
        let a = Pose::new(Vec3::new(1.0, 2.0, 3.0), rotation);
        let b = Pose::new(Vec3::new(1.0, 2.0, 3.0), -rotation);
        assert!(a.approx_eq(&b, 1e-6));
    }

    #[test]
    fn test_approx_eq_detects_translation() {
        let a = Pose::from_position(Vec3::ZERO);
        let b = Pose::from_position(Vec3::new(0.0, 0.01, 0.0));
        assert!(!a.approx_eq(&b, 1e-3));
        assert!(a.approx_eq(&b, 0.1));
    }
}
