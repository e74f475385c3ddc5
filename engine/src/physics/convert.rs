//! Conversions between glam (scene side) and nalgebra (rapier side)

use crate::core::Pose;
use glam::{Quat, Vec3};
use rapier3d::na::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};

/// glam vector to nalgebra vector
pub fn to_vector(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

/// glam vector to nalgebra point
pub fn to_point(v: Vec3) -> Point3<f32> {
    Point3::new(v.x, v.y, v.z)
}

/// nalgebra vector to glam vector
pub fn from_vector(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// glam quaternion (x, y, z, w) to nalgebra unit quaternion (w, i, j, k).
/// The input is renormalized.
pub fn to_rotation(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

/// nalgebra unit quaternion to glam quaternion
pub fn from_rotation(q: &UnitQuaternion<f32>) -> Quat {
    let c = q.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

/// Pose to rapier isometry
pub fn to_isometry(pose: &Pose) -> Isometry3<f32> {
    Isometry3::from_parts(
        Translation3::new(pose.position.x, pose.position.y, pose.position.z),
        to_rotation(pose.rotation),
    )
}

/// Rapier isometry to pose
pub fn from_isometry(iso: &Isometry3<f32>) -> Pose {
    Pose::new(
        from_vector(&iso.translation.vector),
        from_rotation(&iso.rotation),
    )
}
