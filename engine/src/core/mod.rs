//! Core value types shared by the physics and scene sides

pub mod pose;

pub use pose::Pose;
