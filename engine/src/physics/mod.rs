//! Physics layer built on Rapier
//!
//! Rigid body construction, the Rapier world wrapper, glam/nalgebra conversion
//! and the fixed timestep accumulator used for sub-stepping.

pub mod accumulator;
pub mod body;
pub mod components;
pub mod convert;
pub mod world;

// Re-export commonly used types
pub use accumulator::{PhysicsAccumulator, SubSteps};
pub use body::{BodyDesc, RigidBody, DEFAULT_SOFT_CCD_PREDICTION};
pub use components::{CollisionShape, PhysicsMaterial};
pub use world::{BodyId, PhysicsWorld};
