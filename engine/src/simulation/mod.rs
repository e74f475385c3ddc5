//! Simulation orchestration
//!
//! [`SimulationWorld`] ties the physics world to a [`SceneBinding`](crate::scene::SceneBinding):
//! it owns the ground, the active body/visual pairs and the spawn RNG, and
//! pushes resolved poses to the scene after every step.

pub mod commands;
pub mod spawn;
pub mod world;

pub use crate::physics::BodyId;
pub use commands::{SpawnCommand, SpawnCommandQueue};
pub use spawn::{sample_body, BodyKind, SpawnReport};
pub use world::{BodyPair, SimulationWorld, StepReport};
