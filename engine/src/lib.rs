//! Tumble engine: rigid bodies dropping onto a ground plane
//!
//! This crate wraps rapier into a small simulation core: bodies are built as
//! [`RigidBody`](physics::RigidBody) values, registered with a
//! [`SimulationWorld`](simulation::SimulationWorld) together with a paired
//! visual, and a [`FrameLoop`](frame::FrameLoop) turns frame timestamps into
//! fixed-rate physics steps. After each step every pair's pose is written to
//! a [`SceneBinding`](scene::SceneBinding).

pub mod config;
pub mod core;
pub mod error;
pub mod frame;
pub mod physics;
pub mod scene;
pub mod simulation;

// Re-export commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::Pose;
    pub use crate::error::{Result, SimulationError};

    // Math types
    pub use glam::{Mat4, Quat, Vec3};

    // Config types
    pub use crate::config::{GroundConfig, SimulationConfig, SpawnConfig};

    // Physics types
    pub use crate::physics::{BodyId, CollisionShape, PhysicsMaterial, PhysicsWorld, RigidBody};

    // Scene types
    pub use crate::scene::{EcsScene, SceneBinding, VisualDesc, VisualHandle, VisualShape};

    // Simulation types
    pub use crate::simulation::{
        BodyKind, BodyPair, SimulationWorld, SpawnCommand, SpawnCommandQueue, SpawnReport,
        StepReport,
    };

    // Frame loop types
    pub use crate::frame::{FrameLoop, FrameSource, PacedFrames, SimulatedFrames, TickOutcome};
}

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize logging for the engine
pub fn init_logging() {
    init_logging_with(DEFAULT_LOG_FILTER);
}

/// Initialize logging, falling back to `default_filter` when `RUST_LOG` is unset.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging_with(default_filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
