//! Error types for the simulation core

use crate::physics::BodyId;
use std::io;

/// Errors that can occur while building or driving the simulation
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// A collision shape was given a non-positive or non-finite dimension
    #[error("invalid {shape} shape: {reason}")]
    InvalidShape {
        /// Shape kind ("box" or "sphere")
        shape: &'static str,
        /// What was wrong with the dimensions
        reason: String,
    },

    /// Mass must be finite and non-negative
    #[error("invalid mass {0}: must be finite and >= 0")]
    InvalidMass(f32),

    /// An operation ran before `SimulationWorld::initialize`
    #[error("simulation world is not initialized (during {operation})")]
    NotInitialized {
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// `initialize` was called twice
    #[error("simulation world is already initialized")]
    AlreadyInitialized,

    /// Elapsed time passed to `step` was negative or not finite
    #[error("invalid time step {0}s")]
    InvalidTimeStep(f32),

    /// A configured body cap was reached
    #[error("body limit of {limit} reached")]
    BodyLimitReached {
        /// The configured cap
        limit: usize,
    },

    /// The id does not name an active body
    #[error("no active body with id {0:?}")]
    UnknownBody(BodyId),

    /// Configuration failed validation
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error while parsing configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimulationError {
    pub(crate) fn invalid_shape(shape: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidShape {
            shape,
            reason: reason.into(),
        }
    }
}

/// Result alias used across the engine
pub type Result<T> = std::result::Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = SimulationError::NotInitialized { operation: "step" };
        assert_eq!(
            err.to_string(),
            "simulation world is not initialized (during step)"
        );

        let err = SimulationError::invalid_shape("box", "size.y = 0 must be > 0");
        assert_eq!(err.to_string(), "invalid box shape: size.y = 0 must be > 0");
    }

    #[test]
    fn test_json_error_converts() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: SimulationError = json_err.into();
        assert!(matches!(err, SimulationError::Json(_)));
    }
}
