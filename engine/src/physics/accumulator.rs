//! Fixed timestep accumulator for physics sub-stepping
//!
//! Variable frame time is accumulated and consumed in whole fixed steps. The
//! number of sub-steps per call is capped; time beyond the cap is dropped.

use tracing::warn;

/// Result of feeding elapsed time into the accumulator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubSteps {
    /// Number of fixed steps to run now
    pub steps: u32,
    /// Seconds discarded because the sub-step cap was hit
    pub dropped: f32,
}

/// Accumulator for managing fixed timestep updates
#[derive(Debug, Clone)]
pub struct PhysicsAccumulator {
    /// Accumulated time not yet consumed by a fixed step
    accumulator: f32,
    /// Fixed timestep for physics updates
    pub fixed_timestep: f32,
    /// Upper bound on steps per `accumulate` call
    pub max_substeps: u32,
}

impl PhysicsAccumulator {
    /// Create a new accumulator with the given fixed timestep and sub-step cap
    pub fn new(fixed_timestep: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            fixed_timestep,
            max_substeps: max_substeps.max(1),
        }
    }

    /// Add elapsed time and return how many fixed steps to perform
    pub fn accumulate(&mut self, delta_time: f32) -> SubSteps {
        self.accumulator += delta_time;

        let owed = (self.accumulator / self.fixed_timestep).floor();

        // Prevent the spiral of death: never owe more than max_substeps.
        // Only the sub-step remainder survives, so huge gaps cannot linger.
        if owed > self.max_substeps as f32 {
            let remainder = self.accumulator % self.fixed_timestep;
            let dropped = (self.accumulator
                - remainder
                - self.max_substeps as f32 * self.fixed_timestep)
                .max(0.0);
            warn!(
                "Physics fell {:.4}s behind; running {} sub-steps and dropping the rest",
                self.accumulator, self.max_substeps
            );
            self.accumulator = remainder;
            return SubSteps {
                steps: self.max_substeps,
                dropped,
            };
        }

        let steps = owed as u32;
        self.accumulator -= steps as f32 * self.fixed_timestep;
        // Float error may leave a residue just outside [0, fixed_timestep)
        self.accumulator = self.accumulator.clamp(0.0, self.fixed_timestep);

        SubSteps {
            steps,
            dropped: 0.0,
        }
    }

    /// Interpolation alpha in [0, 1): how far between fixed steps we are
    pub fn interpolation_alpha(&self) -> f32 {
        self.accumulator / self.fixed_timestep
    }

    /// Reset the accumulator to zero
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Get the current accumulated time
    pub fn accumulated_time(&self) -> f32 {
        self.accumulator
    }
}

impl Default for PhysicsAccumulator {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 10)
    }
}
