//! Configuration types for the engine.

use crate::float::Float;
use crate::vec::Vec2;

/// Configuration for the solver and the step.
///
/// # Builder Pattern
/// ```
/// use clunk::config::EngineConfig;
/// use clunk::vec::Vec2;
///
/// let config: EngineConfig<f32> = EngineConfig::new()
///     .with_position_iterations(8)
///     .with_gravity(Vec2::new(0.0, 1.0))
///     .with_sleeping(true);
/// ```
#[derive(Clone, Debug)]
pub struct EngineConfig<F: Float> {
    /// Position solver passes per step. Default: 6.
    pub position_iterations: usize,
    /// Velocity solver passes per step. Default: 4.
    pub velocity_iterations: usize,
    /// Constraint solver passes per constraint phase. Default: 2.
    pub constraint_iterations: usize,
    /// Gravity direction and strength. Default: (0, 1), i.e. down on a
    /// y-down screen.
    pub gravity: Vec2<F>,
    /// Multiplier applied to gravity. Default: 0.001.
    pub gravity_scale: F,
    /// Let calm bodies fall asleep. Default: false.
    pub enable_sleeping: bool,
    /// Scales every delta passed to `update`. 0 freezes, 0.5 is slow
    /// motion. Default: 1.
    pub time_scale: F,
}

impl<F: Float> EngineConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        EngineConfig {
            position_iterations: 6,
            velocity_iterations: 4,
            constraint_iterations: 2,
            gravity: Vec2::new(F::zero(), F::one()),
            gravity_scale: F::from_f64(0.001),
            enable_sleeping: false,
            time_scale: F::one(),
        }
    }

    pub fn with_position_iterations(mut self, iterations: usize) -> Self {
        self.position_iterations = iterations.max(1);
        self
    }

    pub fn with_velocity_iterations(mut self, iterations: usize) -> Self {
        self.velocity_iterations = iterations.max(1);
        self
    }

    pub fn with_constraint_iterations(mut self, iterations: usize) -> Self {
        self.constraint_iterations = iterations.max(1);
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_gravity_scale(mut self, scale: F) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_sleeping(mut self, enabled: bool) -> Self {
        self.enable_sleeping = enabled;
        self
    }

    pub fn with_time_scale(mut self, time_scale: F) -> Self {
        self.time_scale = time_scale;
        self
    }
}

impl<F: Float> Default for EngineConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterations_never_drop_to_zero() {
        let config: EngineConfig<f32> = EngineConfig::new()
            .with_position_iterations(0)
            .with_velocity_iterations(0)
            .with_constraint_iterations(0);
        assert_eq!(config.position_iterations, 1);
        assert_eq!(config.velocity_iterations, 1);
        assert_eq!(config.constraint_iterations, 1);
    }

    #[test]
    fn defaults() {
        let config: EngineConfig<f64> = EngineConfig::default();
        assert_eq!(config.position_iterations, 6);
        assert_eq!(config.velocity_iterations, 4);
        assert_eq!(config.constraint_iterations, 2);
        assert!(!config.enable_sleeping);
        assert_eq!(config.gravity, Vec2::new(0.0, 1.0));
    }
}
