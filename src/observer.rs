//! Observer traits for engine, body and collision events.

use crate::body::RigidBody;
use crate::float::Float;
use crate::pair::Pair;

/// Body state changes. All methods default to no-ops.
pub trait BodyObserver<F: Float> {
    /// A body fell asleep.
    fn on_sleep_start(&mut self, _body: &RigidBody<F>) {}

    /// A body woke up.
    fn on_sleep_end(&mut self, _body: &RigidBody<F>) {}
}

/// Contact events, batched per step. All methods default to no-ops.
pub trait CollisionObserver<F: Float> {
    /// Pairs that started touching this step.
    fn on_collision_start(&mut self, _pairs: &[&Pair<F>]) {}

    /// Pairs that were touching and still are.
    fn on_collision_active(&mut self, _pairs: &[&Pair<F>]) {}

    /// Pairs that stopped touching this step.
    fn on_collision_end(&mut self, _pairs: &[&Pair<F>]) {}
}

/// Trait for observing engine steps.
///
/// Implement this trait to hook into an update, e.g. for debugging,
/// rendering or game logic. All methods have default no-op implementations.
pub trait StepObserver<F: Float>: BodyObserver<F> + CollisionObserver<F> {
    /// Called at the start of an update, before anything moves.
    fn before_update(&mut self, _timestamp: F) {}

    /// Called after integration, before constraints and contacts are solved.
    fn before_solve(&mut self, _timestamp: F) {}

    /// Called when an update is fully complete.
    fn after_update(&mut self, _timestamp: F) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl<F: Float> BodyObserver<F> for NoOpStepObserver {}
impl<F: Float> CollisionObserver<F> for NoOpStepObserver {}
impl<F: Float> StepObserver<F> for NoOpStepObserver {}
