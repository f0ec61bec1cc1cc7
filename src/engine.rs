//! The per-step orchestrator.

use crate::body::{base_delta, RigidBody};
use crate::config::EngineConfig;
use crate::constraint;
use crate::detector::Detector;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::pair::{Pair, PairId};
use crate::pairs::Pairs;
use crate::resolver;
use crate::sleeping;
use crate::world::World;
use alloc::vec::Vec as AllocVec;
use log::{trace, warn};

/// Simulation clock.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Timing<F: Float> {
    /// Total simulated milliseconds.
    pub timestamp: F,
    /// The scaled delta of the last update.
    pub last_delta: F,
}

/// Runs a [`World`] forward in time.
///
/// ```
/// use clunk::{Engine, NoOpStepObserver, RigidBody};
///
/// let mut engine: Engine<f32> = Engine::default();
/// let floor = engine.world_mut().add_body(RigidBody::rectangle(400.0, 600.0, 800.0, 50.0).with_static(true));
/// let crate_id = engine.world_mut().add_body(RigidBody::rectangle(400.0, 200.0, 50.0, 50.0));
///
/// for _ in 0..60 {
///     engine.update(1000.0 / 60.0, &mut NoOpStepObserver);
/// }
/// assert!(engine.world().body(crate_id).unwrap().position.y > 200.0);
/// assert_eq!(engine.world().body(floor).unwrap().position.y, 600.0);
/// ```
#[derive(Clone, Debug)]
pub struct Engine<F: Float> {
    pub config: EngineConfig<F>,
    world: World<F>,
    pairs: Pairs<F>,
    detector: Detector<F>,
    timing: Timing<F>,
    warned_delta: bool,
}

impl<F: Float> Default for Engine<F> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<F: Float> Engine<F> {
    pub fn new(config: EngineConfig<F>) -> Self {
        Engine {
            config,
            world: World::new(),
            pairs: Pairs::new(),
            detector: Detector::new(),
            timing: Timing::default(),
            warned_delta: false,
        }
    }

    pub fn with_world(config: EngineConfig<F>, world: World<F>) -> Self {
        let mut engine = Self::new(config);
        engine.world = world;
        engine.world.set_modified(true);
        engine
    }

    pub fn world(&self) -> &World<F> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<F> {
        &mut self.world
    }

    pub fn pairs(&self) -> &Pairs<F> {
        &self.pairs
    }

    pub fn timing(&self) -> &Timing<F> {
        &self.timing
    }

    /// Forget every tracked pair and the broad phase state. Bodies keep
    /// their positions.
    pub fn clear(&mut self) {
        self.pairs.clear();
        self.detector.clear();
        self.detector.set_bodies(self.world.bodies());
    }

    /// Advance the simulation by `delta` milliseconds.
    ///
    /// Deltas above 1000/60 work but lose stability; keep them at or below
    /// it and call `update` more often instead.
    pub fn update<O: StepObserver<F>>(&mut self, delta: F, observer: &mut O) {
        let delta = delta * self.config.time_scale;
        if delta > base_delta::<F>() && !self.warned_delta {
            warn!(
                "update: delta {:?} is above the recommended {:?} ms",
                delta,
                base_delta::<F>()
            );
            self.warned_delta = true;
        }

        self.timing.timestamp = self.timing.timestamp + delta;
        self.timing.last_delta = delta;
        let timestamp = self.timing.timestamp;
        observer.before_update(timestamp);

        if self.world.is_modified() {
            self.detector.set_bodies(self.world.bodies());
            self.pairs.retain_bodies(self.world.bodies());
            self.world.set_modified(false);
        }

        let config = &self.config;
        let (bodies, constraints) = self.world.split_mut();

        if config.enable_sleeping {
            sleeping::update(bodies, delta, observer);
        }

        apply_gravity(bodies, config);

        if delta > F::zero() {
            for body in bodies.iter_mut().filter(|b| !b.is_inactive()) {
                body.update(delta);
            }
        }

        observer.before_solve(timestamp);

        constraint::pre_solve_all(bodies);
        for _ in 0..config.constraint_iterations {
            constraint::solve_all(constraints, bodies, delta);
        }
        constraint::post_solve_all(bodies, observer);

        let collisions = self.detector.collisions(bodies, Some(&self.pairs));
        trace!("update: {} collision(s)", collisions.len());
        self.pairs.update(collisions, bodies, timestamp);

        if config.enable_sleeping {
            sleeping::after_collisions(self.pairs.list(), bodies, observer);
        }

        if !self.pairs.collision_start.is_empty() {
            observer.on_collision_start(&resolve(&self.pairs, &self.pairs.collision_start));
        }

        let position_damping = (F::from_f64(20.0) / F::from_usize(config.position_iterations))
            .clamp(F::zero(), F::one());
        resolver::pre_solve_position(self.pairs.list(), bodies);
        for _ in 0..config.position_iterations {
            resolver::solve_position(self.pairs.list_mut(), bodies, delta, position_damping);
        }
        resolver::post_solve_position(bodies);

        constraint::pre_solve_all(bodies);
        for _ in 0..config.constraint_iterations {
            constraint::solve_all(constraints, bodies, delta);
        }
        constraint::post_solve_all(bodies, observer);

        resolver::pre_solve_velocity(self.pairs.list(), bodies);
        for _ in 0..config.velocity_iterations {
            resolver::solve_velocity(self.pairs.list_mut(), bodies, delta);
        }

        for body in bodies.iter_mut() {
            body.update_velocities();
        }

        trace!(
            "update: {} pair(s), {} active",
            self.pairs.len(),
            self.pairs.collision_active.len()
        );
        if !self.pairs.collision_active.is_empty() {
            observer.on_collision_active(&resolve(&self.pairs, &self.pairs.collision_active));
        }
        if !self.pairs.collision_end.is_empty() {
            observer.on_collision_end(&resolve(&self.pairs, &self.pairs.collision_end));
        }

        for body in bodies.iter_mut() {
            body.clear_forces();
        }

        observer.after_update(timestamp);
    }
}

fn apply_gravity<F: Float>(bodies: &mut [RigidBody<F>], config: &EngineConfig<F>) {
    let gravity = config.gravity;
    let scale = config.gravity_scale;
    if gravity.is_zero() || scale == F::zero() {
        return;
    }
    for body in bodies.iter_mut().filter(|b| !b.is_inactive()) {
        body.force.x = body.force.x + body.mass * gravity.x * scale;
        body.force.y = body.force.y + body.mass * gravity.y * scale;
    }
}

fn resolve<'a, F: Float>(pairs: &'a Pairs<F>, ids: &[PairId]) -> AllocVec<&'a Pair<F>> {
    ids.iter().filter_map(|id| pairs.lookup(id)).collect()
}
