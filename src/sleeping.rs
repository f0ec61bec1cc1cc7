//! Motion-based sleeping.
//!
//! A body whose smoothed motion stays under [`MOTION_SLEEP_THRESHOLD`] for
//! `sleep_threshold` steps falls asleep. Sleeping bodies are skipped by
//! integration and the solver until a force or a moving contact wakes them.

use crate::body::{base_delta, RigidBody};
use crate::float::Float;
use crate::observer::BodyObserver;
use crate::pair::Pair;
use crate::vec::{Vec, Vec2};
use log::debug;

/// Smoothed motion below which a body counts as calm.
pub const MOTION_SLEEP_THRESHOLD: f64 = 0.08;
/// Motion that wakes a body directly.
pub const MOTION_WAKE_THRESHOLD: f64 = 0.18;
/// Weight given to the smaller of the old and new motion when blending.
pub const MIN_BIAS: f64 = 0.9;

/// Advance every body's sleep counter. Call once per step before gravity.
pub fn update<F: Float, O: BodyObserver<F>>(bodies: &mut [RigidBody<F>], delta: F, observer: &mut O) {
    let time_scale = delta / base_delta::<F>();
    let sleep_threshold = F::from_f64(MOTION_SLEEP_THRESHOLD);
    let bias = F::from_f64(MIN_BIAS);

    for body in bodies.iter_mut() {
        if body.is_static {
            continue;
        }

        if !body.force.is_zero() {
            set(body, false, observer);
            continue;
        }

        let motion = body.speed * body.speed + body.angular_speed * body.angular_speed;
        let min_motion = body.motion.min(motion);
        let max_motion = body.motion.max(motion);
        body.motion = bias * min_motion + (F::one() - bias) * max_motion;

        if body.sleep_threshold > F::zero() && body.motion < sleep_threshold {
            body.sleep_counter = body.sleep_counter + F::one();
            if body.sleep_counter >= body.sleep_threshold / time_scale {
                set(body, true, observer);
            }
        } else if body.sleep_counter > F::zero() {
            body.sleep_counter = body.sleep_counter - F::one();
        }
    }
}

/// Wake sleeping bodies touched by a moving, awake, dynamic body.
pub fn after_collisions<F: Float, O: BodyObserver<F>>(
    pairs: &[Pair<F>],
    bodies: &mut [RigidBody<F>],
    observer: &mut O,
) {
    let sleep_threshold = F::from_f64(MOTION_SLEEP_THRESHOLD);

    for pair in pairs {
        if !pair.is_active {
            continue;
        }
        let (a, b) = (pair.part_a.body, pair.part_b.body);
        if a == b {
            continue;
        }
        let (body_a, body_b) = (&bodies[a], &bodies[b]);
        if (body_a.is_sleeping && body_b.is_sleeping) || body_a.is_static || body_b.is_static {
            continue;
        }
        if !(body_a.is_sleeping || body_b.is_sleeping) {
            continue;
        }

        let (sleeping, moving) = if body_a.is_sleeping { (a, b) } else { (b, a) };
        if bodies[moving].motion > sleep_threshold {
            set(&mut bodies[sleeping], false, observer);
        }
    }
}

/// Put a body to sleep or wake it. Returns true if the state changed.
pub fn set<F: Float, O: BodyObserver<F>>(body: &mut RigidBody<F>, sleeping: bool, observer: &mut O) -> bool {
    let was_sleeping = body.is_sleeping;

    if sleeping {
        body.is_sleeping = true;
        body.sleep_counter = body.sleep_threshold;

        body.position_impulse = Vec2::zero();
        body.position_prev = body.position;
        body.angle_prev = body.angle;
        body.velocity = Vec2::zero();
        body.angular_velocity = F::zero();
        body.speed = F::zero();
        body.angular_speed = F::zero();
        body.motion = F::zero();

        if !was_sleeping {
            debug!("body {} fell asleep", body.id);
            observer.on_sleep_start(body);
        }
    } else {
        body.is_sleeping = false;
        body.sleep_counter = F::zero();

        if was_sleeping {
            debug!("body {} woke up", body.id);
            observer.on_sleep_end(body);
        }
    }

    was_sleeping != sleeping
}
