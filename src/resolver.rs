//! Sequential-impulse contact solver.
//!
//! Positions are corrected first by pushing overlapping bodies apart through
//! `position_impulse`. Velocities are then corrected by editing position
//! history: an impulse `j` on a body becomes `position_prev -= j / m`, which
//! is the same as adding `j / m` to its velocity.

use crate::body::{base_delta, RigidBody};
use crate::float::Float;
use crate::pair::Pair;
use crate::vec::{Vec, Vec2};

/// Normal velocity (per base delta) below which a contact counts as an
/// impact and its cached impulse is dropped.
pub const RESTING_THRESHOLD: f64 = 2.0;
/// Tangent speed above which cached friction is dropped.
pub const RESTING_THRESHOLD_TANGENT: f64 = 2.449_489_7;
pub const POSITION_DAMPEN: f64 = 0.9;
/// Fraction of the position impulse kept for the next step.
pub const POSITION_WARMING: f64 = 0.8;
pub const FRICTION_NORMAL_MULTIPLIER: f64 = 5.0;

fn solvable<F: Float>(pair: &Pair<F>) -> bool {
    pair.is_active && !pair.is_sensor && pair.part_a.body != pair.part_b.body
}

/// Count active contacts per body.
pub fn pre_solve_position<F: Float>(pairs: &[Pair<F>], bodies: &mut [RigidBody<F>]) {
    for pair in pairs.iter().filter(|p| p.is_active) {
        let count = pair.active_contacts.len();
        bodies[pair.part_a.body].total_contacts += count;
        bodies[pair.part_b.body].total_contacts += count;
    }
}

/// One pass of position correction.
///
/// `damping` scales the correction; the engine derives it from the
/// iteration count so more passes each push less.
pub fn solve_position<F: Float>(pairs: &mut [Pair<F>], bodies: &mut [RigidBody<F>], delta: F, damping: F) {
    let dampen = F::from_f64(POSITION_DAMPEN) * damping;
    let slop_dampen = (delta / base_delta::<F>()).clamp(F::zero(), F::one());

    for pair in pairs.iter_mut().filter(|p| solvable(p)) {
        let body_a = &bodies[pair.part_a.body];
        let body_b = &bodies[pair.part_b.body];
        let collision = &pair.collision;
        pair.separation = collision.depth
            + collision.normal.dot(body_a.position_impulse - body_b.position_impulse);
    }

    for pair in pairs.iter().filter(|p| solvable(p)) {
        let (a, b) = (pair.part_a.body, pair.part_b.body);
        let normal = pair.collision.normal;
        let mut impulse = pair.separation - pair.slop * slop_dampen;
        if bodies[a].is_static || bodies[b].is_static {
            impulse = impulse * F::two();
        }

        let body_a = &mut bodies[a];
        if !body_a.is_inactive() {
            let share = dampen / F::from_usize(body_a.total_contacts.max(1));
            body_a.position_impulse -= normal.scale(impulse * share);
        }

        let body_b = &mut bodies[b];
        if !body_b.is_inactive() {
            let share = dampen / F::from_usize(body_b.total_contacts.max(1));
            body_b.position_impulse += normal.scale(impulse * share);
        }
    }
}

/// Move geometry by the accumulated position impulse and keep part of it
/// for warm starting.
pub fn post_solve_position<F: Float>(bodies: &mut [RigidBody<F>]) {
    let warming = F::from_f64(POSITION_WARMING);

    for body in bodies.iter_mut() {
        body.total_contacts = 0;
        let impulse = body.position_impulse;
        if impulse.is_zero() {
            continue;
        }

        body.position = body.position + impulse;
        body.position_prev = body.position_prev + impulse;
        body.transform_parts(impulse, F::zero());

        // an impulse along the velocity would only add energy next step
        if impulse.dot(body.velocity) < F::zero() {
            body.position_impulse = Vec2::zero();
        } else {
            body.position_impulse = impulse.scale(warming);
        }
    }
}

/// Re-apply last step's contact impulses.
pub fn pre_solve_velocity<F: Float>(pairs: &[Pair<F>], bodies: &mut [RigidBody<F>]) {
    for pair in pairs.iter().filter(|p| solvable(p)) {
        let (a, b) = (pair.part_a.body, pair.part_b.body);
        let normal = pair.collision.normal;
        let tangent = pair.collision.tangent;

        for contact in pair.active() {
            if contact.normal_impulse == F::zero() && contact.tangent_impulse == F::zero() {
                continue;
            }
            let point = contact.vertex.point(bodies);
            let impulse = normal.scale(contact.normal_impulse) + tangent.scale(contact.tangent_impulse);
            apply_impulse(bodies, a, b, point, impulse);
        }
    }
}

/// One pass of velocity correction with friction and restitution.
pub fn solve_velocity<F: Float>(pairs: &mut [Pair<F>], bodies: &mut [RigidBody<F>], delta: F) {
    let time_scale = delta / base_delta::<F>();
    let time_scale_cubed = time_scale * time_scale * time_scale;
    let resting = -F::from_f64(RESTING_THRESHOLD) * time_scale;
    let resting_tangent = F::from_f64(RESTING_THRESHOLD_TANGENT);
    let friction_multiplier = F::from_f64(FRICTION_NORMAL_MULTIPLIER) * time_scale;
    let max_static = F::max_value() * time_scale;

    for pair in pairs.iter_mut().filter(|p| solvable(p)) {
        let (a, b) = (pair.part_a.body, pair.part_b.body);
        let normal = pair.collision.normal;
        let tangent = pair.collision.tangent;
        let count = pair.active_contacts.len();
        if count == 0 {
            continue;
        }
        let contact_share = F::one() / F::from_usize(count);
        let inverse_mass_total = bodies[a].inverse_mass + bodies[b].inverse_mass;
        let friction = pair.friction * pair.friction_static * friction_multiplier;

        for body in [a, b] {
            let body = &mut bodies[body];
            body.velocity = body.position - body.position_prev;
            body.angular_velocity = body.angle - body.angle_prev;
        }

        for n in 0..count {
            let id = pair.active_contacts[n];
            let Some(contact) = pair.contacts.get_mut(&id) else {
                continue;
            };
            let point = contact.vertex.point(bodies);
            let body_a = &bodies[a];
            let body_b = &bodies[b];

            let offset_a = point - body_a.position;
            let offset_b = point - body_b.position;
            let velocity_a = body_a.velocity + offset_a.perp().scale(body_a.angular_velocity);
            let velocity_b = body_b.velocity + offset_b.perp().scale(body_b.angular_velocity);
            let relative = velocity_b - velocity_a;
            let normal_velocity = normal.dot(relative);
            let tangent_velocity = tangent.dot(relative);

            // coulomb friction
            let normal_overlap = pair.separation + normal_velocity;
            let normal_force = if normal_overlap < F::zero() {
                F::zero()
            } else {
                normal_overlap.min(F::one())
            };
            let friction_limit = normal_force * friction;

            let (mut tangent_impulse, max_friction) =
                if tangent_velocity < -friction_limit || tangent_velocity > friction_limit {
                    let max_friction = tangent_velocity.abs();
                    let impulse = (pair.friction * tangent_velocity.sign() * time_scale_cubed)
                        .clamp(-max_friction, max_friction);
                    (impulse, max_friction)
                } else {
                    (tangent_velocity, max_static)
                };

            let arm_a = offset_a.cross(normal);
            let arm_b = offset_b.cross(normal);
            let share = contact_share
                / (inverse_mass_total
                    + body_a.inverse_inertia * arm_a * arm_a
                    + body_b.inverse_inertia * arm_b * arm_b);

            let mut normal_impulse = (F::one() + pair.restitution) * normal_velocity * share;
            tangent_impulse = tangent_impulse * share;

            if normal_velocity < resting {
                contact.normal_impulse = F::zero();
            } else {
                // accumulate and clamp so the total never pulls bodies together
                let cached = contact.normal_impulse;
                contact.normal_impulse = (contact.normal_impulse + normal_impulse).min(F::zero());
                normal_impulse = contact.normal_impulse - cached;
            }

            if tangent_velocity < -resting_tangent || tangent_velocity > resting_tangent {
                contact.tangent_impulse = F::zero();
            } else {
                let cached = contact.tangent_impulse;
                contact.tangent_impulse =
                    (contact.tangent_impulse + tangent_impulse).clamp(-max_friction, max_friction);
                tangent_impulse = contact.tangent_impulse - cached;
            }

            let impulse = normal.scale(normal_impulse) + tangent.scale(tangent_impulse);
            apply_impulse(bodies, a, b, point, impulse);
        }
    }
}

/// Push `impulse` out of A and into B at `point` through position history.
fn apply_impulse<F: Float>(bodies: &mut [RigidBody<F>], a: usize, b: usize, point: Vec2<F>, impulse: Vec2<F>) {
    let body_a = &mut bodies[a];
    if !body_a.is_inactive() {
        let offset = point - body_a.position;
        body_a.position_prev -= impulse.scale(body_a.inverse_mass);
        body_a.angle_prev = body_a.angle_prev - body_a.inverse_inertia * offset.cross(impulse);
    }

    let body_b = &mut bodies[b];
    if !body_b.is_inactive() {
        let offset = point - body_b.position;
        body_b.position_prev += impulse.scale(body_b.inverse_mass);
        body_b.angle_prev = body_b.angle_prev + body_b.inverse_inertia * offset.cross(impulse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{collides, PartRef};
    use crate::pairs::Pairs;
    use alloc::vec;
    use alloc::vec::Vec as AllocVec;

    fn scene(overlap: f64) -> (AllocVec<RigidBody<f64>>, Pairs<f64>) {
        let mut bodies = vec![
            RigidBody::rectangle(0.0, 0.0, 100.0, 20.0).with_static(true),
            RigidBody::rectangle(0.0, -20.0 + overlap, 20.0, 20.0),
        ];
        let mut next = 1;
        for b in bodies.iter_mut() {
            b.assign_ids(&mut next);
        }
        let mut pairs = Pairs::new();
        let collision = collides(&bodies, PartRef::new(&bodies, 0, 0), PartRef::new(&bodies, 1, 0), None);
        let collisions: AllocVec<_> = collision.into_iter().collect();
        pairs.update(&collisions, &bodies, 0.0);
        (bodies, pairs)
    }

    #[test]
    fn position_pass_pushes_body_out() {
        let (mut bodies, mut pairs) = scene(2.0);
        let delta = base_delta::<f64>();
        let y0 = bodies[1].position.y;
        pre_solve_position(pairs.list(), &mut bodies);
        assert_eq!(bodies[1].total_contacts, 2);
        for _ in 0..6 {
            solve_position(pairs.list_mut(), &mut bodies, delta, 1.0);
        }
        post_solve_position(&mut bodies);
        assert!(bodies[1].position.y < y0);
        assert_eq!(bodies[0].position.y, 0.0);
        assert_eq!(bodies[1].total_contacts, 0);
        assert_eq!(bodies[1].parts[0].position, bodies[1].position);
    }

    #[test]
    fn velocity_pass_stops_approach() {
        let (mut bodies, mut pairs) = scene(0.5);
        let delta = base_delta::<f64>();
        // falling onto the floor (y down is +y)
        bodies[1].position_prev.y -= 1.0;
        for _ in 0..10 {
            solve_velocity(pairs.list_mut(), &mut bodies, delta);
        }
        let v = bodies[1].position.y - bodies[1].position_prev.y;
        assert!(v < 1e-3, "still approaching: {}", v);
        let pair = pairs.iter().next().unwrap();
        assert!(pair.active().all(|c| c.normal_impulse <= 0.0));
    }

    #[test]
    fn warm_start_reapplies_cached_impulse() {
        let (mut bodies, mut pairs) = scene(0.5);
        for pair in pairs.list_mut() {
            for contact in pair.contacts.values_mut() {
                contact.normal_impulse = -0.01;
            }
        }
        let prev = bodies[1].position_prev;
        pre_solve_velocity(pairs.list(), &mut bodies);
        // normal points from the floor to the box, so the box is pushed away
        assert!(bodies[1].position_prev.y > prev.y);
    }
}
