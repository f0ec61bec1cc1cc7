//! Distance constraints between bodies or between a body and a fixed point.
//!
//! A constraint with stiffness 1 (or length 0) is a rod or pin; lower
//! stiffness makes a spring. Corrections move `position` and `angle`
//! directly and are also recorded in the body's `constraint_impulse`, which
//! is applied to the geometry in [`post_solve_all`] and partly carried into
//! the next step.

use crate::body::{base_delta, BodyId, RigidBody};
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::observer::BodyObserver;
use crate::sleeping;
use crate::vec::{Vec, Vec2};
use hashbrown::HashMap;

/// Fraction of the constraint impulse kept for the next step.
pub const WARMING: f64 = 0.4;
pub const TORQUE_DAMPEN: f64 = 1.0;
/// Lengths are clamped to this to avoid dividing by zero.
pub const MIN_LENGTH: f64 = 1e-6;

#[derive(Clone, Debug)]
pub struct Constraint<F: Float> {
    /// `None` anchors this end to the world at `point_a`.
    pub body_a: Option<BodyId>,
    pub body_b: Option<BodyId>,
    /// Offset from body A's position (rotating with it), or a world point.
    pub point_a: Vec2<F>,
    pub point_b: Vec2<F>,
    pub length: F,
    pub stiffness: F,
    pub damping: F,
    /// 0 lets the bodies spin freely about the anchors, 1 transfers torque.
    pub angular_stiffness: F,
    angle_a: F,
    angle_b: F,
    index_a: Option<usize>,
    index_b: Option<usize>,
}

impl<F: Float> Constraint<F> {
    /// World-space position of end A.
    pub fn point_a_world(&self, bodies: &[RigidBody<F>]) -> Vec2<F> {
        match self.index_a {
            Some(i) => bodies[i].position + self.point_a,
            None => self.point_a,
        }
    }

    /// World-space position of end B.
    pub fn point_b_world(&self, bodies: &[RigidBody<F>]) -> Vec2<F> {
        match self.index_b {
            Some(i) => bodies[i].position + self.point_b,
            None => self.point_b,
        }
    }

    /// Distance between the two ends right now.
    pub fn current_length(&self, bodies: &[RigidBody<F>]) -> F {
        self.point_a_world(bodies).distance(self.point_b_world(bodies))
    }

    /// True when one end is the world or a static body.
    pub fn is_fixed(&self, bodies: &[RigidBody<F>]) -> bool {
        let fixed = |index: Option<usize>| index.map_or(true, |i| bodies[i].is_static);
        fixed(self.index_a) || fixed(self.index_b)
    }

    pub fn involves(&self, id: BodyId) -> bool {
        self.body_a == Some(id) || self.body_b == Some(id)
    }

    /// Resolve body ids to indices into the world's body list.
    pub(crate) fn bind(&mut self, index: &HashMap<BodyId, usize>) -> Result<()> {
        let lookup = |id: Option<BodyId>| match id {
            Some(id) => index.get(&id).copied().map(Some).ok_or(PhysicsError::UnknownBody(id)),
            None => Ok(None),
        };
        self.index_a = lookup(self.body_a)?;
        self.index_b = lookup(self.body_b)?;
        Ok(())
    }

    /// One Gauss-Seidel pass over this constraint.
    pub fn solve(&mut self, bodies: &mut [RigidBody<F>], time_scale: F) {
        if self.index_a.is_none() && self.index_b.is_none() {
            return;
        }

        // follow the bodies' rotation since the last pass
        if let Some(i) = self.index_a {
            let body = &bodies[i];
            if !body.is_static {
                self.point_a = self.point_a.rotate(body.angle - self.angle_a);
                self.angle_a = body.angle;
            }
        }
        if let Some(i) = self.index_b {
            let body = &bodies[i];
            if !body.is_static {
                self.point_b = self.point_b.rotate(body.angle - self.angle_b);
                self.angle_b = body.angle;
            }
        }

        let delta = self.point_a_world(bodies) - self.point_b_world(bodies);
        let current = delta.length().max(F::from_f64(MIN_LENGTH));

        let difference = (current - self.length) / current;
        let rigid = self.stiffness >= F::one() || self.length == F::zero();
        let stiffness = if rigid {
            self.stiffness * time_scale
        } else {
            self.stiffness * time_scale * time_scale
        };
        let damping = self.damping * time_scale;
        let force = delta.scale(difference * stiffness);

        let inverse_mass = |index: Option<usize>| index.map_or(F::zero(), |i| bodies[i].inverse_mass);
        let inverse_inertia = |index: Option<usize>| index.map_or(F::zero(), |i| bodies[i].inverse_inertia);
        let mass_total = inverse_mass(self.index_a) + inverse_mass(self.index_b);
        let inertia_total = inverse_inertia(self.index_a) + inverse_inertia(self.index_b);
        let resistance_total = mass_total + inertia_total;
        if mass_total == F::zero() {
            return;
        }

        let (normal, normal_velocity) = if damping > F::zero() {
            let velocity = |index: Option<usize>| {
                index.map_or(Vec2::zero(), |i| bodies[i].position - bodies[i].position_prev)
            };
            let normal = delta.scale(F::one() / current);
            let relative = velocity(self.index_b) - velocity(self.index_a);
            (normal, normal.dot(relative))
        } else {
            (Vec2::zero(), F::zero())
        };

        let torque_dampen = F::from_f64(TORQUE_DAMPEN);
        let free = F::one() - self.angular_stiffness;

        if let Some(i) = self.index_a {
            let body = &mut bodies[i];
            if !body.is_static {
                let share = body.inverse_mass / mass_total;
                let correction = force.scale(share);
                body.constraint_impulse -= correction;
                body.position -= correction;
                if damping > F::zero() {
                    body.position_prev -= normal.scale(damping * normal_velocity * share);
                }
                let torque = (self.point_a.cross(force) / resistance_total)
                    * torque_dampen
                    * body.inverse_inertia
                    * free;
                body.constraint_impulse_angle = body.constraint_impulse_angle - torque;
                body.angle = body.angle - torque;
            }
        }

        if let Some(i) = self.index_b {
            let body = &mut bodies[i];
            if !body.is_static {
                let share = body.inverse_mass / mass_total;
                let correction = force.scale(share);
                body.constraint_impulse += correction;
                body.position += correction;
                if damping > F::zero() {
                    body.position_prev += normal.scale(damping * normal_velocity * share);
                }
                let torque = (self.point_b.cross(force) / resistance_total)
                    * torque_dampen
                    * body.inverse_inertia
                    * free;
                body.constraint_impulse_angle = body.constraint_impulse_angle + torque;
                body.angle = body.angle + torque;
            }
        }
    }
}

/// Re-apply last step's warmed impulses to position and angle.
pub fn pre_solve_all<F: Float>(bodies: &mut [RigidBody<F>]) {
    for body in bodies.iter_mut() {
        let impulse = body.constraint_impulse;
        let angle = body.constraint_impulse_angle;
        if body.is_static || (impulse.is_zero() && angle == F::zero()) {
            continue;
        }
        body.position += impulse;
        body.angle = body.angle + angle;
    }
}

/// Solve every constraint once. Constraints with a fixed end go first.
pub fn solve_all<F: Float>(constraints: &mut [Constraint<F>], bodies: &mut [RigidBody<F>], delta: F) {
    let time_scale = (delta / base_delta::<F>()).clamp(F::zero(), F::one());

    for constraint in constraints.iter_mut() {
        if constraint.is_fixed(bodies) {
            constraint.solve(bodies, time_scale);
        }
    }
    for constraint in constraints.iter_mut() {
        if !constraint.is_fixed(bodies) {
            constraint.solve(bodies, time_scale);
        }
    }
}

/// Move geometry by the constraint impulse, waking any body that moved.
pub fn post_solve_all<F: Float, O: BodyObserver<F>>(bodies: &mut [RigidBody<F>], observer: &mut O) {
    let warming = F::from_f64(WARMING);

    for body in bodies.iter_mut() {
        let impulse = body.constraint_impulse;
        let angle = body.constraint_impulse_angle;
        if body.is_static || (impulse.is_zero() && angle == F::zero()) {
            continue;
        }

        sleeping::set(body, false, observer);
        body.transform_parts(impulse, angle);

        body.constraint_impulse = impulse.scale(warming);
        body.constraint_impulse_angle = angle * warming;
    }
}

#[derive(Copy, Clone, Debug)]
struct Anchor<F: Float> {
    id: BodyId,
    position: Vec2<F>,
    angle: F,
}

/// Builds a [`Constraint`], filling in length and stiffness from the
/// bodies' current placement when not given.
///
/// ```
/// use clunk::body::RigidBody;
/// use clunk::constraint::ConstraintBuilder;
/// use clunk::vec::Vec2;
///
/// let bob: RigidBody<f32> = RigidBody::rectangle(0.0, 100.0, 20.0, 20.0);
/// let rope = ConstraintBuilder::new()
///     .world_a(Vec2::new(0.0, 0.0))
///     .body_b(&bob, Vec2::new(0.0, 0.0))
///     .build()
///     .unwrap();
/// assert_eq!(rope.length, 100.0);
/// assert_eq!(rope.stiffness, 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct ConstraintBuilder<F: Float> {
    anchor_a: Option<Anchor<F>>,
    anchor_b: Option<Anchor<F>>,
    point_a: Vec2<F>,
    point_b: Vec2<F>,
    length: Option<F>,
    stiffness: Option<F>,
    damping: F,
    angular_stiffness: F,
}

impl<F: Float> Default for ConstraintBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> ConstraintBuilder<F> {
    pub fn new() -> Self {
        ConstraintBuilder {
            anchor_a: None,
            anchor_b: None,
            point_a: Vec2::zero(),
            point_b: Vec2::zero(),
            length: None,
            stiffness: None,
            damping: F::zero(),
            angular_stiffness: F::zero(),
        }
    }

    /// Attach end A to `body`, `offset` away from its position.
    pub fn body_a(mut self, body: &RigidBody<F>, offset: Vec2<F>) -> Self {
        self.anchor_a = Some(Anchor { id: body.id, position: body.position, angle: body.angle });
        self.point_a = offset;
        self
    }

    pub fn body_b(mut self, body: &RigidBody<F>, offset: Vec2<F>) -> Self {
        self.anchor_b = Some(Anchor { id: body.id, position: body.position, angle: body.angle });
        self.point_b = offset;
        self
    }

    /// Pin end A to a fixed world point.
    pub fn world_a(mut self, point: Vec2<F>) -> Self {
        self.anchor_a = None;
        self.point_a = point;
        self
    }

    pub fn world_b(mut self, point: Vec2<F>) -> Self {
        self.anchor_b = None;
        self.point_b = point;
        self
    }

    pub fn length(mut self, length: F) -> Self {
        self.length = Some(length);
        self
    }

    pub fn stiffness(mut self, stiffness: F) -> Self {
        self.stiffness = Some(stiffness);
        self
    }

    pub fn damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    pub fn angular_stiffness(mut self, angular_stiffness: F) -> Self {
        self.angular_stiffness = angular_stiffness;
        self
    }

    pub fn build(self) -> Result<Constraint<F>> {
        match (self.anchor_a, self.anchor_b) {
            (None, None) => return Err(PhysicsError::UnanchoredConstraint),
            (Some(a), Some(b)) if a.id == b.id => return Err(PhysicsError::SelfConstraint(a.id)),
            _ => {}
        }

        let world = |anchor: Option<Anchor<F>>, point: Vec2<F>| match anchor {
            Some(anchor) => anchor.position + point,
            None => point,
        };
        let initial_a = world(self.anchor_a, self.point_a);
        let initial_b = world(self.anchor_b, self.point_b);
        let length = self.length.unwrap_or_else(|| initial_a.distance(initial_b));
        let stiffness = self.stiffness.unwrap_or_else(|| {
            if length > F::zero() { F::one() } else { F::from_f64(0.7) }
        });

        Ok(Constraint {
            body_a: self.anchor_a.map(|a| a.id),
            body_b: self.anchor_b.map(|b| b.id),
            point_a: self.point_a,
            point_b: self.point_b,
            length,
            stiffness,
            damping: self.damping,
            angular_stiffness: self.angular_stiffness,
            angle_a: self.anchor_a.map_or(F::zero(), |a| a.angle),
            angle_b: self.anchor_b.map_or(F::zero(), |b| b.angle),
            index_a: None,
            index_b: None,
        })
    }
}
