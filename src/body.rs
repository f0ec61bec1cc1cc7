//! Rigid bodies: geometry, mass properties and Verlet state.
//!
//! A body's velocity is never integrated on its own. The integrator state is
//! the pair (`position`, `position_prev`) and (`angle`, `angle_prev`);
//! velocity is always `position - position_prev`. The `velocity` and
//! `angular_velocity` fields are caches refreshed from that history.

use crate::bounds::Bounds;
use crate::error::{PhysicsError, Result};
use crate::filter::CollisionFilter;
use crate::float::Float;
use crate::vec::{Vec, Vec2};
use crate::vertices;
use alloc::vec::Vec as AllocVec;
use core::fmt;

/// Length of one reference step in milliseconds (60 Hz).
///
/// Thresholds that depend on the step size are tuned for this delta and
/// scaled by `delta / BASE_DELTA`.
pub const BASE_DELTA: f64 = 1000.0 / 60.0;

/// Multiplier applied to polygon inertia. Stiffer rotation gives more
/// stable stacks.
pub const INERTIA_SCALE: f64 = 4.0;

pub(crate) fn base_delta<F: Float>() -> F {
    F::from_f64(BASE_DELTA)
}

/// Stable identity of a body or of one of its parts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One convex piece of a body.
///
/// `parts[0]` of every body is the body's own hull. Compound bodies list
/// their convex pieces after it; collisions are detected between pieces.
#[derive(Clone, Debug)]
pub struct Part<F: Float> {
    pub id: BodyId,
    /// Centroid. For part 0 this mirrors the body position outside of a
    /// solver pass.
    pub position: Vec2<F>,
    /// World-space polygon, wound with positive area.
    pub vertices: AllocVec<Vec2<F>>,
    /// Unit separating axes, rotated with the body.
    pub axes: AllocVec<Vec2<F>>,
    pub bounds: Bounds<F>,
    pub area: F,
    pub mass: F,
    pub inertia: F,
}

impl<F: Float> Part<F> {
    /// Build a part from a polygon in any frame and winding, re-centred on
    /// its centroid at `position`.
    pub fn new(points: &[Vec2<F>], position: Vec2<F>, density: F) -> Result<Self> {
        if points.is_empty() {
            return Err(PhysicsError::EmptyVertices);
        }
        Ok(Self::from_points(points.to_vec(), position, density))
    }

    fn from_points(mut points: AllocVec<Vec2<F>>, position: Vec2<F>, density: F) -> Self {
        vertices::wind_positive(&mut points);
        let centre = vertices::centre(&points);
        vertices::translate(&mut points, -centre);

        let area = vertices::area(&points, false);
        let mass = density * area;
        let inertia = F::from_f64(INERTIA_SCALE) * vertices::inertia(&points, mass);

        vertices::translate(&mut points, position);
        let axes = vertices::axes(&points);
        let bounds = Bounds::from_vertices(&points);

        Part {
            id: BodyId::default(),
            position,
            vertices: points,
            axes,
            bounds,
            area,
            mass,
            inertia,
        }
    }

    fn translate(&mut self, delta: Vec2<F>) {
        vertices::translate(&mut self.vertices, delta);
        self.position = self.position + delta;
    }

    fn rotate_about(&mut self, angle: F, point: Vec2<F>) {
        if angle == F::zero() {
            return;
        }
        vertices::rotate(&mut self.vertices, angle, point);
        vertices::rotate_axes(&mut self.axes, angle);
        self.position = self.position.rotate_about(angle, point);
    }
}

/// Properties a body had before it was made static.
#[derive(Copy, Clone, Debug)]
struct DynamicProperties<F: Float> {
    friction: F,
    restitution: F,
    mass: F,
    inertia: F,
    density: F,
}

/// A rigid convex (or compound convex) polygon.
#[derive(Clone, Debug)]
pub struct RigidBody<F: Float> {
    pub id: BodyId,
    pub parts: AllocVec<Part<F>>,

    pub position: Vec2<F>,
    pub position_prev: Vec2<F>,
    pub angle: F,
    pub angle_prev: F,
    /// Cached, see the module docs.
    pub velocity: Vec2<F>,
    pub angular_velocity: F,
    pub speed: F,
    pub angular_speed: F,

    pub force: Vec2<F>,
    pub torque: F,

    pub mass: F,
    pub inverse_mass: F,
    pub inertia: F,
    pub inverse_inertia: F,
    pub density: F,
    pub area: F,

    pub is_static: bool,
    pub is_sleeping: bool,
    /// Sensors report collisions but are never pushed apart.
    pub is_sensor: bool,
    pub sleep_counter: F,
    /// Calm steps (at the base delta) before the body may fall asleep.
    /// Zero disables sleeping for this body.
    pub sleep_threshold: F,
    /// Smoothed `speed² + angular_speed²`.
    pub motion: F,

    pub friction: F,
    pub friction_static: F,
    pub friction_air: F,
    pub restitution: F,
    /// Penetration allowed before position correction kicks in.
    pub slop: F,

    pub collision_filter: CollisionFilter,

    /// Correction queued by constraints, applied to geometry after the
    /// constraint pass and partly kept for warm starting.
    pub constraint_impulse: Vec2<F>,
    pub constraint_impulse_angle: F,
    /// Correction queued by the contact position solver.
    pub position_impulse: Vec2<F>,
    /// Active contacts touching this body in the current step.
    pub total_contacts: usize,

    /// Delta of the last integration, in milliseconds.
    pub delta_time: F,
    pub time_scale: F,

    original: Option<DynamicProperties<F>>,
}

impl<F: Float> RigidBody<F> {
    /// A convex polygon body centred on `position`.
    ///
    /// `points` may be in any frame and either winding; they are re-centred
    /// on their centroid.
    pub fn polygon(position: Vec2<F>, points: &[Vec2<F>]) -> Result<Self> {
        let density = F::from_f64(0.001);
        let part = Part::new(points, position, density)?;
        Ok(Self::from_part(part, density))
    }

    /// An axis-aligned `width` × `height` box centred on (`x`, `y`).
    pub fn rectangle(x: F, y: F, width: F, height: F) -> Self {
        let hw = width * F::half();
        let hh = height * F::half();
        let points = alloc::vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ];
        let density = F::from_f64(0.001);
        Self::from_part(Part::from_points(points, Vec2::new(x, y), density), density)
    }

    /// Weld bodies together. The convex hull of every piece becomes part 0;
    /// mass, inertia and centre come from the pieces.
    pub fn compound(bodies: AllocVec<RigidBody<F>>) -> Result<Self> {
        let mut pieces: AllocVec<Part<F>> = AllocVec::new();
        for body in bodies {
            let start = if body.parts.len() > 1 { 1 } else { 0 };
            pieces.extend(body.parts.into_iter().skip(start));
        }
        if pieces.is_empty() {
            return Err(PhysicsError::EmptyCompound);
        }

        let mut mass = F::zero();
        let mut area = F::zero();
        let mut inertia = F::zero();
        let mut weighted = Vec2::zero();
        for piece in &pieces {
            let m = if piece.mass.is_finite() { piece.mass } else { F::one() };
            mass = mass + m;
            area = area + piece.area;
            inertia = inertia + piece.inertia;
            weighted = weighted + piece.position.scale(m);
        }
        let centre = weighted.scale(F::one() / mass);

        let mut all_points = AllocVec::new();
        for piece in &pieces {
            all_points.extend_from_slice(&piece.vertices);
        }
        let hull_points = vertices::hull(&all_points);
        let hull_centre = vertices::centre(&hull_points);
        let density = F::from_f64(0.001);
        let mut hull = Part::from_points(hull_points, hull_centre, density);
        // keep the hull where it was but put the body origin at the mass centre
        hull.position = centre;

        let mut body = Self::from_part(hull, density);
        body.parts.extend(pieces);
        body.area = area;
        body.parts[0].area = area;
        body.set_mass(mass)?;
        body.set_inertia(inertia)?;
        Ok(body)
    }

    fn from_part(part: Part<F>, density: F) -> Self {
        let position = part.position;
        let mass = part.mass;
        let inertia = part.inertia;
        let area = part.area;
        RigidBody {
            id: BodyId::default(),
            parts: alloc::vec![part],
            position,
            position_prev: position,
            angle: F::zero(),
            angle_prev: F::zero(),
            velocity: Vec2::zero(),
            angular_velocity: F::zero(),
            speed: F::zero(),
            angular_speed: F::zero(),
            force: Vec2::zero(),
            torque: F::zero(),
            mass,
            inverse_mass: F::one() / mass,
            inertia,
            inverse_inertia: F::one() / inertia,
            density,
            area,
            is_static: false,
            is_sleeping: false,
            is_sensor: false,
            sleep_counter: F::zero(),
            sleep_threshold: F::from_f64(60.0),
            motion: F::zero(),
            friction: F::from_f64(0.1),
            friction_static: F::from_f64(0.5),
            friction_air: F::from_f64(0.01),
            restitution: F::zero(),
            slop: F::from_f64(0.05),
            collision_filter: CollisionFilter::default(),
            constraint_impulse: Vec2::zero(),
            constraint_impulse_angle: F::zero(),
            position_impulse: Vec2::zero(),
            total_contacts: 0,
            delta_time: base_delta(),
            time_scale: F::one(),
            original: None,
        }
    }

    // ---- builder-style setters -------------------------------------------

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.set_static(is_static);
        self
    }

    pub fn with_sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    pub fn with_friction(mut self, friction: F) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: F) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.collision_filter = filter;
        self
    }

    pub fn with_angle(mut self, angle: F) -> Self {
        self.set_angle(angle, false);
        self
    }

    pub fn with_sleep_threshold(mut self, steps: F) -> Self {
        self.sleep_threshold = steps;
        self
    }

    // ---- accessors --------------------------------------------------------

    /// World-space hull.
    pub fn vertices(&self) -> &[Vec2<F>] {
        &self.parts[0].vertices
    }

    pub fn axes(&self) -> &[Vec2<F>] {
        &self.parts[0].axes
    }

    pub fn bounds(&self) -> &Bounds<F> {
        &self.parts[0].bounds
    }

    pub fn is_compound(&self) -> bool {
        self.parts.len() > 1
    }

    /// True for static and sleeping bodies: neither is moved by the solver.
    pub fn is_inactive(&self) -> bool {
        self.is_static || self.is_sleeping
    }

    /// Velocity per base delta, derived from position history.
    pub fn get_velocity(&self) -> Vec2<F> {
        match self.velocity_scale() {
            Some(time_scale) => (self.position - self.position_prev).scale(time_scale),
            None => self.velocity,
        }
    }

    pub fn get_speed(&self) -> F {
        self.get_velocity().length()
    }

    pub fn get_angular_velocity(&self) -> F {
        match self.velocity_scale() {
            Some(time_scale) => (self.angle - self.angle_prev) * time_scale,
            None => self.angular_velocity,
        }
    }

    /// `base_delta / delta_time`, or `None` while the body is frozen by a
    /// zero time scale.
    fn velocity_scale(&self) -> Option<F> {
        if self.delta_time > F::zero() {
            Some(base_delta::<F>() / self.delta_time)
        } else {
            None
        }
    }

    pub fn get_angular_speed(&self) -> F {
        self.get_angular_velocity().abs()
    }

    // ---- mass properties ---------------------------------------------------

    /// Make the body immovable, or restore what it was before.
    pub fn set_static(&mut self, is_static: bool) {
        if is_static == self.is_static {
            return;
        }
        if is_static {
            self.original = Some(DynamicProperties {
                friction: self.friction,
                restitution: self.restitution,
                mass: self.mass,
                inertia: self.inertia,
                density: self.density,
            });
            self.friction = F::one();
            self.restitution = F::zero();
            self.mass = F::infinity();
            self.inertia = F::infinity();
            self.density = F::infinity();
            self.inverse_mass = F::zero();
            self.inverse_inertia = F::zero();
            self.position_prev = self.position;
            self.angle_prev = self.angle;
            self.velocity = Vec2::zero();
            self.angular_velocity = F::zero();
            self.speed = F::zero();
            self.angular_speed = F::zero();
            self.motion = F::zero();
        } else if let Some(original) = self.original.take() {
            self.friction = original.friction;
            self.restitution = original.restitution;
            self.mass = original.mass;
            self.inertia = original.inertia;
            self.density = original.density;
            self.inverse_mass = F::one() / original.mass;
            self.inverse_inertia = F::one() / original.inertia;
        }
        self.is_static = is_static;
    }

    /// Set mass, scaling inertia to keep the same shape.
    pub fn set_mass(&mut self, mass: F) -> Result<()> {
        if !(mass > F::zero()) || !mass.is_finite() {
            return Err(PhysicsError::InvalidMass);
        }
        let six = F::from_f64(6.0);
        let moment = self.inertia / (self.mass / six);
        self.inertia = moment * (mass / six);
        self.inverse_inertia = F::one() / self.inertia;
        self.mass = mass;
        self.inverse_mass = F::one() / mass;
        self.density = mass / self.area;
        Ok(())
    }

    pub fn set_density(&mut self, density: F) -> Result<()> {
        if !(density > F::zero()) || !density.is_finite() {
            return Err(PhysicsError::InvalidDensity);
        }
        self.set_mass(density * self.area)?;
        self.density = density;
        Ok(())
    }

    pub fn set_inertia(&mut self, inertia: F) -> Result<()> {
        if !(inertia > F::zero()) || !inertia.is_finite() {
            return Err(PhysicsError::InvalidInertia);
        }
        self.inertia = inertia;
        self.inverse_inertia = F::one() / inertia;
        Ok(())
    }

    // ---- kinematic mutators ----------------------------------------------

    /// Move every part by `translation`, then turn them by `rotation` about
    /// the (already updated) body position.
    pub(crate) fn transform_parts(&mut self, translation: Vec2<F>, rotation: F) {
        let pivot = self.position;
        let velocity = self.velocity;
        for part in self.parts.iter_mut() {
            part.translate(translation);
            part.rotate_about(rotation, pivot);
            part.bounds.update(&part.vertices, velocity);
        }
    }

    /// Teleport to `position`. With `update_velocity` the move counts as
    /// this step's velocity, otherwise the velocity is kept.
    pub fn set_position(&mut self, position: Vec2<F>, update_velocity: bool) {
        let delta = position - self.position;
        if update_velocity {
            self.position_prev = self.position;
            self.velocity = delta;
            self.speed = delta.length();
        } else {
            self.position_prev = self.position_prev + delta;
        }
        self.position = position;
        self.transform_parts(delta, F::zero());
    }

    pub fn set_angle(&mut self, angle: F, update_velocity: bool) {
        let delta = angle - self.angle;
        if update_velocity {
            self.angle_prev = self.angle;
            self.angular_velocity = delta;
            self.angular_speed = delta.abs();
        } else {
            self.angle_prev = self.angle_prev + delta;
        }
        self.angle = angle;
        self.transform_parts(Vec2::zero(), delta);
    }

    pub fn translate(&mut self, translation: Vec2<F>, update_velocity: bool) {
        self.set_position(self.position + translation, update_velocity);
    }

    pub fn rotate(&mut self, rotation: F, update_velocity: bool) {
        self.set_angle(self.angle + rotation, update_velocity);
    }

    /// Rotate about an arbitrary world point.
    pub fn rotate_about(&mut self, rotation: F, point: Vec2<F>, update_velocity: bool) {
        let position = self.position.rotate_about(rotation, point);
        self.set_position(position, update_velocity);
        self.set_angle(self.angle + rotation, update_velocity);
    }

    /// Scale the geometry about `point` (the body position if `None`),
    /// recomputing area, mass and inertia from the density.
    pub fn scale(&mut self, scale_x: F, scale_y: F, point: Option<Vec2<F>>) {
        let point = point.unwrap_or(self.position);
        let density = self.density;
        let velocity = self.velocity;
        let compound = self.parts.len() > 1;
        let mut total_area = F::zero();
        let mut total_inertia = F::zero();

        for (i, part) in self.parts.iter_mut().enumerate() {
            vertices::scale(&mut part.vertices, scale_x, scale_y, point);
            part.axes = vertices::axes(&part.vertices);
            part.area = vertices::area(&part.vertices, false);
            part.mass = density * part.area;
            part.position = Vec2::new(
                point.x + (part.position.x - point.x) * scale_x,
                point.y + (part.position.y - point.y) * scale_y,
            );
            let centre = part.position;
            vertices::translate(&mut part.vertices, -centre);
            part.inertia = F::from_f64(INERTIA_SCALE) * vertices::inertia(&part.vertices, part.mass);
            vertices::translate(&mut part.vertices, centre);
            part.bounds.update(&part.vertices, velocity);
            if i > 0 {
                total_area = total_area + part.area;
                total_inertia = total_inertia + part.inertia;
            }
        }

        let delta = self.parts[0].position - self.position;
        self.position = self.parts[0].position;
        self.position_prev = self.position_prev + delta;

        let (area, mass, inertia) = if compound {
            (total_area, density * total_area, total_inertia)
        } else {
            (self.parts[0].area, self.parts[0].mass, self.parts[0].inertia)
        };
        self.area = area;
        if !self.is_static {
            self.mass = mass;
            self.inverse_mass = F::one() / mass;
            self.inertia = inertia;
            self.inverse_inertia = F::one() / inertia;
        }
    }

    /// Set velocity (per base delta) by rewriting the position history.
    pub fn set_velocity(&mut self, velocity: Vec2<F>) {
        let time_scale = self.velocity_scale().map_or(F::one(), |s| F::one() / s);
        self.position_prev = self.position - velocity.scale(time_scale);
        self.velocity = (self.position - self.position_prev).scale(F::one() / time_scale);
        self.speed = self.velocity.length();
    }

    pub fn set_angular_velocity(&mut self, velocity: F) {
        let time_scale = self.velocity_scale().map_or(F::one(), |s| F::one() / s);
        self.angle_prev = self.angle - velocity * time_scale;
        self.angular_velocity = (self.angle - self.angle_prev) / time_scale;
        self.angular_speed = self.angular_velocity.abs();
    }

    /// Accumulate `force` applied at world point `position` until the end
    /// of the next update.
    pub fn apply_force(&mut self, position: Vec2<F>, force: Vec2<F>) {
        let offset = position - self.position;
        self.force = self.force + force;
        self.torque = self.torque + offset.cross(force);
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec2::zero();
        self.torque = F::zero();
    }

    // ---- integration --------------------------------------------------------

    /// Verlet step over `delta` milliseconds.
    ///
    /// The previous displacement is corrected for a change of step size,
    /// damped by air friction, then accelerated by the accumulated force.
    pub fn update(&mut self, delta: F) {
        let delta_time = delta * self.time_scale;
        let delta_sq = delta_time * delta_time;
        let correction = if self.delta_time > F::zero() {
            delta_time / self.delta_time
        } else {
            F::one()
        };
        let friction_air = F::one() - self.friction_air * (delta_time / base_delta::<F>());

        let velocity_prev = (self.position - self.position_prev).scale(correction);
        self.velocity = velocity_prev.scale(friction_air) + self.force.scale(delta_sq / self.mass);
        self.position_prev = self.position;
        self.position = self.position + self.velocity;
        self.delta_time = delta_time;

        self.angular_velocity = (self.angle - self.angle_prev) * friction_air * correction
            + (self.torque / self.inertia) * delta_sq;
        self.angle_prev = self.angle;
        self.angle = self.angle + self.angular_velocity;

        let (translation, rotation) = (self.velocity, self.angular_velocity);
        self.transform_parts(translation, rotation);
    }

    /// Refresh the cached velocities from position history, per base delta.
    pub fn update_velocities(&mut self) {
        let Some(time_scale) = self.velocity_scale() else {
            return;
        };
        self.velocity = (self.position - self.position_prev).scale(time_scale);
        self.speed = self.velocity.length();
        self.angular_velocity = (self.angle - self.angle_prev) * time_scale;
        self.angular_speed = self.angular_velocity.abs();
    }

    /// Give this body and its parts fresh ids starting at `next`.
    pub(crate) fn assign_ids(&mut self, next: &mut u32) {
        self.id = BodyId(*next);
        self.parts[0].id = self.id;
        *next += 1;
        for part in self.parts.iter_mut().skip(1) {
            part.id = BodyId(*next);
            *next += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rectangle_mass_properties() {
        let body: RigidBody<f64> = RigidBody::rectangle(0.0, 0.0, 40.0, 20.0);
        assert_relative_eq!(body.area, 800.0, epsilon = 1e-9);
        assert_relative_eq!(body.mass, 0.8, epsilon = 1e-9);
        // 4 * m * (w^2 + h^2) / 12
        assert_relative_eq!(body.inertia, 4.0 * 0.8 * 2000.0 / 12.0, epsilon = 1e-6);
        assert_eq!(body.axes().len(), 2);
    }

    #[test]
    fn static_body_has_no_inverse_mass() {
        let mut body: RigidBody<f64> = RigidBody::rectangle(0.0, 0.0, 10.0, 10.0);
        body.set_static(true);
        assert_eq!(body.inverse_mass, 0.0);
        assert_eq!(body.inverse_inertia, 0.0);
        assert_eq!(body.friction, 1.0);
        body.set_static(false);
        assert_relative_eq!(body.mass, 0.1, epsilon = 1e-12);
        assert_relative_eq!(body.friction, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn translate_keeps_geometry_consistent() {
        let mut body: RigidBody<f64> = RigidBody::rectangle(0.0, 0.0, 2.0, 2.0);
        body.translate(Vec2::new(5.0, -1.0), false);
        assert_eq!(body.position, Vec2::new(5.0, -1.0));
        assert_eq!(body.parts[0].position, body.position);
        assert_relative_eq!(body.bounds().min.x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(body.bounds().max.y, 0.0, epsilon = 1e-12);
        assert_eq!(body.get_velocity(), Vec2::zero());
    }

    #[test]
    fn rotate_turns_axes_and_vertices() {
        let mut body: RigidBody<f64> = RigidBody::rectangle(0.0, 0.0, 4.0, 2.0);
        body.rotate(core::f64::consts::FRAC_PI_2, false);
        assert_relative_eq!(body.bounds().max.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(body.bounds().max.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn set_velocity_round_trips() {
        let mut body: RigidBody<f64> = RigidBody::rectangle(0.0, 0.0, 2.0, 2.0);
        body.set_velocity(Vec2::new(3.0, -2.0));
        let v = body.get_velocity();
        assert_relative_eq!(v.x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn update_integrates_force() {
        let mut body: RigidBody<f64> = RigidBody::rectangle(0.0, 0.0, 10.0, 10.0);
        body.friction_air = 0.0;
        body.apply_force(body.position, Vec2::new(0.0, body.mass * 0.001));
        body.update(BASE_DELTA);
        let dt = BASE_DELTA;
        assert_relative_eq!(body.position.y, 0.001 * dt * dt, epsilon = 1e-9);
        assert_relative_eq!(body.parts[0].position.y, body.position.y, epsilon = 1e-12);
    }

    #[test]
    fn off_centre_force_adds_torque() {
        let mut body: RigidBody<f64> = RigidBody::rectangle(0.0, 0.0, 10.0, 10.0);
        body.apply_force(Vec2::new(5.0, 0.0), Vec2::new(0.0, 1.0));
        assert_relative_eq!(body.torque, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn compound_sums_parts() {
        let left: RigidBody<f64> = RigidBody::rectangle(-10.0, 0.0, 20.0, 20.0);
        let right: RigidBody<f64> = RigidBody::rectangle(10.0, 0.0, 20.0, 20.0);
        let mass = left.mass + right.mass;
        let body = RigidBody::compound(alloc::vec![left, right]).unwrap();
        assert_eq!(body.parts.len(), 3);
        assert_relative_eq!(body.mass, mass, epsilon = 1e-12);
        assert_relative_eq!(body.position.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(body.bounds().min.x, -20.0, epsilon = 1e-9);
        assert_relative_eq!(body.bounds().max.x, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert_eq!(
            RigidBody::<f32>::polygon(Vec2::zero(), &[]).unwrap_err(),
            PhysicsError::EmptyVertices
        );
        assert_eq!(
            RigidBody::<f32>::compound(AllocVec::new()).unwrap_err(),
            PhysicsError::EmptyCompound
        );
    }

    #[test]
    fn invalid_mass_is_rejected() {
        let mut body: RigidBody<f32> = RigidBody::rectangle(0.0, 0.0, 1.0, 1.0);
        assert_eq!(body.set_mass(0.0), Err(PhysicsError::InvalidMass));
        assert_eq!(body.set_mass(f32::NAN), Err(PhysicsError::InvalidMass));
    }

    #[test]
    fn scale_doubles_area_fourfold() {
        let mut body: RigidBody<f64> = RigidBody::rectangle(3.0, 3.0, 2.0, 2.0);
        body.scale(2.0, 2.0, None);
        assert_relative_eq!(body.area, 16.0, epsilon = 1e-9);
        assert_relative_eq!(body.mass, 0.016, epsilon = 1e-12);
        assert_eq!(body.position, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn f64_defaults_are_not_rounded_through_f32() {
        let body: RigidBody<f64> = RigidBody::rectangle(0.0, 0.0, 10.0, 10.0);
        assert_eq!(base_delta::<f64>(), 1000.0 / 60.0);
        assert_eq!(body.density, 0.001);
        assert_eq!(body.friction, 0.1);
        assert_eq!(body.friction_static, 0.5);
        assert_eq!(body.slop, 0.05);
        assert_eq!(body.delta_time / base_delta::<f64>(), 1.0);
    }

    #[test]
    fn zero_time_scale_keeps_velocity_and_bounds_finite() {
        let mut body: RigidBody<f64> = RigidBody::rectangle(0.0, 0.0, 10.0, 10.0);
        body.set_velocity(Vec2::new(1.0, 0.0));
        body.time_scale = 0.0;
        for _ in 0..3 {
            body.update(BASE_DELTA);
            body.update_velocities();
        }
        assert!(body.velocity.x.is_finite());
        assert!(body.get_velocity().x.is_finite());
        assert!(body.get_angular_velocity().is_finite());
        assert!(body.bounds().min.x.is_finite() && body.bounds().max.y.is_finite());

        body.set_velocity(Vec2::new(0.0, 2.0));
        assert!(body.position_prev.y.is_finite());
    }
}
