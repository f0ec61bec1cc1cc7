//! Broad phase: sort and sweep along x, then hand candidates to the SAT test.

use crate::body::RigidBody;
use crate::collision::{collides, Collision, PartRef};
use crate::filter::CollisionFilter;
use crate::float::Float;
use crate::pairs::Pairs;
use alloc::vec::Vec as AllocVec;
use core::cmp::Ordering;

/// Finds every colliding pair of parts among a set of bodies.
///
/// Holds the sweep order and the collisions of the last pass so both
/// buffers are reused between steps.
#[derive(Clone, Debug, Default)]
pub struct Detector<F: Float> {
    order: AllocVec<usize>,
    collisions: AllocVec<Collision<F>>,
}

impl<F: Float> Detector<F> {
    pub fn new() -> Self {
        Detector {
            order: AllocVec::new(),
            collisions: AllocVec::new(),
        }
    }

    /// Track every body in `bodies`. Call again whenever bodies are added
    /// or removed.
    pub fn set_bodies(&mut self, bodies: &[RigidBody<F>]) {
        self.order.clear();
        self.order.extend(0..bodies.len());
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.collisions.clear();
    }

    /// Collisions found by the last call to [`Detector::collisions`].
    pub fn last(&self) -> &[Collision<F>] {
        &self.collisions
    }

    /// Run the broad and narrow phase over the tracked bodies.
    pub fn collisions(&mut self, bodies: &[RigidBody<F>], pairs: Option<&Pairs<F>>) -> &[Collision<F>] {
        self.collisions.clear();
        self.order.retain(|&i| i < bodies.len());
        self.order.sort_unstable_by(|&a, &b| {
            let (a, b) = (bodies[a].bounds().min.x, bodies[b].bounds().min.x);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        });

        let order = &self.order;
        for (n, &i) in order.iter().enumerate() {
            let body_a = &bodies[i];
            let bounds_a = body_a.bounds();
            let inactive_a = body_a.is_inactive();

            for &j in &order[n + 1..] {
                let body_b = &bodies[j];
                let bounds_b = body_b.bounds();

                if bounds_b.min.x > bounds_a.max.x {
                    break;
                }
                if bounds_a.max.y < bounds_b.min.y || bounds_a.min.y > bounds_b.max.y {
                    continue;
                }
                if inactive_a && body_b.is_inactive() {
                    continue;
                }
                if !CollisionFilter::can_collide(&body_a.collision_filter, &body_b.collision_filter) {
                    continue;
                }

                if !body_a.is_compound() && !body_b.is_compound() {
                    let a = PartRef::new(bodies, i, 0);
                    let b = PartRef::new(bodies, j, 0);
                    if let Some(collision) = collides(bodies, a, b, pairs) {
                        self.collisions.push(collision);
                    }
                    continue;
                }

                let start_a = if body_a.is_compound() { 1 } else { 0 };
                let start_b = if body_b.is_compound() { 1 } else { 0 };
                for k in start_a..body_a.parts.len() {
                    for z in start_b..body_b.parts.len() {
                        if !body_a.parts[k].bounds.overlaps(&body_b.parts[z].bounds) {
                            continue;
                        }
                        let a = PartRef::new(bodies, i, k);
                        let b = PartRef::new(bodies, j, z);
                        if let Some(collision) = collides(bodies, a, b, pairs) {
                            self.collisions.push(collision);
                        }
                    }
                }
            }
        }

        &self.collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn ids(bodies: &mut [RigidBody<f64>]) {
        let mut next = 1;
        for b in bodies.iter_mut() {
            b.assign_ids(&mut next);
        }
    }

    #[test]
    fn finds_only_overlapping_pairs() {
        let mut bodies = vec![
            RigidBody::rectangle(0.0, 0.0, 10.0, 10.0),
            RigidBody::rectangle(8.0, 0.0, 10.0, 10.0),
            RigidBody::rectangle(100.0, 0.0, 10.0, 10.0),
            RigidBody::rectangle(8.0, 100.0, 10.0, 10.0),
        ];
        ids(&mut bodies);
        let mut detector = Detector::new();
        detector.set_bodies(&bodies);
        let found = detector.collisions(&bodies, None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].part_a.body, 0);
        assert_eq!(found[0].part_b.body, 1);
    }

    #[test]
    fn static_pairs_are_skipped() {
        let mut bodies = vec![
            RigidBody::rectangle(0.0, 0.0, 10.0, 10.0).with_static(true),
            RigidBody::rectangle(5.0, 0.0, 10.0, 10.0).with_static(true),
        ];
        ids(&mut bodies);
        let mut detector = Detector::new();
        detector.set_bodies(&bodies);
        assert!(detector.collisions(&bodies, None).is_empty());
    }

    #[test]
    fn filters_are_respected() {
        let mut bodies = vec![
            RigidBody::rectangle(0.0, 0.0, 10.0, 10.0)
                .with_filter(CollisionFilter::new(0b01, 0b01)),
            RigidBody::rectangle(5.0, 0.0, 10.0, 10.0)
                .with_filter(CollisionFilter::new(0b10, 0b10)),
        ];
        ids(&mut bodies);
        let mut detector = Detector::new();
        detector.set_bodies(&bodies);
        assert!(detector.collisions(&bodies, None).is_empty());
    }

    #[test]
    fn compound_is_tested_per_part() {
        let left = RigidBody::rectangle(-20.0, 0.0, 10.0, 10.0);
        let right = RigidBody::rectangle(20.0, 0.0, 10.0, 10.0);
        let mut bodies = vec![
            RigidBody::compound(vec![left, right]).unwrap(),
            // inside the hull, between the two parts
            RigidBody::rectangle(0.0, 0.0, 4.0, 4.0),
            RigidBody::rectangle(24.0, 0.0, 4.0, 4.0),
        ];
        ids(&mut bodies);
        let mut detector = Detector::new();
        detector.set_bodies(&bodies);
        let found = detector.collisions(&bodies, None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].part_a.body, 0);
        assert_eq!(found[0].part_a.part, 2);
        assert_eq!(found[0].part_b.body, 2);
    }
}
