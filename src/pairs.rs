//! The set of tracked pairs and the per-step start/active/end buckets.

use crate::body::{BodyId, RigidBody};
use crate::collision::Collision;
use crate::float::Float;
use crate::pair::{Pair, PairId};
use alloc::vec::Vec as AllocVec;
use hashbrown::HashMap;
use log::debug;

#[derive(Clone, Debug)]
pub struct Pairs<F: Float> {
    list: AllocVec<Pair<F>>,
    table: HashMap<PairId, usize>,
    /// Pairs that began touching (or touched again) this step.
    pub collision_start: AllocVec<PairId>,
    /// Pairs that were already touching and still are.
    pub collision_active: AllocVec<PairId>,
    /// Pairs that stopped touching this step. Only the active to inactive
    /// transition is reported: a pair kept because one of its bodies sleeps
    /// appears here once, not on every step it stays unconfirmed.
    pub collision_end: AllocVec<PairId>,
    /// Pairs dropped from storage during the last update, kept so end
    /// observers can still see them.
    removed: AllocVec<Pair<F>>,
}

impl<F: Float> Default for Pairs<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Pairs<F> {
    pub fn new() -> Self {
        Pairs {
            list: AllocVec::new(),
            table: HashMap::new(),
            collision_start: AllocVec::new(),
            collision_active: AllocVec::new(),
            collision_end: AllocVec::new(),
            removed: AllocVec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, id: &PairId) -> Option<&Pair<F>> {
        self.table.get(id).map(|&i| &self.list[i])
    }

    /// Like `get`, but also finds pairs removed during the last update.
    pub fn lookup(&self, id: &PairId) -> Option<&Pair<F>> {
        self.get(id)
            .or_else(|| self.removed.iter().find(|p| p.id == *id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pair<F>> {
        self.list.iter()
    }

    pub(crate) fn list(&self) -> &[Pair<F>] {
        &self.list
    }

    pub(crate) fn list_mut(&mut self) -> &mut [Pair<F>] {
        &mut self.list
    }

    /// Fold this step's collisions into the tracked pairs.
    pub fn update(&mut self, collisions: &[Collision<F>], bodies: &[RigidBody<F>], timestamp: F) {
        self.collision_start.clear();
        self.collision_active.clear();
        self.collision_end.clear();
        self.removed.clear();

        for pair in self.list.iter_mut() {
            pair.confirmed_active = false;
        }

        let mut created = 0usize;
        for collision in collisions {
            let id = collision.id();
            match self.table.get(&id) {
                Some(&index) => {
                    let pair = &mut self.list[index];
                    if pair.is_active {
                        self.collision_active.push(id);
                    } else {
                        self.collision_start.push(id);
                    }
                    pair.update(collision.clone(), bodies, timestamp);
                    pair.confirmed_active = true;
                }
                None => {
                    let pair = Pair::new(collision.clone(), bodies, timestamp);
                    self.table.insert(id, self.list.len());
                    self.list.push(pair);
                    self.collision_start.push(id);
                    created += 1;
                }
            }
        }

        let mut stale = false;
        for pair in self.list.iter_mut() {
            if pair.confirmed_active {
                continue;
            }
            if pair.is_active {
                pair.set_active(false, timestamp);
                self.collision_end.push(pair.id);
            }
            let asleep = pair.part_a.parent(bodies).is_sleeping
                || pair.part_b.parent(bodies).is_sleeping;
            if !asleep {
                stale = true;
            }
        }

        if stale {
            let before = self.list.len();
            let (keep, removed): (AllocVec<_>, AllocVec<_>) =
                self.list.drain(..).partition(|pair| {
                    pair.confirmed_active
                        || pair.part_a.parent(bodies).is_sleeping
                        || pair.part_b.parent(bodies).is_sleeping
                });
            self.list = keep;
            self.removed = removed;
            self.reindex();
            debug!(
                "pairs: {} created, {} removed, {} tracked",
                created,
                before - self.list.len(),
                self.list.len()
            );
        } else if created > 0 {
            debug!("pairs: {} created, {} tracked", created, self.list.len());
        }
    }

    /// Drop pairs whose bodies are no longer in `bodies` and point the rest
    /// at their bodies' current indices.
    pub fn retain_bodies(&mut self, bodies: &[RigidBody<F>]) {
        let index: HashMap<BodyId, usize> =
            bodies.iter().enumerate().map(|(i, b)| (b.id, i)).collect();
        let before = self.list.len();
        self.list.retain_mut(|pair| pair.remap(&index));
        if self.list.len() != before {
            debug!("pairs: dropped {} for removed bodies", before - self.list.len());
        }
        self.reindex();
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.table.clear();
        self.collision_start.clear();
        self.collision_active.clear();
        self.collision_end.clear();
        self.removed.clear();
    }

    fn reindex(&mut self) {
        self.table.clear();
        for (i, pair) in self.list.iter().enumerate() {
            self.table.insert(pair.id, i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{collides, PartRef};
    use crate::vec::Vec2;
    use alloc::vec;

    fn scene() -> AllocVec<RigidBody<f64>> {
        let mut bodies = vec![
            RigidBody::rectangle(0.0, 0.0, 10.0, 10.0),
            RigidBody::rectangle(0.0, 9.0, 10.0, 10.0),
        ];
        let mut next = 1;
        for b in bodies.iter_mut() {
            b.assign_ids(&mut next);
        }
        bodies
    }

    fn detect(bodies: &[RigidBody<f64>], pairs: &Pairs<f64>) -> AllocVec<Collision<f64>> {
        collides(bodies, PartRef::new(bodies, 0, 0), PartRef::new(bodies, 1, 0), Some(pairs))
            .into_iter()
            .collect()
    }

    #[test]
    fn lifecycle_start_active_end() {
        let mut bodies = scene();
        let mut pairs = Pairs::new();

        let c = detect(&bodies, &pairs);
        pairs.update(&c, &bodies, 0.0);
        assert_eq!(pairs.collision_start.len(), 1);
        assert_eq!(pairs.len(), 1);

        let c = detect(&bodies, &pairs);
        assert!(c[0].pair.is_some());
        pairs.update(&c, &bodies, 1.0);
        assert_eq!(pairs.collision_active.len(), 1);
        assert!(pairs.collision_start.is_empty());

        bodies[1].translate(Vec2::new(0.0, 50.0), false);
        let c = detect(&bodies, &pairs);
        pairs.update(&c, &bodies, 2.0);
        assert_eq!(pairs.collision_end.len(), 1);
        assert!(pairs.is_empty());
        let id = pairs.collision_end[0];
        assert!(pairs.lookup(&id).is_some());
    }

    #[test]
    fn sleeping_pairs_are_kept_inactive() {
        let mut bodies = scene();
        let mut pairs = Pairs::new();
        let c = detect(&bodies, &pairs);
        pairs.update(&c, &bodies, 0.0);

        bodies[0].is_sleeping = true;
        pairs.update(&[], &bodies, 1.0);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.collision_end.len(), 1);
        assert!(!pairs.iter().next().unwrap().is_active);

        // no second end event while it stays retained
        pairs.update(&[], &bodies, 2.0);
        assert!(pairs.collision_end.is_empty());
    }

    #[test]
    fn reactivated_pair_starts_again() {
        let mut bodies = scene();
        let mut pairs = Pairs::new();
        let c = detect(&bodies, &pairs);
        pairs.update(&c, &bodies, 0.0);
        bodies[0].is_sleeping = true;
        pairs.update(&[], &bodies, 1.0);

        let c = detect(&bodies, &pairs);
        pairs.update(&c, &bodies, 2.0);
        assert_eq!(pairs.collision_start.len(), 1);
        assert!(pairs.collision_active.is_empty());
    }

    #[test]
    fn readded_pair_has_fresh_impulses() {
        let mut bodies = scene();
        let mut pairs = Pairs::new();
        let c = detect(&bodies, &pairs);
        pairs.update(&c, &bodies, 0.0);
        let id = c[0].id();
        for pair in pairs.list_mut() {
            for contact in pair.contacts.values_mut() {
                contact.normal_impulse = -3.0;
            }
        }

        bodies[1].translate(Vec2::new(0.0, 50.0), false);
        pairs.update(&[], &bodies, 1.0);
        assert!(pairs.get(&id).is_none());

        bodies[1].translate(Vec2::new(0.0, -50.0), false);
        let c = detect(&bodies, &pairs);
        pairs.update(&c, &bodies, 2.0);
        let pair = pairs.get(&id).unwrap();
        assert_eq!(pair.id, id);
        assert!(pair.active().all(|c| c.normal_impulse == 0.0));
    }

    #[test]
    fn retain_bodies_drops_orphans() {
        let bodies = scene();
        let mut pairs = Pairs::new();
        let c = detect(&bodies, &pairs);
        pairs.update(&c, &bodies, 0.0);
        pairs.retain_bodies(&bodies[..1]);
        assert!(pairs.is_empty());
    }
}
