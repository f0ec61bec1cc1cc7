//! A tracked contact between two parts and its warm-start state.

use crate::body::{BodyId, RigidBody};
use crate::collision::{Collision, PartRef, VertexRef};
use crate::float::Float;
use alloc::vec::Vec as AllocVec;
use hashbrown::HashMap;

/// Order-independent key for a pair of parts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(pub BodyId, pub BodyId);

impl PairId {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a < b { PairId(a, b) } else { PairId(b, a) }
    }
}

/// Identity of a contact: which part, which vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContactId {
    pub body: BodyId,
    pub vertex: usize,
}

impl ContactId {
    pub fn of(vertex: &VertexRef) -> Self {
        ContactId {
            body: vertex.part.id,
            vertex: vertex.index,
        }
    }
}

/// A support vertex with the impulses accumulated on it.
#[derive(Copy, Clone, Debug)]
pub struct Contact<F: Float> {
    pub vertex: VertexRef,
    pub normal_impulse: F,
    pub tangent_impulse: F,
}

impl<F: Float> Contact<F> {
    pub fn new(vertex: VertexRef) -> Self {
        Contact {
            vertex,
            normal_impulse: F::zero(),
            tangent_impulse: F::zero(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Pair<F: Float> {
    pub id: PairId,
    pub part_a: PartRef,
    pub part_b: PartRef,
    pub collision: Collision<F>,
    /// Every contact seen while this pair has existed.
    pub contacts: HashMap<ContactId, Contact<F>>,
    /// Contacts in the current manifold, in support order.
    pub active_contacts: AllocVec<ContactId>,
    pub separation: F,
    pub is_active: bool,
    pub confirmed_active: bool,
    pub is_sensor: bool,
    pub time_created: F,
    pub time_updated: F,
    pub inverse_mass: F,
    pub friction: F,
    pub friction_static: F,
    pub restitution: F,
    pub slop: F,
}

impl<F: Float> Pair<F> {
    pub fn new(collision: Collision<F>, bodies: &[RigidBody<F>], timestamp: F) -> Self {
        let is_sensor = collision.part_a.parent(bodies).is_sensor
            || collision.part_b.parent(bodies).is_sensor;
        let mut pair = Pair {
            id: collision.id(),
            part_a: collision.part_a,
            part_b: collision.part_b,
            collision: collision.clone(),
            contacts: HashMap::new(),
            active_contacts: AllocVec::with_capacity(2),
            separation: F::zero(),
            is_active: true,
            confirmed_active: true,
            is_sensor,
            time_created: timestamp,
            time_updated: timestamp,
            inverse_mass: F::zero(),
            friction: F::zero(),
            friction_static: F::zero(),
            restitution: F::zero(),
            slop: F::zero(),
        };
        pair.update(collision, bodies, timestamp);
        pair
    }

    /// Take a fresh manifold: blend materials and rebuild the active
    /// contacts, keeping cached impulses of vertices seen before.
    pub fn update(&mut self, mut collision: Collision<F>, bodies: &[RigidBody<F>], timestamp: F) {
        let parent_a = collision.part_a.parent(bodies);
        let parent_b = collision.part_b.parent(bodies);

        self.inverse_mass = parent_a.inverse_mass + parent_b.inverse_mass;
        self.friction = parent_a.friction.min(parent_b.friction);
        self.friction_static = parent_a.friction_static.max(parent_b.friction_static);
        self.restitution = parent_a.restitution.max(parent_b.restitution);
        self.slop = parent_a.slop.max(parent_b.slop);
        self.separation = collision.depth;

        self.active_contacts.clear();
        for support in &collision.supports {
            let id = ContactId::of(support);
            self.contacts
                .entry(id)
                .and_modify(|c| c.vertex = *support)
                .or_insert_with(|| Contact::new(*support));
            self.active_contacts.push(id);
        }

        collision.pair = Some(self.id);
        self.part_a = collision.part_a;
        self.part_b = collision.part_b;
        self.collision = collision;
        self.set_active(true, timestamp);
    }

    pub fn set_active(&mut self, active: bool, timestamp: F) {
        if active {
            self.is_active = true;
            self.time_updated = timestamp;
        } else {
            self.is_active = false;
            self.active_contacts.clear();
        }
    }

    /// Active contacts in manifold order.
    pub fn active(&self) -> impl Iterator<Item = &Contact<F>> {
        self.active_contacts.iter().filter_map(|id| self.contacts.get(id))
    }

    /// Point every part reference at new body indices. False if either
    /// parent body is gone.
    pub(crate) fn remap(&mut self, index: &HashMap<BodyId, usize>) -> bool {
        if !(self.part_a.remap(index) && self.part_b.remap(index)) {
            return false;
        }
        self.collision.part_a = self.part_a;
        self.collision.part_b = self.part_b;
        for support in self.collision.supports.iter_mut() {
            support.part.remap(index);
        }
        for contact in self.contacts.values_mut() {
            contact.vertex.part.remap(index);
        }
        true
    }
}
