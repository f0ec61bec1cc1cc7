//! Owner of every body and constraint in a simulation.

use crate::body::{BodyId, RigidBody};
use crate::constraint::Constraint;
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use alloc::vec::Vec as AllocVec;
use hashbrown::HashMap;
use log::debug;

/// Bodies and constraints, plus the id counter that names them.
///
/// Bodies live in a flat list; their index can change when another body is
/// removed, their [`BodyId`] never does.
#[derive(Clone, Debug)]
pub struct World<F: Float> {
    bodies: AllocVec<RigidBody<F>>,
    constraints: AllocVec<Constraint<F>>,
    index: HashMap<BodyId, usize>,
    next_id: u32,
    modified: bool,
}

impl<F: Float> Default for World<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> World<F> {
    pub fn new() -> Self {
        World {
            bodies: AllocVec::new(),
            constraints: AllocVec::new(),
            index: HashMap::new(),
            next_id: 1,
            modified: false,
        }
    }

    /// Add a body, giving it and its parts fresh ids.
    pub fn add_body(&mut self, mut body: RigidBody<F>) -> BodyId {
        body.assign_ids(&mut self.next_id);
        let id = body.id;
        self.index.insert(id, self.bodies.len());
        self.bodies.push(body);
        self.modified = true;
        debug!("world: added body {}", id);
        id
    }

    /// Remove a body and every constraint attached to it.
    pub fn remove_body(&mut self, id: BodyId) -> Result<RigidBody<F>> {
        let index = self.index_of(id)?;
        let body = self.bodies.remove(index);

        let before = self.constraints.len();
        self.constraints.retain(|c| !c.involves(id));
        let dropped = before - self.constraints.len();

        self.reindex()?;
        self.modified = true;
        debug!("world: removed body {} and {} constraint(s)", id, dropped);
        Ok(body)
    }

    /// Add a constraint. Its bodies must already be in the world.
    pub fn add_constraint(&mut self, mut constraint: Constraint<F>) -> Result<usize> {
        constraint.bind(&self.index)?;
        self.constraints.push(constraint);
        self.modified = true;
        Ok(self.constraints.len() - 1)
    }

    pub fn remove_constraint(&mut self, index: usize) -> Option<Constraint<F>> {
        if index >= self.constraints.len() {
            return None;
        }
        self.modified = true;
        Some(self.constraints.remove(index))
    }

    pub fn index_of(&self, id: BodyId) -> Result<usize> {
        self.index.get(&id).copied().ok_or(PhysicsError::UnknownBody(id))
    }

    pub fn body(&self, id: BodyId) -> Result<&RigidBody<F>> {
        let index = self.index_of(id)?;
        Ok(&self.bodies[index])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Result<&mut RigidBody<F>> {
        let index = self.index_of(id)?;
        Ok(&mut self.bodies[index])
    }

    pub fn bodies(&self) -> &[RigidBody<F>] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [RigidBody<F>] {
        &mut self.bodies
    }

    pub fn constraints(&self) -> &[Constraint<F>] {
        &self.constraints
    }

    /// True once bodies or constraints were added or removed since the
    /// engine last looked.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Bodies and constraints borrowed together for a solver pass.
    pub(crate) fn split_mut(&mut self) -> (&mut [RigidBody<F>], &mut [Constraint<F>]) {
        (&mut self.bodies, &mut self.constraints)
    }

    fn reindex(&mut self) -> Result<()> {
        self.index.clear();
        for (i, body) in self.bodies.iter().enumerate() {
            self.index.insert(body.id, i);
        }
        for constraint in self.constraints.iter_mut() {
            constraint.bind(&self.index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ConstraintBuilder;
    use crate::vec::{Vec, Vec2};

    #[test]
    fn ids_cover_parts() {
        let mut world: World<f64> = World::new();
        let a = world.add_body(RigidBody::rectangle(0.0, 0.0, 10.0, 10.0));
        let compound = RigidBody::compound(alloc::vec![
            RigidBody::rectangle(0.0, 0.0, 10.0, 10.0),
            RigidBody::rectangle(10.0, 0.0, 10.0, 10.0),
        ])
        .unwrap();
        let b = world.add_body(compound);
        let c = world.add_body(RigidBody::rectangle(0.0, 0.0, 10.0, 10.0));

        assert_eq!(a, BodyId(1));
        assert_eq!(b, BodyId(2));
        let parts: AllocVec<_> = world.body(b).unwrap().parts.iter().map(|p| p.id).collect();
        assert_eq!(parts, [BodyId(2), BodyId(3), BodyId(4)]);
        assert_eq!(c, BodyId(5));
        assert!(world.is_modified());
    }

    #[test]
    fn removing_a_body_reindexes_and_drops_constraints() {
        let mut world: World<f64> = World::new();
        let a = world.add_body(RigidBody::rectangle(0.0, 0.0, 10.0, 10.0));
        let b = world.add_body(RigidBody::rectangle(50.0, 0.0, 10.0, 10.0));
        let c = world.add_body(RigidBody::rectangle(100.0, 0.0, 10.0, 10.0));

        let rope = ConstraintBuilder::new()
            .body_a(world.body(a).unwrap(), Vec2::zero())
            .body_b(world.body(b).unwrap(), Vec2::zero())
            .build()
            .unwrap();
        world.add_constraint(rope).unwrap();
        let spring = ConstraintBuilder::new()
            .world_a(Vec2::zero())
            .body_b(world.body(c).unwrap(), Vec2::zero())
            .build()
            .unwrap();
        world.add_constraint(spring).unwrap();

        world.remove_body(a).unwrap();
        assert_eq!(world.index_of(c).unwrap(), 1);
        assert_eq!(world.constraints().len(), 1);
        assert_eq!(world.constraints()[0].point_b_world(world.bodies()), Vec2::new(100.0, 0.0));
        assert_eq!(world.remove_body(a).unwrap_err(), PhysicsError::UnknownBody(a));
    }

    #[test]
    fn constraint_needs_known_bodies() {
        let mut world: World<f64> = World::new();
        let mut stranger = RigidBody::rectangle(0.0, 0.0, 1.0, 1.0);
        stranger.id = BodyId(99);
        let c = ConstraintBuilder::new()
            .body_a(&stranger, Vec2::zero())
            .build()
            .unwrap();
        assert_eq!(world.add_constraint(c), Err(PhysicsError::UnknownBody(BodyId(99))));
    }
}
