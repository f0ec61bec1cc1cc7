//! 2D rigid-body physics for games.
//!
//! `clunk` simulates convex and compound-convex polygons with Verlet
//! integration. Velocity is never stored as state: it is always
//! `position - position_prev`, and every correction (contacts, constraints,
//! friction) edits positions or position history.
//!
//! # Features
//!
//! - **SAT collision**: Separating axis test with 1-2 point contact manifolds
//! - **Broad phase**: Sort-and-sweep over bounding boxes, category/mask/group filtering
//! - **Warm starting**: Contacts keep their impulses across steps by vertex identity
//! - **Sequential impulses**: Position and velocity passes with Coulomb friction
//! - **Constraints**: Rods, springs and pins, to other bodies or to the world
//! - **Sleeping**: Calm bodies drop out of the solver until something touches them
//! - **Observable**: Collision, sleep and step events via observer traits
//! - **`no_std` compatible**: Works in embedded and WASM environments
//!
//! Units follow screen conventions: y points down, time is in milliseconds
//! and the reference step is 1000/60 ms.

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod vertices;
pub mod bounds;
pub mod filter;
pub mod body;
pub mod collision;
pub mod detector;
pub mod pair;
pub mod pairs;
pub mod resolver;
pub mod constraint;
pub mod sleeping;
pub mod world;
pub mod engine;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec2};
pub use bounds::Bounds;
pub use filter::CollisionFilter;
pub use body::{BodyId, Part, RigidBody, BASE_DELTA};
pub use collision::{collides, Collision, PartRef, VertexRef};
pub use detector::Detector;
pub use pair::{Contact, ContactId, Pair, PairId};
pub use pairs::Pairs;
pub use constraint::{Constraint, ConstraintBuilder};
pub use world::World;
pub use engine::{Engine, Timing};
pub use config::EngineConfig;
pub use observer::{BodyObserver, CollisionObserver, StepObserver, NoOpStepObserver};
pub use error::{PhysicsError, Result};
