//! Error types for building bodies, constraints and worlds.
//!
//! Stepping the simulation never fails. These errors come from the authoring
//! surface only.

use crate::body::BodyId;

/// Errors that can occur while authoring a simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    /// A polygon needs at least one vertex.
    #[error("polygon has no vertices")]
    EmptyVertices,
    /// A compound body needs at least one part.
    #[error("compound body has no parts")]
    EmptyCompound,
    /// Mass must be positive and finite.
    #[error("mass must be positive and finite")]
    InvalidMass,
    /// Inertia must be positive and finite.
    #[error("inertia must be positive and finite")]
    InvalidInertia,
    /// Density must be positive and finite.
    #[error("density must be positive and finite")]
    InvalidDensity,
    /// No body with this id lives in the world.
    #[error("no body with id {0} in the world")]
    UnknownBody(BodyId),
    /// Both ends of a constraint name the same body.
    #[error("constraint attaches body {0} to itself")]
    SelfConstraint(BodyId),
    /// A constraint needs at least one body.
    #[error("constraint has no body on either end")]
    UnanchoredConstraint,
}

/// Result alias used by fallible constructors.
pub type Result<T> = core::result::Result<T, PhysicsError>;
