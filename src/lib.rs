//! Rigid-body physics core: collision detection, contact and joint solving,
//! sleeping, trigger events and ray queries.

pub mod math;
pub mod core;
pub mod bodies;
pub mod shapes;
pub mod collision;
pub mod constraints;
pub mod query;

/// Re-export common types for easier usage
pub use crate::core::{BodyHandle, ConstraintHandle, PhysicsContext, PhysicsEvent, PhysicsWorld, SimulationConfig};
pub use crate::bodies::{RigidBody, RigidBodyType, Material};
pub use crate::shapes::{Collider, Shape};
pub use crate::collision::{CollisionInfo, CollisionLayers, CollisionMask};
pub use crate::constraints::{Constraint, ConstraintManager};
pub use crate::query::{PhysicsRaycaster, RaycastHit, RaycastOptions};
pub use crate::math::{Ray, Transform, Vector3};

/// Error types for the physics engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),
    }
}

/// Result type for physics engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
