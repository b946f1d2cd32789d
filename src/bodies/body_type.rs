#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Type of rigid body, determining how it behaves in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum RigidBodyType {
    /// Fully simulated: affected by gravity, forces, contacts and joints
    #[default]
    Dynamic,

    /// Infinite mass; moves only by its assigned velocity
    Kinematic,

    /// Infinite mass; never moves during a step
    Static,
}

impl RigidBodyType {
    /// Returns true for bodies that respond to forces and collisions
    #[inline]
    pub fn is_dynamic(self) -> bool {
        self == RigidBodyType::Dynamic
    }

    #[inline]
    pub fn is_static(self) -> bool {
        self == RigidBodyType::Static
    }
}
