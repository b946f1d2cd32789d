#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Surface response properties of a body
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Material {
    /// Coefficient of restitution (bounciness), 0-1
    pub restitution: f32,

    /// Coefficient of friction, >= 0
    pub friction: f32,
}

impl Material {
    /// Creates a new material with the specified properties
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction: friction.max(0.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Restitution used for a contact between two materials (the less bouncy one wins)
    #[inline]
    pub fn combined_restitution(&self, other: &Material) -> f32 {
        self.restitution.min(other.restitution)
    }

    /// Friction used for a contact between two materials (geometric mean)
    #[inline]
    pub fn combined_friction(&self, other: &Material) -> f32 {
        (self.friction * other.friction).sqrt()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.3,
        }
    }
}
