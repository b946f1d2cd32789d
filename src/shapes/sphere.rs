use crate::math::{Vector3, Matrix3, Aabb, Transform};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A spherical collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Sphere {
    /// The radius of the sphere
    radius: f32,
}

impl Sphere {
    /// Creates a new sphere with the given radius
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
        }
    }

    /// Returns the radius of the sphere
    pub fn get_radius(&self) -> f32 {
        self.radius
    }

    /// Sets the radius of the sphere
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    /// Solid sphere inertia: (2/5) m r^2 about every axis
    pub fn get_inertia_tensor(&self, mass: f32) -> Matrix3 {
        let inertia = 0.4 * mass * self.radius * self.radius;
        Matrix3::from_diagonal_element(inertia)
    }

    /// Rotation does not change a sphere's bounds
    pub fn get_world_bounds(&self, transform: &Transform) -> Aabb {
        Aabb::from_center_half_extents(transform.position, Vector3::repeat(self.radius))
    }
}
