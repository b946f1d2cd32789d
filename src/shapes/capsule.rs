use crate::math::{Vector3, Matrix3, Aabb, Transform};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A capsule collision shape (cylinder with hemisphere caps at both ends), aligned with local Y
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Capsule {
    /// The radius of the capsule
    radius: f32,

    /// The height of the capsule (cylinder part only, excluding the hemisphere caps)
    height: f32,
}

impl Capsule {
    /// Creates a new capsule with the given radius and height
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Returns the radius of the capsule
    pub fn get_radius(&self) -> f32 {
        self.radius
    }

    /// Sets the radius of the capsule
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    /// Returns the height of the capsule (cylinder part only)
    pub fn get_height(&self) -> f32 {
        self.height
    }

    /// Sets the height of the capsule (cylinder part only)
    pub fn set_height(&mut self, height: f32) {
        self.height = height.max(0.0);
    }

    /// Returns the half-height of the capsule's cylinder part
    pub fn get_half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// Returns the end points of the core segment in world space
    pub fn get_world_segment(&self, transform: &Transform) -> (Vector3, Vector3) {
        let half = Vector3::new(0.0, self.get_half_height(), 0.0);
        (transform.transform_point(-half), transform.transform_point(half))
    }

    /// Radius of the sphere that encloses the capsule
    pub fn get_bounding_radius(&self) -> f32 {
        self.get_half_height() + self.radius
    }

    pub fn get_inertia_tensor(&self, mass: f32) -> Matrix3 {
        // Solid cylinder over the full capsule height
        let total_height = self.height + 2.0 * self.radius;
        let r2 = self.radius * self.radius;

        let ix = (1.0 / 12.0) * mass * (3.0 * r2 + total_height * total_height);
        let iy = 0.5 * mass * r2;

        Matrix3::from_diagonal(&Vector3::new(ix, iy, ix))
    }

    pub fn get_world_bounds(&self, transform: &Transform) -> Aabb {
        let (a, b) = self.get_world_segment(transform);
        Aabb::new(a.inf(&b), a.sup(&b)).expand(self.radius)
    }
}
