use crate::math::{Vector3, Matrix3, Aabb, Transform};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A box (cuboid) collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BoxShape {
    /// The half-extents of the box (half-width, half-height, half-depth)
    half_extents: Vector3,
}

impl BoxShape {
    /// Creates a new box with the given half-extents
    pub fn new(half_extents: Vector3) -> Self {
        Self {
            half_extents: half_extents.map(|e| e.max(0.0)),
        }
    }

    /// Returns the half-extents of the box
    pub fn get_half_extents(&self) -> Vector3 {
        self.half_extents
    }

    /// Sets the half-extents of the box
    pub fn set_half_extents(&mut self, half_extents: Vector3) {
        self.half_extents = half_extents.map(|e| e.max(0.0));
    }

    /// Returns the 8 vertices of the box in local space
    pub fn get_vertices(&self) -> [Vector3; 8] {
        let x = self.half_extents.x;
        let y = self.half_extents.y;
        let z = self.half_extents.z;

        [
            Vector3::new(-x, -y, -z),
            Vector3::new(x, -y, -z),
            Vector3::new(x, y, -z),
            Vector3::new(-x, y, -z),
            Vector3::new(-x, -y, z),
            Vector3::new(x, -y, z),
            Vector3::new(x, y, z),
            Vector3::new(-x, y, z),
        ]
    }

    /// Returns the 8 vertices of the box in world space
    pub fn get_world_vertices(&self, transform: &Transform) -> [Vector3; 8] {
        self.get_vertices().map(|v| transform.transform_point(v))
    }

    /// Radius of the sphere that encloses the box
    pub fn get_bounding_radius(&self) -> f32 {
        self.half_extents.norm()
    }

    pub fn get_inertia_tensor(&self, mass: f32) -> Matrix3 {
        // Ixx = (1/12) * m * (h^2 + d^2), etc. with full dimensions
        let size = self.half_extents * 2.0;
        let x2 = size.x * size.x;
        let y2 = size.y * size.y;
        let z2 = size.z * size.z;

        let factor = mass / 12.0;

        Matrix3::from_diagonal(&Vector3::new(
            factor * (y2 + z2),
            factor * (x2 + z2),
            factor * (x2 + y2),
        ))
    }

    pub fn get_world_bounds(&self, transform: &Transform) -> Aabb {
        // Rotated extents: |R| * h
        let rotation = transform.rotation.to_rotation_matrix();
        let abs_rotation = rotation.matrix().abs();
        Aabb::from_center_half_extents(transform.position, abs_rotation * self.half_extents)
    }
}
