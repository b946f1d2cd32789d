use crate::math::{Vector3, Transform};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Ray representation for intersection tests
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Ray {
    /// Origin of the ray
    pub origin: Vector3,

    /// Direction of the ray (unit length)
    pub direction: Vector3,
}

impl Ray {
    /// Creates a new ray; the direction is normalized, falling back to +Z for a zero vector
    #[inline]
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: crate::math::normalize_or(direction, Vector3::z()),
        }
    }

    /// Returns the point at a given distance along the ray
    #[inline]
    pub fn point_at(&self, t: f32) -> Vector3 {
        self.origin + self.direction * t
    }

    /// Expresses this ray in the local space of `transform`
    pub fn to_local(&self, transform: &Transform) -> Self {
        Self {
            origin: transform.inverse_transform_point(self.origin),
            direction: transform.inverse_transform_direction(self.direction),
        }
    }

    /// Returns the closest point on the ray to a given point
    pub fn closest_point(&self, point: Vector3) -> Vector3 {
        let project_length = (point - self.origin).dot(&self.direction);

        if project_length < 0.0 {
            return self.origin;
        }

        self.origin + self.direction * project_length
    }

    /// Returns the distance from the ray to a point
    #[inline]
    pub fn distance_to_point(&self, point: Vector3) -> f32 {
        (point - self.closest_point(point)).norm()
    }
}
