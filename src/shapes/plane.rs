use crate::math::{Vector3, Aabb, Transform};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Half-size used for the finite stand-in bounds of an infinite plane
pub const PLANE_EXTENT: f32 = 10_000.0;

/// Thickness margin of a plane's bounds along an axis-aligned normal
const PLANE_THICKNESS: f32 = 0.01;

/// An infinite plane collision shape: all points `x` with `normal . x = distance`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Plane {
    /// The normal vector of the plane (unit length)
    normal: Vector3,

    /// The distance from the origin to the plane along the normal
    distance: f32,
}

impl Plane {
    /// Creates a new plane with the given normal and distance
    pub fn new(normal: Vector3, distance: f32) -> Self {
        Self {
            normal: crate::math::normalize_or(normal, Vector3::y()),
            distance,
        }
    }

    /// Creates a new plane from a point on the plane and a normal
    pub fn from_point_normal(point: Vector3, normal: Vector3) -> Self {
        let normal = crate::math::normalize_or(normal, Vector3::y());
        Self {
            normal,
            distance: normal.dot(&point),
        }
    }

    /// Returns the normal of the plane
    pub fn get_normal(&self) -> Vector3 {
        self.normal
    }

    /// Returns the distance of the plane from the origin
    pub fn get_distance(&self) -> f32 {
        self.distance
    }

    /// Returns the signed distance from a point to the plane
    pub fn signed_distance_to(&self, point: Vector3) -> f32 {
        self.normal.dot(&point) - self.distance
    }

    /// Expresses this plane in world space, given the collider's world transform
    pub fn to_world(&self, transform: &Transform) -> Self {
        Self::from_point_normal(
            transform.transform_point(self.normal * self.distance),
            transform.transform_direction(self.normal),
        )
    }

    /// Finite stand-in bounds of the solid half-space behind the plane. Along an
    /// axis-aligned normal they stop just above the surface; otherwise a large cube.
    pub fn get_world_bounds(&self, transform: &Transform) -> Aabb {
        let world = self.to_world(transform);
        let point = world.normal * world.distance;

        let mut min = point - Vector3::repeat(PLANE_EXTENT);
        let mut max = point + Vector3::repeat(PLANE_EXTENT);
        for axis in 0..3 {
            let n = world.normal[axis];
            if n > 0.999 {
                max[axis] = point[axis] + PLANE_THICKNESS;
            } else if n < -0.999 {
                min[axis] = point[axis] - PLANE_THICKNESS;
            }
        }

        Aabb::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Quaternion;

    #[test]
    fn bounds_cover_the_solid_side() {
        let ground = Plane::new(Vector3::y(), 1.0);
        let bounds = ground.get_world_bounds(&Transform::identity());

        assert!(bounds.max.y < 1.0 + 2.0 * PLANE_THICKNESS);
        assert!(bounds.contains_point(Vector3::new(3.0, -50.0, 3.0)));
        assert!(!bounds.contains_point(Vector3::new(0.0, 1.5, 0.0)));

        let ceiling = Plane::from_point_normal(Vector3::new(0.0, 4.0, 0.0), -Vector3::y());
        let bounds = ceiling.get_world_bounds(&Transform::identity());
        assert!(bounds.min.y > 4.0 - 2.0 * PLANE_THICKNESS);
        assert!(bounds.contains_point(Vector3::new(0.0, 60.0, 0.0)));
    }

    #[test]
    fn rotated_plane_moves_with_its_transform() {
        let plane = Plane::new(Vector3::y(), 0.0);
        let wall = Transform::new(
            Vector3::new(2.0, 0.0, 0.0),
            Quaternion::from_axis_angle(&Vector3::z_axis(), -std::f32::consts::FRAC_PI_2),
        );

        let world = plane.to_world(&wall);
        assert!((world.get_normal() - Vector3::x()).norm() < 1e-5);
        assert!((world.get_distance() - 2.0).abs() < 1e-5);

        let bounds = plane.get_world_bounds(&wall);
        assert!(bounds.contains_point(Vector3::new(-100.0, 0.0, 0.0)));
        assert!(!bounds.contains_point(Vector3::new(2.5, 0.0, 0.0)));
    }
}
