use crate::math::{Vector3, Quaternion};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A rigid transformation in 3D space (position and rotation)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Position in 3D space
    pub position: Vector3,

    /// Rotation as a unit quaternion
    pub rotation: Quaternion,
}

impl Transform {
    /// Creates a new transform with the given position and rotation
    #[inline]
    pub fn new(position: Vector3, rotation: Quaternion) -> Self {
        Self { position, rotation }
    }

    /// Creates a new identity transform (no translation, no rotation)
    #[inline]
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Quaternion::identity(),
        }
    }

    /// Creates a new transform from just a position
    #[inline]
    pub fn from_position(position: Vector3) -> Self {
        Self {
            position,
            rotation: Quaternion::identity(),
        }
    }

    /// Transforms a point from local space into world space
    #[inline]
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        self.rotation * point + self.position
    }

    /// Transforms a direction vector by this transform (ignoring translation)
    #[inline]
    pub fn transform_direction(&self, direction: Vector3) -> Vector3 {
        self.rotation * direction
    }

    /// Transforms a world-space point into the local space of this transform
    #[inline]
    pub fn inverse_transform_point(&self, point: Vector3) -> Vector3 {
        self.rotation.inverse_transform_vector(&(point - self.position))
    }

    /// Transforms a world-space direction into the local space of this transform
    #[inline]
    pub fn inverse_transform_direction(&self, direction: Vector3) -> Vector3 {
        self.rotation.inverse_transform_vector(&direction)
    }

    /// Inverts this transform
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            position: -(inv_rotation * self.position),
            rotation: inv_rotation,
        }
    }

    /// Places `local` (expressed relative to this transform) into this transform's parent space
    pub fn combine(&self, local: &Self) -> Self {
        Self {
            position: self.transform_point(local.position),
            rotation: self.rotation * local.rotation,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn inverse_round_trips_points() {
        let transform = Transform::new(
            Vector3::new(1.0, 2.0, 3.0),
            Quaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
        );
        let p = Vector3::new(0.5, -1.0, 4.0);

        let world = transform.transform_point(p);
        assert_relative_eq!(transform.inverse_transform_point(world), p, epsilon = 1e-5);
        assert_relative_eq!(transform.inverse().transform_point(world), p, epsilon = 1e-5);
    }

    #[test]
    fn combine_applies_parent_rotation_to_offset() {
        let parent = Transform::new(
            Vector3::new(0.0, 1.0, 0.0),
            Quaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
        );
        let child = Transform::from_position(Vector3::new(1.0, 0.0, 0.0));

        let combined = parent.combine(&child);
        assert_relative_eq!(combined.position, Vector3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
    }
}
