use crate::constraints::constraint::{JointBodies, JOINT_BAUMGARTE};
use crate::math::{self, Quaternion, Vector3};

/// Welds two bodies: anchors stay together and the relative orientation is locked
#[derive(Debug, Clone, PartialEq)]
pub struct FixedJoint {
    /// The anchor point on the first body (in local space)
    pub anchor_a: Vector3,

    /// The anchor point on the second body (in local space)
    pub anchor_b: Vector3,

    /// Orientation of B relative to A to hold; captured on the first solve when unset
    rest_orientation: Option<Quaternion>,
}

impl FixedJoint {
    pub fn new(anchor_a: Vector3, anchor_b: Vector3) -> Self {
        Self {
            anchor_a,
            anchor_b,
            rest_orientation: None,
        }
    }

    /// Creates a fixed joint holding an explicit relative orientation
    pub fn with_rest_orientation(anchor_a: Vector3, anchor_b: Vector3, rest: Quaternion) -> Self {
        Self {
            anchor_a,
            anchor_b,
            rest_orientation: Some(rest),
        }
    }

    pub fn get_rest_orientation(&self) -> Option<Quaternion> {
        self.rest_orientation
    }

    pub(crate) fn prepare(&mut self, bodies: &JointBodies<'_>) {
        if self.rest_orientation.is_none() {
            self.rest_orientation = Some(bodies.a.get_rotation().inverse() * bodies.b.get_rotation());
        }
    }

    pub(crate) fn solve_velocity(&mut self, bodies: &mut JointBodies<'_>, dt: f32) -> f32 {
        let rotation_a = bodies.a.get_rotation();
        let rotation_b = bodies.b.get_rotation();
        let rest = *self
            .rest_orientation
            .get_or_insert_with(|| rotation_a.inverse() * rotation_b);

        let anchors = bodies.anchors(self.anchor_a, self.anchor_b);
        let mut impulse = bodies.solve_point(&anchors, JOINT_BAUMGARTE, dt);

        // How far B is turned past its target orientation
        let error = math::rotation_error(&(rotation_b * (rotation_a * rest).inverse()));
        impulse += bodies.solve_angular(-error * (JOINT_BAUMGARTE / dt));

        impulse
    }
}
