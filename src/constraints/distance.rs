use crate::constraints::constraint::{JointBodies, JOINT_BAUMGARTE};
use crate::math::{Vector3, EPSILON};

/// Keeps two anchor points at a fixed distance from each other
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceJoint {
    /// The anchor point on the first body (in local space)
    pub anchor_a: Vector3,

    /// The anchor point on the second body (in local space)
    pub anchor_b: Vector3,

    /// The desired distance between the anchor points
    rest_length: f32,
}

impl DistanceJoint {
    pub fn new(anchor_a: Vector3, anchor_b: Vector3, rest_length: f32) -> Self {
        Self {
            anchor_a,
            anchor_b,
            rest_length: rest_length.max(0.0),
        }
    }

    /// Returns the desired distance
    pub fn get_rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Sets the desired distance
    pub fn set_rest_length(&mut self, rest_length: f32) {
        self.rest_length = rest_length.max(0.0);
    }

    pub(crate) fn solve_velocity(&self, bodies: &mut JointBodies<'_>, dt: f32) -> f32 {
        let anchors = bodies.anchors(self.anchor_a, self.anchor_b);
        let separation = anchors.separation();
        let length = separation.norm();

        // Direction undefined when the anchors coincide
        if length < EPSILON {
            return 0.0;
        }

        let direction = separation / length;
        let error = length - self.rest_length;

        bodies.solve_axis(direction, &anchors, JOINT_BAUMGARTE * error / dt)
    }
}
