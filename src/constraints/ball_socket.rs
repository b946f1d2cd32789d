use crate::constraints::constraint::{JointBodies, JOINT_BAUMGARTE};
use crate::math::Vector3;

/// Point-to-point joint: the two anchors stay together, rotation is free
#[derive(Debug, Clone, PartialEq)]
pub struct BallSocketJoint {
    /// The anchor point on the first body (in local space)
    pub anchor_a: Vector3,

    /// The anchor point on the second body (in local space)
    pub anchor_b: Vector3,
}

impl BallSocketJoint {
    pub fn new(anchor_a: Vector3, anchor_b: Vector3) -> Self {
        Self { anchor_a, anchor_b }
    }

    pub(crate) fn solve_velocity(&self, bodies: &mut JointBodies<'_>, dt: f32) -> f32 {
        let anchors = bodies.anchors(self.anchor_a, self.anchor_b);
        bodies.solve_point(&anchors, JOINT_BAUMGARTE, dt)
    }
}
