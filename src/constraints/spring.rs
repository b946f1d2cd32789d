use crate::constraints::constraint::JointBodies;
use crate::math::{Vector3, EPSILON};

/// Damped spring between two anchor points
#[derive(Debug, Clone, PartialEq)]
pub struct SpringJoint {
    /// The anchor point on the first body (in local space)
    pub anchor_a: Vector3,

    /// The anchor point on the second body (in local space)
    pub anchor_b: Vector3,

    rest_length: f32,

    /// The spring stiffness
    stiffness: f32,

    /// The damping factor
    damping: f32,
}

impl SpringJoint {
    pub fn new(anchor_a: Vector3, anchor_b: Vector3, rest_length: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            anchor_a,
            anchor_b,
            rest_length: rest_length.max(0.0),
            stiffness: stiffness.max(0.0),
            damping: damping.max(0.0),
        }
    }

    pub fn get_rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn set_rest_length(&mut self, rest_length: f32) {
        self.rest_length = rest_length.max(0.0);
    }

    /// Returns the spring stiffness
    pub fn get_stiffness(&self) -> f32 {
        self.stiffness
    }

    /// Sets the spring stiffness
    pub fn set_stiffness(&mut self, stiffness: f32) {
        self.stiffness = stiffness.max(0.0);
    }

    /// Returns the damping factor
    pub fn get_damping(&self) -> f32 {
        self.damping
    }

    /// Sets the damping factor
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.max(0.0);
    }

    /// Signed spring force along the anchor axis; positive pushes the anchors apart
    pub(crate) fn force(&self, length: f32, speed_along: f32) -> f32 {
        -self.stiffness * (length - self.rest_length) - self.damping * speed_along
    }

    /// Applies one step's worth of spring force and returns its magnitude
    pub(crate) fn apply(&self, bodies: &mut JointBodies<'_>, dt: f32) -> f32 {
        let anchors = bodies.anchors(self.anchor_a, self.anchor_b);
        let separation = anchors.separation();
        let length = separation.norm();

        if length < EPSILON {
            return 0.0;
        }

        let direction = separation / length;
        let speed_along = bodies.relative_velocity(&anchors).dot(&direction);
        let force = self.force(length, speed_along);

        // B is pushed along the axis, A the opposite way
        bodies.apply_linear_impulse(direction * (force * dt));
        force.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_follows_hooke_and_damping() {
        let spring = SpringJoint::new(Vector3::zeros(), Vector3::zeros(), 1.0, 10.0, 2.0);
        assert_eq!(spring.force(1.5, 0.0), -5.0);
        assert_eq!(spring.force(1.0, 1.0), -2.0);

        let slack = SpringJoint::new(Vector3::zeros(), Vector3::zeros(), 1.0, 0.0, 0.0);
        assert_eq!(slack.force(3.0, 4.0), 0.0);
    }
}
