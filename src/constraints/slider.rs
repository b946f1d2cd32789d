use crate::constraints::constraint::{JointBodies, JOINT_BAUMGARTE};
use crate::math::{self, Vector3};

/// Prismatic joint: B may only translate along an axis fixed in A
#[derive(Debug, Clone, PartialEq)]
pub struct SliderJoint {
    /// The anchor point on the first body (in local space)
    pub anchor_a: Vector3,

    /// The anchor point on the second body (in local space)
    pub anchor_b: Vector3,

    /// The slide axis in the first body's local space
    axis: Vector3,

    /// Minimum translation along the axis
    lower_limit: Option<f32>,

    /// Maximum translation along the axis
    upper_limit: Option<f32>,
}

impl SliderJoint {
    pub fn new(anchor_a: Vector3, anchor_b: Vector3, axis: Vector3) -> Self {
        Self {
            anchor_a,
            anchor_b,
            axis: math::normalize_or(axis, Vector3::x()),
            lower_limit: None,
            upper_limit: None,
        }
    }

    pub fn get_axis(&self) -> Vector3 {
        self.axis
    }

    /// Sets the translation limits; either end may be open
    pub fn set_limits(&mut self, lower_limit: Option<f32>, upper_limit: Option<f32>) {
        self.lower_limit = lower_limit;
        self.upper_limit = upper_limit;
    }

    pub fn get_lower_limit(&self) -> Option<f32> {
        self.lower_limit
    }

    pub fn get_upper_limit(&self) -> Option<f32> {
        self.upper_limit
    }

    /// Returns the current translation of anchor B along the axis, relative to anchor A
    pub(crate) fn translation(&self, bodies: &JointBodies<'_>) -> f32 {
        let anchors = bodies.anchors(self.anchor_a, self.anchor_b);
        anchors.separation().dot(&self.world_axis(bodies))
    }

    fn world_axis(&self, bodies: &JointBodies<'_>) -> Vector3 {
        bodies.a.get_rotation() * self.axis
    }

    pub(crate) fn solve_velocity(&self, bodies: &mut JointBodies<'_>, dt: f32) -> f32 {
        let axis = self.world_axis(bodies);
        let anchors = bodies.anchors(self.anchor_a, self.anchor_b);
        let separation = anchors.separation();
        let (t1, t2) = math::orthonormal_basis(axis);

        let mut impulse = 0.0;
        for direction in [t1, t2] {
            let error = separation.dot(&direction);
            impulse += bodies.solve_axis(direction, &anchors, JOINT_BAUMGARTE * error / dt);
        }

        // Relative spin about the axis is left alone
        let relative = bodies.relative_angular_velocity();
        impulse += bodies.solve_angular(axis * axis.dot(&relative));

        impulse
    }

    /// Clamps the translation into the limits by moving the bodies along the axis
    pub(crate) fn solve_position(&self, bodies: &mut JointBodies<'_>) {
        if self.lower_limit.is_none() && self.upper_limit.is_none() {
            return;
        }

        let inv_mass_a = bodies.a.solver_inverse_mass();
        let inv_mass_b = bodies.b.solver_inverse_mass();
        let inv_mass_sum = inv_mass_a + inv_mass_b;
        if inv_mass_sum <= 0.0 {
            return;
        }

        let translation = self.translation(bodies);
        let clamped = translation
            .max(self.lower_limit.unwrap_or(f32::NEG_INFINITY))
            .min(self.upper_limit.unwrap_or(f32::INFINITY));
        let error = clamped - translation;
        if math::approx_zero(error) {
            return;
        }

        let axis = self.world_axis(bodies);
        let correction = axis * (error / inv_mass_sum);
        bodies.a.apply_position_correction(-correction * inv_mass_a);
        bodies.b.apply_position_correction(correction * inv_mass_b);
    }
}
