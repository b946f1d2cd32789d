use crate::constraints::constraint::{JointBodies, JOINT_BAUMGARTE};
use std::f32::consts::{PI, TAU};

use crate::math::{self, Vector3, EPSILON};

/// Angular motor driving a hinge toward a target relative speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HingeMotor {
    /// The target velocity of the motor (in radians per second)
    pub target_velocity: f32,

    /// The maximum torque that the motor can apply
    pub max_torque: f32,
}

/// A hinge keeps the anchors together and lets the bodies rotate about one shared axis
#[derive(Debug, Clone, PartialEq)]
pub struct HingeJoint {
    /// The anchor point on the first body (in local space)
    pub anchor_a: Vector3,

    /// The anchor point on the second body (in local space)
    pub anchor_b: Vector3,

    /// The hinge axis in the first body's local space
    axis_a: Vector3,

    /// The hinge axis in the second body's local space
    axis_b: Vector3,

    /// Angle limits (lower, upper) in radians. The motor brakes at a limit instead of
    /// driving past it; no impulse enforces them otherwise.
    limits: Option<(f32, f32)>,

    motor: Option<HingeMotor>,

    /// Local vectors perpendicular to the axis on each body, used to measure the angle
    reference: Option<(Vector3, Vector3)>,

    /// Angle accumulated over all steps, so it keeps counting past half a turn
    current_angle: f32,

    /// Last raw angle in (-pi, pi], used to unwrap the next measurement
    measured_angle: f32,

    /// The motor impulse accumulated during the current step
    motor_impulse: f32,
}

impl HingeJoint {
    /// Creates a hinge whose axis is given in both bodies' local space
    pub fn new(anchor_a: Vector3, anchor_b: Vector3, axis: Vector3) -> Self {
        Self::with_axes(anchor_a, anchor_b, axis, axis)
    }

    /// Creates a hinge with a separate local axis per body
    pub fn with_axes(anchor_a: Vector3, anchor_b: Vector3, axis_a: Vector3, axis_b: Vector3) -> Self {
        Self {
            anchor_a,
            anchor_b,
            axis_a: math::normalize_or(axis_a, Vector3::y()),
            axis_b: math::normalize_or(axis_b, Vector3::y()),
            limits: None,
            motor: None,
            reference: None,
            current_angle: 0.0,
            measured_angle: 0.0,
            motor_impulse: 0.0,
        }
    }

    pub fn get_axis_a(&self) -> Vector3 {
        self.axis_a
    }

    pub fn get_axis_b(&self) -> Vector3 {
        self.axis_b
    }

    /// Sets the limits for the rotation
    pub fn set_limits(&mut self, lower_limit: f32, upper_limit: f32) {
        self.limits = Some((lower_limit.min(upper_limit), lower_limit.max(upper_limit)));
    }

    /// Disables the limits for the rotation
    pub fn disable_limits(&mut self) {
        self.limits = None;
    }

    /// Returns the (lower, upper) limits if enabled
    pub fn get_limits(&self) -> Option<(f32, f32)> {
        self.limits
    }

    /// Enables the motor
    pub fn enable_motor(&mut self, target_velocity: f32, max_torque: f32) {
        self.motor = Some(HingeMotor {
            target_velocity,
            max_torque: max_torque.max(0.0),
        });
    }

    /// Disables the motor
    pub fn disable_motor(&mut self) {
        self.motor = None;
    }

    pub fn get_motor(&self) -> Option<HingeMotor> {
        self.motor
    }

    /// Returns the angle of B about the axis relative to the pose at the first solve
    pub fn get_angle(&self) -> f32 {
        self.current_angle
    }

    /// Returns whether the current angle lies outside the limits
    pub fn is_at_limit(&self) -> bool {
        self.limits
            .map_or(false, |(lower, upper)| self.current_angle <= lower || self.current_angle >= upper)
    }

    pub(crate) fn prepare(&mut self, bodies: &JointBodies<'_>) {
        self.motor_impulse = 0.0;

        let rotation_a = bodies.a.get_rotation();
        let rotation_b = bodies.b.get_rotation();
        let world_axis = rotation_a * self.axis_a;

        let (ref_a, ref_b) = *self.reference.get_or_insert_with(|| {
            let (perpendicular, _) = math::orthonormal_basis(world_axis);
            (
                rotation_a.inverse() * perpendicular,
                rotation_b.inverse() * perpendicular,
            )
        });

        let perp_a = rotation_a * ref_a;
        let perp_b = rotation_b * ref_b;
        let measured = perp_a.cross(&perp_b).dot(&world_axis).atan2(perp_a.dot(&perp_b));

        let mut delta = measured - self.measured_angle;
        if delta > PI {
            delta -= TAU;
        } else if delta < -PI {
            delta += TAU;
        }
        self.current_angle += delta;
        self.measured_angle = measured;
    }

    pub(crate) fn solve_velocity(&mut self, bodies: &mut JointBodies<'_>, dt: f32) -> f32 {
        let anchors = bodies.anchors(self.anchor_a, self.anchor_b);
        let mut impulse = bodies.solve_point(&anchors, JOINT_BAUMGARTE, dt);

        // Only rotation about the hinge axis survives; misalignment is steered back
        let axis_a = bodies.a.get_rotation() * self.axis_a;
        let axis_b = bodies.b.get_rotation() * self.axis_b;
        let relative = bodies.relative_angular_velocity();
        let axial = axis_a * axis_a.dot(&relative);
        let correction = axis_b.cross(&axis_a) * (JOINT_BAUMGARTE / dt);
        impulse += bodies.solve_angular(axial + correction);

        if let Some(motor) = self.motor {
            impulse += self.drive_motor(bodies, motor, axis_a, dt);
        }

        impulse
    }

    fn drive_motor(&mut self, bodies: &mut JointBodies<'_>, motor: HingeMotor, axis: Vector3, dt: f32) -> f32 {
        // At a limit the motor may only pull back inside or hold still
        let target = match self.limits {
            Some((_, upper)) if self.current_angle >= upper => motor.target_velocity.min(0.0),
            Some((lower, _)) if self.current_angle <= lower => motor.target_velocity.max(0.0),
            _ => motor.target_velocity,
        };

        let k = axis.dot(&(bodies.angular_mass_matrix() * axis));
        if k <= EPSILON {
            return 0.0;
        }

        let speed = axis.dot(&bodies.relative_angular_velocity());
        let max_impulse = motor.max_torque * dt;

        let previous = self.motor_impulse;
        self.motor_impulse = (previous + (target - speed) / k).clamp(-max_impulse, max_impulse);
        let lambda = self.motor_impulse - previous;

        bodies.apply_angular_impulse(axis * lambda);
        lambda.abs()
    }
}
