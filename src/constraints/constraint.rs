use tracing::debug;

use crate::bodies::RigidBody;
use crate::constraints::{
    BallSocketJoint, DistanceJoint, FixedJoint, HingeJoint, SliderJoint, SpringJoint,
};
use crate::core::{BodyHandle, BodyStorage};
use crate::math::{Matrix3, Vector3, EPSILON};

/// Joint-specific data of a [`Constraint`]
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    Distance(DistanceJoint),
    BallSocket(BallSocketJoint),
    Hinge(HingeJoint),
    Slider(SliderJoint),
    Fixed(FixedJoint),
    Spring(SpringJoint),
}

impl ConstraintKind {
    /// Returns the name of the joint type
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::Distance(_) => "Distance",
            ConstraintKind::BallSocket(_) => "BallSocket",
            ConstraintKind::Hinge(_) => "Hinge",
            ConstraintKind::Slider(_) => "Slider",
            ConstraintKind::Fixed(_) => "Fixed",
            ConstraintKind::Spring(_) => "Spring",
        }
    }
}

/// A joint between two bodies
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    body_a: BodyHandle,
    body_b: BodyHandle,
    enabled: bool,

    /// Force above which the constraint breaks; zero means unbreakable
    break_force: f32,

    broken: bool,

    /// Force the constraint applied during the last solved step
    applied_force: f32,

    /// Sum of impulse magnitudes applied during the current step
    step_impulse: f32,

    kind: ConstraintKind,
}

impl Constraint {
    /// Creates an enabled, unbreakable constraint
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, kind: ConstraintKind) -> Self {
        Self {
            body_a,
            body_b,
            enabled: true,
            break_force: 0.0,
            broken: false,
            applied_force: 0.0,
            step_impulse: 0.0,
            kind,
        }
    }

    /// Keeps two anchor points at a fixed distance
    pub fn distance(
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor_a: Vector3,
        anchor_b: Vector3,
        rest_length: f32,
    ) -> Self {
        Self::new(body_a, body_b, ConstraintKind::Distance(DistanceJoint::new(anchor_a, anchor_b, rest_length)))
    }

    /// Pins two anchor points together
    pub fn ball_socket(body_a: BodyHandle, body_b: BodyHandle, anchor_a: Vector3, anchor_b: Vector3) -> Self {
        Self::new(body_a, body_b, ConstraintKind::BallSocket(BallSocketJoint::new(anchor_a, anchor_b)))
    }

    /// Pins two anchor points together and allows rotation about one shared axis
    pub fn hinge(
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor_a: Vector3,
        anchor_b: Vector3,
        axis: Vector3,
    ) -> Self {
        Self::new(body_a, body_b, ConstraintKind::Hinge(HingeJoint::new(anchor_a, anchor_b, axis)))
    }

    /// Allows translation along an axis fixed in body A
    pub fn slider(
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor_a: Vector3,
        anchor_b: Vector3,
        axis: Vector3,
    ) -> Self {
        Self::new(body_a, body_b, ConstraintKind::Slider(SliderJoint::new(anchor_a, anchor_b, axis)))
    }

    /// Locks relative position and orientation
    pub fn fixed(body_a: BodyHandle, body_b: BodyHandle, anchor_a: Vector3, anchor_b: Vector3) -> Self {
        Self::new(body_a, body_b, ConstraintKind::Fixed(FixedJoint::new(anchor_a, anchor_b)))
    }

    /// Damped spring between two anchor points
    pub fn spring(
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor_a: Vector3,
        anchor_b: Vector3,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    ) -> Self {
        Self::new(
            body_a,
            body_b,
            ConstraintKind::Spring(SpringJoint::new(anchor_a, anchor_b, rest_length, stiffness, damping)),
        )
    }

    /// Sets the break force, returning the constraint (builder style)
    pub fn with_break_force(mut self, break_force: f32) -> Self {
        self.set_break_force(break_force);
        self
    }

    /// Returns the name of the joint type
    pub fn constraint_type(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns the two bodies joined by this constraint
    pub fn get_bodies(&self) -> (BodyHandle, BodyHandle) {
        (self.body_a, self.body_b)
    }

    /// Checks if the constraint involves a specific body
    pub fn involves_body(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ConstraintKind {
        &mut self.kind
    }

    /// Returns whether the constraint is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets whether the constraint is enabled
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn get_break_force(&self) -> f32 {
        self.break_force
    }

    pub fn set_break_force(&mut self, break_force: f32) {
        self.break_force = break_force.max(0.0);
    }

    /// Returns whether the constraint exceeded its break force
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Returns the force applied during the last solved step
    pub fn get_applied_force(&self) -> f32 {
        self.applied_force
    }

    /// Enabled and not broken
    pub fn is_active(&self) -> bool {
        self.enabled && !self.broken
    }

    /// Whether this constraint takes part in the velocity iterations
    pub(crate) fn is_rigid(&self) -> bool {
        !matches!(self.kind, ConstraintKind::Spring(_))
    }

    /// Starts a step: resets per-step accumulators and applies spring forces
    pub(crate) fn prepare(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) {
        self.step_impulse = 0.0;
        if !self.is_active() {
            return;
        }

        let Some(mut pair) = JointBodies::fetch(bodies, self.body_a, self.body_b) else {
            return;
        };

        match &mut self.kind {
            ConstraintKind::Spring(spring) => {
                let force = spring.apply(&mut pair, dt);
                self.step_impulse = force * dt;
            }
            ConstraintKind::Hinge(hinge) => hinge.prepare(&pair),
            ConstraintKind::Fixed(fixed) => fixed.prepare(&pair),
            _ => {}
        }
    }

    /// Runs one velocity iteration
    pub(crate) fn solve_velocity(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) {
        if !self.is_active() || dt <= 0.0 {
            return;
        }

        let Some(mut pair) = JointBodies::fetch(bodies, self.body_a, self.body_b) else {
            return;
        };

        let impulse = match &mut self.kind {
            ConstraintKind::Distance(joint) => joint.solve_velocity(&mut pair, dt),
            ConstraintKind::BallSocket(joint) => joint.solve_velocity(&mut pair, dt),
            ConstraintKind::Hinge(joint) => joint.solve_velocity(&mut pair, dt),
            ConstraintKind::Slider(joint) => joint.solve_velocity(&mut pair, dt),
            ConstraintKind::Fixed(joint) => joint.solve_velocity(&mut pair, dt),
            ConstraintKind::Spring(_) => 0.0,
        };

        self.step_impulse += impulse;
    }

    /// Runs one position iteration
    pub(crate) fn solve_position(&mut self, bodies: &mut BodyStorage<RigidBody>) {
        if !self.is_active() {
            return;
        }

        let Some(mut pair) = JointBodies::fetch(bodies, self.body_a, self.body_b) else {
            return;
        };

        if let ConstraintKind::Slider(slider) = &mut self.kind {
            slider.solve_position(&mut pair);
        }
    }

    /// Ends a step: records the applied force and checks the break threshold
    pub(crate) fn finish(&mut self, dt: f32) {
        if !self.is_active() || dt <= 0.0 {
            return;
        }

        self.applied_force = self.step_impulse / dt;

        if self.break_force > 0.0 && self.applied_force > self.break_force {
            self.broken = true;
            debug!(
                kind = self.kind.name(),
                applied_force = self.applied_force,
                break_force = self.break_force,
                "constraint broke"
            );
        }
    }
}

/// World-space anchor data for one solver pass
#[derive(Debug, Clone, Copy)]
pub(crate) struct Anchors {
    /// Anchor on A relative to A's centre
    pub ra: Vector3,
    /// Anchor on B relative to B's centre
    pub rb: Vector3,
    /// Anchor on A in world space
    pub pa: Vector3,
    /// Anchor on B in world space
    pub pb: Vector3,
}

impl Anchors {
    /// World vector from anchor A to anchor B
    pub fn separation(&self) -> Vector3 {
        self.pb - self.pa
    }
}

/// Both bodies of a joint, borrowed for one solver pass
pub(crate) struct JointBodies<'a> {
    pub a: &'a mut RigidBody,
    pub b: &'a mut RigidBody,
}

impl<'a> JointBodies<'a> {
    pub fn fetch(
        bodies: &'a mut BodyStorage<RigidBody>,
        body_a: BodyHandle,
        body_b: BodyHandle,
    ) -> Option<Self> {
        bodies.get_pair_mut(body_a, body_b).map(|(a, b)| Self { a, b })
    }

    pub fn anchors(&self, local_a: Vector3, local_b: Vector3) -> Anchors {
        let pa = self.a.get_transform().transform_point(local_a);
        let pb = self.b.get_transform().transform_point(local_b);
        Anchors {
            ra: pa - self.a.get_position(),
            rb: pb - self.b.get_position(),
            pa,
            pb,
        }
    }

    /// Velocity of anchor B relative to anchor A
    pub fn relative_velocity(&self, anchors: &Anchors) -> Vector3 {
        self.b.get_velocity_at(anchors.rb) - self.a.get_velocity_at(anchors.ra)
    }

    pub fn relative_angular_velocity(&self) -> Vector3 {
        self.b.get_angular_velocity() - self.a.get_angular_velocity()
    }

    /// Applies `impulse` to B and its opposite to A at the anchors
    pub fn apply_impulse(&mut self, impulse: Vector3, anchors: &Anchors) {
        self.a.apply_solver_impulse(-impulse, anchors.ra);
        self.b.apply_solver_impulse(impulse, anchors.rb);
    }

    /// Applies `impulse` to B and its opposite to A at the centres of mass
    pub fn apply_linear_impulse(&mut self, impulse: Vector3) {
        self.a.apply_solver_impulse(-impulse, Vector3::zeros());
        self.b.apply_solver_impulse(impulse, Vector3::zeros());
    }

    pub fn apply_angular_impulse(&mut self, impulse: Vector3) {
        self.a.apply_solver_angular_impulse(-impulse);
        self.b.apply_solver_angular_impulse(impulse);
    }

    pub fn inverse_mass_sum(&self) -> f32 {
        self.a.solver_inverse_mass() + self.b.solver_inverse_mass()
    }

    /// Effective mass denominator of a 1-D constraint along `direction` at the anchors
    pub fn effective_mass_along(&self, direction: Vector3, anchors: &Anchors) -> f32 {
        let ra_n = anchors.ra.cross(&direction);
        let rb_n = anchors.rb.cross(&direction);
        self.inverse_mass_sum()
            + ra_n.dot(&(self.a.solver_inverse_inertia() * ra_n))
            + rb_n.dot(&(self.b.solver_inverse_inertia() * rb_n))
    }

    /// K = (mA + mB) I - [ra]x IA [ra]x - [rb]x IB [rb]x
    pub fn point_mass_matrix(&self, anchors: &Anchors) -> Matrix3 {
        let ra = anchors.ra.cross_matrix();
        let rb = anchors.rb.cross_matrix();
        Matrix3::identity() * self.inverse_mass_sum()
            - ra * self.a.solver_inverse_inertia() * ra
            - rb * self.b.solver_inverse_inertia() * rb
    }

    pub fn angular_mass_matrix(&self) -> Matrix3 {
        self.a.solver_inverse_inertia() + self.b.solver_inverse_inertia()
    }

    /// Solves a 1-D velocity constraint along `direction`, returning |λ|
    pub fn solve_axis(&mut self, direction: Vector3, anchors: &Anchors, bias: f32) -> f32 {
        let k = self.effective_mass_along(direction, anchors);
        if k <= EPSILON {
            return 0.0;
        }

        let velocity = self.relative_velocity(anchors).dot(&direction);
        let lambda = -(velocity + bias) / k;
        self.apply_impulse(direction * lambda, anchors);
        lambda.abs()
    }

    /// Solves the 3-DOF point constraint, returning |λ|
    pub fn solve_point(&mut self, anchors: &Anchors, baumgarte: f32, dt: f32) -> f32 {
        let Some(inverse_k) = self.point_mass_matrix(anchors).try_inverse() else {
            return 0.0;
        };

        let bias = anchors.separation() * (baumgarte / dt);
        let lambda = inverse_k * -(self.relative_velocity(anchors) + bias);
        self.apply_impulse(lambda, anchors);
        lambda.norm()
    }

    /// Drives the relative angular velocity to `target`, returning |λ|
    pub fn solve_angular(&mut self, target: Vector3) -> f32 {
        let Some(inverse_k) = self.angular_mass_matrix().try_inverse() else {
            return 0.0;
        };

        let lambda = inverse_k * (target - self.relative_angular_velocity());
        self.apply_angular_impulse(lambda);
        lambda.norm()
    }
}

/// Baumgarte factor used by every rigid joint
pub(crate) const JOINT_BAUMGARTE: f32 = 0.2;
