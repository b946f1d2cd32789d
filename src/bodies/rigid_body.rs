use crate::bodies::{body_flags::BodyFlags, Material, RigidBodyType, ForceType};
use crate::math::{Vector3, Transform, Matrix3, Quaternion, Aabb};
use crate::shapes::Collider;

/// A rigid body for physics simulation
#[derive(Debug, Clone)]
pub struct RigidBody {
    transform: Transform,
    linear_velocity: Vector3,
    angular_velocity: Vector3,
    material: Material,
    collider: Option<Collider>,
    body_type: RigidBodyType,

    mass: f32,
    /// Zero for static, kinematic and massless bodies
    inv_mass: f32,
    inv_inertia_tensor: Matrix3,
    /// `inv_inertia_tensor` rotated into world space
    inv_inertia_tensor_world: Matrix3,

    linear_damping: f32,
    angular_damping: f32,
    flags: BodyFlags,

    /// Time spent below the sleep threshold
    sleeping_time: f32,

    /// Consumed by the next `integrate_forces`
    forces: Vec<ForceType>,

    /// World-space collider bounds, kept in sync with the transform
    aabb: Option<Aabb>,
}

impl RigidBody {
    /// Creates a new rigid body with the given collider and transform
    pub fn new(collider: Collider, transform: Transform, body_type: RigidBodyType) -> Self {
        Self::with_optional_collider(Some(collider), transform, body_type)
    }

    /// Creates a body with no collider; it is simulated but never collides or gets hit by rays
    pub fn new_without_collider(transform: Transform, body_type: RigidBodyType) -> Self {
        Self::with_optional_collider(None, transform, body_type)
    }

    fn with_optional_collider(
        collider: Option<Collider>,
        transform: Transform,
        body_type: RigidBodyType,
    ) -> Self {
        let mut body = Self {
            transform,
            linear_velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            material: Material::default(),
            collider,
            body_type,
            mass: 1.0,
            inv_mass: 0.0,
            inv_inertia_tensor: Matrix3::zeros(),
            inv_inertia_tensor_world: Matrix3::zeros(),
            linear_damping: 0.0,
            angular_damping: 0.0,
            flags: BodyFlags::CAN_SLEEP | BodyFlags::AFFECTED_BY_GRAVITY,
            sleeping_time: 0.0,
            forces: Vec::new(),
            aabb: None,
        };

        body.update_mass_properties();
        body.update_aabb();

        body
    }

    /// Creates a new dynamic rigid body with the given collider and position
    pub fn new_dynamic(collider: Collider, position: Vector3) -> Self {
        Self::new(collider, Transform::from_position(position), RigidBodyType::Dynamic)
    }

    /// Creates a new kinematic rigid body with the given collider and position
    pub fn new_kinematic(collider: Collider, position: Vector3) -> Self {
        Self::new(collider, Transform::from_position(position), RigidBodyType::Kinematic)
    }

    /// Creates a new static rigid body with the given collider and position
    pub fn new_static(collider: Collider, position: Vector3) -> Self {
        Self::new(collider, Transform::from_position(position), RigidBodyType::Static)
    }

    /// Sets the mass, returning the body (builder style)
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.set_mass(mass);
        self
    }

    /// Sets the material, returning the body (builder style)
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Sets the initial linear velocity, returning the body (builder style)
    pub fn with_linear_velocity(mut self, velocity: Vector3) -> Self {
        self.set_linear_velocity(velocity);
        self
    }

    /// Sets the orientation, returning the body (builder style)
    pub fn with_rotation(mut self, rotation: Quaternion) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Returns the body's transform
    pub fn get_transform(&self) -> Transform {
        self.transform
    }

    /// Sets the body's transform
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.update_inertia_tensor_world();
        self.update_aabb();
        self.wake_up();
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector3 {
        self.transform.position
    }

    /// Sets the body's position
    pub fn set_position(&mut self, position: Vector3) {
        self.transform.position = position;
        self.update_aabb();
        self.wake_up();
    }

    /// Returns the body's rotation as a quaternion
    pub fn get_rotation(&self) -> Quaternion {
        self.transform.rotation
    }

    /// Sets the body's rotation as a quaternion
    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.transform.rotation = rotation;
        self.update_inertia_tensor_world();
        self.update_aabb();
        self.wake_up();
    }

    /// Returns the body's linear velocity
    pub fn get_linear_velocity(&self) -> Vector3 {
        self.linear_velocity
    }

    /// Sets the body's linear velocity
    pub fn set_linear_velocity(&mut self, velocity: Vector3) {
        if self.body_type.is_static() {
            return;
        }
        self.linear_velocity = velocity;
        self.wake_up();
    }

    /// Returns the body's angular velocity
    pub fn get_angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    /// Sets the body's angular velocity
    pub fn set_angular_velocity(&mut self, velocity: Vector3) {
        if self.body_type.is_static() {
            return;
        }
        self.angular_velocity = velocity;
        self.wake_up();
    }

    /// Returns the velocity of a point offset by `r` from the body's position
    pub fn get_velocity_at(&self, r: Vector3) -> Vector3 {
        self.linear_velocity + self.angular_velocity.cross(&r)
    }

    /// Returns the body's material
    pub fn get_material(&self) -> &Material {
        &self.material
    }

    /// Sets the body's material
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    /// Returns the body's collider
    pub fn get_collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    /// Replaces the body's collider
    pub fn set_collider(&mut self, collider: Option<Collider>) {
        self.collider = collider;
        self.update_mass_properties();
        self.update_aabb();
    }

    /// Returns whether the body's collider is a trigger volume
    pub fn is_trigger(&self) -> bool {
        self.collider.map_or(false, |c| c.is_trigger())
    }

    /// Returns the cached world-space bounds of the collider
    pub fn get_aabb(&self) -> Option<Aabb> {
        self.aabb
    }

    /// Recomputes the cached world-space bounds from the current transform and collider
    pub fn update_aabb(&mut self) {
        self.aabb = self.collider.map(|c| c.world_bounds(&self.transform));
    }

    /// Returns the body's mass
    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    /// Sets the body's mass (and inverse mass)
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass.max(0.0);
        self.update_mass_properties();
    }

    /// Returns the body's inverse mass
    pub fn get_inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Returns the body's inverse inertia tensor in world space
    pub fn get_inverse_inertia_tensor_world(&self) -> &Matrix3 {
        &self.inv_inertia_tensor_world
    }

    /// Returns the body type
    pub fn get_body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Sets the body type and updates mass properties accordingly
    pub fn set_body_type(&mut self, body_type: RigidBodyType) {
        self.body_type = body_type;
        self.update_mass_properties();

        if body_type != RigidBodyType::Dynamic {
            self.forces.clear();
            self.flags.remove(BodyFlags::SLEEPING);
            self.sleeping_time = 0.0;
        }
        if body_type == RigidBodyType::Static {
            self.linear_velocity = Vector3::zeros();
            self.angular_velocity = Vector3::zeros();
        }
    }

    /// Sets the body's linear damping
    pub fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping.max(0.0);
    }

    /// Returns the body's linear damping
    pub fn get_linear_damping(&self) -> f32 {
        self.linear_damping
    }

    /// Sets the body's angular damping
    pub fn set_angular_damping(&mut self, damping: f32) {
        self.angular_damping = damping.max(0.0);
    }

    /// Returns the body's angular damping
    pub fn get_angular_damping(&self) -> f32 {
        self.angular_damping
    }

    /// Returns whether the body is sleeping
    pub fn is_sleeping(&self) -> bool {
        self.flags.contains(BodyFlags::SLEEPING)
    }

    /// Puts the body to sleep
    pub fn put_to_sleep(&mut self) {
        if self.body_type == RigidBodyType::Dynamic && !self.is_sleeping() {
            self.flags.insert(BodyFlags::SLEEPING);
            self.linear_velocity = Vector3::zeros();
            self.angular_velocity = Vector3::zeros();
            self.forces.clear();
        }
    }

    /// Wakes up the body
    pub fn wake_up(&mut self) {
        if self.is_sleeping() {
            self.flags.remove(BodyFlags::SLEEPING);
        }
        self.sleeping_time = 0.0;
    }

    /// Returns whether the body can sleep
    pub fn can_sleep(&self) -> bool {
        self.flags.contains(BodyFlags::CAN_SLEEP)
    }

    /// Sets whether the body can sleep
    pub fn set_can_sleep(&mut self, can_sleep: bool) {
        self.flags.set(BodyFlags::CAN_SLEEP, can_sleep);
        if !can_sleep {
            self.wake_up();
        }
    }

    /// Returns whether the body is affected by gravity
    pub fn is_affected_by_gravity(&self) -> bool {
        self.flags.contains(BodyFlags::AFFECTED_BY_GRAVITY)
    }

    /// Sets whether the body is affected by gravity
    pub fn set_affected_by_gravity(&mut self, affected: bool) {
        self.flags.set(BodyFlags::AFFECTED_BY_GRAVITY, affected);
    }

    /// Returns the time the body has been inactive
    pub fn get_sleeping_time(&self) -> f32 {
        self.sleeping_time
    }

    pub(crate) fn set_sleeping_time(&mut self, time: f32) {
        self.sleeping_time = time;
    }

    /// Updates the body's mass properties based on its collider and mass
    fn update_mass_properties(&mut self) {
        if self.body_type != RigidBodyType::Dynamic || self.mass <= 0.0 {
            // Infinite mass: nothing moves this body through forces or contacts
            self.inv_mass = 0.0;
            self.inv_inertia_tensor = Matrix3::zeros();
            self.inv_inertia_tensor_world = Matrix3::zeros();
            return;
        }

        self.inv_mass = 1.0 / self.mass;

        let inertia = match &self.collider {
            Some(collider) => collider.get_shape().get_inertia_tensor(self.mass),
            None => Matrix3::from_diagonal_element(self.mass),
        };

        self.inv_inertia_tensor = inertia.try_inverse().unwrap_or_else(Matrix3::zeros);
        self.update_inertia_tensor_world();
    }

    /// Updates the inverse inertia tensor in world space
    fn update_inertia_tensor_world(&mut self) {
        if self.body_type != RigidBodyType::Dynamic {
            self.inv_inertia_tensor_world = Matrix3::zeros();
            return;
        }

        // R * inv_I * R^T
        let rotation = self.transform.rotation.to_rotation_matrix();
        let rotation = rotation.matrix();
        self.inv_inertia_tensor_world = rotation * self.inv_inertia_tensor * rotation.transpose();
    }

    fn queue_force(&mut self, force: ForceType) {
        if self.body_type == RigidBodyType::Dynamic {
            self.wake_up();
            self.forces.push(force);
        }
    }

    /// Queues a force at the center of mass for the next step
    pub fn add_force(&mut self, force: Vector3) {
        self.queue_force(ForceType::Force(force));
    }

    /// Queues a force applied at a world-space point for the next step
    pub fn add_force_at_point(&mut self, force: Vector3, point: Vector3) {
        self.queue_force(ForceType::ForceAtPoint { force, point });
    }

    /// Queues a torque for the next step
    pub fn add_torque(&mut self, torque: Vector3) {
        self.queue_force(ForceType::Torque(torque));
    }

    /// Queues an impulse at the center of mass for the next step
    pub fn add_impulse(&mut self, impulse: Vector3) {
        self.queue_force(ForceType::Impulse(impulse));
    }

    /// Queues an impulse applied at a world-space point for the next step
    pub fn add_impulse_at_point(&mut self, impulse: Vector3, point: Vector3) {
        self.queue_force(ForceType::ImpulseAtPoint { impulse, point });
    }

    /// Queues an angular impulse for the next step
    pub fn add_angular_impulse(&mut self, impulse: Vector3) {
        self.queue_force(ForceType::AngularImpulse(impulse));
    }

    /// Returns the forces queued for the next step
    pub fn get_pending_forces(&self) -> &[ForceType] {
        &self.forces
    }

    /// Drops all queued forces and impulses
    pub fn clear_forces(&mut self) {
        self.forces.clear();
    }

    /// Integrates gravity, queued forces and damping into velocities
    pub(crate) fn integrate_forces(
        &mut self,
        dt: f32,
        gravity: Vector3,
        linear_damping: f32,
        angular_damping: f32,
    ) {
        if self.body_type != RigidBodyType::Dynamic || self.is_sleeping() {
            return;
        }

        if self.is_affected_by_gravity() {
            self.linear_velocity += gravity * dt;
        }

        for force in &self.forces {
            match *force {
                ForceType::Force(force) => {
                    self.linear_velocity += force * self.inv_mass * dt;
                }
                ForceType::ForceAtPoint { force, point } => {
                    self.linear_velocity += force * self.inv_mass * dt;

                    // τ = r × F
                    let torque = (point - self.transform.position).cross(&force);
                    self.angular_velocity += self.inv_inertia_tensor_world * torque * dt;
                }
                ForceType::Torque(torque) => {
                    self.angular_velocity += self.inv_inertia_tensor_world * torque * dt;
                }
                ForceType::Impulse(impulse) => {
                    self.linear_velocity += impulse * self.inv_mass;
                }
                ForceType::ImpulseAtPoint { impulse, point } => {
                    self.linear_velocity += impulse * self.inv_mass;

                    let angular_impulse = (point - self.transform.position).cross(&impulse);
                    self.angular_velocity += self.inv_inertia_tensor_world * angular_impulse;
                }
                ForceType::AngularImpulse(impulse) => {
                    self.angular_velocity += self.inv_inertia_tensor_world * impulse;
                }
            }
        }

        let linear_factor = 1.0 / (1.0 + dt * (self.linear_damping + linear_damping));
        let angular_factor = 1.0 / (1.0 + dt * (self.angular_damping + angular_damping));
        self.linear_velocity *= linear_factor;
        self.angular_velocity *= angular_factor;
    }

    /// Integrates velocities to update the pose. Dynamic bodies move when awake; kinematic
    /// bodies follow their assigned velocity; static bodies never move.
    pub(crate) fn integrate_velocity(&mut self, dt: f32) {
        let moves = match self.body_type {
            RigidBodyType::Dynamic => !self.is_sleeping(),
            RigidBodyType::Kinematic => true,
            RigidBodyType::Static => false,
        };
        if !moves {
            return;
        }

        self.transform.position += self.linear_velocity * dt;

        if let Some(axis) = self.angular_velocity.try_normalize(crate::math::EPSILON) {
            let angle = self.angular_velocity.norm() * dt;
            let rotation = Quaternion::from_axis_angle(&nalgebra::Unit::new_unchecked(axis), angle);
            self.transform.rotation = Quaternion::new_normalize((rotation * self.transform.rotation).into_inner());
            self.update_inertia_tensor_world();
        }

        self.update_aabb();
    }

    /// Inverse mass as seen by the solvers: sleeping bodies behave as immovable
    #[inline]
    pub(crate) fn solver_inverse_mass(&self) -> f32 {
        if self.is_sleeping() { 0.0 } else { self.inv_mass }
    }

    /// World inverse inertia as seen by the solvers
    #[inline]
    pub(crate) fn solver_inverse_inertia(&self) -> Matrix3 {
        if self.is_sleeping() { Matrix3::zeros() } else { self.inv_inertia_tensor_world }
    }

    /// Applies an impulse at offset `r` from the centre of mass immediately
    pub(crate) fn apply_solver_impulse(&mut self, impulse: Vector3, r: Vector3) {
        if self.body_type != RigidBodyType::Dynamic || self.is_sleeping() {
            return;
        }
        self.linear_velocity += impulse * self.inv_mass;
        self.angular_velocity += self.inv_inertia_tensor_world * r.cross(&impulse);
    }

    /// Applies an angular impulse immediately
    pub(crate) fn apply_solver_angular_impulse(&mut self, impulse: Vector3) {
        if self.body_type != RigidBodyType::Dynamic || self.is_sleeping() {
            return;
        }
        self.angular_velocity += self.inv_inertia_tensor_world * impulse;
    }

    /// Moves the body by `delta` as part of position correction
    pub(crate) fn apply_position_correction(&mut self, delta: Vector3) {
        if self.body_type != RigidBodyType::Dynamic || self.is_sleeping() {
            return;
        }
        self.transform.position += delta;
        self.update_aabb();
    }
}
