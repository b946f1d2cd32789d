use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use crate::bodies::{RigidBody, RigidBodyType};
use crate::collision::{
    BroadPhase, BruteForceBroadPhase, CollisionInfo, CollisionMask, CollisionPair, ContactSolver,
    NarrowPhase, SequentialImpulseSolver,
};
use crate::constraints::ConstraintManager;
use crate::core::{BodyHandle, BodyStorage, EventQueue, PhysicsEvent, SimulationConfig, Storage};
use crate::error::PhysicsError;
use crate::math::{Aabb, Transform, Vector3};
use crate::query::PhysicsRaycaster;
use crate::shapes::Shape;
use crate::Result;

/// Invoked once per non-trigger collision per step
pub type CollisionCallback = Box<dyn FnMut(&CollisionInfo)>;

/// Invoked when a trigger pair starts or stops overlapping
pub type TriggerCallback = Box<dyn FnMut(BodyHandle, BodyHandle)>;

/// The physics world: owns the bodies and advances the simulation in fixed steps
pub struct PhysicsWorld {
    /// All rigid bodies in the world
    bodies: BodyStorage<RigidBody>,

    /// Configuration for the simulation
    config: SimulationConfig,

    broad_phase: Box<dyn BroadPhase>,
    narrow_phase: NarrowPhase,
    contact_solver: SequentialImpulseSolver,

    /// Non-trigger collisions found in the last step
    collisions: Vec<CollisionInfo>,

    /// Trigger pairs currently overlapping
    trigger_pairs: BTreeSet<CollisionPair>,

    /// Queue of physics events since the last step began
    events: EventQueue,

    collision_callback: Option<CollisionCallback>,
    trigger_enter_callback: Option<TriggerCallback>,
    trigger_exit_callback: Option<TriggerCallback>,

    /// Time not yet consumed by fixed steps
    accumulator: f32,

    /// The total elapsed simulation time
    time: f32,
}

impl PhysicsWorld {
    /// Creates a new physics world with default settings
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates a new physics world with the given configuration. An invalid configuration
    /// is replaced by the defaults.
    pub fn with_config(config: SimulationConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(_) => {
                warn!("using default simulation config");
                SimulationConfig::default()
            }
        };

        Self {
            bodies: BodyStorage::new(),
            contact_solver: SequentialImpulseSolver::from_config(&config),
            config,
            broad_phase: Box::new(BruteForceBroadPhase::new()),
            narrow_phase: NarrowPhase::new(),
            collisions: Vec::new(),
            trigger_pairs: BTreeSet::new(),
            events: EventQueue::new(),
            collision_callback: None,
            trigger_enter_callback: None,
            trigger_exit_callback: None,
            accumulator: 0.0,
            time: 0.0,
        }
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> f32 {
        self.time
    }

    /// Sets the gravity for the simulation
    pub fn set_gravity(&mut self, gravity: Vector3) {
        self.config.gravity = gravity;
    }

    /// Gets the current gravity
    pub fn get_gravity(&self) -> Vector3 {
        self.config.gravity
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replaces the configuration after validating it
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<()> {
        config.validate()?;
        self.contact_solver = SequentialImpulseSolver::from_config(&config);
        self.config = config;
        Ok(())
    }

    /// Returns the shape-pair dispatch table
    pub fn narrow_phase(&self) -> &NarrowPhase {
        &self.narrow_phase
    }

    /// Returns the dispatch table for registering extra shape-pair routines
    pub fn narrow_phase_mut(&mut self) -> &mut NarrowPhase {
        &mut self.narrow_phase
    }

    /// Adds a rigid body to the world and returns its handle
    pub fn add_body(&mut self, mut body: RigidBody) -> BodyHandle {
        body.update_aabb();
        let body_type = body.get_body_type();
        let handle = self.bodies.add(body);

        debug!(?handle, ?body_type, "body added");
        self.events.push(PhysicsEvent::Added(handle));

        handle
    }

    /// Removes a rigid body from the world. Its trigger pairs are dropped without exit events.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        let body = self.bodies.remove(handle).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle))
        })?;

        self.trigger_pairs.retain(|pair| !pair.contains(handle));
        self.collisions.retain(|collision| !collision.involves(handle));

        debug!(?handle, "body removed");
        self.events.push(PhysicsEvent::Removed(handle));

        Ok(body)
    }

    /// Gets a reference to a rigid body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies.get_body(handle)
    }

    /// Gets a mutable reference to a rigid body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies.get_body_mut(handle)
    }

    /// Returns whether the handle refers to a body in this world
    pub fn contains_body(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    /// Iterates over all bodies
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.bodies.iter()
    }

    /// Gives the body storage to code that solves against it directly
    pub fn body_storage_mut(&mut self) -> &mut BodyStorage<RigidBody> {
        &mut self.bodies
    }

    /// Gets the transform of a rigid body
    pub fn get_transform(&self, handle: BodyHandle) -> Result<Transform> {
        Ok(self.bodies.get_body(handle)?.get_transform())
    }

    /// Sets the transform of a rigid body, waking it
    pub fn set_transform(&mut self, handle: BodyHandle, transform: Transform) -> Result<()> {
        self.bodies.get_body_mut(handle)?.set_transform(transform);
        Ok(())
    }

    /// Non-trigger collisions found during the last step
    pub fn collisions(&self) -> &[CollisionInfo] {
        &self.collisions
    }

    /// Trigger pairs currently overlapping
    pub fn active_triggers(&self) -> impl Iterator<Item = &CollisionPair> {
        self.trigger_pairs.iter()
    }

    /// Returns whether the two bodies form a trigger pair that is currently overlapping
    pub fn is_trigger_active(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.trigger_pairs.contains(&CollisionPair::new(a, b))
    }

    /// Returns a reference to the event queue
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn get_events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    pub fn set_collision_callback(&mut self, callback: impl FnMut(&CollisionInfo) + 'static) {
        self.collision_callback = Some(Box::new(callback));
    }

    pub fn set_trigger_enter_callback(&mut self, callback: impl FnMut(BodyHandle, BodyHandle) + 'static) {
        self.trigger_enter_callback = Some(Box::new(callback));
    }

    pub fn set_trigger_exit_callback(&mut self, callback: impl FnMut(BodyHandle, BodyHandle) + 'static) {
        self.trigger_exit_callback = Some(Box::new(callback));
    }

    /// Drops all registered callbacks
    pub fn clear_callbacks(&mut self) {
        self.collision_callback = None;
        self.trigger_enter_callback = None;
        self.trigger_exit_callback = None;
    }

    /// Clears the world of all bodies, contacts and events
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.collisions.clear();
        self.trigger_pairs.clear();
        self.events.clear();
        self.accumulator = 0.0;
        self.time = 0.0;
    }

    /// Returns the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advances the simulation by `elapsed` seconds in fixed steps of `time_step`, running
    /// at most `max_substeps` of them. Returns the number of steps taken.
    pub fn step(&mut self, elapsed: f32) -> u32 {
        self.step_internal(elapsed, None)
    }

    /// Like [`step`](Self::step), also solving the constraints of `constraints`
    pub fn step_with_constraints(&mut self, elapsed: f32, constraints: &mut ConstraintManager) -> u32 {
        self.step_internal(elapsed, Some(constraints))
    }

    fn step_internal(&mut self, elapsed: f32, mut constraints: Option<&mut ConstraintManager>) -> u32 {
        if !(elapsed > 0.0) {
            warn!(elapsed, "ignoring step with non-positive elapsed time");
            return 0;
        }

        self.events.clear();
        self.accumulator += elapsed;

        let dt = self.config.time_step;
        let mut steps = 0;
        while self.accumulator >= dt && steps < self.config.max_substeps {
            self.run_step(dt, constraints.as_deref_mut());
            self.accumulator -= dt;
            steps += 1;
        }

        // Backlog beyond max_substeps is discarded
        if steps == self.config.max_substeps && self.accumulator >= dt {
            trace!(backlog = self.accumulator, "dropping unsimulated time");
            self.accumulator = 0.0;
        }

        steps
    }

    /// Advances the simulation by exactly `dt`
    pub fn fixed_step(&mut self, dt: f32) {
        self.events.clear();
        self.run_step(dt, None);
    }

    /// Advances the simulation by exactly `dt`, solving `constraints` together with contacts
    pub fn fixed_step_with_constraints(&mut self, dt: f32, constraints: &mut ConstraintManager) {
        self.events.clear();
        self.run_step(dt, Some(constraints));
    }

    fn run_step(&mut self, dt: f32, mut constraints: Option<&mut ConstraintManager>) {
        if !(dt > 0.0) {
            warn!(dt, "ignoring fixed step with non-positive dt");
            return;
        }

        // Forces, gravity and damping into velocities
        for (_, body) in self.bodies.iter_mut() {
            body.integrate_forces(dt, self.config.gravity, self.config.linear_damping, self.config.angular_damping);
        }

        if let Some(manager) = constraints.as_deref() {
            self.wake_jointed_bodies(manager);
        }

        for (_, body) in self.bodies.iter_mut() {
            body.update_aabb();
        }

        let pairs = {
            let proxies: Vec<(BodyHandle, &RigidBody)> = self.bodies.iter().collect();
            self.broad_phase.update(&proxies);
            self.broad_phase.get_collision_pairs()
        };

        self.detect_collisions(&pairs);

        self.contact_solver.prepare(&self.collisions, &self.bodies);
        if let Some(manager) = constraints.as_deref_mut() {
            manager.prepare(&mut self.bodies, dt);
        }

        for _ in 0..self.config.velocity_iterations {
            self.contact_solver.solve_velocity(&self.collisions, &mut self.bodies);
            if let Some(manager) = constraints.as_deref_mut() {
                manager.solve_velocity(&mut self.bodies, dt);
            }
        }

        for (_, body) in self.bodies.iter_mut() {
            body.integrate_velocity(dt);
        }

        for _ in 0..self.config.position_iterations {
            self.contact_solver.solve_position(&self.collisions, &mut self.bodies);
            if let Some(manager) = constraints.as_deref_mut() {
                manager.solve_position(&mut self.bodies);
            }
        }

        if let Some(manager) = constraints.as_deref_mut() {
            manager.finish(dt);
        }

        self.update_sleeping(dt);

        for (_, body) in self.bodies.iter_mut() {
            body.clear_forces();
        }

        self.time += dt;

        trace!(
            bodies = self.bodies.len(),
            pairs = pairs.len(),
            collisions = self.collisions.len(),
            triggers = self.trigger_pairs.len(),
            "step complete"
        );
    }

    /// Narrowphase over the broadphase pairs: fills `collisions`, tracks trigger pairs and
    /// wakes sleeping bodies hit by moving ones
    fn detect_collisions(&mut self, pairs: &[CollisionPair]) {
        self.collisions.clear();

        for pair in pairs {
            let (body_a, body_b) = match self.bodies.get_pair(pair.body_a, pair.body_b) {
                Some(bodies) => bodies,
                None => continue,
            };

            let (collider_a, collider_b) = match (body_a.get_collider(), body_b.get_collider()) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };

            let manifold = self.narrow_phase.collide(
                collider_a.get_shape(),
                &collider_a.world_transform(&body_a.get_transform()),
                collider_b.get_shape(),
                &collider_b.world_transform(&body_b.get_transform()),
            );

            let manifold = match manifold {
                Some(manifold) => manifold,
                None => continue,
            };

            if collider_a.is_trigger() || collider_b.is_trigger() {
                if self.trigger_pairs.insert(*pair) {
                    self.events.push(PhysicsEvent::TriggerEnter { body_a: pair.body_a, body_b: pair.body_b });
                    if let Some(callback) = self.trigger_enter_callback.as_mut() {
                        callback(pair.body_a, pair.body_b);
                    }
                }
                continue;
            }

            self.collisions.push(manifold.into_collision(pair.body_a, pair.body_b));
        }

        // Tracked trigger pairs whose bounds no longer overlap have ended
        let current: BTreeSet<CollisionPair> = pairs.iter().copied().collect();
        let exited: Vec<CollisionPair> = self.trigger_pairs.difference(&current).copied().collect();
        for pair in exited {
            self.trigger_pairs.remove(&pair);
            self.events.push(PhysicsEvent::TriggerExit { body_a: pair.body_a, body_b: pair.body_b });
            if let Some(callback) = self.trigger_exit_callback.as_mut() {
                callback(pair.body_a, pair.body_b);
            }
        }

        self.wake_touched_bodies();

        if let Some(callback) = self.collision_callback.as_mut() {
            for collision in &self.collisions {
                callback(collision);
            }
        }
    }

    /// A sleeping body touched by an awake body moving faster than the sleep threshold wakes up
    fn wake_touched_bodies(&mut self) {
        let threshold = self.config.sleep_threshold;
        let mut to_wake = Vec::new();

        for collision in &self.collisions {
            let (a, b) = match self.bodies.get_pair(collision.body_a, collision.body_b) {
                Some(bodies) => bodies,
                None => continue,
            };

            if a.is_sleeping() && is_moving(b, threshold) {
                to_wake.push(collision.body_a);
            }
            if b.is_sleeping() && is_moving(a, threshold) {
                to_wake.push(collision.body_b);
            }
        }

        for handle in to_wake {
            self.wake_body(handle);
        }
    }

    /// Joined bodies sleep and wake together
    fn wake_jointed_bodies(&mut self, constraints: &ConstraintManager) {
        let mut to_wake = Vec::new();

        for (a, b) in constraints.active_body_pairs() {
            let (body_a, body_b) = match self.bodies.get_pair(a, b) {
                Some(bodies) => bodies,
                None => continue,
            };

            if body_a.is_sleeping() && is_awake_dynamic(body_b) {
                to_wake.push(a);
            }
            if body_b.is_sleeping() && is_awake_dynamic(body_a) {
                to_wake.push(b);
            }
        }

        for handle in to_wake {
            self.wake_body(handle);
        }
    }

    fn wake_body(&mut self, handle: BodyHandle) {
        if let Some(body) = self.bodies.get_mut(handle) {
            if body.is_sleeping() {
                body.wake_up();
                self.events.push(PhysicsEvent::Wake(handle));
            }
        }
    }

    fn update_sleeping(&mut self, dt: f32) {
        if !self.config.enable_sleeping {
            return;
        }

        let threshold = self.config.sleep_threshold;
        for (handle, body) in self.bodies.iter_mut() {
            if body.get_body_type() != RigidBodyType::Dynamic || body.is_sleeping() || !body.can_sleep() {
                continue;
            }

            let resting = body.get_linear_velocity().norm() < threshold
                && body.get_angular_velocity().norm() < threshold;

            if !resting {
                body.set_sleeping_time(0.0);
                continue;
            }

            let sleeping_time = body.get_sleeping_time() + dt;
            if sleeping_time >= self.config.sleep_time {
                body.put_to_sleep();
                self.events.push(PhysicsEvent::Sleep(handle));
            } else {
                body.set_sleeping_time(sleeping_time);
            }
        }
    }

    /// Returns a raycaster borrowing this world
    pub fn raycaster(&self) -> PhysicsRaycaster<'_> {
        PhysicsRaycaster::new(self)
    }

    /// Bodies whose collider bounds overlap `aabb` and whose layer is in `mask`
    pub fn query_aabb(&self, aabb: &Aabb, mask: CollisionMask) -> Vec<BodyHandle> {
        self.bodies
            .iter()
            .filter(|(_, body)| {
                body.get_collider().map_or(false, |c| c.get_layer().intersects(mask))
                    && body.get_aabb().map_or(false, |bounds| bounds.intersects(aabb))
            })
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Bodies whose collider intersects the sphere and whose layer is in `mask`
    pub fn query_sphere(&self, center: Vector3, radius: f32, mask: CollisionMask) -> Vec<BodyHandle> {
        let probe = Shape::sphere(radius);
        let probe_transform = Transform::from_position(center);
        let bounds = Aabb::from_center_half_extents(center, Vector3::repeat(radius));

        self.query_aabb(&bounds, mask)
            .into_iter()
            .filter(|handle| {
                let Some(body) = self.bodies.get(*handle) else {
                    return false;
                };
                let Some(collider) = body.get_collider() else {
                    return false;
                };

                self.narrow_phase
                    .collide(
                        &probe,
                        &probe_transform,
                        collider.get_shape(),
                        &collider.world_transform(&body.get_transform()),
                    )
                    .is_some()
            })
            .collect()
    }
}

fn is_moving(body: &RigidBody, threshold: f32) -> bool {
    match body.get_body_type() {
        RigidBodyType::Static => false,
        RigidBodyType::Kinematic => body.get_linear_velocity().norm() > threshold,
        RigidBodyType::Dynamic => !body.is_sleeping() && body.get_linear_velocity().norm() > threshold,
    }
}

fn is_awake_dynamic(body: &RigidBody) -> bool {
    body.get_body_type() == RigidBodyType::Dynamic && !body.is_sleeping()
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("bodies", &self.bodies.len())
            .field("collisions", &self.collisions.len())
            .field("trigger_pairs", &self.trigger_pairs.len())
            .field("time", &self.time)
            .finish()
    }
}
