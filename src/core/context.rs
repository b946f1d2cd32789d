use crate::bodies::RigidBody;
use crate::constraints::{Constraint, ConstraintManager};
use crate::core::{BodyHandle, ConstraintHandle, PhysicsWorld, SimulationConfig};
use crate::query::PhysicsRaycaster;
use crate::Result;

/// A simulation: a world plus the constraints joining its bodies.
///
/// Independent contexts share nothing, so several simulations can coexist.
#[derive(Debug, Default)]
pub struct PhysicsContext {
    world: PhysicsWorld,
    constraints: ConstraintManager,
}

impl PhysicsContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            world: PhysicsWorld::with_config(config),
            constraints: ConstraintManager::new(),
        }
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn constraints(&self) -> &ConstraintManager {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut ConstraintManager {
        &mut self.constraints
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        self.world.add_body(body)
    }

    /// Removes a body together with every constraint attached to it
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        let body = self.world.remove_body(handle)?;
        self.constraints.remove_involving(handle);
        Ok(body)
    }

    /// Adds a constraint between two bodies of this world, waking both
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintHandle> {
        let (body_a, body_b) = constraint.get_bodies();
        self.world.get_body(body_a)?;
        self.world.get_body(body_b)?;

        let handle = self.constraints.add(constraint)?;
        self.world.get_body_mut(body_a)?.wake_up();
        self.world.get_body_mut(body_b)?.wake_up();
        Ok(handle)
    }

    pub fn remove_constraint(&mut self, handle: ConstraintHandle) -> Option<Constraint> {
        self.constraints.remove(handle)
    }

    /// Advances by `elapsed` seconds in fixed steps, returning the number of steps taken
    pub fn step(&mut self, elapsed: f32) -> u32 {
        self.world.step_with_constraints(elapsed, &mut self.constraints)
    }

    pub fn fixed_step(&mut self, dt: f32) {
        self.world.fixed_step_with_constraints(dt, &mut self.constraints);
    }

    pub fn raycaster(&self) -> PhysicsRaycaster<'_> {
        self.world.raycaster()
    }
}
