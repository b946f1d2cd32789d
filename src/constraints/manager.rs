use tracing::debug;

use crate::bodies::RigidBody;
use crate::constraints::Constraint;
use crate::core::{BodyHandle, BodyStorage, ConstraintHandle, ConstraintStorage, Storage};
use crate::error::PhysicsError;
use crate::Result;

const STANDALONE_VELOCITY_ITERATIONS: u32 = 8;

/// Owns the constraints of a simulation and runs their solver phases
#[derive(Debug, Clone, Default)]
pub struct ConstraintManager {
    constraints: ConstraintStorage<Constraint>,
}

impl ConstraintManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint. A body cannot be constrained to itself.
    pub fn add(&mut self, constraint: Constraint) -> Result<ConstraintHandle> {
        let (body_a, body_b) = constraint.get_bodies();
        if body_a == body_b {
            return Err(PhysicsError::InvalidParameter(format!(
                "{} constraint joins body {:?} to itself",
                constraint.constraint_type(),
                body_a
            )));
        }

        let kind = constraint.constraint_type();
        let handle = self.constraints.add(constraint);
        debug!(?handle, kind, "constraint added");
        Ok(handle)
    }

    pub fn remove(&mut self, handle: ConstraintHandle) -> Option<Constraint> {
        let removed = self.constraints.remove(handle);
        if removed.is_some() {
            debug!(?handle, "constraint removed");
        }
        removed
    }

    pub fn get(&self, handle: ConstraintHandle) -> Result<&Constraint> {
        self.constraints.get_constraint(handle)
    }

    pub fn get_mut(&mut self, handle: ConstraintHandle) -> Result<&mut Constraint> {
        self.constraints.get_constraint_mut(handle)
    }

    /// Iterates over all constraints
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintHandle, &Constraint)> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn clear(&mut self) {
        self.constraints.clear();
    }

    /// Removes every constraint attached to `body`, returning how many were removed
    pub fn remove_involving(&mut self, body: BodyHandle) -> usize {
        let before = self.constraints.len();
        self.constraints.retain(|_, constraint| !constraint.involves_body(body));

        let removed = before - self.constraints.len();
        if removed > 0 {
            debug!(?body, removed, "constraints removed with body");
        }
        removed
    }

    /// Removes broken constraints, returning how many were removed
    pub fn cleanup_broken(&mut self) -> usize {
        let before = self.constraints.len();
        self.constraints.retain(|_, constraint| !constraint.is_broken());
        before - self.constraints.len()
    }

    /// Body pairs of constraints that still take part in solving
    pub fn active_body_pairs(&self) -> Vec<(BodyHandle, BodyHandle)> {
        self.constraints
            .iter()
            .filter(|(_, c)| c.is_active())
            .map(|(_, c)| c.get_bodies())
            .collect()
    }

    pub(crate) fn prepare(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) {
        for (_, constraint) in self.constraints.iter_mut() {
            constraint.prepare(bodies, dt);
        }
    }

    pub(crate) fn solve_velocity(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) {
        for (_, constraint) in self.constraints.iter_mut() {
            if constraint.is_rigid() {
                constraint.solve_velocity(bodies, dt);
            }
        }
    }

    pub(crate) fn solve_position(&mut self, bodies: &mut BodyStorage<RigidBody>) {
        for (_, constraint) in self.constraints.iter_mut() {
            constraint.solve_position(bodies);
        }
    }

    pub(crate) fn finish(&mut self, dt: f32) {
        for (_, constraint) in self.constraints.iter_mut() {
            constraint.finish(dt);
        }
    }

    /// Solves every constraint for one step outside a world step
    pub fn solve_all(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) {
        self.solve_all_with_iterations(bodies, dt, STANDALONE_VELOCITY_ITERATIONS);
    }

    /// Spring forces, `iterations` velocity passes, then one position pass
    pub fn solve_all_with_iterations(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32, iterations: u32) {
        if dt <= 0.0 {
            return;
        }

        self.prepare(bodies, dt);
        for _ in 0..iterations {
            self.solve_velocity(bodies, dt);
        }
        self.solve_position(bodies);
        self.finish(dt);
    }
}
