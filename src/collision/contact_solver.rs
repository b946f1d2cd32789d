use crate::bodies::RigidBody;
use crate::collision::contact_manifold::CollisionInfo;
use crate::core::{BodyStorage, SimulationConfig};
use crate::math::{Vector3, EPSILON};

/// Trait for contact constraint solvers
pub trait ContactSolver {
    /// Prepares the solver for the given contacts
    fn prepare(&mut self, collisions: &[CollisionInfo], bodies: &BodyStorage<RigidBody>);

    /// Runs one velocity pass over all contacts
    fn solve_velocity(&mut self, collisions: &[CollisionInfo], bodies: &mut BodyStorage<RigidBody>);

    /// Runs one position correction pass over all contacts
    fn solve_position(&mut self, collisions: &[CollisionInfo], bodies: &mut BodyStorage<RigidBody>);
}

/// Per-contact state kept between solver passes of one step
#[derive(Debug, Clone, Copy, Default)]
struct ContactState {
    restitution: f32,
    friction: f32,
    /// Penetration left to resolve by position correction
    remaining_penetration: f32,
}

/// Sequential impulse contact solver with linear-only response
#[derive(Debug, Clone)]
pub struct SequentialImpulseSolver {
    /// Fraction of the penetration removed per position pass
    baumgarte: f32,

    /// Penetration tolerated without correction
    penetration_slop: f32,

    /// Approach speed below which restitution is ignored
    restitution_threshold: f32,

    states: Vec<ContactState>,
}

impl SequentialImpulseSolver {
    /// Creates a new sequential impulse solver
    pub fn new(baumgarte: f32, penetration_slop: f32, restitution_threshold: f32) -> Self {
        Self {
            baumgarte,
            penetration_slop,
            restitution_threshold,
            states: Vec::new(),
        }
    }

    /// Creates a solver using the tuning values of `config`
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.baumgarte,
            config.penetration_slop,
            config.restitution_velocity_threshold,
        )
    }
}

impl Default for SequentialImpulseSolver {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl ContactSolver for SequentialImpulseSolver {
    fn prepare(&mut self, collisions: &[CollisionInfo], bodies: &BodyStorage<RigidBody>) {
        self.states.clear();

        for collision in collisions {
            let state = match bodies.get_pair(collision.body_a, collision.body_b) {
                Some((body_a, body_b)) => ContactState {
                    restitution: body_a.get_material().combined_restitution(body_b.get_material()),
                    friction: body_a.get_material().combined_friction(body_b.get_material()),
                    remaining_penetration: collision.penetration,
                },
                None => ContactState::default(),
            };
            self.states.push(state);
        }
    }

    fn solve_velocity(&mut self, collisions: &[CollisionInfo], bodies: &mut BodyStorage<RigidBody>) {
        for (collision, state) in collisions.iter().zip(&self.states) {
            let (body_a, body_b) = match bodies.get_pair_mut(collision.body_a, collision.body_b) {
                Some(pair) => pair,
                None => continue,
            };

            let inv_mass_a = body_a.solver_inverse_mass();
            let inv_mass_b = body_b.solver_inverse_mass();
            let inv_mass_sum = inv_mass_a + inv_mass_b;

            // Both immovable
            if inv_mass_sum <= 0.0 {
                continue;
            }

            let normal = collision.normal;
            let relative_velocity = body_b.get_linear_velocity() - body_a.get_linear_velocity();
            let normal_velocity = relative_velocity.dot(&normal);

            // Already separating
            if normal_velocity > 0.0 {
                continue;
            }

            let restitution = if -normal_velocity < self.restitution_threshold {
                0.0
            } else {
                state.restitution
            };

            let j = -(1.0 + restitution) * normal_velocity / inv_mass_sum;
            let impulse = normal * j;
            body_a.apply_solver_impulse(-impulse, Vector3::zeros());
            body_b.apply_solver_impulse(impulse, Vector3::zeros());

            // Coulomb friction along the remaining sliding direction
            let relative_velocity = body_b.get_linear_velocity() - body_a.get_linear_velocity();
            let sliding = relative_velocity - normal * relative_velocity.dot(&normal);

            if let Some(tangent) = sliding.try_normalize(EPSILON) {
                let max_friction = j * state.friction;
                let jt = (-relative_velocity.dot(&tangent) / inv_mass_sum).clamp(-max_friction, max_friction);
                let friction_impulse = tangent * jt;

                body_a.apply_solver_impulse(-friction_impulse, Vector3::zeros());
                body_b.apply_solver_impulse(friction_impulse, Vector3::zeros());
            }
        }
    }

    fn solve_position(&mut self, collisions: &[CollisionInfo], bodies: &mut BodyStorage<RigidBody>) {
        for (collision, state) in collisions.iter().zip(self.states.iter_mut()) {
            let (body_a, body_b) = match bodies.get_pair_mut(collision.body_a, collision.body_b) {
                Some(pair) => pair,
                None => continue,
            };

            let inv_mass_a = body_a.solver_inverse_mass();
            let inv_mass_b = body_b.solver_inverse_mass();
            let inv_mass_sum = inv_mass_a + inv_mass_b;

            if inv_mass_sum <= 0.0 {
                continue;
            }

            let excess = (state.remaining_penetration - self.penetration_slop).max(0.0);
            if excess <= 0.0 {
                continue;
            }

            let magnitude = excess * self.baumgarte / inv_mass_sum;
            let correction = collision.normal * magnitude;

            body_a.apply_position_correction(-correction * inv_mass_a);
            body_b.apply_position_correction(correction * inv_mass_b);

            state.remaining_penetration -= magnitude * inv_mass_sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::ContactManifold;
    use crate::core::Storage;
    use crate::shapes::{Collider, Shape};
    use crate::bodies::Material;
    use approx::assert_relative_eq;

    fn sphere(x: f32, velocity: f32) -> RigidBody {
        RigidBody::new_dynamic(Collider::new(Shape::sphere(0.5)), Vector3::new(x, 0.0, 0.0))
            .with_material(Material::new(0.0, 1.0))
            .with_linear_velocity(Vector3::new(velocity, 0.0, 0.0))
    }

    #[test]
    fn elastic_head_on_exchanges_velocity() {
        let mut bodies: BodyStorage<RigidBody> = Storage::new();
        let a = bodies.add(sphere(-0.45, 1.0));
        let b = bodies.add(sphere(0.45, -1.0));
        let collisions = vec![ContactManifold::single(Vector3::x(), Vector3::zeros(), 0.1).into_collision(a, b)];

        let mut solver = SequentialImpulseSolver::default();
        solver.prepare(&collisions, &bodies);
        for _ in 0..8 {
            solver.solve_velocity(&collisions, &mut bodies);
        }

        assert_relative_eq!(bodies.get(a).unwrap().get_linear_velocity(), Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(bodies.get(b).unwrap().get_linear_velocity(), Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn position_pass_leaves_slop() {
        let mut bodies: BodyStorage<RigidBody> = Storage::new();
        let a = bodies.add(sphere(-0.45, 0.0));
        let b = bodies.add(sphere(0.45, 0.0));
        let collisions = vec![ContactManifold::single(Vector3::x(), Vector3::zeros(), 0.1).into_collision(a, b)];

        let config = SimulationConfig::default();
        let mut solver = SequentialImpulseSolver::from_config(&config);
        solver.prepare(&collisions, &bodies);
        for _ in 0..200 {
            solver.solve_position(&collisions, &mut bodies);
        }

        let gap = bodies.get(b).unwrap().get_position().x - bodies.get(a).unwrap().get_position().x;
        assert_relative_eq!(gap, 1.0 - config.penetration_slop, epsilon = 1e-4);
    }
}
