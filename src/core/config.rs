use tracing::warn;

use crate::error::PhysicsError;
use crate::math::Vector3;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Configuration parameters for the physics simulation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Constant acceleration applied to dynamic bodies
    pub gravity: Vector3,

    /// The number of iterations to run for solving velocity constraints
    pub velocity_iterations: u32,

    /// The number of iterations to run for solving position constraints
    pub position_iterations: u32,

    /// Linear and angular speed below which a body starts accumulating sleep time
    pub sleep_threshold: f32,

    /// The time a body must be inactive before sleeping
    pub sleep_time: f32,

    /// Whether to allow sleeping bodies
    pub enable_sleeping: bool,

    /// The fixed time step used by `PhysicsWorld::step`
    pub time_step: f32,

    /// The maximum number of substeps for one `PhysicsWorld::step` call
    pub max_substeps: u32,

    /// The bias factor for position correction (Baumgarte stabilization)
    pub baumgarte: f32,

    /// Penetration left uncorrected to keep resting contacts stable
    pub penetration_slop: f32,

    /// Approach speed below which contacts do not bounce
    pub restitution_velocity_threshold: f32,

    /// Global damping for linear velocity, per second
    pub linear_damping: f32,

    /// Global damping for angular velocity, per second
    pub angular_damping: f32,
}

impl SimulationConfig {
    /// Checks that every value is in its usable range
    pub fn validate(&self) -> Result<()> {
        let checks: [(bool, &str); 9] = [
            (self.gravity.iter().all(|g| g.is_finite()), "gravity must be finite"),
            (self.velocity_iterations > 0, "velocity_iterations must be at least 1"),
            (self.sleep_threshold >= 0.0, "sleep_threshold must not be negative"),
            (self.sleep_time >= 0.0, "sleep_time must not be negative"),
            (self.time_step > 0.0 && self.time_step.is_finite(), "time_step must be positive"),
            (self.max_substeps > 0, "max_substeps must be at least 1"),
            ((0.0..=1.0).contains(&self.baumgarte), "baumgarte must be within [0, 1]"),
            (self.penetration_slop >= 0.0, "penetration_slop must not be negative"),
            (
                self.linear_damping >= 0.0 && self.angular_damping >= 0.0,
                "damping must not be negative",
            ),
        ];

        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, message)) => {
                warn!(reason = *message, "invalid simulation config");
                Err(PhysicsError::InvalidParameter((*message).to_string()))
            }
            None => Ok(()),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, -9.81, 0.0),
            velocity_iterations: 8,
            position_iterations: 3,
            sleep_threshold: 0.1,
            sleep_time: 0.5,
            enable_sleeping: true,
            time_step: 1.0 / 60.0,
            max_substeps: 8,
            baumgarte: 0.2,
            penetration_slop: 0.005,
            restitution_velocity_threshold: 0.5,
            linear_damping: 0.0,
            angular_damping: 0.05,
        }
    }
}
