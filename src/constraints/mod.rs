mod constraint;
mod distance;
mod hinge;
mod slider;
mod ball_socket;
mod fixed;
mod spring;
mod manager;

pub use self::constraint::{Constraint, ConstraintKind};
pub use self::distance::DistanceJoint;
pub use self::hinge::{HingeJoint, HingeMotor};
pub use self::slider::SliderJoint;
pub use self::ball_socket::BallSocketJoint;
pub use self::fixed::FixedJoint;
pub use self::spring::SpringJoint;
pub use self::manager::ConstraintManager;
