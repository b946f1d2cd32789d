mod rigid_body;
mod material;
mod body_type;

pub use self::rigid_body::RigidBody;
pub use self::material::Material;
pub use self::body_type::RigidBodyType;

use crate::math::Vector3;

/// A force or impulse queued on a body, consumed by the next force integration.
/// Points are in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceType {
    Force(Vector3),
    ForceAtPoint { force: Vector3, point: Vector3 },
    Torque(Vector3),
    Impulse(Vector3),
    ImpulseAtPoint { impulse: Vector3, point: Vector3 },
    AngularImpulse(Vector3),
}

pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Per-body simulation state bits
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        pub struct BodyFlags: u32 {
            const CAN_SLEEP = 1 << 0;
            const SLEEPING = 1 << 1;
            const AFFECTED_BY_GRAVITY = 1 << 2;
        }
    }
}
