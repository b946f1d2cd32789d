//! Ray queries against the bodies of a world.

pub mod ray_intersect;
mod raycaster;

pub use self::raycaster::{PhysicsRaycaster, RaycastHit, RaycastOptions};
