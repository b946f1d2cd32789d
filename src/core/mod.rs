pub mod world;
pub mod config;
pub mod storage;
pub mod events;
pub mod context;

pub use self::world::{PhysicsWorld, CollisionCallback, TriggerCallback};
pub use self::config::SimulationConfig;
pub use self::storage::{BodyStorage, ConstraintStorage, Storage};
pub use self::events::{EventQueue, PhysicsEvent};
pub use self::context::PhysicsContext;

slotmap::new_key_type! {
    /// A generational identifier for a body in the physics world
    pub struct BodyHandle;

    /// A generational identifier for a constraint in a constraint manager
    pub struct ConstraintHandle;
}
