mod collision_pair;
mod broad_phase;
mod narrow_phase;
mod contact_solver;
mod collision_filter;
mod contact_manifold;
pub mod contact_generator;

pub use self::collision_pair::CollisionPair;
pub use self::broad_phase::{BroadPhase, BruteForceBroadPhase};
pub use self::narrow_phase::{CollideFn, NarrowPhase};
pub use self::contact_solver::{ContactSolver, SequentialImpulseSolver};
pub use self::collision_filter::{layers_compatible, CollisionLayers, CollisionMask};
pub use self::contact_manifold::{CollisionInfo, ContactManifold, ContactPoint, MAX_CONTACT_POINTS};
