use crate::core::BodyHandle;
use crate::bodies::RigidBody;
use crate::math::Aabb;
use crate::collision::collision_pair::CollisionPair;
use crate::shapes::Collider;

/// Trait for broad-phase collision detection algorithms
pub trait BroadPhase {
    /// Updates the broad-phase with the current body states
    fn update(&mut self, bodies: &[(BodyHandle, &RigidBody)]);

    /// Gets all potential collision pairs, sorted by handle
    fn get_collision_pairs(&self) -> Vec<CollisionPair>;
}

struct Proxy {
    handle: BodyHandle,
    aabb: Aabb,
    collider: Collider,
    is_static: bool,
}

/// Tests every pair of bounding boxes
#[derive(Default)]
pub struct BruteForceBroadPhase {
    proxies: Vec<Proxy>,
}

impl BruteForceBroadPhase {
    /// Creates a new brute-force broad-phase
    pub fn new() -> Self {
        Self {
            proxies: Vec::new(),
        }
    }
}

impl BroadPhase for BruteForceBroadPhase {
    fn update(&mut self, bodies: &[(BodyHandle, &RigidBody)]) {
        self.proxies.clear();

        // Bodies without a collider take no part in collision
        for (handle, body) in bodies {
            if let (Some(collider), Some(aabb)) = (body.get_collider(), body.get_aabb()) {
                self.proxies.push(Proxy {
                    handle: *handle,
                    aabb,
                    collider: *collider,
                    is_static: body.get_body_type().is_static(),
                });
            }
        }
    }

    fn get_collision_pairs(&self) -> Vec<CollisionPair> {
        let mut pairs = Vec::new();

        for (i, a) in self.proxies.iter().enumerate() {
            for b in &self.proxies[i + 1..] {
                if a.is_static && b.is_static {
                    continue;
                }

                if a.aabb.intersects(&b.aabb) && a.collider.can_collide_with(&b.collider) {
                    pairs.push(CollisionPair::new(a.handle, b.handle));
                }
            }
        }

        pairs.sort();
        pairs
    }
}
