use crate::core::BodyHandle;

/// An unordered pair of bodies, stored with the smaller handle first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// The first body in the collision pair
    pub body_a: BodyHandle,

    /// The second body in the collision pair
    pub body_b: BodyHandle,
}

impl CollisionPair {
    /// Creates a new collision pair
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        // Sorted so (a, b) and (b, a) produce the same key
        if body_a <= body_b {
            Self { body_a, body_b }
        } else {
            Self { body_a: body_b, body_b: body_a }
        }
    }

    /// Checks if this collision pair contains the specified body
    pub fn contains(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// Returns the other body in the pair
    pub fn other(&self, body: BodyHandle) -> Option<BodyHandle> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}
