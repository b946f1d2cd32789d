use crate::core::BodyHandle;
use crate::math::Vector3;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Maximum number of contact points to store in a manifold
pub const MAX_CONTACT_POINTS: usize = 4;

/// A contact point between two bodies
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ContactPoint {
    /// The position of the contact point in world space
    pub position: Vector3,

    /// The penetration depth at this point
    pub penetration: f32,
}

impl ContactPoint {
    pub fn new(position: Vector3, penetration: f32) -> Self {
        Self { position, penetration }
    }
}

/// Shape-level contact data produced by the intersection routines
#[derive(Debug, Clone, PartialEq)]
pub struct ContactManifold {
    /// Contact normal, pointing from the first shape toward the second
    pub normal: Vector3,

    /// Deepest penetration among the contacts
    pub penetration: f32,

    /// The contact points
    pub contacts: Vec<ContactPoint>,
}

impl ContactManifold {
    /// Creates an empty manifold with the given normal
    pub fn new(normal: Vector3) -> Self {
        Self {
            normal,
            penetration: 0.0,
            contacts: Vec::with_capacity(MAX_CONTACT_POINTS),
        }
    }

    /// Creates a manifold with a single contact point
    pub fn single(normal: Vector3, position: Vector3, penetration: f32) -> Self {
        let mut manifold = Self::new(normal);
        manifold.add_contact(ContactPoint::new(position, penetration));
        manifold
    }

    /// Adds a contact point to the manifold
    pub fn add_contact(&mut self, contact: ContactPoint) {
        self.penetration = self.penetration.max(contact.penetration);

        if self.contacts.len() < MAX_CONTACT_POINTS {
            self.contacts.push(contact);
            return;
        }

        // Full: the shallowest stored point makes room for a deeper one
        let shallowest = self
            .contacts
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.penetration.total_cmp(&b.penetration))
            .map(|(i, c)| (i, c.penetration));

        if let Some((index, depth)) = shallowest {
            if contact.penetration > depth {
                self.contacts[index] = contact;
            }
        }
    }

    /// Reverses the manifold so the normal points from the second shape toward the first
    pub fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }

    /// Returns whether the manifold is empty
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Attaches the body handles the shapes belong to
    pub fn into_collision(self, body_a: BodyHandle, body_b: BodyHandle) -> CollisionInfo {
        CollisionInfo {
            body_a,
            body_b,
            normal: self.normal,
            penetration: self.penetration,
            contacts: self.contacts,
        }
    }
}

/// A detected collision between two bodies, produced fresh every step
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct CollisionInfo {
    /// The first body
    pub body_a: BodyHandle,

    /// The second body
    pub body_b: BodyHandle,

    /// Contact normal from A toward B
    pub normal: Vector3,

    /// Deepest penetration among the contacts
    pub penetration: f32,

    /// Up to four contact points
    pub contacts: Vec<ContactPoint>,
}

impl CollisionInfo {
    /// Number of stored contact points
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Returns whether this collision involves the given body
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }
}
