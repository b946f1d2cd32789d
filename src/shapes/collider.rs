use crate::collision::{layers_compatible, CollisionLayers, CollisionMask};
use crate::math::{Vector3, Quaternion, Aabb, Transform};
use crate::shapes::{Shape, ShapeType};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A collision shape attached to a rigid body, with its local placement and filtering
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Collider {
    /// The collision shape
    shape: Shape,

    /// Offset and rotation relative to the owning body
    local_transform: Transform,

    /// Triggers report overlaps but produce no contact response
    is_trigger: bool,

    /// Layers this collider belongs to
    layer: CollisionLayers,

    /// Layers this collider interacts with
    mask: CollisionMask,
}

impl Collider {
    /// Creates a solid collider centred on its body, on the default layer, colliding with everything
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            local_transform: Transform::identity(),
            is_trigger: false,
            layer: CollisionLayers::DEFAULT,
            mask: CollisionLayers::ALL,
        }
    }

    /// Creates a trigger collider
    pub fn trigger(shape: impl Into<Shape>) -> Self {
        Self::new(shape).with_trigger(true)
    }

    pub fn with_offset(mut self, offset: Vector3) -> Self {
        self.local_transform.position = offset;
        self
    }

    pub fn with_rotation(mut self, rotation: Quaternion) -> Self {
        self.local_transform.rotation = rotation;
        self
    }

    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    pub fn with_layer(mut self, layer: CollisionLayers) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_mask(mut self, mask: CollisionMask) -> Self {
        self.mask = mask;
        self
    }

    /// Returns the collision shape
    pub fn get_shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the shape variant tag
    pub fn shape_type(&self) -> ShapeType {
        self.shape.shape_type()
    }

    /// Returns the placement of the collider relative to its body
    pub fn get_local_transform(&self) -> &Transform {
        &self.local_transform
    }

    /// Sets the placement of the collider relative to its body
    pub fn set_local_transform(&mut self, local_transform: Transform) {
        self.local_transform = local_transform;
    }

    /// Returns whether this collider is a trigger volume
    pub fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    /// Sets whether this collider is a trigger volume
    pub fn set_trigger(&mut self, is_trigger: bool) {
        self.is_trigger = is_trigger;
    }

    /// Returns the layers this collider belongs to
    pub fn get_layer(&self) -> CollisionLayers {
        self.layer
    }

    /// Sets the layers this collider belongs to
    pub fn set_layer(&mut self, layer: CollisionLayers) {
        self.layer = layer;
    }

    /// Returns the layers this collider interacts with
    pub fn get_mask(&self) -> CollisionMask {
        self.mask
    }

    /// Sets the layers this collider interacts with
    pub fn set_mask(&mut self, mask: CollisionMask) {
        self.mask = mask;
    }

    /// Returns whether the two colliders' layers and masks accept each other
    pub fn can_collide_with(&self, other: &Collider) -> bool {
        layers_compatible(self.layer, self.mask, other.layer, other.mask)
    }

    /// Returns the world transform of the collider for a body at `body_transform`
    pub fn world_transform(&self, body_transform: &Transform) -> Transform {
        body_transform.combine(&self.local_transform)
    }

    /// Returns the world-space bounds of the collider for a body at `body_transform`
    pub fn world_bounds(&self, body_transform: &Transform) -> Aabb {
        self.shape.get_world_bounds(&self.world_transform(body_transform))
    }
}
