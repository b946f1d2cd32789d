use std::cmp::Ordering;

use crate::collision::{CollisionLayers, CollisionMask};
use crate::core::{BodyHandle, PhysicsWorld};
use crate::math::{Ray, Vector3};
use crate::query::ray_intersect::{self, RayIntersection};
use crate::shapes::{Shape, ShapeType};

/// Filters and limits applied to a ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastOptions {
    /// Hits further than this along the ray are ignored
    pub max_distance: f32,

    /// Only colliders whose layer intersects this mask are tested
    pub layer_mask: CollisionMask,

    /// Whether trigger colliders can be hit
    pub hit_triggers: bool,

    /// Whether planes are ignored when the ray approaches from behind
    pub cull_backfaces: bool,

    /// Whether `raycast_all` orders its hits by distance
    pub sort: bool,
}

impl RaycastOptions {
    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_layer_mask(mut self, layer_mask: CollisionMask) -> Self {
        self.layer_mask = layer_mask;
        self
    }

    pub fn with_triggers(mut self, hit_triggers: bool) -> Self {
        self.hit_triggers = hit_triggers;
        self
    }

    pub fn with_backface_culling(mut self, cull_backfaces: bool) -> Self {
        self.cull_backfaces = cull_backfaces;
        self
    }
}

impl Default for RaycastOptions {
    fn default() -> Self {
        Self {
            max_distance: f32::INFINITY,
            layer_mask: CollisionLayers::ALL,
            hit_triggers: false,
            cull_backfaces: false,
            sort: true,
        }
    }
}

/// A ray query result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The body owning the collider that was hit
    pub body: BodyHandle,

    /// The kind of shape that was hit
    pub shape_type: ShapeType,

    /// Distance from the ray origin to the hit point
    pub distance: f32,

    /// World-space hit point
    pub point: Vector3,

    /// World-space surface normal at the hit point
    pub normal: Vector3,
}

/// Read-only ray and shape-cast queries over the bodies of a world
#[derive(Debug, Clone, Copy)]
pub struct PhysicsRaycaster<'w> {
    world: &'w PhysicsWorld,
}

impl<'w> PhysicsRaycaster<'w> {
    pub fn new(world: &'w PhysicsWorld) -> Self {
        Self { world }
    }

    /// Nearest hit along the ray, if any
    pub fn raycast(&self, ray: &Ray, options: &RaycastOptions) -> Option<RaycastHit> {
        self.cast(ray, 0.0, options).min_by(by_distance)
    }

    /// Every hit along the ray, ordered by distance when `options.sort` is set
    pub fn raycast_all(&self, ray: &Ray, options: &RaycastOptions) -> Vec<RaycastHit> {
        let mut hits: Vec<RaycastHit> = self.cast(ray, 0.0, options).collect();
        if options.sort {
            hits.sort_by(by_distance);
        }
        hits
    }

    /// Sweeps a sphere of `radius` along the ray and reports the first body it touches.
    ///
    /// Each collider is grown by `radius` and hit with the ray; box corners stay square,
    /// so sweeps past box edges are slightly conservative.
    pub fn sphere_cast(&self, ray: &Ray, radius: f32, options: &RaycastOptions) -> Option<RaycastHit> {
        self.cast(ray, radius.max(0.0), options).min_by(by_distance)
    }

    /// Sweeps a box along the ray, approximated by the sphere enclosing it.
    ///
    /// The box orientation is ignored; hits may be reported up to the difference between
    /// the bounding radius and the true extent early.
    pub fn box_cast(&self, ray: &Ray, half_extents: Vector3, options: &RaycastOptions) -> Option<RaycastHit> {
        self.sphere_cast(ray, half_extents.abs().norm(), options)
    }

    /// Candidate hits for a ray swept with a sphere of `radius` (zero for a plain ray)
    fn cast<'a>(
        &'a self,
        ray: &'a Ray,
        radius: f32,
        options: &'a RaycastOptions,
    ) -> impl Iterator<Item = RaycastHit> + 'a {
        self.world.bodies().filter_map(move |(handle, body)| {
            let collider = body.get_collider()?;

            if !collider.get_layer().intersects(options.layer_mask) {
                return None;
            }
            if collider.is_trigger() && !options.hit_triggers {
                return None;
            }

            let transform = collider.world_transform(&body.get_transform());

            // Reject on the bounds before the exact test
            let bounds = collider.world_bounds(&body.get_transform()).expand(radius);
            bounds.intersects_ray(ray, 0.0, options.max_distance)?;

            let shape = if radius > 0.0 {
                collider.get_shape().inflated(radius)
            } else {
                *collider.get_shape()
            };

            let RayIntersection { distance, normal } =
                ray_intersect::ray_shape(ray, &shape, &transform, options.max_distance, options.cull_backfaces)?;

            Some(RaycastHit {
                body: handle,
                shape_type: collider.shape_type(),
                distance,
                point: ray.point_at(distance) - normal * radius,
                normal,
            })
        })
    }
}

fn by_distance(a: &RaycastHit, b: &RaycastHit) -> Ordering {
    a.distance.total_cmp(&b.distance)
}
