//! Analytic ray tests against each shape.
//!
//! Rays whose origin lies inside a closed shape (sphere, box, capsule) do not hit it.

use crate::math::{self, Aabb, Ray, Transform, Vector3, EPSILON};
use crate::shapes::{BoxShape, Capsule, Plane, Shape};

/// Where a ray meets a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection {
    /// Distance along the ray
    pub distance: f32,

    /// Surface normal at the hit, in world space
    pub normal: Vector3,
}

/// Tests a ray against a shape placed at `transform`
pub fn ray_shape(
    ray: &Ray,
    shape: &Shape,
    transform: &Transform,
    max_distance: f32,
    cull_backfaces: bool,
) -> Option<RayIntersection> {
    let hit = match shape {
        Shape::Sphere(sphere) => ray_sphere(ray, transform.position, sphere.get_radius()),
        Shape::Box(cuboid) => ray_box(ray, cuboid, transform),
        Shape::Capsule(capsule) => ray_capsule(ray, capsule, transform),
        Shape::Plane(plane) => ray_plane(ray, &plane.to_world(transform), cull_backfaces),
    }?;

    (hit.distance <= max_distance).then_some(hit)
}

/// Nearest intersection in front of the origin
pub fn ray_sphere(ray: &Ray, center: Vector3, radius: f32) -> Option<RayIntersection> {
    let offset = ray.origin - center;
    let b = offset.dot(&ray.direction);
    let c = offset.norm_squared() - radius * radius;

    // Origin inside, or sphere entirely behind the ray
    if c <= 0.0 || b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let distance = -b - discriminant.sqrt();
    let normal = (ray.point_at(distance) - center) / radius;
    Some(RayIntersection { distance, normal })
}

/// Intersection with a world-space plane; the normal faces the incoming ray
pub fn ray_plane(ray: &Ray, plane: &Plane, cull_backfaces: bool) -> Option<RayIntersection> {
    let normal = plane.get_normal();
    let denom = normal.dot(&ray.direction);

    if math::approx_zero(denom) {
        return None;
    }

    // Approaching from behind the plane
    if cull_backfaces && denom > 0.0 {
        return None;
    }

    let distance = -plane.signed_distance_to(ray.origin) / denom;
    if distance < 0.0 {
        return None;
    }

    let normal = if denom > 0.0 { -normal } else { normal };
    Some(RayIntersection { distance, normal })
}

/// Slab test in box space; the normal is the entered face's
pub fn ray_box(ray: &Ray, cuboid: &BoxShape, transform: &Transform) -> Option<RayIntersection> {
    let local_ray = ray.to_local(transform);
    let half_extents = cuboid.get_half_extents();
    let bounds = Aabb::from_center_half_extents(Vector3::zeros(), half_extents);

    if bounds.contains_point(local_ray.origin) {
        return None;
    }

    let (distance, _) = bounds.intersects_ray(&local_ray, 0.0, f32::MAX)?;

    // The face hit is the one the local hit point lies furthest out on
    let local_point = local_ray.point_at(distance);
    let relative = local_point.component_div(&half_extents.map(|h| h.max(EPSILON)));
    let axis = relative.iamax();

    let mut local_normal = Vector3::zeros();
    local_normal[axis] = relative[axis].signum();

    Some(RayIntersection {
        distance,
        normal: transform.transform_direction(local_normal),
    })
}

/// Cylinder side, then the two end caps restricted to their outer hemispheres
pub fn ray_capsule(ray: &Ray, capsule: &Capsule, transform: &Transform) -> Option<RayIntersection> {
    let radius = capsule.get_radius();
    let (start, end) = capsule.get_world_segment(transform);

    let closest = math::closest_point_on_segment(start, end, ray.origin);
    if (ray.origin - closest).norm_squared() <= radius * radius {
        return None;
    }

    let axis = end - start;
    let axis_len_sq = axis.norm_squared();
    if axis_len_sq < EPSILON {
        return ray_sphere(ray, start, radius);
    }

    let mut best: Option<RayIntersection> = None;
    let mut keep_nearest = |hit: RayIntersection| {
        if best.map_or(true, |b| hit.distance < b.distance) {
            best = Some(hit);
        }
    };

    let offset = ray.origin - start;
    let axis_dot_dir = axis.dot(&ray.direction);
    let axis_dot_offset = axis.dot(&offset);

    let a = axis_len_sq - axis_dot_dir * axis_dot_dir;
    let b = axis_len_sq * offset.dot(&ray.direction) - axis_dot_offset * axis_dot_dir;
    let c = axis_len_sq * offset.norm_squared() - axis_dot_offset * axis_dot_offset - radius * radius * axis_len_sq;

    // A ray parallel to the axis can only enter through a cap
    if a > EPSILON {
        let discriminant = b * b - a * c;
        if discriminant >= 0.0 {
            let distance = (-b - discriminant.sqrt()) / a;
            let along = axis_dot_offset + distance * axis_dot_dir;

            if distance >= 0.0 && along > 0.0 && along < axis_len_sq {
                let on_axis = start + axis * (along / axis_len_sq);
                let normal = (ray.point_at(distance) - on_axis) / radius;
                keep_nearest(RayIntersection { distance, normal });
            }
        }
    }

    for (center, outward) in [(start, -axis), (end, axis)] {
        if let Some(hit) = ray_sphere(ray, center, radius) {
            if hit.normal.dot(&outward) >= 0.0 {
                keep_nearest(hit);
            }
        }
    }

    best
}
