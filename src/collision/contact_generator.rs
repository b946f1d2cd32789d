//! Shape-pair intersection routines.
//!
//! Every routine takes two shapes with their world transforms and returns a
//! [`ContactManifold`] whose normal points from the first shape toward the
//! second, or `None` when the shapes are apart.

use crate::collision::contact_manifold::{ContactManifold, ContactPoint};
use crate::math::{self, Vector3, Transform, EPSILON};
use crate::shapes::{Sphere, BoxShape, Capsule, Plane};

/// Contact between two spheres given by centre and radius
fn sphere_points(center_a: Vector3, radius_a: f32, center_b: Vector3, radius_b: f32) -> Option<ContactManifold> {
    let delta = center_b - center_a;
    let distance_sq = delta.norm_squared();
    let radius_sum = radius_a + radius_b;

    if distance_sq > radius_sum * radius_sum {
        return None;
    }

    let distance = distance_sq.sqrt();
    // Coincident centres have no preferred direction
    let normal = if distance > EPSILON { delta / distance } else { Vector3::y() };

    Some(ContactManifold::single(
        normal,
        center_a + normal * radius_a,
        radius_sum - distance,
    ))
}

pub fn sphere_sphere(
    sphere_a: &Sphere,
    transform_a: &Transform,
    sphere_b: &Sphere,
    transform_b: &Transform,
) -> Option<ContactManifold> {
    sphere_points(
        transform_a.position,
        sphere_a.get_radius(),
        transform_b.position,
        sphere_b.get_radius(),
    )
}

pub fn sphere_plane(
    sphere: &Sphere,
    sphere_transform: &Transform,
    plane: &Plane,
    plane_transform: &Transform,
) -> Option<ContactManifold> {
    let plane = plane.to_world(plane_transform);
    let center = sphere_transform.position;
    let radius = sphere.get_radius();

    let distance = plane.signed_distance_to(center);
    if distance > radius {
        return None;
    }

    let plane_normal = plane.get_normal();
    Some(ContactManifold::single(
        -plane_normal,
        center - plane_normal * radius,
        radius - distance,
    ))
}

pub fn sphere_box(
    sphere: &Sphere,
    sphere_transform: &Transform,
    cuboid: &BoxShape,
    box_transform: &Transform,
) -> Option<ContactManifold> {
    let radius = sphere.get_radius();
    let half_extents = cuboid.get_half_extents();
    let local_center = box_transform.inverse_transform_point(sphere_transform.position);

    let closest = local_center.zip_map(&half_extents, |c, h| c.clamp(-h, h));
    let delta = closest - local_center;
    let distance_sq = delta.norm_squared();

    if distance_sq > radius * radius {
        return None;
    }

    if distance_sq > EPSILON * EPSILON {
        let distance = distance_sq.sqrt();
        let normal = box_transform.transform_direction(delta / distance);
        return Some(ContactManifold::single(
            normal,
            box_transform.transform_point(closest),
            radius - distance,
        ));
    }

    // Centre inside the box: push out through the nearest face
    let face_distance = half_extents - local_center.abs();
    let axis = face_distance.imin();
    let side = if local_center[axis] >= 0.0 { 1.0 } else { -1.0 };

    let mut outward = Vector3::zeros();
    outward[axis] = side;

    let mut face_point = local_center;
    face_point[axis] = side * half_extents[axis];

    Some(ContactManifold::single(
        box_transform.transform_direction(-outward),
        box_transform.transform_point(face_point),
        radius + face_distance[axis],
    ))
}

pub fn box_plane(
    cuboid: &BoxShape,
    box_transform: &Transform,
    plane: &Plane,
    plane_transform: &Transform,
) -> Option<ContactManifold> {
    let plane = plane.to_world(plane_transform);
    let mut manifold = ContactManifold::new(-plane.get_normal());

    for vertex in cuboid.get_world_vertices(box_transform) {
        let distance = plane.signed_distance_to(vertex);
        if distance < 0.0 {
            manifold.add_contact(ContactPoint::new(vertex, -distance));
        }
    }

    if manifold.is_empty() { None } else { Some(manifold) }
}

/// Separating axis test over the 15 candidate axes. Produces a single contact at the
/// midpoint between the centres.
pub fn box_box(
    box_a: &BoxShape,
    transform_a: &Transform,
    box_b: &BoxShape,
    transform_b: &Transform,
) -> Option<ContactManifold> {
    let axes_a = box_axes(transform_a);
    let axes_b = box_axes(transform_b);
    let half_a = box_a.get_half_extents();
    let half_b = box_b.get_half_extents();
    let center_delta = transform_b.position - transform_a.position;

    let mut best_overlap = f32::MAX;
    let mut best_axis = Vector3::y();

    let mut test_axis = |axis: Vector3| -> bool {
        let projected_a: f32 = (0..3).map(|i| half_a[i] * axes_a[i].dot(&axis).abs()).sum();
        let projected_b: f32 = (0..3).map(|i| half_b[i] * axes_b[i].dot(&axis).abs()).sum();
        let separation = center_delta.dot(&axis);
        let overlap = projected_a + projected_b - separation.abs();

        if overlap < 0.0 {
            return false;
        }

        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = if separation < 0.0 { -axis } else { axis };
        }
        true
    };

    for axis in axes_a.iter().chain(axes_b.iter()) {
        if !test_axis(*axis) {
            return None;
        }
    }

    for a in &axes_a {
        for b in &axes_b {
            // Parallel edges give no new axis
            if let Some(axis) = a.cross(b).try_normalize(EPSILON) {
                if !test_axis(axis) {
                    return None;
                }
            }
        }
    }

    let midpoint = (transform_a.position + transform_b.position) * 0.5;
    Some(ContactManifold::single(best_axis, midpoint, best_overlap))
}

fn box_axes(transform: &Transform) -> [Vector3; 3] {
    [
        transform.transform_direction(Vector3::x()),
        transform.transform_direction(Vector3::y()),
        transform.transform_direction(Vector3::z()),
    ]
}

pub fn capsule_sphere(
    capsule: &Capsule,
    capsule_transform: &Transform,
    sphere: &Sphere,
    sphere_transform: &Transform,
) -> Option<ContactManifold> {
    let (start, end) = capsule.get_world_segment(capsule_transform);
    let center = sphere_transform.position;
    let closest = math::closest_point_on_segment(start, end, center);

    sphere_points(closest, capsule.get_radius(), center, sphere.get_radius())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Quaternion;
    use approx::assert_relative_eq;

    fn at(x: f32, y: f32, z: f32) -> Transform {
        Transform::from_position(Vector3::new(x, y, z))
    }

    #[test]
    fn overlapping_spheres_point_from_a_to_b() {
        let sphere = Sphere::new(1.0);
        let manifold = sphere_sphere(&sphere, &at(0.0, 0.0, 0.0), &sphere, &at(1.5, 0.0, 0.0)).unwrap();

        assert_relative_eq!(manifold.normal, Vector3::x());
        assert_relative_eq!(manifold.penetration, 0.5);
        assert_relative_eq!(manifold.contacts[0].position, Vector3::x());
    }

    #[test]
    fn coincident_spheres_fall_back_to_up() {
        let sphere = Sphere::new(0.5);
        let manifold = sphere_sphere(&sphere, &at(1.0, 1.0, 1.0), &sphere, &at(1.0, 1.0, 1.0)).unwrap();
        assert_relative_eq!(manifold.normal, Vector3::y());
        assert_relative_eq!(manifold.penetration, 1.0);
    }

    #[test]
    fn sphere_resting_in_plane() {
        let plane = Plane::new(Vector3::y(), 0.0);
        let manifold = sphere_plane(&Sphere::new(0.5), &at(0.0, 0.4, 0.0), &plane, &Transform::identity()).unwrap();

        assert_relative_eq!(manifold.normal, -Vector3::y());
        assert_relative_eq!(manifold.penetration, 0.1, epsilon = 1e-6);
        assert!(sphere_plane(&Sphere::new(0.5), &at(0.0, 0.6, 0.0), &plane, &Transform::identity()).is_none());
    }

    #[test]
    fn sphere_touching_box_face() {
        let cuboid = BoxShape::new(Vector3::repeat(1.0));
        let manifold = sphere_box(&Sphere::new(0.5), &at(0.0, 1.25, 0.0), &cuboid, &Transform::identity()).unwrap();

        assert_relative_eq!(manifold.normal, -Vector3::y());
        assert_relative_eq!(manifold.penetration, 0.25);
        assert_relative_eq!(manifold.contacts[0].position, Vector3::y());
    }

    #[test]
    fn sphere_centre_inside_box_uses_nearest_face() {
        let cuboid = BoxShape::new(Vector3::new(2.0, 1.0, 2.0));
        let manifold = sphere_box(&Sphere::new(0.5), &at(0.0, 0.8, 0.0), &cuboid, &Transform::identity()).unwrap();

        assert_relative_eq!(manifold.normal, -Vector3::y());
        assert_relative_eq!(manifold.penetration, 0.7, epsilon = 1e-5);
    }

    #[test]
    fn box_on_plane_reports_bottom_corners() {
        let cuboid = BoxShape::new(Vector3::repeat(0.5));
        let plane = Plane::new(Vector3::y(), 0.0);
        let manifold = box_plane(&cuboid, &at(0.0, 0.45, 0.0), &plane, &Transform::identity()).unwrap();

        assert_eq!(manifold.contacts.len(), 4);
        assert_relative_eq!(manifold.penetration, 0.05, epsilon = 1e-5);
        assert_relative_eq!(manifold.normal, -Vector3::y());
    }

    #[test]
    fn buried_box_keeps_four_deepest_corners() {
        let cuboid = BoxShape::new(Vector3::repeat(0.5));
        let plane = Plane::new(Vector3::y(), 0.0);
        let tilted = Transform::new(Vector3::new(0.0, -2.0, 0.0), Quaternion::from_euler_angles(0.1, 0.0, 0.05));

        let manifold = box_plane(&cuboid, &tilted, &plane, &Transform::identity()).unwrap();
        let deepest = cuboid
            .get_world_vertices(&tilted)
            .iter()
            .map(|v| -v.y)
            .fold(f32::MIN, f32::max);

        assert_eq!(manifold.contacts.len(), 4);
        assert_relative_eq!(manifold.penetration, deepest, epsilon = 1e-5);
        // The bottom face sits near 2.5 deep, the top face near 1.5
        assert!(manifold.contacts.iter().all(|c| c.penetration > 2.2));
        assert!(manifold.contacts.iter().any(|c| (c.penetration - deepest).abs() < 1e-5));
    }

    #[test]
    fn box_box_picks_minimum_overlap_axis() {
        let cuboid = BoxShape::new(Vector3::repeat(0.5));
        let manifold = box_box(&cuboid, &at(0.0, 0.0, 0.0), &cuboid, &at(0.9, 0.2, 0.0)).unwrap();

        assert_relative_eq!(manifold.normal, Vector3::x(), epsilon = 1e-6);
        assert_relative_eq!(manifold.penetration, 0.1, epsilon = 1e-5);
        assert_relative_eq!(manifold.contacts[0].position, Vector3::new(0.45, 0.1, 0.0));
    }

    #[test]
    fn rotated_box_corner_overlap() {
        let cuboid = BoxShape::new(Vector3::repeat(0.5));
        let rotation = Quaternion::from_euler_angles(0.0, std::f32::consts::FRAC_PI_4, 0.0);

        // Corner of the rotated box reaches x = centre - 0.707
        let touching = Transform::new(Vector3::new(1.15, 0.0, 0.0), rotation);
        assert!(box_box(&cuboid, &Transform::identity(), &cuboid, &touching).is_some());

        let apart = Transform::new(Vector3::new(1.3, 0.0, 0.0), rotation);
        assert!(box_box(&cuboid, &Transform::identity(), &cuboid, &apart).is_none());
    }

    #[test]
    fn capsule_side_hits_sphere() {
        let capsule = Capsule::new(0.5, 2.0);
        let manifold = capsule_sphere(&capsule, &Transform::identity(), &Sphere::new(0.5), &at(0.9, 0.5, 0.0)).unwrap();

        assert_relative_eq!(manifold.normal, Vector3::x());
        assert_relative_eq!(manifold.penetration, 0.1, epsilon = 1e-5);
        assert!(capsule_sphere(&capsule, &Transform::identity(), &Sphere::new(0.5), &at(0.0, 2.1, 0.0)).is_none());
    }
}
