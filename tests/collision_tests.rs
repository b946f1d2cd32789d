use std::collections::BTreeSet;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use phys_core::collision::{BroadPhase, BruteForceBroadPhase, CollisionPair, NarrowPhase};
use phys_core::core::{BodyStorage, Storage};
use phys_core::math::{Quaternion, Transform};
use phys_core::shapes::ShapeType;
use phys_core::{BodyHandle, Collider, CollisionLayers, RigidBody, RigidBodyType, Shape, Vector3};

fn random_vector(rng: &mut StdRng, range: f32) -> Vector3 {
    Vector3::new(
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
    )
}

fn random_rotation(rng: &mut StdRng) -> Quaternion {
    Quaternion::from_euler_angles(
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
    )
}

fn random_shape(rng: &mut StdRng) -> Shape {
    match rng.gen_range(0..3) {
        0 => Shape::sphere(rng.gen_range(0.2..1.5)),
        1 => Shape::cuboid(Vector3::new(
            rng.gen_range(0.2..1.5),
            rng.gen_range(0.2..1.5),
            rng.gen_range(0.2..1.5),
        )),
        _ => Shape::capsule(rng.gen_range(0.2..1.0), rng.gen_range(0.0..2.0)),
    }
}

#[test]
fn test_broad_phase_matches_bounding_box_overlap() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..20 {
        let mut bodies: BodyStorage<RigidBody> = BodyStorage::default();

        for _ in 0..40 {
            let body_type = if rng.gen_bool(0.3) { RigidBodyType::Static } else { RigidBodyType::Dynamic };
            let mut collider = Collider::new(random_shape(&mut rng));
            if rng.gen_bool(0.2) {
                collider = collider.with_layer(CollisionLayers::DEBRIS).with_mask(CollisionLayers::STATIC);
            }

            let transform = Transform::new(random_vector(&mut rng, 8.0), random_rotation(&mut rng));
            bodies.add(RigidBody::new(collider, transform, body_type));
        }

        let proxies: Vec<(BodyHandle, &RigidBody)> = bodies.iter().collect();
        let mut broad_phase = BruteForceBroadPhase::new();
        broad_phase.update(&proxies);
        let found: Vec<CollisionPair> = broad_phase.get_collision_pairs();

        let mut expected = BTreeSet::new();
        for (i, (handle_a, a)) in proxies.iter().enumerate() {
            for (handle_b, b) in &proxies[i + 1..] {
                let both_static = a.get_body_type() == RigidBodyType::Static && b.get_body_type() == RigidBodyType::Static;
                let (Some(collider_a), Some(collider_b)) = (a.get_collider(), b.get_collider()) else {
                    continue;
                };
                let (Some(bounds_a), Some(bounds_b)) = (a.get_aabb(), b.get_aabb()) else {
                    continue;
                };

                if !both_static && bounds_a.intersects(&bounds_b) && collider_a.can_collide_with(collider_b) {
                    expected.insert(CollisionPair::new(*handle_a, *handle_b));
                }
            }
        }

        let expected: Vec<CollisionPair> = expected.into_iter().collect();
        assert_eq!(found, expected);
    }
}

#[test]
fn test_narrow_phase_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(42);
    let narrow_phase = NarrowPhase::new();
    let mut checked = 0;

    for _ in 0..500 {
        let sphere = Shape::sphere(rng.gen_range(0.3..1.5));
        let other = match rng.gen_range(0..4) {
            0 => Shape::sphere(rng.gen_range(0.3..1.5)),
            1 => Shape::cuboid(Vector3::new(
                rng.gen_range(0.3..1.5),
                rng.gen_range(0.3..1.5),
                rng.gen_range(0.3..1.5),
            )),
            2 => Shape::capsule(rng.gen_range(0.3..1.0), rng.gen_range(0.5..2.0)),
            _ => Shape::plane(Vector3::y(), 0.0),
        };

        let sphere_at = Transform::from_position(random_vector(&mut rng, 2.0));
        let other_at = Transform::new(random_vector(&mut rng, 0.5), random_rotation(&mut rng));

        let forward = narrow_phase.collide(&sphere, &sphere_at, &other, &other_at);
        let backward = narrow_phase.collide(&other, &other_at, &sphere, &sphere_at);
        assert_eq!(forward.is_some(), backward.is_some());

        if let (Some(forward), Some(backward)) = (forward, backward) {
            checked += 1;
            assert_relative_eq!(forward.normal, -backward.normal, epsilon = 1e-5);
            assert_relative_eq!(forward.penetration, backward.penetration, epsilon = 1e-5);
            assert_relative_eq!(forward.normal.norm(), 1.0, epsilon = 1e-4);
            assert!(forward.penetration >= 0.0);
            assert!(!forward.is_empty());
        }
    }

    assert!(checked > 50, "only {} overlapping samples", checked);
}

#[test]
fn test_sphere_pairs_match_analytic_overlap() {
    let mut rng = StdRng::seed_from_u64(7);
    let narrow_phase = NarrowPhase::new();

    for _ in 0..200 {
        let (radius_a, radius_b) = (rng.gen_range(0.2..1.0), rng.gen_range(0.2..1.0));
        let center_a = random_vector(&mut rng, 1.5);
        let center_b = random_vector(&mut rng, 1.5);
        let distance = (center_b - center_a).norm();

        let manifold = narrow_phase.collide(
            &Shape::sphere(radius_a),
            &Transform::from_position(center_a),
            &Shape::sphere(radius_b),
            &Transform::from_position(center_b),
        );

        if distance > radius_a + radius_b + 1e-4 {
            assert!(manifold.is_none());
        } else if distance < radius_a + radius_b - 1e-4 && distance > 1e-3 {
            let manifold = manifold.unwrap();
            assert_relative_eq!(manifold.penetration, radius_a + radius_b - distance, epsilon = 1e-4);
            assert_relative_eq!(manifold.normal, (center_b - center_a) / distance, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_capsule_pairs_without_routine_never_collide() {
    let narrow_phase = NarrowPhase::new();
    let capsule = Shape::capsule(0.5, 1.0);
    let cuboid = Shape::cuboid(Vector3::repeat(0.5));

    assert!(!narrow_phase.supports(ShapeType::Capsule, ShapeType::Box));
    assert!(narrow_phase
        .collide(&capsule, &Transform::identity(), &cuboid, &Transform::identity())
        .is_none());
    assert!(narrow_phase
        .collide(&capsule, &Transform::identity(), &capsule, &Transform::identity())
        .is_none());
}
