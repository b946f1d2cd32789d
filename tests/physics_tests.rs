use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;
use phys_core::{
    Collider, CollisionLayers, Material, PhysicsContext, PhysicsEvent, PhysicsWorld, RigidBody, RigidBodyType, Shape,
    SimulationConfig, Vector3,
};

const DT: f32 = 1.0 / 60.0;

fn zero_gravity_world() -> PhysicsWorld {
    PhysicsWorld::with_config(SimulationConfig {
        gravity: Vector3::zeros(),
        ..SimulationConfig::default()
    })
}

#[test]
fn test_free_fall_follows_semi_implicit_euler() {
    let mut world = PhysicsWorld::new();
    let handle = world.add_body(RigidBody::new_dynamic(
        Collider::new(Shape::sphere(0.5)),
        Vector3::new(0.0, 100.0, 0.0),
    ));

    let mut expected_velocity = 0.0;
    let mut expected_height = 100.0;
    for _ in 0..60 {
        world.fixed_step(DT);

        expected_velocity -= 9.81 * DT;
        expected_height += expected_velocity * DT;
    }

    let body = world.get_body(handle).unwrap();
    assert_relative_eq!(body.get_linear_velocity().y, expected_velocity, epsilon = 1e-3);
    assert_relative_eq!(body.get_position().y, expected_height, epsilon = 1e-2);
    assert_relative_eq!(world.get_time(), 1.0, epsilon = 1e-4);
}

#[test]
fn test_elastic_spheres_exchange_velocity() {
    let mut world = zero_gravity_world();
    let bouncy = Material::new(0.0, 1.0);

    // Overlapping slightly, closing at 2 m/s
    let a = world.add_body(
        RigidBody::new_dynamic(Collider::new(Shape::sphere(1.0)), Vector3::new(-0.95, 0.0, 0.0))
            .with_material(bouncy)
            .with_linear_velocity(Vector3::new(1.0, 0.0, 0.0)),
    );
    let b = world.add_body(
        RigidBody::new_dynamic(Collider::new(Shape::sphere(1.0)), Vector3::new(0.95, 0.0, 0.0))
            .with_material(bouncy)
            .with_linear_velocity(Vector3::new(-1.0, 0.0, 0.0)),
    );

    world.fixed_step(DT);

    assert_eq!(world.collisions().len(), 1);
    assert_relative_eq!(world.get_body(a).unwrap().get_linear_velocity().x, -1.0, epsilon = 1e-3);
    assert_relative_eq!(world.get_body(b).unwrap().get_linear_velocity().x, 1.0, epsilon = 1e-3);
}

#[test]
fn test_sphere_comes_to_rest_on_plane_and_sleeps() {
    let mut world = PhysicsWorld::new();
    world.add_body(RigidBody::new_static(Collider::new(Shape::plane(Vector3::y(), 0.0)), Vector3::zeros()));
    let ball = world.add_body(RigidBody::new_dynamic(
        Collider::new(Shape::sphere(0.5)),
        Vector3::new(0.0, 0.49, 0.0),
    ));

    // Resting from the first step, so it sleeps once sleep_time has passed
    let mut slept_at = None;
    for step in 1..=120 {
        world.fixed_step(DT);
        if slept_at.is_none() && world.get_events().iter().any(|e| *e == PhysicsEvent::Sleep(ball)) {
            slept_at = Some(step);
        }
    }

    let expected = (world.get_config().sleep_time / DT).round() as usize;
    let slept_at = slept_at.expect("ball never slept");
    assert!(
        slept_at >= expected && slept_at <= expected + 1,
        "slept at step {}, expected {}",
        slept_at,
        expected
    );

    let body = world.get_body(ball).unwrap();
    assert!(body.is_sleeping());
    assert_relative_eq!(body.get_position().y, 0.5, epsilon = 0.02);
    assert_relative_eq!(body.get_linear_velocity().norm(), 0.0);
}

#[test]
fn test_sphere_below_ground_is_pushed_back_up() {
    let mut world = PhysicsWorld::new();
    world.add_body(RigidBody::new_static(Collider::new(Shape::plane(Vector3::y(), 0.0)), Vector3::zeros()));
    let ball = world.add_body(RigidBody::new_dynamic(
        Collider::new(Shape::sphere(0.5)),
        Vector3::new(0.0, -0.6, 0.0),
    ));

    assert_eq!(
        world.query_sphere(Vector3::new(0.0, -0.6, 0.0), 0.5, CollisionLayers::ALL).len(),
        2
    );

    world.fixed_step(DT);
    assert_eq!(world.collisions().len(), 1);
    assert_relative_eq!(world.collisions()[0].penetration, 1.1, epsilon = 0.01);

    for _ in 0..120 {
        world.fixed_step(DT);
    }

    let y = world.get_body(ball).unwrap().get_position().y;
    assert!(y > 0.45 && y < 0.55, "ball ended at y = {}", y);
}

#[test]
fn test_box_sunk_into_tilted_ground_is_pushed_out() {
    let mut world = PhysicsWorld::new();
    let normal = Vector3::new(0.3, 1.0, 0.0).normalize();
    world.add_body(RigidBody::new_static(Collider::new(Shape::plane(normal, 0.0)), Vector3::zeros()));
    let crate_body = world.add_body(RigidBody::new_dynamic(
        Collider::new(Shape::cuboid(Vector3::repeat(0.5))),
        -normal * 2.0,
    ));

    world.fixed_step(DT);
    assert_eq!(world.collisions().len(), 1);

    for _ in 0..120 {
        world.fixed_step(DT);
    }

    let height = world.get_body(crate_body).unwrap().get_position().dot(&normal);
    assert!(height > 0.0, "box still below the ground at {}", height);
}

#[test]
fn test_sleeping_body_wakes_on_impulse() {
    let mut world = PhysicsWorld::new();
    world.add_body(RigidBody::new_static(Collider::new(Shape::plane(Vector3::y(), 0.0)), Vector3::zeros()));
    let ball = world.add_body(RigidBody::new_dynamic(
        Collider::new(Shape::sphere(0.5)),
        Vector3::new(0.0, 0.49, 0.0),
    ));

    for _ in 0..120 {
        world.fixed_step(DT);
    }
    assert!(world.get_body(ball).unwrap().is_sleeping());

    world.get_body_mut(ball).unwrap().add_impulse(Vector3::new(0.0, 5.0, 0.0));
    assert!(!world.get_body(ball).unwrap().is_sleeping());

    world.fixed_step(DT);
    assert!(world.get_body(ball).unwrap().get_position().y > 0.5);
}

#[test]
fn test_moving_body_wakes_sleeping_body() {
    let mut world = zero_gravity_world();
    let resting = world.add_body(RigidBody::new_dynamic(Collider::new(Shape::sphere(0.5)), Vector3::zeros()));
    world.get_body_mut(resting).unwrap().put_to_sleep();

    let striker = world.add_body(
        RigidBody::new_dynamic(Collider::new(Shape::sphere(0.5)), Vector3::new(-3.0, 0.0, 0.0))
            .with_linear_velocity(Vector3::new(5.0, 0.0, 0.0)),
    );

    let mut woke = false;
    for _ in 0..60 {
        world.fixed_step(DT);
        woke |= world.get_events().iter().any(|e| *e == PhysicsEvent::Wake(resting));
    }

    assert!(woke);
    assert!(!world.get_body(resting).unwrap().is_sleeping());
    assert!(world.get_body(resting).unwrap().get_linear_velocity().x > 1.0);
    assert!(world.get_body(striker).unwrap().get_linear_velocity().x < 5.0);
}

#[test]
fn test_disjoint_boxes_do_not_collide() {
    let mut world = zero_gravity_world();
    world.add_body(RigidBody::new_dynamic(
        Collider::new(Shape::cuboid(Vector3::repeat(0.5))),
        Vector3::zeros(),
    ));
    world.add_body(RigidBody::new_dynamic(
        Collider::new(Shape::cuboid(Vector3::repeat(0.5))),
        Vector3::new(3.0, 0.0, 0.0),
    ));

    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    world.set_collision_callback(move |_| counter.set(counter.get() + 1));

    world.fixed_step(DT);

    assert!(world.collisions().is_empty());
    assert_eq!(hits.get(), 0);
}

#[test]
fn test_collision_callback_fires_every_step() {
    let mut world = PhysicsWorld::new();
    world.add_body(RigidBody::new_static(
        Collider::new(Shape::cuboid(Vector3::new(5.0, 0.5, 5.0))),
        Vector3::zeros(),
    ));
    world.add_body(RigidBody::new_dynamic(
        Collider::new(Shape::cuboid(Vector3::repeat(0.5))),
        Vector3::new(0.0, 0.98, 0.0),
    ));

    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    world.set_collision_callback(move |info| {
        assert!(info.penetration >= 0.0);
        counter.set(counter.get() + 1);
    });

    for _ in 0..5 {
        world.fixed_step(DT);
    }

    assert_eq!(hits.get(), 5);
}

#[test]
fn test_trigger_enter_and_exit_fire_once() {
    let mut world = zero_gravity_world();
    let zone = world.add_body(RigidBody::new_static(Collider::trigger(Shape::sphere(1.0)), Vector3::zeros()));
    let ball = world.add_body(
        RigidBody::new_dynamic(Collider::new(Shape::sphere(0.5)), Vector3::new(-3.0, 0.0, 0.0))
            .with_linear_velocity(Vector3::new(3.0, 0.0, 0.0)),
    );

    let enters = Rc::new(Cell::new(0));
    let exits = Rc::new(Cell::new(0));
    let enter_counter = Rc::clone(&enters);
    let exit_counter = Rc::clone(&exits);
    world.set_trigger_enter_callback(move |_, _| enter_counter.set(enter_counter.get() + 1));
    world.set_trigger_exit_callback(move |_, _| exit_counter.set(exit_counter.get() + 1));

    let mut was_inside = false;
    for _ in 0..180 {
        world.fixed_step(DT);
        was_inside |= world.is_trigger_active(zone, ball);
    }

    assert!(was_inside);
    assert_eq!(enters.get(), 1);
    assert_eq!(exits.get(), 1);
    assert!(!world.is_trigger_active(zone, ball));

    // Triggers do not push the ball around
    let body = world.get_body(ball).unwrap();
    assert_relative_eq!(body.get_linear_velocity().x, 3.0, epsilon = 1e-4);
    assert!(world.collisions().is_empty());
}

#[test]
fn test_removing_body_drops_its_trigger_pairs() {
    let mut world = zero_gravity_world();
    let zone = world.add_body(RigidBody::new_static(Collider::trigger(Shape::sphere(1.0)), Vector3::zeros()));
    let visitor = world.add_body(RigidBody::new_dynamic(Collider::new(Shape::sphere(0.5)), Vector3::zeros()));

    let enters = Rc::new(Cell::new(0));
    let exits = Rc::new(Cell::new(0));
    let enter_counter = Rc::clone(&enters);
    let exit_counter = Rc::clone(&exits);
    world.set_trigger_enter_callback(move |_, _| enter_counter.set(enter_counter.get() + 1));
    world.set_trigger_exit_callback(move |_, _| exit_counter.set(exit_counter.get() + 1));

    world.fixed_step(DT);
    assert_eq!(enters.get(), 1);
    assert!(world.is_trigger_active(zone, visitor));
    assert_eq!(world.active_triggers().count(), 1);

    world.remove_body(visitor).unwrap();
    assert!(!world.is_trigger_active(zone, visitor));
    assert_eq!(world.active_triggers().count(), 0);

    world.fixed_step(DT);
    assert_eq!(exits.get(), 0);

    // Without callbacks the overlap is still tracked and queued
    world.clear_callbacks();
    let second = world.add_body(RigidBody::new_dynamic(Collider::new(Shape::sphere(0.5)), Vector3::zeros()));
    world.fixed_step(DT);

    assert_eq!(enters.get(), 1);
    assert!(world.is_trigger_active(zone, second));

    let mut queued = Vec::new();
    while let Some(event) = world.get_events_mut().next_event() {
        queued.push(event);
    }
    assert!(queued
        .iter()
        .any(|event| matches!(event, PhysicsEvent::TriggerEnter { .. }) && event.involves(second)));
    assert!(world.get_events().is_empty());
}

#[test]
fn test_kinematic_body_follows_its_velocity() {
    let mut world = PhysicsWorld::new();
    let handle = world.add_body(
        RigidBody::new_kinematic(Collider::new(Shape::cuboid(Vector3::repeat(0.5))), Vector3::zeros())
            .with_linear_velocity(Vector3::new(1.0, 0.0, 0.0)),
    );

    for _ in 0..60 {
        world.fixed_step(DT);
    }

    let body = world.get_body(handle).unwrap();
    assert_eq!(body.get_body_type(), RigidBodyType::Kinematic);
    assert_relative_eq!(body.get_position(), Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-3);
}

#[test]
fn test_remove_body() {
    let mut world = PhysicsWorld::new();
    let handle = world.add_body(RigidBody::new_dynamic(Collider::new(Shape::sphere(1.0)), Vector3::zeros()));
    assert_eq!(world.body_count(), 1);

    assert!(world.remove_body(handle).is_ok());
    assert_eq!(world.body_count(), 0);
    assert!(!world.contains_body(handle));
    assert!(world.get_body(handle).is_err());
    assert!(world.remove_body(handle).is_err());

    let removed: Vec<_> = world.get_events().events_for_body(handle);
    assert!(removed.contains(&&PhysicsEvent::Removed(handle)));
}

#[test]
fn test_removed_body_handle_is_not_reused() {
    let mut world = PhysicsWorld::new();
    let first = world.add_body(RigidBody::new_dynamic(Collider::new(Shape::sphere(1.0)), Vector3::zeros()));
    world.remove_body(first).unwrap();

    let second = world.add_body(RigidBody::new_dynamic(Collider::new(Shape::sphere(1.0)), Vector3::zeros()));
    assert_ne!(first, second);
    assert!(world.get_body(first).is_err());
    assert!(world.get_body(second).is_ok());
}

#[test]
fn test_step_accumulates_fixed_steps() {
    let mut world = PhysicsWorld::new();

    assert_eq!(world.step(2.5 * DT), 2);
    // The leftover half step carries over
    assert_eq!(world.step(0.75 * DT), 1);
    assert_eq!(world.step(0.0), 0);

    // A long frame is capped and the backlog dropped
    assert_eq!(world.step(1.0), world.get_config().max_substeps);
    assert_eq!(world.step(0.5 * DT), 0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut world = PhysicsWorld::new();
    let config = SimulationConfig {
        velocity_iterations: 0,
        ..SimulationConfig::default()
    };

    assert!(world.set_config(config.clone()).is_err());
    assert_eq!(world.get_config().velocity_iterations, 8);

    // Construction falls back to the defaults
    let world = PhysicsWorld::with_config(config);
    assert_eq!(world.get_config(), &SimulationConfig::default());
}

#[test]
fn test_contexts_are_independent() {
    let mut first = PhysicsContext::new();
    let mut second = PhysicsContext::new();

    let handle = first.add_body(RigidBody::new_dynamic(Collider::new(Shape::sphere(1.0)), Vector3::zeros()));
    first.fixed_step(DT);

    assert_eq!(first.world().body_count(), 1);
    assert_eq!(second.world().body_count(), 0);
    assert!(second.world().get_body(handle).is_err());

    second.fixed_step(DT);
    assert_relative_eq!(first.world().get_time(), second.world().get_time());
}
