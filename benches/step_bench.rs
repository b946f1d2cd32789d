use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use phys_core::{
    Collider, Constraint, PhysicsContext, PhysicsWorld, Ray, RaycastOptions, RigidBody, Shape, Vector3,
};

const DT: f32 = 1.0 / 60.0;

/// A ground plane with a grid of spheres and boxes dropped onto it
fn build_pile(n: usize) -> PhysicsWorld {
    let mut world = PhysicsWorld::new();
    world.add_body(RigidBody::new_static(Collider::new(Shape::plane(Vector3::y(), 0.0)), Vector3::zeros()));

    let side = (n as f32).sqrt().ceil() as usize;
    for i in 0..n {
        let position = Vector3::new((i % side) as f32 * 1.5, 1.0 + (i / side) as f32 * 0.1, (i / side) as f32 * 1.5);
        let shape = if i % 2 == 0 {
            Shape::sphere(0.5)
        } else {
            Shape::cuboid(Vector3::repeat(0.5))
        };
        world.add_body(RigidBody::new_dynamic(Collider::new(shape), position));
    }
    world
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_step");
    for &n in &[10usize, 100, 400] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || build_pile(n),
                |mut world| {
                    for _ in 0..10 {
                        world.fixed_step(DT);
                    }
                    world
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    c.bench_function("distance_chain_32", |b| {
        b.iter_batched(
            || {
                let mut context = PhysicsContext::new();
                let mut previous =
                    context.add_body(RigidBody::new_static(Collider::new(Shape::sphere(0.1)), Vector3::zeros()));
                for i in 1..=32 {
                    let link = context.add_body(RigidBody::new_dynamic(
                        Collider::new(Shape::sphere(0.1)),
                        Vector3::new(i as f32 * 0.5, 0.0, 0.0),
                    ));
                    let joint = Constraint::distance(previous, link, Vector3::zeros(), Vector3::zeros(), 0.5);
                    if context.add_constraint(joint).is_err() {
                        unreachable!("both links exist");
                    }
                    previous = link;
                }
                context
            },
            |mut context| {
                for _ in 0..10 {
                    context.fixed_step(DT);
                }
                context
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_raycast(c: &mut Criterion) {
    let world = build_pile(400);
    let options = RaycastOptions::default();

    c.bench_function("raycast_400", |b| {
        let mut x = 0.0_f32;
        b.iter(|| {
            x = (x + 0.37) % 30.0;
            let ray = Ray::new(Vector3::new(x, 10.0, x), -Vector3::y());
            black_box(world.raycaster().raycast(&ray, &options))
        })
    });
}

criterion_group!(benches, bench_step, bench_chain, bench_raycast);
criterion_main!(benches);
