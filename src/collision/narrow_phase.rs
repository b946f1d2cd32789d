use tracing::trace;

use crate::collision::contact_generator;
use crate::collision::contact_manifold::ContactManifold;
use crate::math::Transform;
use crate::shapes::{Shape, ShapeType};

/// Signature of a shape-pair routine. The normal of the result points from the first
/// shape toward the second.
pub type CollideFn = fn(&Shape, &Transform, &Shape, &Transform) -> Option<ContactManifold>;

/// Shape-pair dispatch table indexed by `(ShapeType, ShapeType)`
pub struct NarrowPhase {
    table: [[Option<CollideFn>; ShapeType::COUNT]; ShapeType::COUNT],
}

impl NarrowPhase {
    /// Creates the table with every supported pair registered
    pub fn new() -> Self {
        let mut narrow_phase = Self {
            table: [[None; ShapeType::COUNT]; ShapeType::COUNT],
        };

        narrow_phase.register(ShapeType::Sphere, ShapeType::Sphere, sphere_sphere);
        narrow_phase.register(ShapeType::Sphere, ShapeType::Plane, sphere_plane);
        narrow_phase.register(ShapeType::Plane, ShapeType::Sphere, plane_sphere);
        narrow_phase.register(ShapeType::Sphere, ShapeType::Box, sphere_box);
        narrow_phase.register(ShapeType::Box, ShapeType::Sphere, box_sphere);
        narrow_phase.register(ShapeType::Box, ShapeType::Plane, box_plane);
        narrow_phase.register(ShapeType::Plane, ShapeType::Box, plane_box);
        narrow_phase.register(ShapeType::Box, ShapeType::Box, box_box);
        narrow_phase.register(ShapeType::Capsule, ShapeType::Sphere, capsule_sphere);
        narrow_phase.register(ShapeType::Sphere, ShapeType::Capsule, sphere_capsule);

        narrow_phase
    }

    /// Installs the routine used for the ordered pair `(a, b)`
    pub fn register(&mut self, a: ShapeType, b: ShapeType, collide: CollideFn) {
        self.table[a.index()][b.index()] = Some(collide);
    }

    /// Returns whether the ordered pair `(a, b)` has a routine
    pub fn supports(&self, a: ShapeType, b: ShapeType) -> bool {
        self.table[a.index()][b.index()].is_some()
    }

    /// Tests two placed shapes. Unsupported pairs never collide.
    pub fn collide(
        &self,
        shape_a: &Shape,
        transform_a: &Transform,
        shape_b: &Shape,
        transform_b: &Transform,
    ) -> Option<ContactManifold> {
        let (type_a, type_b) = (shape_a.shape_type(), shape_b.shape_type());

        match self.table[type_a.index()][type_b.index()] {
            Some(collide) => collide(shape_a, transform_a, shape_b, transform_b),
            None => {
                trace!(?type_a, ?type_b, "no narrowphase routine for shape pair");
                None
            }
        }
    }
}

impl Default for NarrowPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NarrowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let supported = self.table.iter().flatten().filter(|entry| entry.is_some()).count();
        f.debug_struct("NarrowPhase").field("supported_pairs", &supported).finish()
    }
}

// Table entries. Each canonical entry unwraps the variants and forwards; reversed
// entries swap the arguments and flip the normal.

fn sphere_sphere(a: &Shape, ta: &Transform, b: &Shape, tb: &Transform) -> Option<ContactManifold> {
    match (a, b) {
        (Shape::Sphere(a), Shape::Sphere(b)) => contact_generator::sphere_sphere(a, ta, b, tb),
        _ => None,
    }
}

fn sphere_plane(a: &Shape, ta: &Transform, b: &Shape, tb: &Transform) -> Option<ContactManifold> {
    match (a, b) {
        (Shape::Sphere(a), Shape::Plane(b)) => contact_generator::sphere_plane(a, ta, b, tb),
        _ => None,
    }
}

fn plane_sphere(a: &Shape, ta: &Transform, b: &Shape, tb: &Transform) -> Option<ContactManifold> {
    sphere_plane(b, tb, a, ta).map(ContactManifold::flipped)
}

fn sphere_box(a: &Shape, ta: &Transform, b: &Shape, tb: &Transform) -> Option<ContactManifold> {
    match (a, b) {
        (Shape::Sphere(a), Shape::Box(b)) => contact_generator::sphere_box(a, ta, b, tb),
        _ => None,
    }
}

fn box_sphere(a: &Shape, ta: &Transform, b: &Shape, tb: &Transform) -> Option<ContactManifold> {
    sphere_box(b, tb, a, ta).map(ContactManifold::flipped)
}

fn box_plane(a: &Shape, ta: &Transform, b: &Shape, tb: &Transform) -> Option<ContactManifold> {
    match (a, b) {
        (Shape::Box(a), Shape::Plane(b)) => contact_generator::box_plane(a, ta, b, tb),
        _ => None,
    }
}

fn plane_box(a: &Shape, ta: &Transform, b: &Shape, tb: &Transform) -> Option<ContactManifold> {
    box_plane(b, tb, a, ta).map(ContactManifold::flipped)
}

fn box_box(a: &Shape, ta: &Transform, b: &Shape, tb: &Transform) -> Option<ContactManifold> {
    match (a, b) {
        (Shape::Box(a), Shape::Box(b)) => contact_generator::box_box(a, ta, b, tb),
        _ => None,
    }
}

fn capsule_sphere(a: &Shape, ta: &Transform, b: &Shape, tb: &Transform) -> Option<ContactManifold> {
    match (a, b) {
        (Shape::Capsule(a), Shape::Sphere(b)) => contact_generator::capsule_sphere(a, ta, b, tb),
        _ => None,
    }
}

fn sphere_capsule(a: &Shape, ta: &Transform, b: &Shape, tb: &Transform) -> Option<ContactManifold> {
    capsule_sphere(b, tb, a, ta).map(ContactManifold::flipped)
}
