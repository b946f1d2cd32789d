use crate::math::{Vector3, Matrix3, Aabb, Transform};
use crate::shapes::{Sphere, BoxShape, Capsule, Plane};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Tag identifying the variant of a [`Shape`], used to index the narrowphase table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ShapeType {
    Sphere = 0,
    Box = 1,
    Capsule = 2,
    Plane = 3,
}

impl ShapeType {
    /// Number of shape variants
    pub const COUNT: usize = 4;

    /// All shape types, in index order
    pub const ALL: [ShapeType; Self::COUNT] = [
        ShapeType::Sphere,
        ShapeType::Box,
        ShapeType::Capsule,
        ShapeType::Plane,
    ];

    /// Returns the table index of this shape type
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Shape {
    Sphere(Sphere),
    Box(BoxShape),
    Capsule(Capsule),
    Plane(Plane),
}

impl Shape {
    /// Creates a sphere shape
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere(Sphere::new(radius))
    }

    /// Creates a box shape from its half-extents
    pub fn cuboid(half_extents: Vector3) -> Self {
        Shape::Box(BoxShape::new(half_extents))
    }

    /// Creates a capsule shape (height excludes the caps)
    pub fn capsule(radius: f32, height: f32) -> Self {
        Shape::Capsule(Capsule::new(radius, height))
    }

    /// Creates a plane shape
    pub fn plane(normal: Vector3, distance: f32) -> Self {
        Shape::Plane(Plane::new(normal, distance))
    }

    /// Returns the variant tag of this shape
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Sphere(_) => ShapeType::Sphere,
            Shape::Box(_) => ShapeType::Box,
            Shape::Capsule(_) => ShapeType::Capsule,
            Shape::Plane(_) => ShapeType::Plane,
        }
    }

    /// Returns the local inertia tensor for the given mass
    pub fn get_inertia_tensor(&self, mass: f32) -> Matrix3 {
        match self {
            Shape::Sphere(sphere) => sphere.get_inertia_tensor(mass),
            Shape::Box(cuboid) => cuboid.get_inertia_tensor(mass),
            Shape::Capsule(capsule) => capsule.get_inertia_tensor(mass),
            // Planes are only ever static
            Shape::Plane(_) => Matrix3::zeros(),
        }
    }

    /// Returns the axis-aligned bounding box of the shape placed at `transform`
    pub fn get_world_bounds(&self, transform: &Transform) -> Aabb {
        match self {
            Shape::Sphere(sphere) => sphere.get_world_bounds(transform),
            Shape::Box(cuboid) => cuboid.get_world_bounds(transform),
            Shape::Capsule(capsule) => capsule.get_world_bounds(transform),
            Shape::Plane(plane) => plane.get_world_bounds(transform),
        }
    }

    /// Radius of a sphere centred on the shape origin that encloses it (infinite for planes)
    pub fn get_bounding_radius(&self) -> f32 {
        match self {
            Shape::Sphere(sphere) => sphere.get_radius(),
            Shape::Box(cuboid) => cuboid.get_bounding_radius(),
            Shape::Capsule(capsule) => capsule.get_bounding_radius(),
            Shape::Plane(_) => f32::INFINITY,
        }
    }

    /// Returns the shape grown by `radius` in every direction (rounded Minkowski sum,
    /// with box corners left square)
    pub fn inflated(&self, radius: f32) -> Self {
        match self {
            Shape::Sphere(sphere) => Shape::Sphere(Sphere::new(sphere.get_radius() + radius)),
            Shape::Box(cuboid) => {
                Shape::Box(BoxShape::new(cuboid.get_half_extents() + Vector3::repeat(radius)))
            }
            Shape::Capsule(capsule) => {
                Shape::Capsule(Capsule::new(capsule.get_radius() + radius, capsule.get_height()))
            }
            Shape::Plane(plane) => {
                Shape::Plane(Plane::new(plane.get_normal(), plane.get_distance() + radius))
            }
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<BoxShape> for Shape {
    fn from(cuboid: BoxShape) -> Self {
        Shape::Box(cuboid)
    }
}

impl From<Capsule> for Shape {
    fn from(capsule: Capsule) -> Self {
        Shape::Capsule(capsule)
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Shape::Plane(plane)
    }
}
