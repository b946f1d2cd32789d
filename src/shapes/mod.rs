mod shape;
mod sphere;
mod box_shape;
mod capsule;
mod plane;
mod collider;

pub use self::shape::{Shape, ShapeType};
pub use self::sphere::Sphere;
pub use self::box_shape::BoxShape;
pub use self::capsule::Capsule;
pub use self::plane::{Plane, PLANE_EXTENT};
pub use self::collider::Collider;
