mod transform;
mod aabb;
mod ray;

pub use transform::Transform;
pub use aabb::Aabb;
pub use ray::Ray;

use nalgebra as na;

/// 3D vector used throughout the engine
pub type Vector3 = na::Vector3<f32>;

/// Unit quaternion used for orientations
pub type Quaternion = na::UnitQuaternion<f32>;

/// 3x3 matrix used for inertia tensors
pub type Matrix3 = na::Matrix3<f32>;

/// Constant for a very small number, used for comparisons
pub const EPSILON: f32 = 1.0e-6;

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f32) -> bool {
    a.abs() < EPSILON
}

/// Returns the unit vector along `v`, or `fallback` when `v` is too short to normalize
#[inline]
pub fn normalize_or(v: Vector3, fallback: Vector3) -> Vector3 {
    v.try_normalize(EPSILON).unwrap_or(fallback)
}

/// Returns the point on segment `[a, b]` closest to `point`
pub fn closest_point_on_segment(a: Vector3, b: Vector3, point: Vector3) -> Vector3 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < EPSILON {
        return a;
    }

    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Returns two unit vectors that form an orthonormal basis with the unit vector `n`
pub fn orthonormal_basis(n: Vector3) -> (Vector3, Vector3) {
    // Pick the world axis least aligned with n
    let helper = if n.x.abs() < 0.57 { Vector3::x() } else { Vector3::y() };
    let t1 = normalize_or(n.cross(&helper), Vector3::z());
    let t2 = n.cross(&t1);
    (t1, t2)
}

/// Converts a rotation into a scaled axis (axis * angle), taking the short way around
#[inline]
pub fn rotation_error(rotation: &Quaternion) -> Vector3 {
    rotation.scaled_axis()
}
