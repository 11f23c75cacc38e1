pub mod arc_3d;
pub mod bezier;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns `true` if two points are within `tolerance` of each other.
#[must_use]
pub fn points_coincide(a: &Point3, b: &Point3, tolerance: f64) -> bool {
    (a - b).norm() <= tolerance
}

/// Transforms a point by a 4x4 matrix (homogeneous coordinates).
///
/// Projective matrices are divided through by `w`; affine ones leave it at 1.
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let v = matrix * nalgebra::Vector4::new(point.x, point.y, point.z, 1.0);
    if (v.w - 1.0).abs() > TOLERANCE && v.w.abs() > TOLERANCE {
        Point3::new(v.x / v.w, v.y / v.w, v.z / v.w)
    } else {
        Point3::new(v.x, v.y, v.z)
    }
}
