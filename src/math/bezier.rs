//! Cubic Bezier utilities on raw control points.
//!
//! Control points are passed as `[p0, p1, p2, p3]`, where `p0` and `p3` are the
//! on-curve endpoints.

use super::{Point3, Vector3};

/// Recursion cap for [`cubic_length`]; 2^16 pieces is far beyond any useful precision.
const MAX_LENGTH_DEPTH: u32 = 16;

/// Linear interpolation between two points.
#[must_use]
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}

/// Evaluates a cubic Bezier with De Casteljau's algorithm.
///
/// `t <= 0` and `t >= 1` return the endpoints unchanged, so the endpoints are
/// reproduced bit-exactly.
#[must_use]
pub fn cubic_point(points: &[Point3; 4], t: f64) -> Point3 {
    if t <= 0.0 {
        return points[0];
    }
    if t >= 1.0 {
        return points[3];
    }
    let a = lerp(&points[0], &points[1], t);
    let b = lerp(&points[1], &points[2], t);
    let c = lerp(&points[2], &points[3], t);
    let d = lerp(&a, &b, t);
    let e = lerp(&b, &c, t);
    lerp(&d, &e, t)
}

/// First derivative of a cubic Bezier at `t`.
#[must_use]
pub fn cubic_derivative(points: &[Point3; 4], t: f64) -> Vector3 {
    let mt = 1.0 - t;
    (points[1] - points[0]) * (3.0 * mt * mt)
        + (points[2] - points[1]) * (6.0 * mt * t)
        + (points[3] - points[2]) * (3.0 * t * t)
}

/// Splits a cubic Bezier at `t`, returning the control points of both halves.
///
/// The right half starts exactly where the left half ends.
#[must_use]
pub fn cubic_split(points: &[Point3; 4], t: f64) -> ([Point3; 4], [Point3; 4]) {
    let a = lerp(&points[0], &points[1], t);
    let b = lerp(&points[1], &points[2], t);
    let c = lerp(&points[2], &points[3], t);
    let d = lerp(&a, &b, t);
    let e = lerp(&b, &c, t);
    let m = lerp(&d, &e, t);
    ([points[0], a, d, m], [m, e, c, points[3]])
}

/// Length of the control polygon `p0 → p1 → p2 → p3`.
#[must_use]
pub fn control_polygon_length(points: &[Point3; 4]) -> f64 {
    (points[1] - points[0]).norm() + (points[2] - points[1]).norm() + (points[3] - points[2]).norm()
}

/// Estimates the arc length of a cubic Bezier.
///
/// The true length lies between the chord and the control polygon length. Each piece
/// is accepted once those two bounds differ by less than `tolerance`, using their
/// mean; otherwise the piece is split in half and both halves are measured.
#[must_use]
pub fn cubic_length(points: &[Point3; 4], tolerance: f64) -> f64 {
    cubic_length_recursive(points, tolerance.max(f64::EPSILON), 0)
}

fn cubic_length_recursive(points: &[Point3; 4], tolerance: f64, depth: u32) -> f64 {
    let chord = (points[3] - points[0]).norm();
    let polygon = control_polygon_length(points);
    if polygon - chord <= tolerance || depth >= MAX_LENGTH_DEPTH {
        return 0.5 * (chord + polygon);
    }
    let (left, right) = cubic_split(points, 0.5);
    let half_tolerance = 0.5 * tolerance;
    cubic_length_recursive(&left, half_tolerance, depth + 1)
        + cubic_length_recursive(&right, half_tolerance, depth + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn s_curve() -> [Point3; 4] {
        [p(0.0, 0.0), p(1.0, 2.0), p(2.0, -2.0), p(3.0, 0.0)]
    }

    #[test]
    fn endpoints_are_exact() {
        let pts = s_curve();
        assert_eq!(cubic_point(&pts, 0.0), pts[0]);
        assert_eq!(cubic_point(&pts, 1.0), pts[3]);
    }

    #[test]
    fn straight_cubic_length_is_exact() {
        let pts = [p(0.0, 0.0), p(0.0, 0.0), p(3.0, 4.0), p(3.0, 4.0)];
        assert_relative_eq!(cubic_length(&pts, 1e-6), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn length_lies_between_chord_and_polygon() {
        let pts = s_curve();
        let len = cubic_length(&pts, 1e-6);
        assert!(len > 3.0);
        assert!(len < control_polygon_length(&pts));
    }

    #[test]
    fn halves_sum_to_whole() {
        let pts = s_curve();
        let (left, right) = cubic_split(&pts, 0.3);
        let whole = cubic_length(&pts, 1e-8);
        let parts = cubic_length(&left, 1e-8) + cubic_length(&right, 1e-8);
        assert_relative_eq!(whole, parts, epsilon = 1e-6);
    }

    #[test]
    fn split_shares_joint() {
        let pts = s_curve();
        let (left, right) = cubic_split(&pts, 0.5);
        assert_eq!(left[3], right[0]);
        assert!((left[3] - cubic_point(&pts, 0.5)).norm() < 1e-12);
    }

    #[test]
    fn degenerate_cubic_has_zero_length() {
        let pts = [p(1.0, 1.0); 4];
        assert_eq!(cubic_length(&pts, 1e-6), 0.0);
    }

    #[test]
    fn derivative_of_line_is_constant() {
        let pts = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)];
        let d0 = cubic_derivative(&pts, 0.0);
        let d1 = cubic_derivative(&pts, 0.7);
        assert_relative_eq!(d0.x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(d1.x, 3.0, epsilon = 1e-12);
    }
}
