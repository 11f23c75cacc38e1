//! Segment-local curve algorithms: length, evaluation, projection and splitting.
//!
//! Every function here works on a single [`SegmentData`] and never touches the
//! chain it belongs to.

use crate::math::arc_3d::{arc_point, arc_tangent, chord_sweep};
use crate::math::bezier::{cubic_derivative, cubic_length, cubic_point, cubic_split};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{SegmentData, SegmentKind};

/// Iterations of ternary refinement after the coarse projection scan.
const REFINE_ITERATIONS: u32 = 50;

/// Result of projecting a point onto a segment.
#[derive(Debug, Clone, Copy)]
pub struct ClosestPointResult {
    /// The closest point on the segment.
    pub point: Point3,
    /// The local parameter of the closest point, in `[0, 1]`.
    pub parameter: f64,
    /// The distance from the query point to the closest point.
    pub distance: f64,
}

/// Computes the length of a segment.
///
/// For a cubic Bezier this is an adaptive chord / control-polygon estimate accurate to
/// `tolerance`; it is exact for straight segments. For an arc it is `radius * angle`,
/// with the radius measured from the start point to the center and the angle derived
/// from the chord. Degenerate segments have length zero.
#[must_use]
pub fn segment_length(segment: &SegmentData, tolerance: f64) -> f64 {
    match segment.kind() {
        SegmentKind::CubicBezier { .. } => segment
            .cubic_points()
            .map_or(0.0, |points| cubic_length(&points, tolerance)),
        SegmentKind::Arc { center } => {
            let radius = (segment.start() - center).norm();
            radius * chord_sweep(segment.start(), center, segment.end())
        }
    }
}

/// Evaluates a segment at local parameter `t`.
///
/// `t = 0` yields the start point and `t = 1` the end point, bit-exactly; values
/// outside `[0, 1]` are clamped.
#[must_use]
pub fn point_given_t_on_segment(segment: &SegmentData, t: f64) -> Point3 {
    match segment.kind() {
        SegmentKind::CubicBezier {
            control_1,
            control_2,
        } => cubic_point(&[*segment.start(), *control_1, *control_2, *segment.end()], t),
        SegmentKind::Arc { center } => arc_point(segment.start(), center, segment.end(), t),
    }
}

/// Unit tangent of a segment at local parameter `t`.
///
/// Falls back to the chord direction where the derivative vanishes (a straight
/// cubic at its endpoints), and to zero for a degenerate segment.
#[must_use]
pub fn tangent_given_t_on_segment(segment: &SegmentData, t: f64) -> Vector3 {
    let chord = || {
        (segment.end() - segment.start())
            .try_normalize(TOLERANCE)
            .unwrap_or_else(Vector3::zeros)
    };
    match segment.kind() {
        SegmentKind::CubicBezier {
            control_1,
            control_2,
        } => {
            let points = [*segment.start(), *control_1, *control_2, *segment.end()];
            cubic_derivative(&points, t.clamp(0.0, 1.0))
                .try_normalize(TOLERANCE)
                .unwrap_or_else(chord)
        }
        SegmentKind::Arc { center } => arc_tangent(segment.start(), center, segment.end(), t),
    }
}

/// Finds the point on a segment closest to `point`.
///
/// Scans `samples` uniform parameters, then narrows the bracket around the best
/// sample with ternary search.
#[must_use]
pub fn closest_point_on_segment(segment: &SegmentData, point: &Point3, samples: u32) -> ClosestPointResult {
    let samples = samples.max(2);
    let distance_at = |t: f64| (point - point_given_t_on_segment(segment, t)).norm();

    let mut best_t = 0.0;
    let mut best_dist = f64::INFINITY;
    for i in 0..=samples {
        let t = f64::from(i) / f64::from(samples);
        let d = distance_at(t);
        if d < best_dist {
            best_dist = d;
            best_t = t;
        }
    }

    let dt = 1.0 / f64::from(samples);
    let mut lo = (best_t - dt).max(0.0);
    let mut hi = (best_t + dt).min(1.0);
    for _ in 0..REFINE_ITERATIONS {
        let mid1 = lo + (hi - lo) / 3.0;
        let mid2 = hi - (hi - lo) / 3.0;
        if distance_at(mid1) < distance_at(mid2) {
            hi = mid2;
        } else {
            lo = mid1;
        }
    }

    #[allow(clippy::manual_midpoint)]
    let refined = (lo + hi) / 2.0;
    // Endpoint samples are exact; keep them when refinement cannot beat them.
    let refined_dist = distance_at(refined);
    let (parameter, distance) = if refined_dist < best_dist {
        (refined, refined_dist)
    } else {
        (best_t, best_dist)
    };

    ClosestPointResult {
        point: point_given_t_on_segment(segment, parameter),
        parameter,
        distance,
    }
}

/// Returns the local parameter of the point on `segment` closest to `point`.
#[must_use]
pub fn t_given_point_on_segment(segment: &SegmentData, point: &Point3, samples: u32) -> f64 {
    closest_point_on_segment(segment, point, samples).parameter
}

/// Maps a fraction of a segment's arc length to its local parameter.
///
/// Builds a cumulative chord-length table over `samples` uniform parameters and
/// interpolates inside it. Arcs are already arc-length parameterised.
#[must_use]
pub fn length_fraction_to_t(segment: &SegmentData, fraction: f64, samples: u32) -> f64 {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction <= 0.0 || fraction >= 1.0 {
        return fraction;
    }
    if matches!(segment.kind(), SegmentKind::Arc { .. }) {
        return fraction;
    }

    let samples = samples.max(2);
    let mut table = Vec::with_capacity(samples as usize + 1);
    let mut prev = *segment.start();
    let mut acc = 0.0;
    table.push(0.0);
    for i in 1..=samples {
        let pt = point_given_t_on_segment(segment, f64::from(i) / f64::from(samples));
        acc += (pt - prev).norm();
        table.push(acc);
        prev = pt;
    }
    if acc < TOLERANCE {
        return fraction;
    }

    let target = fraction * acc;
    let idx = table.partition_point(|&len| len < target).clamp(1, table.len() - 1);
    let (lo, hi) = (table[idx - 1], table[idx]);
    let local = if hi - lo < TOLERANCE {
        0.0
    } else {
        (target - lo) / (hi - lo)
    };
    let base = u32::try_from(idx - 1).unwrap_or(samples);
    (f64::from(base) + local) / f64::from(samples)
}

/// Splits a segment's geometry at local parameter `t`, returning two unlinked
/// segments whose shared boundary is exactly `joint`.
///
/// Cubics are split with De Casteljau; arcs keep their center.
#[must_use]
pub fn split_segment_geometry(segment: &SegmentData, t: f64, joint: Point3) -> (SegmentData, SegmentData) {
    match segment.kind() {
        SegmentKind::CubicBezier {
            control_1,
            control_2,
        } => {
            let points = [*segment.start(), *control_1, *control_2, *segment.end()];
            let (left, right) = cubic_split(&points, t);
            let offset = joint - left[3];
            (
                SegmentData::cubic(left[0], left[1], left[2] + offset, joint),
                SegmentData::cubic(joint, right[1] + offset, right[2], right[3]),
            )
        }
        SegmentKind::Arc { center } => (
            SegmentData::arc(*segment.start(), *center, joint),
            SegmentData::arc(joint, *center, *segment.end()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn quarter_arc() -> SegmentData {
        SegmentData::arc(p(2.0, 0.0), p(0.0, 0.0), p(0.0, 2.0))
    }

    fn s_curve() -> SegmentData {
        SegmentData::cubic(p(0.0, 0.0), p(1.0, 2.0), p(2.0, -2.0), p(3.0, 0.0))
    }

    #[test]
    fn unit_line_length() {
        let seg = SegmentData::line(p(0.0, 0.0), p(1.0, 0.0));
        assert_relative_eq!(segment_length(&seg, 1e-6), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn arc_length_is_radius_times_angle() {
        assert_relative_eq!(segment_length(&quarter_arc(), 1e-6), 2.0 * FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn zero_radius_arc_has_zero_length() {
        let seg = SegmentData::arc(p(0.0, 0.0), p(0.0, 0.0), p(1.0, 0.0));
        assert_eq!(segment_length(&seg, 1e-6), 0.0);
    }

    #[test]
    fn endpoints_evaluate_exactly() {
        for seg in [s_curve(), quarter_arc()] {
            assert_eq!(point_given_t_on_segment(&seg, 0.0), *seg.start());
            assert_eq!(point_given_t_on_segment(&seg, 1.0), *seg.end());
        }
    }

    #[test]
    fn projection_recovers_parameter() {
        let seg = s_curve();
        let target = point_given_t_on_segment(&seg, 0.37);
        let t = t_given_point_on_segment(&seg, &target, 64);
        assert_relative_eq!(t, 0.37, epsilon = 1e-6);
    }

    #[test]
    fn projection_of_off_curve_point_reports_distance() {
        let seg = SegmentData::line(p(0.0, 0.0), p(10.0, 0.0));
        let result = closest_point_on_segment(&seg, &p(5.0, 3.0), 64);
        assert_relative_eq!(result.point.x, 5.0, epsilon = 1e-6);
        assert_relative_eq!(result.distance, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn projection_clamps_to_endpoints() {
        let seg = SegmentData::line(p(0.0, 0.0), p(10.0, 0.0));
        assert_eq!(t_given_point_on_segment(&seg, &p(-4.0, 0.0), 64), 0.0);
        assert_eq!(t_given_point_on_segment(&seg, &p(14.0, 0.0), 64), 1.0);
    }

    #[test]
    fn projection_is_monotonic_along_arc() {
        let seg = quarter_arc();
        let mut last = -1.0;
        for i in 0..=10 {
            let angle = f64::from(i) / 10.0 * FRAC_PI_2;
            let q = p(2.0 * angle.cos(), 2.0 * angle.sin());
            let t = t_given_point_on_segment(&seg, &q, 64);
            assert!(t >= last);
            last = t;
        }
    }

    #[test]
    fn length_fraction_on_straight_cubic_is_uniform() {
        // Controls on the endpoints make the parameterisation non-uniform.
        let seg = SegmentData::line(p(0.0, 0.0), p(1.0, 0.0));
        let t = length_fraction_to_t(&seg, 0.25, 256);
        let x = point_given_t_on_segment(&seg, t).x;
        assert_relative_eq!(x, 0.25, epsilon = 1e-3);
    }

    #[test]
    fn split_cubic_shares_given_joint() {
        let seg = s_curve();
        let joint = point_given_t_on_segment(&seg, 0.5);
        let (left, right) = split_segment_geometry(&seg, 0.5, joint);
        assert_eq!(left.end(), right.start());
        assert_eq!(*left.start(), *seg.start());
        assert_eq!(*right.end(), *seg.end());
    }

    #[test]
    fn split_arc_halves_length() {
        let seg = SegmentData::arc(p(1.0, 0.0), p(0.0, 0.0), p(-1.0, 0.0));
        let joint = point_given_t_on_segment(&seg, 0.5);
        let (left, right) = split_segment_geometry(&seg, 0.5, joint);
        assert_relative_eq!(segment_length(&left, 1e-6), PI / 2.0, epsilon = 1e-9);
        assert_relative_eq!(segment_length(&right, 1e-6), PI / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn tangent_of_straight_line_follows_chord() {
        let seg = SegmentData::line(p(0.0, 0.0), p(0.0, 3.0));
        let t0 = tangent_given_t_on_segment(&seg, 0.0);
        assert_relative_eq!(t0.y, 1.0, epsilon = 1e-12);
    }
}
