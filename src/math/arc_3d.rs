//! Center-defined circular arc math.
//!
//! An arc is given by its start point, center and end point. It always sweeps the
//! minor angle (at most π) from `start - center` to `end - center`, rotating about
//! their common normal. Anti-parallel (half-turn) and coincident vectors have no
//! defined normal, so +Z is used. The radius is interpolated linearly between the
//! two endpoint radii so both endpoints lie on the curve.

use nalgebra::{Unit, UnitQuaternion};

use super::{Point3, Vector3, TOLERANCE};

/// Decomposed arc: rotation axis, sweep angle and the two endpoint radii.
#[derive(Debug, Clone, Copy)]
pub struct ArcFrame {
    /// Unit rotation axis.
    pub axis: Vector3,
    /// Sweep angle in radians, in `[0, π]`.
    pub sweep: f64,
    /// Distance from the center to the start point.
    pub start_radius: f64,
    /// Distance from the center to the end point.
    pub end_radius: f64,
    /// Unit direction from the center to the start point.
    pub start_dir: Vector3,
}

/// Builds the [`ArcFrame`] for an arc, or `None` if the start point sits on the center.
#[must_use]
pub fn arc_frame(start: &Point3, center: &Point3, end: &Point3) -> Option<ArcFrame> {
    let u = start - center;
    let v = end - center;
    let start_radius = u.norm();
    if start_radius < TOLERANCE {
        return None;
    }
    let end_radius = v.norm();
    let cross = u.cross(&v);
    let cross_len = cross.norm();
    let sweep = cross_len.atan2(u.dot(&v));
    let axis = if cross_len < TOLERANCE * start_radius.max(end_radius) {
        Vector3::z()
    } else {
        cross / cross_len
    };
    Some(ArcFrame {
        axis,
        sweep,
        start_radius,
        end_radius,
        start_dir: u / start_radius,
    })
}

/// Sweep angle derived from the chord length and the start radius.
///
/// `angle = 2 asin(chord / 2r)`, clamped so chords longer than a diameter read as a
/// half turn.
#[must_use]
pub fn chord_sweep(start: &Point3, center: &Point3, end: &Point3) -> f64 {
    let radius = (start - center).norm();
    if radius < TOLERANCE {
        return 0.0;
    }
    let chord = (end - start).norm();
    2.0 * (chord / (2.0 * radius)).min(1.0).asin()
}

/// Evaluates the arc at `t`. `t <= 0` and `t >= 1` return the endpoints unchanged.
#[must_use]
pub fn arc_point(start: &Point3, center: &Point3, end: &Point3, t: f64) -> Point3 {
    if t <= 0.0 {
        return *start;
    }
    if t >= 1.0 {
        return *end;
    }
    let Some(frame) = arc_frame(start, center, end) else {
        return super::bezier::lerp(start, end, t);
    };
    let rotation = UnitQuaternion::from_axis_angle(&Unit::new_unchecked(frame.axis), frame.sweep * t);
    let radius = frame.start_radius + (frame.end_radius - frame.start_radius) * t;
    center + rotation * frame.start_dir * radius
}

/// Unit tangent of the arc at `t`, in the direction of travel.
#[must_use]
pub fn arc_tangent(start: &Point3, center: &Point3, end: &Point3, t: f64) -> Vector3 {
    let Some(frame) = arc_frame(start, center, end) else {
        return (end - start).try_normalize(TOLERANCE).unwrap_or_else(Vector3::zeros);
    };
    let rotation = UnitQuaternion::from_axis_angle(
        &Unit::new_unchecked(frame.axis),
        frame.sweep * t.clamp(0.0, 1.0),
    );
    let radial = rotation * frame.start_dir;
    frame.axis.cross(&radial)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn quarter_arc_midpoint() {
        let mid = arc_point(&p(1.0, 0.0), &p(0.0, 0.0), &p(0.0, 1.0), 0.5);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(mid.x, h, epsilon = 1e-12);
        assert_relative_eq!(mid.y, h, epsilon = 1e-12);
    }

    #[test]
    fn clockwise_arc_rotates_negatively() {
        let mid = arc_point(&p(0.0, 1.0), &p(0.0, 0.0), &p(1.0, 0.0), 0.5);
        assert!(mid.x > 0.0 && mid.y > 0.0);
        let frame = arc_frame(&p(0.0, 1.0), &p(0.0, 0.0), &p(1.0, 0.0)).unwrap();
        assert_relative_eq!(frame.axis.z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(frame.sweep, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn half_turn_falls_back_to_z_axis() {
        let frame = arc_frame(&p(1.0, 0.0), &p(0.0, 0.0), &p(-1.0, 0.0)).unwrap();
        assert_relative_eq!(frame.axis.z, 1.0);
        assert_relative_eq!(frame.sweep, PI, epsilon = 1e-12);
        let mid = arc_point(&p(1.0, 0.0), &p(0.0, 0.0), &p(-1.0, 0.0), 0.5);
        assert_relative_eq!(mid.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn chord_sweep_matches_quarter_turn() {
        let sweep = chord_sweep(&p(2.0, 0.0), &p(0.0, 0.0), &p(0.0, 2.0));
        assert_relative_eq!(sweep, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn tangent_is_perpendicular_to_radius() {
        let t = arc_tangent(&p(1.0, 0.0), &p(0.0, 0.0), &p(0.0, 1.0), 0.0);
        assert_relative_eq!(t.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(t.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn center_on_start_has_no_frame() {
        assert!(arc_frame(&p(0.0, 0.0), &p(0.0, 0.0), &p(1.0, 0.0)).is_none());
    }
}
