use crate::error::Result;
use crate::geometry::point_given_t_on_segment;
use crate::math::arc_3d::arc_frame;
use crate::math::{transform_point, Point3, TOLERANCE};
use crate::topology::{Primitive, SegmentData, SegmentId, SegmentKind};

use super::{Polyline, TessellationParams};

/// Tessellates one segment into a curve-space polyline.
pub struct TessellateSegment {
    segment: SegmentId,
    params: TessellationParams,
}

impl TessellateSegment {
    /// Creates a new `TessellateSegment` operation.
    #[must_use]
    pub fn new(segment: SegmentId, params: TessellationParams) -> Self {
        Self { segment, params }
    }

    /// Executes the tessellation. The polyline starts and ends exactly on the
    /// segment's endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or the segment is missing.
    pub fn execute(&self, primitive: &Primitive) -> Result<Polyline> {
        self.params.validate()?;
        let segment = primitive.segment(self.segment)?;
        Ok(Polyline {
            points: sample_segment(segment, &self.params),
        })
    }
}

/// Tessellates a whole primitive into one world-space polyline.
///
/// Shared joints appear once. A closed primitive ends on the point it starts from.
pub struct TessellatePrimitive {
    params: TessellationParams,
}

impl TessellatePrimitive {
    /// Creates a new `TessellatePrimitive` operation.
    #[must_use]
    pub fn new(params: TessellationParams) -> Self {
        Self { params }
    }

    /// Executes the tessellation. An empty primitive yields an empty polyline.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid.
    pub fn execute(&self, primitive: &Primitive) -> Result<Polyline> {
        self.params.validate()?;
        let transform = primitive.bezier_to_world();
        let points = curve_space_outline(primitive, &self.params)
            .iter()
            .map(|p| transform_point(transform, p))
            .collect();
        Ok(Polyline { points })
    }
}

/// Samples the whole chain in curve space, with each shared joint listed once.
pub(super) fn curve_space_outline(primitive: &Primitive, params: &TessellationParams) -> Vec<Point3> {
    let mut points: Vec<Point3> = Vec::new();
    for (_, segment) in primitive.iter() {
        let skip = usize::from(!points.is_empty());
        points.extend(sample_segment(segment, params).into_iter().skip(skip));
    }
    points
}

/// Uniform parameter samples of a segment, both endpoints included.
fn sample_segment(segment: &SegmentData, params: &TessellationParams) -> Vec<Point3> {
    let n = subdivision_count(segment, params);
    (0..=n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / n as f64;
            point_given_t_on_segment(segment, t)
        })
        .collect()
}

/// Number of straight pieces needed to stay within `params.tolerance` of a segment.
///
/// Arcs use the sagitta bound. Cubics use the bound on the second differences of the
/// control polygon; a straight cubic needs a single piece.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn subdivision_count(segment: &SegmentData, params: &TessellationParams) -> usize {
    match segment.kind() {
        SegmentKind::Arc { center } => {
            let Some(frame) = arc_frame(segment.start(), center, segment.end()) else {
                return 1;
            };
            let radius = frame.start_radius.max(frame.end_radius);
            if frame.sweep < TOLERANCE {
                return 1;
            }
            // sagitta = r (1 - cos(θ / 2))
            let max_angle = if params.tolerance >= radius {
                std::f64::consts::PI
            } else {
                2.0 * (1.0 - params.tolerance / radius).acos()
            };
            let n = (frame.sweep / max_angle).ceil() as usize;
            n.clamp(params.min_segments, params.max_segments)
        }
        SegmentKind::CubicBezier { .. } => {
            let Some([p0, p1, p2, p3]) = segment.cubic_points() else {
                return 1;
            };
            let bend = (p0.coords - p1.coords * 2.0 + p2.coords)
                .norm()
                .max((p1.coords - p2.coords * 2.0 + p3.coords).norm());
            let polygon = (p1 - p0).norm() + (p2 - p1).norm() + (p3 - p2).norm();
            let straight = polygon - (p3 - p0).norm() < TOLERANCE;
            if straight {
                return 1;
            }
            let n = (0.75 * bend / params.tolerance).sqrt().ceil() as usize;
            n.clamp(params.min_segments, params.max_segments)
        }
    }
}
