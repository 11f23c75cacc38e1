use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::tangent_given_t_on_segment;
use crate::math::arc_3d::arc_frame;
use crate::math::{points_coincide, Point3, TOLERANCE};
use crate::topology::{Primitive, SegmentData, SegmentId, SegmentKind};

/// Tangent directions closer than this (as `1 - dot`) count as one smooth joint.
const SMOOTH_JOINT: f64 = 1e-9;

/// Merges two adjacent segments into one running from the first's start to the
/// second's end.
pub struct MergeSegments {
    first: SegmentId,
    second: SegmentId,
}

impl MergeSegments {
    /// Creates a new `MergeSegments` operation. `second` must directly follow `first`.
    #[must_use]
    pub fn new(first: SegmentId, second: SegmentId) -> Self {
        Self { first, second }
    }

    /// Executes the merge, returning the ID of the merged segment (the first's ID).
    ///
    /// Two cubics that form a smooth joint are merged back into the single cubic they
    /// would have been split from. Two arcs around the same center that together sweep
    /// less than a half turn stay an arc. Any other pair becomes a cubic that keeps the
    /// outer tangents of both segments.
    ///
    /// # Errors
    ///
    /// Returns an error if either segment is missing or `second` does not directly
    /// follow `first`. The primitive is left unchanged in both cases.
    pub fn execute(&self, primitive: &mut Primitive) -> Result<SegmentId> {
        let first = primitive.segment(self.first)?.clone();
        let second = primitive.segment(self.second)?.clone();
        if first.next() != Some(self.second) || second.prev() != Some(self.first) {
            return Err(TopologyError::NotAdjacent.into());
        }

        let point_tolerance = primitive.config().point_tolerance;
        let merged = merge_geometry(&first, &second, point_tolerance);

        primitive
            .segment_mut(self.first)?
            .set_geometry(*merged.start(), *merged.end(), *merged.kind());
        match second.next() {
            Some(next) => primitive.link(self.first, next)?,
            None => {
                primitive.segment_mut(self.first)?.next = None;
                primitive.set_tail(Some(self.first));
            }
        }
        primitive.remove_raw(self.second);
        primitive.refresh()?;

        debug!(
            kind = ?merged.segment_type(),
            segments = primitive.segment_count(),
            "segments merged"
        );
        Ok(self.first)
    }
}

fn merge_geometry(first: &SegmentData, second: &SegmentData, point_tolerance: f64) -> SegmentData {
    match (first.kind(), second.kind()) {
        (SegmentKind::CubicBezier { .. }, SegmentKind::CubicBezier { .. }) => {
            merge_cubics(first, second).unwrap_or_else(|| tangent_cubic(first, second))
        }
        (SegmentKind::Arc { center: a }, SegmentKind::Arc { center: b })
            if points_coincide(a, b, point_tolerance) =>
        {
            merge_arcs(first, second, a).unwrap_or_else(|| tangent_cubic(first, second))
        }
        _ => tangent_cubic(first, second),
    }
}

/// Rebuilds the parent of two cubics that meet smoothly, inverting De Casteljau.
fn merge_cubics(first: &SegmentData, second: &SegmentData) -> Option<SegmentData> {
    let [a0, a1, a2, joint] = first.cubic_points()?;
    let [_, b1, b2, b3] = second.cubic_points()?;

    let into = tangent_given_t_on_segment(first, 1.0);
    let out = tangent_given_t_on_segment(second, 0.0);
    if into.dot(&out) < 1.0 - SMOOTH_JOINT {
        return None;
    }

    let span = (b1 - a2).norm();
    let t = if (joint - a2).norm() > TOLERANCE && (b1 - joint).norm() > TOLERANCE {
        (joint - a2).norm() / span
    } else {
        let total = first.length() + second.length();
        if total < TOLERANCE {
            0.5
        } else {
            first.length() / total
        }
    };
    let t = t.clamp(TOLERANCE, 1.0 - TOLERANCE);

    let control_1 = a0 + (a1 - a0) / t;
    let control_2 = b3 + (b2 - b3) / (1.0 - t);
    Some(SegmentData::cubic(a0, control_1, control_2, b3))
}

/// Joins two arcs sharing a center, if they turn the same way and stay a minor arc.
fn merge_arcs(first: &SegmentData, second: &SegmentData, center: &Point3) -> Option<SegmentData> {
    let a = arc_frame(first.start(), center, first.end())?;
    let b = arc_frame(second.start(), center, second.end())?;
    if a.axis.dot(&b.axis) < 1.0 - SMOOTH_JOINT {
        return None;
    }
    if a.sweep + b.sweep >= std::f64::consts::PI - TOLERANCE {
        return None;
    }
    Some(SegmentData::arc(*first.start(), *center, *second.end()))
}

/// A cubic from the first start to the second end that keeps both outer tangents.
fn tangent_cubic(first: &SegmentData, second: &SegmentData) -> SegmentData {
    let start = *first.start();
    let end = *second.end();
    let handle = (first.length() + second.length()) / 3.0;
    let control_1 = start + tangent_given_t_on_segment(first, 0.0) * handle;
    let control_2 = end - tangent_given_t_on_segment(second, 1.0) * handle;
    SegmentData::cubic(start, control_1, control_2, end)
}
