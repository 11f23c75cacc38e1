use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::split_segment_geometry;
use crate::math::{points_coincide, Point3};
use crate::operations::query::segment_given_point_on_primitive;
use crate::topology::{Primitive, SegmentId};

/// Splits the segment under a point into two segments meeting at that point.
pub struct SplitSegment {
    point: Point3,
}

impl SplitSegment {
    /// Creates a new `SplitSegment` operation at a curve-space point.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self { point }
    }

    /// Executes the split, returning `(first, second)` in chain order.
    ///
    /// The owning segment keeps its ID and becomes the first half; the second half is
    /// a new segment linked right after it. The halves share exactly the given point.
    ///
    /// # Errors
    ///
    /// Returns an error if the point is farther than the resolution tolerance from the
    /// path, or if it coincides with an existing segment boundary. The primitive is
    /// left unchanged in both cases.
    pub fn execute(&self, primitive: &mut Primitive) -> Result<(SegmentId, SegmentId)> {
        let config = *primitive.config();
        let (id, local) =
            segment_given_point_on_primitive(primitive, &self.point, config.resolution_tolerance)?;

        let original = primitive.segment(id)?.clone();
        if local <= 0.0
            || local >= 1.0
            || points_coincide(&self.point, original.start(), config.point_tolerance)
            || points_coincide(&self.point, original.end(), config.point_tolerance)
        {
            return Err(TopologyError::SplitAtBoundary.into());
        }

        let (first, second) = split_segment_geometry(&original, local, self.point);
        let old_next = original.next();

        let second_id = primitive.insert_unlinked(second);
        let segment = primitive.segment_mut(id)?;
        segment.set_geometry(*first.start(), *first.end(), *first.kind());
        primitive.link(id, second_id)?;
        match old_next {
            Some(next) => primitive.link(second_id, next)?,
            None => primitive.set_tail(Some(second_id)),
        }
        primitive.refresh()?;

        debug!(local, segments = primitive.segment_count(), "segment split");
        Ok((id, second_id))
    }
}
