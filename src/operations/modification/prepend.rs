use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::math::points_coincide;
use crate::topology::{Primitive, SegmentData, SegmentId};

/// Prepends a segment before the head of a primitive.
pub struct PrependSegment {
    segment: SegmentData,
}

impl PrependSegment {
    /// Creates a new `PrependSegment` operation.
    #[must_use]
    pub fn new(segment: SegmentData) -> Self {
        Self { segment }
    }

    /// Executes the prepend, returning the new head's ID.
    ///
    /// The segment's end point must match the head's start point within the point
    /// tolerance, and is snapped onto it exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the end point does not meet the current head, in which case
    /// the primitive is left unchanged.
    pub fn execute(&self, primitive: &mut Primitive) -> Result<SegmentId> {
        let mut segment = self.segment.clone();
        let head = primitive.head();

        if let Some(head) = head {
            let head_start = *primitive.segment(head)?.start();
            if !points_coincide(segment.end(), &head_start, primitive.config().point_tolerance) {
                return Err(TopologyError::EndpointMismatch {
                    expected: head_start,
                    found: *segment.end(),
                }
                .into());
            }
            segment.snap_end(head_start);
        }

        let id = primitive.insert_unlinked(segment);
        match head {
            Some(head) => primitive.link(id, head)?,
            None => primitive.set_tail(Some(id)),
        }
        primitive.set_head(Some(id));
        primitive.refresh()?;

        debug!(segments = primitive.segment_count(), "segment prepended");
        Ok(id)
    }
}
