use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::math::points_coincide;
use crate::topology::{Primitive, SegmentData, SegmentId};

/// Appends a segment after the tail of a primitive.
pub struct AppendSegment {
    segment: SegmentData,
}

impl AppendSegment {
    /// Creates a new `AppendSegment` operation.
    #[must_use]
    pub fn new(segment: SegmentData) -> Self {
        Self { segment }
    }

    /// Executes the append, returning the new tail's ID.
    ///
    /// On an empty primitive the segment becomes both head and tail. Otherwise its
    /// start point must match the tail's end point within the configured point
    /// tolerance; it is then snapped onto that point exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the start point does not meet the current tail, in which
    /// case the primitive is left unchanged.
    pub fn execute(&self, primitive: &mut Primitive) -> Result<SegmentId> {
        let mut segment = self.segment.clone();
        let tail = primitive.tail();

        if let Some(tail) = tail {
            let tail_end = *primitive.segment(tail)?.end();
            if !points_coincide(segment.start(), &tail_end, primitive.config().point_tolerance) {
                return Err(TopologyError::EndpointMismatch {
                    expected: tail_end,
                    found: *segment.start(),
                }
                .into());
            }
            segment.snap_start(tail_end);
        }

        let id = primitive.insert_unlinked(segment);
        match tail {
            Some(tail) => primitive.link(tail, id)?,
            None => primitive.set_head(Some(id)),
        }
        primitive.set_tail(Some(id));
        primitive.refresh()?;

        debug!(segments = primitive.segment_count(), "segment appended");
        Ok(id)
    }
}
