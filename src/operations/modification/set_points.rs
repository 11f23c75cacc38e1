use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::math::{points_coincide, Point3};
use crate::topology::{Primitive, SegmentId, SegmentKind};

/// Replaces the endpoints and control points of one segment.
///
/// By default the new endpoints must meet the neighbouring segments. With
/// [`SetSegmentPoints::carrying_neighbours`] the neighbours are moved along instead,
/// which is how a dragged joint behaves in the editor. On a closed chain the head and
/// tail count as neighbours of each other.
pub struct SetSegmentPoints {
    id: SegmentId,
    start: Point3,
    end: Point3,
    kind: SegmentKind,
    carry_neighbours: bool,
}

impl SetSegmentPoints {
    /// Creates a new `SetSegmentPoints` operation.
    #[must_use]
    pub fn new(id: SegmentId, start: Point3, end: Point3, kind: SegmentKind) -> Self {
        Self {
            id,
            start,
            end,
            kind,
            carry_neighbours: false,
        }
    }

    /// Moves the neighbouring endpoints to the new endpoints instead of rejecting a
    /// mismatch.
    #[must_use]
    pub fn carrying_neighbours(mut self) -> Self {
        self.carry_neighbours = true;
        self
    }

    /// Executes the edit.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is missing, if the new kind is not the
    /// segment's current curve family, or (without carrying) if an endpoint no longer
    /// meets its neighbour. The primitive is left unchanged on error.
    pub fn execute(&self, primitive: &mut Primitive) -> Result<()> {
        let current = primitive.segment(self.id)?;
        if current.segment_type() != self.kind.segment_type() {
            return Err(TopologyError::KindMismatch(format!(
                "segment is {:?}, new points describe {:?}",
                current.segment_type(),
                self.kind.segment_type()
            ))
            .into());
        }

        let (before, after) = self.neighbours(primitive)?;
        let tolerance = primitive.config().point_tolerance;
        let mut start = self.start;
        let mut end = self.end;

        if !self.carry_neighbours {
            if let Some(prev) = before {
                let expected = *primitive.segment(prev)?.end();
                if !points_coincide(&start, &expected, tolerance) {
                    return Err(TopologyError::EndpointMismatch {
                        expected,
                        found: start,
                    }
                    .into());
                }
                start = expected;
            }
            if let Some(next) = after {
                let expected = *primitive.segment(next)?.start();
                if !points_coincide(&end, &expected, tolerance) {
                    return Err(TopologyError::EndpointMismatch {
                        expected,
                        found: end,
                    }
                    .into());
                }
                end = expected;
            }
        }

        primitive
            .segment_mut(self.id)?
            .set_geometry(start, end, self.kind);

        if self.carry_neighbours {
            if let Some(prev) = before {
                primitive.segment_mut(prev)?.snap_end(start);
            }
            if let Some(next) = after {
                primitive.segment_mut(next)?.snap_start(end);
            }
        }
        primitive.refresh()?;

        debug!(carry = self.carry_neighbours, "segment points set");
        Ok(())
    }

    /// The segments whose endpoints touch this one, wrapping around a closed chain.
    fn neighbours(&self, primitive: &Primitive) -> Result<(Option<SegmentId>, Option<SegmentId>)> {
        let segment = primitive.segment(self.id)?;
        let closed = primitive.is_closed() && primitive.segment_count() > 1;
        let before = segment
            .prev()
            .or_else(|| if closed { primitive.tail() } else { None });
        let after = segment
            .next()
            .or_else(|| if closed { primitive.head() } else { None });
        Ok((before, after))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::VectorCoreError;
    use crate::operations::modification::AppendSegment;
    use crate::topology::{Primitive, SegmentData};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn straight(start: Point3, end: Point3) -> SegmentKind {
        SegmentKind::CubicBezier {
            control_1: start,
            control_2: end,
        }
    }

    fn three_lines() -> (Primitive, [SegmentId; 3]) {
        let mut prim = Primitive::default();
        let a = AppendSegment::new(SegmentData::line(p(0.0, 0.0), p(1.0, 0.0)))
            .execute(&mut prim)
            .unwrap();
        let b = AppendSegment::new(SegmentData::line(p(1.0, 0.0), p(2.0, 0.0)))
            .execute(&mut prim)
            .unwrap();
        let c = AppendSegment::new(SegmentData::line(p(2.0, 0.0), p(3.0, 0.0)))
            .execute(&mut prim)
            .unwrap();
        (prim, [a, b, c])
    }

    #[test]
    fn reshaping_controls_keeps_joints() {
        let (mut prim, [_, b, _]) = three_lines();
        let kind = SegmentKind::CubicBezier {
            control_1: p(1.0, 1.0),
            control_2: p(2.0, 1.0),
        };
        SetSegmentPoints::new(b, p(1.0, 0.0), p(2.0, 0.0), kind)
            .execute(&mut prim)
            .unwrap();
        assert_eq!(*prim.segment(b).unwrap().kind(), kind);
        assert!(prim.total_length() > 3.0);
    }

    #[test]
    fn strict_mode_rejects_moved_endpoint() {
        let (mut prim, [_, b, _]) = three_lines();
        let err = SetSegmentPoints::new(b, p(1.0, 0.5), p(2.0, 0.0), straight(p(1.0, 0.5), p(2.0, 0.0)))
            .execute(&mut prim)
            .unwrap_err();
        assert!(matches!(
            err,
            VectorCoreError::Topology(TopologyError::EndpointMismatch { .. })
        ));
        assert_eq!(*prim.segment(b).unwrap().start(), p(1.0, 0.0));
    }

    #[test]
    fn carrying_moves_neighbours() {
        let (mut prim, [a, b, c]) = three_lines();
        SetSegmentPoints::new(b, p(1.0, 1.0), p(2.0, 1.0), straight(p(1.0, 1.0), p(2.0, 1.0)))
            .carrying_neighbours()
            .execute(&mut prim)
            .unwrap();
        assert_eq!(*prim.segment(a).unwrap().end(), p(1.0, 1.0));
        assert_eq!(*prim.segment(c).unwrap().start(), p(2.0, 1.0));
        assert_relative_eq!(prim.total_length(), 1.0 + 2.0 * 2f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn carrying_wraps_around_closed_chain() {
        let mut prim = Primitive::default();
        let a = AppendSegment::new(SegmentData::line(p(0.0, 0.0), p(1.0, 0.0)))
            .execute(&mut prim)
            .unwrap();
        AppendSegment::new(SegmentData::line(p(1.0, 0.0), p(0.0, 1.0)))
            .execute(&mut prim)
            .unwrap();
        let c = AppendSegment::new(SegmentData::line(p(0.0, 1.0), p(0.0, 0.0)))
            .execute(&mut prim)
            .unwrap();

        SetSegmentPoints::new(a, p(-1.0, -1.0), p(1.0, 0.0), straight(p(-1.0, -1.0), p(1.0, 0.0)))
            .carrying_neighbours()
            .execute(&mut prim)
            .unwrap();
        assert_eq!(*prim.segment(c).unwrap().end(), p(-1.0, -1.0));
        assert!(prim.is_closed());
    }

    #[test]
    fn changing_curve_family_fails() {
        let (mut prim, [a, _, _]) = three_lines();
        let err = SetSegmentPoints::new(a, p(0.0, 0.0), p(1.0, 0.0), SegmentKind::Arc { center: p(0.5, 0.0) })
            .execute(&mut prim)
            .unwrap_err();
        assert!(matches!(err, VectorCoreError::Topology(TopologyError::KindMismatch(_))));
    }
}
