//! Teardown of a primitive's segment chain.

use tracing::{debug, warn};

use super::{Primitive, SegmentId};
use crate::operations::query::Aabb;

impl Primitive {
    /// Releases every segment of the chain exactly once and resets the primitive.
    ///
    /// The chain is expected to be a simple doubly-linked list, but a buggy edit may
    /// have looped it. A head with a `prev` link means the chain wraps around, so that
    /// link is severed first. The forward walk then collects IDs on a stack, bounded by
    /// the arena size so a loop that does not pass through the head still terminates.
    /// Popping the stack removes each segment from the arena; arena removal is
    /// exactly-once, so a segment collected twice is only released once. Segments the
    /// walk never reached are released last.
    ///
    /// Returns the number of segments released.
    pub fn clean_up_chain(&mut self) -> usize {
        let mut released = 0;

        if let Some(head) = self.head() {
            let before_head = self.segments.get(head).and_then(|seg| seg.prev);
            if let Some(before_head) = before_head {
                warn!("segment chain loops back to its head; severing");
                if let Some(seg) = self.segments.get_mut(before_head) {
                    seg.next = None;
                }
                if let Some(seg) = self.segments.get_mut(head) {
                    seg.prev = None;
                }
            }

            let limit = self.arena_len();
            let mut stack: Vec<SegmentId> = Vec::with_capacity(limit);
            let mut cursor = Some(head);
            while let Some(id) = cursor {
                if stack.len() >= limit {
                    break;
                }
                stack.push(id);
                cursor = self.segments.get(id).and_then(|seg| seg.next);
            }

            while let Some(id) = stack.pop() {
                if self.remove_raw(id).is_some() {
                    released += 1;
                }
            }
        }

        let orphans = self.clear_arena();
        if orphans > 0 {
            warn!(orphans, "released segments unreachable from the head");
        }
        released += orphans;

        self.set_head(None);
        self.set_tail(None);
        self.set_filled(false);
        self.segment_list.clear();
        self.total_length = 0.0;
        self.bounding_box = Aabb::default();
        self.equidistant_points.clear();

        debug!(released, "segment chain cleaned up");
        released
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::modification::AppendSegment;
    use crate::topology::SegmentData;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn three_segment_chain() -> (Primitive, Vec<SegmentId>) {
        let mut prim = Primitive::default();
        let ids = [
            (p(0.0, 0.0), p(1.0, 0.0)),
            (p(1.0, 0.0), p(2.0, 0.0)),
            (p(2.0, 0.0), p(3.0, 0.0)),
        ]
        .into_iter()
        .map(|(a, b)| {
            AppendSegment::new(SegmentData::line(a, b))
                .execute(&mut prim)
                .unwrap()
        })
        .collect();
        (prim, ids)
    }

    #[test]
    fn releases_simple_chain() {
        let (mut prim, ids) = three_segment_chain();
        assert_eq!(prim.clean_up_chain(), 3);
        assert!(ids.iter().all(|&id| !prim.contains(id)));
        assert!(prim.head().is_none());
        assert!(prim.is_empty());
    }

    #[test]
    fn releases_chain_looped_back_to_head_once() {
        let (mut prim, ids) = three_segment_chain();
        prim.force_link(ids[2], ids[0]);
        assert_eq!(prim.clean_up_chain(), 3);
        assert_eq!(prim.arena_len(), 0);
    }

    #[test]
    fn releases_chain_looped_into_its_middle_once() {
        let (mut prim, ids) = three_segment_chain();
        // tail.next -> middle; the head keeps a null prev, so only the walk bound stops it.
        if let Ok(seg) = prim.segment_mut(ids[2]) {
            seg.next = Some(ids[1]);
        }
        assert_eq!(prim.clean_up_chain(), 3);
        assert_eq!(prim.arena_len(), 0);
    }

    #[test]
    fn empty_chain_releases_nothing() {
        let mut prim = Primitive::default();
        assert_eq!(prim.clean_up_chain(), 0);
    }
}
