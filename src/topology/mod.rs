pub mod cleanup;
pub mod segment;

pub use segment::{SegmentData, SegmentId, SegmentKind, SegmentType};

use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::config::PrimitiveConfig;
use crate::error::{Result, TopologyError};
use crate::geometry::segment_length;
use crate::math::{points_coincide, Matrix4, Point3};
use crate::operations::query::{Aabb, BoundingBox, EquidistantPoints};

/// An ordered chain of segments plus its derived summary state.
///
/// Segments live in an arena and reference their neighbours via typed IDs
/// (generational indices), so the chain can be edited and torn down without
/// self-referential structures. The summary (lengths, bounding box, equidistant
/// points) is a pure function of the chain and `bezier_to_world`, and is rebuilt by
/// [`Primitive::refresh`] after every structural or pose change.
#[derive(Debug, Clone)]
pub struct Primitive {
    segments: SlotMap<SegmentId, SegmentData>,
    head: Option<SegmentId>,
    tail: Option<SegmentId>,
    segment_list: Vec<SegmentId>,
    total_length: f64,
    bounding_box: Aabb,
    bezier_to_world: Matrix4,
    equidistant_points: Vec<Point3>,
    is_filled: bool,
    config: PrimitiveConfig,
}

impl Default for Primitive {
    fn default() -> Self {
        Self::new(PrimitiveConfig::default())
    }
}

impl Primitive {
    /// Creates an empty primitive with an identity pose.
    #[must_use]
    pub fn new(config: PrimitiveConfig) -> Self {
        Self {
            segments: SlotMap::with_key(),
            head: None,
            tail: None,
            segment_list: Vec::new(),
            total_length: 0.0,
            bounding_box: Aabb::default(),
            bezier_to_world: Matrix4::identity(),
            equidistant_points: Vec::new(),
            is_filled: false,
            config,
        }
    }

    /// Returns the configuration this primitive was created with.
    #[must_use]
    pub fn config(&self) -> &PrimitiveConfig {
        &self.config
    }

    // --- Segment access ---

    /// Returns a reference to the segment data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment does not belong to this primitive.
    pub fn segment(&self, id: SegmentId) -> Result<&SegmentData> {
        self.segments
            .get(id)
            .ok_or_else(|| TopologyError::SegmentNotFound.into())
    }

    /// Returns a mutable reference to the segment data, or an error if not found.
    pub(crate) fn segment_mut(&mut self, id: SegmentId) -> Result<&mut SegmentData> {
        self.segments
            .get_mut(id)
            .ok_or_else(|| TopologyError::SegmentNotFound.into())
    }

    /// Returns `true` if the segment belongs to this primitive.
    #[must_use]
    pub fn contains(&self, id: SegmentId) -> bool {
        self.segments.contains_key(id)
    }

    /// Number of segments in the chain.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_list.len()
    }

    /// Returns `true` if the chain has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segment_list.is_empty()
    }

    /// First segment of the chain.
    #[must_use]
    pub fn head(&self) -> Option<SegmentId> {
        self.head
    }

    /// Last segment of the chain.
    #[must_use]
    pub fn tail(&self) -> Option<SegmentId> {
        self.tail
    }

    /// Segment IDs in chain order.
    #[must_use]
    pub fn segment_ids(&self) -> &[SegmentId] {
        &self.segment_list
    }

    /// Iterates over the segments in chain order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &SegmentData)> + '_ {
        self.segment_list
            .iter()
            .filter_map(|&id| self.segments.get(id).map(|seg| (id, seg)))
    }

    // --- Summary ---

    /// Sum of all segment lengths.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// World-space axis-aligned bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> &Aabb {
        &self.bounding_box
    }

    /// Affine transform from curve (Bezier) space to world space.
    #[must_use]
    pub fn bezier_to_world(&self) -> &Matrix4 {
        &self.bezier_to_world
    }

    /// Equidistant world-space points along the whole path.
    #[must_use]
    pub fn equidistant_points(&self) -> &[Point3] {
        &self.equidistant_points
    }

    /// Whether the primitive is drawn filled.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.is_filled
    }

    /// Returns `true` if the tail's end point meets the head's start point.
    ///
    /// A single segment whose end returns to its own start is the one-segment case of
    /// this rule; a single open segment is not closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.ends_meet(self.head, self.tail)
    }

    fn ends_meet(&self, head: Option<SegmentId>, tail: Option<SegmentId>) -> bool {
        let (Some(head), Some(tail)) = (head, tail) else {
            return false;
        };
        match (self.segments.get(head), self.segments.get(tail)) {
            (Some(h), Some(t)) => points_coincide(t.end(), h.start(), self.config.point_tolerance),
            _ => false,
        }
    }

    // --- Chain plumbing for edit operations ---

    /// Inserts an unlinked segment into the arena.
    pub(crate) fn insert_unlinked(&mut self, segment: SegmentData) -> SegmentId {
        self.segments.insert(segment.unlinked())
    }

    /// Removes a segment from the arena without touching its neighbours.
    pub(crate) fn remove_raw(&mut self, id: SegmentId) -> Option<SegmentData> {
        self.segments.remove(id)
    }

    /// Links `first.next = second` and `second.prev = first`.
    pub(crate) fn link(&mut self, first: SegmentId, second: SegmentId) -> Result<()> {
        self.segment_mut(first)?.next = Some(second);
        self.segment_mut(second)?.prev = Some(first);
        Ok(())
    }

    pub(crate) fn set_head(&mut self, head: Option<SegmentId>) {
        self.head = head;
    }

    pub(crate) fn set_tail(&mut self, tail: Option<SegmentId>) {
        self.tail = tail;
    }

    pub(crate) fn set_filled(&mut self, filled: bool) {
        self.is_filled = filled;
    }

    pub(crate) fn set_bezier_to_world(&mut self, transform: Matrix4) {
        self.bezier_to_world = transform;
    }

    pub(crate) fn arena_len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn clear_arena(&mut self) -> usize {
        let remaining = self.segments.len();
        self.segments.clear();
        remaining
    }

    /// Rebuilds the traversal cache and every piece of derived summary state.
    ///
    /// Walks from the head via `next` links. The walk is bounded by the arena size, so
    /// a corrupted chain that loops back on itself is cut short instead of spinning.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary queries fail.
    pub fn refresh(&mut self) -> Result<()> {
        let mut list = Vec::with_capacity(self.segments.len());
        let mut cursor = self.head;
        while let Some(id) = cursor {
            if list.len() >= self.segments.len() {
                warn!(segments = self.segments.len(), "segment chain loops; traversal truncated");
                break;
            }
            let Some(segment) = self.segments.get_mut(id) else {
                break;
            };
            segment.list_location = list.len();
            segment.length = segment_length(segment, self.config.length_tolerance);
            list.push(id);
            cursor = segment.next;
        }

        if self.is_filled && !self.ends_meet(list.first().copied(), list.last().copied()) {
            debug!("chain no longer closed; fill dropped");
            self.is_filled = false;
        }

        self.total_length = list
            .iter()
            .filter_map(|&id| self.segments.get(id))
            .map(SegmentData::length)
            .sum();
        self.segment_list = list;

        let bounding_box = BoundingBox::new().execute(self)?;
        let equidistant = EquidistantPoints::new(self.config.equidistant_points).execute(self)?;
        self.bounding_box = bounding_box;
        self.equidistant_points = equidistant;
        Ok(())
    }

    /// Overrides a link without any checks, to build corrupted chains in tests.
    #[cfg(test)]
    pub(crate) fn force_link(&mut self, from: SegmentId, to: SegmentId) {
        if let Some(seg) = self.segments.get_mut(from) {
            seg.next = Some(to);
        }
        if let Some(seg) = self.segments.get_mut(to) {
            seg.prev = Some(from);
        }
    }
}
