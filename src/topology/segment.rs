use crate::math::{Point3, Vector3, TOLERANCE};

slotmap::new_key_type! {
    /// Unique identifier for a segment within its primitive's arena.
    pub struct SegmentId;
}

/// Plain tag naming the curve family of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentType {
    /// Circular arc around a center point.
    Arc,
    /// Cubic Bezier with two control points.
    CubicBezier,
}

/// The curve-specific control data of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentKind {
    /// A cubic Bezier from `start` to `end` shaped by two control points.
    CubicBezier {
        /// Control point pulling away from the start point.
        control_1: Point3,
        /// Control point pulling into the end point.
        control_2: Point3,
    },
    /// A minor circular arc from `start` to `end` around `center`.
    Arc {
        /// Center of the arc circle.
        center: Point3,
    },
}

impl SegmentKind {
    /// Returns the [`SegmentType`] tag of this kind.
    #[must_use]
    pub fn segment_type(&self) -> SegmentType {
        match self {
            Self::CubicBezier { .. } => SegmentType::CubicBezier,
            Self::Arc { .. } => SegmentType::Arc,
        }
    }
}

/// One curve piece of a primitive, plus its links within the chain.
///
/// The links, cached length and list location are owned by the primitive and only
/// change through its edit operations.
#[derive(Debug, Clone)]
pub struct SegmentData {
    start: Point3,
    end: Point3,
    kind: SegmentKind,
    pub(crate) length: f64,
    pub(crate) list_location: usize,
    pub(crate) prev: Option<SegmentId>,
    pub(crate) next: Option<SegmentId>,
}

impl SegmentData {
    /// Creates an unlinked segment of the given kind.
    #[must_use]
    pub fn new(start: Point3, end: Point3, kind: SegmentKind) -> Self {
        Self {
            start,
            end,
            kind,
            length: 0.0,
            list_location: 0,
            prev: None,
            next: None,
        }
    }

    /// Creates a cubic Bezier segment.
    #[must_use]
    pub fn cubic(start: Point3, control_1: Point3, control_2: Point3, end: Point3) -> Self {
        Self::new(start, end, SegmentKind::CubicBezier { control_1, control_2 })
    }

    /// Creates a straight segment: a cubic whose control points sit on its endpoints.
    #[must_use]
    pub fn line(start: Point3, end: Point3) -> Self {
        Self::cubic(start, start, end, end)
    }

    /// Creates an arc segment around `center`.
    #[must_use]
    pub fn arc(start: Point3, center: Point3, end: Point3) -> Self {
        Self::new(start, end, SegmentKind::Arc { center })
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> &Point3 {
        &self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> &Point3 {
        &self.end
    }

    /// Returns the curve kind and its control points.
    #[must_use]
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// Returns the curve family tag.
    #[must_use]
    pub fn segment_type(&self) -> SegmentType {
        self.kind.segment_type()
    }

    /// Returns the cached length, as of the last primitive refresh.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns this segment's index in the primitive's ordered segment list.
    #[must_use]
    pub fn list_location(&self) -> usize {
        self.list_location
    }

    /// Returns the previous segment in the chain.
    #[must_use]
    pub fn prev(&self) -> Option<SegmentId> {
        self.prev
    }

    /// Returns the next segment in the chain.
    #[must_use]
    pub fn next(&self) -> Option<SegmentId> {
        self.next
    }

    /// Returns the four cubic control points `[start, c1, c2, end]`, if this is a cubic.
    #[must_use]
    pub fn cubic_points(&self) -> Option<[Point3; 4]> {
        match self.kind {
            SegmentKind::CubicBezier {
                control_1,
                control_2,
            } => Some([self.start, control_1, control_2, self.end]),
            SegmentKind::Arc { .. } => None,
        }
    }

    /// Returns `true` if both endpoints (and all control points) coincide.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let span = |p: &Point3| (p - self.start).norm() < TOLERANCE;
        match &self.kind {
            SegmentKind::CubicBezier {
                control_1,
                control_2,
            } => span(&self.end) && span(control_1) && span(control_2),
            SegmentKind::Arc { .. } => span(&self.end),
        }
    }

    /// Replaces the geometry of this segment, keeping its links.
    pub(crate) fn set_geometry(&mut self, start: Point3, end: Point3, kind: SegmentKind) {
        self.start = start;
        self.end = end;
        self.kind = kind;
    }

    /// Moves the start point, dragging the first control point of a cubic along.
    pub(crate) fn snap_start(&mut self, start: Point3) {
        let delta: Vector3 = start - self.start;
        if let SegmentKind::CubicBezier { control_1, .. } = &mut self.kind {
            if (*control_1 - self.start).norm() < TOLERANCE {
                *control_1 = start;
            } else {
                *control_1 += delta;
            }
        }
        self.start = start;
    }

    /// Moves the end point, dragging the second control point of a cubic along.
    pub(crate) fn snap_end(&mut self, end: Point3) {
        let delta: Vector3 = end - self.end;
        if let SegmentKind::CubicBezier { control_2, .. } = &mut self.kind {
            if (*control_2 - self.end).norm() < TOLERANCE {
                *control_2 = end;
            } else {
                *control_2 += delta;
            }
        }
        self.end = end;
    }

    /// Clears chain links and bookkeeping, as for a segment about to be inserted.
    pub(crate) fn unlinked(mut self) -> Self {
        self.prev = None;
        self.next = None;
        self.length = 0.0;
        self.list_location = 0;
        self
    }
}
