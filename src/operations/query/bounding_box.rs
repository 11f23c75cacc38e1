use crate::error::Result;
use crate::geometry::point_given_t_on_segment;
use crate::math::{transform_point, Point3};
use crate::topology::Primitive;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Point3::origin(),
            max: Point3::origin(),
        }
    }
}

impl Aabb {
    /// Smallest box containing every point, or `None` for an empty iterator.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |acc, p| Self {
            min: acc.min.inf(p),
            max: acc.max.sup(p),
        }))
    }

    /// Returns `true` if `point` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }
}

/// Computes the world-space axis-aligned bounding box of a primitive.
///
/// Each segment is sampled at `projection_samples` uniform parameters and the
/// samples are mapped through the primitive's Bezier-to-world transform. An empty
/// primitive yields a zero box at the origin.
pub struct BoundingBox;

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query, returning the AABB.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment in the chain cannot be found.
    pub fn execute(&self, primitive: &Primitive) -> Result<Aabb> {
        let samples = primitive.config().projection_samples.max(1);
        let transform = primitive.bezier_to_world();
        let mut points = Vec::new();
        for &id in primitive.segment_ids() {
            let segment = primitive.segment(id)?;
            for i in 0..=samples {
                let t = f64::from(i) / f64::from(samples);
                points.push(transform_point(transform, &point_given_t_on_segment(segment, t)));
            }
        }
        Ok(Aabb::from_points(&points).unwrap_or_default())
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}
