use crate::error::Result;
use crate::geometry::{length_fraction_to_t, point_given_t_on_segment};
use crate::math::{transform_point, Point3};
use crate::topology::Primitive;

/// Resamples a primitive into points evenly spaced by arc length, in world space.
pub struct EquidistantPoints {
    count: usize,
}

impl EquidistantPoints {
    /// Creates a new `EquidistantPoints` query producing `count` points.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Executes the query.
    ///
    /// The first point is the head's start and the last the tail's end. A single
    /// requested point yields only the start. Empty primitives and a count of zero
    /// yield no points.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment in the chain cannot be found.
    pub fn execute(&self, primitive: &Primitive) -> Result<Vec<Point3>> {
        if self.count == 0 || primitive.is_empty() {
            return Ok(Vec::new());
        }
        let samples = primitive.config().projection_samples;
        let transform = primitive.bezier_to_world();
        let total = primitive.total_length();

        let segments: Vec<_> = primitive
            .segment_ids()
            .iter()
            .map(|&id| primitive.segment(id))
            .collect::<Result<_>>()?;

        let mut points = Vec::with_capacity(self.count);
        let mut index = 0;
        let mut consumed = 0.0;
        for k in 0..self.count {
            #[allow(clippy::cast_precision_loss)]
            let target = if self.count == 1 {
                0.0
            } else {
                total * k as f64 / (self.count - 1) as f64
            };

            while index + 1 < segments.len() && consumed + segments[index].length() < target {
                consumed += segments[index].length();
                index += 1;
            }

            let segment = segments[index];
            let fraction = if segment.length() > 0.0 {
                (target - consumed) / segment.length()
            } else {
                1.0
            };
            let t = length_fraction_to_t(segment, fraction, samples);
            points.push(transform_point(transform, &point_given_t_on_segment(segment, t)));
        }
        Ok(points)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::PrimitiveConfig;
    use crate::operations::modification::AppendSegment;
    use crate::topology::SegmentData;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn l_shape() -> Primitive {
        let config = PrimitiveConfig {
            projection_samples: 256,
            ..PrimitiveConfig::default()
        };
        let mut prim = Primitive::new(config);
        AppendSegment::new(SegmentData::line(p(0.0, 0.0), p(2.0, 0.0)))
            .execute(&mut prim)
            .unwrap();
        AppendSegment::new(SegmentData::line(p(2.0, 0.0), p(2.0, 2.0)))
            .execute(&mut prim)
            .unwrap();
        prim
    }

    #[test]
    fn spans_whole_path() {
        let prim = l_shape();
        let pts = EquidistantPoints::new(5).execute(&prim).unwrap();
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], p(0.0, 0.0));
        assert_eq!(pts[4], p(2.0, 2.0));
    }

    #[test]
    fn spacing_is_even() {
        let prim = l_shape();
        let pts = EquidistantPoints::new(5).execute(&prim).unwrap();
        assert_relative_eq!(pts[1].x, 1.0, epsilon = 1e-3);
        assert_relative_eq!(pts[2].x, 2.0, epsilon = 1e-3);
        assert_relative_eq!(pts[3].y, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn zero_count_is_empty() {
        let prim = l_shape();
        assert!(EquidistantPoints::new(0).execute(&prim).unwrap().is_empty());
    }

    #[test]
    fn primitive_keeps_configured_density() {
        let prim = l_shape();
        assert_eq!(prim.equidistant_points().len(), 64);
    }
}
