use crate::config::PrimitiveConfig;
use crate::error::{GeometryError, Result};
use crate::math::{points_coincide, Point3};
use crate::operations::modification::AppendSegment;
use crate::topology::{Primitive, SegmentData};

/// Creates a primitive of straight segments through a sequence of points.
pub struct MakePolyline {
    points: Vec<Point3>,
    close: bool,
}

impl MakePolyline {
    /// Creates a new `MakePolyline` operation.
    #[must_use]
    pub fn new(points: Vec<Point3>, close: bool) -> Self {
        Self { points, close }
    }

    /// Executes the operation, building a fresh primitive.
    ///
    /// Consecutive duplicate points are skipped. When `close` is set and the last
    /// point does not already return to the first, a closing segment is added.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two distinct points remain.
    pub fn execute(&self, config: &PrimitiveConfig) -> Result<Primitive> {
        let mut points: Vec<Point3> = Vec::with_capacity(self.points.len() + 1);
        for point in &self.points {
            if points
                .last()
                .is_none_or(|last| !points_coincide(last, point, config.point_tolerance))
            {
                points.push(*point);
            }
        }
        if points.len() < 2 {
            return Err(GeometryError::Degenerate(
                "polyline needs at least two distinct points".to_owned(),
            )
            .into());
        }
        if self.close && !points_coincide(&points[0], &points[points.len() - 1], config.point_tolerance) {
            points.push(points[0]);
        }

        let mut primitive = Primitive::new(*config);
        for pair in points.windows(2) {
            AppendSegment::new(SegmentData::line(pair[0], pair[1])).execute(&mut primitive)?;
        }
        Ok(primitive)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn open_polyline() {
        let prim = MakePolyline::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 2.0)], false)
            .execute(&PrimitiveConfig::default())
            .unwrap();
        assert_eq!(prim.segment_count(), 2);
        assert!(!prim.is_closed());
        assert_relative_eq!(prim.total_length(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn closed_polyline_adds_closing_segment() {
        let prim = MakePolyline::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)], true)
            .execute(&PrimitiveConfig::default())
            .unwrap();
        assert_eq!(prim.segment_count(), 3);
        assert!(prim.is_closed());
    }

    #[test]
    fn duplicates_are_skipped() {
        let prim = MakePolyline::new(vec![p(0.0, 0.0), p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0)], true)
            .execute(&PrimitiveConfig::default())
            .unwrap();
        assert_eq!(prim.segment_count(), 2);
        assert!(prim.is_closed());
    }

    #[test]
    fn single_point_fails() {
        assert!(MakePolyline::new(vec![p(1.0, 1.0), p(1.0, 1.0)], false)
            .execute(&PrimitiveConfig::default())
            .is_err());
    }
}
