pub use crate::geometry::segment_length;

use crate::error::Result;
use crate::topology::{Primitive, SegmentId};

/// Computes the length of a segment and writes it into the segment's cached length.
///
/// The primitive's total length is not touched; it is re-summed by
/// [`Primitive::refresh`].
///
/// # Errors
///
/// Returns an error if the segment is not found.
pub fn calc_segment_length(primitive: &mut Primitive, id: SegmentId) -> Result<f64> {
    let tolerance = primitive.config().length_tolerance;
    let segment = primitive.segment_mut(id)?;
    let length = segment_length(segment, tolerance);
    segment.length = length;
    Ok(length)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::modification::AppendSegment;
    use crate::topology::SegmentData;

    #[test]
    fn line_length_3_4_5() {
        let mut prim = Primitive::default();
        let id = AppendSegment::new(SegmentData::line(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
        ))
        .execute(&mut prim)
        .unwrap();

        let len = calc_segment_length(&mut prim, id).unwrap();
        assert!((len - 5.0).abs() < 1e-10);
        assert!((prim.segment(id).unwrap().length() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn unknown_segment_fails() {
        let mut prim = Primitive::default();
        let id = AppendSegment::new(SegmentData::line(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ))
        .execute(&mut prim)
        .unwrap();
        let mut other = Primitive::default();
        assert!(calc_segment_length(&mut other, id).is_err());
    }
}
