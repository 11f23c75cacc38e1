use tracing::trace;

use crate::error::{GeometryError, Result, TopologyError};
use crate::topology::{Primitive, SegmentId};

use super::segment_weights;

/// Resolves a global parameter to the segment that owns it and its local parameter.
///
/// Walks the cumulative length-weighted ranges in chain order. A `t` exactly on a
/// boundary between two segments resolves to the later segment at local `t = 0`;
/// `t = 1` resolves to the tail at local `t = 1`.
///
/// # Errors
///
/// Returns an error if the chain is empty or `t` lies outside `[0, 1]`.
pub fn segment_given_t_on_primitive(primitive: &Primitive, t: f64) -> Result<(SegmentId, f64)> {
    if !(0.0..=1.0).contains(&t) {
        return Err(GeometryError::ParameterOutOfRange {
            parameter: "t",
            value: t,
            min: 0.0,
            max: 1.0,
        }
        .into());
    }
    let tail = primitive.tail().ok_or(TopologyError::EmptyChain)?;
    if t >= 1.0 {
        return Ok((tail, 1.0));
    }

    let mut cumulative = 0.0;
    for (id, weight) in segment_weights(primitive) {
        let upper = cumulative + weight;
        if t < upper && weight > 0.0 {
            let local = ((t - cumulative) / weight).clamp(0.0, 1.0);
            trace!(t, local, "resolved global parameter");
            return Ok((id, local));
        }
        cumulative = upper;
    }

    Ok((tail, 1.0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::modification::AppendSegment;
    use crate::topology::SegmentData;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn unit_steps(count: u32) -> (Primitive, Vec<SegmentId>) {
        let mut prim = Primitive::default();
        let mut ids = Vec::new();
        for i in 0..count {
            let x = f64::from(i);
            ids.push(
                AppendSegment::new(SegmentData::line(p(x, 0.0), p(x + 1.0, 0.0)))
                    .execute(&mut prim)
                    .unwrap(),
            );
        }
        (prim, ids)
    }

    #[test]
    fn three_unit_segments_midpoint_in_second() {
        let (prim, ids) = unit_steps(3);
        assert_relative_eq!(prim.total_length(), 3.0, epsilon = 1e-12);
        let (seg, local) = segment_given_t_on_primitive(&prim, 0.5).unwrap();
        assert_eq!(seg, ids[1]);
        assert_relative_eq!(local, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn boundary_resolves_to_later_segment() {
        let (prim, ids) = unit_steps(2);
        let (seg, local) = segment_given_t_on_primitive(&prim, 0.5).unwrap();
        assert_eq!(seg, ids[1]);
        assert_eq!(local, 0.0);
    }

    #[test]
    fn endpoints_resolve_to_head_and_tail() {
        let (prim, ids) = unit_steps(3);
        assert_eq!(segment_given_t_on_primitive(&prim, 0.0).unwrap(), (ids[0], 0.0));
        assert_eq!(segment_given_t_on_primitive(&prim, 1.0).unwrap(), (ids[2], 1.0));
    }

    #[test]
    fn out_of_range_parameter_fails() {
        let (prim, _) = unit_steps(2);
        assert!(segment_given_t_on_primitive(&prim, -0.1).is_err());
        assert!(segment_given_t_on_primitive(&prim, 1.5).is_err());
        assert!(segment_given_t_on_primitive(&prim, f64::NAN).is_err());
    }

    #[test]
    fn empty_chain_fails() {
        let prim = Primitive::default();
        assert!(segment_given_t_on_primitive(&prim, 0.5).is_err());
    }

    #[test]
    fn resolution_is_monotonic() {
        let mut prim = Primitive::default();
        AppendSegment::new(SegmentData::line(p(0.0, 0.0), p(2.0, 0.0)))
            .execute(&mut prim)
            .unwrap();
        AppendSegment::new(SegmentData::arc(p(2.0, 0.0), p(2.0, 1.0), p(3.0, 1.0)))
            .execute(&mut prim)
            .unwrap();
        AppendSegment::new(SegmentData::line(p(3.0, 1.0), p(3.0, 4.0)))
            .execute(&mut prim)
            .unwrap();

        let mut last = (0_usize, 0.0);
        for i in 0..=200 {
            let t = f64::from(i) / 200.0;
            let (seg, local) = segment_given_t_on_primitive(&prim, t).unwrap();
            let location = prim.segment(seg).unwrap().list_location();
            assert!(
                location > last.0 || (location == last.0 && local >= last.1),
                "t = {t} went backwards"
            );
            last = (location, local);
        }
    }
}
