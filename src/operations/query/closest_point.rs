use tracing::trace;

use crate::error::{ResolutionError, Result, TopologyError};
use crate::geometry::closest_point_on_segment;
use crate::math::Point3;
use crate::topology::{Primitive, SegmentId};

/// Finds the segment a curve-space point lies on, and its local parameter.
///
/// Projects the point onto every segment and keeps the nearest. A point sitting on the
/// joint between two segments resolves to the later segment at local `t = 0`,
/// matching [`super::segment_given_t_on_primitive`].
///
/// # Errors
///
/// Returns an error if the chain is empty, or if the nearest point on the path is
/// farther than `tolerance` from `point`.
pub fn segment_given_point_on_primitive(
    primitive: &Primitive,
    point: &Point3,
    tolerance: f64,
) -> Result<(SegmentId, f64)> {
    let samples = primitive.config().projection_samples;
    let mut best: Option<(SegmentId, f64, f64)> = None;

    for (id, segment) in primitive.iter() {
        let result = closest_point_on_segment(segment, point, samples);
        if best.is_none_or(|(_, _, distance)| result.distance < distance) {
            best = Some((id, result.parameter, result.distance));
        }
    }

    let (id, local, distance) = best.ok_or(TopologyError::EmptyChain)?;
    if distance > tolerance {
        return Err(ResolutionError::OffCurve {
            distance,
            tolerance,
        }
        .into());
    }

    // Hand a joint over to the following segment.
    if local >= 1.0 {
        if let Some(next) = primitive.segment(id)?.next() {
            trace!("point on joint resolved to the later segment");
            return Ok((next, 0.0));
        }
    }
    Ok((id, local))
}
