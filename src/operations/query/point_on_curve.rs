use crate::error::{Result, TopologyError};
use crate::geometry::{closest_point_on_segment, point_given_t_on_segment};
use crate::math::Point3;
use crate::topology::Primitive;

use super::{segment_given_t_on_primitive, segment_weights};

/// Evaluates the primitive at global parameter `t`, in curve (Bezier) space.
///
/// # Errors
///
/// Returns an error if the chain is empty or `t` lies outside `[0, 1]`.
pub fn point_given_t_on_primitive(primitive: &Primitive, t: f64) -> Result<Point3> {
    let (id, local) = segment_given_t_on_primitive(primitive, t)?;
    Ok(point_given_t_on_segment(primitive.segment(id)?, local))
}

/// Projects a curve-space point onto the primitive, returning its global parameter.
///
/// The nearest segment wins; its local parameter is mapped into that segment's
/// length-weighted share of `[0, 1]`.
///
/// # Errors
///
/// Returns an error if the chain is empty.
pub fn t_given_point_on_primitive(primitive: &Primitive, point: &Point3) -> Result<f64> {
    let samples = primitive.config().projection_samples;
    let mut best: Option<(f64, f64)> = None;
    let mut cumulative = 0.0;

    for (id, weight) in segment_weights(primitive) {
        let result = closest_point_on_segment(primitive.segment(id)?, point, samples);
        let global = cumulative + result.parameter * weight;
        if best.is_none_or(|(_, distance)| result.distance < distance) {
            best = Some((global, result.distance));
        }
        cumulative += weight;
    }

    best.map(|(t, _)| t.clamp(0.0, 1.0))
        .ok_or_else(|| TopologyError::EmptyChain.into())
}
