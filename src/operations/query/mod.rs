mod bounding_box;
mod closest_point;
mod equidistant;
mod length;
mod point_on_curve;
mod segment_lookup;

pub use bounding_box::{Aabb, BoundingBox};
pub use closest_point::segment_given_point_on_primitive;
pub use equidistant::EquidistantPoints;
pub use length::{calc_segment_length, segment_length};
pub use point_on_curve::{point_given_t_on_primitive, t_given_point_on_primitive};
pub use segment_lookup::segment_given_t_on_primitive;

use crate::topology::{Primitive, SegmentId};

/// Each segment's share of the global parameter range, in chain order.
///
/// Shares are `length / total_length`; a chain of zero total length gives every
/// segment an equal share.
pub(crate) fn segment_weights(primitive: &Primitive) -> Vec<(SegmentId, f64)> {
    let total = primitive.total_length();
    let count = primitive.segment_count();
    if total > 0.0 {
        primitive
            .iter()
            .map(|(id, seg)| (id, seg.length() / total))
            .collect()
    } else {
        #[allow(clippy::cast_precision_loss)]
        let share = 1.0 / count.max(1) as f64;
        primitive.segment_ids().iter().map(|&id| (id, share)).collect()
    }
}
