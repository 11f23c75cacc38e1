pub mod curve;

pub use curve::{
    closest_point_on_segment, length_fraction_to_t, point_given_t_on_segment, segment_length,
    split_segment_geometry, t_given_point_on_segment, tangent_given_t_on_segment,
    ClosestPointResult,
};
