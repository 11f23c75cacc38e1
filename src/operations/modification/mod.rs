mod append;
mod fill;
mod merge;
mod prepend;
mod set_points;
mod split;

pub use append::AppendSegment;
pub use fill::SetFill;
pub use merge::MergeSegments;
pub use prepend::PrependSegment;
pub use set_points::SetSegmentPoints;
pub use split::SplitSegment;
