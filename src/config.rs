use crate::tessellation::TessellationParams;

/// Tunables shared by a primitive, its queries and its controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveConfig {
    /// Maximum distance at which two endpoints count as the same point.
    pub point_tolerance: f64,
    /// Maximum distance between a query point and the path for point lookups.
    pub resolution_tolerance: f64,
    /// Accuracy target for cubic length estimation.
    pub length_tolerance: f64,
    /// Number of uniform samples used for projections and arc-length tables.
    pub projection_samples: u32,
    /// Number of world-space points resampled along the whole primitive.
    pub equidistant_points: usize,
    /// Stroke and fill tessellation quality.
    pub tessellation: TessellationParams,
}

impl Default for PrimitiveConfig {
    fn default() -> Self {
        Self {
            point_tolerance: 1e-9,
            resolution_tolerance: 1e-6,
            length_tolerance: 1e-6,
            projection_samples: 64,
            equidistant_points: 64,
            tessellation: TessellationParams::default(),
        }
    }
}
