//! Polyline and triangle approximations of a primitive, and their packing into
//! GPU-ready vertices.

mod tessellate_curve;
mod tessellate_face;
mod vertex;

pub use tessellate_curve::{TessellatePrimitive, TessellateSegment};
pub use tessellate_face::TessellateFill;
pub use vertex::{project_vertices, split_by_kind, Vertex, VertexKind};

use crate::error::{Result, TessellationError};
use crate::math::Point3;

/// Parameters controlling tessellation quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationParams {
    /// Maximum allowed deviation from the true geometry.
    pub tolerance: f64,
    /// Minimum number of segments for curves.
    pub min_segments: usize,
    /// Maximum number of segments for curves.
    pub max_segments: usize,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            min_segments: 4,
            max_segments: 256,
        }
    }
}

impl TessellationParams {
    /// Checks that the parameters describe a usable tessellation.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is not positive, or if the segment bounds
    /// are empty or inverted.
    pub fn validate(&self) -> Result<()> {
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(TessellationError::InvalidParameters(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            ))
            .into());
        }
        if self.min_segments == 0 || self.min_segments > self.max_segments {
            return Err(TessellationError::InvalidParameters(format!(
                "segment bounds [{}, {}] are invalid",
                self.min_segments, self.max_segments
            ))
            .into());
        }
        Ok(())
    }
}

/// A polyline approximation of a curve.
#[derive(Debug, Clone, Default)]
pub struct Polyline {
    /// The ordered vertices of the polyline.
    pub points: Vec<Point3>,
}

/// A triangle mesh approximation of a filled region.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(TessellationParams::default().validate().is_ok());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let params = TessellationParams {
            min_segments: 10,
            max_segments: 2,
            ..TessellationParams::default()
        };
        assert!(params.validate().is_err());
        let params = TessellationParams {
            tolerance: 0.0,
            ..TessellationParams::default()
        };
        assert!(params.validate().is_err());
    }
}
