use thiserror::Error;

use crate::math::Point3;

/// Top-level error type for the vectorcore engine.
#[derive(Debug, Error)]
pub enum VectorCoreError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Controller(#[from] ControllerError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised when an edit would break the segment chain.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("segment not found in primitive")]
    SegmentNotFound,

    #[error("primitive has no segments")]
    EmptyChain,

    #[error("endpoint mismatch: expected {expected}, found {found}")]
    EndpointMismatch { expected: Point3, found: Point3 },

    #[error("segments are not adjacent")]
    NotAdjacent,

    #[error("primitive is not closed")]
    NotClosed,

    #[error("split point coincides with a segment boundary")]
    SplitAtBoundary,

    #[error("segment kind mismatch: {0}")]
    KindMismatch(String),
}

/// Errors raised when a parameter or point lookup does not land on the chain.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("point is {distance} away from the path (tolerance {tolerance})")]
    OffCurve { distance: f64, tolerance: f64 },
}

/// Errors related to the primitive controller fence.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("another operation holds the primitive")]
    Contention,

    #[error("primitive state was poisoned by a panicking operation")]
    Poisoned,
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),

    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Errors reported by the rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("GPU handle allocation failed: {0}")]
    Allocation(String),

    #[error("draw failed: {0}")]
    Draw(String),
}

/// Convenience type alias for results using [`VectorCoreError`].
pub type Result<T> = std::result::Result<T, VectorCoreError>;
