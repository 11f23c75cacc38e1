use crate::error::RenderError;
use crate::math::Matrix4;
use crate::tessellation::Vertex;

use super::GpuHandles;

/// Everything a renderer needs to draw one primitive, borrowed for one draw call.
#[derive(Debug, Clone, Copy)]
pub struct DrawRequest<'a> {
    /// Handles the vertex data should be uploaded to.
    pub handles: GpuHandles,
    /// Stroke line strip, world space.
    pub stroke: &'a [Vertex],
    /// Fill triangle list, world space. Empty if the primitive is not filled.
    pub fill: &'a [Vertex],
    /// The primitive's curve-to-world transform.
    pub bezier_to_world: &'a Matrix4,
}

/// The graphics backend a controller draws through.
pub trait Renderer {
    /// Creates the GPU objects for a primitive that has none yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot allocate the objects.
    fn allocate_handles(&self) -> Result<GpuHandles, RenderError>;

    /// Uploads and draws one primitive.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the draw.
    fn draw(&self, request: &DrawRequest<'_>, model_matrix: &Matrix4) -> Result<(), RenderError>;
}
