use bytemuck::{Pod, Zeroable};
use tracing::trace;

use crate::error::Result;
use crate::math::Point3;
use crate::topology::Primitive;

use super::{TessellateFill, TessellatePrimitive, TessellationParams};

/// What a vertex belongs to, as stored in [`Vertex::triangle_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VertexKind {
    /// Part of the stroke line strip.
    Stroke = 0,
    /// Corner of a fill triangle.
    Fill = 1,
}

impl VertexKind {
    /// The value written into the vertex attribute.
    #[must_use]
    pub fn as_attribute(self) -> f32 {
        f32::from(self as u8)
    }
}

/// GPU vertex: world-space position plus the stroke/fill discriminant.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// World-space position.
    pub position: [f32; 3],
    /// [`VertexKind`] of this vertex, as a float for the shader.
    pub triangle_type: f32,
}

impl Vertex {
    /// Creates a vertex from a world-space point.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(point: &Point3, kind: VertexKind) -> Self {
        Self {
            position: [point.x as f32, point.y as f32, point.z as f32],
            triangle_type: kind.as_attribute(),
        }
    }

    /// Returns `true` if this vertex belongs to a fill triangle.
    #[must_use]
    pub fn is_fill(&self) -> bool {
        self.triangle_type >= VertexKind::Fill.as_attribute()
    }
}

/// Projects a primitive into a flat vertex list.
///
/// The stroke line strip along the whole path comes first. If the primitive is filled,
/// the fill triangles follow as a triangle list, three vertices each.
///
/// # Errors
///
/// Returns an error if the parameters are invalid or the fill cannot be triangulated.
pub fn project_vertices(primitive: &Primitive, params: &TessellationParams) -> Result<Vec<Vertex>> {
    let stroke = TessellatePrimitive::new(*params).execute(primitive)?;
    let mut vertices: Vec<Vertex> = stroke
        .points
        .iter()
        .map(|p| Vertex::new(p, VertexKind::Stroke))
        .collect();

    if primitive.is_filled() {
        let mesh = TessellateFill::new(*params).execute(primitive)?;
        vertices.extend(
            mesh.indices
                .iter()
                .flatten()
                .map(|&i| Vertex::new(&mesh.vertices[i as usize], VertexKind::Fill)),
        );
    }

    trace!(
        stroke = stroke.points.len(),
        total = vertices.len(),
        "vertices projected"
    );
    Ok(vertices)
}

/// Splits a projected vertex list into its stroke and fill parts.
#[must_use]
pub fn split_by_kind(vertices: &[Vertex]) -> (&[Vertex], &[Vertex]) {
    vertices.split_at(vertices.partition_point(|v| !v.is_fill()))
}
