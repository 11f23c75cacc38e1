use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{Result, TessellationError, TopologyError};
use crate::math::{points_coincide, transform_point, Point3, TOLERANCE};
use crate::topology::Primitive;

use super::tessellate_curve::curve_space_outline;
use super::{TessellationParams, TriangleMesh};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates the region enclosed by a closed primitive, in world space.
///
/// The outline is the stroke polyline projected onto the curve-space XY plane. Where
/// the outline crosses itself the constraints are split at the crossing, and faces are
/// kept by the even-odd rule, so a bowtie fills both lobes and a loop wound twice over
/// another leaves a hole.
pub struct TessellateFill {
    params: TessellationParams,
}

impl TessellateFill {
    /// Creates a new `TessellateFill` operation.
    #[must_use]
    pub fn new(params: TessellationParams) -> Self {
        Self { params }
    }

    /// Executes the tessellation, returning a triangle mesh.
    ///
    /// An outline with fewer than three distinct points encloses nothing and yields
    /// an empty mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid, the primitive is not closed, or
    /// an outline point cannot be inserted into the triangulation.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, primitive: &Primitive) -> Result<TriangleMesh> {
        self.params.validate()?;
        if !primitive.is_closed() {
            return Err(TopologyError::NotClosed.into());
        }

        let mut outline = curve_space_outline(primitive, &self.params);
        if let (Some(first), Some(last)) = (outline.first(), outline.last()) {
            if outline.len() > 1 && points_coincide(first, last, primitive.config().point_tolerance) {
                outline.pop();
            }
        }
        outline.dedup_by(|a, b| points_coincide(a, b, TOLERANCE));
        if outline.len() < 3 {
            return Ok(TriangleMesh::default());
        }

        let mut cdt = Cdt::new();
        let handles = insert_constraint_loop(&mut cdt, &outline)?;
        let interior_faces = classify_interior_faces(&cdt);

        let mut positions: HashMap<usize, Point3> = HashMap::new();
        for (handle, point) in handles.iter().zip(&outline) {
            positions.entry(handle.index()).or_insert(*point);
        }

        let transform = primitive.bezier_to_world();
        let mut mesh = TriangleMesh::default();
        let mut vertex_map: HashMap<usize, u32> = HashMap::new();

        for face_handle in cdt.inner_faces() {
            if !interior_faces.contains(&face_handle.fix().index()) {
                continue;
            }

            let mut tri_indices = [0u32; 3];
            for (i, vh) in face_handle.vertices().iter().enumerate() {
                let idx = vh.fix().index();
                let mesh_idx = if let Some(&existing) = vertex_map.get(&idx) {
                    existing
                } else {
                    let pos = vh.position();
                    let curve_point = positions
                        .get(&idx)
                        .copied()
                        .unwrap_or_else(|| Point3::new(pos.x, pos.y, outline[0].z));
                    let new_idx = mesh.vertices.len() as u32;
                    mesh.vertices.push(transform_point(transform, &curve_point));
                    vertex_map.insert(idx, new_idx);
                    new_idx
                };
                tri_indices[i] = mesh_idx;
            }
            mesh.indices.push(tri_indices);
        }

        Ok(mesh)
    }
}

/// Inserts a closed polygon as constraint edges into the CDT, returning the vertex
/// handle of every input point.
///
/// Edges that cross an earlier edge are split at the crossing, which adds a vertex
/// with no matching input point.
fn insert_constraint_loop(cdt: &mut Cdt, points: &[Point3]) -> Result<Vec<FixedVertexHandle>> {
    let mut handles = Vec::with_capacity(points.len());
    for pt in points {
        let h = cdt
            .insert(SpadePoint2::new(pt.x, pt.y))
            .map_err(|e: InsertionError| TessellationError::Failed(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to || cdt.exists_constraint(from, to) {
            continue;
        }
        cdt.add_constraint_and_split(from, to, |crossing| crossing);
    }

    Ok(handles)
}

/// Classifies which inner faces of the CDT are inside the outline using flood-fill.
///
/// Starts from faces adjacent to the outer (infinite) face at depth 0. Each time
/// a constraint edge is crossed, depth increments. Odd depth = interior.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let idx = inner.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, depth);
            if depth % 2 == 1 {
                interior.insert(idx);
            }
            queue.push_back((inner.fix(), depth));
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let n_idx = neighbor.fix().index();
            if depth_map.contains_key(&n_idx) {
                continue;
            }
            let new_depth = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(n_idx, new_depth);
            if new_depth % 2 == 1 {
                interior.insert(n_idx);
            }
            queue.push_back((neighbor.fix(), new_depth));
        }
    }

    interior
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::PrimitiveConfig;
    use crate::operations::creation::{MakeCircle, MakePolyline, MakeRectangle};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn polygon(points: Vec<Point3>) -> Primitive {
        MakePolyline::new(points, true)
            .execute(&PrimitiveConfig::default())
            .unwrap()
    }

    fn area(mesh: &TriangleMesh) -> f64 {
        mesh.indices
            .iter()
            .map(|[a, b, c]| {
                let (a, b, c) = (
                    mesh.vertices[*a as usize],
                    mesh.vertices[*b as usize],
                    mesh.vertices[*c as usize],
                );
                0.5 * (b - a).cross(&(c - a)).norm()
            })
            .sum()
    }

    #[test]
    fn triangle_produces_1_triangle() {
        let prim = polygon(vec![p(0.0, 0.0), p(4.0, 0.0), p(2.0, 3.0)]);
        let mesh = TessellateFill::new(TessellationParams::default())
            .execute(&prim)
            .unwrap();
        assert_eq!(mesh.indices.len(), 1);
        assert_eq!(mesh.vertices.len(), 3);
    }

    #[test]
    fn square_produces_2_triangles() {
        let prim = MakeRectangle::new(p(0.0, 0.0), p(4.0, 4.0))
            .execute(&PrimitiveConfig::default())
            .unwrap();
        let mesh = TessellateFill::new(TessellationParams::default())
            .execute(&prim)
            .unwrap();
        assert_eq!(mesh.indices.len(), 2);
        assert!((area(&mesh) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn l_shape_concave_tessellates() {
        let prim = polygon(vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 4.0),
            p(0.0, 4.0),
        ]);
        let mesh = TessellateFill::new(TessellationParams::default())
            .execute(&prim)
            .unwrap();
        assert_eq!(mesh.indices.len(), 4);
        assert!((area(&mesh) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn circle_fill_approaches_disc_area() {
        let prim = MakeCircle::new(p(0.0, 0.0), 2.0)
            .execute(&PrimitiveConfig::default())
            .unwrap();
        let mesh = TessellateFill::new(TessellationParams::default())
            .execute(&prim)
            .unwrap();
        let disc = std::f64::consts::PI * 4.0;
        assert!(area(&mesh) < disc);
        assert!(area(&mesh) > 0.99 * disc);
    }

    #[test]
    fn open_primitive_is_rejected() {
        let prim = MakePolyline::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)], false)
            .execute(&PrimitiveConfig::default())
            .unwrap();
        assert!(TessellateFill::new(TessellationParams::default())
            .execute(&prim)
            .is_err());
    }

    #[test]
    fn bowtie_fills_both_lobes() {
        let prim = polygon(vec![p(0.0, 0.0), p(2.0, 2.0), p(2.0, 0.0), p(0.0, 2.0)]);
        let mesh = TessellateFill::new(TessellationParams::default())
            .execute(&prim)
            .unwrap();
        assert_eq!(mesh.indices.len(), 2);
        assert!((area(&mesh) - 2.0).abs() < 1e-9);
        assert!(mesh
            .vertices
            .iter()
            .any(|v| (v - p(1.0, 1.0)).norm() < 1e-9));
    }
}
