use crate::config::PrimitiveConfig;
use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::Primitive;

use super::MakePolyline;

/// Creates a closed axis-aligned rectangle from two corner points.
pub struct MakeRectangle {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeRectangle {
    /// Creates a new `MakeRectangle` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation. The rectangle lies in the plane `z = min_corner.z` and
    /// runs counter-clockwise from the minimum corner.
    ///
    /// # Errors
    ///
    /// Returns an error if the rectangle has no area.
    pub fn execute(&self, config: &PrimitiveConfig) -> Result<Primitive> {
        let (x0, y0, z) = (self.min_corner.x, self.min_corner.y, self.min_corner.z);
        let (x1, y1) = (self.max_corner.x, self.max_corner.y);
        if (x1 - x0).abs() < TOLERANCE || (y1 - y0).abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("rectangle has zero width or height".to_owned()).into());
        }
        let corners = vec![
            Point3::new(x0, y0, z),
            Point3::new(x1, y0, z),
            Point3::new(x1, y1, z),
            Point3::new(x0, y1, z),
        ];
        MakePolyline::new(corners, true).execute(config)
    }
}
