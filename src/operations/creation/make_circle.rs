use std::f64::consts::FRAC_PI_2;

use crate::config::PrimitiveConfig;
use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::operations::modification::AppendSegment;
use crate::topology::{Primitive, SegmentData};

/// Creates a closed circle as four quarter arcs in the plane of its center.
pub struct MakeCircle {
    center: Point3,
    radius: f64,
}

impl MakeCircle {
    /// Creates a new `MakeCircle` operation.
    #[must_use]
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Executes the operation. The circle starts on the +X side of the center and runs
    /// counter-clockwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive.
    pub fn execute(&self, config: &PrimitiveConfig) -> Result<Primitive> {
        if self.radius.is_nan() || self.radius <= TOLERANCE {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "radius",
                value: self.radius,
                min: TOLERANCE,
                max: f64::INFINITY,
            }
            .into());
        }

        let on_circle = |quarter: u8| {
            let angle = f64::from(quarter) * FRAC_PI_2;
            self.center + Vector3::new(angle.cos(), angle.sin(), 0.0) * self.radius
        };
        let mut primitive = Primitive::new(*config);
        let first = on_circle(0);
        let mut start = first;
        for quarter in 1..=4 {
            let end = if quarter == 4 { first } else { on_circle(quarter) };
            AppendSegment::new(SegmentData::arc(start, self.center, end)).execute(&mut primitive)?;
            start = end;
        }
        Ok(primitive)
    }
}
