//! Axis-aligned box solid.

use meshplace_core::{BoundingBox, SamplingDensity, Shape, ShapeDomain};
use nalgebra::{Point3, Vector3};

use crate::error::{check_dimension, SolidError};
use crate::linspace;

/// Box of full dimensions `x`, `y`, `z` centred on the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Cuboid {
    half: Vector3<f64>,
}

impl Cuboid {
    /// Create a box from its full dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`SolidError::InvalidDimension`] if a dimension is not
    /// strictly positive and finite.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, SolidError> {
        let x = check_dimension("box", "x", x)?;
        let y = check_dimension("box", "y", y)?;
        let z = check_dimension("box", "z", z)?;
        Ok(Self {
            half: Vector3::new(0.5 * x, 0.5 * y, 0.5 * z),
        })
    }

    /// Cube of side `side`.
    pub fn cube(side: f64) -> Result<Self, SolidError> {
        Self::new(side, side, side)
    }

    /// Full dimensions.
    pub fn dimensions(&self) -> Vector3<f64> {
        2.0 * self.half
    }

    /// Exact signed distance to the surface (negative inside).
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        let q = p.coords.abs() - self.half;
        let outside = q.sup(&Vector3::zeros()).norm();
        let inside = q.max().min(0.0);
        outside + inside
    }
}

impl Shape for Cuboid {
    fn shape_name(&self) -> &str {
        "box"
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(BoundingBox::new(
            Point3::from(-self.half),
            Point3::from(self.half),
        ))
    }

    fn locate(&self, point: &Point3<f64>, tolerance: f64) -> ShapeDomain {
        ShapeDomain::from_signed_distance(self.signed_distance(point), tolerance)
    }

    /// Regular grids on the six faces, corners and edges included.
    fn surface_samples(&self, density: SamplingDensity) -> Vec<Point3<f64>> {
        let n = density.subdivisions();
        let h = self.half;
        let mut out = Vec::with_capacity(6 * (n + 1) * (n + 1));
        for u in linspace(-h.y, h.y, n) {
            for v in linspace(-h.z, h.z, n) {
                out.push(Point3::new(-h.x, u, v));
                out.push(Point3::new(h.x, u, v));
            }
        }
        for u in linspace(-h.x, h.x, n) {
            for v in linspace(-h.z, h.z, n) {
                out.push(Point3::new(u, -h.y, v));
                out.push(Point3::new(u, h.y, v));
            }
        }
        for u in linspace(-h.x, h.x, n) {
            for v in linspace(-h.y, h.y, n) {
                out.push(Point3::new(u, v, -h.z));
                out.push(Point3::new(u, v, h.z));
            }
        }
        out
    }
}
