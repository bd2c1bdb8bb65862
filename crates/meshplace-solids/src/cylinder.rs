//! Solid cylinder along the local z axis.

use std::f64::consts::PI;

use meshplace_core::{BoundingBox, SamplingDensity, Shape, ShapeDomain};
use nalgebra::Point3;

use crate::error::{check_dimension, SolidError};
use crate::linspace;

/// Cylinder of radius `r` and full height `z`, centred on the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Cylinder {
    r: f64,
    half_z: f64,
}

impl Cylinder {
    /// Create a cylinder.
    ///
    /// # Errors
    ///
    /// Returns [`SolidError::InvalidDimension`] for a non-positive or
    /// non-finite radius or height.
    pub fn new(r: f64, z: f64) -> Result<Self, SolidError> {
        let r = check_dimension("cylinder", "radius", r)?;
        let z = check_dimension("cylinder", "z", z)?;
        Ok(Self { r, half_z: 0.5 * z })
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.r
    }

    /// Full height.
    pub fn height(&self) -> f64 {
        2.0 * self.half_z
    }

    /// Exact signed distance to the surface (negative inside).
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        let dr = p.x.hypot(p.y) - self.r;
        let dz = p.z.abs() - self.half_z;
        let outside = dr.max(0.0).hypot(dz.max(0.0));
        outside + dr.max(dz).min(0.0)
    }
}

impl Shape for Cylinder {
    fn shape_name(&self) -> &str {
        "cylinder"
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        let d = 2.0 * self.r;
        Some(BoundingBox::centered(d, d, 2.0 * self.half_z))
    }

    fn locate(&self, point: &Point3<f64>, tolerance: f64) -> ShapeDomain {
        ShapeDomain::from_signed_distance(self.signed_distance(point), tolerance)
    }

    /// Rings along the side wall plus concentric rings on both caps.
    fn surface_samples(&self, density: SamplingDensity) -> Vec<Point3<f64>> {
        let n = density.subdivisions();
        let mut out = Vec::new();
        let ring = |radius: f64, z: f64, out: &mut Vec<Point3<f64>>| {
            for j in 0..2 * n {
                let (s, c) = (PI * j as f64 / n as f64).sin_cos();
                out.push(Point3::new(radius * c, radius * s, z));
            }
        };
        for z in linspace(-self.half_z, self.half_z, n) {
            ring(self.r, z, &mut out);
        }
        for radius in linspace(0.0, self.r, n).take(n) {
            ring(radius, -self.half_z, &mut out);
            ring(radius, self.half_z, &mut out);
        }
        out
    }
}
