//! Full sphere solid.

use std::f64::consts::PI;

use meshplace_core::{BoundingBox, SamplingDensity, Shape, ShapeDomain};
use nalgebra::Point3;

use crate::error::{check_dimension, SolidError};

/// Sphere of radius `r` centred on the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    r: f64,
}

impl Sphere {
    /// Create a sphere.
    ///
    /// # Errors
    ///
    /// Returns [`SolidError::InvalidDimension`] for a non-positive or
    /// non-finite radius.
    pub fn new(r: f64) -> Result<Self, SolidError> {
        Ok(Self {
            r: check_dimension("sphere", "radius", r)?,
        })
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.r
    }
}

impl Shape for Sphere {
    fn shape_name(&self) -> &str {
        "sphere"
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        let d = 2.0 * self.r;
        Some(BoundingBox::centered(d, d, d))
    }

    fn locate(&self, point: &Point3<f64>, tolerance: f64) -> ShapeDomain {
        ShapeDomain::from_signed_distance(point.coords.norm() - self.r, tolerance)
    }

    /// Meridians and parallels: `n + 1` latitudes by `2n` longitudes.
    fn surface_samples(&self, density: SamplingDensity) -> Vec<Point3<f64>> {
        let n = density.subdivisions();
        let mut out = Vec::with_capacity((n + 1) * 2 * n);
        for i in 0..=n {
            let theta = PI * i as f64 / n as f64;
            let (st, ct) = theta.sin_cos();
            for j in 0..2 * n {
                let phi = PI * j as f64 / n as f64;
                let (sp, cp) = phi.sin_cos();
                out.push(Point3::new(self.r * st * cp, self.r * st * sp, self.r * ct));
            }
        }
        out
    }
}
