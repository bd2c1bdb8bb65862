//! The [`Shape`] trait: the solid geometry collaborator of the mesh builder.

use std::fmt;

use nalgebra::Point3;

use crate::geom::BoundingBox;

/// Default surface tolerance for point classification (mm).
pub const GEOMETRY_TOLERANCE: f64 = 1e-7;

/// Where a point lies relative to a solid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeDomain {
    /// Strictly inside, farther than the tolerance from the surface.
    Inside,
    /// Within the tolerance of the surface.
    Surface,
    /// Strictly outside.
    Outside,
}

impl ShapeDomain {
    /// Classify a signed distance (negative inside) against a tolerance.
    pub fn from_signed_distance(distance: f64, tolerance: f64) -> Self {
        if distance.abs() <= tolerance {
            Self::Surface
        } else if distance < 0.0 {
            Self::Inside
        } else {
            Self::Outside
        }
    }
}

impl fmt::Display for ShapeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inside => write!(f, "inside"),
            Self::Surface => write!(f, "surface"),
            Self::Outside => write!(f, "outside"),
        }
    }
}

/// Density of the surface "wires" sampled by overlap checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SamplingDensity {
    /// Coarse sampling.
    Low,
    /// Default sampling.
    Normal,
    /// Fine sampling.
    High,
    /// Very fine sampling.
    VeryHigh,
    /// Exhaustive sampling.
    Huge,
}

impl SamplingDensity {
    /// Number of sample subdivisions per edge or per half-turn.
    pub fn subdivisions(self) -> usize {
        match self {
            Self::Low => 4,
            Self::Normal => 8,
            Self::High => 16,
            Self::VeryHigh => 32,
            Self::Huge => 64,
        }
    }
}

/// A solid that can be bounded, queried for point location, and sampled.
///
/// Shapes are expressed in their own local frame. Implementations must be
/// `Send + Sync` so that volumes can be shared through `Arc`.
pub trait Shape: fmt::Debug + Send + Sync {
    /// Short type name of the shape (e.g. `"box"`).
    fn shape_name(&self) -> &str;

    /// Local-frame axis-aligned bounding box, or `None` when the shape
    /// provides no bounding data.
    fn bounding_box(&self) -> Option<BoundingBox>;

    /// Classify a local-frame point.
    fn locate(&self, point: &Point3<f64>, tolerance: f64) -> ShapeDomain;

    /// Points lying on the surface, used as overlap probes.
    fn surface_samples(&self, density: SamplingDensity) -> Vec<Point3<f64>>;

    /// `true` when `point` is strictly inside.
    fn check_inside(&self, point: &Point3<f64>, tolerance: f64) -> bool {
        self.locate(point, tolerance) == ShapeDomain::Inside
    }

    /// `true` when `point` is strictly outside.
    fn check_outside(&self, point: &Point3<f64>, tolerance: f64) -> bool {
        self.locate(point, tolerance) == ShapeDomain::Outside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_distance_classification() {
        assert_eq!(ShapeDomain::from_signed_distance(-1.0, 1e-7), ShapeDomain::Inside);
        assert_eq!(ShapeDomain::from_signed_distance(0.0, 1e-7), ShapeDomain::Surface);
        assert_eq!(ShapeDomain::from_signed_distance(5e-8, 1e-7), ShapeDomain::Surface);
        assert_eq!(ShapeDomain::from_signed_distance(1.0, 1e-7), ShapeDomain::Outside);
    }

    #[test]
    fn densities_increase() {
        let all = [
            SamplingDensity::Low,
            SamplingDensity::Normal,
            SamplingDensity::High,
            SamplingDensity::VeryHigh,
            SamplingDensity::Huge,
        ];
        for w in all.windows(2) {
            assert!(w[0].subdivisions() < w[1].subdivisions());
        }
    }
}
