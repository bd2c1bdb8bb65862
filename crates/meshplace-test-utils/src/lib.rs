//! Test utilities and mock types for meshplace development.
//!
//! Provides mock implementations of core traits ([`Shape`],
//! [`OverlapChecker`]) and volume fixtures for building test scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{aabb_volume, box_mother, mother_with_block, TempCache};

use std::sync::atomic::{AtomicUsize, Ordering};

use meshplace_core::{
    BoundingBox, OverlapChecker, OverlapFlags, OverlapReport, Placement, Point3, SamplingDensity,
    Shape, ShapeDomain, Vector3,
};

/// Axis-aligned box shape with arbitrary corners.
///
/// Unlike the centred solids, its local frame can be offset, which makes
/// lattice positions easy to reason about (`[0, L]^3` mothers).
#[derive(Clone, Debug, PartialEq)]
pub struct AabbShape {
    pub bounds: BoundingBox,
}

impl AabbShape {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            bounds: BoundingBox::new(min, max),
        }
    }

    pub fn centered(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            bounds: BoundingBox::centered(dx, dy, dz),
        }
    }
}

impl Shape for AabbShape {
    fn shape_name(&self) -> &str {
        "aabb"
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(self.bounds)
    }

    fn locate(&self, p: &Point3<f64>, tolerance: f64) -> ShapeDomain {
        let b = &self.bounds;
        let below = b.min - p;
        let above = p - b.max;
        let q = below.sup(&above);
        let outside = q.sup(&Vector3::zeros()).norm();
        let inside = q.max().min(0.0);
        ShapeDomain::from_signed_distance(outside + inside, tolerance)
    }

    /// Corners plus face centres.
    fn surface_samples(&self, _density: SamplingDensity) -> Vec<Point3<f64>> {
        let b = &self.bounds;
        let c = b.center();
        let mut out = b.corners().to_vec();
        out.extend([
            Point3::new(b.min.x, c.y, c.z),
            Point3::new(b.max.x, c.y, c.z),
            Point3::new(c.x, b.min.y, c.z),
            Point3::new(c.x, b.max.y, c.z),
            Point3::new(c.x, c.y, b.min.z),
            Point3::new(c.x, c.y, b.max.z),
        ]);
        out
    }
}

/// Shape without bounding data. Every point is inside.
#[derive(Clone, Debug, Default)]
pub struct UnboundedShape;

impl Shape for UnboundedShape {
    fn shape_name(&self) -> &str {
        "unbounded"
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        None
    }

    fn locate(&self, _p: &Point3<f64>, _tolerance: f64) -> ShapeDomain {
        ShapeDomain::Inside
    }

    fn surface_samples(&self, _density: SamplingDensity) -> Vec<Point3<f64>> {
        Vec::new()
    }
}

/// Overlap checker that never reports an overlap and counts its calls.
#[derive(Debug, Default)]
pub struct CountingOverlapChecker {
    mother_checks: AtomicUsize,
    pair_checks: AtomicUsize,
}

impl CountingOverlapChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mother_checks(&self) -> usize {
        self.mother_checks.load(Ordering::Relaxed)
    }

    pub fn pair_checks(&self) -> usize {
        self.pair_checks.load(Ordering::Relaxed)
    }
}

impl OverlapChecker for CountingOverlapChecker {
    fn mother_daughter_overlap(
        &self,
        _mother: &dyn Shape,
        _daughter: &dyn Shape,
        _placement: &Placement,
        _flags: OverlapFlags,
    ) -> OverlapReport {
        self.mother_checks.fetch_add(1, Ordering::Relaxed);
        OverlapReport::default()
    }

    fn two_volumes_overlap(
        &self,
        _first: &dyn Shape,
        _first_placement: &Placement,
        _second: &dyn Shape,
        _second_placement: &Placement,
        _flags: OverlapFlags,
    ) -> OverlapReport {
        self.pair_checks.fetch_add(1, Ordering::Relaxed);
        OverlapReport::default()
    }
}

/// Overlap checker that reports every placement as overlapping.
#[derive(Debug, Default)]
pub struct AlwaysOverlapChecker;

impl OverlapChecker for AlwaysOverlapChecker {
    fn mother_daughter_overlap(
        &self,
        _mother: &dyn Shape,
        _daughter: &dyn Shape,
        placement: &Placement,
        _flags: OverlapFlags,
    ) -> OverlapReport {
        OverlapReport {
            points: vec![Point3::from(placement.translation())],
        }
    }

    fn two_volumes_overlap(
        &self,
        _first: &dyn Shape,
        first_placement: &Placement,
        _second: &dyn Shape,
        _second_placement: &Placement,
        _flags: OverlapFlags,
    ) -> OverlapReport {
        OverlapReport {
            points: vec![Point3::from(first_placement.translation())],
        }
    }
}
