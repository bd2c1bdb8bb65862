//! Primitive solids for meshplace.
//!
//! Every solid is centred on its local origin and implements
//! [`meshplace_core::Shape`]:
//!
//! - [`Cuboid`]: axis-aligned box given by its full dimensions
//! - [`Sphere`]: full sphere
//! - [`Cylinder`]: solid cylinder along the local z axis
//!
//! Point location is computed from exact signed distances, so
//! [`ShapeDomain`](meshplace_core::ShapeDomain) classification is
//! symmetric with respect to the surface tolerance.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cuboid;
pub mod cylinder;
pub mod error;
pub mod sphere;

pub use cuboid::Cuboid;
pub use cylinder::Cylinder;
pub use error::SolidError;
pub use sphere::Sphere;

/// `n + 1` evenly spaced values from `lo` to `hi` inclusive.
pub(crate) fn linspace(lo: f64, hi: f64, n: usize) -> impl Iterator<Item = f64> {
    let n = n.max(1);
    (0..=n).map(move |i| lo + (hi - lo) * i as f64 / n as f64)
}
