//! Core geometry types and traits for meshplace.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! abstractions the mesh builder works against:
//!
//! - [`NodeCoord`], [`NodeId`] and [`MeshNode`]: lattice addressing
//! - [`Placement`] and [`BoundingBox`]: rigid transforms and extents
//! - [`Shape`]: solids that can be bounded, located against and sampled
//! - [`LogicalVolume`] / [`PhysicalVolume`]: volume trees with point location
//! - [`Placements`]: multi-item placement schemes
//! - [`OverlapChecker`] and [`OverlapFlags`]: overlap tests between solids
//! - [`Properties`]: the flat configuration store and its text format

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geom;
pub mod id;
pub mod overlap;
pub mod placements;
pub mod properties;
pub mod shape;
pub mod units;
pub mod volume;

pub use error::{CoordError, PropertyError, VolumeError};
pub use geom::{BoundingBox, Placement};
pub use id::{MeshNode, NodeCoord, NodeId};
pub use overlap::{OverlapChecker, OverlapFlags, OverlapReport, SamplingOverlapChecker};
pub use placements::{ItemIndex, PlacementList, Placements};
pub use properties::{Properties, PropertyValue};
pub use shape::{SamplingDensity, Shape, ShapeDomain, GEOMETRY_TOLERANCE};
pub use volume::{DaughterHit, Location, LogicalVolume, PhysicalVolume};

pub use nalgebra::{Point3, UnitQuaternion, Vector3};
