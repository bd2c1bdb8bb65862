//! Meshplace: regular 3D mesh placement of node volumes inside a mother
//! volume.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all meshplace sub-crates. For most users, adding `meshplace` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use meshplace::prelude::*;
//! use meshplace::solids::{Cuboid, Sphere};
//!
//! // A 100 mm cube holding a 30 mm sphere.
//! let mut world = LogicalVolume::new("world", Arc::new(Cuboid::cube(100.0).unwrap()));
//! let ball = Arc::new(LogicalVolume::new("ball", Arc::new(Sphere::new(15.0).unwrap())));
//! world
//!     .add_physical(PhysicalVolume::new("ball.phys", ball, Arc::new(Placement::identity())))
//!     .unwrap();
//!
//! // 10 mm cells wherever they fit around the sphere.
//! let cell = LogicalVolume::new("cell", Arc::new(Cuboid::cube(10.0).unwrap()));
//! let mut mesh = RegularMeshPlacement::new();
//! mesh.initialize(&world, Some(&cell), &Properties::new()).unwrap();
//!
//! assert!(mesh.number_of_nodes() < 1000);
//! let first = mesh.placement(NodeId(0)).unwrap();
//! assert_eq!(first.translation(), Vector3::new(-45.0, -45.0, -45.0));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `meshplace-core` | Coordinates, placements, shapes, volumes, properties, overlap checks |
//! | [`solids`] | `meshplace-solids` | Box, sphere and cylinder shapes |
//! | [`cache`] | `meshplace-cache` | Binary node-set cache files |
//! | [`mesh`] | `meshplace-mesh` | Node registry, mesh builder, `RegularMeshPlacement`, internal meshes |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`meshplace-core`).
///
/// Contains [`types::NodeCoord`], [`types::Placement`], the
/// [`types::Shape`] and [`types::Placements`] traits, logical and physical
/// volumes, configuration [`types::Properties`] and the overlap checkers.
pub use meshplace_core as types;

/// Concrete shapes (`meshplace-solids`).
///
/// [`solids::Cuboid`], [`solids::Sphere`] and [`solids::Cylinder`].
pub use meshplace_solids as solids;

/// Node-set cache files (`meshplace-cache`).
///
/// Write node sets with [`cache::CacheWriter`] and read them back with
/// [`cache::CacheReader`].
pub use meshplace_cache as cache;

/// Regular mesh placement (`meshplace-mesh`).
///
/// [`mesh::RegularMeshPlacement`] builds and serves the node set;
/// [`mesh::InternalMeshes`] builds several ranked meshes in one mother.
pub use meshplace_mesh as mesh;

/// Common imports for typical meshplace usage.
///
/// ```rust
/// use meshplace::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use meshplace_core::{
        BoundingBox, LogicalVolume, MeshNode, NodeCoord, NodeId, PhysicalVolume, Placement,
        Placements, Point3, Properties, Shape, ShapeDomain, Vector3,
    };

    // Overlap checks
    pub use meshplace_core::{OverlapChecker, OverlapFlags, SamplingOverlapChecker};

    // Mesh
    pub use meshplace_mesh::{
        Axis, InternalMeshes, MeshConfig, MeshError, NodeRegistry, RegularMeshPlacement,
    };
}
