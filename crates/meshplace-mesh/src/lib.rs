//! Regular 3D mesh placement of node volumes inside a mother volume.
//!
//! A [`RegularMeshPlacement`] enumerates a regular lattice over the
//! bounding box of a mother [`LogicalVolume`](meshplace_core::LogicalVolume)
//! and keeps every lattice point where a node fits: strictly inside the
//! mother, clear of the daughters already placed in it, and (when a node
//! prototype volume is given) without the prototype crossing the mother
//! boundary or overlapping a daughter. The accepted nodes are addressed by
//! sequential [`NodeId`](meshplace_core::NodeId)s and by lattice
//! coordinates, and the placement implements
//! [`Placements`](meshplace_core::Placements) so the node volume can be
//! instanced once per node.
//!
//! # Modules
//!
//! - [`config`]: steps, clipping bounds, overlap flags, cache path
//! - [`builder`]: geometry resolution and lattice enumeration
//! - [`registry`]: node storage indexed by id and coordinate
//! - [`cache_io`]: node-set cache files
//! - [`placement`]: the placement lifecycle and accessors
//! - [`internal`]: several ranked meshes in one mother

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod cache_io;
pub mod config;
pub mod error;
pub mod internal;
pub mod placement;
pub mod registry;

pub use builder::{MeshBuilder, MeshGeometry};
pub use config::{expand_path, Axis, MeshConfig};
pub use error::{ErrorKind, MeshError, RegistryError};
pub use internal::{InternalMesh, InternalMeshes};
pub use placement::RegularMeshPlacement;
pub use registry::NodeRegistry;
