//! Error types for mesh construction and access.

use std::fmt;
use std::io;
use std::path::PathBuf;

use meshplace_cache::CacheError;
use meshplace_core::{NodeCoord, NodeId, PropertyError, VolumeError};

use crate::config::Axis;

/// Errors from [`NodeRegistry`](crate::NodeRegistry) insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The node coordinate has a negative component.
    InvalidCoord {
        /// Id of the rejected node.
        id: NodeId,
        /// The offending coordinate.
        coord: NodeCoord,
    },
    /// A node with the same id is already registered.
    DuplicateId {
        /// The duplicated id.
        id: NodeId,
    },
    /// A node with the same coordinate is already registered.
    DuplicateCoord {
        /// The duplicated coordinate.
        coord: NodeCoord,
        /// Id of the node already holding it.
        existing: NodeId,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoord { id, coord } => {
                write!(f, "node {id} has invalid coordinates {coord}")
            }
            Self::DuplicateId { id } => write!(f, "node id {id} is already registered"),
            Self::DuplicateCoord { coord, existing } => {
                write!(f, "coordinates {coord} already used by node {existing}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Broad category of a [`MeshError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid configuration values.
    Configuration,
    /// Misuse of the API or inconsistent input data.
    Logic,
    /// Failure of the environment (file system).
    Runtime,
    /// Out-of-range argument.
    Domain,
}

/// Errors from mesh configuration, construction and access.
#[derive(Debug)]
pub enum MeshError {
    /// No step is configured for an axis and no node volume can provide one.
    MissingStep {
        /// The axis without a step.
        axis: Axis,
    },
    /// A step is zero, negative or not finite.
    InvalidStep {
        /// The axis of the step.
        axis: Axis,
        /// The rejected value.
        value: f64,
    },
    /// The steps are too small for the enumeration domain.
    TooManyCandidates {
        /// The axis whose candidate count is out of range, if a single
        /// one is.
        axis: Option<Axis>,
        /// Number of lattice candidates the configuration would produce.
        count: f64,
    },
    /// A start or stop bound is not finite.
    InvalidBound {
        /// The axis of the bound.
        axis: Axis,
        /// The rejected value.
        value: f64,
    },
    /// A configuration property has the wrong type or cannot be parsed.
    Property(PropertyError),
    /// A cache path refers to an undefined environment variable.
    PathExpansion {
        /// The unexpanded path.
        path: String,
        /// The undefined variable.
        variable: String,
    },
    /// The operation requires an uninitialized placement.
    AlreadyInitialized,
    /// The operation requires an initialized placement.
    NotInitialized,
    /// A shape provides no bounding box.
    NoBoundingData {
        /// Name of the logical volume.
        volume: String,
    },
    /// The cache path exists but is not a regular file.
    CacheNotRegularFile {
        /// The cache path.
        path: PathBuf,
    },
    /// The cache file's parent directory could not be created.
    CacheDirectory {
        /// The directory.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The cache file could not be written or read.
    Cache {
        /// The cache path.
        path: PathBuf,
        /// The codec error.
        source: CacheError,
    },
    /// A node could not be registered.
    Registry(RegistryError),
    /// A mesh could not be placed in its mother volume.
    Volume(VolumeError),
    /// An internal mesh label is empty.
    EmptyLabel,
    /// An internal mesh label is already used.
    DuplicateLabel {
        /// The duplicated label.
        label: String,
    },
    /// An internal mesh rank is already used.
    DuplicateRank {
        /// The duplicated rank.
        rank: u32,
        /// Label of the new mesh.
        label: String,
        /// Label of the mesh already holding the rank.
        existing: String,
    },
    /// An internal mesh rank is negative.
    InvalidRank {
        /// Label of the mesh.
        label: String,
        /// The rejected rank.
        rank: i64,
    },
    /// An internal mesh refers to an unknown node model.
    UnknownModel {
        /// Label of the mesh.
        label: String,
        /// The unknown model name.
        model: String,
    },
    /// An item number is outside `0..count`.
    InvalidItem {
        /// The requested item.
        item: usize,
        /// Number of items.
        count: usize,
    },
}

impl MeshError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingStep { .. }
            | Self::InvalidStep { .. }
            | Self::TooManyCandidates { .. }
            | Self::InvalidBound { .. }
            | Self::Property(_)
            | Self::PathExpansion { .. } => ErrorKind::Configuration,
            Self::AlreadyInitialized
            | Self::NotInitialized
            | Self::NoBoundingData { .. }
            | Self::CacheNotRegularFile { .. }
            | Self::Cache { .. }
            | Self::Registry(_)
            | Self::Volume(_)
            | Self::EmptyLabel
            | Self::DuplicateLabel { .. }
            | Self::DuplicateRank { .. }
            | Self::InvalidRank { .. }
            | Self::UnknownModel { .. } => ErrorKind::Logic,
            Self::CacheDirectory { .. } => ErrorKind::Runtime,
            Self::InvalidItem { .. } => ErrorKind::Domain,
        }
    }
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStep { axis } => write!(f, "missing step {axis}"),
            Self::InvalidStep { axis, value } => write!(f, "invalid step {axis}: {value}"),
            Self::TooManyCandidates {
                axis: Some(axis),
                count,
            } => write!(f, "{count:e} lattice candidates along {axis}"),
            Self::TooManyCandidates { axis: None, count } => {
                write!(f, "{count:e} lattice candidates in total")
            }
            Self::InvalidBound { axis, value } => write!(f, "invalid bound on {axis}: {value}"),
            Self::Property(e) => write!(f, "configuration: {e}"),
            Self::PathExpansion { path, variable } => {
                write!(f, "cannot expand '{path}': variable '{variable}' is not set")
            }
            Self::AlreadyInitialized => write!(f, "mesh placement is already initialized"),
            Self::NotInitialized => write!(f, "mesh placement is not initialized"),
            Self::NoBoundingData { volume } => {
                write!(f, "shape of volume '{volume}' provides no bounding data")
            }
            Self::CacheNotRegularFile { path } => {
                write!(f, "cache path '{}' is not a regular file", path.display())
            }
            Self::CacheDirectory { path, source } => write!(
                f,
                "cannot create cache directory '{}': {source}",
                path.display()
            ),
            Self::Cache { path, source } => {
                write!(f, "cache file '{}': {source}", path.display())
            }
            Self::Registry(e) => write!(f, "node registry: {e}"),
            Self::Volume(e) => write!(f, "volume: {e}"),
            Self::EmptyLabel => write!(f, "empty internal mesh label"),
            Self::DuplicateLabel { label } => {
                write!(f, "internal mesh label '{label}' is already used")
            }
            Self::DuplicateRank {
                rank,
                label,
                existing,
            } => write!(
                f,
                "rank {rank} of internal mesh '{label}' is already used by '{existing}'"
            ),
            Self::InvalidRank { label, rank } => {
                write!(f, "invalid rank {rank} for internal mesh '{label}'")
            }
            Self::UnknownModel { label, model } => {
                write!(f, "internal mesh '{label}' refers to unknown model '{model}'")
            }
            Self::InvalidItem { item, count } => {
                write!(f, "invalid item {item} (mesh has {count} nodes)")
            }
        }
    }
}

impl std::error::Error for MeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Property(e) => Some(e),
            Self::CacheDirectory { source, .. } => Some(source),
            Self::Cache { source, .. } => Some(source),
            Self::Registry(e) => Some(e),
            Self::Volume(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PropertyError> for MeshError {
    fn from(e: PropertyError) -> Self {
        Self::Property(e)
    }
}

impl From<RegistryError> for MeshError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<VolumeError> for MeshError {
    fn from(e: VolumeError) -> Self {
        Self::Volume(e)
    }
}
