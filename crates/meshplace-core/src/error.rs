//! Error types for core geometry and configuration operations.

use std::error::Error;
use std::fmt;

use crate::id::NodeCoord;

/// Errors from lattice coordinate operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoordError {
    /// A coordinate with a negative component was used where a valid one
    /// is required (ordering, registry keys).
    Invalid {
        /// The offending coordinate.
        coord: NodeCoord,
    },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { coord } => write!(f, "invalid node 3D coordinates {coord}"),
        }
    }
}

impl Error for CoordError {}

/// Errors from the flat [`Properties`](crate::Properties) store.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyError {
    /// The requested key is not present.
    MissingKey {
        /// The key that was looked up.
        key: String,
    },
    /// The key exists but holds a value of another type.
    TypeMismatch {
        /// The key that was looked up.
        key: String,
        /// The type the caller asked for.
        expected: &'static str,
        /// The type actually stored.
        found: &'static str,
    },
    /// A length unit symbol is not recognized.
    UnknownUnit {
        /// The unrecognized symbol.
        unit: String,
    },
    /// A line of property text could not be parsed.
    Parse {
        /// 1-based line number in the parsed text.
        line: usize,
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey { key } => write!(f, "missing property '{key}'"),
            Self::TypeMismatch {
                key,
                expected,
                found,
            } => write!(f, "property '{key}' is a {found}, expected a {expected}"),
            Self::UnknownUnit { unit } => write!(f, "unknown length unit '{unit}'"),
            Self::Parse { line, reason } => write!(f, "line {line}: {reason}"),
        }
    }
}

impl Error for PropertyError {}

/// Errors from building volume hierarchies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VolumeError {
    /// A physical volume with the same name is already placed in the mother.
    DuplicatePhysical {
        /// Name of the mother logical volume.
        mother: String,
        /// The duplicated physical volume name.
        name: String,
    },
}

impl fmt::Display for VolumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePhysical { mother, name } => write!(
                f,
                "logical volume '{mother}' already contains a physical volume named '{name}'"
            ),
        }
    }
}

impl Error for VolumeError {}
