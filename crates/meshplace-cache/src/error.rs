//! Error types for the cache codec.

use std::fmt;
use std::io;

/// Errors that can occur while writing or reading a cache stream.
#[derive(Debug)]
pub enum CacheError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The stream does not start with the expected `b"MSHC"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the stream.
        found: u8,
    },
    /// The header class identifier is not the expected one.
    ClassMismatch {
        /// Class found in the header.
        found: String,
    },
    /// The header content tag is not the expected one.
    ContentMismatch {
        /// Content tag found in the header.
        found: String,
    },
    /// A node record could not be decoded (missing, truncated or corrupt).
    MalformedRecord {
        /// Human-readable description of what went wrong.
        detail: String,
    },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"MSHC\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::ClassMismatch { found } => {
                write!(f, "unexpected cache class '{found}'")
            }
            Self::ContentMismatch { found } => {
                write!(f, "unexpected cache content '{found}'")
            }
            Self::MalformedRecord { detail } => write!(f, "malformed node record: {detail}"),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CacheError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
