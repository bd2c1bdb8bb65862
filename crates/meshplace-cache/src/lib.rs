//! Binary node-set cache files for meshplace.
//!
//! Building a mesh runs a point location and possibly several overlap tests
//! per lattice candidate. The accepted node set can be stored once and
//! reloaded on later runs instead of re-enumerating the lattice.
//!
//! # Architecture
//!
//! - [`CacheWriter`] writes a header and node records to any `Write` sink
//! - [`CacheReader`] validates the header and streams records from any `Read` source
//! - [`Fingerprint`] hashes the mesh geometry the node set was built from
//! - All I/O uses a small hand-written little-endian codec
//!
//! # Format
//!
//! ```text
//! [MAGIC "MSHC"] [VERSION u8]
//! [class: str] [what: str] [fingerprint: u64] [node_count: u64]
//! [NodeRecord 1] ... [NodeRecord N]
//! NodeRecord = [tag u8 = 0x4E] [id u32] [i i32] [j i32] [k i32] [active u8]
//! ```
//!
//! Strings are `u32` length-prefixed UTF-8.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod hash;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::CacheError;
pub use hash::Fingerprint;
pub use reader::{CacheReader, NodeIter};
pub use types::CacheHeader;
pub use writer::CacheWriter;

/// Magic bytes at the start of every cache file.
pub const MAGIC: [u8; 4] = *b"MSHC";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;

/// Class identifier of node sets written by the regular mesh placement.
pub const CACHE_CLASS: &str = "meshplace::RegularMeshPlacement";

/// Content tag of a node-set cache.
pub const CACHE_WHAT: &str = "mesh_nodes";

/// Leading byte of every node record.
pub const NODE_RECORD_TAG: u8 = 0x4E;
