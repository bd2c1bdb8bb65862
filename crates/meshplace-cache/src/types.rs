//! Data types for cache files.

use crate::{CACHE_CLASS, CACHE_WHAT};

/// Header of a node-set cache stream.
///
/// # Examples
///
/// ```
/// use meshplace_cache::{CacheHeader, CACHE_CLASS};
///
/// let header = CacheHeader::new(0xFEED, 8);
/// assert_eq!(header.class, CACHE_CLASS);
/// assert_eq!(header.node_count, 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheHeader {
    /// Class identifier of the writer.
    pub class: String,
    /// Content tag.
    pub what: String,
    /// Fingerprint of the mesh geometry the node set was built from.
    pub fingerprint: u64,
    /// Number of node records following the header.
    pub node_count: u64,
}

impl CacheHeader {
    /// Node-set header with the standard class and content tag.
    pub fn new(fingerprint: u64, node_count: u64) -> Self {
        Self {
            class: CACHE_CLASS.to_string(),
            what: CACHE_WHAT.to_string(),
            fingerprint,
            node_count,
        }
    }
}
