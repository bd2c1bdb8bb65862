//! Cache reader.
//!
//! [`CacheReader`] reads node records from any `Read` source. The header is
//! validated on construction; exactly `node_count` records are then read.

use std::io::Read;

use meshplace_core::MeshNode;

use crate::codec::{decode_header, decode_node};
use crate::error::CacheError;
use crate::types::CacheHeader;

/// Reads a node-set cache from a byte stream.
///
/// Generic over `R: Read` so tests can use `&[u8]` and production code can
/// use `BufReader<File>`.
pub struct CacheReader<R: Read> {
    reader: R,
    header: CacheHeader,
    nodes_read: u64,
}

impl<R: Read> CacheReader<R> {
    /// Open a cache stream, reading and validating the header.
    pub fn open(mut reader: R) -> Result<Self, CacheError> {
        let header = decode_header(&mut reader)?;
        Ok(Self {
            reader,
            header,
            nodes_read: 0,
        })
    }

    /// The validated header.
    pub fn header(&self) -> &CacheHeader {
        &self.header
    }

    /// Read the next node, or `None` once all announced records were read.
    pub fn next_node(&mut self) -> Result<Option<MeshNode>, CacheError> {
        if self.nodes_read >= self.header.node_count {
            return Ok(None);
        }
        let node = decode_node(&mut self.reader).map_err(|e| match e {
            CacheError::MalformedRecord { detail } => CacheError::MalformedRecord {
                detail: format!(
                    "record {} of {}: {detail}",
                    self.nodes_read + 1,
                    self.header.node_count
                ),
            },
            other => other,
        })?;
        self.nodes_read += 1;
        Ok(Some(node))
    }

    /// Number of nodes read so far.
    pub fn nodes_read(&self) -> u64 {
        self.nodes_read
    }

    /// Convert into a node iterator.
    pub fn nodes(self) -> NodeIter<R> {
        NodeIter {
            inner: self,
            done: false,
        }
    }
}

/// Iterator adapter over cached nodes.
pub struct NodeIter<R: Read> {
    inner: CacheReader<R>,
    done: bool,
}

impl<R: Read> Iterator for NodeIter<R> {
    type Item = Result<MeshNode, CacheError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next_node() {
            Ok(Some(node)) => Some(Ok(node)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
