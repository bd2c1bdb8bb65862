//! Cache writer.
//!
//! [`CacheWriter`] streams node records to any `Write` sink. The header is
//! written immediately on construction and announces the record count.

use std::io::Write;

use meshplace_core::MeshNode;

use crate::codec::{encode_header, encode_node};
use crate::error::CacheError;
use crate::types::CacheHeader;

/// Writes a node-set cache to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production code
/// can use `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use meshplace_cache::{CacheHeader, CacheReader, CacheWriter};
/// use meshplace_core::{MeshNode, NodeCoord, NodeId};
///
/// let nodes = [
///     MeshNode::new(NodeId(0), NodeCoord::new(0, 0, 0)),
///     MeshNode::new(NodeId(1), NodeCoord::new(0, 0, 1)),
/// ];
///
/// let mut buf = Vec::new();
/// let mut writer = CacheWriter::new(&mut buf, &CacheHeader::new(0, 2)).unwrap();
/// for node in &nodes {
///     writer.write_node(node).unwrap();
/// }
/// writer.finish().unwrap();
///
/// let reader = CacheReader::open(buf.as_slice()).unwrap();
/// let read: Vec<_> = reader.nodes().collect::<Result<_, _>>().unwrap();
/// assert_eq!(read, nodes);
/// ```
pub struct CacheWriter<W: Write> {
    writer: W,
    expected: u64,
    nodes_written: u64,
}

impl<W: Write> CacheWriter<W> {
    /// Create a new cache writer, immediately writing the header.
    pub fn new(mut writer: W, header: &CacheHeader) -> Result<Self, CacheError> {
        encode_header(&mut writer, header)?;
        Ok(Self {
            writer,
            expected: header.node_count,
            nodes_written: 0,
        })
    }

    /// Append one node record.
    ///
    /// Fails when the header's node count has already been reached.
    pub fn write_node(&mut self, node: &MeshNode) -> Result<(), CacheError> {
        if self.nodes_written >= self.expected {
            return Err(CacheError::MalformedRecord {
                detail: format!("header announces only {} records", self.expected),
            });
        }
        encode_node(&mut self.writer, node)?;
        self.nodes_written += 1;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), CacheError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of node records written so far.
    pub fn nodes_written(&self) -> u64 {
        self.nodes_written
    }

    /// Check that every announced record was written, flush, and return the
    /// underlying sink.
    pub fn finish(mut self) -> Result<W, CacheError> {
        if self.nodes_written != self.expected {
            return Err(CacheError::MalformedRecord {
                detail: format!(
                    "wrote {} of {} announced records",
                    self.nodes_written, self.expected
                ),
            });
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Consume the writer and return the underlying `Write` sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
