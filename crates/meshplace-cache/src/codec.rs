//! Binary encode/decode for the cache format.
//!
//! All integers are little-endian. Strings are length-prefixed with a `u32`
//! length. No compression, no alignment padding, no self-describing schema.

use std::io::{self, Read, Write};

use meshplace_core::{MeshNode, NodeCoord, NodeId};

use crate::error::CacheError;
use crate::types::CacheHeader;
use crate::{CACHE_CLASS, CACHE_WHAT, FORMAT_VERSION, MAGIC, NODE_RECORD_TAG};

/// Longest header string accepted by the decoder.
pub const MAX_STR_LEN: usize = 4096;

/// Encoded size of one node record in bytes.
pub const NODE_RECORD_LEN: usize = 1 + 4 + 3 * 4 + 1;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), CacheError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), CacheError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), CacheError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), CacheError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a length-prefixed UTF-8 string (u32 length + bytes).
pub fn write_length_prefixed_str(w: &mut dyn Write, s: &str) -> Result<(), CacheError> {
    write_u32_le(w, s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, CacheError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, CacheError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, CacheError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, CacheError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a length-prefixed UTF-8 string of at most [`MAX_STR_LEN`] bytes.
pub fn read_length_prefixed_str(r: &mut dyn Read) -> Result<String, CacheError> {
    let len = read_u32_le(r)? as usize;
    if len > MAX_STR_LEN {
        return Err(CacheError::MalformedRecord {
            detail: format!("string length {len} exceeds {MAX_STR_LEN}"),
        });
    }
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| CacheError::MalformedRecord {
        detail: format!("invalid UTF-8 string: {e}"),
    })
}

// ── Header encode/decode ────────────────────────────────────────

/// Encode the cache header (magic, version, class, what, fingerprint, count).
pub fn encode_header(w: &mut dyn Write, header: &CacheHeader) -> Result<(), CacheError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    write_length_prefixed_str(w, &header.class)?;
    write_length_prefixed_str(w, &header.what)?;
    write_u64_le(w, header.fingerprint)?;
    write_u64_le(w, header.node_count)?;
    Ok(())
}

/// Decode and validate the cache header.
///
/// Fails with [`CacheError::ClassMismatch`] or
/// [`CacheError::ContentMismatch`] when the stream was not written as a
/// node set by [`CACHE_CLASS`].
pub fn decode_header(r: &mut dyn Read) -> Result<CacheHeader, CacheError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(CacheError::InvalidMagic);
    }

    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(CacheError::UnsupportedVersion { found: version });
    }

    let class = read_length_prefixed_str(r)?;
    if class != CACHE_CLASS {
        return Err(CacheError::ClassMismatch { found: class });
    }
    let what = read_length_prefixed_str(r)?;
    if what != CACHE_WHAT {
        return Err(CacheError::ContentMismatch { found: what });
    }

    Ok(CacheHeader {
        class,
        what,
        fingerprint: read_u64_le(r)?,
        node_count: read_u64_le(r)?,
    })
}

// ── Node record encode/decode ───────────────────────────────────

/// Encode one node record.
pub fn encode_node(w: &mut dyn Write, node: &MeshNode) -> Result<(), CacheError> {
    write_u8(w, NODE_RECORD_TAG)?;
    write_u32_le(w, node.id.0)?;
    write_i32_le(w, node.coord.i)?;
    write_i32_le(w, node.coord.j)?;
    write_i32_le(w, node.coord.k)?;
    write_u8(w, u8::from(node.active))?;
    Ok(())
}

/// Decode one node record.
///
/// A record is always expected: end of stream before or inside the record
/// is reported as [`CacheError::MalformedRecord`].
pub fn decode_node(r: &mut dyn Read) -> Result<MeshNode, CacheError> {
    let mut buf = [0u8; NODE_RECORD_LEN];
    r.read_exact(&mut buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => CacheError::MalformedRecord {
            detail: "truncated node record".to_string(),
        },
        _ => CacheError::Io(e),
    })?;
    let mut cursor = buf.as_slice();
    let r: &mut dyn Read = &mut cursor;

    let tag = read_u8(r)?;
    if tag != NODE_RECORD_TAG {
        return Err(CacheError::MalformedRecord {
            detail: format!("unexpected record tag {tag:#04x}"),
        });
    }
    let id = NodeId(read_u32_le(r)?);
    let coord = NodeCoord::new(read_i32_le(r)?, read_i32_le(r)?, read_i32_le(r)?);
    let active = match read_u8(r)? {
        0 => false,
        1 => true,
        flag => {
            return Err(CacheError::MalformedRecord {
                detail: format!("invalid active flag {flag} for node {id}"),
            })
        }
    };
    Ok(MeshNode { id, coord, active })
}
