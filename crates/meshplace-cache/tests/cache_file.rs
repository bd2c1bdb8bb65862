//! Cache files on disk and header corruption cases.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use meshplace_cache::codec::{write_length_prefixed_str, write_u64_le, write_u8};
use meshplace_cache::{
    CacheError, CacheHeader, CacheReader, CacheWriter, Fingerprint, CACHE_CLASS, CACHE_WHAT,
    FORMAT_VERSION, MAGIC,
};
use meshplace_core::{MeshNode, NodeCoord, NodeId};

fn lattice_nodes() -> Vec<MeshNode> {
    let mut nodes = Vec::new();
    for i in 0..2 {
        for j in 0..2 {
            for k in 0..2 {
                let id = NodeId(nodes.len() as u32);
                nodes.push(MeshNode::new(id, NodeCoord::new(i, j, k)));
            }
        }
    }
    nodes
}

fn raw_header(magic: [u8; 4], version: u8, class: &str, what: &str) -> Vec<u8> {
    let mut buf = magic.to_vec();
    write_u8(&mut buf, version).unwrap();
    write_length_prefixed_str(&mut buf, class).unwrap();
    write_length_prefixed_str(&mut buf, what).unwrap();
    write_u64_le(&mut buf, 0).unwrap();
    write_u64_le(&mut buf, 0).unwrap();
    buf
}

#[test]
fn file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mesh.cache");
    let nodes = lattice_nodes();
    let fingerprint = Fingerprint::new().f64(5.0).finish();

    let file = File::create(&path).unwrap();
    let mut writer = CacheWriter::new(
        BufWriter::new(file),
        &CacheHeader::new(fingerprint, nodes.len() as u64),
    )
    .unwrap();
    for node in &nodes {
        writer.write_node(node).unwrap();
    }
    writer.finish().unwrap();

    let reader = CacheReader::open(BufReader::new(File::open(&path).unwrap())).unwrap();
    assert_eq!(reader.header().fingerprint, fingerprint);
    assert_eq!(reader.header().node_count, 8);
    let read: Vec<_> = reader.nodes().collect::<Result<_, _>>().unwrap();
    assert_eq!(read, nodes);
}

#[test]
fn valid_raw_header_is_accepted() {
    let buf = raw_header(MAGIC, FORMAT_VERSION, CACHE_CLASS, CACHE_WHAT);
    assert!(CacheReader::open(buf.as_slice()).is_ok());
}

#[test]
fn bad_magic() {
    let buf = raw_header(*b"XSHC", FORMAT_VERSION, CACHE_CLASS, CACHE_WHAT);
    assert!(matches!(
        CacheReader::open(buf.as_slice()),
        Err(CacheError::InvalidMagic)
    ));
}

#[test]
fn unsupported_version() {
    let buf = raw_header(MAGIC, FORMAT_VERSION + 1, CACHE_CLASS, CACHE_WHAT);
    assert!(matches!(
        CacheReader::open(buf.as_slice()),
        Err(CacheError::UnsupportedVersion { found }) if found == FORMAT_VERSION + 1
    ));
}

#[test]
fn class_mismatch() {
    let buf = raw_header(MAGIC, FORMAT_VERSION, "other::Placement", CACHE_WHAT);
    assert!(matches!(
        CacheReader::open(buf.as_slice()),
        Err(CacheError::ClassMismatch { found }) if found == "other::Placement"
    ));
}

#[test]
fn content_mismatch() {
    let buf = raw_header(MAGIC, FORMAT_VERSION, CACHE_CLASS, "volumes");
    assert!(matches!(
        CacheReader::open(buf.as_slice()),
        Err(CacheError::ContentMismatch { found }) if found == "volumes"
    ));
}

#[test]
fn empty_stream_is_io_error() {
    let empty: &[u8] = &[];
    assert!(matches!(CacheReader::open(empty), Err(CacheError::Io(_))));
}

#[test]
fn announced_records_missing() {
    let mut buf = Vec::new();
    let writer = CacheWriter::new(&mut buf, &CacheHeader::new(0, 2)).unwrap();
    // Drop without writing records: the header still announces two.
    drop(writer.into_inner());
    let mut reader = CacheReader::open(buf.as_slice()).unwrap();
    assert!(matches!(
        reader.next_node(),
        Err(CacheError::MalformedRecord { .. })
    ));
}
