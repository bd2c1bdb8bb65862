//! Storing and loading node sets through cache files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use meshplace_cache::{CacheError, CacheHeader, CacheReader, CacheWriter};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::MeshError;
use crate::registry::NodeRegistry;

/// Check the cache path before a build.
///
/// Returns `true` when a cache file exists and should be loaded. When it
/// does not exist, its parent directory is created if missing.
///
/// # Errors
///
/// [`MeshError::CacheNotRegularFile`] when the path exists but is not a
/// regular file; [`MeshError::CacheDirectory`] when the parent directory
/// cannot be created.
pub fn prepare_cache_path(path: &Path) -> Result<bool, MeshError> {
    if path.exists() {
        if !path.is_file() {
            return Err(MeshError::CacheNotRegularFile {
                path: path.to_path_buf(),
            });
        }
        return Ok(true);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            fs::create_dir_all(parent).map_err(|source| MeshError::CacheDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(false)
}

/// Write every node of `registry`, in id order, to a new cache file.
///
/// Records go to a temporary file next to `path` that is renamed over it
/// once complete, so `path` never holds a partial node set. The temporary
/// file is removed when any step fails.
pub fn store_nodes(path: &Path, registry: &NodeRegistry, fingerprint: u64) -> Result<(), MeshError> {
    let wrap = |source: CacheError| MeshError::Cache {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(dir).map_err(|e| wrap(e.into()))?;
    let header = CacheHeader::new(fingerprint, registry.len() as u64);
    let mut writer = CacheWriter::new(BufWriter::new(tmp), &header).map_err(wrap)?;
    for node in registry.iter() {
        writer.write_node(node).map_err(wrap)?;
    }
    let tmp = writer
        .finish()
        .map_err(wrap)?
        .into_inner()
        .map_err(|e| wrap(e.into_error().into()))?;
    tmp.persist(path).map_err(|e| wrap(e.error.into()))?;
    info!(path = %path.display(), nodes = registry.len(), "stored mesh nodes");
    Ok(())
}

/// Read a cache file into a fresh registry.
///
/// A fingerprint different from `expected_fingerprint` is only reported:
/// the cached node set is used as is.
pub fn load_nodes(path: &Path, expected_fingerprint: u64) -> Result<NodeRegistry, MeshError> {
    let wrap = |source: CacheError| MeshError::Cache {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|e| wrap(e.into()))?;
    let reader = CacheReader::open(BufReader::new(file)).map_err(wrap)?;
    let recorded = reader.header().fingerprint;
    if recorded != expected_fingerprint {
        warn!(
            path = %path.display(),
            recorded,
            current = expected_fingerprint,
            "cache file was written for a different mesh geometry"
        );
    }

    let mut registry = NodeRegistry::new();
    for node in reader.nodes() {
        let node = node.map_err(wrap)?;
        registry.insert(node).map_err(|e| {
            wrap(CacheError::MalformedRecord {
                detail: e.to_string(),
            })
        })?;
    }
    info!(path = %path.display(), nodes = registry.len(), "loaded mesh nodes");
    Ok(registry)
}
