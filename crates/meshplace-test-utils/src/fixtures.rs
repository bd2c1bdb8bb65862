//! Reusable volume fixtures.
//!
//! - [`box_mother`]: empty cubic mother spanning `[0, L]^3`.
//! - [`mother_with_block`]: the same mother with one box daughter placed in it.
//! - [`aabb_volume`]: centred box volume, e.g. a node prototype.
//! - [`TempCache`]: cache file path inside a temporary directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use meshplace_core::{LogicalVolume, PhysicalVolume, Placement, Point3};
use tempfile::TempDir;

use crate::AabbShape;

/// Empty mother `"world"` spanning `[0, side]^3` in its own frame.
pub fn box_mother(side: f64) -> LogicalVolume {
    LogicalVolume::new(
        "world",
        Arc::new(AabbShape::new(
            Point3::origin(),
            Point3::new(side, side, side),
        )),
    )
}

/// Centred box volume of full dimensions `(dx, dy, dz)`.
pub fn aabb_volume(name: &str, dx: f64, dy: f64, dz: f64) -> LogicalVolume {
    LogicalVolume::new(name, Arc::new(AabbShape::centered(dx, dy, dz)))
}

/// [`box_mother`] with a cubic daughter `"block.phys"` of side `block`
/// centred at `center`.
pub fn mother_with_block(side: f64, center: Point3<f64>, block: f64) -> LogicalVolume {
    let mut mother = box_mother(side);
    let logical = Arc::new(aabb_volume("block", block, block, block));
    let at = Placement::from_translation(center.x, center.y, center.z);
    mother
        .add_physical(PhysicalVolume::new("block.phys", logical, Arc::new(at)))
        .expect("fresh mother has no daughters");
    mother
}

/// A cache file path in a temporary directory removed on drop.
pub struct TempCache {
    dir: TempDir,
    path: PathBuf,
}

impl TempCache {
    /// Path `<tmp>/<name>`; the file itself is not created.
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join(name);
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
