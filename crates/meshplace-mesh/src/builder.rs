//! Lattice enumeration and node acceptance.
//!
//! [`MeshGeometry::resolve`] turns a configuration and the mother/node
//! volumes into a concrete enumeration domain; [`MeshBuilder`] walks the
//! lattice and keeps every candidate whose position (and node prototype,
//! when given) fits in the free interior of the mother.

use meshplace_cache::Fingerprint;
use meshplace_core::{
    LogicalVolume, MeshNode, NodeCoord, NodeId, OverlapChecker, OverlapFlags, Placement, Point3,
    Vector3, GEOMETRY_TOLERANCE,
};
use tracing::{debug, info};

use crate::config::{Axis, MeshConfig};
use crate::error::MeshError;
use crate::registry::NodeRegistry;

/// Fraction of a step by which the last candidate may exceed the upper bound.
pub const STOP_SLACK: f64 = 0.1;

/// Resolved enumeration domain of a mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshGeometry {
    /// Lattice spacing.
    pub step: Vector3<f64>,
    /// Position of the `(0, 0, 0)` candidate.
    pub min: Point3<f64>,
    /// Upper bound of the enumeration.
    pub max: Point3<f64>,
    /// `floor((max - min) / step)` per axis.
    pub samples: [u32; 3],
}

impl MeshGeometry {
    /// Resolve steps and bounds.
    ///
    /// Steps come from the configuration, else from the node shape's
    /// bounding-box size. The first candidate sits half a step inside the
    /// mother bounding box; start/stop values only apply when they shrink
    /// the range.
    pub fn resolve(
        config: &MeshConfig,
        mother: &LogicalVolume,
        node: Option<&LogicalVolume>,
    ) -> Result<Self, MeshError> {
        let node_size = match node {
            Some(vol) => Some(
                vol.shape()
                    .bounding_box()
                    .ok_or_else(|| MeshError::NoBoundingData {
                        volume: vol.name().to_string(),
                    })?
                    .size(),
            ),
            None => None,
        };

        let mut step = Vector3::zeros();
        for axis in Axis::ALL {
            let i = axis.index();
            step[i] = match (config.step(axis), node_size) {
                (Some(s), _) => s,
                (None, Some(size)) => {
                    let s = size[i];
                    if !(s.is_finite() && s > 0.0) {
                        return Err(MeshError::InvalidStep { axis, value: s });
                    }
                    s
                }
                (None, None) => return Err(MeshError::MissingStep { axis }),
            };
        }

        let bb = mother
            .shape()
            .bounding_box()
            .ok_or_else(|| MeshError::NoBoundingData {
                volume: mother.name().to_string(),
            })?;

        let mut min = bb.min + 0.5 * step;
        let mut max = bb.max;
        let mut samples = [0u32; 3];
        for axis in Axis::ALL {
            let i = axis.index();
            if let Some(start) = config.start(axis) {
                if start >= min[i] {
                    min[i] = start;
                }
            }
            if let Some(stop) = config.stop(axis) {
                if stop <= max[i] {
                    max[i] = stop;
                }
            }
            samples[i] = ((max[i] - min[i]) / step[i]).floor().max(0.0) as u32;
        }

        let mut total = 1.0;
        for axis in Axis::ALL {
            let i = axis.index();
            let count = axis_candidates(min[i], max[i], step[i]);
            if count > f64::from(i32::MAX) {
                return Err(MeshError::TooManyCandidates {
                    axis: Some(axis),
                    count,
                });
            }
            total *= count;
        }
        // node ids are u32
        if total > f64::from(u32::MAX) {
            return Err(MeshError::TooManyCandidates { axis: None, count: total });
        }

        Ok(Self {
            step,
            min,
            max,
            samples,
        })
    }

    /// Placement of the `(0, 0, 0)` node: translation to `min`, no rotation.
    pub fn basic_placement(&self) -> Placement {
        Placement::from_translation(self.min.x, self.min.y, self.min.z)
    }

    /// Centre of the node at `coord`.
    pub fn position(&self, coord: &NodeCoord) -> Point3<f64> {
        Point3::new(
            self.min.x + f64::from(coord.i) * self.step.x,
            self.min.y + f64::from(coord.j) * self.step.y,
            self.min.z + f64::from(coord.k) * self.step.z,
        )
    }

    /// Number of candidates along one axis, including the slack row.
    ///
    /// Saturates at `i32::MAX`; [`resolve`](Self::resolve) rejects
    /// geometries beyond that.
    pub fn candidate_count(&self, axis: Axis) -> u32 {
        let i = axis.index();
        let count = axis_candidates(self.min[i], self.max[i], self.step[i]);
        count.min(f64::from(i32::MAX)) as u32
    }

    /// All lattice candidates in enumeration order (x outermost, z innermost).
    pub fn candidates(&self) -> impl Iterator<Item = (NodeCoord, Point3<f64>)> + '_ {
        let [ni, nj, nk] = Axis::ALL
            .map(|a| i32::try_from(self.candidate_count(a)).unwrap_or(i32::MAX));
        (0..ni).flat_map(move |i| {
            (0..nj).flat_map(move |j| {
                (0..nk).map(move |k| {
                    let coord = NodeCoord::new(i, j, k);
                    (coord, self.position(&coord))
                })
            })
        })
    }

    /// Fingerprint of the values a node set depends on.
    pub fn fingerprint(&self, flags: OverlapFlags, has_prototype: bool) -> u64 {
        let mut fp = Fingerprint::new();
        for i in 0..3 {
            fp = fp.f64(self.step[i]).f64(self.min[i]).f64(self.max[i]);
        }
        fp.u32(flags.bits()).bool(has_prototype).finish()
    }
}

/// Candidates from `min` while `x <= max + STOP_SLACK * step`.
fn axis_candidates(min: f64, max: f64, step: f64) -> f64 {
    let limit = max + STOP_SLACK * step;
    if min > limit {
        return 0.0;
    }
    ((limit - min) / step).floor() + 1.0
}

/// Enumerates a [`MeshGeometry`] and collects the accepted nodes.
pub struct MeshBuilder<'a> {
    mother: &'a LogicalVolume,
    node: Option<&'a LogicalVolume>,
    geometry: &'a MeshGeometry,
    checker: &'a dyn OverlapChecker,
    flags: OverlapFlags,
    tolerance: f64,
}

impl<'a> MeshBuilder<'a> {
    /// Create a builder.
    pub fn new(
        mother: &'a LogicalVolume,
        node: Option<&'a LogicalVolume>,
        geometry: &'a MeshGeometry,
        checker: &'a dyn OverlapChecker,
        flags: OverlapFlags,
    ) -> Self {
        Self {
            mother,
            node,
            geometry,
            checker,
            flags,
            tolerance: GEOMETRY_TOLERANCE,
        }
    }

    /// Use a custom point location tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// `true` when a node centred at `pos` may be placed.
    pub fn accepts(&self, pos: &Point3<f64>) -> bool {
        let loc = self.mother.locate(pos, self.tolerance);
        if !loc.is_inside() || loc.is_inside_daughter() || loc.is_on_daughter_surface() {
            debug!(x = pos.x, y = pos.y, z = pos.z, domain = %loc.domain, "candidate not in free interior");
            return false;
        }

        let Some(node) = self.node else {
            return true;
        };
        let at = Placement::from_translation(pos.x, pos.y, pos.z);
        let report =
            self.checker
                .mother_daughter_overlap(self.mother.shape(), node.shape(), &at, self.flags);
        if report.has_overlap() {
            debug!(x = pos.x, y = pos.y, z = pos.z, "node crosses the mother boundary");
            return false;
        }

        for phys in self.mother.physicals() {
            let sibling = phys.logical().shape();
            for item_at in phys.placement().iter_placements() {
                let report =
                    self.checker
                        .two_volumes_overlap(node.shape(), &at, sibling, &item_at, self.flags);
                if report.has_overlap() {
                    debug!(
                        x = pos.x,
                        y = pos.y,
                        z = pos.z,
                        daughter = phys.name(),
                        "node overlaps a daughter"
                    );
                    return false;
                }
            }
        }
        true
    }

    /// Enumerate every candidate and register the accepted ones with
    /// sequential ids.
    pub fn build(&self) -> Result<NodeRegistry, MeshError> {
        let mut registry = NodeRegistry::new();
        let mut next_id = 0u32;
        for (coord, pos) in self.geometry.candidates() {
            if self.accepts(&pos) {
                registry.insert(MeshNode::new(NodeId(next_id), coord))?;
                next_id += 1;
            }
        }
        info!(
            mother = self.mother.name(),
            nodes = registry.len(),
            "regular mesh built"
        );
        Ok(registry)
    }
}
