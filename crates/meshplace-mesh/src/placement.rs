//! The regular 3D mesh placement: lifecycle, node access and the
//! [`Placements`] implementation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use meshplace_core::{
    ItemIndex, LogicalVolume, NodeId, OverlapChecker, OverlapFlags, Placement, Placements,
    Properties, SamplingOverlapChecker, Vector3,
};
use smallvec::smallvec;
use tracing::info;

use crate::builder::{MeshBuilder, MeshGeometry};
use crate::cache_io::{load_nodes, prepare_cache_path, store_nodes};
use crate::config::{Axis, MeshConfig};
use crate::error::MeshError;
use crate::registry::NodeRegistry;

/// State that only exists once the mesh is built.
#[derive(Clone, Debug)]
struct MeshState {
    geometry: MeshGeometry,
    basic: Placement,
    flags: OverlapFlags,
    registry: NodeRegistry,
    from_cache: bool,
}

/// Nodes of a regular lattice accepted inside a mother volume.
///
/// A fresh placement is uninitialized and only accepts configuration.
/// [`initialize`](Self::initialize) resolves the geometry and builds (or
/// loads) the node set; afterwards the node placements can be queried and
/// configuration is frozen until [`reset`](Self::reset).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use meshplace_core::{LogicalVolume, Placements, Properties};
/// use meshplace_mesh::RegularMeshPlacement;
/// use meshplace_solids::Cuboid;
///
/// let world = LogicalVolume::new("world", Arc::new(Cuboid::cube(10.0).unwrap()));
/// let props = Properties::parse(
///     "step_x : real = 5\nstep_y : real = 5\nstep_z : real = 5\n",
/// ).unwrap();
///
/// let mut mesh = RegularMeshPlacement::new();
/// mesh.initialize(&world, None, &props).unwrap();
/// assert_eq!(mesh.number_of_items(), 8);
/// ```
#[derive(Debug)]
pub struct RegularMeshPlacement {
    config: MeshConfig,
    checker: Arc<dyn OverlapChecker>,
    state: Option<MeshState>,
}

impl RegularMeshPlacement {
    /// Uninitialized placement using the [`SamplingOverlapChecker`].
    pub fn new() -> Self {
        Self {
            config: MeshConfig::new(),
            checker: Arc::new(SamplingOverlapChecker::new()),
            state: None,
        }
    }

    /// Uninitialized placement with a preset configuration.
    pub fn with_config(config: MeshConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// `true` once [`initialize`](Self::initialize) succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    fn ensure_uninitialized(&self) -> Result<(), MeshError> {
        if self.is_initialized() {
            Err(MeshError::AlreadyInitialized)
        } else {
            Ok(())
        }
    }

    // ── Configuration ───────────────────────────────────────────

    /// Current configuration.
    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    /// Set the x step.
    pub fn set_step_x(&mut self, value: f64) -> Result<(), MeshError> {
        self.set_step(Axis::X, value)
    }

    /// Set the y step.
    pub fn set_step_y(&mut self, value: f64) -> Result<(), MeshError> {
        self.set_step(Axis::Y, value)
    }

    /// Set the z step.
    pub fn set_step_z(&mut self, value: f64) -> Result<(), MeshError> {
        self.set_step(Axis::Z, value)
    }

    /// Set the step of one axis.
    pub fn set_step(&mut self, axis: Axis, value: f64) -> Result<(), MeshError> {
        self.ensure_uninitialized()?;
        self.config.set_step(axis, value)
    }

    /// Set all three steps. Nothing is changed if any value is invalid.
    pub fn set_steps(&mut self, x: f64, y: f64, z: f64) -> Result<(), MeshError> {
        self.ensure_uninitialized()?;
        let mut config = self.config.clone();
        config.set_step(Axis::X, x)?;
        config.set_step(Axis::Y, y)?;
        config.set_step(Axis::Z, z)?;
        self.config = config;
        Ok(())
    }

    /// Set the x lower bound.
    pub fn set_start_x(&mut self, value: f64) -> Result<(), MeshError> {
        self.set_start(Axis::X, value)
    }

    /// Set the y lower bound.
    pub fn set_start_y(&mut self, value: f64) -> Result<(), MeshError> {
        self.set_start(Axis::Y, value)
    }

    /// Set the z lower bound.
    pub fn set_start_z(&mut self, value: f64) -> Result<(), MeshError> {
        self.set_start(Axis::Z, value)
    }

    /// Set the lower bound of one axis.
    pub fn set_start(&mut self, axis: Axis, value: f64) -> Result<(), MeshError> {
        self.ensure_uninitialized()?;
        self.config.set_start(axis, value)
    }

    /// Set all three lower bounds.
    pub fn set_starts(&mut self, x: f64, y: f64, z: f64) -> Result<(), MeshError> {
        self.ensure_uninitialized()?;
        let mut config = self.config.clone();
        config.set_start(Axis::X, x)?;
        config.set_start(Axis::Y, y)?;
        config.set_start(Axis::Z, z)?;
        self.config = config;
        Ok(())
    }

    /// Set the x upper bound.
    pub fn set_stop_x(&mut self, value: f64) -> Result<(), MeshError> {
        self.set_stop(Axis::X, value)
    }

    /// Set the y upper bound.
    pub fn set_stop_y(&mut self, value: f64) -> Result<(), MeshError> {
        self.set_stop(Axis::Y, value)
    }

    /// Set the z upper bound.
    pub fn set_stop_z(&mut self, value: f64) -> Result<(), MeshError> {
        self.set_stop(Axis::Z, value)
    }

    /// Set the upper bound of one axis.
    pub fn set_stop(&mut self, axis: Axis, value: f64) -> Result<(), MeshError> {
        self.ensure_uninitialized()?;
        self.config.set_stop(axis, value)
    }

    /// Set all three upper bounds.
    pub fn set_stops(&mut self, x: f64, y: f64, z: f64) -> Result<(), MeshError> {
        self.ensure_uninitialized()?;
        let mut config = self.config.clone();
        config.set_stop(Axis::X, x)?;
        config.set_stop(Axis::Y, y)?;
        config.set_stop(Axis::Z, z)?;
        self.config = config;
        Ok(())
    }

    /// Set the overlap check options.
    pub fn set_overlap_flags(&mut self, flags: OverlapFlags) -> Result<(), MeshError> {
        self.ensure_uninitialized()?;
        self.config.overlap_flags = Some(flags);
        Ok(())
    }

    /// Set the node-set cache file. The path is used as given.
    pub fn set_cache_file_path(&mut self, path: impl Into<PathBuf>) -> Result<(), MeshError> {
        self.ensure_uninitialized()?;
        self.config.cache_file_path = Some(path.into());
        Ok(())
    }

    /// Replace the overlap checker.
    pub fn set_overlap_checker(
        &mut self,
        checker: Arc<dyn OverlapChecker>,
    ) -> Result<(), MeshError> {
        self.ensure_uninitialized()?;
        self.checker = checker;
        Ok(())
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Resolve the geometry and build the node set.
    ///
    /// Properties fill whatever the setters left unset. When a cache file
    /// is configured and exists, the node set is read from it instead of
    /// enumerating the lattice; when it does not exist the built node set
    /// is written to it.
    ///
    /// The volumes are only borrowed for the duration of the call. On
    /// error the placement stays uninitialized with its configuration
    /// unchanged.
    pub fn initialize(
        &mut self,
        mother: &LogicalVolume,
        node: Option<&LogicalVolume>,
        props: &Properties,
    ) -> Result<(), MeshError> {
        self.ensure_uninitialized()?;

        let mut config = self.config.clone();
        config.merge_properties(props)?;
        let geometry = MeshGeometry::resolve(&config, mother, node)?;
        let flags = config.overlap_flags.unwrap_or_default();
        let fingerprint = geometry.fingerprint(flags, node.is_some());

        let build = || {
            MeshBuilder::new(mother, node, &geometry, self.checker.as_ref(), flags).build()
        };
        let (registry, from_cache) = match &config.cache_file_path {
            Some(path) if prepare_cache_path(path)? => (load_nodes(path, fingerprint)?, true),
            Some(path) => {
                let registry = build()?;
                store_nodes(path, &registry, fingerprint)?;
                (registry, false)
            }
            None => (build()?, false),
        };

        info!(
            mother = mother.name(),
            nodes = registry.len(),
            from_cache,
            "regular mesh placement initialized"
        );
        self.config = config;
        self.state = Some(MeshState {
            basic: geometry.basic_placement(),
            geometry,
            flags,
            registry,
            from_cache,
        });
        Ok(())
    }

    /// Drop the node set, geometry and configuration.
    ///
    /// The overlap checker is kept.
    pub fn reset(&mut self) -> Result<(), MeshError> {
        if self.state.take().is_none() {
            return Err(MeshError::NotInitialized);
        }
        self.config = MeshConfig::new();
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Resolved geometry, once initialized.
    pub fn geometry(&self) -> Option<&MeshGeometry> {
        self.state.as_ref().map(|s| &s.geometry)
    }

    /// Accepted nodes, once initialized.
    pub fn registry(&self) -> Option<&NodeRegistry> {
        self.state.as_ref().map(|s| &s.registry)
    }

    /// Overlap flags in effect, once initialized.
    pub fn overlap_flags(&self) -> Option<OverlapFlags> {
        self.state.as_ref().map(|s| s.flags)
    }

    /// Resolved steps, once initialized.
    pub fn steps(&self) -> Option<Vector3<f64>> {
        self.geometry().map(|g| g.step)
    }

    /// Configured cache file path.
    pub fn cache_file_path(&self) -> Option<&Path> {
        self.config.cache_file_path.as_deref()
    }

    /// `true` when the node set was read from the cache file.
    pub fn loaded_from_cache(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.from_cache)
    }

    /// Number of accepted nodes (0 before initialization).
    pub fn number_of_nodes(&self) -> usize {
        self.registry().map_or(0, NodeRegistry::len)
    }

    /// Placement of the `(0, 0, 0)` node.
    pub fn basic_placement(&self) -> Option<&Placement> {
        self.state.as_ref().map(|s| &s.basic)
    }

    /// Placement of node `id`: the basic placement translated by
    /// `(i * step_x, j * step_y, k * step_z)`.
    pub fn placement(&self, id: NodeId) -> Option<Placement> {
        let state = self.state.as_ref()?;
        let node = state.registry.find_by_id(id)?;
        let step = state.geometry.step;
        let offset = Vector3::new(
            f64::from(node.coord.i) * step.x,
            f64::from(node.coord.j) * step.y,
            f64::from(node.coord.k) * step.z,
        );
        Some(state.basic.translated(&offset))
    }

    /// Lattice indices `[i, j, k]` of node `id`.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidItem`] when `id` is not a node of this mesh.
    pub fn index_map(&self, id: NodeId) -> Result<ItemIndex, MeshError> {
        let invalid = || MeshError::InvalidItem {
            item: id.0 as usize,
            count: self.number_of_nodes(),
        };
        let node = self
            .registry()
            .and_then(|r| r.find_by_id(id))
            .ok_or_else(invalid)?;
        let c = node.coord;
        Ok(smallvec![c.i as u32, c.j as u32, c.k as u32])
    }
}

impl Default for RegularMeshPlacement {
    fn default() -> Self {
        Self::new()
    }
}

fn node_id(item: usize) -> Option<NodeId> {
    u32::try_from(item).ok().map(NodeId)
}

impl Placements for RegularMeshPlacement {
    fn number_of_items(&self) -> usize {
        self.number_of_nodes()
    }

    fn placement(&self, item: usize) -> Option<Placement> {
        node_id(item).and_then(|id| RegularMeshPlacement::placement(self, id))
    }

    fn dimension(&self) -> usize {
        3
    }

    fn has_only_one_rotation(&self) -> bool {
        true
    }

    fn is_replica(&self) -> bool {
        false
    }

    fn compute_index_map(&self, item: usize) -> Option<ItemIndex> {
        node_id(item).and_then(|id| self.index_map(id).ok())
    }
}

impl fmt::Display for RegularMeshPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RegularMeshPlacement")?;
        let Some(state) = &self.state else {
            return writeln!(f, "`-- Initialized: no");
        };
        let g = &state.geometry;
        writeln!(f, "|-- Initialized: yes")?;
        writeln!(f, "|-- Overlap flags: {}", state.flags)?;
        writeln!(
            f,
            "|-- Steps: ({}, {}, {}) mm",
            g.step.x, g.step.y, g.step.z
        )?;
        writeln!(
            f,
            "|-- Samples: [{}, {}, {}]",
            g.samples[0], g.samples[1], g.samples[2]
        )?;
        writeln!(f, "|-- Basic placement: {}", state.basic)?;
        if let Some(path) = &self.config.cache_file_path {
            writeln!(
                f,
                "|-- Cache file: {}{}",
                path.display(),
                if state.from_cache { " (loaded)" } else { "" }
            )?;
        }
        writeln!(f, "`-- Nodes: {}", state.registry.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshplace_core::NodeCoord;
    use meshplace_test_utils::box_mother;

    fn initialized(step: f64) -> RegularMeshPlacement {
        let mut mesh = RegularMeshPlacement::new();
        mesh.set_steps(step, step, step).unwrap();
        mesh.initialize(&box_mother(10.0), None, &Properties::new())
            .unwrap();
        mesh
    }

    #[test]
    fn setters_fail_after_initialize() {
        let mut mesh = initialized(5.0);
        assert!(matches!(mesh.set_step_x(1.0), Err(MeshError::AlreadyInitialized)));
        assert!(matches!(mesh.set_starts(0.0, 0.0, 0.0), Err(MeshError::AlreadyInitialized)));
        assert!(matches!(
            mesh.set_overlap_flags(OverlapFlags::NONE),
            Err(MeshError::AlreadyInitialized)
        ));
        assert!(matches!(
            mesh.set_cache_file_path("/tmp/x"),
            Err(MeshError::AlreadyInitialized)
        ));
    }

    #[test]
    fn set_steps_is_all_or_nothing() {
        let mut mesh = RegularMeshPlacement::new();
        assert!(mesh.set_steps(1.0, -1.0, 1.0).is_err());
        assert_eq!(mesh.config().step(Axis::X), None);
    }

    #[test]
    fn double_initialize_fails() {
        let mut mesh = initialized(5.0);
        let err = mesh
            .initialize(&box_mother(10.0), None, &Properties::new())
            .unwrap_err();
        assert!(matches!(err, MeshError::AlreadyInitialized));
        assert_eq!(mesh.number_of_nodes(), 8);
    }

    #[test]
    fn reset_requires_initialized() {
        let mut mesh = RegularMeshPlacement::new();
        assert!(matches!(mesh.reset(), Err(MeshError::NotInitialized)));
        let mut mesh = initialized(5.0);
        mesh.reset().unwrap();
        assert!(!mesh.is_initialized());
        assert_eq!(mesh.number_of_nodes(), 0);
        assert_eq!(mesh.config(), &MeshConfig::new());
    }

    #[test]
    fn node_placement_is_translated_basic_placement() {
        let mesh = initialized(5.0);
        assert_eq!(
            mesh.basic_placement().unwrap().translation(),
            Vector3::new(2.5, 2.5, 2.5)
        );
        let reg = mesh.registry().unwrap();
        let id = reg.find_by_coord(&NodeCoord::new(1, 0, 1)).unwrap().id;
        let p = mesh.placement(id).unwrap();
        assert_eq!(p.translation(), Vector3::new(7.5, 2.5, 7.5));
        assert!(p.is_unrotated());
        assert!(mesh.placement(NodeId(8)).is_none());
    }

    #[test]
    fn index_map_and_trait_access() {
        let mesh = initialized(5.0);
        assert_eq!(mesh.index_map(NodeId(0)).unwrap().as_slice(), &[0, 0, 0]);
        assert_eq!(mesh.index_map(NodeId(7)).unwrap().as_slice(), &[1, 1, 1]);
        assert!(matches!(
            mesh.index_map(NodeId(8)),
            Err(MeshError::InvalidItem { item: 8, count: 8 })
        ));
        let dynamic: &dyn Placements = &mesh;
        assert_eq!(dynamic.dimension(), 3);
        assert_eq!(dynamic.iter_placements().count(), 8);
        assert!(dynamic.compute_index_map(8).is_none());
    }

    #[test]
    fn uninitialized_accessors_are_empty() {
        let mesh = RegularMeshPlacement::new();
        assert!(mesh.basic_placement().is_none());
        assert!(mesh.placement(NodeId(0)).is_none());
        assert!(matches!(
            mesh.index_map(NodeId(0)),
            Err(MeshError::InvalidItem { count: 0, .. })
        ));
        assert_eq!(Placements::number_of_items(&mesh), 0);
    }

    #[test]
    fn display_summary() {
        let text = initialized(5.0).to_string();
        assert!(text.contains("|-- Steps: (5, 5, 5) mm"));
        assert!(text.ends_with("`-- Nodes: 8\n"));
        assert!(RegularMeshPlacement::new().to_string().contains("Initialized: no"));
    }
}
