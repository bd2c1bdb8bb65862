//! Several labelled meshes built inside one mother, in rank order.
//!
//! Each built mesh is placed into the mother as a physical volume, so a
//! mesh of higher rank avoids the nodes of every mesh built before it.

use std::sync::Arc;

use indexmap::IndexMap;
use meshplace_core::{LogicalVolume, OverlapChecker, PhysicalVolume, Properties};
use tracing::{debug, warn};

use crate::error::MeshError;
use crate::placement::RegularMeshPlacement;

/// Suffix appended to a mesh label to name its physical volume.
pub const PHYSICAL_SUFFIX: &str = ".phys";

/// One labelled mesh.
#[derive(Debug)]
pub struct InternalMesh {
    label: String,
    rank: u32,
    node_volume: Arc<LogicalVolume>,
    config: Properties,
    placement: Option<Arc<RegularMeshPlacement>>,
}

impl InternalMesh {
    /// Mesh label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Build rank; lower ranks are built first.
    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// Node logical volume.
    pub fn node_volume(&self) -> &LogicalVolume {
        &self.node_volume
    }

    /// Mesh configuration properties.
    pub fn config(&self) -> &Properties {
        &self.config
    }

    /// Built placement, once initialized.
    pub fn placement(&self) -> Option<&RegularMeshPlacement> {
        self.placement.as_deref()
    }

    /// Name of the physical volume placed in the mother.
    pub fn physical_name(&self) -> String {
        format!("{}{PHYSICAL_SUFFIX}", self.label)
    }
}

/// Ranked set of meshes sharing one mother volume.
#[derive(Debug, Default)]
pub struct InternalMeshes {
    meshes: Vec<InternalMesh>,
    checker: Option<Arc<dyn OverlapChecker>>,
}

impl InternalMeshes {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlap checker handed to every mesh; the default one otherwise.
    pub fn set_overlap_checker(&mut self, checker: Arc<dyn OverlapChecker>) {
        self.checker = Some(checker);
    }

    /// Number of meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// `true` when no mesh was added.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Look up a mesh by label.
    pub fn get(&self, label: &str) -> Option<&InternalMesh> {
        self.meshes.iter().find(|m| m.label == label)
    }

    /// Meshes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &InternalMesh> {
        self.meshes.iter()
    }

    /// Register a mesh.
    ///
    /// # Errors
    ///
    /// [`MeshError::EmptyLabel`], [`MeshError::DuplicateLabel`] or
    /// [`MeshError::DuplicateRank`].
    pub fn add_mesh(
        &mut self,
        label: impl Into<String>,
        node_volume: Arc<LogicalVolume>,
        rank: u32,
        config: Properties,
    ) -> Result<(), MeshError> {
        let label = label.into();
        if label.is_empty() {
            return Err(MeshError::EmptyLabel);
        }
        if self.get(&label).is_some() {
            return Err(MeshError::DuplicateLabel { label });
        }
        if let Some(other) = self.meshes.iter().find(|m| m.rank == rank) {
            return Err(MeshError::DuplicateRank {
                rank,
                label,
                existing: other.label.clone(),
            });
        }
        self.meshes.push(InternalMesh {
            label,
            rank,
            node_volume,
            config,
            placement: None,
        });
        Ok(())
    }

    /// Build every mesh in ascending rank order and place each one into
    /// `mother` as `"<label>.phys"`.
    ///
    /// When a mesh fails, the meshes built before it are removed from
    /// `mother` again and the set stays uninitialized.
    pub fn initialize(&mut self, mother: &mut LogicalVolume) -> Result<(), MeshError> {
        if self.meshes.iter().any(|m| m.placement.is_some()) {
            return Err(MeshError::AlreadyInitialized);
        }
        let mut order: Vec<usize> = (0..self.meshes.len()).collect();
        order.sort_by_key(|&i| self.meshes[i].rank);

        let mut placed: Vec<usize> = Vec::with_capacity(order.len());
        for i in order {
            if let Err(e) = self.build_mesh(i, mother) {
                for &j in placed.iter().rev() {
                    let mesh = &mut self.meshes[j];
                    mother.remove_physical(&mesh.physical_name());
                    mesh.placement = None;
                }
                warn!(
                    label = %self.meshes[i].label,
                    rolled_back = placed.len(),
                    "internal mesh failed"
                );
                return Err(e);
            }
            placed.push(i);
        }
        Ok(())
    }

    fn build_mesh(&mut self, i: usize, mother: &mut LogicalVolume) -> Result<(), MeshError> {
        let mesh = &mut self.meshes[i];
        let mut placement = RegularMeshPlacement::new();
        if let Some(checker) = &self.checker {
            placement.set_overlap_checker(Arc::clone(checker))?;
        }
        placement.initialize(mother, Some(mesh.node_volume.as_ref()), &mesh.config)?;
        debug!(
            label = %mesh.label,
            rank = mesh.rank,
            nodes = placement.number_of_nodes(),
            "internal mesh built"
        );
        let placement = Arc::new(placement);
        mother.add_physical(PhysicalVolume::new(
            mesh.physical_name(),
            Arc::clone(&mesh.node_volume),
            placement.clone(),
        ))?;
        mesh.placement = Some(placement);
        Ok(())
    }

    /// Read meshes from a configuration and build them.
    ///
    /// | Key | Meaning |
    /// |---|---|
    /// | `labels` | list of mesh labels |
    /// | `model.<label>` | name of the node model, looked up in `models` |
    /// | `rank.<label>` | non-negative build rank |
    /// | `placement.<label>.*` | mesh configuration, prefix removed |
    ///
    /// A configuration without `labels` declares no mesh.
    pub fn plug(
        &mut self,
        config: &Properties,
        mother: &mut LogicalVolume,
        models: &IndexMap<String, Arc<LogicalVolume>>,
    ) -> Result<(), MeshError> {
        if !config.has_key("labels") {
            return Ok(());
        }
        for label in config.fetch_strings("labels")? {
            let model = config.fetch_string(&format!("model.{label}"))?;
            let node_volume = models
                .get(model)
                .cloned()
                .ok_or_else(|| MeshError::UnknownModel {
                    label: label.clone(),
                    model: model.to_string(),
                })?;
            let raw_rank = config.fetch_integer(&format!("rank.{label}"))?;
            let rank = u32::try_from(raw_rank).map_err(|_| MeshError::InvalidRank {
                label: label.clone(),
                rank: raw_rank,
            })?;
            let mut mesh_config = Properties::new();
            config.export_and_rename_starting_with(
                &mut mesh_config,
                &format!("placement.{label}."),
                "",
            );
            self.add_mesh(label, node_volume, rank, mesh_config)?;
        }
        self.initialize(mother)
    }
}
