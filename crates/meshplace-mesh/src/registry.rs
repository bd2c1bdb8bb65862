//! Storage of accepted mesh nodes, indexed by id and by coordinate.

use std::collections::BTreeMap;

use meshplace_core::{MeshNode, NodeCoord, NodeId};

use crate::error::RegistryError;

/// Accepted nodes with unique ids and unique coordinates.
///
/// Nodes live in one backing vector; two ordered indices map ids and
/// coordinates to positions in it.
///
/// # Examples
///
/// ```
/// use meshplace_core::{MeshNode, NodeCoord, NodeId};
/// use meshplace_mesh::NodeRegistry;
///
/// let mut reg = NodeRegistry::new();
/// reg.insert(MeshNode::new(NodeId(0), NodeCoord::new(0, 0, 0))).unwrap();
/// reg.insert(MeshNode::new(NodeId(1), NodeCoord::new(0, 0, 1))).unwrap();
///
/// assert_eq!(reg.len(), 2);
/// let node = reg.find_by_coord(&NodeCoord::new(0, 0, 1)).unwrap();
/// assert_eq!(node.id, NodeId(1));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeRegistry {
    nodes: Vec<MeshNode>,
    by_id: BTreeMap<NodeId, usize>,
    by_coord: BTreeMap<NodeCoord, usize>,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from nodes, failing on the first rejected node.
    pub fn try_from_nodes<I>(nodes: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = MeshNode>,
    {
        let mut reg = Self::new();
        for node in nodes {
            reg.insert(node)?;
        }
        Ok(reg)
    }

    /// Register a node.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidCoord`] for a coordinate with a negative
    /// component, [`RegistryError::DuplicateId`] or
    /// [`RegistryError::DuplicateCoord`] when either key is already used.
    /// The registry is unchanged on error.
    pub fn insert(&mut self, node: MeshNode) -> Result<(), RegistryError> {
        if !node.coord.is_valid() {
            return Err(RegistryError::InvalidCoord {
                id: node.id,
                coord: node.coord,
            });
        }
        if self.by_id.contains_key(&node.id) {
            return Err(RegistryError::DuplicateId { id: node.id });
        }
        if let Some(&pos) = self.by_coord.get(&node.coord) {
            return Err(RegistryError::DuplicateCoord {
                coord: node.coord,
                existing: self.nodes[pos].id,
            });
        }
        let pos = self.nodes.len();
        self.nodes.push(node);
        self.by_id.insert(node.id, pos);
        self.by_coord.insert(node.coord, pos);
        Ok(())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when no node is registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id.
    pub fn find_by_id(&self, id: NodeId) -> Option<&MeshNode> {
        self.by_id.get(&id).map(|&pos| &self.nodes[pos])
    }

    /// Look up a node by coordinate.
    pub fn find_by_coord(&self, coord: &NodeCoord) -> Option<&MeshNode> {
        self.by_coord.get(coord).map(|&pos| &self.nodes[pos])
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.by_id.clear();
        self.by_coord.clear();
    }

    /// Nodes in id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &MeshNode> + '_ {
        self.by_id.values().map(move |&pos| &self.nodes[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn node(id: u32, i: i32, j: i32, k: i32) -> MeshNode {
        MeshNode::new(NodeId(id), NodeCoord::new(i, j, k))
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut reg = NodeRegistry::new();
        reg.insert(node(0, 0, 0, 0)).unwrap();
        assert_eq!(
            reg.insert(node(0, 1, 0, 0)),
            Err(RegistryError::DuplicateId { id: NodeId(0) })
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn duplicate_coord_rejected() {
        let mut reg = NodeRegistry::new();
        reg.insert(node(0, 1, 2, 3)).unwrap();
        assert_eq!(
            reg.insert(node(1, 1, 2, 3)),
            Err(RegistryError::DuplicateCoord {
                coord: NodeCoord::new(1, 2, 3),
                existing: NodeId(0)
            })
        );
        assert!(reg.find_by_id(NodeId(1)).is_none());
    }

    #[test]
    fn invalid_coord_rejected() {
        let mut reg = NodeRegistry::new();
        assert!(matches!(
            reg.insert(node(0, -1, 0, 0)),
            Err(RegistryError::InvalidCoord { .. })
        ));
        assert!(reg.is_empty());
    }

    #[test]
    fn iteration_is_in_id_order() {
        let reg = NodeRegistry::try_from_nodes([node(2, 0, 0, 2), node(0, 0, 0, 0), node(1, 0, 0, 1)])
            .unwrap();
        let ids: Vec<_> = reg.iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn clear_empties_both_indices() {
        let mut reg = NodeRegistry::try_from_nodes([node(0, 0, 0, 0)]).unwrap();
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.find_by_coord(&NodeCoord::new(0, 0, 0)).is_none());
        reg.insert(node(0, 0, 0, 0)).unwrap();
    }

    proptest! {
        #[test]
        fn lookups_agree(coords in prop::collection::btree_set((0i32..20, 0i32..20, 0i32..20), 0..60)) {
            let reg = NodeRegistry::try_from_nodes(
                coords.iter().enumerate().map(|(n, &(i, j, k))| node(n as u32, i, j, k)),
            ).unwrap();
            prop_assert_eq!(reg.len(), coords.len());
            for n in reg.iter() {
                prop_assert_eq!(reg.find_by_id(n.id), Some(n));
                prop_assert_eq!(reg.find_by_coord(&n.coord), Some(n));
            }
        }
    }
}
