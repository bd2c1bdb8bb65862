//! Multi-item placements: the addressing scheme used to instance a logical
//! volume several times inside its mother.

use std::fmt;

use smallvec::{smallvec, SmallVec};

use crate::geom::Placement;

/// Integer address of one item of a multi-item placement.
///
/// Inline capacity of 4 covers every placement scheme in the workspace
/// (single, list, 3D mesh) without heap allocation.
pub type ItemIndex = SmallVec<[u32; 4]>;

/// A set of placements addressed by item number `0..number_of_items()`.
///
/// # Object Safety
///
/// Used as `dyn Placements` inside [`PhysicalVolume`](crate::PhysicalVolume).
pub trait Placements: fmt::Debug + Send + Sync {
    /// Number of placed items.
    fn number_of_items(&self) -> usize;

    /// Placement of one item, or `None` when `item` is out of range.
    fn placement(&self, item: usize) -> Option<Placement>;

    /// Number of integer indices addressing an item.
    fn dimension(&self) -> usize;

    /// `true` when all items share the same rotation.
    fn has_only_one_rotation(&self) -> bool;

    /// `true` for replica-style placements (volume fully divided).
    fn is_replica(&self) -> bool;

    /// Integer address of `item`, or `None` when out of range.
    fn compute_index_map(&self, item: usize) -> Option<ItemIndex>;

    /// Iterate over all item placements in item order.
    ///
    /// Default implementation calls [`placement`](Self::placement) per item.
    fn iter_placements<'a>(&'a self) -> Box<dyn Iterator<Item = Placement> + 'a> {
        Box::new((0..self.number_of_items()).filter_map(move |i| self.placement(i)))
    }
}

impl Placements for Placement {
    fn number_of_items(&self) -> usize {
        1
    }

    fn placement(&self, item: usize) -> Option<Placement> {
        (item == 0).then_some(*self)
    }

    fn dimension(&self) -> usize {
        0
    }

    fn has_only_one_rotation(&self) -> bool {
        true
    }

    fn is_replica(&self) -> bool {
        false
    }

    fn compute_index_map(&self, item: usize) -> Option<ItemIndex> {
        (item == 0).then(SmallVec::new)
    }
}

/// An explicit list of placements, addressed by their position in the list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementList {
    items: Vec<Placement>,
}

impl PlacementList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a placement.
    pub fn push(&mut self, placement: Placement) {
        self.items.push(placement);
    }

    /// All placements.
    pub fn as_slice(&self) -> &[Placement] {
        &self.items
    }
}

impl FromIterator<Placement> for PlacementList {
    fn from_iter<I: IntoIterator<Item = Placement>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Placements for PlacementList {
    fn number_of_items(&self) -> usize {
        self.items.len()
    }

    fn placement(&self, item: usize) -> Option<Placement> {
        self.items.get(item).copied()
    }

    fn dimension(&self) -> usize {
        1
    }

    fn has_only_one_rotation(&self) -> bool {
        match self.items.split_first() {
            Some((first, rest)) => rest.iter().all(|p| p.rotation() == first.rotation()),
            None => true,
        }
    }

    fn is_replica(&self) -> bool {
        false
    }

    fn compute_index_map(&self, item: usize) -> Option<ItemIndex> {
        (item < self.items.len()).then(|| smallvec![item as u32])
    }
}
