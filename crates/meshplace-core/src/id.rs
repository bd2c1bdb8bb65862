//! Mesh node identifiers and lattice coordinates.

use std::cmp::Ordering;
use std::fmt;

use crate::error::CoordError;

/// Sequential identifier of an accepted mesh node.
///
/// Ids are assigned from 0 in enumeration order, so `NodeId(n)` is the
/// n-th node accepted by the builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Integer lattice index `(i, j, k)` of a mesh cell.
///
/// A coordinate is valid when every component is non-negative. The default
/// value is the invalid coordinate `(-1, -1, -1)`.
///
/// The derived ordering is lexicographic on `i`, then `j`, then `k`. Use
/// [`try_cmp`](Self::try_cmp) where either side may be invalid.
///
/// # Examples
///
/// ```
/// use meshplace_core::NodeCoord;
///
/// let a = NodeCoord::new(0, 1, 2);
/// let b = NodeCoord::new(0, 2, 0);
/// assert!(a < b);
/// assert!(!NodeCoord::default().is_valid());
/// assert_eq!(a.to_string(), "[0:1:2]");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeCoord {
    /// Index along the x axis.
    pub i: i32,
    /// Index along the y axis.
    pub j: i32,
    /// Index along the z axis.
    pub k: i32,
}

impl NodeCoord {
    /// The invalid coordinate `(-1, -1, -1)`.
    pub const INVALID: Self = Self { i: -1, j: -1, k: -1 };

    /// Create a coordinate from its three components.
    pub const fn new(i: i32, j: i32, k: i32) -> Self {
        Self { i, j, k }
    }

    /// Same as [`NodeCoord::INVALID`].
    pub const fn invalid() -> Self {
        Self::INVALID
    }

    /// Overwrite all three components.
    pub fn set(&mut self, i: i32, j: i32, k: i32) {
        self.i = i;
        self.j = j;
        self.k = k;
    }

    /// Reset to the invalid coordinate.
    pub fn invalidate(&mut self) {
        *self = Self::INVALID;
    }

    /// `true` when all components are non-negative.
    pub fn is_valid(&self) -> bool {
        self.i >= 0 && self.j >= 0 && self.k >= 0
    }

    /// Lexicographic comparison that refuses invalid coordinates.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, CoordError> {
        for c in [self, other] {
            if !c.is_valid() {
                return Err(CoordError::Invalid { coord: *c });
            }
        }
        Ok(self.cmp(other))
    }

    /// The components as an array.
    pub fn to_array(self) -> [i32; 3] {
        [self.i, self.j, self.k]
    }
}

impl Default for NodeCoord {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NodeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}:{}]", self.i, self.j, self.k)
    }
}

/// One accepted lattice position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshNode {
    /// Sequential node id.
    pub id: NodeId,
    /// Lattice coordinate.
    pub coord: NodeCoord,
    /// Always `true` for nodes produced by the builder.
    pub active: bool,
}

impl MeshNode {
    /// Create an active node.
    pub fn new(id: NodeId, coord: NodeCoord) -> Self {
        Self {
            id,
            coord,
            active: true,
        }
    }
}
