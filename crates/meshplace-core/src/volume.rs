//! Logical and physical volumes, and point location through a volume tree.
//!
//! A [`LogicalVolume`] pairs a [`Shape`] with the daughter
//! [`PhysicalVolume`]s already placed inside it. Point location answers the
//! question the mesh builder asks for every lattice candidate: is this point
//! in the free interior of the mother, i.e. inside the mother shape and
//! outside every daughter?

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use nalgebra::Point3;

use crate::error::VolumeError;
use crate::placements::Placements;
use crate::shape::{Shape, ShapeDomain};

/// A shape together with its placed daughters.
pub struct LogicalVolume {
    name: String,
    shape: Arc<dyn Shape>,
    physicals: IndexMap<String, PhysicalVolume>,
}

impl LogicalVolume {
    /// Create a volume with no daughters.
    pub fn new(name: impl Into<String>, shape: Arc<dyn Shape>) -> Self {
        Self {
            name: name.into(),
            shape,
            physicals: IndexMap::new(),
        }
    }

    /// Volume name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The volume's shape.
    pub fn shape(&self) -> &dyn Shape {
        self.shape.as_ref()
    }

    /// Daughter physical volumes in insertion order.
    pub fn physicals(&self) -> impl Iterator<Item = &PhysicalVolume> {
        self.physicals.values()
    }

    /// Number of daughter physical volumes.
    pub fn physical_count(&self) -> usize {
        self.physicals.len()
    }

    /// Look up a daughter by name.
    pub fn physical(&self, name: &str) -> Option<&PhysicalVolume> {
        self.physicals.get(name)
    }

    /// Place a daughter inside this volume.
    pub fn add_physical(&mut self, physical: PhysicalVolume) -> Result<(), VolumeError> {
        if self.physicals.contains_key(&physical.name) {
            return Err(VolumeError::DuplicatePhysical {
                mother: self.name.clone(),
                name: physical.name,
            });
        }
        self.physicals.insert(physical.name.clone(), physical);
        Ok(())
    }

    /// Remove a daughter, keeping the order of the others.
    pub fn remove_physical(&mut self, name: &str) -> Option<PhysicalVolume> {
        self.physicals.shift_remove(name)
    }

    /// Locate a point given in this volume's frame.
    ///
    /// Daughters are only probed when the point is not outside the mother
    /// shape. The first daughter item that contains the point (inside or on
    /// its surface) is reported.
    pub fn locate(&self, point: &Point3<f64>, tolerance: f64) -> Location {
        let domain = self.shape.locate(point, tolerance);
        if domain == ShapeDomain::Outside {
            return Location {
                domain,
                daughter: None,
            };
        }
        for phys in self.physicals.values() {
            if let Some(hit) = phys.locate(point, tolerance) {
                return Location {
                    domain,
                    daughter: Some(hit),
                };
            }
        }
        Location {
            domain,
            daughter: None,
        }
    }
}

impl fmt::Debug for LogicalVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogicalVolume")
            .field("name", &self.name)
            .field("shape", &self.shape.shape_name())
            .field("physicals", &self.physicals.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A logical volume instanced inside a mother through a placement scheme.
#[derive(Clone)]
pub struct PhysicalVolume {
    name: String,
    logical: Arc<LogicalVolume>,
    placement: Arc<dyn Placements>,
}

impl PhysicalVolume {
    /// Create a physical volume.
    pub fn new(
        name: impl Into<String>,
        logical: Arc<LogicalVolume>,
        placement: Arc<dyn Placements>,
    ) -> Self {
        Self {
            name: name.into(),
            logical,
            placement,
        }
    }

    /// Physical volume name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The instanced logical volume.
    pub fn logical(&self) -> &LogicalVolume {
        &self.logical
    }

    /// The placement scheme.
    pub fn placement(&self) -> &dyn Placements {
        self.placement.as_ref()
    }

    /// First item of this volume whose shape contains `point` (mother frame).
    fn locate(&self, point: &Point3<f64>, tolerance: f64) -> Option<DaughterHit> {
        let shape = self.logical.shape();
        let bounds = shape.bounding_box().map(|bb| bb.expanded(tolerance));
        for (item, placement) in self.placement.iter_placements().enumerate() {
            let local = placement.mother_to_child(point);
            if let Some(bb) = &bounds {
                if !bb.contains(&local) {
                    continue;
                }
            }
            let domain = shape.locate(&local, tolerance);
            if domain != ShapeDomain::Outside {
                return Some(DaughterHit {
                    name: self.name.clone(),
                    item,
                    domain,
                });
            }
        }
        None
    }
}

impl fmt::Debug for PhysicalVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicalVolume")
            .field("name", &self.name)
            .field("logical", &self.logical.name())
            .field("items", &self.placement.number_of_items())
            .finish()
    }
}

/// A daughter item containing a located point.
#[derive(Clone, Debug, PartialEq)]
pub struct DaughterHit {
    /// Daughter physical volume name.
    pub name: String,
    /// Item number within the daughter's placement.
    pub item: usize,
    /// [`ShapeDomain::Inside`] or [`ShapeDomain::Surface`].
    pub domain: ShapeDomain,
}

/// Result of [`LogicalVolume::locate`].
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    /// Position relative to the mother shape itself.
    pub domain: ShapeDomain,
    /// Daughter containing the point, if any.
    pub daughter: Option<DaughterHit>,
}

impl Location {
    /// Strictly inside the mother shape (daughters ignored).
    pub fn is_inside(&self) -> bool {
        self.domain == ShapeDomain::Inside
    }

    /// Strictly inside a daughter.
    pub fn is_inside_daughter(&self) -> bool {
        matches!(&self.daughter, Some(h) if h.domain == ShapeDomain::Inside)
    }

    /// On the surface of a daughter.
    pub fn is_on_daughter_surface(&self) -> bool {
        matches!(&self.daughter, Some(h) if h.domain == ShapeDomain::Surface)
    }

    /// Strictly inside the mother and clear of every daughter.
    pub fn is_free_interior(&self) -> bool {
        self.is_inside() && self.daughter.is_none()
    }
}
