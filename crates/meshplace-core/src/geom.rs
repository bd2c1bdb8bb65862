//! Placements and axis-aligned bounding boxes.

use std::fmt;

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

/// Rigid placement of a child frame inside its mother frame.
///
/// Wraps a nalgebra [`Isometry3`]: translation of the child origin plus the
/// rotation of the child axes, both expressed in the mother frame.
///
/// # Examples
///
/// ```
/// use meshplace_core::{Placement, Point3};
///
/// let p = Placement::from_translation(1.0, 2.0, 3.0);
/// let q = p.child_to_mother(&Point3::new(1.0, 0.0, 0.0));
/// assert_eq!(q, Point3::new(2.0, 2.0, 3.0));
/// assert_eq!(p.mother_to_child(&q), Point3::new(1.0, 0.0, 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    iso: Isometry3<f64>,
}

impl Placement {
    /// The identity placement.
    pub fn identity() -> Self {
        Self {
            iso: Isometry3::identity(),
        }
    }

    /// Pure translation.
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            iso: Isometry3::translation(x, y, z),
        }
    }

    /// Translation plus rotation.
    pub fn new(translation: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            iso: Isometry3::from_parts(Translation3::from(translation), rotation),
        }
    }

    /// Translation plus a rotation by `angle` radians around the z axis.
    pub fn with_z_rotation(translation: Vector3<f64>, angle: f64) -> Self {
        Self::new(
            translation,
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle),
        )
    }

    /// Translation of the child origin in the mother frame.
    pub fn translation(&self) -> Vector3<f64> {
        self.iso.translation.vector
    }

    /// Rotation of the child axes.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.iso.rotation
    }

    /// `true` when the rotation is the identity.
    pub fn is_unrotated(&self) -> bool {
        self.iso.rotation.angle() == 0.0
    }

    /// Copy of this placement with its translation shifted by `offset`.
    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self::new(self.translation() + offset, self.rotation())
    }

    /// Map a point from the child frame to the mother frame.
    pub fn child_to_mother(&self, p: &Point3<f64>) -> Point3<f64> {
        self.iso.transform_point(p)
    }

    /// Map a point from the mother frame to the child frame.
    pub fn mother_to_child(&self, p: &Point3<f64>) -> Point3<f64> {
        self.iso.inverse_transform_point(p)
    }

    /// The underlying isometry.
    pub fn isometry(&self) -> &Isometry3<f64> {
        &self.iso
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Isometry3<f64>> for Placement {
    fn from(iso: Isometry3<f64>) -> Self {
        Self { iso }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.translation();
        let (roll, pitch, yaw) = self.rotation().euler_angles();
        write!(
            f,
            "({} {} {}) mm @ ({} {} {}) rad",
            t.x, t.y, t.z, roll, pitch, yaw
        )
    }
}

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Create a box from two corners; components are sorted per axis.
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Box of full dimensions `(dx, dy, dz)` centred on the origin.
    pub fn centered(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            min: Point3::new(-0.5 * dx, -0.5 * dy, -0.5 * dz),
            max: Point3::new(0.5 * dx, 0.5 * dy, 0.5 * dz),
        }
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Centre point.
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// `true` when `p` lies inside or on the box.
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Copy of this box grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vector3::repeat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// `true` when the interiors of the two boxes intersect.
    ///
    /// Boxes that only share a face, edge or corner do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
            && self.min.z < other.max.z
            && other.min.z < self.max.z
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned box enclosing this box once moved by `placement`.
    pub fn transformed(&self, placement: &Placement) -> Self {
        let mut corners = self.corners().into_iter().map(|c| placement.child_to_mother(&c));
        // corners() always yields eight points
        let first = corners.next().unwrap_or(self.min);
        let mut out = Self {
            min: first,
            max: first,
        };
        for c in corners {
            out.min = Point3::new(out.min.x.min(c.x), out.min.y.min(c.y), out.min.z.min(c.z));
            out.max = Point3::new(out.max.x.max(c.x), out.max.y.max(c.y), out.max.z.max(c.z));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn placement_roundtrip_with_rotation() {
        let p = Placement::with_z_rotation(Vector3::new(10.0, 0.0, 0.0), FRAC_PI_2);
        let local = Point3::new(1.0, 0.0, 0.0);
        let world = p.child_to_mother(&local);
        assert_relative_eq!(world, Point3::new(10.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(p.mother_to_child(&world), local, epsilon = 1e-12);
        assert!(!p.is_unrotated());
    }

    #[test]
    fn translated_keeps_rotation() {
        let p = Placement::with_z_rotation(Vector3::new(1.0, 2.0, 3.0), 0.3);
        let q = p.translated(&Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(q.translation(), Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(q.rotation(), p.rotation());
    }

    #[test]
    fn bbox_new_sorts_corners() {
        let b = BoundingBox::new(Point3::new(1.0, -1.0, 5.0), Point3::new(-1.0, 1.0, 0.0));
        assert_eq!(b.min, Point3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.max, Point3::new(1.0, 1.0, 5.0));
        assert_eq!(b.size(), Vector3::new(2.0, 2.0, 5.0));
        assert_eq!(b.center(), Point3::new(0.0, 0.0, 2.5));
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = BoundingBox::centered(2.0, 2.0, 2.0);
        let b = BoundingBox::new(Point3::new(1.0, -1.0, -1.0), Point3::new(3.0, 1.0, 1.0));
        assert!(!a.intersects(&b));
        let c = BoundingBox::new(Point3::new(0.5, -1.0, -1.0), Point3::new(3.0, 1.0, 1.0));
        assert!(a.intersects(&c));
    }

    #[test]
    fn transformed_box_of_rotated_slab() {
        let slab = BoundingBox::centered(4.0, 1.0, 1.0);
        let p = Placement::with_z_rotation(Vector3::zeros(), FRAC_PI_2);
        let t = slab.transformed(&p);
        assert_relative_eq!(t.size(), Vector3::new(1.0, 4.0, 1.0), epsilon = 1e-12);
    }
}
