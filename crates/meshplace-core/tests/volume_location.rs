//! Point location through a small volume tree built from a local cube shape.

use std::sync::Arc;

use meshplace_core::{
    BoundingBox, LogicalVolume, OverlapChecker, OverlapFlags, PhysicalVolume, Placement,
    PlacementList, Point3, SamplingDensity, SamplingOverlapChecker, Shape, ShapeDomain,
    VolumeError, GEOMETRY_TOLERANCE,
};

#[derive(Debug)]
struct Cube {
    half: f64,
}

impl Shape for Cube {
    fn shape_name(&self) -> &str {
        "cube"
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        let d = 2.0 * self.half;
        Some(BoundingBox::centered(d, d, d))
    }

    fn locate(&self, p: &Point3<f64>, tolerance: f64) -> ShapeDomain {
        let d = p.x.abs().max(p.y.abs()).max(p.z.abs()) - self.half;
        ShapeDomain::from_signed_distance(d, tolerance)
    }

    fn surface_samples(&self, _density: SamplingDensity) -> Vec<Point3<f64>> {
        BoundingBox::centered(2.0 * self.half, 2.0 * self.half, 2.0 * self.half)
            .corners()
            .to_vec()
    }
}

fn cube(half: f64) -> Arc<dyn Shape> {
    Arc::new(Cube { half })
}

fn world_with_block() -> LogicalVolume {
    let mut world = LogicalVolume::new("world", cube(10.0));
    let block = Arc::new(LogicalVolume::new("block", cube(1.0)));
    let at: PlacementList = [
        Placement::from_translation(5.0, 0.0, 0.0),
        Placement::from_translation(-5.0, 0.0, 0.0),
    ]
    .into_iter()
    .collect();
    world
        .add_physical(PhysicalVolume::new("block.phys", block, Arc::new(at)))
        .unwrap();
    world
}

#[test]
fn free_interior_point() {
    let world = world_with_block();
    let loc = world.locate(&Point3::new(0.0, 0.0, 0.0), GEOMETRY_TOLERANCE);
    assert!(loc.is_free_interior());
}

#[test]
fn point_inside_second_item() {
    let world = world_with_block();
    let loc = world.locate(&Point3::new(-5.5, 0.0, 0.0), GEOMETRY_TOLERANCE);
    assert!(loc.is_inside());
    assert!(loc.is_inside_daughter());
    let hit = loc.daughter.unwrap();
    assert_eq!(hit.name, "block.phys");
    assert_eq!(hit.item, 1);
}

#[test]
fn point_on_daughter_surface() {
    let world = world_with_block();
    let loc = world.locate(&Point3::new(4.0, 0.0, 0.0), GEOMETRY_TOLERANCE);
    assert!(loc.is_on_daughter_surface());
    assert!(!loc.is_free_interior());
}

#[test]
fn point_outside_mother_skips_daughters() {
    let world = world_with_block();
    let loc = world.locate(&Point3::new(20.0, 0.0, 0.0), GEOMETRY_TOLERANCE);
    assert_eq!(loc.domain, ShapeDomain::Outside);
    assert!(loc.daughter.is_none());
}

#[test]
fn duplicate_physical_name_rejected() {
    let mut world = world_with_block();
    let block = Arc::new(LogicalVolume::new("other", cube(1.0)));
    let err = world
        .add_physical(PhysicalVolume::new(
            "block.phys",
            block,
            Arc::new(Placement::identity()),
        ))
        .unwrap_err();
    assert!(matches!(err, VolumeError::DuplicatePhysical { .. }));
    assert_eq!(world.physical_count(), 1);
}

#[test]
fn removed_daughter_frees_its_space_and_name() {
    let mut world = world_with_block();
    let ring = Arc::new(LogicalVolume::new("ring", cube(1.0)));
    world
        .add_physical(PhysicalVolume::new(
            "ring.phys",
            ring,
            Arc::new(Placement::from_translation(0.0, 5.0, 0.0)),
        ))
        .unwrap();

    let removed = world.remove_physical("block.phys").unwrap();
    assert_eq!(removed.logical().name(), "block");
    assert!(world.remove_physical("block.phys").is_none());
    let names: Vec<_> = world.physicals().map(|p| p.name()).collect();
    assert_eq!(names, ["ring.phys"]);
    let loc = world.locate(&Point3::new(5.0, 0.0, 0.0), GEOMETRY_TOLERANCE);
    assert!(loc.is_free_interior());

    world.add_physical(removed).unwrap();
    assert_eq!(world.physical_count(), 2);
}

#[test]
fn corner_probes_detect_protrusion_and_overlap() {
    let checker = SamplingOverlapChecker::new();
    let mother = Cube { half: 10.0 };
    let small = Cube { half: 1.0 };

    let inside = Placement::from_translation(0.0, 0.0, 0.0);
    assert!(!checker
        .mother_daughter_overlap(&mother, &small, &inside, OverlapFlags::NONE)
        .has_overlap());

    let flush = Placement::from_translation(9.0, 0.0, 0.0);
    assert!(!checker
        .mother_daughter_overlap(&mother, &small, &flush, OverlapFlags::NONE)
        .has_overlap());

    let protruding = Placement::from_translation(9.5, 0.0, 0.0);
    let report = checker.mother_daughter_overlap(&mother, &small, &protruding, OverlapFlags::OVERLAP_ALL);
    assert_eq!(report.points.len(), 4);

    let a = Placement::from_translation(0.0, 0.0, 0.0);
    let b = Placement::from_translation(1.5, 1.5, 1.5);
    assert!(checker
        .two_volumes_overlap(&small, &a, &small, &b, OverlapFlags::NONE)
        .has_overlap());

    let touching = Placement::from_translation(2.0, 0.0, 0.0);
    assert!(!checker
        .two_volumes_overlap(&small, &a, &small, &touching, OverlapFlags::NONE)
        .has_overlap());
}

#[test]
fn inhibit_second_only_probes_one_direction() {
    let checker = SamplingOverlapChecker::new();
    let big = Cube { half: 5.0 };
    let small = Cube { half: 1.0 };
    let origin = Placement::identity();

    // The small cube sits fully inside the big one: only the small cube's
    // corners are inside the other solid.
    let flags = OverlapFlags::CHECK_INHIBIT_SECOND;
    assert!(!checker
        .two_volumes_overlap(&big, &origin, &small, &origin, flags)
        .has_overlap());
    assert!(checker
        .two_volumes_overlap(&big, &origin, &small, &origin, flags | OverlapFlags::CHECK_OLD_FIRST)
        .has_overlap());
    assert!(checker
        .two_volumes_overlap(&big, &origin, &small, &origin, OverlapFlags::NONE)
        .has_overlap());
}
