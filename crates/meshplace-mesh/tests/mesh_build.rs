//! End-to-end builds of regular mesh placements inside mother volumes.

use std::sync::Arc;

use approx::assert_relative_eq;
use meshplace_core::{
    LogicalVolume, NodeCoord, NodeId, OverlapFlags, Placements, Point3, Properties, Vector3,
};
use meshplace_mesh::{Axis, MeshError, RegularMeshPlacement};
use meshplace_solids::{Cuboid, Sphere};
use meshplace_test_utils::{
    aabb_volume, box_mother, mother_with_block, AlwaysOverlapChecker, CountingOverlapChecker,
    UnboundedShape,
};
use proptest::prelude::*;

fn mesh_with_steps(step: f64) -> RegularMeshPlacement {
    let mut mesh = RegularMeshPlacement::new();
    mesh.set_steps(step, step, step).unwrap();
    mesh
}

fn coords(mesh: &RegularMeshPlacement) -> Vec<NodeCoord> {
    mesh.registry().unwrap().iter().map(|n| n.coord).collect()
}

// ── Plain lattices ──────────────────────────────────────────────

#[test]
fn two_nodes_per_axis_in_a_ten_mm_box() {
    let mut mesh = mesh_with_steps(5.0);
    mesh.initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap();

    assert_eq!(mesh.number_of_nodes(), 8);
    let reg = mesh.registry().unwrap();
    for (n, node) in reg.iter().enumerate() {
        assert_eq!(node.id, NodeId(n as u32));
        assert!(node.active);
    }
    // x outermost, z innermost
    assert_eq!(reg.find_by_id(NodeId(1)).unwrap().coord, NodeCoord::new(0, 0, 1));
    assert_eq!(reg.find_by_id(NodeId(2)).unwrap().coord, NodeCoord::new(0, 1, 0));
    assert_eq!(reg.find_by_id(NodeId(4)).unwrap().coord, NodeCoord::new(1, 0, 0));

    let translations: Vec<_> = mesh.iter_placements().map(|p| p.translation()).collect();
    assert_eq!(translations[0], Vector3::new(2.5, 2.5, 2.5));
    assert_eq!(translations[7], Vector3::new(7.5, 7.5, 7.5));
}

#[test]
fn five_nodes_per_axis_with_two_mm_step() {
    let mut mesh = mesh_with_steps(2.0);
    mesh.initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap();
    assert_eq!(mesh.number_of_nodes(), 125);
    assert_eq!(mesh.geometry().unwrap().samples, [4, 4, 4]);
    let last = mesh.placement(NodeId(124)).unwrap();
    assert_relative_eq!(last.translation(), Vector3::new(9.0, 9.0, 9.0));
}

#[test]
fn anisotropic_steps() {
    let mut mesh = RegularMeshPlacement::new();
    mesh.set_steps(5.0, 2.0, 10.0).unwrap();
    mesh.initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap();
    assert_eq!(mesh.number_of_nodes(), 2 * 5 * 1);
    assert_eq!(
        mesh.basic_placement().unwrap().translation(),
        Vector3::new(2.5, 1.0, 5.0)
    );
}

#[test]
fn candidates_on_the_mother_boundary_are_rejected() {
    let mut mesh = mesh_with_steps(5.0);
    mesh.set_starts(0.0, 0.0, 0.0).unwrap();
    mesh.set_start_x(5.0).unwrap();
    mesh.initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap();
    // x candidates 5 and 10: x = 10 lies on the mother surface
    assert_eq!(mesh.geometry().unwrap().min.x, 5.0);
    assert!(coords(&mesh).iter().all(|c| c.i == 0));
    assert_eq!(mesh.number_of_nodes(), 4);
}

#[test]
fn stop_restricts_the_enumeration() {
    let mut mesh = mesh_with_steps(2.0);
    mesh.set_stop(Axis::Z, 4.0).unwrap();
    mesh.initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap();
    // z candidates 1 and 3; 5 is beyond 4 + 0.2
    assert_eq!(mesh.number_of_nodes(), 5 * 5 * 2);
    assert!(coords(&mesh).iter().all(|c| c.k < 2));
}

#[test]
fn spherical_mother_keeps_interior_candidates() {
    let world = LogicalVolume::new("world", Arc::new(Sphere::new(5.0).unwrap()));
    let mut mesh = mesh_with_steps(2.0);
    mesh.initialize(&world, None, &Properties::new()).unwrap();
    // lattice -4..4 step 2, strictly within radius 5
    assert_eq!(mesh.number_of_nodes(), 81);
    for p in mesh.iter_placements() {
        assert!(p.translation().norm() < 5.0);
    }
}

// ── Daughters and node prototypes ───────────────────────────────

#[test]
fn daughter_removes_the_nodes_it_contains() {
    let mother = mother_with_block(10.0, Point3::new(5.0, 5.0, 5.0), 2.0);
    let mut mesh = mesh_with_steps(2.0);
    mesh.initialize(&mother, None, &Properties::new()).unwrap();
    assert_eq!(mesh.number_of_nodes(), 124);
    let reg = mesh.registry().unwrap();
    assert!(reg.find_by_coord(&NodeCoord::new(2, 2, 2)).is_none());
    assert!(reg.find_by_coord(&NodeCoord::new(1, 2, 2)).is_some());
}

#[test]
fn flush_prototypes_fill_the_mother() {
    let node = aabb_volume("cell", 2.0, 2.0, 2.0);
    let mut mesh = RegularMeshPlacement::new();
    mesh.initialize(&box_mother(10.0), Some(&node), &Properties::new())
        .unwrap();
    assert_eq!(mesh.steps(), Some(Vector3::new(2.0, 2.0, 2.0)));
    assert_eq!(mesh.number_of_nodes(), 125);
}

#[test]
fn flush_prototypes_touch_but_skip_a_daughter() {
    let mother = mother_with_block(10.0, Point3::new(5.0, 5.0, 5.0), 2.0);
    let node = aabb_volume("cell", 2.0, 2.0, 2.0);
    let mut mesh = RegularMeshPlacement::new();
    mesh.initialize(&mother, Some(&node), &Properties::new())
        .unwrap();
    assert_eq!(mesh.number_of_nodes(), 124);
}

#[test]
fn protruding_prototypes_are_rejected() {
    let node = LogicalVolume::new("cell", Arc::new(Cuboid::cube(3.0).unwrap()));
    let mut mesh = mesh_with_steps(2.0);
    mesh.initialize(&box_mother(10.0), Some(&node), &Properties::new())
        .unwrap();
    // only 3, 5 and 7 keep a 3 mm cube inside [0, 10]
    assert_eq!(mesh.number_of_nodes(), 27);
    assert!(coords(&mesh)
        .iter()
        .all(|c| (1..=3).contains(&c.i) && (1..=3).contains(&c.j) && (1..=3).contains(&c.k)));
}

#[test]
fn checker_rejecting_everything_leaves_an_empty_mesh() {
    let node = aabb_volume("cell", 2.0, 2.0, 2.0);
    let mut mesh = RegularMeshPlacement::new();
    mesh.set_overlap_checker(Arc::new(AlwaysOverlapChecker))
        .unwrap();
    mesh.initialize(&box_mother(10.0), Some(&node), &Properties::new())
        .unwrap();
    assert!(mesh.is_initialized());
    assert_eq!(mesh.number_of_nodes(), 0);
    assert_eq!(mesh.iter_placements().count(), 0);
}

#[test]
fn checker_is_consulted_once_per_free_candidate() {
    let checker = Arc::new(CountingOverlapChecker::new());
    let mother = mother_with_block(10.0, Point3::new(5.0, 5.0, 5.0), 2.0);
    let node = aabb_volume("cell", 2.0, 2.0, 2.0);
    let mut mesh = RegularMeshPlacement::new();
    mesh.set_overlap_checker(checker.clone()).unwrap();
    mesh.initialize(&mother, Some(&node), &Properties::new())
        .unwrap();
    assert_eq!(mesh.number_of_nodes(), 124);
    assert_eq!(checker.mother_checks(), 124);
    assert_eq!(checker.pair_checks(), 124);
}

#[test]
fn checker_is_skipped_without_a_prototype() {
    let checker = Arc::new(CountingOverlapChecker::new());
    let mut mesh = mesh_with_steps(5.0);
    mesh.set_overlap_checker(checker.clone()).unwrap();
    mesh.initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap();
    assert_eq!(checker.mother_checks(), 0);
    assert_eq!(checker.pair_checks(), 0);
}

// ── Configuration ───────────────────────────────────────────────

#[test]
fn properties_supply_steps_in_length_units() {
    let props = Properties::parse(
        "step_x : real as length = 0.5 cm\nstep_y : real = 5\nstep_z : real as length = 5 mm\n",
    )
    .unwrap();
    let mut mesh = RegularMeshPlacement::new();
    mesh.initialize(&box_mother(10.0), None, &props).unwrap();
    assert_eq!(mesh.steps(), Some(Vector3::new(5.0, 5.0, 5.0)));
    assert_eq!(mesh.number_of_nodes(), 8);
}

#[test]
fn setters_take_precedence_over_properties() {
    let props = Properties::parse("step_x : real = 1\nstep_y : real = 5\nstep_z : real = 5\n")
        .unwrap();
    let mut mesh = RegularMeshPlacement::new();
    mesh.set_step_x(5.0).unwrap();
    mesh.initialize(&box_mother(10.0), None, &props).unwrap();
    assert_eq!(mesh.steps().unwrap().x, 5.0);
}

#[test]
fn overlap_flags_come_from_properties() {
    let props = Properties::parse(
        "step_x : real = 5\nstep_y : real = 5\nstep_z : real = 5\n\
         overlapping.check_old_first : boolean = true\n\
         overlapping.high_sampling : boolean = true\n",
    )
    .unwrap();
    let mut mesh = RegularMeshPlacement::new();
    mesh.initialize(&box_mother(10.0), None, &props).unwrap();
    let flags = mesh.overlap_flags().unwrap();
    assert!(flags.contains(OverlapFlags::CHECK_OLD_FIRST));
    assert!(flags.contains(OverlapFlags::HIGH_SAMPLING));
    assert!(!flags.contains(OverlapFlags::OVERLAP_ALL));
}

#[test]
fn missing_step_leaves_the_placement_uninitialized() {
    let mut mesh = RegularMeshPlacement::new();
    mesh.set_step_x(5.0).unwrap();
    let err = mesh
        .initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap_err();
    assert!(matches!(err, MeshError::MissingStep { axis: Axis::Y }));
    assert!(!mesh.is_initialized());
    assert!(mesh.registry().is_none());
    assert_eq!(mesh.config().step(Axis::X), Some(5.0));

    // the same placement can still be completed and built
    mesh.set_step_y(5.0).unwrap();
    mesh.set_step_z(5.0).unwrap();
    mesh.initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap();
    assert_eq!(mesh.number_of_nodes(), 8);
}

#[test]
fn invalid_step_property_is_a_configuration_error() {
    let props = Properties::parse("step_x : real = -1\n").unwrap();
    let mut mesh = RegularMeshPlacement::new();
    let err = mesh
        .initialize(&box_mother(10.0), None, &props)
        .unwrap_err();
    assert!(matches!(err, MeshError::InvalidStep { axis: Axis::X, .. }));
    assert_eq!(err.kind(), meshplace_mesh::ErrorKind::Configuration);
}

#[test]
fn sub_nanometre_step_is_rejected_before_enumeration() {
    let mut mesh = RegularMeshPlacement::new();
    mesh.set_steps(1e-9, 10.0, 10.0).unwrap();
    let err = mesh
        .initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap_err();
    assert!(matches!(
        err,
        MeshError::TooManyCandidates { axis: Some(Axis::X), count } if count > 1e9
    ));
    assert_eq!(err.kind(), meshplace_mesh::ErrorKind::Configuration);
    assert!(!mesh.is_initialized());

    // a sane step afterwards still builds
    mesh.set_step_x(5.0).unwrap();
    mesh.initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap();
    assert_eq!(mesh.number_of_nodes(), 2);
}

#[test]
fn unbounded_mother_has_no_enumeration_domain() {
    let world = LogicalVolume::new("world", Arc::new(UnboundedShape));
    let mut mesh = mesh_with_steps(1.0);
    let err = mesh
        .initialize(&world, None, &Properties::new())
        .unwrap_err();
    assert!(matches!(err, MeshError::NoBoundingData { volume } if volume == "world"));
}

#[test]
fn unbounded_prototype_cannot_provide_steps() {
    let node = LogicalVolume::new("cell", Arc::new(UnboundedShape));
    let mut mesh = RegularMeshPlacement::new();
    let err = mesh
        .initialize(&box_mother(10.0), Some(&node), &Properties::new())
        .unwrap_err();
    assert!(matches!(err, MeshError::NoBoundingData { volume } if volume == "cell"));
}

// ── Lifecycle ───────────────────────────────────────────────────

#[test]
fn rebuilding_gives_the_same_nodes() {
    let mother = mother_with_block(10.0, Point3::new(3.0, 7.0, 5.0), 3.0);
    let node = aabb_volume("cell", 1.0, 1.0, 1.0);

    let mut first = RegularMeshPlacement::new();
    first.initialize(&mother, Some(&node), &Properties::new())
        .unwrap();
    let mut second = RegularMeshPlacement::new();
    second
        .initialize(&mother, Some(&node), &Properties::new())
        .unwrap();
    assert_eq!(first.registry(), second.registry());
}

#[test]
fn reset_allows_a_new_configuration() {
    let mut mesh = mesh_with_steps(5.0);
    mesh.initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap();
    mesh.reset().unwrap();
    mesh.set_steps(2.0, 2.0, 2.0).unwrap();
    mesh.initialize(&box_mother(10.0), None, &Properties::new())
        .unwrap();
    assert_eq!(mesh.number_of_nodes(), 125);
}

#[test]
fn mesh_can_be_placed_as_a_daughter() {
    let mut mother = box_mother(10.0);
    let node = Arc::new(aabb_volume("cell", 5.0, 5.0, 5.0));
    let mut mesh = RegularMeshPlacement::new();
    mesh.initialize(&mother, Some(&*node), &Properties::new())
        .unwrap();
    mother
        .add_physical(meshplace_core::PhysicalVolume::new(
            "cells",
            node,
            Arc::new(mesh),
        ))
        .unwrap();
    let phys = mother.physical("cells").unwrap();
    assert_eq!(phys.placement().number_of_items(), 8);
    let loc = mother.locate(&Point3::new(2.5, 2.5, 2.5), 1e-7);
    assert!(loc.is_inside_daughter());
}

proptest! {
    #[test]
    fn node_placements_follow_the_lattice(
        sx in 1.0f64..4.0,
        sy in 1.0f64..4.0,
        sz in 1.0f64..4.0,
    ) {
        let mut mesh = RegularMeshPlacement::new();
        mesh.set_steps(sx, sy, sz).unwrap();
        mesh.initialize(&box_mother(12.0), None, &Properties::new()).unwrap();
        let basic = mesh.basic_placement().unwrap().translation();
        prop_assert_eq!(basic, Vector3::new(sx / 2.0, sy / 2.0, sz / 2.0));
        for node in mesh.registry().unwrap().iter() {
            let t = mesh.placement(node.id).unwrap().translation();
            let expected = basic + Vector3::new(
                f64::from(node.coord.i) * sx,
                f64::from(node.coord.j) * sy,
                f64::from(node.coord.k) * sz,
            );
            prop_assert!((t - expected).norm() < 1e-9);
            prop_assert!(t.iter().all(|&v| v > 0.0 && v < 12.0));
        }
    }
}
