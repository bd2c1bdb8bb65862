//! Benchmark profiles and utilities for meshplace.
//!
//! Provides pre-built volume setups for benchmarking:
//!
//! - [`reference_world`]: 100 mm cube holding a 30 mm sphere
//! - [`stress_world`]: 400 mm cube crossed by a row of cylinders
//! - [`reference_mesh`]: unbuilt placement with the given cell pitch

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use meshplace_core::{LogicalVolume, PhysicalVolume, Placement};
use meshplace_mesh::RegularMeshPlacement;
use meshplace_solids::{Cuboid, Cylinder, Sphere};

/// 100 mm cube with a 30 mm sphere at its centre.
///
/// At a 10 mm pitch the lattice has 1000 candidates; the sphere removes the
/// central ones.
pub fn reference_world() -> LogicalVolume {
    let mut world = LogicalVolume::new("world", Arc::new(Cuboid::cube(100.0).unwrap()));
    let ball = Arc::new(LogicalVolume::new("ball", Arc::new(Sphere::new(15.0).unwrap())));
    world
        .add_physical(PhysicalVolume::new(
            "ball.phys",
            ball,
            Arc::new(Placement::identity()),
        ))
        .unwrap();
    world
}

/// 400 mm cube with seven full-height rods along z, spaced along x.
///
/// Every accepted node is tested against all rods, which makes the pair
/// check dominate the build.
pub fn stress_world() -> LogicalVolume {
    let mut world = LogicalVolume::new("world", Arc::new(Cuboid::cube(400.0).unwrap()));
    let rod = Arc::new(LogicalVolume::new(
        "rod",
        Arc::new(Cylinder::new(10.0, 400.0).unwrap()),
    ));
    for n in 0..7 {
        let x = -150.0 + 50.0 * f64::from(n);
        world
            .add_physical(PhysicalVolume::new(
                format!("rod{n}.phys"),
                Arc::clone(&rod),
                Arc::new(Placement::from_translation(x, 0.0, 0.0)),
            ))
            .unwrap();
    }
    world
}

/// Cubic node volume of side `pitch`.
pub fn cell(pitch: f64) -> LogicalVolume {
    LogicalVolume::new("cell", Arc::new(Cuboid::cube(pitch).unwrap()))
}

/// Unbuilt placement with all three steps set to `pitch`.
pub fn reference_mesh(pitch: f64) -> RegularMeshPlacement {
    let mut mesh = RegularMeshPlacement::new();
    mesh.set_steps(pitch, pitch, pitch).unwrap();
    mesh
}
