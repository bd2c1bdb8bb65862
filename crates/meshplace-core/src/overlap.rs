//! Overlap detection between placed solids.
//!
//! The mesh builder only needs two questions answered: does a daughter
//! placed inside a mother cross the mother boundary, and do two placed
//! solids interpenetrate? [`OverlapChecker`] is the seam; the default
//! [`SamplingOverlapChecker`] probes surface samples of one solid against
//! the other.

use std::fmt;
use std::ops::BitOr;

use nalgebra::Point3;

use crate::geom::Placement;
use crate::properties::Properties;
use crate::shape::{SamplingDensity, Shape, GEOMETRY_TOLERANCE};

/// Property key prefix of the overlap flags.
pub const OVERLAP_KEY_PREFIX: &str = "overlapping.";

/// Bit set of overlap check options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OverlapFlags(u32);

impl OverlapFlags {
    /// No option set.
    pub const NONE: Self = Self(0);
    /// Probe the previously placed solid first.
    pub const CHECK_OLD_FIRST: Self = Self(1 << 0);
    /// Only probe in one direction.
    pub const CHECK_INHIBIT_SECOND: Self = Self(1 << 1);
    /// Collect every overlapping sample instead of stopping at the first.
    pub const OVERLAP_ALL: Self = Self(1 << 2);
    /// Coarse surface sampling.
    pub const LOW_SAMPLING: Self = Self(1 << 3);
    /// Fine surface sampling.
    pub const HIGH_SAMPLING: Self = Self(1 << 4);
    /// Very fine surface sampling.
    pub const VERY_HIGH_SAMPLING: Self = Self(1 << 5);
    /// Exhaustive surface sampling.
    pub const HUGE_SAMPLING: Self = Self(1 << 6);

    const SAMPLING_MASK: u32 = Self::LOW_SAMPLING.0
        | Self::HIGH_SAMPLING.0
        | Self::VERY_HIGH_SAMPLING.0
        | Self::HUGE_SAMPLING.0;

    /// Raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// `true` when every bit of `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Sampling density selected by the flags. When several sampling flags
    /// are set the densest wins; with none set the density is
    /// [`SamplingDensity::Normal`].
    pub fn density(self) -> SamplingDensity {
        if self.contains(Self::HUGE_SAMPLING) {
            SamplingDensity::Huge
        } else if self.contains(Self::VERY_HIGH_SAMPLING) {
            SamplingDensity::VeryHigh
        } else if self.contains(Self::HIGH_SAMPLING) {
            SamplingDensity::High
        } else if self.contains(Self::LOW_SAMPLING) {
            SamplingDensity::Low
        } else {
            SamplingDensity::Normal
        }
    }

    /// Read flags from `overlapping.*` boolean keys.
    ///
    /// At most one sampling flag is kept, with precedence huge, very high,
    /// high, low.
    pub fn from_properties(props: &Properties) -> Self {
        let flag = |name: &str| props.has_flag(&format!("{OVERLAP_KEY_PREFIX}{name}"));
        let mut flags = Self::NONE;
        if flag("check_old_first") {
            flags.insert(Self::CHECK_OLD_FIRST);
        }
        if flag("check_inhibit_second") {
            flags.insert(Self::CHECK_INHIBIT_SECOND);
        }
        if flag("overlap_all") {
            flags.insert(Self::OVERLAP_ALL);
        }
        if flag("huge_sampling") {
            flags.insert(Self::HUGE_SAMPLING);
        } else if flag("very_high_sampling") {
            flags.insert(Self::VERY_HIGH_SAMPLING);
        } else if flag("high_sampling") {
            flags.insert(Self::HIGH_SAMPLING);
        } else if flag("low_sampling") {
            flags.insert(Self::LOW_SAMPLING);
        }
        flags
    }

    /// `true` when more than one sampling flag is set.
    pub fn has_conflicting_sampling(self) -> bool {
        (self.0 & Self::SAMPLING_MASK).count_ones() > 1
    }
}

impl BitOr for OverlapFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for OverlapFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(OverlapFlags, &str); 7] = [
            (OverlapFlags::CHECK_OLD_FIRST, "check_old_first"),
            (OverlapFlags::CHECK_INHIBIT_SECOND, "check_inhibit_second"),
            (OverlapFlags::OVERLAP_ALL, "overlap_all"),
            (OverlapFlags::LOW_SAMPLING, "low_sampling"),
            (OverlapFlags::HIGH_SAMPLING, "high_sampling"),
            (OverlapFlags::VERY_HIGH_SAMPLING, "very_high_sampling"),
            (OverlapFlags::HUGE_SAMPLING, "huge_sampling"),
        ];
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        if first {
            write!(f, "none")?;
        }
        Ok(())
    }
}

/// Sample points (mother frame) found in the forbidden region.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlapReport {
    /// Offending points.
    pub points: Vec<Point3<f64>>,
}

impl OverlapReport {
    /// `true` when at least one overlap was found.
    pub fn has_overlap(&self) -> bool {
        !self.points.is_empty()
    }
}

/// Overlap tests used when placing node prototypes.
///
/// Shapes are given in their local frames; placements map them into the
/// common (mother) frame.
pub trait OverlapChecker: fmt::Debug + Send + Sync {
    /// Points of `daughter` (placed by `placement` in the mother frame) that
    /// lie outside `mother`.
    fn mother_daughter_overlap(
        &self,
        mother: &dyn Shape,
        daughter: &dyn Shape,
        placement: &Placement,
        flags: OverlapFlags,
    ) -> OverlapReport;

    /// Points where `first` and `second` interpenetrate. `second` is the
    /// previously placed solid.
    fn two_volumes_overlap(
        &self,
        first: &dyn Shape,
        first_placement: &Placement,
        second: &dyn Shape,
        second_placement: &Placement,
        flags: OverlapFlags,
    ) -> OverlapReport;
}

/// Overlap checker probing surface samples of one solid against the other.
///
/// Touching solids do not overlap: only samples strictly inside (or strictly
/// outside, for the mother test) beyond the tolerance are reported.
#[derive(Clone, Debug)]
pub struct SamplingOverlapChecker {
    tolerance: f64,
}

impl SamplingOverlapChecker {
    /// Checker using [`GEOMETRY_TOLERANCE`].
    pub fn new() -> Self {
        Self {
            tolerance: GEOMETRY_TOLERANCE,
        }
    }

    /// Checker with a custom surface tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Surface tolerance in use.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Samples of `probe` (placed by `probe_at`) strictly inside `target`
    /// (placed by `target_at`).
    fn probe_inside(
        &self,
        probe: &dyn Shape,
        probe_at: &Placement,
        target: &dyn Shape,
        target_at: &Placement,
        flags: OverlapFlags,
        report: &mut OverlapReport,
    ) {
        for sample in probe.surface_samples(flags.density()) {
            let world = probe_at.child_to_mother(&sample);
            let local = target_at.mother_to_child(&world);
            if target.check_inside(&local, self.tolerance) {
                report.points.push(world);
                if !flags.contains(OverlapFlags::OVERLAP_ALL) {
                    return;
                }
            }
        }
    }
}

impl Default for SamplingOverlapChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlapChecker for SamplingOverlapChecker {
    fn mother_daughter_overlap(
        &self,
        mother: &dyn Shape,
        daughter: &dyn Shape,
        placement: &Placement,
        flags: OverlapFlags,
    ) -> OverlapReport {
        let mut report = OverlapReport::default();
        if let (Some(mb), Some(db)) = (mother.bounding_box(), daughter.bounding_box()) {
            let outer = db.transformed(placement);
            if !mb.intersects(&outer) {
                tracing::debug!("daughter bounding box lies outside the mother");
                report.points.push(outer.center());
                return report;
            }
        }
        for sample in daughter.surface_samples(flags.density()) {
            let world = placement.child_to_mother(&sample);
            if mother.check_outside(&world, self.tolerance) {
                report.points.push(world);
                if !flags.contains(OverlapFlags::OVERLAP_ALL) {
                    break;
                }
            }
        }
        report
    }

    fn two_volumes_overlap(
        &self,
        first: &dyn Shape,
        first_placement: &Placement,
        second: &dyn Shape,
        second_placement: &Placement,
        flags: OverlapFlags,
    ) -> OverlapReport {
        let mut report = OverlapReport::default();
        if let (Some(a), Some(b)) = (first.bounding_box(), second.bounding_box()) {
            if !a
                .transformed(first_placement)
                .intersects(&b.transformed(second_placement))
            {
                return report;
            }
        }

        let mut order = [
            (first, first_placement, second, second_placement),
            (second, second_placement, first, first_placement),
        ];
        if flags.contains(OverlapFlags::CHECK_OLD_FIRST) {
            order.swap(0, 1);
        }
        let passes = if flags.contains(OverlapFlags::CHECK_INHIBIT_SECOND) {
            1
        } else {
            2
        };
        for &(probe, probe_at, target, target_at) in order.iter().take(passes) {
            self.probe_inside(probe, probe_at, target, target_at, flags, &mut report);
            if report.has_overlap() && !flags.contains(OverlapFlags::OVERLAP_ALL) {
                break;
            }
        }
        if report.has_overlap() {
            tracing::debug!(points = report.points.len(), "volumes overlap");
        }
        report
    }
}
