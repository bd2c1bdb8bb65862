//! Mesh configuration: steps, clipping bounds, overlap flags and cache path.
//!
//! Values set explicitly take precedence over values read from a
//! [`Properties`] set; properties only fill what is still unset.
//!
//! | Key | Meaning |
//! |---|---|
//! | `step_x`, `step_y`, `step_z` | lattice spacing |
//! | `start_x`, `start_y`, `start_z` | lower clipping bound |
//! | `stop_x`, `stop_y`, `stop_z` | upper clipping bound |
//! | `overlapping.*` | overlap flags, see [`OverlapFlags::from_properties`] |
//! | `cache_file_path` | node-set cache file, `~` and `$VAR` expanded |
//!
//! Lengths given without a unit are in millimetres.

use std::fmt;
use std::path::PathBuf;

use meshplace_core::units::DEFAULT_LENGTH_UNIT;
use meshplace_core::{OverlapFlags, Properties};

use crate::error::MeshError;

/// A lattice axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// All axes in order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Array index of the axis.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lower-case axis name.
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration of a regular mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshConfig {
    /// Lattice spacing per axis.
    pub steps: [Option<f64>; 3],
    /// Lower clipping bound per axis.
    pub starts: [Option<f64>; 3],
    /// Upper clipping bound per axis.
    pub stops: [Option<f64>; 3],
    /// Overlap check options.
    pub overlap_flags: Option<OverlapFlags>,
    /// Node-set cache file.
    pub cache_file_path: Option<PathBuf>,
}

impl MeshConfig {
    /// Empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a configuration from properties alone.
    pub fn from_properties(props: &Properties) -> Result<Self, MeshError> {
        let mut config = Self::new();
        config.merge_properties(props)?;
        Ok(config)
    }

    /// Set the step of one axis.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidStep`] unless `value` is positive and finite.
    pub fn set_step(&mut self, axis: Axis, value: f64) -> Result<(), MeshError> {
        self.steps[axis.index()] = Some(check_step(axis, value)?);
        Ok(())
    }

    /// Set the lower clipping bound of one axis.
    pub fn set_start(&mut self, axis: Axis, value: f64) -> Result<(), MeshError> {
        self.starts[axis.index()] = Some(check_bound(axis, value)?);
        Ok(())
    }

    /// Set the upper clipping bound of one axis.
    pub fn set_stop(&mut self, axis: Axis, value: f64) -> Result<(), MeshError> {
        self.stops[axis.index()] = Some(check_bound(axis, value)?);
        Ok(())
    }

    /// Step of one axis, if configured.
    pub fn step(&self, axis: Axis) -> Option<f64> {
        self.steps[axis.index()]
    }

    /// Lower clipping bound of one axis, if configured.
    pub fn start(&self, axis: Axis) -> Option<f64> {
        self.starts[axis.index()]
    }

    /// Upper clipping bound of one axis, if configured.
    pub fn stop(&self, axis: Axis) -> Option<f64> {
        self.stops[axis.index()]
    }

    /// Fill every unset value from `props`.
    pub fn merge_properties(&mut self, props: &Properties) -> Result<(), MeshError> {
        for axis in Axis::ALL {
            let i = axis.index();
            if self.steps[i].is_none() {
                if let Some(v) = fetch_length(props, &format!("step_{axis}"))? {
                    self.steps[i] = Some(check_step(axis, v)?);
                }
            }
            if self.starts[i].is_none() {
                if let Some(v) = fetch_length(props, &format!("start_{axis}"))? {
                    self.starts[i] = Some(check_bound(axis, v)?);
                }
            }
            if self.stops[i].is_none() {
                if let Some(v) = fetch_length(props, &format!("stop_{axis}"))? {
                    self.stops[i] = Some(check_bound(axis, v)?);
                }
            }
        }
        if self.overlap_flags.is_none() {
            self.overlap_flags = Some(OverlapFlags::from_properties(props));
        }
        if self.cache_file_path.is_none() && props.has_key("cache_file_path") {
            let raw = props.fetch_string("cache_file_path")?;
            self.cache_file_path = Some(expand_path(raw)?);
        }
        Ok(())
    }
}

fn check_step(axis: Axis, value: f64) -> Result<f64, MeshError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MeshError::InvalidStep { axis, value })
    }
}

fn check_bound(axis: Axis, value: f64) -> Result<f64, MeshError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MeshError::InvalidBound { axis, value })
    }
}

/// Read an optional length; values without an explicit unit are taken in
/// the default length unit.
fn fetch_length(props: &Properties, key: &str) -> Result<Option<f64>, MeshError> {
    if !props.has_key(key) {
        return Ok(None);
    }
    let mut value = props.fetch_real(key)?;
    if !props.has_explicit_unit(key) {
        value *= DEFAULT_LENGTH_UNIT;
    }
    Ok(Some(value))
}

/// Expand a leading `~` and `$VAR` / `${VAR}` references from the
/// environment.
///
/// # Errors
///
/// [`MeshError::PathExpansion`] when a referenced variable is not set.
pub fn expand_path(raw: &str) -> Result<PathBuf, MeshError> {
    let lookup = |name: &str| {
        std::env::var(name).map_err(|_| MeshError::PathExpansion {
            path: raw.to_string(),
            variable: name.to_string(),
        })
    };

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    if rest == "~" || rest.starts_with("~/") {
        out.push_str(&lookup("HOME")?);
        rest = &rest[1..];
    }

    let mut chars = rest.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let tail = &rest[pos + 1..];
        let (name, consumed) = if let Some(braced) = tail.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => {
                    return Err(MeshError::PathExpansion {
                        path: raw.to_string(),
                        variable: braced.to_string(),
                    })
                }
            }
        } else {
            let end = tail
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
                .unwrap_or(tail.len());
            (&tail[..end], end)
        };
        if name.is_empty() {
            out.push('$');
            continue;
        }
        out.push_str(&lookup(name)?);
        while chars.next_if(|&(p, _)| p <= pos + consumed).is_some() {}
    }
    Ok(PathBuf::from(out))
}
