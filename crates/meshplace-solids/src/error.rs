//! Error types for solid construction.

use std::fmt;

/// Errors arising from solid construction.
#[derive(Debug, Clone, PartialEq)]
pub enum SolidError {
    /// A dimension is zero, negative, or not finite.
    InvalidDimension {
        /// Solid type name.
        shape: &'static str,
        /// Dimension name (e.g. `"radius"`).
        dimension: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for SolidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension {
                shape,
                dimension,
                value,
            } => write!(f, "invalid {shape} {dimension}: {value}"),
        }
    }
}

impl std::error::Error for SolidError {}

pub(crate) fn check_dimension(
    shape: &'static str,
    dimension: &'static str,
    value: f64,
) -> Result<f64, SolidError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SolidError::InvalidDimension {
            shape,
            dimension,
            value,
        })
    }
}
