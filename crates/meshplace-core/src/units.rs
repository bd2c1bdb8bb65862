//! Length units. The internal length unit is the millimetre.

use crate::error::PropertyError;

/// Nanometre.
pub const NM: f64 = 1e-6;
/// Micrometre.
pub const UM: f64 = 1e-3;
/// Millimetre (the internal unit).
pub const MM: f64 = 1.0;
/// Centimetre.
pub const CM: f64 = 10.0;
/// Metre.
pub const M: f64 = 1000.0;
/// Kilometre.
pub const KM: f64 = 1e6;

/// Length unit applied to configuration values given without a unit.
pub const DEFAULT_LENGTH_UNIT: f64 = MM;

/// Resolve a length unit symbol to its value in millimetres.
pub fn length_unit(symbol: &str) -> Result<f64, PropertyError> {
    match symbol {
        "nm" | "nanometer" => Ok(NM),
        "um" | "micrometer" => Ok(UM),
        "mm" | "millimeter" => Ok(MM),
        "cm" | "centimeter" => Ok(CM),
        "m" | "meter" => Ok(M),
        "km" | "kilometer" => Ok(KM),
        _ => Err(PropertyError::UnknownUnit {
            unit: symbol.to_string(),
        }),
    }
}
