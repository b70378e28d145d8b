//! Spacing distance → equivalent drainage area.
//!
//! The nearest-neighbour distance is treated as the diameter of a circular
//! exclusion zone around the well.

use super::ClassificationError;
use std::f64::consts::PI;

/// Square metres in one acre
pub const SQUARE_METRES_PER_ACRE: f64 = 4046.86;

/// Converts inter-well distances (metres) into drainage areas (acres)
pub struct AreaConverter;

impl AreaConverter {
    /// Area in acres of the circle whose diameter is `distance` metres.
    ///
    /// An infinite distance (single-well zone) maps to an infinite area.
    ///
    /// # Errors
    /// `InvalidInput` when `distance` is negative or NaN.
    pub fn to_acres(distance: f64) -> Result<f64, ClassificationError> {
        if distance.is_nan() || distance < 0.0 {
            return Err(ClassificationError::InvalidInput(format!(
                "distance must be >= 0, got {distance}"
            )));
        }
        let radius_m = distance / 2.0;
        let area_m2 = PI * radius_m * radius_m;
        Ok(area_m2 / SQUARE_METRES_PER_ACRE)
    }
}
