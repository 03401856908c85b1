//! Numeric raster grid model shared by the raster decoders and renderer.

use crate::bbox::BoundingBox;

/// A 2D array of scalar raster samples anchored to geographic bounds.
///
/// Values are row-major, `height` latitude rows by `width` longitude
/// columns. Row 0 is the geographically southernmost row; decoders that
/// read top-down imagery reverse their rows to satisfy this contract, and
/// the renderer flips back to top-down image convention.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericGrid {
    pub values: Vec<f64>,
    pub width: usize,
    pub height: usize,
    pub bounds: BoundingBox,
    /// Sentinel marking a sample as no-data, when the source declared one.
    pub fill_value: Option<f64>,
}

impl NumericGrid {
    pub fn new(
        values: Vec<f64>,
        width: usize,
        height: usize,
        bounds: BoundingBox,
        fill_value: Option<f64>,
    ) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            values,
            width,
            height,
            bounds,
            fill_value,
        }
    }

    /// Get the sample at a grid coordinate, or `None` out of range.
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.values.get(row * self.width + col).copied()
    }

    /// Whether a sample counts as missing data: NaN or the fill sentinel.
    pub fn is_missing(&self, value: f64) -> bool {
        value.is_nan() || self.fill_value.map_or(false, |fill| value == fill)
    }
}
