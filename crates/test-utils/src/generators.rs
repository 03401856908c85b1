//! Synthetic grid generators with predictable values.

use geo_common::{BoundingBox, NumericGrid};

/// Create grid values where each cell is `col * 1000 + row`.
///
/// Makes read paths easy to verify: `values[row * width + col]` must be
/// `col * 1000 + row`.
pub fn create_test_values(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// Create a [`NumericGrid`] with `create_test_values` data and a fixed
/// 0..10 degree extent, no fill value.
pub fn create_test_grid(width: usize, height: usize) -> NumericGrid {
    NumericGrid::new(
        create_test_values(width, height),
        width,
        height,
        BoundingBox::new(0.0, 0.0, 10.0, 10.0),
        None,
    )
}
