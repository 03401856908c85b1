//! Raster rendering: NumericGrid to RGBA pixel buffer.

use tracing::debug;

use geo_common::{BoundingBox, NumericGrid};

use crate::color::Color;
use crate::scale::sample_diverging;

/// How samples are mapped to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Linear 0-255 gray ramp, used for single-band raster imagery.
    Grayscale,
    /// Continuous diverging blue-to-red scale, used for gridded
    /// scientific variables.
    Diverging,
}

/// A rendered RGBA image anchored to geographic bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// RGBA bytes, `width * height * 4`, top-down row order.
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
    /// Bounds carried unchanged from the input grid.
    pub bounds: BoundingBox,
}

/// Render a grid into an RGBA buffer.
///
/// The grid's row 0 is southernmost, so output row `y` sources grid row
/// `height - 1 - y` to match top-down image convention. Samples equal to
/// the fill sentinel, or NaN, become fully transparent pixels. Repeated
/// calls on the same grid and mode produce byte-identical output.
pub fn render(grid: &NumericGrid, mode: RenderMode) -> RasterImage {
    let (min, range) = value_range(grid);
    debug!(
        width = grid.width,
        height = grid.height,
        min,
        range,
        ?mode,
        "rendering grid"
    );

    let mut pixels = vec![0u8; grid.width * grid.height * 4];

    for y in 0..grid.height {
        let src_row = grid.height - 1 - y;
        for x in 0..grid.width {
            let value = grid.values[src_row * grid.width + x];
            let color = if grid.is_missing(value) {
                Color::transparent()
            } else {
                let normalized = ((value - min) / range).clamp(0.0, 1.0);
                match mode {
                    RenderMode::Grayscale => {
                        let gray = (normalized * 255.0).round() as u8;
                        Color::rgb(gray, gray, gray)
                    }
                    RenderMode::Diverging => sample_diverging(normalized),
                }
            };

            let pixel_idx = (y * grid.width + x) * 4;
            pixels[pixel_idx] = color.r;
            pixels[pixel_idx + 1] = color.g;
            pixels[pixel_idx + 2] = color.b;
            pixels[pixel_idx + 3] = color.a;
        }
    }

    RasterImage {
        pixels,
        width: grid.width,
        height: grid.height,
        bounds: grid.bounds,
    }
}

/// Single scan for (min, range), skipping missing samples. With zero valid
/// samples min defaults to 0 and range is forced to 1 so normalization
/// never divides by zero.
fn value_range(grid: &NumericGrid) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in &grid.values {
        if grid.is_missing(value) {
            continue;
        }
        min = min.min(value);
        max = max.max(value);
    }

    if min > max {
        return (0.0, 1.0);
    }
    let range = max - min;
    (min, if range == 0.0 { 1.0 } else { range })
}
