//! Color scales: the continuous diverging ramp for raster rendering and
//! the discrete environmental palette for choropleth classification.

use crate::color::{interpolate_color, Color};

/// Continuous diverging scale, 11 stops from deep blue through neutral to
/// deep red (ColorBrewer RdBu, reversed).
pub const DIVERGING_STOPS: [Color; 11] = [
    Color::rgb(5, 48, 97),
    Color::rgb(33, 102, 172),
    Color::rgb(67, 147, 195),
    Color::rgb(146, 197, 222),
    Color::rgb(209, 229, 240),
    Color::rgb(247, 247, 247),
    Color::rgb(253, 219, 199),
    Color::rgb(244, 165, 130),
    Color::rgb(214, 96, 77),
    Color::rgb(178, 24, 43),
    Color::rgb(103, 0, 31),
];

/// Discrete 8-color environmental palette, dark green to red (ColorBrewer
/// RdYlGn, reversed). Used for choropleth bucket colors.
pub const CHOROPLETH_PALETTE: [Color; 8] = [
    Color::rgb(26, 152, 80),
    Color::rgb(102, 189, 99),
    Color::rgb(166, 217, 106),
    Color::rgb(217, 239, 139),
    Color::rgb(254, 224, 139),
    Color::rgb(253, 174, 97),
    Color::rgb(244, 109, 67),
    Color::rgb(215, 48, 39),
];

/// Neutral color for features whose classified attribute is non-numeric.
pub const DEFAULT_FEATURE_COLOR: Color = Color::rgb(204, 204, 204);

/// Sample the diverging scale at a normalized position in [0, 1],
/// interpolating linearly between adjacent stops.
pub fn sample_diverging(normalized: f64) -> Color {
    let normalized = normalized.clamp(0.0, 1.0);
    let position = normalized * (DIVERGING_STOPS.len() - 1) as f64;
    let index = (position.floor() as usize).min(DIVERGING_STOPS.len() - 2);
    let t = position - index as f64;
    interpolate_color(DIVERGING_STOPS[index], DIVERGING_STOPS[index + 1], t)
}
