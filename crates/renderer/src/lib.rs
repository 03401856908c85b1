//! RGBA rendering for geospatial data visualization.
//!
//! Converts numeric grids into RGBA buffers (grayscale or continuous
//! diverging color scale) and provides the discrete choropleth palette
//! used for vector classification.

pub mod color;
pub mod raster;
pub mod scale;

pub use color::{interpolate_color, Color};
pub use raster::{render, RasterImage, RenderMode};
pub use scale::{sample_diverging, CHOROPLETH_PALETTE, DEFAULT_FEATURE_COLOR, DIVERGING_STOPS};
