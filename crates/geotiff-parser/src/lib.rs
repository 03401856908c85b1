//! Single-band GeoTIFF decoding into a [`NumericGrid`].
//!
//! Georeferencing is read from the GeoTIFF baseline tags: ModelPixelScale
//! (33550) and ModelTiepoint (33922) place the raster, GDAL_NODATA
//! (42113) declares the fill value. Only north-up rasters with a
//! tiepoint anchoring pixel (0, 0) are handled; rotated rasters via
//! ModelTransformation are out of scope.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::debug;

use geo_common::{BoundingBox, GeoError, GeoResult, NumericGrid};

const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_GDAL_NODATA: u16 = 42113;

/// Decode a GeoTIFF buffer into a south-up numeric grid.
///
/// The first image in the file is read; its first sample plane becomes
/// the grid values. Fails with `MalformedInput` when the bytes are not
/// TIFF or the georeferencing tags are absent.
pub fn decode_geotiff(bytes: &[u8]) -> GeoResult<NumericGrid> {
    let mut decoder = Decoder::new(Cursor::new(bytes))
        .map_err(|e| GeoError::malformed(format!("tiff structure: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| GeoError::malformed(format!("tiff dimensions: {}", e)))?;
    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 {
        return Err(GeoError::EmptyDataset);
    }

    let bounds = read_bounds(&mut decoder, width, height)?;
    let fill_value = read_nodata(&mut decoder);

    let image = decoder
        .read_image()
        .map_err(|e| GeoError::malformed(format!("tiff image data: {}", e)))?;
    let samples = samples_to_f64(image);
    if samples.len() < width * height || samples.len() % (width * height) != 0 {
        return Err(GeoError::malformed(format!(
            "tiff image data: {} samples for {}x{} raster",
            samples.len(),
            width,
            height
        )));
    }
    // Interleaved multi-sample rasters: keep the first channel.
    let samples_per_pixel = samples.len() / (width * height);
    let mut values: Vec<f64> = samples.into_iter().step_by(samples_per_pixel).collect();

    // TIFF rows run north to south; the grid wants row 0 southernmost.
    flip_rows(&mut values, width, height);

    debug!(width, height, ?fill_value, "decoded GeoTIFF raster");
    Ok(NumericGrid::new(values, width, height, bounds, fill_value))
}

/// Derive the geographic bounds from pixel scale and tiepoint.
fn read_bounds(
    decoder: &mut Decoder<Cursor<&[u8]>>,
    width: usize,
    height: usize,
) -> GeoResult<BoundingBox> {
    let scale = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(TAG_MODEL_PIXEL_SCALE))
        .map_err(|_| GeoError::malformed("tiff georeferencing: ModelPixelScale missing"))?;
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(TAG_MODEL_TIEPOINT))
        .map_err(|_| GeoError::malformed("tiff georeferencing: ModelTiepoint missing"))?;

    if scale.len() < 2 {
        return Err(GeoError::malformed(
            "tiff georeferencing: ModelPixelScale needs two entries",
        ));
    }
    if tiepoint.len() < 6 {
        return Err(GeoError::malformed(
            "tiff georeferencing: ModelTiepoint needs six entries",
        ));
    }

    let (scale_x, scale_y) = (scale[0], scale[1]);
    // Tiepoint maps raster (i, j) onto model (x, y); only the standard
    // upper-left anchor is handled.
    let (raster_i, raster_j) = (tiepoint[0], tiepoint[1]);
    let (model_x, model_y) = (tiepoint[3], tiepoint[4]);
    if raster_i != 0.0 || raster_j != 0.0 {
        return Err(GeoError::malformed(
            "tiff georeferencing: tiepoint must anchor pixel (0, 0)",
        ));
    }
    if scale_x <= 0.0 || scale_y <= 0.0 {
        return Err(GeoError::malformed(
            "tiff georeferencing: pixel scale must be positive",
        ));
    }

    Ok(BoundingBox::new(
        model_x,
        model_y - height as f64 * scale_y,
        model_x + width as f64 * scale_x,
        model_y,
    ))
}

/// GDAL encodes the nodata marker as ASCII text.
fn read_nodata(decoder: &mut Decoder<Cursor<&[u8]>>) -> Option<f64> {
    decoder
        .get_tag_ascii_string(Tag::from_u16_exhaustive(TAG_GDAL_NODATA))
        .ok()
        .and_then(|text| text.trim().trim_end_matches('\0').parse::<f64>().ok())
}

fn samples_to_f64(image: DecodingResult) -> Vec<f64> {
    match image {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|s| s as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|s| s as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
    }
}

fn flip_rows(values: &mut [f64], width: usize, height: usize) {
    for row in 0..height / 2 {
        let opposite = height - 1 - row;
        for col in 0..width {
            values.swap(row * width + col, opposite * width + col);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_malformed() {
        assert!(matches!(
            decode_geotiff(b"definitely not a tiff"),
            Err(GeoError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_flip_rows_swaps_top_and_bottom() {
        let mut values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        flip_rows(&mut values, 2, 3);
        assert_eq!(values, vec![5.0, 6.0, 3.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn test_samples_to_f64_integer_widths() {
        assert_eq!(
            samples_to_f64(DecodingResult::U8(vec![0, 255])),
            vec![0.0, 255.0]
        );
        assert_eq!(
            samples_to_f64(DecodingResult::I16(vec![-32768, 7])),
            vec![-32768.0, 7.0]
        );
    }
}
