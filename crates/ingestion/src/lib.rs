//! Upload ingestion: extension-based format dispatch, the decode entry
//! point, and the active-layer session that downstream consumers query.

pub mod format;
pub mod session;

pub use format::{detect_format, FileFormat};
pub use session::ActiveLayer;

use bytes::Bytes;
use tracing::info;

use geo_common::{Dataset, GeoError, GeoResult, NumericGrid};
use netcdf_parser::NetCdfDataset;

/// What a successful decode produced.
///
/// Vector formats yield a ready [`Dataset`]; GeoTIFF yields one raster
/// grid; NetCDF yields a lazy handle because variable choice happens
/// after upload.
#[derive(Debug, Clone)]
pub enum DecodedPayload {
    Vector(Dataset),
    Raster(NumericGrid),
    Gridded(NetCdfDataset),
}

/// Decode an uploaded file by its name's extension.
pub fn decode(file_name: &str, bytes: Bytes) -> GeoResult<DecodedPayload> {
    let format = detect_format(file_name)?;
    info!(file_name, ?format, size = bytes.len(), "decoding upload");

    match format {
        FileFormat::GeoJson => {
            let text = std::str::from_utf8(&bytes)
                .map_err(|_| GeoError::malformed("geojson upload is not UTF-8"))?;
            Ok(DecodedPayload::Vector(vector_parser::decode_geojson(text)?))
        }
        FileFormat::Shapefile => Ok(DecodedPayload::Vector(
            vector_parser::decode_shapefile_zip(&bytes)?,
        )),
        FileFormat::GeoTiff => Ok(DecodedPayload::Raster(geotiff_parser::decode_geotiff(
            &bytes,
        )?)),
        FileFormat::NetCdf => Ok(DecodedPayload::Gridded(netcdf_parser::decode_netcdf(bytes)?)),
    }
}
