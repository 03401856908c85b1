//! Vector format decoding into the common [`Dataset`](geo_common::Dataset)
//! model.
//!
//! Two entry points: [`geojson::decode_geojson`] for GeoJSON text and
//! [`shapefile::decode_shapefile_zip`] for a zipped `.shp`/`.shx`/`.dbf`
//! bundle. The shapefile path reconstructs geometries and attributes and
//! then goes through the same dataset construction as the GeoJSON path.

pub mod geojson;
pub mod shapefile;

pub use geojson::decode_geojson;
pub use shapefile::decode_shapefile_zip;
