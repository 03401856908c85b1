//! Extension-based format detection.

use geo_common::{GeoError, GeoResult};

/// The upload formats this system ingests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    GeoJson,
    Shapefile,
    GeoTiff,
    NetCdf,
}

/// Map a file name onto its format by extension, case-insensitively.
///
/// Anything unrecognized fails with `UnsupportedFormat` naming the
/// extension (or the whole name when there is none). Detection never
/// inspects content; a `.zip` that is not a shapefile bundle fails later
/// in the decoder.
pub fn detect_format(file_name: &str) -> GeoResult<FileFormat> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or(file_name)
        .to_ascii_lowercase();

    match extension.as_str() {
        "json" | "geojson" => Ok(FileFormat::GeoJson),
        "zip" => Ok(FileFormat::Shapefile),
        "tif" | "tiff" => Ok(FileFormat::GeoTiff),
        "nc" => Ok(FileFormat::NetCdf),
        _ => Err(GeoError::UnsupportedFormat(extension)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(detect_format("a.json").unwrap(), FileFormat::GeoJson);
        assert_eq!(detect_format("a.geojson").unwrap(), FileFormat::GeoJson);
        assert_eq!(detect_format("bundle.zip").unwrap(), FileFormat::Shapefile);
        assert_eq!(detect_format("dem.tif").unwrap(), FileFormat::GeoTiff);
        assert_eq!(detect_format("dem.tiff").unwrap(), FileFormat::GeoTiff);
        assert_eq!(detect_format("t2m.nc").unwrap(), FileFormat::NetCdf);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(detect_format("DEM.TIF").unwrap(), FileFormat::GeoTiff);
        assert_eq!(
            detect_format("Cities.GeoJSON").unwrap(),
            FileFormat::GeoJson
        );
    }

    #[test]
    fn test_unknown_extension_is_named() {
        assert!(matches!(
            detect_format("slides.pptx"),
            Err(GeoError::UnsupportedFormat(ref ext)) if ext == "pptx"
        ));
    }

    #[test]
    fn test_no_extension() {
        assert!(matches!(
            detect_format("README"),
            Err(GeoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_extension_of_dotted_name() {
        assert_eq!(
            detect_format("survey.2024.final.geojson").unwrap(),
            FileFormat::GeoJson
        );
    }
}
