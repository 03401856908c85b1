//! GeoJSON FeatureCollection decoding.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use geo_common::{Dataset, FeatureRecord, GeoResult, Geometry};

/// Wire model for the incoming document. Only the pieces this system
/// consumes are modeled; everything else is ignored.
#[derive(Debug, Deserialize)]
struct FeatureCollectionDoc {
    features: Vec<FeatureDoc>,
    #[serde(default)]
    crs: Option<CrsDoc>,
}

#[derive(Debug, Deserialize)]
struct FeatureDoc {
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct CrsDoc {
    #[serde(default)]
    properties: Option<CrsProperties>,
}

#[derive(Debug, Deserialize)]
struct CrsProperties {
    #[serde(default)]
    name: Option<String>,
}

/// Decode UTF-8 GeoJSON text into a [`Dataset`].
///
/// Fails with `MalformedInput` when the text is not valid JSON or lacks a
/// `features` array, and with `EmptyDataset` on zero features. Attribute
/// columns come from the first feature's property keys; geometry types
/// this system does not render decode as `Unsupported` rather than
/// failing the collection. A declared `crs` name is carried along as
/// metadata without reprojection.
pub fn decode_geojson(text: &str) -> GeoResult<Dataset> {
    let doc: FeatureCollectionDoc = serde_json::from_str(text)?;

    let crs = doc.crs.and_then(|c| c.properties).and_then(|p| p.name);

    let features: Vec<FeatureRecord> = doc
        .features
        .into_iter()
        .map(|f| FeatureRecord {
            geometry: f.geometry.unwrap_or(Geometry::Unsupported),
            properties: f.properties.unwrap_or_default(),
        })
        .collect();

    debug!(features = features.len(), ?crs, "decoded GeoJSON collection");
    Ok(Dataset::from_features(features)?.with_crs(crs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_common::GeoError;

    #[test]
    fn test_decode_point_collection() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature",
                 "geometry": {"type": "Point", "coordinates": [11.25, 43.77]},
                 "properties": {"name": "Florence", "pop": 382258}},
                {"type": "Feature",
                 "geometry": {"type": "Point", "coordinates": [12.49, 41.89]},
                 "properties": {"name": "Rome", "pop": 2873000}}
            ]
        }"#;
        let dataset = decode_geojson(text).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.columns,
            vec!["name".to_string(), "pop".to_string()]
        );
        assert!(dataset.bounds.contains(11.25, 43.77));
        assert!(dataset.bounds.contains(12.49, 41.89));
    }

    #[test]
    fn test_decode_polygon_and_multipolygon() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature",
                 "geometry": {"type": "Polygon",
                              "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]},
                 "properties": {"id": "poly"}},
                {"type": "Feature",
                 "geometry": {"type": "MultiPolygon",
                              "coordinates": [[[[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 2.0]]]]},
                 "properties": {"id": "multi"}}
            ]
        }"#;
        let dataset = decode_geojson(text).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.bounds.contains(3.0, 3.0));
        assert!(dataset.bounds.contains(0.0, 0.0));
    }

    #[test]
    fn test_unknown_geometry_type_does_not_fail_collection() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature",
                 "geometry": {"type": "LineString",
                              "coordinates": [[0.0, 0.0], [1.0, 1.0]]},
                 "properties": {"id": "line"}},
                {"type": "Feature",
                 "geometry": {"type": "Point", "coordinates": [5.0, 5.0]},
                 "properties": {"id": "pt"}}
            ]
        }"#;
        let dataset = decode_geojson(text).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(matches!(
            dataset.features[0].geometry,
            Geometry::Unsupported
        ));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            decode_geojson("{not json"),
            Err(GeoError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_missing_features_array_is_malformed() {
        assert!(matches!(
            decode_geojson(r#"{"type": "FeatureCollection"}"#),
            Err(GeoError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_zero_features_is_empty_dataset() {
        assert!(matches!(
            decode_geojson(r#"{"type": "FeatureCollection", "features": []}"#),
            Err(GeoError::EmptyDataset)
        ));
    }

    #[test]
    fn test_crs_name_is_carried() {
        let text = r#"{
            "type": "FeatureCollection",
            "crs": {"type": "name", "properties": {"name": "EPSG:25833"}},
            "features": [
                {"type": "Feature",
                 "geometry": {"type": "Point", "coordinates": [500000.0, 6500000.0]},
                 "properties": {}}
            ]
        }"#;
        let dataset = decode_geojson(text).unwrap();
        assert_eq!(dataset.crs.as_deref(), Some("EPSG:25833"));
    }

    #[test]
    fn test_null_properties_tolerated() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature",
                 "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
                 "properties": null}
            ]
        }"#;
        let dataset = decode_geojson(text).unwrap();
        assert!(dataset.columns.is_empty());
    }
}
