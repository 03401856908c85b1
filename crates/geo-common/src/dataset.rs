//! The common vector dataset model produced by every vector decoder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bbox::BoundingBox;
use crate::error::{GeoError, GeoResult};

/// Feature geometry, with coordinates ordered `[longitude, latitude]`.
///
/// The `Unsupported` variant absorbs GeoJSON geometry types this system
/// does not render (LineString, GeometryCollection, ...) so a single odd
/// feature never fails a whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A point; trailing coordinates (altitude) are tolerated and ignored.
    Point { coordinates: Vec<f64> },

    /// Linear rings; the first ring is the exterior, the rest are holes.
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },

    /// A set of polygons, each with its own rings.
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },

    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// Visit every `(lon, lat)` vertex of this geometry.
    pub fn each_vertex<F: FnMut(f64, f64)>(&self, mut visit: F) {
        match self {
            Geometry::Point { coordinates } => {
                if coordinates.len() >= 2 {
                    visit(coordinates[0], coordinates[1]);
                }
            }
            Geometry::Polygon { coordinates } => {
                for ring in coordinates {
                    for &[lon, lat] in ring {
                        visit(lon, lat);
                    }
                }
            }
            Geometry::MultiPolygon { coordinates } => {
                for polygon in coordinates {
                    for ring in polygon {
                        for &[lon, lat] in ring {
                            visit(lon, lat);
                        }
                    }
                }
            }
            Geometry::Unsupported => {}
        }
    }
}

/// Identity key for a feature, used for color-cache lookups.
///
/// `Explicit` carries the feature's `id` attribute when one exists.
/// `Derived` falls back to the serialized property map. Derived keys are
/// not unique: two features with identical properties collide and share a
/// cached color. That is the documented policy, never a failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    Explicit(String),
    Derived(String),
}

/// A single vector feature: a geometry plus its attribute mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl FeatureRecord {
    /// Derive the identity key for this feature.
    pub fn key(&self) -> FeatureKey {
        match self.properties.get("id") {
            Some(Value::String(s)) => FeatureKey::Explicit(s.clone()),
            Some(v) if !v.is_null() => FeatureKey::Explicit(v.to_string()),
            _ => FeatureKey::Derived(Value::Object(self.properties.clone()).to_string()),
        }
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Look up an attribute and coerce it to a finite number.
    pub fn numeric_attribute(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(numeric_value)
    }
}

/// Coerce an attribute value to a finite f64.
///
/// Numbers pass through; numeric strings ("10") parse. Everything else,
/// including NaN/infinite results, yields `None`.
pub fn numeric_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// An in-memory collection of vector features plus its bounding box.
///
/// Immutable once produced by a decoder; filtering yields a new Dataset
/// and the original remains the canonical source for resets.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Vec<FeatureRecord>,
    pub bounds: BoundingBox,
    /// Attribute columns, read from the first feature's property keys.
    /// Assumes a homogeneous schema across features.
    pub columns: Vec<String>,
    /// CRS name carried from the source file, if it declared one.
    /// Informational only; no reprojection is performed.
    pub crs: Option<String>,
}

impl Dataset {
    /// Build a dataset from decoded features, deriving columns from the
    /// first feature and computing bounds in a single coordinate scan.
    ///
    /// Fails with [`GeoError::EmptyDataset`] on zero features.
    pub fn from_features(features: Vec<FeatureRecord>) -> GeoResult<Self> {
        if features.is_empty() {
            return Err(GeoError::EmptyDataset);
        }
        let columns = features[0].properties.keys().cloned().collect();
        let bounds = Self::scan_bounds(&features);
        Ok(Self {
            features,
            bounds,
            columns,
            crs: None,
        })
    }

    /// Build a derived dataset (e.g. a filtered view) that keeps the
    /// parent's column list even when it has zero features.
    pub fn derived(features: Vec<FeatureRecord>, columns: Vec<String>, crs: Option<String>) -> Self {
        let bounds = Self::scan_bounds(&features);
        Self {
            features,
            bounds,
            columns,
            crs,
        }
    }

    /// Attach the declared CRS name.
    pub fn with_crs(mut self, crs: Option<String>) -> Self {
        self.crs = crs;
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn scan_bounds(features: &[FeatureRecord]) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for feature in features {
            feature.geometry.each_vertex(|lon, lat| bbox.extend(lon, lat));
        }
        if bbox.is_empty() {
            BoundingBox::default()
        } else {
            bbox
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(props: Value, lon: f64, lat: f64) -> FeatureRecord {
        FeatureRecord {
            geometry: Geometry::Point {
                coordinates: vec![lon, lat],
            },
            properties: props.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_key_prefers_explicit_id() {
        let f = feature(json!({"id": "abc", "name": "x"}), 0.0, 0.0);
        assert_eq!(f.key(), FeatureKey::Explicit("abc".to_string()));
    }

    #[test]
    fn test_key_falls_back_to_properties() {
        let f = feature(json!({"name": "x"}), 0.0, 0.0);
        match f.key() {
            FeatureKey::Derived(s) => assert!(s.contains("name")),
            other => panic!("expected derived key, got {:?}", other),
        }
    }

    #[test]
    fn test_key_collision_is_tolerated() {
        let a = feature(json!({"name": "x"}), 0.0, 0.0);
        let b = feature(json!({"name": "x"}), 9.0, 9.0);
        // Same properties, different geometry: same key by policy.
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_numeric_value_coercion() {
        assert_eq!(numeric_value(&json!(10)), Some(10.0));
        assert_eq!(numeric_value(&json!("10")), Some(10.0));
        assert_eq!(numeric_value(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(numeric_value(&json!("ten")), None);
        assert_eq!(numeric_value(&json!(null)), None);
        assert_eq!(numeric_value(&json!(true)), None);
    }

    #[test]
    fn test_from_features_empty_fails() {
        assert!(matches!(
            Dataset::from_features(vec![]),
            Err(GeoError::EmptyDataset)
        ));
    }

    #[test]
    fn test_bounds_cover_all_features() {
        let dataset = Dataset::from_features(vec![
            feature(json!({"a": 1}), 11.2, 42.9),
            feature(json!({"a": 2}), 12.5, 41.8),
        ])
        .unwrap();
        assert!(dataset.bounds.contains(11.2, 42.9));
        assert!(dataset.bounds.contains(12.5, 41.8));
        assert_eq!(dataset.columns, vec!["a".to_string()]);
    }

    #[test]
    fn test_derived_empty_is_valid() {
        let view = Dataset::derived(vec![], vec!["a".to_string()], None);
        assert!(view.is_empty());
        assert_eq!(view.columns, vec!["a".to_string()]);
    }
}
