//! Zipped shapefile bundle decoding.
//!
//! Unpacks a zip archive holding the `.shp`/`.shx`/`.dbf` triplet (an
//! optional `.prj` is tolerated and ignored) and reconstructs features
//! through the common vector model.

use std::io::{Cursor, Read};

use serde_json::{Map, Value};
use shapefile::dbase::FieldValue;
use shapefile::{Shape, ShapeReader};
use tracing::debug;
use zip::ZipArchive;

use geo_common::{Dataset, FeatureRecord, GeoError, GeoResult, Geometry};

/// The unpacked archive members we care about.
struct BundleMembers {
    shp: Vec<u8>,
    dbf: Vec<u8>,
}

/// Decode a zip archive containing a shapefile bundle into a [`Dataset`].
///
/// A missing `.shp`, `.shx`, or `.dbf` member fails with `MalformedInput`
/// naming that member; corrupt binary structure fails the same way with
/// the parser's detail. Output goes through the same dataset construction
/// as the GeoJSON path.
pub fn decode_shapefile_zip(bytes: &[u8]) -> GeoResult<Dataset> {
    let members = unpack_members(bytes)?;

    let shape_reader = ShapeReader::new(Cursor::new(members.shp))
        .map_err(|e| GeoError::malformed(format!(".shp member: {}", e)))?;
    let dbase_reader = shapefile::dbase::Reader::new(Cursor::new(members.dbf))
        .map_err(|e| GeoError::malformed(format!(".dbf member: {}", e)))?;
    let mut reader = shapefile::Reader::new(shape_reader, dbase_reader);

    let mut features = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .map_err(|e| GeoError::malformed(format!("shapefile record: {}", e)))?;
        features.push(FeatureRecord {
            geometry: convert_shape(shape),
            properties: convert_record(record),
        });
    }

    debug!(features = features.len(), "decoded shapefile bundle");
    Dataset::from_features(features)
}

fn unpack_members(bytes: &[u8]) -> GeoResult<BundleMembers> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| GeoError::malformed(format!("zip archive: {}", e)))?;

    let mut shp = None;
    let mut shx_present = false;
    let mut dbf = None;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| GeoError::malformed(format!("zip entry: {}", e)))?;
        let name = entry.name().to_ascii_lowercase();
        if name.ends_with(".shx") {
            shx_present = true;
            continue;
        }
        let slot = if name.ends_with(".shp") {
            &mut shp
        } else if name.ends_with(".dbf") {
            &mut dbf
        } else {
            continue;
        };
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut buf)
            .map_err(|e| GeoError::malformed(format!("zip member {}: {}", name, e)))?;
        *slot = Some(buf);
    }

    let shp = shp.ok_or_else(|| GeoError::malformed(".shp member missing from archive"))?;
    if !shx_present {
        return Err(GeoError::malformed(".shx member missing from archive"));
    }
    let dbf = dbf.ok_or_else(|| GeoError::malformed(".dbf member missing from archive"))?;

    Ok(BundleMembers { shp, dbf })
}

/// Map a shapefile geometry onto the common model. Outer rings each start
/// a polygon, inner rings attach to the polygon opened by the preceding
/// outer ring. Shape types this system does not render map to
/// `Unsupported` rather than failing the bundle.
fn convert_shape(shape: Shape) -> Geometry {
    match shape {
        Shape::Point(p) => Geometry::Point {
            coordinates: vec![p.x, p.y],
        },
        Shape::PointM(p) => Geometry::Point {
            coordinates: vec![p.x, p.y],
        },
        Shape::PointZ(p) => Geometry::Point {
            coordinates: vec![p.x, p.y],
        },
        Shape::Polygon(polygon) => convert_polygon_rings(
            polygon
                .into_inner()
                .into_iter()
                .map(|ring| match ring {
                    shapefile::PolygonRing::Outer(points) => {
                        (true, points.into_iter().map(|p| [p.x, p.y]).collect())
                    }
                    shapefile::PolygonRing::Inner(points) => {
                        (false, points.into_iter().map(|p| [p.x, p.y]).collect())
                    }
                })
                .collect(),
        ),
        _ => Geometry::Unsupported,
    }
}

fn convert_polygon_rings(rings: Vec<(bool, Vec<[f64; 2]>)>) -> Geometry {
    let mut polygons: Vec<Vec<Vec<[f64; 2]>>> = Vec::new();
    for (is_outer, ring) in rings {
        match polygons.last_mut() {
            Some(polygon) if !is_outer => polygon.push(ring),
            _ => polygons.push(vec![ring]),
        }
    }
    match polygons.len() {
        0 => Geometry::Unsupported,
        1 => Geometry::Polygon {
            coordinates: polygons.into_iter().next().unwrap(),
        },
        _ => Geometry::MultiPolygon {
            coordinates: polygons,
        },
    }
}

/// Map a dBase record onto the feature property mapping. NULL fields
/// become JSON null; non-finite numerics do too.
fn convert_record(record: shapefile::dbase::Record) -> Map<String, Value> {
    let mut properties = Map::new();
    for (name, field) in record {
        let value = match field {
            FieldValue::Character(opt) => opt.map(Value::String).unwrap_or(Value::Null),
            FieldValue::Numeric(opt) => opt.map(Value::from).unwrap_or(Value::Null),
            FieldValue::Float(opt) => opt.map(|f| Value::from(f as f64)).unwrap_or(Value::Null),
            FieldValue::Integer(i) => Value::from(i),
            FieldValue::Double(d) => Value::from(d),
            FieldValue::Logical(opt) => opt.map(Value::Bool).unwrap_or(Value::Null),
            FieldValue::Date(opt) => opt
                .map(|d| {
                    Value::String(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))
                })
                .unwrap_or(Value::Null),
            other => Value::String(format!("{:?}", other)),
        };
        properties.insert(name, value);
    }
    properties
}
