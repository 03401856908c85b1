//! Spatial bounding-box filtering over a dataset.

use tracing::debug;

use geo_common::{BoundingBox, Dataset, Geometry};

/// Return a new dataset containing only the features intersecting `bbox`.
///
/// Points are kept when they lie within or on the box boundary. Polygons
/// and multi-polygons are kept when at least one ring vertex lies within
/// or on the boundary. This is a vertex-containment approximation, not a
/// full polygon-box intersection: a polygon that fully encloses the box
/// without any vertex inside it is excluded. Inherited behaviour, kept
/// deliberately. Unsupported geometries are dropped, never an error.
///
/// The input dataset is never mutated; filtering is pure and idempotent.
pub fn filter_by_box(dataset: &Dataset, bbox: &BoundingBox) -> Dataset {
    let features: Vec<_> = dataset
        .features
        .iter()
        .filter(|feature| geometry_in_box(&feature.geometry, bbox))
        .cloned()
        .collect();

    debug!(
        kept = features.len(),
        total = dataset.len(),
        "filtered dataset by bounding box"
    );

    Dataset::derived(features, dataset.columns.clone(), dataset.crs.clone())
}

fn geometry_in_box(geometry: &Geometry, bbox: &BoundingBox) -> bool {
    match geometry {
        Geometry::Point { coordinates } => {
            coordinates.len() >= 2 && bbox.contains(coordinates[0], coordinates[1])
        }
        Geometry::Polygon { coordinates } => coordinates
            .iter()
            .any(|ring| ring.iter().any(|&[lon, lat]| bbox.contains(lon, lat))),
        Geometry::MultiPolygon { coordinates } => coordinates.iter().any(|polygon| {
            polygon
                .iter()
                .any(|ring| ring.iter().any(|&[lon, lat]| bbox.contains(lon, lat)))
        }),
        Geometry::Unsupported => false,
    }
}
