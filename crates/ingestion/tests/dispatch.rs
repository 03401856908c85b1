//! Upload-to-visualization flows across all four formats.

use bytes::Bytes;
use geo_common::{BoundingBox, GeoError};
use ingestion::{decode, ActiveLayer, DecodedPayload};
use renderer::{render, RenderMode};
use test_utils::{
    geojson_fixture, shapefile_zip_fixture, GeoTiffFixture, NetCdfBuilder, ShapePoint,
};

#[test]
fn test_geojson_upload_flow() {
    let payload = decode("cities.geojson", Bytes::from(geojson_fixture())).unwrap();
    let dataset = match payload {
        DecodedPayload::Vector(d) => d,
        other => panic!("expected vector payload, got {:?}", other),
    };

    let mut layer = ActiveLayer::new();
    layer.replace(dataset);

    let state = layer.classify("value").unwrap();
    assert_eq!((state.min, state.max), (5.0, 15.0));

    let stats = layer.aggregate("name", "value").unwrap();
    assert_eq!(stats.len(), 3);
    let total: f64 = stats.values().map(|s| s.percentage).sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[test]
fn test_shapefile_upload_flow() {
    let bundle = shapefile_zip_fixture(&[
        ShapePoint {
            x: 1.0,
            y: 1.0,
            name: "a",
            value: 2.0,
        },
        ShapePoint {
            x: 8.0,
            y: 8.0,
            name: "b",
            value: 4.0,
        },
    ]);
    let payload = decode("parcels.zip", Bytes::from(bundle)).unwrap();
    let dataset = match payload {
        DecodedPayload::Vector(d) => d,
        other => panic!("expected vector payload, got {:?}", other),
    };

    let mut layer = ActiveLayer::new();
    layer.replace(dataset);
    let filtered = layer
        .filter_by_box(BoundingBox::new(0.0, 0.0, 2.0, 2.0))
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(layer.dataset().unwrap().len(), 2);
}

#[test]
fn test_geotiff_upload_renders_grayscale() {
    let fixture = GeoTiffFixture {
        width: 2,
        height: 2,
        values: vec![0, 128, 64, 255],
        origin: (0.0, 2.0),
        scale: (1.0, 1.0),
        nodata: None,
    };
    let payload = decode("dem.tif", Bytes::from(fixture.build())).unwrap();
    let grid = match payload {
        DecodedPayload::Raster(g) => g,
        other => panic!("expected raster payload, got {:?}", other),
    };

    let image = render(&grid, RenderMode::Grayscale);
    assert_eq!((image.width, image.height), (2, 2));
    assert_eq!(image.pixels.len(), 16);
    // Every sample is valid, so every pixel is opaque.
    assert!(image.pixels.chunks(4).all(|px| px[3] == 255));
}

#[test]
fn test_netcdf_upload_is_lazy() {
    let bytes = NetCdfBuilder::new()
        .dimension("lat", 2)
        .dimension("lon", 2)
        .variable("lat", &["lat"], &[0.0, 1.0])
        .variable("lon", &["lon"], &[0.0, 1.0])
        .variable("t2m", &["lat", "lon"], &[1.0, 2.0, 3.0, 4.0])
        .attr_text("long_name", "temperature")
        .build();
    let payload = decode("forecast.nc", bytes).unwrap();
    let handle = match payload {
        DecodedPayload::Gridded(h) => h,
        other => panic!("expected gridded payload, got {:?}", other),
    };

    assert_eq!(handle.variables().len(), 3);
    let grid = handle.grid("t2m").unwrap();
    let image = render(&grid, RenderMode::Diverging);
    assert_eq!(image.pixels.len(), 16);
}

#[test]
fn test_failed_decode_leaves_layer_intact() {
    let mut layer = ActiveLayer::new();
    let payload = decode("cities.geojson", Bytes::from(geojson_fixture())).unwrap();
    if let DecodedPayload::Vector(dataset) = payload {
        layer.replace(dataset);
    }
    layer.classify("value").unwrap();

    // A malformed upload fails before the session is touched.
    assert!(matches!(
        decode("broken.geojson", Bytes::from_static(b"{not json")),
        Err(GeoError::MalformedInput { .. })
    ));
    assert_eq!(layer.dataset().unwrap().len(), 3);
    assert!(layer.classification().is_some());
}
