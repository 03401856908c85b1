//! Decoding in-memory GeoTIFF fixtures.

use geo_common::GeoError;
use geotiff_parser::decode_geotiff;
use test_utils::GeoTiffFixture;

fn fixture(values: Vec<u8>, nodata: Option<f64>) -> GeoTiffFixture {
    GeoTiffFixture {
        width: 2,
        height: 2,
        values,
        origin: (10.0, 50.0),
        scale: (0.5, 0.25),
        nodata,
    }
}

#[test]
fn test_bounds_from_tiepoint_and_scale() {
    let grid = decode_geotiff(&fixture(vec![0, 1, 2, 3], None).build()).unwrap();
    assert_eq!(grid.bounds.min_lon, 10.0);
    assert_eq!(grid.bounds.max_lon, 11.0); // 10 + 2 * 0.5
    assert_eq!(grid.bounds.max_lat, 50.0);
    assert_eq!(grid.bounds.min_lat, 49.5); // 50 - 2 * 0.25
}

#[test]
fn test_rows_are_reversed_to_south_up() {
    // Image rows top-down: [10, 20] then [30, 40].
    let grid = decode_geotiff(&fixture(vec![10, 20, 30, 40], None).build()).unwrap();
    assert_eq!((grid.width, grid.height), (2, 2));
    // Grid row 0 is the southern (bottom image) row.
    assert_eq!(grid.get(0, 0), Some(30.0));
    assert_eq!(grid.get(1, 0), Some(40.0));
    assert_eq!(grid.get(0, 1), Some(10.0));
}

#[test]
fn test_nodata_tag_becomes_fill_value() {
    let grid = decode_geotiff(&fixture(vec![255, 1, 2, 3], Some(255.0)).build()).unwrap();
    assert_eq!(grid.fill_value, Some(255.0));
    assert!(grid.is_missing(255.0));
}

#[test]
fn test_absent_nodata_is_fine() {
    let grid = decode_geotiff(&fixture(vec![0, 0, 0, 0], None).build()).unwrap();
    assert_eq!(grid.fill_value, None);
}

#[test]
fn test_missing_georeferencing_is_malformed() {
    // A plain TIFF without the geo tags, assembled by hand.
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"II");
    bytes.extend_from_slice(&42u16.to_le_bytes());
    bytes.extend_from_slice(&8u32.to_le_bytes());
    // IFD with the baseline tags only.
    let entries: [(u16, u16, u32, u32); 9] = [
        (256, 4, 1, 1),
        (257, 4, 1, 1),
        (258, 3, 1, 8),
        (259, 3, 1, 1),
        (262, 3, 1, 1),
        (273, 4, 1, 122),
        (277, 3, 1, 1),
        (278, 4, 1, 1),
        (279, 4, 1, 1),
    ];
    bytes.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, field_type, count, value) in entries {
        bytes.extend_from_slice(&tag.to_le_bytes());
        bytes.extend_from_slice(&field_type.to_le_bytes());
        bytes.extend_from_slice(&count.to_le_bytes());
        if field_type == 3 {
            bytes.extend_from_slice(&(value as u16).to_le_bytes());
            bytes.extend_from_slice(&[0u8; 2]);
        } else {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.push(42); // the single pixel at offset 122

    match decode_geotiff(&bytes) {
        Err(GeoError::MalformedInput { detail }) => {
            assert!(detail.contains("ModelPixelScale"), "detail: {}", detail)
        }
        other => panic!("expected malformed input, got {:?}", other),
    }
}
