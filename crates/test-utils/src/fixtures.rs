//! In-memory format fixtures.
//!
//! All fixtures are byte-built so the suite never depends on files on
//! disk or on writer support in the format crates.

use std::io::Write;

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A small point FeatureCollection with `name` and `value` attributes.
pub fn geojson_fixture() -> String {
    r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [9.19, 45.46]},
             "properties": {"name": "Milan", "value": 10}},
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [11.25, 43.77]},
             "properties": {"name": "Florence", "value": 5}},
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [12.49, 41.89]},
             "properties": {"name": "Rome", "value": 15}}
        ]
    }"#
    .to_string()
}

/// One record of the point shapefile fixture.
pub struct ShapePoint {
    pub x: f64,
    pub y: f64,
    pub name: &'static str,
    pub value: f64,
}

/// Build a zipped shapefile bundle of point records with a `NAME`
/// character field and a `VALUE` numeric field.
///
/// The `.shp`, `.shx`, and `.dbf` members are hand-assembled per the
/// ESRI white paper and dBase III layouts.
pub fn shapefile_zip_fixture(points: &[ShapePoint]) -> Vec<u8> {
    let shp = build_shp(points);
    let shx = build_shx(points.len());
    let dbf = build_dbf(points);
    zip_members(&[("bundle.shp", &shp), ("bundle.shx", &shx), ("bundle.dbf", &dbf)])
}

/// Same bundle with the named members omitted, for missing-member tests.
pub fn shapefile_zip_without(points: &[ShapePoint], omit: &[&str]) -> Vec<u8> {
    let shp = build_shp(points);
    let shx = build_shx(points.len());
    let dbf = build_dbf(points);
    let members: Vec<(&str, &Vec<u8>)> = [
        ("bundle.shp", &shp),
        ("bundle.shx", &shx),
        ("bundle.dbf", &dbf),
    ]
    .into_iter()
    .filter(|(name, _)| !omit.iter().any(|o| name.ends_with(o)))
    .collect();
    zip_members(&members)
}

fn zip_members(members: &[(&str, &Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, data) in members {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Main-file header shared by `.shp` and `.shx` (100 bytes).
fn shape_header(file_len_words: i32, points: &[ShapePoint]) -> Vec<u8> {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if points.is_empty() {
        min_x = 0.0;
        min_y = 0.0;
        max_x = 0.0;
        max_y = 0.0;
    }

    let mut out = Vec::with_capacity(100);
    out.extend_from_slice(&9994i32.to_be_bytes());
    out.extend_from_slice(&[0u8; 20]);
    out.extend_from_slice(&file_len_words.to_be_bytes());
    out.extend_from_slice(&1000i32.to_le_bytes());
    out.extend_from_slice(&1i32.to_le_bytes()); // point shape type
    for bound in [min_x, min_y, max_x, max_y, 0.0, 0.0, 0.0, 0.0] {
        out.extend_from_slice(&bound.to_le_bytes());
    }
    out
}

fn build_shp(points: &[ShapePoint]) -> Vec<u8> {
    // Each point record: 8-byte record header + 20 bytes of content.
    let total_bytes = 100 + points.len() * 28;
    let mut out = shape_header((total_bytes / 2) as i32, points);
    for (i, p) in points.iter().enumerate() {
        out.extend_from_slice(&((i + 1) as i32).to_be_bytes());
        out.extend_from_slice(&10i32.to_be_bytes()); // content words
        out.extend_from_slice(&1i32.to_le_bytes());
        out.extend_from_slice(&p.x.to_le_bytes());
        out.extend_from_slice(&p.y.to_le_bytes());
    }
    out
}

fn build_shx(record_count: usize) -> Vec<u8> {
    let total_bytes = 100 + record_count * 8;
    let mut out = shape_header((total_bytes / 2) as i32, &[]);
    for i in 0..record_count {
        let offset_words = (100 + i * 28) / 2;
        out.extend_from_slice(&(offset_words as i32).to_be_bytes());
        out.extend_from_slice(&10i32.to_be_bytes());
    }
    out
}

const DBF_NAME_LEN: usize = 20;
const DBF_VALUE_LEN: usize = 12;

fn build_dbf(points: &[ShapePoint]) -> Vec<u8> {
    let header_size = 32 + 32 * 2 + 1;
    let record_size = 1 + DBF_NAME_LEN + DBF_VALUE_LEN;

    let mut out = Vec::new();
    out.push(0x03); // dBase III, no memo
    out.extend_from_slice(&[24, 1, 1]); // last-update stamp
    out.extend_from_slice(&(points.len() as u32).to_le_bytes());
    out.extend_from_slice(&(header_size as u16).to_le_bytes());
    out.extend_from_slice(&(record_size as u16).to_le_bytes());
    out.extend_from_slice(&[0u8; 20]);

    out.extend_from_slice(&field_descriptor("NAME", b'C', DBF_NAME_LEN as u8, 0));
    out.extend_from_slice(&field_descriptor("VALUE", b'N', DBF_VALUE_LEN as u8, 2));
    out.push(0x0D);

    for p in points {
        out.push(0x20); // not deleted
        out.extend_from_slice(&pad_left_justified(p.name, DBF_NAME_LEN));
        out.extend_from_slice(&pad_right_justified(
            &format!("{:.2}", p.value),
            DBF_VALUE_LEN,
        ));
    }
    out.push(0x1A);
    out
}

fn field_descriptor(name: &str, field_type: u8, length: u8, decimals: u8) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[..name.len()].copy_from_slice(name.as_bytes());
    out[11] = field_type;
    out[16] = length;
    out[17] = decimals;
    out
}

fn pad_left_justified(text: &str, width: usize) -> Vec<u8> {
    let mut out = text.as_bytes()[..text.len().min(width)].to_vec();
    out.resize(width, b' ');
    out
}

fn pad_right_justified(text: &str, width: usize) -> Vec<u8> {
    let body = &text.as_bytes()[..text.len().min(width)];
    let mut out = vec![b' '; width - body.len()];
    out.extend_from_slice(body);
    out
}

/// Minimal single-band 8-bit GeoTIFF with pixel-scale/tiepoint tags.
pub struct GeoTiffFixture {
    pub width: u32,
    pub height: u32,
    /// Row-major top-down samples, `width * height` of them.
    pub values: Vec<u8>,
    /// Model coordinate of the top-left corner (lon, lat).
    pub origin: (f64, f64),
    /// Degrees per pixel (x, y), both positive.
    pub scale: (f64, f64),
    pub nodata: Option<f64>,
}

const TIFF_TYPE_ASCII: u16 = 2;
const TIFF_TYPE_SHORT: u16 = 3;
const TIFF_TYPE_LONG: u16 = 4;
const TIFF_TYPE_DOUBLE: u16 = 12;

impl GeoTiffFixture {
    pub fn build(&self) -> Vec<u8> {
        assert_eq!(self.values.len(), (self.width * self.height) as usize);

        let nodata_text = self
            .nodata
            .map(|n| {
                let mut s = format!("{}", n).into_bytes();
                s.push(0);
                // Keep the payload over four bytes so it is stored at the
                // offset the IFD entry points to; TIFF stores shorter
                // values inline in the entry itself.
                while s.len() <= 4 {
                    s.push(0);
                }
                if s.len() % 2 == 1 {
                    s.push(0);
                }
                s
            })
            .unwrap_or_default();

        let entry_count: u16 = if self.nodata.is_some() { 12 } else { 11 };
        let ifd_len = 2 + 12 * entry_count as u32 + 4;
        let scale_offset = 8 + ifd_len;
        let tiepoint_offset = scale_offset + 24;
        let nodata_offset = tiepoint_offset + 48;
        let strip_offset = nodata_offset + nodata_text.len() as u32;

        let mut out = Vec::new();
        out.extend_from_slice(b"II");
        out.extend_from_slice(&42u16.to_le_bytes());
        out.extend_from_slice(&8u32.to_le_bytes());

        out.extend_from_slice(&entry_count.to_le_bytes());
        ifd_entry(&mut out, 256, TIFF_TYPE_LONG, 1, self.width);
        ifd_entry(&mut out, 257, TIFF_TYPE_LONG, 1, self.height);
        ifd_entry(&mut out, 258, TIFF_TYPE_SHORT, 1, 8);
        ifd_entry(&mut out, 259, TIFF_TYPE_SHORT, 1, 1); // uncompressed
        ifd_entry(&mut out, 262, TIFF_TYPE_SHORT, 1, 1); // black-is-zero
        ifd_entry(&mut out, 273, TIFF_TYPE_LONG, 1, strip_offset);
        ifd_entry(&mut out, 277, TIFF_TYPE_SHORT, 1, 1);
        ifd_entry(&mut out, 278, TIFF_TYPE_LONG, 1, self.height);
        ifd_entry(&mut out, 279, TIFF_TYPE_LONG, 1, self.values.len() as u32);
        ifd_entry(&mut out, 33550, TIFF_TYPE_DOUBLE, 3, scale_offset);
        ifd_entry(&mut out, 33922, TIFF_TYPE_DOUBLE, 6, tiepoint_offset);
        if self.nodata.is_some() {
            ifd_entry(
                &mut out,
                42113,
                TIFF_TYPE_ASCII,
                nodata_text.len() as u32,
                nodata_offset,
            );
        }
        out.extend_from_slice(&0u32.to_le_bytes()); // no next IFD

        for d in [self.scale.0, self.scale.1, 0.0] {
            out.extend_from_slice(&d.to_le_bytes());
        }
        for d in [0.0, 0.0, 0.0, self.origin.0, self.origin.1, 0.0] {
            out.extend_from_slice(&d.to_le_bytes());
        }
        out.extend_from_slice(&nodata_text);
        out.extend_from_slice(&self.values);
        out
    }
}

fn ifd_entry(out: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: u32) {
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&field_type.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    if field_type == TIFF_TYPE_SHORT && count == 1 {
        out.extend_from_slice(&(value as u16).to_le_bytes());
        out.extend_from_slice(&[0u8; 2]);
    } else {
        out.extend_from_slice(&value.to_le_bytes());
    }
}
