//! Pure-Rust parser for NetCDF classic (CDF-1/CDF-2) gridded datasets.
//!
//! Parses the self-describing header into [`VariableDescriptor`]s, resolves
//! the coordinate axes (with `latitude`/`lat` and `longitude`/`lon`
//! aliasing), computes geographic bounds, and hands back a lazy
//! [`NetCdfDataset`] that materializes one variable's grid at a time.
//! Full-file materialization is deliberately avoided: uploads can hold
//! many variables and usually only one is visualized.

pub mod classic;

use bytes::Bytes;
use tracing::debug;

use geo_common::{BoundingBox, GeoError, GeoResult, NumericGrid, VariableDescriptor};

use classic::{decode_scalar, NcHeader, NcVar};

/// Axis resolution order: the primary coordinate name, then its alias.
const LATITUDE_NAMES: [&str; 2] = ["latitude", "lat"];
const LONGITUDE_NAMES: [&str; 2] = ["longitude", "lon"];

/// A decoded multi-dimensional dataset.
///
/// Keeps the raw bytes plus the parsed header; variable grids are
/// extracted on demand via [`grid`](Self::grid).
#[derive(Debug, Clone)]
pub struct NetCdfDataset {
    bytes: Bytes,
    header: NcHeader,
    descriptors: Vec<VariableDescriptor>,
    bounds: BoundingBox,
    /// Resolved latitude axis samples, kept for row-order decisions.
    latitudes: Vec<f64>,
}

/// Decode a NetCDF classic byte buffer.
///
/// Fails with `MalformedInput` when the bytes are not classic NetCDF,
/// `MissingCoordinates` when neither coordinate name nor alias resolves
/// for an axis, and `InvalidCoordinates` when a resolved axis has zero
/// numeric samples after filtering.
pub fn decode_netcdf(bytes: Bytes) -> GeoResult<NetCdfDataset> {
    let header = classic::parse_header(&bytes)?;

    let descriptors = header
        .vars
        .iter()
        .map(|var| VariableDescriptor {
            name: var.name.clone(),
            dimensions: var
                .dim_ids
                .iter()
                .map(|&id| header.dims[id].name.clone())
                .collect(),
            attributes: var.attributes.clone(),
        })
        .collect();

    let latitudes = read_axis(&bytes, &header, &LATITUDE_NAMES)?;
    let longitudes = read_axis(&bytes, &header, &LONGITUDE_NAMES)?;

    let bounds = BoundingBox::new(
        longitudes.iter().copied().fold(f64::INFINITY, f64::min),
        latitudes.iter().copied().fold(f64::INFINITY, f64::min),
        longitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        latitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    );

    debug!(
        variables = header.vars.len(),
        lat_samples = latitudes.len(),
        lon_samples = longitudes.len(),
        "decoded NetCDF header"
    );

    Ok(NetCdfDataset {
        bytes,
        header,
        descriptors,
        bounds,
        latitudes,
    })
}

impl NetCdfDataset {
    /// Metadata for every variable in the file, in header order.
    pub fn variables(&self) -> &[VariableDescriptor] {
        &self.descriptors
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Find a variable's descriptor by name.
    pub fn variable(&self, name: &str) -> Option<&VariableDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Materialize one variable's grid.
    ///
    /// The variable's trailing two dimensions become the grid's rows and
    /// columns; for higher-rank variables the first slab of every leading
    /// dimension is taken. `scale_factor`/`add_offset` are applied, raw
    /// samples equal to the declared fill value become NaN, and rows are
    /// reversed when the latitude axis descends so grid row 0 is always
    /// southernmost.
    pub fn grid(&self, name: &str) -> GeoResult<NumericGrid> {
        let var = self
            .header
            .vars
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| GeoError::malformed(format!("unknown variable: {}", name)))?;
        let descriptor = self
            .variable(name)
            .ok_or_else(|| GeoError::malformed(format!("unknown variable: {}", name)))?;

        if var.dim_ids.len() < 2 {
            return Err(GeoError::malformed(format!(
                "variable {} is not gridded (rank {})",
                name,
                var.dim_ids.len()
            )));
        }

        let dim_len = |id: usize| -> usize {
            let dim = &self.header.dims[id];
            if dim.is_record {
                // Record slabs are read one at a time; slab 0 here.
                1
            } else {
                dim.len
            }
        };
        let height = dim_len(var.dim_ids[var.dim_ids.len() - 2]);
        let width = dim_len(var.dim_ids[var.dim_ids.len() - 1]);
        if width == 0 || height == 0 {
            return Err(GeoError::EmptyDataset);
        }

        let raw = self.read_raw(var, width * height)?;

        let fill = descriptor.fill_value();
        let scale = descriptor.numeric_attribute("scale_factor").unwrap_or(1.0);
        let offset = descriptor.numeric_attribute("add_offset").unwrap_or(0.0);

        let mut values: Vec<f64> = raw
            .into_iter()
            .map(|v| {
                if fill.map_or(false, |f| v == f) {
                    f64::NAN
                } else {
                    v * scale + offset
                }
            })
            .collect();

        // Row 0 must be southernmost; descending latitude axes store
        // north first.
        let descending = matches!(
            (self.latitudes.first(), self.latitudes.last()),
            (Some(first), Some(last)) if first > last
        );
        if descending {
            for row in 0..height / 2 {
                let opposite = height - 1 - row;
                for col in 0..width {
                    values.swap(row * width + col, opposite * width + col);
                }
            }
        }

        debug!(variable = name, width, height, "materialized grid");
        Ok(NumericGrid::new(values, width, height, self.bounds, fill))
    }

    /// Read the first `count` elements of a variable's slab as f64.
    fn read_raw(&self, var: &NcVar, count: usize) -> GeoResult<Vec<f64>> {
        let elem_size = var.nc_type.size();
        let begin = var.begin as usize;
        let end = begin
            .checked_add(count * elem_size)
            .ok_or_else(|| GeoError::malformed("netcdf data: offset overflow"))?;
        if end > self.bytes.len() {
            return Err(GeoError::malformed(format!(
                "netcdf data: variable {} truncated",
                var.name
            )));
        }

        let slab = &self.bytes[begin..end];
        Ok(slab
            .chunks_exact(elem_size)
            .map(|chunk| decode_scalar(var.nc_type, chunk))
            .collect())
    }
}

/// Resolve one coordinate axis: try each candidate name in order, then
/// read and filter its values.
fn read_axis(bytes: &Bytes, header: &NcHeader, candidates: &[&str]) -> GeoResult<Vec<f64>> {
    let var = candidates
        .iter()
        .find_map(|name| header.vars.iter().find(|v| v.name == *name))
        .ok_or_else(|| GeoError::MissingCoordinates(candidates[0].to_string()))?;

    let count: usize = var
        .dim_ids
        .iter()
        .map(|&id| {
            let dim = &header.dims[id];
            if dim.is_record {
                header.num_records.max(1)
            } else {
                dim.len
            }
        })
        .product();

    let elem_size = var.nc_type.size();
    let begin = var.begin as usize;
    let end = begin.saturating_add(count * elem_size);
    if end > bytes.len() {
        return Err(GeoError::malformed(format!(
            "netcdf data: coordinate {} truncated",
            var.name
        )));
    }

    let values: Vec<f64> = bytes[begin..end]
        .chunks_exact(elem_size)
        .map(|chunk| decode_scalar(var.nc_type, chunk))
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return Err(GeoError::InvalidCoordinates(var.name.clone()));
    }
    Ok(values)
}
