//! Low-level NetCDF classic (CDF-1/CDF-2) header parsing.
//!
//! The classic file layout is a single big-endian header followed by the
//! data section:
//!
//! ```text
//! magic  numrecs  dim_list  gatt_list  var_list  data
//! ```
//!
//! List tags: 0x0A dimensions, 0x0C attributes, 0x0B variables. An absent
//! list is encoded as two zero words. Names and attribute values are
//! padded to four-byte boundaries.

use serde_json::{Map, Value};

use geo_common::{GeoError, GeoResult};

/// External data types of the classic format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NcType {
    Byte,
    Char,
    Short,
    Int,
    Float,
    Double,
}

impl NcType {
    fn from_code(code: u32) -> GeoResult<Self> {
        match code {
            1 => Ok(NcType::Byte),
            2 => Ok(NcType::Char),
            3 => Ok(NcType::Short),
            4 => Ok(NcType::Int),
            5 => Ok(NcType::Float),
            6 => Ok(NcType::Double),
            other => Err(GeoError::malformed(format!(
                "netcdf header: unknown external type {}",
                other
            ))),
        }
    }

    /// Size of one element in bytes.
    pub fn size(self) -> usize {
        match self {
            NcType::Byte | NcType::Char => 1,
            NcType::Short => 2,
            NcType::Int | NcType::Float => 4,
            NcType::Double => 8,
        }
    }
}

/// A named dimension. `len == 0` in the file marks the record dimension.
#[derive(Debug, Clone)]
pub struct NcDim {
    pub name: String,
    pub len: usize,
    pub is_record: bool,
}

/// A variable entry from the header. Data is not read here; `begin`
/// points at the variable's slab in the data section.
#[derive(Debug, Clone)]
pub struct NcVar {
    pub name: String,
    pub dim_ids: Vec<usize>,
    pub attributes: Map<String, Value>,
    pub nc_type: NcType,
    pub vsize: usize,
    pub begin: u64,
}

/// The parsed header of a classic file.
#[derive(Debug, Clone)]
pub struct NcHeader {
    pub version: u8,
    pub num_records: usize,
    pub dims: Vec<NcDim>,
    pub global_attributes: Map<String, Value>,
    pub vars: Vec<NcVar>,
}

impl NcHeader {
    /// Whether any of a variable's dimensions is the record dimension.
    pub fn is_record_var(&self, var: &NcVar) -> bool {
        var.dim_ids
            .iter()
            .any(|&id| self.dims.get(id).map_or(false, |d| d.is_record))
    }
}

const TAG_DIMENSION: u32 = 0x0A;
const TAG_VARIABLE: u32 = 0x0B;
const TAG_ATTRIBUTE: u32 = 0x0C;

/// Parse the header of a classic NetCDF file.
pub fn parse_header(data: &[u8]) -> GeoResult<NcHeader> {
    let mut reader = ByteReader::new(data);

    let magic = reader.read_bytes(4, "magic")?;
    if &magic[0..3] != b"CDF" {
        return Err(GeoError::malformed(
            "netcdf header: missing CDF magic bytes",
        ));
    }
    let version = magic[3];
    if version != 1 && version != 2 {
        return Err(GeoError::malformed(format!(
            "netcdf header: unsupported classic version {}",
            version
        )));
    }

    // 0xFFFFFFFF marks a streaming file with an indeterminate count.
    let numrecs_raw = reader.read_u32("numrecs")?;
    let num_records = if numrecs_raw == u32::MAX {
        0
    } else {
        numrecs_raw as usize
    };

    let dims = parse_dim_list(&mut reader)?;
    let global_attributes = parse_attr_list(&mut reader)?;
    let vars = parse_var_list(&mut reader, version, dims.len())?;

    Ok(NcHeader {
        version,
        num_records,
        dims,
        global_attributes,
        vars,
    })
}

fn parse_dim_list(reader: &mut ByteReader) -> GeoResult<Vec<NcDim>> {
    let (tag, count) = reader.read_list_header("dimension list")?;
    if count > 0 && tag != TAG_DIMENSION {
        return Err(GeoError::malformed("netcdf header: bad dimension tag"));
    }
    let mut dims = Vec::with_capacity(count);
    for _ in 0..count {
        let name = reader.read_name()?;
        let len = reader.read_u32("dimension length")? as usize;
        dims.push(NcDim {
            name,
            len,
            is_record: len == 0,
        });
    }
    Ok(dims)
}

fn parse_attr_list(reader: &mut ByteReader) -> GeoResult<Map<String, Value>> {
    let (tag, count) = reader.read_list_header("attribute list")?;
    if count > 0 && tag != TAG_ATTRIBUTE {
        return Err(GeoError::malformed("netcdf header: bad attribute tag"));
    }
    let mut attributes = Map::new();
    for _ in 0..count {
        let name = reader.read_name()?;
        let nc_type = NcType::from_code(reader.read_u32("attribute type")?)?;
        let nelems = reader.read_u32("attribute element count")? as usize;
        let value = reader.read_attr_value(nc_type, nelems)?;
        attributes.insert(name, value);
    }
    Ok(attributes)
}

fn parse_var_list(
    reader: &mut ByteReader,
    version: u8,
    dim_count: usize,
) -> GeoResult<Vec<NcVar>> {
    let (tag, count) = reader.read_list_header("variable list")?;
    if count > 0 && tag != TAG_VARIABLE {
        return Err(GeoError::malformed("netcdf header: bad variable tag"));
    }
    let mut vars = Vec::with_capacity(count);
    for _ in 0..count {
        let name = reader.read_name()?;
        let ndims = reader.read_u32("variable rank")? as usize;
        let mut dim_ids = Vec::with_capacity(ndims);
        for _ in 0..ndims {
            let id = reader.read_u32("dimension id")? as usize;
            if id >= dim_count {
                return Err(GeoError::malformed(format!(
                    "netcdf header: variable {} references dimension {} of {}",
                    name, id, dim_count
                )));
            }
            dim_ids.push(id);
        }
        let attributes = parse_attr_list(reader)?;
        let nc_type = NcType::from_code(reader.read_u32("variable type")?)?;
        let vsize = reader.read_u32("variable size")? as usize;
        let begin = if version == 1 {
            reader.read_u32("variable offset")? as u64
        } else {
            reader.read_u64("variable offset")?
        };
        vars.push(NcVar {
            name,
            dim_ids,
            attributes,
            nc_type,
            vsize,
            begin,
        });
    }
    Ok(vars)
}

/// Big-endian cursor over the header bytes.
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_bytes(&mut self, n: usize, what: &str) -> GeoResult<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(GeoError::malformed(format!(
                "netcdf header: truncated reading {}",
                what
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self, what: &str) -> GeoResult<u32> {
        let b = self.read_bytes(4, what)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_u64(&mut self, what: &str) -> GeoResult<u64> {
        let b = self.read_bytes(8, what)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn skip_padding(&mut self, unpadded: usize, what: &str) -> GeoResult<()> {
        let pad = (4 - unpadded % 4) % 4;
        self.read_bytes(pad, what)?;
        Ok(())
    }

    fn read_name(&mut self) -> GeoResult<String> {
        let len = self.read_u32("name length")? as usize;
        let raw = self.read_bytes(len, "name")?;
        let name = std::str::from_utf8(raw)
            .map_err(|_| GeoError::malformed("netcdf header: name is not UTF-8"))?
            .to_string();
        self.skip_padding(len, "name padding")?;
        Ok(name)
    }

    fn read_list_header(&mut self, what: &str) -> GeoResult<(u32, usize)> {
        let tag = self.read_u32(what)?;
        let count = self.read_u32(what)? as usize;
        Ok((tag, count))
    }

    /// Read an attribute's value array into a JSON value: char data as a
    /// string, a single number as a number, multiple numbers as an array.
    fn read_attr_value(&mut self, nc_type: NcType, nelems: usize) -> GeoResult<Value> {
        if nc_type == NcType::Char {
            let raw = self.read_bytes(nelems, "attribute chars")?;
            let text = String::from_utf8_lossy(raw)
                .trim_end_matches('\0')
                .to_string();
            self.skip_padding(nelems, "attribute padding")?;
            return Ok(Value::String(text));
        }

        let mut numbers = Vec::with_capacity(nelems);
        for _ in 0..nelems {
            let b = self.read_bytes(nc_type.size(), "attribute value")?;
            numbers.push(decode_scalar(nc_type, b));
        }
        self.skip_padding(nelems * nc_type.size(), "attribute padding")?;

        let mut values = numbers.into_iter().map(Value::from);
        match nelems {
            0 => Ok(Value::Null),
            1 => Ok(values.next().unwrap_or(Value::Null)),
            _ => Ok(Value::Array(values.collect())),
        }
    }
}

/// Decode one big-endian scalar to f64.
pub fn decode_scalar(nc_type: NcType, b: &[u8]) -> f64 {
    match nc_type {
        NcType::Byte => b[0] as i8 as f64,
        NcType::Char => b[0] as f64,
        NcType::Short => i16::from_be_bytes([b[0], b[1]]) as f64,
        NcType::Int => i32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64,
        NcType::Float => f32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64,
        NcType::Double => f64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
    }
}
