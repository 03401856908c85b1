//! Byte-level builder for NetCDF classic (CDF-1) fixtures.
//!
//! Emits fixed-size dimensions and double-typed variables, which is all
//! the parser tests need. Offsets are computed after the header is laid
//! out and patched in place.

use bytes::Bytes;

enum AttrSpec {
    Text(String),
    Number(f64),
}

struct VarSpec {
    name: String,
    dims: Vec<String>,
    attrs: Vec<(String, AttrSpec)>,
    values: Vec<f64>,
}

#[derive(Default)]
pub struct NetCdfBuilder {
    dims: Vec<(String, usize)>,
    vars: Vec<VarSpec>,
}

impl NetCdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimension(mut self, name: &str, len: usize) -> Self {
        self.dims.push((name.to_string(), len));
        self
    }

    /// Add a double-typed variable over previously declared dimensions.
    /// `values` must match the dimension product.
    pub fn variable(mut self, name: &str, dims: &[&str], values: &[f64]) -> Self {
        let expected: usize = dims
            .iter()
            .map(|d| self.dim_len(d))
            .product();
        assert_eq!(values.len(), expected, "variable {} value count", name);
        self.vars.push(VarSpec {
            name: name.to_string(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
            attrs: Vec::new(),
            values: values.to_vec(),
        });
        self
    }

    /// Attach a char attribute to the most recently added variable.
    pub fn attr_text(mut self, name: &str, text: &str) -> Self {
        self.last_var()
            .attrs
            .push((name.to_string(), AttrSpec::Text(text.to_string())));
        self
    }

    /// Attach a double attribute to the most recently added variable.
    pub fn attr_number(mut self, name: &str, value: f64) -> Self {
        self.last_var()
            .attrs
            .push((name.to_string(), AttrSpec::Number(value)));
        self
    }

    fn last_var(&mut self) -> &mut VarSpec {
        self.vars.last_mut().expect("attribute before any variable")
    }

    fn dim_len(&self, name: &str) -> usize {
        self.dims
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, len)| *len)
            .unwrap_or_else(|| panic!("unknown dimension {}", name))
    }

    fn dim_id(&self, name: &str) -> u32 {
        self.dims
            .iter()
            .position(|(n, _)| n == name)
            .unwrap_or_else(|| panic!("unknown dimension {}", name)) as u32
    }

    pub fn build(self) -> Bytes {
        let mut out = Vec::new();
        out.extend_from_slice(b"CDF\x01");
        out.extend_from_slice(&0u32.to_be_bytes()); // numrecs

        // Dimension list.
        if self.dims.is_empty() {
            out.extend_from_slice(&[0u8; 8]);
        } else {
            out.extend_from_slice(&0x0Au32.to_be_bytes());
            out.extend_from_slice(&(self.dims.len() as u32).to_be_bytes());
            for (name, len) in &self.dims {
                write_name(&mut out, name);
                out.extend_from_slice(&(*len as u32).to_be_bytes());
            }
        }

        // No global attributes.
        out.extend_from_slice(&[0u8; 8]);

        // Variable list, with begin offsets patched afterwards.
        let mut begin_positions = Vec::with_capacity(self.vars.len());
        if self.vars.is_empty() {
            out.extend_from_slice(&[0u8; 8]);
        } else {
            out.extend_from_slice(&0x0Bu32.to_be_bytes());
            out.extend_from_slice(&(self.vars.len() as u32).to_be_bytes());
            for var in &self.vars {
                write_name(&mut out, &var.name);
                out.extend_from_slice(&(var.dims.len() as u32).to_be_bytes());
                for dim in &var.dims {
                    out.extend_from_slice(&self.dim_id(dim).to_be_bytes());
                }
                write_attr_list(&mut out, &var.attrs);
                out.extend_from_slice(&6u32.to_be_bytes()); // NC_DOUBLE
                out.extend_from_slice(&((var.values.len() * 8) as u32).to_be_bytes());
                begin_positions.push(out.len());
                out.extend_from_slice(&0u32.to_be_bytes());
            }
        }

        // Data section.
        let mut begin = out.len();
        for (var, position) in self.vars.iter().zip(&begin_positions) {
            out[*position..position + 4].copy_from_slice(&(begin as u32).to_be_bytes());
            begin += var.values.len() * 8;
        }
        for var in &self.vars {
            for value in &var.values {
                out.extend_from_slice(&value.to_be_bytes());
            }
        }

        Bytes::from(out)
    }
}

fn write_name(out: &mut Vec<u8>, name: &str) {
    out.extend_from_slice(&(name.len() as u32).to_be_bytes());
    out.extend_from_slice(name.as_bytes());
    let pad = (4 - name.len() % 4) % 4;
    out.extend_from_slice(&vec![0u8; pad]);
}

fn write_attr_list(out: &mut Vec<u8>, attrs: &[(String, AttrSpec)]) {
    if attrs.is_empty() {
        out.extend_from_slice(&[0u8; 8]);
        return;
    }
    out.extend_from_slice(&0x0Cu32.to_be_bytes());
    out.extend_from_slice(&(attrs.len() as u32).to_be_bytes());
    for (name, spec) in attrs {
        write_name(out, name);
        match spec {
            AttrSpec::Text(text) => {
                out.extend_from_slice(&2u32.to_be_bytes()); // NC_CHAR
                out.extend_from_slice(&(text.len() as u32).to_be_bytes());
                out.extend_from_slice(text.as_bytes());
                let pad = (4 - text.len() % 4) % 4;
                out.extend_from_slice(&vec![0u8; pad]);
            }
            AttrSpec::Number(value) => {
                out.extend_from_slice(&6u32.to_be_bytes()); // NC_DOUBLE
                out.extend_from_slice(&1u32.to_be_bytes());
                out.extend_from_slice(&value.to_be_bytes());
            }
        }
    }
}
