//! Variable metadata for multi-dimensional gridded datasets.

use serde_json::{Map, Value};

use crate::dataset::numeric_value;

/// Metadata for one variable in a self-describing gridded file.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDescriptor {
    pub name: String,
    /// Dimension names, slowest-varying first.
    pub dimensions: Vec<String>,
    pub attributes: Map<String, Value>,
}

impl VariableDescriptor {
    fn string_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    pub fn long_name(&self) -> Option<&str> {
        self.string_attribute("long_name")
    }

    pub fn units(&self) -> Option<&str> {
        self.string_attribute("units")
    }

    /// The declared no-data sentinel: `_FillValue` first, then the older
    /// `missing_value` convention.
    pub fn fill_value(&self) -> Option<f64> {
        self.attributes
            .get("_FillValue")
            .or_else(|| self.attributes.get("missing_value"))
            .and_then(numeric_value)
    }

    /// Numeric attribute lookup (scale_factor, add_offset, ...).
    pub fn numeric_attribute(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(numeric_value)
    }

    /// Human-readable description: "long_name (units)" when both exist,
    /// long_name alone otherwise, empty when neither is present.
    pub fn description(&self) -> String {
        match (self.long_name(), self.units()) {
            (Some(long_name), Some(units)) => format!("{} ({})", long_name, units),
            (Some(long_name), None) => long_name.to_string(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(attrs: Value) -> VariableDescriptor {
        VariableDescriptor {
            name: "t2m".to_string(),
            dimensions: vec!["lat".to_string(), "lon".to_string()],
            attributes: attrs.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_description_variants() {
        let both = descriptor(json!({"long_name": "2m temperature", "units": "K"}));
        assert_eq!(both.description(), "2m temperature (K)");

        let name_only = descriptor(json!({"long_name": "2m temperature"}));
        assert_eq!(name_only.description(), "2m temperature");

        let neither = descriptor(json!({}));
        assert_eq!(neither.description(), "");
    }

    #[test]
    fn test_fill_value_prefers_fillvalue_attr() {
        let d = descriptor(json!({"_FillValue": -9999.0, "missing_value": -1.0}));
        assert_eq!(d.fill_value(), Some(-9999.0));

        let legacy = descriptor(json!({"missing_value": -1.0}));
        assert_eq!(legacy.fill_value(), Some(-1.0));
    }
}
