//! Choropleth classification: bucket an attribute's values into the
//! discrete environmental palette.

use std::collections::HashMap;

use tracing::debug;

use geo_common::{Dataset, FeatureKey};
use renderer::{Color, CHOROPLETH_PALETTE, DEFAULT_FEATURE_COLOR};

/// The result of classifying one attribute over one dataset.
///
/// Owned by whatever holds the active dataset; rebuilt whenever the
/// selected attribute or the dataset changes, never patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationState {
    pub attribute: String,
    /// Value range over features whose attribute parsed as a finite
    /// number. Equal min/max when one distinct value was seen; both 0
    /// when none were.
    pub min: f64,
    pub max: f64,
    /// Assigned color per feature identity key. Key collisions (derived
    /// keys are not unique) simply reuse the stored color.
    pub colors: HashMap<FeatureKey, Color>,
}

impl ClassificationState {
    /// Look up the color assigned to a feature key, falling back to the
    /// neutral default for keys that were never classified.
    pub fn color_for(&self, key: &FeatureKey) -> Color {
        self.colors.get(key).copied().unwrap_or(DEFAULT_FEATURE_COLOR)
    }
}

/// Classify `attribute` over the dataset with the 8-color palette.
///
/// Features whose attribute does not parse as a finite number are excluded
/// from the range computation and colored with the neutral default. Bucket
/// assignment is `min(floor(normalized * (N-1)), N-1)`, clamped at both
/// ends so floating error can never index out of bounds, and monotonic in
/// the attribute value.
pub fn classify(dataset: &Dataset, attribute: &str) -> ClassificationState {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for feature in &dataset.features {
        if let Some(value) = feature.numeric_attribute(attribute) {
            min = min.min(value);
            max = max.max(value);
        }
    }
    if min > max {
        min = 0.0;
        max = 0.0;
    }
    let range = max - min;

    let palette_max = CHOROPLETH_PALETTE.len() - 1;
    let mut colors = HashMap::with_capacity(dataset.len());
    for feature in &dataset.features {
        let color = match feature.numeric_attribute(attribute) {
            Some(value) => {
                let normalized = if range == 0.0 {
                    0.0
                } else {
                    ((value - min) / range).max(0.0)
                };
                let bucket = ((normalized * palette_max as f64).floor() as usize).min(palette_max);
                CHOROPLETH_PALETTE[bucket]
            }
            None => DEFAULT_FEATURE_COLOR,
        };
        colors.insert(feature.key(), color);
    }

    debug!(
        attribute,
        min,
        max,
        features = dataset.len(),
        "classified dataset"
    );

    ClassificationState {
        attribute: attribute.to_string(),
        min,
        max,
        colors,
    }
}
