//! Categorical aggregation: group-by over one attribute, summing another.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use geo_common::{numeric_value, Dataset};

/// Summed total and percentage share for one category group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStat {
    pub total: f64,
    /// `total / grand_total * 100`; 0 when the grand total is 0.
    pub percentage: f64,
}

/// Group features by `categorical_attr` and sum `numeric_attr` per group.
///
/// Groups are keyed by the raw categorical value: strings as-is, other
/// scalars by their JSON rendering. No trimming or case folding is
/// applied. Features missing the categorical attribute (or carrying a
/// JSON null) are skipped. The numeric attribute coerces to 0 when it
/// does not parse, and the feature still counts toward its group.
///
/// Zero groups yield an empty map, never an error.
pub fn aggregate(
    dataset: &Dataset,
    categorical_attr: &str,
    numeric_attr: &str,
) -> BTreeMap<String, GroupStat> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for feature in &dataset.features {
        let category = match feature.attribute(categorical_attr) {
            Some(Value::Null) | None => continue,
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        let value = feature
            .attribute(numeric_attr)
            .and_then(numeric_value)
            .unwrap_or(0.0);
        *totals.entry(category).or_insert(0.0) += value;
    }

    let grand_total: f64 = totals.values().sum();
    debug!(
        groups = totals.len(),
        grand_total, categorical_attr, numeric_attr, "aggregated dataset"
    );

    totals
        .into_iter()
        .map(|(category, total)| {
            let percentage = if grand_total == 0.0 {
                0.0
            } else {
                total / grand_total * 100.0
            };
            (category, GroupStat { total, percentage })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_common::{FeatureRecord, Geometry};
    use serde_json::json;

    fn dataset(rows: Vec<Value>) -> Dataset {
        let features = rows
            .into_iter()
            .map(|props| FeatureRecord {
                geometry: Geometry::Point {
                    coordinates: vec![0.0, 0.0],
                },
                properties: props.as_object().cloned().unwrap(),
            })
            .collect();
        Dataset::from_features(features).unwrap()
    }

    #[test]
    fn test_groups_sum_and_share() {
        let d = dataset(vec![
            json!({"cat": "A", "val": "10"}),
            json!({"cat": "A", "val": "5"}),
            json!({"cat": "B", "val": "15"}),
        ]);
        let result = aggregate(&d, "cat", "val");
        assert_eq!(result.len(), 2);
        assert_eq!(result["A"].total, 15.0);
        assert_eq!(result["B"].total, 15.0);
        assert!((result["A"].percentage - 50.0).abs() < 1e-9);
        assert!((result["B"].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_sum_to_100() {
        let d = dataset(vec![
            json!({"cat": "A", "val": 1.5}),
            json!({"cat": "B", "val": 2.25}),
            json!({"cat": "C", "val": 7.75}),
            json!({"cat": "B", "val": 0.5}),
        ]);
        let result = aggregate(&d, "cat", "val");
        let sum: f64 = result.values().map(|g| g.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9, "shares sum to {}", sum);
    }

    #[test]
    fn test_non_numeric_coerces_to_zero_but_counts() {
        let d = dataset(vec![
            json!({"cat": "A", "val": "oops"}),
            json!({"cat": "A", "val": 10}),
        ]);
        let result = aggregate(&d, "cat", "val");
        assert_eq!(result["A"].total, 10.0);
    }

    #[test]
    fn test_missing_categorical_is_skipped() {
        let d = dataset(vec![
            json!({"val": 10}),
            json!({"cat": null, "val": 5}),
            json!({"cat": "A", "val": 1}),
        ]);
        let result = aggregate(&d, "cat", "val");
        assert_eq!(result.len(), 1);
        assert_eq!(result["A"].total, 1.0);
    }

    #[test]
    fn test_no_groups_yields_empty_map() {
        let d = dataset(vec![json!({"val": 10})]);
        assert!(aggregate(&d, "cat", "val").is_empty());
    }

    #[test]
    fn test_zero_grand_total_has_zero_shares() {
        let d = dataset(vec![
            json!({"cat": "A", "val": 0}),
            json!({"cat": "B", "val": "x"}),
        ]);
        let result = aggregate(&d, "cat", "val");
        assert_eq!(result["A"].percentage, 0.0);
        assert_eq!(result["B"].percentage, 0.0);
    }

    #[test]
    fn test_raw_equality_no_normalization() {
        let d = dataset(vec![
            json!({"cat": "a", "val": 1}),
            json!({"cat": "A", "val": 1}),
            json!({"cat": " A", "val": 1}),
        ]);
        let result = aggregate(&d, "cat", "val");
        assert_eq!(result.len(), 3);
    }
}
