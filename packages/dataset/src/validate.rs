//! Completeness checks over a loaded dataset.
//!
//! Annotation fails outright when any feature lacks a value for the chosen
//! year. Checking up front lets the CLI warn about gaps and tell the user
//! which years can be classified at all.

use std::collections::BTreeMap;

use geojson::FeatureCollection;
use income_map_choropleth::{feature_label, series_value};

use crate::config::DatasetConfig;

/// Result of checking a dataset against its config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetReport {
    /// Number of features in the collection.
    pub feature_count: usize,
    /// Indices of features without a usable name property.
    pub unnamed: Vec<usize>,
    /// Year -> labels of features with no finite value for that year.
    pub missing: BTreeMap<u16, Vec<String>>,
}

impl DatasetReport {
    /// Whether every feature is named and has a value for every year.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.feature_count > 0 && self.unnamed.is_empty() && self.missing.is_empty()
    }

    /// Years in `config` that every feature has a value for.
    #[must_use]
    pub fn classifiable_years(&self, config: &DatasetConfig) -> Vec<u16> {
        if self.feature_count == 0 {
            return Vec::new();
        }
        config
            .years()
            .filter(|year| !self.missing.contains_key(year))
            .collect()
    }
}

/// Checks every feature for a name and a finite value in every year.
///
/// Problems are logged as warnings and collected in the report; nothing
/// here fails.
#[must_use]
pub fn validate_collection(
    collection: &FeatureCollection,
    config: &DatasetConfig,
) -> DatasetReport {
    let mut report = DatasetReport {
        feature_count: collection.features.len(),
        ..DatasetReport::default()
    };

    if collection.features.is_empty() {
        log::warn!("Dataset has no features");
        return report;
    }

    for (index, feature) in collection.features.iter().enumerate() {
        let named = feature
            .property(&config.id_property)
            .and_then(serde_json::Value::as_str)
            .is_some_and(|s| !s.trim().is_empty());
        if !named {
            report.unnamed.push(index);
        }
    }

    for year in config.years() {
        let accessor = series_value(&config.series_property, year);
        let missing: Vec<String> = collection
            .features
            .iter()
            .enumerate()
            .filter(|&(_, feature)| !accessor(feature).is_some_and(f64::is_finite))
            .map(|(index, feature)| feature_label(feature, index))
            .collect();

        if !missing.is_empty() {
            log::warn!(
                "{} of {} features have no {} value for {year}: {}",
                missing.len(),
                collection.features.len(),
                config.series_property,
                missing.join(", ")
            );
            report.missing.insert(year, missing);
        }
    }

    if !report.unnamed.is_empty() {
        log::warn!(
            "{} features have no '{}' property",
            report.unnamed.len(),
            config.id_property
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::parse_collection;

    fn config() -> DatasetConfig {
        DatasetConfig {
            first_year: 2000,
            last_year: 2002,
            ..DatasetConfig::embedded()
        }
    }

    #[test]
    fn complete_dataset_has_no_gaps() {
        let collection = parse_collection(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "geometry": null, "properties": {
                        "name": "Iowa",
                        "income": { "2000": 1, "2001": 2, "2002": 3 } } }
                ]
            }"#,
        )
        .unwrap();

        let report = validate_collection(&collection, &config());
        assert!(report.is_complete(), "{report:?}");
        assert_eq!(report.classifiable_years(&config()), vec![2000, 2001, 2002]);
    }

    #[test]
    fn reports_missing_years_and_names() {
        let collection = parse_collection(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "geometry": null, "properties": {
                        "name": "Iowa",
                        "income": { "2000": 1, "2001": 2, "2002": 3 } } },
                    { "type": "Feature", "geometry": null, "properties": {
                        "income": { "2000": 1, "2002": "n/a" } } }
                ]
            }"#,
        )
        .unwrap();

        let report = validate_collection(&collection, &config());
        assert!(!report.is_complete());
        assert_eq!(report.unnamed, vec![1]);
        assert_eq!(report.missing.get(&2001), Some(&vec!["#1".to_string()]));
        assert_eq!(report.missing.get(&2002), Some(&vec!["#1".to_string()]));
        assert_eq!(report.classifiable_years(&config()), vec![2000]);
    }

    #[test]
    fn empty_dataset_classifies_nothing() {
        let collection = parse_collection(r#"{ "type": "FeatureCollection", "features": [] }"#)
            .unwrap();
        let report = validate_collection(&collection, &config());
        assert!(!report.is_complete());
        assert!(report.classifiable_years(&config()).is_empty());
    }
}
