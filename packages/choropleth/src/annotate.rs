//! Stamps every feature of a collection with its value and percentile bin.
//!
//! The input collection is only borrowed: each output feature is a clone
//! whose properties gain `value` and `percentile`. Either every feature is
//! annotated or the call fails without producing anything.

use geojson::{Feature, FeatureCollection, JsonObject};
use income_map_choropleth_models::{BIN_COUNT, PERCENTILE_PROPERTY, VALUE_PROPERTY};

use crate::{ChoroplethError, QuantileScale, accessor::feature_label};

/// Annotates `collection` using the fixed nine-bin quantile scale.
///
/// # Errors
///
/// * [`ChoroplethError::InvalidInput`] if the collection has no features.
/// * [`ChoroplethError::Accessor`] if `accessor` yields `None` or a
///   non-finite number for any feature.
pub fn annotate<F>(
    collection: &FeatureCollection,
    accessor: F,
) -> Result<FeatureCollection, ChoroplethError>
where
    F: Fn(&Feature) -> Option<f64>,
{
    annotate_with_bins(collection, accessor, BIN_COUNT)
}

/// Annotates `collection` with a quantile scale of `bin_count` bins.
///
/// # Errors
///
/// Same as [`annotate`], plus [`ChoroplethError::InvalidInput`] when
/// `bin_count` is zero.
pub fn annotate_with_bins<F>(
    collection: &FeatureCollection,
    accessor: F,
    bin_count: usize,
) -> Result<FeatureCollection, ChoroplethError>
where
    F: Fn(&Feature) -> Option<f64>,
{
    if collection.features.is_empty() {
        return Err(ChoroplethError::invalid_input(
            "feature collection has no features",
        ));
    }

    let values = collect_values(collection, &accessor)?;
    let scale = QuantileScale::new(&values, bin_count)?;

    let features = collection
        .features
        .iter()
        .zip(&values)
        .map(|(feature, &value)| annotate_feature(feature, value, scale.bin(value)))
        .collect();

    Ok(FeatureCollection {
        bbox: collection.bbox.clone(),
        features,
        foreign_members: collection.foreign_members.clone(),
    })
}

/// Applies the accessor to every feature, keeping index alignment.
///
/// # Errors
///
/// Returns [`ChoroplethError::Accessor`] for the first feature without a
/// finite value.
pub fn collect_values<F>(
    collection: &FeatureCollection,
    accessor: &F,
) -> Result<Vec<f64>, ChoroplethError>
where
    F: Fn(&Feature) -> Option<f64>,
{
    collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| match accessor(feature) {
            Some(value) if value.is_finite() => Ok(value),
            Some(value) => Err(ChoroplethError::Accessor {
                index,
                label: feature_label(feature, index),
                message: format!("value {value} is not finite"),
            }),
            None => Err(ChoroplethError::Accessor {
                index,
                label: feature_label(feature, index),
                message: "no numeric value".to_string(),
            }),
        })
        .collect()
}

fn annotate_feature(feature: &Feature, value: f64, bin: usize) -> Feature {
    let mut annotated = feature.clone();
    let properties = annotated.properties.get_or_insert_with(JsonObject::new);
    properties.insert(VALUE_PROPERTY.to_string(), serde_json::Value::from(value));
    properties.insert(PERCENTILE_PROPERTY.to_string(), serde_json::Value::from(bin));
    annotated
}

/// Reads the `percentile` bin index from an annotated feature.
#[must_use]
pub fn percentile_of(feature: &Feature) -> Option<usize> {
    feature
        .property(PERCENTILE_PROPERTY)
        .and_then(serde_json::Value::as_u64)
        .and_then(|bin| usize::try_from(bin).ok())
}

/// Reads the classified `value` from an annotated feature.
#[must_use]
pub fn value_of(feature: &Feature) -> Option<f64> {
    feature
        .property(VALUE_PROPERTY)
        .and_then(serde_json::Value::as_f64)
}

/// Counts annotated features per bin.
///
/// The result has [`BIN_COUNT`] entries; features without a valid
/// `percentile` are not counted.
#[must_use]
pub fn bin_counts(collection: &FeatureCollection) -> Vec<usize> {
    let mut counts = vec![0; BIN_COUNT];
    for bin in collection.features.iter().filter_map(percentile_of) {
        if let Some(count) = counts.get_mut(bin) {
            *count += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::income_for_year;

    /// Builds a collection of `n` states whose income grows with the index
    /// in 2000 and shrinks with it in 2001.
    #[allow(clippy::cast_precision_loss)]
    fn states(n: usize) -> FeatureCollection {
        let features = (0..n)
            .map(|i| {
                let json = serde_json::json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [-90.0 + i as f64 * 0.5, 38.0]
                    },
                    "properties": {
                        "name": format!("State {i}"),
                        "income": {
                            "2000": 30_000.0 + i as f64 * 700.0,
                            "2001": 80_000.0 - i as f64 * 450.0
                        }
                    }
                });
                serde_json::from_value(json).unwrap()
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    fn names(collection: &FeatureCollection) -> Vec<String> {
        collection
            .features
            .iter()
            .map(|f| f.property("name").unwrap().as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn every_feature_gets_value_and_bin() {
        let input = states(50);
        let output = annotate(&input, income_for_year(2000)).unwrap();

        assert_eq!(output.features.len(), 50);
        for (i, feature) in output.features.iter().enumerate() {
            let bin = percentile_of(feature).unwrap();
            assert!(bin < BIN_COUNT, "feature {i} got bin {bin}");
            assert_eq!(value_of(feature), income_for_year(2000)(&input.features[i]));
        }
    }

    #[test]
    fn preserves_order_and_other_properties() {
        let input = states(12);
        let output = annotate(&input, income_for_year(2000)).unwrap();

        assert_eq!(names(&input), names(&output));
        for (before, after) in input.features.iter().zip(&output.features) {
            assert_eq!(before.geometry, after.geometry);
            assert_eq!(before.property("income"), after.property("income"));
        }
    }

    #[test]
    fn input_is_left_untouched() {
        let input = states(9);
        let snapshot = input.clone();
        let _ = annotate(&input, income_for_year(2000)).unwrap();
        assert_eq!(input, snapshot);
        assert!(input.features[0].property(PERCENTILE_PROPERTY).is_none());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let input = states(37);
        let first = annotate(&input, income_for_year(2000)).unwrap();
        let second = annotate(&input, income_for_year(2000)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fifty_states_lowest_in_bottom_bin_highest_in_top() {
        let output = annotate(&states(50), income_for_year(2000)).unwrap();
        assert_eq!(percentile_of(&output.features[0]), Some(0));
        assert_eq!(percentile_of(&output.features[49]), Some(8));

        let counts = bin_counts(&output);
        assert_eq!(counts.iter().sum::<usize>(), 50);
        assert!(counts.iter().all(|&c| c == 5 || c == 6), "{counts:?}");
    }

    #[test]
    fn richer_features_never_get_lower_bins() {
        let input = states(23);
        let output = annotate(&input, income_for_year(2001)).unwrap();
        for a in &output.features {
            for b in &output.features {
                if value_of(a) < value_of(b) {
                    assert!(percentile_of(a) <= percentile_of(b));
                }
            }
        }
    }

    #[test]
    fn changing_year_reclassifies_same_features() {
        let input = states(50);
        let y2000 = annotate(&input, income_for_year(2000)).unwrap();
        let y2001 = annotate(&input, income_for_year(2001)).unwrap();

        assert_eq!(names(&y2000), names(&y2001));
        // 2001 reverses the ordering, so the extremes swap bins.
        assert_eq!(percentile_of(&y2001.features[0]), Some(8));
        assert_eq!(percentile_of(&y2001.features[49]), Some(0));
    }

    #[test]
    fn identical_values_land_in_one_bin() {
        let input = states(15);
        let output = annotate(&input, |_: &Feature| Some(50_000.0)).unwrap();
        assert!(
            output
                .features
                .iter()
                .all(|f| percentile_of(f) == Some(0))
        );
    }

    #[test]
    fn features_without_properties_get_a_property_map() {
        let mut input = states(3);
        input.features[1].properties = None;
        let output = annotate(&input, |f: &Feature| {
            Some(if f.properties.is_none() { 1.0 } else { 2.0 })
        })
        .unwrap();
        assert_eq!(value_of(&output.features[1]), Some(1.0));
        assert_eq!(percentile_of(&output.features[1]), Some(0));
    }

    #[test]
    fn empty_collection_is_invalid_input() {
        let empty = FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        };
        assert!(matches!(
            annotate(&empty, income_for_year(2000)),
            Err(ChoroplethError::InvalidInput { .. })
        ));
    }

    #[test]
    fn missing_year_fails_whole_annotation() {
        let err = annotate(&states(10), income_for_year(1999)).unwrap_err();
        match err {
            ChoroplethError::Accessor { index, label, .. } => {
                assert_eq!(index, 0);
                assert_eq!(label, "State 0");
            }
            other @ ChoroplethError::InvalidInput { .. } => {
                panic!("expected accessor error, got {other:?}")
            }
        }
    }

    #[test]
    fn non_finite_accessor_output_is_rejected() {
        let input = states(4);
        let err = annotate(&input, |f: &Feature| {
            if f.property("name").and_then(serde_json::Value::as_str) == Some("State 2") {
                Some(f64::NAN)
            } else {
                Some(1.0)
            }
        })
        .unwrap_err();
        assert!(matches!(err, ChoroplethError::Accessor { index: 2, .. }));
    }

    #[test]
    fn custom_bin_count() {
        let output = annotate_with_bins(&states(8), income_for_year(2000), 4).unwrap();
        let bins: Vec<usize> = output.features.iter().filter_map(percentile_of).collect();
        assert_eq!(bins, vec![0, 0, 1, 1, 2, 2, 3, 3]);
    }
}
