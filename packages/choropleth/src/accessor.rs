//! Accessors that pull the number to classify out of a feature.
//!
//! The income dataset stores one object per feature keyed by year
//! (`"income": {"1995": 35123, "1996": 36011, ...}`). An accessor picks a
//! single year from that series.

use geojson::{Feature, feature::Id};

/// Default per-year series property in the income dataset.
pub const INCOME_PROPERTY: &str = "income";

/// Property holding a feature's human-readable name.
pub const NAME_PROPERTY: &str = "name";

/// Builds an accessor reading `properties[property][year]`.
///
/// Accepts JSON numbers and numeric strings (thousands separators and a
/// leading `$` are ignored). Returns `None` when the series, the year, or a
/// parseable number is missing.
pub fn series_value(property: &str, year: u16) -> impl Fn(&Feature) -> Option<f64> + '_ {
    let key = year.to_string();
    move |feature: &Feature| {
        let series = feature.property(property)?;
        let raw = series.get(&key)?;
        json_number(raw)
    }
}

/// Accessor for the median household income in `year`.
pub fn income_for_year(year: u16) -> impl Fn(&Feature) -> Option<f64> {
    series_value(INCOME_PROPERTY, year)
}

/// Interprets a JSON value as a number.
#[must_use]
pub fn json_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches('$')
                .chars()
                .filter(|c| *c != ',')
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    }
}

/// Returns a label identifying a feature in logs and errors.
///
/// Prefers the feature `id`, then the `name` property, then `#index`.
#[must_use]
pub fn feature_label(feature: &Feature, index: usize) -> String {
    match &feature.id {
        Some(Id::String(s)) if !s.is_empty() => return s.clone(),
        Some(Id::Number(n)) => return n.to_string(),
        _ => {}
    }

    feature
        .property(NAME_PROPERTY)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| format!("#{index}"), String::from)
}

/// Returns the human-readable name of a feature for display.
///
/// Reads `name_property` first and falls back to [`feature_label`] when it
/// is missing or blank.
#[must_use]
pub fn feature_name(feature: &Feature, name_property: &str, index: usize) -> String {
    feature
        .property(name_property)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| feature_label(feature, index), String::from)
}
