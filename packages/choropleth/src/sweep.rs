//! Annotates one collection for every year in a range.
//!
//! Mirrors dragging the year slider end to end: each year is classified
//! independently over that year's distribution.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use geojson::FeatureCollection;

use crate::{
    ChoroplethError, accessor::series_value, annotate::annotate, progress::ProgressCallback,
};

/// Annotates `collection` once per year in `years`, reading the per-year
/// series stored under `property`.
///
/// # Errors
///
/// Returns the first [`ChoroplethError`] hit; no years are returned in
/// that case.
pub fn annotate_years(
    collection: &FeatureCollection,
    years: RangeInclusive<u16>,
    property: &str,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<BTreeMap<u16, FeatureCollection>, ChoroplethError> {
    let total = u64::from(years.end().saturating_sub(*years.start())) + 1;
    progress.set_total(if years.is_empty() { 0 } else { total });

    let mut by_year = BTreeMap::new();

    for year in years {
        progress.set_message(format!("Classifying {year}"));
        let annotated = annotate(collection, series_value(property, year)).inspect_err(|e| {
            log::warn!("Annotation for {year} failed: {e}");
        })?;
        log::debug!("Annotated {} features for {year}", annotated.features.len());
        by_year.insert(year, annotated);
        progress.inc(1);
    }

    progress.finish(format!("Classified {} years", by_year.len()));
    Ok(by_year)
}
