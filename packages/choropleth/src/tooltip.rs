//! Tooltip contents for an annotated feature.

use std::fmt;

use geojson::Feature;
use income_map_choropleth_models::{LegendCategory, percentile_rank};

use crate::{
    accessor::feature_name,
    annotate::{percentile_of, value_of},
};

/// What a map popup shows when hovering a region.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Region name.
    pub name: String,
    /// Year the feature was classified for.
    pub year: u16,
    /// Median household income for that year.
    pub income: f64,
    /// Bin index (0-8).
    pub bin: usize,
    /// Bin rescaled to 0-100.
    pub percentile_rank: f64,
}

impl Tooltip {
    /// Builds the tooltip for an annotated feature, naming it by
    /// `name_property` (see [`feature_name`]).
    ///
    /// Returns `None` if the feature has no `value` or `percentile`
    /// property, i.e. it did not come out of the annotator.
    #[must_use]
    pub fn from_feature(
        feature: &Feature,
        name_property: &str,
        index: usize,
        year: u16,
    ) -> Option<Self> {
        let income = value_of(feature)?;
        let bin = percentile_of(feature)?;

        Some(Self {
            name: feature_name(feature, name_property, index),
            year,
            income,
            bin,
            percentile_rank: percentile_rank(bin),
        })
    }

    /// Legend row matching this tooltip's bin.
    #[must_use]
    pub fn category(&self) -> Option<LegendCategory> {
        LegendCategory::from_bin(self.bin)
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State: {}", self.name)?;
        writeln!(f, "Median household income ({}): {}", self.year, self.income)?;
        write!(f, "Percentile: {}", self.percentile_rank)
    }
}
