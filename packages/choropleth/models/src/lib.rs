#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Percentile bin, year range, and legend types for the income choropleth.
//!
//! These types are shared by the classification engine, the dataset
//! loader, and the CLI. The legend table is the fixed contract between
//! bin indices and the fill colors a renderer paints with.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of quantile bins every feature is classified into.
pub const BIN_COUNT: usize = 9;

/// First year with median household income data.
pub const FIRST_YEAR: u16 = 1995;

/// Last year with median household income data.
pub const LAST_YEAR: u16 = 2015;

/// Property name the annotator writes the raw accessor output to.
pub const VALUE_PROPERTY: &str = "value";

/// Property name the annotator writes the bin index to.
pub const PERCENTILE_PROPERTY: &str = "percentile";

/// Returns every year covered by the dataset, oldest first.
#[must_use]
pub const fn years() -> std::ops::RangeInclusive<u16> {
    FIRST_YEAR..=LAST_YEAR
}

/// One of the nine legend rows, in bin order.
///
/// Variant `n` corresponds to bin index `n`; renderers rely on that
/// alignment when building fill-color stops.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LegendCategory {
    /// Bin 0: the lowest-income group
    Percentile0,
    /// Bin 1
    Percentile12,
    /// Bin 2
    Percentile25,
    /// Bin 3
    Percentile37,
    /// Bin 4: the median group
    Percentile50,
    /// Bin 5
    Percentile62,
    /// Bin 6
    Percentile75,
    /// Bin 7
    Percentile87,
    /// Bin 8: the highest-income group
    Percentile100,
}

impl LegendCategory {
    /// Returns all variants in bin order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Percentile0,
            Self::Percentile12,
            Self::Percentile25,
            Self::Percentile37,
            Self::Percentile50,
            Self::Percentile62,
            Self::Percentile75,
            Self::Percentile87,
            Self::Percentile100,
        ]
    }

    /// Returns the bin index this category colors.
    #[must_use]
    pub const fn bin(self) -> usize {
        self as usize
    }

    /// Looks up the category for a bin index.
    ///
    /// Returns `None` for indices outside `0..BIN_COUNT`.
    #[must_use]
    pub fn from_bin(bin: usize) -> Option<Self> {
        Self::all().get(bin).copied()
    }

    /// Human-readable legend label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Percentile0 => "0th Percentile",
            Self::Percentile12 => "Up to 12.5th Percentile",
            Self::Percentile25 => "Up to 25th Percentile",
            Self::Percentile37 => "Up to 37.5th Percentile",
            Self::Percentile50 => "Up to 50th Percentile",
            Self::Percentile62 => "Up to 62.5th Percentile",
            Self::Percentile75 => "Up to 75th Percentile",
            Self::Percentile87 => "Up to 87.5th Percentile",
            Self::Percentile100 => "Up to 100th Percentile",
        }
    }

    /// Hex fill color (diverging spectral palette, cool to warm).
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Percentile0 => "#3288bd",
            Self::Percentile12 => "#66c2a5",
            Self::Percentile25 => "#abdda4",
            Self::Percentile37 => "#e6f598",
            Self::Percentile50 => "#ffffbf",
            Self::Percentile62 => "#fee08b",
            Self::Percentile75 => "#fdae61",
            Self::Percentile87 => "#f46d43",
            Self::Percentile100 => "#d53e4f",
        }
    }
}

/// Converts a bin index into the percentile rank shown to users.
///
/// Bin 0 reads as 0 and the top bin as 100, evenly spaced in between.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentile_rank(bin: usize) -> f64 {
    bin as f64 / (BIN_COUNT - 1) as f64 * 100.0
}

/// A legend row as emitted for renderers and JSON consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Bin index (0-8).
    pub bin: usize,
    /// Legend label.
    pub label: String,
    /// Hex fill color.
    pub color: String,
    /// Smallest value that falls in this bin for the classified year, if known.
    pub min: Option<f64>,
    /// Largest value that falls in this bin for the classified year, if known.
    pub max: Option<f64>,
}

impl From<LegendCategory> for LegendEntry {
    fn from(category: LegendCategory) -> Self {
        Self {
            bin: category.bin(),
            label: category.label().to_string(),
            color: category.color().to_string(),
            min: None,
            max: None,
        }
    }
}

/// Returns the static legend, one entry per bin, without value ranges.
#[must_use]
pub fn legend() -> Vec<LegendEntry> {
    LegendCategory::all()
        .iter()
        .copied()
        .map(LegendEntry::from)
        .collect()
}
