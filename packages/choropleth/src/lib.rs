#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Quantile classification and feature annotation for the income choropleth.
//!
//! Given a `GeoJSON` [`geojson::FeatureCollection`] and an accessor that
//! extracts one number per feature, [`annotate`] computes a nine-bin
//! quantile scale over those numbers and returns a new collection whose
//! features carry `value` and `percentile` properties. Everything here is a
//! pure, synchronous computation: no I/O, no shared state, and no partial
//! results on failure.

pub mod accessor;
pub mod annotate;
pub mod classify;
pub mod legend;
pub mod progress;
pub mod sweep;
pub mod tooltip;

pub use accessor::{feature_label, feature_name, income_for_year, series_value};
pub use annotate::{
    annotate, annotate_with_bins, bin_counts, collect_values, percentile_of, value_of,
};
pub use classify::{QuantileScale, classify};

use thiserror::Error;

/// Errors that can occur while classifying or annotating features.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoroplethError {
    /// The values or bin count cannot be classified (empty input, zero
    /// bins, or non-finite numbers handed straight to the classifier).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what went wrong.
        message: String,
    },

    /// The accessor produced no finite number for a feature.
    #[error("Accessor failed for feature {index} ({label}): {message}")]
    Accessor {
        /// Position of the feature in the input collection.
        index: usize,
        /// Identifier or name of the feature.
        label: String,
        /// Description of what went wrong.
        message: String,
    },
}

impl ChoroplethError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
