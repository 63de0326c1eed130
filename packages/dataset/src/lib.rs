#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading, validating and writing the state income `GeoJSON` dataset.
//!
//! The classification engine never touches the filesystem; this crate is
//! the loader that hands it a ready [`geojson::FeatureCollection`] and
//! persists the annotated results. Dataset layout (which property names
//! the regions, which holds the per-year series, which years exist) is
//! described by a TOML [`config::DatasetConfig`].

pub mod config;
pub mod load;
pub mod paths;
pub mod validate;

use geojson::{Feature, FeatureCollection};
use thiserror::Error;

/// Errors that can occur while loading or writing datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The dataset config is not valid TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] Box<toml::de::Error>),

    /// The input parsed but is a single feature or geometry.
    #[error("Expected a GeoJSON FeatureCollection, found a {kind}")]
    NotFeatureCollection {
        /// The `GeoJSON` object type that was found instead.
        kind: &'static str,
    },

    /// The dataset config is inconsistent or incomplete.
    #[error("Config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Finds a feature by its name property (case-insensitive) or its `id`.
///
/// Returns the feature together with its index in the collection.
#[must_use]
pub fn find_feature<'a>(
    collection: &'a FeatureCollection,
    id_property: &str,
    name: &str,
) -> Option<(usize, &'a Feature)> {
    let wanted = name.trim();
    collection.features.iter().enumerate().find(|&(index, feature)| {
        let by_property = feature
            .property(id_property)
            .and_then(serde_json::Value::as_str)
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(wanted));
        by_property || income_map_choropleth::feature_label(feature, index) == wanted
    })
}
