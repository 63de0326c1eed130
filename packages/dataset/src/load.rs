//! Reading and writing `GeoJSON` feature collections.

use std::path::{Path, PathBuf};

use geojson::{FeatureCollection, GeoJson};

use crate::{DatasetError, config::DatasetConfig, paths};

/// Environment variable naming the default input file.
pub const INPUT_ENV_VAR: &str = "INCOME_MAP_INPUT";

/// Parses `GeoJSON` text that must hold a `FeatureCollection`.
///
/// # Errors
///
/// Returns [`DatasetError::GeoJson`] for invalid `GeoJSON` and
/// [`DatasetError::NotFeatureCollection`] for a lone feature or geometry.
pub fn parse_collection(text: &str) -> Result<FeatureCollection, DatasetError> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(DatasetError::NotFeatureCollection { kind: "Feature" }),
        GeoJson::Geometry(_) => Err(DatasetError::NotFeatureCollection { kind: "Geometry" }),
    }
}

/// Reads a `FeatureCollection` from a file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or parsed.
pub fn load_collection(path: &Path) -> Result<FeatureCollection, DatasetError> {
    let text = std::fs::read_to_string(path)?;
    let collection = parse_collection(&text)?;
    log::info!(
        "Loaded {} features from {}",
        collection.features.len(),
        path.display()
    );
    Ok(collection)
}

/// Serializes a collection to `GeoJSON` text.
///
/// # Errors
///
/// Returns [`DatasetError::Json`] if serialization fails.
pub fn to_geojson_string(
    collection: &FeatureCollection,
    pretty: bool,
) -> Result<String, DatasetError> {
    let text = if pretty {
        serde_json::to_string_pretty(collection)?
    } else {
        serde_json::to_string(collection)?
    };
    Ok(text)
}

/// Writes a collection to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`DatasetError`] if serialization or the write fails.
pub fn write_collection(path: &Path, collection: &FeatureCollection) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        paths::ensure_dir(parent)?;
    }
    std::fs::write(path, to_geojson_string(collection, false)?)?;
    log::info!(
        "Wrote {} features to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

/// Picks the input file: explicit path, then `INCOME_MAP_INPUT`, then the
/// config's `input`, then `data/income.geojson` if it exists.
///
/// # Errors
///
/// Returns [`DatasetError::Config`] if none of these yields a path.
pub fn resolve_input(
    explicit: Option<PathBuf>,
    config: &DatasetConfig,
) -> Result<PathBuf, DatasetError> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    if let Some(path) = std::env::var(INPUT_ENV_VAR)
        .ok()
        .filter(|p| !p.trim().is_empty())
    {
        log::debug!("Using input from {INPUT_ENV_VAR}: {path}");
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = &config.input {
        return Ok(path.clone());
    }

    let fallback = paths::default_input_path();
    if fallback.exists() {
        return Ok(fallback);
    }

    Err(DatasetError::Config {
        message: format!(
            "no input dataset: pass --input, set {INPUT_ENV_VAR}, or set `input` in the config"
        ),
    })
}
