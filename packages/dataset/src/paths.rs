#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the dataset and generated outputs.
//!
//! All paths are relative to the project root's `data/` directory.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the default location of the raw income dataset.
#[must_use]
pub fn default_input_path() -> PathBuf {
    data_dir().join("income.geojson")
}

/// Returns the `data/generated/` directory for annotated outputs.
#[must_use]
pub fn generated_dir() -> PathBuf {
    data_dir().join("generated")
}

/// Returns the path of the annotated collection for `year` inside `dir`.
#[must_use]
pub fn percentiles_path(dir: &Path, year: u16) -> PathBuf {
    dir.join(format!("percentiles_{year}.geojson"))
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentiles_file_is_named_by_year() {
        let path = percentiles_path(Path::new("out"), 2003);
        assert_eq!(path, PathBuf::from("out/percentiles_2003.geojson"));
    }

    #[test]
    fn generated_dir_is_under_data() {
        assert!(generated_dir().starts_with(data_dir()));
        assert!(default_input_path().starts_with(data_dir()));
    }
}
