//! Dataset layout configuration.
//!
//! The default layout for the census income dataset is embedded at compile
//! time from `config/income.toml`. A different file can be loaded with
//! [`DatasetConfig::from_path`] to classify another per-year series.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::DatasetError;

/// Embedded default config for the state income dataset.
const DEFAULT_CONFIG_TOML: &str = include_str!("../config/income.toml");

/// Describes where the classified numbers live inside each feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Property holding the region name (e.g. `"name"`).
    pub id_property: String,
    /// Property holding the per-year series object (e.g. `"income"`).
    pub series_property: String,
    /// First year present in the series.
    pub first_year: u16,
    /// Last year present in the series.
    pub last_year: u16,
    /// Default input file, used when no path is given on the command line.
    #[serde(default)]
    pub input: Option<PathBuf>,
}

impl DatasetConfig {
    /// Returns the embedded default config.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. It is a compile-time
    /// constant, so a failure is a development error caught by tests.
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml(DEFAULT_CONFIG_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded dataset config: {e}"))
    }

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Toml`] for malformed TOML and
    /// [`DatasetError::Config`] if validation fails.
    pub fn from_toml(text: &str) -> Result<Self, DatasetError> {
        let config: Self = toml::de::from_str(text).map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file cannot be read or is invalid.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        log::info!("Loaded dataset config from {}", path.display());
        Ok(config)
    }

    /// Checks that property names are set and the year range is ordered.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.id_property.trim().is_empty() {
            return Err(DatasetError::Config {
                message: "id_property must not be empty".to_string(),
            });
        }
        if self.series_property.trim().is_empty() {
            return Err(DatasetError::Config {
                message: "series_property must not be empty".to_string(),
            });
        }
        if self.first_year > self.last_year {
            return Err(DatasetError::Config {
                message: format!(
                    "first_year {} is after last_year {}",
                    self.first_year, self.last_year
                ),
            });
        }
        Ok(())
    }

    /// Years covered by the dataset, oldest first.
    #[must_use]
    pub const fn years(&self) -> RangeInclusive<u16> {
        self.first_year..=self.last_year
    }

    /// Checks that `year` is covered by the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Config`] if `year` is outside the range.
    pub fn check_year(&self, year: u16) -> Result<(), DatasetError> {
        if self.years().contains(&year) {
            Ok(())
        } else {
            Err(DatasetError::Config {
                message: format!(
                    "year {year} is outside the dataset range {}-{}",
                    self.first_year, self.last_year
                ),
            })
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self::embedded()
    }
}
