//! A loaded dataset plus the operations every subcommand shares.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use geojson::FeatureCollection;
use income_map_choropleth::{
    ChoroplethError, QuantileScale, annotate, bin_counts, classify, collect_values, feature_name,
    legend::legend_for, percentile_of, progress::ProgressCallback, series_value,
    sweep::annotate_years, tooltip::Tooltip, value_of,
};
use income_map_choropleth_models::{BIN_COUNT, LegendEntry, percentile_rank};
use income_map_dataset::{
    DatasetError, config::DatasetConfig, find_feature, load::write_collection,
    validate::validate_collection,
};

/// The dataset being classified and the layout that describes it.
pub struct Session {
    pub config: DatasetConfig,
    pub collection: FeatureCollection,
}

impl Session {
    pub const fn new(config: DatasetConfig, collection: FeatureCollection) -> Self {
        Self { config, collection }
    }

    /// Annotates the collection for one year.
    pub fn annotate_year(
        &self,
        year: u16,
    ) -> Result<FeatureCollection, Box<dyn std::error::Error>> {
        self.config.check_year(year)?;
        let annotated = annotate(
            &self.collection,
            series_value(&self.config.series_property, year),
        )?;
        log::info!(
            "Classified {} features for {year}: bins {:?}",
            annotated.features.len(),
            bin_counts(&annotated)
        );
        Ok(annotated)
    }

    /// Builds the quantile scale for one year without annotating.
    pub fn scale_for(&self, year: u16) -> Result<QuantileScale, Box<dyn std::error::Error>> {
        self.config.check_year(year)?;
        let accessor = series_value(&self.config.series_property, year);
        let values = collect_values(&self.collection, &accessor)?;
        Ok(classify(&values, BIN_COUNT)?)
    }

    /// Legend rows with the value range each bin covers in `year`.
    pub fn legend_for_year(
        &self,
        year: u16,
    ) -> Result<Vec<LegendEntry>, Box<dyn std::error::Error>> {
        Ok(legend_for(&self.scale_for(year)?))
    }

    /// Annotates every year in `from..=to`.
    pub fn sweep(
        &self,
        from: u16,
        to: u16,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<BTreeMap<u16, FeatureCollection>, Box<dyn std::error::Error>> {
        self.config.check_year(from)?;
        self.config.check_year(to)?;
        if from > to {
            return Err(DatasetError::Config {
                message: format!("--from {from} is after --to {to}"),
            }
            .into());
        }
        Ok(annotate_years(
            &self.collection,
            from..=to,
            &self.config.series_property,
            progress,
        )?)
    }

    /// Tooltip for the feature called `name` in an annotated collection.
    pub fn tooltip(
        &self,
        annotated: &FeatureCollection,
        year: u16,
        name: &str,
    ) -> Result<Tooltip, Box<dyn std::error::Error>> {
        let (index, feature) = find_feature(annotated, &self.config.id_property, name)
            .ok_or_else(|| format!("No feature named '{name}'"))?;
        Tooltip::from_feature(feature, &self.config.id_property, index, year).ok_or_else(|| {
            ChoroplethError::InvalidInput {
                message: format!("feature '{name}' is not annotated"),
            }
            .into()
        })
    }

    /// Annotates `year` and writes the result to `path`.
    pub fn write_year(&self, year: u16, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let annotated = self.annotate_year(year)?;
        write_collection(path, &annotated)?;
        Ok(())
    }

    /// Checks the dataset for gaps.
    ///
    /// Returns the printable report, or an error carrying it when no year
    /// has a value for every feature.
    pub fn check(&self) -> Result<String, Box<dyn std::error::Error>> {
        let report = validate_collection(&self.collection, &self.config);
        let years = report.classifiable_years(&self.config);

        let mut lines = vec![
            format!("Features: {}", report.feature_count),
            format!("Unnamed features: {}", report.unnamed.len()),
        ];
        lines.extend(
            report
                .missing
                .iter()
                .map(|(year, missing)| format!("{year}: missing {}", missing.join(", "))),
        );
        lines.push(format!(
            "Classifiable years: {}/{}",
            years.len(),
            self.config.years().count()
        ));
        let text = lines.join("\n");

        if years.is_empty() {
            return Err(format!("{text}\nNo year has a value for every feature").into());
        }
        Ok(text)
    }

    /// Renders an annotated collection as a text table, highest value first,
    /// followed by per-bin counts and ranges.
    pub fn summary(
        &self,
        annotated: &FeatureCollection,
        year: u16,
        legend: &[LegendEntry],
    ) -> String {
        let mut rows: Vec<(String, f64, usize)> = annotated
            .features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                Some((
                    feature_name(feature, &self.config.id_property, index),
                    value_of(feature)?,
                    percentile_of(feature)?,
                ))
            })
            .collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut out = format!("Median household income, {year}\n");
        out.push_str(&format!(
            "{:<24} {:>12} {:>4} {:>11}\n",
            "State", "Income", "Bin", "Percentile"
        ));
        for (name, value, bin) in &rows {
            out.push_str(&format!(
                "{name:<24} {value:>12.0} {bin:>4} {:>10.1}%\n",
                percentile_rank(*bin)
            ));
        }

        let counts = bin_counts(annotated);
        out.push('\n');
        for entry in legend {
            let count = counts.get(entry.bin).copied().unwrap_or(0);
            out.push_str(&legend_line(entry, Some(count)));
            out.push('\n');
        }
        out
    }
}

/// One legend row: bin, color, label, and the value range and count when
/// known.
pub fn legend_line(entry: &LegendEntry, count: Option<usize>) -> String {
    let range = match (entry.min, entry.max) {
        (Some(min), Some(max)) => format!(" {min:>10.0} - {max:<10.0}"),
        _ => String::new(),
    };
    let count = count.map(|count| format!(" ({count})")).unwrap_or_default();
    format!("{} {} {:<24}{range}{count}", entry.bin, entry.color, entry.label)
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use income_map_choropleth_models::legend;
    use income_map_dataset::load::parse_collection;

    fn session() -> Session {
        let collection = parse_collection(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "geometry": null, "properties": {
                        "name": "Mississippi", "income": { "2000": 30000, "2001": 31000 } } },
                    { "type": "Feature", "geometry": null, "properties": {
                        "name": "New Jersey", "income": { "2000": 55000, "2001": 56000 } } },
                    { "type": "Feature", "geometry": null, "properties": {
                        "name": "Ohio", "income": { "2000": 40000, "2001": 39000 } } }
                ]
            }"#,
        )
        .unwrap();
        let config = DatasetConfig {
            first_year: 2000,
            last_year: 2001,
            ..DatasetConfig::embedded()
        };
        Session::new(config, collection)
    }

    #[test]
    fn summary_lists_highest_income_first() {
        let session = session();
        let annotated = session.annotate_year(2000).unwrap();
        let text = session.summary(&annotated, 2000, &legend());
        let nj = text.find("New Jersey").unwrap();
        let oh = text.find("Ohio").unwrap();
        let ms = text.find("Mississippi").unwrap();
        assert!(nj < oh && oh < ms, "{text}");
        assert!(text.contains("100.0%"));
    }

    #[test]
    fn rejects_years_outside_config() {
        let session = session();
        assert!(session.annotate_year(1999).is_err());
        assert!(session.scale_for(2002).is_err());
    }

    #[test]
    fn tooltip_finds_feature_by_name() {
        let session = session();
        let annotated = session.annotate_year(2001).unwrap();
        let tooltip = session.tooltip(&annotated, 2001, "ohio").unwrap();
        assert_eq!(tooltip.name, "Ohio");
        assert!((tooltip.income - 39_000.0).abs() < f64::EPSILON);
        assert!(session.tooltip(&annotated, 2001, "Texas").is_err());
    }

    #[test]
    fn legend_for_year_has_ranges() {
        let legend = session().legend_for_year(2000).unwrap();
        assert_eq!(legend.len(), BIN_COUNT);
        assert_eq!(legend[0].min, Some(30_000.0));
        assert_eq!(legend[8].max, Some(55_000.0));
        assert!(legend_line(&legend[0], Some(1)).ends_with("(1)"));
    }

    #[test]
    fn sweep_rejects_reversed_range() {
        let progress = income_map_choropleth::progress::null_progress();
        assert!(session().sweep(2001, 2000, &progress).is_err());
        assert_eq!(session().sweep(2000, 2001, &progress).unwrap().len(), 2);
    }

    #[test]
    fn tooltip_uses_name_property_over_fips_id() {
        let collection = parse_collection(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "id": "01", "geometry": null, "properties": {
                        "name": "Alabama", "income": { "2000": 35000 } } },
                    { "type": "Feature", "id": "02", "geometry": null, "properties": {
                        "name": "Alaska", "income": { "2000": 52000 } } }
                ]
            }"#,
        )
        .unwrap();
        let config = DatasetConfig {
            first_year: 2000,
            last_year: 2000,
            ..DatasetConfig::embedded()
        };
        let session = Session::new(config, collection);
        let annotated = session.annotate_year(2000).unwrap();

        let tooltip = session.tooltip(&annotated, 2000, "alabama").unwrap();
        assert_eq!(tooltip.name, "Alabama");
        assert!(tooltip.to_string().starts_with("State: Alabama"));

        let text = session.summary(&annotated, 2000, &legend());
        assert!(text.contains("Alaska"), "{text}");
        assert!(!text.contains("\n02 "), "{text}");
    }

    #[test]
    fn write_year_output_loads_back() {
        let dir = std::env::temp_dir().join("income_map_cli_write_year_test");
        let path = dir.join("percentiles_2000.geojson");
        let _ = std::fs::remove_dir_all(&dir);

        let session = session();
        session.write_year(2000, &path).unwrap();

        let written = income_map_dataset::load::load_collection(&path).unwrap();
        assert_eq!(written, session.annotate_year(2000).unwrap());
        assert!(session.write_year(1990, &path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn check_reports_complete_dataset() {
        let report = session().check().unwrap();
        assert!(report.contains("Features: 3"), "{report}");
        assert!(report.contains("Classifiable years: 2/2"), "{report}");
    }

    #[test]
    fn check_fails_when_no_year_is_classifiable() {
        let collection = parse_collection(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "geometry": null, "properties": {
                        "name": "Iowa", "income": { "2000": 40000 } } },
                    { "type": "Feature", "geometry": null, "properties": {
                        "name": "Utah", "income": { "2001": 45000 } } }
                ]
            }"#,
        )
        .unwrap();
        let config = DatasetConfig {
            first_year: 2000,
            last_year: 2001,
            ..DatasetConfig::embedded()
        };
        let err = Session::new(config, collection).check().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Classifiable years: 0/2"), "{message}");
        assert!(message.contains("2000: missing Utah"), "{message}");
    }
}
