//! Interactive year browser.
//!
//! Mirrors the map's year slider: one year is classified at a time, the
//! user steps forward and back or jumps to a year, and can look up a
//! state's tooltip or export the current classification. When a year
//! fails to classify the previous result stays on screen.

use std::path::Path;

use dialoguer::{Input, Select};
use geojson::FeatureCollection;
use income_map_cli_utils::{IndicatifProgress, MultiProgress};
use income_map_dataset::{
    load::write_collection,
    paths::{generated_dir, percentiles_path},
    validate::validate_collection,
};

use crate::session::{Session, legend_line};

/// Actions offered after each year is shown.
enum Action {
    NextYear,
    PreviousYear,
    PickYear,
    Tooltip,
    Summary,
    ExportYear,
    ExportAll,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::NextYear,
        Self::PreviousYear,
        Self::PickYear,
        Self::Tooltip,
        Self::Summary,
        Self::ExportYear,
        Self::ExportAll,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::NextYear => "Next year",
            Self::PreviousYear => "Previous year",
            Self::PickYear => "Jump to year",
            Self::Tooltip => "Show a state's tooltip",
            Self::Summary => "Show ranked summary",
            Self::ExportYear => "Export this year",
            Self::ExportAll => "Export every year",
            Self::Quit => "Quit",
        }
    }
}

/// The year on screen and its annotated collection.
struct Current {
    year: u16,
    annotated: FeatureCollection,
}

/// Runs the interactive year browser.
///
/// Only years where every feature has a value are offered.
///
/// # Errors
///
/// Returns an error if no year can be classified, or if terminal input
/// fails. Classification and export failures are logged and the loop
/// continues.
pub fn run(session: &Session, multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let report = validate_collection(&session.collection, &session.config);
    let years = report.classifiable_years(&session.config);
    let Some(&first) = years.first() else {
        return Err("No year has a value for every feature".into());
    };

    println!("Median Household Income by State");
    println!(
        "{} features, {} of {} years classifiable",
        report.feature_count,
        years.len(),
        session.config.years().count()
    );

    let mut current = Current {
        year: first,
        annotated: session.annotate_year(first)?,
    };
    show(session, &current);

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt(format!("Year {}", current.year))
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::NextYear => {
                match years.iter().copied().find(|&y| y > current.year) {
                    Some(year) => switch_year(session, &mut current, year),
                    None => log::warn!("Already at the last year"),
                }
            }
            Action::PreviousYear => {
                match years.iter().rev().copied().find(|&y| y < current.year) {
                    Some(year) => switch_year(session, &mut current, year),
                    None => log::warn!("Already at the first year"),
                }
            }
            Action::PickYear => {
                let year_labels: Vec<String> = years.iter().map(ToString::to_string).collect();
                let default = years.iter().position(|&y| y == current.year).unwrap_or(0);
                let pick = Select::new()
                    .with_prompt("Year")
                    .items(&year_labels)
                    .default(default)
                    .interact()?;
                switch_year(session, &mut current, years[pick]);
            }
            Action::Tooltip => {
                let name: String = Input::new().with_prompt("State name").interact_text()?;
                match session.tooltip(&current.annotated, current.year, &name) {
                    Ok(tooltip) => println!("{tooltip}"),
                    Err(e) => log::error!("{e}"),
                }
            }
            Action::Summary => match session.legend_for_year(current.year) {
                Ok(legend) => print!(
                    "{}",
                    session.summary(&current.annotated, current.year, &legend)
                ),
                Err(e) => log::error!("Failed to build legend for {}: {e}", current.year),
            },
            Action::ExportYear => {
                let default = percentiles_path(&generated_dir(), current.year);
                let path: String = Input::new()
                    .with_prompt("Output file")
                    .default(default.display().to_string())
                    .interact_text()?;
                if let Err(e) = write_collection(Path::new(path.trim()), &current.annotated) {
                    log::error!("Export failed: {e}");
                }
            }
            Action::ExportAll => export_all(session, &years, multi),
            Action::Quit => break,
        }
    }

    Ok(())
}

/// Classifies `year` and makes it current, keeping the old year on failure.
fn switch_year(session: &Session, current: &mut Current, year: u16) {
    match session.annotate_year(year) {
        Ok(annotated) => {
            *current = Current { year, annotated };
            show(session, current);
        }
        Err(e) => log::error!(
            "Failed to classify {year}, still showing {}: {e}",
            current.year
        ),
    }
}

/// Prints the legend with per-bin value ranges for the current year.
fn show(session: &Session, current: &Current) {
    let counts = income_map_choropleth::bin_counts(&current.annotated);
    match session.legend_for_year(current.year) {
        Ok(legend) => {
            println!();
            println!("Median household income, {}", current.year);
            for entry in &legend {
                let count = counts.get(entry.bin).copied();
                println!("  {}", legend_line(entry, count));
            }
            println!();
        }
        Err(e) => log::error!("Failed to build legend for {}: {e}", current.year),
    }
}

/// Writes every classifiable year to the generated directory.
fn export_all(session: &Session, years: &[u16], multi: &MultiProgress) {
    let dir = generated_dir();
    let progress = IndicatifProgress::steps_bar(multi, "Exporting years");
    progress.set_total(years.len() as u64);

    let mut written = 0_usize;
    for &year in years {
        progress.set_message(format!("Exporting {year}"));
        let result = session
            .annotate_year(year)
            .and_then(|annotated| {
                write_collection(&percentiles_path(&dir, year), &annotated).map_err(Into::into)
            });
        match result {
            Ok(()) => written += 1,
            Err(e) => log::error!("Skipping {year}: {e}"),
        }
        progress.inc(1);
    }

    progress.finish(format!("Exported {written}/{} years", years.len()));
}
