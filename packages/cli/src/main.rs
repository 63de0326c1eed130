#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the median household income choropleth.
//!
//! Every subcommand loads the state `GeoJSON`, classifies one or more years
//! into percentile bins and prints or writes the result. Without a
//! subcommand an interactive menu steps through the years the way the map's
//! year slider does.
//!
//! Uses `indicatif-log-bridge` (via [`income_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod interactive;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use income_map_choropleth_models::{FIRST_YEAR, LegendEntry, legend};
use income_map_cli_utils::IndicatifProgress;
use income_map_dataset::{
    config::DatasetConfig,
    load::{load_collection, resolve_input, to_geojson_string, write_collection},
    paths::{generated_dir, percentiles_path},
};

use crate::session::{Session, legend_line};

#[derive(Parser)]
#[command(
    name = "income_map",
    about = "Classify state median household income into percentile bins"
)]
struct Cli {
    /// Dataset layout TOML (defaults to the built-in income layout)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Input `GeoJSON` `FeatureCollection` (overrides `INCOME_MAP_INPUT`)
    #[arg(long, short, global = true)]
    input: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate every feature with `value` and `percentile` for one year
    Annotate {
        /// Year to classify
        #[arg(long, default_value_t = FIRST_YEAR)]
        year: u16,
        /// Write the annotated collection here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Pretty-print the `GeoJSON` written to stdout
        #[arg(long)]
        pretty: bool,
    },
    /// Annotate a range of years, writing one file per year
    Sweep {
        /// First year (defaults to the dataset's first year)
        #[arg(long)]
        from: Option<u16>,
        /// Last year (defaults to the dataset's last year)
        #[arg(long)]
        to: Option<u16>,
        /// Output directory (defaults to `data/generated`)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print a ranked table of features and per-bin counts for one year
    Summary {
        /// Year to classify
        #[arg(long, default_value_t = FIRST_YEAR)]
        year: u16,
    },
    /// Print the legend, with value ranges when a year is given
    Legend {
        /// Year whose value ranges to include
        #[arg(long)]
        year: Option<u16>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the tooltip for one feature
    Tooltip {
        /// Region name (case-insensitive) or feature id
        name: String,
        /// Year to classify
        #[arg(long, default_value_t = FIRST_YEAR)]
        year: u16,
    },
    /// Report features and years with missing values
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = income_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DatasetConfig::from_path(path)?,
        None => DatasetConfig::embedded(),
    };

    let Some(command) = cli.command else {
        let session = load_session(config, cli.input)?;
        return interactive::run(&session, &multi);
    };

    if let Commands::Legend { year: None, json } = command {
        return print_legend(&legend(), json);
    }

    let session = load_session(config, cli.input)?;

    match command {
        Commands::Annotate {
            year,
            output,
            pretty,
        } => match output {
            Some(path) => session.write_year(year, &path)?,
            None => println!(
                "{}",
                to_geojson_string(&session.annotate_year(year)?, pretty)?
            ),
        },
        Commands::Sweep { from, to, out_dir } => {
            let from = from.unwrap_or(session.config.first_year);
            let to = to.unwrap_or(session.config.last_year);
            let progress = IndicatifProgress::steps_bar(&multi, "Classifying years");
            let results = session.sweep(from, to, &progress)?;

            let dir = out_dir.unwrap_or_else(generated_dir);
            for (year, annotated) in &results {
                write_collection(&percentiles_path(&dir, *year), annotated)?;
            }
            log::info!("Wrote {} years to {}", results.len(), dir.display());
        }
        Commands::Summary { year } => {
            let annotated = session.annotate_year(year)?;
            let legend = session.legend_for_year(year)?;
            print!("{}", session.summary(&annotated, year, &legend));
        }
        Commands::Legend { year, json } => {
            let entries = match year {
                Some(year) => session.legend_for_year(year)?,
                None => legend(),
            };
            print_legend(&entries, json)?;
        }
        Commands::Tooltip { name, year } => {
            let annotated = session.annotate_year(year)?;
            println!("{}", session.tooltip(&annotated, year, &name)?);
        }
        Commands::Check => match session.check() {
            Ok(report) => println!("{report}"),
            Err(e) => {
                println!("{e}");
                return Err("Dataset check failed".into());
            }
        },
    }

    Ok(())
}

/// Loads the input `GeoJSON` named by the flags, env or config.
fn load_session(
    config: DatasetConfig,
    input: Option<PathBuf>,
) -> Result<Session, Box<dyn std::error::Error>> {
    let path = resolve_input(input, &config)?;
    let collection = load_collection(&path)?;
    Ok(Session::new(config, collection))
}

fn print_legend(entries: &[LegendEntry], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
    } else {
        for entry in entries {
            println!("{}", legend_line(entry, None));
        }
    }
    Ok(())
}
