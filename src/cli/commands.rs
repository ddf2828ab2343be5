use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::analysis::{
    exceeded_records, FieldConstraint, FilterCriteria, ToleranceAnalyzer, ToleranceFilter,
};
use crate::cli::args::{Cli, Commands};
use crate::error::{AuditError, Result};
use crate::models::Dataset;
use crate::readers::{list_csv_files, CsvReader, LoadOutcome};
use crate::settings::Settings;
use crate::utils::constants::{SITE_LATITUDE_COLUMN, SITE_LONGITUDE_COLUMN, STATION_NAME_COLUMN};
use crate::utils::filename::generate_default_export_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::CsvExporter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;
    let data_dir = cli.data_dir.unwrap_or(settings.data_dir);

    match cli.command {
        Commands::List => {
            let files = list_csv_files(&data_dir)?;
            println!("Found {} CSV file(s) in {}:", files.len(), data_dir.display());
            for file in files {
                println!("  {}", file);
            }
        }

        Commands::Columns {
            file,
            delimiter,
            values,
        } => {
            let outcome = load_file(&data_dir, &file, delimiter, false)?;
            let dataset = &outcome.dataset;

            println!("File: {}", file);
            println!("{}", outcome.status_message());
            println!(
                "\nCenter coordinates: {}",
                if dataset.schema().has_center_coordinates() {
                    "present (tolerance analysis available)"
                } else {
                    "absent (tolerance analysis unavailable)"
                }
            );

            println!("\nColumns ({}):", dataset.schema().len());
            for column in dataset.schema().columns() {
                if column == SITE_LONGITUDE_COLUMN || column == SITE_LATITUDE_COLUMN {
                    println!("  {} (site coordinate)", column);
                    continue;
                }

                let distinct = dataset.unique_values(column);
                if distinct.is_empty() {
                    println!("  {}", column);
                    continue;
                }

                let sample: Vec<&str> = distinct.iter().take(values).map(String::as_str).collect();
                let suffix = if distinct.len() > values { ", ..." } else { "" };
                println!(
                    "  {} ({} distinct): {}{}",
                    column,
                    distinct.len(),
                    sample.join(", "),
                    suffix
                );
            }
        }

        Commands::Report {
            file,
            filters,
            tolerance,
            delimiter,
            json,
            top,
        } => {
            let outcome = load_file(&data_dir, &file, delimiter, json)?;
            let view = apply_filters(&outcome.dataset, filters, tolerance, json)?;
            let statistics = ToleranceAnalyzer::new().summarize(&view);

            if json {
                let payload = serde_json::json!({
                    "file": file,
                    "status": outcome.status_message(),
                    "loaded_records": outcome.dataset.len(),
                    "filtered_records": view.len(),
                    "out_of_range_coordinates": view.out_of_range_count(),
                    "geographic_bounds": view.geographic_bounds(),
                    "statistics": statistics,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            println!("{}", outcome.status_message());
            println!(
                "Filtered view: {} of {} records",
                view.len(),
                outcome.dataset.len()
            );

            print_dataset_info(&view);

            match statistics {
                Some(stats) => {
                    println!("\n{}", stats.summary());
                    print_top_exceeded(&view, top);
                }
                None => {
                    println!("\nNo valid coordinate pairs to compare");
                }
            }
        }

        Commands::Export {
            file,
            filters,
            tolerance,
            delimiter,
            exceeded_only,
            output,
        } => {
            let outcome = load_file(&data_dir, &file, delimiter, false)?;
            let view = apply_filters(&outcome.dataset, filters, tolerance, false)?;

            let exporter = CsvExporter::new();
            let (bytes, exported) = if exceeded_only {
                let count = exceeded_records(&view).len();
                (exporter.export_exceeded(&view)?, count)
            } else {
                (exporter.export(&view)?, view.len())
            };

            let output = output
                .unwrap_or_else(|| generate_default_export_filename(Path::new(&file), exceeded_only));
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&output, &bytes)?;

            println!("Wrote {} record(s) to {}", exported, output.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sitecheck=debug" } else { "sitecheck=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn load_file(data_dir: &Path, file: &str, delimiter: char, silent: bool) -> Result<LoadOutcome> {
    let path = data_dir.join(file);
    let progress = ProgressReporter::new_spinner("Loading station data...", silent);

    let reader = CsvReader::with_delimiter(delimiter_byte(delimiter)?);
    let outcome = reader.read_dataset(&path)?;

    progress.finish_with_message(&outcome.status_message());
    Ok(outcome)
}

fn apply_filters(
    dataset: &Dataset,
    filters: Vec<FieldConstraint>,
    tolerance: ToleranceFilter,
    silent: bool,
) -> Result<Dataset> {
    if tolerance != ToleranceFilter::Any
        && !dataset.schema().has_center_coordinates()
        && !silent
    {
        println!("Note: file has no center coordinate columns; tolerance filter ignored");
    }

    let criteria = filters
        .into_iter()
        .fold(FilterCriteria::new(), |criteria, constraint| {
            criteria.with_constraint(constraint.column, constraint.value)
        })
        .with_tolerance(tolerance);

    criteria.validate_against(dataset.schema())?;
    Ok(criteria.apply(dataset))
}

fn print_dataset_info(view: &Dataset) {
    for (column, label) in [("CLNT_NAME", "clients"), ("CITY", "cities")] {
        if view.schema().has_column(column) {
            println!("Distinct {}: {}", label, view.unique_values(column).len());
        }
    }

    if let Some(bounds) = view.geographic_bounds() {
        let (lat, lon) = bounds.center();
        println!(
            "Coverage: {:.4} to {:.4} lat, {:.4} to {:.4} lon (center {:.4}, {:.4})",
            bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon, lat, lon
        );
    }

    let out_of_range = view.out_of_range_count();
    if out_of_range > 0 {
        println!("Warning: {} record(s) with out-of-range coordinates", out_of_range);
    }
}

fn print_top_exceeded(view: &Dataset, top: usize) {
    if top == 0 {
        return;
    }

    let mut exceeded = exceeded_records(view);
    if exceeded.is_empty() {
        println!("\nAll comparable records are within tolerance");
        return;
    }

    exceeded.sort_by(|a, b| b.1.total_cmp(&a.1));

    println!("\nLargest deviations (showing {} of {}):", top.min(exceeded.len()), exceeded.len());
    for (i, (record, distance)) in exceeded.iter().take(top).enumerate() {
        let name = view
            .field(record, STATION_NAME_COLUMN)
            .and_then(|v| v.as_text())
            .unwrap_or("(unnamed station)");
        println!(
            "{}. {} - {:.2} m (site {:.6}, {:.6})",
            i + 1,
            name,
            distance,
            record.site_latitude,
            record.site_longitude
        );
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter).map_err(|_| {
        AuditError::Config(format!(
            "delimiter must be a single ASCII character, got '{}'",
            delimiter
        ))
    })
}
