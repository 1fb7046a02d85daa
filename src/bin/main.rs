//! CLI binary for Telemetry Geo
//!
//! Extracts the GPS track of each flight log given on the command line and writes
//! the enabled exports.

use anyhow::{Context, Result};
use clap::{Arg, Command};
use glob::glob;
use log::{debug, LevelFilter};
use std::path::{Path, PathBuf};
use telemetry_geo::{
    export_track, Config, DataflashSources, ExportOptions, Extraction, Extractor, GeoError,
    RegionTable, Termination,
};

fn build_command() -> Command {
    let version = match option_env!("VERGEN_GIT_SHA") {
        Some(sha) => format!("{} ({})", env!("CARGO_PKG_VERSION"), sha),
        None => env!("CARGO_PKG_VERSION").to_string(),
    };

    Command::new("Telemetry Geo")
        .version(version)
        .about("Extract de-duplicated GPS tracks from DataFlash flight logs.")
        .arg(
            Arg::new("files")
                .help("Flight logs to process (.log text logs; supports globbing)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output, including per-message progress")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file (export settings and timezone regions)")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export Lat,Lng,Alt rows to <name>.gps.csv")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Export the full track with every GPS field to <name>.gps.json")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timezone")
                .long("timezone")
                .help("IANA timezone to use when no configured region matches")
                .value_name("ZONE"),
        )
}

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Expand glob patterns; plain paths pass through untouched
fn collect_paths(patterns: &[&String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => match glob_iter.collect::<Result<Vec<_>, _>>() {
                    Ok(matched) => {
                        debug!("Glob pattern '{pattern}' matched {} files", matched.len());
                        paths.extend(matched);
                    }
                    Err(e) => eprintln!("Error expanding glob pattern '{pattern}': {e}"),
                },
                Err(e) => eprintln!("Invalid glob pattern '{pattern}': {e}"),
            }
        } else {
            paths.push(PathBuf::from(pattern.as_str()));
        }
    }

    paths
}

fn process_file(
    path: &Path,
    extractor: &mut Extractor<'_>,
    export_options: &ExportOptions,
) -> Result<bool> {
    let extraction = match extractor.extract_file(path, &DataflashSources) {
        Ok(extraction) => extraction,
        Err(GeoError::NoGpsChannel) => {
            println!("no GPS data");
            return Ok(false);
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to read {path:?}")),
    };

    let result = match extraction {
        Extraction::Completed(result) => result,
        Extraction::NoGpsData {
            messages_read,
            termination,
        } => {
            println!("Total messages: {messages_read}");
            println!("No GPS Data in File");
            if let Termination::SourceError(reason) = &termination {
                eprintln!("Warning: log ended early ({reason})");
            }
            return Ok(false);
        }
    };

    debug!("GPS fields: {:?}", result.field_names().collect::<Vec<_>>());

    println!("Total messages: {}", result.messages_read);
    println!("{} unique records", result.samples.len());
    match &result.local_time {
        Some(label) => println!("{label}"),
        None => println!("Could not determine the timezone"),
    }
    if let Termination::SourceError(reason) = &result.termination {
        eprintln!("Warning: log ended early ({reason}); track is partial");
    }

    let report = export_track(&result, path, export_options)
        .with_context(|| format!("Failed to export track of {path:?}"))?;
    for written in [&report.csv_path, &report.json_path].into_iter().flatten() {
        println!("Exported GPS data to: {}", written.display());
    }

    Ok(true)
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug);

    let config = match matches.get_one::<String>("config") {
        Some(path) => Config::load(path).with_context(|| format!("Failed to load config {path}"))?,
        None => Config::default(),
    };

    let mut export_options = ExportOptions::from_config(&config.export);
    if matches.get_flag("csv") || matches.get_flag("json") {
        export_options.csv = matches.get_flag("csv");
        export_options.json = matches.get_flag("json");
    }
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        export_options.output_dir = Some(dir.clone());
    }

    let mut timezone_config = config.timezone.clone();
    if let Some(zone) = matches.get_one::<String>("timezone") {
        timezone_config.fallback = Some(zone.clone());
    }
    let table = RegionTable::from_config(&timezone_config)?;
    #[cfg(feature = "tz-detect")]
    let lookup = telemetry_geo::DetectedTimezones::new(table);
    #[cfg(not(feature = "tz-detect"))]
    let lookup = {
        if table.is_empty() {
            debug!("No timezone regions configured; local time labels will be unavailable");
        }
        table
    };

    let file_patterns: Vec<&String> = match matches.get_many::<String>("files") {
        Some(files) => files.collect(),
        None => Vec::new(),
    };
    debug!("Input patterns: {file_patterns:?}");

    let valid_paths = collect_paths(&file_patterns);
    if valid_paths.is_empty() {
        eprintln!("Error: No files found to process.");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let mut extractor = Extractor::new(&lookup);
    let mut processed_files = 0;

    for (index, path) in valid_paths.iter().enumerate() {
        if index > 0 {
            println!();
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        println!("Processing: {filename}");

        match process_file(path, &mut extractor, &export_options) {
            Ok(true) => processed_files += 1,
            Ok(false) => {}
            Err(e) => {
                eprintln!("Error processing {filename}: {e:#}");
                eprintln!("Continuing with next file...");
            }
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No GPS track was extracted from {} files found.",
            valid_paths.len()
        );
        eprintln!("This could be due to:");
        eprintln!("  - Files not existing or not being text (.log) DataFlash logs");
        eprintln!("  - Logs recorded without a GPS fix");
        eprintln!("Use --debug flag for more detailed information.");
        std::process::exit(1);
    }

    Ok(())
}
