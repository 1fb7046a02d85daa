//! Export functionality for extracted tracks
//!
//! Writers implement [`GeoOutput`] and receive the finished [`ExtractionResult`].
//! CSV writes the `Lat,Lng,Alt` rows mapping tools import directly; JSON dumps
//! the whole result including every GPS field.

use crate::config::ExportConfig;
use crate::error::{GeoError, Result};
use crate::types::ExtractionResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Export options for controlling output formats
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub csv: bool,
    pub json: bool,
    pub output_dir: Option<String>,
}

impl ExportOptions {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            csv: config.csv,
            json: config.json,
            output_dir: config.output_dir.clone(),
        }
    }
}

/// Files written by [`export_track`]
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub csv_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

impl ExportReport {
    pub fn is_empty(&self) -> bool {
        self.csv_path.is_none() && self.json_path.is_none()
    }
}

/// Output locations for one input log
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Compute export paths: `<output_dir>/<stem>.gps.csv` and `.gps.json`
///
/// Without an output directory, files land next to the input log.
pub fn compute_export_paths(input_path: &Path, export_options: &ExportOptions) -> ExportPaths {
    let base_name = input_path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let output_dir = match export_options.output_dir.as_deref() {
        Some(dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    ExportPaths {
        csv: output_dir.join(format!("{}.gps.csv", base_name)),
        json: output_dir.join(format!("{}.gps.json", base_name)),
    }
}

/// Map-file writer fed with a finished track
pub trait GeoOutput {
    fn write_track(
        &self,
        result: &ExtractionResult,
        display_name: &str,
        output_path: &Path,
    ) -> Result<()>;
}

fn ensure_parent_dir(output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Writes one `Lat,Lng,Alt` row per fix
#[cfg(feature = "csv")]
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTrackWriter;

#[cfg(feature = "csv")]
impl GeoOutput for CsvTrackWriter {
    fn write_track(
        &self,
        result: &ExtractionResult,
        _display_name: &str,
        output_path: &Path,
    ) -> Result<()> {
        use crate::types::{FIELD_ALT, FIELD_LAT, FIELD_LNG};

        ensure_parent_dir(output_path)?;
        let mut writer = csv::Writer::from_path(output_path)
            .map_err(|e| GeoError::Export(format!("{}: {}", output_path.display(), e)))?;

        let columns = [FIELD_LAT, FIELD_LNG, FIELD_ALT];
        writer
            .write_record(columns)
            .map_err(|e| GeoError::Export(e.to_string()))?;

        for fix in &result.samples {
            let row = columns.map(|name| fix.get(name).map(|v| v.to_string()).unwrap_or_default());
            writer
                .write_record(&row)
                .map_err(|e| GeoError::Export(e.to_string()))?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// Dumps the whole result, every GPS field included, as pretty JSON
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTrackWriter;

#[cfg(feature = "json")]
impl GeoOutput for JsonTrackWriter {
    fn write_track(
        &self,
        result: &ExtractionResult,
        display_name: &str,
        output_path: &Path,
    ) -> Result<()> {
        use std::io::{BufWriter, Write};

        #[derive(serde::Serialize)]
        struct NamedTrack<'a> {
            name: &'a str,
            #[serde(flatten)]
            track: &'a ExtractionResult,
        }

        ensure_parent_dir(output_path)?;
        let file = fs::File::create(output_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(
            &mut writer,
            &NamedTrack {
                name: display_name,
                track: result,
            },
        )
        .map_err(|e| GeoError::Export(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }
}

/// Write every enabled export for one extracted log
pub fn export_track(
    result: &ExtractionResult,
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<ExportReport> {
    let paths = compute_export_paths(input_path, export_options);
    let log_name = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    let display_name = result.display_name(log_name);
    let mut report = ExportReport::default();

    if export_options.csv {
        #[cfg(feature = "csv")]
        {
            CsvTrackWriter.write_track(result, &display_name, &paths.csv)?;
            log::info!("GPS data written to: {}", paths.csv.display());
            report.csv_path = Some(paths.csv.clone());
        }
        #[cfg(not(feature = "csv"))]
        log::warn!("CSV export requested but the `csv` feature is disabled");
    }

    if export_options.json {
        #[cfg(feature = "json")]
        {
            JsonTrackWriter.write_track(result, &display_name, &paths.json)?;
            log::info!("Track written to: {}", paths.json.display());
            report.json_path = Some(paths.json.clone());
        }
        #[cfg(not(feature = "json"))]
        log::warn!("JSON export requested but the `json` feature is disabled");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_next_to_input_by_default() {
        let paths = compute_export_paths(Path::new("logs/10.log"), &ExportOptions::default());
        assert_eq!(paths.csv, PathBuf::from("logs/10.gps.csv"));
        assert_eq!(paths.json, PathBuf::from("logs/10.gps.json"));
    }

    #[test]
    fn test_paths_for_bare_file_name() {
        let paths = compute_export_paths(Path::new("10.log"), &ExportOptions::default());
        assert_eq!(paths.csv, PathBuf::from("./10.gps.csv"));
    }

    #[test]
    fn test_paths_in_output_dir() {
        let options = ExportOptions {
            csv: true,
            json: false,
            output_dir: Some("out".to_string()),
        };
        let paths = compute_export_paths(Path::new("/data/flight.log"), &options);
        assert_eq!(paths.csv, PathBuf::from("out/flight.gps.csv"));
    }
}
