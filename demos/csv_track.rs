//! CSV Track Example
//!
//! Extracts the GPS track of a DataFlash text log and writes `<name>.gps.csv`,
//! labelling the track with local time in a single fixed timezone.

use std::path::Path;
use telemetry_geo::{export_track, extract_track, ExportOptions, Extraction, RegionTable};

fn main() -> anyhow::Result<()> {
    // Get input file from command line or show usage
    let input_file = std::env::args().nth(1).unwrap_or_else(|| {
        println!("Usage: csv_track <input.log> [output_dir] [timezone]");
        println!("Example: csv_track 00000042.log ./output Australia/Sydney");
        std::process::exit(1);
    });
    let output_dir = std::env::args().nth(2);

    // Every fix falls back to the given zone when one is supplied
    let lookup = match std::env::args().nth(3) {
        Some(zone) => {
            let tz: chrono_tz::Tz = zone
                .parse()
                .map_err(|e| anyhow::anyhow!("unknown timezone {zone}: {e}"))?;
            RegionTable::new(Vec::new(), Some(tz))
        }
        None => RegionTable::default(),
    };

    let export_opts = ExportOptions {
        csv: true,
        json: false,
        output_dir,
    };

    println!("Extracting: {}", input_file);
    let result = match extract_track(Path::new(&input_file), &lookup)? {
        Extraction::Completed(result) => result,
        Extraction::NoGpsData {
            messages_read,
            termination,
        } => {
            println!("No GPS Data in File ({} messages read, {:?})", messages_read, termination);
            return Ok(());
        }
    };

    println!("\nTrack Information:");
    println!("  Messages read: {}", result.messages_read);
    println!("  Unique fixes: {}", result.samples.len());
    println!("  Duration: {:.1}s", result.duration_seconds());
    if let Some(label) = &result.local_time {
        println!("  {}", label);
    }

    let report = export_track(&result, Path::new(&input_file), &export_opts)?;
    if let Some(path) = report.csv_path {
        println!("\nExported GPS data to: {}", path.display());
    }

    Ok(())
}
