//! Telemetry Geo Library
//!
//! A Rust library for pulling de-duplicated GPS tracks out of ArduPilot DataFlash
//! flight logs, ready to hand to a map-file writer.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV track export
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable JSON export of the full extraction result
//! - **`tz-detect`**: Detect the log's timezone from its coordinates with a bundled
//!   boundary database (`DetectedTimezones`)
//!
//! # Quick Start
//!
//! Extract the GPS track of a text log:
//! ```rust,no_run
//! use telemetry_geo::{extract_track, Extraction, NoTimezone};
//! use std::path::Path;
//!
//! match extract_track(Path::new("flight.log"), &NoTimezone).unwrap() {
//!     Extraction::Completed(result) => {
//!         println!("{} unique fixes", result.samples.len());
//!         if let Some(label) = &result.local_time {
//!             println!("{}", label);
//!         }
//!     }
//!     Extraction::NoGpsData { .. } => println!("No GPS Data in File"),
//! }
//! ```
//!
//! # Public API
//!
//! ## Extraction
//! - [`extract_track`] - Open a log with the built-in decoders and extract its track
//! - [`Extractor`] - The extraction loop, for custom sources and factories
//! - [`filter_gps_fix`] - Pull a usable fix out of one message snapshot
//! - [`SeenTimestamps`] - Timestamp de-duplication
//! - [`annotate_local_time`] - Local date/time label from the first fix
//!
//! ## Sources
//! - [`MessageSource`] - A decoded log read one step at a time
//! - [`SourceFactory`] / [`DataflashSources`] - Open a source by [`LogFraming`]
//! - [`TextLogReader`] - DataFlash text (`.log`) decoder
//! - [`LogClock`] - GPS week time to UTC
//!
//! ## Data Types
//! - [`ExtractionResult`] - Samples, field names, local-time label and time bounds
//! - [`GpsFix`] - One admitted fix
//! - [`MessageSnapshot`] / [`Message`] - Decoded log messages
//!
//! ## Export Functions
//! - [`export_track`] - Write every enabled export for a result
//! - [`compute_export_paths`] - Helper for consistent path computation

// Module declarations
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod source;
pub mod types;

// Re-export everything from modules for convenience
#[allow(ambiguous_glob_reexports)]
pub use config::*;
#[allow(ambiguous_glob_reexports)]
pub use error::*;
#[allow(ambiguous_glob_reexports)]
pub use export::*;
#[allow(ambiguous_glob_reexports)]
pub use extract::*;
#[allow(ambiguous_glob_reexports)]
pub use source::*;
#[allow(ambiguous_glob_reexports)]
pub use types::*;

use std::path::Path;

/// Extract the GPS track of a log file using the built-in decoders
pub fn extract_track(path: &Path, lookup: &dyn TimezoneLookup) -> Result<Extraction> {
    Extractor::new(lookup).extract_file(path, &DataflashSources)
}
