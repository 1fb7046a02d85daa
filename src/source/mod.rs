//! Message sources: decoders that turn a flight log into a stream of snapshots
//!
//! The extraction loop only sees the [`MessageSource`] trait. Which decoder backs
//! it is decided from the file name by [`LogFraming::for_path`] and a
//! [`SourceFactory`].

pub mod clock;
pub mod text;

pub use clock::*;
pub use text::*;

use crate::error::{GeoError, Result};
use crate::types::{MessageCatalog, Step, TimeSpan};
use std::path::Path;

/// A decoded flight log, read one message at a time
///
/// Sources are finite and cannot be rewound. The catalog and time span are known
/// as soon as the source is open.
pub trait MessageSource {
    /// Message types the log declares
    fn catalog(&self) -> &MessageCatalog;

    /// UTC bounds of the log
    fn time_span(&self) -> TimeSpan;

    /// Decode the next message
    ///
    /// Returns `Ok(None)` once the log is exhausted.
    fn next_step(&mut self) -> Result<Option<Step<'_>>>;
}

/// How a log file is framed on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFraming {
    /// One comma-separated message per line (`.log`)
    Text,
    /// Length-implied binary records (`.bin` and everything else)
    Binary,
}

impl LogFraming {
    pub fn for_path(path: &Path) -> Self {
        let is_text = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("log"))
            .unwrap_or(false);

        if is_text {
            LogFraming::Text
        } else {
            LogFraming::Binary
        }
    }
}

/// Opens a message source for a log file
pub trait SourceFactory {
    fn open(&self, path: &Path, framing: LogFraming) -> Result<Box<dyn MessageSource>>;
}

/// Decoders shipped with this crate
///
/// Only text framing is decoded here; binary logs need a caller-supplied factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataflashSources;

impl SourceFactory for DataflashSources {
    fn open(&self, path: &Path, framing: LogFraming) -> Result<Box<dyn MessageSource>> {
        match framing {
            LogFraming::Text => Ok(Box::new(TextLogReader::open(path)?)),
            LogFraming::Binary => Err(GeoError::UnsupportedFraming(path.to_path_buf())),
        }
    }
}
