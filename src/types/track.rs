use crate::types::GpsFix;
use serde::Serialize;

/// UTC bounds of a log, in seconds since the Unix epoch
///
/// Both are zero when the log never reports GPS week time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

impl TimeSpan {
    pub fn is_known(&self) -> bool {
        self.start > 0.0
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Why the extraction loop stopped
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The source ran out of messages
    EndOfStream,
    /// Progress went past the early-stop threshold
    ProgressThreshold,
    /// The source failed to decode a message; samples up to that point are kept
    SourceError(String),
}

impl Termination {
    pub fn is_partial(&self) -> bool {
        matches!(self, Termination::SourceError(_))
    }
}

/// De-duplicated GPS track of one log, ready for a map-file writer
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Admitted fixes in first-seen order
    pub samples: Vec<GpsFix>,
    /// GPS field names, comma-joined
    pub fieldnames: String,
    /// "Local Date: ..., Local Time: ..." when a timezone was found
    pub local_time: Option<String>,
    pub start_timestamp: f64,
    pub end_timestamp: f64,
    pub termination: Termination,
    pub messages_read: usize,
}

impl ExtractionResult {
    pub fn first_fix(&self) -> Option<&GpsFix> {
        self.samples.first()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fieldnames.split(',').filter(|name| !name.is_empty())
    }

    pub fn time_span(&self) -> TimeSpan {
        TimeSpan {
            start: self.start_timestamp,
            end: self.end_timestamp,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.time_span().duration_seconds()
    }

    /// Title used by map writers: the log name plus the local-time label
    pub fn display_name(&self, log_name: &str) -> String {
        match &self.local_time {
            Some(label) => format!("{}: {}", log_name, label),
            None => log_name.to_string(),
        }
    }
}

/// Outcome of a completed extraction run
#[derive(Debug, Clone)]
pub enum Extraction {
    Completed(ExtractionResult),
    /// The log was read without admitting a single fix
    NoGpsData {
        messages_read: usize,
        termination: Termination,
    },
}

impl Extraction {
    pub fn into_result(self) -> Option<ExtractionResult> {
        match self {
            Extraction::Completed(result) => Some(result),
            Extraction::NoGpsData { .. } => None,
        }
    }
}
