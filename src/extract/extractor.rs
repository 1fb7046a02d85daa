//! Extraction loop: drives a message source and collects unique GPS fixes

use crate::error::{GeoError, Result};
use crate::extract::{annotate_local_time, filter_gps_fix, SeenTimestamps, TimezoneLookup};
use crate::source::{LogFraming, MessageSource, SourceFactory};
use crate::types::{Extraction, ExtractionResult, GpsFix, Termination};
use log::{debug, info, warn};
use std::path::Path;

/// Message type carrying GPS fixes
pub const GPS_MESSAGE: &str = "GPS";

/// Reading stops once a step reports more than this much progress
///
/// Decoders do not reliably reach exactly 100%.
pub const PROGRESS_STOP_PERCENT: f64 = 99.99;

/// Lifecycle of one extraction run
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    NotStarted,
    Running,
    Completed(Termination),
    Aborted(String),
}

/// Runs the filter and de-duplication over a message source
///
/// The seen-timestamp set and the sample list belong to the current run alone.
pub struct Extractor<'a> {
    lookup: &'a dyn TimezoneLookup,
    gps_type: String,
    state: RunState,
    seen: SeenTimestamps,
    samples: Vec<GpsFix>,
    messages_read: usize,
}

impl<'a> Extractor<'a> {
    pub fn new(lookup: &'a dyn TimezoneLookup) -> Self {
        Self {
            lookup,
            gps_type: GPS_MESSAGE.to_string(),
            state: RunState::NotStarted,
            seen: SeenTimestamps::new(),
            samples: Vec::new(),
            messages_read: 0,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Open `path` through `factory` and extract its track
    pub fn extract_file(
        &mut self,
        path: &Path,
        factory: &dyn SourceFactory,
    ) -> Result<Extraction> {
        if !path.exists() {
            self.state = RunState::Aborted(format!("{} does not exist", path.display()));
            return Err(GeoError::SourceUnavailable(path.to_path_buf()));
        }

        let framing = LogFraming::for_path(path);
        debug!("Opening {:?} as {:?} log", path, framing);
        let mut source = match factory.open(path, framing) {
            Ok(source) => source,
            Err(e) => {
                self.state = RunState::Aborted(e.to_string());
                return Err(e);
            }
        };

        self.extract(source.as_mut())
    }

    /// Read `source` to completion and return the de-duplicated track
    ///
    /// Calling this again starts a fresh run.
    pub fn extract(&mut self, source: &mut dyn MessageSource) -> Result<Extraction> {
        self.seen = SeenTimestamps::new();
        self.samples.clear();
        self.messages_read = 0;

        let Some(field_names) = source.catalog().field_names(&self.gps_type).cloned() else {
            self.state = RunState::Aborted("no GPS channel".to_string());
            return Err(GeoError::NoGpsChannel);
        };
        let span = source.time_span();

        self.state = RunState::Running;
        let termination = self.run(source, &field_names);
        info!(
            "Total messages: {}, {} unique GPS records ({:?})",
            self.messages_read,
            self.samples.len(),
            termination
        );
        self.state = RunState::Completed(termination.clone());

        if self.samples.is_empty() {
            info!("No GPS Data in File");
            return Ok(Extraction::NoGpsData {
                messages_read: self.messages_read,
                termination,
            });
        }

        let mut result = ExtractionResult {
            samples: std::mem::take(&mut self.samples),
            fieldnames: field_names.join(","),
            local_time: None,
            start_timestamp: span.start,
            end_timestamp: span.end,
            termination,
            messages_read: self.messages_read,
        };

        // Without GPS week time the start is unknown
        let local_time = match result.first_fix() {
            Some(first) if span.is_known() => annotate_local_time(span.start, first, self.lookup),
            _ => {
                warn!("Log carries no GPS week time; local time unavailable");
                None
            }
        };
        result.local_time = local_time;

        Ok(Extraction::Completed(result))
    }

    /// Step loop
    ///
    /// The first step is always examined. Each later step is examined only if its
    /// progress has not passed [`PROGRESS_STOP_PERCENT`].
    fn run(&mut self, source: &mut dyn MessageSource, field_names: &[String]) -> Termination {
        let mut next = source.next_step();

        loop {
            let step = match next {
                Ok(Some(step)) => step,
                Ok(None) => return Termination::EndOfStream,
                Err(e) => {
                    warn!("Stopped reading after {} messages: {}", self.messages_read, e);
                    return Termination::SourceError(e.to_string());
                }
            };

            self.messages_read += 1;
            if let Some(fix) = filter_gps_fix(step.snapshot, &self.gps_type, field_names) {
                if self.seen.admit(&fix) {
                    self.samples.push(fix);
                }
            }

            next = source.next_step();
            if let Ok(Some(step)) = &next {
                debug!("{:.1}%, {} unique records", step.percent, self.samples.len());
                if step.percent > PROGRESS_STOP_PERCENT {
                    return Termination::ProgressThreshold;
                }
            }
        }
    }
}
