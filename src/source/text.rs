//! DataFlash text log reader
//!
//! Text logs carry one message per line: the message type name followed by its
//! comma-separated values. `FMT` lines declare each type's format characters and
//! column names, e.g.
//!
//! ```text
//! FMT, 130, 45, GPS, BIHBcLLeeEefI, Status,TimeMS,Week,NSats,HDop,Lat,Lng,RelAlt,Alt,Spd,GCrs,VZ,T
//! GPS, 3, 134030600, 1800, 10, 1.21, -35.3632621, 149.1652374, 0.29, 584.27, 0.02, 91.5, 0.01, 52313
//! ```

use crate::error::{GeoError, Result};
use crate::source::{LogClock, MessageSource};
use crate::types::{FieldValue, Message, MessageCatalog, MessageSnapshot, Step, TimeSpan};
use log::debug;
use std::collections::HashMap;
use std::path::Path;

const FMT_TYPE: &str = "FMT";
const FMT_COLUMNS: [&str; 5] = ["Type", "Length", "Name", "Format", "Columns"];

/// Format characters whose values are strings rather than numbers
fn is_text_format(format_char: char) -> bool {
    matches!(format_char, 'n' | 'N' | 'Z' | 'a')
}

/// Split a log line into trimmed tokens
fn tokenize(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

/// Reads a DataFlash text log held in memory
pub struct TextLogReader {
    data: String,
    offset: usize,
    line_number: usize,
    formats: HashMap<String, String>,
    catalog: MessageCatalog,
    snapshot: MessageSnapshot,
    span: TimeSpan,
}

impl TextLogReader {
    /// Read a log from disk and index its formats and clock
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GeoError::SourceUnavailable(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let data = std::str::from_utf8(&bytes)?.to_string();
        debug!("Read text log {:?} ({} bytes)", path, data.len());
        Ok(Self::from_text(data))
    }

    /// Index a log already in memory
    ///
    /// The whole log is scanned once for `FMT` declarations and GPS time before
    /// any message is handed out, so the catalog and time span are complete up
    /// front. Lines that fail to decode are skipped here; stepping reports them.
    pub fn from_text(data: impl Into<String>) -> Self {
        let data = data.into();
        let mut formats = HashMap::new();
        let mut catalog = MessageCatalog::new();
        catalog.declare(FMT_TYPE, FMT_COLUMNS.iter().map(|c| c.to_string()).collect());

        for line in data.lines() {
            let tokens = tokenize(line);
            // Only FMT lines that decode as full FMT records declare a type
            if tokens.first() == Some(&FMT_TYPE) && tokens.len() > FMT_COLUMNS.len() {
                let columns = tokens[5..]
                    .iter()
                    .filter(|column| !column.is_empty())
                    .map(|column| column.to_string())
                    .collect();
                formats.insert(tokens[3].to_string(), tokens[4].to_string());
                catalog.declare(tokens[3], columns);
            }
        }

        let mut clock = LogClock::new();
        for line in data.lines() {
            if let Ok(Some(message)) = decode_line(line, &formats, &catalog) {
                clock.observe(&message);
            }
        }
        let span = clock.span();

        debug!(
            "Indexed {} message types, span {:.3}..{:.3}",
            catalog.len(),
            span.start,
            span.end
        );

        Self {
            data,
            offset: 0,
            line_number: 0,
            formats,
            catalog,
            snapshot: MessageSnapshot::new(),
            span,
        }
    }

    fn percent(&self) -> f64 {
        if self.data.is_empty() {
            100.0
        } else {
            100.0 * self.offset as f64 / self.data.len() as f64
        }
    }

    /// Advance past the next line, returning it
    fn next_line(&mut self) -> Option<&str> {
        if self.offset >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.offset..];
        let (line, consumed) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], pos + 1),
            None => (rest, rest.len()),
        };
        self.offset += consumed;
        self.line_number += 1;
        Some(line)
    }
}

/// Decode one line into a message
///
/// Blank lines and lines of undeclared types yield `None`. Lines with fewer
/// values than their type declares are errors; surplus values are folded into
/// the last column, which is where free-text messages put their commas.
fn decode_line(
    line: &str,
    formats: &HashMap<String, String>,
    catalog: &MessageCatalog,
) -> std::result::Result<Option<Message>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let tokens = tokenize(line);
    let type_name = tokens[0];
    let Some(columns) = catalog.field_names(type_name) else {
        return Ok(None);
    };

    let values = &tokens[1..];
    if values.len() < columns.len() {
        return Err(format!(
            "{} message has {} values, format declares {}",
            type_name,
            values.len(),
            columns.len()
        ));
    }

    let format: Vec<char> = if type_name == FMT_TYPE {
        "BBnNZ".chars().collect()
    } else {
        formats
            .get(type_name)
            .map(|f| f.chars().collect())
            .unwrap_or_default()
    };

    let last = columns.len().saturating_sub(1);
    let decoded = (0..columns.len())
        .map(|i| {
            let raw = if i == last && values.len() > columns.len() {
                values[i..].join(",")
            } else {
                values[i].to_string()
            };
            match format.get(i) {
                Some(&c) if is_text_format(c) => {
                    if raw.is_empty() {
                        FieldValue::Null
                    } else {
                        FieldValue::Text(raw)
                    }
                }
                _ => FieldValue::parse_token(&raw),
            }
        })
        .collect();

    Ok(Some(Message::new(type_name, columns.clone(), decoded)))
}

impl MessageSource for TextLogReader {
    fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    fn time_span(&self) -> TimeSpan {
        self.span
    }

    fn next_step(&mut self) -> Result<Option<Step<'_>>> {
        loop {
            let Some(line) = self.next_line() else {
                return Ok(None);
            };
            let line = line.to_string();
            match decode_line(&line, &self.formats, &self.catalog) {
                Ok(Some(message)) => {
                    self.snapshot.record(message);
                    let percent = self.percent();
                    return Ok(Some(Step {
                        snapshot: &self.snapshot,
                        percent,
                    }));
                }
                Ok(None) => continue,
                Err(msg) => {
                    return Err(GeoError::Parse(format!("line {}: {}", self.line_number, msg)));
                }
            }
        }
    }
}
