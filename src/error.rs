use std::fmt;
use std::path::PathBuf;

/// Errors raised while opening, decoding or exporting a flight log
#[derive(Debug)]
pub enum GeoError {
    /// I/O errors
    Io(std::io::Error),
    /// UTF-8 decoding errors
    Utf8(std::str::Utf8Error),
    /// The input path does not exist
    SourceUnavailable(PathBuf),
    /// The message catalog never declares a GPS message type
    NoGpsChannel,
    /// No decoder is available for this log framing
    UnsupportedFraming(PathBuf),
    /// Malformed log content, with line context where known
    Parse(String),
    /// Invalid configuration
    Config(String),
    /// Export format error
    Export(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::Io(err) => write!(f, "I/O error: {}", err),
            GeoError::Utf8(err) => write!(f, "UTF-8 error: {}", err),
            GeoError::SourceUnavailable(path) => {
                write!(f, "File {} does not exist", path.display())
            }
            GeoError::NoGpsChannel => write!(f, "no GPS data"),
            GeoError::UnsupportedFraming(path) => {
                write!(f, "No decoder available for binary log: {}", path.display())
            }
            GeoError::Parse(msg) => write!(f, "Parse error: {}", msg),
            GeoError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            GeoError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for GeoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoError::Io(err) => Some(err),
            GeoError::Utf8(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GeoError {
    fn from(err: std::io::Error) -> Self {
        GeoError::Io(err)
    }
}

impl From<std::str::Utf8Error> for GeoError {
    fn from(err: std::str::Utf8Error) -> Self {
        GeoError::Utf8(err)
    }
}

impl From<anyhow::Error> for GeoError {
    fn from(err: anyhow::Error) -> Self {
        GeoError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;
