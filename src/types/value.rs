use serde::Serialize;
use std::fmt;

/// A single decoded field value
///
/// Text-framed logs carry already-scaled values, so coordinates arrive as floats
/// and counters as integers. Fields a message does not carry read as `Null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl FieldValue {
    /// Decode one comma-separated token from a text log line
    pub fn parse_token(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            return FieldValue::Null;
        }
        if let Ok(value) = token.parse::<i64>() {
            return FieldValue::Int(value);
        }
        if let Ok(value) = token.parse::<f64>() {
            return FieldValue::Float(value);
        }
        FieldValue::Text(token.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer view; floats qualify only when they hold a whole number
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                Some(*v as i64)
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(v) => write!(f, "{}", v),
            FieldValue::Null => Ok(()),
        }
    }
}
