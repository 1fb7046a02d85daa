use crate::types::FieldValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

pub const FIELD_LAT: &str = "Lat";
pub const FIELD_LNG: &str = "Lng";
pub const FIELD_ALT: &str = "Alt";
pub const FIELD_TIME_MS: &str = "TimeMS";
pub const FIELD_TIME_US: &str = "TimeUS";

/// GPS fix extracted from one message snapshot
///
/// Holds every field the GPS message type declares, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct GpsFix {
    fields: Vec<(String, FieldValue)>,
}

impl GpsFix {
    pub fn from_fields(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn latitude(&self) -> Option<f64> {
        self.get(FIELD_LAT).and_then(FieldValue::as_f64)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.get(FIELD_LNG).and_then(FieldValue::as_f64)
    }

    pub fn altitude(&self) -> Option<f64> {
        self.get(FIELD_ALT).and_then(FieldValue::as_f64)
    }

    /// Dedup identity: `TimeMS` when set, otherwise `TimeUS`
    ///
    /// Fixes carrying neither share the `Null` key.
    pub fn timestamp_key(&self) -> TimestampKey {
        let value = match self.get(FIELD_TIME_MS) {
            Some(value) if !value.is_null() => Some(value),
            _ => self.get(FIELD_TIME_US),
        };
        value.map(TimestampKey::from).unwrap_or(TimestampKey::Null)
    }
}

impl Serialize for GpsFix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Hashable form of a fix timestamp
///
/// Whole-number floats fold onto `Int` so `300` and `300.0` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimestampKey {
    Int(i64),
    Float(u64),
    Text(String),
    Null,
}

impl From<&FieldValue> for TimestampKey {
    fn from(value: &FieldValue) -> Self {
        if let Some(whole) = value.as_i64() {
            return TimestampKey::Int(whole);
        }
        match value {
            FieldValue::Float(v) => TimestampKey::Float(v.to_bits()),
            FieldValue::Text(v) => TimestampKey::Text(v.clone()),
            _ => TimestampKey::Null,
        }
    }
}
