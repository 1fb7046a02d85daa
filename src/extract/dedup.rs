//! Timestamp de-duplication
//!
//! A snapshot keeps returning the last GPS record until a newer one is decoded,
//! so the same fix shows up once per intervening message (IMU, attitude, ...).
//! Only the first sighting of each timestamp is kept.

use crate::types::{GpsFix, TimestampKey};
use std::collections::HashSet;

/// Timestamps already admitted during one extraction run
#[derive(Debug, Clone, Default)]
pub struct SeenTimestamps {
    seen: HashSet<TimestampKey>,
}

impl SeenTimestamps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a fix if its timestamp key is new, recording the key
    pub fn admit(&mut self, fix: &GpsFix) -> bool {
        self.seen.insert(fix.timestamp_key())
    }

    pub fn contains(&self, key: &TimestampKey) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;

    fn fix_at(field: &str, value: FieldValue) -> GpsFix {
        GpsFix::from_fields(vec![
            (field.to_string(), value),
            ("Lat".to_string(), FieldValue::Float(10.0)),
        ])
    }

    #[test]
    fn test_repeated_timestamp_rejected() {
        let mut seen = SeenTimestamps::new();
        assert!(seen.admit(&fix_at("TimeMS", FieldValue::Int(100))));
        assert!(!seen.admit(&fix_at("TimeMS", FieldValue::Int(100))));
        assert!(seen.admit(&fix_at("TimeMS", FieldValue::Int(200))));
        assert!(!seen.admit(&fix_at("TimeMS", FieldValue::Int(100))));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_rejection_leaves_set_unchanged() {
        let mut seen = SeenTimestamps::new();
        seen.admit(&fix_at("TimeUS", FieldValue::Int(5)));
        seen.admit(&fix_at("TimeUS", FieldValue::Int(5)));
        assert_eq!(seen.len(), 1);
        assert!(seen.contains(&TimestampKey::Int(5)));
    }

    #[test]
    fn test_null_keys_collapse() {
        let mut seen = SeenTimestamps::new();
        let untimed = GpsFix::from_fields(vec![("Lat".to_string(), FieldValue::Float(1.0))]);
        let other = GpsFix::from_fields(vec![("Lat".to_string(), FieldValue::Float(2.0))]);
        assert!(seen.admit(&untimed));
        assert!(!seen.admit(&other));
    }
}
